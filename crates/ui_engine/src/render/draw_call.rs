//! Draw-call model and input-assembler descriptors
//!
//! One draw call is emitted per flush: a contiguous run of geometry in the
//! shared buffer sharing one material. Both record types are recycled
//! through pools every frame rather than freed.

use crate::assets::MaterialKey;
use crate::scene::NodeKey;

use super::view::ViewId;

/// GPU-facing descriptor of an index range to draw
///
/// The vertex/index buffers are implicit: a UI system owns exactly one
/// shared buffer pair, and every input assembler it emits points into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputAssembler {
    /// First index of the range
    pub start: usize,

    /// Number of indices in the range
    pub count: usize,
}

/// One batched draw call
///
/// The node is the batch's representative transform carrier. Vertices are
/// already world-transformed in the buffer, so downstream consumers treat
/// it as an identity fallback, not a shared transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawCall {
    /// Representative node of the batch
    pub node: NodeKey,

    /// Material/effect shared by the whole range
    pub material: Option<MaterialKey>,

    /// Index of the input assembler in the system's per-frame pool
    pub input_assembler: usize,

    /// View this batch belongs to
    pub view_id: ViewId,

    /// Monotonically increasing submission key; preserves traversal order
    /// downstream and doubles as the draw call's identity
    pub sort_key: u32,
}
