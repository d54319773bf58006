//! Per-element geometry cache
//!
//! Each renderable owns one pooled `RenderData` record holding its local
//! vertices and UVs between frames. Dirty flags gate recomputation: an
//! assembler only rebuilds geometry when something structural changed, and
//! clears the flag once it has.

use crate::assets::MaterialKey;
use crate::foundation::collections::{new_key_type, HandleMap};
use crate::foundation::math::{Vec2, Vec3};

new_key_type! {
    /// Handle to a pooled render-data record
    pub struct RenderDataKey;
}

/// One cached vertex slot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UiVertex {
    /// Position, local or world space depending on the slot's role
    pub pos: Vec3,

    /// Texture coordinate
    pub uv: Vec2,

    /// Packed RGBA color
    pub color: u32,
}

/// Cached geometry for one renderable
///
/// The number of vertex slots tracks the render mode's topology: 4 for
/// simple quads, 20 for sliced, 8 for filled, and row/column dependent for
/// tiled.
pub struct RenderData {
    /// Material the geometry was built against
    pub material: Option<MaterialKey>,

    /// Vertices this element will append to the shared buffer
    pub vertex_count: usize,

    /// Indices this element will append to the shared buffer
    pub indice_count: usize,

    /// UVs need recomputation
    pub uv_dirty: bool,

    /// Vertices need recomputation
    pub vert_dirty: bool,

    /// Vertex slots; meaning of each slot is assembler-specific
    pub data: Vec<UiVertex>,

    width: f32,
    height: f32,
    pivot_x: f32,
    pivot_y: f32,
}

impl Default for RenderData {
    fn default() -> Self {
        Self {
            material: None,
            vertex_count: 0,
            indice_count: 0,
            uv_dirty: true,
            vert_dirty: true,
            data: Vec::new(),
            width: 0.0,
            height: 0.0,
            pivot_x: 0.0,
            pivot_y: 0.0,
        }
    }
}

impl RenderData {
    /// Number of vertex slots
    pub fn data_length(&self) -> usize {
        self.data.len()
    }

    /// Resize the vertex slot sequence
    ///
    /// Growth appends default-initialized slots; shrinking retains the
    /// backing capacity for the record's next use.
    pub fn set_data_length(&mut self, length: usize) {
        self.data.resize(length, UiVertex::default());
    }

    /// Record the element's size and pivot, marking vertices dirty only
    /// when one of the four values actually changed
    pub fn update_size_pivot(&mut self, width: f32, height: f32, pivot_x: f32, pivot_y: f32) {
        if width != self.width
            || height != self.height
            || pivot_x != self.pivot_x
            || pivot_y != self.pivot_y
        {
            self.width = width;
            self.height = height;
            self.pivot_x = pivot_x;
            self.pivot_y = pivot_y;
            self.vert_dirty = true;
        }
    }

    /// Zero all fields and raise both dirty flags
    ///
    /// Called when the record returns to the pool; slot capacity is kept.
    pub fn clear(&mut self) {
        self.data.clear();
        self.material = None;
        self.vertex_count = 0;
        self.indice_count = 0;
        self.uv_dirty = true;
        self.vert_dirty = true;
        self.width = 0.0;
        self.height = 0.0;
        self.pivot_x = 0.0;
        self.pivot_y = 0.0;
    }
}

/// Pool of render-data records
///
/// Records are addressed by generational keys, so a renderable holding a
/// key to a freed record resolves to `None` instead of aliasing whatever
/// reused the slot. Freed records keep their slot capacity and are handed
/// out again by `alloc`.
#[derive(Default)]
pub struct RenderDataPool {
    records: HandleMap<RenderDataKey, RenderData>,
    free: Vec<RenderData>,
}

impl RenderDataPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a cleared record
    pub fn alloc(&mut self) -> RenderDataKey {
        let record = self.free.pop().unwrap_or_default();
        self.records.insert(record)
    }

    /// Clear a record and return it to the pool
    pub fn free(&mut self, key: RenderDataKey) {
        if let Some(mut record) = self.records.remove(key) {
            record.clear();
            self.free.push(record);
        }
    }

    /// Access a live record
    pub fn get(&self, key: RenderDataKey) -> Option<&RenderData> {
        self.records.get(key)
    }

    /// Access a live record mutably
    pub fn get_mut(&mut self, key: RenderDataKey) -> Option<&mut RenderData> {
        self.records.get_mut(key)
    }

    /// Number of live records
    pub fn live_count(&self) -> usize {
        self.records.len()
    }
}
