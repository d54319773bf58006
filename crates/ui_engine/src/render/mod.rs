//! # Render-Data Layer
//!
//! Backend-agnostic building blocks between the UI tree and the GPU:
//!
//! - **MeshBuffer**: growable shared vertex/index arena all elements of a
//!   canvas append into between flushes
//! - **RenderData**: pooled per-element geometry cache with dirty tracking
//! - **DrawCall / InputAssembler**: per-flush submission records, recycled
//!   every frame
//! - **View / RenderScene**: per-canvas camera state and the registry the
//!   batcher submits into
//! - **Device traits**: the write-only buffer objects a real backend
//!   implements; a headless implementation backs tests
//!
//! Nothing here walks the scene or decides batch boundaries; that is the
//! `ui` module's job.

pub mod device;
pub mod draw_call;
pub mod mesh_buffer;
pub mod render_data;
pub mod scene;
pub mod view;

pub use device::{HeadlessBuffer, IndexBufferObject, VertexBufferObject};
pub use draw_call::{DrawCall, InputAssembler};
pub use mesh_buffer::{IndexRange, MeshBuffer, MAX_VERTEX_COUNT, VERTEX_BYTES, VERTEX_FLOATS};
pub use render_data::{RenderData, RenderDataKey, RenderDataPool, UiVertex};
pub use scene::RenderScene;
pub use view::{ClearFlags, View, ViewId};
