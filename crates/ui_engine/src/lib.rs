//! # UI Engine
//!
//! A 2D UI batching and render-data engine: walks a scene graph of UI
//! elements each frame, assembles their geometry into shared GPU-ready
//! vertex/index buffers, and submits minimal draw calls by merging
//! contiguous elements that share a material and texture.
//!
//! ## Features
//!
//! - **Batching Renderer**: single-pass tree walk with material-keyed
//!   batch boundaries
//! - **Geometry Assemblers**: simple, sliced (9-patch), tiled, bar-filled,
//!   and radial-filled sprite modes
//! - **Object Pooling**: render data, draw calls, and input assemblers are
//!   recycled, not freed, eliminating per-frame allocation churn
//! - **Backend Agnostic**: GPU buffers sit behind write-only traits; a
//!   headless implementation backs tests and server-side use
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ui_engine::prelude::*;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let mut scene = SceneGraph::new();
//!     let mut assets = AssetStore::new();
//!     let mut render_scene = RenderScene::new();
//!     let mut system = UiSystem::headless(UiSettings::default())?;
//!
//!     let texture = assets.add_texture(Texture::new(256.0, 256.0));
//!     let frame = assets.add_frame(SpriteFrame::new(texture, Rect::new(0.0, 0.0, 64.0, 64.0)));
//!     let material = assets.add_material(Material::sprite(texture));
//!
//!     let root = scene.create_node(None);
//!     let canvas = system.create_canvas(root);
//!     let _view = system.add_screen(canvas, &mut render_scene);
//!
//!     let node = scene.create_node(Some(root));
//!     scene.set_sprite(node, SpriteRenderer::new(material, frame));
//!
//!     // Once per frame:
//!     system.update(&mut scene, &assets, &mut render_scene, Size::new(1280.0, 720.0));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod ui;

/// Common imports for engine users
pub mod prelude {
    pub use crate::assets::{AssetStore, Material, SpriteFrame, Texture};
    pub use crate::config::{Config, ConfigError, UiSettings};
    pub use crate::foundation::{
        color::Color,
        math::{Mat4, Rect, Size, Transform, Vec2, Vec3},
    };
    pub use crate::render::{HeadlessBuffer, RenderScene};
    pub use crate::scene::{NodeKey, SceneGraph};
    pub use crate::ui::{Canvas, FillType, SpriteMode, SpriteRenderer, UiSystem};
}
