//! Asset collaborators for the UI renderer
//!
//! The batcher consumes textures, sprite frames, and materials through
//! identity-comparable handles. This module provides the minimal stores
//! backing those handles; loading and decoding live elsewhere.

pub mod material;
pub mod sprite_frame;
pub mod texture;

pub use material::{Material, MaterialKey, MaterialValue};
pub use sprite_frame::{SliceUv, SpriteFrame, SpriteFrameKey};
pub use texture::{Texture, TextureKey};

use crate::foundation::collections::HandleMap;

/// Central registry for the asset kinds the batcher references
///
/// All stores hand out generational keys; a stale key simply resolves to
/// `None`, which the render path treats as "asset missing, skip".
#[derive(Default)]
pub struct AssetStore {
    textures: HandleMap<TextureKey, Texture>,
    frames: HandleMap<SpriteFrameKey, SpriteFrame>,
    materials: HandleMap<MaterialKey, Material>,
}

impl AssetStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture
    pub fn add_texture(&mut self, texture: Texture) -> TextureKey {
        self.textures.insert(texture)
    }

    /// Register a sprite frame, deriving its UV tables from its texture
    ///
    /// A frame whose texture key is unknown is stored as-is; its UVs are
    /// recomputed once `refresh_frame` is called with a valid texture.
    pub fn add_frame(&mut self, mut frame: SpriteFrame) -> SpriteFrameKey {
        if let Some(texture) = self.textures.get(frame.texture) {
            frame.calculate_uv(texture);
        }
        self.frames.insert(frame)
    }

    /// Register a material
    pub fn add_material(&mut self, material: Material) -> MaterialKey {
        self.materials.insert(material)
    }

    /// Look up a texture
    pub fn texture(&self, key: TextureKey) -> Option<&Texture> {
        self.textures.get(key)
    }

    /// Look up a texture mutably
    pub fn texture_mut(&mut self, key: TextureKey) -> Option<&mut Texture> {
        self.textures.get_mut(key)
    }

    /// Look up a sprite frame
    pub fn frame(&self, key: SpriteFrameKey) -> Option<&SpriteFrame> {
        self.frames.get(key)
    }

    /// Look up a material
    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    /// Look up a material mutably
    pub fn material_mut(&mut self, key: MaterialKey) -> Option<&mut Material> {
        self.materials.get_mut(key)
    }

    /// Mutate a sprite frame and recompute its UV tables
    pub fn refresh_frame(
        &mut self,
        key: SpriteFrameKey,
        update: impl FnOnce(&mut SpriteFrame),
    ) {
        if let Some(frame) = self.frames.get_mut(key) {
            update(frame);
            if let Some(texture) = self.textures.get(frame.texture) {
                frame.calculate_uv(texture);
            }
        }
    }

    /// Check whether a frame exists and its texture has finished loading
    pub fn frame_ready(&self, key: SpriteFrameKey) -> bool {
        self.frames
            .get(key)
            .and_then(|frame| self.textures.get(frame.texture))
            .is_some_and(Texture::loaded)
    }
}
