//! Texture asset stub
//!
//! The renderer only needs a texture's pixel dimensions for UV math and a
//! loaded flag to gate rendering; pixel data never passes through here.

use crate::foundation::collections::new_key_type;

new_key_type! {
    /// Handle to a texture in the asset store
    pub struct TextureKey;
}

/// GPU texture as seen by the UI renderer
#[derive(Debug, Clone)]
pub struct Texture {
    /// Atlas width in pixels
    pub width: f32,

    /// Atlas height in pixels
    pub height: f32,

    loaded: bool,
}

impl Texture {
    /// Create a texture that is already resident
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            loaded: true,
        }
    }

    /// Create a texture whose pixels are still streaming in
    ///
    /// Sprites referencing it are skipped each frame until `mark_loaded`
    /// is called; they pick themselves up on the following frame.
    pub fn pending(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            loaded: false,
        }
    }

    /// Whether the pixel data is resident
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Signal that the pixel data became resident
    pub fn mark_loaded(&mut self) {
        self.loaded = true;
    }
}
