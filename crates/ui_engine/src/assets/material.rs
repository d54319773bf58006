//! Material asset for UI rendering
//!
//! Materials are identity-compared by handle when deciding batch
//! boundaries; two sprites batch together only when they share the same
//! material key and sprite frame.

use std::collections::HashMap;

use crate::foundation::collections::new_key_type;
use crate::foundation::color::Color;

use super::texture::TextureKey;

new_key_type! {
    /// Handle to a material in the asset store
    pub struct MaterialKey;
}

/// Value types accepted by `Material::set_property`
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialValue {
    /// Scalar uniform
    Float(f32),

    /// Vector uniform
    Vec4([f32; 4]),

    /// Color uniform
    Color(Color),

    /// Texture binding
    Texture(TextureKey),
}

/// Shader effect parameters for a batch
#[derive(Debug, Clone, Default)]
pub struct Material {
    properties: HashMap<String, MaterialValue>,
}

impl Material {
    /// Create a material with no properties set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sprite material bound to `texture`
    pub fn sprite(texture: TextureKey) -> Self {
        let mut material = Self::new();
        material.set_property("mainTexture", MaterialValue::Texture(texture));
        material
    }

    /// Set a named effect property
    pub fn set_property(&mut self, name: impl Into<String>, value: MaterialValue) {
        self.properties.insert(name.into(), value);
    }

    /// Get a named effect property
    pub fn property(&self, name: &str) -> Option<&MaterialValue> {
        self.properties.get(name)
    }

    /// The texture bound as `mainTexture`, if any
    pub fn main_texture(&self) -> Option<TextureKey> {
        match self.property("mainTexture") {
            Some(MaterialValue::Texture(key)) => Some(*key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_property_overwrites() {
        let mut material = Material::new();
        material.set_property("fade", MaterialValue::Float(0.5));
        material.set_property("fade", MaterialValue::Float(0.75));

        assert_eq!(material.property("fade"), Some(&MaterialValue::Float(0.75)));
    }

    #[test]
    fn test_sprite_material_binds_main_texture() {
        let key = TextureKey::default();
        let material = Material::sprite(key);
        assert_eq!(material.main_texture(), Some(key));
    }
}
