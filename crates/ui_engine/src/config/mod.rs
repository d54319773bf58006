//! Configuration system
//!
//! TOML-backed settings for the UI renderer, following the same
//! load/save/validate shape as the rest of the engine's configuration.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Size;

/// Configuration trait for TOML-serializable settings types
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// A settings value failed validation
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Settings for the UI batching renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Vertex slots preallocated in the shared mesh buffer
    pub initial_vertex_capacity: usize,

    /// Index slots preallocated in the shared mesh buffer
    pub initial_indice_capacity: usize,

    /// Optional cap on the vertex arena, in bytes
    ///
    /// `None` lets the buffer double without bound, matching the classic
    /// behavior; a pathological scene can then grow it indefinitely. With a
    /// cap set, requests that would exceed it are refused: the element
    /// renders nothing that frame and a warning is logged.
    pub max_buffer_bytes: Option<usize>,

    /// Default design resolution assigned to new canvases
    pub design_resolution: Size,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            // 256 quads before the first growth, same seed as the initial
            // 16-bit-index buffers this layout was tuned for.
            initial_vertex_capacity: 256 * 4,
            initial_indice_capacity: 256 * 6,
            max_buffer_bytes: None,
            design_resolution: Size::new(960.0, 640.0),
        }
    }
}

impl UiSettings {
    /// Validate settings values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_vertex_capacity == 0 {
            return Err(ConfigError::Invalid(
                "initial_vertex_capacity must be non-zero".to_string(),
            ));
        }
        if self.initial_indice_capacity == 0 {
            return Err(ConfigError::Invalid(
                "initial_indice_capacity must be non-zero".to_string(),
            ));
        }
        if self.design_resolution.width <= 0.0 || self.design_resolution.height <= 0.0 {
            return Err(ConfigError::Invalid(
                "design_resolution must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config for UiSettings {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(UiSettings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let settings = UiSettings {
            initial_vertex_capacity: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = UiSettings {
            max_buffer_bytes: Some(1 << 20),
            ..Default::default()
        };

        let text = toml::to_string(&settings).unwrap();
        let back: UiSettings = toml::from_str(&text).unwrap();
        assert_eq!(back.max_buffer_bytes, Some(1 << 20));
        assert_eq!(back.initial_vertex_capacity, settings.initial_vertex_capacity);
    }
}
