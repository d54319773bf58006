//! Math utilities and types
//!
//! Provides fundamental math types for 2D UI rendering and scene transforms.

pub use nalgebra::{
    Matrix3, Matrix4,
    Quaternion,
    Unit,
    Vector2, Vector3, Vector4,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Width/height pair in design units or pixels
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Horizontal extent
    pub width: f32,

    /// Vertical extent
    pub height: f32,
}

impl Size {
    /// Create a new size
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle (origin at bottom-left for layout rects,
/// top-left for texture-atlas rects; the owner defines the convention)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X coordinate of the origin
    pub x: f32,

    /// Y coordinate of the origin
    pub y: f32,

    /// Horizontal extent
    pub width: f32,

    /// Vertical extent
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space (UI nodes use z for layering offsets)
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a full transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Convert to a rotation-translation matrix, ignoring scale
    ///
    /// Canvas views are derived from this form so that a scaled canvas node
    /// does not distort the projection.
    pub fn to_rt_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position) * self.rotation.to_homogeneous()
    }
}

/// Math utility functions
pub mod utils {
    /// Clamp a value between min and max
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value < min { min } else if value > max { max } else { value }
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_identity_matrix() {
        let transform = Transform::identity();
        assert_eq!(transform.to_matrix(), Mat4::identity());
        assert_eq!(transform.to_rt_matrix(), Mat4::identity());
    }

    #[test]
    fn test_rt_matrix_ignores_scale() {
        let transform = Transform {
            position: Vec3::new(3.0, 4.0, 0.0),
            scale: Vec3::new(2.0, 2.0, 2.0),
            ..Default::default()
        };

        let rt = transform.to_rt_matrix();
        let point = rt.transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_eq!(point.x, 4.0);
        assert_eq!(point.y, 4.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(utils::clamp(1.5, 0.0, 1.0), 1.0);
        assert_eq!(utils::clamp(-0.5, 0.0, 1.0), 0.0);
        assert_eq!(utils::clamp(0.25, 0.0, 1.0), 0.25);
    }
}
