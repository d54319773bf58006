//! Render view: per-canvas camera state
//!
//! Each canvas owns one view holding the matrices and viewport the GPU
//! side consumes. Views are registered with the render scene once per
//! canvas lifetime, not per frame.

use bitflags::bitflags;

use crate::foundation::math::{Mat4, Rect};

bitflags! {
    /// Framebuffer attachments a view clears before drawing
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        /// Clear the color attachment
        const COLOR = 1;
        /// Clear the depth attachment
        const DEPTH = 2;
        /// Clear the stencil attachment
        const STENCIL = 4;
    }
}

/// Identifier tying renderables and draw calls to their canvas's view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ViewId(pub u32);

/// Camera matrices and viewport for one canvas
#[derive(Debug, Clone)]
pub struct View {
    /// Identifier assigned by the render scene at registration
    pub id: ViewId,

    /// View matrix (inverse canvas-node RT)
    pub mat_view: Mat4,

    /// Orthographic projection
    pub mat_proj: Mat4,

    /// Combined view-projection
    pub mat_view_proj: Mat4,

    /// Inverse view-projection, for unprojection by consumers
    pub mat_inv_view_proj: Mat4,

    /// Viewport rect in pixels
    pub rect: Rect,

    /// Draw priority among views
    pub priority: i32,

    /// Attachments cleared before this view draws
    pub clear_flags: ClearFlags,
}

impl Default for View {
    fn default() -> Self {
        Self {
            id: ViewId::default(),
            mat_view: Mat4::identity(),
            mat_proj: Mat4::identity(),
            mat_view_proj: Mat4::identity(),
            mat_inv_view_proj: Mat4::identity(),
            rect: Rect::default(),
            priority: 0,
            clear_flags: ClearFlags::DEPTH | ClearFlags::STENCIL,
        }
    }
}

impl View {
    /// Create a view with UI defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Install new view and projection matrices, refreshing the derived
    /// combined and inverse matrices
    pub fn update_matrices(&mut self, view: Mat4, proj: Mat4) {
        self.mat_view = view;
        self.mat_proj = proj;
        self.mat_view_proj = proj * view;
        self.mat_inv_view_proj = self
            .mat_view_proj
            .try_inverse()
            .unwrap_or_else(Mat4::identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_update_matrices_derives_combined_and_inverse() {
        let mut view = View::new();
        let proj = Mat4::new_orthographic(-2.0, 2.0, -1.0, 1.0, 0.0, 10.0);
        let eye = Mat4::new_translation(&crate::foundation::math::Vec3::new(-3.0, 0.0, 0.0));

        view.update_matrices(eye, proj);

        assert_eq!(view.mat_view_proj, proj * eye);
        let round_trip = view.mat_view_proj * view.mat_inv_view_proj;
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(round_trip[(i, j)], expected, epsilon = 1e-5);
            }
        }
    }
}
