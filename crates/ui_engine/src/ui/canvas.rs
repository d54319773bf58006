//! Canvas: the root of one independently rendered UI subtree
//!
//! A canvas owns the render view for its subtree and adapts a design
//! resolution to the actual screen through a fit policy. Many canvases may
//! coexist; the batcher renders each one with a fresh buffer pass.

use crate::config::UiSettings;
use crate::foundation::math::{Mat4, Rect, Size, Vec3};
use crate::render::view::View;
use crate::scene::{NodeKey, SceneGraph};

/// How the design resolution maps onto the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPolicy {
    /// Both design dimensions fit inside the screen (letterboxed)
    ShowAll,

    /// The screen is fully covered, clipping one design dimension
    NoBorder,

    /// Design width is stretched to the screen width
    FixedWidth,

    /// Design height is stretched to the screen height
    FixedHeight,
}

/// UI root with its own view and screen adaptation
pub struct Canvas {
    root: NodeKey,
    design_resolution: Size,
    fit_width: bool,
    fit_height: bool,
    priority: i32,
    view: View,
}

impl Canvas {
    /// Create a canvas over `root` with the configured design resolution
    ///
    /// Defaults to fitting the design height, the common choice for
    /// landscape UIs.
    pub fn new(root: NodeKey, settings: &UiSettings) -> Self {
        Self {
            root,
            design_resolution: settings.design_resolution,
            fit_width: false,
            fit_height: true,
            priority: 0,
            view: View::new(),
        }
    }

    /// Root node of the canvas subtree
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// The canvas's render view
    pub fn view(&self) -> &View {
        &self.view
    }

    /// The canvas's render view, mutably (for scene registration)
    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// Display priority among canvases
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Set the display priority
    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
        self.view.priority = priority;
    }

    /// Design resolution
    pub fn design_resolution(&self) -> Size {
        self.design_resolution
    }

    /// Set the design resolution
    pub fn set_design_resolution(&mut self, resolution: Size) {
        self.design_resolution = resolution;
    }

    /// Whether the design width is stretched to the screen
    pub fn set_fit_width(&mut self, fit: bool) {
        self.fit_width = fit;
    }

    /// Whether the design height is stretched to the screen
    pub fn set_fit_height(&mut self, fit: bool) {
        self.fit_height = fit;
    }

    /// Resolution policy implied by the fit flags
    pub fn resolution_policy(&self) -> ResolutionPolicy {
        match (self.fit_width, self.fit_height) {
            (true, true) => ResolutionPolicy::ShowAll,
            (false, false) => ResolutionPolicy::NoBorder,
            (true, false) => ResolutionPolicy::FixedWidth,
            (false, true) => ResolutionPolicy::FixedHeight,
        }
    }

    /// Screen-to-design scale factors for the current policy
    pub fn scale_factors(&self, screen: Size) -> (f32, f32) {
        let scale_x = screen.width / self.design_resolution.width;
        let scale_y = screen.height / self.design_resolution.height;

        match self.resolution_policy() {
            ResolutionPolicy::ShowAll => {
                let scale = scale_x.min(scale_y);
                (scale, scale)
            }
            ResolutionPolicy::NoBorder => {
                let scale = scale_x.max(scale_y);
                (scale, scale)
            }
            ResolutionPolicy::FixedWidth => (scale_x, scale_x),
            ResolutionPolicy::FixedHeight => (scale_y, scale_y),
        }
    }

    /// Screen extent expressed in design units
    pub fn visible_size(&self, screen: Size) -> Size {
        let (scale_x, scale_y) = self.scale_factors(screen);
        Size::new(screen.width / scale_x, screen.height / scale_y)
    }

    /// Recenter the root node on the visible area
    ///
    /// Under `NoBorder` the canvas is offset so the clipped design area
    /// stays centered on screen.
    pub fn align_with_screen(&self, scene: &mut SceneGraph, screen: Size) {
        let visible = self.visible_size(screen);

        let (offset_x, offset_y) = if self.resolution_policy() == ResolutionPolicy::NoBorder {
            (
                (self.design_resolution.width - visible.width) * 0.5,
                (self.design_resolution.height - visible.height) * 0.5,
            )
        } else {
            (0.0, 0.0)
        };

        scene.set_position(
            self.root,
            Vec3::new(
                visible.width * 0.5 + offset_x,
                visible.height * 0.5 + offset_y,
                1.0,
            ),
        );
    }

    /// Rebuild the view matrices for this frame
    ///
    /// The view matrix is the inverse rotation-translation of the canvas
    /// node; the projection is orthographic, derived from the visible half
    /// height and the screen aspect ratio.
    pub fn update_view(&mut self, scene: &SceneGraph, screen: Size) {
        let world_rt = scene.world_rt(self.root);
        let mat_view = world_rt.try_inverse().unwrap_or_else(Mat4::identity);

        let (_, scale_y) = self.scale_factors(screen);
        let aspect = screen.width / screen.height;
        let ortho_height = screen.height / scale_y / 2.0;
        let x = ortho_height * aspect;
        let y = ortho_height;
        let mat_proj = Mat4::new_orthographic(-x, x, -y, y, 0.0, 4096.0);

        self.view.update_matrices(mat_view, mat_proj);
        self.view.rect = Rect::new(0.0, 0.0, screen.width, screen.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn canvas_with_scene() -> (SceneGraph, Canvas) {
        let mut scene = SceneGraph::new();
        let root = scene.create_node(None);
        let canvas = Canvas::new(root, &UiSettings::default());
        (scene, canvas)
    }

    #[test]
    fn test_resolution_policy_from_fit_flags() {
        let (_, mut canvas) = canvas_with_scene();
        assert_eq!(canvas.resolution_policy(), ResolutionPolicy::FixedHeight);

        canvas.set_fit_width(true);
        assert_eq!(canvas.resolution_policy(), ResolutionPolicy::ShowAll);

        canvas.set_fit_height(false);
        assert_eq!(canvas.resolution_policy(), ResolutionPolicy::FixedWidth);

        canvas.set_fit_width(false);
        assert_eq!(canvas.resolution_policy(), ResolutionPolicy::NoBorder);
    }

    #[test]
    fn test_fixed_height_scale_tracks_screen_height() {
        let (_, canvas) = canvas_with_scene();

        // Design 960x640 on a 1920x1280 screen: scale 2 on both axes.
        let (sx, sy) = canvas.scale_factors(Size::new(1920.0, 1280.0));
        assert_relative_eq!(sx, 2.0);
        assert_relative_eq!(sy, 2.0);

        // Wider screen: height still dictates the scale.
        let (sx, sy) = canvas.scale_factors(Size::new(2560.0, 1280.0));
        assert_relative_eq!(sx, 2.0);
        assert_relative_eq!(sy, 2.0);
    }

    #[test]
    fn test_align_with_screen_centers_root() {
        let (mut scene, canvas) = canvas_with_scene();
        let screen = Size::new(1920.0, 1280.0);

        canvas.align_with_screen(&mut scene, screen);

        let position = scene.node(canvas.root()).unwrap().transform.position;
        assert_relative_eq!(position.x, 480.0);
        assert_relative_eq!(position.y, 320.0);
    }

    #[test]
    fn test_update_view_projects_center_to_origin() {
        let (mut scene, mut canvas) = canvas_with_scene();
        let screen = Size::new(1280.0, 640.0);

        canvas.align_with_screen(&mut scene, screen);
        canvas.update_view(&scene, screen);

        // The canvas center, in canvas-local coordinates, lands at NDC
        // origin after view-projection.
        let center_world = scene.world_matrix(canvas.root()).transform_point(&Point3::origin());
        let clip = canvas.view().mat_view_proj.transform_point(&center_world);
        assert_relative_eq!(clip.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y, 0.0, epsilon = 1e-5);
    }
}
