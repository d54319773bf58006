//! Render scene registry
//!
//! The sink the batcher submits into: draw-call models registered per
//! flush and views registered per canvas. The UI core only ever adds and
//! removes entries; it never queries them back.

use super::draw_call::DrawCall;
use super::view::{View, ViewId};

/// Registry of live draw calls and views
#[derive(Default)]
pub struct RenderScene {
    models: Vec<DrawCall>,
    views: Vec<ViewId>,
    next_view_id: u32,
}

impl RenderScene {
    /// Create an empty render scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view, assigning its identifier
    pub fn add_view(&mut self, view: &mut View) {
        view.id = ViewId(self.next_view_id);
        self.next_view_id += 1;
        self.views.push(view.id);
    }

    /// Unregister a view
    pub fn remove_view(&mut self, id: ViewId) {
        self.views.retain(|view| *view != id);
    }

    /// Register a draw-call model for this frame
    pub fn add_model(&mut self, model: DrawCall) {
        self.models.push(model);
    }

    /// Unregister a draw-call model by its sort key
    pub fn remove_model(&mut self, sort_key: u32) {
        self.models.retain(|model| model.sort_key != sort_key);
    }

    /// Currently registered draw calls, in submission order
    pub fn models(&self) -> &[DrawCall] {
        &self.models
    }

    /// Currently registered views
    pub fn views(&self) -> &[ViewId] {
        &self.views
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_view_assigns_unique_ids() {
        let mut scene = RenderScene::new();
        let mut a = View::new();
        let mut b = View::new();

        scene.add_view(&mut a);
        scene.add_view(&mut b);

        assert_ne!(a.id, b.id);
        assert_eq!(scene.views(), &[a.id, b.id]);
    }

    #[test]
    fn test_remove_model_by_sort_key() {
        let mut scene = RenderScene::new();
        scene.add_model(DrawCall { sort_key: 1, ..Default::default() });
        scene.add_model(DrawCall { sort_key: 2, ..Default::default() });

        scene.remove_model(1);

        assert_eq!(scene.models().len(), 1);
        assert_eq!(scene.models()[0].sort_key, 2);
    }
}
