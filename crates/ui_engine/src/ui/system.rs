//! UI batching system
//!
//! The per-frame orchestrator. For every registered canvas it rewinds the
//! shared buffer, recomputes the view, walks the subtree depth-first in
//! sibling order, and commits each renderable it finds. Consecutive
//! renderables sharing a material and sprite frame accumulate into one
//! batch; any change of either closes the open batch as a draw call.
//! After the walk, a final flush and a single buffer upload finish the
//! canvas.
//!
//! All pools and the render-data context are owned here and passed down by
//! reference, so several independent systems can coexist in one process.

use crate::assets::{AssetStore, MaterialKey, SpriteFrameKey};
use crate::config::{ConfigError, UiSettings};
use crate::foundation::math::Size;
use crate::foundation::pool::RecyclePool;
use crate::render::device::{HeadlessBuffer, IndexBufferObject, VertexBufferObject};
use crate::render::draw_call::{DrawCall, InputAssembler};
use crate::render::mesh_buffer::MeshBuffer;
use crate::render::render_data::RenderDataPool;
use crate::render::scene::RenderScene;
use crate::render::view::ViewId;
use crate::scene::{NodeKey, SceneGraph};

use super::canvas::Canvas;

/// Per-frame UI batching orchestrator
pub struct UiSystem {
    settings: UiSettings,
    buffer: MeshBuffer,
    render_data: RenderDataPool,
    screens: Vec<Canvas>,

    ia_pool: RecyclePool<InputAssembler>,
    model_pool: RecyclePool<DrawCall>,

    curr_material: Option<MaterialKey>,
    curr_frame: Option<SpriteFrameKey>,
    curr_view: ViewId,
    dummy_node: NodeKey,
    user_key: u32,
}

impl UiSystem {
    /// Create a system writing into the given GPU buffer objects
    pub fn new(
        settings: UiSettings,
        vb: Box<dyn VertexBufferObject>,
        ib: Box<dyn IndexBufferObject>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        log::info!(
            "initializing UI system: {} vertices / {} indices preallocated",
            settings.initial_vertex_capacity,
            settings.initial_indice_capacity
        );

        let buffer = MeshBuffer::new(&settings, vb, ib);

        Ok(Self {
            settings,
            buffer,
            render_data: RenderDataPool::new(),
            screens: Vec::new(),
            ia_pool: RecyclePool::new(16),
            model_pool: RecyclePool::new(16),
            curr_material: None,
            curr_frame: None,
            curr_view: ViewId::default(),
            dummy_node: NodeKey::default(),
            user_key: 0,
        })
    }

    /// Create a system backed by in-memory buffers
    pub fn headless(settings: UiSettings) -> Result<Self, ConfigError> {
        Self::new(
            settings,
            Box::new(HeadlessBuffer::new()),
            Box::new(HeadlessBuffer::new()),
        )
    }

    /// The system's settings
    pub fn settings(&self) -> &UiSettings {
        &self.settings
    }

    /// Convenience: a canvas over `root` using this system's settings
    pub fn create_canvas(&self, root: NodeKey) -> Canvas {
        Canvas::new(root, &self.settings)
    }

    /// Register a canvas, registering its view with the render scene
    pub fn add_screen(&mut self, mut canvas: Canvas, render_scene: &mut RenderScene) -> ViewId {
        render_scene.add_view(canvas.view_mut());
        let id = canvas.view().id;
        log::debug!("canvas registered as view {:?}", id);
        self.screens.push(canvas);
        id
    }

    /// Unregister a canvas and its view
    pub fn remove_screen(&mut self, id: ViewId, render_scene: &mut RenderScene) {
        if let Some(index) = self.screens.iter().position(|canvas| canvas.view().id == id) {
            self.screens.remove(index);
            render_scene.remove_view(id);
        }
    }

    /// Look up a registered canvas by view id
    pub fn screen(&self, id: ViewId) -> Option<&Canvas> {
        self.screens.iter().find(|canvas| canvas.view().id == id)
    }

    /// Look up a registered canvas mutably
    pub fn screen_mut(&mut self, id: ViewId) -> Option<&mut Canvas> {
        self.screens.iter_mut().find(|canvas| canvas.view().id == id)
    }

    /// The render-data pool, for sprite property setters
    pub fn render_data_mut(&mut self) -> &mut RenderDataPool {
        &mut self.render_data
    }

    /// The render-data pool
    pub fn render_data(&self) -> &RenderDataPool {
        &self.render_data
    }

    /// The shared mesh buffer
    pub fn buffer(&self) -> &MeshBuffer {
        &self.buffer
    }

    /// An input assembler emitted this frame
    pub fn input_assembler(&self, index: usize) -> Option<&InputAssembler> {
        self.ia_pool.get(index)
    }

    /// Draw calls emitted this frame
    pub fn draw_call_count(&self) -> usize {
        self.model_pool.len()
    }

    /// Render one frame: recycle last frame's batches, then walk and batch
    /// every registered canvas
    pub fn update(
        &mut self,
        scene: &mut SceneGraph,
        assets: &AssetStore,
        render_scene: &mut RenderScene,
        screen_size: Size,
    ) {
        self.reset(render_scene);
        self.render_screens(scene, assets, render_scene, screen_size);
    }

    /// Detach a node's sprite and return its render data to the pool
    pub fn release_sprite(&mut self, scene: &mut SceneGraph, node: NodeKey) {
        if let Some(mut sprite) = scene.take_sprite(node) {
            sprite.release_render_data(&mut self.render_data);
        }
    }

    /// Recycle the previous frame's batches
    fn reset(&mut self, render_scene: &mut RenderScene) {
        for model in self.model_pool.iter() {
            render_scene.remove_model(model.sort_key);
        }
        self.model_pool.reset();
        self.ia_pool.reset();
    }

    fn render_screens(
        &mut self,
        scene: &mut SceneGraph,
        assets: &AssetStore,
        render_scene: &mut RenderScene,
        screen_size: Size,
    ) {
        for index in 0..self.screens.len() {
            let root = self.screens[index].root();
            if !scene.enabled_in_hierarchy(root) {
                continue;
            }

            self.buffer.reset();
            self.screens[index].update_view(scene, screen_size);
            self.curr_view = self.screens[index].view().id;
            log::debug!("walking canvas subtree for view {:?}", self.curr_view);

            self.walk(scene, assets, render_scene, root);

            self.flush(render_scene);
            self.buffer.upload();
        }
    }

    /// Depth-first pre-order traversal; disabled subtrees are skipped whole
    fn walk(
        &mut self,
        scene: &mut SceneGraph,
        assets: &AssetStore,
        render_scene: &mut RenderScene,
        node: NodeKey,
    ) {
        let children = scene.children(node).to_vec();
        for child in children {
            let enabled = scene.node(child).is_some_and(|n| n.enabled);
            if !enabled {
                continue;
            }

            if let Some(sprite) = scene.sprite_mut(child) {
                sprite.set_view_id(self.curr_view);
            }
            self.commit(scene, assets, render_scene, child);

            self.walk(scene, assets, render_scene, child);
        }
    }

    /// Batch one renderable, flushing first if its material or frame
    /// differs from the open batch's
    fn commit(
        &mut self,
        scene: &mut SceneGraph,
        assets: &AssetStore,
        render_scene: &mut RenderScene,
        node: NodeKey,
    ) {
        let Some(sprite) = scene.sprite(node) else {
            return;
        };
        // Unloaded texture or missing material: contribute nothing this
        // frame; the element picks itself up once the asset is ready.
        if !sprite.can_render(assets) {
            return;
        }

        let material = sprite.material();
        let frame = sprite.sprite_frame();
        if self.curr_material != material || self.curr_frame != frame {
            self.flush(render_scene);
            self.dummy_node = node;
            self.curr_material = material;
            self.curr_frame = frame;
        }

        let world = scene.world_matrix(node);
        if let Some(sprite) = scene.sprite_mut(node) {
            sprite.update_assembler(&mut self.render_data);
            let kind = sprite.assembler_kind();
            kind.update_render_data(sprite, &mut self.render_data, assets);
            kind.fill_buffers(sprite, &mut self.render_data, assets, &world, &mut self.buffer);
        }
    }

    /// Close the open batch as a draw call
    ///
    /// No-ops with no open material or no accumulated indices.
    fn flush(&mut self, render_scene: &mut RenderScene) {
        let Some(material) = self.curr_material else {
            return;
        };
        if self.buffer.pending_indices() == 0 {
            return;
        }

        let range = self.buffer.end_batch();

        let ia_index = self.ia_pool.add();
        if let Some(ia) = self.ia_pool.get_mut(ia_index) {
            *ia = InputAssembler {
                start: range.start,
                count: range.count,
            };
        }

        let draw_call = DrawCall {
            node: self.dummy_node,
            material: Some(material),
            input_assembler: ia_index,
            view_id: self.curr_view,
            sort_key: self.user_key,
        };
        self.user_key += 1;

        let model_index = self.model_pool.add();
        if let Some(model) = self.model_pool.get_mut(model_index) {
            *model = draw_call;
        }

        render_scene.add_model(draw_call);
        log::trace!(
            "flushed batch: {} indices starting at {}",
            range.count,
            range.start
        );
    }
}
