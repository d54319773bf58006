//! Sprite renderable component
//!
//! The UI element the batcher commits: a textured quad (or grid, or fan)
//! described by a render mode, a sprite frame, and a material. Property
//! setters clamp numeric input and mark the pooled render data dirty so
//! the assembler rebuilds geometry on the next frame.

use crate::assets::{AssetStore, MaterialKey, SpriteFrameKey};
use crate::foundation::color::Color;
use crate::foundation::math::{utils, Size, Vec2};
use crate::render::render_data::{RenderDataKey, RenderDataPool};
use crate::render::view::ViewId;

use super::assembler::AssemblerKind;

/// Sprite render mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteMode {
    /// Plain quad
    #[default]
    Simple,

    /// 9-patch: fixed corners and edges, stretched middle
    Sliced,

    /// Frame repeated to cover the content size
    Tiled,

    /// Partially shown according to fill type/start/range
    Filled,
}

/// Fill direction for `SpriteMode::Filled`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillType {
    /// Crop along the horizontal axis
    #[default]
    Horizontal,

    /// Crop along the vertical axis
    Vertical,

    /// Angular sweep around the fill center
    Radial,
}

/// How the sprite's size tracks its frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// Keep whatever size was set explicitly
    #[default]
    Custom,

    /// Track the trimmed frame rect
    Trimmed,

    /// Track the untrimmed original size
    Raw,
}

/// Blend factor for the sprite's material pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    /// Factor of zero
    Zero,

    /// Factor of one
    One,

    /// Source alpha
    SrcAlpha,

    /// One minus source alpha
    OneMinusSrcAlpha,
}

/// A renderable sprite element
pub struct SpriteRenderer {
    /// Whether this sprite is committed during the walk
    pub enabled: bool,

    /// Tint applied per vertex
    pub color: Color,

    /// Source blend factor
    pub src_blend: BlendFactor,

    /// Destination blend factor
    pub dst_blend: BlendFactor,

    mode: SpriteMode,
    fill_type: FillType,
    fill_center: Vec2,
    fill_start: f32,
    fill_range: f32,
    trim: bool,
    size_mode: SizeMode,
    size: Size,
    anchor: Vec2,

    material: Option<MaterialKey>,
    sprite_frame: Option<SpriteFrameKey>,

    render_data: Option<RenderDataKey>,
    bound_assembler: Option<AssemblerKind>,
    view_id: Option<ViewId>,
}

impl SpriteRenderer {
    /// Create a sprite using `material` and `frame`
    pub fn new(material: MaterialKey, frame: SpriteFrameKey) -> Self {
        Self {
            enabled: true,
            color: Color::WHITE,
            src_blend: BlendFactor::SrcAlpha,
            dst_blend: BlendFactor::OneMinusSrcAlpha,
            mode: SpriteMode::Simple,
            fill_type: FillType::Horizontal,
            fill_center: Vec2::zeros(),
            fill_start: 0.0,
            fill_range: 0.0,
            trim: true,
            size_mode: SizeMode::Custom,
            size: Size::new(100.0, 100.0),
            anchor: Vec2::new(0.5, 0.5),
            material: Some(material),
            sprite_frame: Some(frame),
            render_data: None,
            bound_assembler: None,
            view_id: None,
        }
    }

    /// Render mode
    pub fn mode(&self) -> SpriteMode {
        self.mode
    }

    /// Change the render mode, rebinding the assembler
    pub fn set_mode(&mut self, mode: SpriteMode, pool: &mut RenderDataPool) {
        if self.mode != mode {
            self.mode = mode;
            self.rebind_assembler(pool);
        }
    }

    /// Fill direction
    pub fn fill_type(&self) -> FillType {
        self.fill_type
    }

    /// Change the fill direction
    ///
    /// Switching between the bar and radial families swaps assemblers and
    /// releases the old geometry; switching within a family only re-marks.
    pub fn set_fill_type(&mut self, fill_type: FillType, pool: &mut RenderDataPool) {
        if self.fill_type != fill_type {
            self.fill_type = fill_type;
            self.rebind_assembler(pool);
            self.mark_for_update(pool);
        }
    }

    /// Fill start, in [-1, 1]
    pub fn fill_start(&self) -> f32 {
        self.fill_start
    }

    /// Set the fill start, clamped to [-1, 1]
    pub fn set_fill_start(&mut self, value: f32, pool: &mut RenderDataPool) {
        self.fill_start = utils::clamp(value, -1.0, 1.0);
        if self.mode == SpriteMode::Filled {
            self.mark_for_update(pool);
        }
    }

    /// Fill range, in [-1, 1]
    pub fn fill_range(&self) -> f32 {
        self.fill_range
    }

    /// Set the fill range, clamped to [-1, 1]
    ///
    /// Negative values flip the fill direction: the assembler normalizes
    /// them by moving the start back before clamping.
    pub fn set_fill_range(&mut self, value: f32, pool: &mut RenderDataPool) {
        self.fill_range = utils::clamp(value, -1.0, 1.0);
        if self.mode == SpriteMode::Filled {
            self.mark_for_update(pool);
        }
    }

    /// Fill center in normalized quad coordinates
    pub fn fill_center(&self) -> Vec2 {
        self.fill_center
    }

    /// Set the fill center
    pub fn set_fill_center(&mut self, center: Vec2, pool: &mut RenderDataPool) {
        self.fill_center = center;
        if self.mode == SpriteMode::Filled {
            self.mark_for_update(pool);
        }
    }

    /// Whether the trimmed rect is rendered without its cut margins
    pub fn trim(&self) -> bool {
        self.trim
    }

    /// Toggle trimmed rendering
    pub fn set_trim(&mut self, trim: bool, pool: &mut RenderDataPool) {
        if self.trim != trim {
            self.trim = trim;
            if self.mode == SpriteMode::Simple {
                self.mark_for_update(pool);
            }
        }
    }

    /// Size tracking mode
    pub fn size_mode(&self) -> SizeMode {
        self.size_mode
    }

    /// Change the size tracking mode, applying the tracked size at once
    pub fn set_size_mode(&mut self, mode: SizeMode, assets: &AssetStore, pool: &mut RenderDataPool) {
        self.size_mode = mode;
        self.apply_sprite_size(assets, pool);
    }

    /// Content size
    pub fn size(&self) -> Size {
        self.size
    }

    /// Set the content size
    pub fn set_size(&mut self, size: Size, pool: &mut RenderDataPool) {
        self.size = size;
        self.mark_for_update(pool);
    }

    /// Anchor point in normalized coordinates
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Set the anchor point
    pub fn set_anchor(&mut self, anchor: Vec2, pool: &mut RenderDataPool) {
        self.anchor = anchor;
        self.mark_for_update(pool);
    }

    /// Material handle
    pub fn material(&self) -> Option<MaterialKey> {
        self.material
    }

    /// Set the material; the next commit batches under it
    pub fn set_material(&mut self, material: Option<MaterialKey>, pool: &mut RenderDataPool) {
        self.material = material;
        if let Some(key) = self.render_data {
            if let Some(record) = pool.get_mut(key) {
                record.material = material;
            }
        }
        self.mark_for_update(pool);
    }

    /// Sprite frame handle
    pub fn sprite_frame(&self) -> Option<SpriteFrameKey> {
        self.sprite_frame
    }

    /// Swap the sprite frame and re-mark geometry
    pub fn set_sprite_frame(
        &mut self,
        frame: Option<SpriteFrameKey>,
        assets: &AssetStore,
        pool: &mut RenderDataPool,
    ) {
        if self.sprite_frame == frame {
            return;
        }
        self.sprite_frame = frame;
        self.mark_for_update(pool);
        self.apply_sprite_size(assets, pool);
    }

    /// Pooled render-data key, once an assembler allocated one
    pub fn render_data_key(&self) -> Option<RenderDataKey> {
        self.render_data
    }

    /// View the sprite was last rendered under
    pub fn view_id(&self) -> Option<ViewId> {
        self.view_id
    }

    pub(crate) fn set_view_id(&mut self, view_id: ViewId) {
        self.view_id = Some(view_id);
    }

    pub(crate) fn set_render_data_key(&mut self, key: Option<RenderDataKey>) {
        self.render_data = key;
    }

    /// The assembler for the current mode/fill combination
    pub fn assembler_kind(&self) -> AssemblerKind {
        match self.mode {
            SpriteMode::Simple => AssemblerKind::Simple,
            SpriteMode::Sliced => AssemblerKind::Sliced,
            SpriteMode::Tiled => AssemblerKind::Tiled,
            SpriteMode::Filled => match self.fill_type {
                FillType::Horizontal | FillType::Vertical => AssemblerKind::BarFilled,
                FillType::Radial => AssemblerKind::RadialFilled,
            },
        }
    }

    /// Bind the current assembler, allocating render data when missing
    ///
    /// Called by the system on every commit; a no-op once the right
    /// assembler holds live data.
    pub fn update_assembler(&mut self, pool: &mut RenderDataPool) {
        let kind = self.assembler_kind();
        if self.bound_assembler != Some(kind) {
            self.release_render_data(pool);
            self.bound_assembler = Some(kind);
        }

        if self.render_data.is_none() {
            kind.create_data(self, pool);
            if let Some(key) = self.render_data {
                if let Some(record) = pool.get_mut(key) {
                    record.material = self.material;
                }
            }
            self.mark_for_update(pool);
        }
    }

    /// Return the sprite's render data to the pool
    pub fn release_render_data(&mut self, pool: &mut RenderDataPool) {
        if let Some(key) = self.render_data.take() {
            pool.free(key);
        }
    }

    /// Raise both dirty flags on the sprite's render data
    pub fn mark_for_update(&self, pool: &mut RenderDataPool) {
        if let Some(key) = self.render_data {
            if let Some(record) = pool.get_mut(key) {
                record.uv_dirty = true;
                record.vert_dirty = true;
            }
        }
    }

    /// Whether the sprite can produce geometry this frame
    pub fn can_render(&self, assets: &AssetStore) -> bool {
        if !self.enabled || self.material.is_none() {
            return false;
        }
        self.sprite_frame.is_some_and(|frame| assets.frame_ready(frame))
    }

    fn apply_sprite_size(&mut self, assets: &AssetStore, pool: &mut RenderDataPool) {
        let Some(frame) = self.sprite_frame.and_then(|key| assets.frame(key)) else {
            return;
        };

        match self.size_mode {
            SizeMode::Custom => {}
            SizeMode::Trimmed => {
                self.size = Size::new(frame.rect.width, frame.rect.height);
                self.mark_for_update(pool);
            }
            SizeMode::Raw => {
                self.size = frame.original_size;
                self.mark_for_update(pool);
            }
        }
    }

    fn rebind_assembler(&mut self, pool: &mut RenderDataPool) {
        let kind = self.assembler_kind();
        if self.bound_assembler != Some(kind) {
            self.release_render_data(pool);
            self.bound_assembler = None;
        }
    }
}
