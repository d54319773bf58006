//! Tests for the full walk/commit/flush/upload pipeline

use approx::assert_relative_eq;

use crate::assets::{AssetStore, Material, MaterialKey, SpriteFrame, SpriteFrameKey, Texture, TextureKey};
use crate::config::UiSettings;
use crate::foundation::math::{Rect, Size, Vec2};
use crate::render::device::HeadlessBuffer;
use crate::render::scene::RenderScene;
use crate::render::view::ViewId;
use crate::scene::{NodeKey, SceneGraph};
use crate::ui::sprite::{FillType, SpriteMode, SpriteRenderer};
use crate::ui::system::UiSystem;

const SCREEN: Size = Size {
    width: 960.0,
    height: 640.0,
};

struct TestWorld {
    scene: SceneGraph,
    assets: AssetStore,
    render_scene: RenderScene,
    system: UiSystem,
    vb: HeadlessBuffer,
    root: NodeKey,
    view: ViewId,
    texture: TextureKey,
    material: MaterialKey,
    frame: SpriteFrameKey,
}

impl TestWorld {
    fn new() -> Self {
        let mut scene = SceneGraph::new();
        let mut assets = AssetStore::new();
        let mut render_scene = RenderScene::new();

        let vb = HeadlessBuffer::new();
        let ib = HeadlessBuffer::new();
        let mut system = UiSystem::new(
            UiSettings::default(),
            Box::new(vb.clone()),
            Box::new(ib.clone()),
        )
        .unwrap();

        let texture = assets.add_texture(Texture::new(100.0, 100.0));
        let frame = assets.add_frame(SpriteFrame::new(texture, Rect::new(0.0, 0.0, 100.0, 100.0)));
        let material = assets.add_material(Material::sprite(texture));

        let root = scene.create_node(None);
        let canvas = system.create_canvas(root);
        let view = system.add_screen(canvas, &mut render_scene);

        Self {
            scene,
            assets,
            render_scene,
            system,
            vb,
            root,
            view,
            texture,
            material,
            frame,
        }
    }

    fn add_sprite(&mut self, parent: NodeKey) -> NodeKey {
        let node = self.scene.create_node(Some(parent));
        self.scene
            .set_sprite(node, SpriteRenderer::new(self.material, self.frame));
        node
    }

    fn run_frame(&mut self) {
        self.system
            .update(&mut self.scene, &self.assets, &mut self.render_scene, SCREEN);
    }

    fn uploaded_floats(&self) -> Vec<f32> {
        self.vb
            .contents()
            .chunks_exact(4)
            .map(|bytes| f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            .collect()
    }
}

#[test]
fn test_shared_material_merges_into_one_draw_call() {
    let mut world = TestWorld::new();
    world.add_sprite(world.root);
    world.add_sprite(world.root);

    world.run_frame();

    let models = world.render_scene.models();
    assert_eq!(models.len(), 1);

    let ia = world.system.input_assembler(models[0].input_assembler).unwrap();
    assert_eq!(ia.start, 0);
    assert_eq!(ia.count, 12);
    assert_eq!(models[0].view_id, world.view);
}

#[test]
fn test_material_change_splits_into_contiguous_batches() {
    let mut world = TestWorld::new();
    world.add_sprite(world.root);
    world.add_sprite(world.root);

    let other_material = world.assets.add_material(Material::sprite(world.texture));
    let node = world.add_sprite(world.root);
    world
        .scene
        .sprite_mut(node)
        .unwrap()
        .set_material(Some(other_material), world.system.render_data_mut());

    world.run_frame();

    let models = world.render_scene.models();
    assert_eq!(models.len(), 2);

    let first = *world.system.input_assembler(models[0].input_assembler).unwrap();
    let second = *world.system.input_assembler(models[1].input_assembler).unwrap();
    assert_eq!((first.start, first.count), (0, 12));
    assert_eq!((second.start, second.count), (12, 6));

    // Traversal order is preserved in submission order.
    assert!(models[0].sort_key < models[1].sort_key);
}

#[test]
fn test_sprite_frame_change_also_splits() {
    let mut world = TestWorld::new();
    world.add_sprite(world.root);

    let other_frame = world
        .assets
        .add_frame(SpriteFrame::new(world.texture, Rect::new(0.0, 0.0, 50.0, 50.0)));
    let node = world.add_sprite(world.root);
    let assets = std::mem::take(&mut world.assets);
    world
        .scene
        .sprite_mut(node)
        .unwrap()
        .set_sprite_frame(Some(other_frame), &assets, world.system.render_data_mut());
    world.assets = assets;

    world.run_frame();

    assert_eq!(world.render_scene.models().len(), 2);
}

#[test]
fn test_disabled_subtree_is_skipped() {
    let mut world = TestWorld::new();
    world.add_sprite(world.root);
    let group = world.scene.create_node(Some(world.root));
    world.add_sprite(group);
    world.scene.node_mut(group).unwrap().enabled = false;

    world.run_frame();

    let models = world.render_scene.models();
    assert_eq!(models.len(), 1);
    let ia = world.system.input_assembler(models[0].input_assembler).unwrap();
    assert_eq!(ia.count, 6);
}

#[test]
fn test_unloaded_texture_self_heals() {
    let mut world = TestWorld::new();
    let pending = world.assets.add_texture(Texture::pending(32.0, 32.0));
    let frame = world
        .assets
        .add_frame(SpriteFrame::new(pending, Rect::new(0.0, 0.0, 32.0, 32.0)));
    let material = world.assets.add_material(Material::sprite(pending));

    let node = world.scene.create_node(Some(world.root));
    world.scene.set_sprite(node, SpriteRenderer::new(material, frame));

    world.run_frame();
    assert_eq!(world.render_scene.models().len(), 0);

    world.assets.texture_mut(pending).unwrap().mark_loaded();
    world.run_frame();
    assert_eq!(world.render_scene.models().len(), 1);
}

#[test]
fn test_draw_calls_are_recycled_across_frames() {
    let mut world = TestWorld::new();
    world.add_sprite(world.root);

    world.run_frame();
    let first_key = world.render_scene.models()[0].sort_key;

    world.run_frame();
    let models = world.render_scene.models();
    assert_eq!(models.len(), 1);
    assert!(models[0].sort_key > first_key);
    assert_eq!(world.system.draw_call_count(), 1);
}

#[test]
fn test_view_id_stamped_on_committed_sprites() {
    let mut world = TestWorld::new();
    let node = world.add_sprite(world.root);

    world.run_frame();

    assert_eq!(world.scene.sprite(node).unwrap().view_id(), Some(world.view));
}

#[test]
fn test_upload_happens_once_per_canvas_per_frame() {
    let mut world = TestWorld::new();
    world.add_sprite(world.root);
    world.add_sprite(world.root);

    world.run_frame();
    assert_eq!(world.vb.update_count(), 1);

    world.run_frame();
    assert_eq!(world.vb.update_count(), 2);
}

#[test]
fn test_two_systems_coexist_independently() {
    let mut world = TestWorld::new();
    world.add_sprite(world.root);

    let mut other_system = UiSystem::headless(UiSettings::default()).unwrap();
    let mut other_render_scene = RenderScene::new();
    let other_root = world.scene.create_node(None);
    let canvas = other_system.create_canvas(other_root);
    other_system.add_screen(canvas, &mut other_render_scene);

    let node = world.scene.create_node(Some(other_root));
    world
        .scene
        .set_sprite(node, SpriteRenderer::new(world.material, world.frame));

    world.run_frame();
    other_system.update(&mut world.scene, &world.assets, &mut other_render_scene, SCREEN);

    assert_eq!(world.render_scene.models().len(), 1);
    assert_eq!(other_render_scene.models().len(), 1);
}

#[test]
fn test_release_sprite_returns_render_data() {
    let mut world = TestWorld::new();
    let node = world.add_sprite(world.root);

    world.run_frame();
    assert_eq!(world.system.render_data().live_count(), 1);

    world.system.release_sprite(&mut world.scene, node);
    assert_eq!(world.system.render_data().live_count(), 0);
    world.scene.remove_node(node);

    world.run_frame();
    assert_eq!(world.render_scene.models().len(), 0);
}

#[test]
fn test_simple_geometry_matches_anchor_adjusted_quad() {
    let mut world = TestWorld::new();
    let node = world.add_sprite(world.root);
    world
        .scene
        .sprite_mut(node)
        .unwrap()
        .set_trim(false, world.system.render_data_mut());

    world.run_frame();

    let key = world.scene.sprite(node).unwrap().render_data_key().unwrap();
    let record = world.system.render_data().get(key).unwrap();

    // Size (100,100) at anchor (0.5,0.5): corners at +/-50.
    assert_relative_eq!(record.data[0].pos.x, -50.0);
    assert_relative_eq!(record.data[0].pos.y, -50.0);
    assert_relative_eq!(record.data[3].pos.x, 50.0);
    assert_relative_eq!(record.data[3].pos.y, 50.0);
    assert!(!record.vert_dirty);
}

#[test]
fn test_update_render_data_is_idempotent() {
    let mut world = TestWorld::new();
    let node = world.add_sprite(world.root);

    world.run_frame();
    let key = world.scene.sprite(node).unwrap().render_data_key().unwrap();
    let snapshot = world.system.render_data().get(key).unwrap().data.clone();

    world.run_frame();
    let record = world.system.render_data().get(key).unwrap();
    assert_eq!(record.data, snapshot);
    assert!(!record.uv_dirty);
    assert!(!record.vert_dirty);
}

#[test]
fn test_bar_filled_crops_vertex_span() {
    let mut world = TestWorld::new();
    let node = world.add_sprite(world.root);
    {
        let pool = world.system.render_data_mut();
        let sprite = world.scene.sprite_mut(node).unwrap();
        sprite.set_mode(SpriteMode::Filled, pool);
        sprite.set_fill_type(FillType::Horizontal, pool);
        sprite.set_size(Size::new(200.0, 100.0), pool);
        sprite.set_anchor(Vec2::new(0.0, 0.0), pool);
        sprite.set_fill_start(0.3, pool);
        sprite.set_fill_range(0.5, pool);
    }

    world.run_frame();

    let key = world.scene.sprite(node).unwrap().render_data_key().unwrap();
    let record = world.system.render_data().get(key).unwrap();

    // Local slots 4-7: span cropped to [60, 160] of the 200-wide quad.
    assert_relative_eq!(record.data[4].pos.x, 60.0);
    assert_relative_eq!(record.data[5].pos.x, 160.0);
    assert_relative_eq!(record.data[6].pos.y, 100.0);
}

#[test]
fn test_sliced_insets_never_invert() {
    let mut world = TestWorld::new();
    let frame = world.assets.add_frame(
        SpriteFrame::new(world.texture, Rect::new(0.0, 0.0, 100.0, 100.0))
            .with_insets(30.0, 30.0, 30.0, 30.0),
    );
    let node = world.add_sprite(world.root);
    {
        let assets = std::mem::take(&mut world.assets);
        let pool = world.system.render_data_mut();
        let sprite = world.scene.sprite_mut(node).unwrap();
        sprite.set_sprite_frame(Some(frame), &assets, pool);
        sprite.set_mode(SpriteMode::Sliced, pool);
        sprite.set_size(Size::new(40.0, 100.0), pool);
        sprite.set_anchor(Vec2::new(0.0, 0.0), pool);
        world.assets = assets;
    }

    world.run_frame();

    let key = world.scene.sprite(node).unwrap().render_data_key().unwrap();
    let record = world.system.render_data().get(key).unwrap();

    // Width 40 against 60 of combined insets: the middle column collapses
    // instead of inverting.
    assert_relative_eq!(record.data[1].pos.x, record.data[2].pos.x);
    assert!(record.data[2].pos.x <= record.data[3].pos.x);

    // Height 100 against 60: insets keep their thickness (scale clamps
    // at 1), middle row stretches.
    assert_relative_eq!(record.data[1].pos.y, 30.0);
    assert_relative_eq!(record.data[2].pos.y, 70.0);
}

#[test]
fn test_tiled_repeats_and_clips_last_column() {
    let mut world = TestWorld::new();
    let node = world.add_sprite(world.root);
    {
        let pool = world.system.render_data_mut();
        let sprite = world.scene.sprite_mut(node).unwrap();
        sprite.set_mode(SpriteMode::Tiled, pool);
        sprite.set_size(Size::new(250.0, 100.0), pool);
        sprite.set_anchor(Vec2::new(0.0, 0.0), pool);
    }

    world.run_frame();

    let key = world.scene.sprite(node).unwrap().render_data_key().unwrap();
    {
        let record = world.system.render_data().get(key).unwrap();

        // ceil(250/100) = 3 columns, ceil(100/100) = 1 row.
        assert_eq!(record.vertex_count, 12);
        assert_eq!(record.indice_count, 18);

        // Cut positions clamp at the content edge.
        assert_relative_eq!(record.data[2].pos.x, 200.0);
        assert_relative_eq!(record.data[3].pos.x, 250.0);
    }

    // The last column's right-edge U is clipped by min(1, 2.5 - 2) = 0.5.
    // Frame covers the whole texture, so U runs 0..1 across a tile.
    let floats = world.uploaded_floats();
    let last_tile_rb_u = floats[2 * 24 + 6 + 3];
    assert_relative_eq!(last_tile_rb_u, 0.5);
}

#[test]
fn test_packed_color_lands_in_vertex_stream() {
    let mut world = TestWorld::new();
    let node = world.add_sprite(world.root);
    world.scene.sprite_mut(node).unwrap().color =
        crate::foundation::color::Color::new(0x11, 0x22, 0x33, 0x44);

    world.run_frame();

    let bytes = world.vb.contents();
    // Color word of the first vertex sits after pos (12) + uv (8) bytes.
    let word = u32::from_le_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    assert_eq!(word, 0x4433_2211);
}
