//! Sliced (9-patch) sprite assembler
//!
//! A 4x4 vertex grid forming 9 quads: corners keep the inset thickness,
//! edges stretch along one axis, the middle stretches along both. Slots
//! 0-3 cache the local corner grid, slots 4-19 the world-transformed
//! 16-vertex lattice.

use crate::assets::AssetStore;
use crate::foundation::math::{Mat4, Point3};
use crate::render::mesh_buffer::{MeshBuffer, VERTEX_FLOATS};
use crate::render::render_data::RenderDataPool;
use crate::ui::sprite::SpriteRenderer;

use super::write_vertex;

/// Allocate a 20-slot record: 16 vertices, 54 indices
pub fn create_data(sprite: &mut SpriteRenderer, pool: &mut RenderDataPool) {
    let key = pool.alloc();
    if let Some(record) = pool.get_mut(key) {
        // 0-3 local corner grid, 4-19 world lattice.
        record.set_data_length(20);
        record.vertex_count = 16;
        record.indice_count = 54;
    }
    sprite.set_render_data_key(Some(key));
}

/// Recompute the local corner grid when vertices are dirty
pub fn update_render_data(sprite: &SpriteRenderer, pool: &mut RenderDataPool, assets: &AssetStore) {
    let Some(frame) = sprite.sprite_frame().and_then(|key| assets.frame(key)) else {
        return;
    };
    let Some(record) = sprite.render_data_key().and_then(|key| pool.get_mut(key)) else {
        return;
    };

    if !record.vert_dirty {
        return;
    }

    let width = sprite.size().width;
    let height = sprite.size().height;
    let appx = sprite.anchor().x * width;
    let appy = sprite.anchor().y * height;

    let left_width = frame.inset_left;
    let right_width = frame.inset_right;
    let top_height = frame.inset_top;
    let bottom_height = frame.inset_bottom;

    // When the content is smaller than the combined insets, scale the
    // insets down instead of letting the grid invert.
    let mut x_scale = width / (left_width + right_width);
    let mut y_scale = height / (top_height + bottom_height);
    x_scale = if !x_scale.is_finite() || x_scale > 1.0 { 1.0 } else { x_scale };
    y_scale = if !y_scale.is_finite() || y_scale > 1.0 { 1.0 } else { y_scale };

    let sizable_width = (width - left_width - right_width).max(0.0);
    let sizable_height = (height - top_height - bottom_height).max(0.0);

    record.data[0].pos.x = -appx;
    record.data[0].pos.y = -appy;
    record.data[1].pos.x = left_width * x_scale - appx;
    record.data[1].pos.y = bottom_height * y_scale - appy;
    record.data[2].pos.x = record.data[1].pos.x + sizable_width;
    record.data[2].pos.y = record.data[1].pos.y + sizable_height;
    record.data[3].pos.x = width - appx;
    record.data[3].pos.y = height - appy;

    record.vert_dirty = false;
}

/// Refresh the world lattice in slots 4-19 from the local grid
pub fn update_world_verts(sprite: &SpriteRenderer, pool: &mut RenderDataPool, world: &Mat4) {
    let Some(record) = sprite.render_data_key().and_then(|key| pool.get_mut(key)) else {
        return;
    };

    for row in 0..4 {
        let y = record.data[row].pos.y;
        for col in 0..4 {
            let x = record.data[col].pos.x;
            let vertex = world.transform_point(&Point3::new(x, y, 0.0));
            record.data[4 + row * 4 + col].pos = vertex.coords;
        }
    }
}

/// Append the 9 world-space quads to the shared buffer
pub fn fill_buffers(
    sprite: &SpriteRenderer,
    pool: &mut RenderDataPool,
    assets: &AssetStore,
    world: &Mat4,
    buffer: &mut MeshBuffer,
) {
    let Some(frame) = sprite.sprite_frame().and_then(|key| assets.frame(key)) else {
        return;
    };

    update_world_verts(sprite, pool, world);

    let Some(record) = sprite.render_data_key().and_then(|key| pool.get(key)) else {
        return;
    };

    let color = sprite.color.packed();

    let mut float_offset = buffer.float_cursor();
    let mut indice_offset = buffer.indice_cursor();
    let vertex_id = buffer.vertex_cursor();

    if !buffer.request(record.vertex_count, record.indice_count) {
        return;
    }

    let (vbuf, ibuf) = buffer.arrays_mut();
    for i in 0..16 {
        let pos = record.data[4 + i].pos;
        let uv = frame.uv_sliced[i];
        write_vertex(vbuf, float_offset, pos.x, pos.y, pos.z, uv.u, uv.v, color);
        float_offset += VERTEX_FLOATS;
    }

    for row in 0..3 {
        for col in 0..3 {
            let start = (vertex_id + row * 4 + col) as u16;
            ibuf[indice_offset] = start;
            ibuf[indice_offset + 1] = start + 1;
            ibuf[indice_offset + 2] = start + 4;
            ibuf[indice_offset + 3] = start + 1;
            ibuf[indice_offset + 4] = start + 5;
            ibuf[indice_offset + 5] = start + 4;
            indice_offset += 6;
        }
    }
}
