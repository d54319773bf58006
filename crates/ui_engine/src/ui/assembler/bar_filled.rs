//! Bar-filled sprite assembler
//!
//! One quad cropped along the horizontal or vertical axis by the
//! normalized fill span. Both the vertex span and the UVs interpolate
//! between the frame's raw corner values, so atlas rotation needs no
//! special casing. Slots 0-3 cache world vertices, slots 4-7 local ones.

use crate::assets::AssetStore;
use crate::foundation::math::{utils, Mat4, Point3};
use crate::render::mesh_buffer::{MeshBuffer, VERTEX_FLOATS};
use crate::render::render_data::{RenderData, RenderDataPool};
use crate::ui::sprite::{FillType, SpriteRenderer};

use super::{normalize_fill, write_quad_indices, write_vertex};

/// Allocate an 8-slot record: 4 vertices, 6 indices
pub fn create_data(sprite: &mut SpriteRenderer, pool: &mut RenderDataPool) {
    let key = pool.alloc();
    if let Some(record) = pool.get_mut(key) {
        // 0-3 world verts, 4-7 local verts.
        record.set_data_length(8);
        record.vertex_count = 4;
        record.indice_count = 6;
    }
    sprite.set_render_data_key(Some(key));
}

/// Recompute cropped UVs and vertices where dirty
pub fn update_render_data(sprite: &SpriteRenderer, pool: &mut RenderDataPool, assets: &AssetStore) {
    let Some(frame) = sprite.sprite_frame().and_then(|key| assets.frame(key)) else {
        return;
    };
    let uv = frame.uv;

    let Some(record) = sprite.render_data_key().and_then(|key| pool.get_mut(key)) else {
        return;
    };

    let (fill_start, fill_end) = normalize_fill(sprite.fill_start(), sprite.fill_range());

    if record.uv_dirty {
        update_uvs(record, &uv, sprite.fill_type(), fill_start, fill_end);
    }
    if record.vert_dirty {
        update_verts(record, sprite, fill_start, fill_end);
    }
}

fn update_uvs(record: &mut RenderData, uv: &[f32; 8], fill_type: FillType, start: f32, end: f32) {
    match fill_type {
        FillType::Horizontal => {
            record.data[0].uv.x = utils::lerp(uv[0], uv[2], start);
            record.data[0].uv.y = uv[1];
            record.data[1].uv.x = utils::lerp(uv[0], uv[2], end);
            record.data[1].uv.y = uv[3];
            record.data[2].uv.x = utils::lerp(uv[4], uv[6], start);
            record.data[2].uv.y = uv[5];
            record.data[3].uv.x = utils::lerp(uv[4], uv[6], end);
            record.data[3].uv.y = uv[7];
        }
        FillType::Vertical => {
            record.data[0].uv.x = uv[0];
            record.data[0].uv.y = utils::lerp(uv[1], uv[5], start);
            record.data[1].uv.x = uv[2];
            record.data[1].uv.y = utils::lerp(uv[3], uv[7], start);
            record.data[2].uv.x = uv[4];
            record.data[2].uv.y = utils::lerp(uv[1], uv[5], end);
            record.data[3].uv.x = uv[6];
            record.data[3].uv.y = utils::lerp(uv[3], uv[7], end);
        }
        // Radial fills dispatch to their own assembler.
        FillType::Radial => {}
    }

    record.uv_dirty = false;
}

fn update_verts(record: &mut RenderData, sprite: &SpriteRenderer, start: f32, end: f32) {
    let width = sprite.size().width;
    let height = sprite.size().height;
    let appx = sprite.anchor().x * width;
    let appy = sprite.anchor().y * height;

    let mut l = -appx;
    let mut b = -appy;
    let mut r = width - appx;
    let mut t = height - appy;

    match sprite.fill_type() {
        FillType::Horizontal => {
            let progress_start = utils::lerp(l, r, start);
            let progress_end = utils::lerp(l, r, end);
            l = progress_start;
            r = progress_end;
        }
        FillType::Vertical => {
            let progress_start = utils::lerp(b, t, start);
            let progress_end = utils::lerp(b, t, end);
            b = progress_start;
            t = progress_end;
        }
        FillType::Radial => {}
    }

    record.data[4].pos.x = l;
    record.data[4].pos.y = b;
    record.data[5].pos.x = r;
    record.data[5].pos.y = b;
    record.data[6].pos.x = l;
    record.data[6].pos.y = t;
    record.data[7].pos.x = r;
    record.data[7].pos.y = t;

    record.vert_dirty = false;
}

/// Refresh slots 0-3 with the world transforms of the local slots 4-7
pub fn update_world_verts(sprite: &SpriteRenderer, pool: &mut RenderDataPool, world: &Mat4) {
    let Some(record) = sprite.render_data_key().and_then(|key| pool.get_mut(key)) else {
        return;
    };

    for i in 0..4 {
        let local = record.data[i + 4].pos;
        let vertex = world.transform_point(&Point3::new(local.x, local.y, local.z));
        record.data[i].pos = vertex.coords;
    }
}

/// Append the cropped quad to the shared buffer
pub fn fill_buffers(
    sprite: &SpriteRenderer,
    pool: &mut RenderDataPool,
    world: &Mat4,
    buffer: &mut MeshBuffer,
) {
    update_world_verts(sprite, pool, world);

    let Some(record) = sprite.render_data_key().and_then(|key| pool.get(key)) else {
        return;
    };

    let color = sprite.color.packed();

    let mut float_offset = buffer.float_cursor();
    let indice_offset = buffer.indice_cursor();
    let vertex_id = buffer.vertex_cursor();

    if !buffer.request(4, 6) {
        return;
    }

    let (vbuf, ibuf) = buffer.arrays_mut();
    for i in 0..4 {
        let vert = &record.data[i];
        write_vertex(
            vbuf,
            float_offset,
            vert.pos.x,
            vert.pos.y,
            vert.pos.z,
            vert.uv.x,
            vert.uv.y,
            color,
        );
        float_offset += VERTEX_FLOATS;
    }

    write_quad_indices(ibuf, indice_offset, vertex_id);
}
