//! Simple sprite assembler: one anchor-adjusted quad
//!
//! Local geometry is two cached corners (bottom-left and top-right); UVs
//! come straight from the frame's precomputed corner table, which already
//! accounts for trimming and atlas rotation.

use crate::assets::AssetStore;
use crate::foundation::math::{Mat4, Point3};
use crate::render::mesh_buffer::MeshBuffer;
use crate::render::render_data::RenderDataPool;
use crate::ui::sprite::SpriteRenderer;

use super::{write_quad_indices, write_vertex};

/// Allocate a 4-slot record: 4 vertices, 6 indices
pub fn create_data(sprite: &mut SpriteRenderer, pool: &mut RenderDataPool) {
    let key = pool.alloc();
    if let Some(record) = pool.get_mut(key) {
        record.set_data_length(4);
        record.vertex_count = 4;
        record.indice_count = 6;
    }
    sprite.set_render_data_key(Some(key));
}

/// Recompute the local corners when vertices are dirty
pub fn update_render_data(sprite: &SpriteRenderer, pool: &mut RenderDataPool, assets: &AssetStore) {
    let Some(frame) = sprite.sprite_frame().and_then(|key| assets.frame(key)) else {
        return;
    };
    let Some(record) = sprite.render_data_key().and_then(|key| pool.get_mut(key)) else {
        return;
    };

    if record.vert_dirty {
        let cw = sprite.size().width;
        let ch = sprite.size().height;
        let appx = sprite.anchor().x * cw;
        let appy = sprite.anchor().y * ch;

        let (l, b, r, t) = if sprite.trim() {
            (-appx, -appy, cw - appx, ch - appy)
        } else {
            // Reconstruct the trimmed-away margins so the quad shows the
            // frame at its untrimmed proportions.
            let ow = frame.original_size.width;
            let oh = frame.original_size.height;
            let rw = frame.rect.width;
            let rh = frame.rect.height;
            let offset = frame.offset;
            let scale_x = cw / ow;
            let scale_y = ch / oh;

            let trim_left = offset.x + (ow - rw) / 2.0;
            let trim_right = offset.x - (ow - rw) / 2.0;
            let trim_bottom = offset.y + (oh - rh) / 2.0;
            let trim_top = offset.y - (oh - rh) / 2.0;

            (
                trim_left * scale_x - appx,
                trim_bottom * scale_y - appy,
                cw + trim_right * scale_x - appx,
                ch + trim_top * scale_y - appy,
            )
        };

        record.data[0].pos.x = l;
        record.data[0].pos.y = b;
        record.data[3].pos.x = r;
        record.data[3].pos.y = t;

        record.vert_dirty = false;
    }
}

/// Append the world-transformed quad to the shared buffer
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
    let Some(record) = sprite.render_data_key().and_then(|key| pool.get(key)) else {
        return;
    };

    let lb = record.data[0].pos;
    let rt = record.data[3].pos;
    let color = sprite.color.packed();
    let uv = frame.uv;

    let mut float_offset = buffer.float_cursor();
    let indice_offset = buffer.indice_cursor();
    let vertex_id = buffer.vertex_cursor();

    if !buffer.request(4, 6) {
        return;
    }

    // Corner order matches the UV table: lb, rb, lt, rt.
    let corners = [
        Point3::new(lb.x, lb.y, 0.0),
        Point3::new(rt.x, lb.y, 0.0),
        Point3::new(lb.x, rt.y, 0.0),
        Point3::new(rt.x, rt.y, 0.0),
    ];

    let (vbuf, ibuf) = buffer.arrays_mut();
    for (i, corner) in corners.iter().enumerate() {
        let vertex = world.transform_point(corner);
        write_vertex(
            vbuf,
            float_offset,
            vertex.x,
            vertex.y,
            vertex.z,
            uv[i * 2],
            uv[i * 2 + 1],
            color,
        );
        float_offset += crate::render::mesh_buffer::VERTEX_FLOATS;
    }

    write_quad_indices(ibuf, indice_offset, vertex_id);
}
