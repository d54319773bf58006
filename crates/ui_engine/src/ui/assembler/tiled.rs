//! Tiled sprite assembler
//!
//! Repeats the frame to cover the content size, `ceil(content/frame)`
//! tiles per axis. Partial tiles at the far edges are clipped in both
//! vertices and UVs by the fractional repeat coefficient. The slot
//! sequence caches the per-axis cut positions, so its length follows the
//! tile count rather than a fixed topology.

use crate::assets::AssetStore;
use crate::foundation::math::{Mat4, Point3};
use crate::render::mesh_buffer::{MeshBuffer, VERTEX_FLOATS};
use crate::render::render_data::RenderDataPool;
use crate::ui::sprite::SpriteRenderer;

const UV_OFFSET: usize = 3;
const COLOR_OFFSET: usize = 5;

/// Allocate a record; slot count is set on first update
pub fn create_data(sprite: &mut SpriteRenderer, pool: &mut RenderDataPool) {
    let key = pool.alloc();
    sprite.set_render_data_key(Some(key));
}

/// Recompute tile cut positions and counts when dirty
pub fn update_render_data(sprite: &SpriteRenderer, pool: &mut RenderDataPool, assets: &AssetStore) {
    let Some(frame) = sprite.sprite_frame().and_then(|key| assets.frame(key)) else {
        return;
    };
    let Some(record) = sprite.render_data_key().and_then(|key| pool.get_mut(key)) else {
        return;
    };

    if !(record.uv_dirty || record.vert_dirty) {
        return;
    }

    let content_width = sprite.size().width.abs();
    let content_height = sprite.size().height.abs();
    let appx = sprite.anchor().x * content_width;
    let appy = sprite.anchor().y * content_height;

    let rect = frame.rect;
    let h_repeat = content_width / rect.width;
    let v_repeat = content_height / rect.height;
    if !h_repeat.is_finite() || !v_repeat.is_finite() {
        // Degenerate frame rect: no tiles this frame.
        record.vertex_count = 0;
        record.indice_count = 0;
        record.uv_dirty = false;
        record.vert_dirty = false;
        return;
    }

    let row = v_repeat.ceil() as usize;
    let col = h_repeat.ceil() as usize;

    record.set_data_length(8.max(row + 1).max(col + 1));

    for i in 0..=col {
        record.data[i].pos.x = (rect.width * i as f32).min(content_width) - appx;
    }
    for i in 0..=row {
        record.data[i].pos.y = (rect.height * i as f32).min(content_height) - appy;
    }

    record.vertex_count = row * col * 4;
    record.indice_count = row * col * 6;
    record.uv_dirty = false;
    record.vert_dirty = false;
}

/// Append every tile quad to the shared buffer
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
    if record.vertex_count == 0 {
        return;
    }

    let color = sprite.color.packed();
    let rotated = frame.rotated;
    let uv = frame.uv;
    let rect = frame.rect;

    let content_width = sprite.size().width.abs();
    let content_height = sprite.size().height.abs();
    let h_repeat = content_width / rect.width;
    let v_repeat = content_height / rect.height;
    let row = v_repeat.ceil() as usize;
    let col = h_repeat.ceil() as usize;

    let float_offset = buffer.float_cursor();
    let indice_offset = buffer.indice_cursor();
    let vertex_id = buffer.vertex_cursor();

    if !buffer.request(record.vertex_count, record.indice_count) {
        return;
    }

    let (vbuf, ibuf) = buffer.arrays_mut();

    // Positions, tile by tile.
    let mut offset = float_offset;
    for yindex in 0..row {
        let y = record.data[yindex].pos.y;
        let y1 = record.data[yindex + 1].pos.y;
        for xindex in 0..col {
            let x = record.data[xindex].pos.x;
            let x1 = record.data[xindex + 1].pos.x;

            let corners = [
                Point3::new(x, y, 0.0),
                Point3::new(x1, y, 0.0),
                Point3::new(x, y1, 0.0),
                Point3::new(x1, y1, 0.0),
            ];
            for (i, corner) in corners.iter().enumerate() {
                let vertex = world.transform_point(corner);
                let base = offset + i * VERTEX_FLOATS;
                vbuf[base] = vertex.x;
                vbuf[base + 1] = vertex.y;
                vbuf[base + 2] = vertex.z;
            }

            offset += 4 * VERTEX_FLOATS;
        }
    }

    // UVs and colors; edge tiles are clipped by the fractional repeat.
    let offset1 = VERTEX_FLOATS;
    let offset2 = VERTEX_FLOATS * 2;
    let offset3 = VERTEX_FLOATS * 3;
    let offset4 = VERTEX_FLOATS * 4;
    let mut vertex_offset = float_offset;
    for yindex in 0..row {
        let coefv = (v_repeat - yindex as f32).min(1.0);
        for xindex in 0..col {
            let coefu = (h_repeat - xindex as f32).min(1.0);

            let offset_u = vertex_offset + UV_OFFSET;
            let offset_v = offset_u + 1;
            if rotated {
                // lb
                vbuf[offset_u] = uv[0];
                vbuf[offset_v] = uv[1];
                // rb
                vbuf[offset_u + offset1] = uv[0];
                vbuf[offset_v + offset1] = uv[1] + (uv[7] - uv[1]) * coefu;
                // lt
                vbuf[offset_u + offset2] = uv[0] + (uv[6] - uv[0]) * coefv;
                vbuf[offset_v + offset2] = uv[1];
                // rt
                vbuf[offset_u + offset3] = vbuf[offset_u + offset2];
                vbuf[offset_v + offset3] = vbuf[offset_v + offset1];
            } else {
                // lb
                vbuf[offset_u] = uv[0];
                vbuf[offset_v] = uv[1];
                // rb
                vbuf[offset_u + offset1] = uv[0] + (uv[6] - uv[0]) * coefu;
                vbuf[offset_v + offset1] = uv[1];
                // lt
                vbuf[offset_u + offset2] = uv[0];
                vbuf[offset_v + offset2] = uv[1] + (uv[7] - uv[1]) * coefv;
                // rt
                vbuf[offset_u + offset3] = vbuf[offset_u + offset1];
                vbuf[offset_v + offset3] = vbuf[offset_v + offset2];
            }

            let packed = f32::from_bits(color);
            vbuf[vertex_offset + COLOR_OFFSET] = packed;
            vbuf[vertex_offset + COLOR_OFFSET + offset1] = packed;
            vbuf[vertex_offset + COLOR_OFFSET + offset2] = packed;
            vbuf[vertex_offset + COLOR_OFFSET + offset3] = packed;

            vertex_offset += offset4;
        }
    }

    // Two triangles per tile.
    let mut indice = indice_offset;
    let mut vertex = vertex_id;
    while indice < indice_offset + record.indice_count {
        let base = vertex as u16;
        ibuf[indice] = base;
        ibuf[indice + 1] = base + 1;
        ibuf[indice + 2] = base + 2;
        ibuf[indice + 3] = base + 1;
        ibuf[indice + 4] = base + 3;
        ibuf[indice + 5] = base + 2;
        indice += 6;
        vertex += 4;
    }
}
