//! Radial-filled sprite assembler
//!
//! An angular sweep around the fill center, counter-clockwise from +X,
//! using the same normalized fill span as the bar assembler. The sweep is
//! triangulated exactly: boundary vertices sit where the sweep's critical
//! angles (its endpoints plus every quad corner it crosses) hit the quad
//! border, so each fan triangle spans a single border side and no
//! tessellation error is introduced. A full sweep therefore covers the
//! quad precisely.

use std::f32::consts::TAU;

use crate::assets::AssetStore;
use crate::foundation::math::{utils, Mat4, Point3, Vec2};
use crate::render::mesh_buffer::{MeshBuffer, VERTEX_FLOATS};
use crate::render::render_data::RenderDataPool;
use crate::ui::sprite::SpriteRenderer;

use super::{normalize_fill, write_vertex};

const ANGLE_EPSILON: f32 = 1e-5;

/// Allocate an 8-slot record: slot 0 is the fill center, slots 1..=6 the
/// fan boundary (at most 4 corner crossings plus both sweep endpoints)
pub fn create_data(sprite: &mut SpriteRenderer, pool: &mut RenderDataPool) {
    let key = pool.alloc();
    if let Some(record) = pool.get_mut(key) {
        record.set_data_length(8);
        record.vertex_count = 0;
        record.indice_count = 0;
    }
    sprite.set_render_data_key(Some(key));
}

/// Recompute the fan when dirty
pub fn update_render_data(sprite: &SpriteRenderer, pool: &mut RenderDataPool, assets: &AssetStore) {
    let Some(frame) = sprite.sprite_frame().and_then(|key| assets.frame(key)) else {
        return;
    };
    let uv = frame.uv;

    let Some(record) = sprite.render_data_key().and_then(|key| pool.get_mut(key)) else {
        return;
    };

    if !(record.uv_dirty || record.vert_dirty) {
        return;
    }

    let width = sprite.size().width;
    let height = sprite.size().height;
    let appx = sprite.anchor().x * width;
    let appy = sprite.anchor().y * height;
    let l = -appx;
    let b = -appy;
    let r = width - appx;
    let t = height - appy;

    let (fill_start, fill_end) = normalize_fill(sprite.fill_start(), sprite.fill_range());
    let sweep = (fill_end - fill_start) * TAU;

    if r - l <= 0.0 || t - b <= 0.0 || sweep <= ANGLE_EPSILON {
        record.vertex_count = 0;
        record.indice_count = 0;
        record.uv_dirty = false;
        record.vert_dirty = false;
        return;
    }

    let center = Vec2::new(
        l + utils::clamp(sprite.fill_center().x, 0.0, 1.0) * (r - l),
        b + utils::clamp(sprite.fill_center().y, 0.0, 1.0) * (t - b),
    );
    let theta_start = fill_start * TAU;
    let theta_end = theta_start + sweep;

    // Critical angles: the sweep endpoints plus every quad corner strictly
    // inside the sweep, in increasing order.
    let mut angles = [theta_start; 7];
    let mut count = 1;
    for (cx, cy) in [(l, b), (r, b), (r, t), (l, t)] {
        let mut angle = (cy - center.y).atan2(cx - center.x);
        while angle <= theta_start + ANGLE_EPSILON {
            angle += TAU;
        }
        if angle < theta_end - ANGLE_EPSILON {
            angles[count] = angle;
            count += 1;
        }
    }
    angles[1..count].sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    angles[count] = theta_end;
    count += 1;

    record.data[0].pos.x = center.x;
    record.data[0].pos.y = center.y;
    record.data[0].pos.z = 0.0;
    record.data[0].uv = interpolate_uv(&uv, center.x, center.y, l, b, r, t);

    let mut boundary = 0;
    let mut previous = f32::NAN;
    for &angle in &angles[..count] {
        if !previous.is_nan() && angle - previous <= ANGLE_EPSILON {
            continue;
        }
        previous = angle;

        let point = border_hit(center, angle, l, b, r, t);
        let slot = &mut record.data[1 + boundary];
        slot.pos.x = point.x;
        slot.pos.y = point.y;
        slot.pos.z = 0.0;
        slot.uv = interpolate_uv(&uv, point.x, point.y, l, b, r, t);
        boundary += 1;
    }

    record.vertex_count = boundary + 1;
    record.indice_count = boundary.saturating_sub(1) * 3;
    record.uv_dirty = false;
    record.vert_dirty = false;
}

/// Where the ray from `center` at `angle` crosses the quad border
fn border_hit(center: Vec2, angle: f32, l: f32, b: f32, r: f32, t: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();

    let tx = if cos > ANGLE_EPSILON {
        (r - center.x) / cos
    } else if cos < -ANGLE_EPSILON {
        (l - center.x) / cos
    } else {
        f32::INFINITY
    };
    let ty = if sin > ANGLE_EPSILON {
        (t - center.y) / sin
    } else if sin < -ANGLE_EPSILON {
        (b - center.y) / sin
    } else {
        f32::INFINITY
    };

    let distance = tx.min(ty);
    Vec2::new(center.x + cos * distance, center.y + sin * distance)
}

/// Bilinear UV at a point of the quad, from the raw corner UVs
///
/// Interpolating the corner table keeps rotated atlas frames correct, the
/// same way the bar assembler's span interpolation does.
fn interpolate_uv(uv: &[f32; 8], px: f32, py: f32, l: f32, b: f32, r: f32, t: f32) -> Vec2 {
    let s = (px - l) / (r - l);
    let q = (py - b) / (t - b);

    Vec2::new(
        utils::lerp(utils::lerp(uv[0], uv[2], s), utils::lerp(uv[4], uv[6], s), q),
        utils::lerp(utils::lerp(uv[1], uv[3], s), utils::lerp(uv[5], uv[7], s), q),
    )
}

/// Append the world-transformed fan to the shared buffer
pub fn fill_buffers(
    sprite: &SpriteRenderer,
    pool: &mut RenderDataPool,
    world: &Mat4,
    buffer: &mut MeshBuffer,
) {
    let Some(record) = sprite.render_data_key().and_then(|key| pool.get(key)) else {
        return;
    };
    if record.vertex_count < 3 {
        return;
    }

    let color = sprite.color.packed();
    let vertex_count = record.vertex_count;
    let indice_count = record.indice_count;

    let mut float_offset = buffer.float_cursor();
    let mut indice_offset = buffer.indice_cursor();
    let vertex_id = buffer.vertex_cursor();

    if !buffer.request(vertex_count, indice_count) {
        return;
    }

    let (vbuf, ibuf) = buffer.arrays_mut();
    for slot in &record.data[..vertex_count] {
        let vertex = world.transform_point(&Point3::new(slot.pos.x, slot.pos.y, slot.pos.z));
        write_vertex(
            vbuf,
            float_offset,
            vertex.x,
            vertex.y,
            vertex.z,
            slot.uv.x,
            slot.uv.y,
            color,
        );
        float_offset += VERTEX_FLOATS;
    }

    // Fan around slot 0; counter-clockwise boundary keeps quad winding.
    let base = vertex_id as u16;
    for i in 1..vertex_count - 1 {
        ibuf[indice_offset] = base;
        ibuf[indice_offset + 1] = base + i as u16;
        ibuf[indice_offset + 2] = base + i as u16 + 1;
        indice_offset += 3;
    }
}
