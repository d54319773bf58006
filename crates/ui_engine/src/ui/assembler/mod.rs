//! Geometry assemblers, one per sprite render mode
//!
//! Each assembler is a set of pure functions over the sprite, its pooled
//! render data, and the shared mesh buffer:
//!
//! - `create_data` allocates a record sized for the mode's topology
//! - `remove_data` returns it to the pool
//! - `update_render_data` recomputes local geometry/UVs, gated by dirty
//!   flags and idempotent otherwise
//! - `fill_buffers` world-transforms the cached vertices and appends them,
//!   plus indices, to the shared buffer
//!
//! Dispatch is a tagged enum matched exhaustively, so adding a mode
//! without geometry rules fails to compile.

pub mod bar_filled;
pub mod radial_filled;
pub mod simple;
pub mod sliced;
pub mod tiled;

use crate::assets::AssetStore;
use crate::foundation::math::{utils, Mat4};
use crate::render::mesh_buffer::MeshBuffer;
use crate::render::render_data::RenderDataPool;

use super::sprite::SpriteRenderer;

/// Geometry-generation strategy for one sprite render mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerKind {
    /// 4-vertex quad
    Simple,

    /// 16-vertex 9-patch grid
    Sliced,

    /// Repeated quads with edge clipping
    Tiled,

    /// Single quad cropped along one axis
    BarFilled,

    /// Pie-slice fan swept around the fill center
    RadialFilled,
}

impl AssemblerKind {
    /// Allocate a render-data record sized for this mode
    pub fn create_data(self, sprite: &mut SpriteRenderer, pool: &mut RenderDataPool) {
        match self {
            Self::Simple => simple::create_data(sprite, pool),
            Self::Sliced => sliced::create_data(sprite, pool),
            Self::Tiled => tiled::create_data(sprite, pool),
            Self::BarFilled => bar_filled::create_data(sprite, pool),
            Self::RadialFilled => radial_filled::create_data(sprite, pool),
        }
    }

    /// Release the sprite's render data back to the pool
    pub fn remove_data(self, sprite: &mut SpriteRenderer, pool: &mut RenderDataPool) {
        sprite.release_render_data(pool);
    }

    /// Recompute local geometry and UVs where dirty
    pub fn update_render_data(
        self,
        sprite: &SpriteRenderer,
        pool: &mut RenderDataPool,
        assets: &AssetStore,
    ) {
        match self {
            Self::Simple => simple::update_render_data(sprite, pool, assets),
            Self::Sliced => sliced::update_render_data(sprite, pool, assets),
            Self::Tiled => tiled::update_render_data(sprite, pool, assets),
            Self::BarFilled => bar_filled::update_render_data(sprite, pool, assets),
            Self::RadialFilled => radial_filled::update_render_data(sprite, pool, assets),
        }
    }

    /// Transform cached vertices to world space and append geometry to the
    /// shared buffer
    pub fn fill_buffers(
        self,
        sprite: &SpriteRenderer,
        pool: &mut RenderDataPool,
        assets: &AssetStore,
        world: &Mat4,
        buffer: &mut MeshBuffer,
    ) {
        match self {
            Self::Simple => simple::fill_buffers(sprite, pool, assets, world, buffer),
            Self::Sliced => sliced::fill_buffers(sprite, pool, assets, world, buffer),
            Self::Tiled => tiled::fill_buffers(sprite, pool, assets, world, buffer),
            Self::BarFilled => bar_filled::fill_buffers(sprite, pool, world, buffer),
            Self::RadialFilled => radial_filled::fill_buffers(sprite, pool, world, buffer),
        }
    }
}

/// Normalize a fill start/range pair into a clamped [start, end] span
///
/// A negative range flips the direction by moving the start backwards
/// before clamping; both endpoints land in [0, 1] with end >= start.
pub(crate) fn normalize_fill(fill_start: f32, fill_range: f32) -> (f32, f32) {
    let mut start = fill_start;
    let mut range = fill_range;

    if range < 0.0 {
        start += range;
        range = -range;
    }

    range += start;

    start = utils::clamp(start, 0.0, 1.0);
    range = utils::clamp(range, 0.0, 1.0);
    range = (range - start).max(0.0);

    let end = (start + range).min(1.0);
    (start, end)
}

/// Write one vertex (position, uv, packed color) at `float_offset`
pub(crate) fn write_vertex(
    vbuf: &mut [f32],
    float_offset: usize,
    x: f32,
    y: f32,
    z: f32,
    u: f32,
    v: f32,
    color: u32,
) {
    vbuf[float_offset] = x;
    vbuf[float_offset + 1] = y;
    vbuf[float_offset + 2] = z;
    vbuf[float_offset + 3] = u;
    vbuf[float_offset + 4] = v;
    vbuf[float_offset + 5] = f32::from_bits(color);
}

/// Append the two-triangle quad index pattern for a quad whose first
/// vertex id is `vertex_id`
pub(crate) fn write_quad_indices(ibuf: &mut [u16], indice_offset: usize, vertex_id: usize) {
    let base = vertex_id as u16;
    ibuf[indice_offset] = base;
    ibuf[indice_offset + 1] = base + 1;
    ibuf[indice_offset + 2] = base + 2;
    ibuf[indice_offset + 3] = base + 1;
    ibuf[indice_offset + 4] = base + 3;
    ibuf[indice_offset + 5] = base + 2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_fill_passthrough() {
        let (start, end) = normalize_fill(0.3, 0.5);
        assert_eq!((start, end), (0.3, 0.8));
    }

    #[test]
    fn test_normalize_fill_negative_range_flips() {
        let (start, end) = normalize_fill(0.6, -0.4);
        assert!((start - 0.2).abs() < 1e-6);
        assert!((end - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_fill_clamps_overflow() {
        let (start, end) = normalize_fill(0.8, 0.6);
        assert_eq!((start, end), (0.8, 1.0));

        let (start, end) = normalize_fill(-0.5, 0.3);
        assert_eq!((start, end), (0.0, 0.0));
    }
}
