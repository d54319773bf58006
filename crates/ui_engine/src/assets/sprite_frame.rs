//! Sprite frame: a rectangular region of a texture atlas
//!
//! Frames carry the atlas rect, trim metadata, and 9-patch insets, plus two
//! precomputed UV tables the assemblers read directly: the 4-corner quad UV
//! (8 floats, trim/rotation already applied) and the 16-entry sliced grid.
//! Atlas coordinates are y-down; the corner order of every table is
//! bottom-left, bottom-right, top-left, top-right.

use crate::foundation::collections::new_key_type;
use crate::foundation::math::{Rect, Size, Vec2};

use super::texture::{Texture, TextureKey};

new_key_type! {
    /// Handle to a sprite frame in the asset store
    pub struct SpriteFrameKey;
}

/// One entry of the sliced UV grid
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SliceUv {
    /// Horizontal texture coordinate
    pub u: f32,

    /// Vertical texture coordinate
    pub v: f32,
}

/// Source texture region for a sprite
#[derive(Debug, Clone)]
pub struct SpriteFrame {
    /// Backing texture
    pub texture: TextureKey,

    /// Pixel rect inside the atlas; for rotated frames the content is
    /// stored turned 90 degrees, with `rect.width`/`rect.height` still in
    /// sprite space
    pub rect: Rect,

    /// Untrimmed source size
    pub original_size: Size,

    /// Trim offset of the rect center from the original center
    pub offset: Vec2,

    /// Whether the content is stored rotated in the atlas
    pub rotated: bool,

    /// 9-patch inset from the left edge, in pixels
    pub inset_left: f32,

    /// 9-patch inset from the right edge, in pixels
    pub inset_right: f32,

    /// 9-patch inset from the top edge, in pixels
    pub inset_top: f32,

    /// 9-patch inset from the bottom edge, in pixels
    pub inset_bottom: f32,

    /// Corner UVs as [lb.u, lb.v, rb.u, rb.v, lt.u, lt.v, rt.u, rt.v]
    pub uv: [f32; 8],

    /// 4x4 sliced UV grid, row-major from the bottom row
    pub uv_sliced: [SliceUv; 16],
}

impl SpriteFrame {
    /// Create a frame covering `rect` of `texture`, untrimmed and unrotated
    ///
    /// UV tables are derived when the frame is registered with the asset
    /// store (the atlas dimensions live on the texture).
    pub fn new(texture: TextureKey, rect: Rect) -> Self {
        Self {
            texture,
            rect,
            original_size: Size::new(rect.width, rect.height),
            offset: Vec2::zeros(),
            rotated: false,
            inset_left: 0.0,
            inset_right: 0.0,
            inset_top: 0.0,
            inset_bottom: 0.0,
            uv: [0.0; 8],
            uv_sliced: [SliceUv::default(); 16],
        }
    }

    /// Set the 9-patch insets
    pub fn with_insets(mut self, left: f32, right: f32, top: f32, bottom: f32) -> Self {
        self.inset_left = left;
        self.inset_right = right;
        self.inset_top = top;
        self.inset_bottom = bottom;
        self
    }

    /// Mark the content as stored rotated in the atlas
    pub fn with_rotated(mut self, rotated: bool) -> Self {
        self.rotated = rotated;
        self
    }

    /// Set trim metadata: the untrimmed size and the rect-center offset
    pub fn with_trim(mut self, original_size: Size, offset: Vec2) -> Self {
        self.original_size = original_size;
        self.offset = offset;
        self
    }

    /// Recompute both UV tables from the atlas dimensions
    pub fn calculate_uv(&mut self, texture: &Texture) {
        let atlas_w = texture.width;
        let atlas_h = texture.height;
        let rect = self.rect;

        if self.rotated {
            let ul = rect.x / atlas_w;
            let ur = (rect.x + rect.height) / atlas_w;
            let vt = rect.y / atlas_h;
            let vb = (rect.y + rect.width) / atlas_h;

            self.uv = [ul, vt, ul, vb, ur, vt, ur, vb];
        } else {
            let ul = rect.x / atlas_w;
            let ur = (rect.x + rect.width) / atlas_w;
            let vt = rect.y / atlas_h;
            let vb = (rect.y + rect.height) / atlas_h;

            self.uv = [ul, vb, ur, vb, ul, vt, ur, vt];
        }

        self.calculate_sliced_uv(atlas_w, atlas_h);
    }

    fn calculate_sliced_uv(&mut self, atlas_w: f32, atlas_h: f32) {
        let rect = self.rect;

        // Grid stops along the sprite's own axes, left-to-right and
        // bottom-to-top.
        let stops_x = [
            0.0,
            self.inset_left,
            rect.width - self.inset_right,
            rect.width,
        ];
        let stops_y = [
            0.0,
            self.inset_bottom,
            rect.height - self.inset_top,
            rect.height,
        ];

        for row in 0..4 {
            for col in 0..4 {
                let entry = &mut self.uv_sliced[row * 4 + col];
                if self.rotated {
                    // Sprite x runs along the atlas y axis and vice versa.
                    entry.u = (rect.x + stops_y[row]) / atlas_w;
                    entry.v = (rect.y + stops_x[col]) / atlas_h;
                } else {
                    entry.u = (rect.x + stops_x[col]) / atlas_w;
                    entry.v = (rect.y + (rect.height - stops_y[row])) / atlas_h;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn atlas() -> Texture {
        Texture::new(200.0, 100.0)
    }

    #[test]
    fn test_corner_uv_unrotated() {
        let mut frame = SpriteFrame::new(TextureKey::default(), Rect::new(50.0, 25.0, 100.0, 50.0));
        frame.calculate_uv(&atlas());

        // lb, rb, lt, rt
        assert_relative_eq!(frame.uv[0], 0.25);
        assert_relative_eq!(frame.uv[1], 0.75);
        assert_relative_eq!(frame.uv[2], 0.75);
        assert_relative_eq!(frame.uv[3], 0.75);
        assert_relative_eq!(frame.uv[4], 0.25);
        assert_relative_eq!(frame.uv[5], 0.25);
        assert_relative_eq!(frame.uv[6], 0.75);
        assert_relative_eq!(frame.uv[7], 0.25);
    }

    #[test]
    fn test_corner_uv_rotated_swaps_axes() {
        let mut frame = SpriteFrame::new(TextureKey::default(), Rect::new(50.0, 25.0, 50.0, 100.0))
            .with_rotated(true);
        frame.calculate_uv(&atlas());

        // Sprite width (50) spans the atlas y axis, height (100) spans x.
        let ul = 50.0 / 200.0;
        let ur = (50.0 + 100.0) / 200.0;
        let vt = 25.0 / 100.0;
        let vb = (25.0 + 50.0) / 100.0;
        assert_eq!(frame.uv, [ul, vt, ul, vb, ur, vt, ur, vb]);
    }

    #[test]
    fn test_sliced_uv_corners_match_quad_uv() {
        let mut frame = SpriteFrame::new(TextureKey::default(), Rect::new(50.0, 25.0, 100.0, 50.0))
            .with_insets(10.0, 10.0, 5.0, 5.0);
        frame.calculate_uv(&atlas());

        // Grid corners coincide with the plain corner UVs.
        assert_eq!((frame.uv_sliced[0].u, frame.uv_sliced[0].v), (frame.uv[0], frame.uv[1]));
        assert_eq!((frame.uv_sliced[3].u, frame.uv_sliced[3].v), (frame.uv[2], frame.uv[3]));
        assert_eq!((frame.uv_sliced[12].u, frame.uv_sliced[12].v), (frame.uv[4], frame.uv[5]));
        assert_eq!((frame.uv_sliced[15].u, frame.uv_sliced[15].v), (frame.uv[6], frame.uv[7]));
    }

    #[test]
    fn test_sliced_uv_inner_stops() {
        let mut frame = SpriteFrame::new(TextureKey::default(), Rect::new(0.0, 0.0, 100.0, 50.0))
            .with_insets(10.0, 20.0, 5.0, 15.0);
        frame.calculate_uv(&Texture::new(100.0, 50.0));

        // Column stops: 0, 10, 80, 100 -> u = 0, 0.1, 0.8, 1.0 (bottom row).
        assert_relative_eq!(frame.uv_sliced[1].u, 0.1);
        assert_relative_eq!(frame.uv_sliced[2].u, 0.8);
        // Row stops from the bottom: 0, 15, 45, 50 -> v = 1.0, 0.7, 0.1, 0.0.
        assert_relative_eq!(frame.uv_sliced[4].v, 0.7);
        assert_relative_eq!(frame.uv_sliced[8].v, 0.1);
    }
}
