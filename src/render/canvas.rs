use crate::{
    assets::decode::Raster,
    foundation::error::{MergeError, MergeResult},
    render::blend::{Rgba8, over_row_in_place},
};

/// Canvas-space rectangle actually touched by a composite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// Left edge, inclusive.
    pub x: u32,
    /// Top edge, inclusive.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Straight-alpha RGBA8 working buffer for one output image.
///
/// Created as a copy of the base raster and mutated by successive overlay composites.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    rgba8: Vec<u8>,
}

impl Canvas {
    /// Start a canvas from a copy of `base`. The base itself is never mutated.
    pub fn from_base(base: &Raster) -> Self {
        Self {
            width: base.width,
            height: base.height,
            rgba8: base.rgba8.clone(),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major straight-alpha RGBA8 bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.rgba8
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.rgba8[i],
            self.rgba8[i + 1],
            self.rgba8[i + 2],
            self.rgba8[i + 3],
        ])
    }

    /// Alpha-over `src` with its top-left corner at `(x, y)`.
    ///
    /// Only the part of `src` that intersects the canvas is blended; the rest is clipped.
    /// Returns the touched region, or `None` when the overlay lies entirely off-canvas.
    pub fn composite_at(&mut self, src: &Raster, x: i32, y: i32) -> MergeResult<Option<Region>> {
        let Some(region) = clip(self.width, self.height, src.width, src.height, x, y) else {
            return Ok(None);
        };

        // Offset of the visible part inside `src`.
        let src_x0 = (i64::from(region.x) - i64::from(x)) as usize;
        let src_y0 = (i64::from(region.y) - i64::from(y)) as usize;
        let row_bytes = region.width as usize * 4;
        let dst_stride = self.width as usize * 4;
        let src_stride = src.width as usize * 4;

        for row in 0..region.height as usize {
            let d = (region.y as usize + row) * dst_stride + region.x as usize * 4;
            let s = (src_y0 + row) * src_stride + src_x0 * 4;
            let src_row = src.rgba8.get(s..s + row_bytes).ok_or_else(|| {
                MergeError::validation("overlay raster is shorter than its dimensions")
            })?;
            over_row_in_place(&mut self.rgba8[d..d + row_bytes], src_row)?;
        }
        Ok(Some(region))
    }

    /// Hand the pixels off as an `image` buffer for encoding.
    pub fn into_rgba_image(self) -> image::RgbaImage {
        // Dimensions and buffer length are kept consistent by construction.
        image::RgbaImage::from_raw(self.width, self.height, self.rgba8)
            .unwrap_or_else(|| image::RgbaImage::new(0, 0))
    }

    /// Convert into a plain [`Raster`].
    pub fn into_raster(self) -> Raster {
        Raster {
            width: self.width,
            height: self.height,
            rgba8: self.rgba8,
        }
    }
}

/// Intersect a `src_w x src_h` rectangle placed at `(x, y)` with a `w x h` canvas.
fn clip(w: u32, h: u32, src_w: u32, src_h: u32, x: i32, y: i32) -> Option<Region> {
    let x0 = i64::from(x).max(0);
    let y0 = i64::from(y).max(0);
    let x1 = (i64::from(x) + i64::from(src_w)).min(i64::from(w));
    let y1 = (i64::from(y) + i64::from(src_h)).min(i64::from(h));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some(Region {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
