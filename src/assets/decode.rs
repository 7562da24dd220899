use anyhow::Context;

use crate::foundation::error::MergeResult;

/// Decoded raster image in straight-alpha RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major straight-alpha RGBA8.
    pub rgba8: Vec<u8>,
}

impl Raster {
    /// Wrap raw RGBA8 bytes. Returns `None` when the length does not match the dimensions.
    pub fn from_raw(width: u32, height: u32, rgba8: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (rgba8.len() == expected).then_some(Self {
            width,
            height,
            rgba8,
        })
    }

    /// Raster filled with a single color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            rgba8: rgba.repeat(width as usize * height as usize),
        }
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
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
}

impl From<image::RgbaImage> for Raster {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            rgba8: img.into_raw(),
        }
    }
}

/// Decode encoded image bytes (format sniffed from content) and convert to RGBA8.
///
/// Grayscale, RGB, 16-bit and paletted sources are all normalized to straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> MergeResult<Raster> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(Raster::from(dyn_img.to_rgba8()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
