use std::io::Cursor;

use super::*;

fn encode(img: image::DynamicImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

#[test]
fn decode_png_keeps_straight_alpha() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba.clone()).unwrap();
    let bytes = encode(image::DynamicImage::ImageRgba8(img), image::ImageFormat::Png);

    let raster = decode_image(&bytes).unwrap();
    assert_eq!((raster.width, raster.height), (1, 1));
    assert_eq!(raster.rgba8, src_rgba);
}

#[test]
fn decode_rgb_gets_opaque_alpha() {
    let img = image::RgbImage::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
    let bytes = encode(image::DynamicImage::ImageRgb8(img), image::ImageFormat::Png);

    let raster = decode_image(&bytes).unwrap();
    assert_eq!(raster.rgba8, vec![1, 2, 3, 255, 4, 5, 6, 255]);
}

#[test]
fn decode_garbage_is_an_error() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn from_raw_checks_length() {
    assert!(Raster::from_raw(2, 2, vec![0; 16]).is_some());
    assert!(Raster::from_raw(2, 2, vec![0; 15]).is_none());
}

#[test]
fn pixel_bounds() {
    let r = Raster::solid(2, 1, [9, 8, 7, 6]);
    assert_eq!(r.pixel(1, 0), Some([9, 8, 7, 6]));
    assert_eq!(r.pixel(2, 0), None);
}
