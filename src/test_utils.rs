//! Test fixtures: small image files written into scratch directories,
//! plus the `approx` float assertions.

pub use approx::assert_relative_eq;

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;

/// Write a JPEG container holding only an EXIF segment with `DateTimeOriginal`.
///
/// The file carries no scan data, so it is readable by the EXIF parser
/// but fails to decode as an image.
pub fn write_jpeg_with_capture_date(path: &Path, date_time: &str) {
    // ASCII value including its NUL terminator
    let mut value = date_time.as_bytes().to_vec();
    value.push(0);
    let value_len = value.len() as u32;

    // Little-endian TIFF: header, IFD0 with ExifIFDPointer, Exif IFD with the date
    let exif_ifd_offset: u32 = 8 + 18;
    let value_offset: u32 = exif_ifd_offset + 18;

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());

    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x8769u16.to_le_bytes());
    tiff.extend_from_slice(&4u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&exif_ifd_offset.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());

    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x9003u16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&value_len.to_le_bytes());
    tiff.extend_from_slice(&value_offset.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());

    tiff.extend_from_slice(&value);

    write_exif_jpeg(path, &tiff);
}

/// Write a JPEG container whose EXIF segment only names the camera `Make`
pub fn write_jpeg_without_capture_date(path: &Path) {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());

    // IFD0 with a single inline ASCII Make entry
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x010Fu16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&4u32.to_le_bytes());
    tiff.extend_from_slice(b"Cam\0");
    tiff.extend_from_slice(&0u32.to_le_bytes());

    write_exif_jpeg(path, &tiff);
}

fn write_exif_jpeg(path: &Path, tiff: &[u8]) {
    let mut segment = b"Exif\0\0".to_vec();
    segment.extend_from_slice(tiff);

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&((segment.len() + 2) as u16).to_be_bytes());
    jpeg.extend_from_slice(&segment);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);

    fs::write(path, jpeg).unwrap();
}

/// Write a solid-colour PNG of the given size
pub fn write_png(path: &Path, width: u32, height: u32) {
    solid_image(width, height).save(path).unwrap();
}

pub fn solid_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]))
}
