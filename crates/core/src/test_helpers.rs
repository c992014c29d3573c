//! Fixture images generated on the fly for tests.
//!
//! Also compiled into `tests/gallery_e2e.rs`, so every helper only uses the
//! `image` and `exif` crates.
#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;

use exif::{Field, In, Rational, Tag, Value};

fn encode(img: &image::RgbImage, format: image::ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

pub(crate) fn plain_png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_fn(16, 16, |x, y| image::Rgb([x as u8 * 8, y as u8 * 8, 128]));
    encode(&img, image::ImageFormat::Png)
}

pub(crate) fn write_plain_png(path: &Path) {
    std::fs::write(path, plain_png_bytes()).unwrap();
}

/// A small JPEG; different tints give different file contents.
pub(crate) fn tinted_jpeg_bytes(tint: u8) -> Vec<u8> {
    let img = image::RgbImage::from_fn(16, 16, |x, y| image::Rgb([x as u8 * 16, tint, y as u8 * 16]));
    encode(&img, image::ImageFormat::Jpeg)
}

pub(crate) fn plain_jpeg_bytes() -> Vec<u8> {
    tinted_jpeg_bytes(64)
}

/// A GIF header. No GIF decoder is built in, so this never reads as an image.
pub(crate) fn gif_bytes() -> Vec<u8> {
    let mut bytes = b"GIF89a".to_vec();
    bytes.extend_from_slice(&[16, 0, 16, 0, 0, 0, 0, 0x3B]);
    bytes
}

/// A JPEG whose APP1 segment carries the given EXIF fields.
pub(crate) fn jpeg_with_exif_bytes(fields: &[Field]) -> Vec<u8> {
    let jpeg = plain_jpeg_bytes();

    let mut writer = exif::experimental::Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    let tiff = tiff.into_inner();

    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

pub(crate) fn write_jpeg_with_exif(path: &Path, fields: &[Field]) {
    std::fs::write(path, jpeg_with_exif_bytes(fields)).unwrap();
}

pub(crate) fn ascii(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

pub(crate) fn rational(tag: Tag, num: u32, denom: u32) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(vec![Rational { num, denom }]),
    }
}

pub(crate) fn short(tag: Tag, value: u16) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Short(vec![value]),
    }
}

/// Tags of a Canon EOS 77D shot with a 50mm lens.
pub(crate) fn canon_fields() -> Vec<Field> {
    vec![
        ascii(Tag::Make, "Canon"),
        ascii(Tag::Model, "Canon EOS 77D"),
        ascii(Tag::DateTime, "2020:08:12 10:32:48"),
        rational(Tag::ExposureTime, 1, 400),
        rational(Tag::FNumber, 35, 10),
        short(Tag::PhotographicSensitivity, 100),
        ascii(Tag::LensModel, "EF50mm f/1.8 STM"),
    ]
}
