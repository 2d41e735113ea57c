//! Pure Rust codec — zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP) | `image` crate (pure Rust decoders) |
//! | Identify | `ImageReader::into_dimensions` (header-only, no full decode) |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Crop | `DynamicImage::crop_imm` + `resize_exact` to the mapped output |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::calculations::CropMapping;
use super::codec::{CodecError, Dimensions, ImageCodec};
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Pure Rust codec using the `image` crate ecosystem.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an in-memory encoded image.
fn decode(data: &[u8]) -> Result<DynamicImage, CodecError> {
    image::load_from_memory(data).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Serialize to JPEG at the given quality.
///
/// JPEG has no alpha channel, so anything with transparency is flattened to
/// RGB first — the same collapse a drawing surface applies.
fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality.value() as u8);
    rgb.write_with_encoder(encoder)
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Clamp the mapping's fractional source region to whole pixels inside the image.
fn clamp_region(mapping: &CropMapping, img: &DynamicImage) -> (u32, u32, u32, u32) {
    let x = (mapping.source_x.max(0.0) as u32).min(img.width().saturating_sub(1));
    let y = (mapping.source_y.max(0.0) as u32).min(img.height().saturating_sub(1));
    let w = (mapping.source_width.round() as u32).clamp(1, img.width() - x);
    let h = (mapping.source_height.round() as u32).clamp(1, img.height() - y);
    (x, y, w, h)
}

impl ImageCodec for RustCodec {
    fn identify(&self, data: &[u8]) -> Result<Dimensions, CodecError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn resize(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        quality: Quality,
    ) -> Result<Vec<u8>, CodecError> {
        let img = decode(data)?;
        let resized = img.resize_exact(width, height, FilterType::Lanczos3);
        encode_jpeg(&resized, quality)
    }

    fn crop(
        &self,
        data: &[u8],
        mapping: &CropMapping,
        quality: Quality,
    ) -> Result<Vec<u8>, CodecError> {
        if mapping.output_width == 0 || mapping.output_height == 0 {
            return Err(CodecError::Encode("crop output has no pixels".to_string()));
        }
        let img = decode(data)?;
        let (x, y, w, h) = clamp_region(mapping, &img);
        let region = img.crop_imm(x, y, w, h);
        let out =
            region.resize_exact(mapping.output_width, mapping.output_height, FilterType::Lanczos3);
        encode_jpeg(&out, quality)
    }
}
