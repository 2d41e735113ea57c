//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait defines the three operations every codec must
//! support: identify, resize, and crop. Codecs work on in-memory encoded
//! bytes and always emit JPEG, mirroring a drawing surface that is rasterized
//! and then serialized at a fixed quality factor.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_codec::RustCodec) — pure Rust, statically linked.

use super::calculations::CropMapping;
use super::params::Quality;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image codecs.
///
/// Every codec must implement all three operations so orchestration code is
/// codec-agnostic and testable with a recording mock. Implementations must be
/// `Sync` — batch operations call them from rayon worker threads.
pub trait ImageCodec: Sync {
    /// Read the dimensions of an encoded image.
    fn identify(&self, data: &[u8]) -> Result<Dimensions, CodecError>;

    /// Decode, scale to exactly `width`×`height`, and re-encode as JPEG.
    fn resize(&self, data: &[u8], width: u32, height: u32, quality: Quality)
    -> Result<Vec<u8>, CodecError>;

    /// Decode, extract the mapped source region scaled to the mapping's
    /// output dimensions, and re-encode as JPEG.
    fn crop(&self, data: &[u8], mapping: &CropMapping, quality: Quality)
    -> Result<Vec<u8>, CodecError>;
}
