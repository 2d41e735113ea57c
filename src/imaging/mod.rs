//! Image transformation: pure coordinate math plus the codec seam.
//!
//! [`calculations`] holds the display/natural/output dimension math,
//! [`params`] the parameter types, [`codec`] the backend-agnostic trait, and
//! [`rust_codec`] the production implementation on the `image` crate.

pub mod calculations;
pub mod codec;
pub mod params;
pub mod rust_codec;

pub use calculations::{CropMapping, crop_mapping, resize_dimensions};
pub use codec::{CodecError, Dimensions, ImageCodec};
pub use params::{CropRect, Quality};
pub use rust_codec::RustCodec;
