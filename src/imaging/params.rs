//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`session`](crate::session) orchestration
//! (which decides what to transform) and the [`codec`](super::codec) (which
//! does the actual pixel work). This separation allows swapping codecs (e.g.
//! for testing with a mock) without changing orchestration logic.

use serde::Deserialize;

/// Quality setting for lossy image encoding (1-100).
///
/// Fixed at 90 for all exports; the type exists so the codec seam does not
/// bake the constant in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// A crop rectangle as reported by an interactive overlay, in display-space
/// coordinates (the possibly scaled-down on-screen image).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    /// A crop is valid for application only once both sides are positive.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}
