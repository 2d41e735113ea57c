//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::imaging::params::CropRect;

/// Result of mapping a display-space crop rectangle onto the source image.
///
/// `output_width`/`output_height` are the dimensions of the surface the crop
/// is rendered into (already multiplied by the pixel-density factor). The
/// `source_*` fields are the region read from the original image, in natural
/// pixel coordinates, kept as `f64` until the codec clamps them.
#[derive(Debug, Clone, PartialEq)]
pub struct CropMapping {
    pub output_width: u32,
    pub output_height: u32,
    pub source_x: f64,
    pub source_y: f64,
    pub source_width: f64,
    pub source_height: f64,
}

/// Calculate output dimensions for a shortest-side resize.
///
/// The smaller of the two source edges maps exactly to `shortest_side`; the
/// other edge is scaled to preserve the aspect ratio. Math is done in `f64`
/// and truncated to whole pixels, matching surface-dimension assignment.
/// Square images take the height branch.
///
/// `shortest_side` must be positive; callers guard this precondition.
///
/// # Examples
/// ```
/// # use pixtray::imaging::resize_dimensions;
/// // Landscape: height is the shortest side
/// assert_eq!(resize_dimensions((1600, 900), 800), (1422, 800));
///
/// // Portrait: width is the shortest side
/// assert_eq!(resize_dimensions((900, 1600), 800), (800, 1422));
/// ```
pub fn resize_dimensions(natural: (u32, u32), shortest_side: u32) -> (u32, u32) {
    debug_assert!(shortest_side > 0, "shortest_side must be positive");
    let (w, h) = (natural.0 as f64, natural.1 as f64);
    let target = shortest_side as f64;

    if natural.0 < natural.1 {
        // Width is the shortest side
        let ratio = w / target;
        (shortest_side, (h / ratio) as u32)
    } else {
        // Height is the shortest side (ties land here)
        let ratio = h / target;
        ((w / ratio) as u32, shortest_side)
    }
}

/// Map a display-space crop rectangle to source coordinates and output size.
///
/// The interactive crop rectangle is expressed in on-screen (possibly
/// downsized) coordinates, so two scale stages apply: display → natural
/// resolution, then natural → output multiplied by `pixel_ratio` so exports
/// match physical resolution on high-density displays.
///
/// Output dimensions are `floor(w·scale_x·ρ) × floor(h·scale_y·ρ)` exactly.
pub fn crop_mapping(
    rect: &CropRect,
    natural: (u32, u32),
    displayed: (f64, f64),
    pixel_ratio: f64,
) -> CropMapping {
    let scale_x = natural.0 as f64 / displayed.0;
    let scale_y = natural.1 as f64 / displayed.1;

    CropMapping {
        output_width: (rect.width * scale_x * pixel_ratio).floor() as u32,
        output_height: (rect.height * scale_y * pixel_ratio).floor() as u32,
        source_x: rect.x * scale_x,
        source_y: rect.y * scale_y,
        source_width: rect.width * scale_x,
        source_height: rect.height * scale_y,
    }
}
