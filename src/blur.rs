//! Region-selective Gaussian blur.
//!
//! Only the bottom half of the image is blurred; rows above the midline are
//! never written.

use image::{imageops, DynamicImage, GenericImageView};
use tracing::info;

/// Smallest blur radius applied, regardless of image size.
const MIN_BLUR_RADIUS: u32 = 5;

/// One radius step per this many pixels of the shorter image side.
const RADIUS_DIVISOR: u32 = 80;

/// An axis-aligned rectangle `[x0, x1) x [y0, y1)` in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left edge (inclusive).
    pub x0: u32,
    /// Top edge (inclusive).
    pub y0: u32,
    /// Right edge (exclusive).
    pub x1: u32,
    /// Bottom edge (exclusive).
    pub y1: u32,
}

impl Region {
    /// The bottom half of a `width x height` image, starting at `floor(height / 2)`.
    #[must_use]
    pub fn bottom_half(width: u32, height: u32) -> Self {
        Self {
            x0: 0,
            y0: height / 2,
            x1: width,
            y1: height,
        }
    }

    /// Width of the region in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Height of the region in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Whether the region covers no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Blur radius for an image: `max(5, min(width, height) / 80)`.
#[must_use]
pub fn blur_radius(width: u32, height: u32) -> u32 {
    (width.min(height) / RADIUS_DIVISOR).max(MIN_BLUR_RADIUS)
}

/// Blur the bottom half of `image` and return the result.
///
/// The radius from [`blur_radius`] is used as the Gaussian sigma. The pixel
/// mode of the image is preserved and the top half is left byte-identical.
#[must_use]
pub fn blur_bottom_half(mut image: DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    let region = Region::bottom_half(width, height);
    if region.is_empty() {
        return image;
    }

    let radius = blur_radius(width, height);
    #[allow(clippy::cast_precision_loss)]
    let blurred = image
        .crop_imm(region.x0, region.y0, region.width(), region.height())
        .blur(radius as f32);
    imageops::replace(
        &mut image,
        &blurred,
        i64::from(region.x0),
        i64::from(region.y0),
    );

    info!(radius, middle = region.y0, "Applied Gaussian blur to bottom half");
    image
}
