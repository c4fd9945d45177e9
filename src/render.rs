//! Two-line watermark text placement.
//!
//! "Sample" sits directly above the anchor line in the large font and the
//! legal notice directly below it in the small font, both centered on the
//! anchor's x coordinate.

use image::{DynamicImage, GenericImageView, Rgba};
use tracing::info;

use crate::font::{FontPair, WatermarkFont};

/// Text of the top (large) line.
pub const TOP_TEXT: &str = "Sample";

/// Text of the bottom (small) line.
pub const BOTTOM_TEXT: &str = "Legal use requires purchase";

/// Smallest font size for the bottom line, in pixels.
const MIN_SMALL_SIZE: u32 = 14;

/// The bottom line is one twentieth of the image width.
const SMALL_SIZE_DIVISOR: u32 = 20;

const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Which edge of a text line box sits on the anchor point.
///
/// Both variants center the line horizontally on the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// The bottom (descender) edge touches the anchor.
    BottomMiddle,
    /// The top (ascender) edge touches the anchor.
    TopMiddle,
}

impl Anchor {
    /// Top-left corner of a `width x height` line box anchored at `(x, y)`.
    #[must_use]
    pub fn origin(self, x: i32, y: i32, width: u32, height: u32) -> (i32, i32) {
        #[allow(clippy::cast_possible_wrap)]
        let (half_width, height) = ((width / 2) as i32, height as i32);
        match self {
            Self::BottomMiddle => (x - half_width, y - height),
            Self::TopMiddle => (x - half_width, y),
        }
    }
}

/// Font sizes and anchor point for an image of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkLayout {
    /// Bottom-line font size: `max(14, width / 20)`.
    pub small_size: u32,
    /// Top-line font size, twice the small size.
    pub large_size: u32,
    /// Horizontal center of both lines, `round(width / 2)`.
    pub anchor_x: i32,
    /// Line between the two texts, `round(height * 3 / 4)`.
    pub anchor_y: i32,
}

impl WatermarkLayout {
    /// Layout for a `width x height` image.
    ///
    /// Halves round to even, so a 101px-wide image anchors at x = 50.
    #[must_use]
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        let small_size = (width / SMALL_SIZE_DIVISOR).max(MIN_SMALL_SIZE);
        Self {
            small_size,
            large_size: small_size * 2,
            anchor_x: round_half_even(f64::from(width) / 2.0),
            anchor_y: round_half_even(f64::from(height) * 3.0 / 4.0),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round_half_even(value: f64) -> i32 {
    value.round_ties_even() as i32
}

fn draw_anchored(
    image: &mut DynamicImage,
    font: &WatermarkFont,
    text: &str,
    (x, y): (i32, i32),
    anchor: Anchor,
) {
    let (width, height) = font.measure(text);
    let (left, top) = anchor.origin(x, y, width, height);
    font.draw(image, TEXT_COLOR, left, top, text);
}

/// Draw the two watermark lines onto `image` and return it.
///
/// Text running past the image edges is cut off; the pixel mode is kept.
#[must_use]
pub fn render_watermark(mut image: DynamicImage, fonts: &FontPair) -> DynamicImage {
    let (width, height) = image.dimensions();
    let layout = WatermarkLayout::for_dimensions(width, height);
    let anchor = (layout.anchor_x, layout.anchor_y);

    draw_anchored(&mut image, &fonts.large, TOP_TEXT, anchor, Anchor::BottomMiddle);
    draw_anchored(&mut image, &fonts.small, BOTTOM_TEXT, anchor, Anchor::TopMiddle);

    info!(
        x = layout.anchor_x,
        y = layout.anchor_y,
        "Rendered watermark text block"
    );
    image
}
