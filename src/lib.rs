//! Blur the bottom half of an image and stamp a two-line "Sample" watermark on it.
//!
//! The treatment is fixed: everything below the vertical midline is Gaussian
//! blurred, then "Sample" and a small legal notice are drawn in black, stacked
//! on the line at three quarters of the image height.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use shrimp_watermark::ImageTransformPipeline;
//!
//! let pipeline = ImageTransformPipeline::new();
//! let saved = pipeline.process_file(Path::new("photo.jpg"), None).unwrap();
//! assert_eq!(saved, Path::new("photo_Shrimp.jpg"));
//! ```
//!
//! # Fonts
//!
//! Fonts are looked up from an ordered candidate list. If none can be loaded
//! a copy of DejaVu Sans Mono bundled with the crate is used, so rendering
//! never fails.
//!
//! ```
//! use shrimp_watermark::FontResolver;
//!
//! let fonts = FontResolver::empty().resolve(14, 28);
//! assert!(fonts.is_fallback());
//! ```

#![deny(missing_docs)]

pub mod blur;
pub mod error;
pub mod font;
pub mod output;
mod pipeline;
pub mod render;
pub mod save;
pub mod source;

pub use blur::{blur_bottom_half, blur_radius, Region};
pub use error::{Error, Result};
pub use font::{embedded_font, FontPair, FontResolver, FontSource, SystemFont, WatermarkFont};
pub use output::{default_output_path, resolve_output_path, OutputTarget};
pub use pipeline::{ImageTransformPipeline, RunConfig};
pub use render::{render_watermark, WatermarkLayout, BOTTOM_TEXT, TOP_TEXT};
pub use save::{save_image, SavePlan};
pub use source::{PixelMode, SourceImage};
