//! End-to-end watermarking of a single image file.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::info;

use crate::blur::blur_bottom_half;
use crate::error::Result;
use crate::font::FontResolver;
use crate::output::resolve_output_path;
use crate::render::{render_watermark, WatermarkLayout};
use crate::save::{save_image, SavePlan};
use crate::source::SourceImage;

/// Parameters for one run, built once by the caller.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Image to process. Must be an existing file.
    pub file_path: PathBuf,
    /// Output file or directory; `None` saves next to the input.
    pub output_target: Option<PathBuf>,
}

/// Blur, watermark and save one image at a time.
///
/// Holds only the font candidates; every run starts from a fresh decode.
#[derive(Debug, Default)]
pub struct ImageTransformPipeline {
    fonts: FontResolver,
}

impl ImageTransformPipeline {
    /// Pipeline using the default font candidates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline using a custom font resolver.
    #[must_use]
    pub fn with_font_resolver(fonts: FontResolver) -> Self {
        Self { fonts }
    }

    /// Apply the watermark treatment to a decoded image.
    ///
    /// JPEG sources in any mode other than 8-bit RGB are converted to RGB
    /// first. The bottom half is then blurred and the two text lines drawn.
    #[must_use]
    pub fn transform(&self, source: SourceImage) -> SourceImage {
        let is_jpeg = source.is_jpeg();
        let SourceImage { mut image, format } = source;

        if is_jpeg && !matches!(image, DynamicImage::ImageRgb8(_)) {
            image = DynamicImage::ImageRgb8(image.to_rgb8());
        }

        let image = blur_bottom_half(image);

        let layout = WatermarkLayout::for_dimensions(image.width(), image.height());
        let fonts = self.fonts.resolve(layout.small_size, layout.large_size);
        let image = render_watermark(image, &fonts);

        SourceImage::new(image, format)
    }

    /// Decode `input`, transform it and save it to the resolved output path.
    ///
    /// Returns the path the image was written to.
    ///
    /// # Errors
    ///
    /// Fails if `input` is not a readable image or the output cannot be
    /// encoded or written. Nothing is written when decoding fails.
    pub fn process_file(&self, input: &Path, output: Option<&Path>) -> Result<PathBuf> {
        info!(path = %input.display(), "Processing image");
        let source = SourceImage::open(input)?;
        let transformed = self.transform(source);

        let out_path = resolve_output_path(input, output);
        let plan = SavePlan::for_image(&transformed, out_path);
        save_image(transformed.image, &plan)?;
        Ok(plan.path)
    }

    /// Run with a prepared [`RunConfig`].
    ///
    /// # Errors
    ///
    /// See [`ImageTransformPipeline::process_file`].
    pub fn run(&self, config: &RunConfig) -> Result<PathBuf> {
        self.process_file(&config.file_path, config.output_target.as_deref())
    }
}
