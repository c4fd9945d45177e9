//! Decoded source images.

use std::path::Path;

use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use crate::error::{Error, Result};

/// Channel layout of an image, independent of bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelMode {
    /// Grayscale.
    L,
    /// Grayscale with alpha.
    La,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
    /// Anything the codec may add later.
    Other,
}

impl PixelMode {
    /// Mode of `image`.
    #[must_use]
    pub fn of(image: &DynamicImage) -> Self {
        match image.color() {
            ColorType::L8 | ColorType::L16 => Self::L,
            ColorType::La8 | ColorType::La16 => Self::La,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => Self::Rgb,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => Self::Rgba,
            _ => Self::Other,
        }
    }

    /// Whether the mode carries an alpha channel.
    #[must_use]
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::La | Self::Rgba)
    }
}

/// A decoded image together with the format it was decoded from.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Pixel data.
    pub image: DynamicImage,
    /// Format detected while decoding, if any.
    pub format: Option<ImageFormat>,
}

impl SourceImage {
    /// Wrap already-decoded pixels.
    #[must_use]
    pub fn new(image: DynamicImage, format: Option<ImageFormat>) -> Self {
        Self { image, format }
    }

    /// Decode the file at `path`, guessing the format from its content first
    /// and its extension second.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAFile`] if `path` is not a regular file,
    /// [`Error::Io`] if it cannot be read and [`Error::Decode`] if the bytes
    /// are not a supported image.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::NotAFile(path.to_path_buf()));
        }

        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader.format();
        let image = reader.decode().map_err(Error::Decode)?;

        let source = Self { image, format };
        debug!(
            format = ?source.format,
            mode = ?source.mode(),
            width = source.image.width(),
            height = source.image.height(),
            "Decoded source image"
        );
        Ok(source)
    }

    /// Pixel mode of the image.
    #[must_use]
    pub fn mode(&self) -> PixelMode {
        PixelMode::of(&self.image)
    }

    /// Whether the image was decoded from a JPEG file.
    #[must_use]
    pub fn is_jpeg(&self) -> bool {
        self.format == Some(ImageFormat::Jpeg)
    }
}
