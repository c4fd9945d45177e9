//! Format-aware saving.
//!
//! The encode format prefers the format the image was decoded from and falls
//! back to the output path's extension. JPEG cannot store alpha, so RGBA and
//! LA images headed for JPEG are flattened to RGB first.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use tracing::info;

use crate::error::{Error, Result};
use crate::source::{PixelMode, SourceImage};

/// JPEG quality used when encoding.
const JPEG_QUALITY: u8 = 75;

/// Pixel conversion applied right before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Drop the alpha channel and expand to 8-bit RGB.
    ToRgb,
}

/// Everything decided before bytes are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePlan {
    /// Destination file.
    pub path: PathBuf,
    /// Encode format; `None` lets the encoder infer it from `path`.
    pub format: Option<ImageFormat>,
    /// Conversion to apply before encoding.
    pub coercion: Option<Coercion>,
}

impl SavePlan {
    /// Plan saving an image of `mode`, decoded as `source_format`, to `path`.
    #[must_use]
    pub fn new(source_format: Option<ImageFormat>, mode: PixelMode, path: PathBuf) -> Self {
        let format = source_format.or_else(|| {
            path.extension()
                .filter(|ext| !ext.is_empty())
                .and_then(ImageFormat::from_extension)
        });
        let coercion = (format == Some(ImageFormat::Jpeg) && mode.has_alpha()).then_some(Coercion::ToRgb);

        Self {
            path,
            format,
            coercion,
        }
    }

    /// Plan saving `source` to `path`.
    #[must_use]
    pub fn for_image(source: &SourceImage, path: PathBuf) -> Self {
        Self::new(source.format, source.mode(), path)
    }
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
            image.write_with_encoder(encoder).map_err(Error::Encode)?;
        }
        _ => {
            image
                .write_to(&mut Cursor::new(&mut bytes), format)
                .map_err(Error::Encode)?;
        }
    }
    Ok(bytes)
}

/// Write `bytes` to a hidden sibling of `path`, then rename it into place.
fn write_replacing(path: &Path, bytes: &[u8]) -> Result<()> {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    let partial = path.with_file_name(format!(".{name}.partial"));

    if let Err(e) = fs::write(&partial, bytes).and_then(|()| fs::rename(&partial, path)) {
        let _ = fs::remove_file(&partial);
        return Err(e.into());
    }
    Ok(())
}

/// Encode `image` according to `plan` and write it out.
///
/// The destination is only replaced once encoding and writing have both
/// succeeded.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the format cannot be determined or the
/// encoder rejects the image, and [`Error::Io`] if the destination cannot be
/// written (missing parent directory, permissions, full disk).
pub fn save_image(image: DynamicImage, plan: &SavePlan) -> Result<()> {
    let image = match plan.coercion {
        Some(Coercion::ToRgb) => DynamicImage::ImageRgb8(image.to_rgb8()),
        None => image,
    };
    let format = match plan.format {
        Some(format) => format,
        None => ImageFormat::from_path(&plan.path).map_err(Error::Encode)?,
    };

    let bytes = encode(&image, format)?;
    write_replacing(&plan.path, &bytes)?;

    info!(path = %plan.path.display(), ?format, "Saved processed image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(format: Option<ImageFormat>, mode: PixelMode, path: &str) -> SavePlan {
        SavePlan::new(format, mode, PathBuf::from(path))
    }

    #[test]
    fn source_format_wins_over_extension() {
        let p = plan(Some(ImageFormat::Png), PixelMode::Rgba, "/out/b.jpg");
        assert_eq!(p.format, Some(ImageFormat::Png));
        assert_eq!(p.coercion, None);
    }

    #[test]
    fn extension_decides_when_source_format_unknown() {
        assert_eq!(plan(None, PixelMode::Rgb, "x.JPG").format, Some(ImageFormat::Jpeg));
        assert_eq!(plan(None, PixelMode::Rgb, "x.jpeg").format, Some(ImageFormat::Jpeg));
        assert_eq!(plan(None, PixelMode::Rgb, "x.png").format, Some(ImageFormat::Png));
        assert_eq!(plan(None, PixelMode::Rgb, "x").format, None);
        assert_eq!(plan(None, PixelMode::Rgb, "x.xyz").format, None);
    }

    #[test]
    fn jpeg_with_alpha_is_coerced() {
        let rgba = plan(Some(ImageFormat::Jpeg), PixelMode::Rgba, "a.jpg");
        assert_eq!(rgba.coercion, Some(Coercion::ToRgb));
        let la = plan(None, PixelMode::La, "a.jpg");
        assert_eq!(la.coercion, Some(Coercion::ToRgb));
    }

    #[test]
    fn jpeg_without_alpha_is_not_coerced() {
        assert_eq!(plan(Some(ImageFormat::Jpeg), PixelMode::L, "a.jpg").coercion, None);
        assert_eq!(plan(Some(ImageFormat::Jpeg), PixelMode::Rgb, "a.jpg").coercion, None);
    }

    #[test]
    fn saves_jpeg_source_rgba_as_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let p = SavePlan::new(Some(ImageFormat::Jpeg), PixelMode::Rgba, path.clone());

        save_image(DynamicImage::new_rgba8(10, 6), &p).unwrap();

        let reopened = image::open(&path).unwrap();
        assert_eq!(PixelMode::of(&reopened), PixelMode::Rgb);
        assert_eq!((reopened.width(), reopened.height()), (10, 6));
    }

    #[test]
    fn saves_png_source_rgba_with_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let p = SavePlan::new(Some(ImageFormat::Png), PixelMode::Rgba, path.clone());

        save_image(DynamicImage::new_rgba8(7, 9), &p).unwrap();

        let reopened = image::open(&path).unwrap();
        assert_eq!(PixelMode::of(&reopened), PixelMode::Rgba);
        assert_eq!((reopened.width(), reopened.height()), (7, 9));
    }

    #[test]
    fn missing_parent_is_io_error_and_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let p = SavePlan::new(Some(ImageFormat::Png), PixelMode::Rgb, path.clone());

        let err = save_image(DynamicImage::new_rgb8(4, 4), &p).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!path.exists());
    }

    #[test]
    fn unknown_format_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xyz");
        let p = SavePlan::new(None, PixelMode::Rgb, path.clone());

        let err = save_image(DynamicImage::new_rgb8(4, 4), &p).unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
        assert!(!path.exists());
    }

    #[test]
    fn overwrite_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let p = SavePlan::new(None, PixelMode::Rgb, path.clone());

        save_image(DynamicImage::new_rgb8(4, 4), &p).unwrap();
        save_image(DynamicImage::new_rgb8(8, 2), &p).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.png")]);
        assert_eq!(image::image_dimensions(&path).unwrap(), (8, 2));
    }
}
