//! Error types for the shrimp-watermark crate.

use std::path::PathBuf;

/// Errors that can occur while watermarking an image.
///
/// Font loading never appears here: a missing font degrades to the built-in
/// face instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input path does not point at an existing regular file.
    #[error("file not found: {}", .0.display())]
    NotAFile(PathBuf),

    /// The source bytes are not a recognised image.
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The encoder rejected the image or the requested format.
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let missing = Error::NotAFile(PathBuf::from("/tmp/missing.png"));
        assert!(missing.to_string().contains("/tmp/missing.png"));

        let decode = Error::Decode(image::ImageError::Unsupported(
            image::error::UnsupportedError::from_format_and_kind(
                image::error::ImageFormatHint::Unknown,
                image::error::UnsupportedErrorKind::Format(image::error::ImageFormatHint::Unknown),
            ),
        ));
        assert!(decode.to_string().starts_with("failed to decode image"));
    }

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(Error::Io(_))));
    }
}
