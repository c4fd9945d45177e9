//! Output path resolution.
//!
//! Pure path arithmetic: the only filesystem access is checking whether the
//! requested target is an existing directory.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Tag appended to the original file stem for derived output names.
pub const OUTPUT_TAG: &str = "_Shrimp";

/// Where the caller asked for the output to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// No target: save next to the original.
    Default,
    /// An existing directory: save inside it under the derived name.
    Directory(PathBuf),
    /// Anything else is treated as a file path.
    File(PathBuf),
}

impl OutputTarget {
    /// Classify an optional, user-supplied target. An empty path counts as absent.
    #[must_use]
    pub fn classify(target: Option<&Path>) -> Self {
        match target {
            None => Self::Default,
            Some(path) if path.as_os_str().is_empty() => Self::Default,
            Some(path) if path.is_dir() => Self::Directory(path.to_path_buf()),
            Some(path) => Self::File(path.to_path_buf()),
        }
    }
}

fn non_empty_extension(path: &Path) -> Option<&OsStr> {
    path.extension().filter(|ext| !ext.is_empty())
}

/// Split a file name into stem and extension.
///
/// A trailing dot does not start an extension: `"b."` is all stem.
fn stem_and_extension(path: &Path) -> (&OsStr, Option<&OsStr>) {
    match non_empty_extension(path) {
        Some(ext) => (path.file_stem().unwrap_or_default(), Some(ext)),
        None => (path.file_name().unwrap_or_default(), None),
    }
}

/// `{stem}_Shrimp{suffix}` for `original`, keeping its extension if it has one.
///
/// Example: `"photo.jpg"` becomes `"photo_Shrimp.jpg"`.
#[must_use]
pub fn tagged_file_name(original: &Path) -> String {
    let (stem, ext) = stem_and_extension(original);
    let stem = stem.to_string_lossy();
    match ext {
        Some(ext) => format!("{stem}{OUTPUT_TAG}.{}", ext.to_string_lossy()),
        None => format!("{stem}{OUTPUT_TAG}"),
    }
}

/// Append `.{ext}` to the whole file name of `path`, trailing dot included.
fn append_extension(path: &Path, ext: &OsStr) -> PathBuf {
    let (stem, _) = stem_and_extension(path);
    let mut name = OsString::from(stem);
    name.push(".");
    name.push(ext);
    path.with_file_name(name)
}

/// The tagged file name in the original's own directory.
#[must_use]
pub fn default_output_path(original: &Path) -> PathBuf {
    let parent = original.parent().unwrap_or(Path::new(""));
    parent.join(tagged_file_name(original))
}

/// Compute where the processed image for `original` is saved.
///
/// - no target: [`default_output_path`]
/// - existing directory: the tagged file name inside it
/// - path with an extension: used verbatim
/// - path without an extension: the original's extension is appended, so
///   `"b."` becomes `"b..png"` for a PNG original
#[must_use]
pub fn resolve_output_path(original: &Path, target: Option<&Path>) -> PathBuf {
    match OutputTarget::classify(target) {
        OutputTarget::Default => default_output_path(original),
        OutputTarget::Directory(dir) => dir.join(tagged_file_name(original)),
        OutputTarget::File(path) if non_empty_extension(&path).is_some() => path,
        OutputTarget::File(path) => match non_empty_extension(original) {
            Some(ext) => append_extension(&path, ext),
            None => path,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_target_tags_stem_next_to_original() {
        assert_eq!(
            resolve_output_path(Path::new("/tmp/a.png"), None),
            PathBuf::from("/tmp/a_Shrimp.png")
        );
        assert_eq!(
            resolve_output_path(Path::new("a.png"), None),
            PathBuf::from("a_Shrimp.png")
        );
    }

    #[test]
    fn empty_target_counts_as_absent() {
        assert_eq!(
            resolve_output_path(Path::new("/tmp/a.png"), Some(Path::new(""))),
            PathBuf::from("/tmp/a_Shrimp.png")
        );
    }

    #[test]
    fn original_without_extension_gets_no_dot() {
        assert_eq!(
            resolve_output_path(Path::new("/tmp/scan"), None),
            PathBuf::from("/tmp/scan_Shrimp")
        );
        assert_eq!(
            resolve_output_path(Path::new("/tmp/scan"), Some(Path::new("/out/b"))),
            PathBuf::from("/out/b")
        );
    }

    #[test]
    fn existing_directory_uses_original_name() {
        let dir = tempfile::tempdir().unwrap();
        let out = resolve_output_path(Path::new("/tmp/a.png"), Some(dir.path()));
        assert_eq!(out, dir.path().join("a_Shrimp.png"));
    }

    #[test]
    fn file_target_with_extension_is_verbatim() {
        assert_eq!(
            resolve_output_path(Path::new("/tmp/a.png"), Some(Path::new("/out/b.jpg"))),
            PathBuf::from("/out/b.jpg")
        );
    }

    #[test]
    fn file_target_without_extension_borrows_original() {
        assert_eq!(
            resolve_output_path(Path::new("/tmp/a.png"), Some(Path::new("/out/b"))),
            PathBuf::from("/out/b.png")
        );
    }

    #[test]
    fn trailing_dot_is_part_of_the_stem() {
        assert_eq!(
            resolve_output_path(Path::new("/tmp/a.png"), Some(Path::new("/out/b."))),
            PathBuf::from("/out/b..png")
        );
        assert_eq!(
            resolve_output_path(Path::new("/tmp/a."), None),
            PathBuf::from("/tmp/a._Shrimp")
        );
        assert_eq!(
            resolve_output_path(Path::new("/tmp/a."), Some(Path::new("/out/b"))),
            PathBuf::from("/out/b")
        );
        assert_eq!(tagged_file_name(Path::new(".hidden")), ".hidden_Shrimp");
    }

    #[test]
    fn classify_distinguishes_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(OutputTarget::classify(None), OutputTarget::Default);
        assert_eq!(
            OutputTarget::classify(Some(dir.path())),
            OutputTarget::Directory(dir.path().to_path_buf())
        );
        let missing = dir.path().join("not-yet");
        assert_eq!(
            OutputTarget::classify(Some(&missing)),
            OutputTarget::File(missing)
        );
    }

    #[test]
    fn default_path_is_stable_across_runs() {
        let first = resolve_output_path(Path::new("/tmp/a.png"), None);
        let second = resolve_output_path(Path::new("/tmp/a.png"), None);
        assert_eq!(first, second);
    }
}
