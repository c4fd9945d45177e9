//! Font resolution with a guaranteed bundled fallback.
//!
//! A [`FontResolver`] walks an ordered list of [`FontSource`]s and uses the
//! first one that loads for both watermark sizes. When none load, both sizes
//! fall back to the font bundled with the crate and the degraded mode is
//! reported through [`FontPair::is_fallback`] and a `WARN` log line.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::{DynamicImage, Rgba};
use imageproc::drawing::draw_text_mut;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Font files tried by [`FontResolver::new`], highest priority first.
pub const DEFAULT_CANDIDATES: [&str; 3] = ["times.ttf", "arial.ttf", "DejaVuSans.ttf"];

/// Platform font directories searched for candidate file names.
const FONT_DIRS: [&str; 5] = [
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// Directory depth limit for font lookups (e.g. `truetype/dejavu/DejaVuSans.ttf`).
const SEARCH_DEPTH: usize = 5;

/// A candidate font that may or may not be available.
pub trait FontSource {
    /// Human-readable name for logs.
    fn name(&self) -> String;

    /// Load the font, or `None` if it is missing or unparseable.
    fn load(&self) -> Option<FontArc>;
}

/// A font file looked up by path, then by file name under font directories.
#[derive(Debug, Clone)]
pub struct SystemFont {
    file_name: PathBuf,
    search_dirs: Vec<PathBuf>,
}

impl SystemFont {
    /// Look for `file_name` as given, then under the platform font directories.
    #[must_use]
    pub fn new(file_name: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            search_dirs: FONT_DIRS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Replace the directories searched when the file name is not a direct path.
    #[must_use]
    pub fn with_search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_dirs = dirs;
        self
    }

    fn locate(&self) -> Option<PathBuf> {
        if self.file_name.is_file() {
            return Some(self.file_name.clone());
        }

        let wanted = self.file_name.file_name()?.to_string_lossy().to_lowercase();
        self.search_dirs
            .iter()
            .filter(|dir| dir.is_dir())
            .find_map(|dir| find_in_dir(dir, &wanted))
    }
}

fn find_in_dir(dir: &Path, wanted: &str) -> Option<PathBuf> {
    WalkDir::new(dir)
        .max_depth(SEARCH_DEPTH)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .find(|entry| {
            entry.file_type().is_file() && entry.file_name().to_string_lossy().to_lowercase() == wanted
        })
        .map(walkdir::DirEntry::into_path)
}

impl FontSource for SystemFont {
    fn name(&self) -> String {
        self.file_name.display().to_string()
    }

    fn load(&self) -> Option<FontArc> {
        let path = self.locate()?;
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Failed to read font file");
                return None;
            }
        };
        match FontArc::try_from_vec(data) {
            Ok(font) => Some(font),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Font file is not a usable font");
                None
            }
        }
    }
}

/// Font bundled with the crate: DejaVu Sans Mono, under the DejaVu fonts licence.
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");

static EMBEDDED_FONT: OnceLock<FontArc> = OnceLock::new();

/// The bundled fallback font, parsed on first use.
///
/// # Panics
///
/// Panics if the bundled font data cannot be parsed, which would mean the
/// crate was built with a corrupted font file.
#[must_use]
pub fn embedded_font() -> FontArc {
    EMBEDDED_FONT
        .get_or_init(|| {
            FontArc::try_from_slice(EMBEDDED_FONT_DATA).expect("Failed to load embedded font - this is a bug")
        })
        .clone()
}

/// A font resolved at a fixed pixel size, able to measure and draw text.
#[derive(Debug, Clone)]
pub struct WatermarkFont {
    font: FontArc,
    size: u32,
    fallback: bool,
}

impl WatermarkFont {
    /// Wrap a loaded outline font at `size` pixels.
    #[must_use]
    pub fn outline(font: FontArc, size: u32) -> Self {
        Self {
            font,
            size,
            fallback: false,
        }
    }

    /// The bundled fallback font at `size` pixels.
    #[must_use]
    pub fn embedded(size: u32) -> Self {
        Self {
            font: embedded_font(),
            size,
            fallback: true,
        }
    }

    /// Requested size in pixels.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether this is the bundled fallback font.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    #[allow(clippy::cast_precision_loss)]
    fn scale(&self) -> PxScale {
        PxScale::from(self.size as f32)
    }

    /// Width and line-box height of `text`, in pixels.
    ///
    /// The width is the pen advance (kerning included). The height spans the
    /// font's ascent line to its descent line, so a line drawn at `y`
    /// occupies `y..y + height` whatever glyphs it contains.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn measure(&self, text: &str) -> (u32, u32) {
        let scaled = self.font.as_scaled(self.scale());

        let mut width = 0.0f32;
        let mut prev: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }

        let height = scaled.ascent() - scaled.descent();
        (width.max(0.0).ceil() as u32, height.max(0.0).ceil() as u32)
    }

    /// Draw `text` with the top-left of its line box at `(x, y)`.
    ///
    /// The font's ascent line lands on `y`. Pixels falling outside the canvas
    /// are dropped.
    pub fn draw(&self, canvas: &mut DynamicImage, color: Rgba<u8>, x: i32, y: i32, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale(), &self.font, text);
    }
}

/// Fonts for the two watermark lines.
#[derive(Debug, Clone)]
pub struct FontPair {
    /// Font for the top line.
    pub large: WatermarkFont,
    /// Font for the bottom line.
    pub small: WatermarkFont,
}

impl FontPair {
    /// Both slots filled with the bundled font.
    #[must_use]
    pub fn fallback(small_size: u32, large_size: u32) -> Self {
        Self {
            large: WatermarkFont::embedded(large_size),
            small: WatermarkFont::embedded(small_size),
        }
    }

    /// Whether the resolver had to fall back to the bundled font.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.large.is_fallback() || self.small.is_fallback()
    }
}

/// Ordered font candidates with a bundled fallback. Never fails.
pub struct FontResolver {
    sources: Vec<Box<dyn FontSource>>,
}

impl FontResolver {
    /// Resolver over [`DEFAULT_CANDIDATES`] in the platform font directories.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sources(
            DEFAULT_CANDIDATES
                .iter()
                .map(|name| Box::new(SystemFont::new(*name)) as Box<dyn FontSource>)
                .collect(),
        )
    }

    /// Resolver over an explicit candidate list, highest priority first.
    #[must_use]
    pub fn with_sources(sources: Vec<Box<dyn FontSource>>) -> Self {
        Self { sources }
    }

    /// Resolver with no candidates; always yields the bundled font.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_sources(Vec::new())
    }

    /// Try `source` before every existing candidate.
    #[must_use]
    pub fn prepend(mut self, source: impl FontSource + 'static) -> Self {
        self.sources.insert(0, Box::new(source));
        self
    }

    /// Names of the candidates, in the order they are tried.
    #[must_use]
    pub fn candidate_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Resolve the large and small watermark fonts.
    ///
    /// The first candidate that loads is used for both sizes.
    #[must_use]
    pub fn resolve(&self, small_size: u32, large_size: u32) -> FontPair {
        for source in &self.sources {
            if let Some(font) = source.load() {
                debug!(font = %source.name(), small_size, large_size, "Loaded watermark font");
                return FontPair {
                    large: WatermarkFont::outline(font.clone(), large_size),
                    small: WatermarkFont::outline(font, small_size),
                };
            }
        }

        warn!("Could not load TTF font; using bundled fallback font");
        FontPair::fallback(small_size, large_size)
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FontResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontResolver")
            .field("sources", &self.candidate_names())
            .finish()
    }
}
