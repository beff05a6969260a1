//! Glyph atlases for ruler labels.
//!
//! Ruler labels only ever contain digits, a minus sign and a decimal
//! separator, so instead of rasterizing text per frame every glyph is loaded
//! once from a small bitmap font, tinted to the foreground color and cached.

use crate::config::{to_rgb8, Rgb};
use crate::error::{Result, RulerError};
use crate::ticks::Axis;
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Every character a ruler label can contain.
pub const GLYPH_CHARS: &str = ".,-0123456789";

/// Provider of untinted glyph bitmaps. Only the alpha channel is used.
pub trait GlyphSource {
    fn load_glyph(&self, font_size: u32, orientation: Axis, ch: char) -> Result<RgbaImage>;
}

/// Reads glyphs from `<resource_dir>/fonts/ruler-font{N}px/`.
///
/// Horizontal glyphs are `h<char>.png`, vertical ones `v<char>.png`, and both
/// separators share `hdot.png` / `vdot.png`.
#[derive(Debug, Clone)]
pub struct FsGlyphSource {
    resource_dir: PathBuf,
}

impl FsGlyphSource {
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
        }
    }

    pub fn font_dir(&self, font_size: u32) -> PathBuf {
        self.resource_dir
            .join("fonts")
            .join(format!("ruler-font{}px", font_size))
    }

    pub fn glyph_path(&self, font_size: u32, orientation: Axis, ch: char) -> PathBuf {
        let prefix = if orientation.is_vertical() { 'v' } else { 'h' };
        let file_name = match ch {
            '.' | ',' => format!("{}dot.png", prefix),
            _ => format!("{}{}.png", prefix, ch),
        };
        self.font_dir(font_size).join(file_name)
    }
}

impl GlyphSource for FsGlyphSource {
    fn load_glyph(&self, font_size: u32, orientation: Axis, ch: char) -> Result<RgbaImage> {
        load_mask(&self.glyph_path(font_size, orientation, ch))
    }
}

/// Decode a PNG asset into RGBA, mapping any failure to an asset error.
pub fn load_mask(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|e| RulerError::AssetLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(image.to_rgba8())
}

/// Paint `fg` through the alpha channel of `mask`.
pub fn tint(mask: &RgbaImage, fg: [u8; 3]) -> RgbaImage {
    let [r, g, b] = fg;
    RgbaImage::from_fn(mask.width(), mask.height(), |x, y| {
        Rgba([r, g, b, mask.get_pixel(x, y)[3]])
    })
}

/// Identifies one tinted atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtlasKey {
    pub font_size: u32,
    pub fg: [u8; 3],
    pub orientation: Axis,
}

impl AtlasKey {
    pub fn new(font_size: u32, fg: Rgb, orientation: Axis) -> Self {
        Self {
            font_size,
            fg: to_rgb8(fg),
            orientation,
        }
    }
}

/// A pre-tinted glyph.
#[derive(Debug, Clone)]
pub struct Glyph {
    /// Width for horizontal glyphs, height for vertical ones.
    pub advance: u32,
    pub bitmap: RgbaImage,
}

/// Tinted glyphs for one orientation.
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    key: AtlasKey,
    glyphs: HashMap<char, Glyph>,
}

impl GlyphAtlas {
    /// Load and tint every glyph in [`GLYPH_CHARS`]. Fails on the first
    /// missing or unreadable asset.
    pub fn load(source: &dyn GlyphSource, key: AtlasKey) -> Result<Self> {
        let mut glyphs = HashMap::with_capacity(GLYPH_CHARS.len());
        for ch in GLYPH_CHARS.chars() {
            let mask = source.load_glyph(key.font_size, key.orientation, ch)?;
            let advance = match key.orientation {
                Axis::Horizontal => mask.width(),
                Axis::Vertical => mask.height(),
            };
            glyphs.insert(
                ch,
                Glyph {
                    advance,
                    bitmap: tint(&mask, key.fg),
                },
            );
        }
        debug!(
            "Loaded {:?} ruler atlas: {}px font, fg {:?}",
            key.orientation, key.font_size, key.fg
        );
        Ok(Self { key, glyphs })
    }

    pub fn key(&self) -> AtlasKey {
        self.key
    }

    pub fn glyph(&self, ch: char) -> Result<&Glyph> {
        self.glyphs.get(&ch).ok_or(RulerError::UnknownGlyph(ch))
    }

    /// Total advance of `text` along the ruler axis.
    pub fn text_advance(&self, text: &str) -> Result<u32> {
        text.chars().map(|ch| self.glyph(ch).map(|g| g.advance)).sum()
    }
}

/// Owner of the tinted atlases shared by all rulers.
///
/// Atlases are handed out as `Arc`s; a rebuild swaps in new ones, and a
/// render that still holds an old `Arc` finishes on that snapshot.
pub struct AtlasCache {
    source: Box<dyn GlyphSource>,
    atlases: HashMap<AtlasKey, Arc<GlyphAtlas>>,
}

impl AtlasCache {
    pub fn new(source: impl GlyphSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            atlases: HashMap::new(),
        }
    }

    /// Cache reading assets below `resource_dir`.
    pub fn with_resource_dir(resource_dir: impl Into<PathBuf>) -> Self {
        Self::new(FsGlyphSource::new(resource_dir))
    }

    /// Replace the glyph source and drop every cached atlas.
    pub fn set_source(&mut self, source: impl GlyphSource + 'static) {
        self.source = Box::new(source);
        self.atlases.clear();
    }

    /// Return the atlas for `(font_size, fg, orientation)`, loading it on
    /// first use.
    pub fn get(&mut self, font_size: u32, fg: Rgb, orientation: Axis) -> Result<Arc<GlyphAtlas>> {
        let key = AtlasKey::new(font_size, fg, orientation);
        if let Some(atlas) = self.atlases.get(&key) {
            return Ok(Arc::clone(atlas));
        }
        let atlas = Arc::new(GlyphAtlas::load(self.source.as_ref(), key)?);
        self.atlases.insert(key, Arc::clone(&atlas));
        Ok(atlas)
    }

    /// Already-built atlas, if any.
    pub fn cached(&self, font_size: u32, fg: Rgb, orientation: Axis) -> Option<Arc<GlyphAtlas>> {
        self.atlases
            .get(&AtlasKey::new(font_size, fg, orientation))
            .cloned()
    }

    /// Rebuild both orientations for a new font size or foreground color.
    ///
    /// Both atlases are loaded before anything is replaced; on error the
    /// previously cached atlases stay installed.
    pub fn rebuild(&mut self, font_size: u32, fg: Rgb) -> Result<()> {
        let horizontal = GlyphAtlas::load(
            self.source.as_ref(),
            AtlasKey::new(font_size, fg, Axis::Horizontal),
        )?;
        let vertical = GlyphAtlas::load(
            self.source.as_ref(),
            AtlasKey::new(font_size, fg, Axis::Vertical),
        )?;

        self.atlases.clear();
        for atlas in [horizontal, vertical] {
            self.atlases.insert(atlas.key(), Arc::new(atlas));
        }
        info!(
            "Rebuilt ruler glyph atlases: {}px font, fg {:?}",
            font_size,
            to_rgb8(fg)
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.atlases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atlases.is_empty()
    }
}

impl std::fmt::Debug for AtlasCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasCache")
            .field("atlases", &self.atlases.keys().collect::<Vec<_>>())
            .finish()
    }
}
