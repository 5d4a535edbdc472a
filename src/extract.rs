//! Dominant color sampling.

use std::borrow::Cow;
use std::collections::HashMap;
use rgb::{RGB8, RGBA8};
use tracing::{debug, warn};
use crate::config::ExtractOptions;
use crate::error::{ImageReadError, ThemeError};
use crate::palettes::{Overrides, PaletteCache, FALLBACK};
use crate::palettes::ty::{to_hex, Palette};
use crate::{color_distance, RGBColor};

/// A decoded image: `width × height` RGBA pixels, row major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<RGBA8>, // Invariant: len == width * height > 0
}

impl Bitmap {
    pub fn new(width: u32, height: u32, pixels: Vec<RGBA8>)
               -> Result<Self, ImageReadError> {
        if width == 0 || height == 0 { return Err(ImageReadError::Empty) }
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(ImageReadError::Truncated { expected,
                                                  actual: pixels.len() })
        }
        Ok(Bitmap { width, height, pixels })
    }

    /// Build a bitmap from packed RGBA bytes (4 bytes per pixel).
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8])
                           -> Result<Self, ImageReadError> {
        if width == 0 || height == 0 { return Err(ImageReadError::Empty) }
        let expected = pixel_count(width, height)?;
        if expected.checked_mul(4) != Some(bytes.len()) {
            return Err(ImageReadError::Truncated { expected,
                                                  actual: bytes.len() / 4 })
        }
        let pixels = bytes.chunks_exact(4)
            .map(|c| RGBA8 { r: c[0], g: c[1], b: c[2], a: c[3] })
            .collect();
        Self::new(width, height, pixels)
    }

    /// A bitmap of a single color.
    pub fn filled(width: u32, height: u32, color: RGBA8)
                  -> Result<Self, ImageReadError> {
        if width == 0 || height == 0 { return Err(ImageReadError::Empty) }
        Self::new(width, height, vec![color; pixel_count(width, height)?])
    }

    pub fn width(&self) -> u32 { self.width }

    pub fn height(&self) -> u32 { self.height }

    pub fn pixels(&self) -> &[RGBA8] { &self.pixels }
}

/// `width * height`, or `Truncated` if that does not fit in memory.
fn pixel_count(width: u32, height: u32) -> Result<usize, ImageReadError> {
    let n = (width as usize).saturating_mul(height as usize);
    if n > isize::MAX as usize / 4 {
        return Err(ImageReadError::Truncated { expected: n, actual: 0 })
    }
    Ok(n)
}

/// Anything whose pixels can be read, possibly failing (an image
/// whose data is not accessible, for instance).
pub trait PixelSource {
    fn read_pixels(&self) -> Result<Cow<'_, [RGBA8]>, ImageReadError>;
}

impl PixelSource for Bitmap {
    fn read_pixels(&self) -> Result<Cow<'_, [RGBA8]>, ImageReadError> {
        Ok(Cow::Borrowed(&self.pixels))
    }
}

impl<P: RGBColor> PixelSource for [P] {
    fn read_pixels(&self) -> Result<Cow<'_, [RGBA8]>, ImageReadError> {
        if self.is_empty() { return Err(ImageReadError::Empty) }
        Ok(Cow::Owned(self.iter().map(RGBColor::to_rgba8).collect()))
    }
}

impl<P: RGBColor> PixelSource for Vec<P> {
    fn read_pixels(&self) -> Result<Cow<'_, [RGBA8]>, ImageReadError> {
        self.as_slice().read_pixels()
    }
}

/// Derives palettes from images.
///
/// The extractor holds no state besides its [`ExtractOptions`]; the
/// override table and the cache are passed to each call.
#[derive(Clone, Debug, Default)]
pub struct ThemeExtractor {
    options: ExtractOptions,
}

impl ThemeExtractor {
    /// Extractor with custom options.  Fails if the options do not
    /// [validate](ExtractOptions::validate).
    pub fn new(options: ExtractOptions) -> Result<Self, ThemeError> {
        options.validate()?;
        Ok(ThemeExtractor { options })
    }

    pub fn options(&self) -> &ExtractOptions { &self.options }

    /// Palette of `image`, or [`FALLBACK`] if its pixels cannot be read.
    pub fn extract<S: PixelSource + ?Sized>(&self, image: &S) -> Palette {
        self.extract_read(image.read_pixels())
    }

    pub(crate) fn extract_read(
        &self, read: Result<Cow<'_, [RGBA8]>, ImageReadError>) -> Palette {
        match read {
            Ok(pixels) => self.extract_pixels(&*pixels),
            Err(e) => {
                warn!(error = %e, "cannot read pixels, using fallback palette");
                FALLBACK
            }
        }
    }

    /// Palette of a pixel buffer.
    ///
    /// The most frequent qualifying color is the primary; the next
    /// most frequent one far enough from it is the secondary.  An empty
    /// buffer yields [`FALLBACK`], as for an unreadable image.
    pub fn extract_pixels<P: RGBColor>(&self, pixels: &[P]) -> Palette {
        if pixels.is_empty() {
            return self.extract_read(Err(ImageReadError::Empty))
        }
        let ranked = self.rank_colors(pixels);
        let primary = ranked.first().copied()
            .unwrap_or(self.options.default_primary);
        let secondary = ranked.iter().skip(1).copied()
            .find(|&c| color_distance(primary, c) > self.options.min_distance);
        let secondary_hex = secondary.map(to_hex);
        debug!(colors = ranked.len(), primary = %to_hex(primary),
               secondary = ?secondary_hex, "extracted palette");
        Palette::derive(primary, secondary)
    }

    #[inline]
    fn quantize(&self, x: u8) -> u8 {
        x / self.options.bucket * self.options.bucket
    }

    /// Qualifying quantized colors, most frequent first.  Equal counts
    /// keep the order in which the colors were first met.
    fn rank_colors<P: RGBColor>(&self, pixels: &[P]) -> Vec<RGB8> {
        let o = &self.options;
        let mut counts: HashMap<RGB8, (usize, usize)> = HashMap::new();
        for (seen, px) in pixels.iter().step_by(o.stride).enumerate() {
            let RGBA8 { r, g, b, a } = px.to_rgba8();
            if a < o.min_alpha { continue }
            let sum = u16::from(r) + u16::from(g) + u16::from(b);
            if sum < o.min_sum || sum > o.max_sum { continue }
            let c = RGB8 { r: self.quantize(r), g: self.quantize(g),
                           b: self.quantize(b) };
            counts.entry(c).or_insert((0, seen)).0 += 1;
        }
        let mut ranked: Vec<_> = counts.into_iter().collect();
        ranked.sort_by(|(_, (n0, s0)), (_, (n1, s1))| {
            n1.cmp(n0).then(s0.cmp(s1)) });
        ranked.into_iter().map(|(c, _)| c).collect()
    }

    /// Palette of `identifier`.
    ///
    /// An entry of `overrides` wins, then a palette found in `cache`.
    /// Otherwise `image` is sampled and the result stored in `cache`.
    /// Fails with [`ThemeError::MissingSource`] when there is nothing
    /// to go on.  An unreadable image yields [`FALLBACK`], which is
    /// cached like any other result.
    pub fn resolve<C: PaletteCache + ?Sized>(
        &self, identifier: &str, image: Option<&dyn PixelSource>,
        overrides: &Overrides, cache: &mut C) -> Result<Palette, ThemeError> {
        if let Some(p) = lookup(identifier, overrides, cache) { return Ok(p) }
        let image = image
            .ok_or_else(|| ThemeError::MissingSource(identifier.to_string()))?;
        Ok(self.extract_into(identifier, image.read_pixels(), cache))
    }

    pub(crate) fn extract_into<C: PaletteCache + ?Sized>(
        &self, identifier: &str,
        read: Result<Cow<'_, [RGBA8]>, ImageReadError>,
        cache: &mut C) -> Palette {
        let palette = self.extract_read(read);
        cache.set(identifier, palette);
        palette
    }
}

/// Override or cached palette of `identifier`, in that order.
pub(crate) fn lookup<C: PaletteCache + ?Sized>(
    identifier: &str, overrides: &Overrides, cache: &C) -> Option<Palette> {
    if let Some(&p) = overrides.get(identifier) {
        debug!(identifier = %identifier, "using override palette");
        return Some(p)
    }
    let p = cache.get(identifier)?;
    debug!(identifier = %identifier, "using cached palette");
    Some(p)
}

/// [`ThemeExtractor::extract`] with the default options.
pub fn extract_palette<S: PixelSource + ?Sized>(image: &S) -> Palette {
    ThemeExtractor::default().extract(image)
}

/// [`ThemeExtractor::resolve`] with the default options.
pub fn resolve_palette<C: PaletteCache + ?Sized>(
    identifier: &str, image: Option<&dyn PixelSource>,
    overrides: &Overrides, cache: &mut C) -> Result<Palette, ThemeError> {
    ThemeExtractor::default().resolve(identifier, image, overrides, cache)
}
