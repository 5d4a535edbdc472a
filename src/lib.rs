//! Color themes derived from logos.
//!
//! - [`extract_palette`] samples a bitmap and derives a [`Palette`].
//! - [`resolve_palette`] consults an [`Overrides`] table and a
//!   [`PaletteCache`] before sampling.
//! - [`palette_to_style_rules`] renders a palette as a scoped block of
//!   style rules.
//!
//! Encoded images (PNG, JPEG, …) go through [`ImageSource`], whose
//! decoding runs off the async executor.
//!
//! ```
//! use rgb::{RGB8, RGBA8};
//! use college_theme::{extract_palette, Bitmap};
//! let logo = Bitmap::filled(16, 16, RGBA8::new(200, 50, 50, 255)).unwrap();
//! let palette = extract_palette(&logo);
//! assert_eq!(palette.primary(), RGB8::new(192, 48, 48));
//! assert_eq!(palette.text_color(), RGB8::new(255, 255, 255));
//! ```

use rgb::{RGBA, RGB8, RGB16, RGBA8, RGBA16, alt::BGRA8};

mod config;
mod decode;
mod error;
mod extract;
mod palettes;
mod style;

pub use config::{ExtractOptions, ThemeConfig};
pub use decode::{extract_encoded, ImageSource};
pub use error::{ImageReadError, Result, ThemeError};
pub use extract::{extract_palette, resolve_palette, Bitmap, PixelSource,
                  ThemeExtractor};
pub use palettes::{KeyValueStore, Overrides, PaletteCache, StorageCache,
                   FALLBACK};
pub use palettes::ty::{parse_hex, to_hex, Palette};
pub use style::{palette_to_style_rules, scope_slug};

/// Ratio used for both [`Palette::primary_dark`] and
/// [`Palette::primary_light`].
pub const SHADE_RATIO: f64 = 0.2;

/// Per channel shift applied to the primary color when no sampled
/// color is far enough from it to serve as secondary.
pub const SECONDARY_SHIFT: u8 = 50;

/// Luminance above which text drawn on a color should be black.
pub const TEXT_LUMINANCE_THRESHOLD: f64 = 128.;

pub const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };
pub const WHITE: RGB8 = RGB8 { r: 255, g: 255, b: 255 };

/// Pixel encodings the extractor can sample.
pub trait RGBColor: Copy {
    /// Return the color as 8 bit red, green, blue and alpha.
    fn to_rgba8(&self) -> RGBA8;

    /// Perceived luminance in \[0, 255\] (alpha is ignored).
    ///
    /// ```
    /// use rgb::RGB8;
    /// use college_theme::RGBColor;
    /// assert_eq!(RGB8::new(255, 255, 255).luminance().round(), 255.);
    /// ```
    fn luminance(&self) -> f64 {
        let RGBA { r, g, b, .. } = self.to_rgba8();
        0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)
    }
}

impl RGBColor for RGB8 {
    #[inline]
    fn to_rgba8(&self) -> RGBA8 { RGBA8 { r: self.r, g: self.g, b: self.b, a: 255 } }
}

impl RGBColor for RGBA8 {
    #[inline]
    fn to_rgba8(&self) -> RGBA8 { *self }
}

impl RGBColor for BGRA8 {
    #[inline]
    fn to_rgba8(&self) -> RGBA8 {
        RGBA8 { r: self.r, g: self.g, b: self.b, a: self.a }
    }
}

// 16 bit channels keep their high byte.
impl RGBColor for RGB16 {
    #[inline]
    fn to_rgba8(&self) -> RGBA8 {
        RGBA8 { r: (self.r >> 8) as u8, g: (self.g >> 8) as u8,
                b: (self.b >> 8) as u8, a: 255 }
    }
}

impl RGBColor for RGBA16 {
    #[inline]
    fn to_rgba8(&self) -> RGBA8 {
        RGBA8 { r: (self.r >> 8) as u8, g: (self.g >> 8) as u8,
                b: (self.b >> 8) as u8, a: (self.a >> 8) as u8 }
    }
}

#[inline]
fn channel(x: f64) -> u8 { x.round().clamp(0., 255.) as u8 }

/// Euclidean distance between two colors in RGB space.
pub fn color_distance(c0: RGB8, c1: RGB8) -> f64 {
    let dr = f64::from(c0.r) - f64::from(c1.r);
    let dg = f64::from(c0.g) - f64::from(c1.g);
    let db = f64::from(c0.b) - f64::from(c1.b);
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Scale every channel by `1 - ratio`.
///
/// ```
/// use rgb::RGB8;
/// assert_eq!(college_theme::darken(RGB8::new(100, 0, 255), 0.2),
///            RGB8::new(80, 0, 204));
/// ```
pub fn darken(c: RGB8, ratio: f64) -> RGB8 {
    let k = 1. - ratio;
    RGB8 { r: channel(f64::from(c.r) * k), g: channel(f64::from(c.g) * k),
           b: channel(f64::from(c.b) * k) }
}

/// Move every channel `ratio` of the way towards 255.
pub fn lighten(c: RGB8, ratio: f64) -> RGB8 {
    let up = |x: u8| { let x = f64::from(x); channel(x + (255. - x) * ratio) };
    RGB8 { r: up(c.r), g: up(c.g), b: up(c.b) }
}

/// Black or white, whichever reads better on `c`.
pub fn contrast_text(c: RGB8) -> RGB8 {
    if c.luminance() > TEXT_LUMINANCE_THRESHOLD { BLACK } else { WHITE }
}

/// Shift each channel by `amount` away from the middle of its range:
/// down for channels above 127, up otherwise.  Saturates at 0 and 255.
pub fn shift_from_mid(c: RGB8, amount: u8) -> RGB8 {
    let shift = |x: u8| {
        if x > 127 { x.saturating_sub(amount) } else { x.saturating_add(amount) }
    };
    RGB8 { r: shift(c.r), g: shift(c.g), b: shift(c.b) }
}
