//! Decoding of encoded logos.
//!
//! Decoding is the one suspension point of the crate: it runs on the
//! blocking pool of the tokio runtime.  Sampling itself stays
//! synchronous.

use tokio::runtime::Handle;
use tracing::debug;
use crate::error::{ImageReadError, ThemeError};
use crate::extract::{lookup, Bitmap, PixelSource, ThemeExtractor};
use crate::palettes::{Overrides, PaletteCache};
use crate::palettes::ty::Palette;

/// An image, decoded or not.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// Ready to sample.
    Decoded(Bitmap),
    /// PNG, JPEG, GIF or WebP bytes.
    Encoded(Vec<u8>),
}

impl From<Bitmap> for ImageSource {
    fn from(b: Bitmap) -> Self { ImageSource::Decoded(b) }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self { ImageSource::Encoded(bytes) }
}

impl ImageSource {
    /// The decoded bitmap.  Returns at once for [`ImageSource::Decoded`].
    ///
    /// Decoding encoded bytes needs a tokio runtime; polled outside of
    /// one, this fails with [`ImageReadError::Unavailable`].
    pub async fn load(self) -> Result<Bitmap, ImageReadError> {
        match self {
            ImageSource::Decoded(bitmap) => Ok(bitmap),
            ImageSource::Encoded(bytes) => {
                let handle = Handle::try_current()
                    .map_err(|e| ImageReadError::Unavailable(e.to_string()))?;
                handle.spawn_blocking(move || decode(&bytes))
                    .await
                    .map_err(|e| ImageReadError::Decode(e.to_string()))?
            }
        }
    }
}

fn decode(bytes: &[u8]) -> Result<Bitmap, ImageReadError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ImageReadError::Decode(e.to_string()))?;
    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    debug!(width, height, "decoded image");
    Bitmap::from_rgba_bytes(width, height, rgba.as_raw())
}

impl ThemeExtractor {
    /// Decode `source` if needed and extract its palette.  A decoding
    /// failure yields [`FALLBACK`](crate::FALLBACK).
    pub async fn extract_source(&self, source: ImageSource) -> Palette {
        match source.load().await {
            Ok(bitmap) => self.extract(&bitmap),
            Err(e) => self.extract_read(Err(e)),
        }
    }

    /// Asynchronous [`ThemeExtractor::resolve`]: `source` is only
    /// decoded when neither `overrides` nor `cache` know `identifier`.
    pub async fn resolve_source<C: PaletteCache + ?Sized>(
        &self, identifier: &str, source: Option<ImageSource>,
        overrides: &Overrides, cache: &mut C) -> Result<Palette, ThemeError> {
        if let Some(p) = lookup(identifier, overrides, cache) { return Ok(p) }
        let source = source
            .ok_or_else(|| ThemeError::MissingSource(identifier.to_string()))?;
        let palette = match source.load().await {
            Ok(bitmap) => self.extract_into(identifier, bitmap.read_pixels(), cache),
            Err(e) => self.extract_into(identifier, Err(e), cache),
        };
        Ok(palette)
    }
}

/// Decode `bytes` and extract their palette with the default options.
pub async fn extract_encoded(bytes: Vec<u8>) -> Palette {
    ThemeExtractor::default().extract_source(ImageSource::Encoded(bytes)).await
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;
    use image::{ImageFormat, Rgba, RgbaImage};
    use rgb::RGB8;
    use crate::{extract_palette, FALLBACK};

    fn two_tone() -> RgbaImage {
        RgbaImage::from_fn(20, 10, |x, _| {
            if x < 12 { Rgba([220, 60, 60, 255]) } else { Rgba([40, 200, 40, 255]) }
        })
    }

    fn png(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn png_matches_bitmap() {
        let img = two_tone();
        let bitmap = Bitmap::from_rgba_bytes(20, 10, img.as_raw()).unwrap();
        let p = extract_encoded(png(&img)).await;
        assert_eq!(p, extract_palette(&bitmap));
        assert_eq!(p.primary(), RGB8::new(216, 48, 48));
        assert_eq!(p.secondary(), RGB8::new(24, 192, 24));
    }

    #[tokio::test]
    async fn decoded_source_is_returned_as_is() {
        let bitmap = Bitmap::from_rgba_bytes(20, 10, two_tone().as_raw()).unwrap();
        let loaded = ImageSource::from(bitmap.clone()).load().await.unwrap();
        assert_eq!(loaded, bitmap);
    }

    #[tokio::test]
    async fn garbage_falls_back() {
        assert_eq!(extract_encoded(b"not an image".to_vec()).await, FALLBACK);
        let err = ImageSource::from(Vec::<u8>::new()).load().await;
        assert!(matches!(err, Err(ImageReadError::Decode(_))));
    }

    #[test]
    fn decoding_without_runtime_falls_back() {
        use futures::executor::block_on;
        let err = block_on(ImageSource::from(png(&two_tone())).load());
        assert!(matches!(err, Err(ImageReadError::Unavailable(_))));
        assert_eq!(block_on(extract_encoded(png(&two_tone()))), FALLBACK);
        let bitmap = Bitmap::filled(2, 2, rgb::RGBA8::new(1, 2, 3, 255)).unwrap();
        assert_eq!(block_on(ImageSource::from(bitmap.clone()).load()).unwrap(),
                   bitmap);
    }

    #[tokio::test]
    async fn cached_palette_skips_decoding() {
        let cached = Palette::derive(RGB8::new(0, 96, 48), None);
        let mut cache = HashMap::new();
        cache.insert("Lakeside".to_string(), cached);
        // Garbage would decode to the fallback palette.
        let p = ThemeExtractor::default()
            .resolve_source("Lakeside", Some(b"garbage".to_vec().into()),
                            &Overrides::new(), &mut cache)
            .await.unwrap();
        assert_eq!(p, cached);
    }

    #[tokio::test]
    async fn decoded_palette_is_cached() {
        let mut cache: HashMap<String, Palette> = HashMap::new();
        let x = ThemeExtractor::default();
        let p = x.resolve_source("Lakeside", Some(png(&two_tone()).into()),
                                 &Overrides::new(), &mut cache)
            .await.unwrap();
        assert_eq!(cache.get("Lakeside"), Some(&p));

        let q = x.resolve_source("Elsewhere", Some(b"garbage".to_vec().into()),
                                 &Overrides::new(), &mut cache)
            .await.unwrap();
        assert_eq!(q, FALLBACK);
        assert_eq!(cache.get("Elsewhere"), Some(&FALLBACK));

        let missing = x.resolve_source("Nowhere", None, &Overrides::new(),
                                       &mut cache).await;
        assert!(matches!(missing, Err(ThemeError::MissingSource(_))));
    }
}
