//! Fixed palettes, override tables and palette caches.

use std::collections::HashMap;
use rgb::RGB8;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::error::ThemeError;

pub(crate) mod ty;
use ty::Palette;

/// Palette returned whenever pixel data cannot be read.
pub const FALLBACK: Palette = Palette::new(
    RGB8 { r: 0x58, g: 0x65, b: 0xF2 },
    RGB8 { r: 0x4A, g: 0x76, b: 0xA8 },
    RGB8 { r: 0x47, g: 0x52, b: 0xC4 },
    RGB8 { r: 0x6B, g: 0x78, b: 0xF5 },
    RGB8 { r: 0xFF, g: 0xFF, b: 0xFF });

/// Hand-picked palettes keyed by identifier.  An entry bypasses
/// sampling entirely.
///
/// ```
/// use college_theme::Overrides;
/// let o = Overrides::from_json(r##"{ "State U": {
///     "primary": "#BB0000", "secondary": "#666666",
///     "primaryDark": "#960000", "primaryLight": "#C93333",
///     "textColor": "#FFFFFF" } }"##).unwrap();
/// assert!(o.get("State U").is_some());
/// assert!(o.get("state u").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overrides(HashMap<String, Palette>);

impl Overrides {
    pub fn new() -> Self { Self::default() }

    /// Parse a JSON object mapping identifiers to palettes.
    pub fn from_json(s: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Palette registered for `identifier` (exact match).
    pub fn get(&self, identifier: &str) -> Option<&Palette> {
        self.0.get(identifier)
    }

    pub fn insert(&mut self, identifier: impl Into<String>, palette: Palette)
                  -> Option<Palette> {
        self.0.insert(identifier.into(), palette)
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<K: Into<String>> FromIterator<(K, Palette)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (K, Palette)>>(iter: I) -> Self {
        Overrides(iter.into_iter().map(|(k, p)| (k.into(), p)).collect())
    }
}

/// Where resolved palettes are kept between calls.  Last write wins.
pub trait PaletteCache {
    fn get(&self, identifier: &str) -> Option<Palette>;

    fn set(&mut self, identifier: &str, palette: Palette);
}

impl PaletteCache for HashMap<String, Palette> {
    fn get(&self, identifier: &str) -> Option<Palette> {
        HashMap::get(self, identifier).copied()
    }

    fn set(&mut self, identifier: &str, palette: Palette) {
        self.insert(identifier.to_string(), palette);
    }
}

/// A string to string store, such as browser local storage.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&mut self, key: &str, value: String);
}

impl KeyValueStore for HashMap<String, String> {
    fn get_item(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.insert(key.to_string(), value);
    }
}

/// [`PaletteCache`] persisting palettes as JSON under
/// `<identifier>_theme` in a [`KeyValueStore`].
///
/// ```
/// use std::collections::HashMap;
/// use college_theme::{PaletteCache, StorageCache, FALLBACK};
/// let mut cache = StorageCache::new(HashMap::<String, String>::new());
/// cache.set("Lakeside", FALLBACK);
/// assert!(cache.store().contains_key("Lakeside_theme"));
/// assert_eq!(cache.get("Lakeside"), Some(FALLBACK));
/// ```
#[derive(Clone, Debug, Default)]
pub struct StorageCache<S> {
    store: S,
}

impl<S: KeyValueStore> StorageCache<S> {
    pub fn new(store: S) -> Self { StorageCache { store } }

    /// Storage key of the palette of `identifier`.
    pub fn key(identifier: &str) -> String { format!("{identifier}_theme") }

    pub fn store(&self) -> &S { &self.store }

    pub fn into_inner(self) -> S { self.store }
}

impl<S: KeyValueStore> PaletteCache for StorageCache<S> {
    fn get(&self, identifier: &str) -> Option<Palette> {
        let key = Self::key(identifier);
        let raw = self.store.get_item(&key)?;
        match Palette::from_json(&raw) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(key = %key, error = %e, "ignoring unreadable stored theme");
                None
            }
        }
    }

    fn set(&mut self, identifier: &str, palette: Palette) {
        let key = Self::key(identifier);
        match palette.to_json() {
            Ok(json) => {
                debug!(key = %key, "storing theme");
                self.store.set_item(&key, json)
            }
            Err(e) => warn!(key = %key, error = %e, "could not serialize theme"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn crimson() -> Palette { Palette::derive(RGB8::new(168, 24, 48), None) }

    #[test]
    fn fallback_colors() {
        assert_eq!(ty::to_hex(FALLBACK.primary()), "#5865F2");
        assert_eq!(ty::to_hex(FALLBACK.secondary()), "#4A76A8");
        assert_eq!(ty::to_hex(FALLBACK.primary_dark()), "#4752C4");
        assert_eq!(ty::to_hex(FALLBACK.primary_light()), "#6B78F5");
        assert_eq!(ty::to_hex(FALLBACK.text_color()), "#FFFFFF");
    }

    #[test]
    fn overrides_from_iter_and_json() {
        let o: Overrides = [("Crimson College", crimson())].into_iter().collect();
        assert_eq!(o.len(), 1);
        let json = serde_json::to_string(&o).unwrap();
        assert_eq!(Overrides::from_json(&json).unwrap(), o);
        assert!(Overrides::from_json("[1, 2]").is_err());
    }

    #[test]
    fn storage_cache_namespaces_keys() {
        let mut cache = StorageCache::new(HashMap::<String, String>::new());
        assert_eq!(cache.get("Crimson College"), None);
        cache.set("Crimson College", crimson());
        cache.set("Crimson College", FALLBACK);
        let store = cache.store();
        assert_eq!(store.len(), 1);
        let raw = &store["Crimson College_theme"];
        assert_eq!(Palette::from_json(raw).unwrap(), FALLBACK);
        assert_eq!(cache.get("Crimson College"), Some(FALLBACK));
    }

    #[test]
    fn corrupt_storage_is_a_miss() {
        let mut store = HashMap::new();
        store.insert("Broken_theme".to_string(), "{not json".to_string());
        let cache = StorageCache::new(store);
        assert_eq!(cache.get("Broken"), None);
    }

    #[test]
    fn map_cache_last_write_wins() {
        let mut cache: HashMap<String, Palette> = HashMap::new();
        PaletteCache::set(&mut cache, "a", crimson());
        PaletteCache::set(&mut cache, "a", FALLBACK);
        assert_eq!(PaletteCache::get(&cache, "a"), Some(FALLBACK));
    }
}
