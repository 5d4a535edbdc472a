//! Extraction options and theme configuration files.

use std::path::Path;
use rgb::RGB8;
use serde::{Deserialize, Serialize};
use crate::error::ThemeError;
use crate::palettes::Overrides;

/// Sampling and selection constants.
///
/// The defaults are part of the observable behavior: changing any of
/// them changes extracted palettes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Only every `stride`-th pixel is sampled.  At least 2.
    pub stride: usize,
    /// Channel quantization step.
    pub bucket: u8,
    /// Pixels with a lower alpha are treated as background.
    pub min_alpha: u8,
    /// Quantized colors whose channel sum is below this are ignored.
    pub min_sum: u16,
    /// Quantized colors whose channel sum is above this are ignored.
    pub max_sum: u16,
    /// Minimal distance between primary and a sampled secondary.
    pub min_distance: f64,
    /// Primary used when no sampled pixel qualifies.
    #[serde(with = "crate::palettes::ty::hex")]
    pub default_primary: RGB8,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            stride: 4,
            bucket: 24,
            min_alpha: 125,
            min_sum: 60,
            max_sum: 720,
            min_distance: 100.,
            default_primary: RGB8 { r: 0x58, g: 0x65, b: 0xF2 },
        }
    }
}

impl ExtractOptions {
    /// Check the options are usable.
    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.stride < 2 {
            return Err(ThemeError::InvalidConfig(format!(
                "stride must be at least 2, got {}", self.stride)))
        }
        if self.bucket == 0 {
            return Err(ThemeError::InvalidConfig("bucket must be positive".into()))
        }
        if self.min_sum >= self.max_sum {
            return Err(ThemeError::InvalidConfig(format!(
                "min_sum ({}) must be below max_sum ({})",
                self.min_sum, self.max_sum)))
        }
        if !self.min_distance.is_finite() || self.min_distance < 0. {
            return Err(ThemeError::InvalidConfig(format!(
                "min_distance must be a non-negative number, got {}",
                self.min_distance)))
        }
        Ok(())
    }
}

/// Theme configuration file.
///
/// ```toml
/// [extract]
/// stride = 8
///
/// [overrides."Lakeside College"]
/// primary = "#003366"
/// secondary = "#FFCC00"
/// primaryDark = "#002952"
/// primaryLight = "#335C85"
/// textColor = "#FFFFFF"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub extract: ExtractOptions,
    pub overrides: Overrides,
}

impl ThemeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ThemeError> {
        let config: ThemeConfig = toml::from_str(s)?;
        config.extract.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
