use rgb::RGB8;
use serde::{Deserialize, Serialize};
use crate::error::ThemeError;
use crate::{contrast_text, darken, lighten, shift_from_mid,
            SECONDARY_SHIFT, SHADE_RATIO};

/// The five colors of a UI theme.
///
/// Serialized as an object with camelCase keys, each color as a
/// `#RRGGBB` string:
///
/// ```
/// use college_theme::FALLBACK;
/// let json = FALLBACK.to_json().unwrap();
/// assert!(json.contains(r##""primaryDark":"#4752C4""##));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    #[serde(with = "hex")]
    primary: RGB8,
    #[serde(with = "hex")]
    secondary: RGB8,
    #[serde(with = "hex")]
    primary_dark: RGB8,
    #[serde(with = "hex")]
    primary_light: RGB8,
    #[serde(with = "hex")]
    text_color: RGB8,
}

impl Palette {
    /// Build a palette from five explicit colors.
    pub const fn new(primary: RGB8, secondary: RGB8, primary_dark: RGB8,
                     primary_light: RGB8, text_color: RGB8) -> Self {
        Palette { primary, secondary, primary_dark, primary_light,
                  text_color }
    }

    /// Derive a palette from its primary color.  Without a
    /// `secondary`, one is synthesized by shifting each channel of
    /// `primary` away from the middle of its range.
    pub fn derive(primary: RGB8, secondary: Option<RGB8>) -> Self {
        let secondary = secondary
            .unwrap_or_else(|| shift_from_mid(primary, SECONDARY_SHIFT));
        Palette { primary, secondary,
                  primary_dark: darken(primary, SHADE_RATIO),
                  primary_light: lighten(primary, SHADE_RATIO),
                  text_color: contrast_text(primary) }
    }

    /// Most frequent color of the logo.
    pub fn primary(&self) -> RGB8 { self.primary }

    /// Contrasting accent color.
    pub fn secondary(&self) -> RGB8 { self.secondary }

    pub fn primary_dark(&self) -> RGB8 { self.primary_dark }

    pub fn primary_light(&self) -> RGB8 { self.primary_light }

    /// Black or white, for text drawn on [`Self::primary`].
    pub fn text_color(&self) -> RGB8 { self.text_color }

    /// Colors in field order: primary, secondary, dark, light, text.
    pub fn colors(&self) -> [RGB8; 5] {
        [self.primary, self.secondary, self.primary_dark,
         self.primary_light, self.text_color]
    }

    pub fn to_json(&self) -> Result<String, ThemeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, ThemeError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Parse `#RRGGBB` (the `#` is optional, case does not matter).
///
/// ```
/// use rgb::RGB8;
/// use college_theme::parse_hex;
/// assert_eq!(parse_hex("#4a76A8").unwrap(), RGB8::new(0x4a, 0x76, 0xa8));
/// assert!(parse_hex("#4a76A").is_err());
/// ```
pub fn parse_hex(s: &str) -> Result<RGB8, ThemeError> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ThemeError::InvalidColor(s.to_string()))
    }
    let byte = |i: usize| u8::from_str_radix(&digits[i .. i + 2], 16)
        .map_err(|_| ThemeError::InvalidColor(s.to_string()));
    Ok(RGB8 { r: byte(0)?, g: byte(2)?, b: byte(4)? })
}

/// Format as uppercase `#RRGGBB`.
pub fn to_hex(c: RGB8) -> String {
    format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b)
}

pub(crate) mod hex {
    use rgb::RGB8;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(c: &RGB8, s: S)
                                           -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::to_hex(*c))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D)
                                                        -> Result<RGB8, D::Error> {
        let s = String::deserialize(d)?;
        super::parse_hex(&s).map_err(de::Error::custom)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BLACK, WHITE};

    #[test]
    fn derive_synthesizes_secondary() {
        let p = Palette::derive(RGB8::new(192, 48, 48), None);
        assert_eq!(p.secondary(), RGB8::new(142, 98, 98));
        assert_eq!(p.primary_dark(), RGB8::new(154, 38, 38));
        assert_eq!(p.primary_light(), RGB8::new(205, 89, 89));
        assert_eq!(p.text_color(), WHITE);
        let q = Palette::derive(RGB8::new(240, 216, 96),
                                Some(RGB8::new(24, 24, 144)));
        assert_eq!(q.secondary(), RGB8::new(24, 24, 144));
        assert_eq!(q.text_color(), BLACK);
    }

    #[test]
    fn json_uses_camel_case_hex_strings() {
        let p = Palette::derive(RGB8::new(0x12, 0xab, 0xff), None);
        let v: serde_json::Value = serde_json::from_str(&p.to_json().unwrap())
            .unwrap();
        assert_eq!(v["primary"], "#12ABFF");
        assert_eq!(v["textColor"], "#000000");
        assert!(v.get("primaryLight").is_some());
        assert_eq!(Palette::from_json(&p.to_json().unwrap()).unwrap(), p);
    }

    #[test]
    fn rejects_bad_colors() {
        for s in ["", "#", "#12345", "#1234567", "12345g", "+12345", "#+f0000"] {
            assert!(parse_hex(s).is_err(), "{:?} accepted", s);
        }
        assert_eq!(parse_hex("  ffffff ").unwrap(), WHITE);
        let json = r##"{"primary":"#zzzzzz","secondary":"#000000",
                       "primaryDark":"#000000","primaryLight":"#000000",
                       "textColor":"#000000"}"##;
        assert!(matches!(Palette::from_json(json), Err(ThemeError::Json(_))));
    }
}
