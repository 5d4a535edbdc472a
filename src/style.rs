//! Style rules for a palette.

use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};
use crate::contrast_text;
use crate::error::ThemeError;
use crate::palettes::ty::{to_hex, Palette};

lazy_static! {
    static ref NOT_SLUG: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
}

/// Selector-safe form of `scope`: lower case ASCII letters and digits,
/// other runs of characters replaced by `-`.  When `scope` has letters
/// or digits outside ASCII, the first 8 hex digits of the SHA-256 of
/// the trimmed name are appended, so that such names neither vanish
/// nor collide with their unaccented spelling.  `None` if `scope` has
/// no letter or digit at all.
///
/// ```
/// use college_theme::scope_slug;
/// assert_eq!(scope_slug("St. Mary's College").as_deref(), Some("st-mary-s-college"));
/// assert_eq!(scope_slug("{};"), None);
/// assert_ne!(scope_slug("École A"), scope_slug("Ecole A"));
/// assert!(scope_slug("清华大学").is_some());
/// ```
pub fn scope_slug(scope: &str) -> Option<String> {
    let lower = scope.to_lowercase();
    let slug = NOT_SLUG.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if !scope.chars().any(|c| c.is_alphanumeric() && !c.is_ascii()) {
        return if slug.is_empty() { None } else { Some(slug.to_string()) }
    }
    let digest = format!("{:x}", Sha256::digest(scope.trim().as_bytes()));
    let digest = &digest[.. 8];
    Some(if slug.is_empty() { digest.to_string() }
         else { format!("{slug}-{digest}") })
}

/// `scope` made safe to appear inside a comment of a stylesheet that
/// may be embedded in HTML.
fn comment_label(scope: &str) -> String {
    scope.chars()
        .filter(|&c| !c.is_control() && !matches!(c, '<' | '>' | '&'))
        .collect::<String>()
        .replace("*/", "* /")
}

/// Render `palette` as style rules under the selector `.theme-<slug>`
/// (see [`scope_slug`]).  The output only depends on its arguments.
///
/// ```
/// use college_theme::{palette_to_style_rules, FALLBACK};
/// let css = palette_to_style_rules(&FALLBACK, "Lakeside College").unwrap();
/// assert!(css.starts_with("/* Theme: Lakeside College */\n.theme-lakeside-college {"));
/// assert!(css.contains("--theme-primary: #5865F2;"));
/// ```
pub fn palette_to_style_rules(palette: &Palette, scope: &str)
                              -> Result<String, ThemeError> {
    let sel = match scope_slug(scope) {
        Some(slug) => format!(".theme-{slug}"),
        None => return Err(ThemeError::InvalidScope(scope.to_string())),
    };
    let label = comment_label(scope);
    let primary = to_hex(palette.primary());
    let secondary = to_hex(palette.secondary());
    let dark = to_hex(palette.primary_dark());
    let light = to_hex(palette.primary_light());
    let text = to_hex(palette.text_color());
    let on_secondary = to_hex(contrast_text(palette.secondary()));
    Ok(format!("\
/* Theme: {label} */
{sel} {{
  --theme-primary: {primary};
  --theme-secondary: {secondary};
  --theme-primary-dark: {dark};
  --theme-primary-light: {light};
  --theme-text: {text};
}}
{sel} .header {{ background-color: var(--theme-primary); color: var(--theme-text); }}
{sel} .btn-primary {{ background-color: var(--theme-primary); border-color: var(--theme-primary-dark); color: var(--theme-text); }}
{sel} .btn-primary:hover {{ background-color: var(--theme-primary-dark); }}
{sel} a {{ color: var(--theme-primary-dark); }}
{sel} .message.own {{ background-color: var(--theme-primary-light); border-left: 3px solid var(--theme-secondary); }}
{sel} .badge {{ background-color: var(--theme-secondary); color: {on_secondary}; }}
{sel} :focus-visible {{ outline: 2px solid var(--theme-secondary); }}
"))
}


#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGB8;
    use crate::FALLBACK;

    #[test]
    fn rules_carry_every_color() {
        let p = Palette::derive(RGB8::new(0, 72, 144), Some(RGB8::new(240, 192, 0)));
        let css = palette_to_style_rules(&p, "Harbor Tech").unwrap();
        for c in p.colors() {
            assert!(css.contains(&to_hex(c)), "{} missing", to_hex(c));
        }
        assert!(css.contains(".theme-harbor-tech .badge { background-color: \
                              var(--theme-secondary); color: #000000; }"));
        assert_eq!(css, palette_to_style_rules(&p, "Harbor Tech").unwrap());
    }

    #[test]
    fn every_rule_is_scoped() {
        let css = palette_to_style_rules(&FALLBACK, "Lakeside").unwrap();
        for line in css.lines().filter(|l| l.ends_with('{') || l.ends_with('}')) {
            if line == "}" { continue }
            assert!(line.starts_with(".theme-lakeside "), "{:?}", line);
        }
    }

    #[test]
    fn hostile_scope_names() {
        let css = palette_to_style_rules(&FALLBACK, "x}body{color:red").unwrap();
        assert!(css.contains(".theme-x-body-color-red {"));
        assert!(css.lines().skip(1).all(|l| !l.contains("body{")));

        let css = palette_to_style_rules(&FALLBACK, "a */ b {\n c").unwrap();
        assert!(css.starts_with("/* Theme: a * / b { c */\n"));
        assert_eq!(css.matches("*/").count(), 1);

        let css = palette_to_style_rules(
            &FALLBACK, "Evil</style><script>alert(1)</script>").unwrap();
        assert!(!css.contains("</style>"));
        assert!(!css.contains('<') && !css.contains('>') && !css.contains('&'));
        assert!(css.starts_with("/* Theme: Evil/stylescriptalert(1)/script */\n"));

        // Dropping `<` must not leave a comment terminator behind.
        let css = palette_to_style_rules(&FALLBACK, "a *</b").unwrap();
        assert_eq!(css.matches("*/").count(), 1);
    }

    #[test]
    fn names_outside_ascii_keep_a_selector() {
        let cjk = scope_slug("清华大学").unwrap();
        assert_eq!(cjk.len(), 8);
        assert!(cjk.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(scope_slug("清华大学"), Some(cjk.clone()));
        assert_ne!(scope_slug("北京大学"), Some(cjk.clone()));

        let accented = scope_slug("École A").unwrap();
        assert!(accented.starts_with("cole-a-"));
        assert_eq!(scope_slug("Ecole A").as_deref(), Some("ecole-a"));

        let css = palette_to_style_rules(&FALLBACK, "清华大学").unwrap();
        assert!(css.contains(&format!(".theme-{cjk} {{")));
        assert!(css.starts_with("/* Theme: 清华大学 */\n"));
    }

    #[test]
    fn empty_scope_is_rejected() {
        for scope in ["", "   ", "{}", "-- ·"] {
            assert!(matches!(palette_to_style_rules(&FALLBACK, scope),
                             Err(ThemeError::InvalidScope(_))), "{:?}", scope);
        }
    }
}
