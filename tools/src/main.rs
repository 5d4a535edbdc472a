// Usage: college-theme-tools IMAGE IDENTIFIER [OVERRIDES]
//
// Decode IMAGE, resolve the palette of IDENTIFIER (OVERRIDES is a JSON
// or TOML theme file) and write its style rules on stdout.  Set
// RUST_LOG=debug to see how the palette was obtained.

use std::{collections::HashMap,
          env,
          io::{self, BufWriter, Write},
          error::Error};
use college_theme::{palette_to_style_rules, to_hex, ImageSource, Overrides,
                    Palette, ThemeConfig, ThemeExtractor};
use tracing_subscriber::EnvFilter;

type Err = Box<dyn Error>;

fn usage() -> Err {
    format!("usage: {} IMAGE IDENTIFIER [OVERRIDES]",
            env::args().next().unwrap_or_else(|| "college-theme-tools".into()))
        .into()
}

/// Overrides file: a bare JSON table, or a TOML theme configuration.
async fn load_config(path: &str) -> Result<ThemeConfig, Err> {
    let text = tokio::fs::read_to_string(path).await?;
    if path.ends_with(".json") {
        Ok(ThemeConfig { overrides: Overrides::from_json(&text)?,
                         ..Default::default() })
    } else {
        Ok(ThemeConfig::from_toml_str(&text)?)
    }
}

#[tokio::main]
async fn main() -> Result<(), Err> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (image, identifier) = match &args[..] {
        [image, identifier, ..] => (image, identifier),
        _ => return Err(usage()),
    };
    let config = match args.get(2) {
        Some(path) => load_config(path).await?,
        None => ThemeConfig::default(),
    };

    let bytes = tokio::fs::read(image).await?;
    let extractor = ThemeExtractor::new(config.extract)?;
    let mut cache: HashMap<String, Palette> = HashMap::new();
    let palette = extractor
        .resolve_source(identifier, Some(ImageSource::Encoded(bytes)),
                        &config.overrides, &mut cache)
        .await?;

    let mut fh = BufWriter::new(io::stdout().lock());
    let [p, s, d, l, t] = palette.colors().map(to_hex);
    writeln!(fh, "/* primary {p}, secondary {s}, dark {d}, light {l}, \
                  text {t} */")?;
    write!(fh, "{}", palette_to_style_rules(&palette, identifier)?)?;
    fh.flush()?;
    Ok(())
}
