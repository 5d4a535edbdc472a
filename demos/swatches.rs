//! Writes `swatches.html`: the palettes extracted from a few synthetic
//! logos, each followed by a sample of text on the primary color.

use std::{env,
          io::{BufWriter, Write},
          fs::File,
          error::Error};
use rgb::{RGB8, RGBA8};
use college_theme::{extract_palette, palette_to_style_rules, to_hex, Bitmap,
                    Palette, FALLBACK};

type Err = Box<dyn Error>;

const NAMES: [&str; 5] = ["primary", "secondary", "dark", "light", "text"];

fn table_of_colors(fh: &mut impl Write, palette: &Palette,
                   comment: &str) -> Result<(), Err> {
    writeln!(fh, "<table style=\"border: 0px;  border-spacing: 0px\"><tr>")?;
    for c in palette.colors() {
        writeln!(fh, "  <td style=\"width: 60px; height: 30px; \
                      background-color: {}\"></td>", to_hex(c))?;
    }
    writeln!(fh, "<td rowspan=\"3\" style=\"padding-left: 7px\">\
                  {comment}</td></tr><tr>")?;
    for name in NAMES {
        writeln!(fh, "  <td style=\"font-size: 9px\">{name}</td>")?;
    }
    writeln!(fh, "</tr><tr><td colspan=\"5\" style=\"background-color: {}; \
                  color: {}; padding: 4px\">Sample message</td></tr>",
             to_hex(palette.primary()), to_hex(palette.text_color()))?;
    writeln!(fh, "</table><br/>")?;
    Ok(())
}

/// A `width × 16` logo made of vertical bands.
fn bands(parts: &[(RGBA8, u32)]) -> Result<Bitmap, Err> {
    let width: u32 = parts.iter().map(|&(_, w)| w).sum();
    let row: Vec<RGBA8> = parts.iter()
        .flat_map(|&(c, w)| std::iter::repeat(c).take(w as usize))
        .collect();
    let pixels = (0 .. 16).flat_map(|_| row.iter().copied()).collect();
    Ok(Bitmap::new(width, 16, pixels)?)
}

fn main() -> Result<(), Err> {
    let mut fh = BufWriter::new(File::create("swatches.html")?);
    writeln!(fh, "<html>\n\
                  <head>\n\
                  <title>College_theme: {}</title>\n\
                  </head>\n\
                  <body>",
             env::args().next().unwrap_or_default())?;

    writeln!(fh, "<h3>Fallback</h3>")?;
    table_of_colors(&mut fh, &FALLBACK, "unreadable image")?;

    writeln!(fh, "<h3>Extracted</h3>")?;
    let clear = RGBA8::new(0, 0, 0, 0);
    let logos = [
        ("crimson, single color",
         bands(&[(RGBA8::new(200, 50, 50, 255), 32)])?),
        ("navy and gold",
         bands(&[(RGBA8::new(0, 40, 104, 255), 20),
                 (RGBA8::new(255, 200, 40, 255), 12)])?),
        ("green on transparent",
         bands(&[(clear, 24), (RGBA8::new(20, 120, 60, 255), 8)])?),
        ("black and white only",
         bands(&[(RGBA8::new(5, 5, 5, 255), 16),
                 (RGBA8::new(250, 250, 250, 255), 16)])?),
    ];
    for (comment, logo) in &logos {
        table_of_colors(&mut fh, &extract_palette(logo), comment)?;
    }

    let p = Palette::derive(RGB8::new(0, 40, 104), None);
    writeln!(fh, "<h3>Style rules</h3>\n<pre>{}</pre>",
             palette_to_style_rules(&p, "Navy College")?)?;

    writeln!(fh, "</body>\n\
                  </html>")?;
    Ok(())
}
