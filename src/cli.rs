use std::path::PathBuf;

use clap::Parser;

use crate::backend::FontBackend;
use crate::config::{parse_codepoint, Config, DirectionPolicy};
use crate::emit;
use crate::error::Result;
use crate::font::TrueTypeFont;
use crate::meta::IconFont;
use crate::walker;

/// Command line arguments of the `svg2font` binary.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The beginning of the character range which holds the SVGs, in decimal or 0x-prefixed hex
    #[arg(long = "firstchar", default_value = "0xE000", value_parser = parse_codepoint)]
    pub firstchar: u32,
    /// The path to source SVGs from
    #[arg(long)]
    pub path: PathBuf,
    /// The name that the font gets
    #[arg(long = "font_name")]
    pub font_name: String,
    /// Generate a C++ unordered_map definition mapping file paths to characters
    #[arg(long = "cpp_map", overrides_with = "no_cpp_map")]
    pub cpp_map: bool,
    /// Do not generate the C++ map
    #[arg(long = "no-cpp_map", overrides_with = "cpp_map", hide = true)]
    pub no_cpp_map: bool,
    /// Whether contour directions should be corrected to validate glyphs
    #[arg(long = "correct_direction", value_enum, default_value_t = DirectionPolicy::No)]
    pub correct_direction: DirectionPolicy,
    /// Merge overlapping contours of every glyph into one outline
    #[arg(long = "remove_overlap")]
    pub remove_overlap: bool,
    /// Directory the generated files are written to
    #[arg(long = "out_dir", default_value = ".")]
    pub out_dir: PathBuf,
    /// Path to where glyph metadata should be written (ron, json or rkyv, by extension)
    #[arg(long = "meta_path")]
    pub meta_path: Option<PathBuf>,
    /// Visit files sorted by name, making the code point assignment reproducible across platforms
    #[arg(long)]
    pub sort: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            source: args.path,
            font_name: args.font_name,
            first_char: args.firstchar,
            correct_direction: args.correct_direction,
            remove_overlap: args.remove_overlap,
            cpp_map: args.cpp_map && !args.no_cpp_map,
            out_dir: args.out_dir,
            meta_path: args.meta_path,
            sorted: args.sort,
        }
    }
}

/// Converts every SVG below `config.source` into one font and writes the requested outputs.
///
/// Nothing is written unless every SVG was imported successfully.
pub fn svg_to_font(config: &Config) -> Result<IconFont> {
    let meta_format = config.metadata_format()?;

    let mut font = TrueTypeFont::new(config.font_name.as_str());
    let table = walker::walk(&mut font, config)?;

    std::fs::create_dir_all(&config.out_dir)?;

    let font_path = config.font_path();
    font.generate(&font_path)?;
    log::debug!("Wrote {} glyphs to {}", font.len(), font_path.display());

    if config.cpp_map {
        let map_path = config.cpp_map_path();
        emit::write_cpp_map(&map_path, &table)?;
        log::debug!("Wrote C++ map to {}", map_path.display());
    }

    let meta = font.metadata(&table);
    if let (Some(meta_path), Some(format)) = (&config.meta_path, meta_format) {
        emit::write_metadata(meta_path, format, &meta)?;
        log::debug!("Wrote metadata to {}", meta_path.display());
    }

    Ok(meta)
}
