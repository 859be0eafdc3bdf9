//! Run configuration.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::emit::MetadataFormat;
use crate::error::Result;
use crate::importer::ImportOptions;

/// Default first code point: the start of the Private Use Area.
pub const DEFAULT_FIRST_CHAR: u32 = 0xE000;

/// When to reorient glyph contours after import.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DirectionPolicy {
    /// Never touch contour direction.
    #[default]
    No,
    /// Correct only glyphs whose outline does not intersect itself.
    Auto,
    /// Correct every glyph.
    Always,
}

/// Everything a conversion run needs to know, fixed before the first file is read.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory the SVG files are collected from.
    pub source: PathBuf,
    /// Name of the font, also the stem of every output file.
    pub font_name: String,
    /// Code point assigned to the first SVG.
    pub first_char: u32,
    /// Contour direction handling.
    pub correct_direction: DirectionPolicy,
    /// Merge overlapping contours of each glyph after import.
    pub remove_overlap: bool,
    /// Whether to emit the C++ lookup table.
    pub cpp_map: bool,
    /// Directory outputs are written to.
    pub out_dir: PathBuf,
    /// Where to write the glyph metadata, if anywhere.
    pub meta_path: Option<PathBuf>,
    /// Visit directory entries sorted by file name instead of in filesystem order.
    pub sorted: bool,
}

impl Config {
    /// A configuration with every optional setting at its default.
    pub fn new(source: impl Into<PathBuf>, font_name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            font_name: font_name.into(),
            first_char: DEFAULT_FIRST_CHAR,
            correct_direction: DirectionPolicy::No,
            remove_overlap: false,
            cpp_map: false,
            out_dir: PathBuf::from("."),
            meta_path: None,
            sorted: false,
        }
    }

    /// Path of the generated font file.
    pub fn font_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.ttf", self.font_name))
    }

    /// Path of the generated C++ header.
    pub fn cpp_map_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.hpp", self.font_name))
    }

    /// How every glyph is imported.
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            correct_direction: self.correct_direction,
            remove_overlap: self.remove_overlap,
        }
    }

    /// The format the metadata will be written in, if any is requested.
    pub fn metadata_format(&self) -> Result<Option<MetadataFormat>> {
        self.meta_path.as_deref().map(MetadataFormat::from_path).transpose()
    }
}

/// Parses a code point written in decimal, or in hex with a `0x` prefix.
pub fn parse_codepoint(s: &str) -> std::result::Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid code point {s:?}: {e}"))
}
