//! Writing the conversion results to disk.

use std::path::Path;

use crate::error::{Error, Result};
use crate::meta::IconFont;

const CPP_PREAMBLE: &str = "#pragma once\n\n#include <unordered_map>\n#include <string_view>\n\n";

/// Renders the path table as a C++ `unordered_map` from relative path to the glyph's character.
///
/// Paths are written verbatim; quotes or backslashes in file names are not escaped.
pub fn render_cpp_map(table: &[(char, String)]) -> String {
    let mut out = String::from(CPP_PREAMBLE);
    out.push_str("const inline std::unordered_map<std::string_view, std::string_view> cmap{\n");
    for (codepoint, path) in table {
        out.push_str(&format!("\t{{ \"{path}\", \"\\u{:04x}\" }},\n", u32::from(*codepoint)));
    }
    out.push_str("};\n");
    out
}

/// Writes [`render_cpp_map`] output to `path`.
pub fn write_cpp_map(path: &Path, table: &[(char, String)]) -> Result<()> {
    std::fs::write(path, render_cpp_map(table))?;
    Ok(())
}

/// Serialization format of the metadata file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetadataFormat {
    /// Pretty-printed RON.
    Ron,
    /// Pretty-printed JSON.
    Json,
    /// rkyv archive, readable zero-copy.
    Rkyv,
}

impl MetadataFormat {
    /// Deduces the format from the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Ok(Self::Ron),
            Some("json") => Ok(Self::Json),
            Some("rkyv") => Ok(Self::Rkyv),
            _ => Err(Error::UnsupportedMetadataFormat(path.to_path_buf())),
        }
    }
}

/// Serializes `meta` to `path` in the given format.
pub fn write_metadata(path: &Path, format: MetadataFormat, meta: &IconFont) -> Result<()> {
    let metadata = |e: &dyn std::fmt::Debug| Error::Metadata(format!("{e:?}"));

    match format {
        MetadataFormat::Ron => {
            let serialized = ron::ser::to_string_pretty(meta, ron::ser::PrettyConfig::default())
                .map_err(|e| metadata(&e))?;
            std::fs::write(path, serialized)?;
        }
        MetadataFormat::Json => {
            let serialized = serde_json::to_string_pretty(meta).map_err(|e| metadata(&e))?;
            std::fs::write(path, serialized)?;
        }
        MetadataFormat::Rkyv => {
            let serialized = rkyv::to_bytes::<_, 4096>(meta).map_err(|e| metadata(&e))?;
            std::fs::write(path, serialized)?;
        }
    }

    Ok(())
}
