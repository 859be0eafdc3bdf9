//! Error type shared by the conversion pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the conversion pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a conversion run.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading an input or writing an output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source directory could not be traversed.
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// An SVG file could not be parsed.
    #[error("Failed to parse SVG {}: {message}", path.display())]
    SvgParse {
        /// The offending file.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// An SVG has no usable height, so it cannot be normalized to the em size.
    #[error("SVG has zero height: {}", path.display())]
    ZeroHeight {
        /// The offending file.
        path: PathBuf,
    },

    /// The next code point is not a Unicode scalar value.
    #[error("{0:#x} is not a valid Unicode codepoint")]
    InvalidCodepoint(u32),

    /// A glyph slot was created twice for the same code point.
    #[error("Glyph U+{:04X} already exists", u32::from(*.0))]
    GlyphExists(char),

    /// A glyph operation targeted a code point without a slot.
    #[error("No glyph at U+{:04X}", u32::from(*.0))]
    UnknownGlyph(char),

    /// The normalized advance width does not fit the font's metrics.
    #[error("Advance width {width} of {} exceeds the font's limits", path.display())]
    AdvanceOverflow {
        /// The offending file.
        path: PathBuf,
        /// The computed advance, in font units.
        width: i64,
    },

    /// The TrueType tables could not be assembled.
    #[error("Font generation failed: {0}")]
    FontBuild(String),

    /// The metadata could not be serialized.
    #[error("Metadata serialization failed: {0}")]
    Metadata(String),

    /// The metadata path has an extension no serializer is registered for.
    #[error("Cannot deduce metadata format from {} (supported: ron, json, rkyv)", .0.display())]
    UnsupportedMetadataFormat(PathBuf),
}
