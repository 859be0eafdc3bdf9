#[cfg(any(feature = "serde-serialize", feature = "serde-deserialize"))]
use serde::{Serialize, Deserialize};

/// Metadata describing an icon font generated from a directory of SVG files.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize))]
#[cfg_attr(feature = "serde-deserialize", derive(Deserialize))]
#[cfg_attr(any(feature = "rkyv-serialize", feature = "rkyv-deserialize"), derive(rkyv::Archive))]
#[cfg_attr(feature = "rkyv-serialize", derive(rkyv::Serialize))]
#[cfg_attr(feature = "rkyv-deserialize", derive(rkyv::Deserialize))]
pub struct IconFont {
    /// Family, full and PostScript name of the font.
    pub font_name: String,
    /// Size of the em square in font units.
    pub units_per_em: u16,
    /// Distance from the baseline to the top of the em square, in font units.
    pub ascent: i16,
    /// Distance from the baseline to the bottom of the em square, in font units (positive).
    pub descent: i16,
    /// Glyphs in the order their source files were visited.
    pub glyphs: Vec<IconGlyph>,
}

/// A single icon glyph and the SVG file it was generated from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize))]
#[cfg_attr(feature = "serde-deserialize", derive(Deserialize))]
#[cfg_attr(any(feature = "rkyv-serialize", feature = "rkyv-deserialize"), derive(rkyv::Archive))]
#[cfg_attr(feature = "rkyv-serialize", derive(rkyv::Serialize))]
#[cfg_attr(feature = "rkyv-deserialize", derive(rkyv::Deserialize))]
pub struct IconGlyph {
    /// The character the icon is mapped to.
    pub codepoint: char,
    /// Path of the source SVG relative to the input directory, always `/`-separated.
    pub path: String,
    /// Horizontal advance in font units. Every glyph is exactly one em tall.
    pub advance_width: u16,
}

impl IconFont {
    /// Looks up the character assigned to the SVG at `path`.
    #[must_use]
    pub fn codepoint_of(&self, path: &str) -> Option<char> {
        self.glyphs.iter().find(|glyph| glyph.path == path).map(|glyph| glyph.codepoint)
    }

    /// Looks up the glyph mapped to `codepoint`.
    #[must_use]
    pub fn glyph(&self, codepoint: char) -> Option<&IconGlyph> {
        self.glyphs.iter().find(|glyph| glyph.codepoint == codepoint)
    }

    /// Width of `text` in font units when set with this font's icons, skipping unmapped characters.
    #[must_use]
    pub fn advance_of(&self, text: &str) -> u32 {
        text.chars()
            .filter_map(|c| self.glyph(c))
            .map(|glyph| u32::from(glyph.advance_width))
            .sum()
    }
}
