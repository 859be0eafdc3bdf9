//! The font-authoring operations the importer relies on.

use std::path::Path;

use kurbo::Affine;

use crate::error::Result;
use crate::svg::SvgOutline;

/// A font under construction whose glyph slots are addressed by code point.
///
/// Every method taking a `codepoint` fails with [`Error::UnknownGlyph`](crate::Error::UnknownGlyph)
/// if no slot was created for it.
pub trait FontBackend {
    /// Size of the em square in font units.
    fn units_per_em(&self) -> u16;

    /// Distance from the baseline to the top of the em square.
    fn ascent(&self) -> i16;

    /// Creates an empty glyph slot mapped to `codepoint`.
    fn create_glyph(&mut self, codepoint: char) -> Result<()>;

    /// Imports `outline` into the slot without any scaling.
    ///
    /// SVG user space is flipped into font space, so the SVG canvas ends up
    /// spanning `y ∈ [ascent - height, ascent]`.
    fn import_outline(&mut self, codepoint: char, outline: &SvgOutline) -> Result<()>;

    /// Merges overlapping contours of the slot's outline so that every
    /// covered area is enclosed exactly once.
    fn remove_overlap(&mut self, codepoint: char) -> Result<()>;

    /// Applies `affine` to the slot's outline.
    fn transform(&mut self, codepoint: char, affine: Affine) -> Result<()>;

    /// Sets the slot's advance width.
    fn set_width(&mut self, codepoint: char, width: u16) -> Result<()>;

    /// Reports whether the slot's outline crosses itself.
    fn self_intersects(&self, codepoint: char) -> Result<bool>;

    /// Reorients the slot's contours to the font format's winding convention.
    fn correct_direction(&mut self, codepoint: char) -> Result<()>;

    /// Serializes the font to `path`.
    fn generate(&self, path: &Path) -> Result<()>;
}
