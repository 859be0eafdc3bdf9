//! In-memory TrueType font session.

use std::collections::BTreeMap;
use std::path::Path;

use kurbo::{Affine, BezPath};

use crate::backend::FontBackend;
use crate::error::{Error, Result};
use crate::meta::{IconFont, IconGlyph};
use crate::outline;
use crate::svg::SvgOutline;
use crate::ttf;

/// Em size of every generated font. TrueType rasterizers prefer a power of two.
pub const UNITS_PER_EM: u16 = 1024;

/// A glyph slot owned by a [`TrueTypeFont`].
#[derive(Clone, Debug, Default)]
pub struct Glyph {
    /// Outline in font units, y pointing up.
    pub outline: BezPath,
    /// Advance width in font units.
    pub advance_width: u16,
}

/// A font under construction, holding one glyph per mapped code point.
#[derive(Clone, Debug)]
pub struct TrueTypeFont {
    name: String,
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    glyphs: BTreeMap<char, Glyph>,
}

impl TrueTypeFont {
    /// Creates an empty font named `name` with the default em size.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_units_per_em(name, UNITS_PER_EM)
    }

    /// Creates an empty font with a custom em size. Ascent and descent split the em 4:1.
    pub fn with_units_per_em(name: impl Into<String>, units_per_em: u16) -> Self {
        let ascent = (f64::from(units_per_em) * 0.8).round() as i16;
        let descent = units_per_em as i16 - ascent;
        Self {
            name: name.into(),
            units_per_em,
            ascent,
            descent,
            glyphs: BTreeMap::new(),
        }
    }

    /// Family, full and PostScript name of the font.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distance from the baseline to the bottom of the em square (positive).
    pub fn descent(&self) -> i16 {
        self.descent
    }

    /// Glyph slots in code point order.
    pub fn glyphs(&self) -> impl Iterator<Item = (char, &Glyph)> {
        self.glyphs.iter().map(|(&c, glyph)| (c, glyph))
    }

    /// The glyph mapped to `codepoint`, if any.
    pub fn glyph(&self, codepoint: char) -> Option<&Glyph> {
        self.glyphs.get(&codepoint)
    }

    /// Number of glyph slots, not counting `.notdef`.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// True when no glyph slot has been created.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Describes the font and the source of each glyph, in the order of `paths`.
    pub fn metadata(&self, paths: &[(char, String)]) -> IconFont {
        let glyphs = paths
            .iter()
            .map(|(codepoint, path)| IconGlyph {
                codepoint: *codepoint,
                path: path.clone(),
                advance_width: self.glyph(*codepoint).map_or(0, |glyph| glyph.advance_width),
            })
            .collect();

        IconFont {
            font_name: self.name.clone(),
            units_per_em: self.units_per_em,
            ascent: self.ascent,
            descent: self.descent,
            glyphs,
        }
    }

    fn glyph_mut(&mut self, codepoint: char) -> Result<&mut Glyph> {
        self.glyphs.get_mut(&codepoint).ok_or(Error::UnknownGlyph(codepoint))
    }
}

impl FontBackend for TrueTypeFont {
    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn ascent(&self) -> i16 {
        self.ascent
    }

    fn create_glyph(&mut self, codepoint: char) -> Result<()> {
        if self.glyphs.contains_key(&codepoint) {
            return Err(Error::GlyphExists(codepoint));
        }
        self.glyphs.insert(codepoint, Glyph::default());
        Ok(())
    }

    fn import_outline(&mut self, codepoint: char, outline: &SvgOutline) -> Result<()> {
        let flip = Affine::new([1.0, 0.0, 0.0, -1.0, 0.0, f64::from(self.ascent)]);
        let glyph = self.glyph_mut(codepoint)?;
        let mut path = outline.path.clone();
        path.apply_affine(flip);
        glyph.outline.extend(path.elements().iter().copied());
        Ok(())
    }

    fn remove_overlap(&mut self, codepoint: char) -> Result<()> {
        let glyph = self.glyph_mut(codepoint)?;
        glyph.outline = outline::remove_overlap(&glyph.outline);
        Ok(())
    }

    fn transform(&mut self, codepoint: char, affine: Affine) -> Result<()> {
        self.glyph_mut(codepoint)?.outline.apply_affine(affine);
        Ok(())
    }

    fn set_width(&mut self, codepoint: char, width: u16) -> Result<()> {
        self.glyph_mut(codepoint)?.advance_width = width;
        Ok(())
    }

    fn self_intersects(&self, codepoint: char) -> Result<bool> {
        let glyph = self.glyph(codepoint).ok_or(Error::UnknownGlyph(codepoint))?;
        Ok(outline::self_intersects(&glyph.outline))
    }

    fn correct_direction(&mut self, codepoint: char) -> Result<()> {
        let reversed = outline::correct_direction(&mut self.glyph_mut(codepoint)?.outline);
        log::debug!("Reversed {reversed} contour(s) of U+{:04X}", u32::from(codepoint));
        Ok(())
    }

    fn generate(&self, path: &Path) -> Result<()> {
        let data = ttf::build(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    fn square_svg(width: f64, height: f64) -> SvgOutline {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((width, 0.0));
        path.line_to((width, height));
        path.line_to((0.0, height));
        path.close_path();
        SvgOutline { width, height, path }
    }

    #[test]
    fn default_metrics() {
        let font = TrueTypeFont::new("Icons");
        assert_eq!(font.units_per_em(), 1024);
        assert_eq!(font.ascent(), 819);
        assert_eq!(font.descent(), 205);
        assert!(font.is_empty());
    }

    #[test]
    fn duplicate_glyph_is_rejected() {
        let mut font = TrueTypeFont::new("Icons");
        font.create_glyph('\u{E000}').unwrap();
        assert!(matches!(font.create_glyph('\u{E000}'), Err(Error::GlyphExists('\u{E000}'))));
    }

    #[test]
    fn missing_glyph_is_reported() {
        let mut font = TrueTypeFont::new("Icons");
        assert!(matches!(font.set_width('a', 10), Err(Error::UnknownGlyph('a'))));
        assert!(matches!(font.self_intersects('a'), Err(Error::UnknownGlyph('a'))));
    }

    #[test]
    fn import_flips_into_font_space() {
        let mut font = TrueTypeFont::new("Icons");
        font.create_glyph('\u{E000}').unwrap();
        font.import_outline('\u{E000}', &square_svg(10.0, 20.0)).unwrap();

        let bbox = font.glyph('\u{E000}').unwrap().outline.bounding_box();
        assert_eq!((bbox.x0, bbox.x1), (0.0, 10.0));
        assert_eq!((bbox.y0, bbox.y1), (799.0, 819.0));
    }

    #[test]
    fn metadata_follows_table_order() {
        let mut font = TrueTypeFont::new("Icons");
        font.create_glyph('\u{E000}').unwrap();
        font.create_glyph('\u{E001}').unwrap();
        font.set_width('\u{E001}', 300).unwrap();

        let paths = vec![('\u{E001}', "b.svg".to_string()), ('\u{E000}', "a.svg".to_string())];
        let meta = font.metadata(&paths);
        assert_eq!(meta.glyphs[0].path, "b.svg");
        assert_eq!(meta.glyphs[0].advance_width, 300);
        assert_eq!(meta.ascent, 819);
    }
}
