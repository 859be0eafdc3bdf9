//! Importing one SVG into a glyph slot and normalizing it to the em square.

use std::path::Path;

use kurbo::{Affine, Vec2};

use crate::backend::FontBackend;
use crate::config::DirectionPolicy;
use crate::error::{Error, Result};
use crate::svg::SvgOutline;

/// How one SVG canvas maps onto the em square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalization {
    /// Intrinsic SVG width.
    pub width: f64,
    /// Intrinsic SVG height.
    pub height: f64,
    /// `width / height` of the original document.
    pub aspect_ratio: f64,
    /// Uniform scale that makes the canvas exactly one em tall.
    pub scale_factor: f64,
    /// Advance width of the glyph, in font units.
    pub glyph_width: u16,
}

impl Normalization {
    /// Computes the normalization of a `width × height` canvas into an em of `em` units.
    ///
    /// Returns `None` when the height is not positive or the advance does not fit a `u16`.
    pub fn new(width: f64, height: f64, em: u16) -> Option<Self> {
        if height <= 0.0 || !width.is_finite() || !height.is_finite() {
            return None;
        }

        let em = f64::from(em);
        let aspect_ratio = width / height;
        let scale_factor = em / height;
        // round half to even
        let glyph_width = (em * aspect_ratio).round_ties_even();

        if !(0.0..=f64::from(u16::MAX)).contains(&glyph_width) {
            return None;
        }

        Some(Self {
            width,
            height,
            aspect_ratio,
            scale_factor,
            glyph_width: glyph_width as u16,
        })
    }

    /// The four transforms, in application order.
    ///
    /// They do not commute: each one operates on the result of the previous.
    pub fn transforms(&self, em: u16, ascent: i16) -> [Affine; 4] {
        let em = f64::from(em);
        let ascent = f64::from(ascent);
        [
            // center the canvas on the origin
            Affine::translate(Vec2::new(-self.width / 2.0, -ascent + self.height / 2.0)),
            Affine::scale(self.scale_factor),
            // center vertically between descent and ascent
            Affine::translate(Vec2::new(0.0, ascent - em / 2.0)),
            // center horizontally in the advance box
            Affine::translate(Vec2::new(f64::from(self.glyph_width) / 2.0, 0.0)),
        ]
    }
}

/// Per-glyph processing steps applied on top of the fixed normalization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// When to reorient contours.
    pub correct_direction: DirectionPolicy,
    /// Merge overlapping contours right after the outline is imported.
    pub remove_overlap: bool,
}

impl From<DirectionPolicy> for ImportOptions {
    fn from(correct_direction: DirectionPolicy) -> Self {
        Self { correct_direction, ..Self::default() }
    }
}

/// Whether the importer should reorient a glyph's contours.
pub fn should_correct<B: FontBackend>(
    font: &B,
    codepoint: char,
    policy: DirectionPolicy,
) -> Result<bool> {
    Ok(match policy {
        DirectionPolicy::No => false,
        DirectionPolicy::Always => true,
        DirectionPolicy::Auto => !font.self_intersects(codepoint)?,
    })
}

/// Adds the SVG at `path` to `font` as `codepoint`.
pub fn add_glyph<B: FontBackend>(
    font: &mut B,
    codepoint: char,
    path: &Path,
    options: ImportOptions,
) -> Result<()> {
    let outline = SvgOutline::load(path)?;
    import_outline(font, codepoint, &outline, path, options)
}

/// Adds an already parsed outline to `font` as `codepoint`. `source` is only used in errors.
pub fn import_outline<B: FontBackend>(
    font: &mut B,
    codepoint: char,
    outline: &SvgOutline,
    source: &Path,
    options: ImportOptions,
) -> Result<()> {
    font.create_glyph(codepoint)?;
    font.import_outline(codepoint, outline)?;
    if options.remove_overlap {
        font.remove_overlap(codepoint)?;
    }

    let em = font.units_per_em();
    let norm = Normalization::new(outline.width, outline.height, em).ok_or_else(|| {
        if outline.height > 0.0 {
            Error::AdvanceOverflow {
                path: source.to_path_buf(),
                width: (f64::from(em) * outline.width / outline.height).round_ties_even() as i64,
            }
        } else {
            Error::ZeroHeight { path: source.to_path_buf() }
        }
    })?;

    for affine in norm.transforms(em, font.ascent()) {
        font.transform(codepoint, affine)?;
    }

    // Transforms may disturb the advance, so the width is always set last.
    font.set_width(codepoint, norm.glyph_width)?;

    if should_correct(font, codepoint, options.correct_direction)? {
        log::info!("Fixing glyph direction");
        font.correct_direction(codepoint)?;
    }

    Ok(())
}
