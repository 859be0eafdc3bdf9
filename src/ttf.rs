//! TrueType serialization of a [`TrueTypeFont`].

use kurbo::{BezPath, PathEl, Point};
use write_fonts::tables::cmap::Cmap;
use write_fonts::tables::glyf::{GlyfLocaBuilder, Glyph, SimpleGlyph};
use write_fonts::tables::head::Head;
use write_fonts::tables::hhea::Hhea;
use write_fonts::tables::hmtx::{Hmtx, LongMetric};
use write_fonts::tables::loca::LocaFormat;
use write_fonts::tables::maxp::Maxp;
use write_fonts::tables::name::{Name, NameRecord};
use write_fonts::tables::os2::{Os2, SelectionFlags};
use write_fonts::tables::post::Post;
use write_fonts::types::{FWord, GlyphId, NameId, UfWord};
use write_fonts::FontBuilder;

use crate::backend::FontBackend;
use crate::error::{Error, Result};
use crate::font::TrueTypeFont;

/// Maximum distance, in font units, between a cubic and its quadratic approximation.
const QUAD_ACCURACY: f64 = 1.0;

// Windows platform, Unicode BMP encoding, US English.
const WINDOWS: u16 = 3;
const UNICODE_BMP: u16 = 1;
const EN_US: u16 = 0x409;

/// Replaces every cubic segment with quadratic ones, as `glyf` cannot store cubics.
pub fn to_quadratic(path: &BezPath) -> BezPath {
    let mut out = BezPath::new();
    let mut last = Point::ZERO;
    let mut start = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                out.move_to(p);
                start = p;
                last = p;
            }
            PathEl::LineTo(p) => {
                out.line_to(p);
                last = p;
            }
            PathEl::QuadTo(p1, p2) => {
                out.quad_to(p1, p2);
                last = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                let cubic = kurbo::CubicBez::new(last, p1, p2, p3);
                for (_, _, quad) in cubic.to_quads(QUAD_ACCURACY) {
                    out.quad_to(quad.p1, quad.p2);
                }
                last = p3;
            }
            PathEl::ClosePath => {
                out.close_path();
                last = start;
            }
        }
    }

    out
}

/// Converts a quadratic outline into a `glyf` entry.
fn simple_glyph(outline: &BezPath) -> Result<Glyph> {
    if outline.elements().is_empty() {
        return Ok(Glyph::Empty);
    }
    let glyph = SimpleGlyph::from_bezpath(outline)
        .map_err(|e| Error::FontBuild(format!("malformed outline: {e:?}")))?;
    Ok(Glyph::Simple(glyph))
}

/// Font-unit bounds as `(x_min, y_min, x_max, y_max)`.
type Bounds = (i16, i16, i16, i16);

fn bounds_of(glyph: &Glyph) -> Option<Bounds> {
    match glyph {
        Glyph::Simple(simple) => {
            let bbox = &simple.bbox;
            Some((bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max))
        }
        _ => None,
    }
}

/// Upper bounds for the number of points and contours of a quadratic outline.
fn point_count(outline: &BezPath) -> (u16, u16) {
    let mut points = 0usize;
    let mut contours = 0usize;
    for el in outline.elements() {
        match el {
            PathEl::MoveTo(_) => {
                points += 1;
                contours += 1;
            }
            PathEl::LineTo(_) => points += 1,
            PathEl::QuadTo(..) => points += 2,
            PathEl::CurveTo(..) => points += 3,
            PathEl::ClosePath => {}
        }
    }
    (points.min(u16::MAX as usize) as u16, contours.min(u16::MAX as usize) as u16)
}

/// Converts a glyph count or index to the 16 bits TrueType addresses glyphs with.
fn glyph_count(count: usize) -> Result<u16> {
    u16::try_from(count)
        .map_err(|_| Error::FontBuild(format!("{count} glyphs exceed the TrueType limit of 65535")))
}

/// `OS/2` Unicode range bit covering `codepoint`, for the blocks icon fonts use.
fn unicode_range_bit(codepoint: char) -> Option<u32> {
    match u32::from(codepoint) {
        0x0000..=0x007F => Some(0),
        0x0080..=0x00FF => Some(1),
        0xE000..=0xF8FF => Some(60),
        0xF0000..=0x10FFFF => Some(90),
        _ => None,
    }
}

fn os2_table(font: &TrueTypeFont, glyphs: &[(Glyph, u16)], y_min: i16, y_max: i16) -> Os2 {
    let mut ranges = [0u32; 4];
    let mut set_bit = |bit: u32| ranges[(bit / 32) as usize] |= 1 << (bit % 32);
    for (codepoint, _) in font.glyphs() {
        if let Some(bit) = unicode_range_bit(codepoint) {
            set_bit(bit);
        }
        if u32::from(codepoint) > 0xFFFF {
            // non-plane 0
            set_bit(57);
        }
    }

    let bmp = |codepoint: char| u16::try_from(u32::from(codepoint)).unwrap_or(u16::MAX);
    let first_char = font.glyphs().next().map_or(0, |(c, _)| bmp(c));
    let last_char = font.glyphs().last().map_or(0, |(c, _)| bmp(c));

    let advances: Vec<u32> = glyphs
        .iter()
        .map(|(_, advance)| u32::from(*advance))
        .filter(|advance| *advance > 0)
        .collect();
    let avg_width = match advances.len() {
        0 => 0,
        n => advances.iter().sum::<u32>() / n as u32,
    };

    let ascent = font.ascent();
    let descent = font.descent();
    let em = i32::from(font.units_per_em());

    Os2 {
        x_avg_char_width: i16::try_from(avg_width).unwrap_or(i16::MAX),
        us_weight_class: 400,
        us_width_class: 5,
        y_subscript_x_size: (em * 65 / 100) as i16,
        y_subscript_y_size: (em * 60 / 100) as i16,
        y_subscript_y_offset: (em * 7 / 100) as i16,
        y_superscript_x_size: (em * 65 / 100) as i16,
        y_superscript_y_size: (em * 60 / 100) as i16,
        y_superscript_y_offset: (em * 35 / 100) as i16,
        y_strikeout_size: (em / 20) as i16,
        y_strikeout_position: (em * 22 / 100) as i16,
        ul_unicode_range_1: ranges[0],
        ul_unicode_range_2: ranges[1],
        ul_unicode_range_3: ranges[2],
        ul_unicode_range_4: ranges[3],
        fs_selection: SelectionFlags::REGULAR,
        us_first_char_index: first_char,
        us_last_char_index: last_char,
        s_typo_ascender: ascent,
        s_typo_descender: -descent,
        s_typo_line_gap: 0,
        us_win_ascent: ascent.max(y_max).max(0).unsigned_abs(),
        us_win_descent: descent.max(y_min.saturating_neg()).max(0).unsigned_abs(),
        // Latin 1
        ul_code_page_range_1: Some(1),
        ul_code_page_range_2: Some(0),
        sx_height: Some(0),
        s_cap_height: Some(0),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(0),
        ..Default::default()
    }
}

fn name_table(font: &TrueTypeFont) -> Name {
    let family = font.name().to_string();
    let postscript: String = family
        .chars()
        .filter(|c| c.is_ascii_graphic() && !"[](){}<>/%".contains(*c))
        .collect();

    let records = [
        (NameId::FAMILY_NAME, family.clone()),
        (NameId::SUBFAMILY_NAME, "Regular".to_string()),
        (NameId::UNIQUE_ID, format!("{family}-Regular")),
        (NameId::FULL_NAME, family.clone()),
        (NameId::POSTSCRIPT_NAME, postscript),
    ];

    Name::new(
        records
            .into_iter()
            .map(|(id, string)| NameRecord::new(WINDOWS, UNICODE_BMP, EN_US, id, string.into()))
            .collect(),
    )
}

/// Assembles the binary font file.
pub fn build(font: &TrueTypeFont) -> Result<Vec<u8>> {
    let font_build = |e: &dyn std::fmt::Debug| Error::FontBuild(format!("{e:?}"));

    let units_per_em = font.units_per_em();
    let notdef_advance = units_per_em / 2;

    let mut glyphs = vec![(Glyph::Empty, notdef_advance)];
    let mut mappings = Vec::with_capacity(font.len());
    let mut max_points = 0;
    let mut max_contours = 0;
    for (codepoint, glyph) in font.glyphs() {
        let gid = glyph_count(glyphs.len())?;
        mappings.push((codepoint, GlyphId::new(u32::from(gid))));

        let quadratic = to_quadratic(&glyph.outline);
        let (points, contours) = point_count(&quadratic);
        max_points = max_points.max(points);
        max_contours = max_contours.max(contours);

        glyphs.push((simple_glyph(&quadratic)?, glyph.advance_width));
    }

    let mut glyf_loca = GlyfLocaBuilder::new();
    let mut metrics = Vec::with_capacity(glyphs.len());
    let mut font_box: Option<Bounds> = None;
    let mut min_lsb = i16::MAX;
    let mut min_rsb = i16::MAX;
    let mut max_extent = i16::MIN;

    for (glyph, advance) in &glyphs {
        glyf_loca.add_glyph(glyph).map_err(|e| font_build(&e))?;

        let lsb = match bounds_of(glyph) {
            Some((x_min, y_min, x_max, y_max)) => {
                let rsb = i32::from(*advance) - i32::from(x_max);
                min_lsb = min_lsb.min(x_min);
                min_rsb = min_rsb.min(rsb.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16);
                max_extent = max_extent.max(x_max);
                font_box = Some(match font_box {
                    Some((a, b, c, d)) => (a.min(x_min), b.min(y_min), c.max(x_max), d.max(y_max)),
                    None => (x_min, y_min, x_max, y_max),
                });
                x_min
            }
            None => 0,
        };
        metrics.push(LongMetric::new(*advance, lsb));
    }

    let num_glyphs = glyph_count(glyphs.len())?;
    let (glyf, loca, loca_format) = glyf_loca.build();
    let (x_min, y_min, x_max, y_max) = font_box.unwrap_or_default();
    let advance_max = glyphs.iter().map(|(_, advance)| *advance).max().unwrap_or(0);

    let head = Head {
        units_per_em,
        x_min,
        y_min,
        x_max,
        y_max,
        lowest_rec_ppem: 8,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
        ..Default::default()
    };

    let hhea = Hhea {
        ascender: FWord::new(font.ascent()),
        descender: FWord::new(-font.descent()),
        line_gap: FWord::new(0),
        advance_width_max: UfWord::new(advance_max),
        min_left_side_bearing: FWord::new(if min_lsb == i16::MAX { 0 } else { min_lsb }),
        min_right_side_bearing: FWord::new(if min_rsb == i16::MAX { 0 } else { min_rsb }),
        x_max_extent: FWord::new(if max_extent == i16::MIN { 0 } else { max_extent }),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        number_of_h_metrics: num_glyphs,
        ..Default::default()
    };

    let maxp = Maxp {
        num_glyphs,
        max_points: Some(max_points),
        max_contours: Some(max_contours),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
        ..Default::default()
    };

    let os2 = os2_table(font, &glyphs, y_min, y_max);
    let hmtx = Hmtx::new(metrics, Vec::new());
    let cmap = Cmap::from_mappings(mappings).map_err(|e| font_build(&e))?;
    let name = name_table(font);
    let post = Post::default();

    let mut builder = FontBuilder::new();
    builder
        .add_table(&head)
        .and_then(|b| b.add_table(&hhea))
        .and_then(|b| b.add_table(&maxp))
        .and_then(|b| b.add_table(&os2))
        .and_then(|b| b.add_table(&hmtx))
        .and_then(|b| b.add_table(&cmap))
        .and_then(|b| b.add_table(&glyf))
        .and_then(|b| b.add_table(&loca))
        .and_then(|b| b.add_table(&name))
        .and_then(|b| b.add_table(&post))
        .map_err(|e| font_build(&e))?;

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubics_become_quads() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((0.0, 100.0), (100.0, 100.0), (100.0, 0.0));
        path.close_path();

        let quads = to_quadratic(&path);
        assert!(quads.elements().iter().all(|el| !matches!(el, PathEl::CurveTo(..))));
        assert!(quads.elements().iter().any(|el| matches!(el, PathEl::QuadTo(..))));
        assert_eq!(quads.elements().last(), Some(&PathEl::ClosePath));
    }

    #[test]
    fn empty_outline_is_empty_glyph() {
        assert!(matches!(simple_glyph(&BezPath::new()), Ok(Glyph::Empty)));
    }

    /// Offset and length of the table tagged `tag` in an sfnt binary.
    fn find_table<'a>(data: &'a [u8], tag: &[u8; 4]) -> Option<&'a [u8]> {
        let num_tables = usize::from(u16::from_be_bytes([data[4], data[5]]));
        (0..num_tables).map(|i| &data[12 + 16 * i..28 + 16 * i]).find_map(|record| {
            (&record[..4] == tag).then(|| {
                let offset = u32::from_be_bytes(record[8..12].try_into().unwrap()) as usize;
                let length = u32::from_be_bytes(record[12..16].try_into().unwrap()) as usize;
                &data[offset..offset + length]
            })
        })
    }

    fn read_i16(table: &[u8], at: usize) -> i16 {
        i16::from_be_bytes([table[at], table[at + 1]])
    }

    fn read_u16(table: &[u8], at: usize) -> u16 {
        u16::from_be_bytes([table[at], table[at + 1]])
    }

    #[test]
    fn os2_describes_the_icons() {
        let mut font = TrueTypeFont::new("Icons");
        for codepoint in ['\u{E000}', '\u{E001}', '\u{F0000}'] {
            font.create_glyph(codepoint).unwrap();
            font.set_width(codepoint, 1024).unwrap();
        }

        let data = build(&font).unwrap();
        let os2 = find_table(&data, b"OS/2").expect("OS/2 table");
        // sTypoAscender, sTypoDescender, usWinAscent, usWinDescent
        assert_eq!(read_i16(os2, 68), 819);
        assert_eq!(read_i16(os2, 70), -205);
        assert_eq!(read_u16(os2, 74), 819);
        assert_eq!(read_u16(os2, 76), 205);
        // usFirstCharIndex, usLastCharIndex (clamped to the BMP)
        assert_eq!(read_u16(os2, 64), 0xE000);
        assert_eq!(read_u16(os2, 66), 0xFFFF);

        let range_2 = u32::from_be_bytes(os2[46..50].try_into().unwrap());
        let range_3 = u32::from_be_bytes(os2[50..54].try_into().unwrap());
        assert_ne!(range_2 & (1 << 28), 0, "Private Use Area");
        assert_ne!(range_2 & (1 << 25), 0, "non-plane 0");
        assert_ne!(range_3 & (1 << 26), 0, "Supplementary Private Use Area-A");
    }

    #[test]
    fn glyph_ids_are_limited_to_16_bits() {
        assert_eq!(glyph_count(65535).unwrap(), 65535);
        assert!(matches!(glyph_count(65536), Err(Error::FontBuild(_))));
    }

    #[test]
    fn too_many_glyphs_fail_to_build() {
        let mut font = TrueTypeFont::new("Huge");
        for codepoint in (0xF0000..=0x10FFFF).filter_map(char::from_u32).take(65535) {
            font.create_glyph(codepoint).unwrap();
        }
        // 65535 slots plus .notdef do not fit
        assert!(matches!(build(&font), Err(Error::FontBuild(_))));
    }

    #[test]
    fn empty_font_still_builds() {
        let font = TrueTypeFont::new("Empty");
        let data = build(&font).unwrap();
        assert_eq!(&data[..4], &[0x00, 0x01, 0x00, 0x00]);
        for tag in [b"OS/2", b"cmap", b"glyf", b"head", b"hhea", b"hmtx", b"loca", b"maxp", b"name", b"post"] {
            assert!(find_table(&data, tag).is_some(), "missing {}", String::from_utf8_lossy(tag));
        }
    }
}
