//! Loading SVG documents into outlines.

use std::path::Path;

use kurbo::{Affine, BezPath, Point};
use usvg::tiny_skia_path::{self, PathSegment};

use crate::error::{Error, Result};

/// The painted geometry of an SVG document, in its own user space (y pointing down).
#[derive(Clone, Debug)]
pub struct SvgOutline {
    /// Intrinsic width of the document.
    pub width: f64,
    /// Intrinsic height of the document.
    pub height: f64,
    /// Fills and outlined strokes, merged into one path with transforms already applied.
    pub path: BezPath,
}

impl SvgOutline {
    /// Reads and parses the SVG at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let outline = Self::from_data(&data).map_err(|message| Error::SvgParse {
            path: path.to_path_buf(),
            message,
        })?;
        if outline.path.elements().is_empty() {
            log::warn!("{} has no filled or stroked geometry, its glyph will be empty", path.display());
        }
        Ok(outline)
    }

    /// Parses an SVG document held in memory.
    pub fn from_data(data: &[u8]) -> std::result::Result<Self, String> {
        let options = usvg::Options::default();
        let tree = usvg::Tree::from_data(data, &options).map_err(|e| e.to_string())?;

        let size = tree.size();
        let mut path = BezPath::new();
        collect_group(tree.root(), &mut path);

        Ok(Self {
            width: f64::from(size.width()),
            height: f64::from(size.height()),
            path,
        })
    }
}

fn collect_group(group: &usvg::Group, out: &mut BezPath) {
    for node in group.children() {
        match node {
            usvg::Node::Group(group) => collect_group(group, out),
            usvg::Node::Path(path) => {
                if !path.is_visible() {
                    continue;
                }
                if path.fill().is_some() {
                    append_path(path.data(), path.abs_transform(), out);
                }
                if let Some(stroke) = path.stroke() {
                    match path.data().stroke(&stroke.to_tiny_skia(), 1.0) {
                        Some(outline) => append_path(&outline, path.abs_transform(), out),
                        None => log::warn!("Could not outline the stroke of path {:?}", path.id()),
                    }
                }
            }
            usvg::Node::Text(text) => collect_group(text.flattened(), out),
            usvg::Node::Image(image) => {
                log::warn!("Ignoring embedded image {:?}", image.id());
            }
        }
    }
}

/// Appends `data`, mapped through `ts`, to `out`.
fn append_path(data: &tiny_skia_path::Path, ts: usvg::Transform, out: &mut BezPath) {
    let affine = Affine::new([
        f64::from(ts.sx),
        f64::from(ts.ky),
        f64::from(ts.kx),
        f64::from(ts.sy),
        f64::from(ts.tx),
        f64::from(ts.ty),
    ]);
    let pt = |p: usvg::tiny_skia_path::Point| affine * Point::new(f64::from(p.x), f64::from(p.y));

    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(p) => out.move_to(pt(p)),
            PathSegment::LineTo(p) => out.line_to(pt(p)),
            PathSegment::QuadTo(p1, p) => out.quad_to(pt(p1), pt(p)),
            PathSegment::CubicTo(p1, p2, p) => out.curve_to(pt(p1), pt(p2), pt(p)),
            PathSegment::Close => out.close_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    #[test]
    fn intrinsic_size_and_bounds() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20">
            <rect x="0" y="0" width="10" height="20"/>
        </svg>"#;
        let outline = SvgOutline::from_data(svg).unwrap();
        assert_eq!(outline.width, 10.0);
        assert_eq!(outline.height, 20.0);

        let bbox = outline.path.bounding_box();
        assert!((bbox.x0 - 0.0).abs() < 1e-6);
        assert!((bbox.y1 - 20.0).abs() < 1e-6);
    }

    #[test]
    fn view_box_is_mapped_to_size() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 12 12">
            <rect x="0" y="0" width="12" height="12"/>
        </svg>"#;
        let outline = SvgOutline::from_data(svg).unwrap();
        let bbox = outline.path.bounding_box();
        assert!((bbox.x1 - 24.0).abs() < 1e-4);
        assert!((bbox.y1 - 24.0).abs() < 1e-4);
    }

    #[test]
    fn nested_group_transforms_apply() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20">
            <g transform="translate(5 5)"><rect x="0" y="0" width="5" height="5"/></g>
        </svg>"#;
        let outline = SvgOutline::from_data(svg).unwrap();
        let bbox = outline.path.bounding_box();
        assert!((bbox.x0 - 5.0).abs() < 1e-4);
        assert!((bbox.y0 - 5.0).abs() < 1e-4);
    }

    #[test]
    fn strokes_are_outlined() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20">
            <path d="M2 2 L18 18" stroke="black" stroke-width="2" fill="none"/>
        </svg>"#;
        let outline = SvgOutline::from_data(svg).unwrap();
        assert!(!outline.path.elements().is_empty());

        // a 2 unit wide band around the diagonal
        let bbox = outline.path.bounding_box();
        let half = 2f64.sqrt() / 2.0;
        assert!((bbox.x0 - (2.0 - half)).abs() < 1e-3, "{bbox:?}");
        assert!((bbox.x1 - (18.0 + half)).abs() < 1e-3, "{bbox:?}");
        assert!(outline.path.area().abs() > 40.0);
    }

    #[test]
    fn fill_and_stroke_are_both_kept() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20">
            <rect x="5" y="5" width="10" height="10" stroke="black" stroke-width="2"/>
        </svg>"#;
        let outline = SvgOutline::from_data(svg).unwrap();
        let bbox = outline.path.bounding_box();
        assert!((bbox.x0 - 4.0).abs() < 1e-3);
        assert!((bbox.x1 - 16.0).abs() < 1e-3);
    }

    #[test]
    fn invisible_geometry_is_skipped() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20">
            <rect x="5" y="5" width="10" height="10" fill="none"/>
        </svg>"#;
        let outline = SvgOutline::from_data(svg).unwrap();
        assert!(outline.path.elements().is_empty());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(SvgOutline::from_data(b"definitely not xml").is_err());
    }
}
