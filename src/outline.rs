//! Geometry checks and fixes on glyph outlines.
//!
//! Outlines are in font space (y pointing up). TrueType fills with the
//! nonzero rule and expects outer contours to run clockwise and holes to run
//! counter-clockwise.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use kurbo::{BezPath, ParamCurve, PathEl, PathSeg, Point, Shape};

const FLATTEN_TOLERANCE: f64 = 0.25;

/// Splits a path into its closed-or-open subpaths.
pub fn contours(path: &BezPath) -> Vec<BezPath> {
    let mut contours = Vec::new();
    let mut current = BezPath::new();

    for el in path.elements() {
        if let PathEl::MoveTo(_) = el {
            if !current.elements().is_empty() {
                contours.push(std::mem::take(&mut current));
            }
        }
        current.push(*el);
    }

    if !current.elements().is_empty() {
        contours.push(current);
    }

    contours
}

/// Returns the polygon approximating one contour, without repeating the start point.
fn polygon(contour: &BezPath) -> Vec<Point> {
    let mut points: Vec<Point> = Vec::new();
    kurbo::flatten(contour, FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => {
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
        _ => {}
    });

    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    points
}

fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

/// True when `r`, collinear with `p` and `q`, lies on the segment `pq`.
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    (p.x.min(q.x)..=p.x.max(q.x)).contains(&r.x) && (p.y.min(q.y)..=p.y.max(q.y)).contains(&r.y)
}

/// True when segments `p1p2` and `q1q2` have at least one point in common.
///
/// Besides proper crossings this covers shared vertices, T-junctions and
/// collinear overlaps.
fn segments_meet(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Reports whether any contour crosses or touches itself or another contour.
pub fn self_intersects(path: &BezPath) -> bool {
    // (contour index, edge index, edge count, start, end)
    let mut edges = Vec::new();
    for (ci, contour) in contours(path).iter().enumerate() {
        let points = polygon(contour);
        let n = points.len();
        if n < 2 {
            continue;
        }
        for i in 0..n {
            edges.push((ci, i, n, points[i], points[(i + 1) % n]));
        }
    }

    for (a, &(ca, ia, na, p1, p2)) in edges.iter().enumerate() {
        for &(cb, ib, _, q1, q2) in &edges[a + 1..] {
            if ca == cb {
                let adjacent = ib == ia + 1 || (ia == 0 && ib == na - 1);
                if adjacent {
                    continue;
                }
            }
            if segments_meet(p1, p2, q1, q2) {
                return true;
            }
        }
    }

    false
}

/// Reverses the direction of travel of a single contour.
pub fn reverse_contour(contour: &BezPath) -> BezPath {
    let closed = matches!(contour.elements().last(), Some(PathEl::ClosePath));
    let segments: Vec<PathSeg> = contour.segments().collect();

    let mut reversed = BezPath::new();
    let Some(last) = segments.last() else {
        return contour.clone();
    };
    reversed.move_to(last.end());

    for segment in segments.iter().rev().map(PathSeg::reverse) {
        match segment {
            PathSeg::Line(line) => reversed.line_to(line.p1),
            PathSeg::Quad(quad) => reversed.quad_to(quad.p1, quad.p2),
            PathSeg::Cubic(cubic) => reversed.curve_to(cubic.p1, cubic.p2, cubic.p3),
        }
    }

    if closed {
        reversed.close_path();
    }

    reversed
}

/// Reorients every contour so outer contours run clockwise and holes counter-clockwise.
///
/// Returns the number of contours that were reversed.
pub fn correct_direction(path: &mut BezPath) -> usize {
    let contours = contours(path);
    let mut fixed = BezPath::new();
    let mut reversed = 0;

    for (i, contour) in contours.iter().enumerate() {
        let Some(probe) = polygon(contour).first().copied() else {
            fixed.extend(contour.elements().iter().copied());
            continue;
        };

        let depth = contours
            .iter()
            .enumerate()
            .filter(|&(j, other)| j != i && other.winding(probe) != 0)
            .count();

        let clockwise = contour.area() < 0.0;
        let wants_clockwise = depth % 2 == 0;

        if clockwise == wants_clockwise {
            fixed.extend(contour.elements().iter().copied());
        } else {
            fixed.extend(reverse_contour(contour).elements().iter().copied());
            reversed += 1;
        }
    }

    *path = fixed;
    reversed
}

/// Merges overlapping contours into the outline of the area they cover.
///
/// Curves are flattened first, so the result consists of straight segments
/// only. Contours come out in TrueType orientation.
pub fn remove_overlap(path: &BezPath) -> BezPath {
    let subject: Vec<Vec<[f64; 2]>> = contours(path)
        .iter()
        .map(|contour| polygon(contour).into_iter().map(|p| [p.x, p.y]).collect::<Vec<_>>())
        .filter(|points| points.len() >= 3)
        .collect();
    if subject.is_empty() {
        return path.clone();
    }

    let clip: Vec<Vec<[f64; 2]>> = Vec::new();
    let shapes = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);

    let mut merged = BezPath::new();
    for contour in shapes.iter().flatten() {
        let Some((first, rest)) = contour.split_first() else {
            continue;
        };
        merged.move_to((first[0], first[1]));
        for point in rest {
            merged.line_to((point[0], point[1]));
        }
        merged.close_path();
    }

    correct_direction(&mut merged);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    /// Counter-clockwise rectangle in y-up space.
    fn ccw_rect(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
        let mut path = BezPath::new();
        path.move_to((x0, y0));
        path.line_to((x1, y0));
        path.line_to((x1, y1));
        path.line_to((x0, y1));
        path.close_path();
        path
    }

    #[test]
    fn splits_contours() {
        let mut path = ccw_rect(0.0, 0.0, 10.0, 10.0);
        path.extend(ccw_rect(20.0, 0.0, 30.0, 10.0).elements().iter().copied());
        assert_eq!(contours(&path).len(), 2);
    }

    #[test]
    fn simple_shapes_do_not_intersect() {
        assert!(!self_intersects(&ccw_rect(0.0, 0.0, 10.0, 10.0)));
        assert!(!self_intersects(&Rect::new(0.0, 0.0, 4.0, 4.0).to_path(0.1)));
    }

    #[test]
    fn bow_tie_intersects() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 10.0));
        path.line_to((10.0, 0.0));
        path.line_to((0.0, 10.0));
        path.close_path();
        assert!(self_intersects(&path));
    }

    #[test]
    fn overlapping_contours_intersect() {
        let mut path = ccw_rect(0.0, 0.0, 10.0, 10.0);
        path.extend(ccw_rect(5.0, 5.0, 15.0, 15.0).elements().iter().copied());
        assert!(self_intersects(&path));
    }

    #[test]
    fn pinched_contour_touching_itself_intersects() {
        // figure eight whose loops meet in a single vertex
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((5.0, 5.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 10.0));
        path.line_to((5.0, 5.0));
        path.line_to((0.0, 10.0));
        path.close_path();
        assert!(self_intersects(&path));
    }

    #[test]
    fn contours_sharing_an_edge_intersect() {
        let mut path = ccw_rect(0.0, 0.0, 10.0, 10.0);
        path.extend(ccw_rect(10.0, 5.0, 20.0, 15.0).elements().iter().copied());
        assert!(self_intersects(&path));
    }

    #[test]
    fn vertex_touching_an_edge_intersects() {
        let mut path = ccw_rect(0.0, 0.0, 10.0, 10.0);
        path.move_to((5.0, 0.0));
        path.line_to((8.0, 5.0));
        path.line_to((2.0, 5.0));
        path.close_path();
        assert!(self_intersects(&path));
    }

    #[test]
    fn separate_collinear_edges_do_not_intersect() {
        let mut path = ccw_rect(0.0, 0.0, 10.0, 10.0);
        path.extend(ccw_rect(20.0, 0.0, 30.0, 10.0).elements().iter().copied());
        assert!(!self_intersects(&path));
    }

    #[test]
    fn overlapping_rects_merge() {
        let mut path = ccw_rect(0.0, 0.0, 10.0, 10.0);
        path.extend(ccw_rect(5.0, 5.0, 15.0, 15.0).elements().iter().copied());

        let merged = remove_overlap(&path);
        assert_eq!(contours(&merged).len(), 1);
        assert!((merged.area().abs() - 175.0).abs() < 0.01);
        assert!(merged.area() < 0.0, "outer contour should be clockwise");
        assert!(!self_intersects(&merged));
    }

    #[test]
    fn holes_survive_overlap_removal() {
        let mut path = ccw_rect(0.0, 0.0, 10.0, 10.0);
        path.extend(reverse_contour(&ccw_rect(2.0, 2.0, 8.0, 8.0)).elements().iter().copied());

        let merged = remove_overlap(&path);
        assert_eq!(contours(&merged).len(), 2);
        assert!((merged.area().abs() - 64.0).abs() < 0.01);
    }

    #[test]
    fn nested_contours_do_not_intersect() {
        let mut path = ccw_rect(0.0, 0.0, 10.0, 10.0);
        path.extend(ccw_rect(2.0, 2.0, 8.0, 8.0).elements().iter().copied());
        assert!(!self_intersects(&path));
    }

    #[test]
    fn reversing_flips_area() {
        let rect = ccw_rect(0.0, 0.0, 10.0, 10.0);
        let reversed = reverse_contour(&rect);
        assert!(rect.area() > 0.0);
        assert!((reversed.area() + rect.area()).abs() < 1e-9);
        assert!(matches!(reversed.elements().last(), Some(PathEl::ClosePath)));
    }

    #[test]
    fn outer_clockwise_hole_counter_clockwise() {
        // Both contours start counter-clockwise.
        let mut path = ccw_rect(0.0, 0.0, 10.0, 10.0);
        path.extend(ccw_rect(2.0, 2.0, 8.0, 8.0).elements().iter().copied());

        let reversed = correct_direction(&mut path);
        assert_eq!(reversed, 1);

        let parts = contours(&path);
        assert!(parts[0].area() < 0.0, "outer contour should be clockwise");
        assert!(parts[1].area() > 0.0, "hole should be counter-clockwise");
    }

    #[test]
    fn correct_paths_are_left_alone() {
        let mut path = reverse_contour(&ccw_rect(0.0, 0.0, 10.0, 10.0));
        let before = path.clone();
        assert_eq!(correct_direction(&mut path), 0);
        assert_eq!(path, before);
    }
}
