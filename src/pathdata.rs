// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use kurbo::ParamCurveExtrema;

use crate::geom::BBox;
use crate::transform::Transform;

/// A path's absolute segment.
///
/// Unlike the SVG spec, can contain only `M`, `L`, `C` and `Z` segments.
/// All other segments will be converted into this one.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathSegment {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CurveTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    ClosePath,
}


/// An SVG path data container.
///
/// All segments are in absolute coordinates.
#[derive(Clone, Default, Debug)]
pub struct PathData(pub Vec<PathSegment>);

impl PathData {
    /// Creates a new path.
    #[inline]
    pub fn new() -> Self {
        PathData(Vec::new())
    }

    /// Creates a new path with a specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        PathData(Vec::with_capacity(capacity))
    }

    /// Pushes a MoveTo segment to the path.
    #[inline]
    pub fn push_move_to(&mut self, x: f64, y: f64) {
        self.push(PathSegment::MoveTo { x, y });
    }

    /// Pushes a LineTo segment to the path.
    #[inline]
    pub fn push_line_to(&mut self, x: f64, y: f64) {
        self.push(PathSegment::LineTo { x, y });
    }

    /// Pushes a CurveTo segment to the path.
    #[inline]
    pub fn push_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.push(PathSegment::CurveTo { x1, y1, x2, y2, x, y });
    }

    /// Pushes a QuadTo segment to the path.
    ///
    /// Will be converted into cubic curve.
    #[inline]
    pub fn push_quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        let (prev_x, prev_y) = self.last_pos();
        self.push(quad_to_curve(prev_x, prev_y, x1, y1, x, y));
    }

    /// Pushes an ArcTo segment to the path.
    ///
    /// Arc will be converted into cubic curves.
    pub fn push_arc_to(
        &mut self,
        rx: f64, ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64, y: f64,
    ) {
        let (prev_x, prev_y) = self.last_pos();

        let svg_arc = kurbo::SvgArc {
            from: kurbo::Point::new(prev_x, prev_y),
            to: kurbo::Point::new(x, y),
            radii: kurbo::Vec2::new(rx, ry),
            x_rotation: x_axis_rotation.to_radians(),
            large_arc,
            sweep,
        };

        match kurbo::Arc::from_svg_arc(&svg_arc) {
            Some(arc) => {
                arc.to_cubic_beziers(0.1, |p1, p2, p| {
                    self.push_curve_to(p1.x, p1.y, p2.x, p2.y, p.x, p.y);
                });
            }
            None => {
                self.push_line_to(x, y);
            }
        }
    }

    /// Pushes a ClosePath segment to the path.
    #[inline]
    pub fn push_close_path(&mut self) {
        self.push(PathSegment::ClosePath);
    }

    #[inline]
    fn last_pos(&self) -> (f64, f64) {
        let seg = self.last().expect("path must not be empty");
        match seg {
              PathSegment::MoveTo { x, y }
            | PathSegment::LineTo { x, y }
            | PathSegment::CurveTo { x, y, .. } => {
               (*x, *y)
            }
            // ClosePath moves us back to the subpath start,
            // so the current position is the last MoveTo coordinate.
            PathSegment::ClosePath => self
                .iter()
                .rev()
                .find_map(|seg| match seg {
                    PathSegment::MoveTo { x, y } => Some((*x, *y)),
                    _ => None,
                })
                .unwrap_or((0.0, 0.0)),
        }
    }

    /// Calculates path's bounding box.
    ///
    /// This operation is expensive.
    #[inline]
    pub fn bbox(&self) -> Option<BBox> {
        calc_bbox(self)
    }

    /// Applies the transform to the path.
    #[inline]
    pub fn transform(&mut self, ts: Transform) {
        transform_path(self, ts);
    }
}

impl std::ops::Deref for PathData {
    type Target = Vec<PathSegment>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for PathData {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}


fn calc_bbox(segments: &[PathSegment]) -> Option<BBox> {
    if segments.is_empty() {
        return None;
    }

    let mut prev_x = 0.0;
    let mut prev_y = 0.0;
    let mut minx = 0.0;
    let mut miny = 0.0;
    let mut maxx = 0.0;
    let mut maxy = 0.0;

    if let PathSegment::MoveTo { x, y } = segments[0] {
        prev_x = x;
        prev_y = y;
        minx = x;
        miny = y;
        maxx = x;
        maxy = y;
    }

    for seg in segments.iter().cloned() {
        match seg {
              PathSegment::MoveTo { x, y }
            | PathSegment::LineTo { x, y } => {
                prev_x = x;
                prev_y = y;

                if x > maxx { maxx = x; }
                else if x < minx { minx = x; }

                if y > maxy { maxy = y; }
                else if y < miny { miny = y; }
            }
            PathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                let curve = kurbo::CubicBez::from_points(prev_x, prev_y, x1, y1, x2, y2, x, y);
                let r = curve.bounding_box();

                if r.x0 < minx { minx = r.x0; }
                if r.x1 > maxx { maxx = r.x1; }
                if r.y0 < miny { miny = r.y0; }
                if r.y1 > maxy { maxy = r.y1; }

                prev_x = x;
                prev_y = y;
            }
            PathSegment::ClosePath => {}
        }
    }

    let width = maxx - minx;
    let height = maxy - miny;

    Some(BBox::new(minx, miny, width, height))
}

fn transform_path(segments: &mut [PathSegment], ts: Transform) {
    for seg in segments {
        match seg {
            PathSegment::MoveTo { x, y } => {
                ts.apply_to(x, y);
            }
            PathSegment::LineTo { x, y } => {
                ts.apply_to(x, y);
            }
            PathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                ts.apply_to(x1, y1);
                ts.apply_to(x2, y2);
                ts.apply_to(x, y);
            }
            PathSegment::ClosePath => {}
        }
    }
}


#[inline]
fn quad_to_curve(px: f64, py: f64, x1: f64, y1: f64, x: f64, y: f64) -> PathSegment {
    #[inline]
    fn calc(n1: f64, n2: f64) -> f64 {
        (n1 + n2 * 2.0) / 3.0
    }

    PathSegment::CurveTo {
        x1: calc(px, x1), y1: calc(py, y1),
        x2:  calc(x, x1), y2:  calc(y, y1),
        x, y,
    }
}


pub(crate) trait CubicBezExt {
    fn from_points(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> Self;
}

impl CubicBezExt for kurbo::CubicBez {
    fn from_points(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> Self {
        kurbo::CubicBez {
            p0: kurbo::Point::new(px, py),
            p1: kurbo::Point::new(x1, y1),
            p2: kurbo::Point::new(x2, y2),
            p3: kurbo::Point::new(x, y),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::FuzzyEq;

    #[test]
    fn line_bbox() {
        let mut path = PathData::new();
        path.push_move_to(10.0, 20.0);
        path.push_line_to(30.0, 5.0);
        path.push_close_path();

        let bbox = path.bbox().unwrap();
        assert!(bbox.fuzzy_eq(&BBox::new(10.0, 5.0, 20.0, 15.0)));
    }

    #[test]
    fn curve_bbox_includes_extrema() {
        // The curve's highest point lies between the endpoints.
        let mut path = PathData::new();
        path.push_move_to(0.0, 0.0);
        path.push_curve_to(0.0, 20.0, 30.0, 20.0, 30.0, 0.0);

        let bbox = path.bbox().unwrap();
        assert!(bbox.fuzzy_eq(&BBox::new(0.0, 0.0, 30.0, 15.0)));
    }

    #[test]
    fn empty_path_has_no_bbox() {
        assert!(PathData::new().bbox().is_none());
    }

    #[test]
    fn transform_moves_control_points() {
        let mut path = PathData::new();
        path.push_move_to(0.0, 0.0);
        path.push_curve_to(10.0, 0.0, 20.0, 10.0, 30.0, 10.0);

        path.transform(Transform::new_translate(5.0, 5.0));

        match path[1] {
            PathSegment::CurveTo { x1, y1, x, y, .. } => {
                assert!(x1.fuzzy_eq(&15.0) && y1.fuzzy_eq(&5.0));
                assert!(x.fuzzy_eq(&35.0) && y.fuzzy_eq(&15.0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn quad_is_lowered_to_cubic() {
        let mut path = PathData::new();
        path.push_move_to(0.0, 0.0);
        path.push_quad_to(15.0, 30.0, 30.0, 0.0);

        assert!(matches!(path[1], PathSegment::CurveTo { .. }));
    }

    #[test]
    fn quad_after_close_path_continues_from_subpath_start() {
        let mut path = PathData::new();
        path.push_move_to(10.0, 10.0);
        path.push_line_to(20.0, 10.0);
        path.push_close_path();
        path.push_quad_to(25.0, 25.0, 28.0, 10.0);

        assert_eq!(
            path[3],
            PathSegment::CurveTo { x1: 20.0, y1: 20.0, x2: 26.0, y2: 20.0, x: 28.0, y: 10.0 },
        );
    }

    #[test]
    fn arc_after_close_path_continues_from_subpath_start() {
        let mut path = PathData::new();
        path.push_move_to(10.0, 10.0);
        path.push_line_to(20.0, 10.0);
        path.push_close_path();
        path.push_arc_to(5.0, 5.0, 0.0, false, false, 20.0, 10.0);

        assert!(matches!(path.last(), Some(PathSegment::CurveTo { .. })));
    }
}
