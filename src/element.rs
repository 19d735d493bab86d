// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde_json::Value;

use crate::geom::{BBox, Point};
use crate::pathdata::PathData;
use crate::transform::Transform;
use crate::{export, Error};

/// Element's kind.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub enum Element {
    Rect(Rect),
    Polygon(Polygon),
    Polyline(Polyline),
    Circle(Circle),
    Ellipse(Ellipse),
    Line(Line),
    Path(Path),
    Group(Group),
}

impl Element {
    /// Returns element's tag name.
    pub fn tag_name(&self) -> &'static str {
        match *self {
            Element::Rect(_) => "rect",
            Element::Polygon(_) => "polygon",
            Element::Polyline(_) => "polyline",
            Element::Circle(_) => "circle",
            Element::Ellipse(_) => "ellipse",
            Element::Line(_) => "line",
            Element::Path(_) => "path",
            Element::Group(_) => "g",
        }
    }

    /// Returns element's ID.
    ///
    /// Can be empty.
    pub fn id(&self) -> &str {
        match *self {
            Element::Rect(ref e) => e.id.as_str(),
            Element::Polygon(ref e) => e.id.as_str(),
            Element::Polyline(ref e) => e.id.as_str(),
            Element::Circle(ref e) => e.id.as_str(),
            Element::Ellipse(ref e) => e.id.as_str(),
            Element::Line(ref e) => e.id.as_str(),
            Element::Path(ref e) => e.id.as_str(),
            Element::Group(ref e) => e.id.as_str(),
        }
    }

    /// Returns element's pending transform.
    ///
    /// A default transform means the element has no `transform` attribute.
    pub fn transform(&self) -> Transform {
        match *self {
            Element::Rect(ref e) => e.transform,
            Element::Polygon(ref e) => e.transform,
            Element::Polyline(ref e) => e.transform,
            Element::Circle(ref e) => e.transform,
            Element::Ellipse(ref e) => e.transform,
            Element::Line(ref e) => e.transform,
            Element::Path(ref e) => e.transform,
            Element::Group(ref e) => e.transform,
        }
    }

    /// Calculates element's bounding box.
    ///
    /// The bbox is calculated for the untransformed geometry.
    /// Returns `None` when the element has no geometry at all,
    /// e.g. an empty path or an empty group.
    pub fn bbox(&self) -> Option<BBox> {
        match *self {
            Element::Rect(ref e) => {
                Some(BBox::new(e.x, e.y, e.width, e.height))
            }
            Element::Polygon(ref e) => BBox::from_points(&e.points),
            Element::Polyline(ref e) => BBox::from_points(&e.points),
            Element::Circle(ref e) => {
                Some(BBox::new(e.cx - e.r, e.cy - e.r, e.r * 2.0, e.r * 2.0))
            }
            Element::Ellipse(ref e) => {
                Some(BBox::new(e.cx - e.rx, e.cy - e.ry, e.rx * 2.0, e.ry * 2.0))
            }
            Element::Line(ref e) => {
                let points = [Point::new(e.x1, e.y1), Point::new(e.x2, e.y2)];
                BBox::from_points(&points)
            }
            Element::Path(ref e) => e.data.bbox(),
            Element::Group(ref e) => {
                let mut bbox: Option<BBox> = None;
                for child in &e.children {
                    if let Some(b) = child.bbox() {
                        bbox = Some(match bbox {
                            Some(acc) => acc.expand(b),
                            None => b,
                        });
                    }
                }
                bbox
            }
        }
    }

    /// Applies `ts` to the element's geometry, producing a new element.
    ///
    /// The variant may change: a `rect` under a rotation or skew becomes
    /// a `polygon` of its four transformed corners, a `circle` under a
    /// non-proportional scale becomes an `ellipse`. A `circle` or an
    /// `ellipse` under a rotation or skew cannot be represented exactly
    /// and produces [`Error::UnsupportedTransform`].
    ///
    /// The produced element's pending transform is always the default one:
    /// the matrix has been folded into the geometry.
    pub fn apply_transform(&self, ts: Transform) -> Result<Element, Error> {
        match *self {
            Element::Rect(ref e) => apply_to_rect(e, ts),
            Element::Polygon(ref e) => {
                Ok(Element::Polygon(Polygon {
                    id: e.id.clone(),
                    transform: Transform::default(),
                    points: apply_to_points(&e.points, ts),
                }))
            }
            Element::Polyline(ref e) => {
                Ok(Element::Polyline(Polyline {
                    id: e.id.clone(),
                    transform: Transform::default(),
                    points: apply_to_points(&e.points, ts),
                }))
            }
            Element::Circle(ref e) => apply_to_circle(e, ts),
            Element::Ellipse(ref e) => apply_to_ellipse(e, ts),
            Element::Line(ref e) => {
                let (x1, y1) = ts.apply(e.x1, e.y1);
                let (x2, y2) = ts.apply(e.x2, e.y2);
                Ok(Element::Line(Line {
                    id: e.id.clone(),
                    transform: Transform::default(),
                    x1, y1, x2, y2,
                }))
            }
            Element::Path(ref e) => {
                let mut data = e.data.clone();
                data.transform(ts);
                Ok(Element::Path(Path {
                    id: e.id.clone(),
                    transform: Transform::default(),
                    data,
                }))
            }
            Element::Group(ref e) => {
                let mut children = Vec::with_capacity(e.children.len());
                for child in &e.children {
                    children.push(transform_element(child, ts)?);
                }

                Ok(Element::Group(Group {
                    id: e.id.clone(),
                    transform: Transform::default(),
                    children,
                }))
            }
        }
    }

    /// Serializes the element into a JSON value.
    ///
    /// When `omit_transform` is set, the `transform` key is suppressed
    /// even for elements with a pending transform.
    pub fn to_json(&self, omit_transform: bool) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("type".to_string(), Value::from(self.tag_name()));
        if !self.id().is_empty() {
            map.insert("id".to_string(), Value::from(self.id()));
        }

        match *self {
            Element::Rect(ref e) => {
                map.insert("x".to_string(), Value::from(e.x));
                map.insert("y".to_string(), Value::from(e.y));
                map.insert("width".to_string(), Value::from(e.width));
                map.insert("height".to_string(), Value::from(e.height));
            }
            Element::Polygon(ref e) => {
                map.insert("points".to_string(), Value::from(export::points_to_string(&e.points)));
            }
            Element::Polyline(ref e) => {
                map.insert("points".to_string(), Value::from(export::points_to_string(&e.points)));
            }
            Element::Circle(ref e) => {
                map.insert("cx".to_string(), Value::from(e.cx));
                map.insert("cy".to_string(), Value::from(e.cy));
                map.insert("r".to_string(), Value::from(e.r));
            }
            Element::Ellipse(ref e) => {
                map.insert("cx".to_string(), Value::from(e.cx));
                map.insert("cy".to_string(), Value::from(e.cy));
                map.insert("rx".to_string(), Value::from(e.rx));
                map.insert("ry".to_string(), Value::from(e.ry));
            }
            Element::Line(ref e) => {
                map.insert("x1".to_string(), Value::from(e.x1));
                map.insert("y1".to_string(), Value::from(e.y1));
                map.insert("x2".to_string(), Value::from(e.x2));
                map.insert("y2".to_string(), Value::from(e.y2));
            }
            Element::Path(ref e) => {
                map.insert("d".to_string(), Value::from(export::path_to_string(&e.data)));
            }
            Element::Group(ref e) => {
                let childs: Vec<Value> = e.children.iter()
                    .map(|c| c.to_json(omit_transform))
                    .collect();
                map.insert("childs".to_string(), Value::from(childs));
            }
        }

        if !omit_transform && !self.transform().is_default() {
            map.insert(
                "transform".to_string(),
                Value::from(export::transform_to_string(self.transform())),
            );
        }

        Value::Object(map)
    }

    /// Serializes the element into an XML fragment string.
    ///
    /// The fragment has no parent node: `<rect x="10"/>`.
    pub fn to_xml_string(&self, omit_transform: bool) -> String {
        export::element_to_string(self, omit_transform)
    }
}

/// Derives the final matrix for an element and applies it.
///
/// This is the per-element step of the transform pipeline: the element's
/// bounding box anchors its pending transform, which is then composed onto
/// the incoming base matrix. Elements without a bounding box cannot be
/// processed.
pub(crate) fn transform_element(elem: &Element, base: Transform) -> Result<Element, Error> {
    let bbox = match elem.bbox() {
        Some(b) => b,
        None => return Err(Error::InvalidBbox(element_name(elem))),
    };

    let mut ts = base;
    ts.append(&Transform::from_bbox(elem.transform(), bbox));
    elem.apply_transform(ts)
}

fn element_name(elem: &Element) -> String {
    shape_name(elem.tag_name(), elem.id())
}

pub(crate) fn shape_name(tag_name: &str, id: &str) -> String {
    if id.is_empty() {
        tag_name.to_string()
    } else {
        format!("{}#{}", tag_name, id)
    }
}

fn apply_to_points(points: &[Point], ts: Transform) -> Vec<Point> {
    points.iter().map(|p| {
        let (x, y) = ts.apply(p.x, p.y);
        Point::new(x, y)
    }).collect()
}

fn apply_to_rect(rect: &Rect, ts: Transform) -> Result<Element, Error> {
    if ts.is_axis_aligned() {
        // The rect stays axis-aligned. A mirroring transform can swap
        // the corners, so renormalize to a non-negative size.
        let (x1, y1) = ts.apply(rect.x, rect.y);
        let (x2, y2) = ts.apply(rect.x + rect.width, rect.y + rect.height);
        Ok(Element::Rect(Rect {
            id: rect.id.clone(),
            transform: Transform::default(),
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        }))
    } else {
        // Rotation or skew. An axis-aligned rect cannot represent the
        // result, so emit a polygon of the transformed corners.
        let corners = [
            Point::new(rect.x, rect.y),
            Point::new(rect.x + rect.width, rect.y),
            Point::new(rect.x + rect.width, rect.y + rect.height),
            Point::new(rect.x, rect.y + rect.height),
        ];
        Ok(Element::Polygon(Polygon {
            id: rect.id.clone(),
            transform: Transform::default(),
            points: apply_to_points(&corners, ts),
        }))
    }
}

fn apply_to_circle(circle: &Circle, ts: Transform) -> Result<Element, Error> {
    if !ts.is_axis_aligned() {
        return Err(Error::UnsupportedTransform(shape_name("circle", &circle.id)));
    }

    let (cx, cy) = ts.apply(circle.cx, circle.cy);
    let (sx, sy) = ts.get_scale();
    if ts.has_proportional_scale() {
        Ok(Element::Circle(Circle {
            id: circle.id.clone(),
            transform: Transform::default(),
            cx, cy,
            r: circle.r * sx,
        }))
    } else {
        Ok(Element::Ellipse(Ellipse {
            id: circle.id.clone(),
            transform: Transform::default(),
            cx, cy,
            rx: circle.r * sx,
            ry: circle.r * sy,
        }))
    }
}

fn apply_to_ellipse(ellipse: &Ellipse, ts: Transform) -> Result<Element, Error> {
    if !ts.is_axis_aligned() {
        return Err(Error::UnsupportedTransform(shape_name("ellipse", &ellipse.id)));
    }

    let (cx, cy) = ts.apply(ellipse.cx, ellipse.cy);
    let (sx, sy) = ts.get_scale();
    Ok(Element::Ellipse(Ellipse {
        id: ellipse.id.clone(),
        transform: Transform::default(),
        cx, cy,
        rx: ellipse.rx * sx,
        ry: ellipse.ry * sy,
    }))
}


/// A rect element.
///
/// `rect` element in SVG.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default)]
pub struct Rect {
    /// Element's ID.
    ///
    /// Taken from the SVG itself.
    /// Can be empty.
    pub id: String,

    /// Element's pending transform.
    pub transform: Transform,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A polygon element.
///
/// `polygon` element in SVG.
#[derive(Clone, Debug, Default)]
pub struct Polygon {
    /// Element's ID.
    ///
    /// Taken from the SVG itself.
    /// Can be empty.
    pub id: String,

    /// Element's pending transform.
    pub transform: Transform,

    /// Vertices list.
    ///
    /// The closing edge back to the first vertex is implied.
    pub points: Vec<Point>,
}

/// A polyline element.
///
/// `polyline` element in SVG.
#[derive(Clone, Debug, Default)]
pub struct Polyline {
    /// Element's ID.
    ///
    /// Taken from the SVG itself.
    /// Can be empty.
    pub id: String,

    /// Element's pending transform.
    pub transform: Transform,

    /// Vertices list.
    pub points: Vec<Point>,
}

/// A circle element.
///
/// `circle` element in SVG.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default)]
pub struct Circle {
    /// Element's ID.
    ///
    /// Taken from the SVG itself.
    /// Can be empty.
    pub id: String,

    /// Element's pending transform.
    pub transform: Transform,

    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

/// An ellipse element.
///
/// `ellipse` element in SVG.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default)]
pub struct Ellipse {
    /// Element's ID.
    ///
    /// Taken from the SVG itself.
    /// Can be empty.
    pub id: String,

    /// Element's pending transform.
    pub transform: Transform,

    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

/// A line element.
///
/// `line` element in SVG.
#[allow(missing_docs)]
#[derive(Clone, Debug, Default)]
pub struct Line {
    /// Element's ID.
    ///
    /// Taken from the SVG itself.
    /// Can be empty.
    pub id: String,

    /// Element's pending transform.
    pub transform: Transform,

    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// A path element.
///
/// `path` element in SVG.
#[derive(Clone, Debug, Default)]
pub struct Path {
    /// Element's ID.
    ///
    /// Taken from the SVG itself.
    /// Can be empty.
    pub id: String,

    /// Element's pending transform.
    pub transform: Transform,

    /// Segments list.
    ///
    /// All segments are in absolute coordinates.
    pub data: PathData,
}

/// A group container.
///
/// `g` element in SVG.
#[derive(Clone, Debug, Default)]
pub struct Group {
    /// Element's ID.
    ///
    /// Taken from the SVG itself.
    /// Can be empty.
    pub id: String,

    /// Element's pending transform.
    pub transform: Transform,

    /// An ordered list of child elements.
    ///
    /// Children may be groups themselves. The structure is a tree.
    pub children: Vec<Element>,
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::FuzzyEq;

    #[test]
    fn element_size() {
        assert!(std::mem::size_of::<Element>() <= 256);
    }

    #[test]
    fn rect_stays_rect_under_identity() {
        let rect = Rect { x: 10.0, y: 20.0, width: 30.0, height: 40.0, ..Rect::default() };
        let new_elem = Element::Rect(rect).apply_transform(Transform::default()).unwrap();

        match new_elem {
            Element::Rect(ref e) => {
                assert!(e.x.fuzzy_eq(&10.0));
                assert!(e.y.fuzzy_eq(&20.0));
                assert!(e.width.fuzzy_eq(&30.0));
                assert!(e.height.fuzzy_eq(&40.0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn rect_becomes_polygon_under_rotation() {
        let rect = Rect { x: 0.0, y: 0.0, width: 10.0, height: 10.0, ..Rect::default() };
        // An exact 90 degree rotation matrix.
        let ts = Transform::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0);
        let new_elem = Element::Rect(rect).apply_transform(ts).unwrap();

        match new_elem {
            Element::Polygon(ref e) => {
                assert_eq!(e.points.len(), 4);
                // (10, 0) maps to (0, 10) under a 90 degree rotation.
                assert!(e.points[1].fuzzy_eq(&Point::new(0.0, 10.0)));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn rect_mirroring_renormalizes_size() {
        let rect = Rect { x: 10.0, y: 0.0, width: 20.0, height: 5.0, ..Rect::default() };
        let ts = Transform::new_scale(-1.0, 1.0);
        let new_elem = Element::Rect(rect).apply_transform(ts).unwrap();

        match new_elem {
            Element::Rect(ref e) => {
                assert!(e.x.fuzzy_eq(&-30.0));
                assert!(e.width.fuzzy_eq(&20.0));
                assert!(e.height.fuzzy_eq(&5.0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn circle_becomes_ellipse_under_non_proportional_scale() {
        let circle = Circle { cx: 10.0, cy: 10.0, r: 5.0, ..Circle::default() };
        let ts = Transform::new_scale(2.0, 3.0);
        let new_elem = Element::Circle(circle).apply_transform(ts).unwrap();

        match new_elem {
            Element::Ellipse(ref e) => {
                assert!(e.cx.fuzzy_eq(&20.0));
                assert!(e.cy.fuzzy_eq(&30.0));
                assert!(e.rx.fuzzy_eq(&10.0));
                assert!(e.ry.fuzzy_eq(&15.0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn rotated_circle_is_an_error() {
        let circle = Circle { r: 5.0, ..Circle::default() };
        let ts = Transform::new_rotate(45.0);
        assert!(Element::Circle(circle).apply_transform(ts).is_err());
    }

    #[test]
    fn group_bbox_is_a_union() {
        let group = Group {
            children: vec![
                Element::Rect(Rect { x: 0.0, y: 0.0, width: 10.0, height: 10.0, ..Rect::default() }),
                Element::Circle(Circle { cx: 30.0, cy: 5.0, r: 5.0, ..Circle::default() }),
            ],
            ..Group::default()
        };

        let bbox = Element::Group(group).bbox().unwrap();
        assert!(bbox.fuzzy_eq(&BBox::new(0.0, 0.0, 35.0, 10.0)));
    }

    #[test]
    fn empty_group_has_no_bbox() {
        assert!(Element::Group(Group::default()).bbox().is_none());
    }
}
