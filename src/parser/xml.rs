// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::element::{Circle, Element, Ellipse, Group, Line, Path, Polygon, Polyline, Rect};
use crate::geom::Point;
use crate::transform::Transform;
use crate::{Error, IsValidLength};

pub(crate) fn parse(text: &str) -> Result<Vec<Element>, Error> {
    let doc = roxmltree::Document::parse(text)?;

    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(roxmltree::Error::NoRootNode.into());
    }

    Ok(convert_children(root))
}

fn convert_children(parent: roxmltree::Node) -> Vec<Element> {
    let mut elements = Vec::new();
    for node in parent.children().filter(|n| n.is_element()) {
        if let Some(elem) = convert_node(node) {
            elements.push(elem);
        }
    }

    elements
}

fn convert_node(node: roxmltree::Node) -> Option<Element> {
    match node.tag_name().name() {
        "rect" => convert_rect(node),
        "polygon" => convert_polygon(node),
        "polyline" => convert_polyline(node),
        "circle" => convert_circle(node),
        "ellipse" => convert_ellipse(node),
        "line" => Some(convert_line(node)),
        "path" => convert_path(node),
        "g" => Some(convert_group(node)),
        tag_name => {
            log::warn!("'{}' is not a supported element. Skipped.", tag_name);
            None
        }
    }
}

fn convert_rect(node: roxmltree::Node) -> Option<Element> {
    let id = node.attribute("id").unwrap_or_default();

    // 'width' and 'height' attributes must be positive and non-zero.
    let width = number_attr(node, "width");
    let height = number_attr(node, "height");
    if !width.is_valid_length() {
        log::warn!("Rect '{}' has an invalid 'width' value. Skipped.", id);
        return None;
    }
    if !height.is_valid_length() {
        log::warn!("Rect '{}' has an invalid 'height' value. Skipped.", id);
        return None;
    }

    Some(Element::Rect(Rect {
        id: id.to_string(),
        transform: transform_attr(node),
        x: number_attr(node, "x"),
        y: number_attr(node, "y"),
        width,
        height,
    }))
}

fn convert_polygon(node: roxmltree::Node) -> Option<Element> {
    let points = convert_points(node, "Polygon")?;
    Some(Element::Polygon(Polygon {
        id: node.attribute("id").unwrap_or_default().to_string(),
        transform: transform_attr(node),
        points,
    }))
}

fn convert_polyline(node: roxmltree::Node) -> Option<Element> {
    let points = convert_points(node, "Polyline")?;
    Some(Element::Polyline(Polyline {
        id: node.attribute("id").unwrap_or_default().to_string(),
        transform: transform_attr(node),
        points,
    }))
}

fn convert_points(node: roxmltree::Node, eid: &str) -> Option<Vec<Point>> {
    let id = node.attribute("id").unwrap_or_default();

    let points = match node.attribute("points") {
        Some(text) => super::parse_points(text),
        None => {
            log::warn!("{} '{}' has an invalid 'points' value. Skipped.", eid, id);
            return None;
        }
    };

    // 'polyline' and 'polygon' elements must contain at least 2 points.
    if points.len() < 2 {
        log::warn!("{} '{}' has less than 2 points. Skipped.", eid, id);
        return None;
    }

    Some(points)
}

fn convert_circle(node: roxmltree::Node) -> Option<Element> {
    let id = node.attribute("id").unwrap_or_default();

    let r = number_attr(node, "r");
    if !r.is_valid_length() {
        log::warn!("Circle '{}' has an invalid 'r' value. Skipped.", id);
        return None;
    }

    Some(Element::Circle(Circle {
        id: id.to_string(),
        transform: transform_attr(node),
        cx: number_attr(node, "cx"),
        cy: number_attr(node, "cy"),
        r,
    }))
}

fn convert_ellipse(node: roxmltree::Node) -> Option<Element> {
    let id = node.attribute("id").unwrap_or_default();

    let rx = number_attr(node, "rx");
    if !rx.is_valid_length() {
        log::warn!("Ellipse '{}' has an invalid 'rx' value. Skipped.", id);
        return None;
    }

    let ry = number_attr(node, "ry");
    if !ry.is_valid_length() {
        log::warn!("Ellipse '{}' has an invalid 'ry' value. Skipped.", id);
        return None;
    }

    Some(Element::Ellipse(Ellipse {
        id: id.to_string(),
        transform: transform_attr(node),
        cx: number_attr(node, "cx"),
        cy: number_attr(node, "cy"),
        rx,
        ry,
    }))
}

fn convert_line(node: roxmltree::Node) -> Element {
    Element::Line(Line {
        id: node.attribute("id").unwrap_or_default().to_string(),
        transform: transform_attr(node),
        x1: number_attr(node, "x1"),
        y1: number_attr(node, "y1"),
        x2: number_attr(node, "x2"),
        y2: number_attr(node, "y2"),
    })
}

fn convert_path(node: roxmltree::Node) -> Option<Element> {
    let id = node.attribute("id").unwrap_or_default();

    let data = match node.attribute("d") {
        Some(text) => super::parse_path(text),
        None => {
            log::warn!("Path '{}' has no 'd' attribute. Skipped.", id);
            return None;
        }
    };

    // A path must have at least two segments.
    if data.len() < 2 {
        log::warn!("Path '{}' has an invalid 'd' value. Skipped.", id);
        return None;
    }

    Some(Element::Path(Path {
        id: id.to_string(),
        transform: transform_attr(node),
        data,
    }))
}

fn convert_group(node: roxmltree::Node) -> Element {
    Element::Group(Group {
        id: node.attribute("id").unwrap_or_default().to_string(),
        transform: transform_attr(node),
        children: convert_children(node),
    })
}

fn number_attr(node: roxmltree::Node, name: &str) -> f64 {
    match node.attribute(name) {
        Some(text) => match super::parse_number(text) {
            Ok(n) => n,
            Err(_) => {
                log::warn!("Failed to parse {} value: '{}'.", name, text);
                0.0
            }
        },
        None => 0.0,
    }
}

fn transform_attr(node: roxmltree::Node) -> Transform {
    match node.attribute("transform") {
        Some(text) => match text.parse() {
            Ok(ts) => ts,
            Err(_) => {
                log::warn!("Failed to parse transform value: '{}'.", text);
                Transform::default()
            }
        },
        None => Transform::default(),
    }
}
