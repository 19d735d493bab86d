// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde_json::{Map, Value};

use crate::element::{shape_name, Circle, Element, Ellipse, Group, Line, Path, Polygon, Polyline, Rect};
use crate::geom::Point;
use crate::transform::Transform;
use crate::{Error, IsValidLength};

// Unlike the XML front end, the JSON one is strict: documents are
// machine-written, so any malformed element is an error and not a warning.
pub(crate) fn parse(value: &Value) -> Result<Vec<Element>, Error> {
    let list = match value.get("elements").and_then(Value::as_array) {
        Some(list) => list,
        None => return Err(Error::InvalidDocument),
    };

    let mut elements = Vec::with_capacity(list.len());
    for v in list {
        elements.push(convert_value(v)?);
    }

    Ok(elements)
}

fn convert_value(value: &Value) -> Result<Element, Error> {
    let obj = match value.as_object() {
        Some(obj) => obj,
        None => return Err(Error::UnsupportedShape(value.to_string())),
    };

    let tag_name = obj.get("type").and_then(Value::as_str).unwrap_or_default();
    match tag_name {
        "rect" => convert_rect(obj),
        "polygon" => convert_polygon(obj),
        "polyline" => convert_polyline(obj),
        "circle" => convert_circle(obj),
        "ellipse" => convert_ellipse(obj),
        "line" => convert_line(obj),
        "path" => convert_path(obj),
        "g" => convert_group(obj),
        _ => Err(Error::UnsupportedShape(tag_name.to_string())),
    }
}

fn convert_rect(obj: &Map<String, Value>) -> Result<Element, Error> {
    let id = string_field(obj, "id");
    let shape = shape_name("rect", &id);

    // 'width' and 'height' must be positive and non-zero.
    let width = number_field(obj, "width", &shape)?;
    let height = number_field(obj, "height", &shape)?;
    if !width.is_valid_length() || !height.is_valid_length() {
        return Err(Error::UnsupportedShape(shape));
    }

    Ok(Element::Rect(Rect {
        id,
        transform: transform_field(obj, &shape)?,
        x: number_field(obj, "x", &shape)?,
        y: number_field(obj, "y", &shape)?,
        width,
        height,
    }))
}

fn convert_polygon(obj: &Map<String, Value>) -> Result<Element, Error> {
    let id = string_field(obj, "id");
    let shape = shape_name("polygon", &id);

    Ok(Element::Polygon(Polygon {
        points: points_field(obj, &shape)?,
        transform: transform_field(obj, &shape)?,
        id,
    }))
}

fn convert_polyline(obj: &Map<String, Value>) -> Result<Element, Error> {
    let id = string_field(obj, "id");
    let shape = shape_name("polyline", &id);

    Ok(Element::Polyline(Polyline {
        points: points_field(obj, &shape)?,
        transform: transform_field(obj, &shape)?,
        id,
    }))
}

fn convert_circle(obj: &Map<String, Value>) -> Result<Element, Error> {
    let id = string_field(obj, "id");
    let shape = shape_name("circle", &id);

    let r = number_field(obj, "r", &shape)?;
    if !r.is_valid_length() {
        return Err(Error::UnsupportedShape(shape));
    }

    Ok(Element::Circle(Circle {
        id,
        transform: transform_field(obj, &shape)?,
        cx: number_field(obj, "cx", &shape)?,
        cy: number_field(obj, "cy", &shape)?,
        r,
    }))
}

fn convert_ellipse(obj: &Map<String, Value>) -> Result<Element, Error> {
    let id = string_field(obj, "id");
    let shape = shape_name("ellipse", &id);

    let rx = number_field(obj, "rx", &shape)?;
    let ry = number_field(obj, "ry", &shape)?;
    if !rx.is_valid_length() || !ry.is_valid_length() {
        return Err(Error::UnsupportedShape(shape));
    }

    Ok(Element::Ellipse(Ellipse {
        id,
        transform: transform_field(obj, &shape)?,
        cx: number_field(obj, "cx", &shape)?,
        cy: number_field(obj, "cy", &shape)?,
        rx,
        ry,
    }))
}

fn convert_line(obj: &Map<String, Value>) -> Result<Element, Error> {
    let id = string_field(obj, "id");
    let shape = shape_name("line", &id);

    Ok(Element::Line(Line {
        id,
        transform: transform_field(obj, &shape)?,
        x1: number_field(obj, "x1", &shape)?,
        y1: number_field(obj, "y1", &shape)?,
        x2: number_field(obj, "x2", &shape)?,
        y2: number_field(obj, "y2", &shape)?,
    }))
}

fn convert_path(obj: &Map<String, Value>) -> Result<Element, Error> {
    let id = string_field(obj, "id");
    let shape = shape_name("path", &id);

    let text = obj
        .get("d")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::UnsupportedShape(shape.clone()))?;

    let data = super::parse_path(text);
    if data.len() < 2 {
        return Err(Error::UnsupportedShape(shape));
    }

    Ok(Element::Path(Path {
        id,
        transform: transform_field(obj, &shape)?,
        data,
    }))
}

fn convert_group(obj: &Map<String, Value>) -> Result<Element, Error> {
    let id = string_field(obj, "id");
    let shape = shape_name("g", &id);

    let mut children = Vec::new();
    match obj.get("childs") {
        Some(Value::Array(list)) => {
            for v in list {
                children.push(convert_value(v)?);
            }
        }
        Some(_) => return Err(Error::UnsupportedShape(shape)),
        None => {}
    }

    Ok(Element::Group(Group {
        id,
        transform: transform_field(obj, &shape)?,
        children,
    }))
}

fn string_field(obj: &Map<String, Value>, name: &str) -> String {
    obj.get(name).and_then(Value::as_str).unwrap_or_default().to_string()
}

// A missing geometry field defaults to zero, same as a missing XML attribute.
fn number_field(obj: &Map<String, Value>, name: &str, shape: &str) -> Result<f64, Error> {
    match obj.get(name) {
        Some(v) => v.as_f64().ok_or_else(|| Error::UnsupportedShape(shape.to_string())),
        None => Ok(0.0),
    }
}

fn points_field(obj: &Map<String, Value>, shape: &str) -> Result<Vec<Point>, Error> {
    let text = obj
        .get("points")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::UnsupportedShape(shape.to_string()))?;

    let points = super::parse_points(text);

    // 'polyline' and 'polygon' elements must contain at least 2 points.
    if points.len() < 2 {
        return Err(Error::UnsupportedShape(shape.to_string()));
    }

    Ok(points)
}

fn transform_field(obj: &Map<String, Value>, shape: &str) -> Result<Transform, Error> {
    match obj.get("transform") {
        Some(v) => {
            let text = v
                .as_str()
                .ok_or_else(|| Error::UnsupportedShape(shape.to_string()))?;

            text.parse()
                .map_err(|_| Error::UnsupportedShape(shape.to_string()))
        }
        None => Ok(Transform::default()),
    }
}
