// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;

use xmlwriter::XmlWriter;

use crate::element::Element;
use crate::geom::Point;
use crate::pathdata::{PathData, PathSegment};
use crate::transform::Transform;
use crate::FuzzyZero;
use crate::Svg;

pub(crate) fn convert(svg: &Svg, omit_transform: bool) -> String {
    let mut xml = XmlWriter::new(writer_options());

    xml.start_svg_element("svg");
    xml.write_attribute("version", "1.1");
    xml.write_attribute("xmlns", "http://www.w3.org/2000/svg");

    for elem in svg.elements() {
        write_element(elem, omit_transform, &mut xml);
    }

    xml.end_document()
}

pub(crate) fn element_to_string(elem: &Element, omit_transform: bool) -> String {
    let mut xml = XmlWriter::new(writer_options());
    write_element(elem, omit_transform, &mut xml);
    xml.end_document()
}

pub(crate) fn transform_to_string(ts: Transform) -> String {
    format!("matrix({} {} {} {} {} {})", ts.a, ts.b, ts.c, ts.d, ts.e, ts.f)
}

pub(crate) fn points_to_string(points: &[Point]) -> String {
    let mut buf = Vec::new();
    write_points(points, &mut buf);
    // `write_num` emits ASCII only.
    String::from_utf8(buf).unwrap()
}

pub(crate) fn path_to_string(data: &PathData) -> String {
    let mut buf = Vec::new();
    write_path_data(data, &mut buf);
    String::from_utf8(buf).unwrap()
}

// The output must stay byte-for-byte deterministic,
// so indentation is fixed and not configurable.
fn writer_options() -> xmlwriter::Options {
    xmlwriter::Options {
        indent: xmlwriter::Indent::None,
        ..xmlwriter::Options::default()
    }
}

fn write_element(elem: &Element, omit_transform: bool, xml: &mut XmlWriter) {
    match *elem {
        Element::Rect(ref e) => {
            xml.start_svg_element("rect");
            if !e.id.is_empty() {
                xml.write_id_attribute(&e.id);
            }
            xml.write_num_attribute("x", e.x);
            xml.write_num_attribute("y", e.y);
            xml.write_num_attribute("width", e.width);
            xml.write_num_attribute("height", e.height);
            if !omit_transform {
                xml.write_transform(e.transform);
            }
            xml.end_element();
        }
        Element::Polygon(ref e) => {
            xml.start_svg_element("polygon");
            if !e.id.is_empty() {
                xml.write_id_attribute(&e.id);
            }
            xml.write_attribute_raw("points", |buf| write_points(&e.points, buf));
            if !omit_transform {
                xml.write_transform(e.transform);
            }
            xml.end_element();
        }
        Element::Polyline(ref e) => {
            xml.start_svg_element("polyline");
            if !e.id.is_empty() {
                xml.write_id_attribute(&e.id);
            }
            xml.write_attribute_raw("points", |buf| write_points(&e.points, buf));
            if !omit_transform {
                xml.write_transform(e.transform);
            }
            xml.end_element();
        }
        Element::Circle(ref e) => {
            xml.start_svg_element("circle");
            if !e.id.is_empty() {
                xml.write_id_attribute(&e.id);
            }
            xml.write_num_attribute("cx", e.cx);
            xml.write_num_attribute("cy", e.cy);
            xml.write_num_attribute("r", e.r);
            if !omit_transform {
                xml.write_transform(e.transform);
            }
            xml.end_element();
        }
        Element::Ellipse(ref e) => {
            xml.start_svg_element("ellipse");
            if !e.id.is_empty() {
                xml.write_id_attribute(&e.id);
            }
            xml.write_num_attribute("cx", e.cx);
            xml.write_num_attribute("cy", e.cy);
            xml.write_num_attribute("rx", e.rx);
            xml.write_num_attribute("ry", e.ry);
            if !omit_transform {
                xml.write_transform(e.transform);
            }
            xml.end_element();
        }
        Element::Line(ref e) => {
            xml.start_svg_element("line");
            if !e.id.is_empty() {
                xml.write_id_attribute(&e.id);
            }
            xml.write_num_attribute("x1", e.x1);
            xml.write_num_attribute("y1", e.y1);
            xml.write_num_attribute("x2", e.x2);
            xml.write_num_attribute("y2", e.y2);
            if !omit_transform {
                xml.write_transform(e.transform);
            }
            xml.end_element();
        }
        Element::Path(ref e) => {
            xml.start_svg_element("path");
            if !e.id.is_empty() {
                xml.write_id_attribute(&e.id);
            }
            xml.write_attribute_raw("d", |buf| write_path_data(&e.data, buf));
            if !omit_transform {
                xml.write_transform(e.transform);
            }
            xml.end_element();
        }
        Element::Group(ref e) => {
            xml.start_svg_element("g");
            if !e.id.is_empty() {
                xml.write_id_attribute(&e.id);
            }
            if !omit_transform {
                xml.write_transform(e.transform);
            }

            for child in &e.children {
                write_element(child, omit_transform, xml);
            }

            xml.end_element();
        }
    }
}

fn write_points(points: &[Point], buf: &mut Vec<u8>) {
    for p in points {
        write_num(p.x, buf);
        buf.push(b',');
        write_num(p.y, buf);
        buf.push(b' ');
    }

    if !points.is_empty() {
        buf.pop();
    }
}

fn write_path_data(data: &PathData, buf: &mut Vec<u8>) {
    for seg in data.iter() {
        match *seg {
            PathSegment::MoveTo { x, y } => {
                buf.extend_from_slice(b"M ");
                write_num(x, buf);
                buf.push(b' ');
                write_num(y, buf);
                buf.push(b' ');
            }
            PathSegment::LineTo { x, y } => {
                buf.extend_from_slice(b"L ");
                write_num(x, buf);
                buf.push(b' ');
                write_num(y, buf);
                buf.push(b' ');
            }
            PathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                buf.extend_from_slice(b"C ");
                write_num(x1, buf);
                buf.push(b' ');
                write_num(y1, buf);
                buf.push(b' ');
                write_num(x2, buf);
                buf.push(b' ');
                write_num(y2, buf);
                buf.push(b' ');
                write_num(x, buf);
                buf.push(b' ');
                write_num(y, buf);
                buf.push(b' ');
            }
            PathSegment::ClosePath => {
                buf.extend_from_slice(b"Z ");
            }
        }
    }

    if !data.is_empty() {
        buf.pop();
    }
}

trait XmlWriterExt {
    fn start_svg_element(&mut self, name: &str);
    fn write_id_attribute(&mut self, value: &str);
    fn write_num_attribute(&mut self, name: &str, value: f64);
    fn write_transform(&mut self, ts: Transform);
}

impl XmlWriterExt for XmlWriter {
    #[inline(never)]
    fn start_svg_element(&mut self, name: &str) {
        self.start_element(name);
    }

    #[inline(never)]
    fn write_id_attribute(&mut self, value: &str) {
        self.write_attribute("id", value);
    }

    #[inline(never)]
    fn write_num_attribute(&mut self, name: &str, value: f64) {
        self.write_attribute_raw(name, |buf| write_num(value, buf));
    }

    fn write_transform(&mut self, ts: Transform) {
        if !ts.is_default() {
            self.write_attribute_fmt(
                "transform",
                format_args!("matrix({} {} {} {} {} {})", ts.a, ts.b, ts.c, ts.d, ts.e, ts.f),
            );
        }
    }
}

fn write_num(num: f64, buf: &mut Vec<u8>) {
    // If number is an integer, it's faster to write it as i64.
    // i32 is not enough, because coordinates can exceed it.
    if num.fract().is_fuzzy_zero() {
        write!(buf, "{}", num as i64).unwrap();
        return;
    }

    // Round numbers up to 11 digits to prevent writing
    // ugly numbers like 29.999999999999996.
    // It's not 100% correct, but differences are insignificant.
    let v = (num * 100_000_000_000.0).round() / 100_000_000_000.0;

    write!(buf, "{}", v).unwrap();
}
