// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgdoc` is an SVG document model with an async transform pipeline.

## Purpose

*svgdoc* parses a small subset of SVG (or an equivalent JSON form) into an
ordered tree of shape elements, lets you query and transform that tree and
serializes it back. It is aimed at programmatic document manipulation, not
rendering: the only raster capability is handing a saved file to an external
converter.

## Key features

- Only shape elements: `rect`, `polygon`, `polyline`, `circle`, `ellipse`,
  `line`, `path` and `g`
- Simple paths:
  - Only MoveTo, LineTo, CurveTo and ClosePath will be produced
  - All path segments are in absolute coordinates
  - Quadratic curves and arcs are lowered to cubic curves
- Transforms are applied around the element's bounding box center and are
  folded into the geometry itself
- Applying a transform can change an element's kind: a rotated `rect`
  becomes a `polygon`, a non-proportionally scaled `circle` becomes an
  `ellipse`
- Per-element transform application runs as concurrent tasks while the
  document order is preserved
- A JSON form that mirrors the XML one

[SVG]: https://en.wikipedia.org/wiki/Scalable_Vector_Graphics
*/

#![doc(html_root_url = "https://docs.rs/svgdoc/0.1.0")]

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]

use std::path;

use float_cmp::ApproxEqUlps;

mod element;
mod error;
mod export;
mod geom;
mod options;
mod parser;
mod pathdata;
mod transform;

pub use crate::element::*;
pub use crate::error::*;
pub use crate::geom::*;
pub use crate::options::*;
pub use crate::pathdata::*;
pub use crate::transform::*;

/// A trait for fuzzy/approximate equality comparisons of float numbers.
pub trait FuzzyEq<Rhs: ?Sized = Self> {
    /// Returns `true` if values are approximately equal.
    fn fuzzy_eq(&self, other: &Rhs) -> bool;

    /// Returns `true` if values are not approximately equal.
    #[inline]
    fn fuzzy_ne(&self, other: &Rhs) -> bool {
        !self.fuzzy_eq(other)
    }
}

impl FuzzyEq for f64 {
    #[inline]
    fn fuzzy_eq(&self, other: &f64) -> bool {
        self.approx_eq_ulps(other, 4)
    }
}

/// A trait for fuzzy/approximate comparisons of float numbers.
pub trait FuzzyZero: FuzzyEq {
    /// Returns `true` if the number is approximately zero.
    fn is_fuzzy_zero(&self) -> bool;
}

impl FuzzyZero for f64 {
    #[inline]
    fn is_fuzzy_zero(&self) -> bool {
        self.fuzzy_eq(&0.0)
    }
}

/// Checks that the current number is > 0.
pub trait IsValidLength {
    /// Checks that the current number is > 0.
    fn is_valid_length(&self) -> bool;
}

impl IsValidLength for f64 {
    #[inline]
    fn is_valid_length(&self) -> bool {
        *self > 0.0
    }
}

/// An SVG document.
///
/// An ordered sequence of shape elements. The order is the document order
/// and every operation preserves it, including the concurrent
/// [`apply_matrix`](Svg::apply_matrix).
#[derive(Clone, Default, Debug)]
pub struct Svg {
    elements: Vec<Element>,
}

impl Svg {
    /// Creates an empty document.
    pub fn new() -> Self {
        Svg::default()
    }

    /// Parses a document from a file.
    ///
    /// The file content can be an SVG string or a gzip compressed data.
    pub async fn from_file<P: AsRef<path::Path>>(path: P) -> Result<Self, Error> {
        let data = tokio::fs::read(path).await?;
        Self::from_data(&data).await
    }

    /// Parses a document from SVG data.
    ///
    /// Can contain an SVG string or a gzip compressed data.
    pub async fn from_data(data: &[u8]) -> Result<Self, Error> {
        if data.starts_with(&[0x1f, 0x8b]) {
            let data = decompress_svgz(data)?;
            let text = std::str::from_utf8(&data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::from_str(text).await
        } else {
            let text = std::str::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)?;
            Self::from_str(text).await
        }
    }

    /// Parses a document from an SVG string.
    ///
    /// Unsupported and invalid child elements are skipped with a warning.
    /// Malformed XML is an error.
    pub async fn from_str(text: &str) -> Result<Self, Error> {
        let elements = parser::xml::parse(text)?;
        Ok(Svg { elements })
    }

    /// Parses a document from a JSON file.
    pub async fn from_json_file<P: AsRef<path::Path>>(path: P) -> Result<Self, Error> {
        let data = tokio::fs::read(path).await?;
        let text = std::str::from_utf8(&data).map_err(|_| Error::NotAnUtf8Str)?;
        Self::from_json_str(text).await
    }

    /// Parses a document from a JSON string.
    pub async fn from_json_str(text: &str) -> Result<Self, Error> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json_value(&value).await
    }

    /// Parses a document from an already parsed JSON value.
    ///
    /// Unlike the XML front end, any malformed element is an error here.
    pub async fn from_json_value(value: &serde_json::Value) -> Result<Self, Error> {
        let elements = parser::json::parse(value)?;
        Ok(Svg { elements })
    }

    /// Returns document's elements.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Replaces document's elements.
    pub fn set_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
    }

    /// Appends an element to the end of the document.
    pub fn add_element(&mut self, elem: Element) {
        self.elements.push(elem);
    }

    /// Collects all elements with the provided tag name into a new document.
    ///
    /// Matches at the current level are collected first. When `recursive`
    /// is set, matches from each group's subtree follow, in document order,
    /// with the same rule applied per level. Matched elements are cloned.
    pub fn find_by_type(&self, tag_name: &str, recursive: bool) -> Svg {
        let mut elements = Vec::new();
        collect_by_type(&self.elements, tag_name, recursive, &mut elements);
        Svg { elements }
    }

    /// Returns the first element with the provided ID.
    ///
    /// The search is depth-first in document order and stops at the first
    /// match. Elements with an empty ID never match.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        find_by_id(&self.elements, id)
    }

    /// Serializes the document as a JSON value.
    ///
    /// With `omit_transform` set, the elements' `transform` fields
    /// are suppressed.
    pub fn to_json(&self, omit_transform: bool) -> serde_json::Value {
        let elements: Vec<serde_json::Value> = self
            .elements
            .iter()
            .map(|e| e.to_json(omit_transform))
            .collect();

        let mut map = serde_json::Map::new();
        map.insert("elements".to_string(), serde_json::Value::from(elements));
        serde_json::Value::Object(map)
    }

    /// Serializes the document as an SVG document string.
    pub fn to_xml(&self, omit_transform: bool) -> String {
        export::convert(self, omit_transform)
    }

    /// Serializes the document as a string.
    ///
    /// With `wrap` set, the result is a complete SVG document, same as
    /// [`Svg::to_xml`]. Without it, the result is a plain concatenation
    /// of the element fragments with no root element around them.
    pub fn to_string(&self, wrap: bool, omit_transform: bool) -> String {
        if wrap {
            self.to_xml(omit_transform)
        } else {
            let mut s = String::new();
            for elem in &self.elements {
                s.push_str(&elem.to_xml_string(omit_transform));
            }

            s
        }
    }

    /// Applies matrices to every element, producing a new document.
    ///
    /// The matrices are composed left to right into a single base matrix;
    /// an empty slice means identity. Then, for every element: the element's
    /// bounding box is calculated, the element's own pending transform is
    /// re-anchored at the bbox center and composed onto the base matrix,
    /// and the composed matrix is applied to the element's geometry
    /// (see [`Element::apply_transform`]).
    ///
    /// Every element is processed in its own task. The document order is
    /// preserved and the first failure aborts the whole operation without
    /// producing a partial document.
    pub async fn apply_matrix(&self, matrices: &[Transform]) -> Result<Svg, Error> {
        let mut base = Transform::default();
        for ts in matrices {
            base.append(ts);
        }

        let mut tasks = Vec::with_capacity(self.elements.len());
        for elem in &self.elements {
            let elem = elem.clone();
            tasks.push(tokio::spawn(async move {
                element::transform_element(&elem, base)
            }));
        }

        // Tasks are awaited in spawn order, so the document order does not
        // depend on the completion order.
        let mut elements = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(Ok(elem)) => elements.push(elem),
                Ok(Err(e)) => return Err(e),
                Err(e) => return Err(Error::TaskFailed(e.to_string())),
            }
        }

        Ok(Svg { elements })
    }

    /// Saves the document to an SVG file and returns the written path.
    ///
    /// When [`Options::output_path`] is not set, a unique path inside
    /// [`Options::output_dir`] is generated, so repeated saves never
    /// overwrite each other.
    pub async fn save(&self, opt: &Options) -> Result<path::PathBuf, Error> {
        let path = match opt.output_path {
            Some(ref path) => path.clone(),
            None => opt.generate_output_path("svg"),
        };

        tokio::fs::write(&path, self.to_xml(false)).await?;
        Ok(path)
    }

    /// Renders the document to a PNG file via an external converter
    /// and returns the written path.
    ///
    /// The document is first saved to a generated SVG path, then
    /// [`Options::converter`] is invoked on it ImageMagick-style:
    /// `<converter> <svg path> <png path>`. A missing program or
    /// a non-zero exit status is an error carrying the tool's stderr.
    pub async fn save_png(&self, opt: &Options) -> Result<path::PathBuf, Error> {
        let png_path = match opt.output_path {
            Some(ref path) => path.clone(),
            None => opt.generate_output_path("png"),
        };

        let svg_path = opt.generate_output_path("svg");
        tokio::fs::write(&svg_path, self.to_xml(false)).await?;

        let output = tokio::process::Command::new(&opt.converter)
            .arg(&svg_path)
            .arg(&png_path)
            .output()
            .await
            .map_err(|e| Error::ConverterFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(Error::ConverterFailed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        Ok(png_path)
    }
}

fn collect_by_type(list: &[Element], tag_name: &str, recursive: bool, out: &mut Vec<Element>) {
    for elem in list {
        if elem.tag_name() == tag_name {
            out.push(elem.clone());
        }
    }

    if recursive {
        for elem in list {
            if let Element::Group(ref g) = *elem {
                collect_by_type(&g.children, tag_name, recursive, out);
            }
        }
    }
}

fn find_by_id<'a>(list: &'a [Element], id: &str) -> Option<&'a Element> {
    for elem in list {
        if !elem.id().is_empty() && elem.id() == id {
            return Some(elem);
        }

        if let Element::Group(ref g) = *elem {
            if let Some(found) = find_by_id(&g.children, id) {
                return Some(found);
            }
        }
    }

    None
}

/// Decompresses an SVGZ data.
fn decompress_svgz(data: &[u8]) -> Result<Vec<u8>, Error> {
    use std::io::Read;

    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut decoded)
        .map_err(|_| Error::MalformedGZip)?;
    Ok(decoded)
}
