// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// Failed to read or write a file.
    Io(std::io::Error),

    /// Only UTF-8 content are supported.
    NotAnUtf8Str,

    /// Compressed SVG must use the GZip algorithm.
    MalformedGZip,

    /// Failed to parse an SVG data.
    ParsingFailed(roxmltree::Error),

    /// Failed to parse a JSON data.
    InvalidJson(serde_json::Error),

    /// The JSON document has no `elements` array.
    InvalidDocument,

    /// A JSON element has an unknown `type` or a malformed geometry.
    UnsupportedShape(String),

    /// An element has no valid bounding box.
    InvalidBbox(String),

    /// A transform cannot be applied to an element exactly.
    ///
    /// Occurs when a `circle` or an `ellipse` is rotated or skewed.
    UnsupportedTransform(String),

    /// An external raster converter failed.
    ///
    /// Contains the tool's stderr output.
    ConverterFailed(String),

    /// An async task failed to complete.
    TaskFailed(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::ParsingFailed(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidJson(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::Io(ref e) => {
                write!(f, "an I/O operation failed cause {}", e)
            }
            Error::NotAnUtf8Str => {
                write!(f, "provided data has not an UTF-8 encoding")
            }
            Error::MalformedGZip => {
                write!(f, "provided data has a malformed GZip content")
            }
            Error::ParsingFailed(ref e) => {
                write!(f, "SVG data parsing failed cause {}", e)
            }
            Error::InvalidJson(ref e) => {
                write!(f, "JSON data parsing failed cause {}", e)
            }
            Error::InvalidDocument => {
                write!(f, "JSON document has no 'elements' array")
            }
            Error::UnsupportedShape(ref name) => {
                write!(f, "'{}' is not a valid shape element", name)
            }
            Error::InvalidBbox(ref name) => {
                write!(f, "'{}' element has no bounding box", name)
            }
            Error::UnsupportedTransform(ref name) => {
                write!(f, "'{}' element cannot be transformed exactly", name)
            }
            Error::ConverterFailed(ref msg) => {
                write!(f, "raster conversion failed cause {}", msg)
            }
            Error::TaskFailed(ref msg) => {
                write!(f, "async task failed cause {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}
