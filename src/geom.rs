// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

use crate::FuzzyEq;

/// A 2D point representation.
#[allow(missing_docs)]
#[derive(Clone, Copy)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new `Point` from values.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point::new(v.0, v.1)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Point({} {})", self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FuzzyEq for Point {
    fn fuzzy_eq(&self, other: &Self) -> bool {
           self.x.fuzzy_eq(&other.x)
        && self.y.fuzzy_eq(&other.y)
    }
}


/// An axis-aligned bounding box.
///
/// Unlike an SVG rect, can have a zero width and/or height.
/// A horizontal line still has a bounding box.
#[allow(missing_docs)]
#[derive(Clone, Copy)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    /// Creates a new `BBox` from values.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        BBox { x, y, width, height }
    }

    /// Creates a new `BBox` enclosing all the provided points.
    ///
    /// Returns `None` for an empty list.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;

        let mut minx = first.x;
        let mut miny = first.y;
        let mut maxx = first.x;
        let mut maxy = first.y;
        for p in points.iter().skip(1) {
            if p.x < minx { minx = p.x; }
            if p.x > maxx { maxx = p.x; }
            if p.y < miny { miny = p.y; }
            if p.y > maxy { maxy = p.y; }
        }

        Some(BBox::new(minx, miny, maxx - minx, maxy - miny))
    }

    /// Returns bbox's left edge position.
    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Returns bbox's right edge position.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Returns bbox's top edge position.
    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Returns bbox's bottom edge position.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns the position of the bbox center.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Expands the bbox to include another one.
    #[must_use]
    pub fn expand(&self, other: BBox) -> Self {
        let minx = self.x.min(other.x);
        let miny = self.y.min(other.y);
        let maxx = self.right().max(other.right());
        let maxy = self.bottom().max(other.bottom());
        BBox::new(minx, miny, maxx - minx, maxy - miny)
    }
}

impl FuzzyEq for BBox {
    fn fuzzy_eq(&self, other: &Self) -> bool {
           self.x.fuzzy_eq(&other.x)
        && self.y.fuzzy_eq(&other.y)
        && self.width.fuzzy_eq(&other.width)
        && self.height.fuzzy_eq(&other.height)
    }
}

impl fmt::Debug for BBox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BBox({} {} {} {})", self.x, self.y, self.width, self.height)
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_bbox() {
        let points = [
            Point::new(10.0, 5.0),
            Point::new(-2.0, 20.0),
            Point::new(7.0, 3.0),
        ];
        let bbox = BBox::from_points(&points).unwrap();
        assert!(bbox.fuzzy_eq(&BBox::new(-2.0, 3.0, 12.0, 17.0)));
    }

    #[test]
    fn empty_points_bbox() {
        assert!(BBox::from_points(&[]).is_none());
    }

    #[test]
    fn degenerate_bbox() {
        // A horizontal line has a zero height, which is still a valid bbox.
        let points = [Point::new(0.0, 10.0), Point::new(30.0, 10.0)];
        let bbox = BBox::from_points(&points).unwrap();
        assert!(bbox.fuzzy_eq(&BBox::new(0.0, 10.0, 30.0, 0.0)));
    }

    #[test]
    fn expand() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, -5.0, 20.0, 10.0);
        assert!(a.expand(b).fuzzy_eq(&BBox::new(0.0, -5.0, 25.0, 15.0)));
    }
}
