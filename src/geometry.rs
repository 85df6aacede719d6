//! Geometric primitives for token layout analysis.
//!
//! OCR engines report word boxes as axis-aligned quadrilaterals of integer
//! points. Everything downstream (line grouping, windowed harvesting, shape
//! deduplication) works on the rectangular hull of those quads.

use serde::{Deserialize, Serialize};

/// An axis-aligned quadrilateral: four `[x, y]` corner points in pixel space,
/// ordered top-left, top-right, bottom-right, bottom-left.
pub type Quad = [[i32; 2]; 4];

/// Build a quad from an `(x, y, w, h)` word record as OCR engines report them.
pub fn quad_from_xywh(x: i32, y: i32, w: i32, h: i32) -> Quad {
    [[x, y], [x + w, y], [x + w, y + h], [x, y + h]]
}

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge x-coordinate
    pub x0: i32,
    /// Top edge y-coordinate
    pub y0: i32,
    /// Right edge x-coordinate
    pub x1: i32,
    /// Bottom edge y-coordinate
    pub y1: i32,
}

impl Rect {
    /// Create a rectangle from its corner coordinates.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangular hull of a quad.
    ///
    /// # Examples
    ///
    /// ```
    /// use form_harvest::geometry::{Rect, quad_from_xywh};
    ///
    /// let r = Rect::from_quad(&quad_from_xywh(10, 20, 100, 50));
    /// assert_eq!(r, Rect::new(10, 20, 110, 70));
    /// ```
    pub fn from_quad(quad: &Quad) -> Self {
        let xs = quad.iter().map(|p| p[0]);
        let ys = quad.iter().map(|p| p[1]);
        Self {
            x0: xs.clone().min().unwrap_or(0),
            y0: ys.clone().min().unwrap_or(0),
            x1: xs.max().unwrap_or(0),
            y1: ys.max().unwrap_or(0),
        }
    }

    /// Convert back to a four-point quad.
    pub fn to_quad(&self) -> Quad {
        [
            [self.x0, self.y0],
            [self.x1, self.y0],
            [self.x1, self.y1],
            [self.x0, self.y1],
        ]
    }

    /// Width of the rectangle.
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    /// Height of the rectangle.
    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    /// Area in square pixels (zero for degenerate rectangles).
    pub fn area(&self) -> i64 {
        (self.width().max(0) as i64) * (self.height().max(0) as i64)
    }

    /// Horizontal center.
    pub fn center_x(&self) -> i32 {
        (self.x0 + self.x1) / 2
    }

    /// Vertical center.
    pub fn center_y(&self) -> i32 {
        (self.y0 + self.y1) / 2
    }

    /// Area of the intersection with another rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use form_harvest::geometry::Rect;
    ///
    /// let a = Rect::new(0, 0, 10, 10);
    /// let b = Rect::new(5, 5, 15, 15);
    /// assert_eq!(a.intersection_area(&b), 25);
    ///
    /// let c = Rect::new(20, 20, 30, 30);
    /// assert_eq!(a.intersection_area(&c), 0);
    /// ```
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let iw = (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0) as i64;
        let ih = (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0) as i64;
        iw * ih
    }

    /// Intersection area as a fraction of the smaller rectangle's area.
    ///
    /// Returns 0.0 when either rectangle is degenerate. Used by the shape
    /// detectors to merge overlapping duplicates.
    pub fn overlap_of_smaller(&self, other: &Rect) -> f64 {
        let smaller = self.area().min(other.area());
        if smaller <= 0 {
            return 0.0;
        }
        self.intersection_area(other) as f64 / smaller as f64
    }

    /// Squared Euclidean distance between the centers of two rectangles.
    pub fn center_distance_sq(&self, other: &Rect) -> i64 {
        let dx = (self.center_x() - other.center_x()) as i64;
        let dy = (self.center_y() - other.center_y()) as i64;
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_round_trip() {
        let q = quad_from_xywh(5, 10, 20, 30);
        let r = Rect::from_quad(&q);
        assert_eq!(r, Rect::new(5, 10, 25, 40));
        assert_eq!(r.to_quad(), q);
    }

    #[test]
    fn test_centers() {
        let r = Rect::new(0, 0, 10, 20);
        assert_eq!(r.center_x(), 5);
        assert_eq!(r.center_y(), 10);
    }

    #[test]
    fn test_intersection_area() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 150, 150);
        assert_eq!(a.intersection_area(&b), 2500);
        assert_eq!(b.intersection_area(&a), 2500);
    }

    #[test]
    fn test_overlap_of_smaller() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(0, 0, 50, 50);
        // b lies entirely inside a
        assert!((a.overlap_of_smaller(&b) - 1.0).abs() < 1e-9);

        let degenerate = Rect::new(0, 0, 0, 0);
        assert_eq!(a.overlap_of_smaller(&degenerate), 0.0);
    }

    #[test]
    fn test_center_distance_sq() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(3, 4, 5, 8); // centers (1,1) and (4,6)
        assert_eq!(a.center_distance_sq(&b), 9 + 25);
    }
}
