use crate::error::{PhysicsError, Result};
use crate::math::{is_in_range, Vec2};

use super::Extents;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vec2,
    pub end: Vec2,
}

impl LineSegment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Segment from `(x0, y)` to `(x1, y)`.
    pub fn horizontal(x0: f64, x1: f64, y: f64) -> Self {
        Self::new(Vec2::new(x0, y), Vec2::new(x1, y))
    }

    /// Segment from `(x, y0)` to `(x, y1)`.
    pub fn vertical(x: f64, y0: f64, y1: f64) -> Self {
        Self::new(Vec2::new(x, y0), Vec2::new(x, y1))
    }

    /// Calculates the length of the line segment.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Returns the direction vector of the line segment (from start to end).
    pub fn to_vector(&self) -> Vec2 {
        self.end - self.start
    }

    pub fn is_point(&self) -> bool {
        self.start.is_same(self.end)
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }

    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }

    /// The shared stretch of two collinear axis-aligned segments.
    ///
    /// Fails when the segments are not both horizontal or both vertical, do not
    /// lie on the same line, or do not touch at all.
    pub fn overlapping_segment(a: &LineSegment, b: &LineSegment) -> Result<LineSegment> {
        let incompatible = || PhysicsError::IncompatibleSegments { a: *a, b: *b };

        if a.is_horizontal() && b.is_horizontal() {
            let x0 = a.x0().max(b.x0());
            let x1 = a.x1().min(b.x1());
            let in_both = |x| is_in_range(a.x0(), x, a.x1(), true) && is_in_range(b.x0(), x, b.x1(), true);
            if a.start.y != b.start.y || !in_both(x0) || !in_both(x1) {
                return Err(incompatible());
            }
            return Ok(LineSegment::horizontal(x0, x1, a.start.y));
        }

        if a.is_vertical() && b.is_vertical() {
            let y0 = a.y0().max(b.y0());
            let y1 = a.y1().min(b.y1());
            let in_both = |y| is_in_range(a.y0(), y, a.y1(), true) && is_in_range(b.y0(), y, b.y1(), true);
            if a.start.x != b.start.x || !in_both(y0) || !in_both(y1) {
                return Err(incompatible());
            }
            return Ok(LineSegment::vertical(a.start.x, y0, y1));
        }

        Err(incompatible())
    }
}

impl Extents for LineSegment {
    fn x0(&self) -> f64 {
        self.start.x.min(self.end.x)
    }

    fn x1(&self) -> f64 {
        self.start.x.max(self.end.x)
    }

    fn y0(&self) -> f64 {
        self.start.y.min(self.end.y)
    }

    fn y1(&self) -> f64 {
        self.start.y.max(self.end.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_line_segment_length_and_vector() {
        let line = LineSegment::new(Vec2::new(1.0, 2.0), Vec2::new(4.0, 6.0));
        assert!((line.length() - 5.0).abs() < EPSILON);
        assert_eq!(line.to_vector(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_axis_aligned_constructors() {
        let h = LineSegment::horizontal(0.0, 10.0, 3.0);
        assert!(h.is_horizontal());
        assert!(!h.is_vertical());
        let v = LineSegment::vertical(2.0, 10.0, 0.0);
        assert!(v.is_vertical());
        assert_eq!((v.y0(), v.y1()), (0.0, 10.0));
        assert!(LineSegment::horizontal(1.0, 1.0, 1.0).is_point());
    }

    #[test]
    fn test_overlapping_segment_horizontal() {
        let a = LineSegment::horizontal(0.0, 10.0, 5.0);
        let b = LineSegment::horizontal(4.0, 20.0, 5.0);
        let overlap = LineSegment::overlapping_segment(&a, &b).unwrap();
        assert_eq!(overlap, LineSegment::horizontal(4.0, 10.0, 5.0));
        assert!(!overlap.is_point());
    }

    #[test]
    fn test_overlapping_segment_single_point() {
        let a = LineSegment::vertical(0.0, 0.0, 10.0);
        let b = LineSegment::vertical(0.0, 10.0, 20.0);
        let overlap = LineSegment::overlapping_segment(&a, &b).unwrap();
        assert!(overlap.is_point());
    }

    #[test]
    fn test_overlapping_segment_rejects_incompatible() {
        let h = LineSegment::horizontal(0.0, 10.0, 0.0);
        let v = LineSegment::vertical(5.0, -5.0, 5.0);
        let other_row = LineSegment::horizontal(0.0, 10.0, 1.0);
        let disjoint = LineSegment::horizontal(11.0, 12.0, 0.0);
        assert!(LineSegment::overlapping_segment(&h, &v).is_err());
        assert!(LineSegment::overlapping_segment(&h, &other_row).is_err());
        assert_eq!(
            LineSegment::overlapping_segment(&h, &disjoint),
            Err(PhysicsError::IncompatibleSegments { a: h, b: disjoint })
        );
    }
}
