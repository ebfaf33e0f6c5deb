//! Discrete overlap tests between static shapes.
//!
//! Every test takes an `inclusive` flag: inclusive tests count touching shapes as
//! overlapping, exclusive tests require actual penetration.

use crate::math::{is_in_range, vec2::Vec2};
use crate::objects::Body;
use crate::shapes::{BoundingBox, BoundingCircle, Extents, LineSegment, Shape};

fn within(value: f64, limit: f64, inclusive: bool) -> bool {
    if inclusive {
        value <= limit
    } else {
        value < limit
    }
}

/// Whether two shapes overlap. Symmetric in its arguments.
pub fn has_overlap(a: &Shape, b: &Shape, inclusive: bool) -> bool {
    match (a, b) {
        (Shape::Point(p), Shape::Point(q)) => inclusive && p.is_same(*q),
        (Shape::Point(p), Shape::Circle(c)) | (Shape::Circle(c), Shape::Point(p)) => {
            point_vs_circle(*p, c, inclusive)
        }
        (Shape::Point(p), Shape::Box(bb)) | (Shape::Box(bb), Shape::Point(p)) => point_vs_box(*p, bb, inclusive),
        (Shape::Point(p), Shape::Line(l)) | (Shape::Line(l), Shape::Point(p)) => point_vs_line(*p, l, inclusive),
        (Shape::Circle(c), Shape::Circle(d)) => circle_vs_circle(c, d, inclusive),
        (Shape::Circle(c), Shape::Box(bb)) | (Shape::Box(bb), Shape::Circle(c)) => circle_vs_box(c, bb, inclusive),
        (Shape::Circle(c), Shape::Line(l)) | (Shape::Line(l), Shape::Circle(c)) => circle_vs_line(c, l, inclusive),
        (Shape::Box(a), Shape::Box(b)) => box_vs_box(a, b, inclusive),
        (Shape::Box(bb), Shape::Line(l)) | (Shape::Line(l), Shape::Box(bb)) => box_vs_line(bb, l, inclusive),
        (Shape::Line(a), Shape::Line(b)) => line_vs_line(a, b, inclusive),
    }
}

/// Inclusive overlap between the current shapes of two bodies.
pub fn bodies_overlap(a: &Body, b: &Body) -> bool {
    has_overlap(&a.shape.to_shape(), &b.shape.to_shape(), true)
}

/// The region a body sweeps through over one tick, or `None` if it is not moving.
pub fn movement_bounding_box(body: &Body) -> Option<BoundingBox> {
    swept_bounding_box(body, 1.0)
}

/// The region a body sweeps through over `dt`, or `None` if it is not moving.
pub fn swept_bounding_box(body: &Body, dt: f64) -> Option<BoundingBox> {
    if !body.is_moving() {
        return None;
    }
    let mut bounds = body.bounds();
    bounds.merge(&bounds.translated(body.velocity() * dt));
    Some(bounds)
}

/// Finds the point on a line segment closest to a given point.
fn closest_point_on_segment(segment: &LineSegment, point: Vec2) -> Vec2 {
    let segment_vec = segment.to_vector();
    let length_sq = segment_vec.magnitude_squared();
    if length_sq == 0.0 {
        return segment.start;
    }
    let t = ((point - segment.start).dot(segment_vec) / length_sq).clamp(0.0, 1.0);
    segment.start + segment_vec * t
}

fn point_vs_circle(p: Vec2, c: &BoundingCircle, inclusive: bool) -> bool {
    within(p.distance_squared(c.center), c.radius * c.radius, inclusive)
}

fn point_vs_box(p: Vec2, bb: &BoundingBox, inclusive: bool) -> bool {
    is_in_range(bb.x0, p.x, bb.x1, inclusive) && is_in_range(bb.y0, p.y, bb.y1, inclusive)
}

// A point has no area, so it can only ever touch a line.
fn point_vs_line(p: Vec2, l: &LineSegment, inclusive: bool) -> bool {
    inclusive && closest_point_on_segment(l, p).distance_squared(p) == 0.0
}

fn circle_vs_circle(a: &BoundingCircle, b: &BoundingCircle, inclusive: bool) -> bool {
    let radii = a.radius + b.radius;
    within(a.center.distance_squared(b.center), radii * radii, inclusive)
}

fn circle_vs_box(c: &BoundingCircle, bb: &BoundingBox, inclusive: bool) -> bool {
    let center = bb.center();
    let half_width = bb.width() / 2.0;
    let half_height = bb.height() / 2.0;
    let dx = (c.center.x - center.x).abs();
    let dy = (c.center.y - center.y).abs();

    if !within(dx, half_width + c.radius, inclusive) || !within(dy, half_height + c.radius, inclusive) {
        return false;
    }
    if within(dx, half_width, inclusive) || within(dy, half_height, inclusive) {
        return true;
    }

    let corner_distance_sq = (dx - half_width).powi(2) + (dy - half_height).powi(2);
    within(corner_distance_sq, c.radius * c.radius, inclusive)
}

fn circle_vs_line(c: &BoundingCircle, l: &LineSegment, inclusive: bool) -> bool {
    let closest = closest_point_on_segment(l, c.center);
    within(closest.distance_squared(c.center), c.radius * c.radius, inclusive)
}

fn box_vs_box(a: &BoundingBox, b: &BoundingBox, inclusive: bool) -> bool {
    within(a.x0, b.x1, inclusive)
        && within(b.x0, a.x1, inclusive)
        && within(a.y0, b.y1, inclusive)
        && within(b.y0, a.y1, inclusive)
}

/// Slab test: clips the segment's parameter range against both axes of the box.
fn box_vs_line(bb: &BoundingBox, l: &LineSegment, inclusive: bool) -> bool {
    let direction = l.to_vector();
    let mut t_min: f64 = 0.0;
    let mut t_max: f64 = 1.0;

    for (start, delta, lo, hi) in [(l.start.x, direction.x, bb.x0, bb.x1), (l.start.y, direction.y, bb.y0, bb.y1)] {
        if delta == 0.0 {
            if !is_in_range(lo, start, hi, inclusive) {
                return false;
            }
            continue;
        }
        let t0 = (lo - start) / delta;
        let t1 = (hi - start) / delta;
        t_min = t_min.max(t0.min(t1));
        t_max = t_max.min(t0.max(t1));
    }

    within(t_min, t_max, inclusive)
}

fn line_vs_line(a: &LineSegment, b: &LineSegment, inclusive: bool) -> bool {
    let r = a.to_vector();
    let s = b.to_vector();
    let denominator = r.cross(s);
    let offset = b.start - a.start;

    if denominator == 0.0 {
        if offset.cross(r) != 0.0 {
            // parallel, different lines
            return false;
        }
        // collinear: compare the projections onto `a`
        let length_sq = r.magnitude_squared();
        if length_sq == 0.0 {
            return point_vs_line(a.start, b, inclusive);
        }
        let t0 = offset.dot(r) / length_sq;
        let t1 = (b.end - a.start).dot(r) / length_sq;
        let (lo, hi) = (t0.min(t1), t0.max(t1));
        return within(lo.max(0.0), hi.min(1.0), inclusive);
    }

    let t = offset.cross(s) / denominator;
    let u = offset.cross(r) / denominator;
    is_in_range(0.0, t, 1.0, inclusive) && is_in_range(0.0, u, 1.0, inclusive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::BodyArgs;
    use crate::shapes::{Circle, Rect};

    fn circle(x: f64, y: f64, r: f64) -> Shape {
        Shape::Circle(BoundingCircle::new(Vec2::new(x, y), r).unwrap())
    }

    fn bbox(x0: f64, x1: f64, y0: f64, y1: f64) -> Shape {
        Shape::Box(BoundingBox::new(x0, x1, y0, y1))
    }

    #[test]
    fn test_circle_circle_inclusive_vs_exclusive() {
        let a = circle(0.0, 0.0, 2.0);
        let touching = circle(5.0, 0.0, 3.0);
        let apart = circle(5.1, 0.0, 3.0);
        assert!(has_overlap(&a, &touching, true));
        assert!(!has_overlap(&a, &touching, false));
        assert!(!has_overlap(&a, &apart, true));
        assert!(has_overlap(&a, &circle(4.0, 0.0, 3.0), false));
    }

    #[test]
    fn test_circle_box() {
        let b = bbox(0.0, 10.0, 0.0, 10.0);
        assert!(has_overlap(&circle(12.0, 5.0, 2.0), &b, true));
        assert!(!has_overlap(&circle(12.0, 5.0, 2.0), &b, false));
        assert!(has_overlap(&b, &circle(5.0, 5.0, 1.0), false));
        // near a corner but outside its radius
        assert!(!has_overlap(&circle(11.5, 11.5, 2.0), &b, true));
        assert!(has_overlap(&circle(11.0, 11.0, 2.0), &b, true));
    }

    #[test]
    fn test_box_box() {
        let a = bbox(0.0, 10.0, 0.0, 10.0);
        assert!(has_overlap(&a, &bbox(10.0, 20.0, 5.0, 6.0), true));
        assert!(!has_overlap(&a, &bbox(10.0, 20.0, 5.0, 6.0), false));
        assert!(!has_overlap(&a, &bbox(11.0, 20.0, 5.0, 6.0), true));
    }

    #[test]
    fn test_point_shapes() {
        let p = Shape::Point(Vec2::new(5.0, 0.0));
        assert!(has_overlap(&p, &bbox(0.0, 5.0, 0.0, 5.0), true));
        assert!(!has_overlap(&p, &bbox(0.0, 5.0, 0.0, 5.0), false));
        assert!(has_overlap(&p, &circle(0.0, 0.0, 5.0), true));
        assert!(has_overlap(&p, &Shape::Line(LineSegment::horizontal(0.0, 10.0, 0.0)), true));
        assert!(!has_overlap(&p, &Shape::Line(LineSegment::horizontal(0.0, 4.0, 0.0)), true));
        assert!(has_overlap(&p, &p, true));
    }

    #[test]
    fn test_lines() {
        let h = Shape::Line(LineSegment::horizontal(0.0, 10.0, 5.0));
        let v = Shape::Line(LineSegment::vertical(5.0, 0.0, 10.0));
        let end_touch = Shape::Line(LineSegment::vertical(10.0, 5.0, 8.0));
        assert!(has_overlap(&h, &v, true));
        assert!(has_overlap(&h, &v, false));
        assert!(has_overlap(&h, &end_touch, true));
        assert!(!has_overlap(&h, &end_touch, false));

        let collinear = Shape::Line(LineSegment::horizontal(8.0, 20.0, 5.0));
        let parallel = Shape::Line(LineSegment::horizontal(0.0, 10.0, 6.0));
        assert!(has_overlap(&h, &collinear, false));
        assert!(!has_overlap(&h, &parallel, true));
    }

    #[test]
    fn test_line_vs_box_and_circle() {
        let b = bbox(0.0, 10.0, 0.0, 10.0);
        let crossing = Shape::Line(LineSegment::new(Vec2::new(-5.0, -5.0), Vec2::new(15.0, 15.0)));
        let edge = Shape::Line(LineSegment::horizontal(-5.0, 15.0, 10.0));
        let outside = Shape::Line(LineSegment::vertical(12.0, -5.0, 15.0));
        assert!(has_overlap(&crossing, &b, false));
        assert!(has_overlap(&edge, &b, true));
        assert!(!has_overlap(&edge, &b, false));
        assert!(!has_overlap(&outside, &b, true));

        assert!(has_overlap(&circle(5.0, 2.0, 2.0), &edge_line(0.0), true));
        assert!(!has_overlap(&circle(5.0, 2.0, 2.0), &edge_line(0.0), false));
    }

    fn edge_line(y: f64) -> Shape {
        Shape::Line(LineSegment::horizontal(0.0, 10.0, y))
    }

    #[test]
    fn test_movement_bounding_box() {
        let still = BodyArgs::new(Rect::new(Vec2::new(5.0, 5.0), 2.0, 2.0).unwrap()).build().unwrap();
        assert_eq!(movement_bounding_box(&still), None);

        let mut moving = BodyArgs::new(Circle::new(Vec2::new(5.0, 5.0), 1.0).unwrap()).build().unwrap();
        moving.set_velocity(Vec2::new(3.0, -2.0));
        assert_eq!(movement_bounding_box(&moving), Some(BoundingBox::new(4.0, 9.0, 2.0, 6.0)));
        assert_eq!(swept_bounding_box(&moving, 0.5), Some(BoundingBox::new(4.0, 7.5, 3.0, 6.0)));
    }

    #[test]
    fn test_bodies_overlap() {
        let a = BodyArgs::new(Circle::new(Vec2::ZERO, 1.0).unwrap()).build().unwrap();
        let b = BodyArgs::new(Rect::new(Vec2::new(2.0, 0.0), 2.0, 2.0).unwrap()).build().unwrap();
        assert!(bodies_overlap(&a, &b));
    }
}
