//! Continuous (swept) collision detection.
//!
//! Only the moving body's velocity is swept; the candidate is treated as stationary for
//! the tick. Whether a candidate that is itself moving should be hit first is decided
//! afterwards by [`is_chronological`].

use std::collections::HashSet;

use log::trace;

use crate::math::{is_in_range, quadratic, round_for_floating_point, vec2::Vec2};
use crate::objects::{Body, BodyId};
use crate::shapes::{BodyShape, Circle, Extents, LineSegment, Particle, Rect, Shape};
use crate::world::World;

use super::detection::swept_bounding_box;
use super::event::{Collision, CollisionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Horizontal,
    Vertical,
}

/// Accepts `t` if it rounds into `[0, dt]`, clamped into that range.
fn in_timestep(t: f64, dt: f64) -> Option<f64> {
    if is_in_range(0.0, round_for_floating_point(t), dt, true) {
        Some(t.clamp(0.0, dt))
    } else {
        None
    }
}

fn is_moving_towards(pos: Vec2, velocity: Vec2, target: Vec2) -> bool {
    round_for_floating_point((target - pos).dot(velocity)) > 0.0
}

fn earliest(collisions: impl IntoIterator<Item = Collision>) -> Option<Collision> {
    collisions.into_iter().fold(None, |earliest: Option<Collision>, collision| match earliest {
        Some(e) if e.time_of_collision <= collision.time_of_collision => Some(e),
        _ => Some(collision),
    })
}

/// The earliest collision `moving_body` runs into within `dt`, ignoring itself and the
/// bodies in `ignore`.
pub fn get_collision_event(
    moving_body: &Body,
    world: &World,
    dt: f64,
    ignore: &HashSet<BodyId>,
) -> Option<CollisionEvent> {
    let region = swept_bounding_box(moving_body, dt)?;
    let mut result: Option<CollisionEvent> = None;

    for candidate in world.bodies_in_shape(&Shape::Box(region)) {
        if candidate.id() == moving_body.id() || ignore.contains(&candidate.id()) {
            continue;
        }
        let Some(collision) = get_collision(moving_body, candidate, dt) else {
            continue;
        };
        if result.map_or(true, |e| e.time_of_collision > collision.time_of_collision) {
            result = Some(CollisionEvent::new(collision, moving_body.id(), candidate.id()));
        }
    }
    result
}

/// Whether the event should be resolved now rather than left for the target's own turn.
///
/// A collision is out of order when the target is retreating along the collision
/// vector at least as fast as the mover is approaching.
pub fn is_chronological(event: &CollisionEvent, moving_body: &Body, collision_body: &Body) -> bool {
    if !collision_body.is_moving() || !event.collision_vector.has_magnitude() {
        return true;
    }
    let mover_along = moving_body.velocity().proj(event.collision_vector);
    let target_along = collision_body.velocity().proj(event.collision_vector);

    if !mover_along.is_same_direction(target_along) {
        return true;
    }
    !target_along.is_larger(mover_along)
}

/// Swept collision of `a` into a stationary `b`.
pub fn get_collision(a: &Body, b: &Body, dt: f64) -> Option<Collision> {
    match (&a.shape, &b.shape) {
        (BodyShape::Circle(a), BodyShape::Circle(b)) => circle_vs_circle(a, b, dt),
        (BodyShape::Circle(a), BodyShape::Rect(b)) => circle_vs_rect(a, b, dt),
        (BodyShape::Rect(a), BodyShape::Circle(b)) => rect_vs_circle(a, b, dt),
        (BodyShape::Rect(a), BodyShape::Rect(b)) => rect_vs_rect(a, b, dt),
    }
}

pub fn circle_vs_circle(a: &Circle, b: &Circle, dt: f64) -> Option<Collision> {
    swept_circles(&a.particle, a.radius, b.particle.pos, b.radius, dt)
}

/// A circle of `radius` travelling with `mover` against a stationary circle. Either
/// radius may be 0 to stand in for a point.
fn swept_circles(mover: &Particle, radius: f64, target: Vec2, target_radius: f64, dt: f64) -> Option<Collision> {
    if !is_moving_towards(mover.pos, mover.velocity, target) {
        return None;
    }

    let v = mover.velocity;
    let diff = mover.pos - target;
    let radii = radius + target_radius;
    let roots = quadratic(v.dot(v), 2.0 * v.dot(diff), diff.dot(diff) - radii * radii);

    let collisions = roots.into_iter().filter_map(|t| {
        let t = in_timestep(t, dt)?;
        let pos_at_collision = mover.pos_at(t);
        // a glance, not a collision
        if !is_moving_towards(pos_at_collision, v, target) {
            return None;
        }
        Some(Collision { time_of_collision: t, collision_vector: target - pos_at_collision })
    });
    earliest(collisions)
}

/// Time at which a moving point crosses an axis-aligned line segment.
///
/// Degenerate segments are treated as horizontal.
pub fn point_vs_line_time_of_collision(point: &Particle, line: &LineSegment, dt: f64) -> Option<f64> {
    if line.is_horizontal() {
        point_vs_side(point, line, Orientation::Horizontal, dt)
    } else if line.is_vertical() {
        point_vs_side(point, line, Orientation::Vertical, dt)
    } else {
        None
    }
}

fn point_vs_side(point: &Particle, side: &LineSegment, orientation: Orientation, dt: f64) -> Option<f64> {
    let v = point.velocity;
    match orientation {
        Orientation::Horizontal => {
            if v.y == 0.0 {
                return None;
            }
            let t = in_timestep((side.start.y - point.pos.y) / v.y, dt)?;
            is_in_range(side.x0(), point.pos.x + v.x * t, side.x1(), true).then_some(t)
        }
        Orientation::Vertical => {
            if v.x == 0.0 {
                return None;
            }
            let t = in_timestep((side.start.x - point.pos.x) / v.x, dt)?;
            is_in_range(side.y0(), point.pos.y + v.y * t, side.y1(), true).then_some(t)
        }
    }
}

/// The rect's sides pushed outward by `radius`: top, bottom, left, right.
fn extended_sides(rect: &Rect, radius: f64) -> [LineSegment; 4] {
    let (x0, x1, y0, y1) = (rect.x0(), rect.x1(), rect.y0(), rect.y1());
    [
        LineSegment::horizontal(x0, x1, y0 - radius),
        LineSegment::horizontal(x0, x1, y1 + radius),
        LineSegment::vertical(x0 - radius, y0, y1),
        LineSegment::vertical(x1 + radius, y0, y1),
    ]
}

pub fn circle_vs_rect(circle: &Circle, rect: &Rect, dt: f64) -> Option<Collision> {
    let v = circle.particle.velocity;
    let x_distance = circle.radius + rect.width / 2.0;
    let y_distance = circle.radius + rect.height / 2.0;
    let [top, bottom, left, right] = extended_sides(rect, circle.radius);

    let mut candidates: Vec<(LineSegment, Orientation, Vec2)> = Vec::with_capacity(2);
    if v.y > 0.0 {
        candidates.push((top, Orientation::Horizontal, Vec2::new(0.0, y_distance)));
    }
    if v.y < 0.0 {
        candidates.push((bottom, Orientation::Horizontal, Vec2::new(0.0, -y_distance)));
    }
    if v.x < 0.0 {
        candidates.push((right, Orientation::Vertical, Vec2::new(-x_distance, 0.0)));
    }
    if v.x > 0.0 {
        candidates.push((left, Orientation::Vertical, Vec2::new(x_distance, 0.0)));
    }

    let sides = candidates.into_iter().filter_map(|(side, orientation, collision_vector)| {
        let t = point_vs_side(&circle.particle, &side, orientation, dt)?;
        Some(Collision { time_of_collision: t, collision_vector })
    });

    let corners = rect.bounding_box().corners().into_iter().filter_map(|corner| {
        if !is_moving_towards(circle.particle.pos, v, corner) {
            return None;
        }
        swept_circles(&circle.particle, circle.radius, corner, 0.0, dt)
    });

    earliest(sides.chain(corners))
}

/// Solved from the circle's frame: its center approaches the rect with the opposite
/// velocity.
pub fn rect_vs_circle(rect: &Rect, circle: &Circle, dt: f64) -> Option<Collision> {
    let v = rect.particle.velocity;
    let x_distance = circle.radius + rect.width / 2.0;
    let y_distance = circle.radius + rect.height / 2.0;
    let [top, bottom, left, right] = extended_sides(rect, circle.radius);
    let point = Particle::with_velocity(circle.particle.pos, -v);

    let mut candidates: Vec<(LineSegment, Orientation, Vec2)> = Vec::with_capacity(2);
    if v.y > 0.0 {
        candidates.push((bottom, Orientation::Horizontal, Vec2::new(0.0, y_distance)));
    }
    if v.y < 0.0 {
        candidates.push((top, Orientation::Horizontal, Vec2::new(0.0, -y_distance)));
    }
    if v.x < 0.0 {
        candidates.push((left, Orientation::Vertical, Vec2::new(-x_distance, 0.0)));
    }
    if v.x > 0.0 {
        candidates.push((right, Orientation::Vertical, Vec2::new(x_distance, 0.0)));
    }

    let sides = candidates.into_iter().filter_map(|(side, orientation, collision_vector)| {
        let t = point_vs_side(&point, &side, orientation, dt)?;
        Some(Collision { time_of_collision: t, collision_vector })
    });

    let corners = rect.bounding_box().corners().into_iter().filter_map(|corner| {
        if !is_moving_towards(point.pos, point.velocity, corner) {
            return None;
        }
        swept_circles(&Particle::with_velocity(corner, v), 0.0, circle.particle.pos, circle.radius, dt)
    });

    earliest(sides.chain(corners))
}

/// Swept AABB via a Minkowski sum: `b` grows by `a`'s dimensions so `a` can be swept as
/// its center point. Hits where the real edges would only share a corner are rejected.
pub fn rect_vs_rect(a: &Rect, b: &Rect, dt: f64) -> Option<Collision> {
    let v = a.particle.velocity;
    let x_distance = a.width / 2.0 + b.width / 2.0;
    let y_distance = a.height / 2.0 + b.height / 2.0;
    let minkowski = b.particle.pos;
    let (mx0, mx1) = (minkowski.x - x_distance, minkowski.x + x_distance);
    let (my0, my1) = (minkowski.y - y_distance, minkowski.y + y_distance);

    let mut collisions = Vec::with_capacity(2);
    let mut add_side = |minkowski_side: LineSegment,
                        orientation: Orientation,
                        actual_side: LineSegment,
                        moving_side_at: &dyn Fn(f64) -> LineSegment,
                        collision_vector: Vec2| {
        let Some(t) = point_vs_side(&a.particle, &minkowski_side, orientation, dt) else {
            return;
        };
        match LineSegment::overlapping_segment(&actual_side, &moving_side_at(t)) {
            Ok(contact) if !contact.is_point() => {
                collisions.push(Collision { time_of_collision: t, collision_vector });
            }
            Ok(_) => {}
            Err(err) => trace!("rejecting rect contact at t={t}: {err}"),
        }
    };

    if v.y > 0.0 {
        let y = b.y0();
        add_side(
            LineSegment::horizontal(mx0, mx1, my0),
            Orientation::Horizontal,
            LineSegment::horizontal(b.x0(), b.x1(), y),
            &|t| LineSegment::horizontal(a.x0() + v.x * t, a.x1() + v.x * t, y),
            Vec2::new(0.0, y_distance),
        );
    }
    if v.y < 0.0 {
        let y = b.y1();
        add_side(
            LineSegment::horizontal(mx0, mx1, my1),
            Orientation::Horizontal,
            LineSegment::horizontal(b.x0(), b.x1(), y),
            &|t| LineSegment::horizontal(a.x0() + v.x * t, a.x1() + v.x * t, y),
            Vec2::new(0.0, -y_distance),
        );
    }
    if v.x < 0.0 {
        let x = b.x1();
        add_side(
            LineSegment::vertical(mx1, my0, my1),
            Orientation::Vertical,
            LineSegment::vertical(x, b.y0(), b.y1()),
            &|t| LineSegment::vertical(x, a.y0() + v.y * t, a.y1() + v.y * t),
            Vec2::new(-x_distance, 0.0),
        );
    }
    if v.x > 0.0 {
        let x = b.x0();
        add_side(
            LineSegment::vertical(mx0, my0, my1),
            Orientation::Vertical,
            LineSegment::vertical(x, b.y0(), b.y1()),
            &|t| LineSegment::vertical(x, a.y0() + v.y * t, a.y1() + v.y * t),
            Vec2::new(x_distance, 0.0),
        );
    }

    earliest(collisions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::BodyArgs;

    const EPSILON: f64 = 1e-9;

    fn moving_circle(pos: Vec2, radius: f64, velocity: Vec2) -> Circle {
        let mut c = Circle::new(pos, radius).unwrap();
        c.particle.velocity = velocity;
        c
    }

    fn moving_rect(pos: Vec2, width: f64, height: f64, velocity: Vec2) -> Rect {
        let mut r = Rect::new(pos, width, height).unwrap();
        r.particle.velocity = velocity;
        r
    }

    #[test]
    fn test_circle_vs_circle_head_on() {
        let a = moving_circle(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0));
        let b = moving_circle(Vec2::new(20.0, 0.0), 5.0, Vec2::ZERO);
        let collision = circle_vs_circle(&a, &b, 1.0).unwrap();
        assert!((collision.time_of_collision - 1.0).abs() < EPSILON);
        assert!(collision.collision_vector.x > 0.0);
        assert!(collision.collision_vector.y.abs() < EPSILON);
    }

    #[test]
    fn test_circle_vs_circle_out_of_reach() {
        let a = moving_circle(Vec2::ZERO, 5.0, Vec2::new(5.0, 0.0));
        let b = moving_circle(Vec2::new(20.0, 0.0), 5.0, Vec2::ZERO);
        assert_eq!(circle_vs_circle(&a, &b, 1.0), None);
        assert!(circle_vs_circle(&a, &b, 2.0).is_some());
    }

    #[test]
    fn test_circle_moving_away_is_ignored() {
        let a = moving_circle(Vec2::ZERO, 5.0, Vec2::new(-10.0, 0.0));
        let b = moving_circle(Vec2::new(10.0, 0.0), 5.0, Vec2::ZERO);
        assert_eq!(circle_vs_circle(&a, &b, 1.0), None);
    }

    #[test]
    fn test_touching_circles_collide_at_zero() {
        let a = moving_circle(Vec2::ZERO, 5.0, Vec2::new(1.0, 0.0));
        let b = moving_circle(Vec2::new(10.0, 0.0), 5.0, Vec2::ZERO);
        let collision = circle_vs_circle(&a, &b, 1.0).unwrap();
        assert_eq!(collision.time_of_collision, 0.0);
    }

    #[test]
    fn test_point_vs_line() {
        let point = Particle::with_velocity(Vec2::ZERO, Vec2::new(0.0, 4.0));
        let line = LineSegment::horizontal(-1.0, 1.0, 2.0);
        assert_eq!(point_vs_line_time_of_collision(&point, &line, 1.0), Some(0.5));

        let missed = LineSegment::horizontal(1.5, 3.0, 2.0);
        assert_eq!(point_vs_line_time_of_collision(&point, &missed, 1.0), None);

        let parallel = LineSegment::vertical(1.0, -5.0, 5.0);
        assert_eq!(point_vs_line_time_of_collision(&point, &parallel, 1.0), None);
    }

    #[test]
    fn test_circle_vs_rect_side() {
        let circle = moving_circle(Vec2::new(0.0, 5.0), 1.0, Vec2::new(4.0, 0.0));
        let rect = moving_rect(Vec2::new(6.0, 5.0), 2.0, 4.0, Vec2::ZERO);
        // left side at x = 5, extended to x = 4
        let collision = circle_vs_rect(&circle, &rect, 1.0).unwrap();
        assert!((collision.time_of_collision - 1.0).abs() < EPSILON);
        assert_eq!(collision.collision_vector, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_circle_vs_rect_corner() {
        // travelling diagonally into the top-left corner at (5, 5)
        let circle = moving_circle(Vec2::new(0.0, 0.0), 1.0, Vec2::new(10.0, 10.0));
        let rect = moving_rect(Vec2::new(10.0, 10.0), 10.0, 10.0, Vec2::ZERO);
        let collision = circle_vs_rect(&circle, &rect, 1.0).unwrap();
        let expected = (5.0 - 1.0 / 2.0_f64.sqrt()) / 10.0;
        assert!((collision.time_of_collision - expected).abs() < EPSILON);
    }

    #[test]
    fn test_circle_vs_rect_bottom_and_right_sides() {
        let rect = moving_rect(Vec2::new(6.0, 5.0), 2.0, 4.0, Vec2::ZERO);

        // bottom side at y = 7, extended to y = 8
        let rising = moving_circle(Vec2::new(6.0, 12.0), 1.0, Vec2::new(0.0, -4.0));
        let collision = circle_vs_rect(&rising, &rect, 1.0).unwrap();
        assert!((collision.time_of_collision - 1.0).abs() < EPSILON);
        assert_eq!(collision.collision_vector, Vec2::new(0.0, -3.0));

        // right side at x = 7, extended to x = 8
        let leftward = moving_circle(Vec2::new(12.0, 5.0), 1.0, Vec2::new(-4.0, 0.0));
        let collision = circle_vs_rect(&leftward, &rect, 1.0).unwrap();
        assert!((collision.time_of_collision - 1.0).abs() < EPSILON);
        assert_eq!(collision.collision_vector, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn test_rect_vs_circle_corner() {
        // the rect's bottom-right corner at (1, 1) runs diagonally into the circle
        let rect = moving_rect(Vec2::ZERO, 2.0, 2.0, Vec2::new(10.0, 10.0));
        let circle = moving_circle(Vec2::new(10.0, 10.0), 1.0, Vec2::ZERO);
        let collision = rect_vs_circle(&rect, &circle, 1.0).unwrap();
        let expected = (9.0 - 1.0 / 2.0_f64.sqrt()) / 10.0;
        assert!((collision.time_of_collision - expected).abs() < EPSILON);
        let n = collision.collision_vector;
        assert!(n.x > 0.0 && n.y > 0.0);
        assert!((n.x - n.y).abs() < EPSILON);
    }

    #[test]
    fn test_rect_vs_circle_side() {
        let rect = moving_rect(Vec2::new(0.0, 0.0), 2.0, 2.0, Vec2::new(0.0, 3.0));
        let circle = moving_circle(Vec2::new(0.0, 5.0), 1.0, Vec2::ZERO);
        // rect bottom at y = 1 meets circle top at y = 4
        let collision = rect_vs_circle(&rect, &circle, 2.0).unwrap();
        assert!((collision.time_of_collision - 1.0).abs() < EPSILON);
        assert_eq!(collision.collision_vector, Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_rect_vs_rect_face() {
        let a = moving_rect(Vec2::new(0.0, 0.0), 2.0, 2.0, Vec2::new(4.0, 0.0));
        let b = moving_rect(Vec2::new(6.0, 0.5), 2.0, 2.0, Vec2::ZERO);
        let collision = rect_vs_rect(&a, &b, 1.0).unwrap();
        assert!((collision.time_of_collision - 1.0).abs() < EPSILON);
        assert_eq!(collision.collision_vector, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_rect_vs_rect_vertical() {
        let b = moving_rect(Vec2::new(0.5, -6.0), 2.0, 2.0, Vec2::ZERO);
        let rising = moving_rect(Vec2::ZERO, 2.0, 2.0, Vec2::new(0.0, -4.0));
        let collision = rect_vs_rect(&rising, &b, 1.0).unwrap();
        assert!((collision.time_of_collision - 1.0).abs() < EPSILON);
        assert_eq!(collision.collision_vector, Vec2::new(0.0, -2.0));

        let c = moving_rect(Vec2::new(0.5, 4.0), 2.0, 2.0, Vec2::ZERO);
        let falling_down = moving_rect(Vec2::ZERO, 2.0, 2.0, Vec2::new(0.0, 4.0));
        let collision = rect_vs_rect(&falling_down, &c, 1.0).unwrap();
        assert!((collision.time_of_collision - 0.5).abs() < EPSILON);
        assert_eq!(collision.collision_vector, Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_rect_vs_rect_edges_split_by_rounding_are_rejected() {
        // a's center lands exactly on the Minkowski corner, but its left edge ends up one
        // ulp right of b's right edge, so the edges don't overlap at all
        let b = moving_rect(Vec2::new(0.1, 10.0), 0.3, 2.0, Vec2::ZERO);
        let a = moving_rect(Vec2::new(0.1 + (0.1 / 2.0 + 0.3 / 2.0), 5.0), 0.1, 2.0, Vec2::new(0.0, 4.0));
        let b_top = LineSegment::horizontal(b.x0(), b.x1(), b.y0());
        let a_bottom = LineSegment::horizontal(a.x0(), a.x1(), b.y0());
        assert!(LineSegment::overlapping_segment(&b_top, &a_bottom).is_err());

        assert_eq!(rect_vs_rect(&a, &b, 1.0), None);
    }

    #[test]
    fn test_rect_vs_rect_corner_graze_is_rejected() {
        // edges would only meet at a single corner point
        let a = moving_rect(Vec2::new(0.0, 0.0), 2.0, 2.0, Vec2::new(4.0, 0.0));
        let b = moving_rect(Vec2::new(6.0, 2.0), 2.0, 2.0, Vec2::ZERO);
        assert_eq!(rect_vs_rect(&a, &b, 1.0), None);
    }

    #[test]
    fn test_get_collision_dispatches_on_body_shapes() {
        let mut a = BodyArgs::new(Circle::new(Vec2::ZERO, 5.0).unwrap()).build().unwrap();
        a.set_velocity(Vec2::new(10.0, 0.0));
        let b = BodyArgs::new(Circle::new(Vec2::new(20.0, 0.0), 5.0).unwrap()).build().unwrap();
        let collision = get_collision(&a, &b, 1.0).unwrap();
        assert!((collision.time_of_collision - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_is_chronological() {
        let mut mover = BodyArgs::new(Circle::new(Vec2::ZERO, 1.0).unwrap()).build().unwrap();
        let mut target = BodyArgs::new(Circle::new(Vec2::new(3.0, 0.0), 1.0).unwrap()).build().unwrap();
        mover.set_velocity(Vec2::new(2.0, 0.0));
        let event = CollisionEvent {
            time_of_collision: 0.5,
            collision_vector: Vec2::new(2.0, 0.0),
            moving_body: mover.id(),
            collision_body: target.id(),
        };

        assert!(is_chronological(&event, &mover, &target));

        target.set_velocity(Vec2::new(-1.0, 0.0));
        assert!(is_chronological(&event, &mover, &target));

        target.set_velocity(Vec2::new(1.0, 0.0));
        assert!(is_chronological(&event, &mover, &target));

        target.set_velocity(Vec2::new(3.0, 0.0));
        assert!(!is_chronological(&event, &mover, &target));
    }
}
