//! Turns a collision event into post-collision velocities.

use crate::math::vec2::Vec2;
use crate::objects::Body;

use super::event::CollisionEvent;

/// Picks the coefficient of restitution for a pair of bodies.
pub type RestitutionFn = fn(&Body, &Body) -> f64;

/// The default pairing rule: the less elastic body wins.
pub fn coefficient_of_restitution(a: &Body, b: &Body) -> f64 {
    a.restitution.min(b.restitution)
}

/// Advances the mover to the moment of contact and writes the resolved velocities.
/// Sensors keep their velocity. Returns whether the mover changed position.
pub fn resolve(event: &CollisionEvent, moving_body: &mut Body, collision_body: &mut Body, restitution: RestitutionFn) -> bool {
    let mut moved = false;
    if event.time_of_collision != 0.0 {
        moved = moving_body.move_by(moving_body.velocity() * event.time_of_collision);
    }

    let (velocity_a, velocity_b) = resolved_velocities(event, moving_body, collision_body, restitution);
    if !moving_body.is_sensor {
        moving_body.set_velocity(velocity_a);
    }
    if !collision_body.is_sensor {
        collision_body.set_velocity(velocity_b);
    }
    moved
}

/// Post-collision velocities of `(a, b)`.
///
/// A fixed target reflects `a` about the collision normal. Otherwise `a` follows the
/// angle-free elastic collision formula and `b` is solved from conservation of
/// momentum. Both results are scaled by the coefficient of restitution.
pub fn resolved_velocities(event: &CollisionEvent, a: &Body, b: &Body, restitution: RestitutionFn) -> (Vec2, Vec2) {
    let n = event.collision_vector;
    if !n.has_magnitude() {
        return (a.velocity(), b.velocity());
    }
    let cor = restitution(a, b);

    if b.is_fixed() {
        let surface_normal = -n;
        let reflected = a.velocity() - a.velocity().proj(surface_normal) * 2.0;
        return (reflected * cor, b.velocity());
    }

    let approach = (a.velocity() - b.velocity()).dot(n) / n.magnitude_squared();

    if a.is_fixed() {
        // limit of the formula below as a's mass grows without bound
        let velocity_b = b.velocity() + n * (2.0 * approach);
        return (a.velocity() * cor, velocity_b * cor);
    }

    /*
        vA' = vA - (2mB / (mA + mB)) * (<vA - vB | n> / |n|^2) * n
        vB' = (mA*vA + mB*vB - mA*vA') / mB
    */
    let mass_scalar = 2.0 * b.mass() / (a.mass() + b.mass());
    let velocity_a = a.velocity() - n * (mass_scalar * approach);
    let momentum = a.velocity() * a.mass() + b.velocity() * b.mass() - velocity_a * a.mass();
    let velocity_b = momentum / b.mass();

    (velocity_a * cor, velocity_b * cor)
}

/// The mover's velocity projected onto the contact surface, for sliding along it.
pub fn tangent_movement(event: &CollisionEvent, moving_body: &Body) -> Vec2 {
    let tangent = event.collision_vector.normal();
    if !tangent.has_magnitude() {
        return moving_body.velocity();
    }
    moving_body.velocity().proj(tangent)
}
