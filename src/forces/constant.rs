use crate::shapes::BoundingCircle;
use crate::world::World;

use super::{Expiration, Force, ForceId, RadialForce};

/// Applies once every tick until it expires.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantForce {
    base: RadialForce,
}

impl ConstantForce {
    pub fn new(bounding_circle: BoundingCircle, magnitude: f64, expiration: Expiration) -> Self {
        ConstantForce { base: RadialForce::new(bounding_circle, magnitude, expiration) }
    }

    pub fn base(&self) -> &RadialForce {
        &self.base
    }

    fn has_exceeded_duration(&self) -> bool {
        self.base.expiration.duration.map_or(false, |duration| self.base.age() >= duration)
    }
}

impl Force for ConstantForce {
    fn id(&self) -> ForceId {
        self.base.id()
    }

    fn update(&mut self, world: &mut World, dt: f64) {
        if !self.should_remove() {
            self.base.apply(world);
        }
        self.base.add_age(dt);
    }

    fn should_remove(&self) -> bool {
        self.base.has_reached_max_applications() || self.has_exceeded_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2::Vec2;
    use crate::objects::Body;
    use crate::shapes::Circle;
    use crate::world::WorldOptions;

    const EPSILON: f64 = 1e-10;

    fn still_world() -> World {
        let options = WorldOptions { friction: 0.0, init_boundaries: false, ..WorldOptions::default() };
        World::new(400.0, 400.0, options).unwrap()
    }

    fn push_circle() -> BoundingCircle {
        BoundingCircle::new(Vec2::new(100.0, 100.0), 20.0).unwrap()
    }

    #[test]
    fn test_pushes_with_linear_falloff() {
        let mut world = still_world();
        let id = world.add_body(Body::new(Circle::new(Vec2::new(110.0, 100.0), 5.0).unwrap())).unwrap();
        let mut force = ConstantForce::new(push_circle(), 10.0, Expiration::default());

        force.update(&mut world, 1.0);

        let velocity = world.body(id).unwrap().velocity();
        assert!((velocity.x - 5.0).abs() < EPSILON);
        assert!(velocity.y.abs() < EPSILON);
        assert_eq!(force.base().applications(), 1);
        assert!(!force.should_remove());
    }

    #[test]
    fn test_negative_magnitude_attracts() {
        let mut world = still_world();
        let id = world.add_body(Body::new(Circle::new(Vec2::new(100.0, 110.0), 5.0).unwrap())).unwrap();
        let mut force = ConstantForce::new(push_circle(), -10.0, Expiration::default());

        force.update(&mut world, 1.0);

        assert!((world.body(id).unwrap().velocity().y + 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_expires_after_max_applications() {
        let mut world = still_world();
        let id = world.add_body(Body::new(Circle::new(Vec2::new(110.0, 100.0), 5.0).unwrap())).unwrap();
        let expiration = Expiration { max_applications: Some(1), ..Expiration::default() };
        world.add_force(Box::new(ConstantForce::new(push_circle(), 10.0, expiration)));

        world.update(1.0);
        assert_eq!(world.force_count(), 0);
        let body = world.body(id).unwrap();
        assert!((body.pos().x - 115.0).abs() < EPSILON);

        world.update(1.0);
        let body = world.body(id).unwrap();
        assert!((body.velocity().x - 5.0).abs() < EPSILON);
        assert!((body.pos().x - 120.0).abs() < EPSILON);
    }

    #[test]
    fn test_expires_after_duration() {
        let mut world = still_world();
        let expiration = Expiration { duration: Some(2.0), ..Expiration::default() };
        let mut force = ConstantForce::new(push_circle(), 10.0, expiration);
        force.update(&mut world, 1.0);
        assert!(!force.should_remove());
        force.update(&mut world, 1.0);
        assert!(force.should_remove());
    }
}
