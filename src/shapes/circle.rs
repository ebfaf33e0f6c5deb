use crate::error::{PhysicsError, Result};
use crate::math::vec2::Vec2;

use super::{BoundingCircle, Extents, Particle};

/// A moving circle: a particle with a radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub particle: Particle,
    pub radius: f64,
}

impl Circle {
    pub fn new(pos: Vec2, radius: f64) -> Result<Self> {
        if !(radius >= 0.0) || !radius.is_finite() {
            return Err(PhysicsError::InvalidShape("circle radius must be finite and >= 0"));
        }
        if !pos.is_finite() {
            return Err(PhysicsError::InvalidShape("circle position must be finite"));
        }
        Ok(Self { particle: Particle::new(pos), radius })
    }

    pub fn bounding_circle(&self) -> BoundingCircle {
        BoundingCircle { center: self.particle.pos, radius: self.radius }
    }
}

impl Extents for Circle {
    fn x0(&self) -> f64 {
        self.particle.pos.x - self.radius
    }

    fn x1(&self) -> f64 {
        self.particle.pos.x + self.radius
    }

    fn y0(&self) -> f64 {
        self.particle.pos.y - self.radius
    }

    fn y1(&self) -> f64 {
        self.particle.pos.y + self.radius
    }

    fn center(&self) -> Vec2 {
        self.particle.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_new() {
        let c = Circle::new(Vec2::new(1.0, 2.0), 5.0).unwrap();
        assert_eq!(c.radius, 5.0);
        assert_eq!(c.particle.velocity, Vec2::ZERO);
        assert_eq!(c.width(), 10.0);
        assert_eq!(c.x0(), -4.0);
        assert_eq!(c.y1(), 7.0);
    }

    #[test]
    fn test_circle_new_negative_radius() {
        assert_eq!(
            Circle::new(Vec2::ZERO, -1.0),
            Err(PhysicsError::InvalidShape("circle radius must be finite and >= 0"))
        );
    }

    #[test]
    fn test_circle_new_non_finite_position() {
        assert_eq!(
            Circle::new(Vec2::new(f64::NAN, 0.0), 1.0),
            Err(PhysicsError::InvalidShape("circle position must be finite"))
        );
        assert!(Circle::new(Vec2::new(0.0, f64::NEG_INFINITY), 1.0).is_err());
    }
}
