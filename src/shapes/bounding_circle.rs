use crate::error::{PhysicsError, Result};
use crate::math::vec2::Vec2;

use super::Extents;

/// A positioned circle without velocity, used as a query region (e.g. a force's reach).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCircle {
    pub center: Vec2,
    pub radius: f64,
}

impl BoundingCircle {
    pub fn new(center: Vec2, radius: f64) -> Result<Self> {
        if !(radius >= 0.0) || !radius.is_finite() {
            return Err(PhysicsError::InvalidShape("circle radius must be finite and >= 0"));
        }
        if !center.is_finite() {
            return Err(PhysicsError::InvalidShape("circle center must be finite"));
        }
        Ok(Self { center, radius })
    }
}

impl Extents for BoundingCircle {
    fn x0(&self) -> f64 {
        self.center.x - self.radius
    }

    fn x1(&self) -> f64 {
        self.center.x + self.radius
    }

    fn y0(&self) -> f64 {
        self.center.y - self.radius
    }

    fn y1(&self) -> f64 {
        self.center.y + self.radius
    }

    fn center(&self) -> Vec2 {
        self.center
    }
}
