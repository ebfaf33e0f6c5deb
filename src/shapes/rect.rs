use crate::error::{PhysicsError, Result};
use crate::math::vec2::Vec2;

use super::{BoundingBox, Extents, Particle};

/// A moving axis-aligned rectangle, positioned by its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub particle: Particle,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Zero-sized sides are allowed; the world boundaries are zero-thickness rects.
    pub fn new(pos: Vec2, width: f64, height: f64) -> Result<Self> {
        if !(width >= 0.0 && height >= 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(PhysicsError::InvalidShape("rect dimensions must be finite and >= 0"));
        }
        if !pos.is_finite() {
            return Err(PhysicsError::InvalidShape("rect position must be finite"));
        }
        Ok(Self { particle: Particle::new(pos), width, height })
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_center(self.particle.pos, self.width, self.height)
    }
}

impl Extents for Rect {
    fn x0(&self) -> f64 {
        self.particle.pos.x - self.width / 2.0
    }

    fn x1(&self) -> f64 {
        self.particle.pos.x + self.width / 2.0
    }

    fn y0(&self) -> f64 {
        self.particle.pos.y - self.height / 2.0
    }

    fn y1(&self) -> f64 {
        self.particle.pos.y + self.height / 2.0
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn center(&self) -> Vec2 {
        self.particle.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_extents() {
        let r = Rect::new(Vec2::new(10.0, 10.0), 4.0, 6.0).unwrap();
        assert_eq!((r.x0(), r.x1(), r.y0(), r.y1()), (8.0, 12.0, 7.0, 13.0));
        assert_eq!(r.bounding_box(), BoundingBox::new(8.0, 12.0, 7.0, 13.0));
    }

    #[test]
    fn test_rect_zero_thickness_is_valid() {
        assert!(Rect::new(Vec2::ZERO, 100.0, 0.0).is_ok());
        assert!(Rect::new(Vec2::ZERO, -1.0, 0.0).is_err());
    }

    #[test]
    fn test_rect_rejects_non_finite_position() {
        assert_eq!(
            Rect::new(Vec2::new(f64::INFINITY, 0.0), 1.0, 1.0),
            Err(PhysicsError::InvalidShape("rect position must be finite"))
        );
        assert!(Rect::new(Vec2::new(0.0, f64::NAN), 1.0, 1.0).is_err());
    }
}
