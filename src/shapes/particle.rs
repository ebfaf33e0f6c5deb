use crate::math::vec2::Vec2;

/// A point with velocity. The moving half of every body shape.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Particle {
    pub pos: Vec2,
    pub velocity: Vec2,
}

impl Particle {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, velocity: Vec2::ZERO }
    }

    pub fn with_velocity(pos: Vec2, velocity: Vec2) -> Self {
        Self { pos, velocity }
    }

    /// Adds `delta` to the position.
    pub fn move_by(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    pub fn move_to(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Position after travelling for `t` at the current velocity.
    pub fn pos_at(&self, t: f64) -> Vec2 {
        self.pos + self.velocity * t
    }
}
