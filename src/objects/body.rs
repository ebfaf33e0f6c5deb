use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};
use crate::math::vec2::Vec2;
use crate::shapes::{BodyShape, Extents};

static NEXT_BODY_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a body, unique within the process unless supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub u64);

impl BodyId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        BodyId(NEXT_BODY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Makes sure later allocations never hand out `id` again.
    pub(crate) fn reserve(id: BodyId) {
        NEXT_BODY_ID.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_mass(mass: f64) -> Result<f64> {
    if mass > 0.0 {
        Ok(mass)
    } else {
        Err(PhysicsError::InvalidMass(mass))
    }
}

/// Construction arguments for a [`Body`]. Unset fields default to a fresh id, mass 1,
/// restitution 1 and a non-sensor body.
#[derive(Debug, Clone, Copy)]
pub struct BodyArgs {
    shape: BodyShape,
    id: Option<BodyId>,
    mass: f64,
    restitution: f64,
    is_sensor: bool,
}

impl BodyArgs {
    pub fn new(shape: impl Into<BodyShape>) -> Self {
        BodyArgs { shape: shape.into(), id: None, mass: 1.0, restitution: 1.0, is_sensor: false }
    }

    pub fn id(mut self, id: BodyId) -> Self {
        self.id = Some(id);
        self
    }

    /// `f64::INFINITY` makes the body fixed.
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn restitution(mut self, restitution: f64) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    pub fn build(self) -> Result<Body> {
        let mass = validate_mass(self.mass)?;
        let id = match self.id {
            Some(id) => {
                BodyId::reserve(id);
                id
            }
            None => BodyId::next(),
        };
        Ok(Body { id, shape: self.shape, mass, restitution: self.restitution, is_sensor: self.is_sensor })
    }
}

/// A shape with mass, elasticity and a sensor flag.
///
/// Bodies never rotate. An infinite mass marks the body as fixed: resolution treats it
/// as immovable. Sensors are detected and reported but never pushed, never push back,
/// and ignore forces and relative moves.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    id: BodyId,
    pub shape: BodyShape,
    mass: f64,
    pub restitution: f64,
    pub is_sensor: bool,
}

impl Body {
    /// A body with default mass, restitution and a fresh id.
    pub fn new(shape: impl Into<BodyShape>) -> Self {
        Body { id: BodyId::next(), shape: shape.into(), mass: 1.0, restitution: 1.0, is_sensor: false }
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn pos(&self) -> Vec2 {
        self.shape.pos()
    }

    pub fn velocity(&self) -> Vec2 {
        self.shape.velocity()
    }

    pub fn speed(&self) -> f64 {
        self.velocity().magnitude()
    }

    pub fn is_moving(&self) -> bool {
        self.velocity().has_magnitude()
    }

    pub fn is_fixed(&self) -> bool {
        self.mass == f64::INFINITY
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.shape.set_velocity(velocity);
    }

    /// `velocity += force / mass`. Sensors ignore forces.
    pub fn apply_force(&mut self, force: Vec2) {
        if self.is_sensor {
            return;
        }
        let velocity = self.velocity() + force / self.mass;
        self.set_velocity(velocity);
    }

    /// Moves by `movement`. Returns false without moving when the body is a sensor.
    pub fn move_by(&mut self, movement: Vec2) -> bool {
        if self.is_sensor {
            return false;
        }
        self.shape.move_by(movement);
        true
    }

    /// Absolute placement; applies to sensors too.
    pub fn move_to(&mut self, pos: Vec2) {
        self.shape.move_to(pos);
    }

    /// Replaces the mass, returning the previous value.
    pub fn set_mass(&mut self, mass: f64) -> Result<f64> {
        let mass = validate_mass(mass)?;
        Ok(std::mem::replace(&mut self.mass, mass))
    }

    /// Replaces the shape, returning the previous one.
    pub fn set_shape(&mut self, shape: impl Into<BodyShape>) -> BodyShape {
        std::mem::replace(&mut self.shape, shape.into())
    }
}

impl Extents for Body {
    fn x0(&self) -> f64 {
        self.shape.x0()
    }

    fn x1(&self) -> f64 {
        self.shape.x1()
    }

    fn y0(&self) -> f64 {
        self.shape.y0()
    }

    fn y1(&self) -> f64 {
        self.shape.y1()
    }

    fn center(&self) -> Vec2 {
        self.pos()
    }
}
