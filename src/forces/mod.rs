use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;

use crate::shapes::{BoundingCircle, Shape};
use crate::world::World;

pub mod constant;
pub mod interval;

// Re-export the force types for easier access
pub use constant::ConstantForce;
pub use interval::IntervalForce;

static NEXT_FORCE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForceId(pub u64);

impl ForceId {
    pub fn next() -> Self {
        ForceId(NEXT_FORCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ForceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A source of impulses owned by a [`World`]. Updated once per tick before bodies move,
/// and dropped by the world once it reports [`Force::should_remove`].
pub trait Force: fmt::Debug {
    fn id(&self) -> ForceId;

    /// Ages the force by `dt` and applies it to the world as often as is due.
    fn update(&mut self, world: &mut World, dt: f64);

    fn should_remove(&self) -> bool;
}

/// When a force expires. `None` never expires.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Expiration {
    pub duration: Option<f64>,
    pub max_applications: Option<u32>,
}

/// The shared part of every force: a circular reach pushing bodies away from its center
/// (or pulling, for a negative magnitude) with linear falloff.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialForce {
    id: ForceId,
    pub bounding_circle: BoundingCircle,
    pub magnitude: f64,
    pub expiration: Expiration,
    applications: u32,
    age: f64,
}

impl RadialForce {
    pub fn new(bounding_circle: BoundingCircle, magnitude: f64, expiration: Expiration) -> Self {
        RadialForce { id: ForceId::next(), bounding_circle, magnitude, expiration, applications: 0, age: 0.0 }
    }

    pub fn id(&self) -> ForceId {
        self.id
    }

    pub fn applications(&self) -> u32 {
        self.applications
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub(crate) fn add_age(&mut self, dt: f64) {
        self.age += dt;
    }

    pub fn has_reached_max_applications(&self) -> bool {
        self.expiration.max_applications.map_or(false, |max| self.applications >= max)
    }

    /// 1 at the center, 0 at the edge and beyond.
    pub fn dissipation_factor(&self, distance: f64) -> f64 {
        let radius = self.bounding_circle.radius;
        if radius == 0.0 {
            return 0.0;
        }
        ((radius - distance) / radius).max(0.0)
    }

    /// Pushes every body overlapping the circle and counts one application.
    pub fn apply(&mut self, world: &mut World) {
        let center = self.bounding_circle.center;
        let pushes: Vec<_> = world
            .bodies_in_shape(&Shape::Circle(self.bounding_circle))
            .into_iter()
            .map(|body| {
                let diff = body.pos() - center;
                let strength = self.magnitude * self.dissipation_factor(diff.magnitude());
                (body.id(), diff.resize(strength))
            })
            .collect();

        trace!("force {} pushing {} bodies", self.id, pushes.len());
        for (id, push) in pushes {
            if let Err(err) = world.apply_force(id, push) {
                trace!("force {} skipped a body: {err}", self.id);
            }
        }
        self.applications += 1;
    }
}
