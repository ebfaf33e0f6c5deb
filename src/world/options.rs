use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collision::{QuadTreeConfig, RestitutionFn};
use crate::objects::Body;

/// Decides per pair whether a contact is physically resolved. Unresolved contacts are
/// still reported, like sensor contacts.
pub type ShouldResolveFn = fn(&Body, &Body) -> bool;

pub const DEFAULT_FRICTION: f64 = 0.5;

/// Tuning for a [`World`](super::World).
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldOptions {
    /// Speed lost per tick is `mass * friction`.
    pub friction: f64,
    /// Adds four fixed, zero-thickness walls along the world edges.
    pub init_boundaries: bool,
    pub quad_tree: QuadTreeConfig,
    /// Overrides the coefficient of restitution; defaults to the lower of the two bodies'.
    #[serde(skip)]
    pub restitution: Option<RestitutionFn>,
    #[serde(skip)]
    pub should_resolve_collision: Option<ShouldResolveFn>,
}

impl Default for WorldOptions {
    fn default() -> Self {
        WorldOptions {
            friction: DEFAULT_FRICTION,
            init_boundaries: true,
            quad_tree: QuadTreeConfig::default(),
            restitution: None,
            should_resolve_collision: None,
        }
    }
}

impl fmt::Debug for WorldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldOptions")
            .field("friction", &self.friction)
            .field("init_boundaries", &self.init_boundaries)
            .field("quad_tree", &self.quad_tree)
            .field("restitution", &self.restitution.is_some())
            .field("should_resolve_collision", &self.should_resolve_collision.is_some())
            .finish()
    }
}
