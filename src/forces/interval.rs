use crate::error::{PhysicsError, Result};
use crate::shapes::BoundingCircle;
use crate::world::World;

use super::{Expiration, Force, ForceId, RadialForce};

/// Applies once per `interval` of elapsed time.
///
/// A tick that spans several interval boundaries applies once per boundary crossed, so
/// the number of applications never depends on how time was sliced into ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalForce {
    base: RadialForce,
    interval: f64,
    intervals_processed: u64,
}

impl IntervalForce {
    pub fn new(bounding_circle: BoundingCircle, magnitude: f64, expiration: Expiration, interval: f64) -> Result<Self> {
        if !(interval > 0.0) {
            return Err(PhysicsError::InvalidInterval(interval));
        }
        Ok(IntervalForce { base: RadialForce::new(bounding_circle, magnitude, expiration), interval, intervals_processed: 0 })
    }

    pub fn base(&self) -> &RadialForce {
        &self.base
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    fn intervals_elapsed(&self, time: f64) -> u64 {
        (time / self.interval).floor() as u64
    }

    /// Counted in whole intervals: age may overshoot the duration mid-interval.
    fn has_exceeded_duration(&self) -> bool {
        self.base
            .expiration
            .duration
            .map_or(false, |duration| self.intervals_elapsed(self.base.age()) > self.intervals_elapsed(duration))
    }
}

impl Force for IntervalForce {
    fn id(&self) -> ForceId {
        self.base.id()
    }

    fn update(&mut self, world: &mut World, dt: f64) {
        self.base.add_age(dt);
        let crossed = self.intervals_elapsed(self.base.age());
        let last_allowed = self.base.expiration.duration.map_or(u64::MAX, |d| self.intervals_elapsed(d));

        while self.intervals_processed < crossed.min(last_allowed) && !self.base.has_reached_max_applications() {
            self.intervals_processed += 1;
            self.base.apply(world);
        }
        self.intervals_processed = self.intervals_processed.max(crossed);
    }

    fn should_remove(&self) -> bool {
        self.base.has_reached_max_applications() || self.has_exceeded_duration()
    }
}
