use std::collections::{HashMap, HashSet};
use std::mem;

use log::{debug, trace};

use crate::{
    collision::{self, CollisionEvent, QuadTree},
    error::{PhysicsError, Result},
    forces::{Force, ForceId},
    math::{round_for_floating_point, vec2::Vec2},
    objects::{Body, BodyArgs, BodyId},
    shapes::{BodyShape, BoundingBox, Rect, Shape},
};

use super::events::WorldEvent;
use super::options::WorldOptions;
use super::snapshot::{SerializedBody, SerializedWorld};

/// Owns every body and force and advances them one tick at a time.
///
/// Bodies are kept in insertion order; friction and movement passes visit them in that
/// order. State changes are not pushed anywhere: they are recorded as [`WorldEvent`]s
/// and handed back by [`World::update`] and [`World::drain_events`].
#[derive(Debug)]
pub struct World {
    width: f64,
    height: f64,
    options: WorldOptions,
    bodies: Vec<Body>,
    index: HashMap<BodyId, usize>,
    forces: Vec<Box<dyn Force>>,
    quad_tree: QuadTree<BodyId>,
    events: Vec<WorldEvent>,
}

impl World {
    pub fn new(width: f64, height: f64, options: WorldOptions) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(PhysicsError::InvalidWorldDimensions { width, height });
        }
        let quad_tree = QuadTree::new(BoundingBox::new(0.0, width, 0.0, height), options.quad_tree)?;

        let mut world = Self {
            width,
            height,
            options,
            bodies: Vec::new(),
            index: HashMap::new(),
            forces: Vec::new(),
            quad_tree,
            events: Vec::new(),
        };
        if options.init_boundaries {
            world.init_boundaries()?;
        }
        debug!("created {width}x{height} world with {options:?}");
        Ok(world)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn options(&self) -> &WorldOptions {
        &self.options
    }

    /// Bodies in insertion order.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.index.get(&id).map(|&idx| &self.bodies[idx])
    }

    pub fn add_body(&mut self, body: Body) -> Result<BodyId> {
        let id = body.id();
        if self.index.contains_key(&id) {
            return Err(PhysicsError::DuplicateBody(id));
        }
        self.quad_tree.insert(id, body.shape.to_shape());
        self.index.insert(id, self.bodies.len());
        self.bodies.push(body);
        self.events.push(WorldEvent::AddBody(id));
        debug!("added body {id}");
        Ok(id)
    }

    pub fn remove_body(&mut self, id: BodyId) -> Result<Body> {
        let idx = self.index.remove(&id).ok_or(PhysicsError::UnknownBody(id))?;
        let body = self.bodies.remove(idx);
        for (i, later) in self.bodies.iter().enumerate().skip(idx) {
            self.index.insert(later.id(), i);
        }
        self.quad_tree.remove(&id);
        self.events.push(WorldEvent::RemoveBody(id));
        debug!("removed body {id}");
        Ok(body)
    }

    pub fn add_force(&mut self, force: Box<dyn Force>) -> ForceId {
        let id = force.id();
        self.forces.push(force);
        id
    }

    /// Returns false if no force has this id.
    pub fn remove_force(&mut self, id: ForceId) -> bool {
        let before = self.forces.len();
        self.forces.retain(|f| f.id() != id);
        self.forces.len() != before
    }

    pub fn force_count(&self) -> usize {
        self.forces.len()
    }

    /// Bodies overlapping `shape` (touching counts), in insertion order.
    pub fn bodies_in_shape(&self, shape: &Shape) -> Vec<&Body> {
        let mut indices: Vec<usize> =
            self.quad_tree.query(shape).iter().filter_map(|id| self.index.get(id).copied()).collect();
        indices.sort_unstable();
        indices.into_iter().map(|idx| &self.bodies[idx]).collect()
    }

    /// Speed a body loses to friction each tick.
    pub fn friction_on_body(&self, body: &Body) -> f64 {
        friction_on_body(body, self.options.friction)
    }

    pub fn velocity_after_friction(&self, body: &Body) -> Vec2 {
        velocity_after_friction(body, self.options.friction)
    }

    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec2) -> Result<()> {
        let idx = self.index_of(id)?;
        self.bodies[idx].set_velocity(velocity);
        Ok(())
    }

    pub fn apply_force(&mut self, id: BodyId, force: Vec2) -> Result<()> {
        let idx = self.index_of(id)?;
        self.bodies[idx].apply_force(force);
        Ok(())
    }

    /// Moves a body by `delta`. Sensors stay put.
    pub fn move_body(&mut self, id: BodyId, delta: Vec2) -> Result<()> {
        let idx = self.index_of(id)?;
        if self.bodies[idx].move_by(delta) {
            self.on_moved(idx);
        }
        Ok(())
    }

    pub fn move_body_to(&mut self, id: BodyId, pos: Vec2) -> Result<()> {
        let idx = self.index_of(id)?;
        self.bodies[idx].move_to(pos);
        self.on_moved(idx);
        Ok(())
    }

    pub fn set_mass(&mut self, id: BodyId, mass: f64) -> Result<()> {
        let idx = self.index_of(id)?;
        let old = self.bodies[idx].set_mass(mass)?;
        self.events.push(WorldEvent::MassChange { body_id: id, old, new: mass });
        Ok(())
    }

    /// Swaps a body's shape and re-indexes it.
    pub fn set_shape(&mut self, id: BodyId, shape: impl Into<BodyShape>) -> Result<()> {
        let idx = self.index_of(id)?;
        let new = shape.into();
        let old = self.bodies[idx].set_shape(new);
        self.quad_tree.reindex(id, new.to_shape());
        self.events.push(WorldEvent::ShapeChange { body_id: id, old, new });
        Ok(())
    }

    /// Events recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        mem::take(&mut self.events)
    }

    /// Advances the simulation by `dt` and returns the events it produced, along with
    /// any recorded since the last drain.
    pub fn update(&mut self, dt: f64) -> Vec<WorldEvent> {
        self.update_forces(dt);
        self.update_bodies(dt);
        self.quad_tree.update();
        self.drain_events()
    }

    pub fn serialized(&self) -> SerializedWorld {
        SerializedWorld { bodies: self.bodies.iter().map(SerializedBody::from).collect() }
    }

    /// Replaces every body with the ones in `snapshot`. Forces are kept. On error the
    /// world is left untouched.
    pub fn load_serialized(&mut self, snapshot: &SerializedWorld) -> Result<()> {
        let bodies = snapshot.bodies.iter().map(SerializedBody::to_body).collect::<Result<Vec<_>>>()?;
        let mut seen = HashSet::new();
        if let Some(duplicate) = bodies.iter().find(|b| !seen.insert(b.id())) {
            return Err(PhysicsError::DuplicateBody(duplicate.id()));
        }

        self.events.extend(self.bodies.drain(..).map(|old| WorldEvent::RemoveBody(old.id())));
        self.index.clear();
        self.quad_tree.clear();
        for body in bodies {
            self.add_body(body)?;
        }
        debug!("loaded snapshot with {} bodies", self.bodies.len());
        Ok(())
    }

    fn index_of(&self, id: BodyId) -> Result<usize> {
        self.index.get(&id).copied().ok_or(PhysicsError::UnknownBody(id))
    }

    fn init_boundaries(&mut self) -> Result<()> {
        let (w, h) = (self.width, self.height);
        let walls = [
            Rect::new(Vec2::new(w / 2.0, 0.0), w, 0.0)?, // top
            Rect::new(Vec2::new(w, h / 2.0), 0.0, h)?,   // right
            Rect::new(Vec2::new(w / 2.0, h), w, 0.0)?,   // bottom
            Rect::new(Vec2::new(0.0, h / 2.0), 0.0, h)?, // left
        ];
        for wall in walls {
            self.add_body(BodyArgs::new(wall).mass(f64::INFINITY).build()?)?;
        }
        Ok(())
    }

    fn update_forces(&mut self, dt: f64) {
        let mut forces = mem::take(&mut self.forces);
        for force in forces.iter_mut() {
            force.update(self, dt);
        }
        forces.retain(|force| {
            let expired = force.should_remove();
            if expired {
                debug!("force {} expired", force.id());
            }
            !expired
        });
        // forces added while updating
        forces.append(&mut self.forces);
        self.forces = forces;
    }

    fn update_bodies(&mut self, dt: f64) {
        // every body slows down before any moves, so both sides of a pair are settled
        let friction = self.options.friction;
        for body in self.bodies.iter_mut() {
            let velocity = velocity_after_friction(body, friction);
            body.set_velocity(velocity);
        }

        let ids: Vec<BodyId> = self.bodies.iter().map(Body::id).collect();
        for id in ids {
            if self.body(id).map_or(false, Body::is_moving) {
                self.update_body_movement(id, dt);
            }
        }
    }

    fn update_body_movement(&mut self, id: BodyId, dt: f64) {
        let mut ignore = HashSet::new();
        loop {
            let Some(idx) = self.index.get(&id).copied() else {
                return;
            };
            let Some(event) = collision::get_collision_event(&self.bodies[idx], self, dt, &ignore) else {
                let delta = self.bodies[idx].velocity() * dt;
                if delta.has_magnitude() && self.bodies[idx].move_by(delta) {
                    self.on_moved(idx);
                }
                return;
            };
            let Some(target_idx) = self.index.get(&event.collision_body).copied() else {
                return;
            };

            // Bodies are visited in no particular physical order, so a slower body may find
            // a faster one ahead of it. Wait for that body's own turn instead.
            if !collision::is_chronological(&event, &self.bodies[idx], &self.bodies[target_idx]) {
                trace!("deferring collision of {} into {}", id, event.collision_body);
                return;
            }

            if !self.resolves_physically(idx, target_idx) {
                trace!("{} passing through {}", id, event.collision_body);
                self.record_collision(&event);
                ignore.insert(event.collision_body);
                continue;
            }

            let restitution = self.options.restitution.unwrap_or(collision::coefficient_of_restitution);
            let Some((mover, target)) = body_pair_mut(&mut self.bodies, idx, target_idx) else {
                return;
            };
            trace!("resolving {} into {} at t={}", id, event.collision_body, event.time_of_collision);
            if collision::resolve(&event, mover, target, restitution) {
                self.on_moved(idx);
            }
            self.record_collision(&event);
            self.resolve_chained_bodies(event.collision_body);
            return;
        }
    }

    /// Follows a body that was just pushed through whatever it is already touching. A chain
    /// ending at a fixed body makes its last movable body slide along the fixed one.
    fn resolve_chained_bodies(&mut self, start: BodyId) {
        let mut visited = HashSet::new();
        let mut current = start;

        for _ in 0..=self.bodies.len() {
            let Some(idx) = self.index.get(&current).copied() else {
                return;
            };
            if self.bodies[idx].is_fixed() {
                return;
            }
            let Some(event) = collision::get_collision_event(&self.bodies[idx], self, 0.0, &visited) else {
                return;
            };
            if round_for_floating_point(event.time_of_collision) != 0.0 {
                return;
            }
            let Some(target_idx) = self.index.get(&event.collision_body).copied() else {
                return;
            };
            self.record_collision(&event);

            let target = &self.bodies[target_idx];
            if target.is_sensor {
                visited.insert(target.id());
            } else if target.is_fixed() {
                let tangent = collision::tangent_movement(&event, &self.bodies[idx]);
                trace!("redirecting {current} along {}", event.collision_body);
                self.bodies[idx].set_velocity(tangent);
                return;
            } else {
                visited.insert(current);
                current = event.collision_body;
            }
        }
    }

    fn resolves_physically(&self, idx: usize, target_idx: usize) -> bool {
        let (mover, target) = (&self.bodies[idx], &self.bodies[target_idx]);
        if mover.is_sensor || target.is_sensor {
            return false;
        }
        self.options.should_resolve_collision.map_or(true, |should_resolve| should_resolve(mover, target))
    }

    fn record_collision(&mut self, event: &CollisionEvent) {
        self.events.push(WorldEvent::Collision { body_id: event.moving_body, event: *event });
        self.events.push(WorldEvent::Collision { body_id: event.collision_body, event: *event });
    }

    fn on_moved(&mut self, idx: usize) {
        let body = &self.bodies[idx];
        self.quad_tree.reindex(body.id(), body.shape.to_shape());
        self.events.push(WorldEvent::Move { body_id: body.id(), position: body.pos() });
    }
}

fn friction_on_body(body: &Body, coefficient: f64) -> f64 {
    body.mass() * coefficient
}

/// Friction only ever slows a body down to a stop; it never reverses it.
fn velocity_after_friction(body: &Body, coefficient: f64) -> Vec2 {
    if !body.is_moving() {
        return body.velocity();
    }
    let friction = friction_on_body(body, coefficient);
    // NaN for a fixed body with no friction
    if !(friction > 0.0) {
        return body.velocity();
    }
    let speed = body.speed();
    if friction >= speed {
        Vec2::ZERO
    } else {
        body.velocity().resize(speed - friction)
    }
}

/// Helper to safely get mutable references to two different bodies in a slice.
fn body_pair_mut(bodies: &mut [Body], idx_a: usize, idx_b: usize) -> Option<(&mut Body, &mut Body)> {
    if idx_a == idx_b || idx_a >= bodies.len() || idx_b >= bodies.len() {
        return None;
    }
    if idx_a < idx_b {
        let (slice_a, slice_b) = bodies.split_at_mut(idx_b);
        Some((&mut slice_a[idx_a], &mut slice_b[0]))
    } else {
        let (slice_b, slice_a) = bodies.split_at_mut(idx_a);
        Some((&mut slice_a[0], &mut slice_b[idx_b]))
    }
}
