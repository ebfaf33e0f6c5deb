use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::collision;
use crate::error::{PhysicsError, Result};
use crate::math::{round_for_floating_point, vec2::Vec2};
use crate::objects::BodyId;
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterOptions {
    pub frames_to_top_speed: f64,
    pub top_speed: f64,
}

impl Default for CharacterOptions {
    fn default() -> Self {
        CharacterOptions { frames_to_top_speed: 5.0, top_speed: 4.0 }
    }
}

impl CharacterOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.frames_to_top_speed > 0.0) {
            return Err(PhysicsError::InvalidCharacterOption {
                name: "frames_to_top_speed",
                value: self.frames_to_top_speed,
            });
        }
        if !(self.top_speed > 0.0) {
            return Err(PhysicsError::InvalidCharacterOption { name: "top_speed", value: self.top_speed });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Momentum {
    consecutive_frames: f64,
    last_heading: Option<Vec2>,
    heading: Option<Vec2>,
    /// Set by every `move_in`, cleared by `update`.
    heading_refreshed: bool,
}

/// Player-style steering for a body owned by a [`World`].
///
/// Under heavy friction a character can't reach its usual acceleration, so it builds
/// momentum instead while it keeps moving the same way frame after frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    body_id: BodyId,
    options: CharacterOptions,
    momentum: Momentum,
}

impl Character {
    pub fn new(body_id: BodyId, options: CharacterOptions) -> Result<Self> {
        options.validate()?;
        Ok(Character { body_id, options, momentum: Momentum::default() })
    }

    pub fn body_id(&self) -> BodyId {
        self.body_id
    }

    pub fn options(&self) -> &CharacterOptions {
        &self.options
    }

    pub fn acceleration(&self) -> f64 {
        self.options.top_speed / self.options.frames_to_top_speed
    }

    /// Acceleration earned by consecutive frames of movement, capped at top speed.
    pub fn momentum(&self) -> f64 {
        let CharacterOptions { frames_to_top_speed, top_speed } = self.options;
        (top_speed * self.momentum.consecutive_frames / frames_to_top_speed).min(top_speed)
    }

    /// Call once per frame, after any `move_in`.
    pub fn update(&mut self, dt: f64) {
        if !self.momentum.heading_refreshed || self.heading_reversed() {
            self.momentum = Momentum::default();
            return;
        }
        let frames = self.momentum.consecutive_frames + dt;
        self.momentum.consecutive_frames = frames.min(self.options.frames_to_top_speed);
        self.momentum.last_heading = self.momentum.heading;
        self.momentum.heading_refreshed = false;
    }

    /// Accelerates the body towards `direction`, then slides it along anything it is
    /// already pressed against.
    pub fn move_in(&mut self, world: &mut World, direction: Vec2, dt: f64) -> Result<()> {
        if !direction.has_magnitude() {
            return Ok(());
        }
        self.momentum.heading = Some(direction);
        self.momentum.heading_refreshed = true;

        let body = world.body(self.body_id).ok_or(PhysicsError::UnknownBody(self.body_id))?;
        let top_speed = self.options.top_speed;
        if body.speed() >= top_speed {
            return Ok(());
        }

        let acceleration = if world.friction_on_body(body) > self.acceleration() {
            self.momentum()
        } else {
            self.acceleration()
        };
        let force = direction.resize(acceleration * body.mass());
        world.apply_force(self.body_id, force)?;

        let Some(body) = world.body(self.body_id) else {
            return Err(PhysicsError::UnknownBody(self.body_id));
        };
        if body.speed() >= top_speed {
            let clamped = body.velocity().resize(top_speed);
            world.set_velocity(self.body_id, clamped)?;
        }

        let Some(body) = world.body(self.body_id) else {
            return Err(PhysicsError::UnknownBody(self.body_id));
        };
        let redirect = collision::get_collision_event(body, world, dt, &HashSet::new())
            .filter(|event| round_for_floating_point(event.time_of_collision) == 0.0)
            .map(|event| collision::tangent_movement(&event, body));
        if let Some(tangent) = redirect {
            world.set_velocity(self.body_id, tangent)?;
        }
        Ok(())
    }

    fn heading_reversed(&self) -> bool {
        match (self.momentum.last_heading, self.momentum.heading) {
            (Some(last), Some(current)) => !last.is_same_direction(current),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Body;
    use crate::shapes::Circle;
    use crate::world::WorldOptions;

    const EPSILON: f64 = 1e-9;

    fn setup(options: WorldOptions, pos: Vec2, mass: f64) -> (World, Character) {
        let mut world = World::new(400.0, 400.0, options).unwrap();
        let mut body = Body::new(Circle::new(pos, 5.0).unwrap());
        body.set_mass(mass).unwrap();
        let id = world.add_body(body).unwrap();
        (world, Character::new(id, CharacterOptions::default()).unwrap())
    }

    fn frictionless() -> WorldOptions {
        WorldOptions { friction: 0.0, init_boundaries: false, ..WorldOptions::default() }
    }

    #[test]
    fn test_options_are_validated() {
        let options = CharacterOptions { frames_to_top_speed: 0.0, ..CharacterOptions::default() };
        assert_eq!(
            Character::new(BodyId(1), options),
            Err(PhysicsError::InvalidCharacterOption { name: "frames_to_top_speed", value: 0.0 })
        );
        let options = CharacterOptions { top_speed: -1.0, ..CharacterOptions::default() };
        assert!(Character::new(BodyId(1), options).is_err());
    }

    #[test]
    fn test_accelerates_then_caps_at_top_speed() {
        let (mut world, mut character) = setup(frictionless(), Vec2::new(100.0, 100.0), 1.0);
        let id = character.body_id();

        character.move_in(&mut world, Vec2::new(2.0, 0.0), 1.0).unwrap();
        assert!((world.body(id).unwrap().velocity().x - 0.8).abs() < EPSILON);

        for _ in 0..10 {
            character.move_in(&mut world, Vec2::new(1.0, 0.0), 1.0).unwrap();
        }
        assert!((world.body(id).unwrap().speed() - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_direction_is_ignored() {
        let (mut world, mut character) = setup(frictionless(), Vec2::new(100.0, 100.0), 1.0);
        character.move_in(&mut world, Vec2::ZERO, 1.0).unwrap();
        assert_eq!(world.body(character.body_id()).unwrap().velocity(), Vec2::ZERO);
        character.update(1.0);
        assert_eq!(character.momentum(), 0.0);
    }

    #[test]
    fn test_heavy_friction_builds_momentum() {
        let options = WorldOptions { init_boundaries: false, ..WorldOptions::default() };
        let (mut world, mut character) = setup(options, Vec2::new(100.0, 100.0), 4.0);
        let id = character.body_id();
        let right = Vec2::new(1.0, 0.0);

        // friction of 2 beats the base acceleration, and there is no momentum yet
        character.move_in(&mut world, right, 1.0).unwrap();
        assert_eq!(world.body(id).unwrap().velocity(), Vec2::ZERO);
        character.update(1.0);

        character.move_in(&mut world, right, 1.0).unwrap();
        assert!((world.body(id).unwrap().velocity().x - 0.8).abs() < EPSILON);
        character.update(1.0);
        character.move_in(&mut world, right, 1.0).unwrap();
        character.update(1.0);
        assert!((character.momentum() - 2.4).abs() < EPSILON);
    }

    #[test]
    fn test_momentum_resets() {
        let (mut world, mut character) = setup(frictionless(), Vec2::new(100.0, 100.0), 1.0);

        character.move_in(&mut world, Vec2::new(1.0, 0.0), 1.0).unwrap();
        character.update(1.0);
        assert!((character.momentum() - 0.8).abs() < EPSILON);
        character.update(1.0);
        assert_eq!(character.momentum(), 0.0);

        character.move_in(&mut world, Vec2::new(1.0, 0.0), 1.0).unwrap();
        character.update(1.0);
        character.move_in(&mut world, Vec2::new(-1.0, 0.0), 1.0).unwrap();
        character.update(1.0);
        assert_eq!(character.momentum(), 0.0);
    }

    #[test]
    fn test_slides_along_touching_wall() {
        let options = WorldOptions { friction: 0.0, ..WorldOptions::default() };
        let (mut world, mut character) = setup(options, Vec2::new(395.0, 200.0), 1.0);

        character.move_in(&mut world, Vec2::new(1.0, 1.0), 1.0).unwrap();

        let velocity = world.body(character.body_id()).unwrap().velocity();
        assert!(velocity.x.abs() < EPSILON);
        assert!((velocity.y - 0.8 / 2f64.sqrt()).abs() < EPSILON);
    }

    #[test]
    fn test_unknown_body() {
        let (mut world, _) = setup(frictionless(), Vec2::new(100.0, 100.0), 1.0);
        let mut stray = Character::new(BodyId(u64::MAX), CharacterOptions::default()).unwrap();
        assert_eq!(
            stray.move_in(&mut world, Vec2::new(1.0, 0.0), 1.0),
            Err(PhysicsError::UnknownBody(BodyId(u64::MAX)))
        );
    }
}
