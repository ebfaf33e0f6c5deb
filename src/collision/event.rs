use crate::math::vec2::Vec2;
use crate::objects::BodyId;

/// Time and direction of a swept contact between two shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    /// Fraction of the tick, in `[0, dt]`, at which the shapes first touch.
    pub time_of_collision: f64,
    /// Points from the moving shape's position at contact towards the other shape;
    /// its length is the separation between their positions.
    pub collision_vector: Vec2,
}

/// A [`Collision`] tied to the two bodies involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub time_of_collision: f64,
    pub collision_vector: Vec2,
    pub moving_body: BodyId,
    pub collision_body: BodyId,
}

impl CollisionEvent {
    pub fn new(collision: Collision, moving_body: BodyId, collision_body: BodyId) -> Self {
        CollisionEvent {
            time_of_collision: collision.time_of_collision,
            collision_vector: collision.collision_vector,
            moving_body,
            collision_body,
        }
    }
}
