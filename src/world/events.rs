use crate::collision::CollisionEvent;
use crate::math::vec2::Vec2;
use crate::objects::BodyId;
use crate::shapes::BodyShape;

/// A state change recorded by the world, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    AddBody(BodyId),
    RemoveBody(BodyId),
    /// The body moved; `position` is where it ended up.
    Move { body_id: BodyId, position: Vec2 },
    /// Emitted once for each of the two bodies in a contact.
    Collision { body_id: BodyId, event: CollisionEvent },
    MassChange { body_id: BodyId, old: f64, new: f64 },
    ShapeChange { body_id: BodyId, old: BodyShape, new: BodyShape },
}

impl WorldEvent {
    pub fn body_id(&self) -> BodyId {
        match self {
            WorldEvent::AddBody(id) | WorldEvent::RemoveBody(id) => *id,
            WorldEvent::Move { body_id, .. }
            | WorldEvent::Collision { body_id, .. }
            | WorldEvent::MassChange { body_id, .. }
            | WorldEvent::ShapeChange { body_id, .. } => *body_id,
        }
    }
}
