//! Plain-data snapshots of a world's bodies.
//!
//! Encoding is left to the caller; every type here derives serde traits.

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};
use crate::math::vec2::Vec2;
use crate::objects::{Body, BodyArgs, BodyId};
use crate::shapes::{BodyShape, Circle, Rect};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SerializedWorld {
    pub bodies: Vec<SerializedBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedBody {
    pub id: BodyId,
    pub shape: SerializedShape,
    /// `null` for fixed bodies.
    #[serde(with = "infinite_as_null")]
    pub mass: f64,
    pub restitution: f64,
    pub is_sensor: bool,
}

/// Circles carry a radius, rects a width and height; positions are centers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedShape {
    Circle { x: f64, y: f64, radius: f64, velocity: Vec2 },
    Rect { x: f64, y: f64, width: f64, height: f64, velocity: Vec2 },
}

impl From<&BodyShape> for SerializedShape {
    fn from(shape: &BodyShape) -> Self {
        let Vec2 { x, y } = shape.pos();
        let velocity = shape.velocity();
        match shape {
            BodyShape::Circle(c) => SerializedShape::Circle { x, y, radius: c.radius, velocity },
            BodyShape::Rect(r) => SerializedShape::Rect { x, y, width: r.width, height: r.height, velocity },
        }
    }
}

impl SerializedShape {
    pub fn to_body_shape(&self) -> Result<BodyShape> {
        let mut shape = match *self {
            SerializedShape::Circle { x, y, radius, .. } => BodyShape::Circle(Circle::new(Vec2::new(x, y), radius)?),
            SerializedShape::Rect { x, y, width, height, .. } => {
                BodyShape::Rect(Rect::new(Vec2::new(x, y), width, height)?)
            }
        };
        let (SerializedShape::Circle { velocity, .. } | SerializedShape::Rect { velocity, .. }) = *self;
        if !velocity.is_finite() {
            return Err(PhysicsError::InvalidShape("velocity must be finite"));
        }
        shape.set_velocity(velocity);
        Ok(shape)
    }
}

impl From<&Body> for SerializedBody {
    fn from(body: &Body) -> Self {
        SerializedBody {
            id: body.id(),
            shape: SerializedShape::from(&body.shape),
            mass: body.mass(),
            restitution: body.restitution,
            is_sensor: body.is_sensor,
        }
    }
}

impl SerializedBody {
    /// Rebuilds the body, keeping its id.
    pub fn to_body(&self) -> Result<Body> {
        BodyArgs::new(self.shape.to_body_shape()?)
            .id(self.id)
            .mass(self.mass)
            .restitution(self.restitution)
            .sensor(self.is_sensor)
            .build()
    }
}

mod infinite_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
