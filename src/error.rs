//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

use crate::objects::BodyId;
use crate::shapes::LineSegment;

/// Errors raised when a caller hands the engine something it cannot simulate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("interval force interval must be greater than 0, got {0}")]
    InvalidInterval(f64),

    #[error("character option `{name}` must be greater than 0, got {value}")]
    InvalidCharacterOption { name: &'static str, value: f64 },

    #[error("world dimensions must be positive and finite, got {width}x{height}")]
    InvalidWorldDimensions { width: f64, height: f64 },

    #[error("invalid quadtree config: {0}")]
    InvalidQuadTreeConfig(&'static str),

    #[error("invalid shape: {0}")]
    InvalidShape(&'static str),

    #[error("body mass must be greater than 0, got {0}")]
    InvalidMass(f64),

    #[error("can't get overlap of incompatible line segments {a:?}, {b:?}")]
    IncompatibleSegments { a: LineSegment, b: LineSegment },

    #[error("no body with id {0} in the world")]
    UnknownBody(BodyId),

    #[error("a body with id {0} is already in the world")]
    DuplicateBody(BodyId),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
