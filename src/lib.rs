pub mod collision;
pub mod error;
pub mod forces;
pub mod math;
pub mod objects;
pub mod shapes;
pub mod world;

// Re-export key types for easier use
pub use error::{PhysicsError, Result};
pub use forces::{ConstantForce, Expiration, Force, ForceId, IntervalForce};
pub use math::vec2::Vec2;
pub use objects::{Body, BodyArgs, BodyId, Character, CharacterOptions};
pub use shapes::{BodyShape, BoundingBox, BoundingCircle, Circle, Extents, LineSegment, Rect, Shape};
pub use world::{World, WorldEvent, WorldOptions};
