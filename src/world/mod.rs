pub mod events;
pub mod options;
pub mod physics_world;
pub mod snapshot;

// Re-export the main world types
pub use events::WorldEvent;
pub use options::{ShouldResolveFn, WorldOptions, DEFAULT_FRICTION};
pub use physics_world::World;
pub use snapshot::{SerializedBody, SerializedShape, SerializedWorld};
