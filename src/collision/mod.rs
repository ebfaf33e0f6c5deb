pub mod continuous;
pub mod detection;
pub mod event;
pub mod quadtree;
pub mod resolution;

// Re-export key types
pub use continuous::{get_collision, get_collision_event, is_chronological};
pub use detection::{bodies_overlap, has_overlap, movement_bounding_box, swept_bounding_box};
pub use event::{Collision, CollisionEvent};
pub use quadtree::{Dimensions, QuadTree, QuadTreeConfig};
pub use resolution::{coefficient_of_restitution, resolve, resolved_velocities, tangent_movement, RestitutionFn};
