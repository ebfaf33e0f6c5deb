pub mod numeric;
pub mod vec2;

pub use numeric::{is_in_range, quadratic, round_for_floating_point};
pub use vec2::Vec2;
