pub mod body;
pub mod character;

pub use body::{Body, BodyArgs, BodyId};
pub use character::{Character, CharacterOptions};
