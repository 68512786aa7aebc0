pub mod common;
pub mod engine;
pub mod generation;
pub mod image;
pub mod presets;
pub mod user;

pub use common::*;
pub use engine::*;
pub use generation::*;
pub use image::*;
pub use presets::*;
pub use user::*;
