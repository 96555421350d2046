pub mod geometry;
pub mod scene;
mod util;

pub use scene::{Scene, place_primitives};
