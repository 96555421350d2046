mod aabb;
mod overlap;
mod triangle;

pub use aabb::AABB;
pub use overlap::{Ball, Intersects, box_intersects_box, box_intersects_sphere, sphere_intersects_sphere};
pub use triangle::Triangle;

pub type FloatType = f32;

pub type WorldPoint = nalgebra::Point3<FloatType>;
pub type WorldVector = nalgebra::Vector3<FloatType>;
pub type WorldBox = AABB<WorldPoint>;
pub type WorldTransform = nalgebra::Matrix4<FloatType>;

/// Linear RGB color, each channel nominally in [0, 1].
pub type Color = nalgebra::Vector3<FloatType>;
