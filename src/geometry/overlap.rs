//! Exact overlap tests between spheres and axis aligned boxes.
//!
//! All tests are strict: shapes that only touch (share a face, or a sphere resting
//! exactly on a box or another sphere) do not intersect.

use super::{FloatType, WorldBox, WorldPoint, WorldVector};

/// Purely geometric sphere, without any surface attributes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ball {
    pub center: WorldPoint,
    pub radius: FloatType,
}

impl Ball {
    pub fn new(center: WorldPoint, radius: FloatType) -> Ball {
        Ball { center, radius }
    }

    pub fn bounding_box(&self) -> WorldBox {
        let r_vec = WorldVector::repeat(self.radius);
        WorldBox::new(self.center - r_vec, self.center + r_vec)
    }
}

/// True iff squared center distance is strictly less than the squared sum of radii.
pub fn sphere_intersects_sphere(a: &Ball, b: &Ball) -> bool {
    let min_distance = a.radius + b.radius;
    (a.center - b.center).norm_squared() < min_distance * min_distance
}

/// Closest point test: squared overshoot of the center outside the box on each axis
/// is subtracted from the squared radius, the sphere intersects if anything remains.
pub fn box_intersects_sphere(b: &WorldBox, sphere: &Ball) -> bool {
    let mut remaining = sphere.radius * sphere.radius;
    for axis in 0..3 {
        let c = sphere.center[axis];
        let overshoot = if c < b.min[axis] {
            c - b.min[axis]
        } else if c > b.max[axis] {
            c - b.max[axis]
        } else {
            0.0
        };
        remaining -= overshoot * overshoot;
    }
    remaining > 0.0
}

/// Strict interval overlap on all three axes.
pub fn box_intersects_box(a: &WorldBox, b: &WorldBox) -> bool {
    (0..3).all(|axis| a.max[axis] > b.min[axis] && a.min[axis] < b.max[axis])
}

/// Symmetric overlap test between two shapes.
pub trait Intersects<Rhs = Self> {
    fn intersects(&self, other: &Rhs) -> bool;
}

impl Intersects for Ball {
    fn intersects(&self, other: &Ball) -> bool {
        sphere_intersects_sphere(self, other)
    }
}

impl Intersects<Ball> for WorldBox {
    fn intersects(&self, other: &Ball) -> bool {
        box_intersects_sphere(self, other)
    }
}

impl Intersects<WorldBox> for Ball {
    fn intersects(&self, other: &WorldBox) -> bool {
        box_intersects_sphere(other, self)
    }
}

impl Intersects for WorldBox {
    fn intersects(&self, other: &WorldBox) -> bool {
        box_intersects_box(self, other)
    }
}
