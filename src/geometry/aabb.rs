use std::ops::{Add, Sub};

use nalgebra::{ClosedAddAssign, ClosedDivAssign, Point, Scalar};
use num_traits::One;

use super::{FloatType, WorldBox, WorldPoint};

/// Axis aligned box.
/// Boxes are never grown in place, all combining operations return a new box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AABB<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> AABB<Point> {
    pub fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }

    pub fn with_size<S>(min: Point, size: &S) -> AABB<Point>
    where
        for<'a> &'a Point: Add<&'a S, Output = Point>,
    {
        let max = &min + size;
        AABB { min, max }
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> AABB<Point2> {
        AABB {
            min: f(&self.min),
            max: f(&self.max),
        }
    }
}

impl<Point: Sub + Copy> AABB<Point> {
    pub fn size(&self) -> Point::Output {
        self.max - self.min
    }
}

impl<T: Scalar + ClosedAddAssign + ClosedDivAssign + One, const D: usize> AABB<Point<T, D>> {
    pub fn center(&self) -> Point<T, D> {
        let two = T::one() + T::one();
        let avg_coords = (&self.min.coords + &self.max.coords) / two;
        Point::from(avg_coords)
    }
}

impl WorldBox {
    /// Smallest box containing all the points, None if the iterator is empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a WorldPoint>) -> Option<WorldBox> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(WorldBox::new(*first, *first), |acc, p| {
            WorldBox::new(acc.min.inf(p), acc.max.sup(p))
        }))
    }

    /// Component-wise min of minima and max of maxima.
    /// Exact in floating point, so the result is always tight.
    pub fn union(&self, other: &WorldBox) -> WorldBox {
        WorldBox::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Surface area of the box, zero for boxes with no extent on two axes.
    /// Extents of inverted boxes are clamped to zero, so this never goes negative.
    /// Extents overflowing to infinity are clamped to the largest finite value,
    /// huge boxes give an infinite area, never NaN.
    pub fn surface_area(&self) -> FloatType {
        let size = self.size().map(|x| x.clamp(0.0, FloatType::MAX));
        2.0 * (size.x * size.y + size.x * size.z + size.y * size.z)
    }

    /// If the box is valid (min <= max on every axis)
    pub fn is_valid(&self) -> bool {
        self.min.iter().zip(self.max.iter()).all(|(min, max)| min <= max)
    }

    /// Index of the axis with the largest extent.
    pub fn longest_axis(&self) -> usize {
        self.size().imax()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{WorldVector, test::WorldBoxWrapper};

    use assert2::{assert, let_assert};
    use test_strategy::proptest;

    fn unit_box() -> WorldBox {
        WorldBox::with_size(WorldPoint::origin(), &WorldVector::repeat(1.0))
    }

    #[test]
    fn surface_area_of_cuboid() {
        let b = WorldBox::new(WorldPoint::new(0.0, 0.0, 0.0), WorldPoint::new(1.0, 2.0, 3.0));
        assert!(b.surface_area() == 2.0 * (2.0 + 3.0 + 6.0));
    }

    #[test]
    fn surface_area_of_flat_box() {
        let b = WorldBox::new(WorldPoint::new(0.0, 0.0, 0.0), WorldPoint::new(2.0, 3.0, 0.0));
        assert!(b.surface_area() == 12.0);
    }

    #[test]
    fn surface_area_of_point_box_is_zero() {
        let p = WorldPoint::new(1.0, -2.0, 3.0);
        let b = WorldBox::new(p, p);
        assert!(b.surface_area() == 0.0);
        assert!(b.is_valid());
    }

    #[test]
    fn surface_area_of_overflowing_flat_box() {
        let b = WorldBox::new(WorldPoint::new(-3e38, 0.0, 0.0), WorldPoint::new(3e38, 1.0, 0.0));
        let area = b.surface_area();
        assert!(!area.is_nan());
        assert!(area == FloatType::INFINITY);
    }

    #[test]
    fn inverted_box_is_invalid() {
        let b = WorldBox::new(WorldPoint::new(1.0, 0.0, 0.0), WorldPoint::new(0.0, 1.0, 1.0));
        assert!(!b.is_valid());
        assert!(b.surface_area() >= 0.0);
    }

    #[test]
    fn from_points_empty() {
        assert!(WorldBox::from_points(std::iter::empty()) == None);
    }

    #[test]
    fn from_points_covers_all() {
        let points = [
            WorldPoint::new(1.0, 5.0, -1.0),
            WorldPoint::new(-3.0, 2.0, 0.0),
            WorldPoint::new(0.0, 0.0, 4.0),
        ];
        let_assert!(Some(b) = WorldBox::from_points(&points));
        assert!(b.min == WorldPoint::new(-3.0, 0.0, -1.0));
        assert!(b.max == WorldPoint::new(1.0, 5.0, 4.0));
    }

    #[test]
    fn center_and_longest_axis() {
        let b = WorldBox::new(WorldPoint::new(0.0, 0.0, 0.0), WorldPoint::new(2.0, 8.0, 4.0));
        assert!(b.center() == WorldPoint::new(1.0, 4.0, 2.0));
        assert!(b.longest_axis() == 1);
    }

    #[test]
    fn union_with_self_is_identity() {
        let b = unit_box();
        assert!(b.union(&b) == b);
    }

    #[test]
    fn map_converts_corners() {
        let mapped = unit_box().map(|p| <[f32; 3]>::from(*p));
        assert!(mapped.min == [0.0, 0.0, 0.0]);
        assert!(mapped.max == [1.0, 1.0, 1.0]);
    }

    #[proptest]
    fn union_is_commutative(a: WorldBoxWrapper, b: WorldBoxWrapper) {
        assert!(a.union(&b) == b.union(&a));
    }

    #[proptest]
    fn union_is_associative(a: WorldBoxWrapper, b: WorldBoxWrapper, c: WorldBoxWrapper) {
        assert!(a.union(&b).union(&c) == a.union(&b.union(&c)));
    }

    #[proptest]
    fn union_contains_both(a: WorldBoxWrapper, b: WorldBoxWrapper) {
        let u = a.union(&b);
        assert!(u.is_valid());
        for axis in 0..3 {
            assert!(u.min[axis] <= a.min[axis] && u.min[axis] <= b.min[axis]);
            assert!(u.max[axis] >= a.max[axis] && u.max[axis] >= b.max[axis]);
        }
    }

    #[proptest]
    fn union_surface_area_is_monotonic(a: WorldBoxWrapper, b: WorldBoxWrapper) {
        let area = a.union(&b).surface_area();
        assert!(area >= a.surface_area().max(b.surface_area()));
    }

    #[proptest]
    fn surface_area_is_non_negative(a: WorldBoxWrapper) {
        assert!(a.surface_area() >= 0.0);
    }
}
