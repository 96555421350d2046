use std::ops::{Index, IndexMut};

use super::{FloatType, WorldBox, WorldPoint, WorldVector};

/// Three corners of a triangle.
/// Used both with vertex positions and with indices into a shared vertex array.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle<Point>([Point; 3]);

impl<Point> Triangle<Point> {
    pub fn new(a: Point, b: Point, c: Point) -> Triangle<Point> {
        Triangle([a, b, c])
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Point> {
        self.0.iter()
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> Triangle<Point2> {
        Triangle([f(&self[0]), f(&self[1]), f(&self[2])])
    }
}

impl<Point> Index<usize> for Triangle<Point> {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<Point> IndexMut<usize> for Triangle<Point> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl Triangle<usize> {
    /// Resolves vertex indices to positions.
    /// Panics if any of the indices is out of range.
    pub fn resolve(&self, vertices: &[WorldPoint]) -> Triangle<WorldPoint> {
        self.map(|&i| vertices[i])
    }
}

impl Triangle<WorldPoint> {
    /// Component-wise min/max over the three corners.
    /// Degenerate triangles give boxes with zero extent on some axes.
    pub fn bounding_box(&self) -> WorldBox {
        WorldBox::new(
            self[0].inf(&self[1]).inf(&self[2]),
            self[0].sup(&self[1]).sup(&self[2]),
        )
    }

    /// Returns edge vectors, coming from self[0]
    pub fn edges(&self) -> [WorldVector; 2] {
        [self[1] - self[0], self[2] - self[0]]
    }

    /// Returns a normal vector of the triangle, not normalized.
    pub fn normal(&self) -> WorldVector {
        let [e1, e2] = self.edges();
        e1.cross(&e2)
    }

    /// Triangles with collinear or coincident corners.
    pub fn is_degenerate(&self) -> bool {
        self.normal().norm_squared() == FloatType::default()
    }
}
