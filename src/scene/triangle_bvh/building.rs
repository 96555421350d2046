use assert2::assert;
use index_vec::IndexVec;
use log::{debug, trace};

use crate::{
    geometry::{WorldBox, WorldPoint},
    scene::mesh::{MeshError, index_triangles, validate_triangles},
};

use super::{ExhaustiveMerge, MergeStrategy, Node, NodeIdx, NodeKind, TriangleBvh};

impl TriangleBvh {
    /// Builds the hierarchy by repeatedly merging the pair of items whose merged box
    /// has the smallest surface area.
    ///
    /// Returns `Ok(None)` if there are no triangles.
    pub fn build(vertices: &[WorldPoint], indices: &[u32]) -> Result<Option<TriangleBvh>, MeshError> {
        Self::build_with(vertices, indices, &mut ExhaustiveMerge)
    }

    /// Like [`TriangleBvh::build`], with a custom rule for picking the next pair to merge.
    pub fn build_with(
        vertices: &[WorldPoint],
        indices: &[u32],
        strategy: &mut impl MergeStrategy,
    ) -> Result<Option<TriangleBvh>, MeshError> {
        validate_triangles(vertices, indices)?;

        let triangles: Vec<_> = index_triangles(indices)
            .map(|t| t.resolve(vertices))
            .collect();
        if triangles.is_empty() {
            return Ok(None);
        }

        let degenerate = triangles.iter().filter(|t| t.is_degenerate()).count();
        if degenerate > 0 {
            debug!("{degenerate} of {} triangles are degenerate", triangles.len());
        }

        let mut nodes: IndexVec<NodeIdx, Node> = triangles
            .iter()
            .enumerate()
            .map(|(i, t)| Node {
                bounds: t.bounding_box(),
                kind: NodeKind::Leaf {
                    triangle: i.into(),
                },
            })
            .collect();

        // Active items and their bounds, kept in the same order.
        let mut active: Vec<NodeIdx> = nodes.indices().collect();
        let mut active_bounds: Vec<WorldBox> = nodes.iter().map(|n| n.bounds).collect();

        while active.len() > 1 {
            let (i, j) = strategy.pick_next_pair(&active_bounds);
            assert!(i < j && j < active.len(), "invalid pair ({i}, {j})");

            // Removing j first keeps position i valid
            let right = active.remove(j);
            let right_bounds = active_bounds.remove(j);
            let left = active.remove(i);
            let left_bounds = active_bounds.remove(i);

            let bounds = left_bounds.union(&right_bounds);
            let merged = nodes.push(Node {
                bounds,
                kind: NodeKind::Inner {
                    children: [left, right],
                },
            });
            trace!("Merged {left:?} and {right:?} into {merged:?}");

            active.push(merged);
            active_bounds.push(bounds);
        }

        debug!(
            "Built BVH over {} triangles with {} nodes",
            triangles.len(),
            nodes.len()
        );

        Ok(Some(TriangleBvh { nodes }))
    }
}
