mod building;
mod flatten;
mod printing;
mod strategy;

use index_vec::IndexVec;

use crate::geometry::WorldBox;

pub use printing::BvhStatistics;
pub use strategy::{AxisWindowMerge, ExhaustiveMerge, MergeStrategy};

/// Binary bounding volume hierarchy over a triangle soup.
///
/// Nodes live in a single arena and refer to their children by index only.
/// Leaves take the first `triangle_count` slots, in triangle order, inner nodes
/// follow in the order they were merged, so the root is always the last node.
#[derive(Clone, Debug)]
pub struct TriangleBvh {
    nodes: IndexVec<NodeIdx, Node>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// For inner nodes this is exactly the union of the children's bounds.
    pub bounds: WorldBox,
    pub kind: NodeKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Leaf { triangle: TriangleIdx },
    Inner { children: [NodeIdx; 2] },
}

index_vec::define_index_type! {
    pub struct NodeIdx = u32;
    IMPL_RAW_CONVERSIONS = true;
}

index_vec::define_index_type! {
    /// Index of a triangle, the triangle's vertex indices are at `3 * index .. 3 * index + 3`
    /// in the index array the hierarchy was built from.
    pub struct TriangleIdx = u32;
    IMPL_RAW_CONVERSIONS = true;
}

impl TriangleBvh {
    pub fn root(&self) -> NodeIdx {
        self.nodes.last_idx()
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &IndexVec<NodeIdx, Node> {
        &self.nodes
    }

    pub fn bounding_box(&self) -> &WorldBox {
        &self.nodes[self.root()].bounds
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// A strict binary tree over k leaves has k - 1 inner nodes.
    pub fn triangle_count(&self) -> usize {
        self.nodes.len().div_ceil(2)
    }

    pub fn inner_node_count(&self) -> usize {
        self.nodes.len() - self.triangle_count()
    }
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }
}
