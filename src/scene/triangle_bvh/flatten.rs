use crate::scene::gpu::GpuBvhNode;

use super::{NodeIdx, NodeKind, TriangleBvh};

impl TriangleBvh {
    /// Serializes the tree in pre-order, see [`GpuBvhNode`] for the layout.
    /// The root is the first record.
    pub fn to_gpu_nodes(&self) -> Vec<GpuBvhNode> {
        let mut out: Vec<GpuBvhNode> = Vec::with_capacity(self.node_count());

        // Each entry carries the slot of the parent record that must point at it, if any.
        let mut stack: Vec<(NodeIdx, Option<usize>)> = vec![(self.root(), None)];

        while let Some((idx, parent_slot)) = stack.pop() {
            let position = out.len();
            if let Some(slot) = parent_slot {
                out[slot].child_or_triangle_index = position as u32;
            }

            let node = self.node(idx);
            let (child_or_triangle_index, is_leaf) = match node.kind {
                NodeKind::Leaf { triangle } => (triangle.raw(), 1),
                NodeKind::Inner { children: [left, right] } => {
                    // Left child is popped first and lands right after this record
                    stack.push((right, Some(position)));
                    stack.push((left, None));
                    (u32::MAX, 0)
                }
            };

            out.push(GpuBvhNode {
                min: node.bounds.min.into(),
                max: node.bounds.max.into(),
                child_or_triangle_index,
                is_leaf,
            });
        }

        out
    }
}
