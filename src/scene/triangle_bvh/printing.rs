use itertools::Itertools as _;
use log::{debug, info, log_enabled};

use crate::util::Stats;

use super::{NodeIdx, NodeKind, TriangleBvh};

/// Summary of the shape of a hierarchy.
#[derive(Clone, Debug, PartialEq)]
pub struct BvhStatistics {
    /// Depth of each leaf, root has depth 1
    pub leaf_depth: Stats,
    pub leaf_count: usize,
    pub inner_count: usize,
    pub root_surface_area: f32,
    /// Sum of surface areas of all inner nodes relative to the root's
    pub relative_inner_area: f32,
}

impl TriangleBvh {
    pub fn statistics(&self) -> BvhStatistics {
        let leaf_depth = self.leaf_depths().map(|(_, depth)| depth).collect();
        let root_surface_area = self.bounding_box().surface_area();
        let inner_area: f32 = self
            .nodes()
            .iter()
            .filter(|n| !n.is_leaf())
            .map(|n| n.bounds.surface_area())
            .sum();

        BvhStatistics {
            leaf_depth,
            leaf_count: self.triangle_count(),
            inner_count: self.inner_node_count(),
            root_surface_area,
            relative_inner_area: if root_surface_area > 0.0 {
                inner_area / root_surface_area
            } else {
                0.0
            },
        }
    }

    pub fn log_statistics(&self) {
        let stats = self.statistics();
        info!(
            "BVH: {} leaves, {} inner nodes",
            stats.leaf_count, stats.inner_count
        );
        info!("Leaf depth: {}", stats.leaf_depth);
        info!(
            "Root surface area: {:.1}, inner nodes relative area: {:.2}",
            stats.root_surface_area, stats.relative_inner_area
        );
    }

    /// Dumps the whole tree at debug level.
    pub fn log_tree(&self) {
        if log_enabled!(log::Level::Debug) {
            debug!("BVH tree:\n{}", self.tree_lines());
        }
    }

    /// One line per node in pre-order, indented by depth.
    fn tree_lines(&self) -> String {
        self.pre_order()
            .map(|(idx, depth)| {
                let node = self.node(idx);
                let label = match node.kind {
                    NodeKind::Leaf { triangle } => format!("L{}", triangle.index()),
                    NodeKind::Inner { .. } => format!("I{}", idx.index()),
                };
                format!(
                    "{}- {}: {:?}-{:?}",
                    "  ".repeat(depth - 1),
                    label,
                    node.bounds.min,
                    node.bounds.max,
                )
            })
            .join("\n")
    }

    /// Nodes with their depth, parents before children, left subtree first.
    fn pre_order(&self) -> impl Iterator<Item = (NodeIdx, usize)> + '_ {
        let mut stack = vec![(self.root(), 1usize)];
        std::iter::from_fn(move || {
            let (idx, depth) = stack.pop()?;
            if let NodeKind::Inner { children: [left, right] } = self.node(idx).kind {
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
            Some((idx, depth))
        })
    }

    fn leaf_depths(&self) -> impl Iterator<Item = (NodeIdx, usize)> + '_ {
        self.pre_order().filter(|&(idx, _)| self.node(idx).is_leaf())
    }
}
