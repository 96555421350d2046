use std::num::NonZeroUsize;

use itertools::Itertools as _;
use ordered_float::OrderedFloat;

use crate::geometry::WorldBox;

/// Chooses which two items of the active set get merged next.
pub trait MergeStrategy {
    /// Returns positions `(i, j)` with `i < j < active.len()`.
    /// Only called with at least two active items.
    fn pick_next_pair(&mut self, active: &[WorldBox]) -> (usize, usize);
}

/// Cost of merging two items, surface area of the merged box.
fn merge_cost(a: &WorldBox, b: &WorldBox) -> OrderedFloat<f32> {
    OrderedFloat(a.union(b).surface_area())
}

/// Scans all pairs and picks the one with the smallest merged surface area,
/// ties go to the lowest `i`, then the lowest `j`.
/// O(n^2) per merge.
#[derive(Copy, Clone, Debug, Default)]
pub struct ExhaustiveMerge;

impl MergeStrategy for ExhaustiveMerge {
    fn pick_next_pair(&mut self, active: &[WorldBox]) -> (usize, usize) {
        // tuple_combinations goes in lexicographic order and min_by_key keeps the first minimum
        (0..active.len())
            .tuple_combinations()
            .min_by_key(|&(i, j)| merge_cost(&active[i], &active[j]))
            .unwrap_or((0, 1))
    }
}

/// Same cost and tie breaking as [`ExhaustiveMerge`], but only items that are close to
/// each other along the longest axis of the active set are considered as pairs.
/// O(n * (log n + window)) per merge, at the price of possibly worse trees.
#[derive(Copy, Clone, Debug)]
pub struct AxisWindowMerge {
    window: NonZeroUsize,
}

impl AxisWindowMerge {
    pub fn new(window: NonZeroUsize) -> Self {
        AxisWindowMerge { window }
    }
}

impl Default for AxisWindowMerge {
    fn default() -> Self {
        AxisWindowMerge::new(NonZeroUsize::new(16).unwrap_or(NonZeroUsize::MIN))
    }
}

impl MergeStrategy for AxisWindowMerge {
    fn pick_next_pair(&mut self, active: &[WorldBox]) -> (usize, usize) {
        let centers = active.iter().map(WorldBox::center).collect_vec();
        let axis = WorldBox::from_points(&centers)
            .map(|b| b.longest_axis())
            .unwrap_or_default();

        let mut order = (0..active.len()).collect_vec();
        order.sort_by_key(|&i| (OrderedFloat(centers[i][axis]), i));

        let window = self.window.get();
        order
            .iter()
            .enumerate()
            .flat_map(|(rank, &a)| {
                order[rank + 1..]
                    .iter()
                    .take(window)
                    .map(move |&b| (a.min(b), a.max(b)))
            })
            .min_by_key(|&(i, j)| (merge_cost(&active[i], &active[j]), i, j))
            .unwrap_or((0, 1))
    }
}
