#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A growable binary indexed tree over `f64` weights
//!
//! Supports appending elements, point weight updates, prefix sums and weighted
//! selection, all in O(log n). The main consumer is sequential species sampling,
//! where one element per species is kept and a uniform variate scaled by the
//! total weight picks a species proportionally to its weight.

/// A growable Fenwick (binary indexed) tree over `f64` weights.
///
/// The tree is weight-agnostic: it does not check signs. Selection only makes
/// sense when all weights are non-negative.
///
/// # Example
///
/// ```
/// use fenwick::FenwickTree;
///
/// let mut tree = FenwickTree::new();
/// tree.push(1.0);
/// tree.push(3.0);
/// tree.push(2.0);
/// assert_eq!(tree.total(), 6.0);
/// assert_eq!(tree.select(0.5), 0);
/// assert_eq!(tree.select(2.5), 1);
/// assert_eq!(tree.select(4.5), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FenwickTree {
    // 1-indexed; nodes[0] is unused padding so that the parent/child index
    // arithmetic stays branch-free
    nodes: Vec<f64>,
    total: f64,
}

impl FenwickTree {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 1);
        nodes.push(0.0);
        Self { nodes, total: 0.0 }
    }

    /// Number of elements in the tree
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all element weights
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Append an element with the given weight
    pub fn push(&mut self, weight: f64) {
        let i = self.nodes.len();
        // The new node covers the range (i - lowbit(i), i], all of which except
        // the new element is already stored
        let covered = self.range_sum(i - lowbit(i), i - 1);
        self.nodes.push(covered + weight);
        self.total += weight;
    }

    /// Add `delta` to the weight of element `index`
    ///
    /// # Panics
    ///
    /// If `index >= len`.
    pub fn add(&mut self, index: usize, delta: f64) {
        assert!(index < self.len(), "index {index} out of bounds");
        let mut i = index + 1;
        while i < self.nodes.len() {
            self.nodes[i] += delta;
            i += lowbit(i);
        }
        self.total += delta;
    }

    /// Sum of the weights of elements `0..count`
    pub fn prefix_sum(&self, count: usize) -> f64 {
        debug_assert!(count <= self.len());
        let mut sum = 0.0;
        let mut i = count;
        while i > 0 {
            sum += self.nodes[i];
            i -= lowbit(i);
        }
        sum
    }

    // Sum over the 1-indexed closed range [from + 1, to]
    fn range_sum(&self, from: usize, to: usize) -> f64 {
        self.prefix_sum(to) - self.prefix_sum(from)
    }

    /// The index `i` with `prefix_sum(i) <= x < prefix_sum(i + 1)`
    ///
    /// Callers feed this RNG output scaled by [`total`](Self::total), which can
    /// graze or exceed the total through floating point rounding, so any `x`
    /// beyond the last element clamps to the last index.
    ///
    /// # Panics
    ///
    /// If the tree is empty.
    pub fn select(&self, mut x: f64) -> usize {
        assert!(!self.is_empty(), "select on an empty tree");
        let len = self.len();
        let mut pos = 0;
        let mut step = len.next_power_of_two();
        while step > 0 {
            let next = pos + step;
            if next <= len && self.nodes[next] <= x {
                x -= self.nodes[next];
                pos = next;
            }
            step >>= 1;
        }
        // pos counts elements strictly before the selected one
        pos.min(len - 1)
    }
}

fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    use super::*;

    fn tree_of(weights: &[f64]) -> FenwickTree {
        let mut tree = FenwickTree::with_capacity(weights.len());
        for &w in weights {
            tree.push(w);
        }
        tree
    }

    #[test]
    fn test_empty() {
        let tree = FenwickTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.total(), 0.0);
        assert_eq!(tree.prefix_sum(0), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_select_empty() {
        FenwickTree::new().select(0.0);
    }

    #[test]
    fn test_push_and_prefix_sums() {
        let weights = [2.0, 1.0, 4.0, 0.5, 3.0];
        let tree = tree_of(&weights);

        assert_eq!(tree.len(), weights.len());
        let mut expected = 0.0;
        for i in 0..=weights.len() {
            assert!((tree.prefix_sum(i) - expected).abs() < 1e-12);
            if i < weights.len() {
                expected += weights[i];
            }
        }
        assert!((tree.total() - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_add() {
        let mut tree = tree_of(&[1.0, 1.0, 1.0]);
        tree.add(1, 2.5);
        assert!((tree.prefix_sum(1) - 1.0).abs() < 1e-12);
        assert!((tree.prefix_sum(2) - 4.5).abs() < 1e-12);
        assert!((tree.total() - 5.5).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn test_add_out_of_bounds() {
        tree_of(&[1.0]).add(1, 1.0);
    }

    #[test]
    fn test_select_boundaries() {
        let tree = tree_of(&[1.0, 3.0, 2.0]);
        assert_eq!(tree.select(0.0), 0);
        assert_eq!(tree.select(0.999), 0);
        assert_eq!(tree.select(1.0), 1);
        assert_eq!(tree.select(3.999), 1);
        assert_eq!(tree.select(4.0), 2);
        assert_eq!(tree.select(5.999), 2);
        // Beyond the total clamps to the last element
        assert_eq!(tree.select(6.0), 2);
        assert_eq!(tree.select(100.0), 2);
    }

    #[test]
    fn test_select_skips_zero_weight() {
        let tree = tree_of(&[0.0, 2.0, 0.0, 1.0]);
        assert_eq!(tree.select(0.0), 1);
        assert_eq!(tree.select(1.9), 1);
        assert_eq!(tree.select(2.0), 3);
    }

    #[test]
    fn test_select_matches_linear_scan() {
        let mut rng = SmallRng::seed_from_u64(42);
        let weights: Vec<f64> = (0..257).map(|_| rng.random::<f64>() * 10.0).collect();
        let tree = tree_of(&weights);

        for _ in 0..1000 {
            let x: f64 = rng.random::<f64>() * tree.total();
            let chosen = tree.select(x);

            let mut cum = 0.0;
            let mut expected = weights.len() - 1;
            for (i, &w) in weights.iter().enumerate() {
                cum += w;
                if x < cum {
                    expected = i;
                    break;
                }
            }
            assert_eq!(chosen, expected, "x = {x}");
        }
    }

    #[test]
    fn test_incremental_updates_match_rebuild() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut weights = vec![1.0; 64];
        let mut tree = tree_of(&weights);

        for _ in 0..500 {
            let i = rng.random_range(0..weights.len());
            let delta: f64 = rng.random::<f64>();
            weights[i] += delta;
            tree.add(i, delta);
        }

        let rebuilt = tree_of(&weights);
        for i in 0..=weights.len() {
            assert!((tree.prefix_sum(i) - rebuilt.prefix_sum(i)).abs() < 1e-9);
        }
    }
}
