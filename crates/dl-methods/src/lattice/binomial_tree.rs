//! Recombining binomial tree (node indexing).
//!
//! The tree has `N + 1` time layers, layer `t` holding `t + 1` nodes. Node
//! `(t, k)` is the state after `k` up moves and `t − k` down moves, so its
//! price is `S₀ · u^k · d^(t−k)`. Because `d = 1/u` this equals
//! `S₀ · exp((2k − t) · σ√Δt)`, which is how it is evaluated: every price
//! comes straight from its indices, shared sub-paths are never replayed, and
//! a node on the centre line (`2k = t`) reproduces the spot exactly.

use super::parameters::LatticeParameters;
use dl_core::{Price, Real, Size};
use std::iter::FusedIterator;

/// A lattice node with its price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Time layer `t`.
    pub time_index: Size,
    /// Number of up moves `k ≤ t`.
    pub up_count: Size,
    /// Underlying price at the node.
    pub price: Price,
}

/// Cox-Ross-Rubinstein tree over a calibrated lattice.
#[derive(Debug, Clone, Copy)]
pub struct BinomialTree {
    spot: Price,
    params: LatticeParameters,
}

impl BinomialTree {
    /// Build the tree rooted at `spot`.
    pub fn new(spot: Price, params: LatticeParameters) -> Self {
        Self { spot, params }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.params.step_count()
    }

    /// Initial underlying value.
    pub fn spot(&self) -> Price {
        self.spot
    }

    /// The calibration this tree was built from.
    pub fn parameters(&self) -> &LatticeParameters {
        &self.params
    }

    /// Number of nodes at time step `t` (always `t + 1`).
    pub fn size(&self, t: Size) -> Size {
        t + 1
    }

    /// Underlying price at node `(t, k)`.
    pub fn underlying(&self, t: Size, k: Size) -> Price {
        debug_assert!(k <= t, "up count {k} exceeds time index {t}");
        debug_assert!(t <= self.steps(), "time index {t} beyond maturity");
        let net_moves = 2.0 * k as Real - t as Real;
        self.spot * (net_moves * self.params.log_step()).exp()
    }

    /// Node `(t, k)` with its price.
    pub fn node(&self, t: Size, k: Size) -> Node {
        Node {
            time_index: t,
            up_count: k,
            price: self.underlying(t, k),
        }
    }

    /// Lazily enumerate the nodes of layer `t`, lowest price first.
    pub fn layer(&self, t: Size) -> LayerNodes<'_> {
        LayerNodes {
            tree: self,
            time_index: t,
            next: 0,
        }
    }

    /// Prices of the nodes at maturity, lowest first.
    pub fn terminal_prices(&self) -> Vec<Price> {
        self.layer(self.steps()).map(|n| n.price).collect()
    }
}

/// Iterator over the nodes of one layer, see [`BinomialTree::layer`].
#[derive(Debug, Clone)]
pub struct LayerNodes<'a> {
    tree: &'a BinomialTree,
    time_index: Size,
    next: Size,
}

impl Iterator for LayerNodes<'_> {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        if self.next > self.time_index {
            return None;
        }
        let node = self.tree.node(self.time_index, self.next);
        self.next += 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.time_index + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LayerNodes<'_> {}

impl FusedIterator for LayerNodes<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn tree(steps: Size) -> BinomialTree {
        let params = LatticeParameters::calibrate(100.0, 0.2, 0.05, 1.0, steps).unwrap();
        BinomialTree::new(100.0, params)
    }

    #[test]
    fn root_and_first_layer() {
        let t = tree(4);
        let p = *t.parameters();
        assert_eq!(t.underlying(0, 0), 100.0);
        assert_relative_eq!(t.underlying(1, 1), 100.0 * p.up_factor(), max_relative = 1e-14);
        assert_relative_eq!(t.underlying(1, 0), 100.0 * p.down_factor(), max_relative = 1e-14);
    }

    #[test]
    fn matches_power_expression() {
        let t = tree(50);
        let p = *t.parameters();
        for k in 0..=37 {
            let expected =
                100.0 * p.up_factor().powi(k as i32) * p.down_factor().powi(37 - k as i32);
            assert_relative_eq!(t.underlying(37, k), expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn centre_line_reproduces_spot_exactly() {
        let t = tree(500);
        for step in (0..=500).step_by(2) {
            assert_eq!(t.underlying(step, step / 2), 100.0);
        }
    }

    #[test]
    fn layer_iterator_is_ordered_and_sized() {
        let t = tree(10);
        let layer: Vec<Node> = t.layer(6).collect();
        assert_eq!(layer.len(), t.size(6));
        assert_eq!(t.layer(6).len(), 7);
        assert!(layer.windows(2).all(|w| w[0].price < w[1].price));
        assert!(layer
            .iter()
            .enumerate()
            .all(|(k, n)| n.up_count == k && n.time_index == 6));
        assert_eq!(t.terminal_prices().len(), 11);
    }

    proptest! {
        #[test]
        fn recombination(t in 0usize..398, k_seed in 0usize..1_000) {
            let tr = tree(400);
            let k = k_seed % (t + 1);
            // Identical indices always give the identical price.
            prop_assert_eq!(tr.underlying(t, k), tr.underlying(t, k));
            // Up-then-down and down-then-up land on the same node as doing nothing.
            prop_assert_eq!(tr.underlying(t + 2, k + 1), tr.underlying(t, k));
        }
    }
}
