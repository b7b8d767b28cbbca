//! Running-extreme aggregation for barrier conditions.
//!
//! Whether a path touched a barrier depends on its shape, not only on its
//! endpoint. Rather than enumerating the `2^N` paths into each terminal
//! node, the tree is swept forward once, keeping two aggregates per node:
//!
//! * `low(t, k)`: the smallest running minimum over all paths to `(t, k)`;
//! * `high(t, k)`: the largest running maximum over all paths to `(t, k)`.
//!
//! Both follow from the node's parents and its own price,
//!
//! ```text
//! low(t, k)  = min(S(t, k), low(t−1, k−1), low(t−1, k))
//! high(t, k) = max(S(t, k), high(t−1, k−1), high(t−1, k))
//! ```
//!
//! with missing parents skipped and `low(0, 0) = high(0, 0) = S₀`. The sweep
//! costs O(N²) time and keeps two layers alive, O(N) memory. A down barrier
//! is breached at a terminal node when `low ≤ level`, an up barrier when
//! `high ≥ level`.

use super::binomial_tree::BinomialTree;
use dl_core::{LatticeSettings, Price, Size};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Running extremes of the terminal layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExtremes {
    lows: Vec<Price>,
    highs: Vec<Price>,
}

impl PathExtremes {
    /// Sweep `tree` forward and collect the extremes at maturity.
    ///
    /// Layers at least `settings.parallel_threshold` wide are filled in
    /// parallel; every node only reads the finished previous layer, so the
    /// result does not depend on the execution mode.
    pub fn terminal(tree: &BinomialTree, settings: &LatticeSettings) -> Self {
        let steps = tree.steps();
        let mut lows = Vec::with_capacity(steps + 1);
        let mut highs = Vec::with_capacity(steps + 1);
        let mut next_lows = Vec::with_capacity(steps + 1);
        let mut next_highs = Vec::with_capacity(steps + 1);
        lows.push(tree.spot());
        highs.push(tree.spot());

        let mut parallel_layers = 0usize;
        for t in 1..=steps {
            let width = tree.size(t);
            next_lows.clear();
            next_lows.resize(width, 0.0);
            next_highs.clear();
            next_highs.resize(width, 0.0);

            let (prev_lows, prev_highs) = (&lows, &highs);
            let fill = |k: Size, low: &mut Price, high: &mut Price| {
                (*low, *high) = extend(prev_lows, prev_highs, t, k, tree.underlying(t, k));
            };

            let parallel = settings.is_parallel(width);
            trace!(t, width, parallel, "extremes layer");
            if parallel {
                parallel_layers += 1;
                next_lows
                    .par_iter_mut()
                    .zip(next_highs.par_iter_mut())
                    .enumerate()
                    .for_each(|(k, (low, high))| fill(k, low, high));
            } else {
                next_lows
                    .iter_mut()
                    .zip(next_highs.iter_mut())
                    .enumerate()
                    .for_each(|(k, (low, high))| fill(k, low, high));
            }

            std::mem::swap(&mut lows, &mut next_lows);
            std::mem::swap(&mut highs, &mut next_highs);
        }

        debug!(steps, parallel_layers, "path extremes swept");
        Self { lows, highs }
    }

    /// Number of terminal nodes.
    pub fn len(&self) -> Size {
        self.lows.len()
    }

    /// Always false: a tree has at least one terminal node.
    pub fn is_empty(&self) -> bool {
        self.lows.is_empty()
    }

    /// Smallest running minimum over all paths into terminal node `k`.
    pub fn low(&self, k: Size) -> Price {
        self.lows[k]
    }

    /// Largest running maximum over all paths into terminal node `k`.
    pub fn high(&self, k: Size) -> Price {
        self.highs[k]
    }

    /// All terminal lows, indexed by up count.
    pub fn lows(&self) -> &[Price] {
        &self.lows
    }

    /// All terminal highs, indexed by up count.
    pub fn highs(&self) -> &[Price] {
        &self.highs
    }
}

/// Aggregates of node `(t, k)` from its parents in layer `t − 1`.
fn extend(
    prev_lows: &[Price],
    prev_highs: &[Price],
    t: Size,
    k: Size,
    price: Price,
) -> (Price, Price) {
    let mut low = price;
    let mut high = price;
    // parent reached by an up move
    if k >= 1 {
        low = low.min(prev_lows[k - 1]);
        high = high.max(prev_highs[k - 1]);
    }
    // parent reached by a down move
    if k < t {
        low = low.min(prev_lows[k]);
        high = high.max(prev_highs[k]);
    }
    (low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::LatticeParameters;

    fn tree(steps: Size) -> BinomialTree {
        let params = LatticeParameters::calibrate(100.0, 0.2, 0.05, 1.0, steps).unwrap();
        BinomialTree::new(100.0, params)
    }

    /// Exhaustive path enumeration, only usable on tiny trees.
    fn brute_force(tree: &BinomialTree) -> (Vec<Price>, Vec<Price>) {
        let n = tree.steps();
        let mut lows = vec![Price::INFINITY; n + 1];
        let mut highs = vec![Price::NEG_INFINITY; n + 1];
        for path in 0u32..(1 << n) {
            let (mut k, mut low, mut high) = (0usize, tree.spot(), tree.spot());
            for t in 1..=n {
                if path & (1 << (t - 1)) != 0 {
                    k += 1;
                }
                let s = tree.underlying(t, k);
                low = low.min(s);
                high = high.max(s);
            }
            lows[k] = lows[k].min(low);
            highs[k] = highs[k].max(high);
        }
        (lows, highs)
    }

    #[test]
    fn agrees_with_path_enumeration() {
        for n in 1..=10 {
            let t = tree(n);
            let extremes = PathExtremes::terminal(&t, &LatticeSettings::sequential());
            let (lows, highs) = brute_force(&t);
            assert_eq!(extremes.lows(), &lows[..], "lows, n={n}");
            assert_eq!(extremes.highs(), &highs[..], "highs, n={n}");
        }
    }

    #[test]
    fn single_step_extremes() {
        let t = tree(1);
        let e = PathExtremes::terminal(&t, &LatticeSettings::default());
        assert_eq!(e.len(), 2);
        assert_eq!(e.high(0), 100.0);
        assert_eq!(e.low(1), 100.0);
        assert!(e.low(0) < 100.0);
        assert!(e.high(1) > 100.0);
    }

    #[test]
    fn extremes_reach_the_deepest_excursion() {
        // The lowest path into (N, k) first falls N − k times.
        let t = tree(40);
        let e = PathExtremes::terminal(&t, &LatticeSettings::sequential());
        for k in 0..=40 {
            assert_eq!(e.low(k), t.underlying(40 - k, 0).min(100.0));
            assert_eq!(e.high(k), t.underlying(k, k).max(100.0));
        }
    }

    #[test]
    fn parallel_sweep_is_identical() {
        let t = tree(300);
        let sequential = PathExtremes::terminal(&t, &LatticeSettings::sequential());
        let parallel = PathExtremes::terminal(
            &t,
            &LatticeSettings::default().with_parallel_threshold(16),
        );
        assert_eq!(sequential, parallel);
    }
}
