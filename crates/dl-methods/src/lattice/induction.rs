//! Backward induction over a binomial tree.
//!
//! Starting from the terminal values, each earlier layer is the discounted
//! risk-neutral expectation of the one after it:
//!
//! ```text
//! V(t, k) = discount · (p_up · V(t+1, k+1) + p_down · V(t+1, k))
//! ```
//!
//! A layer is finished before its parent layer starts. Within a layer the
//! nodes are independent, so wide layers are computed with rayon. The
//! expression is evaluated identically in both modes, which makes serial and
//! parallel results bit-for-bit equal.

use super::binomial_tree::BinomialTree;
use dl_core::{LatticeSettings, Price, Real, Size};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Present value together with the node values next to time zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationResult {
    /// Value of the root node.
    pub npv: Real,
    /// Node values at `t = 1`, down node first.
    pub step_one: Option<[Real; 2]>,
    /// Node values at `t = 2`, lowest node first (`N ≥ 2` only).
    pub step_two: Option<[Real; 3]>,
}

/// Roll `terminal` back to time zero.
///
/// # Panics
/// If `terminal` does not hold one value per terminal node.
pub fn roll_back(
    tree: &BinomialTree,
    terminal: Vec<Real>,
    settings: &LatticeSettings,
) -> ValuationResult {
    induct(tree, terminal, settings, None::<fn(Price) -> bool>)
}

/// Roll `terminal` back to time zero, forcing the value of every node whose
/// price satisfies `absorbed` to zero, including terminal nodes and the
/// root.
///
/// This is discretely monitored knock-out: a path is worth nothing from the
/// first lattice date at which it touches the barrier.
pub fn roll_back_absorbing<F>(
    tree: &BinomialTree,
    terminal: Vec<Real>,
    settings: &LatticeSettings,
    absorbed: F,
) -> ValuationResult
where
    F: Fn(Price) -> bool + Sync,
{
    induct(tree, terminal, settings, Some(absorbed))
}

fn induct<F>(
    tree: &BinomialTree,
    mut values: Vec<Real>,
    settings: &LatticeSettings,
    absorbed: Option<F>,
) -> ValuationResult
where
    F: Fn(Price) -> bool + Sync,
{
    let steps = tree.steps();
    assert_eq!(
        values.len(),
        tree.size(steps),
        "expected one terminal value per node"
    );

    let params = tree.parameters();
    let discount = params.step_discount();
    let p_up = params.risk_neutral_probability();
    let p_down = params.down_probability();

    let is_absorbed = |t: Size, k: Size| match &absorbed {
        Some(f) => f(tree.underlying(t, k)),
        None => false,
    };

    for (k, v) in values.iter_mut().enumerate() {
        if is_absorbed(steps, k) {
            *v = 0.0;
        }
    }

    let mut record = Recorder::default();
    record.layer(steps, &values);

    let mut next = Vec::with_capacity(steps + 1);
    let mut parallel_layers = 0usize;
    for t in (0..steps).rev() {
        let width = tree.size(t);
        next.clear();
        next.resize(width, 0.0);

        let children = &values;
        let node_value = |k: Size| -> Real {
            if is_absorbed(t, k) {
                0.0
            } else {
                discount * (p_up * children[k + 1] + p_down * children[k])
            }
        };

        let parallel = settings.is_parallel(width);
        trace!(t, width, parallel, "induction layer");
        if parallel {
            parallel_layers += 1;
            next.par_iter_mut()
                .enumerate()
                .for_each(|(k, v)| *v = node_value(k));
        } else {
            next.iter_mut()
                .enumerate()
                .for_each(|(k, v)| *v = node_value(k));
        }

        std::mem::swap(&mut values, &mut next);
        record.layer(t, &values);
    }

    debug!(steps, parallel_layers, npv = values[0], "backward induction done");

    ValuationResult {
        npv: values[0],
        step_one: record.step_one,
        step_two: record.step_two,
    }
}

#[derive(Default)]
struct Recorder {
    step_one: Option<[Real; 2]>,
    step_two: Option<[Real; 3]>,
}

impl Recorder {
    fn layer(&mut self, t: Size, values: &[Real]) {
        match t {
            1 => self.step_one = Some([values[0], values[1]]),
            2 => self.step_two = Some([values[0], values[1], values[2]]),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::LatticeParameters;
    use approx::assert_relative_eq;

    fn tree(steps: Size) -> BinomialTree {
        let params = LatticeParameters::calibrate(100.0, 0.2, 0.05, 1.0, steps).unwrap();
        BinomialTree::new(100.0, params)
    }

    #[test]
    fn constant_payoff_is_a_zero_coupon_bond() {
        let t = tree(250);
        let v = roll_back(&t, vec![1.0; 251], &LatticeSettings::sequential());
        assert_relative_eq!(v.npv, (-0.05_f64).exp(), max_relative = 1e-10);
    }

    #[test]
    fn discounted_spot_is_a_martingale() {
        let t = tree(200);
        let v = roll_back(&t, t.terminal_prices(), &LatticeSettings::sequential());
        assert_relative_eq!(v.npv, 100.0, max_relative = 1e-10);
    }

    #[test]
    fn one_step_by_hand() {
        let t = tree(1);
        let p = *t.parameters();
        let v = roll_back(&t, vec![0.0, 10.0], &LatticeSettings::sequential());
        let expected = p.step_discount() * p.risk_neutral_probability() * 10.0;
        assert_relative_eq!(v.npv, expected, max_relative = 1e-14);
        assert_eq!(v.step_one, Some([0.0, 10.0]));
        assert_eq!(v.step_two, None);
    }

    #[test]
    fn adjacent_layers_are_recorded() {
        let t = tree(2);
        let v = roll_back(&t, vec![0.0, 0.0, 4.0], &LatticeSettings::sequential());
        assert_eq!(v.step_two, Some([0.0, 0.0, 4.0]));
        let [down, up] = v.step_one.unwrap();
        assert_eq!(down, 0.0);
        assert!(up > 0.0);
    }

    #[test]
    fn parallel_layers_are_bit_identical() {
        let t = tree(400);
        let terminal: Vec<Real> = t
            .terminal_prices()
            .into_iter()
            .map(|s| if s > 100.0 { 1.0 } else { 0.0 })
            .collect();
        let seq = roll_back(&t, terminal.clone(), &LatticeSettings::sequential());
        let par = roll_back(
            &t,
            terminal,
            &LatticeSettings::default().with_parallel_threshold(8),
        );
        assert_eq!(seq, par);
    }

    #[test]
    fn absorbing_root_kills_the_value() {
        let t = tree(10);
        let v = roll_back_absorbing(&t, vec![1.0; 11], &LatticeSettings::sequential(), |s| {
            s <= 100.0
        });
        assert_eq!(v.npv, 0.0);
    }

    #[test]
    fn absorbing_nothing_matches_plain_roll_back() {
        let t = tree(30);
        let terminal = t.terminal_prices();
        let plain = roll_back(&t, terminal.clone(), &LatticeSettings::sequential());
        let absorbing =
            roll_back_absorbing(&t, terminal, &LatticeSettings::sequential(), |_| false);
        assert_eq!(plain, absorbing);
    }

    #[test]
    fn every_layer_emits_a_trace_event() {
        use crate::lattice::PathExtremes;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use tracing::{Event, Level, Subscriber};
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        struct TraceCounter(Arc<AtomicUsize>);

        impl<S: Subscriber> Layer<S> for TraceCounter {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                if *event.metadata().level() == Level::TRACE {
                    self.0.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(TraceCounter(Arc::clone(&count)));
        let t = tree(12);
        let settings = LatticeSettings::sequential();
        tracing::subscriber::with_default(subscriber, || {
            PathExtremes::terminal(&t, &settings);
            roll_back(&t, vec![1.0; 13], &settings);
        });
        assert_eq!(count.load(Ordering::Relaxed), 2 * 12);
    }

    #[test]
    #[should_panic(expected = "one terminal value per node")]
    fn wrong_terminal_width_panics() {
        let t = tree(3);
        roll_back(&t, vec![0.0; 3], &LatticeSettings::sequential());
    }
}
