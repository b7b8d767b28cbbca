//! Lattice engine settings.
//!
//! [`LatticeSettings`] bounds the work a single valuation may perform and
//! decides when a lattice layer is wide enough to be processed in parallel.
//! Settings are plain values handed to each engine; nothing here is
//! process-wide.

use crate::errors::{Error, Result};

/// Default upper bound on the number of time steps.
pub const DEFAULT_MAX_STEPS: usize = 20_000;

/// Default layer width from which layers are processed in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2_048;

/// Resource limits and execution policy for lattice valuations.
///
/// ```
/// use dl_core::LatticeSettings;
/// let settings = LatticeSettings::default()
///     .with_max_steps(5_000)
///     .with_parallel_threshold(512);
/// assert!(settings.validate().is_ok());
/// assert!(settings.check_step_count(4_000).is_ok());
/// assert!(settings.check_step_count(6_000).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct LatticeSettings {
    /// Largest admissible step count.
    pub max_steps: usize,
    /// Layers with at least this many nodes are processed with rayon.
    pub parallel_threshold: usize,
}

impl Default for LatticeSettings {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl LatticeSettings {
    /// Replace the step budget.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Replace the parallel layer threshold.
    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    /// Settings that never parallelise a layer.
    pub fn sequential() -> Self {
        Self::default().with_parallel_threshold(usize::MAX)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(Error::Config("max_steps must be at least 1".into()));
        }
        if self.parallel_threshold == 0 {
            return Err(Error::Config(
                "parallel_threshold must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Fail fast with [`Error::StepCountTooLarge`] when `steps` exceeds the budget.
    pub fn check_step_count(&self, steps: usize) -> Result<()> {
        if steps > self.max_steps {
            return Err(Error::StepCountTooLarge {
                requested: steps,
                limit: self.max_steps,
            });
        }
        Ok(())
    }

    /// Whether a layer of `width` nodes should be processed in parallel.
    pub fn is_parallel(&self, width: usize) -> bool {
        width >= self.parallel_threshold
    }
}
