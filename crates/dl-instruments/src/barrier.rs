//! Barrier terms.
//!
//! A barrier is a level, the side it is approached from, and what touching
//! it does to the contract.

use dl_core::{ensure_contract, Error, Real, Result};
use std::fmt;

/// Side from which the barrier is approached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarrierDirection {
    /// Breached when the underlying falls to or below the level.
    Down,
    /// Breached when the underlying rises to or above the level.
    Up,
}

/// Effect of a breach on the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarrierActivation {
    /// The contract only pays if the barrier was breached.
    KnockIn,
    /// The contract pays nothing once the barrier was breached.
    KnockOut,
}

impl BarrierActivation {
    /// Combine the unconditional payoff with the breach outcome.
    ///
    /// | activation | breached | result |
    /// |---|---|---|
    /// | KnockOut | true  | 0 |
    /// | KnockOut | false | `raw` |
    /// | KnockIn  | true  | `raw` |
    /// | KnockIn  | false | 0 |
    pub fn apply(self, breached: bool, raw: Real) -> Real {
        match (self, breached) {
            (BarrierActivation::KnockOut, true) | (BarrierActivation::KnockIn, false) => 0.0,
            (BarrierActivation::KnockOut, false) | (BarrierActivation::KnockIn, true) => raw,
        }
    }

    /// The activation paying on exactly the complementary set of outcomes.
    pub fn complement(self) -> Self {
        match self {
            BarrierActivation::KnockIn => BarrierActivation::KnockOut,
            BarrierActivation::KnockOut => BarrierActivation::KnockIn,
        }
    }
}

/// A single barrier: level, direction, activation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierSpec {
    /// Barrier level (> 0).
    pub level: Real,
    /// Side from which the level is approached.
    pub direction: BarrierDirection,
    /// What a breach does to the contract.
    pub activation: BarrierActivation,
}

impl BarrierSpec {
    /// Create a barrier, validating the level.
    pub fn new(
        level: Real,
        direction: BarrierDirection,
        activation: BarrierActivation,
    ) -> Result<Self> {
        ensure_contract!(
            level.is_finite() && level > 0.0,
            "barrier_level",
            level,
            "finite and > 0"
        );
        Ok(Self {
            level,
            direction,
            activation,
        })
    }

    /// Parse a label such as `"down-out"` or `"up_in"` together with a level.
    pub fn parse(label: &str, level: Real) -> Result<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        let (direction, activation) = match normalized.as_str() {
            "down-in" => (BarrierDirection::Down, BarrierActivation::KnockIn),
            "down-out" => (BarrierDirection::Down, BarrierActivation::KnockOut),
            "up-in" => (BarrierDirection::Up, BarrierActivation::KnockIn),
            "up-out" => (BarrierDirection::Up, BarrierActivation::KnockOut),
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "unknown barrier type '{label}', expected one of \
                     down-in, down-out, up-in, up-out"
                )))
            }
        };
        Self::new(level, direction, activation)
    }

    /// Whether a single observed price lies on the breached side of the level.
    pub fn is_touched(&self, price: Real) -> bool {
        match self.direction {
            BarrierDirection::Down => price <= self.level,
            BarrierDirection::Up => price >= self.level,
        }
    }

    /// Whether a node whose reaching paths have running extremes
    /// `path_low` / `path_high` counts as breached.
    ///
    /// A down barrier looks at the lowest minimum of any path to the node,
    /// an up barrier at the highest maximum.
    pub fn is_breached(&self, path_low: Real, path_high: Real) -> bool {
        match self.direction {
            BarrierDirection::Down => self.is_touched(path_low),
            BarrierDirection::Up => self.is_touched(path_high),
        }
    }

    /// The same barrier with the opposite activation.
    pub fn complement(&self) -> Self {
        Self {
            activation: self.activation.complement(),
            ..*self
        }
    }
}

impl fmt::Display for BarrierSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.direction {
            BarrierDirection::Down => "down",
            BarrierDirection::Up => "up",
        };
        let effect = match self.activation {
            BarrierActivation::KnockIn => "in",
            BarrierActivation::KnockOut => "out",
        };
        write!(f, "{side}-{effect} @ {}", self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_table() {
        use BarrierActivation::*;
        assert_eq!(KnockOut.apply(true, 10.0), 0.0);
        assert_eq!(KnockOut.apply(false, 10.0), 10.0);
        assert_eq!(KnockIn.apply(true, 10.0), 10.0);
        assert_eq!(KnockIn.apply(false, 10.0), 0.0);
    }

    #[test]
    fn breach_is_inclusive_at_level() {
        let down = BarrierSpec::parse("down-out", 90.0).unwrap();
        assert!(down.is_breached(90.0, 120.0));
        assert!(!down.is_breached(90.000_001, 120.0));

        let up = BarrierSpec::parse("up-in", 110.0).unwrap();
        assert!(up.is_breached(80.0, 110.0));
        assert!(!up.is_breached(80.0, 109.999));
    }

    #[test]
    fn parse_labels() {
        let b = BarrierSpec::parse("UP_OUT", 120.0).unwrap();
        assert_eq!(b.direction, BarrierDirection::Up);
        assert_eq!(b.activation, BarrierActivation::KnockOut);
        assert_eq!(b.to_string(), "up-out @ 120");
        assert!(matches!(
            BarrierSpec::parse("sideways", 1.0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn level_must_be_positive() {
        assert!(matches!(
            BarrierSpec::new(0.0, BarrierDirection::Down, BarrierActivation::KnockIn),
            Err(Error::InvalidContract {
                field: "barrier_level",
                ..
            })
        ));
        assert!(BarrierSpec::new(Real::NAN, BarrierDirection::Up, BarrierActivation::KnockIn).is_err());
    }

    #[test]
    fn complement_flips_activation_only() {
        let b = BarrierSpec::parse("down-in", 95.0).unwrap();
        let c = b.complement();
        assert_eq!(c.activation, BarrierActivation::KnockOut);
        assert_eq!(c.direction, b.direction);
        assert_eq!(c.level, b.level);
    }
}
