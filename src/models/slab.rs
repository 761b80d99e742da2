//! Slab and schedule models.
//!
//! This module defines the [`Slab`] rule type and the [`Schedule`] that
//! orders a set of slabs into one party's fee structure.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One charge rule within a schedule.
///
/// Slabs are evaluated independently against the full amount series.
/// Ranges of different slabs may overlap or leave gaps; nothing partitions them.
///
/// # Example
///
/// ```
/// use slab_charges::models::Slab;
/// use rust_decimal::Decimal;
///
/// let slab = Slab::FixedRate {
///     min: Decimal::new(100, 0),
///     max: Decimal::new(1000, 0),
///     rate: Decimal::new(5, 0),
/// };
/// assert!(slab.applies_to(Decimal::new(100, 0)));
/// assert!(slab.applies_to(Decimal::new(1000, 0)));
/// assert!(!slab.applies_to(Decimal::new(1001, 0)));
/// assert_eq!(slab.to_string(), "100-1000=5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slab {
    /// A flat charge per transaction whose amount lies in `[min, max]`.
    FixedRate {
        /// Lower bound, inclusive.
        min: Decimal,
        /// Upper bound, inclusive.
        max: Decimal,
        /// Charge per matching transaction.
        rate: Decimal,
    },
    /// A percentage of the summed volume of amounts strictly above `min`.
    Percentage {
        /// Threshold, exclusive.
        min: Decimal,
        /// Percentage applied to the qualifying volume (1 means 1%).
        percent: Decimal,
    },
}

impl Slab {
    /// Returns true if `amount` is charged by this slab.
    ///
    /// Fixed-rate slabs include both ends of their range; percentage slabs
    /// exclude the threshold itself.
    pub fn applies_to(&self, amount: Decimal) -> bool {
        match self {
            Slab::FixedRate { min, max, .. } => *min <= amount && amount <= *max,
            Slab::Percentage { min, .. } => amount > *min,
        }
    }
}

impl fmt::Display for Slab {
    /// Formats the slab in the schedule text grammar.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slab::FixedRate { min, max, rate } => write!(
                f,
                "{}-{}={}",
                min.normalize(),
                max.normalize(),
                rate.normalize()
            ),
            Slab::Percentage { min, percent } => {
                write!(f, ">{}={}%", min.normalize(), percent.normalize())
            }
        }
    }
}

/// A named, ordered list of slabs defining one party's fee structure.
///
/// Schedules are never mutated in place; an update builds a new schedule
/// and replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Name of the schedule (e.g. "ours", "counterparty").
    pub name: String,
    /// Slabs in evaluation and report order.
    pub slabs: Vec<Slab>,
}

impl Schedule {
    /// Creates a schedule from its name and slabs.
    pub fn new(name: impl Into<String>, slabs: Vec<Slab>) -> Self {
        Self {
            name: name.into(),
            slabs,
        }
    }

    /// Returns the schedule rendered back into its text form, one slab per line.
    pub fn to_text(&self) -> String {
        self.slabs
            .iter()
            .map(Slab::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn fixed(min: &str, max: &str, rate: &str) -> Slab {
        Slab::FixedRate {
            min: dec(min),
            max: dec(max),
            rate: dec(rate),
        }
    }

    #[test]
    fn test_fixed_rate_includes_both_bounds() {
        let slab = fixed("100", "1000", "5");
        assert!(slab.applies_to(dec("100")));
        assert!(slab.applies_to(dec("1000")));
        assert!(slab.applies_to(dec("550.50")));
        assert!(!slab.applies_to(dec("99.99")));
        assert!(!slab.applies_to(dec("1000.01")));
    }

    #[test]
    fn test_percentage_excludes_threshold() {
        let slab = Slab::Percentage {
            min: dec("7000"),
            percent: dec("1"),
        };
        assert!(!slab.applies_to(dec("7000")));
        assert!(slab.applies_to(dec("7000.01")));
        assert!(!slab.applies_to(dec("50")));
    }

    #[test]
    fn test_display_uses_schedule_grammar() {
        assert_eq!(fixed("100.00", "1000", "5.50").to_string(), "100-1000=5.5");
        let slab = Slab::Percentage {
            min: dec("7000"),
            percent: dec("1.25"),
        };
        assert_eq!(slab.to_string(), ">7000=1.25%");
    }

    #[test]
    fn test_schedule_to_text_preserves_order() {
        let schedule = Schedule::new(
            "ours",
            vec![
                fixed("1001", "7000", "7"),
                fixed("100", "1000", "5"),
                Slab::Percentage {
                    min: dec("7000"),
                    percent: dec("1"),
                },
            ],
        );
        assert_eq!(schedule.to_text(), "1001-7000=7\n100-1000=5\n>7000=1%");
    }

    #[test]
    fn test_slab_serialization() {
        let json = serde_json::to_string(&fixed("100", "1000", "5")).unwrap();
        assert!(json.contains("\"kind\":\"fixed_rate\""));
        assert!(json.contains("\"min\":\"100\""));

        let slab: Slab =
            serde_json::from_str(r#"{"kind":"percentage","min":"7000","percent":"1"}"#).unwrap();
        assert_eq!(
            slab,
            Slab::Percentage {
                min: dec("7000"),
                percent: dec("1"),
            }
        );
    }
}
