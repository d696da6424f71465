//! Guarded ratios.
//!
//! Every division in the analytics goes through `Ratio::of`. A zero or
//! non-positive denominator yields `Ratio::Undefined`, which renders as
//! "N/A" and is kept apart from a genuine zero ratio.

use serde::{Serialize, Serializer};
use std::{cmp::Ordering, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Ratio {
    Defined(f64),
    #[default]
    Undefined,
}

impl Ratio {
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator > 0.0 {
            Ratio::Defined(numerator / denominator)
        } else {
            Ratio::Undefined
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(*v),
            Ratio::Undefined => None,
        }
    }

    /// Defined and strictly above zero.
    pub fn is_positive(&self) -> bool {
        self.value().is_some_and(|v| v > 0.0)
    }

    /// Mean of the strictly positive defined ratios; undefined if none.
    pub fn mean_of_positive<I: IntoIterator<Item = Ratio>>(ratios: I) -> Self {
        let (sum, count) = ratios
            .into_iter()
            .filter_map(|r| r.value())
            .filter(|v| *v > 0.0)
            .fold((0.0, 0u32), |(s, n), v| (s + v, n + 1));
        Ratio::of(sum, f64::from(count))
    }

    /// Ascending order with `Undefined` after every defined value.
    pub fn cmp_undefined_last(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Ratio::Defined(a), Ratio::Defined(b)) => a.total_cmp(b),
            (Ratio::Defined(_), Ratio::Undefined) => Ordering::Less,
            (Ratio::Undefined, Ratio::Defined(_)) => Ordering::Greater,
            (Ratio::Undefined, Ratio::Undefined) => Ordering::Equal,
        }
    }

    /// Descending order, still with `Undefined` after every defined value.
    pub fn cmp_desc_undefined_last(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Ratio::Defined(a), Ratio::Defined(b)) => b.total_cmp(a),
            _ => self.cmp_undefined_last(other),
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Defined(v) => write!(f, "{v:.2}"),
            Ratio::Undefined => f.write_str("N/A"),
        }
    }
}

/// Serialized as a number, or `null` when undefined.
impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_is_undefined_not_zero() {
        assert_eq!(Ratio::of(300.0, 0.0), Ratio::Undefined);
        assert_eq!(Ratio::of(0.0, 100.0), Ratio::Defined(0.0));
        assert_eq!(Ratio::of(0.0, 100.0).to_string(), "0.00");
        assert_eq!(Ratio::Undefined.to_string(), "N/A");
    }

    #[test]
    fn mean_skips_zero_and_undefined() {
        let avg = Ratio::mean_of_positive([
            Ratio::Defined(0.0),
            Ratio::Defined(2.0),
            Ratio::Defined(4.0),
            Ratio::Undefined,
        ]);
        assert_eq!(avg, Ratio::Defined(3.0));
        assert_eq!(Ratio::mean_of_positive([Ratio::Defined(0.0)]), Ratio::Undefined);
    }

    #[test]
    fn undefined_sorts_last() {
        let mut v = vec![Ratio::Undefined, Ratio::Defined(2.0), Ratio::Defined(0.5)];
        v.sort_by(Ratio::cmp_undefined_last);
        assert_eq!(v, vec![Ratio::Defined(0.5), Ratio::Defined(2.0), Ratio::Undefined]);

        v.sort_by(Ratio::cmp_desc_undefined_last);
        assert_eq!(v, vec![Ratio::Defined(2.0), Ratio::Defined(0.5), Ratio::Undefined]);
    }

    #[test]
    fn serializes_undefined_as_null() {
        assert_eq!(serde_json::to_string(&Ratio::Undefined).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Ratio::Defined(1.5)).unwrap(), "1.5");
    }
}
