//! Percentage value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A whole-number value between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// `part * 100 / whole` with integer floor division.
    ///
    /// Zero when `whole` is zero; clamped to 100 when `part > whole`.
    pub fn of(part: u32, whole: u32) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        let pct = (u64::from(part) * 100) / u64::from(whole);
        Self(pct.min(100) as u8)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn of_clamps_part_above_whole() {
        assert_eq!(Percentage::of(12, 10).value(), 100);
    }

    #[test]
    fn of_uses_floor_division() {
        assert_eq!(Percentage::of(7, 10).value(), 70);
        assert_eq!(Percentage::of(1, 3).value(), 33);
        assert_eq!(Percentage::of(2, 3).value(), 66);
    }

    #[test]
    fn of_zero_whole_is_zero() {
        assert_eq!(Percentage::of(0, 0), Percentage::ZERO);
        assert_eq!(Percentage::of(5, 0), Percentage::ZERO);
    }

    #[test]
    fn displays_with_percent_sign() {
        assert_eq!(Percentage::of(7, 10).to_string(), "70%");
    }

    proptest! {
        #[test]
        fn of_never_exceeds_hundred(part in 0u32..=u32::MAX, whole in 0u32..=u32::MAX) {
            prop_assert!(Percentage::of(part, whole).value() <= 100);
        }
    }
}
