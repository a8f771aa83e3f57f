//! Decimal rounding policies.
//!
//! Each policy is a stateless rule mapping a description of the discarded digits
//! to the correction that must be added to the (signed, truncated) retained digits.

use std::cmp::Ordering;

use crate::error::{ArithError, ArithResult};

/// Rounding policy applied when decimal digits are discarded.
///
/// `Display`/`FromStr` use the canonical upper-snake names (`HALF_EVEN`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingMode {
    /// Away from zero whenever a non-zero digit is discarded.
    Up,
    /// Toward zero (truncate).
    Down,
    /// Toward positive infinity.
    Ceiling,
    /// Toward negative infinity.
    Floor,
    /// Nearest neighbour; ties away from zero.
    #[default]
    HalfUp,
    /// Nearest neighbour; ties toward zero.
    HalfDown,
    /// Nearest neighbour; ties to the even retained digit.
    HalfEven,
    /// Asserts that no rounding is needed.
    Unnecessary,
}

/// What was cut off when truncating a value toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discarded {
    /// Sign of the value being rounded.
    pub negative: bool,
    /// The discarded part compared with one half of a unit in the last retained place.
    pub half: Ordering,
    /// Whether any discarded digit is non-zero.
    pub nonzero: bool,
    /// Whether the last retained digit is odd.
    pub retained_odd: bool,
}

impl Discarded {
    /// Nothing was discarded.
    #[must_use]
    pub fn exact(negative: bool) -> Self {
        Self {
            negative,
            half: Ordering::Less,
            nonzero: false,
            retained_odd: false,
        }
    }

    /// Describes discarded decimal digits by their first digit and whether any later digit is non-zero.
    #[must_use]
    pub fn from_digits(negative: bool, first: u8, rest_nonzero: bool, retained_odd: bool) -> Self {
        let half = match first.cmp(&5) {
            Ordering::Equal if rest_nonzero => Ordering::Greater,
            other => other,
        };
        Self {
            negative,
            half,
            nonzero: first != 0 || rest_nonzero,
            retained_odd,
        }
    }

    /// Describes an integer division remainder `r` of divisor `d` via `2r` compared with `d`.
    #[must_use]
    pub fn from_remainder(negative: bool, twice_remainder_vs_divisor: Ordering, nonzero: bool, retained_odd: bool) -> Self {
        Self {
            negative,
            half: twice_remainder_vs_divisor,
            nonzero,
            retained_odd,
        }
    }
}

impl RoundingMode {
    /// Returns the amount (`-1`, `0` or `1`) to add to the signed truncated value.
    ///
    /// `Unnecessary` fails with [`ArithError::RoundingRequired`] when anything
    /// non-zero was discarded.
    pub fn correction(self, discarded: Discarded) -> ArithResult<i8> {
        if !discarded.nonzero {
            return Ok(0);
        }
        let away = if discarded.negative { -1 } else { 1 };
        let round_away = match self {
            Self::Up => true,
            Self::Down => false,
            Self::Ceiling => !discarded.negative,
            Self::Floor => discarded.negative,
            Self::HalfUp => discarded.half != Ordering::Less,
            Self::HalfDown => discarded.half == Ordering::Greater,
            Self::HalfEven => match discarded.half {
                Ordering::Greater => true,
                Ordering::Equal => discarded.retained_odd,
                Ordering::Less => false,
            },
            Self::Unnecessary => return Err(ArithError::RoundingRequired),
        };
        Ok(if round_away { away } else { 0 })
    }
}
