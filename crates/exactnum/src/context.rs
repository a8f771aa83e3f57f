//! Math contexts: an immutable (precision, rounding) pair.
//!
//! The runtime keeps a lightweight thread-local default context which new
//! `BigDecimal` values capture when no explicit context is given.

use std::{cell::Cell, fmt, str::FromStr};

use crate::{
    error::{ArithError, ArithResult},
    rounding::RoundingMode,
};

/// Precision plus rounding policy used by decimal operations.
///
/// A precision of `0` means unlimited significant digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct MathContext {
    precision: u32,
    rounding: RoundingMode,
}

impl MathContext {
    /// Unlimited precision, `HALF_UP`; exact for every operation except non-terminating division.
    pub const UNLIMITED: Self = Self::new(0, RoundingMode::HalfUp);
    /// 7 digits, `HALF_EVEN` (IEEE 754 decimal32).
    pub const DECIMAL32: Self = Self::new(7, RoundingMode::HalfEven);
    /// 16 digits, `HALF_EVEN` (IEEE 754 decimal64).
    pub const DECIMAL64: Self = Self::new(16, RoundingMode::HalfEven);
    /// 34 digits, `HALF_EVEN` (IEEE 754 decimal128).
    pub const DECIMAL128: Self = Self::new(34, RoundingMode::HalfEven);
    /// 72 digits, `HALF_EVEN`.
    pub const DECIMAL256: Self = Self::new(72, RoundingMode::HalfEven);

    /// Creates a context.
    #[must_use]
    pub const fn new(precision: u32, rounding: RoundingMode) -> Self {
        Self { precision, rounding }
    }

    /// Creates a `HALF_UP` context with the given precision.
    #[must_use]
    pub const fn with_precision(precision: u32) -> Self {
        Self::new(precision, RoundingMode::HalfUp)
    }

    /// Significant digits kept by this context (0 = unlimited).
    #[must_use]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Rounding policy of this context.
    #[must_use]
    pub const fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Whether this context keeps every digit.
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        self.precision == 0
    }
}

impl Default for MathContext {
    fn default() -> Self {
        Self::UNLIMITED
    }
}

impl fmt::Display for MathContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "precision={} roundingMode={}", self.precision, self.rounding)
    }
}

impl FromStr for MathContext {
    type Err = ArithError;

    /// Parses the canonical form `precision=P roundingMode=NAME`.
    fn from_str(s: &str) -> ArithResult<Self> {
        let mut parts = s.split_whitespace();
        let (Some(precision), Some(rounding), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ArithError::malformed(s, "expected `precision=P roundingMode=NAME`"));
        };
        let precision = precision
            .strip_prefix("precision=")
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| ArithError::malformed(s, "bad precision"))?;
        let rounding = rounding
            .strip_prefix("roundingMode=")
            .and_then(|r| r.parse::<RoundingMode>().ok())
            .ok_or_else(|| ArithError::malformed(s, "bad rounding mode"))?;
        Ok(Self::new(precision, rounding))
    }
}

thread_local! {
    /// Default context for decimal operations on the current thread.
    static DEFAULT_CONTEXT: Cell<MathContext> = const { Cell::new(MathContext::UNLIMITED) };
}

/// Returns the current thread's default context.
#[must_use]
pub fn default_context() -> MathContext {
    DEFAULT_CONTEXT.with(Cell::get)
}

/// Replaces the current thread's default context, returning the previous one.
///
/// Only values constructed afterwards pick up the new default.
pub fn set_default_context(context: MathContext) -> MathContext {
    DEFAULT_CONTEXT.with(|cell| cell.replace(context))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_string_round_trips() {
        let mc = MathContext::DECIMAL64;
        assert_eq!(mc.to_string(), "precision=16 roundingMode=HALF_EVEN");
        assert_eq!(mc.to_string().parse::<MathContext>().unwrap(), mc);
        assert!("precision=x roundingMode=UP".parse::<MathContext>().is_err());
        assert!("precision=3".parse::<MathContext>().is_err());
    }

    #[test]
    fn default_context_is_thread_local() {
        let previous = set_default_context(MathContext::DECIMAL32);
        assert_eq!(previous, MathContext::UNLIMITED);
        let other = std::thread::spawn(default_context).join().unwrap();
        assert_eq!(other, MathContext::UNLIMITED);
        assert_eq!(default_context(), MathContext::DECIMAL32);
        set_default_context(previous);
    }
}
