//! Rescaling and rounding.

use std::cmp::Ordering;

use super::{BigDecimal, checked_scale};
use crate::{
    context::MathContext,
    error::{ArithError, ArithResult},
    integer::BigInteger,
    rounding::{Discarded, RoundingMode},
};

/// Truncates `value` by `drop` decimal digits and applies `mode` to what was cut.
pub(crate) fn round_off_digits(value: &BigInteger, drop: u64, precision: u64, mode: RoundingMode) -> ArithResult<BigInteger> {
    let negative = value.is_negative();
    let (truncated, discarded) = if drop > precision {
        // everything goes, and it is below a tenth of the new unit
        (BigInteger::ZERO, Discarded::from_digits(negative, 0, !value.is_zero(), false))
    } else {
        let divisor = BigInteger::ten_pow(drop);
        let (quotient, remainder) = value.div_rem(&divisor)?;
        let twice = remainder.abs().shift_left(1);
        let discarded = Discarded::from_remainder(
            negative,
            twice.compare_abs(&divisor),
            !remainder.is_zero(),
            quotient.test_bit(0),
        );
        (quotient, discarded)
    };
    let correction = mode.correction(discarded)?;
    Ok(truncated.add(&BigInteger::from(correction)))
}

impl BigDecimal {
    /// Returns a value with `new_scale`, rounding with `mode` if digits are dropped.
    ///
    /// Increasing the scale is always exact. `Unnecessary` fails with
    /// [`ArithError::RoundingRequired`] if a dropped digit is non-zero.
    pub fn set_scale(&self, new_scale: i64, mode: RoundingMode) -> ArithResult<Self> {
        match new_scale.cmp(&self.scale) {
            Ordering::Equal => Ok(self.clone()),
            Ordering::Greater => {
                let factor = BigInteger::ten_pow(new_scale.abs_diff(self.scale));
                Ok(self.derive(self.unscaled.multiply(&factor), new_scale))
            }
            Ordering::Less => {
                let drop = self.scale.abs_diff(new_scale);
                let unscaled = round_off_digits(&self.unscaled, drop, self.precision(), mode)?;
                Ok(self.derive(unscaled, new_scale))
            }
        }
    }

    /// Rounds to `context.precision()` significant digits; unlimited precision is a no-op.
    ///
    /// When rounding carries into a new leading digit (`9.99 -> 10.0`) one more
    /// trailing zero is dropped so the digit count matches the precision.
    pub fn round(&self, context: &MathContext) -> ArithResult<Self> {
        let target = u64::from(context.precision());
        let digits = self.precision();
        if context.is_unlimited() || digits <= target {
            return Ok(self.clone());
        }
        let drop = digits - target;
        let scale = checked_scale(i64::try_from(drop).ok().and_then(|drop| self.scale.checked_sub(drop)))?;
        let rounded = self.set_scale(scale, context.rounding())?;
        if rounded.precision() > target {
            return rounded.set_scale(checked_scale(rounded.scale.checked_sub(1))?, context.rounding());
        }
        Ok(rounded)
    }

    /// Same as [`round`](Self::round): the value rounded to `context`.
    pub fn plus(&self, context: &MathContext) -> ArithResult<Self> {
        self.round(context)
    }

    /// Removes every trailing zero from the unscaled value; zero becomes `0` at scale 0.
    #[must_use]
    pub fn strip_trailing_zeros(&self) -> Self {
        if self.is_zero() {
            return self.derive(BigInteger::ZERO, 0);
        }
        self.strip_zeros_toward(i64::MIN)
    }

    /// Strips trailing zeros but never reduces the scale below `preferred`.
    pub(crate) fn strip_zeros_toward(&self, preferred: i64) -> Self {
        if self.scale <= preferred {
            return self.clone();
        }
        let zeros = self.digits().bytes().rev().take_while(|&byte| byte == b'0').count() as u64;
        let zeros = if self.is_zero() { 0 } else { zeros.min(self.scale.abs_diff(preferred)) };
        if zeros == 0 {
            return self.clone();
        }
        let factor = BigInteger::ten_pow(zeros);
        match self.unscaled.divide(&factor) {
            Ok(unscaled) => self.derive(unscaled, self.scale.saturating_sub_unsigned(zeros)),
            Err(_) => self.clone(),
        }
    }

    /// `self * 10^-n`, with the scale clamped at zero from below.
    #[must_use]
    pub fn move_point_left(&self, n: i64) -> Self {
        let moved = self.derive(self.unscaled.clone(), self.scale.saturating_add(n));
        if moved.scale < 0 {
            let factor = BigInteger::ten_pow(moved.scale.unsigned_abs());
            moved.derive(moved.unscaled.multiply(&factor), 0)
        } else {
            moved
        }
    }

    /// `self * 10^n`, with the scale clamped at zero from below.
    #[must_use]
    pub fn move_point_right(&self, n: i64) -> Self {
        self.move_point_left(n.saturating_neg())
    }

    /// `self * 10^n` by adjusting only the scale.
    #[must_use]
    pub fn scale_by_power_of_ten(&self, n: i64) -> Self {
        self.derive(self.unscaled.clone(), self.scale.saturating_sub(n))
    }

    /// One unit in the last place: `1 * 10^-scale`.
    #[must_use]
    pub fn ulp(&self) -> Self {
        self.derive(BigInteger::one(), self.scale)
    }

    /// Integer part, truncated toward zero.
    #[must_use]
    pub fn to_big_integer(&self) -> BigInteger {
        if self.scale <= 0 {
            return self.unscaled.multiply(&BigInteger::ten_pow(self.scale.unsigned_abs()));
        }
        if self.scale.unsigned_abs() >= self.precision() {
            return BigInteger::ZERO;
        }
        self.unscaled
            .divide(&BigInteger::ten_pow(self.scale.unsigned_abs()))
            .unwrap_or(BigInteger::ZERO)
    }

    /// Integer value, failing with [`ArithError::RoundingRequired`] if there is a fractional part.
    pub fn to_big_integer_exact(&self) -> ArithResult<BigInteger> {
        Ok(self.set_scale(0, RoundingMode::Unnecessary)?.unscaled)
    }

    /// Nearest `f64`.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Integer part as `i32`, saturating at the bounds.
    #[must_use]
    pub fn int_value(&self) -> i32 {
        self.to_big_integer().int_value()
    }

    /// Integer part as `i64`, saturating at the bounds.
    #[must_use]
    pub fn long_value(&self) -> i64 {
        self.to_big_integer().long_value()
    }

    /// Fails with [`ArithError::PrecisionOverflow`] if `self` has more digits than `context` allows.
    pub(crate) fn check_fits(&self, context: &MathContext) -> ArithResult<()> {
        if !context.is_unlimited() && self.precision() > u64::from(context.precision()) {
            return Err(ArithError::PrecisionOverflow {
                precision: context.precision(),
                needed: self.precision(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> BigDecimal {
        text.parse().unwrap()
    }

    #[test]
    fn set_scale_drops_more_digits_than_present() {
        let value = dec("0.004");
        assert_eq!(value.set_scale(-3, RoundingMode::Up).unwrap().to_string(), "1E+3");
        assert_eq!(value.set_scale(-3, RoundingMode::HalfUp).unwrap().to_string(), "0E+3");
        assert!(value.set_scale(0, RoundingMode::Unnecessary).is_err());
    }

    #[test]
    fn round_trims_carry_digit() {
        let rounded = dec("9.996").round(&MathContext::new(3, RoundingMode::HalfUp)).unwrap();
        assert_eq!(rounded.to_string(), "10.0");
        assert_eq!(rounded.precision(), 3);
        let rounded = dec("99.96").round(&MathContext::new(2, RoundingMode::HalfUp)).unwrap();
        assert_eq!(rounded.to_string(), "1.0E+2");
    }

    #[test]
    fn strip_respects_preferred_scale() {
        assert_eq!(dec("1.2000").strip_zeros_toward(2).to_string(), "1.20");
        assert_eq!(dec("1200").strip_trailing_zeros().to_string(), "1.2E+3");
        assert_eq!(dec("0.000").strip_trailing_zeros().scale(), 0);
    }

    #[test]
    fn point_moves() {
        assert_eq!(dec("123.45").move_point_left(3).to_string(), "0.12345");
        assert_eq!(dec("123.45").move_point_right(3).to_string(), "123450");
        assert_eq!(dec("1.5").scale_by_power_of_ten(3).to_string(), "1.5E+3");
        assert_eq!(dec("1.50").ulp().to_string(), "0.01");
    }

    #[test]
    fn integer_conversions_truncate() {
        assert_eq!(dec("-7.9").to_big_integer(), BigInteger::from(-7));
        assert_eq!(dec("1.2E+3").to_big_integer(), BigInteger::from(1200));
        assert_eq!(dec("0.0005").to_big_integer(), BigInteger::ZERO);
        assert_eq!(dec("12.0").to_big_integer_exact(), Ok(BigInteger::from(12)));
        assert_eq!(dec("12.5").to_big_integer_exact(), Err(ArithError::RoundingRequired));
        assert_eq!(dec("1E+20").long_value(), i64::MAX);
        assert!((dec("0.1").to_f64() - 0.1).abs() < f64::EPSILON);
    }
}
