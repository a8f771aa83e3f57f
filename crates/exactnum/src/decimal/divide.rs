//! Decimal division.
//!
//! Division works on the unscaled magnitudes and produces an integer quotient
//! plus a count of fractional digits. Two strategies fill it:
//!
//! - **Long division** (unlimited precision, or precision up to
//!   [`Limits::long_division_max_precision`]): one digit per step, stopping once
//!   `precision + 1` significant digits exist. With unlimited precision every
//!   remainder is remembered and a repeat means the expansion never terminates.
//! - **Newton** (larger precisions): a fixed-point reciprocal of the divisor is
//!   refined until it stops moving, multiplied in, and the resulting quotient is
//!   corrected against the exact remainder.
//!
//! Either way an inexact quotient gets one extra sticky `1` digit, so the final
//! [`round`](BigDecimal::round) sees a non-zero tail past the rounding digit.
//! The rounded value is then stripped of trailing zeros down to the preferred
//! scale `dividend.scale - divisor.scale`.

use ahash::AHashSet;
use num_integer::Integer;

use super::{BigDecimal, checked_scale};
use crate::{
    context::MathContext,
    error::{ArithError, ArithResult},
    integer::BigInteger,
    limbs,
    limits::Limits,
    rounding::{Discarded, RoundingMode},
    tracer::{ArithTracer, DivisionStrategy, NoopTracer},
};

/// Truncated quotient magnitude with `fraction_digits` digits after the point.
struct Quotient {
    magnitude: BigInteger,
    fraction_digits: u64,
    inexact: bool,
}

impl BigDecimal {
    /// `self / other`, rounded to this value's default context.
    ///
    /// With the `UNLIMITED` default this is exact or fails with
    /// [`ArithError::NonTerminatingDecimal`].
    pub fn divide(&self, other: &Self) -> ArithResult<Self> {
        self.divide_with_context(other, &self.context)
    }

    /// `self / other`, rounded to `context`.
    pub fn divide_with_context(&self, other: &Self, context: &MathContext) -> ArithResult<Self> {
        self.divide_traced(other, context, &Limits::default(), &mut NoopTracer)
    }

    pub(crate) fn divide_traced(
        &self,
        other: &Self,
        context: &MathContext,
        limits: &Limits,
        tracer: &mut impl ArithTracer,
    ) -> ArithResult<Self> {
        if other.is_zero() {
            return Err(ArithError::DivisionByZero);
        }
        let preferred = checked_scale(self.scale.checked_sub(other.scale))?;
        if self.is_zero() {
            return Ok(self.derive(BigInteger::ZERO, preferred));
        }
        let dividend = self.unscaled.abs();
        let divisor = other.unscaled.abs();
        let precision = context.precision();
        let quotient = if context.is_unlimited() || precision <= limits.long_division_max_precision {
            tracer.on_division(DivisionStrategy::LongDivision, precision);
            long_division(&dividend, &divisor, precision, tracer)?
        } else {
            tracer.on_division(DivisionStrategy::Newton, precision);
            newton_division(&dividend, &divisor, precision, limits, tracer)?
        };
        let Quotient {
            mut magnitude,
            mut fraction_digits,
            inexact,
        } = quotient;
        if inexact {
            magnitude = magnitude.multiply(&BigInteger::from(10u8)).add(&BigInteger::one());
            fraction_digits += 1;
        }
        let negative = self.is_negative() != other.is_negative();
        let unscaled = if negative { magnitude.negate() } else { magnitude };
        let scale = checked_scale(preferred.checked_add_unsigned(fraction_digits))?;
        let value = self.derive(unscaled, scale);
        Ok(value.round(context)?.strip_zeros_toward(preferred))
    }

    /// `self / other` at exactly `scale`, rounding with `mode`.
    pub fn divide_to_scale(&self, other: &Self, scale: i64, mode: RoundingMode) -> ArithResult<Self> {
        if other.is_zero() {
            return Err(ArithError::DivisionByZero);
        }
        // unscaled result = |self.unscaled| * 10^shift / |other.unscaled|
        let shift = i128::from(scale) + i128::from(other.scale) - i128::from(self.scale);
        let shift = checked_scale(i64::try_from(shift).ok())?;
        let (numerator, denominator) = if shift >= 0 {
            (
                self.unscaled.abs().multiply(&BigInteger::ten_pow(shift.unsigned_abs())),
                other.unscaled.abs(),
            )
        } else {
            (
                self.unscaled.abs(),
                other.unscaled.abs().multiply(&BigInteger::ten_pow(shift.unsigned_abs())),
            )
        };
        let (quotient, remainder) = numerator.div_rem(&denominator)?;
        let negative = self.is_negative() != other.is_negative();
        let discarded = Discarded::from_remainder(
            negative,
            remainder.shift_left(1).compare_abs(&denominator),
            !remainder.is_zero(),
            quotient.test_bit(0),
        );
        let truncated = if negative { quotient.negate() } else { quotient };
        let correction = mode.correction(discarded)?;
        Ok(self.derive(truncated.add(&BigInteger::from(correction)), scale))
    }

    /// `self / other` at this value's scale, rounding with `mode`.
    pub fn divide_with_mode(&self, other: &Self, mode: RoundingMode) -> ArithResult<Self> {
        self.divide_to_scale(other, self.scale, mode)
    }

    /// Integer part of `self / other`, at the preferred scale `self.scale - other.scale`.
    pub fn divide_to_integral_value(&self, other: &Self) -> ArithResult<Self> {
        let preferred = checked_scale(self.scale.checked_sub(other.scale))?;
        let integral = self.divide_to_scale(other, 0, RoundingMode::Down)?;
        if preferred > 0 {
            integral.set_scale(preferred, RoundingMode::Unnecessary)
        } else {
            Ok(integral.strip_zeros_toward(preferred))
        }
    }

    /// Integer part of `self / other` using at most `context.precision()` digits.
    ///
    /// Fails with [`ArithError::PrecisionOverflow`] when the integer part itself
    /// needs more digits.
    pub fn divide_to_integral_value_with_context(&self, other: &Self, context: &MathContext) -> ArithResult<Self> {
        let integral = self.divide_to_integral_value(other)?;
        integral.strip_trailing_zeros().check_fits(context)?;
        if context.is_unlimited() || integral.precision() <= u64::from(context.precision()) {
            return Ok(integral);
        }
        let excess = integral.precision() - u64::from(context.precision());
        let scale = checked_scale(integral.scale.checked_sub_unsigned(excess))?;
        integral.set_scale(scale, RoundingMode::Unnecessary)
    }

    /// `self - self.divide_to_integral_value(other) * other`; takes the sign of `self`.
    pub fn remainder(&self, other: &Self) -> ArithResult<Self> {
        self.divide_and_remainder(other).map(|(_, remainder)| remainder)
    }

    /// Integral quotient and remainder together.
    pub fn divide_and_remainder(&self, other: &Self) -> ArithResult<(Self, Self)> {
        let quotient = self.divide_to_integral_value(other)?;
        let remainder = self.add_exact(&quotient.multiply_exact(other)?.negate());
        Ok((quotient, remainder))
    }
}

/// Digit-by-digit division of magnitudes.
///
/// `precision == 0` runs until the remainder is zero or a remainder repeats.
fn long_division(
    dividend: &BigInteger,
    divisor: &BigInteger,
    precision: u32,
    tracer: &mut impl ArithTracer,
) -> ArithResult<Quotient> {
    let (integral, mut remainder) = dividend.div_rem(divisor)?;
    let mut digits = integral.limbs().to_vec();
    let mut significant = if integral.is_zero() { 0 } else { integral.decimal_digits() };
    let target = u64::from(precision) + 1;
    let ten = BigInteger::from(10u8);
    let mut seen = AHashSet::new();
    let mut fraction_digits = 0usize;
    while !remainder.is_zero() && (precision == 0 || significant < target) {
        if precision == 0 && !seen.insert(remainder.clone()) {
            tracer.on_cycle_detected(seen.len());
            return Err(ArithError::NonTerminatingDecimal {
                digits: fraction_digits,
            });
        }
        let (digit, next) = remainder.multiply(&ten).div_rem(divisor)?;
        remainder = next;
        limbs::mul_small_add(&mut digits, 10, u64::from(digit.limbs().first().copied().unwrap_or(0)));
        if !digits.is_empty() {
            significant += 1;
        }
        fraction_digits += 1;
    }
    tracer.on_long_division_done(fraction_digits, remainder.is_zero());
    Ok(Quotient {
        magnitude: BigInteger::from_magnitude(digits),
        fraction_digits: fraction_digits as u64,
        inexact: !remainder.is_zero(),
    })
}

/// Quotient of magnitudes with at least `precision + 1` significant digits via a
/// Newton reciprocal.
fn newton_division(
    dividend: &BigInteger,
    divisor: &BigInteger,
    precision: u32,
    limits: &Limits,
    tracer: &mut impl ArithTracer,
) -> ArithResult<Quotient> {
    let shift = (u64::from(precision) + 2 + divisor.decimal_digits()).saturating_sub(dividend.decimal_digits());
    let numerator = dividend.multiply(&BigInteger::ten_pow(shift));
    let point = numerator.decimal_digits() + 2;
    let unit = BigInteger::ten_pow(point);
    let reciprocal = newton_reciprocal(divisor, &unit, point, precision, limits, tracer)?;
    let estimate = Integer::div_floor(&numerator.multiply(&reciprocal), &unit);
    let (adjust, remainder) = Integer::div_mod_floor(&numerator.subtract(&estimate.multiply(divisor)), divisor);
    Ok(Quotient {
        magnitude: estimate.add(&adjust),
        fraction_digits: shift,
        inexact: !remainder.is_zero(),
    })
}

/// `floor(unit / divisor)` up to one unit, where `unit = 10^point`.
///
/// Starts below the reciprocal and iterates `x += x * (unit - divisor * x) / unit`,
/// which stays below it and roughly doubles the correct digits each round.
fn newton_reciprocal(
    divisor: &BigInteger,
    unit: &BigInteger,
    point: u64,
    precision: u32,
    limits: &Limits,
    tracer: &mut impl ArithTracer,
) -> ArithResult<BigInteger> {
    let mut estimate = BigInteger::ten_pow(point - divisor.decimal_digits());
    for iteration in 1..=limits.newton_max_iterations {
        tracer.on_newton_step(iteration);
        let error = unit.subtract(&divisor.multiply(&estimate));
        let step = Integer::div_floor(&estimate.multiply(&error), unit);
        if step.is_zero() {
            return Ok(estimate);
        }
        estimate = estimate.add(&step);
    }
    Err(ArithError::PrecisionOverflow { precision, needed: point })
}
