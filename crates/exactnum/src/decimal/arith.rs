//! Scaled addition, multiplication, powers and square roots.

use std::ops;

use super::{BigDecimal, checked_scale};
use crate::{
    context::MathContext,
    error::{ArithError, ArithResult},
    integer::BigInteger,
};

impl BigDecimal {
    /// Exact sum at the larger of the two scales.
    pub(crate) fn add_exact(&self, other: &Self) -> Self {
        let (a, b, scale) = self.aligned(other);
        self.derive(a.add(&b), scale)
    }

    /// Exact product; the scale is the sum of the scales.
    pub(crate) fn multiply_exact(&self, other: &Self) -> ArithResult<Self> {
        let scale = checked_scale(self.scale.checked_add(other.scale))?;
        Ok(self.derive(self.unscaled.multiply(&other.unscaled), scale))
    }

    /// `self + other`, rounded to this value's default context.
    pub fn add(&self, other: &Self) -> ArithResult<Self> {
        self.add_with_context(other, &self.context)
    }

    /// `self + other`, rounded to `context`.
    pub fn add_with_context(&self, other: &Self, context: &MathContext) -> ArithResult<Self> {
        self.add_exact(other).round(context)
    }

    /// `self - other`, rounded to this value's default context.
    pub fn subtract(&self, other: &Self) -> ArithResult<Self> {
        self.subtract_with_context(other, &self.context)
    }

    /// `self - other`, rounded to `context`.
    pub fn subtract_with_context(&self, other: &Self, context: &MathContext) -> ArithResult<Self> {
        self.add_exact(&other.negate()).round(context)
    }

    /// `self * other`, rounded to this value's default context.
    pub fn multiply(&self, other: &Self) -> ArithResult<Self> {
        self.multiply_with_context(other, &self.context)
    }

    /// `self * other`, rounded to `context`.
    pub fn multiply_with_context(&self, other: &Self, context: &MathContext) -> ArithResult<Self> {
        self.multiply_exact(other)?.round(context)
    }

    /// Additive inverse, same scale.
    #[must_use]
    pub fn negate(&self) -> Self {
        self.derive(self.unscaled.negate(), self.scale)
    }

    /// Absolute value, same scale.
    #[must_use]
    pub fn abs(&self) -> Self {
        self.derive(self.unscaled.abs(), self.scale)
    }

    /// Exact `self^exponent`; the scale is `scale * exponent`.
    ///
    /// Fails with [`ArithError::ScaleOverflow`] when that product leaves the `i64` range.
    pub fn pow(&self, exponent: u32) -> ArithResult<Self> {
        let scale = checked_scale(self.scale.checked_mul(i64::from(exponent)))?;
        Ok(self.derive(self.unscaled.pow(exponent), scale))
    }

    /// `self^exponent` rounded to `context`.
    pub fn pow_with_context(&self, exponent: u32, context: &MathContext) -> ArithResult<Self> {
        self.pow(exponent)?.round(context)
    }

    /// Square root rounded to `context`.
    ///
    /// The result is stripped of trailing zeros down to the preferred scale
    /// `scale / 2`. With unlimited precision the root must be exact, otherwise this
    /// fails with [`ArithError::RoundingRequired`].
    pub fn sqrt(&self, context: &MathContext) -> ArithResult<Self> {
        if self.is_negative() {
            return Err(ArithError::NegativeSquareRoot);
        }
        let preferred = self.scale.div_euclid(2);
        if self.is_zero() {
            return Ok(self.derive(BigInteger::ZERO, preferred));
        }
        // pad so the radicand has an even scale and enough digits for P + 2 root digits
        let wanted = if context.is_unlimited() {
            0
        } else {
            2 * (u64::from(context.precision()) + 2)
        };
        let mut padding = wanted.saturating_sub(self.precision());
        if (i128::from(self.scale) + i128::from(padding)).rem_euclid(2) == 1 {
            padding += 1;
        }
        let radicand = self.unscaled.multiply(&BigInteger::ten_pow(padding));
        let (root, remainder) = radicand.sqrt_rem()?;
        // half of a sum of two i64-sized values always fits back into i64
        let root_scale = ((i128::from(self.scale) + i128::from(padding)) / 2) as i64;
        let root = if remainder.is_zero() {
            self.derive(root, root_scale)
        } else if context.is_unlimited() {
            return Err(ArithError::RoundingRequired);
        } else {
            // sticky digit so the rounding step sees the root is inexact
            let sticky = root.multiply(&BigInteger::from(10u8)).add(&BigInteger::one());
            self.derive(sticky, root_scale + 1)
        };
        Ok(root.round(context)?.strip_zeros_toward(preferred))
    }
}

/// Exact sum; no context is applied.
impl ops::Add for &BigDecimal {
    type Output = BigDecimal;

    fn add(self, rhs: &BigDecimal) -> BigDecimal {
        self.add_exact(rhs)
    }
}

impl ops::Add for BigDecimal {
    type Output = BigDecimal;

    fn add(self, rhs: BigDecimal) -> BigDecimal {
        self.add_exact(&rhs)
    }
}

/// Exact difference; no context is applied.
impl ops::Sub for &BigDecimal {
    type Output = BigDecimal;

    fn sub(self, rhs: &BigDecimal) -> BigDecimal {
        self.add_exact(&rhs.negate())
    }
}

impl ops::Sub for BigDecimal {
    type Output = BigDecimal;

    fn sub(self, rhs: BigDecimal) -> BigDecimal {
        self.add_exact(&rhs.negate())
    }
}

fn multiply_or_panic(lhs: &BigDecimal, rhs: &BigDecimal) -> BigDecimal {
    match lhs.multiply_exact(rhs) {
        Ok(product) => product,
        Err(_) => panic!("attempt to multiply with scale overflow"),
    }
}

/// Exact product; no context is applied.
///
/// # Panics
///
/// Panics when the summed scale overflows `i64`; use [`BigDecimal::multiply`] to get an error instead.
impl ops::Mul for &BigDecimal {
    type Output = BigDecimal;

    fn mul(self, rhs: &BigDecimal) -> BigDecimal {
        multiply_or_panic(self, rhs)
    }
}

impl ops::Mul for BigDecimal {
    type Output = BigDecimal;

    fn mul(self, rhs: BigDecimal) -> BigDecimal {
        multiply_or_panic(&self, &rhs)
    }
}

impl ops::Neg for BigDecimal {
    type Output = BigDecimal;

    fn neg(self) -> BigDecimal {
        self.negate()
    }
}

impl ops::Neg for &BigDecimal {
    type Output = BigDecimal;

    fn neg(self) -> BigDecimal {
        self.negate()
    }
}
