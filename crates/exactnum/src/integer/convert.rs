//! Conversions to and from primitives, and `num-traits` integration.

use num_integer::Integer;
use num_traits::{FromPrimitive, Num, One, Pow, Signed, ToPrimitive, Zero};

use super::{BigInteger, Sign};
use crate::{error::ArithError, limbs};

/// Anything that converts to a [`BigInteger`] without failing.
///
/// Decimal values convert by truncating toward zero.
pub trait ToBigInteger {
    fn to_big_integer(&self) -> BigInteger;
}

impl ToBigInteger for BigInteger {
    fn to_big_integer(&self) -> BigInteger {
        self.clone()
    }
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for BigInteger {
            fn from(value: $t) -> Self {
                Self::from_magnitude(limbs::from_u128(value as u128))
            }
        }

        impl ToBigInteger for $t {
            fn to_big_integer(&self) -> BigInteger {
                BigInteger::from(*self)
            }
        }
    )*};
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for BigInteger {
            fn from(value: $t) -> Self {
                Self::from_parts(value < 0, limbs::from_u128(value.unsigned_abs() as u128))
            }
        }

        impl ToBigInteger for $t {
            fn to_big_integer(&self) -> BigInteger {
                BigInteger::from(*self)
            }
        }
    )*};
}

impl_from_unsigned!(u8, u16, u32, u64, u128, usize);
impl_from_signed!(i8, i16, i32, i64, i128, isize);

/// Splits a finite `f64` into `(negative, mantissa, exponent)` with
/// `value == ±mantissa * 2^exponent`.
pub(crate) fn f64_parts(value: f64) -> (bool, u64, i64) {
    let bits = value.to_bits();
    let negative = bits >> 63 == 1;
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1 << 52) - 1);
    if biased == 0 {
        (negative, fraction, -1074)
    } else {
        (negative, fraction | (1 << 52), biased - 1075)
    }
}

impl BigInteger {
    /// Value as `i32`, saturating at the bounds.
    #[must_use]
    pub fn int_value(&self) -> i32 {
        self.to_i32()
            .unwrap_or(if self.is_negative() { i32::MIN } else { i32::MAX })
    }

    /// Value as `i64`, saturating at the bounds.
    #[must_use]
    pub fn long_value(&self) -> i64 {
        self.to_i64()
            .unwrap_or(if self.is_negative() { i64::MIN } else { i64::MAX })
    }

    /// Nearest `f64` (ties to even); infinite beyond `f64::MAX`.
    #[must_use]
    pub fn double_value(&self) -> f64 {
        let bits = self.bit_length();
        let magnitude = if bits <= 64 {
            limbs::to_u128(&self.limbs).map_or(0.0, |value| value as f64)
        } else if bits > 1024 {
            f64::INFINITY
        } else {
            // 64 leading bits plus a sticky bit round exactly once
            let shift = bits - 64;
            let top = limbs::to_u128(&limbs::shr(&self.limbs, shift)).unwrap_or(0) as u64;
            let sticky = u64::from(limbs::any_low_bits(&self.limbs, shift));
            (top | sticky) as f64 * 2f64.powi(shift as i32)
        };
        if self.is_negative() { -magnitude } else { magnitude }
    }
}

impl Zero for BigInteger {
    fn zero() -> Self {
        Self::ZERO
    }

    fn is_zero(&self) -> bool {
        self.sign == Sign::Zero
    }
}

impl One for BigInteger {
    fn one() -> Self {
        Self::from_magnitude(vec![1])
    }
}

impl Num for BigInteger {
    type FromStrRadixErr = ArithError;

    fn from_str_radix(digits: &str, radix: u32) -> Result<Self, ArithError> {
        BigInteger::from_str_radix(digits, radix)
    }
}

impl Signed for BigInteger {
    fn abs(&self) -> Self {
        BigInteger::abs(self)
    }

    fn abs_sub(&self, other: &Self) -> Self {
        if self <= other {
            Self::ZERO
        } else {
            self.subtract(other)
        }
    }

    fn signum(&self) -> Self {
        Self::from(self.sign.as_i32())
    }

    fn is_positive(&self) -> bool {
        self.sign == Sign::Plus
    }

    fn is_negative(&self) -> bool {
        self.sign == Sign::Minus
    }
}

impl ToPrimitive for BigInteger {
    fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|value| i64::try_from(value).ok())
    }

    fn to_i128(&self) -> Option<i128> {
        let magnitude = limbs::to_u128(&self.limbs)?;
        if self.is_negative() {
            0i128.checked_sub_unsigned(magnitude)
        } else {
            i128::try_from(magnitude).ok()
        }
    }

    fn to_u64(&self) -> Option<u64> {
        self.to_u128().and_then(|value| u64::try_from(value).ok())
    }

    fn to_u128(&self) -> Option<u128> {
        if self.is_negative() {
            None
        } else {
            limbs::to_u128(&self.limbs)
        }
    }

    fn to_f64(&self) -> Option<f64> {
        Some(self.double_value())
    }
}

impl FromPrimitive for BigInteger {
    fn from_i64(value: i64) -> Option<Self> {
        Some(Self::from(value))
    }

    fn from_i128(value: i128) -> Option<Self> {
        Some(Self::from(value))
    }

    fn from_u64(value: u64) -> Option<Self> {
        Some(Self::from(value))
    }

    fn from_u128(value: u128) -> Option<Self> {
        Some(Self::from(value))
    }

    /// Truncates toward zero; `None` for NaN and infinities.
    fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let (negative, mantissa, exponent) = f64_parts(value.trunc());
        let magnitude = Self::from(mantissa);
        let magnitude = if exponent >= 0 {
            magnitude.shift_left_u64(exponent.unsigned_abs())
        } else {
            magnitude.shift_right_u64(exponent.unsigned_abs())
        };
        Some(Self::from_parts(negative, magnitude.limbs))
    }
}

impl Pow<u32> for BigInteger {
    type Output = Self;

    fn pow(self, exponent: u32) -> Self {
        BigInteger::pow(&self, exponent)
    }
}

impl Pow<u32> for &BigInteger {
    type Output = BigInteger;

    fn pow(self, exponent: u32) -> BigInteger {
        BigInteger::pow(self, exponent)
    }
}

/// Floor-division semantics, like the primitive `Integer` impls; division by
/// zero panics.
impl Integer for BigInteger {
    fn div_floor(&self, other: &Self) -> Self {
        Integer::div_mod_floor(self, other).0
    }

    fn mod_floor(&self, other: &Self) -> Self {
        Integer::div_mod_floor(self, other).1
    }

    fn div_mod_floor(&self, other: &Self) -> (Self, Self) {
        let (quotient, remainder) = Integer::div_rem(self, other);
        if !remainder.is_zero() && remainder.sign != other.sign {
            (quotient.subtract(&BigInteger::one()), remainder.add(other))
        } else {
            (quotient, remainder)
        }
    }

    fn gcd(&self, other: &Self) -> Self {
        BigInteger::gcd(self, other)
    }

    fn lcm(&self, other: &Self) -> Self {
        BigInteger::lcm(self, other)
    }

    fn is_multiple_of(&self, other: &Self) -> bool {
        if other.is_zero() {
            return self.is_zero();
        }
        let (_, remainder) = limbs::div_rem(&self.limbs, &other.limbs);
        remainder.is_empty()
    }

    fn is_even(&self) -> bool {
        !limbs::test_bit(&self.limbs, 0)
    }

    fn is_odd(&self) -> bool {
        limbs::test_bit(&self.limbs, 0)
    }

    fn div_rem(&self, other: &Self) -> (Self, Self) {
        assert!(!other.is_zero(), "attempt to divide by zero");
        let (quotient, remainder) = limbs::div_rem(&self.limbs, &other.limbs);
        (
            Self::from_parts(self.sign.product(other.sign) == Sign::Minus, quotient),
            Self::from_parts(self.is_negative(), remainder),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_extremes_round_trip() {
        assert_eq!(BigInteger::from(i64::MIN).to_i64(), Some(i64::MIN));
        assert_eq!(BigInteger::from(i128::MIN).to_i128(), Some(i128::MIN));
        assert_eq!(BigInteger::from(u128::MAX).to_u128(), Some(u128::MAX));
        assert_eq!(BigInteger::from(u128::MAX).to_i128(), None);
        assert_eq!(BigInteger::from(-1).to_u64(), None);
    }

    #[test]
    fn saturating_accessors() {
        let huge = BigInteger::from(u64::MAX);
        assert_eq!(huge.int_value(), i32::MAX);
        assert_eq!(huge.negate().int_value(), i32::MIN);
        assert_eq!(huge.long_value(), i64::MAX);
        assert_eq!(BigInteger::from(-42).long_value(), -42);
    }

    #[test]
    fn double_value_rounds_once() {
        assert_eq!(BigInteger::from(1u64 << 53).add(&BigInteger::one()).double_value(), 9_007_199_254_740_992.0);
        let above_half = BigInteger::one().shift_left_u64(100).add(&BigInteger::one().shift_left_u64(47)).add(&BigInteger::one());
        assert_eq!(above_half.double_value(), 2f64.powi(100) + 2f64.powi(48));
        assert_eq!(BigInteger::one().shift_left_u64(2000).double_value(), f64::INFINITY);
        assert_eq!(BigInteger::from(-3).double_value(), -3.0);
    }

    #[test]
    fn from_f64_truncates() {
        assert_eq!(BigInteger::from_f64(-2.9), Some(BigInteger::from(-2)));
        assert_eq!(BigInteger::from_f64(0.5), Some(BigInteger::ZERO));
        assert_eq!(BigInteger::from_f64(1e20), Some(BigInteger::from(100_000_000_000_000_000_000u128)));
        assert_eq!(BigInteger::from_f64(f64::NAN), None);
    }

    #[test]
    fn floor_division_follows_divisor_sign() {
        let (q, r) = Integer::div_mod_floor(&BigInteger::from(-7), &BigInteger::from(2));
        assert_eq!((q, r), (BigInteger::from(-4), BigInteger::from(1)));
        let (q, r) = Integer::div_mod_floor(&BigInteger::from(7), &BigInteger::from(-2));
        assert_eq!((q, r), (BigInteger::from(-4), BigInteger::from(-1)));
        assert!(Integer::is_multiple_of(&BigInteger::from(12), &BigInteger::from(-4)));
        assert!(Integer::is_even(&BigInteger::ZERO));
    }
}
