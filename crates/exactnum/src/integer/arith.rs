//! Sign-magnitude arithmetic: add, subtract, multiply, divide, powers.

use std::{
    cmp::Ordering,
    ops::{Add, Div, Mul, Neg, Rem, Sub},
};

use super::{BigInteger, Sign};
use crate::{
    error::{ArithError, ArithResult},
    limbs,
};

impl BigInteger {
    /// Returns `self + other`.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        match (self.sign, other.sign) {
            (Sign::Zero, _) => other.clone(),
            (_, Sign::Zero) => self.clone(),
            (a, b) if a == b => Self::from_parts(a == Sign::Minus, limbs::add(&self.limbs, &other.limbs)),
            _ => match self.compare_abs(other) {
                Ordering::Equal => Self::ZERO,
                Ordering::Greater => Self::from_parts(self.is_negative(), limbs::sub(&self.limbs, &other.limbs)),
                Ordering::Less => Self::from_parts(other.is_negative(), limbs::sub(&other.limbs, &self.limbs)),
            },
        }
    }

    /// Returns `self - other`.
    #[must_use]
    pub fn subtract(&self, other: &Self) -> Self {
        self.add(&other.negate())
    }

    /// Returns `self * other` (schoolbook multiplication).
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        let sign = self.sign.product(other.sign);
        Self::from_parts(sign == Sign::Minus, limbs::mul(&self.limbs, &other.limbs))
    }

    /// Returns the quotient and remainder of truncating division.
    ///
    /// The quotient rounds toward zero and the remainder takes the sign of `self`,
    /// so `self == q * other + r` always holds.
    pub fn div_rem(&self, other: &Self) -> ArithResult<(Self, Self)> {
        if other.is_zero() {
            return Err(ArithError::DivisionByZero);
        }
        let (quotient, remainder) = limbs::div_rem(&self.limbs, &other.limbs);
        let negative_quotient = self.sign.product(other.sign) == Sign::Minus;
        Ok((
            Self::from_parts(negative_quotient, quotient),
            Self::from_parts(self.is_negative(), remainder),
        ))
    }

    /// Truncating division.
    pub fn divide(&self, other: &Self) -> ArithResult<Self> {
        self.div_rem(other).map(|(quotient, _)| quotient)
    }

    /// Remainder of truncating division (sign follows `self`).
    pub fn remainder(&self, other: &Self) -> ArithResult<Self> {
        self.div_rem(other).map(|(_, remainder)| remainder)
    }

    /// Euclidean modulus: the result is always in `[0, modulus)`.
    ///
    /// Fails with `DivisionByZero` for a zero modulus and `InvalidModulus` for a negative one.
    pub fn modulo(&self, modulus: &Self) -> ArithResult<Self> {
        check_modulus(modulus)?;
        let remainder = self.remainder(modulus)?;
        Ok(if remainder.is_negative() {
            remainder.add(modulus)
        } else {
            remainder
        })
    }

    /// Returns `self^exponent`.
    #[must_use]
    pub fn pow(&self, exponent: u32) -> Self {
        self.pow_u64(u64::from(exponent))
    }

    pub(crate) fn pow_u64(&self, mut exponent: u64) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.multiply(&base);
            }
            exponent >>= 1;
            if exponent > 0 {
                base = base.multiply(&base);
            }
        }
        result
    }

    /// Returns `self^exponent mod modulus` by square-and-multiply.
    ///
    /// A negative exponent uses the modular inverse of `self`. The modulus must be
    /// positive.
    pub fn mod_pow(&self, exponent: &Self, modulus: &Self) -> ArithResult<Self> {
        check_modulus(modulus)?;
        if modulus.is_one_abs() {
            return Ok(Self::ZERO);
        }
        let mut base = if exponent.is_negative() {
            self.mod_inverse(modulus)?
        } else {
            self.modulo(modulus)?
        };
        let mut result = Self::one();
        let bits = exponent.bit_length();
        for bit in 0..bits {
            if limbs::test_bit(&exponent.limbs, bit) {
                result = result.multiply(&base).remainder(modulus)?;
            }
            if bit + 1 < bits {
                base = base.multiply(&base).remainder(modulus)?;
            }
        }
        Ok(result)
    }
}

/// Rejects zero (`DivisionByZero`) and negative (`InvalidModulus`) moduli.
pub(super) fn check_modulus(modulus: &BigInteger) -> ArithResult<()> {
    match modulus.sign {
        Sign::Zero => Err(ArithError::DivisionByZero),
        Sign::Minus => Err(ArithError::InvalidModulus {
            reason: "modulus must be positive",
        }),
        Sign::Plus => Ok(()),
    }
}

fn divide_or_panic(lhs: &BigInteger, rhs: &BigInteger) -> BigInteger {
    match lhs.divide(rhs) {
        Ok(quotient) => quotient,
        Err(_) => panic!("attempt to divide by zero"),
    }
}

fn remainder_or_panic(lhs: &BigInteger, rhs: &BigInteger) -> BigInteger {
    match lhs.remainder(rhs) {
        Ok(remainder) => remainder,
        Err(_) => panic!("attempt to calculate the remainder with a divisor of zero"),
    }
}

/// Implements a binary operator for every owned/borrowed operand combination.
macro_rules! forward_binop {
    ($imp:ident, $method:ident, $func:path) => {
        impl $imp<&BigInteger> for &BigInteger {
            type Output = BigInteger;

            fn $method(self, rhs: &BigInteger) -> BigInteger {
                $func(self, rhs)
            }
        }

        impl $imp<BigInteger> for BigInteger {
            type Output = BigInteger;

            fn $method(self, rhs: BigInteger) -> BigInteger {
                $func(&self, &rhs)
            }
        }

        impl $imp<&BigInteger> for BigInteger {
            type Output = BigInteger;

            fn $method(self, rhs: &BigInteger) -> BigInteger {
                $func(&self, rhs)
            }
        }

        impl $imp<BigInteger> for &BigInteger {
            type Output = BigInteger;

            fn $method(self, rhs: BigInteger) -> BigInteger {
                $func(self, &rhs)
            }
        }
    };
}

pub(super) use forward_binop;

forward_binop!(Add, add, BigInteger::add);
forward_binop!(Sub, sub, BigInteger::subtract);
forward_binop!(Mul, mul, BigInteger::multiply);
forward_binop!(Div, div, divide_or_panic);
forward_binop!(Rem, rem, remainder_or_panic);

impl Neg for BigInteger {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            sign: -self.sign,
            limbs: self.limbs,
        }
    }
}

impl Neg for &BigInteger {
    type Output = BigInteger;

    fn neg(self) -> BigInteger {
        self.negate()
    }
}

impl std::iter::Sum for BigInteger {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, value| acc.add(&value))
    }
}

impl std::iter::Product for BigInteger {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::one(), |acc, value| acc.multiply(&value))
    }
}
