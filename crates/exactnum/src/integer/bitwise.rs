//! Bitwise logic and shifts with two's-complement semantics.
//!
//! The representation is sign-magnitude, so each negative operand is first
//! materialized in two's complement over one limb more than the wider operand
//! (leaving room for the sign bit). The limb-wise result is converted back to
//! sign-magnitude when its sign bit is set.

use std::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

use super::{BigInteger, arith::forward_binop};
use crate::limbs::{self, Limb};

impl BigInteger {
    fn bitwise(&self, other: &Self, op: impl Fn(Limb, Limb) -> Limb) -> Self {
        let len = self.limbs.len().max(other.limbs.len()) + 1;
        let lhs = limbs::to_twos_complement(&self.limbs, self.is_negative(), len);
        let rhs = limbs::to_twos_complement(&other.limbs, other.is_negative(), len);
        let image = lhs.iter().zip(&rhs).map(|(&a, &b)| op(a, b)).collect();
        let (negative, magnitude) = limbs::from_twos_complement(image);
        Self::from_parts(negative, magnitude)
    }

    /// Bitwise AND; negative only when both operands are negative.
    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        self.bitwise(other, |a, b| a & b)
    }

    /// Bitwise OR; negative when either operand is negative.
    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        self.bitwise(other, |a, b| a | b)
    }

    /// Bitwise XOR; negative when exactly one operand is negative.
    #[must_use]
    pub fn xor(&self, other: &Self) -> Self {
        self.bitwise(other, |a, b| a ^ b)
    }

    /// `self & !other`.
    #[must_use]
    pub fn and_not(&self, other: &Self) -> Self {
        self.bitwise(other, |a, b| a & !b)
    }

    /// Bitwise complement, `-self - 1`.
    #[must_use]
    pub fn not(&self) -> Self {
        self.negate().subtract(&Self::one())
    }

    /// Whether bit `index` is set in the two's-complement form.
    #[must_use]
    pub fn test_bit(&self, index: u64) -> bool {
        if self.is_negative() {
            // -x has the complemented bits of x - 1
            !limbs::test_bit(self.abs().subtract(&Self::one()).limbs(), index)
        } else {
            limbs::test_bit(&self.limbs, index)
        }
    }

    /// Returns a copy with bit `index` set.
    #[must_use]
    pub fn set_bit(&self, index: u64) -> Self {
        self.or(&Self::one().shift_left_u64(index))
    }

    /// Returns a copy with bit `index` cleared.
    #[must_use]
    pub fn clear_bit(&self, index: u64) -> Self {
        self.and_not(&Self::one().shift_left_u64(index))
    }

    /// Returns a copy with bit `index` flipped.
    #[must_use]
    pub fn flip_bit(&self, index: u64) -> Self {
        self.xor(&Self::one().shift_left_u64(index))
    }

    /// `self * 2^bits`; a negative count shifts right.
    #[must_use]
    pub fn shift_left(&self, bits: i64) -> Self {
        if bits < 0 {
            self.shift_right_u64(bits.unsigned_abs())
        } else {
            self.shift_left_u64(bits.unsigned_abs())
        }
    }

    /// `floor(self / 2^bits)`; a negative count shifts left.
    ///
    /// Negative values round toward negative infinity, matching an arithmetic
    /// shift of the two's-complement form.
    #[must_use]
    pub fn shift_right(&self, bits: i64) -> Self {
        if bits < 0 {
            self.shift_left_u64(bits.unsigned_abs())
        } else {
            self.shift_right_u64(bits.unsigned_abs())
        }
    }

    pub(crate) fn shift_left_u64(&self, bits: u64) -> Self {
        Self::from_parts(self.is_negative(), limbs::shl(&self.limbs, bits))
    }

    pub(crate) fn shift_right_u64(&self, bits: u64) -> Self {
        let mut magnitude = limbs::shr(&self.limbs, bits);
        if self.is_negative() && limbs::any_low_bits(&self.limbs, bits) {
            limbs::increment(&mut magnitude);
        }
        Self::from_parts(self.is_negative(), magnitude)
    }
}

forward_binop!(BitAnd, bitand, BigInteger::and);
forward_binop!(BitOr, bitor, BigInteger::or);
forward_binop!(BitXor, bitxor, BigInteger::xor);

impl Not for BigInteger {
    type Output = Self;

    fn not(self) -> Self {
        Self::not(&self)
    }
}

impl Not for &BigInteger {
    type Output = BigInteger;

    fn not(self) -> BigInteger {
        BigInteger::not(self)
    }
}

impl Shl<u64> for BigInteger {
    type Output = Self;

    fn shl(self, bits: u64) -> Self {
        self.shift_left_u64(bits)
    }
}

impl Shl<u64> for &BigInteger {
    type Output = BigInteger;

    fn shl(self, bits: u64) -> BigInteger {
        self.shift_left_u64(bits)
    }
}

impl Shr<u64> for BigInteger {
    type Output = Self;

    fn shr(self, bits: u64) -> Self {
        self.shift_right_u64(bits)
    }
}

impl Shr<u64> for &BigInteger {
    type Output = BigInteger;

    fn shr(self, bits: u64) -> BigInteger {
        self.shift_right_u64(bits)
    }
}
