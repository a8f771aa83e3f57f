//! Arbitrary precision signed integers.
//!
//! `BigInteger` is sign-magnitude: a [`Sign`] plus a normalized little-endian
//! vector of 16-bit limbs (see [`crate::limbs`]). Values are immutable to callers;
//! every operation builds its result in a private scratch vector and hands it to
//! [`BigInteger::from_parts`], which re-establishes the invariant (no high zero
//! limbs, sign is `Zero` exactly when the magnitude is empty).
//!
//! The operations are split by concern:
//! - `arith`: add/sub/mul/div/rem/mod, powers, modular exponentiation
//! - `bitwise`: two's-complement emulated logic and shifts
//! - `number_theory`: gcd family, square roots, primality, random values
//! - `radix`: parsing and formatting in radix 2..=36
//! - `convert`: primitive conversions and `num-traits` integration

mod arith;
mod bitwise;
mod convert;
mod number_theory;
mod radix;

use std::{cmp::Ordering, fmt};

pub use convert::ToBigInteger;
pub use number_theory::DEFAULT_CERTAINTY;
pub(crate) use convert::f64_parts;

use crate::limbs::{self, Limb};

/// Sign of a [`BigInteger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sign {
    Minus,
    Zero,
    Plus,
}

impl Sign {
    /// `-1`, `0` or `1`.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Minus => -1,
            Self::Zero => 0,
            Self::Plus => 1,
        }
    }

    /// Sign of a product of values with signs `self` and `other`.
    #[must_use]
    pub fn product(self, other: Self) -> Self {
        match (self, other) {
            (Self::Zero, _) | (_, Self::Zero) => Self::Zero,
            (a, b) if a == b => Self::Plus,
            _ => Self::Minus,
        }
    }
}

impl std::ops::Neg for Sign {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Self::Minus => Self::Plus,
            Self::Zero => Self::Zero,
            Self::Plus => Self::Minus,
        }
    }
}

/// Immutable arbitrary precision integer.
///
/// Serializes as its decimal string.
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BigInteger {
    sign: Sign,
    limbs: Vec<Limb>,
}

impl BigInteger {
    /// The canonical zero.
    pub const ZERO: Self = Self {
        sign: Sign::Zero,
        limbs: Vec::new(),
    };

    /// Builds a value from a sign flag and a scratch magnitude, normalizing both.
    pub(crate) fn from_parts(negative: bool, mut limbs: Vec<Limb>) -> Self {
        limbs::trim(&mut limbs);
        let sign = match (limbs.is_empty(), negative) {
            (true, _) => Sign::Zero,
            (false, true) => Sign::Minus,
            (false, false) => Sign::Plus,
        };
        Self { sign, limbs }
    }

    /// Builds a non-negative value from a scratch magnitude.
    pub(crate) fn from_magnitude(limbs: Vec<Limb>) -> Self {
        Self::from_parts(false, limbs)
    }

    /// The value one.
    #[must_use]
    pub fn one() -> Self {
        Self::from_magnitude(vec![1])
    }

    /// Builds `10^exponent`.
    #[must_use]
    pub fn ten_pow(exponent: u64) -> Self {
        Self::from(10u8).pow_u64(exponent)
    }

    /// Sign of this value.
    #[must_use]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// `-1`, `0` or `1`.
    #[must_use]
    pub fn signum(&self) -> i32 {
        self.sign.as_i32()
    }

    /// Little-endian 16-bit limbs of the magnitude (empty for zero).
    #[must_use]
    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    /// Whether this is the canonical zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.sign == Sign::Zero
    }

    /// Whether this value is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.sign == Sign::Minus
    }

    /// Whether this value is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.sign == Sign::Plus
    }

    /// Whether the magnitude is one.
    #[must_use]
    pub fn is_one_abs(&self) -> bool {
        self.limbs == [1]
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self::from_magnitude(self.limbs.clone())
    }

    /// Additive inverse.
    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            sign: -self.sign,
            limbs: self.limbs.clone(),
        }
    }

    /// Compares magnitudes, ignoring signs.
    #[must_use]
    pub fn compare_abs(&self, other: &Self) -> Ordering {
        limbs::cmp(&self.limbs, &other.limbs)
    }

    /// Number of bits in the magnitude (0 for zero).
    #[must_use]
    pub fn bit_length(&self) -> u64 {
        limbs::bit_length(&self.limbs)
    }

    /// Index of the lowest set bit of the magnitude, `None` for zero.
    #[must_use]
    pub fn lowest_set_bit(&self) -> Option<u64> {
        limbs::lowest_set_bit(&self.limbs)
    }

    /// Number of set bits in the magnitude.
    #[must_use]
    pub fn bit_count(&self) -> u64 {
        self.limbs.iter().map(|limb| u64::from(limb.count_ones())).sum()
    }

    /// Number of decimal digits in the magnitude (1 for zero).
    #[must_use]
    pub fn decimal_digits(&self) -> u64 {
        self.abs().to_string().len() as u64
    }
}

impl Ord for BigInteger {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sign.cmp(&other.sign).then_with(|| match self.sign {
            Sign::Zero => Ordering::Equal,
            Sign::Plus => self.compare_abs(other),
            Sign::Minus => other.compare_abs(self),
        })
    }
}

impl PartialOrd for BigInteger {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Default for BigInteger {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInteger({self})")
    }
}
