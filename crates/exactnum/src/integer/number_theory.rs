//! Number theory: gcd family, integer square root, primality, random values.

use rand::RngCore;

use super::{BigInteger, arith::check_modulus};
use crate::{
    error::{ArithError, ArithResult},
    limbs::{self, LIMB_BITS},
    limits::Limits,
    random::{next_limb, with_default_rng},
    tracer::{ArithTracer, NoopTracer},
};

/// Miller-Rabin rounds used when the caller does not pick a certainty.
pub const DEFAULT_CERTAINTY: u32 = 50;

impl BigInteger {
    /// Greatest common divisor of the magnitudes (iterative Euclid); `gcd(0, 0) == 0`.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        let mut a = self.abs();
        let mut b = other.abs();
        while !b.is_zero() {
            let (_, remainder) = limbs::div_rem(&a.limbs, &b.limbs);
            a = std::mem::replace(&mut b, Self::from_magnitude(remainder));
        }
        a
    }

    /// Extended Euclid: returns `(g, x, y)` with `self * x + other * y == g` and `g >= 0`.
    #[must_use]
    pub fn extended_gcd(&self, other: &Self) -> (Self, Self, Self) {
        let (mut old_r, mut r) = (self.clone(), other.clone());
        let (mut old_x, mut x) = (Self::one(), Self::ZERO);
        let (mut old_y, mut y) = (Self::ZERO, Self::one());
        while !r.is_zero() {
            let Ok((quotient, remainder)) = old_r.div_rem(&r) else {
                break;
            };
            old_r = std::mem::replace(&mut r, remainder);
            let next_x = old_x.subtract(&quotient.multiply(&x));
            old_x = std::mem::replace(&mut x, next_x);
            let next_y = old_y.subtract(&quotient.multiply(&y));
            old_y = std::mem::replace(&mut y, next_y);
        }
        if old_r.is_negative() {
            (old_r.negate(), old_x.negate(), old_y.negate())
        } else {
            (old_r, old_x, old_y)
        }
    }

    /// Least common multiple of the magnitudes; zero if either operand is zero.
    #[must_use]
    pub fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::ZERO;
        }
        let gcd = self.gcd(other);
        let (quotient, _) = limbs::div_rem(&self.limbs, &gcd.limbs);
        Self::from_magnitude(quotient).multiply(&other.abs())
    }

    /// Multiplicative inverse modulo a positive `modulus`, in `[0, modulus)`.
    ///
    /// Fails with `InvalidModulus` when `modulus <= 0` (zero included, since no
    /// residue ring exists to invert in) or when `gcd(self, modulus) != 1`.
    pub fn mod_inverse(&self, modulus: &Self) -> ArithResult<Self> {
        if modulus.is_zero() {
            return Err(ArithError::InvalidModulus {
                reason: "modulus must be positive",
            });
        }
        check_modulus(modulus)?;
        let (gcd, x, _) = self.modulo(modulus)?.extended_gcd(modulus);
        if !gcd.is_one_abs() {
            return Err(ArithError::InvalidModulus {
                reason: "value and modulus are not coprime",
            });
        }
        x.modulo(modulus)
    }

    /// Floor of the square root.
    pub fn sqrt(&self) -> ArithResult<Self> {
        self.sqrt_rem().map(|(root, _)| root)
    }

    /// Floor square root and the remainder `self - root^2`.
    pub fn sqrt_rem(&self) -> ArithResult<(Self, Self)> {
        if self.is_negative() {
            return Err(ArithError::NegativeSquareRoot);
        }
        if self.is_zero() {
            return Ok((Self::ZERO, Self::ZERO));
        }
        // Newton from above: 2^ceil(bits/2) >= sqrt(self)
        let mut x = Self::one().shift_left_u64(self.bit_length().div_ceil(2));
        loop {
            let (quotient, _) = limbs::div_rem(&self.limbs, &x.limbs);
            let y = x.add(&Self::from_magnitude(quotient)).shift_right_u64(1);
            if y >= x {
                break;
            }
            x = y;
        }
        let remainder = self.subtract(&x.multiply(&x));
        Ok((x, remainder))
    }

    /// Miller-Rabin test with `certainty` rounds using the thread's default random source.
    #[must_use]
    pub fn is_probable_prime(&self, certainty: u32) -> bool {
        with_default_rng(|rng| self.miller_rabin(certainty, rng, &mut NoopTracer))
    }

    /// Miller-Rabin test drawing witnesses from `rng`.
    #[must_use]
    pub fn is_probable_prime_with(&self, certainty: u32, rng: &mut impl RngCore) -> bool {
        self.miller_rabin(certainty, rng, &mut NoopTracer)
    }

    /// Miller-Rabin on `|self|`.
    ///
    /// Writes `n - 1 = 2^s * d`, then for each round draws a witness `a` in
    /// `[1, n)` and checks whether `a^d mod n` reaches `1` or `n - 1` within `s`
    /// squarings.
    pub(crate) fn miller_rabin(&self, certainty: u32, rng: &mut impl RngCore, tracer: &mut impl ArithTracer) -> bool {
        let n = self.abs();
        let two = Self::from(2u8);
        match n.cmp(&two) {
            std::cmp::Ordering::Less => return false,
            std::cmp::Ordering::Equal => return true,
            std::cmp::Ordering::Greater => {}
        }
        if !limbs::test_bit(&n.limbs, 0) {
            return false;
        }
        let n_minus_one = n.subtract(&Self::one());
        let s = n_minus_one.lowest_set_bit().unwrap_or(0);
        let d = n_minus_one.shift_right_u64(s);
        for round in 1..=certainty {
            let witness = loop {
                let candidate = Self::random_below(&n, rng);
                if !candidate.is_zero() {
                    break candidate;
                }
            };
            let composite = is_composite_witness(&witness, &n, &n_minus_one, &d, s);
            tracer.on_witness_round(round, composite);
            if composite {
                return false;
            }
        }
        true
    }

    /// Random `bits`-bit probable prime using the thread's default random source.
    pub fn probable_prime(bits: u64, certainty: u32) -> ArithResult<Self> {
        with_default_rng(|rng| Self::probable_prime_with(bits, certainty, rng))
    }

    /// Random `bits`-bit probable prime drawing candidates from `rng`.
    pub fn probable_prime_with(bits: u64, certainty: u32, rng: &mut impl RngCore) -> ArithResult<Self> {
        Self::probable_prime_traced(bits, certainty, rng, &Limits::default(), &mut NoopTracer)
    }

    /// Draws odd candidates with the top bit set until one passes Miller-Rabin,
    /// giving up after `limits.prime_max_attempts` candidates.
    pub(crate) fn probable_prime_traced(
        bits: u64,
        certainty: u32,
        rng: &mut impl RngCore,
        limits: &Limits,
        tracer: &mut impl ArithTracer,
    ) -> ArithResult<Self> {
        if bits < 2 {
            return Err(ArithError::invalid("probable_prime", "bit length must be at least 2"));
        }
        for attempt in 1..=limits.prime_max_attempts {
            tracer.on_prime_candidate(attempt);
            let candidate = Self::random_bits(bits, rng).set_bit(bits - 1).set_bit(0);
            if candidate.miller_rabin(certainty, rng, tracer) {
                return Ok(candidate);
            }
        }
        Err(ArithError::PrimeGenerationExhausted {
            bits,
            attempts: limits.prime_max_attempts,
        })
    }

    /// Smallest probable prime strictly greater than `self` (at least 2), using
    /// the thread's default random source.
    #[must_use]
    pub fn next_probable_prime(&self) -> Self {
        with_default_rng(|rng| self.next_probable_prime_traced(DEFAULT_CERTAINTY, rng, &mut NoopTracer))
    }

    /// Walks the odd numbers above `self` until one passes Miller-Rabin.
    pub(crate) fn next_probable_prime_traced(
        &self,
        certainty: u32,
        rng: &mut impl RngCore,
        tracer: &mut impl ArithTracer,
    ) -> Self {
        let two = Self::from(2u8);
        let mut candidate = self.add(&Self::one());
        if candidate <= two {
            return two;
        }
        if !limbs::test_bit(&candidate.limbs, 0) {
            candidate = candidate.add(&Self::one());
        }
        let mut attempt = 1;
        loop {
            tracer.on_prime_candidate(attempt);
            if candidate.miller_rabin(certainty, rng, tracer) {
                return candidate;
            }
            candidate = candidate.add(&two);
            attempt += 1;
        }
    }

    /// Uniformly random value in `[0, 2^bits)`.
    #[must_use]
    pub fn random_bits(bits: u64, rng: &mut impl RngCore) -> Self {
        let count = bits.div_ceil(LIMB_BITS) as usize;
        let mut magnitude: Vec<_> = (0..count).map(|_| next_limb(rng)).collect();
        let spare = count as u64 * LIMB_BITS - bits;
        if let Some(top) = magnitude.last_mut() {
            *top >>= spare;
        }
        Self::from_magnitude(magnitude)
    }

    /// Uniformly random value in `[0, bound)` by rejection sampling; `bound` must be positive.
    pub(crate) fn random_below(bound: &Self, rng: &mut impl RngCore) -> Self {
        let bits = bound.bit_length();
        loop {
            let candidate = Self::random_bits(bits, rng);
            if candidate.compare_abs(bound).is_lt() {
                return candidate;
            }
        }
    }
}

/// One Miller-Rabin round: whether `witness` proves `n` composite.
fn is_composite_witness(witness: &BigInteger, n: &BigInteger, n_minus_one: &BigInteger, d: &BigInteger, s: u64) -> bool {
    let Ok(mut y) = witness.mod_pow(d, n) else {
        return true;
    };
    if y.is_one_abs() || y == *n_minus_one {
        return false;
    }
    for _ in 1..s {
        y = match y.multiply(&y).remainder(n) {
            Ok(next) => next,
            Err(_) => return true,
        };
        if y == *n_minus_one {
            return false;
        }
        if y.is_one_abs() {
            return true;
        }
    }
    true
}
