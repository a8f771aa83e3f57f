//! Arbitrary precision decimals.
//!
//! A [`BigDecimal`] is an unscaled [`BigInteger`] and an `i64` scale; its value is
//! `unscaled * 10^-scale`. Each value also remembers the [`MathContext`] that
//! plain operations round to, captured from the thread default when the value is
//! built and inherited by every result derived from it.
//!
//! Equality, ordering and hashing are by numeric value (`2.0 == 2.00`);
//! [`BigDecimal::same_representation`] compares scales as well.
//!
//! The operations are split by concern:
//! - `arith`: add/sub/mul, powers, square root, operator traits
//! - `divide`: long division, the Newton reciprocal path, integral division
//! - `scale`: `set_scale`, `round`, trailing-zero stripping, point moves
//! - `format`: plain, scientific and engineering strings
//! - `constants`: PI and E with a small per-thread cache

mod arith;
pub(crate) mod constants;
mod divide;
mod format;
mod scale;

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
    sync::OnceLock,
};

use num_traits::{One, Zero};

use crate::{
    context::{MathContext, default_context},
    error::{ArithError, ArithResult},
    integer::{BigInteger, Sign, ToBigInteger, f64_parts},
};

/// Immutable arbitrary precision decimal.
///
/// Serializes as `{unscaled, scale, context}`.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
pub struct BigDecimal {
    unscaled: BigInteger,
    scale: i64,
    context: MathContext,
    /// Decimal digits of `|unscaled|`, filled on first use.
    #[serde(skip)]
    digits: OnceLock<String>,
}

impl BigDecimal {
    pub(crate) fn from_parts(unscaled: BigInteger, scale: i64, context: MathContext) -> Self {
        Self {
            unscaled,
            scale,
            context,
            digits: OnceLock::new(),
        }
    }

    /// Builds `unscaled * 10^-scale` with the thread's default context.
    #[must_use]
    pub fn new(unscaled: BigInteger, scale: i64) -> Self {
        Self::from_parts(unscaled, scale, default_context())
    }

    /// Shortest decimal that reads back as `value`, e.g. `0.1` for `0.1_f64`.
    pub fn from_f64(value: f64) -> ArithResult<Self> {
        if !value.is_finite() {
            return Err(ArithError::invalid("from_f64", format!("{value} is not finite")));
        }
        ryu::Buffer::new().format_finite(value).parse()
    }

    /// The exact binary value of `value`, e.g. 55 fractional digits for `0.1_f64`.
    pub fn from_f64_exact(value: f64) -> ArithResult<Self> {
        if !value.is_finite() {
            return Err(ArithError::invalid("from_f64_exact", format!("{value} is not finite")));
        }
        let (negative, mantissa, exponent) = f64_parts(value);
        if mantissa == 0 {
            return Ok(Self::default());
        }
        // value = mantissa / 2^k = mantissa * 5^k / 10^k once even factors are gone
        let twos = u64::from(mantissa.trailing_zeros()).min(if exponent < 0 { exponent.unsigned_abs() } else { 0 });
        let (mantissa, exponent) = (mantissa >> twos, exponent + twos as i64);
        let magnitude = BigInteger::from(mantissa);
        let (magnitude, scale) = if exponent >= 0 {
            (magnitude.shift_left_u64(exponent.unsigned_abs()), 0)
        } else {
            let fives = BigInteger::from(5u8).pow_u64(exponent.unsigned_abs());
            (magnitude.multiply(&fives), -exponent)
        };
        Ok(Self::new(if negative { magnitude.negate() } else { magnitude }, scale))
    }

    /// A value derived from `self`: same default context, new digits.
    pub(crate) fn derive(&self, unscaled: BigInteger, scale: i64) -> Self {
        Self::from_parts(unscaled, scale, self.context)
    }

    /// Returns a copy that rounds plain operations to `context`.
    #[must_use]
    pub fn with_default_context(&self, context: MathContext) -> Self {
        Self {
            context,
            ..self.clone()
        }
    }

    /// The unscaled value.
    #[must_use]
    pub fn unscaled(&self) -> &BigInteger {
        &self.unscaled
    }

    /// Power-of-ten scale; negative scales imply trailing zeros.
    #[must_use]
    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Context applied by plain arithmetic on this value.
    #[must_use]
    pub fn context(&self) -> MathContext {
        self.context
    }

    /// Decimal digits of the unscaled magnitude.
    pub(crate) fn digits(&self) -> &str {
        self.digits.get_or_init(|| self.unscaled.abs().to_string())
    }

    /// Number of significant digits in the unscaled value (1 for zero).
    #[must_use]
    pub fn precision(&self) -> u64 {
        self.digits().len() as u64
    }

    /// Exponent of the leading digit in scientific notation.
    ///
    /// Widened so scales near either end of the `i64` range still have one.
    pub(crate) fn adjusted_exponent(&self) -> i128 {
        i128::from(self.precision()) - 1 - i128::from(self.scale)
    }

    /// `-1`, `0` or `1`.
    #[must_use]
    pub fn signum(&self) -> i32 {
        self.unscaled.signum()
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.unscaled.is_negative()
    }

    /// Whether unscaled value and scale are both identical (`2.0` and `2.00` are not).
    #[must_use]
    pub fn same_representation(&self, other: &Self) -> bool {
        self.scale == other.scale && self.unscaled == other.unscaled
    }

    /// Both unscaled values brought to the larger of the two scales.
    pub(crate) fn aligned(&self, other: &Self) -> (BigInteger, BigInteger, i64) {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => (self.unscaled.clone(), other.unscaled.clone(), self.scale),
            Ordering::Less => {
                let factor = BigInteger::ten_pow(other.scale.abs_diff(self.scale));
                (self.unscaled.multiply(&factor), other.unscaled.clone(), other.scale)
            }
            Ordering::Greater => {
                let factor = BigInteger::ten_pow(self.scale.abs_diff(other.scale));
                (self.unscaled.clone(), other.unscaled.multiply(&factor), self.scale)
            }
        }
    }

    /// Whether `|self - other| <= tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: &Self) -> bool {
        let (a, b, scale) = self.aligned(other);
        let difference = self.derive(a.subtract(&b).abs(), scale);
        difference <= *tolerance
    }
}

fn split_sign(input: &str) -> (bool, &str) {
    match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    }
}

/// Parses `[+-]digits[.digits][(e|E)[+-]digits]`; at least one mantissa digit is required.
impl FromStr for BigDecimal {
    type Err = ArithError;

    fn from_str(input: &str) -> ArithResult<Self> {
        let (negative, body) = split_sign(input);
        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };
        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ArithError::malformed(input, "no digits"));
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|byte| byte.is_ascii_digit()) {
            return Err(ArithError::malformed(input, "invalid digit"));
        }
        let exponent = match exponent {
            None => 0,
            Some(text) => text
                .parse::<i64>()
                .map_err(|_| ArithError::malformed(input, "invalid exponent"))?,
        };
        let scale = i64::try_from(frac_part.len())
            .ok()
            .and_then(|len| len.checked_sub(exponent))
            .ok_or_else(|| ArithError::malformed(input, "exponent out of range"))?;
        let magnitude = BigInteger::from_str_radix(&format!("{int_part}{frac_part}"), 10)?;
        let unscaled = if negative { magnitude.negate() } else { magnitude };
        Ok(Self::new(unscaled, scale))
    }
}

impl TryFrom<&str> for BigDecimal {
    type Error = ArithError;

    fn try_from(value: &str) -> ArithResult<Self> {
        value.parse()
    }
}

impl From<BigInteger> for BigDecimal {
    fn from(value: BigInteger) -> Self {
        Self::new(value, 0)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for BigDecimal {
            fn from(value: $t) -> Self {
                Self::new(BigInteger::from(value), 0)
            }
        }
    )*};
}

impl_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl ToBigInteger for BigDecimal {
    fn to_big_integer(&self) -> BigInteger {
        BigDecimal::to_big_integer(self)
    }
}

/// Unwraps a checked scale computation, failing when it left the `i64` range.
pub(crate) fn checked_scale(scale: Option<i64>) -> ArithResult<i64> {
    scale.ok_or(ArithError::ScaleOverflow)
}

impl PartialEq for BigDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigDecimal {}

impl Ord for BigDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_sign = self.unscaled.sign().cmp(&other.unscaled.sign());
        if by_sign != Ordering::Equal || self.unscaled.sign() == Sign::Zero {
            return by_sign;
        }
        let by_magnitude = self
            .adjusted_exponent()
            .cmp(&other.adjusted_exponent())
            .then_with(|| {
                let (a, b, _) = self.aligned(other);
                a.compare_abs(&b)
            });
        if self.is_negative() { by_magnitude.reverse() } else { by_magnitude }
    }
}

impl PartialOrd for BigDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Hashes the trailing-zero-stripped form, so equal values hash equally.
impl Hash for BigDecimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let stripped = self.strip_trailing_zeros();
        stripped.unscaled.hash(state);
        stripped.scale.hash(state);
    }
}

impl Default for BigDecimal {
    fn default() -> Self {
        Self::new(BigInteger::ZERO, 0)
    }
}

impl Zero for BigDecimal {
    fn zero() -> Self {
        Self::default()
    }

    fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }
}

impl One for BigDecimal {
    fn one() -> Self {
        Self::new(BigInteger::one(), 0)
    }
}

impl fmt::Debug for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigDecimal({self})")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn dec(text: &str) -> BigDecimal {
        text.parse().unwrap()
    }

    fn hash_of(value: &BigDecimal) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn parse_sets_scale_from_fraction_and_exponent() {
        let value = dec("-12.345e1");
        assert_eq!(value.unscaled(), &BigInteger::from(-12_345));
        assert_eq!(value.scale(), 2);
        assert_eq!(dec("1E+3").scale(), -3);
        assert_eq!(dec(".5").scale(), 1);
        assert_eq!(dec("5.").scale(), 0);
        assert_eq!(dec("0.000").precision(), 1);
    }

    #[test]
    fn parse_rejects_malformed_literals() {
        for input in ["", ".", "-", "1e", "1.2.3", "e5", "1e5.0", " 1", "1_000", "0x10"] {
            assert!(
                matches!(input.parse::<BigDecimal>(), Err(ArithError::MalformedNumericLiteral { .. })),
                "{input:?}"
            );
        }
    }

    #[test]
    fn equality_ignores_scale_but_representation_does_not() {
        assert_eq!(dec("2.0"), dec("2.00"));
        assert_eq!(hash_of(&dec("2.0")), hash_of(&dec("2.00")));
        assert_eq!(hash_of(&dec("0E+5")), hash_of(&dec("0.000")));
        assert!(!dec("2.0").same_representation(&dec("2.00")));
        assert!(dec("2.0").same_representation(&dec("2.0")));
    }

    #[test]
    fn ordering_across_scales_and_signs() {
        let sorted = ["-1E+3", "-999.9", "-0.001", "0", "1E-10", "0.5", "12", "1.2E+2"];
        for pair in sorted.windows(2) {
            assert!(dec(pair[0]) < dec(pair[1]), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn from_f64_shortest_and_exact() {
        assert_eq!(BigDecimal::from_f64(0.1).unwrap().to_string(), "0.1");
        assert_eq!(BigDecimal::from_f64(-2.5e-8).unwrap().to_string(), "-2.5E-8");
        assert_eq!(
            BigDecimal::from_f64_exact(0.1).unwrap().to_string(),
            "0.1000000000000000055511151231257827021181583404541015625"
        );
        assert_eq!(BigDecimal::from_f64_exact(2.0).unwrap().to_string(), "2");
        assert_eq!(BigDecimal::from_f64_exact(-0.5).unwrap().to_string(), "-0.5");
        assert_eq!(BigDecimal::from_f64_exact(1e20).unwrap().to_plain_string(), "100000000000000000000");
        assert!(BigDecimal::from_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn approx_eq_uses_tolerance() {
        assert!(dec("1.0001").approx_eq(&dec("1"), &dec("0.001")));
        assert!(!dec("1.01").approx_eq(&dec("1"), &dec("0.001")));
    }
}
