//! Parsing and formatting in radix 2..=36.
//!
//! Both directions work in chunks: as many radix digits as fit below
//! [`SMALL_MAX`] are folded into one `u64`, so a conversion takes one limb pass
//! per chunk instead of one per digit.

use std::{fmt, str::FromStr};

use super::BigInteger;
use crate::{
    error::{ArithError, ArithResult},
    limbs::{self, Limb, SMALL_MAX},
};

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Largest `k` with `radix^k < SMALL_MAX`, together with `radix^k`.
fn chunk(radix: u32) -> (usize, u64) {
    let radix = u64::from(radix);
    let (mut len, mut power) = (1, radix);
    while power * radix < SMALL_MAX {
        power *= radix;
        len += 1;
    }
    (len, power)
}

fn check_radix(operation: &'static str, radix: u32) -> ArithResult<()> {
    if (2..=36).contains(&radix) {
        Ok(())
    } else {
        Err(ArithError::invalid(operation, format!("radix {radix} is outside 2..=36")))
    }
}

fn split_sign(input: &str) -> (bool, &str) {
    match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    }
}

/// Horner evaluation of `body` in `radix`, one chunk at a time.
///
/// The leading chunk takes the leftover digits so every later chunk is full.
fn parse_magnitude(input: &str, body: &str, radix: u32) -> ArithResult<Vec<Limb>> {
    if body.is_empty() {
        return Err(ArithError::malformed(input, "no digits"));
    }
    let (chunk_len, _) = chunk(radix);
    let bytes = body.as_bytes();
    let head = bytes.len() % chunk_len;
    let mut magnitude = Vec::with_capacity(bytes.len() / 4 + 1);
    let pieces = std::iter::once(&bytes[..head]).chain(bytes[head..].chunks(chunk_len));
    for piece in pieces.filter(|piece| !piece.is_empty()) {
        let (mut value, mut scale) = (0u64, 1u64);
        for &byte in piece {
            let digit = char::from(byte)
                .to_digit(radix)
                .ok_or_else(|| ArithError::malformed(input, "invalid digit for radix"))?;
            value = value * u64::from(radix) + u64::from(digit);
            scale *= u64::from(radix);
        }
        limbs::mul_small_add(&mut magnitude, scale, value);
    }
    Ok(magnitude)
}

/// Digits of a magnitude in `radix`, most significant first, without sign.
fn format_magnitude(magnitude: &[Limb], radix: u32) -> String {
    if magnitude.is_empty() {
        return "0".to_owned();
    }
    let (chunk_len, divisor) = chunk(radix);
    let mut chunks = Vec::new();
    let mut rest = magnitude.to_vec();
    while !rest.is_empty() {
        let (quotient, remainder) = limbs::div_rem_small(&rest, divisor);
        chunks.push(remainder);
        rest = quotient;
    }
    let mut out = Vec::with_capacity(chunks.len() * chunk_len);
    let mut chunks = chunks.into_iter().rev();
    if let Some(first) = chunks.next() {
        push_chunk(&mut out, first, radix, 1);
    }
    for rest in chunks {
        push_chunk(&mut out, rest, radix, chunk_len);
    }
    // every byte comes from DIGITS
    out.into_iter().map(char::from).collect()
}

/// Appends `value` in `radix`, left-padded with zeros to at least `width` digits.
fn push_chunk(out: &mut Vec<u8>, mut value: u64, radix: u32, width: usize) {
    let start = out.len();
    let radix = u64::from(radix);
    loop {
        out.push(DIGITS[(value % radix) as usize]);
        value /= radix;
        if value == 0 && out.len() - start >= width {
            break;
        }
    }
    out[start..].reverse();
}

impl BigInteger {
    /// Parses an optionally signed digit string in `radix` (2..=36).
    ///
    /// Digits above 9 are letters in either case. No prefix is accepted here.
    pub fn from_str_radix(digits: &str, radix: u32) -> ArithResult<Self> {
        check_radix("from_str_radix", radix)?;
        let (negative, body) = split_sign(digits);
        parse_magnitude(digits, body, radix).map(|magnitude| Self::from_parts(negative, magnitude))
    }

    /// Formats this value in `radix` (2..=36) with lowercase letters.
    pub fn to_str_radix(&self, radix: u32) -> ArithResult<String> {
        check_radix("to_str_radix", radix)?;
        let digits = format_magnitude(&self.limbs, radix);
        Ok(if self.is_negative() { format!("-{digits}") } else { digits })
    }
}

/// Parses an optionally signed integer with an optional `0x`, `0o` or `0b`
/// prefix (any case); anything else is decimal.
impl FromStr for BigInteger {
    type Err = ArithError;

    fn from_str(input: &str) -> ArithResult<Self> {
        let (negative, body) = split_sign(input);
        let (radix, digits) = match body.get(..2) {
            Some(prefix) if prefix.eq_ignore_ascii_case("0x") => (16, &body[2..]),
            Some(prefix) if prefix.eq_ignore_ascii_case("0o") => (8, &body[2..]),
            Some(prefix) if prefix.eq_ignore_ascii_case("0b") => (2, &body[2..]),
            _ => (10, body),
        };
        parse_magnitude(input, digits, radix).map(|magnitude| Self::from_parts(negative, magnitude))
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.is_negative(), "", &format_magnitude(&self.limbs, 10))
    }
}

impl fmt::LowerHex for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.is_negative(), "0x", &format_magnitude(&self.limbs, 16))
    }
}

impl fmt::UpperHex for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = format_magnitude(&self.limbs, 16).to_ascii_uppercase();
        f.pad_integral(!self.is_negative(), "0x", &digits)
    }
}

impl fmt::Octal for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.is_negative(), "0o", &format_magnitude(&self.limbs, 8))
    }
}

impl fmt::Binary for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(!self.is_negative(), "0b", &format_magnitude(&self.limbs, 2))
    }
}

impl From<BigInteger> for String {
    fn from(value: BigInteger) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for BigInteger {
    type Error = ArithError;

    fn try_from(value: String) -> ArithResult<Self> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_stays_below_small_max() {
        assert_eq!(chunk(10), (14, 100_000_000_000_000));
        assert_eq!(chunk(2), (47, 1 << 47));
        for radix in 2..=36 {
            let (len, power) = chunk(radix);
            assert!(power < SMALL_MAX);
            assert_eq!(u64::from(radix).pow(len as u32), power);
            assert!(power * u64::from(radix) >= SMALL_MAX, "radix {radix}");
        }
    }

    #[test]
    fn inner_chunks_are_zero_padded() {
        let value: BigInteger = "100000000000000000000000000001".parse().unwrap();
        assert_eq!(value.to_string(), "100000000000000000000000000001");
        let value: BigInteger = "-0x1000000000000000000000001".parse().unwrap();
        assert_eq!(value.to_str_radix(16).unwrap(), "-1000000000000000000000001");
    }

    #[test]
    fn prefixes_and_signs() {
        assert_eq!("0xff".parse::<BigInteger>().unwrap(), BigInteger::from(255));
        assert_eq!("-0B101".parse::<BigInteger>().unwrap(), BigInteger::from(-5));
        assert_eq!("+0o17".parse::<BigInteger>().unwrap(), BigInteger::from(15));
        assert_eq!("-0".parse::<BigInteger>().unwrap(), BigInteger::ZERO);
        assert_eq!("007".parse::<BigInteger>().unwrap(), BigInteger::from(7));
    }

    #[test]
    fn malformed_inputs() {
        for input in ["", "-", "0x", "12a", "1 2", "--1", "0x-1", "١٢"] {
            assert!(
                matches!(
                    input.parse::<BigInteger>(),
                    Err(ArithError::MalformedNumericLiteral { .. })
                ),
                "{input:?}"
            );
        }
        assert!(matches!(
            BigInteger::from_str_radix("10", 37),
            Err(ArithError::InvalidArgument { .. })
        ));
        assert!(matches!(BigInteger::ZERO.to_str_radix(1), Err(ArithError::InvalidArgument { .. })));
    }

    #[test]
    fn radix_36_uses_letters() {
        let value = BigInteger::from_str_radix("Zz", 36).unwrap();
        assert_eq!(value, BigInteger::from(35 * 36 + 35));
        assert_eq!(value.to_str_radix(36).unwrap(), "zz");
    }

    #[test]
    fn formatter_flags() {
        let value = BigInteger::from(-255);
        assert_eq!(format!("{value:>6}"), "  -255");
        assert_eq!(format!("{value:#x}"), "-0xff");
        assert_eq!(format!("{:X}", BigInteger::from(255)), "FF");
        assert_eq!(format!("{:b}", BigInteger::from(5)), "101");
        assert_eq!(format!("{:o}", BigInteger::ZERO), "0");
    }
}
