//! Limb store: unsigned magnitudes as little-endian base-65536 digits.
//!
//! Every function here works on magnitudes only; signs are handled by
//! [`BigInteger`](crate::BigInteger). A magnitude is *normalized* when its last
//! (most significant) limb is non-zero; zero is the empty slice. Functions
//! returning a `Vec` always return a normalized one, and functions taking slices
//! expect normalized input unless stated otherwise.

use std::cmp::Ordering;

/// One base-65536 digit.
pub(crate) type Limb = u16;

/// Bits per limb.
pub(crate) const LIMB_BITS: u64 = 16;

/// Largest small divisor/multiplier accepted by the `*_small` helpers.
///
/// `limb * SMALL_MAX + carry` and `remainder << 16 | limb` both stay below `2^64`.
pub(crate) const SMALL_MAX: u64 = 1 << 48;

/// Drops high zero limbs so the magnitude is normalized.
pub(crate) fn trim(limbs: &mut Vec<Limb>) {
    while limbs.last() == Some(&0) {
        limbs.pop();
    }
}

/// Splits a `u128` into normalized limbs.
pub(crate) fn from_u128(mut value: u128) -> Vec<Limb> {
    let mut limbs = Vec::with_capacity(8);
    while value != 0 {
        limbs.push(value as Limb);
        value >>= LIMB_BITS;
    }
    limbs
}

/// Reassembles a magnitude into a `u128`, if it fits.
pub(crate) fn to_u128(limbs: &[Limb]) -> Option<u128> {
    if limbs.len() > 8 {
        return None;
    }
    Some(
        limbs
            .iter()
            .rev()
            .fold(0u128, |acc, &limb| (acc << LIMB_BITS) | u128::from(limb)),
    )
}

/// Compares two magnitudes.
pub(crate) fn cmp(a: &[Limb], b: &[Limb]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.iter().rev().cmp(b.iter().rev()))
}

/// Number of significant bits (0 for zero).
pub(crate) fn bit_length(limbs: &[Limb]) -> u64 {
    match limbs.last() {
        None => 0,
        Some(&top) => (limbs.len() as u64 - 1) * LIMB_BITS + u64::from(Limb::BITS - top.leading_zeros()),
    }
}

/// Whether bit `index` is set.
pub(crate) fn test_bit(limbs: &[Limb], index: u64) -> bool {
    usize::try_from(index / LIMB_BITS)
        .ok()
        .and_then(|i| limbs.get(i))
        .is_some_and(|&limb| (limb >> (index % LIMB_BITS)) & 1 == 1)
}

/// Index of the lowest set bit, `None` for zero.
pub(crate) fn lowest_set_bit(limbs: &[Limb]) -> Option<u64> {
    limbs
        .iter()
        .position(|&limb| limb != 0)
        .map(|i| i as u64 * LIMB_BITS + u64::from(limbs[i].trailing_zeros()))
}

/// Ripple-carry addition.
pub(crate) fn add(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut out = Vec::with_capacity(long.len() + 1);
    let mut carry = 0u32;
    for (i, &limb) in long.iter().enumerate() {
        let sum = u32::from(limb) + u32::from(short.get(i).copied().unwrap_or(0)) + carry;
        out.push(sum as Limb);
        carry = sum >> LIMB_BITS;
    }
    if carry != 0 {
        out.push(carry as Limb);
    }
    out
}

/// `a - b` with borrow propagation; requires `a >= b`.
pub(crate) fn sub(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    let mut out = a.to_vec();
    sub_assign(&mut out, b);
    out
}

/// In-place `a -= b`; requires `a >= b`.
pub(crate) fn sub_assign(a: &mut Vec<Limb>, b: &[Limb]) {
    debug_assert!(cmp(a, b) != Ordering::Less, "magnitude subtraction would underflow");
    let mut borrow = 0i32;
    for i in 0..a.len() {
        if i >= b.len() && borrow == 0 {
            break;
        }
        let mut diff = i32::from(a[i]) - i32::from(b.get(i).copied().unwrap_or(0)) - borrow;
        if diff < 0 {
            diff += 1 << LIMB_BITS;
            borrow = 1;
        } else {
            borrow = 0;
        }
        a[i] = diff as Limb;
    }
    trim(a);
}

/// In-place `a += 1`.
pub(crate) fn increment(a: &mut Vec<Limb>) {
    for limb in a.iter_mut() {
        let (next, overflow) = limb.overflowing_add(1);
        *limb = next;
        if !overflow {
            return;
        }
    }
    a.push(1);
}

/// Schoolbook multiplication.
///
/// Each multiplier limb produces a partial product against the whole
/// multiplicand, accumulated into the result at the limb's offset.
pub(crate) fn mul(a: &[Limb], b: &[Limb]) -> Vec<Limb> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0 as Limb; a.len() + b.len()];
    for (shift, &factor) in b.iter().enumerate() {
        if factor == 0 {
            continue;
        }
        let mut carry = 0u32;
        for (i, &limb) in a.iter().enumerate() {
            let acc = u32::from(limb) * u32::from(factor) + u32::from(out[shift + i]) + carry;
            out[shift + i] = acc as Limb;
            carry = acc >> LIMB_BITS;
        }
        let mut k = shift + a.len();
        while carry != 0 {
            let acc = u32::from(out[k]) + carry;
            out[k] = acc as Limb;
            carry = acc >> LIMB_BITS;
            k += 1;
        }
    }
    trim(&mut out);
    out
}

/// In-place `a = a * factor + addend` for `factor, addend < SMALL_MAX`.
pub(crate) fn mul_small_add(a: &mut Vec<Limb>, factor: u64, addend: u64) {
    debug_assert!(factor < SMALL_MAX && addend < SMALL_MAX);
    let mut carry = addend;
    for limb in a.iter_mut() {
        let acc = u64::from(*limb) * factor + carry;
        *limb = acc as Limb;
        carry = acc >> LIMB_BITS;
    }
    while carry != 0 {
        a.push(carry as Limb);
        carry >>= LIMB_BITS;
    }
    trim(a);
}

/// Short division by `0 < divisor < SMALL_MAX`, returning quotient and remainder.
pub(crate) fn div_rem_small(a: &[Limb], divisor: u64) -> (Vec<Limb>, u64) {
    debug_assert!(divisor != 0 && divisor < SMALL_MAX);
    let mut quotient = vec![0 as Limb; a.len()];
    let mut rem = 0u64;
    for i in (0..a.len()).rev() {
        let acc = (rem << LIMB_BITS) | u64::from(a[i]);
        quotient[i] = (acc / divisor) as Limb;
        rem = acc % divisor;
    }
    trim(&mut quotient);
    (quotient, rem)
}

/// In-place single-bit left shift.
pub(crate) fn shl1_assign(a: &mut Vec<Limb>) {
    let mut carry = 0;
    for limb in a.iter_mut() {
        let next_carry = *limb >> (LIMB_BITS - 1);
        *limb = (*limb << 1) | carry;
        carry = next_carry;
    }
    if carry != 0 {
        a.push(carry);
    }
}

/// In-place single-bit right shift.
pub(crate) fn shr1_assign(a: &mut Vec<Limb>) {
    let mut carry = 0;
    for limb in a.iter_mut().rev() {
        let next_carry = *limb & 1;
        *limb = (*limb >> 1) | (carry << (LIMB_BITS - 1));
        carry = next_carry;
    }
    trim(a);
}

/// Left shift by `bits`.
///
/// A single bit uses the dedicated ripple; otherwise whole limbs are inserted
/// first and the remaining `bits % 16` are rotated through with a carry.
pub(crate) fn shl(a: &[Limb], bits: u64) -> Vec<Limb> {
    if a.is_empty() || bits == 0 {
        return a.to_vec();
    }
    let mut out = a.to_vec();
    if bits == 1 {
        shl1_assign(&mut out);
        return out;
    }
    let whole = (bits / LIMB_BITS) as usize;
    let rest = (bits % LIMB_BITS) as u32;
    if whole > 0 {
        out.splice(0..0, std::iter::repeat_n(0, whole));
    }
    if rest > 0 {
        let mut carry = 0;
        for limb in &mut out[whole..] {
            let next_carry = *limb >> (Limb::BITS - rest);
            *limb = (*limb << rest) | carry;
            carry = next_carry;
        }
        if carry != 0 {
            out.push(carry);
        }
    }
    out
}

/// Right shift by `bits` (truncating the magnitude).
pub(crate) fn shr(a: &[Limb], bits: u64) -> Vec<Limb> {
    if bits >= bit_length(a) {
        return Vec::new();
    }
    let mut out = a.to_vec();
    if bits == 1 {
        shr1_assign(&mut out);
        return out;
    }
    let whole = (bits / LIMB_BITS) as usize;
    let rest = (bits % LIMB_BITS) as u32;
    out.drain(..whole);
    if rest > 0 {
        let mut carry = 0;
        for limb in out.iter_mut().rev() {
            let next_carry = *limb & ((1 << rest) - 1);
            *limb = (*limb >> rest) | (carry << (Limb::BITS - rest));
            carry = next_carry;
        }
    }
    trim(&mut out);
    out
}

/// Whether any of the lowest `bits` bits is set.
pub(crate) fn any_low_bits(a: &[Limb], bits: u64) -> bool {
    lowest_set_bit(a).is_some_and(|lowest| lowest < bits)
}

/// Binary long division, returning `(quotient, remainder)`; `b` must be non-zero.
///
/// The divisor is aligned with the dividend's top bit, then walked back down one
/// bit at a time, subtracting whenever it fits and recording a quotient bit.
pub(crate) fn div_rem(a: &[Limb], b: &[Limb]) -> (Vec<Limb>, Vec<Limb>) {
    debug_assert!(!b.is_empty(), "division by zero magnitude");
    if cmp(a, b) == Ordering::Less {
        return (Vec::new(), a.to_vec());
    }
    if b.len() == 1 {
        let (quotient, rem) = div_rem_small(a, u64::from(b[0]));
        return (quotient, from_u128(u128::from(rem)));
    }
    let size = bit_length(a) - bit_length(b);
    let mut divisor = shl(b, size);
    let mut rem = a.to_vec();
    let mut quotient = vec![0 as Limb; (size / LIMB_BITS) as usize + 1];
    for bit in (0..=size).rev() {
        if cmp(&rem, &divisor) != Ordering::Less {
            sub_assign(&mut rem, &divisor);
            quotient[(bit / LIMB_BITS) as usize] |= 1 << (bit % LIMB_BITS);
        }
        shr1_assign(&mut divisor);
    }
    trim(&mut quotient);
    (quotient, rem)
}

/// Two's-complement image of a (possibly negative) magnitude over `len` limbs.
///
/// `len` must leave at least one spare high bit so the sign survives.
pub(crate) fn to_twos_complement(a: &[Limb], negative: bool, len: usize) -> Vec<Limb> {
    let mut out = a.to_vec();
    out.resize(len, 0);
    if negative {
        for limb in &mut out {
            *limb = !*limb;
        }
        let mut carry = true;
        for limb in &mut out {
            if !carry {
                break;
            }
            let (next, overflow) = limb.overflowing_add(1);
            *limb = next;
            carry = overflow;
        }
    }
    out
}

/// Converts a two's-complement limb image back to `(negative, magnitude)`.
pub(crate) fn from_twos_complement(mut image: Vec<Limb>) -> (bool, Vec<Limb>) {
    let negative = image.last().is_some_and(|&top| top >> (LIMB_BITS - 1) == 1);
    if negative {
        for limb in &mut image {
            *limb = !*limb;
        }
        trim(&mut image);
        increment(&mut image);
    } else {
        trim(&mut image);
    }
    (negative, image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(value: u128) -> Vec<Limb> {
        from_u128(value)
    }

    #[test]
    fn trim_normalizes_zero_to_empty() {
        let mut limbs = vec![0, 0, 0];
        trim(&mut limbs);
        assert!(limbs.is_empty());
        assert_eq!(bit_length(&limbs), 0);
    }

    #[test]
    fn add_and_sub_carry_across_limbs() {
        assert_eq!(add(&big(0xffff_ffff), &big(1)), big(0x1_0000_0000));
        assert_eq!(sub(&big(0x1_0000_0000), &big(1)), big(0xffff_ffff));
        assert_eq!(sub(&big(12345), &big(12345)), Vec::<Limb>::new());
    }

    #[test]
    fn mul_matches_native() {
        let a = 0xdead_beef_1234_5678u128;
        let b = 0x0bad_cafe_9876u128;
        assert_eq!(to_u128(&mul(&big(a), &big(b))), Some(a * b));
        assert!(mul(&big(a), &[]).is_empty());
    }

    #[test]
    fn shifts_compose_all_three_paths() {
        let value = 0x1234_5678_9abc_def0u128;
        for bits in [0, 1, 3, 16, 17, 33, 48] {
            assert_eq!(to_u128(&shl(&big(value), bits)), Some(value << bits), "shl {bits}");
            assert_eq!(to_u128(&shr(&big(value), bits)), Some(value >> bits), "shr {bits}");
        }
        assert!(shr(&big(value), 200).is_empty());
    }

    #[test]
    fn binary_long_division_matches_native() {
        let cases = [
            (1_000_000_007u128 * 998_244_353 + 12345, 998_244_353u128),
            (u128::MAX, 0x1_0000_0001),
            (0xffff_0000_ffff_0000_ffff, 0xffff_ffff_ffff),
            (5, 7),
        ];
        for (a, b) in cases {
            let (q, r) = div_rem(&big(a), &big(b));
            assert_eq!(to_u128(&q), Some(a / b), "{a} / {b}");
            assert_eq!(to_u128(&r), Some(a % b), "{a} % {b}");
        }
    }

    #[test]
    fn small_helpers_match_native() {
        let mut acc = big(987_654_321);
        mul_small_add(&mut acc, 10_000_000_000_000, 42);
        assert_eq!(to_u128(&acc), Some(987_654_321 * 10_000_000_000_000 + 42));
        let (q, r) = div_rem_small(&acc, 100_000_000_000_000);
        assert_eq!(to_u128(&q), Some((987_654_321 * 10_000_000_000_000 + 42) / 100_000_000_000_000));
        assert_eq!(u128::from(r), (987_654_321 * 10_000_000_000_000 + 42) % 100_000_000_000_000);
    }

    #[test]
    fn twos_complement_round_trip() {
        let image = to_twos_complement(&big(5), true, 2);
        assert_eq!(image, vec![0xfffb, 0xffff]);
        assert_eq!(from_twos_complement(image), (true, big(5)));
        assert_eq!(from_twos_complement(vec![5, 0]), (false, big(5)));
    }
}
