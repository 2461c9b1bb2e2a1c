// This file is part of sigk.
// Copyright (c) 2026 The sigk contributors
// See LICENSE for licensing information.
//

//! Multiprecision arithmetic for GF(p747), p747 = 2^260·3^153·5^105 - 1.
//!
//! Field elements are 12 little-endian 64-bit limbs kept in [0, 2·p747);
//! reduction to the canonical range happens only on encoding and
//! comparison. Multiplication is schoolbook comba into a double-width
//! accumulator followed by Montgomery reduction with radix R = 2^768,
//! which exploits the four zero low limbs of p747 + 1.

use core::fmt::Debug;

use subtle::Choice;
use subtle::ConditionallySelectable;

#[cfg(test)]
use quickcheck::{Arbitrary, Gen};

pub const FP747_NUM_WORDS: usize = 12;
const P747_ZERO_WORDS: usize = 4;

/// p747
pub const P747: [u64; FP747_NUM_WORDS] = [
    0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF,
    0xA047C05513A78CEF, 0xB26D38D6F3B27CC3, 0x0B40709FDFCF993C, 0x7B53A41A27D10162,
    0xA4DC87C4B86348CC, 0x5F33FCB0E1016AA2, 0xD42A27A9491431BC, 0x000004EE30756B8B,
];

/// p747 + 1, whose four low limbs are zero.
const P747P1: [u64; FP747_NUM_WORDS] = [
    0x0000000000000000, 0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
    0xA047C05513A78CF0, 0xB26D38D6F3B27CC3, 0x0B40709FDFCF993C, 0x7B53A41A27D10162,
    0xA4DC87C4B86348CC, 0x5F33FCB0E1016AA2, 0xD42A27A9491431BC, 0x000004EE30756B8B,
];

/// 2·p747
const P747X2: [u64; FP747_NUM_WORDS] = [
    0xFFFFFFFFFFFFFFFE, 0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF,
    0x408F80AA274F19DF, 0x64DA71ADE764F987, 0x1680E13FBF9F3279, 0xF6A748344FA202C4,
    0x49B90F8970C69198, 0xBE67F961C202D545, 0xA8544F5292286378, 0x000009DC60EAD717,
];

const RADIX: u32 = 64;

// Return 1 if x != 0, and 0 otherwise.
#[inline(always)]
fn is_digit_nonzero_ct(x: u64) -> u64 {
    (x | x.wrapping_neg()) >> (RADIX - 1)
}

// Return 1 if x = 0, and 0 otherwise.
#[inline(always)]
fn is_digit_zero_ct(x: u64) -> u64 {
    1 ^ is_digit_nonzero_ct(x)
}

// Return 1 if x < y, and 0 otherwise.
#[inline(always)]
fn is_digit_lessthan_ct(x: u64, y: u64) -> u64 {
    (x ^ ((x ^ y) | (x.wrapping_sub(y) ^ y))) >> (RADIX - 1)
}

// Digit multiplication, 64 x 64 -> 128-bit result as (low, high).
#[inline(always)]
fn digit_x_digit(a: u64, b: u64) -> (u64, u64) {
    let product = (a as u128) * (b as u128);
    (product as u64, (product >> 64) as u64)
}

// Digit addition with carry.
#[inline(always)]
fn addc(carry_in: u64, addend1: u64, addend2: u64) -> (u64, u64) {
    let temp = addend1.wrapping_add(carry_in);
    let sum = addend2.wrapping_add(temp);
    let carry_out = is_digit_lessthan_ct(temp, carry_in) | is_digit_lessthan_ct(sum, temp);
    (carry_out, sum)
}

// Digit subtraction with borrow.
#[inline(always)]
fn subc(borrow_in: u64, minuend: u64, subtrahend: u64) -> (u64, u64) {
    let temp = minuend.wrapping_sub(subtrahend);
    let borrow_out =
        is_digit_lessthan_ct(minuend, subtrahend) | (borrow_in & is_digit_zero_ct(temp));
    let difference = temp.wrapping_sub(borrow_in);
    (borrow_out, difference)
}

/// Modular addition, z = x + y (mod 2·p747), inputs and output in [0, 2·p747).
#[inline]
pub fn fpadd747(x: &Fp747Element, y: &Fp747Element, z: &mut Fp747Element) {
    let mut carry: u64 = 0;
    for i in 0..FP747_NUM_WORDS {
        (carry, z.0[i]) = addc(carry, x.0[i], y.0[i]);
    }

    carry = 0;
    for i in 0..FP747_NUM_WORDS {
        (carry, z.0[i]) = subc(carry, z.0[i], P747X2[i]);
    }
    let mask = 0u64.wrapping_sub(carry);

    carry = 0;
    for i in 0..FP747_NUM_WORDS {
        (carry, z.0[i]) = addc(carry, z.0[i], P747X2[i] & mask);
    }
}

/// Modular subtraction, z = x - y (mod 2·p747), inputs and output in [0, 2·p747).
#[inline]
pub fn fpsub747(x: &Fp747Element, y: &Fp747Element, z: &mut Fp747Element) {
    let mut borrow: u64 = 0;
    for i in 0..FP747_NUM_WORDS {
        (borrow, z.0[i]) = subc(borrow, x.0[i], y.0[i]);
    }
    let mask = 0u64.wrapping_sub(borrow);

    borrow = 0;
    for i in 0..FP747_NUM_WORDS {
        (borrow, z.0[i]) = addc(borrow, z.0[i], P747X2[i] & mask);
    }
}

/// Modular division by two, z = x/2 (mod p747).
#[inline]
pub fn fpdiv2_747(x: &Fp747Element, z: &mut Fp747Element) {
    // Add p747 when x is odd, so the low bit vanishes, then shift right.
    let mask = 0u64.wrapping_sub(x.0[0] & 1);
    let mut carry: u64 = 0;
    for i in 0..FP747_NUM_WORDS {
        (carry, z.0[i]) = addc(carry, x.0[i], P747[i] & mask);
    }
    for i in 0..(FP747_NUM_WORDS - 1) {
        z.0[i] = (z.0[i] >> 1) | (z.0[i + 1] << (RADIX - 1));
    }
    z.0[FP747_NUM_WORDS - 1] = (z.0[FP747_NUM_WORDS - 1] >> 1) | (carry << (RADIX - 1));
}

/// Schoolbook comba multiplication, z = x·y, no reduction.
pub fn mul747(x: &Fp747Element, y: &Fp747Element, z: &mut Fp747X2) {
    let mut t: u64 = 0;
    let mut u: u64 = 0;
    let mut v: u64 = 0;
    let mut carry: u64 = 0;

    for i in 0..FP747_NUM_WORDS {
        for j in 0..(i + 1) {
            let (uv_lo, uv_hi) = digit_x_digit(x.0[j], y.0[i - j]);
            (carry, v) = addc(0, uv_lo, v);
            (carry, u) = addc(carry, uv_hi, u);
            t += carry;
        }
        z.0[i] = v;
        v = u;
        u = t;
        t = 0;
    }

    for i in FP747_NUM_WORDS..(2 * FP747_NUM_WORDS - 1) {
        for j in (i - FP747_NUM_WORDS + 1)..FP747_NUM_WORDS {
            let (uv_lo, uv_hi) = digit_x_digit(x.0[j], y.0[i - j]);
            (carry, v) = addc(0, uv_lo, v);
            (carry, u) = addc(carry, uv_hi, u);
            t += carry;
        }
        z.0[i] = v;
        v = u;
        u = t;
        t = 0;
    }
    z.0[2 * FP747_NUM_WORDS - 1] = v;
}

/// Montgomery reduction, z = x·R^{-1} (mod 2·p747) for R = 2^768.
///
/// Terms involving the four zero low limbs of p747 + 1 are skipped.
pub fn rdc747(x: &Fp747X2, z: &mut Fp747Element) {
    let mut t: u64 = 0;
    let mut u: u64 = 0;
    let mut v: u64 = 0;
    let mut carry: u64 = 0;

    for i in 0..FP747_NUM_WORDS {
        z.0[i] = 0;
    }

    for i in 0..FP747_NUM_WORDS {
        for j in 0..i {
            if j + P747_ZERO_WORDS <= i {
                let (uv_lo, uv_hi) = digit_x_digit(z.0[j], P747P1[i - j]);
                (carry, v) = addc(0, uv_lo, v);
                (carry, u) = addc(carry, uv_hi, u);
                t += carry;
            }
        }
        (carry, v) = addc(0, v, x.0[i]);
        (carry, u) = addc(carry, u, 0);
        t += carry;
        z.0[i] = v;
        v = u;
        u = t;
        t = 0;
    }

    for i in FP747_NUM_WORDS..(2 * FP747_NUM_WORDS - 1) {
        for j in (i - FP747_NUM_WORDS + 1)..FP747_NUM_WORDS {
            if j + P747_ZERO_WORDS <= i {
                let (uv_lo, uv_hi) = digit_x_digit(z.0[j], P747P1[i - j]);
                (carry, v) = addc(0, uv_lo, v);
                (carry, u) = addc(carry, uv_hi, u);
                t += carry;
            }
        }
        (carry, v) = addc(0, v, x.0[i]);
        (carry, u) = addc(carry, u, 0);
        t += carry;
        z.0[i - FP747_NUM_WORDS] = v;
        v = u;
        u = t;
        t = 0;
    }
    let (_, top) = addc(0, v, x.0[2 * FP747_NUM_WORDS - 1]);
    z.0[FP747_NUM_WORDS - 1] = top;
}

/// Modular correction: reduce a field element in [0, 2·p747) to [0, p747).
#[inline]
pub fn srdc747(x: &mut Fp747Element) {
    let mut borrow: u64 = 0;
    for i in 0..FP747_NUM_WORDS {
        (borrow, x.0[i]) = subc(borrow, x.0[i], P747[i]);
    }
    let mask = 0u64.wrapping_sub(borrow);

    borrow = 0;
    for i in 0..FP747_NUM_WORDS {
        (borrow, x.0[i]) = addc(borrow, x.0[i], P747[i] & mask);
    }
}

/// Double-width addition without reduction.
#[inline]
pub fn mp_add747x2(x: &Fp747X2, y: &Fp747X2, z: &mut Fp747X2) {
    let mut carry: u64 = 0;
    for i in 0..(2 * FP747_NUM_WORDS) {
        (carry, z.0[i]) = addc(carry, x.0[i], y.0[i]);
    }
}

/// Double-width subtraction; on borrow, p747·2^768 is added back so the
/// result stays congruent and nonnegative.
pub fn mp_sub747x2(x: &Fp747X2, y: &Fp747X2, z: &mut Fp747X2) {
    let mut borrow: u64 = 0;
    for i in 0..(2 * FP747_NUM_WORDS) {
        (borrow, z.0[i]) = subc(borrow, x.0[i], y.0[i]);
    }
    let mask = 0u64.wrapping_sub(borrow);

    borrow = 0;
    for i in FP747_NUM_WORDS..(2 * FP747_NUM_WORDS) {
        (borrow, z.0[i]) = addc(borrow, z.0[i], P747[i - FP747_NUM_WORDS] & mask);
    }
}

/// An element of GF(p747) in Montgomery form, 12 little-endian u64 limbs.
#[derive(Copy, Clone)]
pub struct Fp747Element(pub(crate) [u64; FP747_NUM_WORDS]);

impl ConditionallySelectable for Fp747Element {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = [0u64; FP747_NUM_WORDS];
        for i in 0..FP747_NUM_WORDS {
            limbs[i] = u64::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Fp747Element(limbs)
    }

    fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        // The branch-free mask trick: mask = -(u64)choice.
        let mask = 0u64.wrapping_sub(choice.unwrap_u8() as u64);
        for i in 0..FP747_NUM_WORDS {
            let temp = mask & (a.0[i] ^ b.0[i]);
            a.0[i] ^= temp;
            b.0[i] ^= temp;
        }
    }
}

impl Debug for Fp747Element {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "Fp747Element({:?})", &self.0[..])
    }
}

#[cfg(test)]
impl Arbitrary for Fp747Element {
    fn arbitrary(g: &mut Gen) -> Fp747Element {
        // Generation strategy: low limbs taken from [0, 2^64), high limb
        // taken from a smaller range.
        //
        // Field elements live in [0, 2p). Emulate this by capping the
        // high limb by the top digit of 2·p747 - 1:
        //
        // sage: (2*p747 - 1).digits(2^64)[-1]
        // 10842123458327
        //
        // This still allows generating values >= 2p, but the excess is
        // small.
        let mut limbs = [0u64; FP747_NUM_WORDS];
        for limb in limbs.iter_mut().take(FP747_NUM_WORDS - 1) {
            *limb = u64::arbitrary(g);
        }
        limbs[FP747_NUM_WORDS - 1] = u64::arbitrary(g) % 10842123458327;
        Fp747Element(limbs)
    }
}

impl Fp747Element {
    /// Construct a new zero `Fp747Element`.
    pub fn zero() -> Fp747Element {
        Fp747Element([0u64; FP747_NUM_WORDS])
    }

    /// Reduce a field element in [0, 2·p747) to one in [0, p747).
    pub fn strong_reduce(&self) -> Fp747Element {
        let mut reduced = *self;
        srdc747(&mut reduced);
        reduced
    }

    /// Convert limbs in normal (non-Montgomery) representation into
    /// Montgomery form. Used to bring the published generator constants
    /// into the domain the arithmetic works in.
    pub(crate) fn from_raw_limbs(limbs: [u64; FP747_NUM_WORDS]) -> Fp747Element {
        let element = Fp747Element(limbs);
        (&element * &MONTGOMERY_RSQ).reduce()
    }

    /// Given an `Fp747Element` in Montgomery form, convert to 94
    /// little-endian bytes of the canonical representative.
    pub fn to_bytes(&self) -> [u8; 94] {
        let mut bytes = [0u8; 94];
        let mut unscaled = Fp747X2::zero();

        // Placing the limbs in the low half of a double-width value and
        // reducing strips one factor of R, i.e. converts out of
        // Montgomery form.
        unscaled.0[..FP747_NUM_WORDS].clone_from_slice(&self.0);
        let mut canonical = unscaled.reduce(); // in [0, 2p)
        canonical = canonical.strong_reduce(); // in [0, p)

        // 8·12 = 96, but p747 fits in 94 bytes, so the last two are dropped.
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = (canonical.0[i / 8] >> (8 * (i % 8))) as u8;
        }
        bytes
    }

    /// Read an `Fp747Element` from little-endian bytes and convert to
    /// Montgomery form. The value is not checked against p747.
    pub fn from_bytes(bytes: &[u8]) -> Fp747Element {
        assert!(
            bytes.len() >= 94,
            "Too short input to Fp747Element from_bytes, expected 94 bytes"
        );
        Fp747Element::from_raw_limbs(limbs_from_bytes(bytes))
    }
}

fn limbs_from_bytes(bytes: &[u8]) -> [u64; FP747_NUM_WORDS] {
    let mut limbs = [0u64; FP747_NUM_WORDS];
    for (i, byte) in bytes.iter().enumerate().take(94) {
        limbs[i / 8] |= (*byte as u64) << (8 * (i % 8));
    }
    limbs
}

/// Whether 94 little-endian bytes encode a canonical value, i.e. one
/// strictly less than p747. Public-key data only, so variable time.
pub(crate) fn bytes_are_canonical(bytes: &[u8]) -> bool {
    let limbs = limbs_from_bytes(bytes);
    for i in (0..FP747_NUM_WORDS).rev() {
        if limbs[i] < P747[i] {
            return true;
        }
        if limbs[i] > P747[i] {
            return false;
        }
    }
    false // equal to p747
}

/// A double-width intermediate value, e.g. a 1494-bit product awaiting
/// Montgomery reduction.
#[derive(Copy, Clone)]
pub struct Fp747X2(pub(crate) [u64; 2 * FP747_NUM_WORDS]);

impl Debug for Fp747X2 {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "Fp747X2({:?})", &self.0[..])
    }
}

impl Fp747X2 {
    // Construct a zero `Fp747X2`.
    pub fn zero() -> Fp747X2 {
        Fp747X2([0u64; 2 * FP747_NUM_WORDS])
    }
}

/// `2^768 mod p747`, the Montgomery representation of one.
pub const MONTGOMERY_ONE: Fp747Element = Fp747Element([
    0x000000000033EC27, 0x0000000000000000, 0x0000000000000000, 0x0000000000000000,
    0x1ED05A8A77BC4770, 0xCE23A20979D1B825, 0x7181DEF5FF042781, 0x69C3F4ABFB5A29DA,
    0x890D3B44E106D57E, 0x3AE49E582C13F94E, 0xEA4A56D1578BCD2E, 0x000003A5F21C71B5,
]);

/// `(2^768)^2 mod p747`
pub const MONTGOMERY_RSQ: Fp747Element = Fp747Element([
    0xB72C5563CFD0070C, 0x3DCBDB82AE4B2EFB, 0x53B6DF3D0115B350, 0xED5F4AC6190451CD,
    0xCF11EABCFB4DBBA5, 0x4723FDABFDEA5C88, 0x909485CA107DA103, 0xD233A15F550C0A86,
    0x9F5B5C3A9349160E, 0xE1EC1C1C9606CD3C, 0x8E923055349AF253, 0x0000022019A271D0,
]);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn one_to_bytes() {
        let bytes = MONTGOMERY_ONE.to_bytes();
        assert_eq!(bytes[0], 1);
        for byte in bytes[1..].iter() {
            assert_eq!(*byte, 0);
        }
    }

    #[test]
    fn conditional_swap() {
        let one = Fp747Element([1; FP747_NUM_WORDS]);
        let two = Fp747Element([2; FP747_NUM_WORDS]);

        let mut x = one;
        let mut y = two;

        Fp747Element::conditional_swap(&mut x, &mut y, Choice::from(0));
        assert_eq!(x.0, one.0);
        assert_eq!(y.0, two.0);

        Fp747Element::conditional_swap(&mut x, &mut y, Choice::from(1));
        assert_eq!(x.0, two.0);
        assert_eq!(y.0, one.0);
    }

    #[test]
    fn canonical_bytes_boundary() {
        let mut p_bytes = [0u8; 94];
        for (i, byte) in p_bytes.iter_mut().enumerate() {
            *byte = (P747[i / 8] >> (8 * (i % 8))) as u8;
        }
        assert!(!bytes_are_canonical(&p_bytes));

        let mut p_minus_one = p_bytes;
        p_minus_one[0] -= 1;
        assert!(bytes_are_canonical(&p_minus_one));

        assert!(bytes_are_canonical(&[0u8; 94]));
    }
}
