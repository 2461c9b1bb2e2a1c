// This file is part of sigk.
// Copyright (c) 2026 The sigk contributors
// See LICENSE for licensing information.
//

//! Finite field arithmetic for the group key exchange: GF(p747) and its
//! quadratic extension GF(p747²) = GF(p747)[i]/(i² + 1).
//!
//! All elements are kept in Montgomery form; operator impls wrap the
//! backend limb routines.

use core::fmt::Debug;

use core::ops::{Add, AddAssign};
use core::ops::{Mul, MulAssign};
use core::ops::Neg;
use core::ops::{Sub, SubAssign};

use subtle::Choice;
use subtle::ConditionallySelectable;
use subtle::ConstantTimeEq;

#[cfg(test)]
use quickcheck::{Arbitrary, Gen};

use crate::backend::fp747::*;

//-----------------------------------------------------------------------------//
//                           Extension Field                                   //
//-----------------------------------------------------------------------------//

/// Represents an element a + b·i of the extension field GF(p747²).
#[derive(Copy, Clone, PartialEq)]
pub struct ExtensionFieldElement {
    /// This field element is in Montgomery form, so that the value `A` is
    /// represented by `aR mod p`.
    pub A: Fp747Element,
    /// This field element is in Montgomery form, so that the value `B` is
    /// represented by `bR mod p`.
    pub B: Fp747Element,
}

impl<'b> AddAssign<&'b ExtensionFieldElement> for ExtensionFieldElement {
    fn add_assign(&mut self, rhs: &'b ExtensionFieldElement) {
        let result = (self as &ExtensionFieldElement) + rhs;
        self.A = result.A;
        self.B = result.B;
    }
}

impl<'a, 'b> Add<&'b ExtensionFieldElement> for &'a ExtensionFieldElement {
    type Output = ExtensionFieldElement;
    fn add(self, rhs: &'b ExtensionFieldElement) -> ExtensionFieldElement {
        ExtensionFieldElement {
            A: &self.A + &rhs.A,
            B: &self.B + &rhs.B,
        }
    }
}

impl<'b> SubAssign<&'b ExtensionFieldElement> for ExtensionFieldElement {
    fn sub_assign(&mut self, rhs: &'b ExtensionFieldElement) {
        let result = (self as &ExtensionFieldElement) - rhs;
        self.A = result.A;
        self.B = result.B;
    }
}

impl<'a, 'b> Sub<&'b ExtensionFieldElement> for &'a ExtensionFieldElement {
    type Output = ExtensionFieldElement;
    fn sub(self, rhs: &'b ExtensionFieldElement) -> ExtensionFieldElement {
        ExtensionFieldElement {
            A: &self.A - &rhs.A,
            B: &self.B - &rhs.B,
        }
    }
}

impl<'b> MulAssign<&'b ExtensionFieldElement> for ExtensionFieldElement {
    fn mul_assign(&mut self, rhs: &'b ExtensionFieldElement) {
        let result = (self as &ExtensionFieldElement) * rhs;
        self.A = result.A;
        self.B = result.B;
    }
}

impl<'a, 'b> Mul<&'b ExtensionFieldElement> for &'a ExtensionFieldElement {
    type Output = ExtensionFieldElement;
    fn mul(self, rhs: &'b ExtensionFieldElement) -> ExtensionFieldElement {
        // Alias self, rhs for more readable formulas.
        let a = &self.A;
        let b = &self.B;
        let c = &rhs.A;
        let d = &rhs.B;

        // We want to compute
        //
        // (a + bi)*(c + di) = (a*c - b*d) + (a*d + b*c)i
        //
        // Use Karatsuba's trick: note that
        //
        // (b - a)*(c - d) = (b*c + a*d) - a*c - b*d
        //
        // so (a*d + b*c) = (b-a)*(c-d) + a*c + b*d.
        //
        let ac = a * c;                               // = a*c*R*R
        let bd = b * d;                               // = b*d*R*R
        let b_minus_a = b - a;                        // = (b-a)*R
        let c_minus_d = c - d;                        // = (c-d)*R

        let mut ad_plus_bc = &b_minus_a * &c_minus_d; // = (b-a)*(c-d)*R*R
        ad_plus_bc += &ac;                            // = ((b-a)*(c-d) + a*c)*R*R
        ad_plus_bc += &bd;                            // = ((b-a)*(c-d) + a*c + b*d)*R*R
        let imaginary = ad_plus_bc.reduce();          // = (a*d + b*c)*R mod p

        let ac_minus_bd = &ac - &bd;                  // = (a*c - b*d)*R*R
        let real = ac_minus_bd.reduce();              // = (a*c - b*d)*R mod p

        ExtensionFieldElement {
            A: real,
            B: imaginary,
        }
    }
}

impl<'a> Neg for &'a ExtensionFieldElement {
    type Output = ExtensionFieldElement;
    fn neg(self) -> ExtensionFieldElement {
        let zero = ExtensionFieldElement::zero();
        &zero - self
    }
}

impl ConditionallySelectable for ExtensionFieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ExtensionFieldElement {
            A: Fp747Element::conditional_select(&a.A, &b.A, choice),
            B: Fp747Element::conditional_select(&a.B, &b.B, choice),
        }
    }

    fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        Fp747Element::conditional_swap(&mut a.A, &mut b.A, choice);
        Fp747Element::conditional_swap(&mut a.B, &mut b.B, choice);
    }
}

impl ConstantTimeEq for ExtensionFieldElement {
    /// Test equality between two `ExtensionFieldElement`s in constant
    /// time.
    fn ct_eq(&self, other: &ExtensionFieldElement) -> Choice {
        self.A.ct_eq(&other.A) & self.B.ct_eq(&other.B)
    }
}

impl Debug for ExtensionFieldElement {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "ExtensionFieldElement(A: {:?}\nB: {:?})", &self.A, &self.B)
    }
}

#[cfg(test)]
impl Arbitrary for ExtensionFieldElement {
    fn arbitrary(g: &mut Gen) -> ExtensionFieldElement {
        ExtensionFieldElement {
            A: Fp747Element::arbitrary(g),
            B: Fp747Element::arbitrary(g),
        }
    }
}

impl ExtensionFieldElement {
    /// Construct a zero `ExtensionFieldElement`.
    pub fn zero() -> ExtensionFieldElement {
        ExtensionFieldElement {
            A: Fp747Element::zero(),
            B: Fp747Element::zero(),
        }
    }
    /// Construct a one `ExtensionFieldElement`.
    pub fn one() -> ExtensionFieldElement {
        ExtensionFieldElement {
            A: MONTGOMERY_ONE,
            B: Fp747Element::zero(),
        }
    }
    /// Set output to `1/x`.
    pub fn inv(&self) -> ExtensionFieldElement {
        let a = &self.A;
        let b = &self.B;

        // We want to compute
        //
        //    1          1     (a - bi)     (a - bi)
        // -------- = -------- -------- = -----------
        // (a + bi)   (a + bi) (a - bi)   (a^2 + b^2)
        //
        // Letting c = 1/(a^2 + b^2), this is
        //
        // 1/(a+bi) = a*c - b*ci.
        //
        let mut asq = a * a;           // = a*a*R*R
        let bsq = b * b;               // = b*b*R*R
        asq = &asq + &bsq;             // = (a^2 + b^2)*R*R
        let mut asq_plus_bsq = PrimeFieldElement::zero();
        asq_plus_bsq.A = asq.reduce(); // = (a^2 + b^2)*R mod p

        let asq_plus_bsq_inv = asq_plus_bsq.inv();
        let c = &asq_plus_bsq_inv.A;

        let ac = a * c;
        let real = ac.reduce();

        let mut minus_b = Fp747Element::zero();
        minus_b = &minus_b - b;
        let minus_bc = &minus_b * c;
        let imaginary = minus_bc.reduce();

        ExtensionFieldElement {
            A: real,
            B: imaginary,
        }
    }
    /// Set (y1, y2, y3) = (1/x1, 1/x2, 1/x3) with a single field
    /// inversion (Montgomery's simultaneous-inversion trick).
    pub fn batch3_inv(
        x1: &ExtensionFieldElement,
        x2: &ExtensionFieldElement,
        x3: &ExtensionFieldElement,
    ) -> (ExtensionFieldElement, ExtensionFieldElement, ExtensionFieldElement) {
        let x1x2 = x1 * x2;     // x1*x2
        let mut t = &x1x2 * x3;
        t = t.inv();            // 1/(x1*x2*x3)
        let y1 = &(&t * x2) * x3; // 1/x1
        let y2 = &(&t * x1) * x3; // 1/x2
        let y3 = &t * &x1x2;      // 1/x3

        (y1, y2, y3)
    }
    /// Simultaneously invert six elements, one field inversion in total.
    /// Used to normalize the six public-key images after a walk.
    pub fn batch6_inv(
        x: [&ExtensionFieldElement; 6],
    ) -> [ExtensionFieldElement; 6] {
        // Prefix products x1, x1*x2, ..., x1*...*x6.
        let mut prefix = [*x[0]; 6];
        for i in 1..6 {
            prefix[i] = &prefix[i - 1] * x[i];
        }
        let mut t = prefix[5].inv(); // 1/(x1*...*x6)

        let mut out = [ExtensionFieldElement::zero(); 6];
        for i in (1..6).rev() {
            out[i] = &t * &prefix[i - 1]; // 1/xi
            t = &t * x[i];                // 1/(x1*...*x_{i-1})
        }
        out[0] = t;
        out
    }
    /// Set the output to `x^2`.
    pub fn square(&self) -> ExtensionFieldElement {
        let a = &self.A;
        let b = &self.B;

        // We want to compute
        //
        // (a + bi)*(a + bi) = (a^2 - b^2) + 2abi
        //
        let a2 = a + a;        // = 2*a*R
        let a_plus_b = a + b;  // = (a+b)*R
        let a_minus_b = a - b; // = (a-b)*R

        let asq_minus_bsq = &a_plus_b * &a_minus_b; // = (a^2 - b^2)*R*R
        let ab2 = &a2 * b;                          // = 2*a*b*R*R

        ExtensionFieldElement {
            A: asq_minus_bsq.reduce(), // = (a^2 - b^2)*R mod p
            B: ab2.reduce(),           // = 2*a*b*R mod p
        }
    }
    /// Set the output to `x/2`.
    pub fn div2(&self) -> ExtensionFieldElement {
        let mut a = Fp747Element::zero();
        let mut b = Fp747Element::zero();
        fpdiv2_747(&self.A, &mut a);
        fpdiv2_747(&self.B, &mut b);
        ExtensionFieldElement { A: a, B: b }
    }
    /// Returns true if the element is a square in GF(p747²).
    ///
    /// An element is a square exactly when its norm a² + b² is a
    /// square in GF(p747). Takes variable time.
    pub fn vartime_is_square(&self) -> bool {
        let mut norm_wide = &self.A * &self.A; // = a*a*R*R
        let bsq = &self.B * &self.B;           // = b*b*R*R
        norm_wide = &norm_wide + &bsq;         // = (a^2 + b^2)*R*R
        let norm = PrimeFieldElement {
            A: norm_wide.reduce(),             // = (a^2 + b^2)*R mod p
        };
        norm.vartime_is_square()
    }
    /// Reduce both components to canonical form in [0, p).
    pub fn strong_reduce(&self) -> ExtensionFieldElement {
        ExtensionFieldElement {
            A: self.A.strong_reduce(),
            B: self.B.strong_reduce(),
        }
    }
    /// Returns true if both sides are equal. Takes variable time.
    pub fn vartime_eq(&self, rhs: &ExtensionFieldElement) -> bool {
        (&self.A == &rhs.A) && (&self.B == &rhs.B)
    }
    /// Convert the input to wire format.
    pub fn to_bytes(&self) -> [u8; 188] {
        let mut bytes = [0u8; 188];
        bytes[0..94].clone_from_slice(&self.A.to_bytes());
        bytes[94..188].clone_from_slice(&self.B.to_bytes());
        bytes
    }
    /// Read 188 bytes into an `ExtensionFieldElement`.
    pub fn from_bytes(bytes: &[u8]) -> ExtensionFieldElement {
        assert!(
            bytes.len() >= 188,
            "Too short input to ExtensionFieldElement from_bytes, expected 188 bytes"
        );
        ExtensionFieldElement {
            A: Fp747Element::from_bytes(&bytes[0..94]),
            B: Fp747Element::from_bytes(&bytes[94..188]),
        }
    }
}

//-----------------------------------------------------------------------------//
//                             Prime Field                                     //
//-----------------------------------------------------------------------------//

/// Represents an element of the prime field GF(p747).
#[derive(Copy, Clone, PartialEq)]
pub struct PrimeFieldElement {
    /// This field element is in Montgomery form, so that the value `A` is
    /// represented by `aR mod p`.
    pub A: Fp747Element,
}

impl<'b> AddAssign<&'b PrimeFieldElement> for PrimeFieldElement {
    fn add_assign(&mut self, rhs: &'b PrimeFieldElement) {
        let result = (self as &PrimeFieldElement) + rhs;
        self.A = result.A;
    }
}

impl<'a, 'b> Add<&'b PrimeFieldElement> for &'a PrimeFieldElement {
    type Output = PrimeFieldElement;
    fn add(self, rhs: &'b PrimeFieldElement) -> PrimeFieldElement {
        PrimeFieldElement { A: &self.A + &rhs.A }
    }
}

impl<'b> SubAssign<&'b PrimeFieldElement> for PrimeFieldElement {
    fn sub_assign(&mut self, rhs: &'b PrimeFieldElement) {
        let result = (self as &PrimeFieldElement) - rhs;
        self.A = result.A;
    }
}

impl<'a, 'b> Sub<&'b PrimeFieldElement> for &'a PrimeFieldElement {
    type Output = PrimeFieldElement;
    fn sub(self, rhs: &'b PrimeFieldElement) -> PrimeFieldElement {
        PrimeFieldElement { A: &self.A - &rhs.A }
    }
}

impl<'b> MulAssign<&'b PrimeFieldElement> for PrimeFieldElement {
    fn mul_assign(&mut self, rhs: &'b PrimeFieldElement) {
        let result = (self as &PrimeFieldElement) * rhs;
        self.A = result.A;
    }
}

impl<'a, 'b> Mul<&'b PrimeFieldElement> for &'a PrimeFieldElement {
    type Output = PrimeFieldElement;
    fn mul(self, rhs: &'b PrimeFieldElement) -> PrimeFieldElement {
        let ab = &self.A * &rhs.A; // = a*b*R*R
        PrimeFieldElement { A: ab.reduce() }
    }
}

impl<'a> Neg for &'a PrimeFieldElement {
    type Output = PrimeFieldElement;
    fn neg(self) -> PrimeFieldElement {
        let zero = PrimeFieldElement::zero();
        &zero - self
    }
}

impl Debug for PrimeFieldElement {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "PrimeFieldElement(A: {:?})", &self.A)
    }
}

#[cfg(test)]
impl Arbitrary for PrimeFieldElement {
    fn arbitrary(g: &mut Gen) -> PrimeFieldElement {
        PrimeFieldElement { A: Fp747Element::arbitrary(g) }
    }
}

// Exponent (p747 - 3)/4 = 2^258·3^153·5^105 - 1, little-endian limbs.
const P34_EXPONENT: [u64; FP747_NUM_WORDS] = [
    0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFF,
    0xE811F01544E9E33B, 0x2C9B4E35BCEC9F30, 0x82D01C27F7F3E64F, 0x1ED4E90689F44058,
    0xA93721F12E18D233, 0x17CCFF2C38405AA8, 0xF50A89EA52450C6F, 0x0000013B8C1D5AE2,
];

impl PrimeFieldElement {
    /// Construct a zero `PrimeFieldElement`.
    pub fn zero() -> PrimeFieldElement {
        PrimeFieldElement { A: Fp747Element::zero() }
    }
    /// Construct a one `PrimeFieldElement`.
    pub fn one() -> PrimeFieldElement {
        PrimeFieldElement { A: MONTGOMERY_ONE }
    }
    /// Set the output to `x^2`.
    pub fn square(&self) -> PrimeFieldElement {
        let ab = &self.A * &self.A;
        PrimeFieldElement { A: ab.reduce() }
    }
    /// Set output to `x^((p-3)/4)`. If `x` is square, this is `1/sqrt(x)`.
    ///
    /// Square-and-multiply over the fixed public exponent; the sequence
    /// of operations does not depend on the value of `x`.
    fn p34(&self) -> PrimeFieldElement {
        let mut result = PrimeFieldElement::one();
        for i in (0..FP747_NUM_WORDS).rev() {
            for j in (0..64).rev() {
                result = result.square();
                if (P34_EXPONENT[i] >> j) & 1 == 1 {
                    result = &result * self;
                }
            }
        }
        result
    }
    /// Set output to `1/x`.
    pub fn inv(&self) -> PrimeFieldElement {
        let mut result = self.square(); // result = x^2
        result = result.p34();          // result = (x^2)^((p-3)/4) = x^((p-3)/2)
        result = result.square();       // result = x^(p-3)
        result = &result * self;        // result = x^(p-2)
        result
    }
    /// Returns true if the element is a square, by Euler's criterion
    /// x^((p-1)/2) = 1. Takes variable time.
    pub fn vartime_is_square(&self) -> bool {
        // x^((p-1)/2) = (x^((p-3)/4))^2 * x
        let mut chi = self.p34();
        chi = chi.square();
        chi = &chi * self;
        chi.vartime_eq(&PrimeFieldElement::one())
    }
    /// Returns true if both sides are equal. Takes variable time.
    pub fn vartime_eq(&self, rhs: &PrimeFieldElement) -> bool {
        &self.A == &rhs.A
    }
}

//-----------------------------------------------------------------------------//
//                              Internals                                      //
//-----------------------------------------------------------------------------//

impl<'b> AddAssign<&'b Fp747Element> for Fp747Element {
    fn add_assign(&mut self, rhs: &'b Fp747Element) {
        let result = (self as &Fp747Element) + rhs;
        self.0 = result.0
    }
}

impl<'a, 'b> Add<&'b Fp747Element> for &'a Fp747Element {
    type Output = Fp747Element;
    fn add(self, rhs: &'b Fp747Element) -> Fp747Element {
        let mut result = Fp747Element::zero();
        fpadd747(self, rhs, &mut result);
        result
    }
}

impl<'b> SubAssign<&'b Fp747Element> for Fp747Element {
    fn sub_assign(&mut self, rhs: &'b Fp747Element) {
        let result = (self as &Fp747Element) - rhs;
        self.0 = result.0
    }
}

impl<'a, 'b> Sub<&'b Fp747Element> for &'a Fp747Element {
    type Output = Fp747Element;
    fn sub(self, rhs: &'b Fp747Element) -> Fp747Element {
        let mut result = Fp747Element::zero();
        fpsub747(self, rhs, &mut result);
        result
    }
}

impl<'a, 'b> Mul<&'b Fp747Element> for &'a Fp747Element {
    type Output = Fp747X2;
    fn mul(self, rhs: &'b Fp747Element) -> Fp747X2 {
        let mut result = Fp747X2::zero();
        mul747(self, rhs, &mut result); // = a*b*R*R
        result
    }
}

impl<'a> Neg for &'a Fp747Element {
    type Output = Fp747Element;
    fn neg(self) -> Fp747Element {
        let zero = Fp747Element::zero();
        &zero - self
    }
}

impl ConstantTimeEq for Fp747Element {
    /// Test equality between two `Fp747Element`s in constant time,
    /// comparing the canonical encodings.
    fn ct_eq(&self, other: &Fp747Element) -> Choice {
        self.to_bytes()[..].ct_eq(&other.to_bytes()[..])
    }
}

impl Eq for Fp747Element {}
impl PartialEq for Fp747Element {
    /// Test equality between two `Fp747Element`s.
    ///
    /// # Warning
    ///
    /// This comparison is *not* constant time.
    fn eq(&self, other: &Fp747Element) -> bool {
        let lhs = self.strong_reduce();
        let rhs = other.strong_reduce();

        let mut eq: bool = true;
        for i in 0..FP747_NUM_WORDS {
            eq = (lhs.0[i] == rhs.0[i]) && eq;
        }
        eq
    }
}

impl<'b> AddAssign<&'b Fp747X2> for Fp747X2 {
    fn add_assign(&mut self, rhs: &'b Fp747X2) {
        let result = (self as &Fp747X2) + rhs;
        self.0 = result.0
    }
}

impl<'a, 'b> Add<&'b Fp747X2> for &'a Fp747X2 {
    type Output = Fp747X2;
    fn add(self, rhs: &'b Fp747X2) -> Fp747X2 {
        let mut result = Fp747X2::zero();
        mp_add747x2(self, rhs, &mut result);
        result
    }
}

impl<'b> SubAssign<&'b Fp747X2> for Fp747X2 {
    fn sub_assign(&mut self, rhs: &'b Fp747X2) {
        let result = (self as &Fp747X2) - rhs;
        self.0 = result.0
    }
}

impl<'a, 'b> Sub<&'b Fp747X2> for &'a Fp747X2 {
    type Output = Fp747X2;
    fn sub(self, rhs: &'b Fp747X2) -> Fp747X2 {
        let mut result = Fp747X2::zero();
        mp_sub747x2(self, rhs, &mut result);
        result
    }
}

impl Fp747X2 {
    /// Perform Montgomery reduction, `x R^{-1} (mod p)`.
    pub fn reduce(&self) -> Fp747Element {
        let mut result = Fp747Element::zero();
        rdc747(self, &mut result);
        result
    }
}
