//! Montgomery curve arithmetic on the Kummer line.
//!
//! Points carry only projective (X : Z) coordinates. Curve coefficients
//! travel in the two projective forms the walks consume: (A+2C : 4C)
//! for doubling and quintupling, (A-2C, A+2C) for tripling; any common
//! scaling of a pair describes the same curve.

use core::fmt::Debug;

use subtle::Choice;
use subtle::ConditionallySelectable;

#[cfg(test)]
use quickcheck::{Arbitrary, Gen};

use crate::field::ExtensionFieldElement;

// Macro to assign tuples, as Rust does not allow tuples as lvalue.
macro_rules! assign {
    {($v1:ident, $v2:ident) = $e:expr} =>
    {
        {
            let (v1, v2) = $e;
            $v1 = v1;
            $v2 = v2;
        }
    };
}

/// Coefficients (A+2C : 4C), the form consumed by doubling, by
/// quintupling and by the 4-isogeny walk.
#[derive(Copy, Clone)]
pub struct DoublingParameters {
    pub A24plus: ExtensionFieldElement,
    pub C24: ExtensionFieldElement,
}

impl DoublingParameters {
    /// The base curve E₀ : y² = x³ + x, as (A+2C : 4C) ∝ (1 : 2).
    pub fn base_curve() -> DoublingParameters {
        let one = ExtensionFieldElement::one();
        let two = &one + &one;
        DoublingParameters {
            A24plus: one,
            C24: two,
        }
    }

    /// Coefficients of E_A (C = 1) from the affine coefficient A.
    pub fn from_affine_a(a: &ExtensionFieldElement) -> DoublingParameters {
        let one = ExtensionFieldElement::one();
        let two = &one + &one;
        DoublingParameters {
            A24plus: a + &two,
            C24: &two + &two,
        }
    }

    /// Recover the coefficients from the image of a 2-torsion point
    /// α = (Xα : Zα): A+2C = (Xα-Zα)², 4C = (Xα-Zα)² - (Xα+Zα)².
    pub fn recover_from_alpha(alpha: &ProjectivePoint) -> DoublingParameters {
        let a24plus = (&alpha.X - &alpha.Z).square();
        let sum_sq = (&alpha.X + &alpha.Z).square();
        let c24 = &a24plus - &sum_sq;
        DoublingParameters {
            A24plus: a24plus,
            C24: c24,
        }
    }

    /// Recover the coefficients from three projective points P, Q, R
    /// with R = Q - P, all on the same curve. The projective analog of
    /// the affine `recover_curve_parameters` reconstruction.
    pub fn recover_from_basis(
        p: &ProjectivePoint,
        q: &ProjectivePoint,
        r: &ProjectivePoint,
    ) -> DoublingParameters {
        let mut t0 = &p.X * &q.X;
        t0 = &t0 * &r.X;             // = XP*XQ*XR
        let mut t1 = &p.Z * &q.Z;
        t1 = &t1 * &r.Z;             // = ZP*ZQ*ZR
        t0 = &t0 + &t0;              // = 2*(XP*XQ*XR)
        let t8 = &t1 + &t1;          // = 2*(ZP*ZQ*ZR)
        let c24 = &t8 * &t0;         // = 4*(XP*XQ*XR)*(ZP*ZQ*ZR)
        let t2 = &p.X * &r.Z;        // = XP*ZR
        let t3 = &q.X * &p.Z;        // = XQ*ZP
        let t4 = &r.X * &q.Z;        // = XR*ZQ
        let t5 = &t2 * &q.Z;         // = XP*ZR*ZQ
        let t6 = &t3 * &r.Z;         // = XQ*ZP*ZR
        let t7 = &t4 * &p.Z;         // = XR*ZQ*ZP
        let mut t6 = &t5 + &t6;
        t6 = &t6 + &t7;              // = XP*ZR*ZQ + XQ*ZP*ZR + XR*ZQ*ZP
        t0 = &t0 + &t0;              // = 4*(XP*XQ*XR)
        t6 = &t0 * &t6;
        t6 = -(&t6);                 // = -4*(XP*XQ*XR)*(XP*ZR*ZQ + XQ*ZP*ZR + XR*ZQ*ZP)
        let t2 = &t2 * &q.X;         // = XP*XQ*ZR
        let t3 = &t3 * &r.X;         // = XQ*XR*ZP
        let t4 = &t4 * &p.X;         // = XR*XP*ZQ
        let mut t2 = &t2 + &t3;
        t2 = &t2 + &t4;              // = XP*XQ*ZR + XQ*XR*ZP + XR*XP*ZQ
        t2 = &t2 - &t1;              // = XP*XQ*ZR + XQ*XR*ZP + XR*XP*ZQ - ZP*ZQ*ZR
        t2 = t2.square();
        t2 = &t2 + &t6;
        let t0 = &c24 + &c24;        // = 8*(XP*XQ*XR)*(ZP*ZQ*ZR)
        DoublingParameters {
            A24plus: &t2 + &t0,
            C24: &t0 + &t0,          // = 16*(XP*XQ*XR)*(ZP*ZQ*ZR)
        }
    }
}

/// Coefficients (A-2C, A+2C), the form consumed by tripling and the
/// 3-isogeny walk.
#[derive(Copy, Clone)]
pub struct TriplingParameters {
    pub A24minus: ExtensionFieldElement,
    pub A24plus: ExtensionFieldElement,
}

impl TriplingParameters {
    /// The base curve E₀ : y² = x³ + x, as (A-2C, A+2C) = (-2, 2).
    pub fn base_curve() -> TriplingParameters {
        let one = ExtensionFieldElement::one();
        let two = &one + &one;
        TriplingParameters {
            A24minus: -(&two),
            A24plus: two,
        }
    }

    /// Coefficients of E_A (C = 1) from the affine coefficient A.
    pub fn from_affine_a(a: &ExtensionFieldElement) -> TriplingParameters {
        let one = ExtensionFieldElement::one();
        let two = &one + &one;
        TriplingParameters {
            A24minus: a - &two,
            A24plus: a + &two,
        }
    }
}

/// A Montgomery curve in the (A : C) coefficient pair of
/// E_(A:C) : C·y² = C·x³ + A·x² + C·x.
#[derive(Copy, Clone, PartialEq)]
pub struct ProjectiveCurveParameters {
    pub A: ExtensionFieldElement,
    pub C: ExtensionFieldElement,
}

impl Debug for ProjectiveCurveParameters {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "ProjectiveCurveParameters(A: {:?}\nC: {:?})", &self.A, &self.C)
    }
}

impl ProjectiveCurveParameters {
    /// Recover the curve parameters from three affine x-coordinates
    /// satisfying x_{Q-P} = x(Q - P). No inversion; the result is the
    /// projective pair (A : C).
    pub fn recover_curve_parameters(
        affine_xP: &ExtensionFieldElement,
        affine_xQ: &ExtensionFieldElement,
        affine_xQmP: &ExtensionFieldElement,
    ) -> ProjectiveCurveParameters {
        let mut t0 = ExtensionFieldElement::one(); // = 1
        let mut t1 = affine_xP * affine_xQ;        // = x_P * x_Q
        t0 = &t0 - &t1;                            // = 1 - x_P * x_Q
        t1 = affine_xP * affine_xQmP;              // = x_P * x_{Q-P}
        t0 = &t0 - &t1;                            // = 1 - x_P * x_Q - x_P * x_{Q-P}
        t1 = affine_xQ * affine_xQmP;              // = x_Q * x_{Q-P}
        t0 = &t0 - &t1;                            // = 1 - x_P * x_Q - x_P * x_{Q-P} - x_Q * x_{Q-P}
        let mut a = t0.square();
        t1 = &t1 * affine_xP;                      // = x_P * x_Q * x_{Q-P}
        t1 = &t1 + &t1;                            // = 2 * x_P * x_Q * x_{Q-P}
        let c = &t1 + &t1;                         // = 4 * x_P * x_Q * x_{Q-P}
        t0 = affine_xP + affine_xQ;
        t0 = &t0 + affine_xQmP;                    // = x_P + x_Q + x_{Q-P}
        t1 = &c * &t0;
        a = &a - &t1;

        ProjectiveCurveParameters { A: a, C: c }
    }

    /// The affine coefficient A = A/C, one inversion.
    pub fn affine_a(&self) -> ExtensionFieldElement {
        &self.C.inv() * &self.A
    }

    /// Unscramble (A+2C : 4C) back to (A : C).
    pub fn from_doubling_parameters(params: &DoublingParameters) -> ProjectiveCurveParameters {
        let c2 = params.C24.div2();      // = 2C
        ProjectiveCurveParameters {
            A: &params.A24plus - &c2,    // = A
            C: c2.div2(),                // = C
        }
    }

    /// Unscramble (A-2C, A+2C) back to (A : C), scaled by 4.
    pub fn from_tripling_parameters(params: &TriplingParameters) -> ProjectiveCurveParameters {
        let a2 = &params.A24plus + &params.A24minus; // = 2A
        ProjectiveCurveParameters {
            A: &a2 + &a2,                            // = 4A
            C: &params.A24plus - &params.A24minus,   // = 4C
        }
    }

    /// Compute the j-invariant j = 256·(A²-3C²)³ / (C⁴·(A²-4C²)).
    pub fn j_invariant(&self) -> ExtensionFieldElement {
        let mut jinv = self.A.square();  // = A^2
        let t1 = self.C.square();        // = C^2
        let mut t0 = &t1 + &t1;          // = 2C^2
        t0 = &jinv - &t0;                // = A^2 - 2C^2
        t0 = &t0 - &t1;                  // = A^2 - 3C^2
        jinv = &t0 - &t1;                // = A^2 - 4C^2
        let c4 = t1.square();            // = C^4
        jinv = &jinv * &c4;              // = C^4*(A^2 - 4C^2)
        t0 = &t0 + &t0;
        t0 = &t0 + &t0;                  // = 4*(A^2 - 3C^2)
        let t2 = t0.square();            // = 16*(A^2 - 3C^2)^2
        t0 = &t0 * &t2;                  // = 64*(A^2 - 3C^2)^3
        t0 = &t0 + &t0;
        t0 = &t0 + &t0;                  // = 256*(A^2 - 3C^2)^3
        jinv = jinv.inv();
        &jinv * &t0
    }
}

/// A point on the Kummer line of a Montgomery curve, in projective
/// (X : Z) coordinates. Z = 0 encodes the point at infinity.
#[derive(Copy, Clone, PartialEq)]
pub struct ProjectivePoint {
    pub X: ExtensionFieldElement,
    pub Z: ExtensionFieldElement,
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ProjectivePoint {
            X: ExtensionFieldElement::conditional_select(&a.X, &b.X, choice),
            Z: ExtensionFieldElement::conditional_select(&a.Z, &b.Z, choice),
        }
    }

    fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        ExtensionFieldElement::conditional_swap(&mut a.X, &mut b.X, choice);
        ExtensionFieldElement::conditional_swap(&mut a.Z, &mut b.Z, choice);
    }
}

impl Debug for ProjectivePoint {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "ProjectivePoint(X: {:?}\nZ: {:?})", &self.X, &self.Z)
    }
}

#[cfg(test)]
impl Arbitrary for ProjectivePoint {
    fn arbitrary(g: &mut Gen) -> ProjectivePoint {
        ProjectivePoint {
            X: ExtensionFieldElement::arbitrary(g),
            Z: ExtensionFieldElement::arbitrary(g),
        }
    }
}

impl ProjectivePoint {
    pub fn from_affine(x: &ExtensionFieldElement) -> ProjectivePoint {
        ProjectivePoint {
            X: *x,
            Z: ExtensionFieldElement::one(),
        }
    }

    pub fn to_affine(&self) -> ExtensionFieldElement {
        &self.Z.inv() * &self.X
    }

    /// Whether this is the point at infinity. Takes variable time.
    pub fn vartime_is_infinity(&self) -> bool {
        self.Z.vartime_eq(&ExtensionFieldElement::zero())
    }

    /// Returns true if both sides are equal as points on the Kummer
    /// line. Takes variable time.
    pub fn vartime_eq(&self, rhs: &ProjectivePoint) -> bool {
        let t0 = &self.X * &rhs.Z;
        let t1 = &self.Z * &rhs.X;
        t0.vartime_eq(&t1)
    }

    /// Doubling, xQ = x([2]P).
    pub fn double(&self, curve: &DoublingParameters) -> ProjectivePoint {
        let t0 = (&self.X - &self.Z).square();  // = (X1-Z1)^2
        let t1 = (&self.X + &self.Z).square();  // = (X1+Z1)^2
        let mut z = &curve.C24 * &t0;           // = C24*(X1-Z1)^2
        let x = &t1 * &z;                       // = C24*(X1-Z1)^2*(X1+Z1)^2
        let t1 = &t1 - &t0;                     // = (X1+Z1)^2 - (X1-Z1)^2
        let t0 = &curve.A24plus * &t1;          // = A24plus*[(X1+Z1)^2 - (X1-Z1)^2]
        z = &z + &t0;
        z = &z * &t1;

        ProjectivePoint { X: x, Z: z }
    }

    /// Repeated doubling, xQ = x([2^k]P).
    pub fn pow2k(&self, curve: &DoublingParameters, k: u32) -> ProjectivePoint {
        let mut xQ = *self;
        for _ in 0..k {
            xQ = xQ.double(curve);
        }
        xQ
    }

    /// Tripling, xQ = x([3]P).
    pub fn triple(&self, curve: &TriplingParameters) -> ProjectivePoint {
        let t0 = &self.X - &self.Z;
        let t2 = t0.square();                // = (X-Z)^2
        let t1 = &self.X + &self.Z;
        let t3 = t1.square();                // = (X+Z)^2
        let t4 = &t0 + &t1;                  // = 2*X
        let t0 = &t1 - &t0;                  // = 2*Z
        let mut t1 = t4.square();            // = 4*X^2
        t1 = &t1 - &t3;
        t1 = &t1 - &t2;                      // = 4*X^2 - (X+Z)^2 - (X-Z)^2
        let t5 = &t3 * &curve.A24plus;       // = A24plus*(X+Z)^2
        let t3 = &t3 * &t5;                  // = A24plus*(X+Z)^4
        let t6 = &curve.A24minus * &t2;      // = A24minus*(X-Z)^2
        let t2 = &t2 * &t6;                  // = A24minus*(X-Z)^4
        let t3 = &t2 - &t3;                  // = A24minus*(X-Z)^4 - A24plus*(X+Z)^4
        let t2 = &t5 - &t6;                  // = A24plus*(X+Z)^2 - A24minus*(X-Z)^2
        t1 = &t1 * &t2;
        let mut t2 = &t3 + &t1;
        t2 = t2.square();
        let x = &t4 * &t2;                   // = 2*X*t2^2
        let mut t1 = &t3 - &t1;
        t1 = t1.square();
        let z = &t0 * &t1;                   // = 2*Z*t1^2

        ProjectivePoint { X: x, Z: z }
    }

    /// Repeated tripling, xQ = x([3^k]P).
    pub fn pow3k(&self, curve: &TriplingParameters, k: u32) -> ProjectivePoint {
        let mut xQ = *self;
        for _ in 0..k {
            xQ = xQ.triple(curve);
        }
        xQ
    }

    /// Quintupling, xQ = x([5]P): one doubling then two fused
    /// double-and-add steps climbing 2P → 3P → 5P, with the original
    /// point as the projective difference.
    pub fn quintuple(&self, curve: &DoublingParameters) -> ProjectivePoint {
        let mut r0 = *self;
        let mut q = self.double(curve);
        assign! {(r0, q) = r0.dbl_add_projective(&q, self, curve)}; // r0 = 2P, q = 3P
        assign! {(r0, q) = r0.dbl_add_projective(&q, self, curve)}; // r0 = 4P, q = 5P
        let _ = r0;
        q
    }

    /// Repeated quintupling, xQ = x([5^k]P).
    pub fn pow5k(&self, curve: &DoublingParameters, k: u32) -> ProjectivePoint {
        let mut xQ = *self;
        for _ in 0..k {
            xQ = xQ.quintuple(curve);
        }
        xQ
    }

    /// Fused doubling and differential addition: given P, Q and the
    /// affine difference x(P-Q), compute ([2]P, P+Q). A24 = (A+2)/4.
    ///
    /// Cost: 6M+4S+8A.
    fn dbl_add(
        &self,
        xQ: &ProjectivePoint,
        affine_xPQ: &ExtensionFieldElement,
        a24: &ExtensionFieldElement,
    ) -> (ProjectivePoint, ProjectivePoint) {
        let sum = &self.X + &self.Z;        // = XP+ZP
        let diff = &self.X - &self.Z;       // = XP-ZP
        let sum_sq = sum.square();          // = (XP+ZP)^2
        let t2 = &xQ.X - &xQ.Z;             // = XQ-ZQ
        let q_sum = &xQ.X + &xQ.Z;          // = XQ+ZQ
        let t0 = &sum * &t2;                // = (XP+ZP)*(XQ-ZQ)
        let diff_sq = diff.square();        // = (XP-ZP)^2
        let t1 = &diff * &q_sum;            // = (XP-ZP)*(XQ+ZQ)
        let xz4 = &sum_sq - &diff_sq;       // = 4*XP*ZP
        let x2p = &sum_sq * &diff_sq;
        let mut z2p = &xz4 * a24;           // = A24*4*XP*ZP
        z2p = &z2p + &diff_sq;
        z2p = &z2p * &xz4;
        let mut zpq = &t0 - &t1;
        let mut xpq = &t0 + &t1;
        zpq = zpq.square();
        xpq = xpq.square();
        zpq = &zpq * affine_xPQ;

        (
            ProjectivePoint { X: x2p, Z: z2p },
            ProjectivePoint { X: xpq, Z: zpq },
        )
    }

    /// Fused doubling and differential addition with the difference
    /// point in projective form, over (A+2C : 4C) coefficients. Used by
    /// quintupling, where the difference has no affine representative
    /// at hand.
    fn dbl_add_projective(
        &self,
        xQ: &ProjectivePoint,
        diff_point: &ProjectivePoint,
        curve: &DoublingParameters,
    ) -> (ProjectivePoint, ProjectivePoint) {
        let sum = &self.X + &self.Z;
        let diff = &self.X - &self.Z;
        let sum_sq = sum.square();
        let t2 = &xQ.X - &xQ.Z;
        let q_sum = &xQ.X + &xQ.Z;
        let t0 = &sum * &t2;
        let diff_sq = diff.square();
        let t1 = &diff * &q_sum;
        let xz4 = &sum_sq - &diff_sq;       // = 4*XP*ZP
        let mut x2p = &sum_sq * &diff_sq;
        x2p = &x2p * &curve.C24;
        let a_term = &xz4 * &curve.A24plus;
        let mut z2p = &diff_sq * &curve.C24;
        z2p = &a_term + &z2p;
        z2p = &z2p * &xz4;
        let mut zpq = &t0 - &t1;
        let mut xpq = &t0 + &t1;
        zpq = zpq.square();
        xpq = xpq.square();
        xpq = &xpq * &diff_point.Z;         // = ZPQ*[(XP+ZP)*(XQ-ZQ)+(XP-ZP)*(XQ+ZQ)]^2
        zpq = &zpq * &diff_point.X;         // = XPQ*[(XP+ZP)*(XQ-ZQ)-(XP-ZP)*(XQ+ZQ)]^2

        (
            ProjectivePoint { X: x2p, Z: z2p },
            ProjectivePoint { X: xpq, Z: zpq },
        )
    }

    /// The three-point ladder: given affine x(P), x(Q), x(P-Q) on E_A
    /// and a scalar m, compute x(P + [m]Q).
    ///
    /// The ladder scans exactly `nbits` bits of the little-endian
    /// scalar, least significant first; its execution time depends only
    /// on `nbits`. The swap of the accumulator pair is a branch-free
    /// conditional swap driven by `bit ^ prevbit`.
    pub fn three_point_ladder(
        xP: &ExtensionFieldElement,
        xQ: &ExtensionFieldElement,
        xPQ: &ExtensionFieldElement,
        scalar: &[u8],
        nbits: usize,
        affine_a: &ExtensionFieldElement,
    ) -> ProjectivePoint {
        debug_assert!(nbits <= 8 * scalar.len());

        let one = ExtensionFieldElement::one();
        let mut a24 = &one + &one;
        a24 = affine_a + &a24;
        a24 = a24.div2();
        a24 = a24.div2();          // = (A+2)/4

        let mut r0 = ProjectivePoint::from_affine(xQ);
        let mut r2 = ProjectivePoint::from_affine(xPQ);
        let mut r = ProjectivePoint::from_affine(xP);

        let mut prevbit: u8 = 0;
        for i in 0..nbits {
            let bit = (scalar[i >> 3] >> (i & 7)) & 1;
            let swap = bit ^ prevbit;
            prevbit = bit;

            ProjectivePoint::conditional_swap(&mut r, &mut r2, Choice::from(swap));
            assign! {(r0, r2) = r0.dbl_add(&r2, &r.X, &a24)};
            r2.X = &r2.X * &r.Z;
        }
        r
    }
}
