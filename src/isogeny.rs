//! Construction and evaluation of the 3-, 4- and 5-isogenies that make
//! up the three walks.
//!
//! Degrees 3 and 4 precompute a short coefficient vector from the
//! kernel point; degree 5 keeps the kernel point and its double and
//! evaluates through two criss-cross steps (Costello-Hisil).

use crate::curve::{DoublingParameters, ProjectivePoint, TriplingParameters};
use crate::field::ExtensionFieldElement;

/// A 3-isogeny φ, holding the data necessary to evaluate φ.
#[derive(Copy, Clone)]
pub struct ThreeIsogeny {
    pub X_minus_Z: ExtensionFieldElement,
    pub X_plus_Z: ExtensionFieldElement,
}

impl ThreeIsogeny {
    /// Given a three-torsion point x3 = x(P_3) on the curve, construct
    /// the three-isogeny φ : E -> E/<P_3> = E'.
    ///
    /// Returns (codomain, φ) with the codomain in (A-2C, A+2C) form.
    pub(crate) fn compute_three_isogeny(
        x3: &ProjectivePoint,
    ) -> (TriplingParameters, ThreeIsogeny) {
        let isogeny = ThreeIsogeny {
            X_minus_Z: &x3.X - &x3.Z,
            X_plus_Z: &x3.X + &x3.Z,
        };
        let t0 = isogeny.X_minus_Z.square();   // = (X-Z)^2
        let t1 = isogeny.X_plus_Z.square();    // = (X+Z)^2
        let mut t2 = &t0 + &t1;
        let mut t3 = &isogeny.X_minus_Z + &isogeny.X_plus_Z; // = 2*X
        t3 = t3.square();                      // = 4*X^2
        t3 = &t3 - &t2;                        // = 4*X^2 - (X+Z)^2 - (X-Z)^2
        t2 = &t1 + &t3;                        // = 4*X^2 - (X-Z)^2
        t3 = &t3 + &t0;                        // = 4*X^2 - (X+Z)^2
        let mut t4 = &t0 + &t3;
        t4 = &t4 + &t4;
        t4 = &t1 + &t4;                        // = 8*X^2 - (X+Z)^2 + 2*(X-Z)^2
        let a24minus = &t2 * &t4;              // = [4*X^2 - (X-Z)^2]*[8*X^2 - (X+Z)^2 + 2*(X-Z)^2]
        let mut t4 = &t1 + &t2;
        t4 = &t4 + &t4;
        t4 = &t0 + &t4;                        // = 8*X^2 + 2*(X+Z)^2 - (X-Z)^2
        t4 = &t3 * &t4;                        // = [4*X^2 - (X+Z)^2]*[8*X^2 + 2*(X+Z)^2 - (X-Z)^2]
        let t0 = &t4 - &a24minus;
        let a24plus = &a24minus + &t0;

        let codomain = TriplingParameters {
            A24minus: a24minus,
            A24plus: a24plus,
        };
        (codomain, isogeny)
    }

    /// Given a point xQ = x(Q), compute x(φ(Q)) on the codomain.
    pub(crate) fn eval(&self, xQ: &ProjectivePoint) -> ProjectivePoint {
        let mut t0 = &xQ.X + &xQ.Z;
        let mut t1 = &xQ.X - &xQ.Z;
        t0 = &t0 * &self.X_minus_Z;    // = coeff0*(X+Z)
        t1 = &t1 * &self.X_plus_Z;     // = coeff1*(X-Z)
        let mut t2 = &t0 + &t1;
        t0 = &t1 - &t0;
        t2 = t2.square();              // = [coeff0*(X+Z) + coeff1*(X-Z)]^2
        t0 = t0.square();              // = [coeff1*(X-Z) - coeff0*(X+Z)]^2

        ProjectivePoint {
            X: &xQ.X * &t2,
            Z: &xQ.Z * &t0,
        }
    }
}

/// A 4-isogeny φ, holding the data necessary to evaluate φ.
#[derive(Copy, Clone)]
pub struct FourIsogeny {
    pub Zsq4: ExtensionFieldElement,       // = 4*Z4^2
    pub X_minus_Z: ExtensionFieldElement,  // = X4 - Z4
    pub X_plus_Z: ExtensionFieldElement,   // = X4 + Z4
}

impl FourIsogeny {
    /// Given a four-torsion point x4 = x(P_4) on the curve, construct
    /// the four-isogeny φ : E -> E/<P_4> = E'.
    ///
    /// Returns (codomain, φ) with the codomain in (A+2C : 4C) form,
    /// here (4·X4⁴ : 4·Z4⁴).
    pub(crate) fn compute_four_isogeny(
        x4: &ProjectivePoint,
    ) -> (DoublingParameters, FourIsogeny) {
        let x_minus_z = &x4.X - &x4.Z;
        let x_plus_z = &x4.X + &x4.Z;
        let mut zsq = x4.Z.square();     // = Z4^2
        zsq = &zsq + &zsq;               // = 2*Z4^2
        let c24 = zsq.square();          // = 4*Z4^4
        let zsq4 = &zsq + &zsq;          // = 4*Z4^2
        let mut a24plus = x4.X.square(); // = X4^2
        a24plus = &a24plus + &a24plus;   // = 2*X4^2
        a24plus = a24plus.square();      // = 4*X4^4

        let codomain = DoublingParameters {
            A24plus: a24plus,
            C24: c24,
        };
        let isogeny = FourIsogeny {
            Zsq4: zsq4,
            X_minus_Z: x_minus_z,
            X_plus_Z: x_plus_z,
        };
        (codomain, isogeny)
    }

    /// Given a point xP = x(P), compute x(φ(P)) on the codomain.
    pub(crate) fn eval(&self, xP: &ProjectivePoint) -> ProjectivePoint {
        let t0 = &xP.X + &xP.Z;
        let t1 = &xP.X - &xP.Z;
        let x = &t0 * &self.X_minus_Z;  // = (X+Z)*coeff1
        let z = &t1 * &self.X_plus_Z;   // = (X-Z)*coeff2
        let mut t0 = &t0 * &t1;         // = (X+Z)*(X-Z)
        t0 = &t0 * &self.Zsq4;          // = coeff0*(X+Z)*(X-Z)
        let mut t1 = &x + &z;           // = (X-Z)*coeff2 + (X+Z)*coeff1
        let mut z = &x - &z;            // = (X-Z)*coeff2 - (X+Z)*coeff1
        t1 = t1.square();
        z = z.square();
        let mut x = &t1 + &t0;
        let t0 = &z - &t0;
        x = &x * &t1;
        z = &z * &t0;

        ProjectivePoint { X: x, Z: z }
    }
}

/// A 5-isogeny φ. No coefficient vector is precomputed; evaluation
/// works directly from the kernel point and its double.
#[derive(Copy, Clone)]
pub struct FiveIsogeny {
    pub kernel: ProjectivePoint,
    pub kernel_double: ProjectivePoint,
}

// The criss-cross operation (α·δ + β·γ, α·δ - β·γ).
fn criss_cross(
    alpha: &ExtensionFieldElement,
    beta: &ExtensionFieldElement,
    gamma: &ExtensionFieldElement,
    delta: &ExtensionFieldElement,
) -> (ExtensionFieldElement, ExtensionFieldElement) {
    let t0 = alpha * delta;
    let t1 = beta * gamma;
    (&t0 + &t1, &t0 - &t1)
}

impl FiveIsogeny {
    /// Given a five-torsion point x5 = x(P_5), construct the
    /// five-isogeny φ : E -> E/<P_5>. The curve parameters are needed
    /// to form [2]P_5.
    ///
    /// The codomain coefficients are not derived here; the caller
    /// recovers them from the image of a 2-torsion witness or of a full
    /// basis triple.
    pub(crate) fn compute_five_isogeny(
        x5: &ProjectivePoint,
        curve: &DoublingParameters,
    ) -> FiveIsogeny {
        FiveIsogeny {
            kernel: *x5,
            kernel_double: x5.double(curve),
        }
    }

    /// Given a point xQ = x(Q), compute x(φ(Q)) on the codomain.
    pub(crate) fn eval(&self, xQ: &ProjectivePoint) -> ProjectivePoint {
        let t2 = &self.kernel.X + &self.kernel.Z;
        let t3 = &self.kernel.X - &self.kernel.Z;
        let t4 = &self.kernel_double.X + &self.kernel_double.Z;
        let t5 = &self.kernel_double.X - &self.kernel_double.Z;
        let x_hat = &xQ.X + &xQ.Z;
        let z_hat = &xQ.X - &xQ.Z;

        let (t2, t3) = criss_cross(&t2, &t3, &x_hat, &z_hat);
        let (t4, t5) = criss_cross(&t4, &t5, &x_hat, &z_hat);
        let mut t0 = &t4 * &t2;
        let mut t1 = &t5 * &t3;
        t0 = t0.square();
        t1 = t1.square();

        ProjectivePoint {
            X: &t0 * &xQ.X,
            Z: &t1 * &xQ.Z,
        }
    }
}

// Kernel points below are derived from fixed secret scalars; the image
// vectors were generated with an independent implementation of the
// exchange. All field elements are in Montgomery form.
#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::fp747::Fp747Element;
    use crate::constants::*;
    use crate::field::ExtensionFieldElement;

    const SK_A: [u8; 48] = [
        141, 79, 50, 115, 138, 100, 188, 14, 34, 83, 225, 93, 145, 179, 124, 122,
        69, 34, 162, 113, 114, 17, 214, 204, 20, 82, 36, 250, 138, 7, 180, 241,
        1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];
    const SK_B: [u8; 48] = [
        104, 93, 221, 188, 8, 175, 89, 146, 156, 215, 235, 118, 242, 190, 93, 64,
        245, 205, 188, 71, 82, 96, 222, 71, 121, 46, 35, 207, 4, 143, 2, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];
    const SK_C: [u8; 48] = [
        219, 180, 214, 247, 246, 89, 25, 115, 116, 43, 154, 134, 189, 191, 209, 246,
        192, 122, 83, 17, 175, 238, 211, 102, 242, 127, 152, 157, 138, 76, 5, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];

    // x(φ(P_B)) for the first 4-isogeny of the walk keyed by SK_A.
    const AFFINE_FOUR_ISOG_XPB: ExtensionFieldElement = ExtensionFieldElement {
        A: Fp747Element([0x12dc8592237e6573, 0xde5206cb02e4dcc0, 0xeab3becfcb55e6f, 0x8239c79be1637c05, 0xa81e62ca9ae9edcd, 0xc930a236da90b402, 0xabd6a2305158e8d4, 0x366cb14a48be859, 0xb3930d2d77f42f41, 0xe9b0d43d0ee39ae9, 0xe70de777ed48ecc4, 0x48621f5b9bc]),
        B: Fp747Element([0xdbd7b20549353897, 0xb8928f55a5baabdd, 0x434a5cefb071a2c1, 0x6be0f40915eaf0b5, 0x31807ccaa50fd130, 0xcfdf2adaa466ad4a, 0xb324a74cdeeb8eb4, 0x34e259d071bc2257, 0x78f5c8a6798c993d, 0x58639442653256b4, 0x641bbe519fc86f11, 0x3bf3e5b0b0d]),
    };

    // x(φ(P_A)) for the first 3-isogeny of the walk keyed by SK_B.
    const AFFINE_THREE_ISOG_XPA: ExtensionFieldElement = ExtensionFieldElement {
        A: Fp747Element([0x9258634df1a30aff, 0x19103c929bd11912, 0x470ae180102272c9, 0x1a1641c7c3162b92, 0x4c5fa89fd024ae38, 0xf973b82affd13f81, 0x1ae6f3b7ba4ec00e, 0x106dcf9a4f08e8d0, 0x4dc2dc72c6f6e556, 0x76b857c798c2cfed, 0xdde990ba134e4393, 0x2fdd7467c2e]),
        B: Fp747Element([0x77e2364ee91a5b, 0xe065c7ef35c4152b, 0xa3dd14da234139f9, 0x65a04244bab12126, 0x1272e28ad68dc2ac, 0xffab282bfad2a2e5, 0xe53922e758061c5d, 0xeb1d2eabc8aed374, 0xf1da6472243064c6, 0x10ed06f2e9be91f, 0xf49dbbda0d375a4d, 0x3bd9159b20c]),
    };

    // x(φ(P_A)) for the first 5-isogeny of the walk keyed by SK_C.
    const AFFINE_FIVE_ISOG_XPA: ExtensionFieldElement = ExtensionFieldElement {
        A: Fp747Element([0xf82552bcb1a487a0, 0x5aca5684ad3e011d, 0x1c516f98cc989819, 0x4c506c2e9a637bdc, 0x25a8dc3a745386d3, 0xe4cb6765c6482cd5, 0xbdcdf05ccea96d9, 0x509b6eef0e7b0ffc, 0x6e61d1191e764ed9, 0xddedab6a1fe10e5f, 0xfcbc6f50b702f72e, 0x3152361e462]),
        B: Fp747Element([0x32839ea2fd2c1ebd, 0xecf39ebc243b68f3, 0x8dccce1dc6d1fa84, 0xb1ccc9f60bf2350c, 0x4a857d066a5a9dac, 0x9a874d210ab302dd, 0x73f71118f8f3ffd8, 0x9054003c9884bc26, 0x2879e0393b575044, 0x61a221fb4e8c67a4, 0x22e4f5583fa6de06, 0x368d3e44f3e]),
    };

    fn kernel_of_order_four() -> ProjectivePoint {
        let basis = alice_basis();
        let r = ProjectivePoint::three_point_ladder(
            &basis.xP,
            &basis.xQ,
            &basis.xR,
            &SK_A,
            OALICE_BITS,
            &ExtensionFieldElement::zero(),
        );
        r.pow2k(&DoublingParameters::base_curve(), 2 * (MAX_ALICE as u32 - 1))
    }

    fn kernel_of_order_three() -> ProjectivePoint {
        let basis = bob_basis();
        let r = ProjectivePoint::three_point_ladder(
            &basis.xP,
            &basis.xQ,
            &basis.xR,
            &SK_B,
            OBOB_BITS,
            &ExtensionFieldElement::zero(),
        );
        r.pow3k(&TriplingParameters::base_curve(), MAX_BOB as u32 - 1)
    }

    fn kernel_of_order_five() -> ProjectivePoint {
        let basis = eve_basis();
        let r = ProjectivePoint::three_point_ladder(
            &basis.xP,
            &basis.xQ,
            &basis.xR,
            &SK_C,
            OEVE_BITS,
            &ExtensionFieldElement::zero(),
        );
        r.pow5k(&DoublingParameters::base_curve(), MAX_EVE as u32 - 1)
    }

    #[test]
    fn four_isogeny_image() {
        let kernel = kernel_of_order_four();
        let (_, phi) = FourIsogeny::compute_four_isogeny(&kernel);
        let image = phi.eval(&ProjectivePoint::from_affine(&bob_basis().xP));
        assert!(image.to_affine().vartime_eq(&AFFINE_FOUR_ISOG_XPB));
    }

    #[test]
    fn four_isogeny_kills_kernel() {
        let kernel = kernel_of_order_four();
        // [4]K = O on the domain curve...
        let multiplied = kernel.pow2k(&DoublingParameters::base_curve(), 2);
        assert!(multiplied.vartime_is_infinity());
        // ...and φ(K) = O on the codomain.
        let (_, phi) = FourIsogeny::compute_four_isogeny(&kernel);
        assert!(phi.eval(&kernel).vartime_is_infinity());
    }

    #[test]
    fn three_isogeny_image() {
        let kernel = kernel_of_order_three();
        let (_, phi) = ThreeIsogeny::compute_three_isogeny(&kernel);
        let image = phi.eval(&ProjectivePoint::from_affine(&alice_basis().xP));
        assert!(image.to_affine().vartime_eq(&AFFINE_THREE_ISOG_XPA));
    }

    #[test]
    fn three_isogeny_kills_kernel() {
        let kernel = kernel_of_order_three();
        let multiplied = kernel.triple(&TriplingParameters::base_curve());
        assert!(multiplied.vartime_is_infinity());
        let (_, phi) = ThreeIsogeny::compute_three_isogeny(&kernel);
        assert!(phi.eval(&kernel).vartime_is_infinity());
    }

    #[test]
    fn five_isogeny_image() {
        let kernel = kernel_of_order_five();
        let phi = FiveIsogeny::compute_five_isogeny(&kernel, &DoublingParameters::base_curve());
        let image = phi.eval(&ProjectivePoint::from_affine(&alice_basis().xP));
        assert!(image.to_affine().vartime_eq(&AFFINE_FIVE_ISOG_XPA));
    }

    #[test]
    fn five_isogeny_kills_kernel() {
        let kernel = kernel_of_order_five();
        let multiplied = kernel.quintuple(&DoublingParameters::base_curve());
        assert!(multiplied.vartime_is_infinity());
        let phi = FiveIsogeny::compute_five_isogeny(&kernel, &DoublingParameters::base_curve());
        assert!(phi.eval(&kernel).vartime_is_infinity());
    }
}
