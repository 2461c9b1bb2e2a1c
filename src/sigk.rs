//! Ephemeral three-party supersingular isogeny group key agreement,
//! after Jalali's extension of the SIDH construction to coprime walk
//! degrees 2, 3 and 5.
//!
//! The parties are conventionally "Alice" (4-isogenies), "Bob"
//! (3-isogenies) and "Eve" (5-isogenies). Each publishes the images of
//! the other two parties' torsion bases under her secret isogeny; the
//! exchange then threads two rounds of shared-public messages until
//! every party reaches a curve with the common j-invariant.
//!
//! This crate does NOT implement public-key validation beyond canonical
//! field-element range checks, so keys must be ephemeral. Static keys
//! are insecure against the Galbraith-Petit-Shani-Ti active attack.

use core::fmt;
use core::fmt::Debug;
use core::ptr;

use rand_core::{CryptoRng, RngCore};

use crate::constants::*;
use crate::curve::{
    DoublingParameters, ProjectiveCurveParameters, ProjectivePoint, TriplingParameters,
};
use crate::field::ExtensionFieldElement;
use crate::strategy::*;

/// The secret key size, in bytes.
pub const SECRET_KEY_SIZE: usize = 48;
/// The public key size, in bytes.
pub const PUBLIC_KEY_SIZE: usize = 1134;
/// The shared-public message size, in bytes.
pub const SHARED_PUBLIC_SIZE: usize = 567;
/// The shared secret size, in bytes.
pub const SHARED_SECRET_SIZE: usize = 190;

// One GF(p747²) element on the wire.
const FP2_ENCODED_BYTES: usize = 188;
// Three contiguous field elements; the published 1134/567-byte formats
// are two triples / one triple plus trailing zero pad.
const BASIS_ENCODED_BYTES: usize = 3 * FP2_ENCODED_BYTES;

/// Errors a protocol operation can surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SIGKError {
    /// A decoded field element was not a canonical representative.
    InvalidPublicKey,
    /// The entropy source failed to produce key material.
    RngFailure,
}

impl fmt::Display for SIGKError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SIGKError::InvalidPublicKey => f.write_str("invalid public key"),
            SIGKError::RngFailure => f.write_str("entropy source failure"),
        }
    }
}

impl std::error::Error for SIGKError {}

/// Three affine x-coordinates x(P), x(Q), x(R) with R = Q - P on a
/// common (implicit) curve. Both halves of a public key and every
/// shared-public message have this shape; the curve itself is never
/// transmitted and is recovered from the triple.
#[derive(Copy, Clone)]
pub struct BasisTriple {
    pub affine_xP: ExtensionFieldElement,
    pub affine_xQ: ExtensionFieldElement,
    pub affine_xR: ExtensionFieldElement,
}

impl Debug for BasisTriple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "BasisTriple(xP: {:?}\nxQ: {:?}\nxR: {:?})",
            &self.affine_xP, &self.affine_xQ, &self.affine_xR
        )
    }
}

fn decode_fp2(bytes: &[u8]) -> Result<ExtensionFieldElement, SIGKError> {
    if !crate::backend::fp747::bytes_are_canonical(&bytes[0..94])
        || !crate::backend::fp747::bytes_are_canonical(&bytes[94..188])
    {
        return Err(SIGKError::InvalidPublicKey);
    }
    Ok(ExtensionFieldElement::from_bytes(bytes))
}

impl BasisTriple {
    /// Write a shared-public message. The output is 567 bytes; the
    /// trailing pad bytes are zero.
    pub fn to_bytes(&self) -> [u8; SHARED_PUBLIC_SIZE] {
        let mut bytes = [0u8; SHARED_PUBLIC_SIZE];
        self.write(&mut bytes);
        bytes
    }

    /// Read a shared-public message, rejecting non-canonical field
    /// elements. The input must be at least 567 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<BasisTriple, SIGKError> {
        assert!(
            bytes.len() >= SHARED_PUBLIC_SIZE,
            "Too short input to BasisTriple from_bytes, expected 567 bytes"
        );
        BasisTriple::read(bytes)
    }

    fn write(&self, out: &mut [u8]) {
        out[0..188].clone_from_slice(&self.affine_xP.to_bytes());
        out[188..376].clone_from_slice(&self.affine_xQ.to_bytes());
        out[376..564].clone_from_slice(&self.affine_xR.to_bytes());
    }

    fn read(bytes: &[u8]) -> Result<BasisTriple, SIGKError> {
        Ok(BasisTriple {
            affine_xP: decode_fp2(&bytes[0..188])?,
            affine_xQ: decode_fp2(&bytes[188..376])?,
            affine_xR: decode_fp2(&bytes[376..564])?,
        })
    }

    // The projective lifts of the three coordinates, ready to be pushed
    // through a walk.
    fn to_points(&self) -> [ProjectivePoint; 3] {
        [
            ProjectivePoint::from_affine(&self.affine_xP),
            ProjectivePoint::from_affine(&self.affine_xQ),
            ProjectivePoint::from_affine(&self.affine_xR),
        ]
    }

    // Normalize three projective images into a new triple with a single
    // shared inversion.
    fn from_points(points: &[ProjectivePoint]) -> BasisTriple {
        let (inv_zp, inv_zq, inv_zr) =
            ExtensionFieldElement::batch3_inv(&points[0].Z, &points[1].Z, &points[2].Z);
        BasisTriple {
            affine_xP: &points[0].X * &inv_zp,
            affine_xQ: &points[1].X * &inv_zq,
            affine_xR: &points[2].X * &inv_zr,
        }
    }

    // The affine coefficient A of the curve this triple lives on.
    fn recover_affine_a(&self) -> ExtensionFieldElement {
        ProjectiveCurveParameters::recover_curve_parameters(
            &self.affine_xP,
            &self.affine_xQ,
            &self.affine_xR,
        )
        .affine_a()
    }
}

// Normalize six projective images with a single shared inversion.
fn normalize_six(points: &[ProjectivePoint; 6]) -> (BasisTriple, BasisTriple) {
    let inverses = ExtensionFieldElement::batch6_inv([
        &points[0].Z, &points[1].Z, &points[2].Z,
        &points[3].Z, &points[4].Z, &points[5].Z,
    ]);
    (
        BasisTriple {
            affine_xP: &points[0].X * &inverses[0],
            affine_xQ: &points[1].X * &inverses[1],
            affine_xR: &points[2].X * &inverses[2],
        },
        BasisTriple {
            affine_xP: &points[3].X * &inverses[3],
            affine_xQ: &points[4].X * &inverses[4],
            affine_xR: &points[5].X * &inverses[5],
        },
    )
}

fn encode_shared_secret(j_invariant: &ExtensionFieldElement) -> [u8; SHARED_SECRET_SIZE] {
    let mut bytes = [0u8; SHARED_SECRET_SIZE];
    bytes[0..FP2_ENCODED_BYTES].clone_from_slice(&j_invariant.to_bytes());
    bytes
}

macro_rules! public_key_impl {
    ($name:ident, $first:ident, $second:ident) => {
        impl $name {
            /// Write the public key. The output is 1134 bytes; the
            /// trailing pad bytes are zero.
            pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
                let mut bytes = [0u8; PUBLIC_KEY_SIZE];
                self.$first.write(&mut bytes[0..BASIS_ENCODED_BYTES]);
                self.$second.write(&mut bytes[BASIS_ENCODED_BYTES..2 * BASIS_ENCODED_BYTES]);
                bytes
            }

            /// Read a public key, rejecting non-canonical field
            /// elements. The input must be at least 1134 bytes long.
            pub fn from_bytes(bytes: &[u8]) -> Result<$name, SIGKError> {
                assert!(
                    bytes.len() >= PUBLIC_KEY_SIZE,
                    "Too short input to public key from_bytes, expected 1134 bytes"
                );
                Ok($name {
                    $first: BasisTriple::read(&bytes[0..BASIS_ENCODED_BYTES])?,
                    $second: BasisTriple::read(
                        &bytes[BASIS_ENCODED_BYTES..2 * BASIS_ENCODED_BYTES],
                    )?,
                })
            }
        }
    };
}

/// Alice's public key: the images of Bob's and Eve's bases under her
/// 2^260-isogeny.
#[derive(Copy, Clone, Debug)]
pub struct SIGKPublicKeyAlice {
    pub bob_images: BasisTriple,
    pub eve_images: BasisTriple,
}

/// Bob's public key: the images of Alice's and Eve's bases under his
/// 3^153-isogeny.
#[derive(Copy, Clone)]
pub struct SIGKPublicKeyBob {
    pub alice_images: BasisTriple,
    pub eve_images: BasisTriple,
}

/// Eve's public key: the images of Alice's and Bob's bases under her
/// 5^105-isogeny.
#[derive(Copy, Clone)]
pub struct SIGKPublicKeyEve {
    pub alice_images: BasisTriple,
    pub bob_images: BasisTriple,
}

public_key_impl!(SIGKPublicKeyAlice, bob_images, eve_images);
public_key_impl!(SIGKPublicKeyBob, alice_images, eve_images);
public_key_impl!(SIGKPublicKeyEve, alice_images, bob_images);

macro_rules! secret_key_impl {
    ($name:ident) => {
        impl $name {
            /// Construct a secret key from a raw 48-byte scalar.
            pub fn from_bytes(scalar: [u8; SECRET_KEY_SIZE]) -> $name {
                $name { scalar }
            }

            /// The raw scalar bytes.
            pub fn as_bytes(&self) -> &[u8; SECRET_KEY_SIZE] {
                &self.scalar
            }
        }

        impl Drop for $name {
            fn drop(&mut self) {
                // Wipe the scalar; volatile writes so the clears are
                // not optimized away.
                for byte in self.scalar.iter_mut() {
                    unsafe { ptr::write_volatile(byte, 0) };
                }
            }
        }
    };
}

/// Alice's secret key: a scalar below 2^260 selecting the kernel
/// P_A + [m]Q_A of her 4-isogeny walk.
#[derive(Clone)]
pub struct SIGKSecretKeyAlice {
    scalar: [u8; SECRET_KEY_SIZE],
}

/// Bob's secret key: a scalar below 2^242 selecting the kernel of his
/// 3-isogeny walk.
#[derive(Clone)]
pub struct SIGKSecretKeyBob {
    scalar: [u8; SECRET_KEY_SIZE],
}

/// Eve's secret key: a scalar below 2^243 selecting the kernel of her
/// 5-isogeny walk.
#[derive(Clone)]
pub struct SIGKSecretKeyEve {
    scalar: [u8; SECRET_KEY_SIZE],
}

secret_key_impl!(SIGKSecretKeyAlice);
secret_key_impl!(SIGKSecretKeyBob);
secret_key_impl!(SIGKSecretKeyEve);

fn random_scalar<R: RngCore + CryptoRng>(
    rng: &mut R,
    used_bytes: usize,
    top_mask: u8,
) -> Result<[u8; SECRET_KEY_SIZE], SIGKError> {
    let mut scalar = [0u8; SECRET_KEY_SIZE];
    rng.try_fill_bytes(&mut scalar[..used_bytes])
        .map_err(|_| SIGKError::RngFailure)?;
    scalar[used_bytes - 1] &= top_mask;
    Ok(scalar)
}

/// Generate a keypair for "Alice". Keypairs must be ephemeral: use
/// each one for at most one shared secret computation.
pub fn generate_alice_keypair<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<(SIGKPublicKeyAlice, SIGKSecretKeyAlice), SIGKError> {
    let scalar = random_scalar(rng, SECRETKEY_A_USED_BYTES, MASK_ALICE)?;
    let secret_key = SIGKSecretKeyAlice { scalar };
    let public_key = secret_key.public_key();
    Ok((public_key, secret_key))
}

/// Generate a keypair for "Bob". Keypairs must be ephemeral: use each
/// one for at most one shared secret computation.
pub fn generate_bob_keypair<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<(SIGKPublicKeyBob, SIGKSecretKeyBob), SIGKError> {
    let scalar = random_scalar(rng, SECRETKEY_B_USED_BYTES, MASK_BOB)?;
    let secret_key = SIGKSecretKeyBob { scalar };
    let public_key = secret_key.public_key();
    Ok((public_key, secret_key))
}

/// Generate a keypair for "Eve". Keypairs must be ephemeral: use each
/// one for at most one shared secret computation.
pub fn generate_eve_keypair<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<(SIGKPublicKeyEve, SIGKSecretKeyEve), SIGKError> {
    let scalar = random_scalar(rng, SECRETKEY_E_USED_BYTES, MASK_EVE)?;
    let secret_key = SIGKSecretKeyEve { scalar };
    let public_key = secret_key.public_key();
    Ok((public_key, secret_key))
}

impl SIGKSecretKeyAlice {
    /// Compute the corresponding public key: walk the 4-isogeny chain
    /// from the base curve, transporting Bob's and Eve's bases.
    pub fn public_key(&self) -> SIGKPublicKeyAlice {
        let own = alice_basis();
        let bob = bob_basis();
        let eve = eve_basis();

        let kernel = ProjectivePoint::three_point_ladder(
            &own.xP,
            &own.xQ,
            &own.xR,
            &self.scalar,
            OALICE_BITS,
            &ExtensionFieldElement::zero(),
        );

        let mut images = [
            ProjectivePoint::from_affine(&bob.xP),
            ProjectivePoint::from_affine(&bob.xQ),
            ProjectivePoint::from_affine(&bob.xR),
            ProjectivePoint::from_affine(&eve.xP),
            ProjectivePoint::from_affine(&eve.xQ),
            ProjectivePoint::from_affine(&eve.xR),
        ];
        four_isogeny_walk(DoublingParameters::base_curve(), kernel, &mut images);

        let (bob_images, eve_images) = normalize_six(&images);
        SIGKPublicKeyAlice { bob_images, eve_images }
    }

    /// Compute Alice's view of the shared secret from Eve's public key
    /// and the Bob-Eve shared-public message, producing the Alice-Eve
    /// shared-public message for Bob along the way.
    ///
    /// Two 4-isogeny walks: one on E_C transporting Bob's basis images,
    /// one on E_BC ending at the common curve.
    pub fn shared_secret(
        &self,
        eve_public: &SIGKPublicKeyEve,
        shared_bc: &BasisTriple,
    ) -> (BasisTriple, [u8; SHARED_SECRET_SIZE]) {
        // First walk: from E_C, kernel from the transported Alice basis.
        let own = &eve_public.alice_images;
        let a = own.recover_affine_a();
        let kernel = ProjectivePoint::three_point_ladder(
            &own.affine_xP,
            &own.affine_xQ,
            &own.affine_xR,
            &self.scalar,
            OALICE_BITS,
            &a,
        );
        let mut images = eve_public.bob_images.to_points();
        four_isogeny_walk(DoublingParameters::from_affine_a(&a), kernel, &mut images);
        let shared_ac = BasisTriple::from_points(&images);

        // Second walk: from E_BC; only the codomain matters.
        let a = shared_bc.recover_affine_a();
        let kernel = ProjectivePoint::three_point_ladder(
            &shared_bc.affine_xP,
            &shared_bc.affine_xQ,
            &shared_bc.affine_xR,
            &self.scalar,
            OALICE_BITS,
            &a,
        );
        let final_curve =
            four_isogeny_walk(DoublingParameters::from_affine_a(&a), kernel, &mut []);

        let curve = ProjectiveCurveParameters::from_doubling_parameters(&final_curve);
        let secret = encode_shared_secret(&curve.j_invariant());
        (shared_ac, secret)
    }
}

impl SIGKSecretKeyBob {
    /// Compute the corresponding public key: walk the 3-isogeny chain
    /// from the base curve, transporting Alice's and Eve's bases.
    pub fn public_key(&self) -> SIGKPublicKeyBob {
        let own = bob_basis();
        let alice = alice_basis();
        let eve = eve_basis();

        let kernel = ProjectivePoint::three_point_ladder(
            &own.xP,
            &own.xQ,
            &own.xR,
            &self.scalar,
            OBOB_BITS,
            &ExtensionFieldElement::zero(),
        );

        let mut images = [
            ProjectivePoint::from_affine(&alice.xP),
            ProjectivePoint::from_affine(&alice.xQ),
            ProjectivePoint::from_affine(&alice.xR),
            ProjectivePoint::from_affine(&eve.xP),
            ProjectivePoint::from_affine(&eve.xQ),
            ProjectivePoint::from_affine(&eve.xR),
        ];
        three_isogeny_walk(TriplingParameters::base_curve(), kernel, &mut images);

        let (alice_images, eve_images) = normalize_six(&images);
        SIGKPublicKeyBob { alice_images, eve_images }
    }

    /// Compute the Alice-Bob shared-public message: one 3-isogeny walk
    /// on E_A transporting Eve's basis images.
    pub fn shared_public(&self, alice_public: &SIGKPublicKeyAlice) -> BasisTriple {
        let own = &alice_public.bob_images;
        let a = own.recover_affine_a();
        let kernel = ProjectivePoint::three_point_ladder(
            &own.affine_xP,
            &own.affine_xQ,
            &own.affine_xR,
            &self.scalar,
            OBOB_BITS,
            &a,
        );
        let mut images = alice_public.eve_images.to_points();
        three_isogeny_walk(TriplingParameters::from_affine_a(&a), kernel, &mut images);
        BasisTriple::from_points(&images)
    }

    /// Compute Bob's view of the shared secret from the Alice-Eve
    /// shared-public message: one 3-isogeny walk on E_AC ending at the
    /// common curve.
    pub fn shared_secret(&self, shared_ac: &BasisTriple) -> [u8; SHARED_SECRET_SIZE] {
        let a = shared_ac.recover_affine_a();
        let kernel = ProjectivePoint::three_point_ladder(
            &shared_ac.affine_xP,
            &shared_ac.affine_xQ,
            &shared_ac.affine_xR,
            &self.scalar,
            OBOB_BITS,
            &a,
        );
        let final_curve =
            three_isogeny_walk(TriplingParameters::from_affine_a(&a), kernel, &mut []);

        let curve = ProjectiveCurveParameters::from_tripling_parameters(&final_curve);
        encode_shared_secret(&curve.j_invariant())
    }
}

impl SIGKSecretKeyEve {
    /// Compute the corresponding public key: walk the 5-isogeny chain
    /// from the base curve, transporting Alice's and Bob's bases.
    ///
    /// On the base walk the codomain coefficients are recovered at each
    /// step from the image of the 2-torsion witness α₀ = (i : 1).
    pub fn public_key(&self) -> SIGKPublicKeyEve {
        let own = eve_basis();
        let alice = alice_basis();
        let bob = bob_basis();

        let kernel = ProjectivePoint::three_point_ladder(
            &own.xP,
            &own.xQ,
            &own.xR,
            &self.scalar,
            OEVE_BITS,
            &ExtensionFieldElement::zero(),
        );

        let mut images = [
            ProjectivePoint::from_affine(&alice.xP),
            ProjectivePoint::from_affine(&alice.xQ),
            ProjectivePoint::from_affine(&alice.xR),
            ProjectivePoint::from_affine(&bob.xP),
            ProjectivePoint::from_affine(&bob.xQ),
            ProjectivePoint::from_affine(&bob.xR),
        ];
        five_isogeny_walk_with_alpha(
            DoublingParameters::base_curve(),
            kernel,
            alpha_point(),
            &mut images,
        );

        let (alice_images, bob_images) = normalize_six(&images);
        SIGKPublicKeyEve { alice_images, bob_images }
    }

    /// Compute Eve's view of the shared secret from Bob's public key
    /// and the Alice-Bob shared-public message, producing the Bob-Eve
    /// shared-public message for Alice along the way.
    ///
    /// Two 5-isogeny walks. Away from the base curve no α image
    /// exists, so each walk recovers its codomain coefficients from
    /// the basis triple it transports.
    pub fn shared_secret(
        &self,
        bob_public: &SIGKPublicKeyBob,
        shared_ab: &BasisTriple,
    ) -> (BasisTriple, [u8; SHARED_SECRET_SIZE]) {
        // First walk: from E_B, kernel from the transported Eve basis,
        // pushing Alice's basis images.
        let own = &bob_public.eve_images;
        let a = own.recover_affine_a();
        let kernel = ProjectivePoint::three_point_ladder(
            &own.affine_xP,
            &own.affine_xQ,
            &own.affine_xR,
            &self.scalar,
            OEVE_BITS,
            &a,
        );
        let mut images = bob_public.alice_images.to_points();
        five_isogeny_walk(DoublingParameters::from_affine_a(&a), kernel, &mut images);
        let shared_bc = BasisTriple::from_points(&images);

        // Second walk: from E_AB. The transported triple is Eve's own
        // basis image; it serves as the curve-recovery witness and its
        // final image determines the common curve.
        let a = shared_ab.recover_affine_a();
        let kernel = ProjectivePoint::three_point_ladder(
            &shared_ab.affine_xP,
            &shared_ab.affine_xQ,
            &shared_ab.affine_xR,
            &self.scalar,
            OEVE_BITS,
            &a,
        );
        let mut images = shared_ab.to_points();
        let final_curve =
            five_isogeny_walk(DoublingParameters::from_affine_a(&a), kernel, &mut images);

        let curve = ProjectiveCurveParameters::from_doubling_parameters(&final_curve);
        let secret = encode_shared_secret(&curve.j_invariant());
        (shared_bc, secret)
    }
}

// The known-answer exchange below uses fixed nonzero scalars; its
// expected values were generated with an independent implementation of
// the protocol.
#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const KAT_SK_A: [u8; 48] = [
        141, 79, 50, 115, 138, 100, 188, 14, 34, 83, 225, 93, 145, 179, 124, 122,
        69, 34, 162, 113, 114, 17, 214, 204, 20, 82, 36, 250, 138, 7, 180, 241,
        1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];
    const KAT_SK_B: [u8; 48] = [
        104, 93, 221, 188, 8, 175, 89, 146, 156, 215, 235, 118, 242, 190, 93, 64,
        245, 205, 188, 71, 82, 96, 222, 71, 121, 46, 35, 207, 4, 143, 2, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];
    const KAT_SK_C: [u8; 48] = [
        219, 180, 214, 247, 246, 89, 25, 115, 116, 43, 154, 134, 189, 191, 209, 246,
        192, 122, 83, 17, 175, 238, 211, 102, 242, 127, 152, 157, 138, 76, 5, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];

    // First public-key element of each party, x(φ(P)) of the leading
    // transported basis, in wire format.
    const KAT_PKA_XP: [u8; 188] = [
        156, 231, 53, 146, 107, 100, 145, 97, 214, 82, 252, 69, 4, 250, 7, 183,
        199, 170, 38, 99, 26, 45, 145, 236, 138, 233, 206, 136, 170, 114, 100, 212,
        202, 31, 188, 20, 25, 209, 76, 19, 138, 131, 107, 86, 19, 213, 12, 198,
        142, 81, 185, 242, 9, 128, 64, 69, 10, 204, 188, 9, 191, 62, 153, 1,
        173, 126, 124, 211, 54, 190, 241, 121, 175, 145, 198, 223, 255, 131, 177, 195,
        174, 167, 162, 210, 206, 142, 140, 240, 120, 135, 120, 174, 22, 1, 27, 9,
        224, 177, 94, 212, 52, 12, 215, 101, 208, 20, 237, 78, 85, 14, 242, 153,
        94, 71, 205, 189, 85, 93, 96, 151, 146, 141, 176, 102, 255, 240, 149, 184,
        49, 141, 231, 199, 121, 92, 100, 216, 170, 66, 67, 208, 84, 212, 30, 244,
        195, 36, 66, 111, 141, 33, 47, 170, 222, 225, 29, 205, 239, 195, 21, 94,
        251, 155, 194, 147, 3, 13, 140, 118, 118, 170, 48, 95, 217, 247, 118, 221,
        132, 122, 55, 255, 246, 42, 107, 101, 185, 21, 182, 3,
    ];
    const KAT_PKB_XP: [u8; 188] = [
        171, 245, 182, 152, 61, 55, 52, 94, 113, 188, 153, 40, 129, 205, 208, 191,
        71, 217, 122, 216, 204, 189, 115, 66, 83, 96, 163, 152, 21, 222, 228, 254,
        37, 217, 146, 24, 29, 132, 94, 78, 241, 21, 83, 190, 174, 160, 232, 81,
        30, 188, 173, 121, 254, 151, 236, 136, 156, 240, 245, 47, 46, 152, 116, 251,
        36, 159, 3, 61, 180, 117, 0, 95, 183, 18, 115, 43, 130, 208, 253, 181,
        192, 246, 107, 238, 159, 253, 54, 171, 143, 248, 4, 159, 95, 1, 56, 155,
        27, 69, 112, 175, 86, 66, 174, 8, 164, 127, 20, 125, 4, 188, 104, 207,
        191, 54, 239, 196, 107, 16, 214, 106, 126, 176, 18, 101, 148, 124, 98, 93,
        200, 76, 202, 57, 141, 146, 234, 67, 81, 217, 21, 221, 141, 181, 64, 147,
        53, 221, 119, 189, 119, 254, 65, 147, 107, 144, 30, 140, 177, 77, 53, 21,
        242, 24, 19, 45, 196, 184, 1, 26, 111, 80, 226, 249, 80, 2, 197, 138,
        233, 79, 128, 21, 157, 83, 174, 208, 224, 176, 171, 0,
    ];
    const KAT_PKC_XP: [u8; 188] = [
        28, 211, 32, 190, 191, 77, 93, 12, 43, 30, 187, 219, 79, 132, 167, 52,
        161, 24, 101, 221, 78, 242, 214, 141, 112, 61, 83, 81, 120, 181, 165, 28,
        20, 102, 148, 237, 21, 30, 191, 29, 80, 111, 188, 120, 213, 63, 68, 80,
        236, 245, 126, 190, 41, 186, 2, 241, 118, 53, 94, 155, 180, 86, 225, 13,
        179, 33, 81, 93, 49, 246, 176, 71, 75, 46, 116, 214, 125, 198, 96, 111,
        161, 77, 118, 166, 79, 156, 124, 253, 164, 119, 14, 254, 224, 4, 246, 95,
        103, 146, 251, 50, 47, 67, 65, 72, 244, 231, 251, 103, 213, 144, 159, 181,
        247, 227, 6, 129, 50, 118, 29, 183, 127, 175, 253, 132, 254, 179, 158, 245,
        118, 201, 211, 167, 121, 239, 36, 17, 111, 147, 241, 29, 179, 137, 104, 233,
        92, 206, 68, 15, 121, 111, 70, 172, 116, 160, 162, 134, 84, 252, 105, 219,
        129, 104, 112, 187, 98, 15, 209, 124, 185, 82, 161, 254, 113, 5, 29, 140,
        208, 95, 131, 201, 183, 202, 136, 20, 226, 82, 74, 3,
    ];
    const KAT_SHARED_SECRET: [u8; 188] = [
        229, 88, 128, 185, 205, 52, 244, 77, 107, 84, 0, 160, 21, 243, 248, 48,
        149, 43, 94, 186, 70, 177, 106, 228, 110, 189, 87, 32, 87, 184, 32, 186,
        181, 188, 5, 31, 52, 139, 36, 141, 161, 46, 220, 87, 99, 207, 248, 71,
        177, 246, 136, 135, 138, 245, 247, 127, 240, 169, 193, 123, 107, 201, 107, 7,
        163, 193, 125, 155, 111, 230, 121, 51, 170, 223, 71, 51, 50, 228, 39, 231,
        62, 6, 75, 93, 24, 20, 75, 14, 47, 31, 67, 183, 143, 4, 76, 247,
        121, 92, 95, 87, 117, 152, 90, 1, 27, 80, 193, 197, 63, 78, 253, 190,
        197, 110, 54, 11, 133, 31, 136, 24, 117, 187, 169, 109, 132, 79, 91, 142,
        237, 0, 35, 44, 28, 199, 230, 56, 47, 44, 251, 103, 91, 99, 82, 155,
        59, 42, 233, 46, 193, 164, 201, 136, 181, 30, 101, 87, 90, 124, 205, 99,
        154, 95, 32, 104, 182, 225, 249, 167, 24, 149, 129, 199, 190, 244, 223, 187,
        130, 150, 244, 8, 127, 201, 229, 55, 24, 52, 196, 1,
    ];

    fn kat_keys() -> (SIGKSecretKeyAlice, SIGKSecretKeyBob, SIGKSecretKeyEve) {
        (
            SIGKSecretKeyAlice::from_bytes(KAT_SK_A),
            SIGKSecretKeyBob::from_bytes(KAT_SK_B),
            SIGKSecretKeyEve::from_bytes(KAT_SK_C),
        )
    }

    #[test]
    fn known_answer_public_keys() {
        let (sk_a, sk_b, sk_c) = kat_keys();

        let pk_a = sk_a.public_key();
        assert_eq!(&pk_a.bob_images.affine_xP.to_bytes()[..], &KAT_PKA_XP[..]);

        let pk_b = sk_b.public_key();
        assert_eq!(&pk_b.alice_images.affine_xP.to_bytes()[..], &KAT_PKB_XP[..]);

        let pk_c = sk_c.public_key();
        assert_eq!(&pk_c.alice_images.affine_xP.to_bytes()[..], &KAT_PKC_XP[..]);
    }

    #[test]
    fn known_answer_exchange() {
        let (sk_a, sk_b, sk_c) = kat_keys();

        let pk_a = sk_a.public_key();
        let pk_b = sk_b.public_key();
        let pk_c = sk_c.public_key();

        let sp_ab = sk_b.shared_public(&pk_a);
        let (sp_bc, ss_c) = sk_c.shared_secret(&pk_b, &sp_ab);
        let (sp_ac, ss_a) = sk_a.shared_secret(&pk_c, &sp_bc);
        let ss_b = sk_b.shared_secret(&sp_ac);

        assert_eq!(&ss_a[..], &ss_b[..]);
        assert_eq!(&ss_a[..], &ss_c[..]);
        assert_eq!(&ss_a[0..188], &KAT_SHARED_SECRET[..]);
        assert_eq!(&ss_a[188..190], &[0u8, 0u8][..]);
    }

    #[test]
    fn known_answer_exchange_over_the_wire() {
        // Same exchange, round-tripping every message through its byte
        // encoding.
        let (sk_a, sk_b, sk_c) = kat_keys();

        let pk_a = SIGKPublicKeyAlice::from_bytes(&sk_a.public_key().to_bytes()).unwrap();
        let pk_b = SIGKPublicKeyBob::from_bytes(&sk_b.public_key().to_bytes()).unwrap();
        let pk_c = SIGKPublicKeyEve::from_bytes(&sk_c.public_key().to_bytes()).unwrap();

        let sp_ab = BasisTriple::from_bytes(&sk_b.shared_public(&pk_a).to_bytes()).unwrap();
        let (sp_bc, ss_c) = sk_c.shared_secret(&pk_b, &sp_ab);
        let sp_bc = BasisTriple::from_bytes(&sp_bc.to_bytes()).unwrap();
        let (sp_ac, ss_a) = sk_a.shared_secret(&pk_c, &sp_bc);
        let sp_ac = BasisTriple::from_bytes(&sp_ac.to_bytes()).unwrap();
        let ss_b = sk_b.shared_secret(&sp_ac);

        assert_eq!(&ss_a[..], &ss_b[..]);
        assert_eq!(&ss_a[..], &ss_c[..]);
        assert_eq!(&ss_a[0..188], &KAT_SHARED_SECRET[..]);
    }

    #[test]
    fn ephemeral_exchange_with_random_keys() {
        let mut rng = StdRng::seed_from_u64(0x5157_4B47);

        let (pk_a, sk_a) = generate_alice_keypair(&mut rng).unwrap();
        let (pk_b, sk_b) = generate_bob_keypair(&mut rng).unwrap();
        let (pk_c, sk_c) = generate_eve_keypair(&mut rng).unwrap();

        let sp_ab = sk_b.shared_public(&pk_a);
        let (sp_bc, ss_c) = sk_c.shared_secret(&pk_b, &sp_ab);
        let (sp_ac, ss_a) = sk_a.shared_secret(&pk_c, &sp_bc);
        let ss_b = sk_b.shared_secret(&sp_ac);

        assert_eq!(&ss_a[..], &ss_b[..]);
        assert_eq!(&ss_a[..], &ss_c[..]);
    }

    #[test]
    fn scalar_masks_bound_generated_keys() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..8 {
            let (_, sk_a) = generate_alice_keypair(&mut rng).unwrap();
            assert_eq!(sk_a.as_bytes()[32] & !0x0F, 0);
            assert!(sk_a.as_bytes()[33..].iter().all(|&b| b == 0));

            let scalar_b = random_scalar(&mut rng, SECRETKEY_B_USED_BYTES, MASK_BOB).unwrap();
            assert_eq!(scalar_b[30] & !0x03, 0);
            assert!(scalar_b[31..].iter().all(|&b| b == 0));

            let scalar_c = random_scalar(&mut rng, SECRETKEY_E_USED_BYTES, MASK_EVE).unwrap();
            assert_eq!(scalar_c[30] & !0x07, 0);
            assert!(scalar_c[31..].iter().all(|&b| b == 0));
        }
    }

    // A public key lies on the expected curve when both transported
    // triples recover the same coefficient A and the supersingular
    // invariant A² - 4 is a square in GF(p747²).
    fn assert_on_supersingular_curve(first: &BasisTriple, second: &BasisTriple) {
        let a = first.recover_affine_a();
        assert!(a.vartime_eq(&second.recover_affine_a()));

        let one = ExtensionFieldElement::one();
        let two = &one + &one;
        let four = &two + &two;
        let discriminant = &a.square() - &four;
        assert!(discriminant.vartime_is_square());
    }

    fn assert_keypair_sweep<R: RngCore + CryptoRng>(rng: &mut R, trials: usize) {
        for _ in 0..trials {
            let (pk_a, _) = generate_alice_keypair(rng).unwrap();
            assert_on_supersingular_curve(&pk_a.bob_images, &pk_a.eve_images);

            let (pk_b, _) = generate_bob_keypair(rng).unwrap();
            assert_on_supersingular_curve(&pk_b.alice_images, &pk_b.eve_images);

            let (pk_c, _) = generate_eve_keypair(rng).unwrap();
            assert_on_supersingular_curve(&pk_c.alice_images, &pk_c.bob_images);
        }
    }

    #[test]
    fn public_key_triples_share_a_curve() {
        let (sk_a, sk_b, sk_c) = kat_keys();

        let pk_a = sk_a.public_key();
        assert_on_supersingular_curve(&pk_a.bob_images, &pk_a.eve_images);

        let pk_b = sk_b.public_key();
        assert_on_supersingular_curve(&pk_b.alice_images, &pk_b.eve_images);

        let pk_c = sk_c.public_key();
        assert_on_supersingular_curve(&pk_c.alice_images, &pk_c.bob_images);
    }

    #[test]
    fn random_public_keys_lie_on_supersingular_curves() {
        let mut rng = StdRng::seed_from_u64(0xD15C);
        assert_keypair_sweep(&mut rng, 4);
    }

    #[test]
    #[ignore = "full sweep of 10^3 random keypairs per party; run with -- --ignored"]
    fn random_public_keys_lie_on_supersingular_curves_exhaustive() {
        let mut rng = StdRng::seed_from_u64(0xD15C_1000);
        assert_keypair_sweep(&mut rng, 1000);
    }

    #[test]
    fn corrupted_shared_public_diverges() {
        let (sk_a, sk_b, sk_c) = kat_keys();

        let pk_b = sk_b.public_key();
        let pk_c = sk_c.public_key();
        let sp_ab = sk_b.shared_public(&sk_a.public_key());

        // Flip one bit of the Alice-Bob shared public; Eve's secret
        // must no longer match Alice's.
        let mut corrupted = sp_ab.to_bytes();
        corrupted[17] ^= 0x04;
        let corrupted = BasisTriple::from_bytes(&corrupted).unwrap();

        let (sp_bc, ss_c) = sk_c.shared_secret(&pk_b, &corrupted);
        let (_, ss_a) = sk_a.shared_secret(&pk_c, &sp_bc);

        assert_ne!(&ss_a[..], &ss_c[..]);
    }

    #[test]
    fn non_canonical_public_key_is_rejected() {
        let (sk_a, _, _) = kat_keys();
        let mut bytes = sk_a.public_key().to_bytes();

        // Overwrite the first coordinate with p747 itself.
        for (i, byte) in bytes.iter_mut().enumerate().take(94) {
            *byte = (crate::backend::fp747::P747[i / 8] >> (8 * (i % 8))) as u8;
        }
        assert_eq!(
            SIGKPublicKeyAlice::from_bytes(&bytes).unwrap_err(),
            SIGKError::InvalidPublicKey
        );

        let mut shared = [0u8; SHARED_PUBLIC_SIZE];
        shared[..94].clone_from_slice(&bytes[..94]);
        assert_eq!(
            BasisTriple::from_bytes(&shared).unwrap_err(),
            SIGKError::InvalidPublicKey
        );
    }

    #[test]
    fn all_ones_field_element_is_rejected() {
        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        for byte in bytes.iter_mut().take(94) {
            *byte = 0xFF;
        }
        assert_eq!(
            SIGKPublicKeyAlice::from_bytes(&bytes).unwrap_err(),
            SIGKError::InvalidPublicKey
        );
    }

    #[test]
    fn public_key_round_trip() {
        let (sk_a, _, _) = kat_keys();
        let pk = sk_a.public_key();
        let decoded = SIGKPublicKeyAlice::from_bytes(&pk.to_bytes()).unwrap();
        assert!(decoded.bob_images.affine_xP.vartime_eq(&pk.bob_images.affine_xP));
        assert!(decoded.eve_images.affine_xR.vartime_eq(&pk.eve_images.affine_xR));

        // Pad bytes are zero on the wire.
        let bytes = pk.to_bytes();
        assert!(bytes[2 * BASIS_ENCODED_BYTES..].iter().all(|&b| b == 0));
        let shared = sk_a.public_key().bob_images.to_bytes();
        assert!(shared[BASIS_ENCODED_BYTES..].iter().all(|&b| b == 0));
    }
}
