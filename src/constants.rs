//! Fixed parameters of the SIGKp747 curve isogeny system.
//!
//! Base curve: the Montgomery curve C·y² = C·x³ + A·x² + C·x over
//! GF(p747²) with A = 0, C = 1. The three generator bases span the
//! 2^260-, 3^153- and 5^105-torsion; each is given as the five GF(p747)
//! values {XP.a, XP.b, XQ.a, XR.a, XR.b} in normal representation,
//! exactly as published, and converted to Montgomery form on use.

use crate::backend::fp747::{Fp747Element, FP747_NUM_WORDS, MONTGOMERY_ONE};
use crate::curve::ProjectivePoint;
use crate::field::ExtensionFieldElement;

/// Number of 4-isogeny steps in Alice's walk.
pub const MAX_ALICE: usize = 130;
/// Number of 3-isogeny steps in Bob's walk.
pub const MAX_BOB: usize = 153;
/// Number of 5-isogeny steps in Eve's walk.
pub const MAX_EVE: usize = 105;

/// Capacity of the saved-point stack during Alice's traversal.
pub const MAX_INT_POINTS_ALICE: usize = 8;
/// Capacity of the saved-point stack during Bob's traversal.
pub const MAX_INT_POINTS_BOB: usize = 10;
/// Capacity of the saved-point stack during Eve's traversal.
pub const MAX_INT_POINTS_EVE: usize = 11;

/// Bit length of Alice's subgroup order 2^260.
pub const OALICE_BITS: usize = 261;
/// Bit length of Bob's subgroup order 3^153.
pub const OBOB_BITS: usize = 243;
/// Bit length of Eve's subgroup order 5^105.
pub const OEVE_BITS: usize = 244;

// Secret scalars are drawn below 2^(bits-1); the mask clears the spare
// bits of the top scalar byte.
pub(crate) const SECRETKEY_A_USED_BYTES: usize = (OALICE_BITS + 7) / 8;
pub(crate) const SECRETKEY_B_USED_BYTES: usize = (OBOB_BITS - 1 + 7) / 8;
pub(crate) const SECRETKEY_E_USED_BYTES: usize = (OEVE_BITS - 1 + 7) / 8;
pub(crate) const MASK_ALICE: u8 = (1 << ((OALICE_BITS - 1) % 8)) - 1;
pub(crate) const MASK_BOB: u8 = (1 << ((OBOB_BITS - 1) % 8)) - 1;
pub(crate) const MASK_EVE: u8 = (1 << ((OEVE_BITS - 1) % 8)) - 1;

/// A basis {x(P), x(Q), x(R)} with R = Q - P, affine, in Montgomery form.
pub(crate) struct GeneratorBasis {
    pub xP: ExtensionFieldElement,
    pub xQ: ExtensionFieldElement,
    pub xR: ExtensionFieldElement,
}

// Alice's generator values {XPA0 + XPA1*i, XQA0, XRA0 + XRA1*i}, normal
// representation.
const A_GEN: [[u64; FP747_NUM_WORDS]; 5] = [
    [0x146A64BF56F93A7C, 0xD2834AEB7FAFAD64, 0xA813E25F64724ECA, 0x263CAEFDCFBC9279,
     0x94D8C091FBE820C2, 0xF3FD5F9EB76FD467, 0x53FAD378BD2824EA, 0xCA4BF0D29F09B061,
     0x3A3B1CC4F0B926F7, 0x768CC2152752FA5E, 0xED1D40B964662E78, 0x00000120A5B313BA], // XPA0
    [0x1E6A90AEC79F4435, 0x636DCCE289A19199, 0x25A5C1A36709082C, 0xA1F0B1F01A226759,
     0x810D8C4C978BD734, 0x175A804F0A2D4C37, 0x05956FCE365275A1, 0x4C0DEA39E9FA3121,
     0xC09528C4A8DF299D, 0x8DC034AA3577B198, 0x60D67E17D7F8C860, 0x000000B9D6998639], // XPA1
    [0xF328FA10F91C45F0, 0xE5A055346EA60C70, 0xDFDA473DEB9931C3, 0x4633D775F2407AC6,
     0x3E21A2C1599493C4, 0xB24A13A85E621EE0, 0xCDEA5A68DCD0B2F2, 0xA6D518EDB17B32A4,
     0xC7D196FA85A9E39D, 0x1331646D73439934, 0x310117A81F0143FA, 0x0000021D6762FF18], // XQA0
    [0x124024C5480C2696, 0x7290343A5864802D, 0x3B7A746AE11871BA, 0xA3969F3C2099AA85,
     0x5674927D92F1BCC1, 0x9FB3BCA6B6AC1ECC, 0xB11FDAF64CEF67EE, 0x64E250AC0B9FA8F2,
     0x6CCDDDD25F56A1E6, 0xC2F7EFE77827FB7D, 0x9578C5F557EB62D9, 0x000004723AC260D5], // XRA0
    [0x74DC8E0FD9052C39, 0x78A4DED7648B4B52, 0x19BD6A179F43E717, 0x821C4EAC5AFC0DAD,
     0xF896042098451E78, 0xD3553C0D99F4933B, 0xA3BCC31111792301, 0x4F1AB67D511326EE,
     0x54452EAD8482B25F, 0x1B99283D8D928DF4, 0x9003A7877DAE4AF9, 0x00000270E6E06619], // XRA1
];

// Bob's generator values {XPB0 + XPB1*i, XQB0, XRB0 + XRB1*i}, normal
// representation.
const B_GEN: [[u64; FP747_NUM_WORDS]; 5] = [
    [0x9EE4AC530EA02812, 0x92C080440723255B, 0x662C55DBA078BBE3, 0x48B22316211DBAD4,
     0xDE356317C914373B, 0xF78ED441F1DF05D0, 0x3111DFCCECCBD48C, 0x6720B43876BD4C8C,
     0x99EE79475E08834F, 0x11DBD2F070A76299, 0x2F589404C5A6A8B2, 0x000004C377C95424], // XPB0
    [0x1C7D4234E5FDCC74, 0x4DDAC3F7ADC53F78, 0xA84B1D9E5F46AB8E, 0xFC50A0657655B9C2,
     0xF888E86F40EABDC1, 0xA496C18DA958AB38, 0x433E22772CD614FC, 0x4C2B0917B6D87723,
     0xFB5E98C36C86388F, 0x18170BDA0CD711F6, 0x65A1BFA3BA76ADF9, 0x0000009A1D4C464D], // XPB1
    [0x6D1BAEDCF00F6471, 0x448D26F2BD69042E, 0x35CE3DF10EF1B224, 0xD6CECADBA5451FEC,
     0x268DBAFCFFB3499E, 0xBBEB5F0C9DEF37CA, 0x5B9F9109AA203E96, 0x65807C9E65B64504,
     0xF302FE3DCF71BE79, 0x18073BC4322D75EB, 0xF606FD0C2F8FC5B1, 0x00000160C487D33C], // XQB0
    [0xB22675E3A91F0902, 0xCDA1170DDD175E4F, 0x4DC79EFD82ECC131, 0x527554433D0294F5,
     0x3EA091E8E417E852, 0xFFA76D7A98CDC144, 0x333A0B67E8B38716, 0x4DA35A16E089A0E6,
     0xEAB4838DAD241FC4, 0x2BB1E64C0B454D30, 0xC3B2FB82628FA06E, 0x0000031431B95584], // XRB0
    [0x364F7B32FAE86420, 0x4263E9F2477348EE, 0x2B81A33361D8687A, 0x64911A7CD8084228,
     0x66AFB18A486140E8, 0xF2184390441F7512, 0xB5DE065CCD4F116E, 0xA43BDE0F0B4A006C,
     0xD608309796947758, 0x397340ABDCD96956, 0x424B5DAE0CB63784, 0x000003726280F304], // XRB1
];

// Eve's generator values {XPC0 + XPC1*i, XQC0, XRC0 + XRC1*i}, normal
// representation.
const C_GEN: [[u64; FP747_NUM_WORDS]; 5] = [
    [0xAF69BDDEC9296070, 0x8AC431344B2286BD, 0x3CFA47D203F07AFE, 0x162A8F46E4813F07,
     0xAD4DDD2B67753675, 0x0E2EC4FDA5C93F08, 0xA676A39D0B8F01A0, 0xF5ED1D43A66A18AE,
     0xA435E81C4D0EB5BB, 0x6CA414465FE77EB5, 0xAA8EB4A039EC4B7D, 0x000004566C7095BA], // XPC0
    [0xB38034500C6DA1D2, 0x8F6EC8D9A1F35F28, 0xF8929FCCF0E08F28, 0xE26173136E9C4823,
     0x40FCFEF0D82BE6AD, 0xD250DB7DCD87DA8A, 0x5D8128D2003719D1, 0xDD15896DE5C7F0EE,
     0xE3A5A817AABA93DB, 0xB9A7EBF341C79B6E, 0x36057976E121CFDC, 0x0000010EABEEFEA0], // XPC1
    [0xC9D02733A27AB49A, 0xB469BD77E0168E33, 0x05F8C5398CDFFBC7, 0x3E4A8125875936D8,
     0x992DD94A7FF49581, 0x43A3E31079E1E5B6, 0x3E2A56DB507C88DB, 0xD066713B82EE0EA2,
     0x0297C0C5A50BCB01, 0xD56B23D0DBB84C26, 0xE4E05108CB45392C, 0x000001C41F266159], // XQC0
    [0x4A7E2CAF8075DBAE, 0x7C8CE9CE3F662D39, 0x0E5F171AAAD4D525, 0xD49B0EB806B01748,
     0x6BD4262EE20D91E4, 0x8E0D5B740520C4D6, 0x1E04229F62707182, 0xF158168ED5A1579E,
     0x69BAC9B55573B8F4, 0xB9FC03653052FCD9, 0x335A33155EB8B3ED, 0x000004830A950BFA], // XRC0
    [0xB104DBDA0485994F, 0xC3AA33731C632A2E, 0x7BB8CEE8B3D9982B, 0xC430A10219BAF350,
     0x67093EA63B360D7E, 0xF0FE015252925652, 0x5307546E0239541D, 0xA287B3C86C8687F2,
     0xEDDF662A8E15DAB3, 0x49C23F9F35F33A30, 0xDBD16176640E8A0C, 0x0000014BE3B9B788], // XRC1
];

fn basis_from_gen(gen: &[[u64; FP747_NUM_WORDS]; 5]) -> GeneratorBasis {
    GeneratorBasis {
        xP: ExtensionFieldElement {
            A: Fp747Element::from_raw_limbs(gen[0]),
            B: Fp747Element::from_raw_limbs(gen[1]),
        },
        xQ: ExtensionFieldElement {
            A: Fp747Element::from_raw_limbs(gen[2]),
            B: Fp747Element::zero(),
        },
        xR: ExtensionFieldElement {
            A: Fp747Element::from_raw_limbs(gen[3]),
            B: Fp747Element::from_raw_limbs(gen[4]),
        },
    }
}

/// Alice's 2^260-torsion basis on the base curve.
pub(crate) fn alice_basis() -> GeneratorBasis {
    basis_from_gen(&A_GEN)
}

/// Bob's 3^153-torsion basis on the base curve.
pub(crate) fn bob_basis() -> GeneratorBasis {
    basis_from_gen(&B_GEN)
}

/// Eve's 5^105-torsion basis on the base curve.
pub(crate) fn eve_basis() -> GeneratorBasis {
    basis_from_gen(&C_GEN)
}

/// The 2-torsion witness α₀ = (i : 1) on the base curve, pushed through
/// Eve's base walk to recover the codomain coefficients.
pub(crate) fn alpha_point() -> ProjectivePoint {
    ProjectivePoint {
        X: ExtensionFieldElement {
            A: Fp747Element::zero(),
            B: MONTGOMERY_ONE,
        },
        Z: ExtensionFieldElement::one(),
    }
}

// Fixed depth-balanced strategies for the isogeny tree traversal, tuned
// for the relative costs of ℓ-multiplication and isogeny evaluation.
// Entry 0 is never consumed; the tables ship with one entry per step to
// match the published parameter set.

pub(crate) const STRAT_ALICE: [usize; MAX_ALICE] = [
    0, 1, 1, 2, 2, 2, 3, 4, 4, 4, 4, 5, 5, 6, 7, 8, 8, 9, 9, 9, 9,
    9, 9, 9, 12, 11, 12, 12, 13, 14, 15, 16, 16, 16, 16, 16, 16, 17, 17, 18, 18, 17,
    21, 17, 18, 21, 20, 21, 21, 21, 21, 21, 22, 25, 25, 25, 26, 27, 28, 28, 29, 30,
    31, 32, 32, 32, 32, 32, 32, 32, 33, 33, 33, 35, 36, 36, 33, 36, 35, 36, 36, 35,
    36, 36, 37, 38, 38, 39, 40, 41, 42, 38, 39, 40, 41, 42, 40, 46, 42, 43, 46, 46,
    46, 46, 48, 48, 48, 48, 49, 49, 48, 53, 54, 51, 52, 53, 54, 55, 56, 57, 58, 59,
    59, 60, 62, 62, 63, 64, 64, 64,
];

pub(crate) const STRAT_BOB: [usize; MAX_BOB] = [
    0, 1, 1, 2, 2, 2, 3, 3, 4, 4, 4, 5, 5, 5, 6, 7, 8, 8, 8, 8, 9, 9, 9, 9, 9, 10,
    12, 12, 12, 12, 12, 12, 13, 14, 14, 15, 16, 16, 16, 16, 16, 17, 16, 16, 17, 19,
    19, 20, 21, 22, 22, 22, 22, 22, 22, 22, 22, 22, 22, 24, 24, 25, 27, 27, 28, 28,
    29, 28, 29, 28, 28, 28, 30, 28, 28, 28, 29, 30, 33, 33, 33, 33, 34, 35, 37, 37,
    37, 37, 38, 38, 37, 38, 38, 38, 38, 38, 39, 43, 38, 38, 38, 38, 43, 40, 41, 42,
    43, 48, 45, 46, 47, 47, 48, 49, 49, 49, 50, 51, 50, 49, 49, 49, 49, 51, 49, 53,
    50, 51, 50, 51, 51, 51, 52, 55, 55, 55, 56, 56, 56, 56, 56, 58, 58, 61, 61, 61,
    63, 63, 63, 64, 65, 65, 65,
];

pub(crate) const STRAT_EVE: [usize; MAX_EVE] = [
    0, 1, 1, 1, 2, 2, 2, 3, 3, 4, 3, 4, 4, 5, 5, 6, 5, 6, 6, 6, 7, 8, 8, 9, 9, 9, 9,
    9, 9, 9, 12, 10, 12, 12, 12, 12, 13, 12, 13, 13, 13, 14, 14, 14, 14, 18, 14, 18,
    15, 17, 18, 18, 18, 18, 18, 18, 18, 18, 19, 19, 19, 20, 21, 22, 22, 22, 22, 23,
    23, 26, 23, 26, 23, 23, 26, 24, 26, 26, 27, 28, 27, 27, 28, 27, 28, 27, 28, 28,
    28, 28, 29, 29, 31, 31, 31, 34, 34, 34, 34, 34, 34, 34, 34, 34, 34,
];

#[cfg(test)]
mod test {
    use super::*;

    // Replay every traversal the strategies can drive and record the
    // deepest the saved-point stack gets; it must stay within the
    // statically sized capacity.
    fn max_stack_depth(strategy: &[usize], walk_length: usize) -> usize {
        let mut depths: Vec<usize> = Vec::new();
        let mut index = 0;
        let mut deepest = 0;
        for row in 1..walk_length {
            while index < walk_length - row {
                depths.push(index);
                deepest = deepest.max(depths.len());
                index += strategy[walk_length - index - row];
            }
            index = depths.pop().unwrap();
        }
        deepest
    }

    #[test]
    fn strategy_stack_bounds() {
        assert!(max_stack_depth(&STRAT_ALICE, MAX_ALICE) <= MAX_INT_POINTS_ALICE);
        assert!(max_stack_depth(&STRAT_BOB, MAX_BOB) <= MAX_INT_POINTS_BOB);
        assert!(max_stack_depth(&STRAT_EVE, MAX_EVE) <= MAX_INT_POINTS_EVE);
    }

    #[test]
    fn strategy_steps_are_positive() {
        // Entry 0 is the only zero; every consumed step must make progress.
        assert!(STRAT_ALICE[1..].iter().all(|&m| m > 0));
        assert!(STRAT_BOB[1..].iter().all(|&m| m > 0));
        assert!(STRAT_EVE[1..].iter().all(|&m| m > 0));
    }

    #[test]
    fn scalar_masks() {
        assert_eq!(MASK_ALICE, 0x0F);
        assert_eq!(MASK_BOB, 0x03);
        assert_eq!(MASK_EVE, 0x07);
        assert_eq!(SECRETKEY_A_USED_BYTES, 33);
        assert_eq!(SECRETKEY_B_USED_BYTES, 31);
        assert_eq!(SECRETKEY_E_USED_BYTES, 31);
    }
}
