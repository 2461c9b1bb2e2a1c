//! Strategy-driven traversal of the isogeny tree.
//!
//! Each walk follows the same pattern: descend by repeated
//! ℓ-multiplication as dictated by the precomputed strategy, saving
//! intermediate points on a fixed-capacity stack; at each leaf,
//! construct the ℓ-isogeny, push every live point through it, and pop
//! the next kernel candidate. The strategies guarantee the stack never
//! outgrows its compile-time capacity.

use heapless::Vec;

use crate::constants::*;
use crate::curve::{DoublingParameters, ProjectivePoint, TriplingParameters};
use crate::isogeny::{FiveIsogeny, FourIsogeny, ThreeIsogeny};

/// Walk the 2^260-isogeny as a chain of MAX_ALICE 4-isogenies starting
/// from the kernel point `r`, pushing every point in `push` through
/// each step. Returns the final codomain coefficients.
pub(crate) fn four_isogeny_walk(
    mut curve: DoublingParameters,
    mut r: ProjectivePoint,
    push: &mut [ProjectivePoint],
) -> DoublingParameters {
    let mut saved: Vec<(ProjectivePoint, usize), MAX_INT_POINTS_ALICE> = Vec::new();
    let mut index = 0;

    for row in 1..MAX_ALICE {
        while index < MAX_ALICE - row {
            saved.push((r, index)).unwrap();
            let m = STRAT_ALICE[MAX_ALICE - index - row];
            r = r.pow2k(&curve, (2 * m) as u32);
            index += m;
        }
        let (codomain, phi) = FourIsogeny::compute_four_isogeny(&r);
        curve = codomain;

        for entry in saved.iter_mut() {
            entry.0 = phi.eval(&entry.0);
        }
        for point in push.iter_mut() {
            *point = phi.eval(point);
        }

        let (top, depth) = saved.pop().unwrap();
        r = top;
        index = depth;
    }

    let (codomain, phi) = FourIsogeny::compute_four_isogeny(&r);
    for point in push.iter_mut() {
        *point = phi.eval(point);
    }
    codomain
}

/// Walk the 3^153-isogeny as a chain of MAX_BOB 3-isogenies. Returns
/// the final codomain coefficients.
pub(crate) fn three_isogeny_walk(
    mut curve: TriplingParameters,
    mut r: ProjectivePoint,
    push: &mut [ProjectivePoint],
) -> TriplingParameters {
    let mut saved: Vec<(ProjectivePoint, usize), MAX_INT_POINTS_BOB> = Vec::new();
    let mut index = 0;

    for row in 1..MAX_BOB {
        while index < MAX_BOB - row {
            saved.push((r, index)).unwrap();
            let m = STRAT_BOB[MAX_BOB - index - row];
            r = r.pow3k(&curve, m as u32);
            index += m;
        }
        let (codomain, phi) = ThreeIsogeny::compute_three_isogeny(&r);
        curve = codomain;

        for entry in saved.iter_mut() {
            entry.0 = phi.eval(&entry.0);
        }
        for point in push.iter_mut() {
            *point = phi.eval(point);
        }

        let (top, depth) = saved.pop().unwrap();
        r = top;
        index = depth;
    }

    let (codomain, phi) = ThreeIsogeny::compute_three_isogeny(&r);
    for point in push.iter_mut() {
        *point = phi.eval(point);
    }
    codomain
}

/// Walk the 5^105-isogeny on the base curve as a chain of MAX_EVE
/// 5-isogenies. Degree-5 steps expose no codomain coefficients, so the
/// 2-torsion witness `alpha` travels through every step and yields the
/// next curve via `recover_from_alpha`. The final step needs no
/// recovery; nothing after it multiplies by 5.
pub(crate) fn five_isogeny_walk_with_alpha(
    mut curve: DoublingParameters,
    mut r: ProjectivePoint,
    mut alpha: ProjectivePoint,
    push: &mut [ProjectivePoint],
) {
    let mut saved: Vec<(ProjectivePoint, usize), MAX_INT_POINTS_EVE> = Vec::new();
    let mut index = 0;

    for row in 1..MAX_EVE {
        while index < MAX_EVE - row {
            saved.push((r, index)).unwrap();
            let m = STRAT_EVE[MAX_EVE - index - row];
            r = r.pow5k(&curve, m as u32);
            index += m;
        }
        let phi = FiveIsogeny::compute_five_isogeny(&r, &curve);
        alpha = phi.eval(&alpha);

        for entry in saved.iter_mut() {
            entry.0 = phi.eval(&entry.0);
        }
        for point in push.iter_mut() {
            *point = phi.eval(point);
        }
        curve = DoublingParameters::recover_from_alpha(&alpha);

        let (top, depth) = saved.pop().unwrap();
        r = top;
        index = depth;
    }

    let phi = FiveIsogeny::compute_five_isogeny(&r, &curve);
    for point in push.iter_mut() {
        *point = phi.eval(point);
    }
}

/// Walk the 5^105-isogeny on an arbitrary curve. Away from the base
/// curve no α image is available; the three transported basis points
/// (P, Q, R with R = Q - P) double as the curve-recovery witnesses.
/// Returns the final codomain coefficients.
pub(crate) fn five_isogeny_walk(
    mut curve: DoublingParameters,
    mut r: ProjectivePoint,
    basis: &mut [ProjectivePoint; 3],
) -> DoublingParameters {
    let mut saved: Vec<(ProjectivePoint, usize), MAX_INT_POINTS_EVE> = Vec::new();
    let mut index = 0;

    for row in 1..MAX_EVE {
        while index < MAX_EVE - row {
            saved.push((r, index)).unwrap();
            let m = STRAT_EVE[MAX_EVE - index - row];
            r = r.pow5k(&curve, m as u32);
            index += m;
        }
        let phi = FiveIsogeny::compute_five_isogeny(&r, &curve);

        for point in basis.iter_mut() {
            *point = phi.eval(point);
        }
        curve = DoublingParameters::recover_from_basis(&basis[0], &basis[1], &basis[2]);

        for entry in saved.iter_mut() {
            entry.0 = phi.eval(&entry.0);
        }

        let (top, depth) = saved.pop().unwrap();
        r = top;
        index = depth;
    }

    let phi = FiveIsogeny::compute_five_isogeny(&r, &curve);
    for point in basis.iter_mut() {
        *point = phi.eval(point);
    }
    DoublingParameters::recover_from_basis(&basis[0], &basis[1], &basis[2])
}
