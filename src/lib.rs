//! # sigk
//!
//! An implementation of ephemeral three-party supersingular isogeny
//! group key agreement (SIGK) over GF(p747²), where
//! p747 = 2^260·3^153·5^105 - 1.
//!
//! Three participants, conventionally Alice, Bob and Eve, walk
//! isogeny chains of the pairwise coprime degrees 2, 3 and 5 over a
//! supersingular Montgomery curve; the shared secret is the
//! j-invariant of the curve where the three walks meet.
//!
//! The exchange runs in four messages:
//!
//! 1. every party publishes a public key (the images of the other two
//!    parties' torsion bases under her secret isogeny);
//! 2. Bob sends Alice-and-Bob's shared public to Eve
//!    ([`SIGKSecretKeyBob::shared_public`]);
//! 3. Eve derives her secret and sends the Bob-and-Eve shared public
//!    to Alice ([`SIGKSecretKeyEve::shared_secret`]);
//! 4. Alice derives her secret and sends the Alice-and-Eve shared
//!    public to Bob, who derives his
//!    ([`SIGKSecretKeyAlice::shared_secret`],
//!    [`SIGKSecretKeyBob::shared_secret`]).
//!
//! # Security
//!
//! Keys are strictly ephemeral. The scheme offers no resistance to
//! active adversaries, and static keys are broken by the
//! Galbraith-Petit-Shani-Ti attack.

#![allow(non_snake_case)]

pub mod backend;
pub mod curve;
pub mod field;
pub mod isogeny;

mod constants;
mod sigk;
mod strategy;

pub use crate::sigk::*;
