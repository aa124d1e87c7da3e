//! Different variants of the BLS signature scheme.
//!
//! A variant fixes which group of a [Suite] carries signatures and which carries public keys.

use crate::{
    algebra::{Group, HashToGroup, PrimeOrder, SubgroupCheck},
    Error, Suite,
};
use std::{fmt::Debug, hash::Hash};
use tracing::debug;

/// A specific instance of a signature scheme over the suite `S`.
pub trait Variant<S: Suite>: Clone + Copy + Debug + Default + Hash + Eq + Send + Sync + 'static {
    /// The public key type.
    type Public: Group<Scalar = S::Scalar> + SubgroupCheck + PrimeOrder;

    /// The signature type.
    type Signature: Group<Scalar = S::Scalar> + SubgroupCheck + HashToGroup + PrimeOrder;

    /// The domain separator tag (DST) for a message.
    const MESSAGE: &'static [u8];

    /// Verify the signature from the provided public key and pre-hashed message.
    fn verify(
        suite: &S,
        public: &Self::Public,
        hm: &Self::Signature,
        signature: &Self::Signature,
    ) -> Result<(), Error>;
}

/// A [Variant] with a public key in G1 and a signature in G2.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct MinPk;

impl<S: Suite> Variant<S> for MinPk {
    type Public = S::G1;
    type Signature = S::G2;

    const MESSAGE: &'static [u8] = S::DST_G2;

    /// Verifies that `e(G1::one(),sig)` is equal to `e(pk,hm)` with a single multi-pairing check.
    fn verify(
        suite: &S,
        public: &Self::Public,
        hm: &Self::Signature,
        signature: &Self::Signature,
    ) -> Result<(), Error> {
        if !suite.validate_pairing(&S::G1::generator(), signature, public, hm) {
            debug!(suite = S::NAME, variant = "MinPk", "pairing check failed");
            return Err(Error::InvalidSignature);
        }
        Ok(())
    }
}

/// A [Variant] with a public key in G2 and a signature in G1.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct MinSig;

impl<S: Suite> Variant<S> for MinSig {
    type Public = S::G2;
    type Signature = S::G1;

    const MESSAGE: &'static [u8] = S::DST_G1;

    /// Verifies that `e(sig,G2::one())` is equal to `e(hm,pk)` with a single multi-pairing check.
    fn verify(
        suite: &S,
        public: &Self::Public,
        hm: &Self::Signature,
        signature: &Self::Signature,
    ) -> Result<(), Error> {
        if !suite.validate_pairing(signature, &S::G2::generator(), hm, public) {
            debug!(suite = S::NAME, variant = "MinSig", "pairing check failed");
            return Err(Error::InvalidSignature);
        }
        Ok(())
    }
}
