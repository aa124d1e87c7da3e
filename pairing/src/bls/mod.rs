//! BLS signatures over a [Suite].
//!
//! A [Scheme] is parameterized by a [Variant] that selects the signature group ([MinPk] places
//! signatures in G2, [MinSig] places them in G1). Signatures cross the API boundary in their
//! compressed encoding; typed variants (`*_point`) are provided for callers that already hold
//! decoded points.
//!
//! # Warning
//!
//! Aggregation does not defend against rogue-key attacks. [Scheme::aggregate_public_keys] assumes
//! that the caller has established that each public key is unique and that its owner knows the
//! corresponding private key (for example, with a proof of possession collected out of band).
//! If an attacker may choose a public key as a function of the others, it can forge an aggregate
//! signature.

mod variant;
pub use variant::{MinPk, MinSig, Variant};

use crate::{
    algebra::{Additive, Field, Group, HashToGroup},
    codec::Marshal,
    Error, Suite,
};
use rand::{CryptoRng, RngCore};
use std::{borrow::Cow, marker::PhantomData};

/// Prefixes a message with the varint length of a namespace and the namespace itself, so no two
/// distinct `(namespace, message)` pairs produce the same payload.
pub use commonware_utils::union_unique;

/// Configuration for a [Scheme].
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Namespace mixed into every signed message.
    ///
    /// Signatures produced under one namespace never verify under another (or under none).
    pub namespace: Option<Vec<u8>>,
}

/// The BLS signature scheme over the suite `S` with variant `V`.
#[derive(Clone, Debug)]
pub struct Scheme<S: Suite, V: Variant<S>> {
    suite: S,
    namespace: Option<Vec<u8>>,
    _variant: PhantomData<V>,
}

impl<S: Suite, V: Variant<S>> Scheme<S, V> {
    /// Creates a new scheme over `suite`.
    pub fn new(suite: S, cfg: Config) -> Self {
        Self {
            suite,
            namespace: cfg.namespace,
            _variant: PhantomData,
        }
    }

    /// Returns the underlying suite.
    pub fn suite(&self) -> &S {
        &self.suite
    }

    fn payload<'a>(&self, message: &'a [u8]) -> Cow<'a, [u8]> {
        match &self.namespace {
            Some(namespace) => Cow::Owned(union_unique(namespace, message)),
            None => Cow::Borrowed(message),
        }
    }

    /// Hashes the provided message (and namespace, if configured) to the signature group.
    pub fn hash_message(&self, message: &[u8]) -> V::Signature {
        V::Signature::hash_to_group(V::MESSAGE, &self.payload(message))
    }

    /// Computes the public key of `private`.
    pub fn compute_public(&self, private: &S::Scalar) -> V::Public {
        V::Public::mul_base(private)
    }

    /// Returns a new keypair derived from the provided randomness.
    pub fn new_keypair<R: RngCore + CryptoRng>(&self, rng: &mut R) -> (S::Scalar, V::Public) {
        let private = S::Scalar::pick(rng);
        let public = self.compute_public(&private);
        (private, public)
    }

    /// Signs the provided message with the private key.
    ///
    /// # Determinism
    ///
    /// Signatures produced by this function are deterministic and are safe
    /// to use in a consensus-critical context.
    pub fn sign_point(&self, private: &S::Scalar, message: &[u8]) -> V::Signature {
        self.hash_message(message) * private
    }

    /// Signs the provided message with the private key and returns the compressed signature.
    pub fn sign(&self, private: &S::Scalar, message: &[u8]) -> Vec<u8> {
        self.sign_point(private, message).marshal_binary()
    }

    /// Verifies a decoded signature with the provided public key.
    ///
    /// # Warning
    ///
    /// This function assumes a group check was already performed on
    /// `public` and `signature`.
    pub fn verify_point(
        &self,
        public: &V::Public,
        message: &[u8],
        signature: &V::Signature,
    ) -> Result<(), Error> {
        let hm = self.hash_message(message);
        V::verify(&self.suite, public, &hm, signature)
    }

    /// Verifies a compressed signature with the provided public key.
    ///
    /// Returns [Error::Decoding] if `signature` is malformed (including points outside the
    /// prime-order subgroup) and [Error::InvalidSignature] if it is well-formed but wrong.
    ///
    /// # Warning
    ///
    /// This function assumes a group check was already performed on `public`.
    pub fn verify(&self, public: &V::Public, message: &[u8], signature: &[u8]) -> Result<(), Error> {
        let signature = V::Signature::unmarshal_binary(signature)?;
        self.verify_point(public, message, &signature)
    }

    /// Aggregates compressed signatures.
    ///
    /// Fails on the first signature that does not decode, reporting its position.
    ///
    /// # Warning
    ///
    /// See the module-level warning about rogue-key attacks.
    pub fn aggregate_signatures<B: AsRef<[u8]>>(&self, signatures: &[B]) -> Result<Vec<u8>, Error> {
        let mut aggregate = V::Signature::zero();
        for (index, signature) in signatures.iter().enumerate() {
            let signature = V::Signature::unmarshal_binary(signature.as_ref())
                .map_err(|source| Error::Aggregation { index, source })?;
            aggregate += &signature;
        }
        Ok(aggregate.marshal_binary())
    }

    /// Aggregates multiple public keys.
    ///
    /// # Warning
    ///
    /// This function assumes a group check was already performed on all `public_keys`,
    /// that each `public_key` is unique, and that the caller has a Proof-of-Possession (PoP)
    /// for each `public_key`. If any of these assumptions are violated, an attacker can
    /// exploit this function to verify an incorrect aggregate signature.
    pub fn aggregate_public_keys<'a, I>(&self, public_keys: I) -> V::Public
    where
        I: IntoIterator<Item = &'a V::Public>,
        V::Public: 'a,
    {
        let mut aggregate = V::Public::zero();
        for public in public_keys {
            aggregate += public;
        }
        aggregate
    }

    /// Verifies an aggregate signature over a single message from multiple public keys.
    ///
    /// # Warning
    ///
    /// This function has the same assumptions as [Scheme::aggregate_public_keys].
    pub fn aggregate_verify<'a, I>(
        &self,
        public_keys: I,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a V::Public>,
        V::Public: 'a,
    {
        let public = self.aggregate_public_keys(public_keys);
        self.verify(&public, message, signature)
    }
}
