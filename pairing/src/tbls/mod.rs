//! Threshold BLS signatures.
//!
//! A secret scalar is split with Shamir secret sharing into `n` [Share]s of a polynomial of degree
//! `t - 1`, where share `i` is the polynomial evaluated at `x = i` (indices start at 1). Each share
//! holder produces a [PartialSignature]; any `t` valid partial signatures over the same message
//! combine (by Lagrange interpolation in the exponent) into the exact signature the secret would
//! have produced, without ever reconstructing the secret.
//!
//! Partial signatures are checked against the public commitment to the sharing polynomial
//! ([poly::Poly::commit]). Distributing shares is out of scope: [generate_shares] is a trusted
//! dealer suitable for tests and for callers that run their own dealing.
//!
//! # Example
//!
//! ```rust
//! use commonware_pairing::{
//!     bls::{self, MinSig, Scheme},
//!     bls12381::blst::{Blst, G2},
//!     tbls::{self, generate_shares, Threshold},
//!     Stream,
//! };
//!
//! let scheme = Scheme::<Blst, MinSig>::new(Blst, bls::Config::default());
//! let threshold = Threshold::new(scheme, tbls::Config { threshold: 3, concurrency: 1 }).unwrap();
//!
//! // Deal 5 shares with a threshold of 3
//! let (commitment, shares) =
//!     generate_shares::<G2, _>(&mut Stream::new(b"dealer"), 5, 3).unwrap();
//!
//! // Any 3 holders can produce a signature
//! let partials: Vec<_> = shares[1..4]
//!     .iter()
//!     .map(|share| threshold.partial_sign(share, b"hello"))
//!     .collect();
//! let signature = threshold.combine(&commitment, b"hello", &partials).unwrap();
//! threshold
//!     .scheme()
//!     .verify_point(commitment.constant(), b"hello", &signature)
//!     .unwrap();
//! ```

pub mod lagrange;
pub mod poly;

use crate::{
    algebra::{Field, Group, Space},
    bls::{Scheme, Variant},
    codec::{ByteOrder, Marshal},
    Error, Suite,
};
use bytes::{Buf, BufMut};
use commonware_codec::{Error as CodecError, FixedSize, Read, ReadExt, Write};
use lagrange::{compute_weights, recover_with_weights};
use poly::{Eval, Poly};
use rand::{CryptoRng, RngCore};
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};
use std::{collections::BTreeSet, fmt};
use tracing::{debug, trace, warn};
use zeroize::Zeroize;

/// A partial signature: the signature of one share, tagged with the share's index.
///
/// The wire form is the index (4 bytes, big-endian) followed by the compressed signature.
pub type PartialSignature<S, V> = Eval<<V as Variant<S>>::Signature>;

/// Configuration for a [Threshold] scheme.
#[derive(Clone, Debug)]
pub struct Config {
    /// The number of valid partial signatures required to produce a signature.
    pub threshold: u32,

    /// The number of threads used to verify partial signatures and to recover multiple
    /// signatures (`1` runs sequentially).
    pub concurrency: usize,
}

/// A share of a threshold signing key.
///
/// The private scalar is zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Share<F: Field> {
    /// The share's index in the polynomial.
    pub index: u32,
    /// The scalar corresponding to the share's secret.
    pub private: F,
}

impl<F: Field> Share<F> {
    /// Returns the public key corresponding to the share.
    ///
    /// This can be verified against the public polynomial.
    pub fn public<G: Group<Scalar = F>>(&self) -> G {
        G::mul_base(&self.private)
    }
}

impl<F: Field> fmt::Debug for Share<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<F: Field> Zeroize for Share<F> {
    fn zeroize(&mut self) {
        self.private.zeroize();
    }
}

impl<F: Field> Drop for Share<F> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<F: Field> Write for Share<F> {
    fn write(&self, buf: &mut impl BufMut) {
        self.index.write(buf);
        self.private.write(buf);
    }
}

impl<F: Field> Read for Share<F> {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let index = u32::read(buf)?;
        let private = F::read(buf)?;
        Ok(Self { index, private })
    }
}

impl<F: Field> FixedSize for Share<F> {
    const SIZE: usize = u32::SIZE + F::SIZE;
}

impl<F: Field> Marshal for Share<F> {
    const BYTE_ORDER: ByteOrder = F::BYTE_ORDER;
}

/// Deals `n` shares of a fresh secret with reconstruction threshold `t`.
///
/// Returns the public commitment to the sharing polynomial (its constant term is the group public
/// key) and the shares, indexed `1..=n`. Fails with [Error::InvalidThreshold] unless
/// `1 <= t <= n`.
pub fn generate_shares<G, R>(
    rng: &mut R,
    n: u32,
    t: u32,
) -> Result<(Poly<G>, Vec<Share<G::Scalar>>), Error>
where
    G: Group,
    G::Scalar: Space<Scalar = G::Scalar>,
    R: RngCore + CryptoRng,
{
    if t == 0 || t > n {
        return Err(Error::InvalidThreshold(t));
    }
    let mut secret = poly::new_from::<G::Scalar, _>(t - 1, rng);
    let commitment = Poly::commit(&secret);
    let shares = (1..=n)
        .map(|index| Share {
            index,
            private: secret.evaluate(index).value,
        })
        .collect();
    secret.zeroize();
    Ok((commitment, shares))
}

/// The threshold BLS scheme built over a [Scheme].
#[derive(Clone, Debug)]
pub struct Threshold<S: Suite, V: Variant<S>> {
    scheme: Scheme<S, V>,
    threshold: u32,
    concurrency: usize,
}

impl<S: Suite, V: Variant<S>> Threshold<S, V> {
    /// Creates a new threshold scheme.
    ///
    /// Fails with [Error::InvalidThreshold] if the threshold is zero.
    pub fn new(scheme: Scheme<S, V>, cfg: Config) -> Result<Self, Error> {
        if cfg.threshold == 0 {
            return Err(Error::InvalidThreshold(cfg.threshold));
        }
        Ok(Self {
            scheme,
            threshold: cfg.threshold,
            concurrency: cfg.concurrency.max(1),
        })
    }

    /// Returns the underlying signature scheme.
    pub fn scheme(&self) -> &Scheme<S, V> {
        &self.scheme
    }

    /// Returns the number of partial signatures required to produce a signature.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Signs the provided message with a key share.
    pub fn partial_sign(&self, share: &Share<S::Scalar>, message: &[u8]) -> PartialSignature<S, V> {
        Eval {
            index: share.index,
            value: self.scheme.sign_point(&share.private, message),
        }
    }

    /// Verifies a partial signature against the public key of its share.
    ///
    /// # Warning
    ///
    /// This function assumes a group check was already performed on `public` and on the
    /// signature.
    pub fn verify_partial(
        &self,
        public: &V::Public,
        message: &[u8],
        partial: &PartialSignature<S, V>,
    ) -> Result<(), Error> {
        if partial.index == 0 {
            return Err(Error::InvalidIndex(partial.index));
        }
        self.scheme
            .verify_point(public, message, &partial.value)
            .map_err(|_| Error::InvalidPartialSignature(partial.index))
    }

    /// Verifies a partial signature against the public polynomial by evaluating it at the
    /// partial's index.
    pub fn verify_partial_poly(
        &self,
        public: &Poly<V::Public>,
        message: &[u8],
        partial: &PartialSignature<S, V>,
    ) -> Result<(), Error> {
        let public = public.evaluate(partial.index).value;
        self.verify_partial(&public, message, partial)
    }

    fn pool(&self, jobs: usize) -> Result<Option<ThreadPool>, Error> {
        let concurrency = self.concurrency.min(jobs);
        if concurrency <= 1 {
            return Ok(None);
        }
        ThreadPoolBuilder::new()
            .num_threads(concurrency)
            .build()
            .map(Some)
            .map_err(|err| Error::ThreadPool(err.to_string()))
    }

    /// Returns whether each of `partials` verifies, in order.
    fn check_all(
        &self,
        public: &Poly<V::Public>,
        message: &[u8],
        partials: &[&PartialSignature<S, V>],
    ) -> Result<Vec<bool>, Error> {
        let hm = self.scheme.hash_message(message);
        let suite = self.scheme.suite();
        let check = |partial: &&PartialSignature<S, V>| {
            let public = public.evaluate(partial.index).value;
            V::verify(suite, &public, &hm, &partial.value).is_ok()
        };
        Ok(match self.pool(partials.len())? {
            Some(pool) => pool.install(|| partials.par_iter().map(check).collect()),
            None => partials.iter().map(check).collect(),
        })
    }

    /// Combines partial signatures over `message` into a signature.
    ///
    /// Requires at least `threshold` partial signatures with distinct, non-zero indices, every one
    /// of which must verify against `public`. Fails on the first offending partial signature
    /// (see [Threshold::combine_valid] to skip them instead).
    ///
    /// # Determinism
    ///
    /// The result equals the signature of the shared secret regardless of which partial
    /// signatures (or in which order) are supplied.
    pub fn combine(
        &self,
        public: &Poly<V::Public>,
        message: &[u8],
        partials: &[PartialSignature<S, V>],
    ) -> Result<V::Signature, Error> {
        if partials.len() < self.threshold as usize {
            debug!(
                received = partials.len(),
                required = self.threshold,
                "not enough partial signatures"
            );
            return Err(Error::InsufficientShares {
                received: partials.len(),
                required: self.threshold,
                rejected: Vec::new(),
            });
        }
        let mut seen = BTreeSet::new();
        for partial in partials {
            if partial.index == 0 {
                return Err(Error::InvalidIndex(partial.index));
            }
            if !seen.insert(partial.index) {
                return Err(Error::DuplicateIndex(partial.index));
            }
        }

        let refs = partials.iter().collect::<Vec<_>>();
        let valid = self.check_all(public, message, &refs)?;
        if let Some((partial, _)) = partials.iter().zip(&valid).find(|(_, ok)| !**ok) {
            debug!(index = partial.index, "invalid partial signature");
            return Err(Error::InvalidPartialSignature(partial.index));
        }
        self.recover(partials)
    }

    /// Combines partial signatures over `message`, skipping any that do not verify.
    ///
    /// Partial signatures with index `0`, repeated indices (all but the first occurrence), or
    /// invalid signatures are rejected. If fewer than `threshold` remain, fails with
    /// [Error::InsufficientShares] listing the rejected indices.
    pub fn combine_valid(
        &self,
        public: &Poly<V::Public>,
        message: &[u8],
        partials: &[PartialSignature<S, V>],
    ) -> Result<V::Signature, Error> {
        let mut rejected = Vec::new();
        let mut seen = BTreeSet::new();
        let mut candidates = Vec::with_capacity(partials.len());
        for partial in partials {
            if partial.index == 0 || !seen.insert(partial.index) {
                warn!(index = partial.index, "rejected partial signature index");
                rejected.push(partial.index);
                continue;
            }
            candidates.push(partial);
        }

        let valid = self.check_all(public, message, &candidates)?;
        let mut accepted = Vec::with_capacity(candidates.len());
        for (partial, ok) in candidates.into_iter().zip(valid) {
            if ok {
                accepted.push(partial);
            } else {
                warn!(index = partial.index, "rejected invalid partial signature");
                rejected.push(partial.index);
            }
        }
        trace!(
            accepted = accepted.len(),
            rejected = rejected.len(),
            required = self.threshold,
            "filtered partial signatures"
        );

        if accepted.len() < self.threshold as usize {
            return Err(Error::InsufficientShares {
                received: accepted.len(),
                required: self.threshold,
                rejected,
            });
        }
        self.recover(accepted)
    }

    /// Recovers a signature from at least `threshold` partial signatures without verifying them.
    ///
    /// The partial signatures with the lowest `threshold` indices are used.
    ///
    /// # Warning
    ///
    /// An invalid partial signature yields an invalid signature.
    pub fn recover<'a, I>(&self, partials: I) -> Result<V::Signature, Error>
    where
        I: IntoIterator<Item = &'a PartialSignature<S, V>>,
        V::Signature: 'a,
    {
        Poly::recover(self.threshold, partials)
    }

    /// Selects the lowest `threshold` indices of a set of partial signatures.
    fn prepare<'a>(
        &self,
        partials: &'a [PartialSignature<S, V>],
    ) -> Result<Vec<&'a PartialSignature<S, V>>, Error> {
        let t = self.threshold as usize;
        if partials.len() < t {
            return Err(Error::InsufficientShares {
                received: partials.len(),
                required: self.threshold,
                rejected: Vec::new(),
            });
        }
        let mut partials = partials.iter().collect::<Vec<_>>();
        partials.sort_by_key(|p| p.index);
        partials.truncate(t);
        Ok(partials)
    }

    /// Recovers multiple signatures from sets of partial signatures produced by the same shares.
    ///
    /// The Lagrange weights are computed once and each set is interpolated on the thread pool.
    /// Fails with [Error::InvalidIndex] if the selected indices differ between sets.
    pub fn recover_multiple(
        &self,
        many: &[Vec<PartialSignature<S, V>>],
    ) -> Result<Vec<V::Signature>, Error> {
        let Some((first, rest)) = many.split_first() else {
            return Ok(Vec::new());
        };

        // Ensure every set selects the same indices
        let first = self.prepare(first)?;
        let mut prepared = vec![first];
        for partials in rest {
            let partials = self.prepare(partials)?;
            for (expected, partial) in prepared[0].iter().zip(&partials) {
                if expected.index != partial.index {
                    return Err(Error::InvalidIndex(partial.index));
                }
            }
            prepared.push(partials);
        }

        let indices = prepared[0].iter().map(|p| p.index).collect::<Vec<_>>();
        let weights = compute_weights::<S::Scalar>(&indices)?;
        let recover = |partials: &Vec<&PartialSignature<S, V>>| {
            recover_with_weights(&weights, partials.iter().copied())
        };
        match self.pool(prepared.len())? {
            Some(pool) => pool.install(|| prepared.par_iter().map(recover).collect()),
            None => prepared.iter().map(recover).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bls::{Config as SchemeConfig, MinPk, MinSig},
        bls12381::{arkworks::Arkworks, blst::Blst},
        stream::Stream,
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn threshold<S: Suite, V: Variant<S>>(t: u32, concurrency: usize) -> Threshold<S, V> {
        Threshold::new(
            Scheme::new(S::default(), SchemeConfig::default()),
            Config {
                threshold: t,
                concurrency,
            },
        )
        .unwrap()
    }

    /// Deals shares of a known secret.
    fn deal<S: Suite, V: Variant<S>>(
        seed: u64,
        n: u32,
        t: u32,
    ) -> (S::Scalar, Poly<V::Public>, Vec<Share<S::Scalar>>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let secret = poly::new_from::<S::Scalar, _>(t - 1, &mut rng);
        let commitment = Poly::commit(&secret);
        let shares = (1..=n)
            .map(|index| Share {
                index,
                private: secret.evaluate(index).value,
            })
            .collect();
        (secret.constant().clone(), commitment, shares)
    }

    fn subsets_agree<S: Suite, V: Variant<S>>(concurrency: usize) {
        let (n, t) = (7, 4);
        let tbls = threshold::<S, V>(t, concurrency);
        let (secret, public, shares) = deal::<S, V>(0, n, t);
        let message = b"threshold";
        let expected = tbls.scheme().sign(&secret, message);
        let partials = shares
            .iter()
            .map(|share| tbls.partial_sign(share, message))
            .collect::<Vec<_>>();

        for subset in [
            vec![0, 1, 2, 3],
            vec![3, 4, 5, 6],
            vec![6, 0, 4, 2],
            vec![1, 2, 3, 4, 5, 6, 0],
        ] {
            let subset = subset
                .into_iter()
                .map(|i| partials[i].clone())
                .collect::<Vec<_>>();
            let signature = tbls.combine(&public, message, &subset).unwrap();
            assert_eq!(signature.marshal_binary(), expected);
            tbls.scheme()
                .verify(public.constant(), message, &expected)
                .unwrap();
        }
    }

    #[test]
    fn test_subsets_agree() {
        subsets_agree::<Blst, MinPk>(1);
        subsets_agree::<Blst, MinSig>(4);
        subsets_agree::<Arkworks, MinPk>(4);
        subsets_agree::<Arkworks, MinSig>(1);
    }

    fn insufficient<S: Suite, V: Variant<S>>() {
        let (n, t) = (5, 3);
        let tbls = threshold::<S, V>(t, 1);
        let (_, public, shares) = deal::<S, V>(1, n, t);
        let partials = shares[..2]
            .iter()
            .map(|share| tbls.partial_sign(share, b"msg"))
            .collect::<Vec<_>>();
        assert!(matches!(
            tbls.combine(&public, b"msg", &partials),
            Err(Error::InsufficientShares {
                received: 2,
                required: 3,
                ..
            })
        ));
        assert!(matches!(
            tbls.recover(&partials),
            Err(Error::InsufficientShares { .. })
        ));
    }

    #[test]
    fn test_insufficient() {
        insufficient::<Blst, MinSig>();
        insufficient::<Arkworks, MinPk>();
    }

    fn invalid_partial<S: Suite, V: Variant<S>>() {
        let (n, t) = (5, 3);
        let tbls = threshold::<S, V>(t, 2);
        let (secret, public, shares) = deal::<S, V>(2, n, t);
        let mut partials = shares
            .iter()
            .map(|share| tbls.partial_sign(share, b"msg"))
            .collect::<Vec<_>>();

        // Share 2 signs a different message
        partials[1] = tbls.partial_sign(&shares[1], b"other");
        assert!(matches!(
            tbls.verify_partial_poly(&public, b"msg", &partials[1]),
            Err(Error::InvalidPartialSignature(2))
        ));
        tbls.verify_partial(&shares[0].public(), b"msg", &partials[0])
            .unwrap();

        // Strict combination reports the offender
        assert!(matches!(
            tbls.combine(&public, b"msg", &partials),
            Err(Error::InvalidPartialSignature(2))
        ));

        // Robust combination skips it
        let signature = tbls.combine_valid(&public, b"msg", &partials).unwrap();
        assert_eq!(
            signature.marshal_binary(),
            tbls.scheme().sign(&secret, b"msg")
        );

        // ...unless too few remain
        partials[3] = tbls.partial_sign(&shares[3], b"other");
        partials[4] = partials[0].clone();
        match tbls.combine_valid(&public, b"msg", &partials) {
            Err(Error::InsufficientShares {
                received,
                required,
                mut rejected,
            }) => {
                assert_eq!(received, 2);
                assert_eq!(required, 3);
                rejected.sort();
                assert_eq!(rejected, vec![1, 2, 4]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_partial() {
        invalid_partial::<Blst, MinPk>();
        invalid_partial::<Blst, MinSig>();
        invalid_partial::<Arkworks, MinPk>();
        invalid_partial::<Arkworks, MinSig>();
    }

    fn bad_indices<S: Suite, V: Variant<S>>() {
        let (n, t) = (4, 2);
        let tbls = threshold::<S, V>(t, 1);
        let (_, public, shares) = deal::<S, V>(3, n, t);
        let partial = tbls.partial_sign(&shares[0], b"msg");

        let duplicated = vec![partial.clone(), partial.clone()];
        assert!(matches!(
            tbls.combine(&public, b"msg", &duplicated),
            Err(Error::DuplicateIndex(1))
        ));

        let mut zero = partial.clone();
        zero.index = 0;
        assert!(matches!(
            tbls.verify_partial_poly(&public, b"msg", &zero),
            Err(Error::InvalidIndex(0))
        ));
        assert!(matches!(
            tbls.combine(&public, b"msg", &[zero, partial]),
            Err(Error::InvalidIndex(0))
        ));
    }

    #[test]
    fn test_bad_indices() {
        bad_indices::<Blst, MinSig>();
        bad_indices::<Arkworks, MinSig>();
    }

    fn recover_multiple<S: Suite, V: Variant<S>>(concurrency: usize) {
        let (n, t) = (6, 3);
        let tbls = threshold::<S, V>(t, concurrency);
        let (secret, _, shares) = deal::<S, V>(4, n, t);
        let messages: [&[u8]; 3] = [b"a", b"b", b"c"];
        let many = messages
            .iter()
            .map(|message| {
                shares[2..]
                    .iter()
                    .rev()
                    .map(|share| tbls.partial_sign(share, message))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let signatures = tbls.recover_multiple(&many).unwrap();
        assert_eq!(signatures.len(), 3);
        for (signature, message) in signatures.iter().zip(messages) {
            assert_eq!(
                signature.marshal_binary(),
                tbls.scheme().sign(&secret, message)
            );
        }

        // Sets must select the same indices
        let mut mismatched = many.clone();
        mismatched[1] = shares[..3]
            .iter()
            .map(|share| tbls.partial_sign(share, b"b"))
            .collect();
        assert!(matches!(
            tbls.recover_multiple(&mismatched),
            Err(Error::InvalidIndex(_))
        ));
        assert!(tbls.recover_multiple(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_recover_multiple() {
        recover_multiple::<Blst, MinPk>(1);
        recover_multiple::<Blst, MinSig>(3);
        recover_multiple::<Arkworks, MinPk>(3);
        recover_multiple::<Arkworks, MinSig>(1);
    }

    fn dealer<S: Suite, V: Variant<S>>() {
        let tbls = threshold::<S, V>(3, 1);
        let (public, shares) =
            generate_shares::<V::Public, _>(&mut Stream::new(b"dealer"), 5, 3).unwrap();
        assert_eq!(public.required(), 3);
        assert_eq!(shares.len(), 5);
        for share in &shares {
            assert_eq!(
                share.public::<V::Public>(),
                public.evaluate(share.index).value
            );
        }
        let partials = shares[2..]
            .iter()
            .map(|share| tbls.partial_sign(share, b"msg"))
            .collect::<Vec<_>>();
        let signature = tbls.combine(&public, b"msg", &partials).unwrap();
        tbls.scheme()
            .verify_point(public.constant(), b"msg", &signature)
            .unwrap();
    }

    #[test]
    fn test_dealer() {
        dealer::<Blst, MinPk>();
        dealer::<Arkworks, MinSig>();
    }

    fn zero_threshold<S: Suite, V: Variant<S>>() {
        let scheme = Scheme::<S, V>::new(S::default(), SchemeConfig::default());
        let cfg = Config {
            threshold: 0,
            concurrency: 1,
        };
        assert!(matches!(
            Threshold::new(scheme, cfg),
            Err(Error::InvalidThreshold(0))
        ));

        let mut rng = Stream::new(b"dealer");
        for (n, t) in [(5, 0), (3, 4), (0, 1)] {
            assert!(matches!(
                generate_shares::<V::Public, _>(&mut rng, n, t),
                Err(Error::InvalidThreshold(bad)) if bad == t
            ));
        }

        // Interpolation never yields a value from zero evaluations
        assert!(matches!(
            Poly::<V::Signature>::recover(0, []),
            Err(Error::InvalidThreshold(0))
        ));
    }

    #[test]
    fn test_zero_threshold() {
        zero_threshold::<Blst, MinPk>();
        zero_threshold::<Arkworks, MinSig>();
    }

    #[test]
    fn test_share_codec() {
        let (_, _, shares) = deal::<Blst, MinSig>(5, 3, 2);
        let bytes = shares[2].marshal_binary();
        assert_eq!(bytes.len(), Share::<<Blst as Suite>::Scalar>::SIZE);
        assert_eq!(&bytes[..4], &[0, 0, 0, 3]);
        let decoded = Share::<<Blst as Suite>::Scalar>::unmarshal_binary(&bytes).unwrap();
        assert_eq!(decoded, shares[2]);
        assert_eq!(format!("{decoded:?}"), "Share { index: 3, .. }");

        // Partial signatures use the same layout
        let tbls = threshold::<Blst, MinSig>(2, 1);
        let partial = tbls.partial_sign(&shares[0], b"msg");
        let bytes = partial.marshal_binary();
        assert_eq!(&bytes[..4], &[0, 0, 0, 1]);
        let decoded = PartialSignature::<Blst, MinSig>::unmarshal_binary(&bytes).unwrap();
        assert_eq!(decoded, partial);
    }
}
