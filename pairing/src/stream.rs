//! Keyed pseudo-random byte streams.
//!
//! A [Stream] is a ChaCha20 generator. [Stream::new] keys it from a label, so two streams created
//! with the same label produce the same bytes (and therefore the same scalars and points on every
//! backend). [Stream::from_entropy] keys it from the operating system.
//!
//! A stream advances on every draw and must be owned by one caller at a time.

use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Context string for deriving stream keys from labels.
const CONTEXT: &str = "commonware-pairing 2025-01-01 random stream";

/// A deterministic or entropy-seeded cryptographic random stream.
#[derive(Clone, Debug)]
pub struct Stream(ChaCha20Rng);

impl Stream {
    /// Creates a stream keyed by `label`.
    pub fn new(label: &[u8]) -> Self {
        let seed = blake3::derive_key(CONTEXT, label);
        Self(ChaCha20Rng::from_seed(seed))
    }

    /// Creates a stream keyed from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self(ChaCha20Rng::from_entropy())
    }
}

impl RngCore for Stream {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for Stream {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algebra::Field,
        bls::{Config, MinPk, Scheme},
        bls12381::blst::{self, Blst},
        tbls::{generate_shares, poly},
    };

    #[test]
    fn test_keyed_streams_repeat() {
        let mut a = Stream::new(b"label");
        let mut b = Stream::new(b"label");
        let (mut x, mut y) = ([0u8; 64], [0u8; 64]);
        a.fill_bytes(&mut x);
        b.fill_bytes(&mut y);
        assert_eq!(x, y);

        // Draws advance the stream
        a.fill_bytes(&mut y);
        assert_ne!(x, y);
    }

    #[test]
    fn test_labels_separate() {
        let mut a = Stream::new(b"label");
        let mut b = Stream::new(b"other");
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_entropy_streams_differ() {
        let mut a = Stream::from_entropy();
        let mut b = Stream::from_entropy();
        let (mut x, mut y) = ([0u8; 32], [0u8; 32]);
        a.fill_bytes(&mut x);
        b.fill_bytes(&mut y);
        assert_ne!(x, y);
    }

    #[test]
    fn test_secret_sampling() {
        // Keys, dealer polynomials, and shares all draw their secret from the same stream position
        let scheme = Scheme::<Blst, MinPk>::new(Blst, Config::default());
        let (private, public) = scheme.new_keypair(&mut Stream::new(b"secret"));
        assert_eq!(private, blst::Scalar::pick(&mut Stream::new(b"secret")));

        let secret = poly::new_from::<blst::Scalar, _>(2, &mut Stream::new(b"secret"));
        assert_eq!(secret.constant(), &private);

        let (commitment, shares) =
            generate_shares::<blst::G1, _>(&mut Stream::new(b"secret"), 4, 3).unwrap();
        assert_eq!(commitment.constant(), &public);
        assert_eq!(shares.len(), 4);
    }
}
