//! Pairing-based cryptography over BLS12-381 with interchangeable backends.
//!
//! This crate provides the scalar field, the pairing groups G1, G2, and GT, the bilinear pairing,
//! and the BLS and threshold BLS signature schemes built on top of them. Every algebraic type is
//! reached through a [Suite], and two suites ([bls12381::blst::Blst] and
//! [bls12381::arkworks::Arkworks]) implement the same curve with identical encodings.
//!
//! # Status
//!
//! `commonware-pairing` is **ALPHA** software and is not yet recommended for production use.
//! Developers should expect breaking changes and occasional instability.
//!
//! # Example
//!
//! ```rust
//! use commonware_pairing::{
//!     bls::{Config, MinSig, Scheme},
//!     bls12381::blst::Blst,
//!     Stream, Suite,
//! };
//!
//! // Build a scheme with signatures in G1 and public keys in G2
//! let scheme = Scheme::<Blst, MinSig>::new(Blst, Config::default());
//!
//! // Generate a keypair
//! let mut stream = Stream::new(b"example");
//! let (private, public) = scheme.new_keypair(&mut stream);
//!
//! // Sign and verify a message
//! let signature = scheme.sign(&private, b"hello world");
//! scheme.verify(&public, b"hello world", &signature).expect("signature should be valid");
//! ```

pub mod algebra;
pub mod bls;
pub mod bls12381;
pub mod codec;
pub mod conformance;
pub mod stream;
pub mod suite;
pub mod tbls;

pub use stream::Stream;
pub use suite::Suite;

use thiserror::Error;

/// Errors that can occur when working with pairing-based signatures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("decoding failed: {0}")]
    Decoding(#[from] codec::Error),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("failed to decode aggregate input {index}: {source}")]
    Aggregation { index: usize, source: codec::Error },
    #[error("insufficient shares: {received}/{required} (rejected: {rejected:?})")]
    InsufficientShares {
        received: usize,
        required: u32,
        rejected: Vec<u32>,
    },
    #[error("invalid partial signature from share {0}")]
    InvalidPartialSignature(u32),
    #[error("duplicate share index {0}")]
    DuplicateIndex(u32),
    #[error("invalid share index {0}")]
    InvalidIndex(u32),
    #[error("invalid threshold {0}")]
    InvalidThreshold(u32),
    #[error("{0} requires a prime-order group")]
    Domain(&'static str),
    #[error("no inverse")]
    NoInverse,
    #[error("unable to build thread pool: {0}")]
    ThreadPool(String),
}
