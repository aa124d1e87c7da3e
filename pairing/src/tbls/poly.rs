//! Polynomial operations over the scalar field of a suite.
//!
//! A polynomial has coefficients in any [Space]: scalars (a dealer's secret polynomial) or group
//! elements (the public commitment to it). Evaluation at a share index and interpolation at zero
//! are written once for both.
//!
//! # Warning
//!
//! The security of the threshold scheme depends on the secret polynomial being sampled with a
//! cryptographically secure source of randomness and on its coefficients never leaving the dealer.

use super::lagrange::{compute_weights, recover_with_weights};
use crate::{
    algebra::{Field, Group, Space},
    codec::{ByteOrder, Marshal},
    Error,
};
use bytes::{Buf, BufMut};
use commonware_codec::{Error as CodecError, FixedSize, Read, ReadExt, Write};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// A polynomial evaluation at a specific index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eval<C> {
    pub index: u32,
    pub value: C,
}

impl<C: Write> Write for Eval<C> {
    fn write(&self, buf: &mut impl BufMut) {
        self.index.write(buf);
        self.value.write(buf);
    }
}

impl<C: Read<Cfg = ()>> Read for Eval<C> {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let index = u32::read(buf)?;
        let value = C::read(buf)?;
        Ok(Self { index, value })
    }
}

impl<C: FixedSize> FixedSize for Eval<C> {
    const SIZE: usize = u32::SIZE + C::SIZE;
}

impl<C: Marshal> Marshal for Eval<C> {
    const BYTE_ORDER: ByteOrder = C::BYTE_ORDER;
}

/// A polynomial with coefficients of type `C`, constant term first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly<C>(Vec<C>);

/// Returns a new scalar polynomial of the given degree where each coefficient is
/// sampled at random from the provided RNG.
///
/// In the context of secret sharing, the threshold is the degree + 1.
pub fn new_from<F: Field, R: RngCore + CryptoRng>(degree: u32, rng: &mut R) -> Poly<F> {
    let coeffs = (0..=degree).map(|_| F::pick(rng)).collect::<Vec<_>>();
    Poly(coeffs)
}

impl<C> Poly<C> {
    /// Creates a new polynomial from the given coefficients.
    ///
    /// Returns `None` if `coeffs` is empty.
    pub fn from(coeffs: Vec<C>) -> Option<Self> {
        if coeffs.is_empty() {
            return None;
        }
        Some(Self(coeffs))
    }

    /// Returns the constant term of the polynomial.
    pub fn constant(&self) -> &C {
        &self.0[0]
    }

    /// Returns the coefficients, constant term first.
    pub fn coefficients(&self) -> &[C] {
        &self.0
    }

    /// Returns the degree of the polynomial.
    pub fn degree(&self) -> u32 {
        (self.0.len() - 1) as u32
    }

    /// Returns the number of evaluations required to reconstruct the constant term.
    pub fn required(&self) -> u32 {
        self.0.len() as u32
    }
}

impl<C: Zeroize> Zeroize for Poly<C> {
    fn zeroize(&mut self) {
        self.0.iter_mut().for_each(Zeroize::zeroize);
    }
}

impl<G: Group> Poly<G> {
    /// Commits to a scalar polynomial by multiplying each coefficient with the group's generator.
    pub fn commit(private: &Poly<G::Scalar>) -> Self {
        Self(private.0.iter().map(G::mul_base).collect())
    }
}

impl<C: Space> Poly<C> {
    /// Returns the zero polynomial.
    pub fn zero() -> Self {
        Self(vec![C::zero()])
    }

    /// Adds `other` to `self` in place, padding `self` with zeros if it has a smaller degree.
    pub fn add(&mut self, other: &Self) {
        if self.0.len() < other.0.len() {
            self.0.resize(other.0.len(), C::zero());
        }
        self.0.iter_mut().zip(&other.0).for_each(|(a, b)| *a += b);
    }

    /// Evaluates the polynomial at `x = index`.
    ///
    /// Index `0` would return the constant term (the secret), so shares are indexed from 1.
    pub fn evaluate(&self, index: u32) -> Eval<C> {
        let x = C::Scalar::from_i64(index as i64);

        // Horner's method
        let value = self.0.iter().rev().fold(C::zero(), |mut sum, coeff| {
            sum *= &x;
            sum += coeff;
            sum
        });
        Eval { index, value }
    }

    /// Recovers the constant term of a polynomial of degree less than `t` from at least `t`
    /// evaluations.
    ///
    /// Evaluations are sorted by index and the first `t` are used, so two invocations with the
    /// same inputs (in any order) select the same evaluations. A threshold of zero is rejected
    /// with [Error::InvalidThreshold].
    pub fn recover<'a, I>(t: u32, evals: I) -> Result<C, Error>
    where
        C: 'a,
        I: IntoIterator<Item = &'a Eval<C>>,
    {
        if t == 0 {
            return Err(Error::InvalidThreshold(t));
        }
        let mut evals = evals.into_iter().collect::<Vec<_>>();
        if evals.len() < t as usize {
            return Err(Error::InsufficientShares {
                received: evals.len(),
                required: t,
                rejected: Vec::new(),
            });
        }
        evals.sort_by_key(|e| e.index);
        evals.truncate(t as usize);

        let indices = evals.iter().map(|e| e.index).collect::<Vec<_>>();
        let weights = compute_weights::<C::Scalar>(&indices)?;
        recover_with_weights(&weights, evals)
    }
}
