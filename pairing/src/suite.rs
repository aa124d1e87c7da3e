//! A named bundle of the scalar field, the three pairing groups, and the pairing itself.
//!
//! Two suites for the same curve are interchangeable: they agree on group orders, element sizes,
//! and the byte encoding of every value. [crate::conformance] checks this.

use crate::{
    algebra::{Field, Group, HashToGroup, PrimeOrder, Space, SubgroupCheck},
    stream::Stream,
};
use std::fmt::Debug;

/// A pairing-friendly curve implementation.
///
/// Suites are stateless and may be shared across any number of threads.
pub trait Suite: Clone + Copy + Debug + Default + Send + Sync + 'static {
    /// The scalar field of order `r`.
    type Scalar: Field + Space<Scalar = Self::Scalar>;

    /// The first source group.
    type G1: Group<Scalar = Self::Scalar> + SubgroupCheck + HashToGroup + PrimeOrder;

    /// The second source group.
    type G2: Group<Scalar = Self::Scalar> + SubgroupCheck + HashToGroup + PrimeOrder;

    /// The target group, written additively.
    type Gt: Group<Scalar = Self::Scalar> + SubgroupCheck + PrimeOrder;

    /// Name of the suite.
    const NAME: &'static str;

    /// Domain separation tag for hashing messages to G1.
    const DST_G1: &'static [u8];

    /// Domain separation tag for hashing messages to G2.
    const DST_G2: &'static [u8];

    /// Computes the pairing `e(p, q)`.
    fn pair(&self, p: &Self::G1, q: &Self::G2) -> Self::Gt;

    /// Returns true if `e(a1, a2) == e(b1, b2)`.
    ///
    /// Implementations compute a single multi-pairing `e(a1, a2) · e(-b1, b2)` followed by one
    /// final exponentiation.
    fn validate_pairing(&self, a1: &Self::G1, a2: &Self::G2, b1: &Self::G1, b2: &Self::G2)
        -> bool;

    /// Returns a stream seeded from operating-system entropy.
    fn random_stream(&self) -> Stream {
        Stream::from_entropy()
    }

    /// Returns the name of the suite.
    fn name(&self) -> &'static str {
        Self::NAME
    }
}
