//! Traits for the scalar field and the groups of a pairing-friendly curve.
//!
//! These traits lean on the operators in [`std::ops`] so that the familiar `+`, `+=`, `*`, etc.
//! can be used. Binary operators take their right-hand side by reference so that "heavy" values
//! (points in G2 or GT) are not copied unnecessarily:
//!
//! ```
//! # use commonware_pairing::algebra::Additive;
//! fn example<T: Additive>(mut x: T, y: T) {
//!     x += &y;
//!     let _ = x.clone() + &y;
//!     x -= &y;
//!     let _ = x.clone() - &y;
//!     let _ = -x;
//! }
//! ```
//!
//! Every mutating operator (`+=`, `-=`, `*=`) has a non-mutating counterpart (`+`, `-`, `*`) that
//! consumes a clone of the receiver.
//!
//! Beyond the core [Field] and [Group] roles, optional capabilities are expressed as narrow traits
//! ([SubgroupCheck], [PrimeOrder], [HashToGroup]) that generic code requires explicitly.

use crate::{
    codec::{self, Marshal},
    Error,
};
use rand::{CryptoRng, RngCore};
use std::{
    fmt::{Debug, Display},
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use zeroize::Zeroize;

/// Number of random bytes consumed when sampling a scalar.
///
/// Reducing 512 bits modulo a 255-bit prime leaves a statistically negligible bias.
pub const PICK_BYTES: usize = 64;

/// A basic trait we expect algebraic values to implement: clonable, comparable, and
/// shareable across threads.
pub trait Object: Clone + PartialEq + Eq + Debug + Send + Sync {}

/// A type that supports addition, subtraction, and negation.
pub trait Additive:
    Object
    + for<'a> AddAssign<&'a Self>
    + for<'a> Add<&'a Self, Output = Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + Neg<Output = Self>
{
    /// The neutral element for addition.
    fn zero() -> Self;

    /// Returns true if `self` is the neutral element.
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// A type that supports multiplication.
pub trait Multiplicative:
    Object + for<'a> MulAssign<&'a Self> + for<'a> Mul<&'a Self, Output = Self>
{
}

/// An [Additive] type that can be scaled by elements of a [Field].
///
/// Mathematically, this is a (right) module over [Space::Scalar]. Both the scalar field itself
/// and every group of a suite implement it, which lets polynomials and interpolation be written
/// once for secret scalars and for group elements.
pub trait Space:
    Additive
    + for<'a> MulAssign<&'a <Self as Space>::Scalar>
    + for<'a> Mul<&'a <Self as Space>::Scalar, Output = Self>
{
    /// The field of scalars.
    type Scalar: Field;
}

/// The prime field of scalars (integers modulo the group order `r`).
pub trait Field: Additive + Multiplicative + Marshal + Zeroize {
    /// The multiplicative identity.
    fn one() -> Self;

    /// Returns the field element congruent to `n`.
    fn from_i64(n: i64) -> Self;

    /// Reduces a big-endian integer of [PICK_BYTES] bytes modulo the field order.
    fn from_bytes_wide(bytes: &[u8; PICK_BYTES]) -> Self;

    /// Returns the multiplicative inverse, or `None` for zero.
    fn inverse(&self) -> Option<Self>;

    /// Samples a uniformly random non-zero element.
    fn pick<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; PICK_BYTES];
        loop {
            rng.fill_bytes(&mut bytes);
            let mut candidate = Self::from_bytes_wide(&bytes);
            if !candidate.is_zero() {
                bytes.zeroize();
                return candidate;
            }
            candidate.zeroize();
        }
    }

    /// Returns `self / rhs`, or `None` if `rhs` is zero.
    fn div(&self, rhs: &Self) -> Option<Self> {
        Some(self.clone() * &rhs.inverse()?)
    }
}

/// A prime-order group written additively.
///
/// The target group GT is also written additively: `+` is the underlying field multiplication and
/// scaling by a scalar is exponentiation.
pub trait Group: Space + Marshal + Display {
    /// Returns the fixed generator of the group.
    fn generator() -> Self;

    /// Returns `scalar · generator`.
    fn mul_base(scalar: &Self::Scalar) -> Self {
        Self::generator() * scalar
    }

    /// Samples a pseudo-random element as `s · generator` for a freshly picked scalar `s`.
    fn pick<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut scalar = Self::Scalar::pick(rng);
        let point = Self::mul_base(&scalar);
        scalar.zeroize();
        point
    }
}

/// A group into which arbitrary messages can be hashed.
pub trait HashToGroup: Group {
    /// Hashes `message` to the group under the domain separation tag `dst`.
    fn hash_to_group(dst: &[u8], message: &[u8]) -> Self;
}

/// A group whose elements can be tested for membership in the prime-order subgroup.
///
/// # Warning
///
/// Points built with [SubgroupCheck::unmarshal_unchecked] must be checked with
/// [SubgroupCheck::is_in_correct_group] before use in a pairing.
pub trait SubgroupCheck: Group {
    /// Returns true if `self` lies in the prime-order subgroup.
    fn is_in_correct_group(&self) -> bool;

    /// Decodes a point, performing every check of [Marshal::unmarshal_binary] except the
    /// subgroup check.
    fn unmarshal_unchecked(bytes: &[u8]) -> Result<Self, codec::Error>;
}

/// Reports whether a group has prime order.
///
/// Groups are prime-order unless an implementation overrides [PrimeOrder::is_prime_order].
pub trait PrimeOrder {
    fn is_prime_order() -> bool {
        true
    }
}

/// Inverts `scalar` for use in the group `G`.
///
/// Fails with [Error::Domain] if `G` is not prime-order and with [Error::NoInverse] if `scalar`
/// is zero.
pub fn invert<G: Space + PrimeOrder>(scalar: &G::Scalar) -> Result<G::Scalar, Error> {
    if !G::is_prime_order() {
        return Err(Error::Domain("scalar inversion"));
    }
    scalar.inverse().ok_or(Error::NoInverse)
}

/// Divides `a` by `b` for use in the group `G` (see [invert]).
pub fn divide<G: Space + PrimeOrder>(a: &G::Scalar, b: &G::Scalar) -> Result<G::Scalar, Error> {
    Ok(a.clone() * &invert::<G>(b)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bls12381::{arkworks, blst};
    use rand::{rngs::StdRng, SeedableRng};

    struct Unannotated;

    impl PrimeOrder for Unannotated {}

    /// Stands in for a group whose order is not prime (such as a product of groups).
    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Composite(blst::Scalar);

    impl Object for Composite {}

    impl<'a> AddAssign<&'a Self> for Composite {
        fn add_assign(&mut self, rhs: &'a Self) {
            self.0 += &rhs.0;
        }
    }

    impl<'a> Add<&'a Self> for Composite {
        type Output = Self;

        fn add(mut self, rhs: &'a Self) -> Self {
            self += rhs;
            self
        }
    }

    impl<'a> SubAssign<&'a Self> for Composite {
        fn sub_assign(&mut self, rhs: &'a Self) {
            self.0 -= &rhs.0;
        }
    }

    impl<'a> Sub<&'a Self> for Composite {
        type Output = Self;

        fn sub(mut self, rhs: &'a Self) -> Self {
            self -= rhs;
            self
        }
    }

    impl Neg for Composite {
        type Output = Self;

        fn neg(self) -> Self {
            Self(-self.0)
        }
    }

    impl<'a> MulAssign<&'a blst::Scalar> for Composite {
        fn mul_assign(&mut self, rhs: &'a blst::Scalar) {
            self.0 *= rhs;
        }
    }

    impl<'a> Mul<&'a blst::Scalar> for Composite {
        type Output = Self;

        fn mul(mut self, rhs: &'a blst::Scalar) -> Self {
            self *= rhs;
            self
        }
    }

    impl Additive for Composite {
        fn zero() -> Self {
            Self(blst::Scalar::zero())
        }
    }

    impl Space for Composite {
        type Scalar = blst::Scalar;
    }

    impl PrimeOrder for Composite {
        fn is_prime_order() -> bool {
            false
        }
    }

    fn field_identities<F: Field>() {
        let mut rng = StdRng::seed_from_u64(0);
        let a = F::pick(&mut rng);
        let b = F::pick(&mut rng);
        assert_ne!(a, b);

        assert_eq!(a.clone() + &F::zero(), a);
        assert_eq!(a.clone() * &F::one(), a);
        assert_eq!(a.clone() - &a, F::zero());
        assert_eq!(-a.clone() + &a, F::zero());
        assert_eq!(a.clone() * &a.inverse().unwrap(), F::one());
        assert_eq!(a.div(&b).unwrap() * &b, a);
        assert!(F::zero().inverse().is_none());
        assert!(a.div(&F::zero()).is_none());

        assert_eq!(F::from_i64(2), F::one() + &F::one());
        assert_eq!(F::from_i64(-1), -F::one());
        assert_eq!(F::from_i64(0), F::zero());
        assert_eq!(F::from_i64(i64::MIN) + &F::from_i64(i64::MAX), -F::one());

        let mut c = a.clone();
        c += &b;
        assert_eq!(c, a.clone() + &b);
        c -= &b;
        assert_eq!(c, a);
        c *= &b;
        assert_eq!(c, a.clone() * &b);
    }

    #[test]
    fn test_field_identities() {
        field_identities::<blst::Scalar>();
        field_identities::<arkworks::Scalar>();
    }

    fn domain<G: Space + PrimeOrder>() {
        let two = G::Scalar::from_i64(2);
        let half = invert::<G>(&two).unwrap();
        assert_eq!(two.clone() * &half, G::Scalar::one());
        assert_eq!(divide::<G>(&two, &two).unwrap(), G::Scalar::one());
        assert!(matches!(
            invert::<G>(&G::Scalar::zero()),
            Err(Error::NoInverse)
        ));
    }

    #[test]
    fn test_domain() {
        domain::<blst::G1>();
        domain::<arkworks::G2>();
    }

    #[test]
    fn test_domain_not_prime_order() {
        let two = blst::Scalar::from_i64(2);
        assert!(matches!(
            invert::<Composite>(&two),
            Err(Error::Domain("scalar inversion"))
        ));
        assert!(matches!(
            divide::<Composite>(&two, &two),
            Err(Error::Domain(_))
        ));

        // The group operations themselves are unaffected
        let x = Composite(two.clone());
        assert_eq!(x.clone() - &x, Composite::zero());
        assert_eq!(Composite::zero() * &two, Composite::zero());
        assert!(!Composite::is_prime_order());
    }

    #[test]
    fn test_default_prime_order() {
        assert!(Unannotated::is_prime_order());
        assert!(<blst::Gt as PrimeOrder>::is_prime_order());
    }
}
