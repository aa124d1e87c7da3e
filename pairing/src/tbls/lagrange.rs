//! Lagrange interpolation at `x = 0`.
//!
//! Weights depend only on the set of indices being interpolated, so they can be computed once and
//! reused to recover several values that share the same signers.

use super::poly::Eval;
use crate::{
    algebra::{Field, Space},
    Error,
};
use std::collections::BTreeMap;

/// The Lagrange basis polynomial of one index evaluated at `x = 0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Weight<F>(F);

impl<F: Field> Weight<F> {
    /// Returns the weight as a scalar.
    pub fn as_scalar(&self) -> &F {
        &self.0
    }
}

/// Computes the weight of every index in `indices`.
///
/// Each index `i` is interpolated at `x = i`, so index `0` (the secret itself) is rejected with
/// [Error::InvalidIndex] and repeated indices with [Error::DuplicateIndex].
pub fn compute_weights<F: Field>(indices: &[u32]) -> Result<BTreeMap<u32, Weight<F>>, Error> {
    let mut xs = BTreeMap::new();
    for &index in indices {
        if index == 0 {
            return Err(Error::InvalidIndex(index));
        }
        if xs.insert(index, F::from_i64(index as i64)).is_some() {
            return Err(Error::DuplicateIndex(index));
        }
    }

    let mut weights = BTreeMap::new();
    for (&i, xi) in &xs {
        // l_i(0) = prod_{j != i} x_j / (x_j - x_i)
        let (mut num, mut den) = (F::one(), F::one());
        for (&j, xj) in &xs {
            if i == j {
                continue;
            }
            num *= xj;
            den *= &(xj.clone() - xi);
        }
        let inv = den.inverse().ok_or(Error::NoInverse)?;
        weights.insert(i, Weight(num * &inv));
    }
    Ok(weights)
}

/// Interpolates the value at `x = 0` from `evals` using precomputed `weights`.
///
/// Every evaluation must have a weight. Evaluations are scaled and summed directly, so for group
/// elements the interpolation happens in the exponent.
pub fn recover_with_weights<'a, C, I>(
    weights: &BTreeMap<u32, Weight<C::Scalar>>,
    evals: I,
) -> Result<C, Error>
where
    C: Space + 'a,
    I: IntoIterator<Item = &'a Eval<C>>,
{
    let mut result = C::zero();
    for eval in evals {
        let weight = weights
            .get(&eval.index)
            .ok_or(Error::InvalidIndex(eval.index))?;
        result += &(eval.value.clone() * weight.as_scalar());
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bls12381::{arkworks, blst};

    fn weights_sum_to_one<F: Field>() {
        // Interpolating the constant polynomial 1 yields 1
        let weights = compute_weights::<F>(&[1, 3, 4, 9]).unwrap();
        assert_eq!(weights.len(), 4);
        let sum = weights
            .values()
            .fold(F::zero(), |acc, w| acc + w.as_scalar());
        assert_eq!(sum, F::one());
    }

    #[test]
    fn test_weights_sum_to_one() {
        weights_sum_to_one::<blst::Scalar>();
        weights_sum_to_one::<arkworks::Scalar>();
    }

    fn two_points<F: Field>() {
        // Line through (1, 1) and (2, 2) passes through the origin:
        // l_1(0) = 2 / (2 - 1) = 2, l_2(0) = 1 / (1 - 2) = -1
        let weights = compute_weights::<F>(&[2, 1]).unwrap();
        assert_eq!(weights[&1].as_scalar(), &F::from_i64(2));
        assert_eq!(weights[&2].as_scalar(), &F::from_i64(-1));
    }

    #[test]
    fn test_two_points() {
        two_points::<blst::Scalar>();
        two_points::<arkworks::Scalar>();
    }

    #[test]
    fn test_rejected_indices() {
        assert!(matches!(
            compute_weights::<blst::Scalar>(&[1, 0, 2]),
            Err(Error::InvalidIndex(0))
        ));
        assert!(matches!(
            compute_weights::<arkworks::Scalar>(&[1, 2, 1]),
            Err(Error::DuplicateIndex(1))
        ));
    }

    #[test]
    fn test_missing_weight() {
        let weights = compute_weights::<blst::Scalar>(&[1, 2]).unwrap();
        let evals = [Eval {
            index: 3,
            value: blst::Scalar::from_i64(5),
        }];
        assert!(matches!(
            recover_with_weights(&weights, &evals),
            Err(Error::InvalidIndex(3))
        ));
    }
}
