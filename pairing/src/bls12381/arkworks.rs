//! BLS12-381 over [arkworks](https://github.com/arkworks-rs/algebra).
//!
//! Points are kept in projective form and converted to affine only to encode or pair. Encoding
//! is done here (rather than with `ark-serialize`) so that flag handling and error reporting
//! match [super::blst] exactly.

use super::{
    flags, inspect, masked, Compressed, DST_G1, DST_G2, FIELD_LENGTH, G1_LENGTH, G2_LENGTH,
    GT_LENGTH, SCALAR_LENGTH,
};
use crate::{
    algebra::{
        Additive, Field, Group, HashToGroup, Multiplicative, Object, PrimeOrder, Space,
        SubgroupCheck, PICK_BYTES,
    },
    codec::{ByteOrder, Error, Marshal},
    suite::Suite,
};
use ark_bls12_381::{
    g1, g2, Bls12_381, Fq, Fq12, Fq2, Fq6, Fr, G1Affine, G1Projective, G2Affine, G2Projective,
};
use ark_ec::{
    hashing::{curve_maps::wb::WBMap, map_to_curve_hasher::MapToCurveBasedHasher, HashToCurve},
    pairing::{Pairing, PairingOutput},
    AffineRepr, CurveGroup, PrimeGroup,
};
use ark_ff::{
    field_hashers::DefaultFieldHasher, BigInt, BigInteger, Field as ArkField, One, PrimeField,
    Zero,
};
use bytes::{Buf, BufMut};
use commonware_codec::{Error as CodecError, FixedSize, Read, ReadExt, Write};
use sha2::Sha256;
use std::{
    ops::{AddAssign, MulAssign, Neg, SubAssign},
    sync::OnceLock,
};
use zeroize::Zeroize;

/// BLS12-381 backed by arkworks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Arkworks;

/// An element of the BLS12-381 scalar field.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Scalar(Fr);

/// A point in G1.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct G1(G1Projective);

/// A point in G2.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct G2(G2Projective);

/// An element of the target group GT, written additively.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Gt(PairingOutput<Bls12_381>);

type G1Hasher =
    MapToCurveBasedHasher<G1Projective, DefaultFieldHasher<Sha256, 128>, WBMap<g1::Config>>;
type G2Hasher =
    MapToCurveBasedHasher<G2Projective, DefaultFieldHasher<Sha256, 128>, WBMap<g2::Config>>;

/// Reads a big-endian integer into little-endian limbs.
fn read_bigint<const N: usize>(bytes: &[u8]) -> BigInt<N> {
    let mut limbs = [0u64; N];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.rchunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *limb = u64::from_be_bytes(word);
    }
    BigInt(limbs)
}

/// Parses a canonical base-field element.
fn read_fq(bytes: &[u8]) -> Result<Fq, Error> {
    Fq::from_bigint(read_bigint::<6>(bytes)).ok_or(Error::NonCanonical)
}

/// Encodes a base-field element as 48 big-endian bytes.
fn write_fq(fq: &Fq, out: &mut [u8]) {
    out.copy_from_slice(&fq.into_bigint().to_bytes_be());
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Object for Scalar {}

impl AddAssign<&Scalar> for Scalar {
    fn add_assign(&mut self, rhs: &Scalar) {
        self.0 += rhs.0;
    }
}

impl SubAssign<&Scalar> for Scalar {
    fn sub_assign(&mut self, rhs: &Scalar) {
        self.0 -= rhs.0;
    }
}

impl MulAssign<&Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: &Scalar) {
        self.0 *= rhs.0;
    }
}

impl Neg for Scalar {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl_binops!(Scalar, Scalar);

impl Additive for Scalar {
    fn zero() -> Self {
        Self(Fr::zero())
    }
}

impl Multiplicative for Scalar {}

impl Space for Scalar {
    type Scalar = Scalar;
}

impl Field for Scalar {
    fn one() -> Self {
        Self(Fr::one())
    }

    fn from_i64(n: i64) -> Self {
        let magnitude = Fr::from(n.unsigned_abs());
        if n < 0 {
            Self(-magnitude)
        } else {
            Self(magnitude)
        }
    }

    fn from_bytes_wide(bytes: &[u8; PICK_BYTES]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }

    fn inverse(&self) -> Option<Self> {
        ArkField::inverse(&self.0).map(Self)
    }
}

impl Write for Scalar {
    fn write(&self, buf: &mut impl BufMut) {
        let mut bytes = self.0.into_bigint().to_bytes_be();
        buf.put_slice(&bytes);
        bytes.zeroize();
    }
}

impl Read for Scalar {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let bytes = <[u8; SCALAR_LENGTH]>::read(buf)?;
        Fr::from_bigint(read_bigint::<4>(&bytes))
            .map(Self)
            .ok_or_else(|| Error::NonCanonical.wrap("arkworks::Scalar"))
    }
}

impl FixedSize for Scalar {
    const SIZE: usize = SCALAR_LENGTH;
}

impl Marshal for Scalar {
    const BYTE_ORDER: ByteOrder = ByteOrder::BigEndian;
}

impl G1 {
    fn from_compressed(bytes: &[u8; G1_LENGTH]) -> Result<Self, Error> {
        let sign = match inspect(bytes)? {
            Compressed::Infinity => return Ok(Self::zero()),
            Compressed::Point { sign } => sign,
        };
        let x = read_fq(&masked(bytes))?;
        let point = G1Affine::get_point_from_x_unchecked(x, sign).ok_or(Error::NotOnCurve)?;
        Ok(Self(point.into_group()))
    }
}

impl Object for G1 {}

impl AddAssign<&G1> for G1 {
    fn add_assign(&mut self, rhs: &G1) {
        self.0 += &rhs.0;
    }
}

impl SubAssign<&G1> for G1 {
    fn sub_assign(&mut self, rhs: &G1) {
        self.0 -= &rhs.0;
    }
}

impl MulAssign<&Scalar> for G1 {
    fn mul_assign(&mut self, rhs: &Scalar) {
        self.0 *= rhs.0;
    }
}

impl Neg for G1 {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl_binops!(G1, Scalar);
impl_fmt!(G1);

impl Additive for G1 {
    fn zero() -> Self {
        Self(G1Projective::zero())
    }
}

impl Space for G1 {
    type Scalar = Scalar;
}

impl Group for G1 {
    fn generator() -> Self {
        Self(G1Projective::generator())
    }
}

impl PrimeOrder for G1 {}

impl HashToGroup for G1 {
    fn hash_to_group(dst: &[u8], message: &[u8]) -> Self {
        // `new` only checks the isogeny parameters of `g1::Config` and `hash` only fails
        // through the map, so neither depends on `dst` or `message`.
        let hasher = G1Hasher::new(dst).expect("WB map parameters are valid for BLS12-381 G1");
        let point = hasher
            .hash(message)
            .expect("WB map is total on BLS12-381 G1");
        Self(point.into_group())
    }
}

impl SubgroupCheck for G1 {
    fn is_in_correct_group(&self) -> bool {
        self.0.into_affine().is_in_correct_subgroup_assuming_on_curve()
    }

    fn unmarshal_unchecked(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; G1_LENGTH] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: G1_LENGTH,
            found: bytes.len(),
        })?;
        Self::from_compressed(bytes)
    }
}

impl Write for G1 {
    fn write(&self, buf: &mut impl BufMut) {
        let affine = self.0.into_affine();
        let mut bytes = [0u8; G1_LENGTH];
        let infinity = affine.infinity;
        if !infinity {
            write_fq(&affine.x, &mut bytes);
        }
        bytes[0] |= flags(infinity, !infinity && affine.y > -affine.y);
        buf.put_slice(&bytes);
    }
}

impl Read for G1 {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let bytes = <[u8; G1_LENGTH]>::read(buf)?;
        let point = Self::from_compressed(&bytes).map_err(|err| err.wrap("arkworks::G1"))?;
        if !point.is_in_correct_group() {
            return Err(Error::NotInSubgroup.wrap("arkworks::G1"));
        }
        Ok(point)
    }
}

impl FixedSize for G1 {
    const SIZE: usize = G1_LENGTH;
}

impl Marshal for G1 {
    const BYTE_ORDER: ByteOrder = ByteOrder::BigEndian;
}

impl G2 {
    /// Decodes `x = c0 + c1·u` from `c1 || c0`.
    fn from_compressed(bytes: &[u8; G2_LENGTH]) -> Result<Self, Error> {
        let sign = match inspect(bytes)? {
            Compressed::Infinity => return Ok(Self::zero()),
            Compressed::Point { sign } => sign,
        };
        let c1 = read_fq(&masked(bytes))?;
        let c0 = read_fq(&bytes[FIELD_LENGTH..])?;
        let point = G2Affine::get_point_from_x_unchecked(Fq2::new(c0, c1), sign)
            .ok_or(Error::NotOnCurve)?;
        Ok(Self(point.into_group()))
    }
}

impl Object for G2 {}

impl AddAssign<&G2> for G2 {
    fn add_assign(&mut self, rhs: &G2) {
        self.0 += &rhs.0;
    }
}

impl SubAssign<&G2> for G2 {
    fn sub_assign(&mut self, rhs: &G2) {
        self.0 -= &rhs.0;
    }
}

impl MulAssign<&Scalar> for G2 {
    fn mul_assign(&mut self, rhs: &Scalar) {
        self.0 *= rhs.0;
    }
}

impl Neg for G2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl_binops!(G2, Scalar);
impl_fmt!(G2);

impl Additive for G2 {
    fn zero() -> Self {
        Self(G2Projective::zero())
    }
}

impl Space for G2 {
    type Scalar = Scalar;
}

impl Group for G2 {
    fn generator() -> Self {
        Self(G2Projective::generator())
    }
}

impl PrimeOrder for G2 {}

impl HashToGroup for G2 {
    fn hash_to_group(dst: &[u8], message: &[u8]) -> Self {
        // `new` only checks the isogeny parameters of `g2::Config` and `hash` only fails
        // through the map, so neither depends on `dst` or `message`.
        let hasher = G2Hasher::new(dst).expect("WB map parameters are valid for BLS12-381 G2");
        let point = hasher
            .hash(message)
            .expect("WB map is total on BLS12-381 G2");
        Self(point.into_group())
    }
}

impl SubgroupCheck for G2 {
    fn is_in_correct_group(&self) -> bool {
        self.0.into_affine().is_in_correct_subgroup_assuming_on_curve()
    }

    fn unmarshal_unchecked(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; G2_LENGTH] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: G2_LENGTH,
            found: bytes.len(),
        })?;
        Self::from_compressed(bytes)
    }
}

impl Write for G2 {
    fn write(&self, buf: &mut impl BufMut) {
        let affine = self.0.into_affine();
        let mut bytes = [0u8; G2_LENGTH];
        let infinity = affine.infinity;
        if !infinity {
            write_fq(&affine.x.c1, &mut bytes[..FIELD_LENGTH]);
            write_fq(&affine.x.c0, &mut bytes[FIELD_LENGTH..]);
        }
        bytes[0] |= flags(infinity, !infinity && affine.y > -affine.y);
        buf.put_slice(&bytes);
    }
}

impl Read for G2 {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let bytes = <[u8; G2_LENGTH]>::read(buf)?;
        let point = Self::from_compressed(&bytes).map_err(|err| err.wrap("arkworks::G2"))?;
        if !point.is_in_correct_group() {
            return Err(Error::NotInSubgroup.wrap("arkworks::G2"));
        }
        Ok(point)
    }
}

impl FixedSize for G2 {
    const SIZE: usize = G2_LENGTH;
}

impl Marshal for G2 {
    const BYTE_ORDER: ByteOrder = ByteOrder::BigEndian;
}

impl Gt {
    /// Returns the twelve base-field coefficients in encoding order.
    fn coefficients(&self) -> [&Fq; 12] {
        let f = &self.0 .0;
        let mut out = [&f.c0.c0.c0; 12];
        for (i, fp6) in [&f.c0, &f.c1].into_iter().enumerate() {
            for (j, fp2) in [&fp6.c0, &fp6.c1, &fp6.c2].into_iter().enumerate() {
                out[6 * i + 2 * j] = &fp2.c0;
                out[6 * i + 2 * j + 1] = &fp2.c1;
            }
        }
        out
    }

    fn from_coefficients(bytes: &[u8; GT_LENGTH]) -> Result<Self, Error> {
        let mut fq = [Fq::zero(); 12];
        for (c, chunk) in fq.iter_mut().zip(bytes.chunks_exact(FIELD_LENGTH)) {
            *c = read_fq(chunk)?;
        }
        let fp6 = |k: usize| {
            Fq6::new(
                Fq2::new(fq[k], fq[k + 1]),
                Fq2::new(fq[k + 2], fq[k + 3]),
                Fq2::new(fq[k + 4], fq[k + 5]),
            )
        };
        Ok(Self(PairingOutput(Fq12::new(fp6(0), fp6(6)))))
    }
}

impl Object for Gt {}

impl AddAssign<&Gt> for Gt {
    fn add_assign(&mut self, rhs: &Gt) {
        self.0 += &rhs.0;
    }
}

impl SubAssign<&Gt> for Gt {
    fn sub_assign(&mut self, rhs: &Gt) {
        self.0 -= &rhs.0;
    }
}

impl MulAssign<&Scalar> for Gt {
    fn mul_assign(&mut self, rhs: &Scalar) {
        self.0 *= rhs.0;
    }
}

impl Neg for Gt {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl_binops!(Gt, Scalar);
impl_fmt!(Gt);

impl Additive for Gt {
    fn zero() -> Self {
        Self(PairingOutput::zero())
    }
}

impl Space for Gt {
    type Scalar = Scalar;
}

impl Group for Gt {
    fn generator() -> Self {
        static GENERATOR: OnceLock<Gt> = OnceLock::new();
        *GENERATOR.get_or_init(|| Self(PairingOutput::generator()))
    }
}

impl PrimeOrder for Gt {}

impl SubgroupCheck for Gt {
    fn is_in_correct_group(&self) -> bool {
        self.0 .0.pow(Fr::MODULUS) == Fq12::one()
    }

    fn unmarshal_unchecked(bytes: &[u8]) -> Result<Self, Error> {
        let bytes: &[u8; GT_LENGTH] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: GT_LENGTH,
            found: bytes.len(),
        })?;
        Self::from_coefficients(bytes)
    }
}

impl Write for Gt {
    fn write(&self, buf: &mut impl BufMut) {
        let mut bytes = [0u8; FIELD_LENGTH];
        for fq in self.coefficients() {
            write_fq(fq, &mut bytes);
            buf.put_slice(&bytes);
        }
    }
}

impl Read for Gt {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let bytes = <[u8; GT_LENGTH]>::read(buf)?;
        let element = Self::from_coefficients(&bytes).map_err(|err| err.wrap("arkworks::Gt"))?;
        if !element.is_in_correct_group() {
            return Err(Error::NotInSubgroup.wrap("arkworks::Gt"));
        }
        Ok(element)
    }
}

impl FixedSize for Gt {
    const SIZE: usize = GT_LENGTH;
}

impl Marshal for Gt {
    const BYTE_ORDER: ByteOrder = ByteOrder::BigEndian;
}

impl Suite for Arkworks {
    type Scalar = Scalar;
    type G1 = G1;
    type G2 = G2;
    type Gt = Gt;

    const NAME: &'static str = "BLS12-381/arkworks";
    const DST_G1: &'static [u8] = DST_G1;
    const DST_G2: &'static [u8] = DST_G2;

    fn pair(&self, p: &G1, q: &G2) -> Gt {
        Gt(Bls12_381::pairing(p.0, q.0))
    }

    /// Checks `e(a1,a2) == e(b1,b2)` as `e(a1,a2) * e(-b1,b2) == 1` with one multi-Miller loop
    /// and one final exponentiation.
    fn validate_pairing(&self, a1: &G1, a2: &G2, b1: &G1, b2: &G2) -> bool {
        Bls12_381::multi_pairing([a1.0, -b1.0], [a2.0, b2.0]).is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bls12381::tests::{infinity, G1_GENERATOR, G2_GENERATOR, MODULUS};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_generator_encoding() {
        assert_eq!(G1::generator().to_string(), G1_GENERATOR);
        assert_eq!(G2::generator().to_string(), G2_GENERATOR);
        assert_eq!(G1::zero().marshal_binary(), infinity(G1_LENGTH));
        assert_eq!(G2::zero().marshal_binary(), infinity(G2_LENGTH));
    }

    #[test]
    fn test_read_bigint() {
        let mut bytes = [0u8; SCALAR_LENGTH];
        bytes[SCALAR_LENGTH - 1] = 2;
        bytes[0] = 1;
        let value = read_bigint::<4>(&bytes);
        assert_eq!(value.0, [2, 0, 0, 1 << 56]);
    }

    #[test]
    fn test_x_not_canonical() {
        let mut bytes = hex::decode(MODULUS).unwrap();
        bytes[0] |= 0x80;
        assert_eq!(G1::unmarshal_binary(&bytes), Err(Error::NonCanonical));
    }

    #[test]
    fn test_gt_codec() {
        let mut rng = StdRng::seed_from_u64(1);
        let element = Gt::pick(&mut rng);
        let bytes = element.marshal_binary();
        assert_eq!(Gt::unmarshal_binary(&bytes).unwrap(), element);

        let mut two = vec![0u8; GT_LENGTH];
        two[FIELD_LENGTH - 1] = 2;
        assert_eq!(Gt::unmarshal_binary(&two), Err(Error::NotInSubgroup));
    }

    #[test]
    fn test_hash_to_group_matches_blst() {
        use crate::bls12381::blst;

        let message = b"message";
        for dst in [DST_G1, DST_G2, b"QUUX-V01-CS02-with-BLS12381".as_slice()] {
            assert_eq!(
                G1::hash_to_group(dst, message).marshal_binary(),
                blst::G1::hash_to_group(dst, message).marshal_binary()
            );
            assert_eq!(
                G2::hash_to_group(dst, message).marshal_binary(),
                blst::G2::hash_to_group(dst, message).marshal_binary()
            );
        }
    }

    #[test]
    fn test_negation_flips_sign() {
        let g = G1::generator().marshal_binary();
        let neg = (-G1::generator()).marshal_binary();
        assert_eq!(g[0] ^ neg[0], 0x20);
        assert_eq!(g[1..], neg[1..]);
    }
}
