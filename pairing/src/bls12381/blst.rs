//! BLS12-381 over [blst](https://github.com/supranational/blst).
//!
//! # Acknowledgements
//!
//! * <https://github.com/filecoin-project/blstrs> + <https://github.com/MystenLabs/fastcrypto>: Implementing operations over
//!   the BLS12-381 scalar field with <https://github.com/supranational/blst>.

use super::{
    inspect, Compressed, DST_G1, DST_G2, FIELD_LENGTH, G1_LENGTH, G2_LENGTH, GT_LENGTH,
    SCALAR_LENGTH,
};
use crate::{
    algebra::{
        Additive, Field, Group, HashToGroup, Multiplicative, Object, PrimeOrder, Space,
        SubgroupCheck, PICK_BYTES,
    },
    codec::{ByteOrder, Error, Marshal},
    suite::Suite,
};
use blst::{
    blst_bendian_from_fp, blst_bendian_from_scalar, blst_final_exp, blst_fp, blst_fp12,
    blst_fp12_in_group, blst_fp12_inverse, blst_fp12_is_equal, blst_fp12_mul, blst_fp12_one,
    blst_fp12_sqr, blst_fp_from_bendian, blst_fr, blst_fr_add, blst_fr_cneg, blst_fr_from_scalar,
    blst_fr_from_uint64, blst_fr_inverse, blst_fr_mul, blst_fr_sub, blst_hash_to_g1,
    blst_hash_to_g2, blst_miller_loop, blst_p1, blst_p1_add_or_double, blst_p1_affine,
    blst_p1_cneg, blst_p1_compress, blst_p1_from_affine, blst_p1_in_g1, blst_p1_is_equal,
    blst_p1_is_inf, blst_p1_mult, blst_p1_to_affine, blst_p1_uncompress, blst_p2,
    blst_p2_add_or_double, blst_p2_affine, blst_p2_cneg, blst_p2_compress, blst_p2_from_affine,
    blst_p2_in_g2, blst_p2_is_equal, blst_p2_is_inf, blst_p2_mult, blst_p2_to_affine,
    blst_p2_uncompress, blst_scalar, blst_scalar_fr_check, blst_scalar_from_be_bytes,
    blst_scalar_from_bendian, blst_scalar_from_fr, Pairing, BLS12_381_G1, BLS12_381_G2,
    BLST_ERROR,
};
use bytes::{Buf, BufMut};
use commonware_codec::{Error as CodecError, FixedSize, Read, ReadExt, Write};
use std::{
    ops::{AddAssign, MulAssign, Neg, SubAssign},
    ptr,
    sync::OnceLock,
};
use zeroize::Zeroize;

/// BLS12-381 backed by `blst`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Blst;

/// An element of the BLS12-381 scalar field.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(transparent)]
pub struct Scalar(blst_fr);

/// `R = 2^256 mod q` in little-endian Montgomery form which is equivalent to 1 in little-endian
/// non-Montgomery form.
///
/// mod(2^256, 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001) = 0x1824b159acc5056f998c4fefecbc4ff55884b7fa0003480200000001fffffffe
// Reference: https://github.com/filecoin-project/blstrs/blob/ffbb41d1495d84e40a712583346439924603b49a/src/scalar.rs#L77-L89
const BLST_FR_ONE: Scalar = Scalar(blst_fr {
    l: [
        0x0000_0001_ffff_fffe,
        0x5884_b7fa_0003_4802,
        0x998c_4fef_ecbc_4ff5,
        0x1824_b159_acc5_056f,
    ],
});

/// A point in G1.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct G1(blst_p1);

/// A point in G2.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct G2(blst_p2);

/// An element of the target group GT, written additively.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Gt(blst_fp12);

/// Returns the size in bits of a given blst_scalar (represented in little-endian).
fn bits(scalar: &blst_scalar) -> usize {
    let mut bits: usize = SCALAR_LENGTH * 8;
    for i in scalar.b.iter().rev() {
        let leading = i.leading_zeros();
        bits -= leading as usize;
        if leading < 8 {
            break;
        }
    }
    bits
}

/// Maps a `blst` decoding failure to a codec error.
fn decode_error(err: BLST_ERROR) -> Error {
    match err {
        BLST_ERROR::BLST_BAD_ENCODING => Error::NonCanonical,
        BLST_ERROR::BLST_POINT_NOT_IN_GROUP => Error::NotInSubgroup,
        _ => Error::NotOnCurve,
    }
}

impl Scalar {
    fn as_blst_scalar(&self) -> blst_scalar {
        let mut scalar = blst_scalar::default();
        unsafe { blst_scalar_from_fr(&mut scalar, &self.0) };
        scalar
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.l.zeroize();
    }
}

impl Object for Scalar {}

impl AddAssign<&Scalar> for Scalar {
    fn add_assign(&mut self, rhs: &Scalar) {
        unsafe { blst_fr_add(&mut self.0, &self.0, &rhs.0) };
    }
}

impl SubAssign<&Scalar> for Scalar {
    fn sub_assign(&mut self, rhs: &Scalar) {
        unsafe { blst_fr_sub(&mut self.0, &self.0, &rhs.0) };
    }
}

impl MulAssign<&Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: &Scalar) {
        unsafe { blst_fr_mul(&mut self.0, &self.0, &rhs.0) };
    }
}

impl Neg for Scalar {
    type Output = Self;

    fn neg(mut self) -> Self {
        unsafe { blst_fr_cneg(&mut self.0, &self.0, true) };
        self
    }
}

impl_binops!(Scalar, Scalar);

impl Additive for Scalar {
    fn zero() -> Self {
        Self(blst_fr::default())
    }
}

impl Multiplicative for Scalar {}

impl Space for Scalar {
    type Scalar = Scalar;
}

impl Field for Scalar {
    fn one() -> Self {
        BLST_FR_ONE
    }

    fn from_i64(n: i64) -> Self {
        // blst requires a buffer of 4 uint64 values. Failure to provide one will
        // result in unexpected behavior (will read past the provided buffer).
        //
        // Reference: https://github.com/supranational/blst/blob/415d4f0e2347a794091836a3065206edfd9c72f3/bindings/blst.h#L102
        let buffer = [n.unsigned_abs(), 0, 0, 0];
        let mut ret = blst_fr::default();
        unsafe {
            blst_fr_from_uint64(&mut ret, buffer.as_ptr());
            blst_fr_cneg(&mut ret, &ret, n < 0);
        }
        Self(ret)
    }

    fn from_bytes_wide(bytes: &[u8; PICK_BYTES]) -> Self {
        let mut ret = blst_fr::default();
        unsafe {
            let mut scalar = blst_scalar::default();
            blst_scalar_from_be_bytes(&mut scalar, bytes.as_ptr(), bytes.len());
            blst_fr_from_scalar(&mut ret, &scalar);
            scalar.b.zeroize();
        }
        Self(ret)
    }

    fn inverse(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        let mut ret = blst_fr::default();
        unsafe { blst_fr_inverse(&mut ret, &self.0) };
        Some(Self(ret))
    }
}

impl Write for Scalar {
    fn write(&self, buf: &mut impl BufMut) {
        let mut bytes = [0u8; SCALAR_LENGTH];
        let mut scalar = self.as_blst_scalar();
        unsafe { blst_bendian_from_scalar(bytes.as_mut_ptr(), &scalar) };
        buf.put_slice(&bytes);
        scalar.b.zeroize();
        bytes.zeroize();
    }
}

impl Read for Scalar {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let bytes = <[u8; SCALAR_LENGTH]>::read(buf)?;
        let mut ret = blst_fr::default();
        unsafe {
            let mut scalar = blst_scalar::default();
            blst_scalar_from_bendian(&mut scalar, bytes.as_ptr());
            if !blst_scalar_fr_check(&scalar) {
                return Err(Error::NonCanonical.wrap("blst::Scalar"));
            }
            blst_fr_from_scalar(&mut ret, &scalar);
        }
        Ok(Self(ret))
    }
}

impl FixedSize for Scalar {
    const SIZE: usize = SCALAR_LENGTH;
}

impl Marshal for Scalar {
    const BYTE_ORDER: ByteOrder = ByteOrder::BigEndian;
}

impl G1 {
    fn as_blst_p1_affine(&self) -> blst_p1_affine {
        let mut affine = blst_p1_affine::default();
        unsafe { blst_p1_to_affine(&mut affine, &self.0) };
        affine
    }

    fn from_compressed(bytes: &[u8; G1_LENGTH]) -> Result<Self, Error> {
        if inspect(bytes)? == Compressed::Infinity {
            return Ok(Self::zero());
        }
        let mut ret = blst_p1::default();
        unsafe {
            let mut affine = blst_p1_affine::default();
            match blst_p1_uncompress(&mut affine, bytes.as_ptr()) {
                BLST_ERROR::BLST_SUCCESS => {}
                err => return Err(decode_error(err)),
            }
            blst_p1_from_affine(&mut ret, &affine);
        }
        Ok(Self(ret))
    }
}

impl PartialEq for G1 {
    fn eq(&self, other: &Self) -> bool {
        unsafe { blst_p1_is_equal(&self.0, &other.0) }
    }
}

impl Eq for G1 {}

impl Object for G1 {}

impl AddAssign<&G1> for G1 {
    fn add_assign(&mut self, rhs: &G1) {
        unsafe { blst_p1_add_or_double(&mut self.0, &self.0, &rhs.0) };
    }
}

impl SubAssign<&G1> for G1 {
    fn sub_assign(&mut self, rhs: &G1) {
        *self += &(-*rhs);
    }
}

impl MulAssign<&Scalar> for G1 {
    fn mul_assign(&mut self, rhs: &Scalar) {
        let scalar = rhs.as_blst_scalar();
        let nbits = bits(&scalar);
        if nbits == 0 {
            *self = Self::zero();
            return;
        }
        unsafe { blst_p1_mult(&mut self.0, &self.0, scalar.b.as_ptr(), nbits) };
    }
}

impl Neg for G1 {
    type Output = Self;

    fn neg(mut self) -> Self {
        unsafe { blst_p1_cneg(&mut self.0, true) };
        self
    }
}

impl_binops!(G1, Scalar);
impl_fmt!(G1);

impl Additive for G1 {
    fn zero() -> Self {
        Self(blst_p1::default())
    }

    fn is_zero(&self) -> bool {
        unsafe { blst_p1_is_inf(&self.0) }
    }
}

impl Space for G1 {
    type Scalar = Scalar;
}

impl Group for G1 {
    fn generator() -> Self {
        let mut ret = blst_p1::default();
        unsafe { blst_p1_from_affine(&mut ret, &BLS12_381_G1) };
        Self(ret)
    }
}

impl PrimeOrder for G1 {}

impl HashToGroup for G1 {
    fn hash_to_group(dst: &[u8], message: &[u8]) -> Self {
        let mut ret = blst_p1::default();
        unsafe {
            blst_hash_to_g1(
                &mut ret,
                message.as_ptr(),
                message.len(),
                dst.as_ptr(),
                dst.len(),
                ptr::null(),
                0,
            );
        }
        Self(ret)
    }
}

impl SubgroupCheck for G1 {
    fn is_in_correct_group(&self) -> bool {
        unsafe { blst_p1_is_inf(&self.0) || blst_p1_in_g1(&self.0) }
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
        let mut bytes = [0u8; G1_LENGTH];
        unsafe { blst_p1_compress(bytes.as_mut_ptr(), &self.0) };
        buf.put_slice(&bytes);
    }
}

impl Read for G1 {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let bytes = <[u8; G1_LENGTH]>::read(buf)?;
        let point = Self::from_compressed(&bytes).map_err(|err| err.wrap("blst::G1"))?;
        if !point.is_in_correct_group() {
            return Err(Error::NotInSubgroup.wrap("blst::G1"));
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
    fn as_blst_p2_affine(&self) -> blst_p2_affine {
        let mut affine = blst_p2_affine::default();
        unsafe { blst_p2_to_affine(&mut affine, &self.0) };
        affine
    }

    fn from_compressed(bytes: &[u8; G2_LENGTH]) -> Result<Self, Error> {
        if inspect(bytes)? == Compressed::Infinity {
            return Ok(Self::zero());
        }
        let mut ret = blst_p2::default();
        unsafe {
            let mut affine = blst_p2_affine::default();
            match blst_p2_uncompress(&mut affine, bytes.as_ptr()) {
                BLST_ERROR::BLST_SUCCESS => {}
                err => return Err(decode_error(err)),
            }
            blst_p2_from_affine(&mut ret, &affine);
        }
        Ok(Self(ret))
    }
}

impl PartialEq for G2 {
    fn eq(&self, other: &Self) -> bool {
        unsafe { blst_p2_is_equal(&self.0, &other.0) }
    }
}

impl Eq for G2 {}

impl Object for G2 {}

impl AddAssign<&G2> for G2 {
    fn add_assign(&mut self, rhs: &G2) {
        unsafe { blst_p2_add_or_double(&mut self.0, &self.0, &rhs.0) };
    }
}

impl SubAssign<&G2> for G2 {
    fn sub_assign(&mut self, rhs: &G2) {
        *self += &(-*rhs);
    }
}

impl MulAssign<&Scalar> for G2 {
    fn mul_assign(&mut self, rhs: &Scalar) {
        let scalar = rhs.as_blst_scalar();
        let nbits = bits(&scalar);
        if nbits == 0 {
            *self = Self::zero();
            return;
        }
        unsafe { blst_p2_mult(&mut self.0, &self.0, scalar.b.as_ptr(), nbits) };
    }
}

impl Neg for G2 {
    type Output = Self;

    fn neg(mut self) -> Self {
        unsafe { blst_p2_cneg(&mut self.0, true) };
        self
    }
}

impl_binops!(G2, Scalar);
impl_fmt!(G2);

impl Additive for G2 {
    fn zero() -> Self {
        Self(blst_p2::default())
    }

    fn is_zero(&self) -> bool {
        unsafe { blst_p2_is_inf(&self.0) }
    }
}

impl Space for G2 {
    type Scalar = Scalar;
}

impl Group for G2 {
    fn generator() -> Self {
        let mut ret = blst_p2::default();
        unsafe { blst_p2_from_affine(&mut ret, &BLS12_381_G2) };
        Self(ret)
    }
}

impl PrimeOrder for G2 {}

impl HashToGroup for G2 {
    fn hash_to_group(dst: &[u8], message: &[u8]) -> Self {
        let mut ret = blst_p2::default();
        unsafe {
            blst_hash_to_g2(
                &mut ret,
                message.as_ptr(),
                message.len(),
                dst.as_ptr(),
                dst.len(),
                ptr::null(),
                0,
            );
        }
        Self(ret)
    }
}

impl SubgroupCheck for G2 {
    fn is_in_correct_group(&self) -> bool {
        unsafe { blst_p2_is_inf(&self.0) || blst_p2_in_g2(&self.0) }
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
        let mut bytes = [0u8; G2_LENGTH];
        unsafe { blst_p2_compress(bytes.as_mut_ptr(), &self.0) };
        buf.put_slice(&bytes);
    }
}

impl Read for G2 {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let bytes = <[u8; G2_LENGTH]>::read(buf)?;
        let point = Self::from_compressed(&bytes).map_err(|err| err.wrap("blst::G2"))?;
        if !point.is_in_correct_group() {
            return Err(Error::NotInSubgroup.wrap("blst::G2"));
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

/// Computes `e(p, q)` with one Miller loop and one final exponentiation.
fn pairing(p: &G1, q: &G2) -> Gt {
    // Reference: https://github.com/MystenLabs/fastcrypto/blob/bd4999bd3e901eab34ae3dd96dbe38b86ac646a7/fastcrypto/src/groups/bls12381.rs#L223-L234
    if p.is_zero() || q.is_zero() {
        return Gt::zero();
    }
    let pa = p.as_blst_p1_affine();
    let qa = q.as_blst_p2_affine();
    let mut res = blst_fp12::default();
    unsafe {
        blst_miller_loop(&mut res, &qa, &pa);
        blst_final_exp(&mut res, &res);
    }
    Gt(res)
}

impl Gt {
    /// Iterates over the twelve base-field coefficients in encoding order.
    fn coefficients(&self) -> impl Iterator<Item = &blst_fp> {
        self.0
            .fp6
            .iter()
            .flat_map(|fp6| fp6.fp2.iter())
            .flat_map(|fp2| fp2.fp.iter())
    }

    fn from_coefficients(bytes: &[u8; GT_LENGTH]) -> Result<Self, Error> {
        let mut ret = blst_fp12::default();
        let coefficients = ret
            .fp6
            .iter_mut()
            .flat_map(|fp6| fp6.fp2.iter_mut())
            .flat_map(|fp2| fp2.fp.iter_mut());
        for (fp, chunk) in coefficients.zip(bytes.chunks_exact(FIELD_LENGTH)) {
            // `blst_fp_from_bendian` reduces modulo p, so a canonical input must re-encode
            // to itself.
            let mut check = [0u8; FIELD_LENGTH];
            unsafe {
                blst_fp_from_bendian(fp, chunk.as_ptr());
                blst_bendian_from_fp(check.as_mut_ptr(), fp);
            }
            if check[..] != chunk[..] {
                return Err(Error::NonCanonical);
            }
        }
        Ok(Self(ret))
    }
}

impl PartialEq for Gt {
    fn eq(&self, other: &Self) -> bool {
        unsafe { blst_fp12_is_equal(&self.0, &other.0) }
    }
}

impl Eq for Gt {}

impl Object for Gt {}

impl AddAssign<&Gt> for Gt {
    fn add_assign(&mut self, rhs: &Gt) {
        unsafe { blst_fp12_mul(&mut self.0, &self.0, &rhs.0) };
    }
}

impl SubAssign<&Gt> for Gt {
    fn sub_assign(&mut self, rhs: &Gt) {
        *self += &(-*rhs);
    }
}

impl MulAssign<&Scalar> for Gt {
    /// Exponentiates by square-and-multiply over the bits of the scalar.
    fn mul_assign(&mut self, rhs: &Scalar) {
        let scalar = rhs.as_blst_scalar();
        let base = self.0;
        let mut acc = Gt::zero().0;
        for i in (0..bits(&scalar)).rev() {
            unsafe {
                blst_fp12_sqr(&mut acc, &acc);
                if (scalar.b[i / 8] >> (i % 8)) & 1 == 1 {
                    blst_fp12_mul(&mut acc, &acc, &base);
                }
            }
        }
        self.0 = acc;
    }
}

impl Neg for Gt {
    type Output = Self;

    fn neg(self) -> Self {
        let mut ret = blst_fp12::default();
        unsafe { blst_fp12_inverse(&mut ret, &self.0) };
        Self(ret)
    }
}

impl_binops!(Gt, Scalar);
impl_fmt!(Gt);

impl Additive for Gt {
    fn zero() -> Self {
        Self(unsafe { *blst_fp12_one() })
    }
}

impl Space for Gt {
    type Scalar = Scalar;
}

impl Group for Gt {
    fn generator() -> Self {
        static GENERATOR: OnceLock<Gt> = OnceLock::new();
        *GENERATOR.get_or_init(|| pairing(&G1::generator(), &G2::generator()))
    }
}

impl PrimeOrder for Gt {}

impl SubgroupCheck for Gt {
    fn is_in_correct_group(&self) -> bool {
        unsafe { blst_fp12_in_group(&self.0) }
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
        for fp in self.coefficients() {
            unsafe { blst_bendian_from_fp(bytes.as_mut_ptr(), fp) };
            buf.put_slice(&bytes);
        }
    }
}

impl Read for Gt {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let bytes = <[u8; GT_LENGTH]>::read(buf)?;
        let element = Self::from_coefficients(&bytes).map_err(|err| err.wrap("blst::Gt"))?;
        if !element.is_in_correct_group() {
            return Err(Error::NotInSubgroup.wrap("blst::Gt"));
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

impl Suite for Blst {
    type Scalar = Scalar;
    type G1 = G1;
    type G2 = G2;
    type Gt = Gt;

    const NAME: &'static str = "BLS12-381/blst";
    const DST_G1: &'static [u8] = DST_G1;
    const DST_G2: &'static [u8] = DST_G2;

    fn pair(&self, p: &G1, q: &G2) -> Gt {
        pairing(p, q)
    }

    /// Checks `e(a1,a2) == e(b1,b2)` using a single product check with a negated `b1`
    /// (`e(a1,a2) * e(-b1,b2) == 1`).
    fn validate_pairing(&self, a1: &G1, a2: &G2, b1: &G1, b2: &G2) -> bool {
        // Terms with an identity input contribute `1` to the product
        let neg_b1 = -*b1;
        let terms = [(a1, a2), (&neg_b1, b2)];
        let mut terms = terms
            .iter()
            .filter(|(p, q)| !p.is_zero() && !q.is_zero())
            .peekable();
        if terms.peek().is_none() {
            return true;
        }

        // Create a pairing context
        //
        // We only handle pre-hashed points, so we leave the domain separator tag (`DST`) empty.
        let mut pairing = Pairing::new(false, &[]);
        for (p, q) in terms {
            pairing.raw_aggregate(&q.as_blst_p2_affine(), &p.as_blst_p1_affine());
        }

        // Finalize the pairing accumulation and verify the result
        pairing.commit();
        pairing.finalverify(None)
    }
}
