//! The BLS12-381 curve.
//!
//! Two interchangeable [crate::Suite] implementations are provided:
//!
//! * [blst::Blst]: backed by <https://github.com/supranational/blst>.
//! * [arkworks::Arkworks]: backed by <https://github.com/arkworks-rs/algebra>.
//!
//! Both encode scalars as 32 big-endian bytes, G1 and G2 points in the ZCash compressed format
//! (48 and 96 bytes), and GT elements as the twelve base-field coefficients of the underlying
//! `Fp12` value (576 bytes, each coefficient 48 big-endian bytes, ordered
//! `c0.c0.c0, c0.c0.c1, c0.c1.c0, ..., c1.c2.c1`).
//!
//! # Warning
//!
//! Ensure that points are checked to belong to the correct subgroup (G1 or G2) to prevent small
//! subgroup attacks. This is already taken care of for you if you decode points with
//! [crate::codec::Marshal::unmarshal_binary].

use crate::codec::Error;

/// Implements the by-value operators of an element in terms of its `*Assign` operators.
macro_rules! impl_binops {
    ($element:ty, $scalar:ty) => {
        impl<'a> std::ops::Add<&'a $element> for $element {
            type Output = Self;

            fn add(mut self, rhs: &'a $element) -> Self {
                self += rhs;
                self
            }
        }

        impl<'a> std::ops::Sub<&'a $element> for $element {
            type Output = Self;

            fn sub(mut self, rhs: &'a $element) -> Self {
                self -= rhs;
                self
            }
        }

        impl<'a> std::ops::Mul<&'a $scalar> for $element {
            type Output = Self;

            fn mul(mut self, rhs: &'a $scalar) -> Self {
                self *= rhs;
                self
            }
        }
    };
}

/// Implements `Display` (hex of the canonical encoding) and `Debug` for a group element.
macro_rules! impl_fmt {
    ($element:ident) => {
        impl std::fmt::Display for $element {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&hex::encode(crate::codec::Marshal::marshal_binary(self)))
            }
        }

        impl std::fmt::Debug for $element {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($element), self)
            }
        }
    };
}

pub mod arkworks;
pub mod blst;

/// Length of an encoded scalar.
pub const SCALAR_LENGTH: usize = 32;

/// Length of an encoded base-field element.
pub const FIELD_LENGTH: usize = 48;

/// Length of a compressed G1 point.
pub const G1_LENGTH: usize = FIELD_LENGTH;

/// Length of a compressed G2 point.
pub const G2_LENGTH: usize = 2 * FIELD_LENGTH;

/// Length of an encoded GT element.
pub const GT_LENGTH: usize = 12 * FIELD_LENGTH;

/// Domain separation tag for hashing a message to G1.
pub const DST_G1: &[u8] = b"BLS_SIG_BLS12381G1_XMD:SHA-256_SSWU_RO_NUL_";

/// Domain separation tag for hashing a message to G2.
pub const DST_G2: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_NUL_";

/// Set on every compressed encoding.
const FLAG_COMPRESSED: u8 = 0x80;

/// Set on the encoding of the identity.
const FLAG_INFINITY: u8 = 0x40;

/// Set when `y` is the lexicographically largest of `{y, -y}`.
const FLAG_SIGN: u8 = 0x20;

/// Mask clearing the three flag bits from the leading byte.
const FLAG_MASK: u8 = 0x1f;

/// Leading byte of the identity encoding.
const INFINITY: u8 = FLAG_COMPRESSED | FLAG_INFINITY;

/// The flag bits of a compressed point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Compressed {
    /// The identity.
    Infinity,
    /// A point whose `y` coordinate is selected by `sign`.
    Point { sign: bool },
}

/// Checks the flag bits of a compressed G1 or G2 encoding.
///
/// The identity must be encoded as `0xc0` followed by zeros.
pub(crate) fn inspect(bytes: &[u8]) -> Result<Compressed, Error> {
    let Some(&flags) = bytes.first() else {
        return Err(Error::EndOfBuffer);
    };
    if flags & FLAG_COMPRESSED == 0 {
        return Err(Error::InvalidFlags);
    }
    if flags & FLAG_INFINITY == 0 {
        return Ok(Compressed::Point {
            sign: flags & FLAG_SIGN != 0,
        });
    }
    if flags & FLAG_SIGN != 0 {
        return Err(Error::InvalidFlags);
    }
    if flags & FLAG_MASK != 0 || bytes[1..].iter().any(|b| *b != 0) {
        return Err(Error::NonCanonical);
    }
    Ok(Compressed::Infinity)
}

/// Returns the leading flag bits for a compressed encoding.
pub(crate) fn flags(infinity: bool, sign: bool) -> u8 {
    if infinity {
        return INFINITY;
    }
    if sign {
        FLAG_COMPRESSED | FLAG_SIGN
    } else {
        FLAG_COMPRESSED
    }
}

/// Returns the first base-field coordinate of a compressed encoding with the flag bits cleared.
pub(crate) fn masked(bytes: &[u8]) -> [u8; FIELD_LENGTH] {
    let mut x = [0u8; FIELD_LENGTH];
    x.copy_from_slice(&bytes[..FIELD_LENGTH]);
    x[0] &= FLAG_MASK;
    x
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Compressed encoding of the G1 generator.
    pub const G1_GENERATOR: &str = "97f1d3a73197d7942695638c4fa9ac0fc3688c4f9774b905a14e3a3f171bac586c55e83ff97a1aeffb3af00adb22c6bb";

    /// Compressed encoding of the G2 generator.
    pub const G2_GENERATOR: &str = "93e02b6052719f607dacd3a088274f65596bd0d09920b61ab5da61bbdc7f5049334cf11213945d57e5ac7d055d042b7e024aa2b2f08f0a91260805272dc51051c6e47ad4fa403b02b4510b647ae3d1770bac0326a805bbefd48056c8c121bdb8";

    /// The base-field modulus `p`, big-endian.
    pub const MODULUS: &str = "1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffaaab";

    /// Returns the identity encoding of the given length.
    pub fn infinity(len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        bytes[0] = INFINITY;
        bytes
    }

    #[test]
    fn test_inspect() {
        assert_eq!(inspect(&infinity(48)), Ok(Compressed::Infinity));
        assert_eq!(inspect(&infinity(96)), Ok(Compressed::Infinity));

        let generator = hex::decode(G1_GENERATOR).unwrap();
        assert_eq!(inspect(&generator), Ok(Compressed::Point { sign: false }));

        let mut uncompressed = generator.clone();
        uncompressed[0] &= !FLAG_COMPRESSED;
        assert_eq!(inspect(&uncompressed), Err(Error::InvalidFlags));

        let mut signed_infinity = infinity(48);
        signed_infinity[0] |= FLAG_SIGN;
        assert_eq!(inspect(&signed_infinity), Err(Error::InvalidFlags));

        let mut dirty_infinity = infinity(48);
        dirty_infinity[47] = 1;
        assert_eq!(inspect(&dirty_infinity), Err(Error::NonCanonical));

        assert_eq!(inspect(&[]), Err(Error::EndOfBuffer));
    }

    #[test]
    fn test_flags() {
        assert_eq!(flags(true, false), 0xc0);
        assert_eq!(flags(false, false), 0x80);
        assert_eq!(flags(false, true), 0xa0);
        let generator = hex::decode(G1_GENERATOR).unwrap();
        assert_eq!(masked(&generator)[0], 0x17);
    }
}
