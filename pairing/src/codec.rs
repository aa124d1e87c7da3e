//! Fixed-size binary encoding of scalars and group elements.
//!
//! Scalars, points, evaluations, and shares implement the [commonware_codec] traits ([Read],
//! [Write], [FixedSize]), so they can be embedded in any larger codec message. [Marshal] adds the
//! byte order of the encoding and whole-buffer helpers that report why a value was rejected.
//!
//! Decoding is strict: wrong lengths, malformed flag bits, non-canonical coordinates, off-curve
//! points, and points outside the prime-order subgroup are all rejected.

use commonware_codec::{Error as CodecError, FixedSize, Read, ReadExt, Write};
use thiserror::Error;

/// Errors that can occur when decoding a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid length: expected {expected}, found {found}")]
    InvalidLength { expected: usize, found: usize },
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("invalid encoding flags")]
    InvalidFlags,
    #[error("non-canonical encoding")]
    NonCanonical,
    #[error("point not on curve")]
    NotOnCurve,
    #[error("point not in subgroup")]
    NotInSubgroup,
    #[error("malformed: {0}")]
    Malformed(String),
}

impl Error {
    /// Wraps `self` for return from a [Read] implementation.
    pub(crate) fn wrap(self, context: &'static str) -> CodecError {
        CodecError::Wrapped(context, Box::new(self))
    }
}

impl From<CodecError> for Error {
    /// Recovers the reason a [Read] implementation in this crate rejected its input.
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::EndOfBuffer => Self::EndOfBuffer,
            CodecError::Wrapped(_, source) => match source.downcast::<Self>() {
                Ok(err) => *err,
                Err(source) => Self::Malformed(source.to_string()),
            },
            err => Self::Malformed(err.to_string()),
        }
    }
}

/// Byte order of a fixed-length encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

/// A value with a fixed-length canonical encoding.
pub trait Marshal: Read<Cfg = ()> + Write + FixedSize {
    /// Byte order used by the encoding.
    const BYTE_ORDER: ByteOrder;

    /// Returns the canonical encoding of `self`.
    fn marshal_binary(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SIZE);
        self.write(&mut bytes);
        bytes
    }

    /// Decodes a value from a buffer of exactly [FixedSize::SIZE] bytes.
    fn unmarshal_binary(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::InvalidLength {
                expected: Self::SIZE,
                found: bytes.len(),
            });
        }
        let mut buf = bytes;
        Ok(Self::read(&mut buf)?)
    }
}
