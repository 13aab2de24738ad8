// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by every encode, decode and validation path.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Failure raised while validating, encoding or decoding a value.
///
/// Every error is reported to the immediate caller. Encoding never emits a
/// partial buffer and decoding never returns a partially built value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The value has the wrong shape for the descriptor.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Integer outside the `[min, max]` range of its width.
    #[error("value {value} out of range for {kind} [{min}, {max}]")]
    RangeError {
        kind: &'static str,
        value: String,
        min: String,
        max: String,
    },

    /// Fixed-length array or byte string with the wrong element count.
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Tuple or positional constructor with the wrong number of elements.
    #[error("arity mismatch: expected {expected}, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// Variant name not declared by the enum, or decoded index out of range.
    #[error("unknown variant {0}")]
    UnknownVariant(String),

    #[error("invalid bool byte 0x{0:02x}")]
    InvalidBoolByte(u8),

    /// String payload is not UTF-8; carries the length of the valid prefix.
    #[error("invalid utf-8 after {valid_up_to} bytes")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("buffer underrun at offset {offset}: need {need} bytes, {have} available")]
    BufferUnderrun {
        offset: usize,
        need: usize,
        have: usize,
    },

    /// Strict decode finished with unread input.
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// Struct field has never been assigned.
    #[error("field not set: {0}")]
    MissingField(String),

    /// Constructor argument naming a field twice or no field at all.
    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("non-canonical map: {0}")]
    NonCanonicalMap(&'static str),

    /// Decoded length prefix larger than the configured ceiling.
    #[error("length {found} exceeds limit {max}")]
    LengthLimitExceeded { found: usize, max: usize },

    #[error("nesting depth exceeds limit {0}")]
    DepthLimitExceeded(usize),

    /// Length does not fit the u32 prefix.
    #[error("length {0} does not fit a u32 prefix")]
    LengthOverflow(usize),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Named type referenced but never registered.
    #[error("unresolved type: {0}")]
    UnresolvedType(String),

    #[error("type {0} already registered with a different definition")]
    DuplicateType(String),
}

impl CodecError {
    pub(crate) fn mismatch(expected: impl ToString, found: impl ToString) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// True for errors caused by malformed input bytes rather than a bad value or schema.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownVariant(_)
                | Self::InvalidBoolByte(_)
                | Self::InvalidUtf8 { .. }
                | Self::BufferUnderrun { .. }
                | Self::TrailingBytes(_)
                | Self::NonCanonicalMap(_)
                | Self::LengthLimitExceeded { .. }
                | Self::DepthLimitExceeded(_)
                | Self::LengthMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CodecError::BufferUnderrun {
            offset: 4,
            need: 8,
            have: 2,
        };
        assert_eq!(
            err.to_string(),
            "buffer underrun at offset 4: need 8 bytes, 2 available"
        );
        assert_eq!(
            CodecError::InvalidBoolByte(2).to_string(),
            "invalid bool byte 0x02"
        );
        assert_eq!(
            CodecError::mismatch("Uint8", "Str").to_string(),
            "type mismatch: expected Uint8, found Str"
        );
    }

    #[test]
    fn test_decode_error_classification() {
        assert!(CodecError::TrailingBytes(1).is_decode_error());
        assert!(CodecError::InvalidUtf8 { valid_up_to: 0 }.is_decode_error());
        assert!(!CodecError::MissingField("a".into()).is_decode_error());
        assert!(!CodecError::DuplicateType("T".into()).is_decode_error());
    }
}
