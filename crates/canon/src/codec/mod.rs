// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode, decode and validation protocol shared by every descriptor.
//!
//! # Wire format
//!
//! | Type | Layout |
//! |------|--------|
//! | `UintN` / `IntN` | N/8 bytes, little-endian |
//! | `Bool` | `0x00` or `0x01` |
//! | `Str` / `Bytes` | u32 length + payload |
//! | array (prefixed) | u32 count + elements |
//! | array (fixed, unprefixed) | elements only |
//! | tuple / struct | elements in order, no framing |
//! | map | u32 count + entries sorted by encoded key bytes |
//! | optional | presence byte + payload if present |
//! | enum | u32 variant index + payload if declared |

mod composite;
mod primitive;

pub(crate) use primitive::read_bool;

use crate::config::DecodeConfig;
use crate::cursor::Cursor;
use crate::descriptor::TypeDescriptor;
use crate::error::{CodecError, Result};
use crate::record;
use crate::value::Value;
use crate::variant;

/// Capability implemented by every descriptor.
pub trait TypeCodec {
    /// Validate `value` without encoding it.
    fn check_value(&self, value: &Value) -> Result<()>;

    /// Append the encoding of `value` to `out`.
    ///
    /// On error `out` may hold a partial encoding; use [`encode`](Self::encode)
    /// for all-or-nothing output.
    fn write(&self, value: &Value, out: &mut Vec<u8>) -> Result<()>;

    /// Decode one value, advancing `cursor` past it.
    fn read(&self, cursor: &mut Cursor<'_>, config: &DecodeConfig) -> Result<Value>;

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(value, &mut out)?;
        Ok(out)
    }

    fn decode(&self, cursor: &mut Cursor<'_>) -> Result<Value> {
        self.read(cursor, &DecodeConfig::default())
    }
}

impl TypeCodec for TypeDescriptor {
    fn check_value(&self, value: &Value) -> Result<()> {
        match self {
            Self::Primitive(kind) => kind.check_value(value),
            Self::FixedBytes(d) => d.check_value(value),
            Self::Array(d) => d.check_value(value),
            Self::Tuple(d) => d.check_value(value),
            Self::Map(d) => d.check_value(value),
            Self::Optional(d) => d.check_value(value),
            Self::Delegate(d) => d.check_value(value),
            Self::Struct(schema) => record::check_struct(schema, value),
            Self::Enum(schema) => variant::check_enum(schema, value),
            Self::Ref(r) => r.resolve()?.check_value(value),
        }
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Self::Primitive(kind) => kind.write(value, out),
            Self::FixedBytes(d) => d.write(value, out),
            Self::Array(d) => d.write(value, out),
            Self::Tuple(d) => d.write(value, out),
            Self::Map(d) => d.write(value, out),
            Self::Optional(d) => d.write(value, out),
            Self::Delegate(d) => d.write(value, out),
            Self::Struct(schema) => record::write_struct(schema, value, out),
            Self::Enum(schema) => variant::write_enum(schema, value, out),
            Self::Ref(r) => r.resolve()?.write(value, out),
        }
    }

    fn read(&self, cursor: &mut Cursor<'_>, config: &DecodeConfig) -> Result<Value> {
        match self {
            Self::Primitive(kind) => kind.read(cursor, config),
            Self::FixedBytes(d) => d.read(cursor, config),
            Self::Array(d) => d.read(cursor, config),
            Self::Tuple(d) => d.read(cursor, config),
            Self::Map(d) => d.read(cursor, config),
            Self::Optional(d) => d.read(cursor, config),
            Self::Delegate(d) => d.read(cursor, config),
            Self::Struct(schema) => record::read_struct(schema, cursor, &config.descend()?),
            Self::Enum(schema) => variant::read_enum(schema, cursor, &config.descend()?),
            Self::Ref(r) => r.resolve()?.read(cursor, &config.descend()?),
        }
    }
}

/// Encode `value` as `descriptor`. Nothing is returned unless every byte encoded.
pub fn serialize(descriptor: &TypeDescriptor, value: &Value) -> Result<Vec<u8>> {
    descriptor.encode(value)
}

/// Decode a complete buffer with the default (strict) configuration.
pub fn deserialize(descriptor: &TypeDescriptor, bytes: &[u8]) -> Result<Value> {
    deserialize_with(descriptor, bytes, &DecodeConfig::default())
}

/// Decode a buffer; with `config.strict` every input byte must be consumed.
pub fn deserialize_with(
    descriptor: &TypeDescriptor,
    bytes: &[u8],
    config: &DecodeConfig,
) -> Result<Value> {
    let mut cursor = Cursor::new(bytes);
    let value = descriptor.read(&mut cursor, config).map_err(|e| {
        log::trace!("[codec] decode of {} failed at offset {}: {}", descriptor, cursor.offset(), e);
        e
    })?;
    if config.strict && !cursor.is_finished() {
        log::trace!(
            "[codec] decode of {} left {} trailing bytes",
            descriptor,
            cursor.remaining()
        );
        return Err(CodecError::TrailingBytes(cursor.remaining()));
    }
    Ok(value)
}

/// Validate `value` against `descriptor` without encoding.
pub fn check_value(descriptor: &TypeDescriptor, value: &Value) -> Result<()> {
    descriptor.check_value(value)
}

/// Write a u32 length prefix.
pub(crate) fn write_len(len: usize, out: &mut Vec<u8>) -> Result<()> {
    let len = u32::try_from(len).map_err(|_| CodecError::LengthOverflow(len))?;
    out.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

/// Read a u32 length prefix, bounded by `config.max_length`.
pub(crate) fn read_len(cursor: &mut Cursor<'_>, config: &DecodeConfig) -> Result<usize> {
    let len = cursor.read_u32_le()? as usize;
    config.check_length(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_rejects_trailing_bytes() {
        let bytes = [0x01, 0x00];
        assert_eq!(
            deserialize(&TypeDescriptor::BOOL, &bytes),
            Err(CodecError::TrailingBytes(1))
        );
        let lenient = DecodeConfig::new().with_strict(false);
        assert_eq!(
            deserialize_with(&TypeDescriptor::BOOL, &bytes, &lenient),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn test_decode_leaves_cursor_after_value() {
        let bytes = [0x05, 0x06];
        let mut cursor = Cursor::new(&bytes);
        assert_eq!(TypeDescriptor::U8.decode(&mut cursor).unwrap(), Value::from(5u8));
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn test_encode_is_all_or_nothing() {
        let ty = TypeDescriptor::tuple(vec![TypeDescriptor::STR, TypeDescriptor::U8]);
        let value = Value::tuple(vec![Value::from("abc"), Value::from(256u16)]);
        assert!(matches!(
            serialize(&ty, &value),
            Err(CodecError::RangeError { .. })
        ));
    }

    #[test]
    fn test_read_len_respects_limit() {
        let bytes = 10u32.to_le_bytes();
        let mut cursor = Cursor::new(&bytes);
        let config = DecodeConfig::new().with_max_length(9);
        assert_eq!(
            read_len(&mut cursor, &config),
            Err(CodecError::LengthLimitExceeded { found: 10, max: 9 })
        );
    }
}
