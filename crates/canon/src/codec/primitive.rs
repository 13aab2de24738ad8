// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-width integers, bool, string and bytes.

use super::{read_len, write_len, TypeCodec};
use crate::config::DecodeConfig;
use crate::cursor::Cursor;
use crate::descriptor::PrimitiveKind;
use crate::error::{CodecError, Result};
use crate::value::{Integer, Value};

impl TypeCodec for PrimitiveKind {
    fn check_value(&self, value: &Value) -> Result<()> {
        match (self, value) {
            (Self::Bool, Value::Bool(_))
            | (Self::Str, Value::Str(_))
            | (Self::Bytes, Value::Bytes(_)) => Ok(()),
            (kind, Value::Int(v)) if kind.is_integer() => check_range(*kind, *v),
            (kind, other) => Err(CodecError::mismatch(kind.name(), other.kind_name())),
        }
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        match (self, value) {
            (Self::Bool, Value::Bool(b)) => out.push(u8::from(*b)),
            (Self::Str, Value::Str(s)) => {
                write_len(s.len(), out)?;
                out.extend_from_slice(s.as_bytes());
            }
            (Self::Bytes, Value::Bytes(b)) => {
                write_len(b.len(), out)?;
                out.extend_from_slice(b);
            }
            (kind, Value::Int(v)) if kind.is_integer() => {
                check_range(*kind, *v)?;
                let width = kind.size().unwrap_or_default();
                out.extend_from_slice(&v.to_le_bytes()[..width]);
            }
            (kind, other) => return Err(CodecError::mismatch(kind.name(), other.kind_name())),
        }
        Ok(())
    }

    fn read(&self, cursor: &mut Cursor<'_>, config: &DecodeConfig) -> Result<Value> {
        Ok(match self {
            Self::Bool => Value::Bool(read_bool(cursor)?),
            Self::U8 => Value::from(cursor.read_u8()?),
            Self::U16 => Value::from(cursor.read_u16_le()?),
            Self::U32 => Value::from(cursor.read_u32_le()?),
            Self::U64 => Value::from(cursor.read_u64_le()?),
            Self::U128 => Value::from(cursor.read_u128_le()?),
            Self::I8 => Value::from(cursor.read_i8()?),
            Self::I16 => Value::from(cursor.read_i16_le()?),
            Self::I32 => Value::from(cursor.read_i32_le()?),
            Self::I64 => Value::from(cursor.read_i64_le()?),
            Self::I128 => Value::from(cursor.read_i128_le()?),
            Self::Str => {
                let len = read_len(cursor, config)?;
                let bytes = cursor.read_bytes(len)?;
                let s = std::str::from_utf8(bytes).map_err(|e| CodecError::InvalidUtf8 {
                    valid_up_to: e.valid_up_to(),
                })?;
                Value::Str(s.to_owned())
            }
            Self::Bytes => {
                let len = read_len(cursor, config)?;
                Value::Bytes(cursor.read_bytes(len)?.to_vec())
            }
        })
    }
}

fn check_range(kind: PrimitiveKind, value: Integer) -> Result<()> {
    let Some((min, max)) = kind.range() else {
        return Err(CodecError::mismatch(kind.name(), "Int"));
    };
    if value < min || value > max {
        return Err(CodecError::RangeError {
            kind: kind.name(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Any byte other than 0x00 or 0x01 is rejected.
pub(crate) fn read_bool(cursor: &mut Cursor<'_>) -> Result<bool> {
    match cursor.read_u8()? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(CodecError::InvalidBoolByte(other)),
    }
}
