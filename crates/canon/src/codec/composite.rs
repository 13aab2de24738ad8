// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Arrays, byte strings, tuples, maps, optionals and delegates.

use super::{read_bool, read_len, write_len, TypeCodec};
use crate::config::{DecodeConfig, MapOrder};
use crate::cursor::Cursor;
use crate::descriptor::{
    ArrayDescriptor, DelegateDescriptor, FixedBytesDescriptor, MapDescriptor, OptionalDescriptor,
    TupleDescriptor, TypeDescriptor,
};
use crate::error::{CodecError, Result};
use crate::value::Value;
use std::collections::BTreeMap;

impl ArrayDescriptor {
    fn items<'v>(&self, value: &'v Value) -> Result<&'v [Value]> {
        let items = value
            .as_list()
            .ok_or_else(|| CodecError::mismatch(self, value.kind_name()))?;
        self.check_len(items.len())?;
        Ok(items)
    }

    fn check_len(&self, found: usize) -> Result<()> {
        match self.fixed_length() {
            Some(expected) if expected != found => {
                Err(CodecError::LengthMismatch { expected, found })
            }
            _ => Ok(()),
        }
    }
}

impl TypeCodec for ArrayDescriptor {
    fn check_value(&self, value: &Value) -> Result<()> {
        self.items(value)?
            .iter()
            .try_for_each(|item| self.element_type().check_value(item))
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        let items = self.items(value)?;
        if self.length_prefixed() {
            write_len(items.len(), out)?;
        }
        items
            .iter()
            .try_for_each(|item| self.element_type().write(item, out))
    }

    fn read(&self, cursor: &mut Cursor<'_>, config: &DecodeConfig) -> Result<Value> {
        let count = if self.length_prefixed() {
            let count = read_len(cursor, config)?;
            self.check_len(count)?;
            count
        } else {
            self.fixed_length().unwrap_or_default()
        };
        check_count(self.element_type(), count, cursor, config)?;
        let mut items = Vec::with_capacity(count.min(cursor.remaining()));
        for _ in 0..count {
            items.push(self.element_type().read(cursor, config)?);
        }
        Ok(Value::List(items))
    }
}

/// Reject a count the remaining input cannot hold before building any element.
/// Zero-width elements are not bounded by the input, so they get their own cap.
fn check_count(
    element: &TypeDescriptor,
    count: usize,
    cursor: &Cursor<'_>,
    config: &DecodeConfig,
) -> Result<()> {
    // A named reference sizes as whatever it currently resolves to.
    let width = match element {
        TypeDescriptor::Ref(target) => target.resolve()?.min_encoded_size(),
        other => other.min_encoded_size(),
    };
    match width {
        0 if count > config.max_empty_items => Err(CodecError::LengthLimitExceeded {
            found: count,
            max: config.max_empty_items,
        }),
        0 => Ok(()),
        width => {
            let need = count.saturating_mul(width);
            if need > cursor.remaining() {
                return Err(CodecError::BufferUnderrun {
                    offset: cursor.offset(),
                    need,
                    have: cursor.remaining(),
                });
            }
            Ok(())
        }
    }
}

impl FixedBytesDescriptor {
    fn bytes<'v>(&self, value: &'v Value) -> Result<&'v [u8]> {
        let bytes = value
            .as_bytes()
            .ok_or_else(|| CodecError::mismatch(self, value.kind_name()))?;
        if bytes.len() != self.length() {
            return Err(CodecError::LengthMismatch {
                expected: self.length(),
                found: bytes.len(),
            });
        }
        Ok(bytes)
    }
}

impl TypeCodec for FixedBytesDescriptor {
    fn check_value(&self, value: &Value) -> Result<()> {
        self.bytes(value).map(|_| ())
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        let bytes = self.bytes(value)?;
        if self.length_prefixed() {
            write_len(bytes.len(), out)?;
        }
        out.extend_from_slice(bytes);
        Ok(())
    }

    fn read(&self, cursor: &mut Cursor<'_>, config: &DecodeConfig) -> Result<Value> {
        if self.length_prefixed() {
            let found = read_len(cursor, config)?;
            if found != self.length() {
                return Err(CodecError::LengthMismatch {
                    expected: self.length(),
                    found,
                });
            }
        }
        Ok(Value::Bytes(cursor.read_bytes(self.length())?.to_vec()))
    }
}

impl TupleDescriptor {
    fn items<'v>(&self, value: &'v Value) -> Result<&'v [Value]> {
        let items = value
            .as_tuple()
            .ok_or_else(|| CodecError::mismatch(self, value.kind_name()))?;
        if items.len() != self.element_types.len() {
            return Err(CodecError::ArityMismatch {
                expected: self.element_types.len(),
                found: items.len(),
            });
        }
        Ok(items)
    }
}

impl TypeCodec for TupleDescriptor {
    fn check_value(&self, value: &Value) -> Result<()> {
        self.items(value)?
            .iter()
            .zip(&self.element_types)
            .try_for_each(|(item, ty)| ty.check_value(item))
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        self.items(value)?
            .iter()
            .zip(&self.element_types)
            .try_for_each(|(item, ty)| ty.write(item, out))
    }

    fn read(&self, cursor: &mut Cursor<'_>, config: &DecodeConfig) -> Result<Value> {
        self.element_types
            .iter()
            .map(|ty| ty.read(cursor, config))
            .collect::<Result<Vec<_>>>()
            .map(Value::Tuple)
    }
}

impl MapDescriptor {
    fn entries<'v>(&self, value: &'v Value) -> Result<&'v BTreeMap<Value, Value>> {
        value
            .as_map()
            .ok_or_else(|| CodecError::mismatch(self, value.kind_name()))
    }
}

impl TypeCodec for MapDescriptor {
    fn check_value(&self, value: &Value) -> Result<()> {
        self.entries(value)?.iter().try_for_each(|(k, v)| {
            self.key_type.check_value(k)?;
            self.value_type.check_value(v)
        })
    }

    /// Entries are emitted in ascending order of their encoded key bytes,
    /// whatever order the value map iterates in.
    fn write(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        let mut encoded = self
            .entries(value)?
            .iter()
            .map(|(k, v)| -> Result<(Vec<u8>, Vec<u8>)> {
                Ok((self.key_type.encode(k)?, self.value_type.encode(v)?))
            })
            .collect::<Result<Vec<_>>>()?;
        encoded.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        write_len(encoded.len(), out)?;
        for (key, value) in encoded {
            out.extend_from_slice(&key);
            out.extend_from_slice(&value);
        }
        Ok(())
    }

    fn read(&self, cursor: &mut Cursor<'_>, config: &DecodeConfig) -> Result<Value> {
        let count = read_len(cursor, config)?;
        let mut entries = BTreeMap::new();
        let mut previous: Option<&[u8]> = None;
        for _ in 0..count {
            let start = cursor.offset();
            let key = self.key_type.read(cursor, config)?;
            let key_bytes = cursor.consumed_since(start);
            if config.map_order == MapOrder::Strict {
                match previous {
                    Some(prev) if key_bytes == prev => {
                        return Err(CodecError::NonCanonicalMap("duplicate key"))
                    }
                    Some(prev) if key_bytes < prev => {
                        return Err(CodecError::NonCanonicalMap("keys out of order"))
                    }
                    _ => {}
                }
            }
            previous = Some(key_bytes);
            let value = self.value_type.read(cursor, config)?;
            if entries.insert(key, value).is_some() {
                return Err(CodecError::NonCanonicalMap("duplicate key"));
            }
        }
        Ok(Value::Map(entries))
    }
}

impl TypeCodec for OptionalDescriptor {
    fn check_value(&self, value: &Value) -> Result<()> {
        match value.as_optional() {
            Some(Some(inner)) => self.inner_type.check_value(inner),
            Some(None) => Ok(()),
            None => Err(CodecError::mismatch(self, value.kind_name())),
        }
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        match value.as_optional() {
            Some(Some(inner)) => {
                out.push(1);
                self.inner_type.write(inner, out)
            }
            Some(None) => {
                out.push(0);
                Ok(())
            }
            None => Err(CodecError::mismatch(self, value.kind_name())),
        }
    }

    fn read(&self, cursor: &mut Cursor<'_>, config: &DecodeConfig) -> Result<Value> {
        if read_bool(cursor)? {
            let inner = self.inner_type.read(cursor, config)?;
            Ok(Value::Optional(Some(Box::new(inner))))
        } else {
            Ok(Value::Optional(None))
        }
    }
}

impl TypeCodec for DelegateDescriptor {
    fn check_value(&self, value: &Value) -> Result<()> {
        self.underlying.check_value(value)
    }

    fn write(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        self.underlying.write(value, out)
    }

    fn read(&self, cursor: &mut Cursor<'_>, config: &DecodeConfig) -> Result<Value> {
        self.underlying.read(cursor, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::StructSchema;
    use std::sync::Arc;

    fn decode_with(ty: &impl TypeCodec, bytes: &[u8], config: &DecodeConfig) -> Result<Value> {
        let mut cursor = Cursor::new(bytes);
        ty.read(&mut cursor, config)
    }

    fn decode(ty: &impl TypeCodec, bytes: &[u8]) -> Result<Value> {
        decode_with(ty, bytes, &DecodeConfig::default())
    }

    fn u8_list(items: &[u8]) -> Value {
        Value::from(items.to_vec())
    }

    #[test]
    fn test_variable_array() {
        let ty = ArrayDescriptor::variable(TypeDescriptor::U8);
        let bytes = ty.encode(&u8_list(&[1, 2, 3])).unwrap();
        assert_eq!(bytes, vec![3, 0, 0, 0, 1, 2, 3]);
        assert_eq!(decode(&ty, &bytes).unwrap(), u8_list(&[1, 2, 3]));
        assert_eq!(ty.encode(&u8_list(&[])).unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_fixed_prefixed_array() {
        let ty = ArrayDescriptor::new(TypeDescriptor::U16, Some(2), true).unwrap();
        let value = Value::from(vec![1u16, 2]);
        let bytes = ty.encode(&value).unwrap();
        assert_eq!(bytes, vec![2, 0, 0, 0, 1, 0, 2, 0]);
        assert_eq!(decode(&ty, &bytes).unwrap(), value);

        // Count on the wire disagrees with the declared length.
        let wrong = [3, 0, 0, 0, 1, 0, 2, 0, 3, 0];
        assert_eq!(
            decode(&ty, &wrong),
            Err(CodecError::LengthMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_fixed_unprefixed_array() {
        let ty = ArrayDescriptor::new(TypeDescriptor::U8, Some(4), false).unwrap();
        let bytes = ty.encode(&u8_list(&[9, 8, 7, 6])).unwrap();
        assert_eq!(bytes, vec![9, 8, 7, 6]);
        assert_eq!(decode(&ty, &bytes).unwrap(), u8_list(&[9, 8, 7, 6]));
        assert!(matches!(
            decode(&ty, &[9, 8]),
            Err(CodecError::BufferUnderrun { .. })
        ));
    }

    #[test]
    fn test_array_length_checked_before_output() {
        let ty = ArrayDescriptor::new(TypeDescriptor::U8, Some(4), false).unwrap();
        assert_eq!(
            ty.encode(&u8_list(&[1, 2, 3])),
            Err(CodecError::LengthMismatch {
                expected: 4,
                found: 3
            })
        );
        assert!(matches!(
            ty.check_value(&u8_list(&[1, 2, 3, 4, 5])),
            Err(CodecError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_array_element_errors_propagate() {
        let ty = ArrayDescriptor::variable(TypeDescriptor::U8);
        assert!(matches!(
            ty.check_value(&Value::from(vec![1u16, 300])),
            Err(CodecError::RangeError { .. })
        ));
        assert!(matches!(
            ty.check_value(&Value::bytes(vec![1, 2])),
            Err(CodecError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_huge_count_does_not_preallocate() {
        let ty = ArrayDescriptor::variable(TypeDescriptor::U8);
        let bytes = [0xff, 0xff, 0xff, 0xff, 1];
        assert!(matches!(
            decode(&ty, &bytes),
            Err(CodecError::BufferUnderrun { .. })
        ));
    }

    #[test]
    fn test_count_bounded_by_element_width() {
        // Four u32 elements need 16 bytes; only 8 follow the count.
        let ty = ArrayDescriptor::variable(TypeDescriptor::U32);
        let bytes = [4, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0];
        assert_eq!(
            decode(&ty, &bytes),
            Err(CodecError::BufferUnderrun { offset: 4, need: 16, have: 8 })
        );
    }

    #[test]
    fn test_zero_width_count_capped() {
        let empty = StructSchema::new("Empty", vec![]).unwrap();
        let huge = 10_000_000u32.to_le_bytes();
        for element in [TypeDescriptor::Struct(Arc::new(empty)), TypeDescriptor::tuple(vec![])] {
            let ty = ArrayDescriptor::variable(element);
            assert_eq!(
                decode(&ty, &huge),
                Err(CodecError::LengthLimitExceeded {
                    found: 10_000_000,
                    max: crate::config::DEFAULT_MAX_EMPTY_ITEMS,
                })
            );
        }
    }

    #[test]
    fn test_referenced_element_sized_through_registry() {
        let registry = crate::registry::TypeRegistry::new();
        let node = registry
            .register_struct(
                &crate::builder::StructDef::new("Node")
                    .field("id", crate::schema::TypeExpr::U32)
                    .field(
                        "children",
                        crate::schema::TypeExpr::vec(crate::schema::TypeExpr::named("Node")),
                    ),
            )
            .unwrap();
        let children = node.field("children").unwrap().type_desc.clone();
        let TypeDescriptor::Array(children) = children else {
            panic!("children is an array");
        };
        // More than the zero-width cap, but each node needs 8 bytes.
        let mut bytes = 100_000u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0; 8]);
        assert_eq!(
            decode(&children, &bytes),
            Err(CodecError::BufferUnderrun { offset: 4, need: 800_000, have: 8 })
        );
    }

    #[test]
    fn test_zero_width_items_roundtrip() {
        let ty = ArrayDescriptor::variable(TypeDescriptor::tuple(vec![]));
        let value = Value::List(vec![Value::tuple(vec![]); 3]);
        let bytes = ty.encode(&value).unwrap();
        assert_eq!(bytes, vec![3, 0, 0, 0]);
        assert_eq!(decode(&ty, &bytes).unwrap(), value);

        let tight = DecodeConfig::new().with_max_empty_items(2);
        assert_eq!(
            decode_with(&ty, &bytes, &tight),
            Err(CodecError::LengthLimitExceeded { found: 3, max: 2 })
        );
    }

    #[test]
    fn test_fixed_bytes() {
        let raw = FixedBytesDescriptor::new(4, false).unwrap();
        let value = Value::bytes(vec![0xca, 0xfe, 0xba, 0xbe]);
        assert_eq!(raw.encode(&value).unwrap(), vec![0xca, 0xfe, 0xba, 0xbe]);
        assert_eq!(decode(&raw, &[0xca, 0xfe, 0xba, 0xbe]).unwrap(), value);

        let prefixed = FixedBytesDescriptor::new(2, true).unwrap();
        assert_eq!(
            prefixed.encode(&Value::bytes(vec![1, 2])).unwrap(),
            vec![2, 0, 0, 0, 1, 2]
        );
        assert_eq!(
            decode(&prefixed, &[3, 0, 0, 0, 1, 2, 3]),
            Err(CodecError::LengthMismatch {
                expected: 2,
                found: 3
            })
        );
        assert!(matches!(
            raw.check_value(&Value::bytes(vec![1])),
            Err(CodecError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_tuple() {
        let ty = TupleDescriptor::new(vec![
            TypeDescriptor::STR,
            TypeDescriptor::BOOL,
            TypeDescriptor::U16,
        ]);
        let value = Value::tuple(vec![Value::from("abc"), Value::from(true), Value::from(2u16)]);
        let bytes = ty.encode(&value).unwrap();
        assert_eq!(bytes, vec![3, 0, 0, 0, 0x61, 0x62, 0x63, 1, 2, 0]);
        assert_eq!(decode(&ty, &bytes).unwrap(), value);
    }

    #[test]
    fn test_tuple_arity() {
        let ty = TupleDescriptor::new(vec![TypeDescriptor::U8, TypeDescriptor::U8]);
        assert_eq!(
            ty.check_value(&Value::tuple(vec![Value::from(1u8)])),
            Err(CodecError::ArityMismatch {
                expected: 2,
                found: 1
            })
        );
        // A list is not a tuple.
        assert!(matches!(
            ty.check_value(&Value::from(vec![1u8, 2])),
            Err(CodecError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_map_canonical_order() {
        let ty = MapDescriptor::new(TypeDescriptor::STR, TypeDescriptor::U8);
        let value = Value::map([("b", 1u8), ("a", 2u8)]);
        let bytes = ty.encode(&value).unwrap();
        assert_eq!(
            bytes,
            vec![2, 0, 0, 0, 1, 0, 0, 0, b'a', 2, 1, 0, 0, 0, b'b', 1]
        );
        assert_eq!(decode(&ty, &bytes).unwrap(), value);
    }

    #[test]
    fn test_map_orders_by_encoded_bytes_not_value() {
        // 256 encodes as 00 01 and sorts before 1 (01 00).
        let ty = MapDescriptor::new(TypeDescriptor::U16, TypeDescriptor::BOOL);
        let value = Value::map([(1u16, true), (256u16, false)]);
        let bytes = ty.encode(&value).unwrap();
        assert_eq!(bytes, vec![2, 0, 0, 0, 0x00, 0x01, 0, 0x01, 0x00, 1]);
        assert_eq!(decode(&ty, &bytes).unwrap(), value);
    }

    #[test]
    fn test_map_order_policy() {
        let ty = MapDescriptor::new(TypeDescriptor::U8, TypeDescriptor::U8);
        let unsorted = [2, 0, 0, 0, 5, 50, 3, 30];
        assert_eq!(
            decode(&ty, &unsorted),
            Err(CodecError::NonCanonicalMap("keys out of order"))
        );
        let lenient = DecodeConfig::new().with_map_order(MapOrder::Lenient);
        assert_eq!(
            decode_with(&ty, &unsorted, &lenient).unwrap(),
            Value::map([(3u8, 30u8), (5u8, 50u8)])
        );
    }

    #[test]
    fn test_map_duplicate_keys_always_rejected() {
        let ty = MapDescriptor::new(TypeDescriptor::U8, TypeDescriptor::U8);
        let dup = [2, 0, 0, 0, 3, 1, 3, 2];
        assert_eq!(
            decode(&ty, &dup),
            Err(CodecError::NonCanonicalMap("duplicate key"))
        );
        let lenient = DecodeConfig::lenient();
        assert_eq!(
            decode_with(&ty, &dup, &lenient),
            Err(CodecError::NonCanonicalMap("duplicate key"))
        );
    }

    #[test]
    fn test_optional() {
        let ty = OptionalDescriptor::new(TypeDescriptor::I8);
        assert_eq!(ty.encode(&Value::some(-1i8)).unwrap(), vec![0x01, 0xff]);
        assert_eq!(ty.encode(&Value::none()).unwrap(), vec![0x00]);
        assert_eq!(decode(&ty, &[0x01, 0xff]).unwrap(), Value::some(-1i8));
        assert_eq!(decode(&ty, &[0x00]).unwrap(), Value::none());
        assert_eq!(decode(&ty, &[0x07]), Err(CodecError::InvalidBoolByte(7)));
        assert!(matches!(
            ty.check_value(&Value::from(1i8)),
            Err(CodecError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_delegate_is_transparent() {
        let address = DelegateDescriptor::new(
            "Address",
            TypeDescriptor::array(TypeDescriptor::U8, 4, false).unwrap(),
        );
        let value = u8_list(&[1, 2, 3, 4]);
        assert_eq!(address.encode(&value).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(decode(&address, &[1, 2, 3, 4]).unwrap(), value);
    }
}
