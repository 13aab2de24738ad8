// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic value tree accepted by encoders and produced by decoders.

use crate::error::{CodecError, Result};
use crate::record::StructValue;
use crate::variant::EnumValue;
use std::collections::BTreeMap;
use std::fmt;

/// Width-independent integer spanning `[i128::MIN, u128::MAX]`.
///
/// Every fixed-width integer descriptor accepts this one type and range-checks
/// it, which is what makes an out-of-range assignment observable instead of
/// silently truncated. Non-negative values are always stored unsigned, so two
/// equal numbers have one representation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integer(Repr);

// Variant order matters: derived `Ord` puts every negative below every non-negative.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Repr {
    Negative(i128),
    NonNegative(u128),
}

impl Integer {
    pub const ZERO: Integer = Integer(Repr::NonNegative(0));

    pub fn from_i128(v: i128) -> Self {
        if v < 0 {
            Self(Repr::Negative(v))
        } else {
            Self(Repr::NonNegative(v as u128))
        }
    }

    pub fn from_u128(v: u128) -> Self {
        Self(Repr::NonNegative(v))
    }

    pub fn is_negative(self) -> bool {
        matches!(self.0, Repr::Negative(_))
    }

    pub fn to_i128(self) -> Option<i128> {
        match self.0 {
            Repr::Negative(v) => Some(v),
            Repr::NonNegative(v) => i128::try_from(v).ok(),
        }
    }

    pub fn to_u128(self) -> Option<u128> {
        match self.0 {
            Repr::Negative(_) => None,
            Repr::NonNegative(v) => Some(v),
        }
    }

    /// Convert to a narrower native integer, `None` if it does not fit.
    pub fn narrow<T>(self) -> Option<T>
    where
        T: TryFrom<i128> + TryFrom<u128>,
    {
        match self.0 {
            Repr::Negative(v) => <T as TryFrom<i128>>::try_from(v).ok(),
            Repr::NonNegative(v) => <T as TryFrom<u128>>::try_from(v).ok(),
        }
    }

    /// 128-bit two's-complement little-endian image; a fixed-width encoding
    /// is its low bytes once the value is known to be in range.
    pub(crate) fn to_le_bytes(self) -> [u8; 16] {
        match self.0 {
            Repr::Negative(v) => v.to_le_bytes(),
            Repr::NonNegative(v) => v.to_le_bytes(),
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Negative(v) => write!(f, "{}", v),
            Repr::NonNegative(v) => write!(f, "{}", v),
        }
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

macro_rules! impl_integer_from {
    (unsigned: $($t:ty),*) => {
        $(impl From<$t> for Integer {
            fn from(v: $t) -> Self {
                Self::from_u128(v as u128)
            }
        })*
    };
    (signed: $($t:ty),*) => {
        $(impl From<$t> for Integer {
            fn from(v: $t) -> Self {
                Self::from_i128(v as i128)
            }
        })*
    };
}

impl_integer_from!(unsigned: u8, u16, u32, u64, u128, usize);
impl_integer_from!(signed: i8, i16, i32, i64, i128, isize);

/// A value that can be checked against, encoded by, or decoded from a
/// [`TypeDescriptor`](crate::TypeDescriptor).
///
/// Values are totally ordered and hashable, so any value (including lists
/// and tuples) can key a [`Value::Map`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Bool(bool),
    Int(Integer),
    Str(String),
    /// Opaque byte string (`Bytes` and fixed byte-string descriptors).
    Bytes(Vec<u8>),
    /// Array elements, fixed or variable length.
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Map(BTreeMap<Value, Value>),
    Optional(Option<Box<Value>>),
    Struct(StructValue),
    Enum(EnumValue),
}

macro_rules! impl_as_int {
    ($($name:ident => $t:ty),* $(,)?) => {
        $(
            #[doc = concat!("Try to get as ", stringify!($t), ".")]
            pub fn $name(&self) -> Option<$t> {
                self.as_int()?.narrow()
            }
        )*
    };
}

impl Value {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(data.into())
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Self::Tuple(items)
    }

    pub fn none() -> Self {
        Self::Optional(None)
    }

    pub fn some(inner: impl Into<Value>) -> Self {
        Self::Optional(Some(Box::new(inner.into())))
    }

    /// Build a map from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Short name of the value's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Int(_) => "Int",
            Self::Str(_) => "Str",
            Self::Bytes(_) => "Bytes",
            Self::List(_) => "List",
            Self::Tuple(_) => "Tuple",
            Self::Map(_) => "Map",
            Self::Optional(_) => "Optional",
            Self::Struct(_) => "Struct",
            Self::Enum(_) => "Enum",
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as integer.
    pub fn as_int(&self) -> Option<Integer> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    impl_as_int!(
        as_u8 => u8,
        as_u16 => u16,
        as_u32 => u32,
        as_u64 => u64,
        as_u128 => u128,
        as_i8 => i8,
        as_i16 => i16,
        as_i32 => i32,
        as_i64 => i64,
        as_i128 => i128,
    );

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get array elements.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<Value, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Outer `None` if not an optional; inner `None` if absent.
    pub fn as_optional(&self) -> Option<Option<&Value>> {
        match self {
            Self::Optional(inner) => Some(inner.as_deref()),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Integer> for Value {
    fn from(v: Integer) -> Self {
        Self::Int(v)
    }
}

macro_rules! impl_value_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Self::Int(Integer::from(v))
            }
        })*
    };
}

impl_value_from_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        Self::Optional(v.map(|inner| Box::new(inner.into())))
    }
}

impl From<BTreeMap<Value, Value>> for Value {
    fn from(v: BTreeMap<Value, Value>) -> Self {
        Self::Map(v)
    }
}

impl From<StructValue> for Value {
    fn from(v: StructValue) -> Self {
        Self::Struct(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Self::Enum(v)
    }
}

/// Typed extraction from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| CodecError::mismatch("Bool", value.kind_name()))
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| CodecError::mismatch("Str", value.kind_name()))
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| CodecError::mismatch("Bytes", value.kind_name()))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value.as_optional() {
            Some(inner) => inner.map(T::from_value).transpose(),
            None => Err(CodecError::mismatch("Optional", value.kind_name())),
        }
    }
}

macro_rules! impl_from_value_int {
    ($($t:ty),*) => {
        $(impl FromValue for $t {
            fn from_value(value: &Value) -> Result<Self> {
                let v = value
                    .as_int()
                    .ok_or_else(|| CodecError::mismatch(stringify!($t), value.kind_name()))?;
                v.narrow().ok_or_else(|| CodecError::RangeError {
                    kind: stringify!($t),
                    value: v.to_string(),
                    min: <$t>::MIN.to_string(),
                    max: <$t>::MAX.to_string(),
                })
            }
        })*
    };
}

impl_from_value_int!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_normalizes_sign() {
        assert_eq!(Integer::from(5u8), Integer::from(5i64));
        assert_eq!(Integer::from(0i8), Integer::ZERO);
        assert!(Integer::from(-1i8).is_negative());
        assert!(!Integer::from(0i8).is_negative());
    }

    #[test]
    fn test_integer_ordering_spans_full_range() {
        let values = [
            Integer::from(i128::MIN),
            Integer::from(-1i8),
            Integer::ZERO,
            Integer::from(i128::MAX),
            Integer::from(u128::MAX),
        ];
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_integer_narrow() {
        assert_eq!(Integer::from(255u32).narrow::<u8>(), Some(255));
        assert_eq!(Integer::from(256u32).narrow::<u8>(), None);
        assert_eq!(Integer::from(-1i32).narrow::<u64>(), None);
        assert_eq!(Integer::from(-128i32).narrow::<i8>(), Some(-128));
        assert_eq!(Integer::from(u128::MAX).to_i128(), None);
        assert_eq!(Integer::from(u128::MAX).to_string(), u128::MAX.to_string());
    }

    #[test]
    fn test_le_image_is_twos_complement() {
        let bytes = Integer::from(-2i8).to_le_bytes();
        assert_eq!(bytes[0], 0xfe);
        assert!(bytes[1..].iter().all(|b| *b == 0xff));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(300u16).as_u8(), None);
        assert_eq!(Value::from(300u16).as_u32(), Some(300));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::bytes(vec![1, 2]).as_bytes(), Some(&[1u8, 2][..]));
        assert_eq!(Value::none().as_optional(), Some(None));
        assert_eq!(Value::from(1u8).as_optional(), None);
        assert_eq!(Value::from(vec![1u8, 2]).as_list().map(<[Value]>::len), Some(2));
    }

    #[test]
    fn test_compound_values_are_map_keys() {
        let map = Value::map([
            (Value::from(vec![2u8]), Value::from(1u8)),
            (Value::from(vec![1u8, 9]), Value::from(2u8)),
        ]);
        let keys: Vec<_> = map.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys[0], Value::from(vec![1u8, 9]));
    }

    #[test]
    fn test_from_value() {
        assert_eq!(u16::from_value(&Value::from(7u8)).unwrap(), 7);
        assert!(matches!(
            u8::from_value(&Value::from(-1i8)),
            Err(CodecError::RangeError { .. })
        ));
        assert!(matches!(
            String::from_value(&Value::from(1u8)),
            Err(CodecError::TypeMismatch { .. })
        ));
        assert_eq!(
            Option::<u8>::from_value(&Value::some(3u8)).unwrap(),
            Some(3)
        );
        assert_eq!(Option::<u8>::from_value(&Value::none()).unwrap(), None);
    }
}
