// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the compiled, immutable shape of an encodable type.
//!
//! Descriptors compare structurally. Two independently compiled descriptors
//! of the same shape are equal even when they are different allocations.

use crate::error::{CodecError, Result};
use crate::registry::TypeRef;
use crate::value::Integer;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    I8,
    I16,
    I32,
    I64,
    I128,
    /// UTF-8 string, u32 length prefix.
    Str,
    /// Opaque bytes, u32 length prefix.
    Bytes,
}

impl PrimitiveKind {
    /// Get the size in bytes (None for length-prefixed kinds).
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::U8 | Self::I8 => Some(1),
            Self::U16 | Self::I16 => Some(2),
            Self::U32 | Self::I32 => Some(4),
            Self::U64 | Self::I64 => Some(8),
            Self::U128 | Self::I128 => Some(16),
            Self::Str | Self::Bytes => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self, Self::Bool | Self::Str | Self::Bytes)
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::I128
        )
    }

    /// Inclusive `(min, max)` for integer kinds.
    pub fn range(&self) -> Option<(Integer, Integer)> {
        if !self.is_integer() {
            return None;
        }
        let shift = 128 - 8 * self.size()? as u32;
        Some(if self.is_signed() {
            (
                Integer::from_i128(i128::MIN >> shift),
                Integer::from_i128(i128::MAX >> shift),
            )
        } else {
            (Integer::ZERO, Integer::from_u128(u128::MAX >> shift))
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::U8 => "Uint8",
            Self::U16 => "Uint16",
            Self::U32 => "Uint32",
            Self::U64 => "Uint64",
            Self::U128 => "Uint128",
            Self::I8 => "Int8",
            Self::I16 => "Int16",
            Self::I32 => "Int32",
            Self::I64 => "Int64",
            Self::I128 => "Int128",
            Self::Str => "Str",
            Self::Bytes => "Bytes",
        }
    }
}

/// Compiled type shape.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    FixedBytes(FixedBytesDescriptor),
    Array(ArrayDescriptor),
    Tuple(TupleDescriptor),
    Map(MapDescriptor),
    Optional(OptionalDescriptor),
    Delegate(DelegateDescriptor),
    Struct(Arc<StructSchema>),
    Enum(Arc<EnumSchema>),
    /// Named type resolved through the registry on use.
    Ref(TypeRef),
}

impl TypeDescriptor {
    pub const BOOL: Self = Self::Primitive(PrimitiveKind::Bool);
    pub const U8: Self = Self::Primitive(PrimitiveKind::U8);
    pub const U16: Self = Self::Primitive(PrimitiveKind::U16);
    pub const U32: Self = Self::Primitive(PrimitiveKind::U32);
    pub const U64: Self = Self::Primitive(PrimitiveKind::U64);
    pub const U128: Self = Self::Primitive(PrimitiveKind::U128);
    pub const I8: Self = Self::Primitive(PrimitiveKind::I8);
    pub const I16: Self = Self::Primitive(PrimitiveKind::I16);
    pub const I32: Self = Self::Primitive(PrimitiveKind::I32);
    pub const I64: Self = Self::Primitive(PrimitiveKind::I64);
    pub const I128: Self = Self::Primitive(PrimitiveKind::I128);
    pub const STR: Self = Self::Primitive(PrimitiveKind::Str);
    pub const BYTES: Self = Self::Primitive(PrimitiveKind::Bytes);

    /// Variable-length, prefixed array.
    pub fn vec(element: TypeDescriptor) -> Self {
        Self::Array(ArrayDescriptor::variable(element))
    }

    /// Fixed-length array with an explicit length prefix choice.
    pub fn array(element: TypeDescriptor, length: usize, length_prefixed: bool) -> Result<Self> {
        ArrayDescriptor::new(element, Some(length), length_prefixed).map(Self::Array)
    }

    pub fn tuple(elements: Vec<TypeDescriptor>) -> Self {
        Self::Tuple(TupleDescriptor::new(elements))
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::Map(MapDescriptor::new(key, value))
    }

    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::Optional(OptionalDescriptor::new(inner))
    }

    pub fn delegate(name: impl Into<String>, underlying: TypeDescriptor) -> Self {
        Self::Delegate(DelegateDescriptor::new(name, underlying))
    }

    pub fn fixed_bytes(length: usize, length_prefixed: bool) -> Result<Self> {
        FixedBytesDescriptor::new(length, length_prefixed).map(Self::FixedBytes)
    }

    /// Type name as shown in errors and listings.
    pub fn name(&self) -> String {
        self.to_string()
    }

    pub fn as_struct(&self) -> Option<&Arc<StructSchema>> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&Arc<EnumSchema>> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Fewest bytes any value of this type occupies on the wire.
    ///
    /// Zero for empty tuples, field-less structs and arrays of those. A `Ref`
    /// counts as zero since it is not resolved here.
    pub fn min_encoded_size(&self) -> usize {
        match self {
            Self::Primitive(kind) => kind.size().unwrap_or(LEN_PREFIX),
            Self::FixedBytes(d) => d.length().saturating_add(prefix_width(d.length_prefixed())),
            Self::Array(d) => {
                let elements = match d.fixed_length() {
                    Some(n) => n.saturating_mul(d.element_type().min_encoded_size()),
                    None => 0,
                };
                elements.saturating_add(prefix_width(d.length_prefixed()))
            }
            Self::Tuple(d) => d
                .element_types
                .iter()
                .fold(0, |acc, ty| acc.saturating_add(ty.min_encoded_size())),
            Self::Map(_) => LEN_PREFIX,
            Self::Optional(_) => 1,
            Self::Delegate(d) => d.underlying.min_encoded_size(),
            Self::Struct(schema) => schema
                .fields()
                .iter()
                .fold(0, |acc, f| acc.saturating_add(f.type_desc.min_encoded_size())),
            Self::Enum(_) => LEN_PREFIX,
            Self::Ref(_) => 0,
        }
    }
}

/// Width of a u32 length or count prefix.
const LEN_PREFIX: usize = 4;

fn prefix_width(prefixed: bool) -> usize {
    if prefixed {
        LEN_PREFIX
    } else {
        0
    }
}

impl From<PrimitiveKind> for TypeDescriptor {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl From<Arc<StructSchema>> for TypeDescriptor {
    fn from(schema: Arc<StructSchema>) -> Self {
        Self::Struct(schema)
    }
}

impl From<Arc<EnumSchema>> for TypeDescriptor {
    fn from(schema: Arc<EnumSchema>) -> Self {
        Self::Enum(schema)
    }
}

/// Homogeneous array, fixed or variable length.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    element_type: Arc<TypeDescriptor>,
    fixed_length: Option<usize>,
    length_prefixed: bool,
}

impl ArrayDescriptor {
    /// Invariants: a fixed length is > 0; an unprefixed array has a fixed length.
    pub fn new(
        element: TypeDescriptor,
        fixed_length: Option<usize>,
        length_prefixed: bool,
    ) -> Result<Self> {
        match (fixed_length, length_prefixed) {
            (Some(0), _) => Err(CodecError::InvalidSchema(
                "fixed array length must be positive".into(),
            )),
            (None, false) => Err(CodecError::InvalidSchema(
                "variable-length array must be length-prefixed".into(),
            )),
            _ => Ok(Self {
                element_type: Arc::new(element),
                fixed_length,
                length_prefixed,
            }),
        }
    }

    pub fn variable(element: TypeDescriptor) -> Self {
        Self {
            element_type: Arc::new(element),
            fixed_length: None,
            length_prefixed: true,
        }
    }

    pub fn element_type(&self) -> &TypeDescriptor {
        &self.element_type
    }

    pub fn fixed_length(&self) -> Option<usize> {
        self.fixed_length
    }

    pub fn length_prefixed(&self) -> bool {
        self.length_prefixed
    }
}

/// Byte string of exactly `length` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBytesDescriptor {
    length: usize,
    length_prefixed: bool,
}

impl FixedBytesDescriptor {
    pub fn new(length: usize, length_prefixed: bool) -> Result<Self> {
        if length == 0 {
            return Err(CodecError::InvalidSchema(
                "fixed byte string length must be positive".into(),
            ));
        }
        Ok(Self {
            length,
            length_prefixed,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn length_prefixed(&self) -> bool {
        self.length_prefixed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleDescriptor {
    pub element_types: Vec<TypeDescriptor>,
}

impl TupleDescriptor {
    pub fn new(element_types: Vec<TypeDescriptor>) -> Self {
        Self { element_types }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapDescriptor {
    pub key_type: Arc<TypeDescriptor>,
    pub value_type: Arc<TypeDescriptor>,
}

impl MapDescriptor {
    pub fn new(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self {
            key_type: Arc::new(key),
            value_type: Arc::new(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionalDescriptor {
    pub inner_type: Arc<TypeDescriptor>,
}

impl OptionalDescriptor {
    pub fn new(inner: TypeDescriptor) -> Self {
        Self {
            inner_type: Arc::new(inner),
        }
    }
}

/// Named alias; identical wire format to the underlying type.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegateDescriptor {
    pub name: String,
    pub underlying: Arc<TypeDescriptor>,
}

impl DelegateDescriptor {
    pub fn new(name: impl Into<String>, underlying: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            underlying: Arc::new(underlying),
        }
    }
}

/// Field descriptor for structs.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_desc: TypeDescriptor,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_desc: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            type_desc,
        }
    }
}

/// Named record with ordered fields. Field order is the wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructSchema {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl StructSchema {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Result<Self> {
        let name = name.into();
        let mut seen = HashSet::new();
        if let Some(dup) = fields.iter().find(|f| !seen.insert(f.name.as_str())) {
            return Err(CodecError::InvalidSchema(format!(
                "struct {} declares field {} twice",
                name, dup.name
            )));
        }
        Ok(Self { name, fields })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: String,
    /// Zero-based declaration index; also the wire tag.
    pub index: u32,
    pub payload_type: Option<TypeDescriptor>,
}

/// Closed tagged union.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    name: String,
    variants: Vec<EnumVariant>,
}

impl EnumSchema {
    /// Variant indices follow declaration order.
    pub fn new(
        name: impl Into<String>,
        variants: Vec<(String, Option<TypeDescriptor>)>,
    ) -> Result<Self> {
        let name = name.into();
        if variants.is_empty() {
            return Err(CodecError::InvalidSchema(format!(
                "enum {} declares no variants",
                name
            )));
        }
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(variants.len());
        for (index, (variant, payload_type)) in variants.into_iter().enumerate() {
            if !seen.insert(variant.clone()) {
                return Err(CodecError::InvalidSchema(format!(
                    "enum {} declares variant {} twice",
                    name, variant
                )));
            }
            let index = u32::try_from(index).map_err(|_| CodecError::LengthOverflow(index))?;
            out.push(EnumVariant {
                name: variant,
                index,
                payload_type,
            });
        }
        Ok(Self {
            name,
            variants: out,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[EnumVariant] {
        &self.variants
    }

    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn variant_at(&self, index: u32) -> Option<&EnumVariant> {
        self.variants.get(index as usize)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => f.write_str(kind.name()),
            Self::FixedBytes(d) => fmt::Display::fmt(d, f),
            Self::Array(d) => fmt::Display::fmt(d, f),
            Self::Tuple(d) => fmt::Display::fmt(d, f),
            Self::Map(d) => fmt::Display::fmt(d, f),
            Self::Optional(d) => fmt::Display::fmt(d, f),
            Self::Delegate(d) => f.write_str(&d.name),
            Self::Struct(s) => f.write_str(&s.name),
            Self::Enum(e) => f.write_str(&e.name),
            Self::Ref(r) => f.write_str(r.name()),
        }
    }
}

impl fmt::Display for ArrayDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.fixed_length, self.length_prefixed) {
            (None, _) => write!(f, "[{}]", self.element_type),
            (Some(n), true) => write!(f, "[{}; {}]", self.element_type, n),
            (Some(n), false) => write!(f, "[{}; {}, unprefixed]", self.element_type, n),
        }
    }
}

impl fmt::Display for FixedBytesDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.length_prefixed {
            write!(f, "Bytes<{}>", self.length)
        } else {
            write!(f, "Bytes<{}, unprefixed>", self.length)
        }
    }
}

impl fmt::Display for TupleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, ty) in self.element_types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", ty)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for MapDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}: {}}}", self.key_type, self.value_type)
    }
}

impl fmt::Display for OptionalDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Optional<{}>", self.inner_type)
    }
}
