// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative type expressions and their compilation into descriptors.

use crate::descriptor::{
    ArrayDescriptor, FixedBytesDescriptor, MapDescriptor, OptionalDescriptor, PrimitiveKind,
    TupleDescriptor, TypeDescriptor,
};
use crate::error::Result;
use crate::registry::TypeRegistry;

/// Type expression as written in a struct or enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Primitive(PrimitiveKind),
    /// Empty list form: variable-length `Uint8` array.
    ByteArray,
    Array {
        element: Box<TypeExpr>,
        fixed_length: Option<usize>,
        length_prefixed: bool,
    },
    /// Empty map form: `Bytes` keys to `Uint8` array values.
    RawMap,
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Tuple(Vec<TypeExpr>),
    Optional(Box<TypeExpr>),
    FixedBytes {
        length: usize,
        length_prefixed: bool,
    },
    /// Named alias with the wire format of `target`.
    Alias {
        name: String,
        target: Box<TypeExpr>,
    },
    /// Registered struct, enum or alias, possibly not registered yet.
    Named(String),
    /// Already compiled; passes through unchanged.
    Compiled(TypeDescriptor),
}

impl TypeExpr {
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

    /// `[T]`: variable length, prefixed.
    pub fn vec(element: impl Into<TypeExpr>) -> Self {
        Self::Array {
            element: Box::new(element.into()),
            fixed_length: None,
            length_prefixed: true,
        }
    }

    /// `[T; N]`: fixed length, prefixed.
    pub fn array(element: impl Into<TypeExpr>, length: usize) -> Self {
        Self::Array {
            element: Box::new(element.into()),
            fixed_length: Some(length),
            length_prefixed: true,
        }
    }

    /// Fixed length with no count on the wire.
    pub fn array_unprefixed(element: impl Into<TypeExpr>, length: usize) -> Self {
        Self::Array {
            element: Box::new(element.into()),
            fixed_length: Some(length),
            length_prefixed: false,
        }
    }

    pub fn map(key: impl Into<TypeExpr>, value: impl Into<TypeExpr>) -> Self {
        Self::Map {
            key: Box::new(key.into()),
            value: Box::new(value.into()),
        }
    }

    pub fn tuple(elements: Vec<TypeExpr>) -> Self {
        Self::Tuple(elements)
    }

    pub fn optional(inner: impl Into<TypeExpr>) -> Self {
        Self::Optional(Box::new(inner.into()))
    }

    pub fn fixed_bytes(length: usize, length_prefixed: bool) -> Self {
        Self::FixedBytes {
            length,
            length_prefixed,
        }
    }

    pub fn alias(name: impl Into<String>, target: impl Into<TypeExpr>) -> Self {
        Self::Alias {
            name: name.into(),
            target: Box::new(target.into()),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl From<PrimitiveKind> for TypeExpr {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl From<TypeDescriptor> for TypeExpr {
    fn from(descriptor: TypeDescriptor) -> Self {
        Self::Compiled(descriptor)
    }
}

/// Compiles [`TypeExpr`] trees, resolving names against a registry.
#[derive(Debug, Clone, Copy)]
pub struct SchemaCompiler<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> SchemaCompiler<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self { registry }
    }

    /// A name that is not registered yet compiles to a lazy reference,
    /// which is how a struct refers to itself.
    pub fn compile(&self, expr: &TypeExpr) -> Result<TypeDescriptor> {
        Ok(match expr {
            TypeExpr::Primitive(kind) => TypeDescriptor::Primitive(*kind),
            TypeExpr::ByteArray => TypeDescriptor::vec(TypeDescriptor::U8),
            TypeExpr::Array {
                element,
                fixed_length,
                length_prefixed,
            } => TypeDescriptor::Array(ArrayDescriptor::new(
                self.compile(element)?,
                *fixed_length,
                *length_prefixed,
            )?),
            TypeExpr::RawMap => TypeDescriptor::Map(MapDescriptor::new(
                TypeDescriptor::BYTES,
                TypeDescriptor::vec(TypeDescriptor::U8),
            )),
            TypeExpr::Map { key, value } => {
                TypeDescriptor::Map(MapDescriptor::new(self.compile(key)?, self.compile(value)?))
            }
            TypeExpr::Tuple(elements) => TypeDescriptor::Tuple(TupleDescriptor::new(
                elements
                    .iter()
                    .map(|e| self.compile(e))
                    .collect::<Result<_>>()?,
            )),
            TypeExpr::Optional(inner) => {
                TypeDescriptor::Optional(OptionalDescriptor::new(self.compile(inner)?))
            }
            TypeExpr::FixedBytes {
                length,
                length_prefixed,
            } => TypeDescriptor::FixedBytes(FixedBytesDescriptor::new(*length, *length_prefixed)?),
            TypeExpr::Alias { name, target } => {
                TypeDescriptor::delegate(name.clone(), self.compile(target)?)
            }
            TypeExpr::Named(name) => self
                .registry
                .get(name)
                .unwrap_or_else(|| TypeDescriptor::Ref(self.registry.reference(name))),
            TypeExpr::Compiled(descriptor) => descriptor.clone(),
        })
    }
}
