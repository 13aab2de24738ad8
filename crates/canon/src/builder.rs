// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent declarations for structs and enums.

use crate::descriptor::{EnumSchema, FieldDescriptor, StructSchema, TypeDescriptor};
use crate::error::Result;
use crate::schema::{SchemaCompiler, TypeExpr};

/// Declaration of a struct type.
///
/// ```
/// use canon::{StructDef, TypeExpr, TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// let stock = registry
///     .register_struct(
///         &StructDef::new("Stock")
///             .field("name", TypeExpr::STR)
///             .field("shares", TypeExpr::U32),
///     )
///     .unwrap();
/// assert_eq!(stock.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    name: String,
    fields: Vec<(String, TypeExpr)>,
}

impl StructDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field; declaration order is wire order.
    pub fn field(mut self, name: impl Into<String>, ty: impl Into<TypeExpr>) -> Self {
        self.fields.push((name.into(), ty.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn compile(&self, compiler: &SchemaCompiler<'_>) -> Result<StructSchema> {
        let fields = self
            .fields
            .iter()
            .map(|(name, ty)| -> Result<FieldDescriptor> {
                Ok(FieldDescriptor::new(name.clone(), compiler.compile(ty)?))
            })
            .collect::<Result<Vec<_>>>()?;
        StructSchema::new(self.name.clone(), fields)
    }
}

/// Declaration of a tagged enum type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    name: String,
    variants: Vec<(String, Option<TypeExpr>)>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    /// Add a variant carrying a payload.
    pub fn variant(mut self, name: impl Into<String>, payload: impl Into<TypeExpr>) -> Self {
        self.variants.push((name.into(), Some(payload.into())));
        self
    }

    /// Add a variant without payload.
    pub fn unit(mut self, name: impl Into<String>) -> Self {
        self.variants.push((name.into(), None));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn compile(&self, compiler: &SchemaCompiler<'_>) -> Result<EnumSchema> {
        let variants = self
            .variants
            .iter()
            .map(|(name, payload)| -> Result<(String, Option<TypeDescriptor>)> {
                let payload = payload.as_ref().map(|ty| compiler.compile(ty)).transpose()?;
                Ok((name.clone(), payload))
            })
            .collect::<Result<Vec<_>>>()?;
        EnumSchema::new(self.name.clone(), variants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::registry::TypeRegistry;

    #[test]
    fn test_struct_def_compiles_in_order() {
        let registry = TypeRegistry::new();
        let schema = StructDef::new("Pair")
            .field("b", TypeExpr::U64)
            .field("a", TypeExpr::ByteArray)
            .compile(&SchemaCompiler::new(&registry))
            .unwrap();
        assert_eq!(schema.name(), "Pair");
        assert_eq!(schema.fields()[0].name, "b");
        assert_eq!(schema.fields()[1].type_desc, TypeDescriptor::vec(TypeDescriptor::U8));
    }

    #[test]
    fn test_enum_def_compiles_variants() {
        let registry = TypeRegistry::new();
        let schema = EnumDef::new("Enum1")
            .variant("opt1", TypeExpr::ByteArray)
            .unit("opt2")
            .compile(&SchemaCompiler::new(&registry))
            .unwrap();
        assert_eq!(schema.variants().len(), 2);
        assert!(schema.variant("opt2").unwrap().payload_type.is_none());
    }

    #[test]
    fn test_invalid_field_type_fails() {
        let registry = TypeRegistry::new();
        let result = StructDef::new("Bad")
            .field("xs", TypeExpr::array(TypeExpr::U8, 0))
            .compile(&SchemaCompiler::new(&registry));
        assert!(matches!(result, Err(CodecError::InvalidSchema(_))));
    }
}
