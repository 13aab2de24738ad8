// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct instances with validated field access.

use crate::codec::{self, TypeCodec};
use crate::config::DecodeConfig;
use crate::cursor::Cursor;
use crate::descriptor::{StructSchema, TypeDescriptor};
use crate::error::{CodecError, Result};
use crate::value::{FromValue, Value};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An instance of a registered struct.
///
/// Every field write is checked against the field's descriptor, so an
/// instance never holds a value its schema would reject. Fields may be left
/// unset; validating or encoding an incomplete instance fails with
/// [`CodecError::MissingField`].
#[derive(Debug, Clone)]
pub struct StructValue {
    schema: Arc<StructSchema>,
    fields: Vec<Option<Value>>,
}

impl StructValue {
    /// Create an instance with every field unset.
    pub fn new(schema: &Arc<StructSchema>) -> Self {
        Self {
            schema: schema.clone(),
            fields: vec![None; schema.fields().len()],
        }
    }

    /// Create an instance from positional and named values.
    ///
    /// Positional values fill fields in declaration order. Named values fill
    /// the rest; a name that is unknown or already filled is rejected.
    pub fn construct<S, V>(
        schema: &Arc<StructSchema>,
        positional: Vec<Value>,
        named: impl IntoIterator<Item = (S, V)>,
    ) -> Result<Self>
    where
        S: AsRef<str>,
        V: Into<Value>,
    {
        let field_count = schema.fields().len();
        if positional.len() > field_count {
            return Err(CodecError::ArityMismatch {
                expected: field_count,
                found: positional.len(),
            });
        }
        let mut instance = Self::new(schema);
        for (index, value) in positional.into_iter().enumerate() {
            instance.set_at(index, value)?;
        }
        for (name, value) in named {
            let name = name.as_ref();
            match schema.field_index(name) {
                Some(index) if instance.fields[index].is_none() => {
                    instance.set_at(index, value.into())?
                }
                _ => return Err(CodecError::UnexpectedArgument(name.to_owned())),
            }
        }
        Ok(instance)
    }

    /// Create an instance from values for every field, in declaration order.
    pub fn from_values(schema: &Arc<StructSchema>, values: Vec<Value>) -> Result<Self> {
        let expected = schema.fields().len();
        if values.len() != expected {
            return Err(CodecError::ArityMismatch {
                expected,
                found: values.len(),
            });
        }
        Self::construct(schema, values, std::iter::empty::<(&str, Value)>())
    }

    /// Get the schema.
    pub fn schema(&self) -> &Arc<StructSchema> {
        &self.schema
    }

    /// Get the type name.
    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    /// Get field value by name.
    pub fn get(&self, name: &str) -> Result<&Value> {
        let index = self.index_of(name)?;
        self.fields[index]
            .as_ref()
            .ok_or_else(|| CodecError::MissingField(name.to_owned()))
    }

    /// Get a field converted to a native type.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(self.get(name)?)
    }

    /// Set field value by name. The field is unchanged if validation fails.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.index_of(name)?;
        self.set_at(index, value.into())
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.schema
            .field_index(name)
            .is_some_and(|index| self.fields[index].is_some())
    }

    pub fn is_complete(&self) -> bool {
        self.fields.iter().all(Option::is_some)
    }

    /// Iterate fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&Value>)> + '_ {
        self.schema
            .fields()
            .iter()
            .zip(&self.fields)
            .map(|(field, value)| (field.name.as_str(), value.as_ref()))
    }

    /// Encode this instance; fails with `MissingField` if any field is unset.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_fields(&mut out)?;
        Ok(out)
    }

    /// Decode an instance, requiring the whole buffer to be consumed.
    pub fn deserialize(schema: &Arc<StructSchema>, bytes: &[u8]) -> Result<Self> {
        Self::deserialize_with(schema, bytes, &DecodeConfig::default())
    }

    pub fn deserialize_with(
        schema: &Arc<StructSchema>,
        bytes: &[u8],
        config: &DecodeConfig,
    ) -> Result<Self> {
        match codec::deserialize_with(&TypeDescriptor::Struct(schema.clone()), bytes, config)? {
            Value::Struct(instance) => Ok(instance),
            other => Err(CodecError::mismatch(schema.name(), other.kind_name())),
        }
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.schema
            .field_index(name)
            .ok_or_else(|| CodecError::FieldNotFound(format!("{}.{}", self.schema.name(), name)))
    }

    fn set_at(&mut self, index: usize, value: Value) -> Result<()> {
        self.schema.fields()[index].type_desc.check_value(&value)?;
        self.fields[index] = Some(value);
        Ok(())
    }

    fn is_instance_of(&self, schema: &Arc<StructSchema>) -> bool {
        Arc::ptr_eq(&self.schema, schema) || *self.schema == **schema
    }

    fn first_unset(&self) -> Option<&str> {
        self.fields()
            .find(|(_, value)| value.is_none())
            .map(|(name, _)| name)
    }

    fn write_fields(&self, out: &mut Vec<u8>) -> Result<()> {
        for (field, value) in self.schema.fields().iter().zip(&self.fields) {
            let value = value
                .as_ref()
                .ok_or_else(|| CodecError::MissingField(field.name.clone()))?;
            field.type_desc.write(value, out)?;
        }
        Ok(())
    }
}

fn instance_of<'v>(schema: &Arc<StructSchema>, value: &'v Value) -> Result<&'v StructValue> {
    match value {
        Value::Struct(instance) if instance.is_instance_of(schema) => Ok(instance),
        Value::Struct(instance) => Err(CodecError::mismatch(schema.name(), instance.type_name())),
        other => Err(CodecError::mismatch(schema.name(), other.kind_name())),
    }
}

/// Fields were validated on assignment, so only type identity and
/// completeness remain to be checked.
pub(crate) fn check_struct(schema: &Arc<StructSchema>, value: &Value) -> Result<()> {
    match instance_of(schema, value)?.first_unset() {
        Some(name) => Err(CodecError::MissingField(name.to_owned())),
        None => Ok(()),
    }
}

pub(crate) fn write_struct(
    schema: &Arc<StructSchema>,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<()> {
    instance_of(schema, value)?.write_fields(out)
}

pub(crate) fn read_struct(
    schema: &Arc<StructSchema>,
    cursor: &mut Cursor<'_>,
    config: &DecodeConfig,
) -> Result<Value> {
    let fields = schema
        .fields()
        .iter()
        .map(|field| field.type_desc.read(cursor, config).map(Some))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Struct(StructValue {
        schema: schema.clone(),
        fields,
    }))
}

impl PartialEq for StructValue {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.fields == other.fields
    }
}

impl Eq for StructValue {}

impl PartialOrd for StructValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StructValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.schema
            .name()
            .cmp(other.schema.name())
            .then_with(|| self.fields.cmp(&other.fields))
    }
}

impl Hash for StructValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema.name().hash(state);
        self.fields.hash(state);
    }
}
