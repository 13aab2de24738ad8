// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tagged enum instances.

use crate::codec::{self, TypeCodec};
use crate::config::DecodeConfig;
use crate::cursor::Cursor;
use crate::descriptor::{EnumSchema, EnumVariant, TypeDescriptor};
use crate::error::{CodecError, Result};
use crate::value::Value;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Selected variant of a registered enum plus its payload.
///
/// The variant is fixed at construction; only the payload can change, and
/// every change is validated against the selected variant's payload type.
#[derive(Debug, Clone)]
pub struct EnumValue {
    schema: Arc<EnumSchema>,
    index: u32,
    payload: Option<Box<Value>>,
}

impl EnumValue {
    /// Select a variant by name.
    pub fn new(schema: &Arc<EnumSchema>, name: &str, payload: Option<Value>) -> Result<Self> {
        let variant = schema.variant(name).ok_or_else(|| unknown_name(schema, name))?;
        Self::build(schema, variant, payload)
    }

    /// Select a payload-less variant by name.
    pub fn unit(schema: &Arc<EnumSchema>, name: &str) -> Result<Self> {
        Self::new(schema, name, None)
    }

    /// Select a variant by wire index.
    pub fn from_index(
        schema: &Arc<EnumSchema>,
        index: u32,
        payload: Option<Value>,
    ) -> Result<Self> {
        let variant = schema.variant_at(index).ok_or_else(|| unknown_index(schema, index))?;
        Self::build(schema, variant, payload)
    }

    fn build(
        schema: &Arc<EnumSchema>,
        variant: &EnumVariant,
        payload: Option<Value>,
    ) -> Result<Self> {
        check_payload(variant, payload.as_ref())?;
        Ok(Self {
            schema: schema.clone(),
            index: variant.index,
            payload: payload.map(Box::new),
        })
    }

    pub fn schema(&self) -> &Arc<EnumSchema> {
        &self.schema
    }

    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Declaration of the selected variant.
    pub fn variant(&self) -> &EnumVariant {
        // index is validated at construction against this same schema
        &self.schema.variants()[self.index as usize]
    }

    pub fn active_variant_name(&self) -> &str {
        &self.variant().name
    }

    /// True iff `name` is the selected variant; false for undeclared names.
    /// Use [`EnumValue::try_is_variant`] to catch misspelled names.
    pub fn is_variant(&self, name: &str) -> bool {
        self.active_variant_name() == name
    }

    /// Like [`EnumValue::is_variant`], but a name the schema does not declare
    /// is an `UnknownVariant` error instead of `false`.
    pub fn try_is_variant(&self, name: &str) -> Result<bool> {
        match self.schema.variant(name) {
            Some(variant) => Ok(variant.index == self.index),
            None => Err(unknown_name(&self.schema, name)),
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_deref()
    }

    /// Replace the payload. The old payload stays if validation fails.
    pub fn set_payload(&mut self, payload: Option<Value>) -> Result<()> {
        check_payload(self.variant(), payload.as_ref())?;
        self.payload = payload.map(Box::new);
        Ok(())
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Decode an instance, requiring the whole buffer to be consumed.
    pub fn deserialize(schema: &Arc<EnumSchema>, bytes: &[u8]) -> Result<Self> {
        Self::deserialize_with(schema, bytes, &DecodeConfig::default())
    }

    pub fn deserialize_with(
        schema: &Arc<EnumSchema>,
        bytes: &[u8],
        config: &DecodeConfig,
    ) -> Result<Self> {
        match codec::deserialize_with(&TypeDescriptor::Enum(schema.clone()), bytes, config)? {
            Value::Enum(instance) => Ok(instance),
            other => Err(CodecError::mismatch(schema.name(), other.kind_name())),
        }
    }

    fn is_instance_of(&self, schema: &Arc<EnumSchema>) -> bool {
        Arc::ptr_eq(&self.schema, schema) || *self.schema == **schema
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&self.index.to_le_bytes());
        match (&self.variant().payload_type, self.payload()) {
            (Some(ty), Some(payload)) => ty.write(payload, out),
            (None, None) => Ok(()),
            (_, payload) => check_payload(self.variant(), payload),
        }
    }
}

fn unknown_name(schema: &EnumSchema, name: &str) -> CodecError {
    CodecError::UnknownVariant(format!("{}::{}", schema.name(), name))
}

fn unknown_index(schema: &EnumSchema, index: u32) -> CodecError {
    CodecError::UnknownVariant(format!(
        "{} index {} (declares {})",
        schema.name(),
        index,
        schema.variants().len()
    ))
}

/// A payload is present iff the variant declares a payload type.
fn check_payload(variant: &EnumVariant, payload: Option<&Value>) -> Result<()> {
    match (&variant.payload_type, payload) {
        (Some(ty), Some(value)) => ty.check_value(value),
        (None, None) => Ok(()),
        (Some(ty), None) => Err(CodecError::mismatch(
            format!("{} payload {}", variant.name, ty),
            "no payload",
        )),
        (None, Some(value)) => Err(CodecError::mismatch(
            format!("{} without payload", variant.name),
            value.kind_name(),
        )),
    }
}

fn instance_of<'v>(schema: &Arc<EnumSchema>, value: &'v Value) -> Result<&'v EnumValue> {
    match value {
        Value::Enum(instance) if instance.is_instance_of(schema) => Ok(instance),
        Value::Enum(instance) => Err(CodecError::mismatch(schema.name(), instance.type_name())),
        other => Err(CodecError::mismatch(schema.name(), other.kind_name())),
    }
}

pub(crate) fn check_enum(schema: &Arc<EnumSchema>, value: &Value) -> Result<()> {
    let instance = instance_of(schema, value)?;
    check_payload(instance.variant(), instance.payload())
}

pub(crate) fn write_enum(schema: &Arc<EnumSchema>, value: &Value, out: &mut Vec<u8>) -> Result<()> {
    instance_of(schema, value)?.write_to(out)
}

pub(crate) fn read_enum(
    schema: &Arc<EnumSchema>,
    cursor: &mut Cursor<'_>,
    config: &DecodeConfig,
) -> Result<Value> {
    let index = cursor.read_u32_le()?;
    let variant = schema.variant_at(index).ok_or_else(|| unknown_index(schema, index))?;
    let payload = match &variant.payload_type {
        Some(ty) => Some(Box::new(ty.read(cursor, config)?)),
        None => None,
    };
    Ok(Value::Enum(EnumValue {
        schema: schema.clone(),
        index,
        payload,
    }))
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name()
            && self.index == other.index
            && self.payload == other.payload
    }
}

impl Eq for EnumValue {}

impl PartialOrd for EnumValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EnumValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.schema
            .name()
            .cmp(other.schema.name())
            .then(self.index.cmp(&other.index))
            .then_with(|| self.payload.cmp(&other.payload))
    }
}

impl Hash for EnumValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema.name().hash(state);
        self.index.hash(state);
        self.payload.hash(state);
    }
}
