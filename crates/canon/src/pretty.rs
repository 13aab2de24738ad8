// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Human-readable rendering of values.
//!
//! Scalars and flat collections print on one line; anything containing a
//! struct, nested collection or payload-carrying enum breaks across lines
//! with two-space indentation.

use crate::record::StructValue;
use crate::util::to_hex;
use crate::value::Value;
use crate::variant::EnumValue;
use std::collections::BTreeMap;
use std::fmt::{self, Formatter};

const INDENT: &str = "  ";

impl fmt::Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_value(f, self, 0)
    }
}

impl fmt::Display for StructValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_struct(f, self, 0)
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_enum(f, self, 0)
    }
}

fn pad(f: &mut Formatter<'_>, level: usize) -> fmt::Result {
    (0..level).try_for_each(|_| f.write_str(INDENT))
}

fn is_flat(value: &Value) -> bool {
    match value {
        Value::Bool(_) | Value::Int(_) | Value::Str(_) | Value::Bytes(_) => true,
        Value::Optional(inner) => inner.as_deref().map_or(true, is_flat),
        Value::Enum(e) => e.payload().is_none(),
        _ => false,
    }
}

fn write_value(f: &mut Formatter<'_>, value: &Value, level: usize) -> fmt::Result {
    match value {
        Value::Bool(b) => write!(f, "{}", b),
        Value::Int(i) => write!(f, "{}", i),
        Value::Str(s) => write!(f, "{:?}", s),
        Value::Bytes(b) => write!(f, "0x{}", to_hex(b)),
        Value::List(items) => write_seq(f, ("[", "]"), items, level),
        Value::Tuple(items) => write_seq(f, ("(", ")"), items, level),
        Value::Map(entries) => write_map(f, entries, level),
        Value::Optional(None) => f.write_str("None"),
        Value::Optional(Some(inner)) => {
            f.write_str("Some(")?;
            write_value(f, inner, level)?;
            f.write_str(")")
        }
        Value::Struct(s) => write_struct(f, s, level),
        Value::Enum(e) => write_enum(f, e, level),
    }
}

fn write_seq(
    f: &mut Formatter<'_>,
    (open, close): (&str, &str),
    items: &[Value],
    level: usize,
) -> fmt::Result {
    if items.iter().all(is_flat) {
        f.write_str(open)?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_value(f, item, level)?;
        }
        return f.write_str(close);
    }
    writeln!(f, "{}", open)?;
    for item in items {
        pad(f, level + 1)?;
        write_value(f, item, level + 1)?;
        writeln!(f, ",")?;
    }
    pad(f, level)?;
    f.write_str(close)
}

fn write_map(f: &mut Formatter<'_>, entries: &BTreeMap<Value, Value>, level: usize) -> fmt::Result {
    if entries.iter().all(|(k, v)| is_flat(k) && is_flat(v)) {
        f.write_str("{")?;
        for (i, (k, v)) in entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_value(f, k, level)?;
            f.write_str(": ")?;
            write_value(f, v, level)?;
        }
        return f.write_str("}");
    }
    f.write_str("{\n")?;
    for (k, v) in entries {
        pad(f, level + 1)?;
        write_value(f, k, level + 1)?;
        f.write_str(": ")?;
        write_value(f, v, level + 1)?;
        f.write_str(",\n")?;
    }
    pad(f, level)?;
    f.write_str("}")
}

fn write_struct(f: &mut Formatter<'_>, value: &StructValue, level: usize) -> fmt::Result {
    if value.schema().fields().is_empty() {
        return write!(f, "{} {{}}", value.type_name());
    }
    writeln!(f, "{} {{", value.type_name())?;
    for (name, field) in value.fields() {
        pad(f, level + 1)?;
        write!(f, "{}: ", name)?;
        match field {
            Some(v) => write_value(f, v, level + 1)?,
            None => f.write_str("<unset>")?,
        }
        writeln!(f, ",")?;
    }
    pad(f, level)?;
    f.write_str("}")
}

fn write_enum(f: &mut Formatter<'_>, value: &EnumValue, level: usize) -> fmt::Result {
    write!(f, "{}::{}", value.type_name(), value.active_variant_name())?;
    if let Some(payload) = value.payload() {
        f.write_str("(")?;
        write_value(f, payload, level)?;
        f.write_str(")")?;
    }
    Ok(())
}
