// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON projection of values (feature `serde`).
//!
//! One-way: the projection loses type information (bytes become hex strings,
//! wide integers become decimal strings) and is meant for display and logs.

use crate::record::StructValue;
use crate::util::to_hex;
use crate::value::{Integer, Value};
use crate::variant::EnumValue;
use serde_json::{Map, Value as Json};

impl Value {
    pub fn to_json(&self) -> Json {
        match self {
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => int_to_json(*i),
            Value::Str(s) => Json::String(s.clone()),
            Value::Bytes(b) => Json::String(to_hex(b)),
            Value::List(items) | Value::Tuple(items) => {
                Json::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (key_string(k), v.to_json()))
                    .collect(),
            ),
            Value::Optional(inner) => inner.as_deref().map_or(Json::Null, Value::to_json),
            Value::Struct(s) => s.to_json(),
            Value::Enum(e) => e.to_json(),
        }
    }
}

impl StructValue {
    /// Object keyed by field name; unset fields are `null`.
    pub fn to_json(&self) -> Json {
        Json::Object(
            self.fields()
                .map(|(name, value)| (name.to_owned(), value.map_or(Json::Null, Value::to_json)))
                .collect::<Map<_, _>>(),
        )
    }
}

impl EnumValue {
    /// `{variant: payload}`, with `null` for payload-less variants.
    pub fn to_json(&self) -> Json {
        let mut object = Map::new();
        object.insert(
            self.active_variant_name().to_owned(),
            self.payload().map_or(Json::Null, Value::to_json),
        );
        Json::Object(object)
    }
}

fn int_to_json(value: Integer) -> Json {
    if let Some(v) = value.narrow::<i64>() {
        Json::from(v)
    } else if let Some(v) = value.narrow::<u64>() {
        Json::from(v)
    } else {
        Json::String(value.to_string())
    }
}

fn key_string(key: &Value) -> String {
    match key {
        Value::Str(s) => s.clone(),
        Value::Bytes(b) => to_hex(b),
        Value::Int(i) => i.to_string(),
        other => other.to_json().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{EnumDef, StructDef};
    use crate::registry::TypeRegistry;
    use crate::schema::TypeExpr;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(Value::from(true).to_json(), json!(true));
        assert_eq!(Value::from(-5i32).to_json(), json!(-5));
        assert_eq!(Value::from(u64::MAX).to_json(), json!(u64::MAX));
        assert_eq!(
            Value::from(u128::MAX).to_json(),
            json!(u128::MAX.to_string())
        );
        assert_eq!(Value::bytes(vec![0xca, 0xfe]).to_json(), json!("cafe"));
        assert_eq!(Value::none().to_json(), Json::Null);
    }

    #[test]
    fn test_map_keys() {
        let map = Value::map([(Value::bytes(vec![1]), Value::from(2u8))]);
        assert_eq!(map.to_json(), json!({"01": 2}));
        let compound = Value::map([(Value::from(vec![1u8, 2]), Value::from("x"))]);
        assert_eq!(compound.to_json(), json!({"[1,2]": "x"}));
    }

    #[test]
    fn test_struct_and_enum() {
        let registry = TypeRegistry::new();
        let kind = registry
            .register_enum(&EnumDef::new("Kind").variant("Data", TypeExpr::BYTES).unit("Empty"))
            .unwrap();
        let msg = registry
            .register_struct(
                &StructDef::new("Msg")
                    .field("id", TypeExpr::U32)
                    .field("kind", TypeExpr::named("Kind"))
                    .field("tags", TypeExpr::vec(TypeExpr::STR)),
            )
            .unwrap();
        let data = EnumValue::new(&kind, "Data", Some(Value::bytes(vec![0xff]))).unwrap();
        let value = StructValue::new(&msg)
            .with("id", 9u32)
            .unwrap()
            .with("kind", data)
            .unwrap();
        assert_eq!(
            value.to_json(),
            json!({"id": 9, "kind": {"Data": "ff"}, "tags": null})
        );
        assert_eq!(
            EnumValue::unit(&kind, "Empty").unwrap().to_json(),
            json!({"Empty": null})
        );
    }
}
