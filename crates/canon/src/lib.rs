// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical binary serialization driven by runtime type schemas.
//!
//! A value is encoded by walking a [`TypeDescriptor`] tree, so the bytes
//! depend only on the logical value: map entries are sorted by their encoded
//! keys, integers are fixed-width little-endian, and there is no padding or
//! framing beyond explicit length prefixes. The output is suitable as input
//! to hashing and signing.
//!
//! # Example
//!
//! ```
//! use canon::{EnumDef, EnumValue, StructDef, StructValue, TypeExpr, TypeRegistry, Value};
//!
//! let registry = TypeRegistry::new();
//! let kind = registry
//!     .register_enum(&EnumDef::new("Kind").variant("Data", TypeExpr::ByteArray).unit("Empty"))
//!     .unwrap();
//! let msg = registry
//!     .register_struct(
//!         &StructDef::new("Msg")
//!             .field("id", TypeExpr::U64)
//!             .field("kind", TypeExpr::named("Kind")),
//!     )
//!     .unwrap();
//!
//! let mut value = StructValue::new(&msg);
//! value.set("id", 7u64).unwrap();
//! value.set("kind", EnumValue::unit(&kind, "Empty").unwrap()).unwrap();
//!
//! let bytes = value.serialize().unwrap();
//! assert_eq!(bytes, [7, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0]);
//! assert_eq!(StructValue::deserialize(&msg, &bytes).unwrap(), value);
//! ```
//!
//! # Modules
//!
//! - [`descriptor`]: compiled type shapes
//! - [`codec`]: the [`TypeCodec`] protocol and top-level entry points
//! - [`schema`] / [`builder`]: type expressions and struct/enum declarations
//! - [`registry`]: named types, compiled once per name
//! - [`record`] / [`variant`]: struct and enum instances

pub mod builder;
pub mod codec;
pub mod config;
pub mod cursor;
pub mod descriptor;
pub mod error;
#[cfg(feature = "serde")]
pub mod json;
mod pretty;
pub mod record;
pub mod registry;
pub mod schema;
pub mod util;
pub mod value;
pub mod variant;


pub use builder::{EnumDef, StructDef};
pub use codec::{check_value, deserialize, deserialize_with, serialize, TypeCodec};
pub use config::{DecodeConfig, MapOrder};
pub use cursor::Cursor;
pub use descriptor::{
    ArrayDescriptor, DelegateDescriptor, EnumSchema, EnumVariant, FieldDescriptor,
    FixedBytesDescriptor, MapDescriptor, OptionalDescriptor, PrimitiveKind, StructSchema,
    TupleDescriptor, TypeDescriptor,
};
pub use error::{CodecError, Result};
pub use record::StructValue;
pub use registry::{TypeRef, TypeRegistry};
pub use schema::{SchemaCompiler, TypeExpr};
pub use value::{FromValue, Integer, Value};
pub use variant::EnumValue;
