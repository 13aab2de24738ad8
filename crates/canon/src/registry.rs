// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named-type registry.
//!
//! Structs, enums and aliases are compiled once, when they are registered,
//! and served from the registry afterwards. Registering the same definition
//! again returns the already compiled descriptor; a different definition
//! under a taken name is rejected.
//!
//! Names referenced before they are registered compile to a [`TypeRef`],
//! resolved by name on every use. A `TypeRef` holds the registry weakly, so
//! a self-referential struct never keeps its registry alive.

use crate::builder::{EnumDef, StructDef};
use crate::descriptor::{EnumSchema, StructSchema, TypeDescriptor};
use crate::error::{CodecError, Result};
use crate::schema::{SchemaCompiler, TypeExpr};
use parking_lot::RwLock;
use std::collections::hash_map::{Entry, HashMap};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();

#[derive(Debug, Clone, PartialEq)]
enum Definition {
    Struct(StructDef),
    Enum(EnumDef),
    Alias(TypeExpr),
}

impl Definition {
    fn kind(&self) -> &'static str {
        match self {
            Self::Struct(_) => "struct",
            Self::Enum(_) => "enum",
            Self::Alias(_) => "alias",
        }
    }
}

struct Registered {
    definition: Definition,
    descriptor: TypeDescriptor,
}

#[derive(Default)]
pub(crate) struct RegistryInner {
    types: RwLock<HashMap<String, Registered>>,
}

impl RegistryInner {
    fn lookup(&self, name: &str) -> Option<TypeDescriptor> {
        self.types.read().get(name).map(|r| r.descriptor.clone())
    }
}

/// Registry of named types. Cloning shares the same registry.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    inner: Arc<RegistryInner>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry.
    pub fn global() -> &'static TypeRegistry {
        GLOBAL.get_or_init(TypeRegistry::new)
    }

    pub fn register_struct(&self, def: &StructDef) -> Result<Arc<StructSchema>> {
        match self.register(def.name(), Definition::Struct(def.clone()))? {
            TypeDescriptor::Struct(schema) => Ok(schema),
            _ => Err(CodecError::DuplicateType(def.name().to_owned())),
        }
    }

    pub fn register_enum(&self, def: &EnumDef) -> Result<Arc<EnumSchema>> {
        match self.register(def.name(), Definition::Enum(def.clone()))? {
            TypeDescriptor::Enum(schema) => Ok(schema),
            _ => Err(CodecError::DuplicateType(def.name().to_owned())),
        }
    }

    /// Register a named alias with the wire format of `target`.
    pub fn register_alias(&self, name: &str, target: TypeExpr) -> Result<TypeDescriptor> {
        self.register(name, Definition::Alias(target))
    }

    pub fn get(&self, name: &str) -> Option<TypeDescriptor> {
        self.inner.lookup(name)
    }

    pub fn struct_schema(&self, name: &str) -> Option<Arc<StructSchema>> {
        match self.get(name)? {
            TypeDescriptor::Struct(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn enum_schema(&self, name: &str) -> Option<Arc<EnumSchema>> {
        match self.get(name)? {
            TypeDescriptor::Enum(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.types.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.inner.types.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Lazy handle to `name`, registered or not.
    pub fn reference(&self, name: &str) -> TypeRef {
        TypeRef {
            name: name.into(),
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Compile an ad hoc type expression against this registry.
    pub fn compile(&self, expr: &TypeExpr) -> Result<TypeDescriptor> {
        SchemaCompiler::new(self).compile(expr)
    }

    fn register(&self, name: &str, definition: Definition) -> Result<TypeDescriptor> {
        // Fast path: already registered, nothing to compile.
        if let Some(existing) = self.inner.types.read().get(name) {
            return Self::reuse(name, existing, &definition);
        }

        // Compile without holding the lock: compilation looks up other names.
        let descriptor = self.compile_definition(name, &definition)?;

        let mut types = self.inner.types.write();
        match types.entry(name.to_owned()) {
            // Lost a race with an identical (or conflicting) registration.
            Entry::Occupied(slot) => Self::reuse(name, slot.get(), &definition),
            Entry::Vacant(slot) => {
                log::debug!(
                    "[registry] registered {} {} as {}",
                    definition.kind(),
                    name,
                    descriptor
                );
                let registered = slot.insert(Registered {
                    definition,
                    descriptor,
                });
                Ok(registered.descriptor.clone())
            }
        }
    }

    fn reuse(name: &str, existing: &Registered, definition: &Definition) -> Result<TypeDescriptor> {
        if existing.definition == *definition {
            Ok(existing.descriptor.clone())
        } else {
            log::warn!(
                "[registry] rejected {} {}: name already registered as {}",
                definition.kind(),
                name,
                existing.definition.kind()
            );
            Err(CodecError::DuplicateType(name.to_owned()))
        }
    }

    fn compile_definition(&self, name: &str, definition: &Definition) -> Result<TypeDescriptor> {
        let compiler = SchemaCompiler::new(self);
        Ok(match definition {
            Definition::Struct(def) => TypeDescriptor::Struct(Arc::new(def.compile(&compiler)?)),
            Definition::Enum(def) => TypeDescriptor::Enum(Arc::new(def.compile(&compiler)?)),
            Definition::Alias(target) => {
                let underlying = compiler.compile(target)?;
                if self.alias_chain_reaches(name, &underlying) {
                    return Err(CodecError::InvalidSchema(format!(
                        "alias {} refers to itself",
                        name
                    )));
                }
                TypeDescriptor::delegate(name, underlying)
            }
        })
    }

    /// Follow the delegate/reference chain starting at `target` and report
    /// whether it leads back to `name`. Such an alias has no wire form.
    fn alias_chain_reaches(&self, name: &str, target: &TypeDescriptor) -> bool {
        let mut visited = HashSet::new();
        let mut current = target.clone();
        loop {
            current = match &current {
                TypeDescriptor::Delegate(d) if d.name == name => return true,
                TypeDescriptor::Delegate(d) => (*d.underlying).clone(),
                TypeDescriptor::Ref(r) if r.name() == name => return true,
                TypeDescriptor::Ref(r) => {
                    if !visited.insert(r.name().to_owned()) {
                        return false;
                    }
                    match self.inner.lookup(r.name()) {
                        Some(next) => next,
                        None => return false,
                    }
                }
                _ => return false,
            };
        }
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}

/// By-name handle to a registered type, resolved on use.
#[derive(Clone)]
pub struct TypeRef {
    name: Arc<str>,
    registry: Weak<RegistryInner>,
}

impl TypeRef {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current descriptor for the name; fails if it was never registered
    /// or the registry has been dropped.
    pub fn resolve(&self) -> Result<TypeDescriptor> {
        self.registry
            .upgrade()
            .and_then(|inner| inner.lookup(&self.name))
            .ok_or_else(|| CodecError::UnresolvedType(self.name.to_string()))
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{deserialize, serialize};
    use crate::record::StructValue;
    use crate::value::Value;

    fn stock_def() -> StructDef {
        StructDef::new("Stock")
            .field("name", TypeExpr::STR)
            .field("shares", TypeExpr::U32)
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        let schema = registry.register_struct(&stock_def()).unwrap();
        assert!(registry.contains("Stock"));
        assert_eq!(registry.len(), 1);
        let again = registry.struct_schema("Stock").unwrap();
        assert!(Arc::ptr_eq(&schema, &again));
        assert!(registry.enum_schema("Stock").is_none());
    }

    #[test]
    fn test_reregistration_is_idempotent() {
        let registry = TypeRegistry::new();
        let first = registry.register_struct(&stock_def()).unwrap();
        let second = registry.register_struct(&stock_def()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_conflicting_definition_rejected() {
        let registry = TypeRegistry::new();
        registry.register_struct(&stock_def()).unwrap();
        let changed = StructDef::new("Stock").field("name", TypeExpr::STR);
        assert_eq!(
            registry.register_struct(&changed),
            Err(CodecError::DuplicateType("Stock".into()))
        );
        let as_enum = EnumDef::new("Stock").unit("A");
        assert_eq!(
            registry.register_enum(&as_enum),
            Err(CodecError::DuplicateType("Stock".into()))
        );
    }

    #[test]
    fn test_failed_compile_registers_nothing() {
        let registry = TypeRegistry::new();
        let bad = StructDef::new("Bad").field("xs", TypeExpr::array(TypeExpr::U8, 0));
        assert!(registry.register_struct(&bad).is_err());
        assert!(!registry.contains("Bad"));
    }

    #[test]
    fn test_self_reference_resolves_after_registration() {
        let registry = TypeRegistry::new();
        let node = registry
            .register_struct(
                &StructDef::new("Node")
                    .field("value", TypeExpr::U8)
                    .field("next", TypeExpr::optional(TypeExpr::named("Node"))),
            )
            .unwrap();
        let leaf = StructValue::from_values(&node, vec![Value::from(2u8), Value::none()]).unwrap();
        let head =
            StructValue::from_values(&node, vec![Value::from(1u8), Value::some(leaf)]).unwrap();
        let ty = TypeDescriptor::Struct(node);
        let bytes = serialize(&ty, &Value::Struct(head.clone())).unwrap();
        assert_eq!(bytes, vec![1, 1, 2, 0]);
        assert_eq!(deserialize(&ty, &bytes).unwrap(), Value::Struct(head));
    }

    #[test]
    fn test_forward_reference() {
        let registry = TypeRegistry::new();
        let outer = registry
            .register_struct(&StructDef::new("Outer").field("inner", TypeExpr::named("Inner")))
            .unwrap();
        let field = &outer.fields()[0].type_desc;
        assert!(matches!(field, TypeDescriptor::Ref(_)));
        assert!(matches!(
            serialize(field, &Value::from(1u8)),
            Err(CodecError::UnresolvedType(_))
        ));
        registry
            .register_struct(&StructDef::new("Inner").field("x", TypeExpr::U8))
            .unwrap();
        let TypeDescriptor::Ref(r) = field else {
            unreachable!()
        };
        assert!(matches!(r.resolve().unwrap(), TypeDescriptor::Struct(_)));
    }

    #[test]
    fn test_alias() {
        let registry = TypeRegistry::new();
        let address = registry
            .register_alias("Address", TypeExpr::array_unprefixed(TypeExpr::U8, 4))
            .unwrap();
        assert_eq!(address.to_string(), "Address");
        assert_eq!(registry.compile(&TypeExpr::named("Address")).unwrap(), address);
        assert!(matches!(
            registry.register_alias("Loop", TypeExpr::named("Loop")),
            Err(CodecError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_alias_cycle_rejected() {
        let registry = TypeRegistry::new();
        registry.register_alias("A", TypeExpr::named("B")).unwrap();
        assert!(matches!(
            registry.register_alias("B", TypeExpr::named("A")),
            Err(CodecError::InvalidSchema(_))
        ));
        assert!(!registry.contains("B"));

        // Longer chains close the same way.
        registry.register_alias("C", TypeExpr::named("D")).unwrap();
        registry.register_alias("D", TypeExpr::named("E")).unwrap();
        assert!(matches!(
            registry.register_alias("E", TypeExpr::optional(TypeExpr::named("C"))),
            Ok(_)
        ));
        let cyclic = TypeRegistry::new();
        cyclic.register_alias("C", TypeExpr::named("D")).unwrap();
        cyclic.register_alias("D", TypeExpr::named("E")).unwrap();
        assert!(matches!(
            cyclic.register_alias("E", TypeExpr::named("C")),
            Err(CodecError::InvalidSchema(_))
        ));

        // A dangling alias stays unresolved rather than recursing.
        let a = registry.get("A").unwrap();
        assert!(matches!(
            crate::codec::check_value(&a, &Value::from(1u8)),
            Err(CodecError::UnresolvedType(_))
        ));
    }

    #[test]
    fn test_reference_outlives_registry() {
        let registry = TypeRegistry::new();
        let r = registry.reference("Gone");
        drop(registry);
        assert_eq!(r.resolve(), Err(CodecError::UnresolvedType("Gone".into())));
    }

    #[test]
    fn test_names_sorted() {
        let registry = TypeRegistry::new();
        registry.register_enum(&EnumDef::new("B").unit("x")).unwrap();
        registry.register_struct(&StructDef::new("A")).unwrap();
        assert_eq!(registry.names(), vec!["A".to_string(), "B".to_string()]);
    }
}
