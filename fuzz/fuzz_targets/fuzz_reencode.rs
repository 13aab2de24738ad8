// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use canon::{deserialize, serialize, EnumDef, StructDef, TypeDescriptor, TypeExpr, TypeRegistry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let registry = TypeRegistry::new();
    let Ok(_) = registry.register_enum(
        &EnumDef::new("Leaf")
            .unit("Empty")
            .variant("Data", TypeExpr::ByteArray)
            .variant("Key", TypeExpr::fixed_bytes(4, false)),
    ) else {
        return;
    };
    let Ok(tree) = registry.register_struct(
        &StructDef::new("Tree")
            .field("leaf", TypeExpr::named("Leaf"))
            .field("children", TypeExpr::map(TypeExpr::STR, TypeExpr::named("Tree"))),
    ) else {
        return;
    };
    let ty = TypeDescriptor::Struct(tree);

    // Anything accepted by the strict decoder is canonical: re-encoding
    // reproduces the input exactly.
    if let Ok(value) = deserialize(&ty, data) {
        let bytes = serialize(&ty, &value).expect("decoded value must encode");
        assert_eq!(bytes, data);
    }
});
