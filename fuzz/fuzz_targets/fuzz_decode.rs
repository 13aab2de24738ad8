// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use canon::{deserialize_with, DecodeConfig, TypeDescriptor};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let types = [
        TypeDescriptor::STR,
        TypeDescriptor::vec(TypeDescriptor::BYTES),
        TypeDescriptor::map(TypeDescriptor::U16, TypeDescriptor::optional(TypeDescriptor::I64)),
        TypeDescriptor::tuple(vec![
            TypeDescriptor::BOOL,
            TypeDescriptor::U128,
            TypeDescriptor::STR,
        ]),
        // Zero-width elements: the count is not bounded by the input length.
        TypeDescriptor::vec(TypeDescriptor::tuple(vec![])),
        TypeDescriptor::vec(TypeDescriptor::vec(TypeDescriptor::tuple(vec![]))),
    ];
    let strict = DecodeConfig::new().with_max_length(1 << 16);
    let lenient = DecodeConfig::lenient().with_max_length(1 << 16);

    // Malformed input must produce an error, never a panic.
    for ty in &types {
        let _ = deserialize_with(ty, data, &strict);
        let _ = deserialize_with(ty, data, &lenient);
    }
});
