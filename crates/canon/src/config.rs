// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode policy knobs.
//!
//! Single source of truth for decoder limits. Encoding has no knobs: the
//! canonical form is a pure function of the value.

use crate::error::{CodecError, Result};

/// Ceiling applied to every decoded u32 length or count prefix.
pub const DEFAULT_MAX_LENGTH: usize = u32::MAX as usize;

/// Nesting ceiling for struct, enum and named-type descent while decoding.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Ceiling on the element count of an array whose elements occupy no bytes
/// (empty tuples, field-less structs). Such counts are not bounded by input size.
pub const DEFAULT_MAX_EMPTY_ITEMS: usize = 1 << 16;

/// How a decoder treats map entries that are not in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MapOrder {
    /// Keys must be strictly ascending by encoded bytes.
    #[default]
    Strict,
    /// Any key order is accepted.
    Lenient,
}

/// Decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecodeConfig {
    /// Reject input that is not fully consumed.
    pub strict: bool,
    pub map_order: MapOrder,
    pub max_length: usize,
    pub max_depth: usize,
    pub max_empty_items: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    depth: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            strict: true,
            map_order: MapOrder::Strict,
            max_length: DEFAULT_MAX_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
            max_empty_items: DEFAULT_MAX_EMPTY_ITEMS,
            depth: 0,
        }
    }
}

impl DecodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept non-canonical map order and trailing input.
    pub fn lenient() -> Self {
        Self {
            strict: false,
            map_order: MapOrder::Lenient,
            ..Self::default()
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_map_order(mut self, map_order: MapOrder) -> Self {
        self.map_order = map_order;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_empty_items(mut self, max_empty_items: usize) -> Self {
        self.max_empty_items = max_empty_items;
        self
    }

    /// Copy of this config one nesting level deeper.
    pub(crate) fn descend(&self) -> Result<Self> {
        if self.depth >= self.max_depth {
            return Err(CodecError::DepthLimitExceeded(self.max_depth));
        }
        Ok(Self {
            depth: self.depth + 1,
            ..*self
        })
    }

    pub(crate) fn check_length(&self, found: usize) -> Result<usize> {
        if found > self.max_length {
            return Err(CodecError::LengthLimitExceeded {
                found,
                max: self.max_length,
            });
        }
        Ok(found)
    }
}
