// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Forward-only read cursor over an encoded buffer.

use crate::error::{CodecError, Result};

/// Generate little-endian read methods for fixed-width integers.
///
/// Each generated method borrows exactly `$size` bytes through
/// [`Cursor::read_bytes`], so bounds checking lives in one place.
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> Result<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.read_bytes($size)?);
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Read-only cursor for decoding (bounds-checked, zero-copy).
///
/// A cursor never moves backward and is consumed by a single decode call.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    impl_read_le!(read_u8, u8, 1);
    impl_read_le!(read_u16_le, u16, 2);
    impl_read_le!(read_u32_le, u32, 4);
    impl_read_le!(read_u64_le, u64, 8);
    impl_read_le!(read_u128_le, u128, 16);
    impl_read_le!(read_i8, i8, 1);
    impl_read_le!(read_i16_le, i16, 2);
    impl_read_le!(read_i32_le, i32, 4);
    impl_read_le!(read_i64_le, i64, 8);
    impl_read_le!(read_i128_le, i128, 16);

    /// Return the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(n)?;
        self.offset += n;
        Ok(bytes)
    }

    /// Return the next `n` bytes without advancing.
    pub fn peek_bytes(&self, n: usize) -> Result<&'a [u8]> {
        match self.offset.checked_add(n) {
            Some(end) if end <= self.buffer.len() => Ok(&self.buffer[self.offset..end]),
            _ => Err(CodecError::BufferUnderrun {
                offset: self.offset,
                need: n,
                have: self.remaining(),
            }),
        }
    }

    /// Bytes consumed since `start`, which must be an earlier [`offset`](Self::offset).
    pub(crate) fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.buffer[start.min(self.offset)..self.offset]
    }

    pub fn is_finished(&self) -> bool {
        self.offset == self.buffer.len()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }
}
