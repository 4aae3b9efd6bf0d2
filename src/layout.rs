//! Fixed-offset binary account layouts
//!
//! One encode/decode pair per on-chain record kind. Every decode checks
//! the buffer length against the layout's exact span before touching any
//! field; multi-byte integers are little-endian and addresses are raw
//! 32-byte values. Base58 text is a presentation concern outside this
//! layer.

pub mod farm;
pub mod liquidity;
pub mod market;
pub mod spl;

use solana_sdk::pubkey::Pubkey;

use crate::errors::{ResolveError, ResolveResult};

/// Reject buffers whose length differs from a layout's fixed span
pub(crate) fn check_span(expected: usize, data: &[u8]) -> ResolveResult<()> {
    if data.len() != expected {
        return Err(ResolveError::InvalidAccountSize {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Sequential little-endian reader over a span-checked buffer.
///
/// Positions are only advanced by the typed read methods, so a decode
/// that consumes exactly its span can assert completeness at the end.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> &'a [u8] {
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        slice
    }

    pub(crate) fn read_u8(&mut self) -> u8 {
        self.take(1)[0]
    }

    pub(crate) fn read_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take(4).try_into().expect("span-checked read"))
    }

    pub(crate) fn read_u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take(8).try_into().expect("span-checked read"))
    }

    pub(crate) fn read_u128(&mut self) -> u128 {
        u128::from_le_bytes(self.take(16).try_into().expect("span-checked read"))
    }

    pub(crate) fn read_pubkey(&mut self) -> Pubkey {
        Pubkey::new_from_array(self.take(32).try_into().expect("span-checked read"))
    }

    pub(crate) fn skip(&mut self, len: usize) {
        self.pos += len;
    }

    /// Presence-flagged pubkey in the SPL `COption` wire form: a 4-byte
    /// little-endian tag followed by the 32-byte value. A zero tag means
    /// the value bytes are ignored, not zero-checked.
    pub(crate) fn read_coption_pubkey(&mut self) -> ResolveResult<Option<Pubkey>> {
        let tag = self.read_u32();
        let value = self.read_pubkey();
        match tag {
            0 => Ok(None),
            1 => Ok(Some(value)),
            other => Err(ResolveError::InvalidAccountData(format!(
                "invalid presence tag {}",
                other
            ))),
        }
    }

    /// Presence-flagged u64, same wire form as `read_coption_pubkey`
    pub(crate) fn read_coption_u64(&mut self) -> ResolveResult<Option<u64>> {
        let tag = self.read_u32();
        let value = self.read_u64();
        match tag {
            0 => Ok(None),
            1 => Ok(Some(value)),
            other => Err(ResolveError::InvalidAccountData(format!(
                "invalid presence tag {}",
                other
            ))),
        }
    }
}

/// Little-endian writer producing exactly one layout span
pub(crate) struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub(crate) fn with_span(span: usize) -> Self {
        Self {
            buf: Vec::with_capacity(span),
        }
    }

    pub(crate) fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub(crate) fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn write_u128(&mut self, value: u128) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn write_pubkey(&mut self, value: &Pubkey) {
        self.buf.extend_from_slice(value.as_ref());
    }

    pub(crate) fn write_bytes(&mut self, value: &[u8]) {
        self.buf.extend_from_slice(value);
    }

    /// Absent options encode as a zero tag plus zeroed value bytes
    pub(crate) fn write_coption_pubkey(&mut self, value: &Option<Pubkey>) {
        match value {
            Some(key) => {
                self.write_u32(1);
                self.write_pubkey(key);
            }
            None => {
                self.write_u32(0);
                self.write_pubkey(&Pubkey::default());
            }
        }
    }

    pub(crate) fn write_coption_u64(&mut self, value: &Option<u64>) {
        match value {
            Some(v) => {
                self.write_u32(1);
                self.write_u64(*v);
            }
            None => {
                self.write_u32(0);
                self.write_u64(0);
            }
        }
    }

    pub(crate) fn finish(self, span: usize) -> Vec<u8> {
        debug_assert_eq!(self.buf.len(), span, "encoded span mismatch");
        self.buf
    }
}
