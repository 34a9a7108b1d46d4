// Copyright (c) 2022-2023 The MobileCoin Foundation

use sha3::{Digest, Keccak256};

use super::rlp::{EncodedField, Header};
use super::Error;

/// Streaming transaction digest, accumulates the canonical encoding
/// of a transaction as it arrives.
///
/// [`TxDigest::finish`] consumes the accumulator, so no data may be
/// appended once the digest has been computed.
#[derive(Clone)]
pub struct TxDigest {
    ctx: Keccak256,
}

impl core::fmt::Debug for TxDigest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TxDigest(..)")
    }
}

impl TxDigest {
    /// Start a new (empty) transaction digest
    pub fn start() -> Self {
        Self {
            ctx: Keccak256::new(),
        }
    }

    /// Append raw bytes to the digest
    pub fn append(&mut self, d: &[u8]) {
        self.ctx.update(d);
    }

    /// Append a computed header
    pub fn append_header(&mut self, h: &Header) {
        self.ctx.update(h.as_bytes());
    }

    /// Append an encoded field header and the portion of the body on hand
    pub fn append_field(&mut self, f: &EncodedField, body: &[u8]) -> Result<(), Error> {
        let h = f.header()?;

        self.append_header(&h);
        if h.has_body() {
            self.ctx.update(body);
        }

        Ok(())
    }

    /// Finalise the digest
    pub fn finish(self) -> [u8; 32] {
        self.ctx.finalize().into()
    }
}
