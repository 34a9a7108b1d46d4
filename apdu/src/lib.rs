// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Protocol / APDU definitions for Ethereum transaction signing
//!
//! This module specifies the message bodies exchanged with the signing engine.
//! Outer transport framing is left to the caller, only class / instruction codes
//! and body encodings are defined here.
//!
//! Encodings are intended to be _roughly_ equivalent to packed c structures while maintaining
//! 32-bit field alignment to reduce the need for unaligned access on constrained platforms.
//! Integer fields are little-endian, transaction field contents are passed through unchanged
//! (big-endian as provided by the host).
//!
//! A signing operation consists of:
//!
//! 1. [`TxSign`][tx::TxSign] carrying the transaction fields and the first chunk of
//!    payload data, answered by either a [`TxChunkReq`][tx::TxChunkReq] or a
//!    [`TxSignature`][tx::TxSignature]
//! 2. Zero or more [`TxAck`][tx::TxAck] carrying further payload chunks, each answered
//!    by a [`TxChunkReq`][tx::TxChunkReq] until the payload is complete, then by
//!    a [`TxSignature`][tx::TxSignature]
//!
//! [`TxAbort`][tx::TxAbort] may be issued at any time to discard an in-flight operation.

#![no_std]

pub use ledger_proto::{ApduError, ApduStatic};

pub mod prelude;
pub mod tx;

mod helpers;

/// Ethereum signing APDU Class
pub const ETH_APDU_CLA: u8 = 0xe0;

/// Protocol version
pub const ETH_PROTO_VERSION: u8 = 0x01;

/// Maximum number of payload bytes requested per chunk
pub const MAX_CHUNK_LEN: usize = 1024;

/// Maximum BIP-0032 derivation path depth
pub const MAX_PATH_LEN: usize = 8;

/// Ethereum signing APDU instruction codes
#[derive(Copy, Clone, Debug, PartialEq, num_enum::TryFromPrimitive)]
#[repr(u8)]
pub enum Instruction {
    /// Start signing a transaction
    TxSign = 0x20,

    /// Provide a further chunk of payload data
    TxAck = 0x21,

    /// Abort an in-flight signing operation
    TxAbort = 0x22,
}
