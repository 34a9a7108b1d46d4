// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Ethereum hardware wallet signing core
//!
//! This provides a common [Engine][engine] supporting streaming legacy
//! transaction signing for execution on hardware wallets.
//!
//! Interactions with the [Engine][engine] are performed via [Event][engine::Event]s and [Output][engine::Output]s,
//! see [ledger_eth_apdu] for APDU objects and wire encodings.
//!
//! ## Operations
//!
//! ### Signing a transaction
//!
//! Transactions are RLP encoded and hashed (keccak256) incrementally, the
//! envelope `[nonce, gasPrice, gasLimit, to, value, data]` is never
//! materialised on the device. The payload (`data`) field may exceed a
//! single APDU and is streamed in chunks following the initial request.
//!
//! 1. Issue [`TxSign`][ledger_eth_apdu::tx::TxSign] with the derivation path,
//!    numeric fields, recipient, declared payload length and initial payload chunk
//!     1. The user is prompted to approve the recipient and value, declining
//!        returns [`Error::Cancelled`][engine::Error::Cancelled]
//!     2. Where the payload is complete a [`TxSignature`][ledger_eth_apdu::tx::TxSignature]
//!        is returned, otherwise a [`TxChunkReq`][ledger_eth_apdu::tx::TxChunkReq]
//!        requesting the next chunk
//! 2. Issue [`TxAck`][ledger_eth_apdu::tx::TxAck] with each requested chunk
//!    until a [`TxSignature`][ledger_eth_apdu::tx::TxSignature] is returned
//!
//! At any point a [`TxAbort`][ledger_eth_apdu::tx::TxAbort] discards the
//! in-flight operation. Any error also discards the operation, wiping the
//! signing key and returning the engine to idle.
//!

#![cfg_attr(not(feature = "std"), no_std)]

pub use ledger_eth_apdu::{self as apdu};

pub mod engine;
