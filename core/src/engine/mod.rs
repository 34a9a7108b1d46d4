// Copyright (c) 2022-2023 The MobileCoin Foundation

//! The [Engine] provides transaction signing for hardware wallets.
//!
//! This handles [Event] inputs and returns [Output] responses to the caller,
//! see [apdu][crate::apdu] for APDU protocol / encoding specifications.

use strum::{Display, EnumIter, EnumString, EnumVariantNames};
use zeroize::Zeroizing;

mod error;
pub use error::{Error, ErrorKind};

mod event;
pub use event::Event;

mod output;
pub use output::Output;

pub mod rlp;

mod digest;
pub use digest::TxDigest;

mod custodian;
pub use custodian::{KeyCustodian, Signature, KEY_LEN};

mod tx;
pub use tx::{TxDescriptor, ADDRESS_LEN, MAX_FIELD_LEN, NUM_FIELDS};

pub use ledger_eth_apdu::{MAX_CHUNK_LEN, MAX_PATH_LEN};

/// Progress reported on confirmation
const PROGRESS_CONFIRMED: u16 = 0;

/// Progress reported once the list header is hashed
const PROGRESS_HEADER: u16 = 100;

/// Progress reported once transaction fields are hashed
const PROGRESS_FIELDS: u16 = 200;

/// Progress reported on completion
const PROGRESS_COMPLETE: u16 = 1000;

/// Engine internal state enumeration
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter)]
pub enum State {
    /// Idle state, no transaction running
    Idle,
    /// Transaction pending user confirmation
    Confirming,
    /// Hashing transaction fields
    Hashing,
    /// Waiting for further payload data
    AwaitingChunk,
    /// Computing signature
    Signing,
}

/// [`Driver`] trait provides platform support for [`Engine`] instances
pub trait Driver {
    /// Present recipient and value to the user, returning whether the
    /// transaction was approved
    fn confirm(&mut self, to: Option<&[u8; ADDRESS_LEN]>, value: &[u8]) -> bool;

    /// Report signing progress (0..=1000)
    fn progress(&mut self, _permille: u16) {}

    /// Return the UI to its idle / home presentation
    fn home(&mut self) {}

    /// BIP-0032 derivation for secp256k1 keys
    fn secp256k1_derive(&self, path: &[u32]) -> [u8; KEY_LEN];
}

impl<T: Driver> Driver for &mut T {
    fn confirm(&mut self, to: Option<&[u8; ADDRESS_LEN]>, value: &[u8]) -> bool {
        T::confirm(self, to, value)
    }

    fn progress(&mut self, permille: u16) {
        T::progress(self, permille)
    }

    fn home(&mut self) {
        T::home(self)
    }

    fn secp256k1_derive(&self, path: &[u32]) -> [u8; KEY_LEN] {
        T::secp256k1_derive(self, path)
    }
}

/// [Engine] provides hardware-independent support for signing transactions,
/// one operation at a time.
pub struct Engine<DRV: Driver> {
    state: State,

    digest: Option<TxDigest>,

    total_payload_len: usize,
    remaining_payload_len: usize,

    key: KeyCustodian,

    drv: DRV,
}

impl<DRV: Driver> Engine<DRV> {
    /// Create a new signing engine instance with the provided driver
    pub const fn new(drv: DRV) -> Self {
        Self {
            state: State::Idle,
            digest: None,
            total_payload_len: 0,
            remaining_payload_len: 0,
            key: KeyCustodian::new(),
            drv,
        }
    }

    /// Handle incoming events
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn update(&mut self, evt: &Event) -> Result<Output, Error> {
        #[cfg(feature = "log")]
        log::debug!("event: {:02x?}", evt);

        match evt {
            // Empty event, do nothing
            Event::None => Ok(Output::None),

            // Derive key and start signing
            Event::TxSign { path, tx } => {
                if self.is_active() {
                    return Err(Error::SessionActive);
                }

                let key = Zeroizing::new(self.drv.secp256k1_derive(path));

                self.init(tx, &key)
            }

            // Add payload data
            Event::TxAck { data_chunk } => self.feed_chunk(data_chunk),

            // Discard in-flight operation
            Event::TxAbort => {
                self.abort();
                Ok(Output::None)
            }
        }
    }

    /// Start signing a transaction with the provided private key,
    /// returning either a chunk request or the completed signature
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn init(&mut self, tx: &TxDescriptor, private_key: &[u8; KEY_LEN]) -> Result<Output, Error> {
        // One operation at a time, leave any in-flight operation untouched
        if self.is_active() {
            #[cfg(feature = "log")]
            log::warn!("sign init rejected, session active ({})", self.state);

            return Err(Error::SessionActive);
        }

        // Start session
        self.state = State::Confirming;
        self.digest = Some(TxDigest::start());
        self.total_payload_len = 0;
        self.remaining_payload_len = 0;

        match self.sign_init(tx, private_key) {
            Ok(v) => Ok(v),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Add a chunk of payload data to the in-flight transaction
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn feed_chunk(&mut self, chunk: &[u8]) -> Result<Output, Error> {
        // Reject chunks when not awaiting data, no session state is modified
        if self.state != State::AwaitingChunk {
            #[cfg(feature = "log")]
            log::warn!("unexpected data chunk in state {}", self.state);

            self.drv.home();
            return Err(Error::NotSigning);
        }

        match self.sign_update(chunk) {
            Ok(v) => Ok(v),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Abort any in-flight operation, wiping the key and resetting the
    /// engine to [`State::Idle`]. No-op while idle.
    pub fn abort(&mut self) {
        if !self.is_active() {
            return;
        }

        #[cfg(feature = "log")]
        log::debug!("abort (state: {})", self.state);

        self.key.wipe();
        self.digest = None;
        self.total_payload_len = 0;
        self.remaining_payload_len = 0;
        self.state = State::Idle;

        self.drv.home();
    }

    /// Fetch current engine state
    pub fn state(&self) -> State {
        self.state
    }

    /// Check whether a signing operation is in progress
    pub fn is_active(&self) -> bool {
        self.state != State::Idle
    }

    /// Fetch total payload length for the in-flight operation
    pub fn total_payload_len(&self) -> usize {
        self.total_payload_len
    }

    /// Fetch payload bytes outstanding for the in-flight operation
    pub fn remaining_payload_len(&self) -> usize {
        self.remaining_payload_len
    }

    /// Check the key buffer holds no key material
    pub fn is_key_clear(&self) -> bool {
        self.key.is_clear()
    }

    /// Fetch the engine driver
    pub fn driver(&self) -> &DRV {
        &self.drv
    }

    /// Report failure, aborting the operation
    fn fail(&mut self, e: Error) -> Error {
        #[cfg(feature = "log")]
        log::error!("signing failed in state {}: {} ({:?})", self.state, e.code(), e.kind());

        self.abort();
        e
    }

    /// Validate, confirm and hash the transaction envelope
    fn sign_init(&mut self, tx: &TxDescriptor, private_key: &[u8; KEY_LEN]) -> Result<Output, Error> {
        // Check descriptor prior to prompting the user
        tx.validate()?;

        #[cfg(feature = "log")]
        log::debug!(
            "sign init: data total {}, initial chunk {}",
            tx.data_total(),
            tx.initial_chunk().len()
        );

        // Request user confirmation
        if !self.drv.confirm(tx.recipient(), tx.value()) {
            return Err(Error::Cancelled);
        }

        self.state = State::Hashing;
        self.drv.progress(PROGRESS_CONFIRMED);

        let digest = self.digest.as_mut().ok_or(Error::InvalidState)?;
        let fields = tx.fields();

        // Compute list length from field summaries and write list header
        digest.append_header(&rlp::list_header(tx.rlp_len()?)?);

        self.drv.progress(PROGRESS_HEADER);

        // Write fields (payload header covers the full declared length,
        // with only the initial chunk available at this point)
        for (f, body) in &fields {
            digest.append_field(f, body)?;
        }

        self.drv.progress(PROGRESS_FIELDS);

        self.key.load(private_key);

        self.total_payload_len = tx.data_total();
        self.remaining_payload_len = self.total_payload_len - tx.initial_chunk().len();

        match self.remaining_payload_len {
            0 => self.finalize(),
            _ => {
                self.state = State::AwaitingChunk;
                Ok(self.chunk_request())
            }
        }
    }

    /// Apply a payload chunk
    fn sign_update(&mut self, chunk: &[u8]) -> Result<Output, Error> {
        if chunk.is_empty() {
            return Err(Error::EmptyChunk);
        }

        // Reject overruns prior to hashing
        if chunk.len() > self.remaining_payload_len {
            return Err(Error::ChunkOverrun);
        }

        let digest = self.digest.as_mut().ok_or(Error::InvalidState)?;
        digest.append(chunk);

        self.remaining_payload_len -= chunk.len();

        #[cfg(feature = "log")]
        log::debug!(
            "chunk: {} bytes, {} remaining",
            chunk.len(),
            self.remaining_payload_len
        );

        match self.remaining_payload_len {
            0 => self.finalize(),
            _ => Ok(self.chunk_request()),
        }
    }

    /// Build a chunk request for the next payload data
    fn chunk_request(&mut self) -> Output {
        self.drv.progress(compute_chunk_progress(
            self.remaining_payload_len,
            self.total_payload_len,
        ));

        Output::ChunkRequest {
            data_length: self.remaining_payload_len.min(MAX_CHUNK_LEN) as u32,
        }
    }

    /// Finalise digest and sign, returning the engine to idle
    fn finalize(&mut self) -> Result<Output, Error> {
        self.state = State::Signing;

        let digest = self.digest.take().ok_or(Error::InvalidState)?.finish();

        let sig = self.key.sign(&digest);
        self.key.wipe();

        let sig = sig?;

        self.drv.progress(PROGRESS_COMPLETE);
        self.abort();

        Ok(Output::from(sig))
    }
}

/// Compute progress while streaming payload data
fn compute_chunk_progress(remaining: usize, total: usize) -> u16 {
    // Check to avoid divide by zero
    if total == 0 {
        return PROGRESS_FIELDS;
    }

    let span = (PROGRESS_COMPLETE - PROGRESS_FIELDS) as u64;
    let v = PROGRESS_COMPLETE as u64 - span * remaining as u64 / total as u64;

    // Clamp to milestones either side of streaming
    v.clamp(PROGRESS_FIELDS as u64, PROGRESS_COMPLETE as u64) as u16
}
