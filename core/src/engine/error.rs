// Copyright (c) 2022-2023 The MobileCoin Foundation

/// [Engine][super::Engine] errors
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
#[repr(u8)]
pub enum Error {
    /// Declared data length is zero
    #[cfg_attr(feature = "thiserror", error("Invalid data length provided"))]
    InvalidDataLength = 0x00,

    /// Declared data length without an initial chunk
    #[cfg_attr(feature = "thiserror", error("Data length provided, but no initial chunk"))]
    MissingInitialChunk = 0x01,

    /// Initial chunk exceeds declared data length
    #[cfg_attr(feature = "thiserror", error("Invalid size of initial chunk"))]
    InitialChunkTooLarge = 0x02,

    /// Empty chunk while further data is expected
    #[cfg_attr(feature = "thiserror", error("Empty data chunk received"))]
    EmptyChunk = 0x03,

    /// Chunk exceeds remaining data length
    #[cfg_attr(feature = "thiserror", error("Data chunk exceeds remaining length"))]
    ChunkOverrun = 0x04,

    /// Numeric field exceeds 32 bytes
    #[cfg_attr(feature = "thiserror", error("Transaction field too long"))]
    FieldTooLong = 0x05,

    /// Recipient is neither empty nor a 20-byte address
    #[cfg_attr(feature = "thiserror", error("Invalid recipient address length"))]
    InvalidRecipient = 0x06,

    /// Encoded length exceeds encoder capacity (16 MiB)
    #[cfg_attr(feature = "thiserror", error("Encoded length exceeds capacity"))]
    LengthOverflow = 0x07,

    /// User declined the transaction
    #[cfg_attr(feature = "thiserror", error("Signing cancelled by user"))]
    Cancelled = 0x10,

    /// Chunk received with no signing operation awaiting data
    #[cfg_attr(feature = "thiserror", error("Not in signing mode"))]
    NotSigning = 0x20,

    /// Signing requested while an operation is in progress
    #[cfg_attr(feature = "thiserror", error("Signing operation already in progress"))]
    SessionActive = 0x21,

    /// Invalid engine state
    #[cfg_attr(feature = "thiserror", error("Invalid engine state"))]
    InvalidState = 0x22,

    /// Signature primitive failed (degenerate key)
    #[cfg_attr(feature = "thiserror", error("Signing failed"))]
    SignFailed = 0x30,
}

/// Failure classes reported alongside [Error] codes
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// Malformed transaction or chunk
    InvalidInput,
    /// User declined confirmation
    Cancelled,
    /// Request not valid in the current engine state
    ProtocolError,
    /// Signature primitive failure
    SigningFailure,
}

impl Error {
    /// Fetch the failure class for an error
    pub fn kind(&self) -> ErrorKind {
        use Error::*;

        match self {
            InvalidDataLength | MissingInitialChunk | InitialChunkTooLarge | EmptyChunk
            | ChunkOverrun | FieldTooLong | InvalidRecipient | LengthOverflow => {
                ErrorKind::InvalidInput
            }
            Cancelled => ErrorKind::Cancelled,
            NotSigning | SessionActive | InvalidState => ErrorKind::ProtocolError,
            SignFailed => ErrorKind::SigningFailure,
        }
    }

    /// Fetch the wire code for an error
    pub fn code(&self) -> u8 {
        *self as u8
    }
}
