// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction signing APDUs
//!
//! See [ledger_eth_core::engine] for interaction and state machines

use encdec::{Decode, Encode};
use ledger_proto::ApduStatic;

use crate::{helpers::arr, ApduError, Instruction, ETH_APDU_CLA};

mod sign;
pub use sign::*;

/// Payload chunk APDU, supplies the next piece of transaction data
/// in response to a [`TxChunkReq`]
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |           CHUNK_LEN           |           RESERVED            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          DATA_CHUNK                           /
/// /                       (variable length)                       /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct TxAck<'a> {
    /// Payload bytes, in order
    pub data_chunk: &'a [u8],
}

impl<'a> ApduStatic for TxAck<'a> {
    const CLA: u8 = ETH_APDU_CLA;
    const INS: u8 = Instruction::TxAck as u8;
}

impl<'a> TxAck<'a> {
    pub fn new(data_chunk: &'a [u8]) -> Self {
        Self { data_chunk }
    }
}

impl<'a> Encode for TxAck<'a> {
    type Error = ApduError;

    /// Encode a [`TxAck`] APDU into the provided buffer
    #[inline]
    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let d = self.data_chunk;

        if d.len() > u16::MAX as usize || buff.len() < d.len() + 4 {
            return Err(ApduError::InvalidLength);
        }

        let mut index = 0;

        // Write chunk length and padding
        index += (d.len() as u16).encode(&mut buff[index..])?;
        buff[index..][..2].fill(0);
        index += 2;

        buff[index..][..d.len()].copy_from_slice(d);
        index += d.len();

        Ok(index)
    }

    #[inline]
    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(4 + self.data_chunk.len())
    }
}

impl<'a> Decode<'a> for TxAck<'a> {
    type Output = Self;
    type Error = ApduError;

    /// Decode a [`TxAck`] APDU from the provided buffer
    #[inline]
    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        let mut index = 0;

        let (l, n) = u16::decode(&buff[index..])?;
        index += n + 2;

        let l = l as usize;
        if buff.len() < index + l {
            return Err(ApduError::InvalidLength);
        }

        let data_chunk = &buff[index..][..l];
        index += l;

        Ok((Self { data_chunk }, index))
    }
}

/// Abort an in-flight signing operation (0 length APDU)
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxAbort;

impl ApduStatic for TxAbort {
    const CLA: u8 = ETH_APDU_CLA;
    const INS: u8 = Instruction::TxAbort as u8;
}

/// Chunk request response APDU, asks the host for the next
/// `data_length` bytes of payload via [`TxAck`].
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          DATA_LENGTH                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxChunkReq {
    /// Requested byte count (at most [`MAX_CHUNK_LEN`][crate::MAX_CHUNK_LEN])
    pub data_length: u32,
}

impl TxChunkReq {
    pub fn new(data_length: u32) -> Self {
        Self { data_length }
    }
}

/// Signature response APDU, returned once the full transaction
/// has been hashed and signed.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  SIGNATURE_V  |                    RESERVED                   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          SIGNATURE_R                          /
/// /                         (32 bytes, BE)                        /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          SIGNATURE_S                          /
/// /                         (32 bytes, BE)                        /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxSignature {
    /// Recovery id + 27
    pub signature_v: u8,

    /// Reserved for future use (maintains 32-bit field alignment)
    #[encdec(with = "arr")]
    reserved: [u8; 3],

    #[encdec(with = "arr")]
    pub signature_r: [u8; 32],

    #[encdec(with = "arr")]
    pub signature_s: [u8; 32],
}

impl TxSignature {
    pub fn new(signature_v: u8, signature_r: [u8; 32], signature_s: [u8; 32]) -> Self {
        Self {
            signature_v,
            reserved: [0u8; 3],
            signature_r,
            signature_s,
        }
    }
}
