// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::Encode;

use ledger_proto::ApduError;

use crate::apdu;

use super::custodian::Signature;

/// [`Engine`][super::Engine] outputs (in response to events), typically encoded to response [APDUs][crate::apdu]
#[derive(Clone, PartialEq, Debug)]
pub enum Output {
    None,

    /// Request the next chunk of payload data
    ChunkRequest { data_length: u32 },

    /// Completed transaction signature
    Signature {
        signature_v: u8,
        signature_r: [u8; 32],
        signature_s: [u8; 32],
    },
}

impl Output {
    /// Encode an [`Output`] object to a response [APDU]
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        match self {
            Output::None => Ok(0),
            Output::ChunkRequest { data_length } => {
                apdu::tx::TxChunkReq::new(*data_length).encode(buff)
            }
            Output::Signature {
                signature_v,
                signature_r,
                signature_s,
            } => apdu::tx::TxSignature::new(*signature_v, *signature_r, *signature_s).encode(buff),
        }
    }

    /// Fetch requested chunk length for chunk requests
    pub fn chunk_request(&self) -> Option<usize> {
        match self {
            Output::ChunkRequest { data_length } => Some(*data_length as usize),
            _ => None,
        }
    }

    /// Check whether this output completes a signing operation
    pub fn is_signature(&self) -> bool {
        matches!(self, Output::Signature { .. })
    }
}

impl From<Signature> for Output {
    fn from(s: Signature) -> Self {
        Output::Signature {
            signature_v: s.v(),
            signature_r: s.r,
            signature_s: s.s,
        }
    }
}
