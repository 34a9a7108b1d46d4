// Copyright (c) 2022-2023 The MobileCoin Foundation

use ledger_eth_apdu::tx::TxSign;

use super::rlp::{list_header, EncodedField, MAX_RLP_LEN};
use super::Error;

/// Maximum length for numeric fields (nonce, gas price, gas limit, value)
pub const MAX_FIELD_LEN: usize = 32;

/// Recipient address length
pub const ADDRESS_LEN: usize = 20;

/// Number of fields in the transaction envelope
pub const NUM_FIELDS: usize = 6;

/// Outgoing transaction description.
///
/// Absent fields encode as the empty string. Where `data_length` is provided
/// the payload is streamed, with `data_initial_chunk` carrying the first bytes
/// and the remainder supplied in later chunks. A payload without a declared
/// length is complete in `data_initial_chunk`.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TxDescriptor<'a> {
    pub nonce: Option<&'a [u8]>,
    pub gas_price: Option<&'a [u8]>,
    pub gas_limit: Option<&'a [u8]>,
    pub to: Option<&'a [u8]>,
    pub value: Option<&'a [u8]>,
    pub data_length: Option<u32>,
    pub data_initial_chunk: Option<&'a [u8]>,
}

impl<'a> TxDescriptor<'a> {
    /// Check descriptor is structurally well-formed
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(total) = self.data_length {
            let chunk = self.initial_chunk();

            if total == 0 {
                return Err(Error::InvalidDataLength);
            }
            if chunk.is_empty() {
                return Err(Error::MissingInitialChunk);
            }
            if chunk.len() > total as usize {
                return Err(Error::InitialChunkTooLarge);
            }
        }

        let numeric = [self.nonce, self.gas_price, self.gas_limit, self.value];
        if numeric.iter().flatten().any(|f| f.len() > MAX_FIELD_LEN) {
            return Err(Error::FieldTooLong);
        }

        match self.to.map(|t| t.len()) {
            None | Some(0) | Some(ADDRESS_LEN) => (),
            _ => return Err(Error::InvalidRecipient),
        }

        if self.data_total() > MAX_RLP_LEN {
            return Err(Error::LengthOverflow);
        }

        // Ensure the full envelope fits the encoder
        list_header(self.rlp_len()?)?;

        Ok(())
    }

    /// Initial payload bytes (empty if absent)
    pub fn initial_chunk(&self) -> &'a [u8] {
        self.data_initial_chunk.unwrap_or(&[])
    }

    /// Total payload length, declared or supplied
    pub fn data_total(&self) -> usize {
        match self.data_length {
            Some(n) => n as usize,
            None => self.initial_chunk().len(),
        }
    }

    /// Recipient address, if set
    pub fn recipient(&self) -> Option<&'a [u8; ADDRESS_LEN]> {
        self.to.and_then(|t| t.try_into().ok())
    }

    /// Transaction value (big-endian, empty if absent)
    pub fn value(&self) -> &'a [u8] {
        self.value.unwrap_or(&[])
    }

    /// Field summaries and the body bytes on hand, in envelope order
    pub fn fields(&self) -> [(EncodedField, &'a [u8]); NUM_FIELDS] {
        let f = |v: Option<&'a [u8]>| match v {
            Some(d) => (EncodedField::of(d), d),
            None => (EncodedField::EMPTY, &[][..]),
        };

        let chunk = self.initial_chunk();
        let data = match self.data_total() {
            0 => (EncodedField::EMPTY, &[][..]),
            len => (
                EncodedField {
                    len,
                    first: chunk.first().copied(),
                },
                chunk,
            ),
        };

        [
            f(self.nonce),
            f(self.gas_price),
            f(self.gas_limit),
            f(self.to),
            f(self.value),
            data,
        ]
    }

    /// Compute encoded list content length
    pub fn rlp_len(&self) -> Result<usize, Error> {
        let mut n = 0;
        for (f, _) in self.fields() {
            n += f.encoded_len()?;
        }
        Ok(n)
    }
}

impl<'a> From<&TxSign<'a>> for TxDescriptor<'a> {
    fn from(a: &TxSign<'a>) -> Self {
        Self {
            nonce: a.nonce,
            gas_price: a.gas_price,
            gas_limit: a.gas_limit,
            to: a.to,
            value: a.value,
            data_length: a.data_length,
            data_initial_chunk: a.data_initial_chunk,
        }
    }
}
