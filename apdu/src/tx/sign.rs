// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::{Decode, Encode};
use heapless::Vec;
use ledger_proto::ApduStatic;

use crate::{
    helpers::{read_field, write_field},
    ApduError, Instruction, ETH_APDU_CLA, MAX_PATH_LEN,
};

bitflags::bitflags! {
    /// Field presence flags for [`TxSign`] requests
    pub struct TxSignFlags: u8 {
        const HAS_NONCE = 1 << 0;
        const HAS_GAS_PRICE = 1 << 1;
        const HAS_GAS_LIMIT = 1 << 2;
        const HAS_TO = 1 << 3;
        const HAS_VALUE = 1 << 4;
        const HAS_DATA_LENGTH = 1 << 5;
        const HAS_DATA_INITIAL_CHUNK = 1 << 6;
    }
}

/// Fixed header length for [`TxSign`] (prior to path and fields)
const HEADER_LEN: usize = 16;

/// Transaction signing request APDU, starts a signing operation.
///
/// Each transaction field may be absent (flag clear, zero length) or present
/// (flag set) with the field contents passed through unchanged.
/// `DATA_LENGTH` declares the total payload length where this exceeds the
/// initial chunk, with the remainder streamed via [`TxAck`][super::TxAck].
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   PATH_LEN    |     FLAGS     |           CHUNK_LEN           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          DATA_LENGTH                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   NONCE_LEN   | GAS_PRICE_LEN | GAS_LIMIT_LEN |    TO_LEN     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   VALUE_LEN   |                    RESERVED                   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                   PATH (PATH_LEN x u32)                       /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /     NONCE | GAS_PRICE | GAS_LIMIT | TO | VALUE | DATA_CHUNK   /
/// /                       (variable length)                       /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TxSign<'a> {
    /// BIP-0032 derivation path for the signing key
    pub path: Vec<u32, MAX_PATH_LEN>,

    pub nonce: Option<&'a [u8]>,
    pub gas_price: Option<&'a [u8]>,
    pub gas_limit: Option<&'a [u8]>,
    /// Recipient address (empty for contract creation)
    pub to: Option<&'a [u8]>,
    pub value: Option<&'a [u8]>,

    /// Total payload length, where this is declared
    pub data_length: Option<u32>,
    /// First chunk of payload data
    pub data_initial_chunk: Option<&'a [u8]>,
}

impl<'a> ApduStatic for TxSign<'a> {
    const CLA: u8 = ETH_APDU_CLA;
    const INS: u8 = Instruction::TxSign as u8;
}

impl<'a> TxSign<'a> {
    /// Create a new [`TxSign`] request for the provided derivation path
    pub fn new(path: &[u32]) -> Result<Self, ApduError> {
        let path = Vec::from_slice(path).map_err(|_| ApduError::InvalidLength)?;

        Ok(Self {
            path,
            ..Default::default()
        })
    }

    /// Compute presence flags for this request
    pub fn flags(&self) -> TxSignFlags {
        let mut f = TxSignFlags::empty();

        f.set(TxSignFlags::HAS_NONCE, self.nonce.is_some());
        f.set(TxSignFlags::HAS_GAS_PRICE, self.gas_price.is_some());
        f.set(TxSignFlags::HAS_GAS_LIMIT, self.gas_limit.is_some());
        f.set(TxSignFlags::HAS_TO, self.to.is_some());
        f.set(TxSignFlags::HAS_VALUE, self.value.is_some());
        f.set(TxSignFlags::HAS_DATA_LENGTH, self.data_length.is_some());
        f.set(
            TxSignFlags::HAS_DATA_INITIAL_CHUNK,
            self.data_initial_chunk.is_some(),
        );

        f
    }

    fn short_fields(&self) -> [Option<&'a [u8]>; 5] {
        [self.nonce, self.gas_price, self.gas_limit, self.to, self.value]
    }
}

impl<'a> Encode for TxSign<'a> {
    type Error = ApduError;

    /// Encode a [`TxSign`] APDU into the provided buffer
    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let fields = self.short_fields();
        let chunk = self.data_initial_chunk.unwrap_or(&[]);

        // Check field lengths fit their length prefixes
        if fields.iter().flatten().any(|f| f.len() > u8::MAX as usize)
            || chunk.len() > u16::MAX as usize
        {
            return Err(ApduError::InvalidLength);
        }

        // Check buffer length is valid
        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        let mut index = 0;

        buff[index] = self.path.len() as u8;
        buff[index + 1] = self.flags().bits();
        index += 2;

        index += (chunk.len() as u16).encode(&mut buff[index..])?;
        index += self.data_length.unwrap_or(0).encode(&mut buff[index..])?;

        // Write field lengths and padding
        for f in fields {
            buff[index] = f.map(|v| v.len()).unwrap_or(0) as u8;
            index += 1;
        }
        buff[index..][..3].fill(0);
        index += 3;

        for p in self.path.iter() {
            index += p.encode(&mut buff[index..])?;
        }

        for f in fields {
            write_field(buff, &mut index, f);
        }
        write_field(buff, &mut index, self.data_initial_chunk);

        Ok(index)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        let fields: usize = self.short_fields().iter().flatten().map(|f| f.len()).sum();
        let chunk = self.data_initial_chunk.map(|c| c.len()).unwrap_or(0);

        Ok(HEADER_LEN + self.path.len() * 4 + fields + chunk)
    }
}

impl<'a> Decode<'a> for TxSign<'a> {
    type Output = Self;
    type Error = ApduError;

    /// Decode a [`TxSign`] APDU from the provided buffer
    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        // Check header length
        if buff.len() < HEADER_LEN {
            return Err(ApduError::InvalidLength);
        }

        let mut index = 0;

        let path_len = buff[index] as usize;
        let flags = TxSignFlags::from_bits(buff[index + 1]).ok_or(ApduError::InvalidEncoding)?;
        index += 2;

        if path_len > MAX_PATH_LEN {
            return Err(ApduError::InvalidLength);
        }

        let (chunk_len, n) = u16::decode(&buff[index..])?;
        index += n;

        let (data_length, n) = u32::decode(&buff[index..])?;
        index += n;

        let mut lens = [0usize; 5];
        for l in lens.iter_mut() {
            *l = buff[index] as usize;
            index += 1;
        }
        index += 3;

        // Check path fits the remaining buffer
        if buff.len() < index + path_len * 4 {
            return Err(ApduError::InvalidLength);
        }

        let mut path = Vec::new();
        for _ in 0..path_len {
            let (p, n) = u32::decode(&buff[index..])?;
            index += n;

            path.push(p).map_err(|_| ApduError::InvalidLength)?;
        }

        let nonce = read_field(buff, &mut index, lens[0], flags.contains(TxSignFlags::HAS_NONCE))?;
        let gas_price = read_field(
            buff,
            &mut index,
            lens[1],
            flags.contains(TxSignFlags::HAS_GAS_PRICE),
        )?;
        let gas_limit = read_field(
            buff,
            &mut index,
            lens[2],
            flags.contains(TxSignFlags::HAS_GAS_LIMIT),
        )?;
        let to = read_field(buff, &mut index, lens[3], flags.contains(TxSignFlags::HAS_TO))?;
        let value = read_field(buff, &mut index, lens[4], flags.contains(TxSignFlags::HAS_VALUE))?;
        let data_initial_chunk = read_field(
            buff,
            &mut index,
            chunk_len as usize,
            flags.contains(TxSignFlags::HAS_DATA_INITIAL_CHUNK),
        )?;

        let data_length = match flags.contains(TxSignFlags::HAS_DATA_LENGTH) {
            true => Some(data_length),
            false => None,
        };

        Ok((
            Self {
                path,
                nonce,
                gas_price,
                gas_limit,
                to,
                value,
                data_length,
                data_initial_chunk,
            },
            index,
        ))
    }
}
