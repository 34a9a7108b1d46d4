// Copyright (c) 2022-2023 The MobileCoin Foundation

use core::convert::TryFrom;

use encdec::Decode;
use heapless::Vec;

use ledger_eth_apdu::{prelude::*, ApduError, Instruction, MAX_PATH_LEN};

use super::tx::TxDescriptor;

/// [`Engine`][super::Engine] input events, typically decoded from request [APDUs][crate::apdu]
#[derive(Clone, PartialEq, Debug)]
pub enum Event<'a> {
    None,

    /// Start signing a transaction with the key at `path`
    TxSign {
        path: Vec<u32, MAX_PATH_LEN>,
        tx: TxDescriptor<'a>,
    },

    /// Further payload data
    TxAck { data_chunk: &'a [u8] },

    /// Abort any in-flight signing operation
    TxAbort,
}

/// Helper for decoding APDUs to events
fn decode_event<'a, T>(buff: &'a [u8]) -> Result<Event<'a>, ApduError>
where
    T: Decode<'a, Error = ApduError>,
    Event<'a>: From<T::Output>,
{
    T::decode(buff).map(|(v, _n)| Event::from(v))
}

impl<'a> Event<'a> {
    /// Parse an incoming APDU to engine event
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn parse(ins: u8, buff: &'a [u8]) -> Result<Self, ApduError> {
        match Instruction::try_from(ins) {
            Ok(Instruction::TxSign) => decode_event::<TxSign>(buff),
            Ok(Instruction::TxAck) => decode_event::<TxAck>(buff),
            Ok(Instruction::TxAbort) => decode_event::<TxAbort>(buff),
            Err(_) => Err(ApduError::InvalidEncoding),
        }
    }
}

impl<'a> From<TxSign<'a>> for Event<'a> {
    fn from(a: TxSign<'a>) -> Self {
        Event::TxSign {
            tx: TxDescriptor::from(&a),
            path: a.path,
        }
    }
}

impl<'a> From<TxAck<'a>> for Event<'a> {
    fn from(a: TxAck<'a>) -> Self {
        Event::TxAck {
            data_chunk: a.data_chunk,
        }
    }
}

impl<'a> From<TxAbort> for Event<'a> {
    fn from(_: TxAbort) -> Self {
        Event::TxAbort
    }
}

#[cfg(test)]
mod test {
    use encdec::Encode;
    use ledger_eth_apdu::ApduStatic;

    use super::*;

    #[test]
    fn parse_tx_sign() {
        let chunk = [0xaa; 32];

        let mut apdu = TxSign::new(&[0x8000_002c, 0x8000_003c]).unwrap();
        apdu.nonce = Some(&[0x09]);
        apdu.data_length = Some(64);
        apdu.data_initial_chunk = Some(&chunk);

        let mut buff = [0u8; 256];
        let n = apdu.encode(&mut buff).unwrap();

        let evt = Event::parse(TxSign::INS, &buff[..n]).unwrap();

        match evt {
            Event::TxSign { path, tx } => {
                assert_eq!(&path[..], &[0x8000_002c, 0x8000_003c]);
                assert_eq!(tx.nonce, Some(&[0x09][..]));
                assert_eq!(tx.gas_price, None);
                assert_eq!(tx.data_length, Some(64));
                assert_eq!(tx.initial_chunk(), &chunk[..]);
            }
            _ => panic!("unexpected event: {evt:?}"),
        }
    }

    #[test]
    fn parse_tx_ack_abort() {
        let chunk = [0x55; 100];

        let mut buff = [0u8; 256];
        let n = TxAck::new(&chunk).encode(&mut buff).unwrap();

        assert_eq!(
            Event::parse(TxAck::INS, &buff[..n]).unwrap(),
            Event::TxAck {
                data_chunk: &chunk[..]
            }
        );

        assert_eq!(Event::parse(TxAbort::INS, &[]).unwrap(), Event::TxAbort);
    }

    #[test]
    fn parse_unknown_instruction() {
        assert!(Event::parse(0x00, &[]).is_err());
    }
}
