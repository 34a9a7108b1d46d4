#![allow(unused)]

use std::fmt::Debug;

use encdec::{Decode, Encode};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use log::{debug, trace};
use sha3::{Digest, Keccak256};

use ledger_eth_core::{
    apdu::{tx::TxSignature, ApduError, ApduStatic},
    engine::{Driver, Engine, Error, Event, Output, ADDRESS_LEN, KEY_LEN},
};

/// Standard BIP-0044 ethereum path
pub const PATH: [u32; 5] = [0x8000_002c, 0x8000_003c, 0x8000_0000, 0, 0];

/// Driver implementation for test use, recording UI interactions
#[derive(Debug, Default)]
pub struct TestDriver {
    pub decline: bool,
    pub prompts: Vec<(Option<[u8; ADDRESS_LEN]>, Vec<u8>)>,
    pub progress: Vec<u16>,
    pub homes: usize,
}

impl TestDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declining() -> Self {
        Self {
            decline: true,
            ..Default::default()
        }
    }
}

impl Driver for TestDriver {
    fn confirm(&mut self, to: Option<&[u8; ADDRESS_LEN]>, value: &[u8]) -> bool {
        debug!("confirm to: {:02x?} value: {:02x?}", to, value);

        self.prompts.push((to.copied(), value.to_vec()));
        !self.decline
    }

    fn progress(&mut self, permille: u16) {
        trace!("progress: {permille}");
        self.progress.push(permille);
    }

    fn home(&mut self) {
        self.homes += 1;
    }

    fn secp256k1_derive(&self, path: &[u32]) -> [u8; KEY_LEN] {
        derive_key(path)
    }
}

/// Deterministic (test only) path to key mapping
pub fn derive_key(path: &[u32]) -> [u8; KEY_LEN] {
    let mut h = Keccak256::new();
    for p in path {
        h.update(p.to_le_bytes());
    }
    h.finalize().into()
}

/// Public key for a given derivation path
pub fn public_key(path: &[u32]) -> VerifyingKey {
    VerifyingKey::from(&SigningKey::from_slice(&derive_key(path)).unwrap())
}

pub fn setup_logging() {
    let _ = simplelog::SimpleLogger::init(log::LevelFilter::Debug, Default::default());
}

/// Exchange a command APDU with the engine, returning the engine output
/// and the encoded response length
pub fn exchange<C>(
    engine: &mut Engine<TestDriver>,
    cmd: &C,
    buff: &mut [u8],
) -> Result<(Output, usize), Error>
where
    C: Encode<Error = ApduError> + ApduStatic + Debug,
{
    debug!("cmd: {:?}", cmd);

    // Encode command to APDU
    let n = cmd.encode(buff).unwrap();

    trace!("encoded: {:02x?}", &buff[..n]);

    // Decode APDU to event
    let evt = match Event::parse(C::INS, &buff[..n]) {
        Ok(v) => v,
        Err(e) => {
            panic!("Decode failed with {:?} for: {:02x?}", e, &buff[..n]);
        }
    };

    // Handle event
    let r = engine.update(&evt)?;

    // Encode output to response APDU
    let n = r.encode(buff).unwrap();

    debug!("resp: {:?} ({} bytes)", r, n);

    Ok((r, n))
}

/// Recover the signing key from a signature response APDU
pub fn recover(digest: &[u8], resp: &[u8]) -> VerifyingKey {
    let (s, _) = TxSignature::decode(resp).unwrap();

    assert!(s.signature_v == 27 || s.signature_v == 28);

    let mut rs = [0u8; 64];
    rs[..32].copy_from_slice(&s.signature_r);
    rs[32..].copy_from_slice(&s.signature_s);

    VerifyingKey::recover_from_prehash(
        digest,
        &Signature::from_slice(&rs).unwrap(),
        RecoveryId::from_byte(s.signature_v - 27).unwrap(),
    )
    .unwrap()
}

/// Reference RLP string encoding
pub fn rlp_string(d: &[u8]) -> Vec<u8> {
    match d {
        [0x00] => vec![0x80],
        [b] if *b < 0x80 => vec![*b],
        _ => {
            let mut v = rlp_prefix(d.len(), 0x80);
            v.extend_from_slice(d);
            v
        }
    }
}

/// Reference RLP list encoding
pub fn rlp_list(items: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = items.iter().flatten().copied().collect();

    let mut v = rlp_prefix(body.len(), 0xc0);
    v.extend_from_slice(&body);
    v
}

fn rlp_prefix(len: usize, offset: u8) -> Vec<u8> {
    if len <= 55 {
        return vec![offset + len as u8];
    }

    let be = (len as u64).to_be_bytes();
    let skip = be.iter().take_while(|b| **b == 0).count();

    let mut v = vec![offset + 55 + (8 - skip) as u8];
    v.extend_from_slice(&be[skip..]);
    v
}

/// Keccak256 digest helper
pub fn keccak(d: &[u8]) -> [u8; 32] {
    Keccak256::digest(d).into()
}
