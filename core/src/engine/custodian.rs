// Copyright (c) 2022-2023 The MobileCoin Foundation

use k256::ecdsa::SigningKey;
use zeroize::Zeroize;

use super::Error;

/// Private key length
pub const KEY_LEN: usize = 32;

/// Recoverable secp256k1 signature
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    /// Recovery id (0 or 1)
    pub recovery_id: u8,
}

impl Signature {
    /// Signature `v` value as sent on the wire
    pub fn v(&self) -> u8 {
        self.recovery_id + 27
    }
}

/// Key custodian, holds the signing key for the duration of a single
/// signing operation.
///
/// The custodian is the only reader of the key buffer, which is
/// zeroized on [`KeyCustodian::wipe`] and on drop.
pub struct KeyCustodian {
    key: [u8; KEY_LEN],
}

impl Default for KeyCustodian {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyCustodian {
    /// Create an empty custodian
    pub const fn new() -> Self {
        Self { key: [0u8; KEY_LEN] }
    }

    /// Load a private key
    pub fn load(&mut self, key: &[u8; KEY_LEN]) {
        self.key.copy_from_slice(key);
    }

    /// Sign a 32-byte digest with the loaded key
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn sign(&self, digest: &[u8; 32]) -> Result<Signature, Error> {
        // Intermediate key is zeroized on drop
        let signing_key = SigningKey::from_slice(&self.key).map_err(|_| Error::SignFailed)?;

        let (sig, recovery_id) = signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|_| Error::SignFailed)?;

        let b = sig.to_bytes();

        let mut r = [0u8; 32];
        r.copy_from_slice(&b[..32]);
        let mut s = [0u8; 32];
        s.copy_from_slice(&b[32..]);

        Ok(Signature {
            r,
            s,
            recovery_id: recovery_id.to_byte(),
        })
    }

    /// Erase the key
    pub fn wipe(&mut self) {
        self.key.zeroize();
    }

    /// Check whether the key buffer is empty
    pub fn is_clear(&self) -> bool {
        self.key.iter().all(|b| *b == 0)
    }
}

impl Drop for KeyCustodian {
    fn drop(&mut self) {
        self.wipe();
    }
}

#[cfg(test)]
mod test {
    use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
    use sha3::{Digest, Keccak256};

    use super::*;

    const KEY: [u8; 32] = [
        0x4c, 0x08, 0x83, 0xa6, 0x91, 0x02, 0x93, 0x7d, 0x62, 0x31, 0x47, 0x1b, 0x5d, 0xbb, 0x62,
        0x04, 0xfe, 0x51, 0x29, 0x61, 0x70, 0x82, 0x79, 0x2a, 0xe4, 0x68, 0xd0, 0x1a, 0x3f, 0x36,
        0x23, 0x18,
    ];

    #[test]
    fn load_sign_wipe() {
        let mut c = KeyCustodian::new();
        assert!(c.is_clear());

        c.load(&KEY);
        assert!(!c.is_clear());

        let digest: [u8; 32] = Keccak256::digest(b"custodian").into();
        let sig = c.sign(&digest).unwrap();

        c.wipe();
        assert!(c.is_clear());

        assert!(sig.recovery_id <= 1);
        assert!(sig.v() == 27 || sig.v() == 28);

        // Recover public key from signature
        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(&sig.r);
        rs[32..].copy_from_slice(&sig.s);

        let recovered = VerifyingKey::recover_from_prehash(
            &digest,
            &EcdsaSignature::from_slice(&rs).unwrap(),
            RecoveryId::from_byte(sig.recovery_id).unwrap(),
        )
        .unwrap();

        let expected = SigningKey::from_slice(&KEY).unwrap();
        assert_eq!(&recovered, expected.verifying_key());
    }

    #[test]
    fn deterministic() {
        let mut c = KeyCustodian::new();
        c.load(&KEY);

        let digest = [0xab; 32];
        assert_eq!(c.sign(&digest), c.sign(&digest));
    }

    #[test]
    fn degenerate_key() {
        let c = KeyCustodian::new();
        assert_eq!(c.sign(&[0xab; 32]), Err(Error::SignFailed));
    }
}
