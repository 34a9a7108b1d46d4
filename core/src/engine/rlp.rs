// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Canonical (RLP) length header encoding.
//!
//! Headers are computed from an [EncodedField] summary (length and first byte)
//! so field bodies need never be buffered. The same [Header] is used both to
//! count encoded lengths and to emit bytes, so the two cannot disagree.

use super::Error;

/// Maximum encodable content length (3-byte length prefix)
pub const MAX_RLP_LEN: usize = 0xFF_FFFF;

/// Header base for byte strings
const STRING_OFFSET: u8 = 0x80;

/// Header base for lists
const LIST_OFFSET: u8 = 0xc0;

/// Maximum content length for single byte headers
const SHORT_MAX: usize = 55;

/// Computed RLP header
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Header {
    buff: [u8; 4],
    len: usize,
    body: bool,
}

impl Header {
    /// Header bytes, emitted prior to the body
    pub fn as_bytes(&self) -> &[u8] {
        &self.buff[..self.len]
    }

    /// Whether the field body follows the header
    /// (false where the header alone encodes the field)
    pub fn has_body(&self) -> bool {
        self.body
    }

    /// Total header + body length for content of `content_len` bytes
    pub fn encoded_len(&self, content_len: usize) -> usize {
        match self.body {
            true => self.len + content_len,
            false => self.len,
        }
    }
}

/// Compute the header for a byte string of `len` bytes, where `first` is the
/// first byte of the string (if any)
pub fn string_header(len: usize, first: Option<u8>) -> Result<Header, Error> {
    match (len, first) {
        // Zero byte encodes as the empty string
        (1, Some(0x00)) => Ok(Header {
            buff: [STRING_OFFSET, 0, 0, 0],
            len: 1,
            body: false,
        }),
        // Single bytes below 0x80 are their own encoding
        (1, Some(b)) if b <= 0x7f => Ok(Header {
            buff: [0u8; 4],
            len: 0,
            body: true,
        }),
        _ => tiered(len, STRING_OFFSET),
    }
}

/// Compute the header for a list with `len` bytes of encoded content
pub fn list_header(len: usize) -> Result<Header, Error> {
    tiered(len, LIST_OFFSET)
}

fn tiered(len: usize, offset: u8) -> Result<Header, Error> {
    let mut buff = [0u8; 4];

    if len <= SHORT_MAX {
        buff[0] = offset + len as u8;
        return Ok(Header {
            buff,
            len: 1,
            body: true,
        });
    }

    let n = match len {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=MAX_RLP_LEN => 3,
        _ => return Err(Error::LengthOverflow),
    };

    let be = (len as u32).to_be_bytes();

    buff[0] = offset + SHORT_MAX as u8 + n as u8;
    buff[1..][..n].copy_from_slice(&be[4 - n..]);

    Ok(Header {
        buff,
        len: 1 + n,
        body: true,
    })
}

/// (length, first byte) summary of a string field, sufficient to compute
/// its header without touching the body
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct EncodedField {
    pub len: usize,
    pub first: Option<u8>,
}

impl EncodedField {
    /// Empty / absent field, encodes as `0x80`
    pub const EMPTY: Self = Self {
        len: 0,
        first: None,
    };

    /// Summarise a complete field
    pub fn of(d: &[u8]) -> Self {
        Self {
            len: d.len(),
            first: d.first().copied(),
        }
    }

    /// Compute the field header
    pub fn header(&self) -> Result<Header, Error> {
        string_header(self.len, self.first)
    }

    /// Compute encoded (header + body) length
    pub fn encoded_len(&self) -> Result<usize, Error> {
        self.header().map(|h| h.encoded_len(self.len))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TIER_LENS: &[usize] = &[
        0, 1, 2, 55, 56, 57, 0xFF, 0x100, 0x101, 0xFFFF, 0x1_0000, 0x1_0001, MAX_RLP_LEN,
    ];

    #[test]
    fn single_byte_fields() {
        // Zero encodes as the empty string, no body
        let h = string_header(1, Some(0x00)).unwrap();
        assert_eq!(h.as_bytes(), &[0x80]);
        assert!(!h.has_body());
        assert_eq!(h.encoded_len(1), 1);

        // Low bytes are their own encoding
        for b in [0x01, 0x42, 0x7f] {
            let h = string_header(1, Some(b)).unwrap();
            assert_eq!(h.as_bytes(), &[] as &[u8]);
            assert!(h.has_body());
            assert_eq!(h.encoded_len(1), 1);
        }

        // High bytes require a length prefix
        for b in [0x80, 0xab, 0xff] {
            let h = string_header(1, Some(b)).unwrap();
            assert_eq!(h.as_bytes(), &[0x81]);
            assert!(h.has_body());
            assert_eq!(h.encoded_len(1), 2);
        }
    }

    #[test]
    fn string_tiers() {
        let tests: &[(usize, &[u8])] = &[
            (0, &[0x80]),
            (2, &[0x82]),
            (20, &[0x94]),
            (55, &[0xb7]),
            (56, &[0xb8, 0x38]),
            (0xFF, &[0xb8, 0xff]),
            (0x100, &[0xb9, 0x01, 0x00]),
            (2048, &[0xb9, 0x08, 0x00]),
            (0xFFFF, &[0xb9, 0xff, 0xff]),
            (0x1_0000, &[0xba, 0x01, 0x00, 0x00]),
            (MAX_RLP_LEN, &[0xba, 0xff, 0xff, 0xff]),
        ];

        for (len, expected) in tests {
            let h = string_header(*len, Some(0xaa)).unwrap();
            assert_eq!(h.as_bytes(), *expected, "header mismatch for length {len}");
        }
    }

    #[test]
    fn list_tiers() {
        let tests: &[(usize, &[u8])] = &[
            (0, &[0xc0]),
            (1, &[0xc1]),
            (6, &[0xc6]),
            (55, &[0xf7]),
            (56, &[0xf8, 0x38]),
            (0x100, &[0xf9, 0x01, 0x00]),
            (0x1_0000, &[0xfa, 0x01, 0x00, 0x00]),
        ];

        for (len, expected) in tests {
            let h = list_header(*len).unwrap();
            assert_eq!(h.as_bytes(), *expected, "list header mismatch for length {len}");
            assert!(h.has_body());
        }
    }

    #[test]
    fn capacity_limit() {
        assert_eq!(
            string_header(MAX_RLP_LEN + 1, Some(0xaa)),
            Err(Error::LengthOverflow)
        );
        assert_eq!(list_header(MAX_RLP_LEN + 1), Err(Error::LengthOverflow));
        assert_eq!(list_header(usize::MAX), Err(Error::LengthOverflow));
    }

    /// Counted lengths must match emitted lengths on every tier
    #[test]
    fn counted_matches_emitted() {
        for len in TIER_LENS {
            for first in [None, Some(0x00), Some(0x01), Some(0x7f), Some(0x80), Some(0xff)] {
                let f = EncodedField { len: *len, first };

                let counted = f.encoded_len().unwrap();

                let h = f.header().unwrap();
                let emitted = h.as_bytes().len() + if h.has_body() { *len } else { 0 };

                assert_eq!(counted, emitted, "length mismatch for {f:?}");
            }
        }
    }

    #[test]
    fn empty_field() {
        assert_eq!(EncodedField::of(&[]), EncodedField::EMPTY);
        assert_eq!(EncodedField::EMPTY.header().unwrap().as_bytes(), &[0x80]);
        assert_eq!(EncodedField::EMPTY.encoded_len(), Ok(1));
    }
}
