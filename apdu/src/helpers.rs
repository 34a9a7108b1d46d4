// Copyright (c) 2022-2023 The MobileCoin Foundation

/// Encoding helper for fixed size byte arrays (pending nightly array constructors)
pub(crate) mod arr {
    use encdec::Error;

    pub fn enc<const N: usize>(d: &[u8; N], buff: &mut [u8]) -> Result<usize, Error> {
        if buff.len() < d.len() {
            return Err(Error::Length);
        }

        buff[..d.len()].copy_from_slice(&d[..]);

        Ok(d.len())
    }

    pub fn enc_len<const N: usize>(d: &[u8; N]) -> Result<usize, Error> {
        Ok(d.len())
    }

    pub fn dec<const N: usize>(buff: &[u8]) -> Result<([u8; N], usize), Error> {
        if buff.len() < N {
            return Err(Error::Length);
        }

        let mut d = [0u8; N];
        d.copy_from_slice(&buff[..N]);

        Ok((d, N))
    }
}

/// Read a length-prefixed optional field from `buff`
///
/// Fields flagged absent must carry a zero length.
pub(crate) fn read_field<'a>(
    buff: &'a [u8],
    index: &mut usize,
    len: usize,
    present: bool,
) -> Result<Option<&'a [u8]>, ledger_proto::ApduError> {
    use ledger_proto::ApduError;

    if !present {
        return match len {
            0 => Ok(None),
            _ => Err(ApduError::InvalidEncoding),
        };
    }

    if buff.len() < *index + len {
        return Err(ApduError::InvalidLength);
    }

    let d = &buff[*index..][..len];
    *index += len;

    Ok(Some(d))
}

/// Write an optional field to `buff`, advancing `index`
///
/// Callers must check `buff` has space for the field.
pub(crate) fn write_field(buff: &mut [u8], index: &mut usize, field: Option<&[u8]>) {
    if let Some(d) = field {
        buff[*index..][..d.len()].copy_from_slice(d);
        *index += d.len();
    }
}
