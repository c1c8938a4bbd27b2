//! PKCS#7 padding
//!
//! `N` bytes of value `N` are appended so the data ends on a `pad_size`
//! boundary, `1 <= N <= pad_size`. Data that is already aligned still gets
//! a full block of padding.
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaddingError {
    #[error("padded data is empty")]
    Empty,
    #[error("padded data is {0} bytes, not a multiple of the pad block")]
    Misaligned(usize),
    #[error("pad byte {0:#04x} is out of range")]
    InvalidPad(u8),
    #[error("pad bytes do not all equal {0:#04x}")]
    Inconsistent(u8),
}

pub fn pad(data: &[u8], pad_size: usize, out: &mut Vec<u8>) {
    debug_assert!((1..=255).contains(&pad_size));

    let n = pad_size - (data.len() % pad_size);
    out.reserve(data.len() + n);
    out.extend_from_slice(data);
    out.resize(out.len() + n, n as u8);
}

/// Returns the unpadded prefix of `data`.
pub fn unpad(data: &[u8], pad_size: usize) -> Result<&[u8], PaddingError> {
    let last = match data.last() {
        Some(x) => *x,
        None => return Err(PaddingError::Empty),
    };
    if data.len() % pad_size != 0 {
        return Err(PaddingError::Misaligned(data.len()));
    }

    let n = last as usize;
    if n == 0 || n > pad_size {
        return Err(PaddingError::InvalidPad(last));
    }

    let (body, tail) = data.split_at(data.len() - n);
    if tail.iter().any(|x| *x != last) {
        return Err(PaddingError::Inconsistent(last));
    }
    Ok(body)
}
