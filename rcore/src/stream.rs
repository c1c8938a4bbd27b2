//! Chunked PKCS#7 encrypt/decrypt
//!
//! Streams of any size are pushed through a [`BlockCipher`] in
//! `chunk_size` pieces without ever holding the whole payload.
//!
//! Encrypting: every full chunk is encrypted as is. The first short chunk
//! (which can be empty, when the source ends on a chunk boundary) is PKCS#7
//! padded and ends the stream. The ciphertext therefore always finishes
//! with a padded chunk.
//!
//! Decrypting: a full size chunk can be an interior chunk or the padded
//! tail that happened to fill a chunk, so one decrypted chunk is held back
//! until the next read tells which one it was. See [`Pending`].
use std::io::{Read, Write};

use log::{debug, trace};
use thiserror::Error;

use crate::buf::fill_buf;
use crate::cipher::{BlockCipher, CipherError};
use crate::padding::{pad, unpad, PaddingError};

// 4Kb default read chunk
pub const CHUNK_SIZE: usize = 4 * 1024;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("padding check failed, wrong key or corrupted data: {0}")]
    Padding(#[from] PaddingError),
    #[error(transparent)]
    Cipher(#[from] CipherError),
    #[error("chunk size {chunk} must be a non-zero multiple of the {pad} byte pad block")]
    InvalidChunkSize { chunk: usize, pad: usize },
    #[error("pad size {pad} must be 1..=255 and a multiple of the {block} byte cipher block")]
    InvalidPadSize { pad: usize, block: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    pub chunk_size: usize,
    /// PKCS#7 block, `None` pads to the cipher's own block size
    pub pad_size: Option<usize>,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        ChunkConfig {
            chunk_size: CHUNK_SIZE,
            pad_size: None,
        }
    }
}

impl ChunkConfig {
    pub fn new(chunk_size: usize) -> Self {
        ChunkConfig {
            chunk_size,
            pad_size: None,
        }
    }

    pub fn with_pad_size(mut self, pad_size: usize) -> Self {
        self.pad_size = Some(pad_size);
        self
    }

    /// Resolves the pad block against `block` and checks that whole chunks
    /// stay cipher aligned.
    pub fn resolve(&self, block: usize) -> Result<(usize, usize), StreamError> {
        let pad = self.pad_size.unwrap_or(block);
        if pad == 0 || pad > 255 || block == 0 || pad % block != 0 {
            return Err(StreamError::InvalidPadSize { pad, block });
        }
        if self.chunk_size == 0 || self.chunk_size % pad != 0 {
            return Err(StreamError::InvalidChunkSize {
                chunk: self.chunk_size,
                pad,
            });
        }
        Ok((self.chunk_size, pad))
    }
}

/// Decrypt side lookahead.
#[derive(Debug)]
enum Pending {
    Empty,
    Held(Vec<u8>),
}

/// Encrypts `reader` into `writer`, returns the ciphertext length.
pub fn encrypt<R, W, C>(
    mut reader: R,
    mut writer: W,
    cipher: &mut C,
    config: ChunkConfig,
) -> Result<u64, StreamError>
where
    R: Read,
    W: Write,
    C: BlockCipher + ?Sized,
{
    let (chunk_size, pad_size) = config.resolve(cipher.block_size())?;

    let mut in_buf = vec![0u8; chunk_size];
    let mut padded: Vec<u8> = Vec::with_capacity(chunk_size + pad_size);
    let mut out_buf: Vec<u8> = Vec::with_capacity(chunk_size + pad_size);
    let mut written: u64 = 0;

    loop {
        let (_, len) = fill_buf(&mut reader, &mut in_buf)?;
        out_buf.clear();

        if len == chunk_size {
            trace!("enc: full chunk {}", len);
            cipher.encrypt(&in_buf, &mut out_buf)?;
            writer.write_all(&out_buf)?;
            written += out_buf.len() as u64;
            continue;
        }

        // Short chunk, this is the tail. When the source ended right on a
        // chunk boundary len is 0 and this writes a lone pad block.
        padded.clear();
        pad(&in_buf[..len], pad_size, &mut padded);
        debug!("enc: final chunk {} -> {} padded", len, padded.len());

        cipher.encrypt(&padded, &mut out_buf)?;
        writer.write_all(&out_buf)?;
        written += out_buf.len() as u64;
        break;
    }

    writer.flush()?;
    Ok(written)
}

/// Decrypts `reader` into `writer`, returns the plaintext length.
///
/// Plaintext that was already handed to `writer` before a padding failure
/// is not taken back.
pub fn decrypt<R, W, C>(
    mut reader: R,
    mut writer: W,
    cipher: &mut C,
    config: ChunkConfig,
) -> Result<u64, StreamError>
where
    R: Read,
    W: Write,
    C: BlockCipher + ?Sized,
{
    let (chunk_size, pad_size) = config.resolve(cipher.block_size())?;

    let mut in_buf = vec![0u8; chunk_size];
    let mut pending = Pending::Empty;
    let mut written: u64 = 0;

    loop {
        let (_, len) = fill_buf(&mut reader, &mut in_buf)?;

        match (len, std::mem::replace(&mut pending, Pending::Empty)) {
            // EoF right after a full chunk, that chunk held the padding
            (0, Pending::Held(chunk)) => {
                let plain = unpad(&chunk, pad_size)?;
                debug!("dec: final held chunk {} -> {}", chunk.len(), plain.len());
                writer.write_all(plain)?;
                written += plain.len() as u64;
                break;
            }
            (0, Pending::Empty) => break,

            // More data, so the held chunk was an interior one
            (_, Pending::Held(chunk)) => {
                trace!("dec: release held chunk {}", chunk.len());
                writer.write_all(&chunk)?;
                written += chunk.len() as u64;
            }
            (_, Pending::Empty) => (),
        }

        let mut dec = Vec::with_capacity(len);
        cipher.decrypt(&in_buf[..len], &mut dec)?;

        if dec.len() < chunk_size {
            let plain = unpad(&dec, pad_size)?;
            debug!("dec: final chunk {} -> {}", dec.len(), plain.len());
            writer.write_all(plain)?;
            written += plain.len() as u64;
            break;
        }
        pending = Pending::Held(dec);
    }

    writer.flush()?;
    Ok(written)
}
