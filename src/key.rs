use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use rcore::cipher::{Aes256Cbc, BlockCipher, DesCbc, TdesCbc};
use rcore::cipher::{AES_IV_SIZE, AES_KEY_SIZE, DES_IV_SIZE, DES_KEY_SIZE};
use rcore::cipher::{TDES_IV_SIZE, TDES_KEY_SIZE};

use crate::cli::{CipherKind, KeyArgs, OptKeyArgs};
use crate::error::CliError;

// Key management is left to the caller, this only decodes what it is
// handed. Both key and iv are consumed once per encrypt/decrypt run.
pub struct MemKey {
    cipher: CipherKind,
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl CipherKind {
    pub fn key_size(&self) -> usize {
        match self {
            CipherKind::Aes256Cbc => AES_KEY_SIZE,
            CipherKind::DesCbc => DES_KEY_SIZE,
            CipherKind::TdesCbc => TDES_KEY_SIZE,
        }
    }

    pub fn iv_size(&self) -> usize {
        match self {
            CipherKind::Aes256Cbc => AES_IV_SIZE,
            CipherKind::DesCbc => DES_IV_SIZE,
            CipherKind::TdesCbc => TDES_IV_SIZE,
        }
    }
}

/// Hex by default, `base64:` prefix for base64.
pub fn decode(s: &str) -> Result<Vec<u8>, CliError> {
    match s.strip_prefix("base64:") {
        Some(b64) => Ok(STANDARD.decode(b64.trim())?),
        None => Ok(hex::decode(s.trim())?),
    }
}

impl MemKey {
    pub fn new(cipher: CipherKind, key: Vec<u8>, iv: Vec<u8>) -> Result<Self, CliError> {
        if key.len() != cipher.key_size() {
            return Err(CliError::KeySize {
                what: "key",
                wanted: cipher.key_size(),
                got: key.len(),
            });
        }
        if iv.len() != cipher.iv_size() {
            return Err(CliError::KeySize {
                what: "iv",
                wanted: cipher.iv_size(),
                got: iv.len(),
            });
        }
        Ok(MemKey { cipher, key, iv })
    }

    /// `args.cipher` wins over `default`.
    pub fn from_args(args: &KeyArgs, default: CipherKind) -> Result<Self, CliError> {
        let cipher = args.cipher.unwrap_or(default);
        MemKey::new(cipher, decode(&args.key)?, decode(&args.iv)?)
    }

    pub fn from_opt_args(args: OptKeyArgs, default: CipherKind) -> Result<Option<Self>, CliError> {
        match args.into_key_args() {
            Some(k) => Ok(Some(MemKey::from_args(&k, default)?)),
            None => Ok(None),
        }
    }

    /// A fresh cipher, chaining from the iv.
    pub fn cipher(&self) -> Result<Box<dyn BlockCipher>, CliError> {
        Ok(match self.cipher {
            CipherKind::Aes256Cbc => Box::new(Aes256Cbc::new(&self.key, &self.iv)?),
            CipherKind::DesCbc => Box::new(DesCbc::new(&self.key, &self.iv)?),
            CipherKind::TdesCbc => Box::new(TdesCbc::new(&self.key, &self.iv)?),
        })
    }
}
