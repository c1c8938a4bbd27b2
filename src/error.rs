use thiserror::Error;

use rcore::cipher::CipherError;
use rcore::stream::StreamError;
use rtlv::TlvError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("hex key: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("base64 key: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("{what} must be {wanted} bytes, got {got}")]
    KeySize {
        what: &'static str,
        wanted: usize,
        got: usize,
    },
    #[error("tag '{0}' is not usable as a file name")]
    UnsafeTag(String),
    #[error(transparent)]
    Cipher(#[from] CipherError),
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error(transparent)]
    Tlv(#[from] TlvError),
}
