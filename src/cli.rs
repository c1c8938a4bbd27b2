use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use rcore::stream::{ChunkConfig, CHUNK_SIZE};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "padtlv")]
#[command(about = "Chunked PKCS#7 block encryption and TLV containers")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More logging, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypts a file with PKCS#7 padding
    Encrypt {
        #[command(flatten)]
        key: KeyArgs,

        input: PathBuf,
        output: PathBuf,
    },

    /// Decrypts a file and strips the PKCS#7 padding
    Decrypt {
        #[command(flatten)]
        key: KeyArgs,

        input: PathBuf,
        output: PathBuf,
    },

    /// Packs files into a TLV container
    Pack {
        /// Width of every tag, overrides the config
        #[arg(short, long)]
        tag_length: Option<u8>,

        #[command(flatten)]
        key: OptKeyArgs,

        /// Output container
        #[arg(short, long)]
        output: PathBuf,

        /// Entries as TAG=PATH
        #[arg(required = true, value_parser = parse_entry)]
        entries: Vec<(String, PathBuf)>,
    },

    /// Unpacks a TLV container into a directory, one file per tag
    Unpack {
        #[command(flatten)]
        key: OptKeyArgs,

        input: PathBuf,
        dir: PathBuf,
    },

    /// Lists the tags of a TLV container
    List {
        #[command(flatten)]
        key: OptKeyArgs,

        input: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// Cipher, overrides the config
    #[arg(long, value_enum)]
    pub cipher: Option<CipherKind>,

    /// Key, hex or `base64:` prefixed
    #[arg(long)]
    pub key: String,

    /// IV, hex or `base64:` prefixed
    #[arg(long)]
    pub iv: String,
}

// Same as KeyArgs but the container may be in the clear
#[derive(Args, Debug, Clone)]
pub struct OptKeyArgs {
    /// Cipher, overrides the config
    #[arg(long, value_enum)]
    pub cipher: Option<CipherKind>,

    /// Key, hex or `base64:` prefixed
    #[arg(long, requires = "iv")]
    pub key: Option<String>,

    /// IV, hex or `base64:` prefixed
    #[arg(long, requires = "key")]
    pub iv: Option<String>,
}

impl OptKeyArgs {
    pub fn into_key_args(self) -> Option<KeyArgs> {
        match (self.key, self.iv) {
            (Some(key), Some(iv)) => Some(KeyArgs {
                cipher: self.cipher,
                key,
                iv,
            }),
            _ => None,
        }
    }
}

fn parse_entry(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((tag, path)) if !tag.is_empty() && !path.is_empty() => {
            Ok((tag.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected TAG=PATH, got '{}'", s)),
    }
}

#[derive(Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CipherKind {
    Aes256Cbc,
    DesCbc,
    TdesCbc,
}

// Configuration
#[derive(Deserialize, Debug, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub chunk_size: usize,

    /// PKCS#7 pad block, defaults to the cipher block size
    pub pad_size: Option<usize>,

    pub tag_length: u8,
    pub cipher: CipherKind,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chunk_size: CHUNK_SIZE,
            pad_size: None,
            tag_length: 16,
            cipher: CipherKind::Aes256Cbc,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Config, CliError> {
        match path {
            None => Ok(Config::default()),
            Some(p) => {
                let raw = std::fs::read_to_string(p)?;
                Ok(toml::from_str(&raw)?)
            }
        }
    }

    pub fn chunk_config(&self) -> ChunkConfig {
        ChunkConfig {
            chunk_size: self.chunk_size,
            pad_size: self.pad_size,
        }
    }
}
