use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use rcore::stream::{self, ChunkConfig};
use rtlv::reader::TlvReader;
use rtlv::tlv_list_from_bytes;
use rtlv::writer::TlvWriter;

use crate::error::CliError;
use crate::key::MemKey;

pub fn encrypt_file(
    key: &MemKey,
    config: ChunkConfig,
    input: &Path,
    output: &Path,
) -> Result<u64, CliError> {
    let reader = BufReader::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(output)?);

    let mut cipher = key.cipher()?;
    let len = stream::encrypt(reader, &mut writer, &mut cipher, config)?;

    info!("ENC: {} -> {} ({} bytes)", input.display(), output.display(), len);
    Ok(len)
}

pub fn decrypt_file(
    key: &MemKey,
    config: ChunkConfig,
    input: &Path,
    output: &Path,
) -> Result<u64, CliError> {
    let reader = BufReader::new(File::open(input)?);
    let mut writer = BufWriter::new(File::create(output)?);

    let mut cipher = key.cipher()?;
    let len = stream::decrypt(reader, &mut writer, &mut cipher, config)?;

    info!("DEC: {} -> {} ({} bytes)", input.display(), output.display(), len);
    Ok(len)
}

/// Builds a container from `TAG=PATH` entries, encrypted when a key is given.
pub fn pack(
    entries: &[(String, PathBuf)],
    tag_length: u8,
    key: Option<&MemKey>,
    config: ChunkConfig,
    output: &Path,
) -> Result<u64, CliError> {
    let mut tlv = TlvWriter::new(Vec::new(), tag_length)?;

    for (tag, path) in entries {
        let mut value = Vec::new();
        File::open(path)?.read_to_end(&mut value)?;

        tlv.write(tag, &value)?;
        debug!("PACK: {} <- {}", tag, path.display());
    }
    let data = tlv.into_inner();

    let mut writer = BufWriter::new(File::create(output)?);
    let len = match key {
        Some(k) => {
            let mut cipher = k.cipher()?;
            stream::encrypt(Cursor::new(data), &mut writer, &mut cipher, config)?
        }
        None => {
            writer.write_all(&data)?;
            writer.flush()?;
            data.len() as u64
        }
    };

    info!("PACK: {} entries -> {} ({} bytes)", entries.len(), output.display(), len);
    Ok(len)
}

// Reads the whole container, decrypting when a key is given
fn load(input: &Path, key: Option<&MemKey>, config: ChunkConfig) -> Result<Vec<u8>, CliError> {
    let mut reader = BufReader::new(File::open(input)?);
    let mut data = Vec::new();

    match key {
        Some(k) => {
            let mut cipher = k.cipher()?;
            stream::decrypt(reader, &mut data, &mut cipher, config)?;
        }
        None => {
            reader.read_to_end(&mut data)?;
        }
    }
    Ok(data)
}

// Tags become file names, so keep them to a single plain component
fn is_safe_name(tag: &str) -> bool {
    !(tag.is_empty()
        || tag == "."
        || tag == ".."
        || tag.contains(['/', '\\'])
        || tag.chars().any(|c| c.is_ascii_control()))
}

/// Writes every entry to `dir/<tag>`, returns the tags written.
pub fn unpack(
    input: &Path,
    dir: &Path,
    key: Option<&MemKey>,
    config: ChunkConfig,
) -> Result<Vec<String>, CliError> {
    let map = tlv_list_from_bytes(&load(input, key, config)?)?;

    if let Some(tag) = map.keys().find(|t| !is_safe_name(t)) {
        return Err(CliError::UnsafeTag(tag.clone()));
    }
    std::fs::create_dir_all(dir)?;

    let mut tags: Vec<String> = Vec::with_capacity(map.len());
    for (tag, value) in map {
        let path = dir.join(&tag);
        std::fs::write(&path, &value)?;
        debug!("UNPACK: {} -> {}", tag, path.display());
        tags.push(tag);
    }
    tags.sort();
    Ok(tags)
}

/// Tags and value lengths in container order.
pub fn list(
    input: &Path,
    key: Option<&MemKey>,
    config: ChunkConfig,
) -> Result<Vec<(String, usize)>, CliError> {
    let data = load(input, key, config)?;
    let reader = TlvReader::new(Cursor::new(data))?;

    let mut out = Vec::new();
    for tv in reader {
        let tv = tv?;
        out.push((tv.tag, tv.value.len()));
    }
    Ok(out)
}
