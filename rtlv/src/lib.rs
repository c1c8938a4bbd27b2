//! Tag-Length-Value container format
//!
//! A flat, self describing list of named byte blobs. The tag width is
//! chosen by the writer and stored once up front, every tag is then space
//! padded to exactly that width. Unless other wise noted everything is
//! stored in Little Endian format.
//!
//! # Top Level
//!
//! | Type      | Name       | Description |
//! | --------: | ---------- | ----------- |
//! | u8        | tag_length | Width `N` of every tag in this container, 1 to 255 |
//! | [Entry]   | entries    | Zero or more entries, until the data runs out |
//!
//! # Entry
//!
//! | Type    | Name   | Description |
//! | ------: | ------ | ----------- |
//! | [u8; N] | tag    | ASCII tag, right padded with `0x20`, may not end in `0x20` itself |
//! | i32     | length | Length of `value`, 0 to `i32::MAX` |
//! | [u8; L] | value  | The raw value |
//!
//! Tags are unique within one container, the [`writer::TlvWriter`] refuses
//! to write a tag twice. The [`reader::TlvReader`] does not check this, when
//! folding into a map the later entry wins.
//!
//! ```
//! use rtlv::{build_tlv_list, tlv_list_from_bytes};
//!
//! let data = build_tlv_list([("ID", &b"\x01\x02"[..]), ("NAME", &b"alice"[..])], 8).unwrap();
//! let map = tlv_list_from_bytes(&data).unwrap();
//!
//! assert_eq!(map["NAME"], b"alice");
//! ```
use std::collections::HashMap;
use std::io::Cursor;

use rcore::binary::BinaryError;
use thiserror::Error;

pub mod reader;
pub mod writer;

use crate::reader::TlvReader;
use crate::writer::TlvWriter;

#[derive(Error, Debug)]
pub enum TlvError {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Binary(#[from] BinaryError),
    #[error("tag length must be 1 to 255")]
    InvalidTagLength,
    #[error("tag is empty")]
    EmptyTag,
    #[error("tag {0:?} is not ascii")]
    NonAsciiTag(String),
    #[error("tag {0:?} ends in a space")]
    TrailingSpace(String),
    #[error("tag '{0}' already written")]
    DuplicateTag(String),
    #[error("tag '{tag}' is longer than {max} bytes")]
    TagTooLong { tag: String, max: usize },
    #[error("value of {0} bytes is too large")]
    ValueTooLarge(usize),
    #[error("negative value length {0}")]
    NegativeLength(i32),
}

/// Serializes `entries` in iteration order into a new buffer.
pub fn build_tlv_list<I, K, V>(entries: I, tag_length: u8) -> Result<Vec<u8>, TlvError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[u8]>,
{
    let mut tlv = TlvWriter::new(Vec::new(), tag_length)?;
    for (tag, value) in entries {
        tlv.write(tag.as_ref(), value.as_ref())?;
    }
    Ok(tlv.into_inner())
}

pub fn tlv_list_from_bytes(data: &[u8]) -> Result<HashMap<String, Vec<u8>>, TlvError> {
    let mut tlv = TlvReader::new(Cursor::new(data))?;
    let mut map = HashMap::new();

    while let Some(tv) = tlv.read()? {
        map.insert(tv.tag, tv.value);
    }
    Ok(map)
}
