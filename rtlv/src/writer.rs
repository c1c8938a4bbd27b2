use std::collections::HashSet;
use std::io::Write;

use log::debug;
use rcore::binary::{write_byte, write_int32};

use crate::TlvError;

const TAG_PAD: u8 = b' ';

pub struct TlvWriter<W: Write> {
    inner: W,
    tag_length: usize,
    tags: HashSet<String>,
}

// This is the high level writer interface
impl<W: Write> TlvWriter<W> {
    /// Starts a container, `tag_length` is written out immediately.
    pub fn new(mut writer: W, tag_length: u8) -> Result<Self, TlvError> {
        if tag_length == 0 {
            return Err(TlvError::InvalidTagLength);
        }
        write_byte(&mut writer, tag_length)?;

        Ok(TlvWriter {
            inner: writer,
            tag_length: tag_length as usize,
            tags: HashSet::new(),
        })
    }

    pub fn tag_length(&self) -> usize {
        self.tag_length
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Appends one entry and returns the number of bytes written.
    ///
    /// Nothing is written when the entry is rejected and the tag stays
    /// available for a later, valid write.
    pub fn write(&mut self, tag: &str, value: &[u8]) -> Result<usize, TlvError> {
        if tag.is_empty() {
            return Err(TlvError::EmptyTag);
        }
        if !tag.is_ascii() {
            return Err(TlvError::NonAsciiTag(tag.to_string()));
        }
        // The reader strips the padding, a trailing space would not survive
        if tag.as_bytes().last() == Some(&TAG_PAD) {
            return Err(TlvError::TrailingSpace(tag.to_string()));
        }
        if self.tags.contains(tag) {
            return Err(TlvError::DuplicateTag(tag.to_string()));
        }
        if tag.len() > self.tag_length {
            return Err(TlvError::TagTooLong {
                tag: tag.to_string(),
                max: self.tag_length,
            });
        }
        let value_len = match i32::try_from(value.len()) {
            Ok(x) => x,
            Err(_) => return Err(TlvError::ValueTooLarge(value.len())),
        };

        let mut pad_tag = Vec::with_capacity(self.tag_length);
        pad_tag.extend_from_slice(tag.as_bytes());
        pad_tag.resize(self.tag_length, TAG_PAD);

        self.inner.write_all(&pad_tag)?;
        write_int32(&mut self.inner, value_len)?;
        self.inner.write_all(value)?;

        self.tags.insert(tag.to_string());
        debug!("TLV '{}' - length: {}", tag, value.len());

        Ok(self.tag_length + 4 + value.len())
    }
}
