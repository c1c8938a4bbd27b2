use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};

use log::trace;
use rcore::binary::{read_byte, read_int32, BinaryError};
use rcore::buf::fill_buf;

use crate::TlvError;

pub struct TlvReader<R: Read> {
    inner: R,
    tag_length: usize,
    done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue {
    pub tag: String,
    pub value: Vec<u8>,
}

fn read_header<R: Read>(reader: &mut R) -> Result<usize, TlvError> {
    match read_byte(reader)? {
        0 => Err(TlvError::InvalidTagLength),
        x => Ok(x as usize),
    }
}

impl<R: Read> TlvReader<R> {
    /// Consumes the `tag_length` header byte.
    pub fn new(mut reader: R) -> Result<Self, TlvError> {
        let tag_length = read_header(&mut reader)?;

        Ok(TlvReader {
            inner: reader,
            tag_length,
            done: false,
        })
    }

    pub fn tag_length(&self) -> usize {
        self.tag_length
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Next entry, or `None` once the data ends cleanly on an entry boundary.
    pub fn read(&mut self) -> Result<Option<TagValue>, TlvError> {
        let mut tag = vec![0u8; self.tag_length];
        match fill_buf(&mut self.inner, &mut tag)? {
            (_, 0) => return Ok(None),
            (_, len) if len < self.tag_length => {
                return Err(BinaryError::Underflow {
                    wanted: self.tag_length,
                    got: len,
                }
                .into())
            }
            _ => (),
        }

        if !tag.is_ascii() {
            return Err(TlvError::NonAsciiTag(String::from_utf8_lossy(&tag).into_owned()));
        }
        // Ascii is always valid utf8
        let tag = String::from_utf8_lossy(&tag).trim_end_matches(' ').to_string();

        let len = read_int32(&mut self.inner)?;
        if len < 0 {
            return Err(TlvError::NegativeLength(len));
        }

        // Grow with the data actually there instead of trusting the length
        let mut value = Vec::new();
        (&mut self.inner).take(len as u64).read_to_end(&mut value)?;
        if value.len() != len as usize {
            return Err(BinaryError::Underflow {
                wanted: len as usize,
                got: value.len(),
            }
            .into());
        }

        trace!("TLV '{}' - length: {}", tag, len);
        Ok(Some(TagValue { tag, value }))
    }
}

impl<R: Read + Seek> TlvReader<R> {
    /// Rewinds to the start of the source and folds every entry into a map.
    pub fn read_all(&mut self) -> Result<HashMap<String, Vec<u8>>, TlvError> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.tag_length = read_header(&mut self.inner)?;
        self.done = false;

        let mut map = HashMap::new();
        while let Some(tv) = self.read()? {
            map.insert(tv.tag, tv.value);
        }
        Ok(map)
    }
}

impl<R: Read> Iterator for TlvReader<R> {
    type Item = Result<TagValue, TlvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read() {
            Ok(Some(x)) => Some(Ok(x)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(x) => {
                self.done = true;
                Some(Err(x))
            }
        }
    }
}

#[cfg(test)]
mod test_tlv_reader {
    use super::*;
    use crate::writer::TlvWriter;
    use std::io::Cursor;

    fn sample() -> Vec<u8> {
        let mut tlv = TlvWriter::new(Vec::new(), 8).unwrap();
        tlv.write("ID", &[0x01, 0x02]).unwrap();
        tlv.write("NAME", b"alice").unwrap();
        tlv.write("EMPTY", b"").unwrap();
        tlv.into_inner()
    }

    fn entry(tag: &str, value: &[u8]) -> TagValue {
        TagValue {
            tag: tag.to_string(),
            value: value.to_vec(),
        }
    }

    #[test]
    fn read_in_order() {
        let mut reader = TlvReader::new(Cursor::new(sample())).unwrap();
        assert_eq!(reader.tag_length(), 8);

        assert_eq!(reader.read().unwrap(), Some(entry("ID", &[0x01, 0x02])));
        assert_eq!(reader.read().unwrap(), Some(entry("NAME", b"alice")));
        assert_eq!(reader.read().unwrap(), Some(entry("EMPTY", b"")));
        assert_eq!(reader.read().unwrap(), None);
        assert_eq!(reader.read().unwrap(), None);
    }

    #[test]
    fn iterator() {
        let reader = TlvReader::new(Cursor::new(sample())).unwrap();
        let tags: Vec<String> = reader.map(|x| x.unwrap().tag).collect();
        assert_eq!(tags, vec!["ID", "NAME", "EMPTY"]);
    }

    #[test]
    fn read_all_rewinds() {
        let mut reader = TlvReader::new(Cursor::new(sample())).unwrap();

        // Consume part of it first
        reader.read().unwrap();
        let map = reader.read_all().unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map["ID"], vec![0x01, 0x02]);
        assert_eq!(map["NAME"], b"alice".to_vec());
        assert_eq!(map["EMPTY"], Vec::<u8>::new());
    }

    #[test]
    fn empty_source() {
        assert!(matches!(
            TlvReader::new(Cursor::new(Vec::new())),
            Err(TlvError::Binary(BinaryError::Underflow { wanted: 1, got: 0 }))
        ));
    }

    #[test]
    fn zero_tag_length_header() {
        let mut data = vec![0u8];
        data.extend_from_slice(b"GARBAGE GARBAGE");

        assert!(matches!(
            TlvReader::new(Cursor::new(data.clone())),
            Err(TlvError::InvalidTagLength)
        ));
        assert!(matches!(
            crate::tlv_list_from_bytes(&data),
            Err(TlvError::InvalidTagLength)
        ));
    }

    #[test]
    fn read_all_checks_header() {
        let mut reader = TlvReader::new(Cursor::new(sample())).unwrap();
        reader.inner.get_mut()[0] = 0;

        assert!(matches!(reader.read_all(), Err(TlvError::InvalidTagLength)));
    }

    #[test]
    fn partial_tag() {
        let mut data = sample();
        data.extend_from_slice(b"PAR");

        let mut reader = TlvReader::new(Cursor::new(data)).unwrap();
        for _ in 0..3 {
            reader.read().unwrap();
        }
        assert!(matches!(
            reader.read(),
            Err(TlvError::Binary(BinaryError::Underflow { wanted: 8, got: 3 }))
        ));
    }

    #[test]
    fn truncated_length() {
        let mut data = vec![2u8];
        data.extend_from_slice(b"AB");
        data.extend_from_slice(&[5, 0]);

        let mut reader = TlvReader::new(Cursor::new(data)).unwrap();
        assert!(matches!(
            reader.read(),
            Err(TlvError::Binary(BinaryError::Underflow { wanted: 4, got: 2 }))
        ));
    }

    #[test]
    fn truncated_value() {
        let mut data = sample();
        data.truncate(data.len() - 4 - 8 - 2);

        let mut reader = TlvReader::new(Cursor::new(data)).unwrap();
        reader.read().unwrap();
        assert!(matches!(
            reader.read(),
            Err(TlvError::Binary(BinaryError::Underflow { wanted: 5, got: 3 }))
        ));
    }

    #[test]
    fn negative_length() {
        let mut data = vec![1u8, b'X'];
        data.extend_from_slice(&(-1i32).to_le_bytes());

        let mut reader = TlvReader::new(Cursor::new(data)).unwrap();
        assert!(matches!(reader.read(), Err(TlvError::NegativeLength(-1))));
    }

    #[test]
    fn iterator_stops_after_error() {
        let mut data = vec![1u8, b'X'];
        data.extend_from_slice(&(-1i32).to_le_bytes());

        let mut reader = TlvReader::new(Cursor::new(data)).unwrap();
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn non_ascii_tag_bytes() {
        let mut data = vec![1u8, 0xFF];
        data.extend_from_slice(&0i32.to_le_bytes());

        let mut reader = TlvReader::new(Cursor::new(data)).unwrap();
        assert!(matches!(reader.read(), Err(TlvError::NonAsciiTag(_))));
    }
}
