//! Fixed width scalar codec
//!
//! Every scalar is stored in Little Endian at its natural width. A read
//! that runs out of bytes is an [`BinaryError::Underflow`], it is never
//! zero-filled. Values are not range checked, the encodings are plain
//! two's-complement and IEEE-754.
//!
//! | Type | Width |
//! | ---: | ----: |
//! | u8, i8, bool | 1 |
//! | u16, i16     | 2 |
//! | u32, i32, f32 | 4 |
//! | u64, i64, f64 | 8 |
use std::io::{Read, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use thiserror::Error;

use crate::buf::fill_buf;

#[derive(Error, Debug)]
pub enum BinaryError {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("underflow: wanted {wanted} bytes, got {got}")]
    Underflow { wanted: usize, got: usize },
}

// Pulls exactly N bytes or reports how many were there
fn read_array<R: Read, const N: usize>(reader: &mut R) -> Result<[u8; N], BinaryError> {
    let mut buf = [0u8; N];
    match fill_buf(reader, &mut buf)? {
        (_, len) if len == N => Ok(buf),
        (_, len) => Err(BinaryError::Underflow { wanted: N, got: len }),
    }
}

pub fn write_byte<W: Write>(writer: &mut W, value: u8) -> std::io::Result<()> {
    writer.write_u8(value)
}

pub fn write_sbyte<W: Write>(writer: &mut W, value: i8) -> std::io::Result<()> {
    writer.write_i8(value)
}

pub fn write_bool<W: Write>(writer: &mut W, value: bool) -> std::io::Result<()> {
    writer.write_u8(value as u8)
}

pub fn write_int16<W: Write>(writer: &mut W, value: i16) -> std::io::Result<()> {
    writer.write_i16::<LittleEndian>(value)
}

pub fn write_uint16<W: Write>(writer: &mut W, value: u16) -> std::io::Result<()> {
    writer.write_u16::<LittleEndian>(value)
}

pub fn write_int32<W: Write>(writer: &mut W, value: i32) -> std::io::Result<()> {
    writer.write_i32::<LittleEndian>(value)
}

pub fn write_uint32<W: Write>(writer: &mut W, value: u32) -> std::io::Result<()> {
    writer.write_u32::<LittleEndian>(value)
}

pub fn write_int64<W: Write>(writer: &mut W, value: i64) -> std::io::Result<()> {
    writer.write_i64::<LittleEndian>(value)
}

pub fn write_uint64<W: Write>(writer: &mut W, value: u64) -> std::io::Result<()> {
    writer.write_u64::<LittleEndian>(value)
}

pub fn write_float<W: Write>(writer: &mut W, value: f32) -> std::io::Result<()> {
    writer.write_f32::<LittleEndian>(value)
}

pub fn write_double<W: Write>(writer: &mut W, value: f64) -> std::io::Result<()> {
    writer.write_f64::<LittleEndian>(value)
}

pub fn read_byte<R: Read>(reader: &mut R) -> Result<u8, BinaryError> {
    let [b] = read_array::<R, 1>(reader)?;
    Ok(b)
}

pub fn read_sbyte<R: Read>(reader: &mut R) -> Result<i8, BinaryError> {
    let [b] = read_array::<R, 1>(reader)?;
    Ok(b as i8)
}

// Anything but 0x00 is true
pub fn read_bool<R: Read>(reader: &mut R) -> Result<bool, BinaryError> {
    let [b] = read_array::<R, 1>(reader)?;
    Ok(b != 0)
}

pub fn read_int16<R: Read>(reader: &mut R) -> Result<i16, BinaryError> {
    Ok(LittleEndian::read_i16(&read_array::<R, 2>(reader)?))
}

pub fn read_uint16<R: Read>(reader: &mut R) -> Result<u16, BinaryError> {
    Ok(LittleEndian::read_u16(&read_array::<R, 2>(reader)?))
}

pub fn read_int32<R: Read>(reader: &mut R) -> Result<i32, BinaryError> {
    Ok(LittleEndian::read_i32(&read_array::<R, 4>(reader)?))
}

pub fn read_uint32<R: Read>(reader: &mut R) -> Result<u32, BinaryError> {
    Ok(LittleEndian::read_u32(&read_array::<R, 4>(reader)?))
}

pub fn read_int64<R: Read>(reader: &mut R) -> Result<i64, BinaryError> {
    Ok(LittleEndian::read_i64(&read_array::<R, 8>(reader)?))
}

pub fn read_uint64<R: Read>(reader: &mut R) -> Result<u64, BinaryError> {
    Ok(LittleEndian::read_u64(&read_array::<R, 8>(reader)?))
}

pub fn read_float<R: Read>(reader: &mut R) -> Result<f32, BinaryError> {
    Ok(LittleEndian::read_f32(&read_array::<R, 4>(reader)?))
}

pub fn read_double<R: Read>(reader: &mut R) -> Result<f64, BinaryError> {
    Ok(LittleEndian::read_f64(&read_array::<R, 8>(reader)?))
}
