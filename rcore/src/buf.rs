use std::io::Read;

/// Reads from `data` until `buf` is full or the reader hits EoF.
///
/// Returns `(eof, bytes_read)`. A reader that hands back short reads is
/// retried, so `bytes_read < buf.len()` only ever happens together with
/// `eof == true`.
pub fn fill_buf<R: Read>(data: &mut R, buf: &mut [u8]) -> std::io::Result<(bool, usize)> {
    let mut buf_read = 0;

    while buf_read < buf.len() {
        match data.read(&mut buf[buf_read..]) {
            Ok(0) => return Ok((true, buf_read)),
            Ok(x) => buf_read += x,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
    }
    Ok((false, buf_read))
}
