//! Reading gzip-compressed Olex sources.

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::error::ConvertError;

/// Decompress a gzip file fully into memory and split it into lines.
///
/// The file handle is dropped before returning, on success or failure.
pub fn read_lines(path: &Path) -> Result<Vec<String>, ConvertError> {
    let file = File::open(path).map_err(ConvertError::Read)?;
    let text = decompress(BufReader::new(file)).map_err(ConvertError::Read)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "decompressed Olex file");
    Ok(split_lines(&text))
}

/// Decompress an in-memory gzip buffer and split it into lines.
pub fn lines_from_bytes(data: &[u8]) -> Result<Vec<String>, ConvertError> {
    let text = decompress(data).map_err(ConvertError::Read)?;
    Ok(split_lines(&text))
}

/// Gzip-decode `reader` as UTF-8 text.
///
/// Concatenated members are all decoded; bytes after a member that are not a
/// gzip header fail the read. Invalid UTF-8 is reported as
/// [`io::ErrorKind::InvalidData`].
fn decompress<R: Read>(reader: R) -> io::Result<String> {
    let mut text = String::new();
    MultiGzDecoder::new(reader).read_to_string(&mut text)?;
    Ok(text)
}

/// Split on `\n`, `\r\n` and lone `\r`.
fn split_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(str::to_owned)
        .collect()
}
