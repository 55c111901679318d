// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Little-endian stream helpers (u32 scalars, length-prefixed strings, raw words).
//!
//! Strings are written as a u32 LE byte length followed by UTF-8 bytes. An
//! absent string and an empty string share the zero-length encoding.

use core::str;
use thiserror::Error;

/// Default bound on string lengths accepted by [`Reader`].
pub const MAX_STRING_LEN: usize = 64 * 1024;

/// Errors produced by codec readers and writers.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Attempted to read beyond the end of the buffer.
    #[error("buffer too short")]
    OutOfBounds,
    /// UTF-8 decoding failed.
    #[error("invalid utf-8")]
    InvalidUtf8,
    /// String length exceeded max bound.
    #[error("string too long")]
    StringTooLong,
    /// Length does not fit the u32 prefix.
    #[error("length too large")]
    LengthTooLarge,
}

/// Bytes [`Writer::write_str`] emits for `value`.
pub fn pack_size(value: Option<&str>) -> usize {
    4 + value.map_or(0, str::len)
}

/// Writer for little-endian scalars and length-prefixed strings.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Create a new writer with a pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Write a little-endian u32.
    pub fn write_u32_le(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a block of little-endian u32 words.
    pub fn write_words(&mut self, words: &[u32]) {
        for word in words {
            self.write_u32_le(*word);
        }
    }

    /// Write an optional string with a u32 LE length prefix; `None` writes length 0.
    pub fn write_str(&mut self, value: Option<&str>) -> Result<(), CodecError> {
        let bytes = value.map_or(&[][..], str::as_bytes);
        let len: u32 = bytes
            .len()
            .try_into()
            .map_err(|_| CodecError::LengthTooLarge)?;
        self.write_u32_le(len);
        self.write_bytes(bytes);
        Ok(())
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

/// Reader for little-endian scalars and length-prefixed strings.
#[derive(Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
    max_string_len: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over the provided byte slice.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            max_string_len: MAX_STRING_LEN,
        }
    }

    /// Override the bound applied by [`Reader::read_str`].
    #[must_use]
    pub fn with_max_string_len(mut self, max_string_len: usize) -> Self {
        self.max_string_len = max_string_len;
        self
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .offset
            .checked_add(len)
            .ok_or(CodecError::OutOfBounds)?;
        if end > self.bytes.len() {
            return Err(CodecError::OutOfBounds);
        }
        let out = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(out)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        let chunk = self.take(1)?;
        Ok(chunk[0])
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32, CodecError> {
        let chunk = self.take(4)?;
        let raw: [u8; 4] = chunk.try_into().map_err(|_| CodecError::OutOfBounds)?;
        Ok(u32::from_le_bytes(raw))
    }

    /// Fill `out` with little-endian u32 words.
    pub fn read_words(&mut self, out: &mut [u32]) -> Result<(), CodecError> {
        for slot in out {
            *slot = self.read_u32_le()?;
        }
        Ok(())
    }

    /// Read a length-prefixed UTF-8 string. Zero length reads as `None`.
    pub fn read_str(&mut self) -> Result<Option<&'a str>, CodecError> {
        let len = self.read_u32_le()? as usize;
        if len > self.max_string_len {
            return Err(CodecError::StringTooLong);
        }
        if len == 0 {
            return Ok(None);
        }
        let bytes = self.take(len)?;
        str::from_utf8(bytes)
            .map(Some)
            .map_err(|_| CodecError::InvalidUtf8)
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_and_scalars_round_trip() {
        let mut w = Writer::with_capacity(32);
        w.write_str(Some("hero")).unwrap();
        w.write_str(None).unwrap();
        w.write_u32_le(0xdead_beef);
        let bytes = w.into_vec();
        assert_eq!(bytes.len(), pack_size(Some("hero")) + pack_size(None) + 4);

        let mut r = Reader::new(&bytes);
        assert_eq!(r.read_str().unwrap(), Some("hero"));
        assert_eq!(r.read_str().unwrap(), None);
        assert_eq!(r.read_u32_le().unwrap(), 0xdead_beef);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn truncated_word_is_out_of_bounds() {
        let mut r = Reader::new(&[1, 2, 3]);
        assert_eq!(r.read_u32_le(), Err(CodecError::OutOfBounds));
    }

    #[test]
    fn string_bound_is_enforced() {
        let mut w = Writer::default();
        w.write_str(Some("abcdef")).unwrap();
        let bytes = w.into_vec();
        let mut r = Reader::new(&bytes).with_max_string_len(4);
        assert_eq!(r.read_str(), Err(CodecError::StringTooLong));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let bytes = [2, 0, 0, 0, 0xff, 0xfe];
        let mut r = Reader::new(&bytes);
        assert_eq!(r.read_str(), Err(CodecError::InvalidUtf8));
    }
}
