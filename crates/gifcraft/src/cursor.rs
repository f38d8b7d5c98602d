//! Read position over an immutable byte buffer.
//!
//! Peeks take `&self` and can never move the position; reads take `&mut self`
//! and advance by exactly the number of bytes they return. A failed read
//! leaves the position where it was.

use crate::errors::DecodeError;

/// Byte order for multi-byte integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn window(&self, n: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(DecodeError::EndOfStream {
                position: self.pos,
                needed: n,
                remaining,
            });
        }

        let data = self.data;
        Ok(&data[self.pos..self.pos + n])
    }

    pub fn peek_byte(&self) -> Result<u8, DecodeError> {
        Ok(self.window(1)?[0])
    }

    pub fn peek_bytes(&self, n: usize) -> Result<&'a [u8], DecodeError> {
        self.window(n)
    }

    /// True if the unread bytes begin with `signature`. Never fails: a buffer
    /// too short to hold the signature simply does not match.
    pub fn starts_with(&self, signature: &[u8]) -> bool {
        self.data[self.pos..].starts_with(signature)
    }

    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let bytes = self.window(n)?;
        self.pos += n;
        Ok(bytes)
    }

    /// Reads `n` bytes as Latin-1 text; every byte maps to the code point of the same value.
    pub fn read_string(&mut self, n: usize) -> Result<String, DecodeError> {
        Ok(self.read_bytes(n)?.iter().map(|&b| char::from(b)).collect())
    }

    /// Reads a 16-bit unsigned integer in the given byte order.
    pub fn read_unsigned(&mut self, endian: Endian) -> Result<u16, DecodeError> {
        let bytes = self.read_bytes(2)?;
        let pair = [bytes[0], bytes[1]];

        Ok(match endian {
            Endian::Little => u16::from_le_bytes(pair),
            Endian::Big => u16::from_be_bytes(pair),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_advance() {
        let cursor = ByteCursor::new(&[0x21, 0xF9]);
        assert_eq!(cursor.peek_byte().unwrap(), 0x21);
        assert_eq!(cursor.peek_bytes(2).unwrap(), &[0x21, 0xF9]);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_read_advances() {
        let mut cursor = ByteCursor::new(&[1, 2, 3, 4]);
        assert_eq!(cursor.read_byte().unwrap(), 1);
        assert_eq!(cursor.read_bytes(2).unwrap(), &[2, 3]);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn test_read_string() {
        let mut cursor = ByteCursor::new(b"GIF89a");
        assert_eq!(cursor.read_string(3).unwrap(), "GIF");
        assert_eq!(cursor.read_string(3).unwrap(), "89a");
    }

    #[test]
    fn test_read_string_latin1() {
        let mut cursor = ByteCursor::new(&[0xE9]);
        assert_eq!(cursor.read_string(1).unwrap(), "\u{e9}");
    }

    #[test]
    fn test_read_unsigned() {
        let mut cursor = ByteCursor::new(&[0x0A, 0x01, 0x0A, 0x01]);
        assert_eq!(cursor.read_unsigned(Endian::Little).unwrap(), 0x010A);
        assert_eq!(cursor.read_unsigned(Endian::Big).unwrap(), 0x0A01);
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_peek_out_of_bounds() {
        let cursor = ByteCursor::new(&[0x21]);
        assert_eq!(
            cursor.peek_bytes(2).unwrap_err(),
            DecodeError::EndOfStream {
                position: 0,
                needed: 2,
                remaining: 1
            }
        );
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_failed_read_keeps_position() {
        let mut cursor = ByteCursor::new(&[0x01]);
        assert!(cursor.read_unsigned(Endian::Little).is_err());
        assert_eq!(cursor.position(), 0);

        cursor.read_byte().unwrap();
        assert!(cursor.read_byte().is_err());
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_starts_with_short_buffer() {
        let cursor = ByteCursor::new(&[0x3B]);
        assert!(!cursor.starts_with(&[0x21, 0x01]));
        assert!(cursor.starts_with(&[0x3B]));
    }
}
