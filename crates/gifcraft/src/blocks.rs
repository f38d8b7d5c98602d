//! Sub-block runs: length-prefixed chunks ended by a zero-length chunk.

use crate::{cursor::ByteCursor, errors::DecodeError};

/// Zero-length size byte that ends a run.
pub const BLOCK_TERMINATOR: u8 = 0x00;

/// Reads chunks until the terminator and returns their concatenated payload.
/// The terminator is consumed; running out of input first is an error.
pub fn read_sub_blocks(cursor: &mut ByteCursor<'_>) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();

    loop {
        let size = cursor.read_byte()?;
        if size == BLOCK_TERMINATOR {
            break;
        }

        out.extend_from_slice(cursor.read_bytes(size as usize)?);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_block() {
        let mut cursor = ByteCursor::new(&[3, 0x41, 0x42, 0x43, 0]);
        assert_eq!(read_sub_blocks(&mut cursor).unwrap(), vec![0x41, 0x42, 0x43]);
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_concatenates_blocks() {
        let mut cursor = ByteCursor::new(&[2, 1, 2, 1, 3, 0, 0x3B]);
        assert_eq!(read_sub_blocks(&mut cursor).unwrap(), vec![1, 2, 3]);
        assert_eq!(cursor.position(), 6);
    }

    #[test]
    fn test_empty_run() {
        let mut cursor = ByteCursor::new(&[0]);
        assert!(read_sub_blocks(&mut cursor).unwrap().is_empty());
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_missing_terminator() {
        let mut cursor = ByteCursor::new(&[2, 1, 2]);
        assert!(matches!(
            read_sub_blocks(&mut cursor),
            Err(DecodeError::EndOfStream { position: 3, .. })
        ));
    }

    #[test]
    fn test_short_chunk() {
        let mut cursor = ByteCursor::new(&[4, 1, 2]);
        assert_eq!(
            read_sub_blocks(&mut cursor).unwrap_err(),
            DecodeError::EndOfStream {
                position: 1,
                needed: 4,
                remaining: 2
            }
        );
    }
}
