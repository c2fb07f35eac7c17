//! Big-endian byte cursor for config records
//!
//! Every read checks the remaining length first, so a truncated record
//! surfaces as [`ConfigError::BufferUnderrun`] with the exact offset instead
//! of a generic IO error.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{ConfigError, Result};

/// Terminator byte for cache strings
pub const STRING_TERMINATOR: u8 = b'\n';

/// Read cursor over a config record
#[derive(Debug, Clone)]
pub struct Buffer<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> Buffer<'a> {
    /// Create a cursor positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Current byte position
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.cursor
            .get_ref()
            .len()
            .saturating_sub(self.position())
    }

    /// Whether every byte has been consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        Ok(self.cursor.read_i8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.cursor.read_u16::<BigEndian>()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.cursor.read_i16::<BigEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.cursor.read_i32::<BigEndian>()?)
    }

    /// Read a newline-terminated string, one byte per character
    pub fn read_string(&mut self) -> Result<String> {
        let data = *self.cursor.get_ref();
        let start = self.position();
        let rest = data.get(start..).unwrap_or_default();

        let Some(len) = rest.iter().position(|&b| b == STRING_TERMINATOR) else {
            // Report the terminator itself as the missing byte
            return Err(ConfigError::BufferUnderrun {
                offset: start,
                needed: rest.len() + 1,
                remaining: rest.len(),
            });
        };

        let mut bytes = vec![0u8; len];
        self.cursor.read_exact(&mut bytes)?;
        self.cursor.read_u8()?;
        Ok(bytes.into_iter().map(char::from).collect())
    }

    /// Skip `n` bytes
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.cursor.set_position((self.position() + n) as u64);
        Ok(())
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(ConfigError::BufferUnderrun {
                offset: self.position(),
                needed,
                remaining,
            });
        }
        Ok(())
    }
}

/// Write a newline-terminated string
///
/// Fails with [`ConfigError::InvalidString`] on the terminator itself or on
/// characters above U+00FF. Nothing is written in that case.
pub fn write_string(buffer: &mut Vec<u8>, value: &str) -> Result<()> {
    let bytes = value
        .chars()
        .enumerate()
        .map(|(index, character)| {
            u8::try_from(character)
                .ok()
                .filter(|&byte| byte != STRING_TERMINATOR)
                .ok_or_else(|| ConfigError::InvalidString {
                    value: value.to_string(),
                    character,
                    index,
                })
        })
        .collect::<Result<Vec<u8>>>()?;

    buffer.extend_from_slice(&bytes);
    buffer.write_u8(STRING_TERMINATOR)?;
    Ok(())
}

/// Write a one-byte element count, rejecting lists that cannot fit
pub fn write_count(buffer: &mut Vec<u8>, what: &'static str, count: usize) -> Result<()> {
    let count = u8::try_from(count).map_err(|_| ConfigError::TooManyElements {
        what,
        count,
        max: u8::MAX as usize,
    })?;
    buffer.write_u8(count)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_are_big_endian() {
        let data = [0x01, 0x00, 0x2A, 0xFF, 0xFE, 0x00, 0x00, 0x01, 0x00, 0x80];
        let mut buffer = Buffer::new(&data);

        assert_eq!(buffer.read_u8().unwrap(), 1);
        assert_eq!(buffer.read_u16().unwrap(), 42);
        assert_eq!(buffer.read_i16().unwrap(), -2);
        assert_eq!(buffer.read_i32().unwrap(), 256);
        assert_eq!(buffer.read_i8().unwrap(), -128);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_underrun_reports_offset() {
        let data = [0x05, 0x00];
        let mut buffer = Buffer::new(&data);
        buffer.read_u8().unwrap();

        let err = buffer.read_u16().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::BufferUnderrun {
                offset: 1,
                needed: 2,
                remaining: 1
            }
        ));
        // Failed reads do not advance
        assert_eq!(buffer.position(), 1);
    }

    #[test]
    fn test_read_string() {
        let data = b"Dragon dagger\nrest";
        let mut buffer = Buffer::new(data);
        assert_eq!(buffer.read_string().unwrap(), "Dragon dagger");
        assert_eq!(buffer.position(), 14);
        assert_eq!(buffer.remaining(), 4);
    }

    #[test]
    fn test_read_string_latin1() {
        let data = [b'C', 0xE9, b'\n'];
        let mut buffer = Buffer::new(&data);
        assert_eq!(buffer.read_string().unwrap(), "C\u{e9}");
    }

    #[test]
    fn test_read_unterminated_string() {
        let mut buffer = Buffer::new(b"no newline");
        assert!(matches!(
            buffer.read_string(),
            Err(ConfigError::BufferUnderrun {
                offset: 0,
                needed: 11,
                remaining: 10
            })
        ));
    }

    #[test]
    fn test_write_string() {
        let mut out = Vec::new();
        write_string(&mut out, "Bank\u{e9}").unwrap();
        assert_eq!(out, [b'B', b'a', b'n', b'k', 0xE9, b'\n']);
    }

    #[test]
    fn test_write_string_rejects_wide_characters() {
        let mut out = vec![2];
        let err = write_string(&mut out, "Snake\u{263a}").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidString {
                character: '\u{263a}',
                index: 5,
                ..
            }
        ));
        assert_eq!(out, [2]);
    }

    #[test]
    fn test_write_string_rejects_terminator() {
        let mut out = Vec::new();
        let err = write_string(&mut out, "Bronze\nsword").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidString {
                character: '\n',
                index: 6,
                ..
            }
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_count_limit() {
        let mut out = Vec::new();
        write_count(&mut out, "models", 255).unwrap();
        assert_eq!(out, [255]);

        let err = write_count(&mut out, "models", 256).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TooManyElements {
                what: "models",
                count: 256,
                max: 255
            }
        ));
    }

    #[test]
    fn test_skip() {
        let data = [1, 2, 3];
        let mut buffer = Buffer::new(&data);
        buffer.skip(2).unwrap();
        assert_eq!(buffer.read_u8().unwrap(), 3);
        assert!(buffer.skip(1).is_err());
    }
}
