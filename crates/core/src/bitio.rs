//! Bit cursors over byte buffers.
//!
//! Packed payloads are bit streams laid out MSB-first: stream bit `n` is bit
//! `7 - n % 8` of byte `n / 8`. [`BitWriter`] appends to such a stream and
//! zero-fills whatever is left of the last byte; [`BitReader`] walks one
//! back.
//!
//! The reader cannot distinguish pad bits from real ones. Decoders stop
//! after the symbol count stored in the entry header.
//!
//! # Example
//! ```
//! use huffarc_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! for bit in [true, false, true, true, true] {
//!     writer.write_bit(bit);
//! }
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b1011_1000]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert!(reader.read_bit().unwrap());
//! assert!(!reader.read_bit().unwrap());
//! assert_eq!(reader.position(), 2);
//! ```

use crate::codes::Code;
use crate::error::BitIoError;

/// Mask selecting stream bit `n` within its byte.
fn mask(n: usize) -> u8 {
    0x80 >> (n % 8)
}

/// Appends bits to a growing byte buffer.
///
/// # Invariants
/// - `out.len() == ceil(written / 8)`
/// - bits of the last byte past `written` are zero
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    out: Vec<u8>,
    written: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer with room for `bytes` bytes of output.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            out: Vec::with_capacity(bytes),
            written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        if self.written % 8 == 0 {
            self.out.push(0);
        }
        if bit {
            if let Some(last) = self.out.last_mut() {
                *last |= mask(self.written);
            }
        }
        self.written += 1;
    }

    /// Append `code`, first bit first.
    pub fn write_code(&mut self, code: &Code) {
        code.bits().iter().for_each(|&bit| self.write_bit(bit));
    }

    /// Bytes holding every written bit, the last one zero padded.
    pub fn finish(self) -> Vec<u8> {
        self.out
    }

    /// Bytes started so far, a partially filled last byte included.
    pub fn byte_len(&self) -> usize {
        self.out.len()
    }

    pub fn bit_len(&self) -> usize {
        self.written
    }
}

/// Walks the bits of a borrowed buffer.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    src: &'a [u8],
    cursor: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, cursor: 0 }
    }

    /// Next bit of the stream.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once the buffer is used up. The cursor
    /// does not move in that case.
    pub fn read_bit(&mut self) -> Result<bool, BitIoError> {
        match self.src.get(self.cursor / 8) {
            Some(byte) => {
                let bit = byte & mask(self.cursor) != 0;
                self.cursor += 1;
                Ok(bit)
            }
            None => Err(BitIoError::UnexpectedEof {
                position: self.cursor,
            }),
        }
    }

    pub fn bits_remaining(&self) -> usize {
        (self.src.len() * 8).saturating_sub(self.cursor)
    }

    /// Bits consumed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_bits(bits: &str) -> Vec<u8> {
        let mut writer = BitWriter::new();
        for c in bits.chars() {
            writer.write_bit(c == '1');
        }
        writer.finish()
    }

    #[test]
    fn test_whole_byte_round_trip() {
        let bytes = pack_bits("10110010");
        assert_eq!(bytes, vec![0b1011_0010]);

        let mut reader = BitReader::new(&bytes);
        let read: String = (0..8)
            .map(|_| if reader.read_bit().unwrap() { '1' } else { '0' })
            .collect();
        assert_eq!(read, "10110010");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_last_byte_zero_filled() {
        assert_eq!(pack_bits("1"), vec![0b1000_0000]);
        assert_eq!(pack_bits("011"), vec![0b0110_0000]);
        assert_eq!(pack_bits("10101011111"), vec![0b1010_1011, 0b1110_0000]);
    }

    #[test]
    fn test_write_code() {
        let mut writer = BitWriter::with_capacity(1);
        let code = Code::from_bits(vec![true, true, false]);
        writer.write_code(&code);
        writer.write_code(&code);
        assert_eq!(writer.bit_len(), 6);
        assert_eq!(writer.finish(), vec![0b1101_1000]);
    }

    #[test]
    fn test_empty_writer() {
        let writer = BitWriter::new();
        assert_eq!(writer.bit_len(), 0);
        assert_eq!(writer.byte_len(), 0);
        assert!(writer.finish().is_empty());
    }

    #[test]
    fn test_partial_byte_counts() {
        let mut writer = BitWriter::new();
        (0..13).for_each(|_| writer.write_bit(true));
        assert_eq!(writer.byte_len(), 2);
        assert_eq!(writer.bit_len(), 13);
        assert_eq!(writer.finish(), vec![0xFF, 0b1111_1000]);
    }

    #[test]
    fn test_reader_stops_at_end() {
        let data = [0b1010_1010u8];
        let mut reader = BitReader::new(&data);

        for expected in [true, false, true, false, true, false, true, false] {
            assert_eq!(reader.read_bit(), Ok(expected));
        }
        assert_eq!(
            reader.read_bit(),
            Err(BitIoError::UnexpectedEof { position: 8 })
        );
        assert_eq!(reader.position(), 8);
        assert_eq!(reader.bits_remaining(), 0);
    }

    #[test]
    fn test_reader_progress() {
        let data = [0x00u8, 0x01];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.bits_remaining(), 16);

        for _ in 0..15 {
            assert!(!reader.read_bit().unwrap());
        }
        assert_eq!(reader.position(), 15);
        assert!(reader.read_bit().unwrap());
        assert!(reader.is_empty());
    }
}
