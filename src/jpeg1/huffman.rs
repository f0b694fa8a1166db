//! Huffman decoding for sequential DCT scans.
//! Handles DHT table construction and bit-stream unpacking with byte unstuffing.

use crate::error::DecodeError;
use crate::jpeg_marker_code::{JPEG_MARKER_START_BYTE, JPEG_RESTART_MARKER_BASE};

/// Canonical Huffman table in the min/max code representation of ISO/IEC 10918-1 F.2.2.3.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    values: Vec<u8>,
    min_code: [i32; 16],
    max_code: [i32; 16],
    val_ptr: [i32; 16],
}

impl HuffmanTable {
    /// Builds a table from DHT code counts per length and the symbol values.
    pub fn build_from_dht(lengths: &[u8; 16], values: &[u8]) -> Result<Self, DecodeError> {
        let total: usize = lengths.iter().map(|&n| n as usize).sum();
        if total > 256 || values.len() != total {
            return Err(DecodeError::InvalidHuffmanTable);
        }

        let mut table = Self {
            values: values.to_vec(),
            min_code: [0; 16],
            max_code: [-1; 16],
            val_ptr: [0; 16],
        };

        let mut code = 0u32;
        let mut val_idx = 0usize;
        for (i, &count) in lengths.iter().enumerate() {
            let count = count as usize;
            if count > 0 {
                table.val_ptr[i] = val_idx as i32;
                table.min_code[i] = code as i32;
                code += count as u32;
                val_idx += count;
                // The all-ones code of each length is reserved.
                if code >= 1 << (i + 1) {
                    return Err(DecodeError::InvalidHuffmanTable);
                }
                table.max_code[i] = code as i32 - 1;
            }
            code <<= 1;
        }
        Ok(table)
    }

    /// Decodes the next symbol.
    pub fn decode(&self, reader: &mut JpegBitReader<'_>) -> Result<u8, DecodeError> {
        let mut code = 0i32;
        for i in 0..16 {
            code = (code << 1) | reader.read_bits(1)? as i32;
            if code <= self.max_code[i] {
                let idx = self.val_ptr[i] + (code - self.min_code[i]);
                return self
                    .values
                    .get(idx as usize)
                    .copied()
                    .ok_or(DecodeError::BadHuffmanCode);
            }
        }
        Err(DecodeError::BadHuffmanCode)
    }
}

/// Sign-extends the additional bits of a coefficient of the given magnitude category
/// (ISO/IEC 10918-1 F.2.2.1).
pub fn extend(bits: u16, category: u8) -> i32 {
    if category == 0 {
        return 0;
    }
    let bits = bits as i32;
    if bits >= 1 << (category - 1) {
        bits
    } else {
        bits - (1 << category) + 1
    }
}

/// Saved position of a [`JpegBitReader`], so decoding can stop between MCU rows and
/// continue later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitReaderState {
    position: usize,
    bit_buffer: u32,
    bits_in_buffer: u32,
}

impl BitReaderState {
    pub fn at(position: usize) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Offset of the first byte not yet loaded into the bit buffer.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Reads bits from entropy-coded data, removing the stuffed zero byte after each 0xFF.
///
/// A marker is never consumed: if bits are needed where a marker starts, decoding fails.
pub struct JpegBitReader<'a> {
    source: &'a [u8],
    position: usize,
    bit_buffer: u32,
    bits_in_buffer: u32,
}

impl<'a> JpegBitReader<'a> {
    pub fn new(source: &'a [u8], position: usize) -> Self {
        Self::resume(source, BitReaderState::at(position))
    }

    pub fn resume(source: &'a [u8], state: BitReaderState) -> Self {
        Self {
            source,
            position: state.position,
            bit_buffer: state.bit_buffer,
            bits_in_buffer: state.bits_in_buffer,
        }
    }

    pub fn state(&self) -> BitReaderState {
        BitReaderState {
            position: self.position,
            bit_buffer: self.bit_buffer,
            bits_in_buffer: self.bits_in_buffer,
        }
    }

    pub fn read_bits(&mut self, count: u8) -> Result<u16, DecodeError> {
        if count == 0 {
            return Ok(0);
        }
        let count = count as u32;
        while self.bits_in_buffer < count {
            let byte = self.read_byte_unstuffed()?;
            self.bit_buffer = (self.bit_buffer << 8) | byte as u32;
            self.bits_in_buffer += 8;
        }

        let shift = self.bits_in_buffer - count;
        let value = (self.bit_buffer >> shift) & ((1 << count) - 1);
        self.bits_in_buffer -= count;
        self.bit_buffer &= (1u32 << self.bits_in_buffer).wrapping_sub(1);
        Ok(value as u16)
    }

    fn read_byte_unstuffed(&mut self) -> Result<u8, DecodeError> {
        let byte = *self.source.get(self.position).ok_or(DecodeError::PrematureEnd)?;
        if byte != JPEG_MARKER_START_BYTE {
            self.position += 1;
            return Ok(byte);
        }

        // 0xFF fill bytes may precede the stuffed zero or a marker code.
        let mut next = self.position + 1;
        while self.source.get(next) == Some(&JPEG_MARKER_START_BYTE) {
            next += 1;
        }
        match self.source.get(next) {
            None => Err(DecodeError::PrematureEnd),
            Some(0) => {
                self.position = next + 1;
                Ok(JPEG_MARKER_START_BYTE)
            }
            Some(&code) => Err(DecodeError::MarkerInScanData(code)),
        }
    }

    /// Drops the padding bits of the current interval and consumes the restart marker
    /// `RST<index>`.
    pub fn read_restart_marker(&mut self, index: u8) -> Result<(), DecodeError> {
        self.bit_buffer = 0;
        self.bits_in_buffer = 0;

        let expected = JPEG_RESTART_MARKER_BASE + index;
        let first = *self.source.get(self.position).ok_or(DecodeError::PrematureEnd)?;
        if first != JPEG_MARKER_START_BYTE {
            return Err(DecodeError::RestartMarkerMismatch { expected: index, found: first });
        }
        let mut next = self.position + 1;
        while self.source.get(next) == Some(&JPEG_MARKER_START_BYTE) {
            next += 1;
        }
        let code = *self.source.get(next).ok_or(DecodeError::PrematureEnd)?;
        if code != expected {
            return Err(DecodeError::RestartMarkerMismatch { expected: index, found: code });
        }
        self.position = next + 1;
        Ok(())
    }
}
