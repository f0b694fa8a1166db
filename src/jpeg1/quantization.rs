//! Quantization tables and de-quantization for JPEG 1.
//! Tables are kept in natural (row-major) order; the zigzag order of the stream is
//! undone when a DQT segment is read.

use crate::constants::BLOCK_DIM;

/// Natural-order index of the coefficient at each zigzag position (ISO/IEC 10918-1 figure A.6).
pub const ZIGZAG_TO_NATURAL: [usize; BLOCK_DIM] = [
    0, 1, 8, 16, 9, 2, 3, 10,
    17, 24, 32, 25, 18, 11, 4, 5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13, 6, 7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Quantizer step sizes in natural order.
pub type QuantizationTable = [u16; BLOCK_DIM];

/// Reorders table entries read in zigzag order.
pub fn table_from_zigzag(zigzag: &[u16; BLOCK_DIM]) -> QuantizationTable {
    let mut table = [0u16; BLOCK_DIM];
    for (k, &value) in zigzag.iter().enumerate() {
        table[ZIGZAG_TO_NATURAL[k]] = value;
    }
    table
}

/// De-quantizes natural-order coefficients.
pub fn dequantize_block(
    coefficients: &[i32; BLOCK_DIM],
    table: &QuantizationTable,
    output: &mut [f32; BLOCK_DIM],
) {
    for i in 0..BLOCK_DIM {
        output[i] = coefficients[i] as f32 * table[i] as f32;
    }
}
