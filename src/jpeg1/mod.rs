//! JPEG 1 sequential DCT decoding (ISO/IEC 10918-1 / ITU-T T.81)
//!
//! Features:
//! - 8-bit baseline and extended sequential Huffman processes (SOF0, SOF1).
//! - 8- and 16-bit quantization tables.
//! - Interleaved and single-component scans, including multi-scan images.
//! - Restart intervals (DRI/RSTm).
//! - Any integral chroma subsampling up to 4x4, upsampled by replication.

pub mod color;
pub mod dct;
pub mod decoder;
pub mod huffman;
pub mod quantization;
pub mod scan;

pub use decoder::Jpeg1Decoder;
