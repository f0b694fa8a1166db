use thiserror::Error;

use crate::decompress::JpegColorSpace;

/// Failures reported by the decoding engine.
///
/// These never escape the public API as `Err` values: the decompression object turns
/// each one into an error entry of its message log and returns an invalid sentinel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Empty input stream")]
    EmptyInput,
    #[error("Not a JPEG file: starts with 0x{0:02x} 0x{1:02x}")]
    NotAJpeg(u8, u8),
    #[error("Failed to read from source: {0}")]
    SourceRead(String),
    #[error("Premature end of JPEG data")]
    PrematureEnd,
    #[error("Unknown JPEG marker 0x{0:02x}")]
    UnknownMarker(u8),
    #[error("Unexpected marker 0x{0:02x}")]
    UnexpectedMarker(u8),
    #[error("Unexpected marker 0x{0:02x} inside entropy-coded data")]
    MarkerInScanData(u8),
    #[error("Improper call in decoder state {0}")]
    BadState(&'static str),
    #[error("Application transferred too many scanlines")]
    TooManyScanlines,
    #[error("Application transferred too few scanlines: {read} of {height}")]
    TooFewScanlines { read: u32, height: u32 },
    #[error("Scanline buffer of {available} bytes cannot hold {needed} bytes")]
    ScanlineBufferTooSmall { needed: usize, available: usize },
    #[error("Unsupported JPEG process: SOF type 0x{0:02x}")]
    UnsupportedProcess(u8),
    #[error("Unsupported JPEG data precision {0}")]
    UnsupportedPrecision(u8),
    #[error("Duplicate start of frame marker")]
    DuplicateStartOfFrame,
    #[error("Start of scan before start of frame")]
    MissingFrame,
    #[error("JPEG datastream contains no image")]
    NoImage,
    #[error("Empty or unsupported image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Image of {pixels} pixels exceeds the limit of {limit} pixels")]
    ImageTooLarge { pixels: u64, limit: u64 },
    #[error("Unsupported number of components: {0}")]
    InvalidComponentCount(u8),
    #[error("Invalid sampling factors {h}x{v} for component {id}")]
    InvalidSamplingFactors { id: u8, h: u8, v: u8 },
    #[error("Invalid marker segment length")]
    InvalidSegmentLength,
    #[error("Invalid quantization table {0}")]
    InvalidQuantizationTable(u8),
    #[error("Quantization table {0} was not defined")]
    MissingQuantizationTable(u8),
    #[error("Invalid Huffman table definition")]
    InvalidHuffmanTable,
    #[error("Huffman table {class} {index} was not defined")]
    MissingHuffmanTable { class: &'static str, index: u8 },
    #[error("Corrupt JPEG data: bad Huffman code")]
    BadHuffmanCode,
    #[error("Cannot allocate {0} bytes of sample memory")]
    AllocationFailed(usize),
    #[error("Corrupt JPEG data: coefficient magnitude category {0} out of range")]
    CoefficientCategory(u8),
    #[error("Corrupt JPEG data: coefficient index out of range")]
    CoefficientOutOfRange,
    #[error("Invalid start of scan parameters")]
    InvalidScanHeader,
    #[error("Unknown component id {0} in start of scan")]
    UnknownComponentId(u8),
    #[error("Corrupt JPEG data: expected RST{expected}, found marker 0x{found:02x}")]
    RestartMarkerMismatch { expected: u8, found: u8 },
    #[error("Unsupported color conversion from {from} to {to}")]
    UnsupportedColorConversion { from: JpegColorSpace, to: JpegColorSpace },
    #[error("Region {x0},{y0} {width}x{height} does not intersect the image")]
    EmptyRegion { x0: u32, y0: u32, width: u32, height: u32 },
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        DecodeError::SourceRead(err.to_string())
    }
}
