//! The decoding engine behind a [`DecompressionObject`](crate::decompress::DecompressionObject).
//!
//! The decompression object only drives the engine through this trait and never looks at
//! its internal state. An engine moves through four states:
//!
//! - empty: no data bound (initial, or after a failed `open`)
//! - bound: positioned at the start of an image
//! - header read: frame and tables parsed, positioned at the first scan
//! - decompressing: between `start` and `finish`
//!
//! `finish` leaves the engine bound at the byte following the image, so several images
//! concatenated in one stream are read one after the other. `abort` returns to the start
//! of the current image from any state.

use crate::decompress::{BoundingBox, JpegColorSpace, JpegImageInfo};
use crate::error::DecodeError;
use crate::message_log::MessageLog;

/// Limits and capabilities of the built-in decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Honour regions of interest. When disabled, regions are ignored and the full
    /// image is decoded.
    pub partial_decoding: bool,
    /// Reject images with more pixels than this at header time.
    pub max_pixels: Option<u64>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            partial_decoding: true,
            max_pixels: None,
        }
    }
}

/// A pull-based scanline decoder.
pub trait ScanlineEngine {
    /// Drops all state and binds new input data.
    fn open(&mut self, data: Vec<u8>) -> Result<(), DecodeError>;

    /// Parses markers up to the first start of scan and reports the stream properties.
    fn read_header(&mut self, log: &mut MessageLog) -> Result<JpegImageInfo, DecodeError>;

    fn supports_partial_decoding(&self) -> bool;

    /// Begins decompression into `out_color_space` (`Auto` keeps the native colour space),
    /// restricted to `region` when given. Returns the output image info.
    fn start(
        &mut self,
        out_color_space: JpegColorSpace,
        region: Option<BoundingBox>,
        log: &mut MessageLog,
    ) -> Result<JpegImageInfo, DecodeError>;

    /// Writes the next output scanline, channel interleaved, into the start of `row`.
    fn read_scanline(&mut self, row: &mut [u8], log: &mut MessageLog) -> Result<(), DecodeError>;

    /// Completes decompression after the last scanline; returns the offset just past the
    /// end of the image.
    fn finish(&mut self, log: &mut MessageLog) -> Result<usize, DecodeError>;

    /// Releases any decompression state and rewinds to the start of the current image.
    fn abort(&mut self);

    /// Current offset into the bound data.
    fn position(&self) -> usize;
}
