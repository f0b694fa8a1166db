//! Incremental JPEG reader.
//!
//! Reads sequential DCT JPEG images from seekable sources, one scanline at a time, into
//! owned [`ImageBuffer`]s or caller-provided [`ImageView`]s. The output colour space is
//! negotiated per image and a region of interest can be decoded instead of the full
//! image. Decode failures never panic: they are collected in a [`MessageLog`] and signalled
//! by invalid results.
//!
//! ```no_run
//! use jpegrow_rs::{DecompressionOptions, FileReader, JpegColorSpace, JpegReader};
//!
//! let mut source = FileReader::open("photo.jpg")?;
//! let options = DecompressionOptions::with_color_space(JpegColorSpace::Rgb);
//! let mut reader = JpegReader::with_source(&mut source, options);
//! let image = reader.read_image_data();
//! if image.is_empty() {
//!     eprintln!("{}", reader.message_log());
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod constants;
pub mod decompress;
pub mod engine;
pub mod error;
pub mod image;
pub mod io;
pub mod jpeg1;
pub mod jpeg_marker_code;
pub mod jpeg_stream_reader;
pub mod message_log;

pub use decompress::{
    BoundingBox, DecompressionCycle, DecompressionObject, DecompressionOptions, JpegColorSpace, JpegImageInfo,
    JpegReader, ReaderState, read_jpeg, read_jpeg_header, read_jpeg_header_with, read_jpeg_with,
};
pub use engine::{DecoderConfig, ScanlineEngine};
pub use error::DecodeError;
pub use image::{ImageBuffer, ImageView, Layout, PixelBuffer, PixelFormat, SampleFormat, Semantics};
pub use io::{FileReader, MemoryReader, Source};
pub use message_log::{Message, MessageLog, MessageType};
