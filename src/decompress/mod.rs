//! Decompression front end: the object owning the engine, the per-image decode cycle,
//! the stateful [`JpegReader`] and one-call helpers built on them.

pub mod color_space;
pub mod cycle;
pub mod info;
pub mod object;
pub mod read;
pub mod reader;

pub use color_space::JpegColorSpace;
pub use cycle::DecompressionCycle;
pub use info::{BoundingBox, DecompressionOptions, JpegImageInfo};
pub use object::DecompressionObject;
pub use read::{read_jpeg, read_jpeg_header, read_jpeg_header_with, read_jpeg_with};
pub use reader::{JpegReader, ReaderState};
