//! One-call entry points for reading a header or a whole image.

use crate::decompress::{DecompressionCycle, DecompressionObject, DecompressionOptions, JpegImageInfo};
use crate::image::{ImageBuffer, PixelBuffer};
use crate::io::Source;
use crate::message_log::MessageLog;

/// Reads the header of the image at the current position of `source`.
///
/// With `rewind` the source is put back where it was; otherwise it is left just before
/// the first scan. A copy of the diagnostics is stored in `messages` when given.
pub fn read_jpeg_header(source: &mut dyn Source, rewind: bool, messages: Option<&mut MessageLog>) -> JpegImageInfo {
    let mut obj = DecompressionObject::new();
    read_jpeg_header_with(&mut obj, source, rewind, messages)
}

/// Like [`read_jpeg_header`], reusing `obj`. The object keeps the parsed header, so a
/// following [`read_jpeg_with`] can continue with the image data.
pub fn read_jpeg_header_with(
    obj: &mut DecompressionObject,
    source: &mut dyn Source,
    rewind: bool,
    messages: Option<&mut MessageLog>,
) -> JpegImageInfo {
    let start = source.position();
    obj.set_source(source);
    let info = if obj.error_state() {
        JpegImageInfo::default()
    } else {
        obj.read_header()
    };

    let target = if rewind { start } else { obj.stream_position() };
    if let Err(err) = source.seek_abs(target) {
        obj.message_log_mut()
            .add_error(format!("Failed to reposition source: {}", err));
    }
    if let Some(messages) = messages {
        *messages = obj.message_log().clone();
    }
    info
}

/// Reads the image at the current position of `source` into a new buffer, which is
/// empty on failure. The source is left after the image.
pub fn read_jpeg(
    source: &mut dyn Source,
    options: DecompressionOptions,
    messages: Option<&mut MessageLog>,
) -> ImageBuffer {
    let mut obj = DecompressionObject::new();
    read_jpeg_with(&mut obj, source, options, messages, None)
}

/// Like [`read_jpeg`], reusing `obj`.
///
/// When `provided_header_info` is given, the header was already read on `obj` (see
/// [`read_jpeg_header_with`] without rewinding) and decoding continues from there
/// instead of binding `source` again.
pub fn read_jpeg_with(
    obj: &mut DecompressionObject,
    source: &mut dyn Source,
    options: DecompressionOptions,
    messages: Option<&mut MessageLog>,
    provided_header_info: Option<&JpegImageInfo>,
) -> ImageBuffer {
    let header = match provided_header_info {
        Some(info) if obj.header_info().as_ref() == Some(info) => *info,
        _ => {
            obj.set_source(source);
            obj.read_header()
        }
    };

    let mut image = ImageBuffer::default();
    if header.is_valid() {
        obj.set_decompression_parameters(options.out_color_space);
        let mut cycle = DecompressionCycle::new(obj, options.region);
        let output = cycle.output_info();
        let success = output.is_valid() && {
            image = ImageBuffer::allocate(output.output_layout(), output.output_semantics());
            let mut rows = image.row_pointers();
            cycle.decompress(&mut rows)
        };
        drop(cycle);
        if !success {
            image.clear();
        }
    }
    obj.reset_image();

    if let Err(err) = source.seek_abs(obj.stream_position()) {
        obj.message_log_mut()
            .add_error(format!("Failed to reposition source: {}", err));
    }
    if let Some(messages) = messages {
        *messages = obj.message_log().clone();
    }
    image
}
