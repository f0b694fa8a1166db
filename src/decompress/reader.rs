//! Stateful, reusable reader over a [`DecompressionObject`].

use crate::decompress::{DecompressionCycle, DecompressionObject, DecompressionOptions, JpegImageInfo};
use crate::engine::DecoderConfig;
use crate::image::{ImageBuffer, PixelBuffer};
use crate::io::Source;
use crate::message_log::MessageLog;

/// Lifecycle of a [`JpegReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// No source bound.
    Fresh,
    SourceBound,
    /// Header read; `valid` is false if it could not be parsed.
    HeaderRead { valid: bool },
    /// Output info negotiated, decompression pending.
    CycleReady,
    /// `read_image_data` ran; `reset` or `set_source` starts the next image.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    SetSource,
    Reset,
    ReadHeader,
    SetDecompressionOptions,
    GetOutputImageInfo,
    ReadImageData,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::SetSource => "set_source",
            Operation::Reset => "reset",
            Operation::ReadHeader => "read_header",
            Operation::SetDecompressionOptions => "set_decompression_options",
            Operation::GetOutputImageInfo => "get_output_image_info",
            Operation::ReadImageData => "read_image_data",
        }
    }
}

impl ReaderState {
    fn permits(self, op: Operation) -> bool {
        match (self, op) {
            (_, Operation::SetSource | Operation::Reset) => true,
            (ReaderState::Fresh | ReaderState::SourceBound | ReaderState::HeaderRead { .. }, _) => true,
            (ReaderState::CycleReady, Operation::GetOutputImageInfo | Operation::ReadImageData) => true,
            _ => false,
        }
    }
}

/// Reads images from a source, one after the other.
///
/// ```text
/// set_source -> [read_header] -> [get_output_image_info] -> read_image_data -> reset
/// ```
///
/// Decode failures are reported through the sentinel results and the message log.
/// Calling an operation out of order (for example `read_header` after
/// `read_image_data` without `reset`) is a programming error and panics.
pub struct JpegReader<'s> {
    source: Option<&'s mut dyn Source>,
    options: DecompressionOptions,
    object: DecompressionObject,
    state: ReaderState,
}

impl Default for JpegReader<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s> JpegReader<'s> {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            source: None,
            options: DecompressionOptions::default(),
            object: DecompressionObject::with_config(config),
            state: ReaderState::Fresh,
        }
    }

    /// A reader bound to `source` right away.
    pub fn with_source(source: &'s mut dyn Source, options: DecompressionOptions) -> Self {
        let mut reader = Self::new();
        reader.set_decompression_options(options);
        reader.set_source(source);
        reader
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn options(&self) -> DecompressionOptions {
        self.options
    }

    /// Diagnostics of every image read so far; [`MessageLog::clear`] empties it.
    pub fn message_log(&self) -> &MessageLog {
        self.object.message_log()
    }

    pub fn message_log_mut(&mut self) -> &mut MessageLog {
        self.object.message_log_mut()
    }

    fn check(&self, op: Operation) {
        if !self.state.permits(op) {
            panic!(
                "JpegReader: cannot call {}() in state {:?}; call reset() or set_source() first",
                op.name(),
                self.state
            );
        }
    }

    /// Binds a new source, implicitly resetting the reader first.
    pub fn set_source(&mut self, source: &'s mut dyn Source) {
        self.check(Operation::SetSource);
        self.release_image();
        self.object.set_source(&mut *source);
        self.source = Some(source);
        self.state = ReaderState::SourceBound;
    }

    /// Drops the current image's decoding state and clears a decode failure. The source
    /// stays bound, positioned after the last image read, so the next `read_header` reads
    /// the following image.
    pub fn reset(&mut self) {
        self.check(Operation::Reset);
        self.release_image();
        if let Some(source) = self.source.as_deref_mut() {
            self.object.set_source(source);
            self.state = ReaderState::SourceBound;
        } else {
            self.state = ReaderState::Fresh;
        }
    }

    /// Options for the next image.
    ///
    /// # Panics
    ///
    /// Once the output info was negotiated for the current image.
    pub fn set_decompression_options(&mut self, options: DecompressionOptions) {
        self.check(Operation::SetDecompressionOptions);
        self.options = options;
    }

    /// Reads the header of the current image. Repeated calls return the same info.
    ///
    /// Returns an invalid info if no source is bound or the header cannot be parsed.
    ///
    /// # Panics
    ///
    /// After [`get_output_image_info`](Self::get_output_image_info) or
    /// [`read_image_data`](Self::read_image_data) without a reset in between.
    pub fn read_header(&mut self) -> JpegImageInfo {
        self.check(Operation::ReadHeader);
        match self.state {
            ReaderState::Fresh => JpegImageInfo::default(),
            ReaderState::HeaderRead { .. } => self.object.header_info().unwrap_or_default(),
            _ => {
                let info = self.object.read_header();
                self.state = ReaderState::HeaderRead { valid: info.is_valid() };
                info
            }
        }
    }

    /// Negotiates the output image with the current options, reading the header first if
    /// needed. Idempotent until the image data is read.
    pub fn get_output_image_info(&mut self) -> JpegImageInfo {
        self.check(Operation::GetOutputImageInfo);
        match self.state {
            ReaderState::Fresh => return JpegImageInfo::default(),
            ReaderState::CycleReady => return self.object.cycle_output_info(),
            _ => {}
        }
        if !self.read_header().is_valid() {
            return JpegImageInfo::default();
        }

        self.object.set_decompression_parameters(self.options.out_color_space);
        let cycle = DecompressionCycle::new(&mut self.object, self.options.region);
        let info = cycle.output_info();
        cycle.detach();
        self.state = ReaderState::CycleReady;
        info
    }

    /// Decodes the current image into a newly allocated buffer, which is empty on failure.
    pub fn read_image_data(&mut self) -> ImageBuffer {
        let mut buffer = ImageBuffer::default();
        if !self.read_image_data_into(&mut buffer) {
            buffer.clear();
        }
        buffer
    }

    /// Decodes the current image into `buffer`.
    ///
    /// Owning buffers are (re)allocated to the output layout; views must reference enough
    /// memory, which is checked before anything is written. The reader's decoding state is
    /// released afterwards whatever the outcome.
    pub fn read_image_data_into<B: PixelBuffer + ?Sized>(&mut self, buffer: &mut B) -> bool {
        self.check(Operation::ReadImageData);
        if self.state == ReaderState::Fresh {
            return false;
        }

        let info = self.get_output_image_info();
        let success = if !info.is_valid() {
            false
        } else if !buffer.prepare(info.output_layout(), info.output_semantics()) {
            self.object.message_log_mut().add_error(format!(
                "Destination buffer cannot hold a {}x{} image with {} channels ({} bytes)",
                info.width,
                info.height,
                info.nr_channels,
                info.required_bytes()
            ));
            false
        } else {
            let mut cycle = DecompressionCycle::resume(&mut self.object);
            let mut rows = buffer.row_pointers();
            cycle.decompress(&mut rows)
        };

        self.finish_image();
        success
    }

    fn finish_image(&mut self) {
        self.release_image();
        self.state = ReaderState::Done;
    }

    /// Releases the decoding state and leaves the source at the start of the image that
    /// comes next: after the current one if it was decoded, else at the current one.
    fn release_image(&mut self) {
        self.object.reset_image();
        if let Some(source) = self.source.as_deref_mut() {
            if let Err(err) = source.seek_abs(self.object.stream_position()) {
                self.object
                    .message_log_mut()
                    .add_error(format!("Failed to reposition source: {}", err));
            }
        }
    }
}
