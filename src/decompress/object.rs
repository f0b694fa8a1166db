use crate::decompress::{BoundingBox, JpegColorSpace, JpegImageInfo};
use crate::engine::{DecoderConfig, ScanlineEngine};
use crate::error::DecodeError;
use crate::io::Source;
use crate::jpeg1::Jpeg1Decoder;
use crate::message_log::MessageLog;

/// State of the decompression cycle currently bound to an object.
#[derive(Debug, Clone, Copy)]
struct ActiveCycle {
    output: JpegImageInfo,
    finished_or_aborted: bool,
    decompress_called: bool,
}

/// Owns a decoding engine together with the diagnostics it produced.
///
/// Every engine failure is turned into an error entry of the [`MessageLog`] and sets the
/// error flag, which stays set until the next [`set_source`](Self::set_source). Only one
/// [`DecompressionCycle`](crate::decompress::DecompressionCycle) can run against an
/// object at a time; the object itself can be reused for any number of images.
pub struct DecompressionObject {
    engine: Box<dyn ScanlineEngine>,
    message_log: MessageLog,
    bound: bool,
    error: bool,
    /// Source position the engine's offsets are relative to.
    bound_at: u64,
    header: Option<JpegImageInfo>,
    out_color_space: JpegColorSpace,
    cycle: Option<ActiveCycle>,
}

impl Default for DecompressionObject {
    fn default() -> Self {
        Self::new()
    }
}

impl DecompressionObject {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self::with_engine(Box::new(Jpeg1Decoder::new(config)))
    }

    pub fn with_engine(engine: Box<dyn ScanlineEngine>) -> Self {
        Self {
            engine,
            message_log: MessageLog::new(),
            bound: false,
            error: false,
            bound_at: 0,
            header: None,
            out_color_space: JpegColorSpace::Auto,
            cycle: None,
        }
    }

    /// Binds the remaining bytes of `source` to the engine, dropping any previous image
    /// state. The message log is kept.
    pub fn set_source(&mut self, source: &mut dyn Source) {
        self.reset_image();
        self.error = false;
        self.bound = false;
        self.header = None;
        self.out_color_space = JpegColorSpace::Auto;
        self.bound_at = source.position();

        let mut data = Vec::new();
        if let Err(err) = source.read_to_end(&mut data) {
            self.record(DecodeError::from(err));
            return;
        }
        log::debug!("bound {} bytes at offset {}", data.len(), self.bound_at);

        if let Err(err) = self.engine.open(data) {
            self.record(err);
            return;
        }
        self.bound = true;
    }

    /// Parses the stream up to the first scan. Returns an invalid info on failure.
    /// Reading it again on the same binding returns the cached header.
    pub fn read_header(&mut self) -> JpegImageInfo {
        if !self.valid() {
            return JpegImageInfo::default();
        }
        if let Some(info) = self.header {
            self.out_color_space = JpegColorSpace::Auto;
            return info;
        }
        match self.engine.read_header(&mut self.message_log) {
            Ok(info) => {
                self.header = Some(info);
                // The header read establishes the default decompression parameters.
                self.out_color_space = JpegColorSpace::Auto;
                info
            }
            Err(err) => {
                self.record(err);
                JpegImageInfo::default()
            }
        }
    }

    /// Selects the output colour space of the next cycle; `Auto` keeps the native one.
    pub fn set_decompression_parameters(&mut self, out_color_space: JpegColorSpace) {
        self.out_color_space = out_color_space;
    }

    pub fn out_color_space(&self) -> JpegColorSpace {
        self.out_color_space
    }

    /// Header of the current image, if it was read successfully.
    pub fn header_info(&self) -> Option<JpegImageInfo> {
        self.header
    }

    pub fn message_log(&self) -> &MessageLog {
        &self.message_log
    }

    pub fn message_log_mut(&mut self) -> &mut MessageLog {
        &mut self.message_log
    }

    /// Bound to a source without any failure since.
    pub fn valid(&self) -> bool {
        self.bound && !self.error
    }

    pub fn error_state(&self) -> bool {
        self.error
    }

    /// Absolute source position of the engine's read cursor.
    pub fn stream_position(&self) -> u64 {
        self.bound_at + self.engine.position() as u64
    }

    fn record(&mut self, err: DecodeError) {
        self.message_log.add_error(err.to_string());
        self.error = true;
    }

    pub(crate) fn begin_cycle(&mut self, region: Option<BoundingBox>) {
        assert!(
            self.cycle.is_none(),
            "DecompressionObject: a decompression cycle is already active"
        );

        let finished = ActiveCycle {
            output: JpegImageInfo::default(),
            finished_or_aborted: true,
            decompress_called: false,
        };
        if !self.valid() || self.header.is_none() {
            self.cycle = Some(finished);
            return;
        }

        let region = match region {
            Some(r) if !self.engine.supports_partial_decoding() => {
                self.message_log.add_warning(format!(
                    "Partial decoding is not supported; decoding the full image instead of region {},{} {}x{}",
                    r.x0, r.y0, r.width, r.height
                ));
                None
            }
            other => other,
        };

        match self.engine.start(self.out_color_space, region, &mut self.message_log) {
            Ok(output) => {
                log::debug!(
                    "cycle started: {}x{} {} ({} channels)",
                    output.width,
                    output.height,
                    output.color_space,
                    output.nr_channels
                );
                self.cycle = Some(ActiveCycle {
                    output,
                    finished_or_aborted: false,
                    decompress_called: false,
                });
            }
            Err(err) => {
                self.record(err);
                self.abort_engine();
                self.cycle = Some(finished);
            }
        }
    }

    pub(crate) fn cycle_output_info(&self) -> JpegImageInfo {
        self.cycle.map(|c| c.output).unwrap_or_default()
    }

    pub(crate) fn decompress_cycle(&mut self, rows: &mut [&mut [u8]]) -> bool {
        let Some(cycle) = self.cycle.as_mut() else {
            return false;
        };
        assert!(
            !cycle.decompress_called,
            "DecompressionCycle: decompress() can only be called once per cycle"
        );
        cycle.decompress_called = true;
        if cycle.finished_or_aborted {
            return false;
        }
        cycle.finished_or_aborted = true;
        let height = cycle.output.height as usize;

        if rows.len() < height {
            self.message_log.add_error(format!(
                "Destination has {} rows, the image needs {}",
                rows.len(),
                height
            ));
            self.error = true;
            self.abort_engine();
            return false;
        }

        let result = rows[..height]
            .iter_mut()
            .try_for_each(|row| self.engine.read_scanline(row, &mut self.message_log))
            .and_then(|()| self.engine.finish(&mut self.message_log));
        match result {
            Ok(end) => {
                log::debug!("decoded {} rows, image ends at offset {}", height, end);
                true
            }
            Err(err) => {
                self.record(err);
                self.abort_engine();
                false
            }
        }
    }

    /// Releases the engine's scan state if the cycle did not run to completion.
    pub(crate) fn end_cycle(&mut self) {
        if let Some(cycle) = self.cycle.take() {
            if !cycle.finished_or_aborted {
                log::trace!("cycle dropped before decompression, aborting");
                self.abort_engine();
            }
        }
    }

    /// Ends any cycle and returns the engine to the start of the current image.
    pub(crate) fn reset_image(&mut self) {
        self.end_cycle();
        self.engine.abort();
        self.header = None;
    }

    fn abort_engine(&mut self) {
        self.engine.abort();
        self.header = None;
    }
}
