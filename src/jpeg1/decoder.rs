//! JPEG 1 sequential DCT decoder.

use crate::constants::{BLOCK_SIZE, MAXIMUM_BLOCKS_IN_MCU};
use crate::decompress::{BoundingBox, JpegColorSpace, JpegImageInfo};
use crate::engine::{DecoderConfig, ScanlineEngine};
use crate::error::DecodeError;
use crate::jpeg1::color::convert_row;
use crate::jpeg1::scan::{ComponentPlane, ScanComponentTables, ScanState};
use crate::jpeg_marker_code::{JPEG_MARKER_START_BYTE, JpegMarkerCode};
use crate::jpeg_stream_reader::{FrameHeader, JpegStreamReader};
use crate::message_log::MessageLog;

const ADOBE_TRANSFORM_UNKNOWN: u8 = 0;
const ADOBE_TRANSFORM_YCCK: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    Empty,
    Bound,
    HeaderRead,
    Decompressing,
}

impl DecoderState {
    fn name(self) -> &'static str {
        match self {
            DecoderState::Empty => "Empty",
            DecoderState::Bound => "Bound",
            DecoderState::HeaderRead => "HeaderRead",
            DecoderState::Decompressing => "Decompressing",
        }
    }
}

/// MCU grid of a frame.
#[derive(Debug, Clone, Copy)]
struct FrameGeometry {
    width: usize,
    height: usize,
    h_max: usize,
    v_max: usize,
    mcus_per_row: usize,
    mcu_rows: usize,
}

impl FrameGeometry {
    fn new(frame: &FrameHeader) -> Self {
        let width = frame.width as usize;
        let height = frame.height as usize;
        let h_max = frame.max_h_samp_factor() as usize;
        let v_max = frame.max_v_samp_factor() as usize;
        Self {
            width,
            height,
            h_max,
            v_max,
            mcus_per_row: width.div_ceil(BLOCK_SIZE * h_max),
            mcu_rows: height.div_ceil(BLOCK_SIZE * v_max),
        }
    }
}

/// Colour space the samples of a frame are encoded in, following the JFIF and Adobe
/// conventions used by libjpeg.
fn native_color_space(frame: &FrameHeader, saw_jfif_marker: bool, adobe_transform: Option<u8>) -> JpegColorSpace {
    match frame.components.len() {
        1 => JpegColorSpace::Grayscale,
        3 => {
            if saw_jfif_marker {
                return JpegColorSpace::YCbCr;
            }
            match adobe_transform {
                Some(ADOBE_TRANSFORM_UNKNOWN) => JpegColorSpace::Rgb,
                Some(_) => JpegColorSpace::YCbCr,
                None => {
                    let ids: Vec<u8> = frame.components.iter().map(|c| c.id).collect();
                    if ids == b"RGB" {
                        JpegColorSpace::Rgb
                    } else {
                        JpegColorSpace::YCbCr
                    }
                }
            }
        }
        4 => {
            if adobe_transform == Some(ADOBE_TRANSFORM_YCCK) {
                JpegColorSpace::Ycck
            } else {
                JpegColorSpace::Cmyk
            }
        }
        _ => JpegColorSpace::Unknown,
    }
}

/// Reads the SOS segment at the current position and resolves the tables it uses.
/// Quantization tables are latched the first time a component appears in a scan.
fn begin_scan(
    reader: &mut JpegStreamReader,
    frame: &FrameHeader,
    geometry: &FrameGeometry,
    planes: &mut [ComponentPlane],
) -> Result<ScanState, DecodeError> {
    let header = reader.read_start_of_scan_segment()?;
    let interleaved = header.components.len() > 1;

    if interleaved {
        let blocks_in_mcu: u32 = header
            .components
            .iter()
            .map(|sc| {
                let c = &frame.components[sc.component_index];
                c.h_samp_factor as u32 * c.v_samp_factor as u32
            })
            .sum();
        if blocks_in_mcu > MAXIMUM_BLOCKS_IN_MCU {
            return Err(DecodeError::InvalidScanHeader);
        }
    }

    let mut tables = Vec::with_capacity(header.components.len());
    for sc in &header.components {
        let component = &frame.components[sc.component_index];
        let plane = &mut planes[sc.component_index];
        if plane.quant_table.is_none() {
            let table = reader.quantization_tables[component.quant_table_dest as usize]
                .ok_or(DecodeError::MissingQuantizationTable(component.quant_table_dest))?;
            plane.quant_table = Some(table);
        }
        let dc_table = reader.huffman_tables_dc[sc.dc_table_dest as usize]
            .clone()
            .ok_or(DecodeError::MissingHuffmanTable { class: "DC", index: sc.dc_table_dest })?;
        let ac_table = reader.huffman_tables_ac[sc.ac_table_dest as usize]
            .clone()
            .ok_or(DecodeError::MissingHuffmanTable { class: "AC", index: sc.ac_table_dest })?;
        tables.push(ScanComponentTables {
            plane: sc.component_index,
            dc_table,
            ac_table,
        });
    }

    let (units_per_row, unit_rows) = if interleaved {
        (geometry.mcus_per_row, geometry.mcu_rows)
    } else {
        let component = &frame.components[header.components[0].component_index];
        let component_width = (geometry.width * component.h_samp_factor as usize).div_ceil(geometry.h_max);
        let component_height = (geometry.height * component.v_samp_factor as usize).div_ceil(geometry.v_max);
        (component_width.div_ceil(BLOCK_SIZE), component_height.div_ceil(BLOCK_SIZE))
    };

    log::trace!(
        "scan with {} component(s): {}x{} units, restart interval {}",
        tables.len(),
        units_per_row,
        unit_rows,
        reader.restart_interval
    );
    Ok(ScanState::new(
        tables,
        units_per_row,
        unit_rows,
        reader.restart_interval,
        reader.position(),
    ))
}

/// State of one decompression pass, from `start` to `finish`.
struct DecodeSession {
    frame: FrameHeader,
    geometry: FrameGeometry,
    native_color_space: JpegColorSpace,
    out_color_space: JpegColorSpace,
    region: BoundingBox,
    planes: Vec<ComponentPlane>,
    /// Scan currently being decoded; `None` between scans.
    scan: Option<ScanState>,
    /// Single scan holding every component: decoded lazily, one unit row at a time.
    streaming: bool,
    /// Full-resolution rows (from the top of the image) whose samples are complete.
    rows_available: usize,
    rows_per_unit_row: usize,
    next_output_row: u32,
    reached_end_of_image: bool,
    component_rows: Vec<Vec<u8>>,
}

impl DecodeSession {
    fn ensure_rows(&mut self, reader: &mut JpegStreamReader, needed: usize, log: &mut MessageLog) -> Result<(), DecodeError> {
        if self.rows_available >= needed {
            return Ok(());
        }
        if !self.streaming {
            return self.decode_remaining_scans(reader, log);
        }
        let Some(scan) = self.scan.as_mut() else {
            return Err(DecodeError::PrematureEnd);
        };
        while self.rows_available < needed {
            if scan.is_complete() {
                return Err(DecodeError::PrematureEnd);
            }
            scan.decode_unit_row(reader.data(), &mut self.planes)?;
            self.rows_available = (scan.next_unit_row * self.rows_per_unit_row).min(self.geometry.height);
        }
        Ok(())
    }

    /// Decodes every remaining scan of a multi-scan image, up to the end of image.
    fn decode_remaining_scans(&mut self, reader: &mut JpegStreamReader, log: &mut MessageLog) -> Result<(), DecodeError> {
        loop {
            if let Some(scan) = self.scan.as_mut() {
                while !scan.is_complete() {
                    scan.decode_unit_row(reader.data(), &mut self.planes)?;
                }
                reader.set_position(scan.position());
                self.scan = None;
            }

            match reader.read_next_marker(log) {
                Ok(JpegMarkerCode::StartOfScan) => {
                    self.scan = Some(begin_scan(reader, &self.frame, &self.geometry, &mut self.planes)?);
                }
                Ok(JpegMarkerCode::EndOfImage) => {
                    self.reached_end_of_image = true;
                    break;
                }
                Ok(marker) => process_table_or_misc_marker(reader, marker)?,
                Err(DecodeError::PrematureEnd) => {
                    log.add_warning("Premature end of JPEG file");
                    reader.set_position(reader.data().len());
                    self.reached_end_of_image = true;
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        self.rows_available = self.geometry.height;
        Ok(())
    }

    /// Reads the markers after the last scan up to and including EOI.
    fn read_trailing_markers(&mut self, reader: &mut JpegStreamReader, log: &mut MessageLog) -> Result<(), DecodeError> {
        if let Some(scan) = self.scan.take() {
            reader.set_position(scan.position());
            if !scan.is_complete() {
                if let Err(err) = reader.skip_entropy_coded_data() {
                    return tolerate_missing_end(reader, err, log);
                }
            }
        }
        loop {
            match reader.read_next_marker(log) {
                Ok(JpegMarkerCode::EndOfImage) => return Ok(()),
                Ok(JpegMarkerCode::StartOfScan) => {
                    return Err(DecodeError::UnexpectedMarker(JpegMarkerCode::StartOfScan.into()));
                }
                Ok(marker) => process_table_or_misc_marker(reader, marker)?,
                Err(err) => return tolerate_missing_end(reader, err, log),
            }
        }
    }
}

/// A stream that ends after the last scan without EOI is still decodable.
fn tolerate_missing_end(reader: &mut JpegStreamReader, err: DecodeError, log: &mut MessageLog) -> Result<(), DecodeError> {
    if err != DecodeError::PrematureEnd {
        return Err(err);
    }
    log.add_warning("Premature end of JPEG file");
    reader.set_position(reader.data().len());
    Ok(())
}

/// Handles the markers allowed between scans and after the last one.
fn process_table_or_misc_marker(reader: &mut JpegStreamReader, marker: JpegMarkerCode) -> Result<(), DecodeError> {
    match marker {
        JpegMarkerCode::DefineHuffmanTable => reader.read_dht_segment(),
        JpegMarkerCode::DefineQuantizationTable => reader.read_dqt_segment(),
        JpegMarkerCode::DefineRestartInterval => reader.read_dri_segment(),
        JpegMarkerCode::Comment => reader.skip_segment(),
        m if m.is_application_data() => reader.read_application_data_segment(m),
        m => Err(DecodeError::UnexpectedMarker(m.into())),
    }
}

/// Sequential DCT (SOF0/SOF1) decoder producing one output scanline at a time.
pub struct Jpeg1Decoder {
    config: DecoderConfig,
    reader: JpegStreamReader,
    state: DecoderState,
    image_start: usize,
    native_color_space: JpegColorSpace,
    session: Option<DecodeSession>,
}

impl Default for Jpeg1Decoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl Jpeg1Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            reader: JpegStreamReader::default(),
            state: DecoderState::Empty,
            image_start: 0,
            native_color_space: JpegColorSpace::Unknown,
            session: None,
        }
    }

    fn expect_state(&self, expected: DecoderState) -> Result<(), DecodeError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(DecodeError::BadState(self.state.name()))
        }
    }

    fn parse_header(&mut self, log: &mut MessageLog) -> Result<JpegImageInfo, DecodeError> {
        self.reader.read_start_of_image()?;

        loop {
            let marker = self.reader.read_next_marker(log)?;
            match marker {
                m if m.is_supported_start_of_frame() => self.reader.read_start_of_frame_segment(m)?,
                m if m.is_start_of_frame() => return Err(DecodeError::UnsupportedProcess(m.into())),
                JpegMarkerCode::DefineHierarchicalProgression | JpegMarkerCode::ExpandReferenceComponents => {
                    return Err(DecodeError::UnsupportedProcess(marker.into()));
                }
                JpegMarkerCode::DefineArithmeticConditioning => self.reader.skip_segment()?,
                JpegMarkerCode::StartOfScan => {
                    if self.reader.frame.is_none() {
                        return Err(DecodeError::MissingFrame);
                    }
                    // Leave the SOS marker for the first scan.
                    self.reader.set_position(self.reader.position() - 2);
                    break;
                }
                JpegMarkerCode::EndOfImage => return Err(DecodeError::NoImage),
                m => process_table_or_misc_marker(&mut self.reader, m)?,
            }
        }

        let frame = self.reader.frame.as_ref().ok_or(DecodeError::MissingFrame)?;
        let h_max = frame.max_h_samp_factor();
        let v_max = frame.max_v_samp_factor();
        for c in &frame.components {
            // Only integral upsampling ratios are supported.
            if h_max % c.h_samp_factor != 0 || v_max % c.v_samp_factor != 0 {
                return Err(DecodeError::InvalidSamplingFactors {
                    id: c.id,
                    h: c.h_samp_factor,
                    v: c.v_samp_factor,
                });
            }
        }

        let pixels = frame.width as u64 * frame.height as u64;
        if let Some(limit) = self.config.max_pixels {
            if pixels > limit {
                return Err(DecodeError::ImageTooLarge { pixels, limit });
            }
        }

        let color_space = native_color_space(frame, self.reader.saw_jfif_marker, self.reader.adobe_transform);
        if color_space == JpegColorSpace::Unknown {
            return Err(DecodeError::InvalidComponentCount(frame.components.len() as u8));
        }
        self.native_color_space = color_space;

        log::debug!(
            "JPEG header: {}x{}, {} component(s), {}",
            frame.width,
            frame.height,
            frame.components.len(),
            color_space
        );
        Ok(JpegImageInfo::new(
            frame.width,
            frame.height,
            frame.components.len() as u16,
            color_space,
        ))
    }

    fn start_session(
        &mut self,
        out_color_space: JpegColorSpace,
        region: Option<BoundingBox>,
        log: &mut MessageLog,
    ) -> Result<DecodeSession, DecodeError> {
        let native = self.native_color_space;
        let target = out_color_space.resolve(native);
        if !native.can_convert_to(target) {
            return Err(DecodeError::UnsupportedColorConversion { from: native, to: target });
        }

        let frame = self.reader.frame.clone().ok_or(DecodeError::MissingFrame)?;
        let geometry = FrameGeometry::new(&frame);
        let window = match region {
            Some(r) => r.clipped_to(frame.width, frame.height).ok_or(DecodeError::EmptyRegion {
                x0: r.x0,
                y0: r.y0,
                width: r.width,
                height: r.height,
            })?,
            None => BoundingBox::new(0, 0, frame.width, frame.height),
        };

        let mut planes: Vec<ComponentPlane> = frame
            .components
            .iter()
            .map(|c| {
                ComponentPlane::new(
                    c.h_samp_factor as usize,
                    c.v_samp_factor as usize,
                    geometry.h_max,
                    geometry.v_max,
                    geometry.mcus_per_row,
                    geometry.mcu_rows,
                )
            })
            .collect();
        if region.is_some() {
            for plane in &mut planes {
                plane.restrict_to(window.x0..window.x_end(), window.y0..window.y_end());
            }
        }

        let marker = self.reader.read_next_marker(log)?;
        if marker != JpegMarkerCode::StartOfScan {
            return Err(DecodeError::UnexpectedMarker(marker.into()));
        }
        let scan = begin_scan(&mut self.reader, &frame, &geometry, &mut planes)?;

        let streaming = scan.components.len() == frame.components.len();
        // Streaming decodes keep only the unit row being output.
        for plane in &mut planes {
            let sample_rows = match (streaming, scan.is_interleaved()) {
                (true, true) => plane.v_samp_factor * BLOCK_SIZE,
                (true, false) => BLOCK_SIZE,
                (false, _) => plane.height,
            };
            plane.allocate(sample_rows)?;
        }
        let rows_per_unit_row = if scan.is_interleaved() {
            geometry.v_max * BLOCK_SIZE
        } else {
            planes[scan.components[0].plane].y_factor * BLOCK_SIZE
        };

        log::debug!(
            "decompressing {}x{} at {},{} as {} ({})",
            window.width,
            window.height,
            window.x0,
            window.y0,
            target,
            if streaming { "streaming" } else { "multi-scan" }
        );
        Ok(DecodeSession {
            component_rows: vec![vec![0u8; window.width as usize]; frame.components.len()],
            frame,
            geometry,
            native_color_space: native,
            out_color_space: target,
            region: window,
            planes,
            scan: Some(scan),
            streaming,
            rows_available: 0,
            rows_per_unit_row,
            next_output_row: 0,
            reached_end_of_image: false,
        })
    }
}

impl ScanlineEngine for Jpeg1Decoder {
    fn open(&mut self, data: Vec<u8>) -> Result<(), DecodeError> {
        self.session = None;
        self.image_start = 0;
        self.native_color_space = JpegColorSpace::Unknown;
        self.state = DecoderState::Empty;
        self.reader = JpegStreamReader::new(data);

        match self.reader.data() {
            [] => Err(DecodeError::EmptyInput),
            [_] => Err(DecodeError::PrematureEnd),
            [JPEG_MARKER_START_BYTE, 0xD8, ..] => {
                self.state = DecoderState::Bound;
                Ok(())
            }
            [first, second, ..] => Err(DecodeError::NotAJpeg(*first, *second)),
        }
    }

    fn read_header(&mut self, log: &mut MessageLog) -> Result<JpegImageInfo, DecodeError> {
        self.expect_state(DecoderState::Bound)?;
        self.reader.set_position(self.image_start);
        match self.parse_header(log) {
            Ok(info) => {
                self.state = DecoderState::HeaderRead;
                Ok(info)
            }
            Err(err) => {
                self.reader.set_position(self.image_start);
                self.reader.frame = None;
                Err(err)
            }
        }
    }

    fn supports_partial_decoding(&self) -> bool {
        self.config.partial_decoding
    }

    fn start(
        &mut self,
        out_color_space: JpegColorSpace,
        region: Option<BoundingBox>,
        log: &mut MessageLog,
    ) -> Result<JpegImageInfo, DecodeError> {
        self.expect_state(DecoderState::HeaderRead)?;
        let header_end = self.reader.position();
        match self.start_session(out_color_space, region, log) {
            Ok(session) => {
                let info = JpegImageInfo::new(
                    session.region.width,
                    session.region.height,
                    session.out_color_space.nr_channels(),
                    session.out_color_space,
                );
                self.session = Some(session);
                self.state = DecoderState::Decompressing;
                Ok(info)
            }
            Err(err) => {
                self.reader.set_position(header_end);
                Err(err)
            }
        }
    }

    fn read_scanline(&mut self, row: &mut [u8], log: &mut MessageLog) -> Result<(), DecodeError> {
        self.expect_state(DecoderState::Decompressing)?;
        let Self { reader, session, state, .. } = self;
        let session = session.as_mut().ok_or(DecodeError::BadState(state.name()))?;

        if session.next_output_row >= session.region.height {
            return Err(DecodeError::TooManyScanlines);
        }
        let width = session.region.width as usize;
        let needed = width * session.out_color_space.nr_channels() as usize;
        if row.len() < needed {
            return Err(DecodeError::ScanlineBufferTooSmall {
                needed,
                available: row.len(),
            });
        }

        let y = (session.region.y0 + session.next_output_row) as usize;
        session.ensure_rows(reader, y + 1, log)?;

        let x0 = session.region.x0 as usize;
        for (plane, samples) in session.planes.iter().zip(session.component_rows.iter_mut()) {
            for (i, sample) in samples.iter_mut().enumerate() {
                *sample = plane.sample_at(x0 + i, y);
            }
        }
        convert_row(
            session.native_color_space,
            session.out_color_space,
            &session.component_rows,
            width,
            row,
        )?;
        session.next_output_row += 1;
        Ok(())
    }

    fn finish(&mut self, log: &mut MessageLog) -> Result<usize, DecodeError> {
        self.expect_state(DecoderState::Decompressing)?;
        let Self { reader, session, state, .. } = self;
        let session = session.as_mut().ok_or(DecodeError::BadState(state.name()))?;

        if session.next_output_row < session.region.height {
            return Err(DecodeError::TooFewScanlines {
                read: session.next_output_row,
                height: session.region.height,
            });
        }
        if !session.reached_end_of_image {
            session.read_trailing_markers(reader, log)?;
        }

        self.session = None;
        self.image_start = self.reader.position();
        self.state = DecoderState::Bound;
        log::debug!("finished image, next image starts at offset {}", self.image_start);
        Ok(self.image_start)
    }

    fn abort(&mut self) {
        self.session = None;
        if self.state != DecoderState::Empty {
            self.state = DecoderState::Bound;
            self.reader.set_position(self.image_start);
            self.reader.frame = None;
        }
    }

    fn position(&self) -> usize {
        self.reader.position()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 8x8 grayscale image whose samples all decode to 128 + 4.
    pub(crate) fn gray_8x8() -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        data.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x43, 0x00]);
        data.extend_from_slice(&[8; 64]);
        data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 8, 0x00, 0x08, 0x00, 0x08, 1, 1, 0x11, 0]);
        // DC: "00" -> category 0, "01" -> category 3.
        data.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x15, 0x00, 0, 2]);
        data.extend_from_slice(&[0; 14]);
        data.extend_from_slice(&[0, 3]);
        // AC: "0" -> EOB.
        data.extend_from_slice(&[0xFF, 0xC4, 0x00, 0x14, 0x10, 1]);
        data.extend_from_slice(&[0; 15]);
        data.push(0x00);
        data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 1, 1, 0x00, 0, 63, 0]);
        // "01" "100" (+4) "0" then padding.
        data.push(0b0110_0011);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    fn decoder_with(data: &[u8]) -> Jpeg1Decoder {
        let mut decoder = Jpeg1Decoder::default();
        decoder.open(data.to_vec()).unwrap();
        decoder
    }

    #[test]
    fn test_open_rejects_non_jpeg() {
        let mut decoder = Jpeg1Decoder::default();
        assert_eq!(decoder.open(Vec::new()), Err(DecodeError::EmptyInput));
        assert_eq!(decoder.open(vec![0x89, b'P', b'N']), Err(DecodeError::NotAJpeg(0x89, b'P')));
        let mut log = MessageLog::new();
        assert_eq!(decoder.read_header(&mut log), Err(DecodeError::BadState("Empty")));
    }

    #[test]
    fn test_decode_gray_image() {
        let mut decoder = decoder_with(&gray_8x8());
        let mut log = MessageLog::new();
        let header = decoder.read_header(&mut log).unwrap();
        assert_eq!(header, JpegImageInfo::new(8, 8, 1, JpegColorSpace::Grayscale));

        let output = decoder.start(JpegColorSpace::Auto, None, &mut log).unwrap();
        assert_eq!(output, header);
        let mut row = [0u8; 8];
        for _ in 0..8 {
            decoder.read_scanline(&mut row, &mut log).unwrap();
            assert_eq!(row, [132; 8]);
        }
        assert_eq!(decoder.read_scanline(&mut row, &mut log), Err(DecodeError::TooManyScanlines));
        assert_eq!(decoder.finish(&mut log), Ok(gray_8x8().len()));
        assert!(log.is_empty());
    }

    #[test]
    fn test_second_header_read_is_bad_state() {
        let mut decoder = decoder_with(&gray_8x8());
        let mut log = MessageLog::new();
        decoder.read_header(&mut log).unwrap();
        assert_eq!(decoder.read_header(&mut log), Err(DecodeError::BadState("HeaderRead")));
    }

    #[test]
    fn test_abort_rewinds_to_image_start() {
        let mut decoder = decoder_with(&gray_8x8());
        let mut log = MessageLog::new();
        decoder.read_header(&mut log).unwrap();
        decoder.start(JpegColorSpace::Rgb, None, &mut log).unwrap();
        decoder.abort();
        assert_eq!(decoder.position(), 0);
        assert!(decoder.read_header(&mut log).is_ok());
    }

    #[test]
    fn test_unsupported_conversion_keeps_header() {
        let mut decoder = decoder_with(&gray_8x8());
        let mut log = MessageLog::new();
        decoder.read_header(&mut log).unwrap();
        assert_eq!(
            decoder.start(JpegColorSpace::Cmyk, None, &mut log),
            Err(DecodeError::UnsupportedColorConversion {
                from: JpegColorSpace::Grayscale,
                to: JpegColorSpace::Cmyk
            })
        );
        assert!(decoder.start(JpegColorSpace::Bgra, None, &mut log).is_ok());
    }

    #[test]
    fn test_max_pixels_limit() {
        let mut decoder = Jpeg1Decoder::new(DecoderConfig {
            partial_decoding: true,
            max_pixels: Some(63),
        });
        decoder.open(gray_8x8()).unwrap();
        let mut log = MessageLog::new();
        assert_eq!(
            decoder.read_header(&mut log),
            Err(DecodeError::ImageTooLarge { pixels: 64, limit: 63 })
        );
    }

    #[test]
    fn test_progressive_is_unsupported() {
        let mut data = gray_8x8();
        let sof = data.windows(2).position(|w| w == [0xFF, 0xC0]).unwrap();
        data[sof + 1] = 0xC2;
        let mut decoder = decoder_with(&data);
        let mut log = MessageLog::new();
        assert_eq!(decoder.read_header(&mut log), Err(DecodeError::UnsupportedProcess(0xC2)));
    }
}
