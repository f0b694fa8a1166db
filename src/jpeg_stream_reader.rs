use crate::constants::{
    BLOCK_DIM, MAXIMUM_COMPONENT_COUNT, MAXIMUM_COMPONENT_COUNT_IN_SCAN, MAXIMUM_SAMPLING_FACTOR,
    MINIMUM_COMPONENT_COUNT, SEGMENT_LENGTH_SIZE, SUPPORTED_PRECISION, TABLE_SLOT_COUNT,
};
use crate::error::DecodeError;
use crate::jpeg1::huffman::HuffmanTable;
use crate::jpeg1::quantization::{QuantizationTable, table_from_zigzag};
use crate::jpeg_marker_code::{JPEG_MARKER_START_BYTE, JpegMarkerCode};
use crate::message_log::MessageLog;

const JFIF_IDENTIFIER: &[u8] = b"JFIF\0";
const ADOBE_IDENTIFIER: &[u8] = b"Adobe";
const ADOBE_SEGMENT_MIN_SIZE: usize = 12;
const ADOBE_TRANSFORM_OFFSET: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameComponent {
    pub id: u8,
    pub h_samp_factor: u8,
    pub v_samp_factor: u8,
    pub quant_table_dest: u8,
}

/// Parsed SOF segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub marker: JpegMarkerCode,
    pub precision: u8,
    pub width: u32,
    pub height: u32,
    pub components: Vec<FrameComponent>,
}

impl FrameHeader {
    pub fn max_h_samp_factor(&self) -> u8 {
        self.components.iter().map(|c| c.h_samp_factor).max().unwrap_or(1)
    }

    pub fn max_v_samp_factor(&self) -> u8 {
        self.components.iter().map(|c| c.v_samp_factor).max().unwrap_or(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanComponent {
    /// Index into [`FrameHeader::components`].
    pub component_index: usize,
    pub dc_table_dest: u8,
    pub ac_table_dest: u8,
}

/// Parsed SOS segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHeader {
    pub components: Vec<ScanComponent>,
}

/// Marker segment parser over the bound input data.
///
/// Tables persist across the images of one stream; frame and colour hints are reset at
/// each start of image.
pub struct JpegStreamReader {
    data: Vec<u8>,
    position: usize,
    pub quantization_tables: [Option<QuantizationTable>; TABLE_SLOT_COUNT],
    pub huffman_tables_dc: [Option<HuffmanTable>; TABLE_SLOT_COUNT],
    pub huffman_tables_ac: [Option<HuffmanTable>; TABLE_SLOT_COUNT],
    pub restart_interval: u16,
    pub frame: Option<FrameHeader>,
    pub saw_jfif_marker: bool,
    pub adobe_transform: Option<u8>,
}

impl Default for JpegStreamReader {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl JpegStreamReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            position: 0,
            quantization_tables: [None; TABLE_SLOT_COUNT],
            huffman_tables_dc: [const { None }; TABLE_SLOT_COUNT],
            huffman_tables_ac: [const { None }; TABLE_SLOT_COUNT],
            restart_interval: 0,
            frame: None,
            saw_jfif_marker: false,
            adobe_transform: None,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.data.len());
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let value = *self.data.get(self.position).ok_or(DecodeError::PrematureEnd)?;
        self.position += 1;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let high = self.read_u8()? as u16;
        let low = self.read_u8()? as u16;
        Ok((high << 8) | low)
    }

    /// Consumes the SOI marker, which must be the first two bytes.
    pub fn read_start_of_image(&mut self) -> Result<(), DecodeError> {
        let first = self.read_u8()?;
        let second = self.read_u8()?;
        if first != JPEG_MARKER_START_BYTE || second != u8::from(JpegMarkerCode::StartOfImage) {
            return Err(DecodeError::NotAJpeg(first, second));
        }
        self.restart_interval = 0;
        self.frame = None;
        self.saw_jfif_marker = false;
        self.adobe_transform = None;
        Ok(())
    }

    /// Finds the next marker, skipping fill bytes. Any other bytes in between are
    /// reported as a warning.
    pub fn read_next_marker(&mut self, log: &mut MessageLog) -> Result<JpegMarkerCode, DecodeError> {
        let mut discarded = 0usize;
        loop {
            while self.read_u8()? != JPEG_MARKER_START_BYTE {
                discarded += 1;
            }
            let mut code = self.read_u8()?;
            while code == JPEG_MARKER_START_BYTE {
                code = self.read_u8()?;
            }
            if code != 0 {
                if discarded > 0 {
                    log.add_warning(format!(
                        "Corrupt JPEG data: {} extraneous bytes before marker 0x{:02x}",
                        discarded, code
                    ));
                }
                return JpegMarkerCode::from_byte(code);
            }
            // A stuffed 0xFF outside of scan data counts as garbage.
            discarded += 2;
        }
    }

    /// Reads the segment length and returns the payload bounds.
    fn read_segment_bounds(&mut self) -> Result<(usize, usize), DecodeError> {
        let length = self.read_u16()? as usize;
        if length < SEGMENT_LENGTH_SIZE {
            return Err(DecodeError::InvalidSegmentLength);
        }
        let start = self.position;
        let end = start + length - SEGMENT_LENGTH_SIZE;
        if end > self.data.len() {
            return Err(DecodeError::PrematureEnd);
        }
        Ok((start, end))
    }

    pub fn skip_segment(&mut self) -> Result<(), DecodeError> {
        let (_, end) = self.read_segment_bounds()?;
        self.position = end;
        Ok(())
    }

    pub fn read_start_of_frame_segment(&mut self, marker: JpegMarkerCode) -> Result<(), DecodeError> {
        if self.frame.is_some() {
            return Err(DecodeError::DuplicateStartOfFrame);
        }
        let (start, end) = self.read_segment_bounds()?;
        if end - start < 6 {
            return Err(DecodeError::InvalidSegmentLength);
        }

        let precision = self.read_u8()?;
        let height = self.read_u16()? as u32;
        let width = self.read_u16()? as u32;
        let component_count = self.read_u8()?;

        if precision != SUPPORTED_PRECISION {
            return Err(DecodeError::UnsupportedPrecision(precision));
        }
        if width == 0 || height == 0 {
            return Err(DecodeError::InvalidDimensions { width, height });
        }
        if !(MINIMUM_COMPONENT_COUNT..=MAXIMUM_COMPONENT_COUNT).contains(&component_count) {
            return Err(DecodeError::InvalidComponentCount(component_count));
        }
        if end - start != 6 + component_count as usize * 3 {
            return Err(DecodeError::InvalidSegmentLength);
        }

        let mut components = Vec::with_capacity(component_count as usize);
        for _ in 0..component_count {
            let id = self.read_u8()?;
            let sampling = self.read_u8()?;
            let quant_table_dest = self.read_u8()?;
            let h = sampling >> 4;
            let v = sampling & 0x0F;
            if !(1..=MAXIMUM_SAMPLING_FACTOR).contains(&h) || !(1..=MAXIMUM_SAMPLING_FACTOR).contains(&v) {
                return Err(DecodeError::InvalidSamplingFactors { id, h, v });
            }
            if quant_table_dest as usize >= TABLE_SLOT_COUNT {
                return Err(DecodeError::InvalidQuantizationTable(quant_table_dest));
            }
            components.push(FrameComponent {
                id,
                h_samp_factor: h,
                v_samp_factor: v,
                quant_table_dest,
            });
        }

        self.frame = Some(FrameHeader {
            marker,
            precision,
            width,
            height,
            components,
        });
        self.position = end;
        Ok(())
    }

    pub fn read_dqt_segment(&mut self) -> Result<(), DecodeError> {
        let (_, end) = self.read_segment_bounds()?;
        while self.position < end {
            let pq_tq = self.read_u8()?;
            let precision = pq_tq >> 4;
            let index = pq_tq & 0x0F;
            if index as usize >= TABLE_SLOT_COUNT || precision > 1 {
                return Err(DecodeError::InvalidQuantizationTable(index));
            }
            let entry_size = if precision == 0 { 1 } else { 2 };
            if self.position + BLOCK_DIM * entry_size > end {
                return Err(DecodeError::InvalidSegmentLength);
            }
            let mut zigzag = [0u16; BLOCK_DIM];
            for value in zigzag.iter_mut() {
                *value = if precision == 0 {
                    self.read_u8()? as u16
                } else {
                    self.read_u16()?
                };
            }
            self.quantization_tables[index as usize] = Some(table_from_zigzag(&zigzag));
        }
        Ok(())
    }

    pub fn read_dht_segment(&mut self) -> Result<(), DecodeError> {
        let (_, end) = self.read_segment_bounds()?;
        while self.position < end {
            let tc_th = self.read_u8()?;
            let class = tc_th >> 4;
            let index = (tc_th & 0x0F) as usize;
            if class > 1 || index >= TABLE_SLOT_COUNT {
                return Err(DecodeError::InvalidHuffmanTable);
            }
            if self.position + 16 > end {
                return Err(DecodeError::InvalidSegmentLength);
            }
            let mut lengths = [0u8; 16];
            for length in lengths.iter_mut() {
                *length = self.read_u8()?;
            }
            let count: usize = lengths.iter().map(|&n| n as usize).sum();
            if self.position + count > end {
                return Err(DecodeError::InvalidSegmentLength);
            }
            let values = &self.data[self.position..self.position + count];
            let table = HuffmanTable::build_from_dht(&lengths, values)?;
            self.position += count;

            if class == 0 {
                self.huffman_tables_dc[index] = Some(table);
            } else {
                self.huffman_tables_ac[index] = Some(table);
            }
        }
        Ok(())
    }

    pub fn read_dri_segment(&mut self) -> Result<(), DecodeError> {
        let (start, end) = self.read_segment_bounds()?;
        if end - start != 2 {
            return Err(DecodeError::InvalidSegmentLength);
        }
        self.restart_interval = self.read_u16()?;
        Ok(())
    }

    /// APP0 (JFIF) and APP14 (Adobe) carry colour space hints; other application
    /// segments are skipped.
    pub fn read_application_data_segment(&mut self, marker: JpegMarkerCode) -> Result<(), DecodeError> {
        let (start, end) = self.read_segment_bounds()?;
        let payload = &self.data[start..end];
        match marker {
            JpegMarkerCode::ApplicationData0 if payload.starts_with(JFIF_IDENTIFIER) => {
                self.saw_jfif_marker = true;
            }
            JpegMarkerCode::ApplicationData14
                if payload.len() >= ADOBE_SEGMENT_MIN_SIZE && payload.starts_with(ADOBE_IDENTIFIER) =>
            {
                self.adobe_transform = Some(payload[ADOBE_TRANSFORM_OFFSET]);
            }
            _ => {}
        }
        self.position = end;
        Ok(())
    }

    /// Reads an SOS segment and resolves its component references against the frame.
    pub fn read_start_of_scan_segment(&mut self) -> Result<ScanHeader, DecodeError> {
        let (_, end) = self.read_segment_bounds()?;
        let frame = self.frame.as_ref().ok_or(DecodeError::MissingFrame)?;

        let component_count = self.data.get(self.position).copied().ok_or(DecodeError::PrematureEnd)? as usize;
        if component_count == 0
            || component_count > MAXIMUM_COMPONENT_COUNT_IN_SCAN
            || component_count > frame.components.len()
        {
            return Err(DecodeError::InvalidScanHeader);
        }
        if end - self.position != 1 + component_count * 2 + 3 {
            return Err(DecodeError::InvalidSegmentLength);
        }

        let bytes = &self.data[self.position + 1..end];
        let mut components: Vec<ScanComponent> = Vec::with_capacity(component_count);
        for pair in bytes[..component_count * 2].chunks_exact(2) {
            let id = pair[0];
            let component_index = frame
                .components
                .iter()
                .position(|c| c.id == id)
                .ok_or(DecodeError::UnknownComponentId(id))?;
            if components.iter().any(|c| c.component_index == component_index) {
                return Err(DecodeError::InvalidScanHeader);
            }
            let dc_table_dest = pair[1] >> 4;
            let ac_table_dest = pair[1] & 0x0F;
            if dc_table_dest as usize >= TABLE_SLOT_COUNT || ac_table_dest as usize >= TABLE_SLOT_COUNT {
                return Err(DecodeError::InvalidScanHeader);
            }
            components.push(ScanComponent {
                component_index,
                dc_table_dest,
                ac_table_dest,
            });
        }

        // Sequential scans cover the full spectrum without successive approximation.
        let spectral_start = bytes[component_count * 2];
        let spectral_end = bytes[component_count * 2 + 1];
        let approximation = bytes[component_count * 2 + 2];
        if spectral_start != 0 || spectral_end != 63 || approximation != 0 {
            return Err(DecodeError::InvalidScanHeader);
        }

        self.position = end;
        Ok(ScanHeader { components })
    }

    /// Skips the rest of entropy-coded data, including restart markers, and stops at the
    /// next real marker.
    pub fn skip_entropy_coded_data(&mut self) -> Result<(), DecodeError> {
        let data = &self.data;
        let mut position = self.position;
        loop {
            let offset = data[position.min(data.len())..]
                .iter()
                .position(|&b| b == JPEG_MARKER_START_BYTE)
                .ok_or(DecodeError::PrematureEnd)?;
            position += offset;
            let mut next = position + 1;
            while data.get(next) == Some(&JPEG_MARKER_START_BYTE) {
                next += 1;
            }
            match data.get(next) {
                None => return Err(DecodeError::PrematureEnd),
                Some(0) | Some(0xD0..=0xD7) => position = next + 1,
                Some(_) => {
                    self.position = position;
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_for(bytes: &[u8]) -> JpegStreamReader {
        JpegStreamReader::new(bytes.to_vec())
    }

    #[test]
    fn test_start_of_image_is_required() {
        assert_eq!(reader_for(&[0xFF, 0xD8]).read_start_of_image(), Ok(()));
        assert_eq!(
            reader_for(&[0x89, 0x50]).read_start_of_image(),
            Err(DecodeError::NotAJpeg(0x89, 0x50))
        );
        assert_eq!(reader_for(&[0xFF]).read_start_of_image(), Err(DecodeError::PrematureEnd));
    }

    #[test]
    fn test_extraneous_bytes_are_a_warning() {
        let mut reader = reader_for(&[0x12, 0x34, 0xFF, 0xFF, 0xD9]);
        let mut log = MessageLog::new();
        assert_eq!(reader.read_next_marker(&mut log), Ok(JpegMarkerCode::EndOfImage));
        assert_eq!(log.warning_count(), 1);
        assert!(log.messages()[0].text.contains("2 extraneous bytes"));
    }

    #[test]
    fn test_sixteen_bit_quantization_table() {
        let mut bytes = vec![0x00, 0x83, 0x11];
        for k in 0..64u16 {
            bytes.extend_from_slice(&(k + 256).to_be_bytes());
        }
        let mut reader = reader_for(&bytes);
        reader.read_dqt_segment().unwrap();
        let table = reader.quantization_tables[1].unwrap();
        assert_eq!(table[0], 256);
        assert_eq!(table[8], 258);
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_frame_validation() {
        // SOF0 with precision 12.
        let mut reader = reader_for(&[0x00, 0x0B, 12, 0x00, 0x08, 0x00, 0x08, 1, 1, 0x11, 0]);
        assert_eq!(
            reader.read_start_of_frame_segment(JpegMarkerCode::StartOfFrameBaseline),
            Err(DecodeError::UnsupportedPrecision(12))
        );

        let mut reader = reader_for(&[0x00, 0x0B, 8, 0x00, 0x08, 0x00, 0x08, 1, 1, 0x51, 0]);
        assert_eq!(
            reader.read_start_of_frame_segment(JpegMarkerCode::StartOfFrameBaseline),
            Err(DecodeError::InvalidSamplingFactors { id: 1, h: 5, v: 1 })
        );

        let mut reader = reader_for(&[0x00, 0x0B, 8, 0x00, 0x10, 0x00, 0x18, 1, 1, 0x22, 0]);
        reader.read_start_of_frame_segment(JpegMarkerCode::StartOfFrameBaseline).unwrap();
        let frame = reader.frame.as_ref().unwrap();
        assert_eq!((frame.width, frame.height), (24, 16));
        assert_eq!(frame.max_h_samp_factor(), 2);
    }

    #[test]
    fn test_adobe_transform_hint() {
        let mut bytes = vec![0x00, 0x0E];
        bytes.extend_from_slice(b"Adobe");
        bytes.extend_from_slice(&[0, 100, 0, 0, 0, 0, 2]);
        let mut reader = reader_for(&bytes);
        reader.read_application_data_segment(JpegMarkerCode::ApplicationData14).unwrap();
        assert_eq!(reader.adobe_transform, Some(2));
    }

    #[test]
    fn test_skip_entropy_coded_data() {
        let mut reader = reader_for(&[0x12, 0xFF, 0x00, 0x34, 0xFF, 0xD1, 0x56, 0xFF, 0xFF, 0xD9]);
        reader.skip_entropy_coded_data().unwrap();
        assert_eq!(reader.position(), 7);

        let mut truncated = reader_for(&[0x12, 0xFF, 0x00]);
        assert_eq!(truncated.skip_entropy_coded_data(), Err(DecodeError::PrematureEnd));
    }
}
