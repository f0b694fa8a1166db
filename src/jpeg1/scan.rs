//! Entropy decoding of sequential scans into per-component sample planes.

use std::ops::Range;

use crate::constants::{BLOCK_DIM, BLOCK_SIZE, SAMPLE_CENTER};
use crate::error::DecodeError;
use crate::jpeg1::dct::idct_8x8;
use crate::jpeg1::huffman::{BitReaderState, HuffmanTable, JpegBitReader, extend};
use crate::jpeg1::quantization::{QuantizationTable, ZIGZAG_TO_NATURAL, dequantize_block};
use crate::jpeg_marker_code::JPEG_RESTART_MARKER_RANGE;

/// Largest DC difference and AC magnitude categories for 8-bit samples.
const MAX_DC_CATEGORY: u8 = 11;
const MAX_AC_CATEGORY: u8 = 10;

/// Sample plane of one component, padded to whole MCUs.
///
/// The plane holds either every sample row of the component or a window of rows that
/// wraps around. Rows are addressed by their position in the full component.
pub struct ComponentPlane {
    pub h_samp_factor: usize,
    pub v_samp_factor: usize,
    /// Horizontal and vertical replication factors up to the full image resolution.
    pub x_factor: usize,
    pub y_factor: usize,
    pub stride: usize,
    /// Sample rows of the whole component.
    pub height: usize,
    /// Sample rows kept in `samples`; zero until allocated.
    rows_held: usize,
    pub samples: Vec<u8>,
    /// Block columns and rows that are transformed; others are entropy decoded only.
    pub block_cols: Range<usize>,
    pub block_rows: Range<usize>,
    /// Latched when the component first appears in a scan.
    pub quant_table: Option<QuantizationTable>,
}

impl ComponentPlane {
    pub fn new(
        h_samp_factor: usize,
        v_samp_factor: usize,
        h_max: usize,
        v_max: usize,
        mcus_per_row: usize,
        mcu_rows: usize,
    ) -> Self {
        let stride = mcus_per_row * h_samp_factor * BLOCK_SIZE;
        let height = mcu_rows * v_samp_factor * BLOCK_SIZE;
        Self {
            h_samp_factor,
            v_samp_factor,
            x_factor: h_max / h_samp_factor,
            y_factor: v_max / v_samp_factor,
            stride,
            height,
            rows_held: 0,
            samples: Vec::new(),
            block_cols: 0..stride / BLOCK_SIZE,
            block_rows: 0..height / BLOCK_SIZE,
            quant_table: None,
        }
    }

    /// Allocates room for `sample_rows` rows, reporting allocation failure as an error.
    pub fn allocate(&mut self, sample_rows: usize) -> Result<(), DecodeError> {
        let bytes = self
            .stride
            .checked_mul(sample_rows)
            .ok_or(DecodeError::AllocationFailed(usize::MAX))?;
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(bytes)
            .map_err(|_| DecodeError::AllocationFailed(bytes))?;
        samples.resize(bytes, 0);
        self.samples = samples;
        self.rows_held = sample_rows;
        Ok(())
    }

    /// Limits the inverse DCT to the blocks covering the full-resolution pixel window
    /// `x` by `y`.
    pub fn restrict_to(&mut self, x: Range<u32>, y: Range<u32>) {
        let first_col = x.start as usize / self.x_factor / BLOCK_SIZE;
        let last_col = (x.end as usize - 1) / self.x_factor / BLOCK_SIZE;
        let first_row = y.start as usize / self.y_factor / BLOCK_SIZE;
        let last_row = (y.end as usize - 1) / self.y_factor / BLOCK_SIZE;
        self.block_cols = first_col..last_col + 1;
        self.block_rows = first_row..last_row + 1;
    }

    /// De-quantizes, transforms and stores one block of natural-order coefficients.
    pub fn store_block(&mut self, block_col: usize, block_row: usize, coefficients: &[i32; BLOCK_DIM]) {
        if !self.block_cols.contains(&block_col) || !self.block_rows.contains(&block_row) {
            return;
        }
        let Some(table) = self.quant_table.as_ref() else {
            return;
        };
        if self.rows_held == 0 {
            return;
        }

        let mut dequantized = [0.0f32; BLOCK_DIM];
        dequantize_block(coefficients, table, &mut dequantized);
        let mut pixels = [0.0f32; BLOCK_DIM];
        idct_8x8(&dequantized, &mut pixels);

        let origin = (block_row * BLOCK_SIZE) % self.rows_held * self.stride + block_col * BLOCK_SIZE;
        for (y, row) in pixels.chunks_exact(BLOCK_SIZE).enumerate() {
            let start = origin + y * self.stride;
            for (sample, value) in self.samples[start..start + BLOCK_SIZE].iter_mut().zip(row) {
                *sample = (value + SAMPLE_CENTER).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    /// Sample at full-resolution coordinates, replicating subsampled values.
    pub fn sample_at(&self, x: usize, y: usize) -> u8 {
        self.samples[(y / self.y_factor) % self.rows_held * self.stride + x / self.x_factor]
    }
}

/// Decodes one 8x8 block into natural-order coefficients (ISO/IEC 10918-1 F.2.2).
pub fn decode_block(
    reader: &mut JpegBitReader<'_>,
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable,
    dc_predictor: &mut i32,
    coefficients: &mut [i32; BLOCK_DIM],
) -> Result<(), DecodeError> {
    coefficients.fill(0);

    let dc_category = dc_table.decode(reader)?;
    if dc_category > MAX_DC_CATEGORY {
        return Err(DecodeError::CoefficientCategory(dc_category));
    }
    let dc_bits = reader.read_bits(dc_category)?;
    *dc_predictor = dc_predictor.wrapping_add(extend(dc_bits, dc_category));
    coefficients[0] = *dc_predictor;

    let mut k = 1;
    while k < BLOCK_DIM {
        let symbol = ac_table.decode(reader)?;
        let run = (symbol >> 4) as usize;
        let category = symbol & 0x0F;
        if category == 0 {
            if run != 15 {
                // End of block.
                break;
            }
            // ZRL: sixteen zero coefficients.
            k += 16;
            continue;
        }
        if category > MAX_AC_CATEGORY {
            return Err(DecodeError::CoefficientCategory(category));
        }
        k += run;
        if k >= BLOCK_DIM {
            return Err(DecodeError::CoefficientOutOfRange);
        }
        let bits = reader.read_bits(category)?;
        coefficients[ZIGZAG_TO_NATURAL[k]] = extend(bits, category);
        k += 1;
    }
    Ok(())
}

/// One component of the scan being decoded, with its tables resolved.
pub struct ScanComponentTables {
    pub plane: usize,
    pub dc_table: HuffmanTable,
    pub ac_table: HuffmanTable,
}

/// Progress through the entropy-coded data of one scan.
///
/// A decoding unit is an MCU for interleaved scans and a single block for scans with
/// one component.
pub struct ScanState {
    pub components: Vec<ScanComponentTables>,
    pub units_per_row: usize,
    pub unit_rows: usize,
    pub next_unit_row: usize,
    bits: BitReaderState,
    dc_predictors: Vec<i32>,
    restart_interval: usize,
    units_until_restart: usize,
    next_restart_index: u8,
}

impl ScanState {
    pub fn new(
        components: Vec<ScanComponentTables>,
        units_per_row: usize,
        unit_rows: usize,
        restart_interval: u16,
        position: usize,
    ) -> Self {
        let component_count = components.len();
        Self {
            components,
            units_per_row,
            unit_rows,
            next_unit_row: 0,
            bits: BitReaderState::at(position),
            dc_predictors: vec![0; component_count],
            restart_interval: restart_interval as usize,
            units_until_restart: restart_interval as usize,
            next_restart_index: 0,
        }
    }

    pub fn is_interleaved(&self) -> bool {
        self.components.len() > 1
    }

    pub fn is_complete(&self) -> bool {
        self.next_unit_row >= self.unit_rows
    }

    /// Offset of the first byte not consumed by the entropy decoder.
    pub fn position(&self) -> usize {
        self.bits.position()
    }

    /// Decodes the next row of units into `planes`.
    pub fn decode_unit_row(&mut self, data: &[u8], planes: &mut [ComponentPlane]) -> Result<(), DecodeError> {
        let row = self.next_unit_row;
        let interleaved = self.is_interleaved();
        let mut reader = JpegBitReader::resume(data, self.bits);
        let mut coefficients = [0i32; BLOCK_DIM];

        for col in 0..self.units_per_row {
            if self.restart_interval > 0 {
                if self.units_until_restart == 0 {
                    reader.read_restart_marker(self.next_restart_index)?;
                    self.next_restart_index = (self.next_restart_index + 1) % JPEG_RESTART_MARKER_RANGE;
                    self.dc_predictors.fill(0);
                    self.units_until_restart = self.restart_interval;
                }
                self.units_until_restart -= 1;
            }

            for (index, component) in self.components.iter().enumerate() {
                let plane = &mut planes[component.plane];
                let (blocks_wide, blocks_high) = if interleaved {
                    (plane.h_samp_factor, plane.v_samp_factor)
                } else {
                    (1, 1)
                };
                for by in 0..blocks_high {
                    for bx in 0..blocks_wide {
                        decode_block(
                            &mut reader,
                            &component.dc_table,
                            &component.ac_table,
                            &mut self.dc_predictors[index],
                            &mut coefficients,
                        )?;
                        plane.store_block(col * blocks_wide + bx, row * blocks_high + by, &coefficients);
                    }
                }
            }
        }

        self.bits = reader.state();
        self.next_unit_row += 1;
        Ok(())
    }
}
