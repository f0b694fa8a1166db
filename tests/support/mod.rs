//! Builder for small synthetic baseline JPEG streams.
//!
//! Every block only carries a DC coefficient and all quantization steps are 8, so a block
//! with level `d` decodes to samples of exactly `128 + d`.

#![allow(dead_code)]

use std::collections::HashMap;

const DC_LENGTHS: [u8; 16] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
const DC_VALUES: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

/// One frame component with its sampling factors.
#[derive(Debug, Clone, Copy)]
pub struct Component {
    pub id: u8,
    pub h: u8,
    pub v: u8,
}

type LevelFn = Box<dyn Fn(usize, usize, usize) -> i32>;

pub struct JpegBuilder {
    width: u16,
    height: u16,
    components: Vec<Component>,
    jfif: bool,
    adobe_transform: Option<u8>,
    restart_interval: u16,
    planar: bool,
    comment: Option<Vec<u8>>,
    level: LevelFn,
}

impl JpegBuilder {
    pub fn new(width: u16, height: u16, components: Vec<Component>) -> Self {
        Self {
            width,
            height,
            components,
            jfif: false,
            adobe_transform: None,
            restart_interval: 0,
            planar: false,
            comment: None,
            level: Box::new(|_, _, _| 0),
        }
    }

    pub fn gray(width: u16, height: u16) -> Self {
        Self::new(width, height, vec![Component { id: 1, h: 1, v: 1 }])
    }

    /// Three components with luma sampled at `h`x`v` and full-block chroma.
    pub fn ycbcr(width: u16, height: u16, h: u8, v: u8) -> Self {
        Self::new(
            width,
            height,
            vec![
                Component { id: 1, h, v },
                Component { id: 2, h: 1, v: 1 },
                Component { id: 3, h: 1, v: 1 },
            ],
        )
        .jfif()
    }

    pub fn cmyk(width: u16, height: u16) -> Self {
        Self::new(
            width,
            height,
            (1..=4).map(|id| Component { id, h: 1, v: 1 }).collect(),
        )
    }

    /// Level of block (`bx`, `by`) of component `c`, in that component's block grid.
    /// Values are clamped to -128..=127.
    pub fn with_level(mut self, level: impl Fn(usize, usize, usize) -> i32 + 'static) -> Self {
        self.level = Box::new(level);
        self
    }

    pub fn jfif(mut self) -> Self {
        self.jfif = true;
        self
    }

    pub fn adobe(mut self, transform: u8) -> Self {
        self.jfif = false;
        self.adobe_transform = Some(transform);
        self
    }

    pub fn restart_interval(mut self, interval: u16) -> Self {
        self.restart_interval = interval;
        self
    }

    /// One scan per component instead of a single interleaved scan.
    pub fn planar(mut self) -> Self {
        self.planar = true;
        self
    }

    pub fn comment(mut self, text: &[u8]) -> Self {
        self.comment = Some(text.to_vec());
        self
    }

    fn level_of(&self, c: usize, bx: usize, by: usize) -> i32 {
        (self.level)(c, bx, by).clamp(-128, 127)
    }

    fn max_factors(&self) -> (usize, usize) {
        let h = self.components.iter().map(|c| c.h as usize).max().unwrap_or(1);
        let v = self.components.iter().map(|c| c.v as usize).max().unwrap_or(1);
        (h, v)
    }

    /// Expected decoded sample of component `c` at full-resolution pixel (`x`, `y`).
    pub fn expected_sample(&self, c: usize, x: usize, y: usize) -> u8 {
        let (h_max, v_max) = self.max_factors();
        let component = self.components[c];
        let x_factor = h_max / component.h as usize;
        let y_factor = v_max / component.v as usize;
        (128 + self.level_of(c, x / x_factor / 8, y / y_factor / 8)) as u8
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0xFF, 0xD8];
        if self.jfif {
            segment(&mut out, 0xE0, b"JFIF\0\x01\x02\x00\x00\x01\x00\x01\x00\x00");
        }
        if let Some(transform) = self.adobe_transform {
            let mut payload = b"Adobe".to_vec();
            payload.extend_from_slice(&[0, 100, 0, 0, 0, 0, transform]);
            segment(&mut out, 0xEE, &payload);
        }
        if let Some(text) = &self.comment {
            segment(&mut out, 0xFE, text);
        }

        let mut dqt = vec![0x00];
        dqt.extend_from_slice(&[8; 64]);
        segment(&mut out, 0xDB, &dqt);

        let mut sof = vec![8];
        sof.extend_from_slice(&self.height.to_be_bytes());
        sof.extend_from_slice(&self.width.to_be_bytes());
        sof.push(self.components.len() as u8);
        for c in &self.components {
            sof.extend_from_slice(&[c.id, (c.h << 4) | c.v, 0]);
        }
        segment(&mut out, 0xC0, &sof);

        let mut dht = vec![0x00];
        dht.extend_from_slice(&DC_LENGTHS);
        dht.extend_from_slice(&DC_VALUES);
        dht.push(0x10);
        let mut ac_lengths = [0u8; 16];
        ac_lengths[0] = 1;
        dht.extend_from_slice(&ac_lengths);
        dht.push(0x00);
        segment(&mut out, 0xC4, &dht);

        if self.restart_interval > 0 {
            segment(&mut out, 0xDD, &self.restart_interval.to_be_bytes());
        }

        if self.planar || self.components.len() == 1 {
            for c in 0..self.components.len() {
                self.write_scan(&mut out, &[c]);
            }
        } else {
            let all: Vec<usize> = (0..self.components.len()).collect();
            self.write_scan(&mut out, &all);
        }

        out.extend_from_slice(&[0xFF, 0xD9]);
        out
    }

    fn write_scan(&self, out: &mut Vec<u8>, scan_components: &[usize]) {
        let mut sos = vec![scan_components.len() as u8];
        for &c in scan_components {
            sos.extend_from_slice(&[self.components[c].id, 0x00]);
        }
        sos.extend_from_slice(&[0, 63, 0]);
        segment(out, 0xDA, &sos);

        let (h_max, v_max) = self.max_factors();
        let width = self.width as usize;
        let height = self.height as usize;

        // Units in coding order, each a list of (component, bx, by) blocks.
        let mut units: Vec<Vec<(usize, usize, usize)>> = Vec::new();
        if scan_components.len() == 1 {
            let c = scan_components[0];
            let comp = self.components[c];
            let blocks_wide = (width * comp.h as usize).div_ceil(h_max).div_ceil(8);
            let blocks_high = (height * comp.v as usize).div_ceil(v_max).div_ceil(8);
            for by in 0..blocks_high {
                for bx in 0..blocks_wide {
                    units.push(vec![(c, bx, by)]);
                }
            }
        } else {
            let mcus_per_row = width.div_ceil(8 * h_max);
            let mcu_rows = height.div_ceil(8 * v_max);
            for my in 0..mcu_rows {
                for mx in 0..mcus_per_row {
                    let mut unit = Vec::new();
                    for &c in scan_components {
                        let comp = self.components[c];
                        for v in 0..comp.v as usize {
                            for h in 0..comp.h as usize {
                                unit.push((c, mx * comp.h as usize + h, my * comp.v as usize + v));
                            }
                        }
                    }
                    units.push(unit);
                }
            }
        }

        let dc_codes = canonical_codes(&DC_LENGTHS, &DC_VALUES);
        let mut writer = BitWriter::default();
        let mut predictors = vec![0i32; self.components.len()];
        let interval = self.restart_interval as usize;
        for (index, unit) in units.iter().enumerate() {
            if interval > 0 && index > 0 && index % interval == 0 {
                writer.flush();
                let marker = 0xD0 + ((index / interval - 1) % 8) as u8;
                writer.out.extend_from_slice(&[0xFF, marker]);
                predictors.fill(0);
            }
            for &(c, bx, by) in unit {
                let dc = self.level_of(c, bx, by);
                let diff = dc - predictors[c];
                predictors[c] = dc;
                let category = if diff == 0 { 0 } else { 32 - diff.unsigned_abs().leading_zeros() };
                let (code, length) = dc_codes[&(category as u8)];
                writer.write(code as u32, length as u32);
                if category > 0 {
                    let bits = if diff < 0 { diff + (1 << category) - 1 } else { diff };
                    writer.write(bits as u32, category);
                }
                // EOB
                writer.write(0, 1);
            }
        }
        writer.flush();
        out.extend_from_slice(&writer.out);
    }
}

fn segment(out: &mut Vec<u8>, marker: u8, payload: &[u8]) {
    out.extend_from_slice(&[0xFF, marker]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
}

fn canonical_codes(lengths: &[u8; 16], values: &[u8]) -> HashMap<u8, (u16, u8)> {
    let mut codes = HashMap::new();
    let mut code = 0u16;
    let mut k = 0;
    for (i, &count) in lengths.iter().enumerate() {
        for _ in 0..count {
            codes.insert(values[k], (code, i as u8 + 1));
            code += 1;
            k += 1;
        }
        code <<= 1;
    }
    codes
}

#[derive(Default)]
struct BitWriter {
    out: Vec<u8>,
    accumulator: u32,
    bit_count: u32,
}

impl BitWriter {
    fn write(&mut self, bits: u32, count: u32) {
        for i in (0..count).rev() {
            self.accumulator = (self.accumulator << 1) | ((bits >> i) & 1);
            self.bit_count += 1;
            if self.bit_count == 8 {
                self.emit();
            }
        }
    }

    fn emit(&mut self) {
        let byte = self.accumulator as u8;
        self.out.push(byte);
        if byte == 0xFF {
            self.out.push(0x00);
        }
        self.accumulator = 0;
        self.bit_count = 0;
    }

    /// Pads the last byte with one bits.
    fn flush(&mut self) {
        if self.bit_count > 0 {
            let padding = 8 - self.bit_count;
            self.write((1 << padding) - 1, padding);
        }
    }
}
