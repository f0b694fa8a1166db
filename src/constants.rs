// Stride value requesting a tightly packed row layout.
pub const AUTO_CALCULATE_STRIDE: usize = 0;

// The size in bytes of the segment length field.
pub const SEGMENT_LENGTH_SIZE: usize = 2;

// Sample precision of the baseline and extended sequential processes handled here.
pub const SUPPORTED_PRECISION: u8 = 8;

pub const MINIMUM_COMPONENT_COUNT: u8 = 1;
pub const MAXIMUM_COMPONENT_COUNT: u8 = 4;
pub const MAXIMUM_COMPONENT_COUNT_IN_SCAN: usize = 4;

pub const MAXIMUM_SAMPLING_FACTOR: u8 = 4;

// ISO/IEC 10918-1, B.2.4.4: at most 10 blocks per MCU in an interleaved scan.
pub const MAXIMUM_BLOCKS_IN_MCU: u32 = 10;

// Number of table slots for quantization and Huffman tables.
pub const TABLE_SLOT_COUNT: usize = 4;

pub const BLOCK_SIZE: usize = 8;
pub const BLOCK_DIM: usize = BLOCK_SIZE * BLOCK_SIZE;

// Level shift applied after the inverse DCT for 8 bit samples.
pub const SAMPLE_CENTER: f32 = 128.0;

// Alpha value written for colour spaces carrying an alpha channel.
pub const OPAQUE_ALPHA: u8 = 0xFF;
