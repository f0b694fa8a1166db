//! Inverse Discrete Cosine Transform (IDCT) for JPEG 1.

use std::f32::consts::{FRAC_1_SQRT_2, PI};
use std::sync::OnceLock;

use crate::constants::{BLOCK_DIM, BLOCK_SIZE};

// basis[x][u] = C(u) / 2 * cos((2x + 1) * u * pi / 16)
fn basis() -> &'static [[f32; BLOCK_SIZE]; BLOCK_SIZE] {
    static BASIS: OnceLock<[[f32; BLOCK_SIZE]; BLOCK_SIZE]> = OnceLock::new();
    BASIS.get_or_init(|| {
        let mut table = [[0.0f32; BLOCK_SIZE]; BLOCK_SIZE];
        for (x, row) in table.iter_mut().enumerate() {
            for (u, value) in row.iter_mut().enumerate() {
                let cu = if u == 0 { FRAC_1_SQRT_2 } else { 1.0 };
                *value = 0.5 * cu * (((2 * x + 1) * u) as f32 * PI / 16.0).cos();
            }
        }
        table
    })
}

/// Separable 8x8 inverse DCT: rows first, then columns. Input and output are row-major,
/// with vertical frequency (or `y`) selecting the row.
pub fn idct_8x8(input: &[f32; BLOCK_DIM], output: &mut [f32; BLOCK_DIM]) {
    let basis = basis();
    let mut tmp = [0.0f32; BLOCK_DIM];

    for v in 0..BLOCK_SIZE {
        let coefficients = &input[v * BLOCK_SIZE..(v + 1) * BLOCK_SIZE];
        for x in 0..BLOCK_SIZE {
            tmp[v * BLOCK_SIZE + x] = coefficients
                .iter()
                .zip(basis[x].iter())
                .map(|(c, b)| c * b)
                .sum();
        }
    }

    for y in 0..BLOCK_SIZE {
        for x in 0..BLOCK_SIZE {
            let mut sum = 0.0f32;
            for v in 0..BLOCK_SIZE {
                sum += basis[y][v] * tmp[v * BLOCK_SIZE + x];
            }
            output[y * BLOCK_SIZE + x] = sum;
        }
    }
}
