//! Colour conversion of decoded component rows into interleaved output pixels.

use crate::constants::OPAQUE_ALPHA;
use crate::decompress::JpegColorSpace;
use crate::error::DecodeError;

fn clamp_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// JFIF YCbCr to RGB (ITU-R BT.601, full range).
pub fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> [u8; 3] {
    let y = y as f32;
    let cb = cb as f32 - 128.0;
    let cr = cr as f32 - 128.0;
    [
        clamp_to_u8(y + 1.402 * cr),
        clamp_to_u8(y - 0.344136 * cb - 0.714136 * cr),
        clamp_to_u8(y + 1.772 * cb),
    ]
}

pub fn rgb_to_luma(r: u8, g: u8, b: u8) -> u8 {
    clamp_to_u8(0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
}

/// Stores one RGB triple in the channel order of an RGB family colour space.
fn store_rgb(target: JpegColorSpace, [r, g, b]: [u8; 3], pixel: &mut [u8]) {
    match target {
        JpegColorSpace::Bgr => pixel.copy_from_slice(&[b, g, r]),
        JpegColorSpace::Rgba => pixel.copy_from_slice(&[r, g, b, OPAQUE_ALPHA]),
        JpegColorSpace::Bgra => pixel.copy_from_slice(&[b, g, r, OPAQUE_ALPHA]),
        JpegColorSpace::Argb => pixel.copy_from_slice(&[OPAQUE_ALPHA, r, g, b]),
        JpegColorSpace::Abgr => pixel.copy_from_slice(&[OPAQUE_ALPHA, b, g, r]),
        _ => pixel.copy_from_slice(&[r, g, b]),
    }
}

/// Converts one row of upsampled component samples (`components[c][x]`) from the stream
/// colour space `native` into `target`, writing `width * target.nr_channels()` bytes.
pub fn convert_row(
    native: JpegColorSpace,
    target: JpegColorSpace,
    components: &[Vec<u8>],
    width: usize,
    out: &mut [u8],
) -> Result<(), DecodeError> {
    let target = target.resolve(native);
    let channels = target.nr_channels() as usize;
    let out = &mut out[..width * channels];

    match (native, target) {
        // Same colour space: interleave the components as they are.
        (from, to) if from == to => {
            for (x, pixel) in out.chunks_exact_mut(channels).enumerate() {
                for (c, sample) in pixel.iter_mut().enumerate() {
                    *sample = components[c][x];
                }
            }
        }
        (JpegColorSpace::Grayscale, to) if to.is_rgb_family() => {
            for (x, pixel) in out.chunks_exact_mut(channels).enumerate() {
                let y = components[0][x];
                store_rgb(to, [y, y, y], pixel);
            }
        }
        (JpegColorSpace::YCbCr, JpegColorSpace::Grayscale) => {
            out.copy_from_slice(&components[0][..width]);
        }
        (JpegColorSpace::YCbCr, to) if to.is_rgb_family() => {
            for (x, pixel) in out.chunks_exact_mut(channels).enumerate() {
                let rgb = ycbcr_to_rgb(components[0][x], components[1][x], components[2][x]);
                store_rgb(to, rgb, pixel);
            }
        }
        (JpegColorSpace::Rgb, JpegColorSpace::Grayscale) => {
            for (x, sample) in out.iter_mut().enumerate() {
                *sample = rgb_to_luma(components[0][x], components[1][x], components[2][x]);
            }
        }
        (JpegColorSpace::Rgb, to) if to.is_rgb_family() => {
            for (x, pixel) in out.chunks_exact_mut(channels).enumerate() {
                store_rgb(to, [components[0][x], components[1][x], components[2][x]], pixel);
            }
        }
        (JpegColorSpace::Ycck, JpegColorSpace::Cmyk) => {
            for (x, pixel) in out.chunks_exact_mut(channels).enumerate() {
                let [r, g, b] = ycbcr_to_rgb(components[0][x], components[1][x], components[2][x]);
                pixel.copy_from_slice(&[255 - r, 255 - g, 255 - b, components[3][x]]);
            }
        }
        _ => return Err(DecodeError::UnsupportedColorConversion { from: native, to: target }),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_chroma_is_gray() {
        assert_eq!(ycbcr_to_rgb(77, 128, 128), [77, 77, 77]);
        assert_eq!(ycbcr_to_rgb(255, 0, 255), [255, 208, 28]);
    }

    #[test]
    fn test_convert_row_orders_channels() {
        let components = vec![vec![10, 20], vec![30, 40], vec![50, 60]];
        let mut out = [0u8; 8];
        convert_row(JpegColorSpace::Rgb, JpegColorSpace::Argb, &components, 2, &mut out).unwrap();
        assert_eq!(out, [255, 10, 30, 50, 255, 20, 40, 60]);

        let mut out = [0u8; 6];
        convert_row(JpegColorSpace::Rgb, JpegColorSpace::Bgr, &components, 2, &mut out).unwrap();
        assert_eq!(out, [50, 30, 10, 60, 40, 20]);
    }

    #[test]
    fn test_ycck_to_cmyk_inverts_and_keeps_black() {
        let components = vec![vec![200], vec![128], vec![128], vec![17]];
        let mut out = [0u8; 4];
        convert_row(JpegColorSpace::Ycck, JpegColorSpace::Cmyk, &components, 1, &mut out).unwrap();
        assert_eq!(out, [55, 55, 55, 17]);
    }

    #[test]
    fn test_unsupported_pairing() {
        let components = vec![vec![0u8; 1]; 4];
        let mut out = [0u8; 3];
        assert_eq!(
            convert_row(JpegColorSpace::Cmyk, JpegColorSpace::Rgb, &components, 1, &mut out),
            Err(DecodeError::UnsupportedColorConversion {
                from: JpegColorSpace::Cmyk,
                to: JpegColorSpace::Rgb
            })
        );
    }
}
