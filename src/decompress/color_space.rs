use std::fmt;
use std::str::FromStr;

use crate::image::PixelFormat;

/// Colour space of JPEG image data, as stored in the stream or requested as output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JpegColorSpace {
    #[default]
    Unknown,
    /// Output only: keep the colour space the image was encoded in.
    Auto,
    Grayscale,
    Rgb,
    YCbCr,
    Cmyk,
    Ycck,
    Bgr,
    Rgba,
    Bgra,
    Argb,
    Abgr,
}

impl JpegColorSpace {
    pub const ALL: [JpegColorSpace; 12] = [
        JpegColorSpace::Unknown,
        JpegColorSpace::Auto,
        JpegColorSpace::Grayscale,
        JpegColorSpace::Rgb,
        JpegColorSpace::YCbCr,
        JpegColorSpace::Cmyk,
        JpegColorSpace::Ycck,
        JpegColorSpace::Bgr,
        JpegColorSpace::Rgba,
        JpegColorSpace::Bgra,
        JpegColorSpace::Argb,
        JpegColorSpace::Abgr,
    ];

    /// Channels per pixel, 0 when the colour space does not determine it.
    pub const fn nr_channels(self) -> u16 {
        match self {
            JpegColorSpace::Unknown | JpegColorSpace::Auto => 0,
            JpegColorSpace::Grayscale => 1,
            JpegColorSpace::Rgb | JpegColorSpace::YCbCr | JpegColorSpace::Bgr => 3,
            JpegColorSpace::Cmyk
            | JpegColorSpace::Ycck
            | JpegColorSpace::Rgba
            | JpegColorSpace::Bgra
            | JpegColorSpace::Argb
            | JpegColorSpace::Abgr => 4,
        }
    }

    /// RGB and its reordered or alpha-extended variants.
    pub const fn is_rgb_family(self) -> bool {
        matches!(
            self,
            JpegColorSpace::Rgb
                | JpegColorSpace::Bgr
                | JpegColorSpace::Rgba
                | JpegColorSpace::Bgra
                | JpegColorSpace::Argb
                | JpegColorSpace::Abgr
        )
    }

    pub const fn to_pixel_format(self) -> PixelFormat {
        match self {
            JpegColorSpace::Grayscale => PixelFormat::Y,
            JpegColorSpace::Rgb => PixelFormat::Rgb,
            JpegColorSpace::Bgr => PixelFormat::Bgr,
            JpegColorSpace::Rgba => PixelFormat::Rgba,
            JpegColorSpace::Bgra => PixelFormat::Bgra,
            JpegColorSpace::Argb => PixelFormat::Argb,
            JpegColorSpace::Abgr => PixelFormat::Abgr,
            JpegColorSpace::YCbCr => PixelFormat::YCbCr,
            JpegColorSpace::Cmyk => PixelFormat::Cmyk,
            JpegColorSpace::Ycck => PixelFormat::Ycck,
            JpegColorSpace::Unknown | JpegColorSpace::Auto => PixelFormat::Unknown,
        }
    }

    /// Replaces `Auto` by the given native colour space.
    pub const fn resolve(self, native: JpegColorSpace) -> JpegColorSpace {
        match self {
            JpegColorSpace::Auto => native,
            other => other,
        }
    }

    /// Whether decoded data in `self` (a stream colour space) can be delivered as `target`.
    pub fn can_convert_to(self, target: JpegColorSpace) -> bool {
        let target = target.resolve(self);
        match self {
            JpegColorSpace::Grayscale => {
                target == JpegColorSpace::Grayscale || target.is_rgb_family()
            }
            JpegColorSpace::YCbCr => {
                matches!(target, JpegColorSpace::Grayscale | JpegColorSpace::YCbCr)
                    || target.is_rgb_family()
            }
            JpegColorSpace::Rgb => target == JpegColorSpace::Grayscale || target.is_rgb_family(),
            JpegColorSpace::Cmyk => target == JpegColorSpace::Cmyk,
            JpegColorSpace::Ycck => matches!(target, JpegColorSpace::Ycck | JpegColorSpace::Cmyk),
            _ => false,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            JpegColorSpace::Unknown => "unknown",
            JpegColorSpace::Auto => "auto",
            JpegColorSpace::Grayscale => "grayscale",
            JpegColorSpace::Rgb => "rgb",
            JpegColorSpace::YCbCr => "ycbcr",
            JpegColorSpace::Cmyk => "cmyk",
            JpegColorSpace::Ycck => "ycck",
            JpegColorSpace::Bgr => "bgr",
            JpegColorSpace::Rgba => "rgba",
            JpegColorSpace::Bgra => "bgra",
            JpegColorSpace::Argb => "argb",
            JpegColorSpace::Abgr => "abgr",
        }
    }
}

impl fmt::Display for JpegColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for JpegColorSpace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "gray" | "grey" | "greyscale" => return Ok(JpegColorSpace::Grayscale),
            "ycc" => return Ok(JpegColorSpace::YCbCr),
            _ => {}
        }
        JpegColorSpace::ALL
            .into_iter()
            .find(|cs| cs.name() == lower)
            .ok_or_else(|| format!("unknown colour space '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_table() {
        assert!(JpegColorSpace::YCbCr.can_convert_to(JpegColorSpace::Auto));
        assert!(JpegColorSpace::YCbCr.can_convert_to(JpegColorSpace::Abgr));
        assert!(JpegColorSpace::Grayscale.can_convert_to(JpegColorSpace::Rgb));
        assert!(!JpegColorSpace::Grayscale.can_convert_to(JpegColorSpace::YCbCr));
        assert!(JpegColorSpace::Ycck.can_convert_to(JpegColorSpace::Cmyk));
        assert!(!JpegColorSpace::Cmyk.can_convert_to(JpegColorSpace::Rgb));
        assert!(!JpegColorSpace::Unknown.can_convert_to(JpegColorSpace::Auto));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("RGBA".parse::<JpegColorSpace>(), Ok(JpegColorSpace::Rgba));
        assert_eq!("grey".parse::<JpegColorSpace>(), Ok(JpegColorSpace::Grayscale));
        assert!("lab".parse::<JpegColorSpace>().is_err());
        assert_eq!(JpegColorSpace::YCbCr.to_string(), "ycbcr");
    }
}
