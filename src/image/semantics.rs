/// Interpretation of the channels of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    Y,
    YA,
    Rgb,
    Bgr,
    Rgba,
    Bgra,
    Argb,
    Abgr,
    YCbCr,
    Cmyk,
    Ycck,
    #[default]
    Unknown,
}

impl PixelFormat {
    /// Channel count implied by the format, `None` for [`PixelFormat::Unknown`].
    pub const fn nr_channels(self) -> Option<u16> {
        match self {
            PixelFormat::Y => Some(1),
            PixelFormat::YA => Some(2),
            PixelFormat::Rgb | PixelFormat::Bgr | PixelFormat::YCbCr => Some(3),
            PixelFormat::Rgba
            | PixelFormat::Bgra
            | PixelFormat::Argb
            | PixelFormat::Abgr
            | PixelFormat::Cmyk
            | PixelFormat::Ycck => Some(4),
            PixelFormat::Unknown => None,
        }
    }
}

/// Numeric type of a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleFormat {
    UnsignedInteger,
    SignedInteger,
    FloatingPoint,
    #[default]
    Unknown,
}

/// Pixel and sample interpretation of untyped image data, independent of its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Semantics {
    pub pixel_format: PixelFormat,
    pub sample_format: SampleFormat,
}

impl Semantics {
    pub const fn new(pixel_format: PixelFormat, sample_format: SampleFormat) -> Self {
        Self {
            pixel_format,
            sample_format,
        }
    }
}
