use crate::decompress::color_space::JpegColorSpace;
use crate::image::{Layout, SampleFormat, Semantics};

/// Basic information about a JPEG image, as parsed from its header or as negotiated for
/// output.
///
/// The default value is the invalid sentinel returned on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JpegImageInfo {
    pub width: u32,
    pub height: u32,
    pub nr_channels: u16,
    pub color_space: JpegColorSpace,
}

impl JpegImageInfo {
    pub const fn new(width: u32, height: u32, nr_channels: u16, color_space: JpegColorSpace) -> Self {
        Self {
            width,
            height,
            nr_channels,
            color_space,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.nr_channels > 0
            && self.color_space != JpegColorSpace::Unknown
    }

    /// Samples are always 8 bit for this format family.
    pub const fn nr_bytes_per_channel(&self) -> u16 {
        1
    }

    /// Bytes needed for tightly packed, channel-interleaved data.
    pub const fn required_bytes(&self) -> usize {
        self.width as usize
            * self.nr_channels as usize
            * self.nr_bytes_per_channel() as usize
            * self.height as usize
    }

    /// Tightly packed layout for this image.
    pub const fn output_layout(&self) -> Layout {
        Layout::packed(self.width, self.height, self.nr_channels, self.nr_bytes_per_channel())
    }

    pub const fn output_semantics(&self) -> Semantics {
        Semantics::new(self.color_space.to_pixel_format(), SampleFormat::UnsignedInteger)
    }
}

/// Axis-aligned rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoundingBox {
    pub x0: u32,
    pub y0: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub const fn new(x0: u32, y0: u32, width: u32, height: u32) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub const fn x_end(&self) -> u32 {
        self.x0.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub const fn y_end(&self) -> u32 {
        self.y0.saturating_add(self.height)
    }

    /// Intersection with an image of the given size, `None` if it is empty.
    pub fn clipped_to(&self, width: u32, height: u32) -> Option<BoundingBox> {
        let x_end = self.x_end().min(width);
        let y_end = self.y_end().min(height);
        if self.x0 >= x_end || self.y0 >= y_end {
            return None;
        }
        Some(BoundingBox::new(self.x0, self.y0, x_end - self.x0, y_end - self.y0))
    }
}

/// Per-image decompression settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressionOptions {
    pub out_color_space: JpegColorSpace,
    /// Decode only this part of the image, if the engine supports partial decoding.
    pub region: Option<BoundingBox>,
}

impl DecompressionOptions {
    pub const fn new(out_color_space: JpegColorSpace, region: Option<BoundingBox>) -> Self {
        Self {
            out_color_space,
            region,
        }
    }

    pub const fn with_color_space(out_color_space: JpegColorSpace) -> Self {
        Self::new(out_color_space, None)
    }
}

impl Default for DecompressionOptions {
    fn default() -> Self {
        Self::new(JpegColorSpace::Auto, None)
    }
}
