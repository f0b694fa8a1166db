use crate::constants::AUTO_CALCULATE_STRIDE;

/// Memory layout of an untyped image.
///
/// A `stride_bytes` of [`AUTO_CALCULATE_STRIDE`] requests tight packing; use
/// [`Layout::resolved`] to obtain the layout with the actual stride filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub nr_channels: u16,
    pub nr_bytes_per_channel: u16,
    pub stride_bytes: usize,
}

impl Layout {
    pub const fn new(
        width: u32,
        height: u32,
        nr_channels: u16,
        nr_bytes_per_channel: u16,
        stride_bytes: usize,
    ) -> Self {
        Self {
            width,
            height,
            nr_channels,
            nr_bytes_per_channel,
            stride_bytes,
        }
    }

    /// Tightly packed layout.
    pub const fn packed(width: u32, height: u32, nr_channels: u16, nr_bytes_per_channel: u16) -> Self {
        Self::new(width, height, nr_channels, nr_bytes_per_channel, AUTO_CALCULATE_STRIDE)
    }

    pub const fn nr_bytes_per_pixel(&self) -> usize {
        self.nr_channels as usize * self.nr_bytes_per_channel as usize
    }

    /// Number of bytes holding pixel data in one row.
    pub const fn row_bytes(&self) -> usize {
        self.width as usize * self.nr_bytes_per_pixel()
    }

    /// Row stride in bytes, with the tight-packing sentinel resolved.
    pub const fn stride(&self) -> usize {
        if self.stride_bytes == AUTO_CALCULATE_STRIDE {
            self.row_bytes()
        } else {
            self.stride_bytes
        }
    }

    pub const fn resolved(self) -> Self {
        Self {
            stride_bytes: self.stride(),
            ..self
        }
    }

    /// Number of bytes spanned by the image: stride times height.
    pub const fn total_bytes(&self) -> usize {
        self.stride() * self.height as usize
    }

    pub const fn is_packed(&self) -> bool {
        self.stride() == self.row_bytes()
    }

    /// Non-empty dimensions, and a stride that can hold a full row.
    pub const fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.nr_channels > 0
            && self.nr_bytes_per_channel > 0
            && self.stride() >= self.row_bytes()
    }

    /// Same width, height, channel count and channel size; strides may differ.
    pub const fn same_shape(&self, other: &Layout) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.nr_channels == other.nr_channels
            && self.nr_bytes_per_channel == other.nr_bytes_per_channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_stride_packs_tightly() {
        let layout = Layout::packed(10, 4, 3, 1);
        assert_eq!(layout.stride(), 30);
        assert_eq!(layout.total_bytes(), 120);
        assert_eq!(layout.resolved().stride_bytes, 30);
        assert!(layout.is_packed());
    }

    #[test]
    fn test_validity() {
        assert!(Layout::new(10, 4, 3, 1, 32).is_valid());
        assert!(!Layout::new(10, 4, 3, 1, 29).is_valid());
        assert!(!Layout::packed(0, 4, 3, 1).is_valid());
        assert!(!Layout::default().is_valid());
    }
}
