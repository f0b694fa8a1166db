use crate::decompress::{BoundingBox, DecompressionObject, JpegImageInfo};

/// One decode pass over the image whose header was read by a [`DecompressionObject`].
///
/// The output info is negotiated once, at construction. Dropping the cycle releases the
/// engine's scan state whether or not [`decompress`](Self::decompress) ran, so the
/// object can go on to the next image.
pub struct DecompressionCycle<'o> {
    object: &'o mut DecompressionObject,
    detached: bool,
}

impl<'o> DecompressionCycle<'o> {
    /// Starts decompression with the object's current parameters. A `region` is honoured
    /// only if the engine supports partial decoding.
    ///
    /// # Panics
    ///
    /// If another cycle is active on `object`.
    pub fn new(object: &'o mut DecompressionObject, region: Option<BoundingBox>) -> Self {
        object.begin_cycle(region);
        Self {
            object,
            detached: false,
        }
    }

    /// Re-attaches to the cycle left active by [`detach`](Self::detach).
    pub(crate) fn resume(object: &'o mut DecompressionObject) -> Self {
        Self {
            object,
            detached: false,
        }
    }

    /// Output image info; invalid if the cycle could not be started.
    pub fn output_info(&self) -> JpegImageInfo {
        self.object.cycle_output_info()
    }

    /// Decodes the whole image, one scanline into each of the first `height` rows.
    ///
    /// On failure the cycle is aborted and the rows hold undefined content.
    ///
    /// # Panics
    ///
    /// When called a second time on the same cycle.
    pub fn decompress(&mut self, rows: &mut [&mut [u8]]) -> bool {
        self.object.decompress_cycle(rows)
    }

    /// Keeps the cycle active on the object after this handle is dropped.
    pub(crate) fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for DecompressionCycle<'_> {
    fn drop(&mut self) {
        if !self.detached {
            self.object.end_cycle();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryReader;
    use crate::jpeg1::decoder::tests::gray_8x8;

    fn decode_rows(cycle: &mut DecompressionCycle<'_>) -> (bool, Vec<u8>) {
        let mut memory = vec![0u8; 64];
        let mut rows: Vec<&mut [u8]> = memory.chunks_mut(8).collect();
        let ok = cycle.decompress(&mut rows);
        drop(rows);
        (ok, memory)
    }

    #[test]
    fn test_dropped_cycle_releases_the_image() {
        let data = gray_8x8();
        let mut obj = DecompressionObject::new();
        obj.set_source(&mut MemoryReader::new(&data));
        assert!(obj.read_header().is_valid());

        let cycle = DecompressionCycle::new(&mut obj, None);
        assert!(cycle.output_info().is_valid());
        drop(cycle);
        assert!(obj.valid());
        assert_eq!(obj.stream_position(), 0);

        assert!(obj.read_header().is_valid());
        let mut cycle = DecompressionCycle::new(&mut obj, None);
        let (ok, samples) = decode_rows(&mut cycle);
        assert!(ok);
        assert!(samples.iter().all(|&s| s == 132));
        drop(cycle);
        assert!(obj.message_log().is_empty());
        assert_eq!(obj.stream_position(), data.len() as u64);
    }

    #[test]
    #[should_panic(expected = "decompress() can only be called once per cycle")]
    fn test_decompress_twice_panics() {
        let data = gray_8x8();
        let mut obj = DecompressionObject::new();
        obj.set_source(&mut MemoryReader::new(&data));
        obj.read_header();

        let mut cycle = DecompressionCycle::new(&mut obj, None);
        assert!(decode_rows(&mut cycle).0);
        decode_rows(&mut cycle);
    }

    #[test]
    fn test_failed_cycle_then_fresh_source() {
        let data = gray_8x8();
        let truncated = &data[..data.len() - 3];
        let mut obj = DecompressionObject::new();
        obj.set_source(&mut MemoryReader::new(truncated));
        assert!(obj.read_header().is_valid());

        let mut cycle = DecompressionCycle::new(&mut obj, None);
        assert!(!decode_rows(&mut cycle).0);
        drop(cycle);
        assert!(obj.error_state());
        assert_eq!(obj.message_log().error_count(), 1);

        obj.set_source(&mut MemoryReader::new(&data));
        assert!(obj.read_header().is_valid());
        let mut cycle = DecompressionCycle::new(&mut obj, None);
        let (ok, samples) = decode_rows(&mut cycle);
        assert!(ok);
        assert!(samples.iter().all(|&s| s == 132));
    }
}
