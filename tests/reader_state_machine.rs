mod support;

use jpegrow_rs::{
    DecompressionOptions, ImageBuffer, ImageView, JpegColorSpace, JpegReader, Layout, MemoryReader, MessageType,
    PixelBuffer, ReaderState,
};
use support::JpegBuilder;

fn gradient_gray(width: u16, height: u16) -> JpegBuilder {
    JpegBuilder::gray(width, height).with_level(|_, bx, by| (bx as i32 * 20) - (by as i32 * 15))
}

#[test]
fn test_full_lifecycle_transitions() {
    let data = gradient_gray(16, 16).build();
    let mut source = MemoryReader::new(&data);
    let mut reader = JpegReader::new();
    assert_eq!(reader.state(), ReaderState::Fresh);

    reader.set_source(&mut source);
    assert_eq!(reader.state(), ReaderState::SourceBound);

    let header = reader.read_header();
    assert!(header.is_valid());
    assert_eq!(reader.state(), ReaderState::HeaderRead { valid: true });

    let output = reader.get_output_image_info();
    assert_eq!(output, header);
    assert_eq!(reader.state(), ReaderState::CycleReady);

    let image = reader.read_image_data();
    assert!(image.is_valid());
    assert_eq!(image.data().len(), output.required_bytes());
    assert_eq!(reader.state(), ReaderState::Done);

    reader.reset();
    assert_eq!(reader.state(), ReaderState::SourceBound);
}

#[test]
#[should_panic(expected = "cannot call read_header()")]
fn test_read_header_after_read_image_data_panics() {
    let data = gradient_gray(8, 8).build();
    let mut source = MemoryReader::new(&data);
    let mut reader = JpegReader::with_source(&mut source, DecompressionOptions::default());
    assert!(reader.read_image_data().is_valid());
    reader.read_header();
}

#[test]
#[should_panic(expected = "cannot call read_header()")]
fn test_read_header_after_output_info_panics() {
    let data = gradient_gray(8, 8).build();
    let mut source = MemoryReader::new(&data);
    let mut reader = JpegReader::with_source(&mut source, DecompressionOptions::default());
    reader.get_output_image_info();
    reader.read_header();
}

#[test]
#[should_panic(expected = "cannot call set_decompression_options()")]
fn test_changing_options_after_negotiation_panics() {
    let data = gradient_gray(8, 8).build();
    let mut source = MemoryReader::new(&data);
    let mut reader = JpegReader::with_source(&mut source, DecompressionOptions::default());
    reader.get_output_image_info();
    reader.set_decompression_options(DecompressionOptions::with_color_space(JpegColorSpace::Rgb));
}

#[test]
fn test_output_info_is_idempotent() {
    let data = gradient_gray(24, 8).build();
    let mut source = MemoryReader::new(&data);
    let options = DecompressionOptions::with_color_space(JpegColorSpace::Bgra);
    let mut reader = JpegReader::with_source(&mut source, options);

    assert_eq!(reader.options(), options);
    let first = reader.get_output_image_info();
    let second = reader.get_output_image_info();
    assert_eq!(first, second);
    assert_eq!(first.nr_channels, 4);
    assert!(reader.message_log().is_empty());
}

#[test]
fn test_reset_allows_reading_the_same_image_again() {
    let data = gradient_gray(32, 24).build();
    let mut source = MemoryReader::new(&data);
    let mut reader = JpegReader::with_source(&mut source, DecompressionOptions::default());

    let first = reader.read_image_data();
    assert!(first.is_valid());
    // The source is exhausted after the only image: rebind from the start.
    let mut again = MemoryReader::new(&data);
    reader.set_source(&mut again);
    let second = reader.read_image_data();
    assert_eq!(first, second);
    assert!(reader.message_log().is_empty());
}

#[test]
fn test_concatenated_images_are_read_in_sequence() {
    let first = gradient_gray(8, 8).build();
    let second = JpegBuilder::ycbcr(16, 8, 1, 1).build();
    let mut data = first.clone();
    data.extend_from_slice(&second);

    let mut source = MemoryReader::new(&data);
    let mut reader = JpegReader::with_source(&mut source, DecompressionOptions::default());
    let a = reader.read_image_data();
    assert_eq!((a.width(), a.height(), a.nr_channels()), (8, 8, 1));

    reader.reset();
    let header = reader.read_header();
    assert_eq!((header.width, header.height, header.color_space), (16, 8, JpegColorSpace::YCbCr));
    let b = reader.read_image_data();
    assert_eq!((b.width(), b.height(), b.nr_channels()), (16, 8, 3));
    assert!(reader.message_log().is_empty());
}

#[test]
fn test_truncated_stream_fails_cleanly() {
    let data = gradient_gray(64, 64).build();
    let truncated = &data[..data.len() - 40];

    let mut source = MemoryReader::new(truncated);
    let mut reader = JpegReader::with_source(&mut source, DecompressionOptions::default());
    assert!(reader.read_header().is_valid());
    let image = reader.read_image_data();
    assert!(!image.is_valid());
    assert!(image.is_empty());
    assert!(reader.message_log().error_count() >= 1);
    assert_eq!(reader.state(), ReaderState::Done);

    // The reader can be used again right away.
    let mut good = MemoryReader::new(&data);
    reader.set_source(&mut good);
    assert!(reader.read_image_data().is_valid());
}

#[test]
fn test_too_small_view_fails_before_writing() {
    let data = gradient_gray(8, 8).build();
    let mut source = MemoryReader::new(&data);
    let mut reader = JpegReader::with_source(&mut source, DecompressionOptions::default());

    let mut memory = vec![0xAAu8; 63];
    let mut view = ImageView::new(&mut memory);
    assert!(!reader.read_image_data_into(&mut view));
    assert_eq!(reader.message_log().error_count(), 1);
    assert_eq!(reader.message_log().messages()[0].kind, MessageType::Error);
    drop(view);
    assert!(memory.iter().all(|&b| b == 0xAA));
}

#[test]
fn test_view_with_wider_stride() {
    let builder = gradient_gray(8, 2);
    let data = builder.build();
    let mut source = MemoryReader::new(&data);
    let mut reader = JpegReader::with_source(&mut source, DecompressionOptions::default());

    let mut memory = vec![0u8; 24];
    let mut view = ImageView::view_over(&mut memory, Layout::new(8, 2, 1, 1, 12), Default::default())
        .expect("memory is large enough");
    assert!(reader.read_image_data_into(&mut view));
    assert_eq!(view.layout().stride(), 12);
    drop(view);
    for y in 0..2 {
        for x in 0..8 {
            assert_eq!(memory[y * 12 + x], builder.expected_sample(0, x, y));
        }
        assert!(memory[y * 12 + 8..y * 12 + 12].iter().all(|&b| b == 0));
    }
}

#[test]
fn test_decode_into_view_of_owned_buffer() {
    let data = gradient_gray(16, 8).build();
    let mut source = MemoryReader::new(&data);
    let mut reader = JpegReader::with_source(&mut source, DecompressionOptions::default());
    let info = reader.get_output_image_info();
    let mut image = ImageBuffer::allocate(info.output_layout(), info.output_semantics());
    assert!(reader.read_image_data_into(&mut image.as_view()));

    let mut again = MemoryReader::new(&data);
    reader.set_source(&mut again);
    assert_eq!(reader.read_image_data(), image);
}

#[test]
fn test_not_a_jpeg() {
    let data = b"GIF89a......".to_vec();
    let mut source = MemoryReader::new(&data);
    let mut reader = JpegReader::with_source(&mut source, DecompressionOptions::default());
    assert!(!reader.read_header().is_valid());
    assert!(!reader.read_image_data().is_valid());
    assert_eq!(reader.message_log().error_count(), 1);
    assert!(reader.message_log().messages()[0].text.starts_with("Not a JPEG file"));
}
