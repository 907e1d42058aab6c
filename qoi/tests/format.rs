use qoi::{
    consts::*,
    decode::{streaming::QoiStreamingDecodeContext, SliceDecodeOutput, VecDecodeOutput},
    encode::EncodeToVecError,
    utils::hash,
    Channels, Colorspace, DecodeError, EncodeError, Header, QoiDecodeContext, QoiEncodeContext,
    Rgba,
};
use std::io;

fn encode(width: u32, height: u32, pixels: &[Rgba]) -> Vec<u8> {
    let mut encoded = Vec::new();
    QoiEncodeContext::encode_to_vec(width, height, pixels, &mut encoded).unwrap();
    encoded
}

/// The op bytes between header and end marker.
fn ops(encoded: &[u8]) -> &[u8] {
    assert!(encoded.ends_with(&QOI_END_MARKER), "missing end marker");
    &encoded[QOI_HEADER_SIZE..encoded.len() - QOI_END_MARKER.len()]
}

#[test]
fn one_pixel_image() {
    let encoded = encode(1, 1, &[Rgba::new(100, 0, 0, 0)]);

    assert_eq!(
        encoded,
        [
            b'q', b'o', b'i', b'f', 0, 0, 0, 1, 0, 0, 0, 1, 4, 0, // header
            QOI_OP_RGBA, 100, 0, 0, 0, // alpha differs from the seed
            0, 0, 0, 0, 0, 0, 0, 1, // end marker
        ]
    );
}

#[test]
fn header_is_always_rgba_srgb() {
    let rgb = image::RgbImage::from_fn(5, 3, |x, y| image::Rgb([x as u8, y as u8, 7]));
    let rgba = image::DynamicImage::ImageRgb8(rgb).to_rgba8();
    let pixels: Vec<Rgba> = rgba.pixels().map(|p| Rgba::from(p.0)).collect();

    let encoded = encode(5, 3, &pixels);
    let (header, _) = Header::parse(&encoded).unwrap();

    assert_eq!(
        header,
        Header {
            width: 5,
            height: 3,
            channels: Channels::Rgba,
            colorspace: Colorspace::Srgb,
        }
    );
}

#[test]
fn diff_after_rgba() {
    let encoded = encode(2, 1, &[Rgba::new(100, 0, 0, 0), Rgba::new(100, 1, 0, 0)]);
    assert_eq!(
        ops(&encoded),
        [QOI_OP_RGBA, 100, 0, 0, 0, QOI_OP_DIFF | 2 << 4 | 3 << 2 | 2]
    );
}

#[test]
fn luma_after_rgba() {
    let encoded = encode(2, 1, &[Rgba::new(100, 2, 0, 0), Rgba::new(102, 0, 0, 0)]);
    assert_eq!(
        ops(&encoded),
        [QOI_OP_RGBA, 100, 2, 0, 0, QOI_OP_LUMA | 30, 12 << 4 | 10]
    );
}

#[test]
fn run_is_capped_at_62() {
    let mut pixels = vec![Rgba::SEED; 62];
    pixels.push(Rgba::new(1, 1, 1, 255));
    let encoded = encode(63, 1, &pixels);
    assert_eq!(ops(&encoded), [QOI_OP_RUN | 61, QOI_OP_DIFF | 0b11_11_11]);

    let encoded = encode(9, 7, &[Rgba::SEED; 63]);
    assert_eq!(ops(&encoded), [QOI_OP_RUN | 61, QOI_OP_RUN]);

    let encoded = encode(124, 1, &[Rgba::SEED; 124]);
    assert_eq!(ops(&encoded), [QOI_OP_RUN | 61, QOI_OP_RUN | 61]);
}

#[test]
fn trailing_run_is_flushed() {
    let px = Rgba::new(3, 4, 5, 6);
    let encoded = encode(2, 2, &[px; 4]);
    assert_eq!(ops(&encoded), [QOI_OP_RGBA, 3, 4, 5, 6, QOI_OP_RUN | 2]);

    let (_, decoded) = QoiDecodeContext::decode_to_vec(&encoded).unwrap();
    assert_eq!(decoded, [px; 4]);
}

#[test]
fn index_roundtrip() {
    let a = Rgba::new(10, 20, 30, 255);
    let b = Rgba::new(200, 100, 50, 255);
    let pixels = [a, b, a, b];

    let encoded = encode(4, 1, &pixels);
    let bytes = ops(&encoded);
    assert_eq!(
        &bytes[bytes.len() - 2..],
        [QOI_OP_INDEX | hash(a), QOI_OP_INDEX | hash(b)]
    );

    let (_, decoded) = QoiDecodeContext::decode_to_vec(&encoded).unwrap();
    assert_eq!(decoded, pixels);
}

#[test]
fn bad_magic() {
    let mut encoded = encode(1, 1, &[Rgba::SEED]);
    encoded[3] = b'x';

    let err = QoiDecodeContext::decode_to_vec(&encoded).unwrap_err();
    assert!(err.is_malformed_header(), "{err:?}");
    assert!(matches!(err, DecodeError::InvalidMagic { magic } if &magic == b"qoix"));

    // only the magic is present
    let err = QoiDecodeContext::decode_to_vec(b"qoix").unwrap_err();
    assert!(matches!(err, DecodeError::InvalidMagic { .. }));

    let err = QoiDecodeContext::decode_from_reader(&encoded[..]).unwrap_err();
    assert!(err.as_decode_error().unwrap().is_malformed_header());
}

#[test]
fn truncated_stream() {
    let pixels: Vec<Rgba> = (0..64u8).map(|i| Rgba::new(i * 3, i, 255 - i, 255)).collect();
    let encoded = encode(8, 8, &pixels);
    let without_marker = &encoded[..encoded.len() - QOI_END_MARKER.len()];

    for len in [0, 5, QOI_HEADER_SIZE, QOI_HEADER_SIZE + 1, without_marker.len() - 1] {
        let truncated = &encoded[..len];

        let err = QoiDecodeContext::decode_to_vec(truncated).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof), "{len}: {err:?}");

        let err = QoiDecodeContext::decode_from_reader(truncated).unwrap_err();
        assert!(
            matches!(err.as_decode_error(), Some(DecodeError::UnexpectedEof)),
            "{len}: {err:?}"
        );
    }

    let mut state = QoiStreamingDecodeContext::new(64);
    let mut out = Vec::new();
    state.feed(
        &without_marker[QOI_HEADER_SIZE..without_marker.len() - 1],
        &mut VecDecodeOutput::new(&mut out),
    );
    assert!(!state.is_done());
    assert!(matches!(state.finish(), Err(DecodeError::UnexpectedEof)));
}

#[test]
fn end_marker_is_not_read() {
    let pixels = [Rgba::new(1, 2, 3, 4), Rgba::new(5, 6, 7, 8)];
    let encoded = encode(2, 1, &pixels);
    let without_marker = &encoded[..encoded.len() - QOI_END_MARKER.len()];

    let (_, decoded) = QoiDecodeContext::decode_to_vec(without_marker).unwrap();
    assert_eq!(decoded, pixels);

    let mut with_garbage = encoded.clone();
    with_garbage.extend_from_slice(b"garbage");
    let (_, decoded) = QoiDecodeContext::decode_to_vec(&with_garbage).unwrap();
    assert_eq!(decoded, pixels);

    let mut state = QoiStreamingDecodeContext::new(2);
    let mut out = Vec::new();
    let consumed = state.feed(&encoded[QOI_HEADER_SIZE..], &mut VecDecodeOutput::new(&mut out));
    assert_eq!(consumed, without_marker.len() - QOI_HEADER_SIZE);
    assert_eq!(out, pixels);
}

#[test]
fn three_channel_header_keeps_stream_alpha() {
    let mut data = Header {
        width: 2,
        height: 1,
        channels: Channels::Rgb,
        colorspace: Colorspace::Linear,
    }
    .to_bytes()
    .to_vec();
    data.extend_from_slice(&[QOI_OP_RGBA, 1, 2, 3, 0, QOI_OP_RGB, 4, 5, 6]);

    let (header, decoded) = QoiDecodeContext::decode_to_vec(&data).unwrap();
    assert_eq!(header.channels, Channels::Rgb);
    assert_eq!(decoded, [Rgba::new(1, 2, 3, 0), Rgba::new(4, 5, 6, 0)]);
}

#[test]
fn run_as_first_op_repeats_the_seed() {
    let mut data = Header::new(3, 1).to_bytes().to_vec();
    data.push(QOI_OP_RUN | 2);

    let (_, decoded) = QoiDecodeContext::decode_to_vec(&data).unwrap();
    assert_eq!(decoded, [Rgba::SEED; 3]);
}

#[test]
fn index_of_untouched_slot_is_zero_pixel() {
    let mut data = Header::new(1, 1).to_bytes().to_vec();
    data.push(QOI_OP_INDEX | 17);

    let (_, decoded) = QoiDecodeContext::decode_to_vec(&data).unwrap();
    assert_eq!(decoded, [Rgba::ZERO]);
}

#[test]
fn oversized_header_fails_before_allocating() {
    let mut data = Header::new(u32::MAX, u32::MAX).to_bytes().to_vec();
    data.push(QOI_OP_RUN | 61);

    let err = QoiDecodeContext::decode_to_vec(&data).unwrap_err();
    assert!(matches!(err, DecodeError::UnexpectedEof));
}

#[test]
fn empty_image() {
    let encoded = encode(0, 0, &[]);
    assert_eq!(encoded.len(), QOI_HEADER_SIZE + QOI_END_MARKER.len());

    let (header, decoded) = QoiDecodeContext::decode_to_vec(&encoded).unwrap();
    assert_eq!((header.width, header.height), (0, 0));
    assert!(decoded.is_empty());
}

#[test]
fn output_too_small() {
    let encoded = encode(2, 2, &[Rgba::SEED; 4]);
    let mut buf = [Rgba::ZERO; 3];

    let err = QoiDecodeContext::decode(&encoded, SliceDecodeOutput::new(&mut buf)).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::OutputTooSmall {
            required: 4,
            available: 3
        }
    ));
}

#[test]
fn invalid_dimensions() {
    let mut encoded = Vec::new();
    let err = QoiEncodeContext::encode_to_vec(3, 3, &[Rgba::SEED; 8], &mut encoded).unwrap_err();
    assert!(matches!(
        err,
        EncodeToVecError::InvalidDimensions { pixel_count: 8, .. }
    ));
    assert!(encoded.is_empty());

    let err = QoiEncodeContext::encode(3, 3, &[Rgba::SEED; 10], io::sink()).unwrap_err();
    assert!(matches!(err, EncodeError::InvalidDimensions { .. }));
}

struct FailingWriter {
    budget: usize,
}

impl io::Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget < buf.len() {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.budget -= buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_failure() {
    let pixels = [Rgba::new(9, 9, 9, 9); 4];

    for budget in [0, QOI_HEADER_SIZE, QOI_HEADER_SIZE + 5] {
        let err = QoiEncodeContext::encode(2, 2, &pixels, FailingWriter { budget }).unwrap_err();
        assert!(matches!(err, EncodeError::WriteIo { .. }), "{budget}: {err:?}");
    }
}

#[test]
fn consecutive_images_start_from_the_seed() {
    let first = [Rgba::new(10, 20, 30, 255), Rgba::new(11, 21, 31, 255)];
    let second = [Rgba::new(10, 20, 30, 255)];

    let mut stream = Vec::new();
    QoiEncodeContext::encode_header(2, 1, &mut stream).unwrap();
    QoiEncodeContext::encode_pixels(&first, &mut stream).unwrap();
    let split = stream.len();
    QoiEncodeContext::encode_header(1, 1, &mut stream).unwrap();
    QoiEncodeContext::encode_pixels(&second, &mut stream).unwrap();

    // a full pixel, not an index into the first image's color array
    assert_eq!(ops(&stream[split..]), [QOI_OP_RGB, 10, 20, 30]);

    let (_, decoded) = QoiDecodeContext::decode_to_vec(&stream[..split]).unwrap();
    assert_eq!(decoded, first);
    let (_, decoded) = QoiDecodeContext::decode_to_vec(&stream[split..]).unwrap();
    assert_eq!(decoded, second);

    let mut encoded = Vec::new();
    QoiEncodeContext::encode_to_vec(1, 1, &second, &mut encoded).unwrap();
    assert_eq!(encoded, &stream[split..]);
}

#[test]
fn reader_leaves_end_marker_unread() {
    let pixels = [Rgba::new(1, 2, 3, 4), Rgba::new(5, 6, 7, 8)];
    let encoded = encode(2, 1, &pixels);

    let mut rest = &encoded[..];
    let (_, decoded) = QoiDecodeContext::decode_from_reader(&mut rest).unwrap();
    assert_eq!(decoded, pixels);
    assert_eq!(rest, QOI_END_MARKER);
}
