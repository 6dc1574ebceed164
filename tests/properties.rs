use proptest::prelude::*;
use zenpnge::*;

fn decode_pixels(data: &[u8]) -> Vec<u8> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info().unwrap();
    let mut pixels = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut pixels).unwrap();
    pixels.truncate(info.buffer_size());
    pixels
}

fn layout() -> impl Strategy<Value = (u32, u32, u32, u32, usize)> {
    (1u32..12, 1u32..12, 1u32..=4, prop_oneof![Just(8u32), Just(16u32)], 0usize..9)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn row_padding_never_changes_pixels(
        (w, h, c, bits, pad) in layout(),
        seed in any::<u64>(),
    ) {
        let row = (w * c * bits / 8) as usize;
        let tight: Vec<u8> = (0..row * h as usize)
            .map(|i| (seed.rotate_left(i as u32 % 64) ^ i as u64) as u8)
            .collect();
        let stride = row + pad;
        let mut padded = vec![0x5A; stride * h as usize];
        for (dst, src) in padded.chunks_mut(stride).zip(tight.chunks(row)) {
            dst[..row].copy_from_slice(src);
        }

        let a = encode_bytes(&tight, w, h, c, bits, 0).unwrap();
        let b = encode_bytes(&padded, w, h, c, bits, stride).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(decode_pixels(&a), tight);
    }

    #[test]
    fn sixteen_bit_values_survive(values in prop::collection::vec(any::<u16>(), 1..64)) {
        let samples = byte_order::to_big_endian_u16(&values);
        let shape = [1, values.len(), 1];
        let array = ArrayView::new(&samples, &shape, 2).with_byte_order(ByteOrder::Big);
        let decoded = decode_pixels(&encode_array(&array).unwrap());
        prop_assert_eq!(decoded, samples);
    }

    #[test]
    fn short_buffers_are_rejected((w, h, c, bits, _) in layout(), missing in 1usize..4) {
        let needed = (w * h * c * bits / 8) as usize;
        let pixels = vec![0u8; needed.saturating_sub(missing)];
        let is_too_small = matches!(
            encode_bytes(&pixels, w, h, c, bits, 0),
            Err(EncodeError::BufferTooSmall { .. })
        );
        prop_assert!(is_too_small);
    }

    #[test]
    fn convertible_bitmaps_always_encode(
        tag in prop::sample::select(vec!["1", "CMYK", "YCbCr", "LAB", "HSV", "LA", "RGBa", "La"]),
        w in 1u32..8,
        h in 1u32..8,
        fill in any::<u8>(),
    ) {
        let model = ColorModel::from_tag(tag).unwrap();
        let source_bytes = match model {
            ColorModel::Bilevel => (w as usize).div_ceil(8) * h as usize,
            ColorModel::Cmyk => 4 * (w * h) as usize,
            ColorModel::LumaAlpha | ColorModel::LumaAlphaPremultiplied => 2 * (w * h) as usize,
            ColorModel::RgbaPremultiplied => 4 * (w * h) as usize,
            _ => 3 * (w * h) as usize,
        };
        let pixels = vec![fill; source_bytes];
        let bitmap = Bitmap::new(tag, w, h, &pixels);
        let out = encode_bitmap(&bitmap).unwrap();
        prop_assert!(out.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
