#![no_main]
use libfuzzer_sys::fuzz_target;
use zenpnge::*;

fuzz_target!(|data: &[u8]| {
    // First 8 bytes pick a layout, the rest is the pixel buffer
    let Some((header, pixels)) = data.split_first_chunk::<8>() else {
        return;
    };
    let width = u32::from(header[0] % 64);
    let height = u32::from(header[1] % 64);
    let channels = u32::from(header[2] % 6);
    let bits = [0, 8, 16, 12][usize::from(header[3] % 4)];
    let stride = usize::from(u16::from_le_bytes([header[4], header[5]]));
    let order = if header[6] & 1 == 0 { ByteOrder::Big } else { ByteOrder::Little };
    let infer = header[7] & 1 == 1;

    let result = if infer {
        let view = RawView::new(pixels)
            .with_shape(width as usize, height as usize, channels as usize)
            .with_item_size(bits as usize / 8)
            .with_row_stride(stride)
            .with_byte_order(order);
        encode_view(&view, &LayoutOverrides::new())
    } else {
        encode_bytes(pixels, width, height, channels, bits, stride)
    };

    let Ok(png_data) = result else { return };

    // Anything accepted must decode back to the declared dimensions
    let mut decoder = png::Decoder::new(&png_data[..]);
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info().expect("encoder produced an unreadable header");
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).expect("encoder produced unreadable data");
    assert_eq!(info.width, width);
    assert_eq!(info.height, height);
});
