#![no_main]
use libfuzzer_sys::fuzz_target;
use zenpnge::*;

const TAGS: [&str; 14] = [
    "L", "RGB", "RGBA", "PA", "RGBX", "1", "P", "CMYK", "YCbCr", "LAB", "HSV", "LA", "RGBa", "La",
];

fuzz_target!(|data: &[u8]| {
    let Some((header, pixels)) = data.split_first_chunk::<3>() else {
        return;
    };
    let tag = TAGS[usize::from(header[0]) % TAGS.len()];
    let width = u32::from(header[1] % 32);
    let height = u32::from(header[2] % 32);

    let palette = Palette::from_rgb(&pixels[..pixels.len().min(48) / 3 * 3]);
    let bitmap = Bitmap::new(tag, width, height, pixels).with_palette(&palette);
    for policy in [
        PaletteExpansion::UsePaletteAlpha,
        PaletteExpansion::ForceOpaque,
        PaletteExpansion::TransparentIndex(0),
    ] {
        let _ = EncodeRequest::new()
            .with_effort(Effort::new(1))
            .with_palette_expansion(policy)
            .encode_bitmap(&bitmap, &LayoutOverrides::new());
    }
});
