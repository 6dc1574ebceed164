//! Decoded-bitmap adapter.
//!
//! Bitmaps carry a color-model tag and 8-bit samples. Supported models are
//! passed through borrowed; every other recognized model is expanded here,
//! before the descriptor is built, into the model the conversion table names.

use std::borrow::Cow;

use super::{ImageSource, SourceOptions, alloc_checked, checked_len};
use crate::error::EncodeError;
use crate::layout::{self, ImageDescriptor, LayoutOverrides, SourceShape};
use crate::model::ColorModel;

/// A decoded 8-bit bitmap, rows tightly packed.
///
/// `"1"` bitmaps pack eight pixels per byte (most significant bit first), each
/// row padded to a whole byte. `"P"` bitmaps hold one palette index per pixel.
#[derive(Clone, Copy, Debug)]
pub struct Bitmap<'a> {
    pub mode: &'a str,
    pub width: u32,
    pub height: u32,
    pub pixels: &'a [u8],
    pub palette: Option<&'a Palette>,
}

impl<'a> Bitmap<'a> {
    pub fn new(mode: &'a str, width: u32, height: u32, pixels: &'a [u8]) -> Self {
        Self {
            mode,
            width,
            height,
            pixels,
            palette: None,
        }
    }

    pub fn with_palette(mut self, palette: &'a Palette) -> Self {
        self.palette = Some(palette);
        self
    }
}

/// RGBA palette entries for indexed bitmaps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<[u8; 4]>,
}

impl Palette {
    /// Opaque palette from packed RGB triples. A trailing partial triple is ignored.
    pub fn from_rgb(rgb: &[u8]) -> Self {
        Self {
            entries: rgb
                .chunks_exact(3)
                .map(|c| [c[0], c[1], c[2], 255])
                .collect(),
        }
    }

    /// Palette from packed RGBA quads.
    pub fn from_rgba(rgba: &[u8]) -> Self {
        Self {
            entries: rgba
                .chunks_exact(4)
                .map(|c| [c[0], c[1], c[2], c[3]])
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[[u8; 4]] {
        &self.entries
    }
}

/// How palette entries map to RGBA when an indexed bitmap is expanded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaletteExpansion {
    /// Keep each entry's own alpha.
    #[default]
    UsePaletteAlpha,
    /// Ignore palette alpha; every pixel is opaque.
    ForceOpaque,
    /// This index is fully transparent, all others opaque.
    TransparentIndex(u8),
}

impl ImageSource for Bitmap<'_> {
    fn descriptor(
        &self,
        overrides: &LayoutOverrides,
        options: &SourceOptions,
    ) -> Result<ImageDescriptor<'_>, EncodeError> {
        let model = ColorModel::from_tag(self.mode)?;
        let target = model.resolve();
        let channels = target.channels()?;

        if let Some(bits) = overrides.explicit_bits() {
            if bits != 8 {
                return Err(EncodeError::UnsupportedBitDepth(bits));
            }
        }
        options.limits.check(self.width, self.height)?;

        let pixels: Cow<'_, [u8]> = if model.is_supported() {
            Cow::Borrowed(self.pixels)
        } else {
            tracing::debug!(
                from = %model,
                to = %target,
                width = self.width,
                height = self.height,
                "expanding bitmap color model"
            );
            Cow::Owned(expand(model, self, options)?)
        };

        let shape = SourceShape {
            width: self.width as usize,
            height: self.height as usize,
            channels: channels as usize,
            element_size: 1,
            row_stride: None,
        };
        layout::resolve(pixels, overrides, &shape)
    }
}

/// Bytes per input pixel for convertible models (`"1"` is handled separately).
fn source_bytes_per_pixel(model: ColorModel) -> usize {
    match model {
        ColorModel::Palette => 1,
        ColorModel::LumaAlpha | ColorModel::LumaAlphaPremultiplied => 2,
        ColorModel::YCbCr | ColorModel::Lab | ColorModel::Hsv => 3,
        _ => 4,
    }
}

fn expand(
    model: ColorModel,
    bitmap: &Bitmap<'_>,
    options: &SourceOptions,
) -> Result<Vec<u8>, EncodeError> {
    let w = bitmap.width as usize;
    let h = bitmap.height as usize;
    let out_channels = model.resolve().channels()? as usize;
    let out_len = checked_len(w, h, out_channels)?;
    if out_len == 0 {
        // Nothing to convert; the resolver reports the empty axis.
        return Ok(Vec::new());
    }

    if model == ColorModel::Bilevel {
        let row_in = w.div_ceil(8);
        require_len(bitmap.pixels, checked_len(row_in, h, 1)?)?;
        let mut out = alloc_checked(&options.limits, out_len)?;
        for row in bitmap.pixels.chunks_exact(row_in).take(h) {
            for x in 0..w {
                let bit = (row[x / 8] >> (7 - x % 8)) & 1;
                out.push(if bit == 1 { 255 } else { 0 });
            }
        }
        return Ok(out);
    }

    let bpp = source_bytes_per_pixel(model);
    let in_len = checked_len(w, h, bpp)?;
    require_len(bitmap.pixels, in_len)?;
    let src = &bitmap.pixels[..in_len];
    let mut out = alloc_checked(&options.limits, out_len)?;

    match model {
        ColorModel::Palette => {
            let palette = bitmap
                .palette
                .ok_or_else(|| EncodeError::layout("palette", "indexed bitmap has no palette"))?;
            for &index in src {
                let entry = palette.entries.get(index as usize).ok_or_else(|| {
                    EncodeError::layout(
                        "palette",
                        format!("index {index} outside {}-entry palette", palette.len()),
                    )
                })?;
                let alpha = match options.palette_expansion {
                    PaletteExpansion::UsePaletteAlpha => entry[3],
                    PaletteExpansion::ForceOpaque => 255,
                    PaletteExpansion::TransparentIndex(t) if t == index => 0,
                    PaletteExpansion::TransparentIndex(_) => 255,
                };
                out.extend_from_slice(&[entry[0], entry[1], entry[2], alpha]);
            }
        }
        ColorModel::Cmyk => {
            for px in src.chunks_exact(4) {
                let k = 255 - px[3] as u32;
                for &c in &px[..3] {
                    out.push(div255((255 - c as u32) * k));
                }
            }
        }
        ColorModel::YCbCr => {
            for px in src.chunks_exact(3) {
                out.extend_from_slice(&ycbcr_to_rgb(px[0], px[1], px[2]));
            }
        }
        ColorModel::Lab => {
            for px in src.chunks_exact(3) {
                out.extend_from_slice(&lab_to_rgb(px[0], px[1], px[2]));
            }
        }
        ColorModel::Hsv => {
            for px in src.chunks_exact(3) {
                out.extend_from_slice(&hsv_to_rgb(px[0], px[1], px[2]));
            }
        }
        ColorModel::LumaAlpha => {
            for px in src.chunks_exact(2) {
                out.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
            }
        }
        ColorModel::RgbaPremultiplied => {
            for px in src.chunks_exact(4) {
                let a = px[3];
                out.extend_from_slice(&[
                    unpremultiply(px[0], a),
                    unpremultiply(px[1], a),
                    unpremultiply(px[2], a),
                    a,
                ]);
            }
        }
        ColorModel::LumaAlphaPremultiplied => {
            for px in src.chunks_exact(2) {
                out.extend_from_slice(&[unpremultiply(px[0], px[1]), px[1]]);
            }
        }
        other => return Err(EncodeError::UnsupportedModel(other.tag().into())),
    }
    Ok(out)
}

fn require_len(pixels: &[u8], needed: usize) -> Result<(), EncodeError> {
    if pixels.len() < needed {
        return Err(EncodeError::BufferTooSmall {
            needed,
            actual: pixels.len(),
        });
    }
    Ok(())
}

fn div255(v: u32) -> u8 {
    ((v + 127) / 255) as u8
}

fn unpremultiply(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let a = a as u32;
    ((c as u32 * 255 + a / 2) / a).min(255) as u8
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> [u8; 3] {
    let y = y as f32;
    let cb = cb as f32 - 128.0;
    let cr = cr as f32 - 128.0;
    [
        to_u8(y + 1.402 * cr),
        to_u8(y - 0.344_136 * cb - 0.714_136 * cr),
        to_u8(y + 1.772 * cb),
    ]
}

fn lab_to_rgb(l: u8, a: u8, b: u8) -> [u8; 3] {
    let l = l as f32 * 100.0 / 255.0;
    let a = a as i8 as f32;
    let b = b as i8 as f32;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;
    let finv = |t: f32| {
        let t3 = t * t * t;
        if t3 > 0.008_856 { t3 } else { (t - 16.0 / 116.0) / 7.787 }
    };
    // D65 reference white
    let x = 0.950_47 * finv(fx);
    let y = finv(fy);
    let z = 1.088_83 * finv(fz);

    let linear = [
        3.240_454_2 * x - 1.537_138_5 * y - 0.498_531_4 * z,
        -0.969_266 * x + 1.876_010_8 * y + 0.041_556 * z,
        0.055_643_4 * x - 0.204_025_9 * y + 1.057_225_2 * z,
    ];
    linear.map(|c| {
        let c = c.clamp(0.0, 1.0);
        let srgb = if c <= 0.003_130_8 {
            12.92 * c
        } else {
            1.055 * c.powf(1.0 / 2.4) - 0.055
        };
        to_u8(srgb * 255.0)
    })
}

fn hsv_to_rgb(h: u8, s: u8, v: u8) -> [u8; 3] {
    if s == 0 {
        return [v, v, v];
    }
    let h = h as f32 * 6.0 / 255.0;
    let s = s as f32 / 255.0;
    let v = v as f32;
    let sector = (h.floor() as u32) % 6;
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [to_u8(r), to_u8(g), to_u8(b)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor<'a>(bitmap: &'a Bitmap<'a>) -> Result<ImageDescriptor<'a>, EncodeError> {
        bitmap.descriptor(&LayoutOverrides::new(), &SourceOptions::default())
    }

    #[test]
    fn supported_model_is_borrowed() {
        let pixels = [1u8, 2, 3, 4, 5, 6];
        let bitmap = Bitmap::new("RGB", 2, 1, &pixels);
        let desc = descriptor(&bitmap).unwrap();
        assert!(desc.is_borrowed());
        assert_eq!(desc.channels(), 3);
        assert_eq!(desc.stride(), 6);
    }

    #[test]
    fn rgbx_keeps_four_channels() {
        let pixels = [9u8, 8, 7, 0];
        let bitmap = Bitmap::new("RGBX", 1, 1, &pixels);
        let desc = descriptor(&bitmap).unwrap();
        assert_eq!(desc.channels(), 4);
        assert_eq!(desc.pixels(), &pixels);
    }

    #[test]
    fn unknown_tag_fails_before_pixel_access() {
        // An empty buffer would fail any length check; the tag must fail first.
        let bitmap = Bitmap::new("BGR;", 4, 4, &[]);
        match descriptor(&bitmap) {
            Err(EncodeError::UnsupportedModel(tag)) => assert_eq!(tag, "BGR;"),
            other => panic!("expected UnsupportedModel, got {other:?}"),
        }
    }

    #[test]
    fn sixteen_bit_override_rejected() {
        let pixels = [0u8; 4];
        let bitmap = Bitmap::new("L", 2, 2, &pixels);
        let overrides = LayoutOverrides::new().with_bits_per_channel(16);
        assert!(matches!(
            bitmap.descriptor(&overrides, &SourceOptions::default()),
            Err(EncodeError::UnsupportedBitDepth(16))
        ));
    }

    #[test]
    fn bilevel_unpacks_msb_first() {
        // 10 pixels wide: two bytes per row
        let pixels = [0b1010_0000, 0b0100_0000];
        let bitmap = Bitmap::new("1", 10, 1, &pixels);
        let desc = descriptor(&bitmap).unwrap();
        assert_eq!(desc.channels(), 1);
        assert_eq!(desc.pixels(), &[255, 0, 255, 0, 0, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn palette_expansion_policies() {
        let palette = Palette::from_rgba(&[10, 20, 30, 128, 40, 50, 60, 255]);
        let indices = [0u8, 1];
        let bitmap = Bitmap::new("P", 2, 1, &indices).with_palette(&palette);

        let desc = descriptor(&bitmap).unwrap();
        assert_eq!(desc.channels(), 4);
        assert_eq!(desc.pixels(), &[10, 20, 30, 128, 40, 50, 60, 255]);

        let opaque = SourceOptions {
            palette_expansion: PaletteExpansion::ForceOpaque,
            ..Default::default()
        };
        let desc = bitmap.descriptor(&LayoutOverrides::new(), &opaque).unwrap();
        assert_eq!(desc.pixels(), &[10, 20, 30, 255, 40, 50, 60, 255]);

        let keyed = SourceOptions {
            palette_expansion: PaletteExpansion::TransparentIndex(1),
            ..Default::default()
        };
        let desc = bitmap.descriptor(&LayoutOverrides::new(), &keyed).unwrap();
        assert_eq!(desc.pixels(), &[10, 20, 30, 255, 40, 50, 60, 0]);
    }

    #[test]
    fn palette_errors() {
        let indices = [0u8, 3];
        let bitmap = Bitmap::new("P", 2, 1, &indices);
        assert!(matches!(
            descriptor(&bitmap),
            Err(EncodeError::InvalidLayout { field: "palette", .. })
        ));
        let palette = Palette::from_rgb(&[1, 2, 3, 4, 5, 6]);
        let bitmap = bitmap.with_palette(&palette);
        assert!(matches!(
            descriptor(&bitmap),
            Err(EncodeError::InvalidLayout { field: "palette", .. })
        ));
    }

    #[test]
    fn cmyk_to_rgb() {
        let pixels = [0u8, 0, 0, 0, 255, 0, 0, 0, 0, 0, 0, 255];
        let bitmap = Bitmap::new("CMYK", 3, 1, &pixels);
        let desc = descriptor(&bitmap).unwrap();
        assert_eq!(desc.channels(), 3);
        assert_eq!(desc.pixels(), &[255, 255, 255, 0, 255, 255, 0, 0, 0]);
    }

    #[test]
    fn ycbcr_neutral_is_gray() {
        let pixels = [100u8, 128, 128];
        let bitmap = Bitmap::new("YCbCr", 1, 1, &pixels);
        assert_eq!(descriptor(&bitmap).unwrap().pixels(), &[100, 100, 100]);
    }

    #[test]
    fn lab_extremes() {
        let pixels = [255u8, 0, 0, 0, 0, 0];
        let bitmap = Bitmap::new("LAB", 2, 1, &pixels);
        let desc = descriptor(&bitmap).unwrap();
        let px = desc.pixels();
        assert!(px[..3].iter().all(|&c| c >= 254), "white came out {:?}", &px[..3]);
        assert_eq!(&px[3..], &[0, 0, 0]);
    }

    #[test]
    fn hsv_primaries() {
        let pixels = [0u8, 255, 255, 85, 255, 255, 0, 0, 77];
        let bitmap = Bitmap::new("HSV", 3, 1, &pixels);
        assert_eq!(
            descriptor(&bitmap).unwrap().pixels(),
            &[255, 0, 0, 0, 255, 0, 77, 77, 77]
        );
    }

    #[test]
    fn luma_alpha_becomes_rgba() {
        let pixels = [50u8, 200];
        let bitmap = Bitmap::new("LA", 1, 1, &pixels);
        let desc = descriptor(&bitmap).unwrap();
        assert_eq!(desc.channels(), 4);
        assert_eq!(desc.pixels(), &[50, 50, 50, 200]);
    }

    #[test]
    fn premultiplied_alpha_is_undone() {
        let pixels = [64u8, 32, 0, 128, 9, 9, 9, 0];
        let bitmap = Bitmap::new("RGBa", 2, 1, &pixels);
        assert_eq!(
            descriptor(&bitmap).unwrap().pixels(),
            &[128, 64, 0, 128, 0, 0, 0, 0]
        );

        let pixels = [100u8, 200];
        let bitmap = Bitmap::new("La", 1, 1, &pixels);
        let desc = descriptor(&bitmap).unwrap();
        assert_eq!(desc.channels(), 2);
        assert_eq!(desc.pixels(), &[128, 200]);
    }

    #[test]
    fn short_conversion_input() {
        let pixels = [0u8; 5];
        let bitmap = Bitmap::new("CMYK", 2, 1, &pixels);
        assert!(matches!(
            descriptor(&bitmap),
            Err(EncodeError::BufferTooSmall { needed: 8, actual: 5 })
        ));
    }
}
