//! Color-model tags and the one-step conversion table.
//!
//! Tags follow the mode names bitmap producers commonly report (`"L"`,
//! `"RGB"`, `"RGBA"`, ...). Five models are encoded as-is; every other
//! recognized model converts to exactly one of those five before its channels
//! are counted.

use core::fmt;
use core::str::FromStr;

use crate::error::EncodeError;

/// Color model of a decoded bitmap.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorModel {
    /// `"L"`: 8-bit luminance.
    Gray,
    /// `"PA"`: luminance plus alpha.
    GrayAlpha,
    /// `"RGB"`.
    Rgb,
    /// `"RGBA"`.
    Rgba,
    /// `"RGBX"`: RGB with an ignored fourth byte, passed through untouched.
    Rgbx,
    /// `"1"`: bilevel, packed one bit per pixel.
    Bilevel,
    /// `"P"`: one palette index per pixel.
    Palette,
    /// `"CMYK"`.
    Cmyk,
    /// `"YCbCr"`: full-range JPEG YCbCr.
    YCbCr,
    /// `"LAB"`: CIELAB with signed a/b bytes.
    Lab,
    /// `"HSV"`.
    Hsv,
    /// `"LA"`: luminance plus alpha, expanded to RGBA.
    LumaAlpha,
    /// `"RGBa"`: RGBA with premultiplied alpha.
    RgbaPremultiplied,
    /// `"La"`: luminance with premultiplied alpha.
    LumaAlphaPremultiplied,
}

/// Supported models: encoded without touching pixel data.
const SUPPORTED: [(ColorModel, &str, u8); 5] = [
    (ColorModel::Gray, "L", 1),
    (ColorModel::GrayAlpha, "PA", 2),
    (ColorModel::Rgb, "RGB", 3),
    (ColorModel::Rgba, "RGBA", 4),
    (ColorModel::Rgbx, "RGBX", 4),
];

/// Recognized but unsupported models and the supported model each becomes.
pub const CONVERSIONS: [(ColorModel, ColorModel); 9] = [
    (ColorModel::Bilevel, ColorModel::Gray),
    (ColorModel::Palette, ColorModel::Rgba),
    (ColorModel::Cmyk, ColorModel::Rgb),
    (ColorModel::YCbCr, ColorModel::Rgb),
    (ColorModel::Lab, ColorModel::Rgb),
    (ColorModel::Hsv, ColorModel::Rgb),
    (ColorModel::LumaAlpha, ColorModel::Rgba),
    (ColorModel::RgbaPremultiplied, ColorModel::Rgba),
    (ColorModel::LumaAlphaPremultiplied, ColorModel::GrayAlpha),
];

const CONVERTIBLE_TAGS: [(ColorModel, &str); 9] = [
    (ColorModel::Bilevel, "1"),
    (ColorModel::Palette, "P"),
    (ColorModel::Cmyk, "CMYK"),
    (ColorModel::YCbCr, "YCbCr"),
    (ColorModel::Lab, "LAB"),
    (ColorModel::Hsv, "HSV"),
    (ColorModel::LumaAlpha, "LA"),
    (ColorModel::RgbaPremultiplied, "RGBa"),
    (ColorModel::LumaAlphaPremultiplied, "La"),
];

impl ColorModel {
    /// Look up a model by its tag. Tags are case-sensitive (`"RGBa"` is not `"RGBA"`).
    pub fn from_tag(tag: &str) -> Result<Self, EncodeError> {
        SUPPORTED
            .iter()
            .map(|&(model, t, _)| (model, t))
            .chain(CONVERTIBLE_TAGS.iter().copied())
            .find(|&(_, t)| t == tag)
            .map(|(model, _)| model)
            .ok_or_else(|| EncodeError::UnsupportedModel(tag.into()))
    }

    /// Canonical tag string.
    pub fn tag(&self) -> &'static str {
        SUPPORTED
            .iter()
            .map(|&(model, t, _)| (model, t))
            .chain(CONVERTIBLE_TAGS.iter().copied())
            .find(|&(model, _)| model == *self)
            .map(|(_, t)| t)
            .unwrap_or("?")
    }

    /// Whether the model is encoded without conversion.
    pub fn is_supported(&self) -> bool {
        SUPPORTED.iter().any(|&(model, _, _)| model == *self)
    }

    /// The supported model this one converts into, or `None` if already supported.
    pub fn conversion_target(&self) -> Option<ColorModel> {
        CONVERSIONS
            .iter()
            .find(|&&(from, _)| from == *self)
            .map(|&(_, to)| to)
    }

    /// The supported model pixels end up in after at most one conversion.
    pub fn resolve(&self) -> ColorModel {
        self.conversion_target().unwrap_or(*self)
    }

    /// Number of channels. Only defined for supported models.
    pub fn channels(&self) -> Result<u8, EncodeError> {
        SUPPORTED
            .iter()
            .find(|&&(model, _, _)| model == *self)
            .map(|&(_, _, channels)| channels)
            .ok_or_else(|| EncodeError::UnsupportedModel(self.tag().into()))
    }

    /// Bits per channel a bitmap in this model carries.
    pub fn default_bit_depth(&self) -> u8 {
        8
    }
}

impl FromStr for ColorModel {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

impl fmt::Display for ColorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_conversion_lands_on_a_supported_model() {
        for (from, to) in CONVERSIONS {
            assert!(!from.is_supported(), "{from} is both supported and converted");
            assert!(to.is_supported(), "{from} converts to unsupported {to}");
            assert!(to.conversion_target().is_none());
            assert!(from.resolve().channels().is_ok());
        }
    }

    #[test]
    fn every_convertible_model_has_one_entry() {
        for (model, _) in CONVERTIBLE_TAGS {
            let hits = CONVERSIONS.iter().filter(|(from, _)| *from == model).count();
            assert_eq!(hits, 1, "{model} has {hits} conversion entries");
        }
    }

    #[test]
    fn tags_roundtrip() {
        for (model, tag, _) in SUPPORTED {
            assert_eq!(ColorModel::from_tag(tag).unwrap(), model);
            assert_eq!(model.tag(), tag);
        }
        for (model, tag) in CONVERTIBLE_TAGS {
            assert_eq!(tag.parse::<ColorModel>().unwrap(), model);
        }
    }

    #[test]
    fn channel_counts() {
        assert_eq!(ColorModel::Gray.channels().unwrap(), 1);
        assert_eq!(ColorModel::GrayAlpha.channels().unwrap(), 2);
        assert_eq!(ColorModel::Rgb.channels().unwrap(), 3);
        assert_eq!(ColorModel::Rgba.channels().unwrap(), 4);
        assert_eq!(ColorModel::Rgbx.channels().unwrap(), 4);
    }

    #[test]
    fn unconverted_model_has_no_channel_count() {
        assert!(matches!(
            ColorModel::Cmyk.channels(),
            Err(EncodeError::UnsupportedModel(tag)) if tag == "CMYK"
        ));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        match ColorModel::from_tag("BGR;") {
            Err(EncodeError::UnsupportedModel(tag)) => assert_eq!(tag, "BGR;"),
            other => panic!("expected UnsupportedModel, got {other:?}"),
        }
        assert!(ColorModel::from_tag("rgb").is_err());
    }
}
