//! Layout resolution and the canonical image descriptor.
//!
//! Each field is resolved independently: an explicit nonzero override wins,
//! otherwise the source's own shape metadata is used. Stride falls back to a
//! tightly packed row when neither is available.

use std::borrow::Cow;

use crate::error::EncodeError;

/// Bit depths the backend accepts.
pub const SUPPORTED_BIT_DEPTHS: [u32; 2] = [8, 16];

/// Caller-supplied layout fields. `None` and `Some(0)` both mean "infer".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub channels: Option<u32>,
    pub bits_per_channel: Option<u32>,
    /// Row length in bytes.
    pub stride: Option<usize>,
}

impl LayoutOverrides {
    /// No overrides; everything is inferred from the source.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_channels(mut self, channels: u32) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn with_bits_per_channel(mut self, bits: u32) -> Self {
        self.bits_per_channel = Some(bits);
        self
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = Some(stride);
        self
    }

    pub(crate) fn explicit_bits(&self) -> Option<u32> {
        self.bits_per_channel.filter(|&b| b != 0)
    }
}

/// Shape metadata reported by the source itself, in (width, height, channels)
/// order. Zero means the source does not know.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceShape {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    /// Bytes per sample.
    pub element_size: usize,
    /// Bytes between the starts of consecutive rows, if the source tracks it.
    pub row_stride: Option<usize>,
}

/// A fully resolved image, ready for the encoding backend.
///
/// Only constructed through [`ImageDescriptor::new`] or [`resolve`], so the
/// stride and buffer length always agree with the dimensions.
#[derive(Clone, Debug)]
pub struct ImageDescriptor<'a> {
    pixels: Cow<'a, [u8]>,
    width: u32,
    height: u32,
    channels: u8,
    bits_per_channel: u8,
    stride: usize,
}

impl<'a> ImageDescriptor<'a> {
    /// Validate a complete layout. Every field must be explicit and nonzero.
    pub fn new(
        pixels: impl Into<Cow<'a, [u8]>>,
        width: u32,
        height: u32,
        channels: u32,
        bits_per_channel: u32,
        stride: usize,
    ) -> Result<Self, EncodeError> {
        let pixels = pixels.into();
        if width == 0 {
            return Err(EncodeError::layout("width", "must be at least 1"));
        }
        if height == 0 {
            return Err(EncodeError::layout("height", "must be at least 1"));
        }
        if !(1..=4).contains(&channels) {
            return Err(EncodeError::layout(
                "channels",
                format!("{channels} not in 1..=4"),
            ));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&bits_per_channel) {
            return Err(EncodeError::UnsupportedBitDepth(bits_per_channel));
        }

        let row_bytes = tight_row_bytes(width, height, channels, bits_per_channel)?;
        if stride < row_bytes {
            return Err(EncodeError::layout(
                "stride",
                format!("{stride} is less than the {row_bytes} bytes in a row"),
            ));
        }
        let needed = stride
            .checked_mul(height as usize)
            .ok_or(EncodeError::DimensionsTooLarge { width, height })?;
        if pixels.len() < needed {
            return Err(EncodeError::BufferTooSmall {
                needed,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            pixels,
            width,
            height,
            channels: channels as u8,
            bits_per_channel: bits_per_channel as u8,
            stride,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn bits_per_channel(&self) -> u8 {
        self.bits_per_channel
    }

    pub fn bytes_per_sample(&self) -> usize {
        self.bits_per_channel.div_ceil(8) as usize
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes of pixel data in one row, excluding padding.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.channels as usize * self.bytes_per_sample()
    }

    /// The whole buffer, padding included.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Rows of pixel data with stride padding stripped.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let row_bytes = self.row_bytes();
        self.pixels
            .chunks(self.stride)
            .take(self.height as usize)
            .map(move |row| &row[..row_bytes])
    }

    /// Whether the pixel data is borrowed from the caller (no fix-up copy was needed).
    pub fn is_borrowed(&self) -> bool {
        matches!(self.pixels, Cow::Borrowed(_))
    }

    /// Take ownership of the pixel data (copies if borrowed).
    pub fn into_owned(self) -> ImageDescriptor<'static> {
        ImageDescriptor {
            pixels: Cow::Owned(self.pixels.into_owned()),
            width: self.width,
            height: self.height,
            channels: self.channels,
            bits_per_channel: self.bits_per_channel,
            stride: self.stride,
        }
    }
}

/// Resolve every layout field from `overrides` and `shape`, then validate.
pub fn resolve<'a>(
    pixels: impl Into<Cow<'a, [u8]>>,
    overrides: &LayoutOverrides,
    shape: &SourceShape,
) -> Result<ImageDescriptor<'a>, EncodeError> {
    let width = pick_dimension("width", overrides.width, shape.width)?;
    let height = pick_dimension("height", overrides.height, shape.height)?;
    let channels = pick_dimension("channels", overrides.channels, shape.channels)?;
    let bits = match overrides.explicit_bits() {
        Some(bits) => bits,
        None if shape.element_size > 0 => {
            let bits = shape.element_size.saturating_mul(8);
            u32::try_from(bits).map_err(|_| EncodeError::UnsupportedBitDepth(u32::MAX))?
        }
        None => {
            return Err(EncodeError::layout(
                "bits_per_channel",
                "not given and the source reports no element size",
            ));
        }
    };

    let stride = match overrides.stride.filter(|&s| s != 0) {
        Some(stride) => stride,
        None => match shape.row_stride.filter(|&s| s != 0) {
            Some(stride) => stride,
            None => tight_row_bytes(width, height, channels, bits)?,
        },
    };

    tracing::trace!(width, height, channels, bits, stride, "resolved layout");
    ImageDescriptor::new(pixels, width, height, channels, bits, stride)
}

fn pick_dimension(
    field: &'static str,
    explicit: Option<u32>,
    inferred: usize,
) -> Result<u32, EncodeError> {
    if let Some(value) = explicit.filter(|&v| v != 0) {
        return Ok(value);
    }
    if inferred == 0 {
        return Err(EncodeError::layout(
            field,
            "not given and the source shape does not provide it",
        ));
    }
    u32::try_from(inferred)
        .map_err(|_| EncodeError::layout(field, format!("{inferred} does not fit in u32")))
}

/// `width × channels × ceil(bits / 8)`, the row length without padding.
pub(crate) fn tight_row_bytes(
    width: u32,
    height: u32,
    channels: u32,
    bits_per_channel: u32,
) -> Result<usize, EncodeError> {
    (width as usize)
        .checked_mul(channels as usize)
        .and_then(|wc| wc.checked_mul(bits_per_channel.div_ceil(8) as usize))
        .ok_or(EncodeError::DimensionsTooLarge { width, height })
}
