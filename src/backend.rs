//! The encoding backend boundary.
//!
//! A backend receives a fully normalized [`ImageDescriptor`]: channel order,
//! byte order and stride are already resolved. It must not assume rows are
//! tightly packed.

use std::io::Write as _;

use crate::layout::ImageDescriptor;

/// Error type backends report. Forwarded to callers as
/// [`EncodeError::EncodingFailed`](crate::EncodeError::EncodingFailed).
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Compression effort, from fastest (1) to smallest output (5).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Effort(u8);

impl Effort {
    pub const MIN: Effort = Effort(1);
    pub const MAX: Effort = Effort(5);
    /// Used whenever the caller does not choose an effort.
    pub const DEFAULT: Effort = Effort(4);

    /// Clamp `level` into `MIN..=MAX`.
    pub fn new(level: u8) -> Self {
        Effort(level.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for Effort {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Turns a canonical image into container bytes.
///
/// Called exactly once per encode. Implementations only read the descriptor.
pub trait EncodeBackend: Send + Sync {
    fn encode(&self, image: &ImageDescriptor<'_>, effort: Effort) -> Result<Vec<u8>, BackendError>;
}

/// PNG backend built on the `png` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngBackend;

impl PngBackend {
    fn color_type(channels: u8) -> Result<png::ColorType, BackendError> {
        Ok(match channels {
            1 => png::ColorType::Grayscale,
            2 => png::ColorType::GrayscaleAlpha,
            3 => png::ColorType::Rgb,
            4 => png::ColorType::Rgba,
            other => return Err(format!("PNG has no color type with {other} channels").into()),
        })
    }

    fn bit_depth(bits: u8) -> Result<png::BitDepth, BackendError> {
        Ok(match bits {
            8 => png::BitDepth::Eight,
            16 => png::BitDepth::Sixteen,
            other => return Err(format!("PNG backend does not write {other}-bit samples").into()),
        })
    }

    fn tuning(effort: Effort) -> (png::Compression, png::FilterType, png::AdaptiveFilterType) {
        use png::AdaptiveFilterType::{Adaptive, NonAdaptive};
        match effort.level() {
            1 => (png::Compression::Fast, png::FilterType::NoFilter, NonAdaptive),
            2 => (png::Compression::Fast, png::FilterType::Sub, Adaptive),
            3 => (png::Compression::Default, png::FilterType::Paeth, NonAdaptive),
            4 => (png::Compression::Default, png::FilterType::Sub, Adaptive),
            _ => (png::Compression::Best, png::FilterType::Sub, Adaptive),
        }
    }
}

impl EncodeBackend for PngBackend {
    fn encode(&self, image: &ImageDescriptor<'_>, effort: Effort) -> Result<Vec<u8>, BackendError> {
        let color = Self::color_type(image.channels())?;
        let depth = Self::bit_depth(image.bits_per_channel())?;
        let (compression, filter, adaptive) = Self::tuning(effort);

        // Upper bound on stored-block output plus chunk overhead.
        let raw = (image.row_bytes() + 1).saturating_mul(image.height() as usize);
        let mut out = Vec::with_capacity(raw / 2 + 1024);
        {
            let mut encoder = png::Encoder::new(&mut out, image.width(), image.height());
            encoder.set_color(color);
            encoder.set_depth(depth);
            encoder.set_compression(compression);
            encoder.set_filter(filter);
            encoder.set_adaptive_filter(adaptive);

            let mut writer = encoder.write_header()?;
            {
                let mut stream = writer.stream_writer()?;
                for row in image.rows() {
                    stream.write_all(row)?;
                }
                stream.finish()?;
            }
            writer.finish()?;
        }
        Ok(out)
    }
}
