//! Source adapters.
//!
//! Each producer type turns its native representation into an
//! [`ImageDescriptor`] independently; the caller selects one by entry point.
//! Pixel data stays borrowed unless a conversion or channel/byte-order fix-up
//! needs a rewritten copy.

mod array;
mod bitmap;
mod mat;
#[cfg(feature = "rgb")]
mod typed;
mod view;

pub use array::ArrayView;
pub use bitmap::{Bitmap, Palette, PaletteExpansion};
pub use mat::{Mat, MatDepth};
#[cfg(feature = "imgref")]
pub use typed::ImgSource;
#[cfg(feature = "rgb")]
pub use typed::{EncodePixel, Sample};
pub use view::RawView;

use crate::error::EncodeError;
use crate::layout::{ImageDescriptor, LayoutOverrides};
use crate::limits::Limits;

/// Settings adapters need while normalizing a source.
#[derive(Clone, Debug, Default)]
pub struct SourceOptions {
    /// How palette entries become RGBA when a `"P"` bitmap is expanded.
    pub palette_expansion: PaletteExpansion,
    /// Checked before any conversion buffer is allocated.
    pub limits: Limits,
}

/// Produce a canonical descriptor from a producer's native representation.
pub trait ImageSource {
    fn descriptor(
        &self,
        overrides: &LayoutOverrides,
        options: &SourceOptions,
    ) -> Result<ImageDescriptor<'_>, EncodeError>;
}

/// Reserve an output buffer after checking it against the memory limit.
pub(crate) fn alloc_checked(limits: &Limits, len: usize) -> Result<Vec<u8>, EncodeError> {
    limits.check_memory(len)?;
    Ok(Vec::with_capacity(len))
}

/// `width * height * bytes_per_pixel`, with overflow reported as `DimensionsTooLarge`.
pub(crate) fn checked_len(
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> Result<usize, EncodeError> {
    width
        .checked_mul(height)
        .and_then(|wh| wh.checked_mul(bytes_per_pixel))
        .ok_or(EncodeError::DimensionsTooLarge {
            width: width.min(u32::MAX as usize) as u32,
            height: height.min(u32::MAX as usize) as u32,
        })
}
