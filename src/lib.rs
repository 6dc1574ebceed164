//! # zenpnge
//!
//! One PNG encoding entry point for pixels that come from anywhere.
//!
//! Producers disagree on channel order, byte order, row padding, bit depth and
//! color-model naming. This crate reconciles them into a single canonical
//! image (width, height, 1–4 channels, 8 or 16 bits, stride, buffer) and hands
//! that to a lossless encoding backend exactly once.
//!
//! ## Sources
//!
//! - [`Bitmap`]: decoded 8-bit bitmaps tagged with a color model (`"L"`,
//!   `"RGB"`, `"P"`, `"CMYK"`, ...). Unsupported models are converted first.
//! - [`ArrayView`]: 3-axis (rows × columns × channels) arrays with byte strides.
//! - [`Mat`]: BGR(A) matrices with native-endian 16-bit samples.
//! - [`RawView`]: a byte buffer plus whatever layout the caller knows.
//! - `ImgSource` (feature `imgref`): typed `rgb` pixels in an `ImgRef`.
//!
//! Layout fields not given explicitly are inferred from the source; see
//! [`LayoutOverrides`].
//!
//! ## Byte order
//!
//! 16-bit samples must already be big-endian. Anything else fails with
//! [`EncodeError::ByteOrderMismatch`]; nothing is swapped implicitly. Use the
//! helpers in [`byte_order`] to convert first.
//!
//! ## Non-Goals
//!
//! - Decoding
//! - Resizing or resampling
//! - Choosing compression parameters beyond an [`Effort`] level
//!
//! ## Usage
//!
//! ```no_run
//! use zenpnge::{ArrayView, ByteOrder, EncodeRequest, LayoutOverrides, Mat, MatDepth};
//!
//! // 2x2 RGB, 16-bit, already big-endian
//! let samples = vec![0u8; 2 * 2 * 3 * 2];
//! let shape = [2, 2, 3];
//! let array = ArrayView::new(&samples, &shape, 2).with_byte_order(ByteOrder::Big);
//! let png = zenpnge::encode_array(&array)?;
//!
//! // BGR matrix: channel order is fixed on the way in
//! let bgr = [255u8, 0, 0];
//! let png = EncodeRequest::new()
//!     .encode_mat(&Mat::new(1, 1, 3, MatDepth::U8, &bgr), &LayoutOverrides::new())?;
//! # Ok::<(), zenpnge::EncodeError>(())
//! ```

#![forbid(unsafe_code)]

mod backend;
pub mod byte_order;
mod encode;
mod error;
mod layout;
mod limits;
mod model;
pub mod source;

// Re-exports
pub use backend::{BackendError, EncodeBackend, Effort, PngBackend};
pub use byte_order::ByteOrder;
pub use encode::EncodeRequest;
pub use error::EncodeError;
pub use layout::{ImageDescriptor, LayoutOverrides, SUPPORTED_BIT_DEPTHS, SourceShape, resolve};
pub use limits::Limits;
pub use model::{CONVERSIONS, ColorModel};
#[cfg(feature = "imgref")]
pub use source::ImgSource;
#[cfg(feature = "rgb")]
pub use source::{EncodePixel, Sample};
pub use source::{
    ArrayView, Bitmap, ImageSource, Mat, MatDepth, Palette, PaletteExpansion, RawView,
    SourceOptions,
};

/// Encode a decoded bitmap with default settings.
pub fn encode_bitmap(bitmap: &Bitmap<'_>) -> Result<Vec<u8>, EncodeError> {
    EncodeRequest::new().encode_bitmap(bitmap, &LayoutOverrides::new())
}

/// Encode a 3-axis array with default settings.
pub fn encode_array(array: &ArrayView<'_>) -> Result<Vec<u8>, EncodeError> {
    EncodeRequest::new().encode_array(array, &LayoutOverrides::new())
}

/// Encode a BGR(A) matrix with default settings.
pub fn encode_mat(mat: &Mat<'_>) -> Result<Vec<u8>, EncodeError> {
    EncodeRequest::new().encode_mat(mat, &LayoutOverrides::new())
}

/// Encode a raw view; unset fields in `overrides` are inferred from the view.
pub fn encode_view(view: &RawView<'_>, overrides: &LayoutOverrides) -> Result<Vec<u8>, EncodeError> {
    EncodeRequest::new().encode_view(view, overrides)
}

/// Encode canonical bytes with an explicit layout (`stride == 0`: tightly packed).
pub fn encode_bytes(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: u32,
    bits_per_channel: u32,
    stride: usize,
) -> Result<Vec<u8>, EncodeError> {
    EncodeRequest::new().encode_bytes(pixels, width, height, channels, bits_per_channel, stride)
}
