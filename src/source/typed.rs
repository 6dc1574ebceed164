//! Typed `rgb` pixels, and (feature `imgref`) an adapter for `ImgRef` buffers of them.
//!
//! Typed samples are native numbers, so 16-bit components are written
//! big-endian and BGR(A) pixels are reordered while copying. The copy is
//! always tightly packed regardless of the source stride.

#[cfg(feature = "imgref")]
use std::borrow::Cow;

#[cfg(feature = "imgref")]
use imgref::ImgRef;
use rgb::alt::{BGR, BGRA, Gray, GrayAlpha};
use rgb::{RGB, RGBA};

#[cfg(feature = "imgref")]
use super::{ImageSource, SourceOptions, alloc_checked, checked_len};
#[cfg(feature = "imgref")]
use crate::error::EncodeError;
#[cfg(feature = "imgref")]
use crate::layout::{self, ImageDescriptor, LayoutOverrides, SourceShape};

/// A pixel component the PNG backend can store.
pub trait Sample: Copy {
    const BYTES: usize;
    fn write_be(self, out: &mut Vec<u8>);
}

impl Sample for u8 {
    const BYTES: usize = 1;
    fn write_be(self, out: &mut Vec<u8>) {
        out.push(self);
    }
}

impl Sample for u16 {
    const BYTES: usize = 2;
    fn write_be(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }
}

/// A pixel type with a fixed channel layout.
pub trait EncodePixel: Copy {
    const CHANNELS: usize;
    const SAMPLE_BYTES: usize;
    /// Append this pixel in gray/RGB channel order with big-endian samples.
    fn write_canonical(&self, out: &mut Vec<u8>);
}

impl<T: Sample> EncodePixel for Gray<T> {
    const CHANNELS: usize = 1;
    const SAMPLE_BYTES: usize = T::BYTES;
    fn write_canonical(&self, out: &mut Vec<u8>) {
        self.value().write_be(out);
    }
}

impl<T: Sample> EncodePixel for GrayAlpha<T> {
    const CHANNELS: usize = 2;
    const SAMPLE_BYTES: usize = T::BYTES;
    fn write_canonical(&self, out: &mut Vec<u8>) {
        self.v.write_be(out);
        self.a.write_be(out);
    }
}

impl<T: Sample> EncodePixel for RGB<T> {
    const CHANNELS: usize = 3;
    const SAMPLE_BYTES: usize = T::BYTES;
    fn write_canonical(&self, out: &mut Vec<u8>) {
        for c in [self.r, self.g, self.b] {
            c.write_be(out);
        }
    }
}

impl<T: Sample> EncodePixel for RGBA<T> {
    const CHANNELS: usize = 4;
    const SAMPLE_BYTES: usize = T::BYTES;
    fn write_canonical(&self, out: &mut Vec<u8>) {
        for c in [self.r, self.g, self.b, self.a] {
            c.write_be(out);
        }
    }
}

impl<T: Sample> EncodePixel for BGR<T> {
    const CHANNELS: usize = 3;
    const SAMPLE_BYTES: usize = T::BYTES;
    fn write_canonical(&self, out: &mut Vec<u8>) {
        for c in [self.r, self.g, self.b] {
            c.write_be(out);
        }
    }
}

impl<T: Sample> EncodePixel for BGRA<T> {
    const CHANNELS: usize = 4;
    const SAMPLE_BYTES: usize = T::BYTES;
    fn write_canonical(&self, out: &mut Vec<u8>) {
        for c in [self.r, self.g, self.b, self.a] {
            c.write_be(out);
        }
    }
}

/// Wraps an [`ImgRef`] so it can be passed to [`crate::EncodeRequest::encode`].
#[cfg(feature = "imgref")]
#[derive(Clone, Copy, Debug)]
pub struct ImgSource<'a, P>(pub ImgRef<'a, P>);

#[cfg(feature = "imgref")]
impl<P: EncodePixel> ImageSource for ImgSource<'_, P> {
    fn descriptor(
        &self,
        overrides: &LayoutOverrides,
        options: &SourceOptions,
    ) -> Result<ImageDescriptor<'_>, EncodeError> {
        let img = self.0;
        let row_bytes = checked_len(img.width(), P::CHANNELS, P::SAMPLE_BYTES)?;
        let mut out = alloc_checked(&options.limits, checked_len(img.height(), row_bytes, 1)?)?;
        for row in img.rows() {
            for px in row {
                px.write_canonical(&mut out);
            }
        }

        let shape = SourceShape {
            width: img.width(),
            height: img.height(),
            channels: P::CHANNELS,
            element_size: P::SAMPLE_BYTES,
            row_stride: None,
        };
        layout::resolve(Cow::Owned(out), overrides, &shape)
    }
}
