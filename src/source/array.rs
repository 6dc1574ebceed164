//! Numeric-array adapter: 3-axis (row, column, channel) arrays.

use std::borrow::Cow;

use super::{ImageSource, SourceOptions};
use crate::byte_order::{self, ByteOrder};
use crate::error::EncodeError;
use crate::layout::{self, ImageDescriptor, LayoutOverrides, SourceShape};

/// A borrowed n-dimensional array of unsigned samples.
///
/// `shape` is `[rows, columns, channels]`. `strides`, in bytes, default to
/// C-contiguous order. Multi-byte samples must be big-endian; arrays default
/// to [`ByteOrder::NATIVE`] so little-endian data is rejected unless the
/// caller converts it and says so.
#[derive(Clone, Copy, Debug)]
pub struct ArrayView<'a> {
    pub data: &'a [u8],
    pub shape: &'a [usize],
    pub strides: Option<&'a [isize]>,
    /// Bytes per sample.
    pub element_size: usize,
    pub byte_order: ByteOrder,
}

impl<'a> ArrayView<'a> {
    pub fn new(data: &'a [u8], shape: &'a [usize], element_size: usize) -> Self {
        Self {
            data,
            shape,
            strides: None,
            element_size,
            byte_order: ByteOrder::NATIVE,
        }
    }

    pub fn with_strides(mut self, strides: &'a [isize]) -> Self {
        self.strides = Some(strides);
        self
    }

    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }
}

impl ImageSource for ArrayView<'_> {
    fn descriptor(
        &self,
        overrides: &LayoutOverrides,
        _options: &SourceOptions,
    ) -> Result<ImageDescriptor<'_>, EncodeError> {
        resolve_array(
            Cow::Borrowed(self.data),
            self.shape,
            self.strides,
            self.element_size,
            self.byte_order,
            overrides,
        )
    }
}

/// Shared by [`ArrayView`] and the matrix adapter, which hands over a
/// rewritten copy.
pub(super) fn resolve_array<'a>(
    data: Cow<'a, [u8]>,
    shape: &[usize],
    strides: Option<&[isize]>,
    element_size: usize,
    order: ByteOrder,
    overrides: &LayoutOverrides,
) -> Result<ImageDescriptor<'a>, EncodeError> {
    let &[rows, cols, channels] = shape else {
        return Err(EncodeError::layout(
            "rank",
            format!(
                "expected 3 axes (rows x columns x channels), got {}",
                shape.len()
            ),
        ));
    };
    if element_size == 0 {
        return Err(EncodeError::layout("element_size", "must be at least 1"));
    }
    byte_order::ensure_canonical(&data, element_size, order)?;

    let row_stride = match strides {
        None => None,
        Some(strides) => Some(row_stride(strides, cols, channels, element_size)?),
    };

    let shape = SourceShape {
        width: cols,
        height: rows,
        channels,
        element_size,
        row_stride,
    };
    layout::resolve(data, overrides, &shape)
}

/// Row stride from byte strides. Pixels within a row must be contiguous;
/// axes of length 1 may report any stride.
fn row_stride(
    strides: &[isize],
    cols: usize,
    channels: usize,
    element_size: usize,
) -> Result<usize, EncodeError> {
    let &[row, col, chan] = strides else {
        return Err(EncodeError::layout(
            "strides",
            format!("expected 3 strides, got {}", strides.len()),
        ));
    };
    let chan_ok = channels <= 1 || chan == element_size as isize;
    let col_ok = cols <= 1 || col == (channels * element_size) as isize;
    if !chan_ok || !col_ok {
        return Err(EncodeError::layout(
            "strides",
            format!("columns and channels must be contiguous, got strides {strides:?}"),
        ));
    }
    usize::try_from(row)
        .ok()
        .filter(|&r| r > 0)
        .ok_or_else(|| EncodeError::layout("strides", format!("row stride {row} must be positive")))
}
