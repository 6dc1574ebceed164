//! External-matrix adapter for BGR-ordered matrices.
//!
//! Matrices from computer-vision pipelines store color pixels as BGR(A) and
//! 16-bit samples in native byte order, while labelling them only as
//! "unsigned 16-bit". Both are fixed here in one scoped copy; the result is
//! handed to the array adapter with its byte order declared explicitly.

use std::borrow::Cow;

use super::array::resolve_array;
use super::{ImageSource, SourceOptions, alloc_checked, checked_len};
use crate::byte_order::ByteOrder;
use crate::error::EncodeError;
use crate::layout::{ImageDescriptor, LayoutOverrides};

/// Sample type of a [`Mat`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatDepth {
    U8,
    /// Native-endian `u16`.
    U16,
}

impl MatDepth {
    pub fn size(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
        }
    }
}

/// A borrowed matrix with interleaved BGR/BGRA channels.
///
/// Three channels are read as BGR and four as BGRA; the alpha channel is kept
/// and the result is RGB or RGBA. One- and two-channel matrices are not
/// reordered. Every row, the last included, must span `step` bytes.
#[derive(Clone, Copy, Debug)]
pub struct Mat<'a> {
    pub rows: usize,
    pub cols: usize,
    pub channels: usize,
    pub depth: MatDepth,
    /// Bytes per row. Zero means tightly packed.
    pub step: usize,
    pub data: &'a [u8],
}

impl<'a> Mat<'a> {
    pub fn new(rows: usize, cols: usize, channels: usize, depth: MatDepth, data: &'a [u8]) -> Self {
        Self {
            rows,
            cols,
            channels,
            depth,
            step: 0,
            data,
        }
    }

    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    fn needs_rewrite(&self) -> bool {
        self.channels >= 3 || (self.depth == MatDepth::U16 && ByteOrder::NATIVE != ByteOrder::Big)
    }
}

impl ImageSource for Mat<'_> {
    fn descriptor(
        &self,
        overrides: &LayoutOverrides,
        options: &SourceOptions,
    ) -> Result<ImageDescriptor<'_>, EncodeError> {
        for (field, value) in [
            ("height", self.rows),
            ("width", self.cols),
            ("channels", self.channels),
        ] {
            if value == 0 {
                return Err(EncodeError::layout(field, "matrix axis is empty"));
            }
        }

        let sample = self.depth.size();
        let row_bytes = checked_len(self.cols, self.channels, sample)?;
        // A stride override describes the matrix rows, not the rewritten copy.
        let step = match overrides.stride.filter(|&s| s != 0) {
            Some(stride) => stride,
            None if self.step == 0 => row_bytes,
            None => self.step,
        };
        if step < row_bytes {
            return Err(EncodeError::layout(
                "stride",
                format!("matrix step {step} is less than the {row_bytes} bytes in a row"),
            ));
        }
        let needed = step
            .checked_mul(self.rows)
            .ok_or(EncodeError::DimensionsTooLarge {
                width: self.cols.min(u32::MAX as usize) as u32,
                height: self.rows.min(u32::MAX as usize) as u32,
            })?;
        if self.data.len() < needed {
            return Err(EncodeError::BufferTooSmall {
                needed,
                actual: self.data.len(),
            });
        }
        let overrides = LayoutOverrides {
            stride: None,
            ..*overrides
        };

        let shape = [self.rows, self.cols, self.channels];
        if !self.needs_rewrite() {
            let strides = [step as isize, (self.channels * sample) as isize, sample as isize];
            return resolve_array(
                Cow::Borrowed(self.data),
                &shape,
                Some(&strides[..]),
                sample,
                ByteOrder::Big,
                &overrides,
            );
        }

        tracing::debug!(
            rows = self.rows,
            cols = self.cols,
            channels = self.channels,
            depth = ?self.depth,
            "normalizing matrix channel order and byte order"
        );
        let mut out = alloc_checked(&options.limits, checked_len(self.rows, row_bytes, 1)?)?;
        let swap_channels = self.channels >= 3;
        for row in self.data.chunks(step).take(self.rows) {
            for pixel in row[..row_bytes].chunks_exact(self.channels * sample) {
                let start = out.len();
                match self.depth {
                    MatDepth::U8 => out.extend_from_slice(pixel),
                    MatDepth::U16 => {
                        for s in pixel.chunks_exact(2) {
                            let v = u16::from_ne_bytes([s[0], s[1]]);
                            out.extend_from_slice(&v.to_be_bytes());
                        }
                    }
                }
                if swap_channels {
                    let px = &mut out[start..];
                    for i in 0..sample {
                        px.swap(i, 2 * sample + i);
                    }
                }
            }
        }

        resolve_array(
            Cow::Owned(out),
            &shape,
            None,
            sample,
            ByteOrder::Big,
            &overrides,
        )
    }
}
