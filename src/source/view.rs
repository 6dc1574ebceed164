//! Raw-view adapter: a byte buffer plus whatever layout metadata the caller has.

use std::borrow::Cow;

use super::{ImageSource, SourceOptions};
use crate::byte_order::{self, ByteOrder};
use crate::error::EncodeError;
use crate::layout::{self, ImageDescriptor, LayoutOverrides, SourceShape};

/// A borrowed buffer with optional shape metadata.
///
/// `shape` is `[width, height, channels]`. Fields the view leaves unknown must
/// be supplied as [`LayoutOverrides`]. Bytes are taken to be in PNG order
/// (big-endian) unless [`RawView::with_byte_order`] says otherwise.
#[derive(Clone, Copy, Debug)]
pub struct RawView<'a> {
    pub data: &'a [u8],
    pub shape: Option<[usize; 3]>,
    /// Bytes per sample, 0 if unknown.
    pub item_size: usize,
    pub row_stride: Option<usize>,
    pub byte_order: ByteOrder,
}

impl<'a> RawView<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            shape: None,
            item_size: 0,
            row_stride: None,
            byte_order: ByteOrder::CANONICAL,
        }
    }

    pub fn with_shape(mut self, width: usize, height: usize, channels: usize) -> Self {
        self.shape = Some([width, height, channels]);
        self
    }

    pub fn with_item_size(mut self, item_size: usize) -> Self {
        self.item_size = item_size;
        self
    }

    pub fn with_row_stride(mut self, stride: usize) -> Self {
        self.row_stride = Some(stride);
        self
    }

    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }
}

impl ImageSource for RawView<'_> {
    fn descriptor(
        &self,
        overrides: &LayoutOverrides,
        _options: &SourceOptions,
    ) -> Result<ImageDescriptor<'_>, EncodeError> {
        let [width, height, channels] = self.shape.unwrap_or_default();
        let shape = SourceShape {
            width,
            height,
            channels,
            element_size: self.item_size,
            row_stride: self.row_stride,
        };
        let desc = layout::resolve(Cow::Borrowed(self.data), overrides, &shape)?;
        byte_order::ensure_canonical(desc.pixels(), desc.bytes_per_sample(), self.byte_order)?;
        Ok(desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inferred_equals_explicit() {
        let data: Vec<u8> = (0..24).collect();
        let options = SourceOptions::default();
        let view = RawView::new(&data)
            .with_shape(2, 3, 2)
            .with_item_size(2)
            .with_row_stride(8);
        let inferred = view.descriptor(&LayoutOverrides::new(), &options).unwrap();

        let bare = RawView::new(&data);
        let explicit = bare
            .descriptor(
                &LayoutOverrides::new()
                    .with_width(2)
                    .with_height(3)
                    .with_channels(2)
                    .with_bits_per_channel(16)
                    .with_stride(8),
                &options,
            )
            .unwrap();

        assert_eq!(inferred.width(), explicit.width());
        assert_eq!(inferred.height(), explicit.height());
        assert_eq!(inferred.channels(), explicit.channels());
        assert_eq!(inferred.bits_per_channel(), explicit.bits_per_channel());
        assert_eq!(inferred.stride(), explicit.stride());
        assert_eq!(inferred.pixels(), explicit.pixels());
    }

    #[test]
    fn bare_view_needs_overrides() {
        let data = [0u8; 4];
        let view = RawView::new(&data);
        assert!(matches!(
            view.descriptor(&LayoutOverrides::new(), &SourceOptions::default()),
            Err(EncodeError::InvalidLayout { field: "width", .. })
        ));
    }

    #[test]
    fn declared_little_endian_rejected() {
        let data = [0u8; 4];
        let view = RawView::new(&data)
            .with_shape(2, 1, 1)
            .with_item_size(2)
            .with_byte_order(ByteOrder::Little);
        assert!(matches!(
            view.descriptor(&LayoutOverrides::new(), &SourceOptions::default()),
            Err(EncodeError::ByteOrderMismatch { .. })
        ));
        // 8-bit samples have no byte order to get wrong
        let desc = view
            .descriptor(
                &LayoutOverrides::new().with_width(4).with_bits_per_channel(8),
                &SourceOptions::default(),
            )
            .unwrap();
        assert_eq!(desc.width(), 4);
    }
}
