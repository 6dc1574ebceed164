use crate::byte_order::ByteOrder;

/// Errors from layout normalization and PNG dispatch.
///
/// Every variant describes a problem with the caller's data or configuration.
/// Nothing is retried and no partial output is ever returned.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("unsupported color model {0:?}")]
    UnsupportedModel(String),

    #[error(
        "{sample_width}-byte samples must be big-endian, got {order:?}; \
         convert them first (see `byte_order::swap_u16_in_place`)"
    )]
    ByteOrderMismatch {
        order: ByteOrder,
        sample_width: usize,
    },

    #[error("invalid layout: {field}: {reason}")]
    InvalidLayout { field: &'static str, reason: String },

    #[error("unsupported bit depth {0} (supported: 8, 16)")]
    UnsupportedBitDepth(u32),

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
}

impl EncodeError {
    pub(crate) fn layout(field: &'static str, reason: impl Into<String>) -> Self {
        EncodeError::InvalidLayout {
            field,
            reason: reason.into(),
        }
    }
}
