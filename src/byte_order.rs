//! Canonical byte order for multi-byte samples.
//!
//! PNG stores 16-bit samples big-endian. The check here never swaps: data in
//! any other order is rejected, and callers convert explicitly with
//! [`swap_u16_in_place`] or [`to_big_endian_u16`] first.

use crate::error::EncodeError;

/// Byte order of multi-byte samples as reported by their producer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    /// The byte order of the target this crate was compiled for.
    #[cfg(target_endian = "big")]
    pub const NATIVE: ByteOrder = ByteOrder::Big;
    /// The byte order of the target this crate was compiled for.
    #[cfg(target_endian = "little")]
    pub const NATIVE: ByteOrder = ByteOrder::Little;

    /// The order PNG requires.
    pub const CANONICAL: ByteOrder = ByteOrder::Big;
}

/// Verify that `pixels`, made of `sample_width`-byte samples in `order`, is
/// already in canonical order.
///
/// One-byte samples have no byte order and always pass, as does an empty
/// buffer. A buffer holding a single wide sample does not pass trivially: its
/// two bytes still have an order, so a `Little` declaration is rejected like
/// any other.
pub fn ensure_canonical(
    pixels: &[u8],
    sample_width: usize,
    order: ByteOrder,
) -> Result<(), EncodeError> {
    if sample_width <= 1 || pixels.is_empty() || order == ByteOrder::CANONICAL {
        return Ok(());
    }
    tracing::trace!(len = pixels.len(), sample_width, ?order, "rejecting non-canonical samples");
    Err(EncodeError::ByteOrderMismatch {
        order,
        sample_width,
    })
}

/// Swap every 16-bit sample in place (little-endian ↔ big-endian).
///
/// A trailing odd byte is left alone.
pub fn swap_u16_in_place(bytes: &mut [u8]) {
    for pair in bytes.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
}

/// Serialize native `u16` samples as big-endian bytes.
pub fn to_big_endian_u16(samples: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * 2);
    for s in samples {
        out.extend_from_slice(&s.to_be_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_byte_samples_ignore_order() {
        assert!(ensure_canonical(&[1, 2, 3], 1, ByteOrder::Little).is_ok());
        assert!(ensure_canonical(&[1, 2, 3], 1, ByteOrder::Big).is_ok());
    }

    #[test]
    fn wide_samples_require_big_endian() {
        assert!(ensure_canonical(&[0, 1, 0, 2], 2, ByteOrder::Big).is_ok());
        match ensure_canonical(&[0, 1, 0, 2], 2, ByteOrder::Little) {
            Err(EncodeError::ByteOrderMismatch {
                order,
                sample_width,
            }) => {
                assert_eq!(order, ByteOrder::Little);
                assert_eq!(sample_width, 2);
            }
            other => panic!("expected ByteOrderMismatch, got {other:?}"),
        }
    }

    #[test]
    fn empty_and_single_sample_buffers() {
        assert!(ensure_canonical(&[], 2, ByteOrder::Big).is_ok());
        assert!(ensure_canonical(&[], 2, ByteOrder::Little).is_ok());
        assert!(ensure_canonical(&[0xAB, 0xCD], 2, ByteOrder::Big).is_ok());
        assert!(ensure_canonical(&[0xAB, 0xCD], 2, ByteOrder::Little).is_err());
    }

    #[test]
    fn swap_helpers() {
        let mut bytes = vec![0x01, 0x02, 0x03, 0x04, 0x05];
        swap_u16_in_place(&mut bytes);
        assert_eq!(bytes, [0x02, 0x01, 0x04, 0x03, 0x05]);
        assert_eq!(to_big_endian_u16(&[0x0102, 0xFFFE]), [0x01, 0x02, 0xFF, 0xFE]);
    }

    #[test]
    fn error_message_suggests_conversion() {
        let err = ensure_canonical(&[0, 0], 2, ByteOrder::Little).unwrap_err();
        assert!(err.to_string().contains("convert"));
    }
}
