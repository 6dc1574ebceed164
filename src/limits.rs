use crate::error::EncodeError;

/// Resource limits applied to every resolved image before dispatch.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for any buffer the adapters allocate (conversions, swizzles).
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check dimensions against limits. Returns Ok(()) or LimitExceeded error.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), EncodeError> {
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(EncodeError::LimitExceeded(format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(EncodeError::LimitExceeded(format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(EncodeError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    /// Check that an allocation size is within memory limits.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), EncodeError> {
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes as u64 > max_mem {
                return Err(EncodeError::LimitExceeded(format!(
                    "allocation {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unlimited() {
        let limits = Limits::default();
        assert!(limits.check(u32::MAX, u32::MAX).is_ok());
        assert!(limits.check_memory(usize::MAX).is_ok());
    }

    #[test]
    fn pixel_limit_rejects() {
        let limits = Limits {
            max_pixels: Some(100),
            ..Default::default()
        };
        assert!(limits.check(10, 10).is_ok());
        match limits.check(11, 10) {
            Err(EncodeError::LimitExceeded(msg)) => assert!(msg.contains("110")),
            other => panic!("expected LimitExceeded, got {other:?}"),
        }
    }

    #[test]
    fn memory_limit_rejects() {
        let limits = Limits {
            max_memory_bytes: Some(64),
            ..Default::default()
        };
        assert!(limits.check_memory(64).is_ok());
        assert!(limits.check_memory(65).is_err());
    }
}
