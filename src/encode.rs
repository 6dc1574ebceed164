use std::fmt;
use std::sync::Arc;

use crate::backend::{EncodeBackend, Effort, PngBackend};
use crate::error::EncodeError;
use crate::layout::{ImageDescriptor, LayoutOverrides};
use crate::limits::Limits;
use crate::source::{
    ArrayView, Bitmap, ImageSource, Mat, PaletteExpansion, RawView, SourceOptions,
};

/// Encoding request builder. Every entry point funnels into one backend call.
///
/// ```no_run
/// use zenpnge::{EncodeRequest, Effort, LayoutOverrides, RawView};
///
/// let gray = vec![0u8; 10 * 5];
/// let png = EncodeRequest::new()
///     .with_effort(Effort::new(2))
///     .encode_view(&RawView::new(&gray).with_shape(10, 5, 1).with_item_size(1),
///                  &LayoutOverrides::new())?;
/// # Ok::<(), zenpnge::EncodeError>(())
/// ```
#[derive(Clone)]
pub struct EncodeRequest {
    effort: Effort,
    options: SourceOptions,
    backend: Arc<dyn EncodeBackend>,
}

impl Default for EncodeRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EncodeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodeRequest")
            .field("effort", &self.effort)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl EncodeRequest {
    /// PNG output at [`Effort::DEFAULT`], no limits, palette alpha kept.
    pub fn new() -> Self {
        Self {
            effort: Effort::DEFAULT,
            options: SourceOptions::default(),
            backend: Arc::new(PngBackend),
        }
    }

    pub fn with_effort(mut self, effort: Effort) -> Self {
        self.effort = effort;
        self
    }

    pub fn with_palette_expansion(mut self, policy: PaletteExpansion) -> Self {
        self.options.palette_expansion = policy;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.options.limits = limits;
        self
    }

    /// Replace the PNG backend.
    pub fn with_backend(mut self, backend: impl EncodeBackend + 'static) -> Self {
        self.backend = Arc::new(backend);
        self
    }

    pub fn effort(&self) -> Effort {
        self.effort
    }

    /// Normalize any source and encode it.
    pub fn encode<S: ImageSource + ?Sized>(
        &self,
        source: &S,
        overrides: &LayoutOverrides,
    ) -> Result<Vec<u8>, EncodeError> {
        let image = source.descriptor(overrides, &self.options)?;
        self.encode_descriptor(&image)
    }

    pub fn encode_bitmap(
        &self,
        bitmap: &Bitmap<'_>,
        overrides: &LayoutOverrides,
    ) -> Result<Vec<u8>, EncodeError> {
        self.encode(bitmap, overrides)
    }

    pub fn encode_array(
        &self,
        array: &ArrayView<'_>,
        overrides: &LayoutOverrides,
    ) -> Result<Vec<u8>, EncodeError> {
        self.encode(array, overrides)
    }

    pub fn encode_mat(
        &self,
        mat: &Mat<'_>,
        overrides: &LayoutOverrides,
    ) -> Result<Vec<u8>, EncodeError> {
        self.encode(mat, overrides)
    }

    pub fn encode_view(
        &self,
        view: &RawView<'_>,
        overrides: &LayoutOverrides,
    ) -> Result<Vec<u8>, EncodeError> {
        self.encode(view, overrides)
    }

    /// Encode canonical bytes with an explicit layout. `stride == 0` means tightly packed.
    pub fn encode_bytes(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: u32,
        bits_per_channel: u32,
        stride: usize,
    ) -> Result<Vec<u8>, EncodeError> {
        let overrides = LayoutOverrides {
            width: Some(width),
            height: Some(height),
            channels: Some(channels),
            bits_per_channel: Some(bits_per_channel),
            stride: Some(stride),
        };
        self.encode(&RawView::new(pixels), &overrides)
    }

    /// Encode typed pixels from an [`imgref::ImgRef`].
    #[cfg(feature = "imgref")]
    pub fn encode_imgref<P: crate::source::EncodePixel>(
        &self,
        img: imgref::ImgRef<'_, P>,
    ) -> Result<Vec<u8>, EncodeError> {
        self.encode(&crate::source::ImgSource(img), &LayoutOverrides::new())
    }

    /// Dispatch an already-resolved image to the backend, exactly once.
    pub fn encode_descriptor(&self, image: &ImageDescriptor<'_>) -> Result<Vec<u8>, EncodeError> {
        self.options.limits.check(image.width(), image.height())?;
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            channels = image.channels(),
            bits = image.bits_per_channel(),
            stride = image.stride(),
            effort = self.effort.level(),
            "dispatching to encoder backend"
        );
        let out = self
            .backend
            .encode(image, self.effort)
            .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
        tracing::debug!(bytes = out.len(), "encoded");
        Ok(out)
    }
}
