//! Image Normalizer: compressed bytes to the graph input tensor.

use crate::core::config::ModelInputConfig;
use crate::core::{ClassifyError, Tensor4D};
use crate::processors::{
    ImageFormatHint, NormalizeImage, ResizeFilter, decode_image, resize_to_input,
};

/// Turns compressed image bytes into a `[1, H, W, 3]` (or `[1, 3, H, W]`)
/// float tensor matching the graph input.
///
/// Stateless apart from its configuration; safe to share across threads.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    input_shape: (u32, u32),
    resize_filter: ResizeFilter,
    normalizer: NormalizeImage,
}

impl ImageNormalizer {
    /// Builds a normalizer for the given model input description.
    pub fn new(config: &ModelInputConfig) -> Result<Self, ClassifyError> {
        Ok(Self {
            input_shape: config.input_shape,
            resize_filter: config.resize_filter,
            normalizer: NormalizeImage::from_model_input(config)?,
        })
    }

    /// Normalizer for the inception graph.
    pub fn for_inception() -> Result<Self, ClassifyError> {
        Self::new(&ModelInputConfig::default())
    }

    /// Decodes, resizes and normalizes one image.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidImage`] when the payload is empty or
    /// not a valid image of the declared format.
    pub fn normalize(
        &self,
        bytes: &[u8],
        format: ImageFormatHint,
    ) -> Result<Tensor4D, ClassifyError> {
        let rgb = decode_image(bytes, format)?;
        let resized = resize_to_input(&rgb, self.input_shape, self.resize_filter)?;
        self.normalizer.apply(&resized)
    }

    /// Spatial input size as (height, width).
    pub fn input_shape(&self) -> (u32, u32) {
        self.input_shape
    }

    /// Range every produced value falls in.
    pub fn output_range(&self) -> (f32, f32) {
        self.normalizer.output_range()
    }
}
