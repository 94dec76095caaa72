//! Per-channel normalization of resized images.
//!
//! Values are mapped with `v * alpha[c] + beta[c]`, where
//! `alpha = scale / std` and `beta = -mean / std`, which is the same as
//! `(v * scale - mean) / std`.

use crate::core::config::ModelInputConfig;
use crate::core::{ClassifyError, ProcessingStage, Tensor3D, Tensor4D};
use crate::processors::types::ChannelOrder;
use ndarray::Axis;

/// Normalizes `[H, W, 3]` float images into a batch-of-one input tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeImage {
    /// Scaling factors for each channel (alpha = scale / std)
    pub alpha: Vec<f32>,
    /// Offset values for each channel (beta = -mean / std)
    pub beta: Vec<f32>,
    /// Channel layout of the produced tensor
    pub order: ChannelOrder,
}

impl NormalizeImage {
    /// Creates a normalizer from scale, per-channel mean and std.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * Scale is less than or equal to 0
    /// * Mean or std vectors don't have exactly 3 elements
    /// * Any standard deviation value is less than or equal to 0
    pub fn new(
        scale: f32,
        mean: &[f32],
        std: &[f32],
        order: ChannelOrder,
    ) -> Result<Self, ClassifyError> {
        if !(scale > 0.0) {
            return Err(ClassifyError::config_error(format!(
                "Scale must be greater than 0, got {scale}"
            )));
        }
        if mean.len() != 3 {
            return Err(ClassifyError::config_error(
                "Mean must have exactly 3 elements for RGB",
            ));
        }
        if std.len() != 3 {
            return Err(ClassifyError::config_error(
                "Std must have exactly 3 elements for RGB",
            ));
        }
        for (i, &s) in std.iter().enumerate() {
            if !(s > 0.0) {
                return Err(ClassifyError::config_error(format!(
                    "Standard deviation at index {i} must be greater than 0, got {s}"
                )));
            }
        }

        let alpha = std.iter().map(|s| scale / s).collect();
        let beta = mean.iter().zip(std).map(|(m, s)| -m / s).collect();
        let normalizer = Self { alpha, beta, order };
        normalizer.validate_config()?;
        Ok(normalizer)
    }

    /// Normalizer for the inception graph: `(v - 117) / 1`, HWC.
    pub fn for_inception() -> Result<Self, ClassifyError> {
        Self::from_model_input(&ModelInputConfig::default())
    }

    /// Creates a normalizer from a model input description.
    pub fn from_model_input(config: &ModelInputConfig) -> Result<Self, ClassifyError> {
        Self::new(
            config.normalize_scale,
            &config.normalize_mean,
            &config.normalize_std,
            config.channel_order,
        )
    }

    /// Checks that alpha and beta hold three finite values each.
    pub fn validate_config(&self) -> Result<(), ClassifyError> {
        if self.alpha.len() != 3 || self.beta.len() != 3 {
            return Err(ClassifyError::config_error(
                "Alpha and beta must have exactly 3 elements for RGB",
            ));
        }
        if let Some((i, a)) = self.alpha.iter().enumerate().find(|(_, a)| !a.is_finite()) {
            return Err(ClassifyError::config_error(format!(
                "Alpha value at index {i} is not finite: {a}"
            )));
        }
        if let Some((i, b)) = self.beta.iter().enumerate().find(|(_, b)| !b.is_finite()) {
            return Err(ClassifyError::config_error(format!(
                "Beta value at index {i} is not finite: {b}"
            )));
        }
        Ok(())
    }

    /// Smallest and largest value an input in `0.0..=255.0` can map to.
    pub fn output_range(&self) -> (f32, f32) {
        self.alpha
            .iter()
            .zip(&self.beta)
            .flat_map(|(a, b)| [*b, 255.0 * a + b])
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Normalizes an `[H, W, 3]` image into a `[1, H, W, 3]` or `[1, 3, H, W]`
    /// tensor in standard layout.
    pub fn apply(&self, img: &Tensor3D) -> Result<Tensor4D, ClassifyError> {
        if img.shape()[2] != 3 {
            return Err(ClassifyError::invalid_image(
                ProcessingStage::Normalization,
                format!("expected an [H, W, 3] image, got {:?}", img.shape()),
            ));
        }

        let mut scaled = img.to_owned();
        for (c, mut plane) in scaled.axis_iter_mut(Axis(2)).enumerate() {
            let (alpha, beta) = (self.alpha[c], self.beta[c]);
            plane.mapv_inplace(|v| v * alpha + beta);
        }

        let laid_out = match self.order {
            ChannelOrder::HWC => scaled,
            ChannelOrder::CHW => scaled
                .permuted_axes([2, 0, 1])
                .as_standard_layout()
                .into_owned(),
        };
        Ok(laid_out.insert_axis(Axis(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(h: usize, w: usize) -> Tensor3D {
        Tensor3D::from_shape_fn((h, w, 3), |(y, x, c)| ((y * w + x) * 3 + c) as f32)
    }

    #[test]
    fn test_inception_maps_to_mean_subtracted_range() {
        let norm = NormalizeImage::for_inception().unwrap();
        assert_eq!(norm.alpha, vec![1.0; 3]);
        assert_eq!(norm.beta, vec![-117.0; 3]);
        assert_eq!(norm.output_range(), (-117.0, 138.0));

        let img = Tensor3D::from_elem((2, 2, 3), 255.0);
        let out = norm.apply(&img).unwrap();
        assert_eq!(out.shape(), &[1, 2, 2, 3]);
        assert!(out.iter().all(|&v| v == 138.0));
    }

    #[test]
    fn test_per_channel_parameters() {
        let norm = NormalizeImage::new(
            1.0 / 255.0,
            &[0.5, 0.0, 0.25],
            &[0.5, 1.0, 0.25],
            ChannelOrder::HWC,
        )
        .unwrap();
        let img = Tensor3D::from_elem((1, 1, 3), 255.0);
        let out = norm.apply(&img).unwrap();
        assert!((out[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
        assert!((out[[0, 0, 0, 1]] - 1.0).abs() < 1e-6);
        assert!((out[[0, 0, 0, 2]] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_chw_layout_moves_channels_first() {
        let norm = NormalizeImage::new(1.0, &[0.0; 3], &[1.0; 3], ChannelOrder::CHW).unwrap();
        let img = gradient(2, 3);
        let out = norm.apply(&img).unwrap();
        assert_eq!(out.shape(), &[1, 3, 2, 3]);
        assert!(out.is_standard_layout());
        for y in 0..2 {
            for x in 0..3 {
                for c in 0..3 {
                    assert_eq!(out[[0, c, y, x]], img[[y, x, c]]);
                }
            }
        }
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(NormalizeImage::new(0.0, &[0.0; 3], &[1.0; 3], ChannelOrder::HWC).is_err());
        assert!(NormalizeImage::new(1.0, &[0.0; 2], &[1.0; 3], ChannelOrder::HWC).is_err());
        assert!(NormalizeImage::new(1.0, &[0.0; 3], &[1.0, 0.0, 1.0], ChannelOrder::HWC).is_err());
        assert!(NormalizeImage::new(1.0, &[f32::NAN; 3], &[1.0; 3], ChannelOrder::HWC).is_err());
    }

    #[test]
    fn test_wrong_channel_count_is_rejected() {
        let norm = NormalizeImage::for_inception().unwrap();
        let img = Tensor3D::zeros((2, 2, 4));
        assert!(matches!(
            norm.apply(&img),
            Err(ClassifyError::InvalidImage {
                stage: ProcessingStage::Normalization,
                ..
            })
        ));
    }
}
