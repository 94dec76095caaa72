//! Model input configuration for preprocessing.
//!
//! The defaults describe the inception graph (`tensorflow_inception_graph`)
//! this service was built around:
//!
//! - input node `input`, output node `output`
//! - input tensor `[1, 224, 224, 3]`, `f32`, RGB
//! - bilinear resize, then `(value - 117.0) / 1.0`
//!
//! Other graphs must supply their own values here; nothing is inferred from
//! the model file.

use super::errors::{ConfigError, ConfigValidator};
use crate::processors::{ChannelOrder, ResizeFilter};
use serde::{Deserialize, Serialize};

/// Default input node name of the inception graph.
pub const DEFAULT_INPUT_NAME: &str = "input";
/// Default output node name of the inception graph.
pub const DEFAULT_OUTPUT_NAME: &str = "output";
/// Default spatial input size (height, width).
pub const DEFAULT_INPUT_SHAPE: (u32, u32) = (224, 224);
/// Mean subtracted from each channel by the inception graph preprocessing.
pub const INCEPTION_MEAN: f32 = 117.0;
/// Divisor applied after mean subtraction by the inception graph preprocessing.
pub const INCEPTION_STD: f32 = 1.0;

/// Input contract of the inference graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInputConfig {
    /// Name of the graph's input node.
    pub input_name: String,
    /// Name of the graph's output node.
    pub output_name: String,
    /// Spatial input size as (height, width).
    pub input_shape: (u32, u32),
    /// Channel layout of the input tensor.
    pub channel_order: ChannelOrder,
    /// Resampling algorithm.
    pub resize_filter: ResizeFilter,
    /// Scale applied to raw 0-255 values before mean/std.
    pub normalize_scale: f32,
    /// Per-channel mean, RGB order, in scaled units.
    pub normalize_mean: Vec<f32>,
    /// Per-channel standard deviation, RGB order, in scaled units.
    pub normalize_std: Vec<f32>,
}

impl Default for ModelInputConfig {
    fn default() -> Self {
        Self {
            input_name: DEFAULT_INPUT_NAME.to_string(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            input_shape: DEFAULT_INPUT_SHAPE,
            channel_order: ChannelOrder::HWC,
            resize_filter: ResizeFilter::Bilinear,
            normalize_scale: 1.0,
            normalize_mean: vec![INCEPTION_MEAN; 3],
            normalize_std: vec![INCEPTION_STD; 3],
        }
    }
}

impl ModelInputConfig {
    /// Creates the inception defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input and output node names.
    pub fn with_node_names(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input_name = input.into();
        self.output_name = output.into();
        self
    }

    /// Sets the spatial input size as (height, width).
    pub fn with_input_shape(mut self, shape: (u32, u32)) -> Self {
        self.input_shape = shape;
        self
    }

    /// Sets the channel layout.
    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.channel_order = order;
        self
    }

    /// Sets the resampling algorithm.
    pub fn with_resize_filter(mut self, filter: ResizeFilter) -> Self {
        self.resize_filter = filter;
        self
    }

    /// Sets scale, mean and std together.
    pub fn with_normalization(mut self, scale: f32, mean: Vec<f32>, std: Vec<f32>) -> Self {
        self.normalize_scale = scale;
        self.normalize_mean = mean;
        self.normalize_std = std;
        self
    }

    /// Returns the full tensor shape the graph expects, batch included.
    pub fn tensor_shape(&self) -> [usize; 4] {
        let (h, w) = (self.input_shape.0 as usize, self.input_shape.1 as usize);
        match self.channel_order {
            ChannelOrder::HWC => [1, h, w, 3],
            ChannelOrder::CHW => [1, 3, h, w],
        }
    }
}

impl ConfigValidator for ModelInputConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.input_name.is_empty() || self.output_name.is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "input_name and output_name must not be empty".to_string(),
            });
        }
        self.validate_image_dimensions(self.input_shape.1, self.input_shape.0)?;
        if !(self.normalize_scale > 0.0) {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "normalize_scale must be greater than 0, got {}",
                    self.normalize_scale
                ),
            });
        }
        if self.normalize_mean.len() != 3 || self.normalize_std.len() != 3 {
            return Err(ConfigError::InvalidConfig {
                message: "normalize_mean and normalize_std must have exactly 3 elements"
                    .to_string(),
            });
        }
        if let Some(s) = self.normalize_std.iter().find(|s| !(**s > 0.0)) {
            return Err(ConfigError::InvalidConfig {
                message: format!("normalize_std values must be greater than 0, got {s}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_inception() {
        let config = ModelInputConfig::default();
        assert_eq!(config.input_name, "input");
        assert_eq!(config.output_name, "output");
        assert_eq!(config.tensor_shape(), [1, 224, 224, 3]);
        assert_eq!(config.normalize_mean, vec![117.0; 3]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chw_tensor_shape() {
        let config = ModelInputConfig::new()
            .with_input_shape((32, 48))
            .with_channel_order(ChannelOrder::CHW);
        assert_eq!(config.tensor_shape(), [1, 3, 32, 48]);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(
            ModelInputConfig::new()
                .with_input_shape((0, 224))
                .validate()
                .is_err()
        );
        assert!(
            ModelInputConfig::new()
                .with_normalization(1.0, vec![0.0; 3], vec![1.0, 0.0, 1.0])
                .validate()
                .is_err()
        );
        assert!(
            ModelInputConfig::new()
                .with_normalization(0.0, vec![0.0; 3], vec![1.0; 3])
                .validate()
                .is_err()
        );
        assert!(
            ModelInputConfig::new()
                .with_node_names("", "output")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ModelInputConfig =
            serde_json::from_str(r#"{"output_name": "softmax2", "input_shape": [299, 299]}"#)
                .unwrap();
        assert_eq!(config.output_name, "softmax2");
        assert_eq!(config.input_shape, (299, 299));
        assert_eq!(config.input_name, "input");
    }
}
