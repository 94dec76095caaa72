//! Types used in image processing operations.

use image::{ImageFormat, imageops::FilterType};
use serde::{Deserialize, Serialize};

/// Specifies the order of channels in an image tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelOrder {
    /// Channel, Height, Width order (common in PyTorch exports)
    CHW,
    /// Height, Width, Channel order (common in TensorFlow exports)
    #[default]
    HWC,
}

/// Resampling algorithm used to bring an image to the model input size.
///
/// The choice changes the tensor values fed to the model, so it is part of
/// the model interface. Only [`ResizeFilter::Bilinear`] reproduces the
/// TensorFlow `ResizeBilinear` kernel the inception graph was served with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResizeFilter {
    /// TensorFlow legacy bilinear (`align_corners = false`, no half-pixel
    /// centres), interpolated on un-rounded values.
    #[default]
    Bilinear,
    /// Nearest neighbour.
    Nearest,
    /// `image` crate triangle filter (area-aware bilinear).
    Triangle,
    /// Catmull-Rom cubic.
    CatmullRom,
    /// Lanczos with window 3.
    Lanczos3,
}

impl ResizeFilter {
    /// Returns the `image` crate filter backing this option, if any.
    ///
    /// `Bilinear` has no equivalent in `image` and is implemented in
    /// [`crate::processors::resize`].
    pub fn image_filter(self) -> Option<FilterType> {
        match self {
            ResizeFilter::Bilinear => None,
            ResizeFilter::Nearest => Some(FilterType::Nearest),
            ResizeFilter::Triangle => Some(FilterType::Triangle),
            ResizeFilter::CatmullRom => Some(FilterType::CatmullRom),
            ResizeFilter::Lanczos3 => Some(FilterType::Lanczos3),
        }
    }
}

/// Declared compression format of an incoming image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormatHint {
    /// JPEG, also used when the name carries no recognised suffix.
    #[default]
    Jpeg,
    /// PNG.
    Png,
}

impl ImageFormatHint {
    /// Derives the hint from a file name or URL suffix, case-insensitively.
    ///
    /// ```rust
    /// use oar_classify::processors::ImageFormatHint;
    ///
    /// assert_eq!(ImageFormatHint::from_name("cat.PNG"), ImageFormatHint::Png);
    /// assert_eq!(ImageFormatHint::from_name("https://x/dog.jpeg"), ImageFormatHint::Jpeg);
    /// assert_eq!(ImageFormatHint::from_name("blob"), ImageFormatHint::Jpeg);
    /// ```
    pub fn from_name(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with("png") {
            ImageFormatHint::Png
        } else {
            ImageFormatHint::Jpeg
        }
    }

    /// Returns the matching `image` crate format.
    pub fn image_format(self) -> ImageFormat {
        match self {
            ImageFormatHint::Jpeg => ImageFormat::Jpeg,
            ImageFormatHint::Png => ImageFormat::Png,
        }
    }
}

impl std::fmt::Display for ImageFormatHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFormatHint::Jpeg => write!(f, "JPEG"),
            ImageFormatHint::Png => write!(f, "PNG"),
        }
    }
}
