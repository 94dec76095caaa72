//! Decoding of compressed image payloads.

use crate::core::{ClassifyError, ProcessingStage};
use crate::processors::types::ImageFormatHint;
use image::RgbImage;

/// Decodes `bytes` as the declared format into an 8-bit RGB pixel grid.
///
/// Grayscale inputs are broadcast to three identical channels and alpha is
/// discarded, so every accepted image yields exactly three channels. The
/// declared format is authoritative: a PNG payload declared as JPEG is
/// rejected.
///
/// # Errors
///
/// Returns [`ClassifyError::InvalidImage`] for an empty payload, a payload
/// the decoder rejects, or a decoded image with a zero dimension.
pub fn decode_image(bytes: &[u8], format: ImageFormatHint) -> Result<RgbImage, ClassifyError> {
    if bytes.is_empty() {
        return Err(ClassifyError::empty_image());
    }

    let img = image::load_from_memory_with_format(bytes, format.image_format())
        .map_err(|e| ClassifyError::decode_error(format, e))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(ClassifyError::invalid_image(
            ProcessingStage::Decode,
            format!("decoded image has zero size {}x{}", img.width(), img.height()),
        ));
    }

    Ok(img.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb};
    use std::io::Cursor;

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_empty_payload_is_invalid() {
        let err = decode_image(&[], ImageFormatHint::Jpeg).unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::InvalidImage {
                stage: ProcessingStage::Decode,
                ..
            }
        ));
    }

    #[test]
    fn test_corrupt_payload_is_invalid() {
        let err = decode_image(b"\x89PNG garbage", ImageFormatHint::Png).unwrap_err();
        match err {
            ClassifyError::InvalidImage { source, .. } => assert!(source.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_png_declared_as_jpeg_is_rejected() {
        let png = encode(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))),
            ImageFormat::Png,
        );
        assert!(decode_image(&png, ImageFormatHint::Jpeg).is_err());
        assert!(decode_image(&png, ImageFormatHint::Png).is_ok());
    }

    #[test]
    fn test_grayscale_is_broadcast_to_rgb() {
        let png = encode(
            DynamicImage::ImageLuma8(GrayImage::from_pixel(3, 2, Luma([77]))),
            ImageFormat::Png,
        );
        let rgb = decode_image(&png, ImageFormatHint::Png).unwrap();
        assert_eq!(rgb.dimensions(), (3, 2));
        assert!(rgb.pixels().all(|p| p.0 == [77, 77, 77]));
    }

    #[test]
    fn test_jpeg_round_trip_keeps_dimensions() {
        let jpeg = encode(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 60, Rgb([200, 30, 30]))),
            ImageFormat::Jpeg,
        );
        let rgb = decode_image(&jpeg, ImageFormatHint::Jpeg).unwrap();
        assert_eq!(rgb.dimensions(), (100, 60));
    }
}
