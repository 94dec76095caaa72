//! Resizing of decoded images to the model input size.
//!
//! Output is an `[H, W, 3]` float grid holding un-normalized channel values
//! in `0.0..=255.0`. Interpolated values are never rounded back to `u8`.

use crate::core::{ClassifyError, ProcessingStage, Tensor3D};
use crate::processors::types::ResizeFilter;
use image::RgbImage;

/// Resizes `img` to `(height, width)` with the given filter.
///
/// Images are always resized, whether larger or smaller than the target.
pub fn resize_to_input(
    img: &RgbImage,
    target: (u32, u32),
    filter: ResizeFilter,
) -> Result<Tensor3D, ClassifyError> {
    let (out_h, out_w) = target;
    let (in_w, in_h) = img.dimensions();
    if in_w == 0 || in_h == 0 || out_w == 0 || out_h == 0 {
        return Err(ClassifyError::invalid_image(
            ProcessingStage::Resize,
            format!("cannot resize {in_w}x{in_h} image to {out_w}x{out_h}"),
        ));
    }

    match filter.image_filter() {
        None => Ok(resize_bilinear_legacy(img, out_h as usize, out_w as usize)),
        Some(filter_type) => {
            let resized = image::imageops::resize(img, out_w, out_h, filter_type);
            rgb_to_tensor(&resized)
        }
    }
}

/// Converts an 8-bit RGB image into an `[H, W, 3]` float grid.
pub fn rgb_to_tensor(img: &RgbImage) -> Result<Tensor3D, ClassifyError> {
    let (w, h) = img.dimensions();
    interleaved_to_tensor(h as usize, w as usize, img.as_raw())
}

/// Widens an interleaved RGB buffer into an `[H, W, 3]` float grid.
pub(crate) fn interleaved_to_tensor(
    height: usize,
    width: usize,
    raw: &[u8],
) -> Result<Tensor3D, ClassifyError> {
    let values: Vec<f32> = raw.iter().map(|&v| v as f32).collect();
    Ok(Tensor3D::from_shape_vec((height, width, 3), values)?)
}

/// Bilinear resize with TensorFlow's legacy `ResizeBilinear` semantics.
///
/// Source coordinates are `dst * in / out` (no half-pixel offset, corners
/// not aligned); the bottom and right neighbours clamp to the last row and
/// column.
fn resize_bilinear_legacy(img: &RgbImage, out_h: usize, out_w: usize) -> Tensor3D {
    let (in_w, in_h) = img.dimensions();
    let (in_w, in_h) = (in_w as usize, in_h as usize);
    let y_scale = in_h as f32 / out_h as f32;
    let x_scale = in_w as f32 / out_w as f32;

    let x_taps: Vec<(usize, usize, f32)> = (0..out_w)
        .map(|x| interpolation_taps(x, x_scale, in_w))
        .collect();

    let mut out = Tensor3D::zeros((out_h, out_w, 3));
    for y in 0..out_h {
        let (top, bottom, y_lerp) = interpolation_taps(y, y_scale, in_h);
        for (x, &(left, right, x_lerp)) in x_taps.iter().enumerate() {
            let tl = img.get_pixel(left as u32, top as u32);
            let tr = img.get_pixel(right as u32, top as u32);
            let bl = img.get_pixel(left as u32, bottom as u32);
            let br = img.get_pixel(right as u32, bottom as u32);
            for c in 0..3 {
                let top_value = tl[c] as f32 + (tr[c] as f32 - tl[c] as f32) * x_lerp;
                let bottom_value = bl[c] as f32 + (br[c] as f32 - bl[c] as f32) * x_lerp;
                out[[y, x, c]] = top_value + (bottom_value - top_value) * y_lerp;
            }
        }
    }
    out
}

fn interpolation_taps(dst: usize, scale: f32, in_len: usize) -> (usize, usize, f32) {
    let src = dst as f32 * scale;
    let lower = (src.floor() as usize).min(in_len - 1);
    let upper = (lower + 1).min(in_len - 1);
    (lower, upper, src - lower as f32)
}
