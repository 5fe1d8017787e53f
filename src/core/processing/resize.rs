use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use ndarray::{Array2, Array3, Axis};
use tracing::debug;

use crate::error::{Error, Result};

/// Resizes one `f32` plane with a bilinear convolution.
///
/// Bilinear weights are non-negative, so outputs stay within the input's value
/// range up to rounding.
pub fn resize_f32_plane(
    data: &[f32],
    original_cols: usize,
    original_rows: usize,
    target_cols: usize,
    target_rows: usize,
) -> Result<Vec<f32>> {
    let resize_options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    let mut resizer = Resizer::new();

    // fast_image_resize takes raw bytes in native layout
    let mut src_bytes = Vec::with_capacity(data.len() * 4);
    for &v in data {
        src_bytes.extend_from_slice(&v.to_ne_bytes());
    }

    let src_image = Image::from_vec_u8(
        original_cols as u32,
        original_rows as u32,
        src_bytes,
        PixelType::F32,
    )
    .map_err(Error::external)?;
    let mut dst_image = Image::new(target_cols as u32, target_rows as u32, PixelType::F32);
    resizer
        .resize(&src_image, &mut dst_image, &resize_options)
        .map_err(Error::external)?;

    let dst_bytes = dst_image.into_vec();
    let mut out = Vec::with_capacity(dst_bytes.len() / 4);
    for chunk in dst_bytes.chunks_exact(4) {
        out.push(f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(out)
}

/// Resizes every channel of an `[H, W, C]` image to `(target_rows, target_cols)`.
pub fn resize_image(
    image: &Array3<f32>,
    target_rows: usize,
    target_cols: usize,
) -> Result<Array3<f32>> {
    let (rows, cols, channels) = image.dim();
    if target_rows == 0 || target_cols == 0 {
        return Err(Error::ZeroSize {
            size: target_rows.min(target_cols),
        });
    }
    if rows == 0 || cols == 0 {
        return Err(Error::shape("resize source", &[1, 1, channels], &[rows, cols, channels]));
    }
    if rows == target_rows && cols == target_cols {
        return Ok(image.clone());
    }

    debug!(
        "Resizing {} channel(s): {}x{} -> {}x{}",
        channels, rows, cols, target_rows, target_cols
    );

    let mut out = Array3::<f32>::zeros((target_rows, target_cols, channels));
    for (c, mut dst) in out.axis_iter_mut(Axis(2)).enumerate() {
        let plane: Vec<f32> = image.index_axis(Axis(2), c).iter().copied().collect();
        let resized = resize_f32_plane(&plane, cols, rows, target_cols, target_rows)?;
        let resized = Array2::from_shape_vec((target_rows, target_cols), resized)
            .map_err(Error::external)?;
        dst.assign(&resized);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resizes_each_channel_independently() -> Result<()> {
        let mut img = Array3::<f32>::zeros((8, 6, 2));
        img.index_axis_mut(Axis(2), 0).fill(0.2);
        img.index_axis_mut(Axis(2), 1).fill(0.9);

        let out = resize_image(&img, 4, 12)?;
        assert_eq!(out.dim(), (4, 12, 2));
        assert!(out.index_axis(Axis(2), 0).iter().all(|&v| (v - 0.2).abs() < 1e-5));
        assert!(out.index_axis(Axis(2), 1).iter().all(|&v| (v - 0.9).abs() < 1e-5));
        Ok(())
    }

    #[test]
    fn output_stays_within_input_range() -> Result<()> {
        let img = Array3::from_shape_fn((9, 9, 1), |(r, c, _)| ((r + c) % 2) as f32);
        let out = resize_image(&img, 20, 20)?;
        assert!(out.iter().all(|&v| (-1e-5..=1.0 + 1e-5).contains(&v)));
        Ok(())
    }

    #[test]
    fn same_size_is_a_copy() -> Result<()> {
        let img = Array3::from_elem((3, 3, 3), 0.7f32);
        assert_eq!(resize_image(&img, 3, 3)?, img);
        Ok(())
    }

    #[test]
    fn zero_target_is_rejected() {
        let img = Array3::from_elem((3, 3, 1), 0.7f32);
        assert!(matches!(resize_image(&img, 0, 3), Err(Error::ZeroSize { .. })));
    }
}
