use ndarray::{Array3, Axis, concatenate, s};
use rand::Rng;
use tracing::{debug, warn};

use crate::core::processing::resize::resize_image;
use crate::error::{Error, Result};

const ASPECT_RATIO_RANGE: (f64, f64) = (3.0 / 4.0, 4.0 / 3.0);
const MAX_CROP_ATTEMPTS: usize = 100;

/// Returns an error unless `array` has exactly the `expected` shape.
pub fn ensure_shape(
    array: &Array3<f32>,
    expected: (usize, usize, usize),
    context: &'static str,
) -> Result<()> {
    if array.dim() != expected {
        return Err(Error::shape(
            context,
            &[expected.0, expected.1, expected.2],
            array.shape(),
        ));
    }
    Ok(())
}

/// Stacks the mask's channels after the image's so one geometric operation
/// moves both. Spatial dimensions must agree.
pub fn fuse_channels(image: &Array3<f32>, mask: &Array3<f32>) -> Result<Array3<f32>> {
    let (rows, cols, _) = image.dim();
    let (mask_rows, mask_cols, mask_channels) = mask.dim();
    if (rows, cols) != (mask_rows, mask_cols) {
        return Err(Error::shape(
            "mask spatial dimensions",
            &[rows, cols, mask_channels],
            mask.shape(),
        ));
    }
    concatenate(Axis(2), &[image.view(), mask.view()]).map_err(Error::external)
}

/// Splits a fused tensor back into image and mask and verifies both against
/// the declared `(rows, cols, channels)` layout.
pub fn split_channels(
    fused: &Array3<f32>,
    rows: usize,
    cols: usize,
    image_channels: usize,
    mask_channels: usize,
) -> Result<(Array3<f32>, Array3<f32>)> {
    let total = fused.len_of(Axis(2));
    if total != image_channels + mask_channels {
        return Err(Error::shape(
            "fused channels",
            &[rows, cols, image_channels + mask_channels],
            fused.shape(),
        ));
    }
    let image = fused.slice(s![.., .., ..image_channels]).to_owned();
    let mask = fused.slice(s![.., .., image_channels..]).to_owned();
    ensure_shape(&image, (rows, cols, image_channels), "split image")?;
    ensure_shape(&mask, (rows, cols, mask_channels), "split mask")?;
    Ok((image, mask))
}

/// A crop window in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub top: usize,
    pub left: usize,
    pub rows: usize,
    pub cols: usize,
}

impl CropWindow {
    pub fn full(rows: usize, cols: usize) -> Self {
        Self {
            top: 0,
            left: 0,
            rows,
            cols,
        }
    }

    pub fn area(&self) -> usize {
        self.rows * self.cols
    }
}

/// Samples a window covering a uniformly drawn fraction of the source area.
///
/// The aspect ratio (width / height) is drawn log-uniformly from [3/4, 4/3]
/// times the source ratio. Falls back to the full frame when no valid window
/// is found within 100 attempts.
pub fn sample_area_crop<R: Rng>(
    rows: usize,
    cols: usize,
    area_range: (f64, f64),
    rng: &mut R,
) -> CropWindow {
    let source_area = (rows * cols) as f64;
    let source_aspect = cols as f64 / rows as f64;
    let (log_lo, log_hi) = (
        (ASPECT_RATIO_RANGE.0 * source_aspect).ln(),
        (ASPECT_RATIO_RANGE.1 * source_aspect).ln(),
    );

    for _ in 0..MAX_CROP_ATTEMPTS {
        let fraction = rng.random_range(area_range.0..=area_range.1);
        let aspect = rng.random_range(log_lo..=log_hi).exp();
        let target_area = fraction * source_area;
        let crop_cols = (target_area * aspect).sqrt().round() as usize;
        let crop_rows = (target_area / aspect).sqrt().round() as usize;
        if crop_rows == 0 || crop_cols == 0 || crop_rows > rows || crop_cols > cols {
            continue;
        }
        let top = rng.random_range(0..=rows - crop_rows);
        let left = rng.random_range(0..=cols - crop_cols);
        return CropWindow {
            top,
            left,
            rows: crop_rows,
            cols: crop_cols,
        };
    }

    warn!(
        "No crop window found for {}x{} in {} attempts; using full frame",
        rows, cols, MAX_CROP_ATTEMPTS
    );
    CropWindow::full(rows, cols)
}

pub fn crop(image: &Array3<f32>, window: CropWindow) -> Array3<f32> {
    image
        .slice(s![
            window.top..window.top + window.rows,
            window.left..window.left + window.cols,
            ..
        ])
        .to_owned()
}

/// Area-range crop followed by a resize to `(target_rows, target_cols)`.
/// Resampled values are clamped to [0,1].
pub fn random_crop_with_resize<R: Rng>(
    image: &Array3<f32>,
    target_rows: usize,
    target_cols: usize,
    area_range: (f64, f64),
    rng: &mut R,
) -> Result<Array3<f32>> {
    let (rows, cols, _) = image.dim();
    if rows == 0 || cols == 0 {
        return Err(Error::shape("crop source", &[1, 1, image.len_of(Axis(2))], image.shape()));
    }
    let window = sample_area_crop(rows, cols, area_range, rng);
    debug!(
        "Crop window {:?} ({:.1}% of source)",
        window,
        100.0 * window.area() as f64 / (rows * cols) as f64
    );
    let cropped = crop(image, window);
    let resized = resize_image(&cropped, target_rows, target_cols)?;
    Ok(resized.mapv_into(|v| v.clamp(0.0, 1.0)))
}

pub fn flip_left_right(image: &Array3<f32>) -> Array3<f32> {
    image.slice(s![.., ..;-1, ..]).to_owned()
}
