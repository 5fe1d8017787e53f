use ndarray::{Array3, s};
use tracing::debug;

/// Center-crops or zero-pads each spatial axis to `(target_rows, target_cols)`.
///
/// Axes larger than the target are cropped symmetrically (the extra pixel of
/// an odd difference is dropped on the bottom/right); smaller axes are padded
/// with zeros, again centered. Channels are untouched.
pub fn resize_with_crop_or_pad(
    image: &Array3<f32>,
    target_rows: usize,
    target_cols: usize,
) -> Array3<f32> {
    let (rows, cols, channels) = image.dim();
    if rows == target_rows && cols == target_cols {
        return image.clone();
    }

    let (src_top, dst_top, copy_rows) = axis_window(rows, target_rows);
    let (src_left, dst_left, copy_cols) = axis_window(cols, target_cols);

    debug!(
        "Crop-or-pad: {}x{} -> {}x{} (src offset {},{}, dst offset {},{})",
        rows, cols, target_rows, target_cols, src_top, src_left, dst_top, dst_left
    );

    let mut out = Array3::<f32>::zeros((target_rows, target_cols, channels));
    out.slice_mut(s![
        dst_top..dst_top + copy_rows,
        dst_left..dst_left + copy_cols,
        ..
    ])
    .assign(&image.slice(s![
        src_top..src_top + copy_rows,
        src_left..src_left + copy_cols,
        ..
    ]));
    out
}

/// Returns (source offset, destination offset, copied length) along one axis.
fn axis_window(len: usize, target: usize) -> (usize, usize, usize) {
    if len >= target {
        ((len - target) / 2, 0, target)
    } else {
        (0, (target - len) / 2, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(rows: usize, cols: usize) -> Array3<f32> {
        Array3::from_shape_fn((rows, cols, 1), |(r, c, _)| (r * cols + c + 1) as f32)
    }

    #[test]
    fn crops_centered_window() {
        let out = resize_with_crop_or_pad(&numbered(4, 4), 2, 2);
        assert_eq!(out.dim(), (2, 2, 1));
        assert_eq!(out.into_raw_vec(), vec![6.0, 7.0, 10.0, 11.0]);
    }

    #[test]
    fn pads_with_zeros_around_source() {
        let out = resize_with_crop_or_pad(&numbered(1, 1), 3, 3);
        assert_eq!(out[[1, 1, 0]], 1.0);
        assert_eq!(out.iter().filter(|&&v| v == 0.0).count(), 8);
    }

    #[test]
    fn mixes_crop_and_pad_per_axis() {
        let out = resize_with_crop_or_pad(&numbered(5, 2), 3, 4);
        assert_eq!(out.dim(), (3, 4, 1));
        // rows 1..4 of the source land in columns 1..3
        assert_eq!(out[[0, 1, 0]], 3.0);
        assert_eq!(out[[2, 2, 0]], 8.0);
        assert_eq!(out[[0, 0, 0]], 0.0);
        assert_eq!(out[[0, 3, 0]], 0.0);
    }
}
