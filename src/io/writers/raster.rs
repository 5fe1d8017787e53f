use std::path::Path;

use image::{GrayImage, RgbImage, RgbaImage};
use ndarray::Array3;
use tracing::info;

use crate::core::processing::convert::unit_float_to_u8;
use crate::error::{Error, Result};

/// Writes a [0,1] `[H, W, C]` array as an 8-bit image; the format follows the
/// file extension. Supports 1, 3 and 4 channels.
pub fn save_unit_image(image: &Array3<f32>, output: &Path) -> Result<()> {
    let (rows, cols, channels) = image.dim();
    // logical order, whatever the strides of `image`
    let data: Vec<u8> = unit_float_to_u8(image).iter().copied().collect();
    let (w, h) = (cols as u32, rows as u32);

    let written = match channels {
        1 => GrayImage::from_raw(w, h, data).map(|buf| buf.save(output)),
        3 => RgbImage::from_raw(w, h, data).map(|buf| buf.save(output)),
        4 => RgbaImage::from_raw(w, h, data).map(|buf| buf.save(output)),
        _ => {
            return Err(Error::shape(
                "saved image channels",
                &[rows, cols, 3],
                image.shape(),
            ));
        }
    };
    match written {
        Some(result) => result?,
        None => {
            return Err(Error::Processing(format!(
                "buffer does not match {}x{}x{}",
                rows, cols, channels
            )));
        }
    }
    info!("Wrote {}x{}x{} image to {:?}", rows, cols, channels, output);
    Ok(())
}
