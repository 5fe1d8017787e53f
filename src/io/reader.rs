use std::path::Path;

use image::DynamicImage;
use ndarray::Array3;
use tracing::debug;

use crate::core::processing::convert::RawImage;
use crate::error::{Error, Result};

/// Decodes an image file into an `[H, W, C]` array, keeping 8/16-bit and float
/// encodings as they are. Gray+alpha and other layouts are converted to RGB8.
pub fn load_raw_image(path: &Path) -> Result<RawImage> {
    let img = image::open(path)?;
    let (width, height) = (img.width() as usize, img.height() as usize);
    debug!("Loaded {:?}: {}x{} {:?}", path, width, height, img.color());

    let raw = match img {
        DynamicImage::ImageLuma8(buf) => RawImage::U8(to_array(buf.into_raw(), height, width, 1)?),
        DynamicImage::ImageRgb8(buf) => RawImage::U8(to_array(buf.into_raw(), height, width, 3)?),
        DynamicImage::ImageRgba8(buf) => RawImage::U8(to_array(buf.into_raw(), height, width, 4)?),
        DynamicImage::ImageLuma16(buf) => {
            RawImage::U16(to_array(buf.into_raw(), height, width, 1)?)
        }
        DynamicImage::ImageRgb16(buf) => {
            RawImage::U16(to_array(buf.into_raw(), height, width, 3)?)
        }
        DynamicImage::ImageRgba16(buf) => {
            RawImage::U16(to_array(buf.into_raw(), height, width, 4)?)
        }
        DynamicImage::ImageRgb32F(buf) => {
            RawImage::F32(to_array(buf.into_raw(), height, width, 3)?)
        }
        DynamicImage::ImageRgba32F(buf) => {
            RawImage::F32(to_array(buf.into_raw(), height, width, 4)?)
        }
        other => RawImage::U8(to_array(other.to_rgb8().into_raw(), height, width, 3)?),
    };
    Ok(raw)
}

/// Decodes a mask file as a single-channel [0,1] array.
pub fn load_mask(path: &Path) -> Result<Array3<f32>> {
    let img = image::open(path)?;
    let (width, height) = (img.width() as usize, img.height() as usize);
    let gray = to_array(img.to_luma8().into_raw(), height, width, 1)?;
    Ok(RawImage::U8(gray).into_unit_float())
}

fn to_array<T>(data: Vec<T>, rows: usize, cols: usize, channels: usize) -> Result<Array3<T>> {
    Array3::from_shape_vec((rows, cols, channels), data).map_err(Error::external)
}
