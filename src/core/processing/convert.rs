use ndarray::Array3;

use crate::types::PixelEncoding;

/// An `[H, W, C]` image in its original pixel encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RawImage {
    U8(Array3<u8>),
    U16(Array3<u16>),
    F32(Array3<f32>),
    F64(Array3<f64>),
}

impl RawImage {
    pub fn encoding(&self) -> PixelEncoding {
        match self {
            RawImage::U8(_) => PixelEncoding::U8,
            RawImage::U16(_) => PixelEncoding::U16,
            RawImage::F32(_) => PixelEncoding::F32,
            RawImage::F64(_) => PixelEncoding::F64,
        }
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        match self {
            RawImage::U8(a) => a.dim(),
            RawImage::U16(a) => a.dim(),
            RawImage::F32(a) => a.dim(),
            RawImage::F64(a) => a.dim(),
        }
    }

    /// Converts to `f32`: integer encodings are divided by their maximum value,
    /// float encodings are cast without rescaling.
    pub fn into_unit_float(self) -> Array3<f32> {
        match self {
            RawImage::U8(a) => a.mapv(|v| v as f32 / u8::MAX as f32),
            RawImage::U16(a) => a.mapv(|v| v as f32 / u16::MAX as f32),
            RawImage::F32(a) => a,
            RawImage::F64(a) => a.mapv(|v| v as f32),
        }
    }
}

impl From<Array3<u8>> for RawImage {
    fn from(a: Array3<u8>) -> Self {
        RawImage::U8(a)
    }
}

impl From<Array3<u16>> for RawImage {
    fn from(a: Array3<u16>) -> Self {
        RawImage::U16(a)
    }
}

impl From<Array3<f32>> for RawImage {
    fn from(a: Array3<f32>) -> Self {
        RawImage::F32(a)
    }
}

impl From<Array3<f64>> for RawImage {
    fn from(a: Array3<f64>) -> Self {
        RawImage::F64(a)
    }
}

/// Quantizes a [0,1] float image to 8 bits, clamping out-of-range values.
pub fn unit_float_to_u8(image: &Array3<f32>) -> Array3<u8> {
    image.mapv(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}
