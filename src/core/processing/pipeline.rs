use ndarray::Array3;
use rand::Rng;
use tracing::debug;

use crate::core::params::{JitterParams, PreprocessConfig};
use crate::core::processing::gate::RandomApply;
use crate::core::processing::geometry::{
    ensure_shape, flip_left_right, fuse_channels, random_crop_with_resize, split_channels,
};
use crate::core::processing::jitter::{JitterComposer, clamp_unit};
use crate::core::processing::kernels::{GaussianBlur, PhotometricKernel};
use crate::core::processing::padding::resize_with_crop_or_pad;
use crate::error::Result;

/// Output of a pipeline run: `mask` is `None` when no mask was supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    pub image: Array3<f32>,
    pub mask: Option<Array3<f32>>,
}

/// Declared channel counts of image and mask inside a fused tensor.
/// `None` accepts whatever the input carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    pub image: Option<usize>,
    pub mask: Option<usize>,
}

/// Channel counts of one call, after checking against the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Channels {
    image: usize,
    mask: usize,
}

impl ChannelLayout {
    fn from_config(config: &PreprocessConfig) -> Self {
        Self {
            image: config.image_channels,
            mask: config.mask_channels,
        }
    }

    /// Checks the inputs against the layout before anything is fused.
    fn resolve(&self, image: &Array3<f32>, mask: Option<&Array3<f32>>) -> Result<Channels> {
        let (rows, cols, image_channels) = image.dim();
        let image_channels = self.image.unwrap_or(image_channels);
        ensure_shape(image, (rows, cols, image_channels), "input image channels")?;

        let mask_channels = match mask {
            Some(mask) => {
                let mask_channels = self.mask.unwrap_or(mask.dim().2);
                ensure_shape(mask, (rows, cols, mask_channels), "input mask")?;
                mask_channels
            }
            None => 0,
        };
        Ok(Channels {
            image: image_channels,
            mask: mask_channels,
        })
    }
}

/// Training-time pipeline: jitter, blur, clamp, fused crop/resize, flip, split.
#[derive(Debug)]
pub struct TrainPreprocessor {
    image_size: (usize, usize),
    layout: ChannelLayout,
    distort: bool,
    crop: bool,
    flip: bool,
    area_range: (f64, f64),
    jitter: JitterParams,
    composer: JitterComposer,
    jitter_gate: RandomApply,
    blur: GaussianBlur,
    blur_sigma_max: f32,
    blur_gate: RandomApply,
    flip_gate: RandomApply,
}

impl TrainPreprocessor {
    pub fn new(config: &PreprocessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            image_size: config.image_size,
            layout: ChannelLayout::from_config(config),
            distort: config.distort,
            crop: config.crop,
            flip: config.flip,
            area_range: config.area_range,
            jitter: config.jitter,
            composer: JitterComposer::new(config.jitter.brightness_impl),
            jitter_gate: RandomApply::new(config.jitter_probability)?,
            blur: GaussianBlur::for_height(config.image_size.0),
            blur_sigma_max: config.blur_sigma_max,
            blur_gate: RandomApply::new(config.blur_probability)?,
            flip_gate: RandomApply::new(config.flip_probability)?,
        })
    }

    pub fn apply<R: Rng>(
        &self,
        image: Array3<f32>,
        mask: Option<Array3<f32>>,
        rng: &mut R,
    ) -> Result<Preprocessed> {
        let channels = self.layout.resolve(&image, mask.as_ref())?;
        let (rows, cols) = self.image_size;

        let mut image = image;
        if self.distort {
            image = self
                .jitter_gate
                .apply(image, rng, |x, rng| self.composer.apply(x, &self.jitter, rng))?;
            image = self.blur_gate.apply(image, rng, |x, rng| {
                self.blur.apply(&x, self.blur_sigma_max, &mut *rng)
            })?;
        }
        let image = clamp_unit(image);

        let fused = match &mask {
            Some(m) => fuse_channels(&image, m)?,
            None => image,
        };

        let fused = if self.crop {
            random_crop_with_resize(&fused, rows, cols, self.area_range, rng)?
        } else {
            resize_with_crop_or_pad(&fused, rows, cols)
        };

        let fused = if self.flip {
            self.flip_gate
                .apply(fused, rng, |x, _| Ok(flip_left_right(&x)))?
        } else {
            fused
        };

        debug!("Train pipeline produced {:?}", fused.dim());
        self.unfuse(fused, channels, mask.is_some())
    }

    fn unfuse(&self, fused: Array3<f32>, channels: Channels, has_mask: bool) -> Result<Preprocessed> {
        let (rows, cols) = self.image_size;
        if has_mask {
            let (image, mask) = split_channels(&fused, rows, cols, channels.image, channels.mask)?;
            Ok(Preprocessed {
                image,
                mask: Some(mask),
            })
        } else {
            ensure_shape(&fused, (rows, cols, channels.image), "train output")?;
            Ok(Preprocessed {
                image: fused,
                mask: None,
            })
        }
    }
}

/// Evaluation pipeline: fused center crop-or-pad, clamp, split. Draws no
/// random numbers, so identical inputs give bit-identical outputs.
#[derive(Debug)]
pub struct EvalPreprocessor {
    image_size: (usize, usize),
    layout: ChannelLayout,
    crop: bool,
}

impl EvalPreprocessor {
    pub fn new(config: &PreprocessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            image_size: config.image_size,
            layout: ChannelLayout::from_config(config),
            crop: config.test_crop,
        })
    }

    pub fn apply(&self, image: Array3<f32>, mask: Option<Array3<f32>>) -> Result<Preprocessed> {
        let channels = self.layout.resolve(&image, mask.as_ref())?;
        let (rows, cols) = self.image_size;

        let fused = match &mask {
            Some(m) => fuse_channels(&image, m)?,
            None => image,
        };
        let fused = if self.crop {
            resize_with_crop_or_pad(&fused, rows, cols)
        } else {
            fused
        };
        let fused = clamp_unit(fused);

        if mask.is_some() {
            let (image, mask) = split_channels(&fused, rows, cols, channels.image, channels.mask)?;
            Ok(Preprocessed {
                image,
                mask: Some(mask),
            })
        } else {
            // without a mask nothing is split, so an uncropped image keeps its size
            Ok(Preprocessed {
                image: fused,
                mask: None,
            })
        }
    }
}
