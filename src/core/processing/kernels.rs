use ndarray::{Array1, Array3, Axis, Zip};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};

use crate::error::{Error, Result};
use crate::types::BrightnessImpl;

/// A stochastic pixel transform: `apply(image, magnitude, rng) -> image'`.
///
/// Implementations draw their random parameters from `rng` only, so the output
/// is a pure function of the input and the generator state. A magnitude of 0
/// must have no effect. Outputs may leave [0,1]; callers clamp afterwards.
pub trait PhotometricKernel: Send + Sync {
    fn apply(&self, image: &Array3<f32>, magnitude: f32, rng: &mut dyn RngCore)
    -> Result<Array3<f32>>;
}

/// Additive (`V1`) or multiplicative (`V2`) brightness change.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBrightness {
    pub variant: BrightnessImpl,
}

impl RandomBrightness {
    pub fn new(variant: BrightnessImpl) -> Self {
        Self { variant }
    }
}

impl PhotometricKernel for RandomBrightness {
    fn apply(
        &self,
        image: &Array3<f32>,
        magnitude: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Array3<f32>> {
        if magnitude <= 0.0 {
            return Ok(image.clone());
        }
        Ok(match self.variant {
            BrightnessImpl::V1 => {
                let delta = rng.random_range(-magnitude..=magnitude);
                image.mapv(|v| v + delta)
            }
            BrightnessImpl::V2 => {
                let lower = (1.0 - magnitude).max(0.0);
                let factor = rng.random_range(lower..=1.0 + magnitude);
                image.mapv(|v| v * factor)
            }
        })
    }
}

/// Scales each channel's deviation from its spatial mean by a factor in
/// `[1 - m, 1 + m]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomContrast;

impl PhotometricKernel for RandomContrast {
    fn apply(
        &self,
        image: &Array3<f32>,
        magnitude: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Array3<f32>> {
        if magnitude <= 0.0 {
            return Ok(image.clone());
        }
        let factor = rng.random_range((1.0 - magnitude)..=(1.0 + magnitude));
        let means = channel_means(image);
        let mut out = image.clone();
        for (c, mut plane) in out.axis_iter_mut(Axis(2)).enumerate() {
            let mean = means[c];
            plane.mapv_inplace(|v| (v - mean) * factor + mean);
        }
        Ok(out)
    }
}

fn channel_means(image: &Array3<f32>) -> Array1<f32> {
    let (h, w, c) = image.dim();
    if h == 0 || w == 0 {
        return Array1::zeros(c);
    }
    image
        .sum_axis(Axis(0))
        .sum_axis(Axis(0))
        .mapv(|s| s / (h * w) as f32)
}

/// Raises pixels to an exponent drawn log-uniformly from `[1/(1+m), 1+m]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGamma;

impl PhotometricKernel for RandomGamma {
    fn apply(
        &self,
        image: &Array3<f32>,
        magnitude: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Array3<f32>> {
        if magnitude <= 0.0 {
            return Ok(image.clone());
        }
        let bound = (1.0 + magnitude).ln();
        let exponent = rng.random_range(-bound..=bound).exp();
        Ok(image.mapv(|v| v.max(0.0).powf(exponent)))
    }
}

/// Adds zero-mean Gaussian noise with a standard deviation drawn from `[0, m]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianNoise;

impl PhotometricKernel for GaussianNoise {
    fn apply(
        &self,
        image: &Array3<f32>,
        magnitude: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Array3<f32>> {
        if magnitude <= 0.0 {
            return Ok(image.clone());
        }
        let sigma = rng.random_range(0.0..=magnitude);
        let normal = Normal::new(0.0f32, sigma).map_err(Error::external)?;
        let mut out = image.clone();
        out.iter_mut().for_each(|v| *v += normal.sample(rng));
        Ok(out)
    }
}

/// Separable Gaussian blur with sigma drawn from `[0.1, m]`.
///
/// The kernel size follows the target height (`height / 10`, forced odd) so
/// the blur footprint is proportional to the output resolution. Borders are
/// edge-clamped.
#[derive(Debug, Clone, Copy)]
pub struct GaussianBlur {
    radius: usize,
}

impl GaussianBlur {
    pub const MIN_SIGMA: f32 = 0.1;

    pub fn for_height(target_height: usize) -> Self {
        Self {
            radius: (target_height / 10) / 2,
        }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    fn weights(&self, sigma: f32) -> Vec<f32> {
        let r = self.radius as isize;
        let two_sigma_sq = 2.0 * sigma * sigma;
        let raw: Vec<f32> = (-r..=r)
            .map(|i| (-((i * i) as f32) / two_sigma_sq).exp())
            .collect();
        let total: f32 = raw.iter().sum();
        raw.into_iter().map(|w| w / total).collect()
    }
}

impl PhotometricKernel for GaussianBlur {
    fn apply(
        &self,
        image: &Array3<f32>,
        magnitude: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Array3<f32>> {
        if magnitude <= 0.0 {
            return Ok(image.clone());
        }
        let upper = magnitude.max(Self::MIN_SIGMA);
        let sigma = rng.random_range(Self::MIN_SIGMA..=upper);
        if self.radius == 0 {
            return Ok(image.clone());
        }
        let weights = self.weights(sigma);
        let horizontal = convolve_axis(image, &weights, Axis(1));
        Ok(convolve_axis(&horizontal, &weights, Axis(0)))
    }
}

fn convolve_axis(image: &Array3<f32>, weights: &[f32], axis: Axis) -> Array3<f32> {
    let len = image.len_of(axis);
    let radius = (weights.len() / 2) as isize;
    let mut out = Array3::<f32>::zeros(image.raw_dim());
    Zip::from(out.lanes_mut(axis))
        .and(image.lanes(axis))
        .for_each(|mut dst, src| {
            for i in 0..len {
                let mut acc = 0.0;
                for (k, w) in weights.iter().enumerate() {
                    let j = (i as isize + k as isize - radius).clamp(0, len as isize - 1);
                    acc += w * src[j as usize];
                }
                dst[i] = acc;
            }
        });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn gradient(h: usize, w: usize, c: usize) -> Array3<f32> {
        Array3::from_shape_fn((h, w, c), |(y, x, ch)| {
            ((y * w + x) as f32 / (h * w) as f32 + ch as f32 * 0.01).min(1.0)
        })
    }

    #[test]
    fn zero_magnitude_is_identity_for_every_kernel() -> Result<()> {
        let img = gradient(8, 8, 3);
        let mut rng = StdRng::seed_from_u64(1);
        let kernels: Vec<Box<dyn PhotometricKernel>> = vec![
            Box::new(RandomBrightness::new(BrightnessImpl::V1)),
            Box::new(RandomBrightness::new(BrightnessImpl::V2)),
            Box::new(RandomContrast),
            Box::new(RandomGamma),
            Box::new(GaussianNoise),
            Box::new(GaussianBlur::for_height(64)),
        ];
        for kernel in kernels {
            assert_eq!(kernel.apply(&img, 0.0, &mut rng)?, img);
        }
        Ok(())
    }

    #[test]
    fn brightness_v1_shifts_every_pixel_equally() -> Result<()> {
        let img = Array3::from_elem((4, 4, 3), 0.5f32);
        let mut rng = StdRng::seed_from_u64(9);
        let out = RandomBrightness::new(BrightnessImpl::V1).apply(&img, 0.1, &mut rng)?;
        let first = out[[0, 0, 0]];
        assert!((0.4..=0.6).contains(&first));
        assert!(out.iter().all(|&v| (v - first).abs() < 1e-7));
        Ok(())
    }

    #[test]
    fn contrast_preserves_channel_means() -> Result<()> {
        let img = gradient(6, 5, 2);
        let mut rng = StdRng::seed_from_u64(3);
        let out = RandomContrast.apply(&img, 0.5, &mut rng)?;
        let before = channel_means(&img);
        let after = channel_means(&out);
        for c in 0..2 {
            assert!((before[c] - after[c]).abs() < 1e-5);
        }
        Ok(())
    }

    #[test]
    fn gamma_keeps_unit_range() -> Result<()> {
        let img = gradient(8, 8, 1);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let out = RandomGamma.apply(&img, 2.0, &mut rng)?;
            assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
        Ok(())
    }

    #[test]
    fn blur_preserves_constant_images() -> Result<()> {
        let img = Array3::from_elem((20, 20, 3), 0.25f32);
        let mut rng = StdRng::seed_from_u64(5);
        let blur = GaussianBlur::for_height(60);
        assert_eq!(blur.radius(), 3);
        let out = blur.apply(&img, 2.0, &mut rng)?;
        assert!(out.iter().all(|&v| (v - 0.25).abs() < 1e-5));
        Ok(())
    }

    #[test]
    fn same_seed_gives_same_noise() -> Result<()> {
        let img = gradient(5, 5, 3);
        let a = GaussianNoise.apply(&img, 0.1, &mut StdRng::seed_from_u64(42))?;
        let b = GaussianNoise.apply(&img, 0.1, &mut StdRng::seed_from_u64(42))?;
        assert_eq!(a, b);
        Ok(())
    }
}
