use ndarray::Array3;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::core::params::JitterParams;
use crate::core::processing::gate::RandomApply;
use crate::core::processing::kernels::{
    GaussianNoise, PhotometricKernel, RandomBrightness, RandomContrast, RandomGamma,
};
use crate::error::Result;
use crate::types::{BrightnessImpl, JitterKind};

/// Clamps every value into [0,1].
pub fn clamp_unit(image: Array3<f32>) -> Array3<f32> {
    image.mapv_into(|v| v.clamp(0.0, 1.0))
}

/// Draws a uniformly random ordering of the four jitter kinds.
///
/// Always consumes the same number of draws (a Fisher-Yates shuffle of four
/// slots), independent of the magnitudes later used.
pub fn sample_permutation<R: Rng>(rng: &mut R) -> [JitterKind; 4] {
    let mut slots = [0usize, 1, 2, 3];
    slots.shuffle(rng);
    slots.map(|slot| match JitterKind::from_slot(slot) {
        Some(kind) => kind,
        None => unreachable!("slot {} outside 0..4", slot),
    })
}

/// The four photometric kernels, one per `JitterKind`.
pub struct JitterKernels {
    pub brightness: Box<dyn PhotometricKernel>,
    pub contrast: Box<dyn PhotometricKernel>,
    pub gamma: Box<dyn PhotometricKernel>,
    pub noise: Box<dyn PhotometricKernel>,
}

impl JitterKernels {
    pub fn standard(brightness_impl: BrightnessImpl) -> Self {
        Self {
            brightness: Box::new(RandomBrightness::new(brightness_impl)),
            contrast: Box::new(RandomContrast),
            gamma: Box::new(RandomGamma),
            noise: Box::new(GaussianNoise),
        }
    }

    fn get(&self, kind: JitterKind) -> &dyn PhotometricKernel {
        match kind {
            JitterKind::Brightness => self.brightness.as_ref(),
            JitterKind::Contrast => self.contrast.as_ref(),
            JitterKind::Gamma => self.gamma.as_ref(),
            JitterKind::Noise => self.noise.as_ref(),
        }
    }
}

impl std::fmt::Debug for JitterKernels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JitterKernels").finish_non_exhaustive()
    }
}

/// Applies brightness, contrast, gamma and noise once each, in a freshly
/// shuffled order per call, clamping to [0,1] after every step.
///
/// A zero magnitude skips its kernel but still occupies its slot in the
/// permutation.
#[derive(Debug)]
pub struct JitterComposer {
    kernels: JitterKernels,
}

impl JitterComposer {
    pub fn new(brightness_impl: BrightnessImpl) -> Self {
        Self::with_kernels(JitterKernels::standard(brightness_impl))
    }

    pub fn with_kernels(kernels: JitterKernels) -> Self {
        Self { kernels }
    }

    pub fn apply<R: Rng>(
        &self,
        image: Array3<f32>,
        params: &JitterParams,
        rng: &mut R,
    ) -> Result<Array3<f32>> {
        params.validate()?;
        let order = sample_permutation(rng);
        debug!("Jitter order: {:?}", order);

        let mut x = image;
        for kind in order {
            let magnitude = params.magnitude(kind);
            if magnitude != 0.0 {
                x = self.kernels.get(kind).apply(&x, magnitude, &mut *rng)?;
            }
            x = clamp_unit(x);
        }
        Ok(x)
    }

    /// Jitter at `strength` (see `JitterParams::from_strength`), applied with
    /// probability `p`.
    pub fn apply_random<R: Rng>(
        &self,
        image: Array3<f32>,
        strength: f32,
        p: f64,
        rng: &mut R,
    ) -> Result<Array3<f32>> {
        let params = JitterParams::from_strength(strength);
        RandomApply::new(p)?.apply(image, rng, |x, rng| self.apply(x, &params, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};
    use std::sync::{Arc, Mutex};

    fn ramp() -> Array3<f32> {
        Array3::from_shape_fn((6, 6, 3), |(y, x, c)| (y * 6 + x) as f32 / 36.0 + c as f32 * 0.1)
    }

    /// Records which kind ran and passes the image through.
    struct Recording {
        kind: JitterKind,
        log: Arc<Mutex<Vec<JitterKind>>>,
    }

    impl PhotometricKernel for Recording {
        fn apply(
            &self,
            image: &Array3<f32>,
            _magnitude: f32,
            _rng: &mut dyn RngCore,
        ) -> Result<Array3<f32>> {
            self.log.lock().unwrap().push(self.kind);
            Ok(image.clone())
        }
    }

    fn recording_kernels(log: &Arc<Mutex<Vec<JitterKind>>>) -> JitterKernels {
        let make = |kind| -> Box<dyn PhotometricKernel> {
            Box::new(Recording {
                kind,
                log: Arc::clone(log),
            })
        };
        JitterKernels {
            brightness: make(JitterKind::Brightness),
            contrast: make(JitterKind::Contrast),
            gamma: make(JitterKind::Gamma),
            noise: make(JitterKind::Noise),
        }
    }

    #[test]
    fn permutation_contains_each_kind_once() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let mut order = sample_permutation(&mut rng).to_vec();
            order.sort();
            assert_eq!(order, JitterKind::ALL.to_vec());
        }
    }

    #[test]
    fn kernels_run_in_sampled_order() -> Result<()> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let composer = JitterComposer::with_kernels(recording_kernels(&log));
        let params = JitterParams::default();

        let expected = sample_permutation(&mut StdRng::seed_from_u64(77));
        composer.apply(ramp(), &params, &mut StdRng::seed_from_u64(77))?;

        assert_eq!(log.lock().unwrap().as_slice(), &expected);
        Ok(())
    }

    #[test]
    fn zero_magnitude_skips_kernel_but_keeps_slot() -> Result<()> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let composer = JitterComposer::with_kernels(recording_kernels(&log));
        let mut params = JitterParams::zero();
        params.gamma = 1.0;

        composer.apply(ramp(), &params, &mut StdRng::seed_from_u64(2))?;
        assert_eq!(log.lock().unwrap().as_slice(), &[JitterKind::Gamma]);
        Ok(())
    }

    #[test]
    fn all_zero_magnitudes_clamp_only() -> Result<()> {
        let composer = JitterComposer::new(BrightnessImpl::V1);
        let input = ramp();
        let out = composer.apply(input.clone(), &JitterParams::zero(), &mut StdRng::seed_from_u64(3))?;
        assert_eq!(out, clamp_unit(input));
        Ok(())
    }

    #[test]
    fn negative_magnitude_is_configuration_error() {
        let composer = JitterComposer::new(BrightnessImpl::V1);
        let mut params = JitterParams::default();
        params.noise = -1.0;
        let err = composer
            .apply(ramp(), &params, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn output_stays_in_unit_range() -> Result<()> {
        let composer = JitterComposer::new(BrightnessImpl::V2);
        let params = JitterParams::from_strength(3.0);
        for seed in 0..50 {
            let out = composer.apply(ramp(), &params, &mut StdRng::seed_from_u64(seed))?;
            assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
        Ok(())
    }

    #[test]
    fn gated_jitter_with_zero_probability_is_identity() -> Result<()> {
        let composer = JitterComposer::new(BrightnessImpl::V1);
        let input = ramp();
        let out = composer.apply_random(input.clone(), 1.0, 0.0, &mut StdRng::seed_from_u64(8))?;
        assert_eq!(out, input);
        Ok(())
    }
}
