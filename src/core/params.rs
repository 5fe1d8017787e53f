use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{BrightnessImpl, JitterKind};

/// Magnitudes of the four photometric perturbations plus the brightness variant.
/// A magnitude of exactly 0 disables that perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JitterParams {
    pub brightness: f32,
    pub contrast: f32,
    pub gamma: f32,
    pub noise: f32,
    #[serde(default)]
    pub brightness_impl: BrightnessImpl,
}

impl JitterParams {
    /// Scales the reference magnitudes (0.1, 0.1, 2.0, 0.1) by `strength`.
    pub fn from_strength(strength: f32) -> Self {
        Self {
            brightness: 0.1 * strength,
            contrast: 0.1 * strength,
            gamma: 2.0 * strength,
            noise: 0.1 * strength,
            brightness_impl: BrightnessImpl::V1,
        }
    }

    pub fn zero() -> Self {
        Self::from_strength(0.0)
    }

    pub fn with_brightness_impl(mut self, brightness_impl: BrightnessImpl) -> Self {
        self.brightness_impl = brightness_impl;
        self
    }

    pub fn magnitude(&self, kind: JitterKind) -> f32 {
        match kind {
            JitterKind::Brightness => self.brightness,
            JitterKind::Contrast => self.contrast,
            JitterKind::Gamma => self.gamma,
            JitterKind::Noise => self.noise,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for kind in JitterKind::ALL {
            let m = self.magnitude(kind);
            if !m.is_finite() || m < 0.0 {
                return Err(Error::configuration(magnitude_arg(kind), m));
            }
        }
        Ok(())
    }
}

impl Default for JitterParams {
    fn default() -> Self {
        Self::from_strength(1.0)
    }
}

fn magnitude_arg(kind: JitterKind) -> &'static str {
    match kind {
        JitterKind::Brightness => "jitter.brightness",
        JitterKind::Contrast => "jitter.contrast",
        JitterKind::Gamma => "jitter.gamma",
        JitterKind::Noise => "jitter.noise",
    }
}

/// Preprocessing parameters suitable for config files and CLI presets.
/// Immutable once handed to a `Preprocessor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Target (height, width) of every output
    pub image_size: (usize, usize),
    pub is_training: bool,
    /// Photometric jitter and blur (training only)
    pub distort: bool,
    /// Random area-range crop + resize when training
    pub crop: bool,
    /// Random horizontal flip when training
    pub flip: bool,
    /// Center crop-or-pad at evaluation time
    pub test_crop: bool,
    /// Channel count of the image part of a fused tensor; `None` takes it
    /// from each input
    pub image_channels: Option<usize>,
    /// Channel count of the mask part of a fused tensor; `None` takes it
    /// from each mask
    pub mask_channels: Option<usize>,
    pub jitter: JitterParams,
    pub jitter_probability: f64,
    pub blur_probability: f64,
    /// Upper bound of the sampled blur sigma (lower bound is 0.1)
    pub blur_sigma_max: f32,
    pub flip_probability: f64,
    /// Fraction of the source area kept by the random crop
    pub area_range: (f64, f64),
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            image_size: (224, 224),
            is_training: false,
            distort: true,
            crop: true,
            flip: true,
            test_crop: true,
            image_channels: None,
            mask_channels: None,
            jitter: JitterParams::default(),
            jitter_probability: 0.5,
            blur_probability: 0.5,
            blur_sigma_max: 2.0,
            flip_probability: 0.5,
            area_range: (0.5625, 1.0),
        }
    }
}

impl PreprocessConfig {
    /// Square output, distortions tied to `is_pretrain`, crop and flip tied to
    /// distortion, center cropping at evaluation.
    pub fn from_flags(is_training: bool, is_pretrain: bool, image_size: usize) -> Self {
        Self {
            image_size: (image_size, image_size),
            is_training,
            distort: is_pretrain,
            crop: is_pretrain,
            flip: is_pretrain,
            test_crop: true,
            ..Self::default()
        }
    }

    /// Pins the channel layout; inputs with other counts are rejected.
    pub fn with_channels(mut self, image_channels: usize, mask_channels: Option<usize>) -> Self {
        self.image_channels = Some(image_channels);
        self.mask_channels = mask_channels;
        self
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let (height, width) = self.image_size;
        if height == 0 {
            return Err(Error::ZeroSize { size: height });
        }
        if width == 0 {
            return Err(Error::ZeroSize { size: width });
        }
        if self.image_channels == Some(0) {
            return Err(Error::configuration("image_channels", 0));
        }
        if self.mask_channels == Some(0) {
            return Err(Error::configuration("mask_channels", 0));
        }
        self.jitter.validate()?;
        for (arg, p) in [
            ("jitter_probability", self.jitter_probability),
            ("blur_probability", self.blur_probability),
            ("flip_probability", self.flip_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::configuration(arg, p));
            }
        }
        if !self.blur_sigma_max.is_finite() || self.blur_sigma_max < 0.1 {
            return Err(Error::configuration("blur_sigma_max", self.blur_sigma_max));
        }
        let (lo, hi) = self.area_range;
        if !(lo > 0.0 && lo <= hi && hi <= 1.0) {
            return Err(Error::configuration(
                "area_range",
                format!("({}, {})", lo, hi),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_scales_reference_magnitudes() {
        let p = JitterParams::from_strength(0.5);
        assert!((p.brightness - 0.05).abs() < 1e-6);
        assert!((p.contrast - 0.05).abs() < 1e-6);
        assert!((p.gamma - 1.0).abs() < 1e-6);
        assert!((p.noise - 0.05).abs() < 1e-6);
    }

    #[test]
    fn negative_magnitude_is_rejected() {
        let mut p = JitterParams::default();
        p.gamma = -0.1;
        let err = p.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("jitter.gamma"));
    }

    #[test]
    fn from_flags_ties_crop_and_flip_to_pretraining() {
        let cfg = PreprocessConfig::from_flags(true, false, 96);
        assert_eq!(cfg.image_size, (96, 96));
        assert!(!cfg.distort && !cfg.crop && !cfg.flip);
        assert!(cfg.test_crop);

        let cfg = PreprocessConfig::from_flags(true, true, 96);
        assert!(cfg.distort && cfg.crop && cfg.flip);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = PreprocessConfig::default();
        cfg.flip_probability = 1.5;
        assert!(cfg.validate().unwrap_err().is_configuration());

        let mut cfg = PreprocessConfig::default();
        cfg.image_size = (0, 10);
        assert!(matches!(cfg.validate(), Err(Error::ZeroSize { size: 0 })));

        let mut cfg = PreprocessConfig::default();
        cfg.area_range = (0.9, 0.5);
        assert!(cfg.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn with_channels_pins_the_layout() {
        let cfg = PreprocessConfig::from_flags(true, true, 32).with_channels(1, Some(2));
        assert_eq!(cfg.image_channels, Some(1));
        assert_eq!(cfg.mask_channels, Some(2));
        assert!(cfg.validate().is_ok());

        let cfg = PreprocessConfig::default().with_channels(3, Some(0));
        assert!(cfg.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() -> Result<()> {
        let cfg: PreprocessConfig =
            serde_json::from_str(r#"{ "image_size": [32, 48], "is_training": true }"#)?;
        assert_eq!(cfg.image_size, (32, 48));
        assert!(cfg.is_training);
        assert_eq!(cfg.mask_channels, None);
        assert_eq!(cfg.area_range, (0.5625, 1.0));
        Ok(())
    }
}
