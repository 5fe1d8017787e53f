//! High-level, ergonomic library API: build a `Preprocessor` from a
//! `PreprocessConfig`, run it on raw images, and process batches in parallel
//! with one independent random stream per item. Prefer these entrypoints over
//! the low-level processing modules when integrating ssaug.
use ndarray::Array3;
use ndarray::parallel::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::core::params::PreprocessConfig;
use crate::core::processing::convert::RawImage;
use crate::core::processing::pipeline::{EvalPreprocessor, Preprocessed, TrainPreprocessor};
use crate::error::Result;
use crate::types::Mode;

/// A preprocessing callable bound to one immutable configuration.
#[derive(Debug)]
pub struct Preprocessor {
    config: PreprocessConfig,
    pipeline: Pipeline,
}

#[derive(Debug)]
enum Pipeline {
    Train(TrainPreprocessor),
    Eval(EvalPreprocessor),
}

impl Preprocessor {
    pub fn new(config: &PreprocessConfig) -> Result<Self> {
        config.validate()?;
        let pipeline = if config.is_training {
            Pipeline::Train(TrainPreprocessor::new(config)?)
        } else {
            Pipeline::Eval(EvalPreprocessor::new(config)?)
        };
        Ok(Self {
            config: config.clone(),
            pipeline,
        })
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        match self.pipeline {
            Pipeline::Train(_) => Mode::Train,
            Pipeline::Eval(_) => Mode::Eval,
        }
    }

    /// Normalizes `image` to `f32` in [0,1] and runs the configured pipeline.
    /// The evaluation pipeline never touches `rng`.
    pub fn run<R: Rng>(
        &self,
        image: RawImage,
        mask: Option<Array3<f32>>,
        rng: &mut R,
    ) -> Result<Preprocessed> {
        let encoding = image.encoding();
        let image = image.into_unit_float();
        debug!(
            "Preprocessing {:?} {} image (mask: {}) in {} mode",
            image.dim(),
            encoding,
            mask.is_some(),
            self.mode()
        );
        match &self.pipeline {
            Pipeline::Train(train) => train.apply(image, mask, rng),
            Pipeline::Eval(eval) => eval.apply(image, mask),
        }
    }
}

/// One-shot entry point: builds the pipeline for `config` and runs it once.
pub fn preprocess_image<R: Rng>(
    image: RawImage,
    mask: Option<Array3<f32>>,
    config: &PreprocessConfig,
    rng: &mut R,
) -> Result<Preprocessed> {
    Preprocessor::new(config)?.run(image, mask, rng)
}

/// Builds the standard preprocessing callable for a square `image_size`:
/// distortions, cropping and flipping follow `is_pretrain`, evaluation center
/// crops.
pub fn get_preprocess_fn(
    is_training: bool,
    is_pretrain: bool,
    image_size: usize,
) -> Result<Preprocessor> {
    let config = PreprocessConfig::from_flags(is_training, is_pretrain, image_size);
    info!(
        "Building {} preprocessor: size={} distort={}",
        if is_training { "train" } else { "eval" },
        image_size,
        config.distort
    );
    Preprocessor::new(&config)
}

/// Independent generator for item `index` of a run seeded with `base_seed`.
pub fn stream_rng(base_seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(base_seed.wrapping_add(index as u64))
}

/// Summary of a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub errors: usize,
}

#[derive(Debug)]
pub struct BatchOutput {
    pub results: Vec<Result<Preprocessed>>,
    pub report: BatchReport,
}

/// Runs `preprocessor` over `items` in parallel. Item `i` draws from
/// `stream_rng(base_seed, i)`, so results do not depend on scheduling.
pub fn preprocess_batch(
    items: Vec<(RawImage, Option<Array3<f32>>)>,
    preprocessor: &Preprocessor,
    base_seed: u64,
) -> BatchOutput {
    let total = items.len();
    let results: Vec<Result<Preprocessed>> = items
        .into_par_iter()
        .enumerate()
        .map(|(index, (image, mask))| {
            let mut rng = stream_rng(base_seed, index);
            preprocessor.run(image, mask, &mut rng)
        })
        .collect();

    let mut report = BatchReport::default();
    for (index, result) in results.iter().enumerate() {
        match result {
            Ok(_) => report.processed += 1,
            Err(e) => {
                warn!("Error preprocessing item {}: {}", index, e);
                report.errors += 1;
            }
        }
    }
    info!(
        "Batch complete: {} items, processed={}, errors={}",
        total, report.processed, report.errors
    );
    BatchOutput { results, report }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_selects_mode_from_is_training() -> Result<()> {
        assert_eq!(get_preprocess_fn(true, true, 32)?.mode(), Mode::Train);
        assert_eq!(get_preprocess_fn(false, true, 32)?.mode(), Mode::Eval);
        Ok(())
    }

    #[test]
    fn factory_rejects_zero_size() {
        assert!(get_preprocess_fn(true, true, 0).unwrap_err().is_configuration());
    }

    #[test]
    fn u8_input_is_normalized_before_eval() -> Result<()> {
        let pre = get_preprocess_fn(false, false, 4)?;
        let raw = RawImage::from(Array3::from_elem((4, 4, 3), 255u8));
        let out = pre.run(raw, None, &mut stream_rng(0, 0))?;
        assert!(out.image.iter().all(|&v| v == 1.0));
        Ok(())
    }

    #[test]
    fn batch_is_independent_of_scheduling() -> Result<()> {
        let pre = get_preprocess_fn(true, true, 16)?;
        let items: Vec<_> = (0..8)
            .map(|i| {
                let img = Array3::from_shape_fn((20, 20, 3), |(r, c, ch)| {
                    ((r + c + ch + i) % 7) as f32 / 6.0
                });
                (RawImage::from(img), None)
            })
            .collect();

        let first = preprocess_batch(items.clone(), &pre, 99);
        assert_eq!(first.report, BatchReport { processed: 8, errors: 0 });

        for (index, (image, mask)) in items.into_iter().enumerate() {
            let expected = pre.run(image, mask, &mut stream_rng(99, index))?;
            let got = first.results[index].as_ref().expect("item succeeded");
            assert_eq!(got, &expected);
        }
        Ok(())
    }

    #[test]
    fn batch_counts_failures() -> Result<()> {
        let pre = get_preprocess_fn(true, true, 8)?;
        let good = (RawImage::from(Array3::from_elem((8, 8, 3), 0.5f32)), None);
        let bad = (
            RawImage::from(Array3::from_elem((8, 8, 3), 0.5f32)),
            Some(Array3::from_elem((4, 4, 1), 1.0f32)),
        );
        let out = preprocess_batch(vec![good, bad], &pre, 1);
        assert_eq!(out.report, BatchReport { processed: 1, errors: 1 });
        Ok(())
    }

    #[test]
    fn one_shot_matches_built_preprocessor() -> Result<()> {
        let config = PreprocessConfig::from_flags(true, true, 16);
        let image = Array3::from_shape_fn((24, 20, 3), |(r, c, ch)| ((r * c + ch) % 9) as f32 / 8.0);
        let mask = Array3::from_elem((24, 20, 1), 1.0f32);

        let once = preprocess_image(
            RawImage::from(image.clone()),
            Some(mask.clone()),
            &config,
            &mut stream_rng(5, 0),
        )?;
        let built = Preprocessor::new(&config)?.run(
            RawImage::from(image),
            Some(mask),
            &mut stream_rng(5, 0),
        )?;
        assert_eq!(once, built);
        Ok(())
    }

    #[test]
    fn one_shot_reports_invalid_config() {
        let mut config = PreprocessConfig::from_flags(true, true, 16);
        config.blur_probability = 2.0;
        let raw = RawImage::from(Array3::from_elem((16, 16, 3), 0.5f32));
        let err = preprocess_image(raw, None, &config, &mut stream_rng(0, 0)).unwrap_err();
        assert!(err.is_configuration());
    }
}
