#![doc = r#"
ssaug — mask-aware image augmentation for self-supervised representation learning.

This crate turns a raw image (and an optional co-registered mask) into a
normalized `[H, W, C]` `f32` tensor in [0,1], ready for model input. Training
views get a randomly ordered photometric jitter, a random blur, an area-range
crop with resize and a random horizontal flip; evaluation views get a
deterministic center crop-or-pad. Masks ride along through every geometric
step and come back with their own channel count.

Randomness is always an explicit argument: pass a seeded generator to get the
same view twice, or one generator per item to run items in parallel.

Add dependency
--------------
```toml
[dependencies]
ssaug = "0.1"
```

Quick start: one training view
------------------------------
```rust
use ndarray::Array3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ssaug::{RawImage, get_preprocess_fn};

fn main() -> ssaug::Result<()> {
    let preprocess = get_preprocess_fn(true, true, 224)?;
    let image = RawImage::from(Array3::<u8>::from_elem((256, 256, 3), 128));
    let mask = Array3::<f32>::from_elem((256, 256, 1), 1.0);

    let mut rng = StdRng::seed_from_u64(7);
    let out = preprocess.run(image, Some(mask), &mut rng)?;
    assert_eq!(out.image.dim(), (224, 224, 3));
    assert_eq!(out.mask.map(|m| m.dim()), Some((224, 224, 1)));
    Ok(())
}
```

Custom configuration
--------------------
```rust
use ssaug::{BrightnessImpl, JitterParams, PreprocessConfig, Preprocessor};

fn main() -> ssaug::Result<()> {
    let config = PreprocessConfig {
        image_size: (96, 128),
        is_training: true,
        jitter: JitterParams::from_strength(0.5).with_brightness_impl(BrightnessImpl::V2),
        area_range: (0.25, 1.0),
        ..PreprocessConfig::default()
    };
    let preprocessor = Preprocessor::new(&config)?;
    assert_eq!(preprocessor.config().image_size, (96, 128));
    Ok(())
}
```

Batch helpers
-------------
```rust
use ndarray::Array3;
use ssaug::{RawImage, get_preprocess_fn, preprocess_batch};

fn main() -> ssaug::Result<()> {
    let preprocess = get_preprocess_fn(true, true, 32)?;
    let items = (0..4)
        .map(|_| (RawImage::from(Array3::<f32>::from_elem((40, 40, 3), 0.5)), None))
        .collect();
    let batch = preprocess_batch(items, &preprocess, 1234);
    assert_eq!(batch.report.processed, 4);
    Ok(())
}
```

Error handling
--------------
All fallible functions return `ssaug::Result<T>`. `Error::Configuration` marks
caller contract violations (bad probability, negative magnitude), and
`Error::Shape` marks image/mask layout problems.

Useful modules
--------------
- [`api`] — `Preprocessor`, factory and batch entry points.
- [`core`] — kernels, gate, jitter composer, geometry and the train/eval pipelines.
- [`types`] — shared enums (`JitterKind`, `BrightnessImpl`, `PixelEncoding`, `Mode`).
- [`io`] — image/mask file decoding and encoding used by the CLI.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::params::{JitterParams, PreprocessConfig};
pub use crate::core::processing::convert::RawImage;
pub use crate::core::processing::pipeline::{EvalPreprocessor, Preprocessed, TrainPreprocessor};
pub use error::{Error, Result};
pub use types::{BrightnessImpl, JitterKind, Mode, PixelEncoding};

// Building blocks
pub use crate::core::processing::gate::RandomApply;
pub use crate::core::processing::jitter::{JitterComposer, JitterKernels, clamp_unit, sample_permutation};
pub use crate::core::processing::kernels::PhotometricKernel;

// High-level API re-exports
pub use api::{
    BatchOutput, BatchReport, Preprocessor, get_preprocess_fn, preprocess_batch,
    preprocess_image, stream_rng,
};
