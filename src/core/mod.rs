//! Core processing building blocks: photometric kernels, the random-apply gate,
//! the jitter composer, geometric helpers, and the train/eval pipelines.
//! These are the primitives consumed by the high-level `api` module.
pub mod params;
pub mod processing;
