//! Command Line Interface (CLI) layer for ssaug.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that loads an image (and optional
//! mask), runs the train or eval pipeline, and writes the resulting views.
//!
//! If you are embedding ssaug into another application, prefer using
//! the high-level `ssaug::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
