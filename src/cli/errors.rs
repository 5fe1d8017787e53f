use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Size must be greater than 0, got: {size}")]
    ZeroSize { size: usize },

    #[error("At least one view is required, got: {views}")]
    NoViews { views: usize },

    #[error("--mask-output requires --mask")]
    MaskOutputWithoutMask,

    #[error("Output path has no file stem: {path}")]
    InvalidOutput { path: String },

    #[error(transparent)]
    Pipeline(#[from] ssaug::Error),
}
