//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Separates caller contract violations (`Configuration`) from tensor layout
//! problems (`Shape`), and converts underlying I/O, codec and JSON errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid configuration: {arg}={value}")]
    Configuration { arg: &'static str, value: String },

    #[error("Shape error in {context}: expected {expected:?}, got {actual:?}")]
    Shape {
        context: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Size must be greater than 0, got: {size}")]
    ZeroSize { size: usize },

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }

    pub fn configuration<V: std::fmt::Display>(arg: &'static str, value: V) -> Self {
        Error::Configuration {
            arg,
            value: value.to_string(),
        }
    }

    pub fn shape(context: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        Error::Shape {
            context,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// True for caller contract violations that no retry can fix.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. } | Error::ZeroSize { .. })
    }

    pub fn is_shape(&self) -> bool {
        matches!(self, Error::Shape { .. })
    }
}
