//! File I/O used by the CLI: decoding images and masks into arrays and
//! writing pipeline outputs back to 8-bit image files.
pub mod reader;
pub use reader::{load_mask, load_raw_image};

pub mod writers;
pub use writers::raster::save_unit_image;
