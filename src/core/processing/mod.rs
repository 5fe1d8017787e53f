pub mod convert;
pub mod gate;
pub mod geometry;
pub mod jitter;
pub mod kernels;
pub mod padding;
pub mod pipeline;
pub mod resize;
