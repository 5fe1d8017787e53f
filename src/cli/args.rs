use clap::Parser;
use std::path::PathBuf;

use ssaug::{BrightnessImpl, Mode};

#[derive(Parser, Debug)]
#[command(name = "ssaug", version, about = "ssaug CLI")]
pub struct CliArgs {
    /// Input image file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Optional mask file, co-registered with the input (read as grayscale)
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// Output image file; the extension selects the format
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output file for the transformed mask
    #[arg(long)]
    pub mask_output: Option<PathBuf>,

    /// Square output size in pixels
    #[arg(long, default_value_t = 224)]
    pub size: usize,

    /// Pipeline mode (train or eval)
    #[arg(long, value_enum, default_value_t = Mode::Train)]
    pub mode: Mode,

    /// Enable photometric distortion, random crop and flip in train mode
    #[arg(long, default_value_t = false)]
    pub pretrain: bool,

    /// Brightness kernel variant (v1 additive, v2 multiplicative)
    #[arg(long, value_enum, default_value_t = BrightnessImpl::V1)]
    pub brightness_impl: BrightnessImpl,

    /// Seed of the random stream; view k uses stream k
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Number of augmented views to write (suffixed _0, _1, ... when > 1)
    #[arg(long, default_value_t = 1)]
    pub views: usize,

    /// JSON config file; overrides --size, --mode, --pretrain and --brightness-impl
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
