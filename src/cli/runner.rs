use std::path::{Path, PathBuf};

use ndarray::Array3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ssaug::io::{load_mask, load_raw_image, save_unit_image};
use ssaug::{Mode, PreprocessConfig, Preprocessor, RawImage, stream_rng};

use super::args::CliArgs;
use super::errors::AppError;

/// Builds the config from `--config` or the flags. Channel counts the config
/// leaves open are taken from the loaded files.
fn build_config(
    args: &CliArgs,
    raw: &RawImage,
    mask: Option<&Array3<f32>>,
) -> Result<PreprocessConfig, AppError> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            PreprocessConfig::from_json_file(path)?
        }
        None => {
            if args.size == 0 {
                return Err(AppError::ZeroSize { size: args.size });
            }
            let mut config =
                PreprocessConfig::from_flags(args.mode == Mode::Train, args.pretrain, args.size);
            config.jitter = config.jitter.with_brightness_impl(args.brightness_impl);
            config
        }
    };
    let image_channels = config.image_channels.unwrap_or(raw.dim().2);
    let mask_channels = config.mask_channels.or(mask.map(|m| m.dim().2));
    Ok(config.with_channels(image_channels, mask_channels))
}

/// `out.png` for a single view, `out_0.png`, `out_1.png`, ... otherwise.
pub fn view_path(output: &Path, view: usize, views: usize) -> Result<PathBuf, AppError> {
    if views == 1 {
        return Ok(output.to_path_buf());
    }
    let stem = output
        .file_stem()
        .ok_or_else(|| AppError::InvalidOutput {
            path: output.display().to_string(),
        })?
        .to_string_lossy();
    let name = match output.extension() {
        Some(ext) => format!("{}_{}.{}", stem, view, ext.to_string_lossy()),
        None => format!("{}_{}", stem, view),
    };
    Ok(output.with_file_name(name))
}

fn load_inputs(args: &CliArgs) -> Result<(RawImage, Option<Array3<f32>>), AppError> {
    let raw = load_raw_image(&args.input)?;
    let mask = match &args.mask {
        Some(path) => Some(load_mask(path)?),
        None => None,
    };
    info!(
        "Input {:?}: {:?} {} (mask: {})",
        args.input,
        raw.dim(),
        raw.encoding(),
        mask.is_some()
    );
    Ok((raw, mask))
}

fn process_views(
    args: &CliArgs,
    preprocessor: &Preprocessor,
    raw: RawImage,
    mask: Option<Array3<f32>>,
) -> Result<(), AppError> {
    for view in 0..args.views {
        let mut rng = stream_rng(args.seed, view);
        let out = preprocessor.run(raw.clone(), mask.clone(), &mut rng)?;

        let image_path = view_path(&args.output, view, args.views)?;
        save_unit_image(&out.image, &image_path)?;

        if let (Some(mask_output), Some(mask)) = (&args.mask_output, &out.mask) {
            let mask_path = view_path(mask_output, view, args.views)?;
            save_unit_image(mask, &mask_path)?;
        }
    }
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }

    if args.views == 0 {
        return Err(AppError::NoViews { views: args.views }.into());
    }
    if args.mask_output.is_some() && args.mask.is_none() {
        return Err(AppError::MaskOutputWithoutMask.into());
    }

    let (raw, mask) = load_inputs(&args)?;
    let config = build_config(&args, &raw, mask.as_ref())?;
    let preprocessor = Preprocessor::new(&config).map_err(AppError::from)?;
    info!(
        "Mode: {}, size: {:?}, distort: {}, views: {}, seed: {}",
        preprocessor.mode(),
        config.image_size,
        config.distort,
        args.views,
        args.seed
    );

    process_views(&args, &preprocessor, raw, mask)?;
    info!("Successfully processed: {:?} -> {:?}", args.input, args.output);
    Ok(())
}
