//! Shared types and enums used across ssaug.
//! Includes the photometric `JitterKind`, the brightness `BrightnessImpl`
//! variant tag, the `PixelEncoding` of raw inputs and the pipeline `Mode`.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One of the four photometric perturbations composed by the jitter stage.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum JitterKind {
    Brightness,
    Contrast,
    Gamma,
    Noise,
}

impl JitterKind {
    /// Slot order used by the composer: 0→brightness, 1→contrast, 2→gamma, 3→noise.
    pub const ALL: [JitterKind; 4] = [
        JitterKind::Brightness,
        JitterKind::Contrast,
        JitterKind::Gamma,
        JitterKind::Noise,
    ];

    pub fn from_slot(slot: usize) -> Option<Self> {
        match slot {
            0 => Some(JitterKind::Brightness),
            1 => Some(JitterKind::Contrast),
            2 => Some(JitterKind::Gamma),
            3 => Some(JitterKind::Noise),
            _ => None,
        }
    }

    pub fn slot(self) -> usize {
        match self {
            JitterKind::Brightness => 0,
            JitterKind::Contrast => 1,
            JitterKind::Gamma => 2,
            JitterKind::Noise => 3,
        }
    }
}

impl std::fmt::Display for JitterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JitterKind::Brightness => "Brightness",
            JitterKind::Contrast => "Contrast",
            JitterKind::Gamma => "Gamma",
            JitterKind::Noise => "Noise",
        };
        write!(f, "{}", s)
    }
}

/// Brightness kernel variant: `V1` shifts by an additive delta, `V2` scales
/// by a multiplicative factor.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BrightnessImpl {
    #[default]
    V1,
    V2,
}

impl std::fmt::Display for BrightnessImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrightnessImpl::V1 => write!(f, "v1"),
            BrightnessImpl::V2 => write!(f, "v2"),
        }
    }
}

/// Element type of a raw image before normalization to `f32` in [0,1].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum PixelEncoding {
    U8,
    U16,
    F32,
    F64,
}

impl std::fmt::Display for PixelEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelEncoding::U8 => write!(f, "u8"),
            PixelEncoding::U16 => write!(f, "u16"),
            PixelEncoding::F32 => write!(f, "f32"),
            PixelEncoding::F64 => write!(f, "f64"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum Mode {
    Train,
    Eval,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Train => write!(f, "Train"),
            Mode::Eval => write!(f, "Eval"),
        }
    }
}
