use serde::{Deserialize, Serialize};

/// Minimum mean intensity the plant needs before time starts counting as
/// productive light. Matches the 8-bit intensity scale of the frames.
pub const DEFAULT_LIGHT_THRESHOLD: f32 = 90.0;

/// Binary light classification for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightStatus {
    Sufficient,
    Insufficient,
}

impl LightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LightStatus::Sufficient => "sufficient",
            LightStatus::Insufficient => "insufficient",
        }
    }

    /// Operator-facing label shown on the overlay.
    pub fn label(&self) -> &'static str {
        match self {
            LightStatus::Sufficient => "IDEAL",
            LightStatus::Insufficient => "LOW LIGHT!",
        }
    }

    pub fn is_sufficient(&self) -> bool {
        matches!(self, LightStatus::Sufficient)
    }
}

/// Pure comparison against the fixed threshold. There is no hysteresis: a
/// single frame crossing the threshold flips the status immediately.
pub fn classify(luminance: f32, threshold: f32) -> LightStatus {
    if luminance >= threshold {
        LightStatus::Sufficient
    } else {
        LightStatus::Insufficient
    }
}
