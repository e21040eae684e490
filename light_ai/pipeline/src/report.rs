use crate::window::TelemetryWindow;
use serde::Serialize;
use std::time::Duration;

/// Floor applied to the total elapsed time before dividing, so a run that
/// ends before the clock moves still yields a defined efficiency.
pub const MIN_ELAPSED_SECS: f64 = 0.1;

/// Immutable end-of-run snapshot. Luminance statistics cover only the samples
/// still in the telemetry window; older samples were evicted and are gone.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub total_secs: f64,
    pub sufficient_secs: f64,
    pub efficiency_pct: f64,
    pub mean_luminance: f32,
    pub min_luminance: f32,
    pub max_luminance: f32,
    pub samples: usize,
}

/// Computes the final report from the accumulators and the surviving window.
/// Pure; an empty window yields zeroed luminance statistics rather than an
/// error.
pub fn generate(total: Duration, sufficient: Duration, window: &TelemetryWindow) -> Report {
    let total_secs = total.as_secs_f64();
    let sufficient_secs = sufficient.as_secs_f64();
    // The floor only replaces a clock that never moved; small real totals
    // divide as measured.
    let denominator = if total_secs <= 0.0 {
        MIN_ELAPSED_SECS
    } else {
        total_secs
    };
    let efficiency_pct = (sufficient_secs / denominator) * 100.0;

    let (mean, min, max) = if window.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let mut sum = 0.0f64;
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for sample in window.iter() {
            sum += sample.luminance as f64;
            min = min.min(sample.luminance);
            max = max.max(sample.luminance);
        }
        ((sum / window.len() as f64) as f32, min, max)
    };

    Report {
        total_secs,
        sufficient_secs,
        efficiency_pct,
        mean_luminance: mean,
        min_luminance: min,
        max_luminance: max,
        samples: window.len(),
    }
}
