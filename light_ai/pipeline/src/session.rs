//! Loop controller and per-run state.
//!
//! SPDX-License-Identifier: GPL-3.0-or-later

use crate::classify::{classify, LightStatus};
use crate::frame::{Frame, Region};
use crate::luminance;
use crate::report::{self, Report};
use crate::telemetry::{timestamp_ms, TelemetryPacket, TelemetryRun};
use crate::window::{LuminanceSample, TelemetryWindow};
use log::debug;
use std::time::{Duration, Instant};

/// The two run-lifetime accumulators. Both only ever grow; they are owned by
/// the session rather than living in module globals so a run can be driven
/// entirely from tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct DurationAccumulator {
    total: Duration,
    sufficient: Duration,
}

impl DurationAccumulator {
    /// Advances the accumulators by one loop iteration. `dt` always counts
    /// toward the total; it counts toward sufficient time only while the
    /// light is classified as sufficient.
    pub fn tick(&mut self, dt: Duration, status: LightStatus) {
        self.total += dt;
        if status.is_sufficient() {
            self.sufficient += dt;
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn sufficient(&self) -> Duration {
        self.sufficient
    }
}

/// Per-frame values handed to the presentation layer.
#[derive(Clone, Copy, Debug)]
pub struct Overlay {
    pub luminance: f32,
    pub sufficient_secs: f64,
    pub status: LightStatus,
}

/// Owns everything one monitoring run touches: the resolved region, the
/// threshold, both accumulators, the sliding sample window and the telemetry
/// writer. The caller feeds it frames and a clock; nothing in here blocks.
pub struct MonitorSession {
    region: Region,
    threshold: f32,
    accumulator: DurationAccumulator,
    window: TelemetryWindow,
    telemetry: TelemetryRun,
    started: Instant,
    last_tick: Instant,
    last_status: Option<LightStatus>,
}

impl MonitorSession {
    /// `now` is the session start; the first frame's `dt` is measured from it.
    pub fn new(
        frame_width: u32,
        frame_height: u32,
        region: Region,
        threshold: f32,
        mut telemetry: TelemetryRun,
        now: Instant,
    ) -> Result<Self, anyhow::Error> {
        let session_id = telemetry.session_id.clone();
        telemetry.write(&TelemetryPacket::SessionStart {
            session_id: &session_id,
            frame_width,
            frame_height,
            region,
            threshold,
            ts: timestamp_ms(),
        })?;

        Ok(MonitorSession {
            region,
            threshold,
            accumulator: DurationAccumulator::default(),
            window: TelemetryWindow::new(),
            telemetry,
            started: now,
            last_tick: now,
            last_status: None,
        })
    }

    /// One iteration of the acquisition-analysis loop: measure the region,
    /// classify it, integrate the elapsed wall-clock time, record the sample.
    /// The time step is however long this iteration actually took to come
    /// around, so a slow frame correctly contributes a larger share.
    pub fn process(&mut self, frame: &Frame, now: Instant) -> Result<Overlay, anyhow::Error> {
        let dt = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        let elapsed_secs = now.saturating_duration_since(self.started).as_secs_f64();

        let luminance = luminance::analyze(frame, &self.region)?;
        let status = classify(luminance, self.threshold);

        self.accumulator.tick(dt, status);
        self.window.push(LuminanceSample {
            elapsed_secs,
            luminance,
        });

        self.telemetry.write(&TelemetryPacket::Sample {
            elapsed_secs,
            luminance,
            status: status.as_str(),
            dt_ms: dt.as_millis(),
            ts: timestamp_ms(),
        })?;

        match self.last_status {
            Some(previous) if previous != status => {
                debug!(
                    "Status changed {} -> {} at {:.2}s",
                    previous.as_str(),
                    status.as_str(),
                    elapsed_secs
                );
                self.telemetry.write(&TelemetryPacket::StatusChange {
                    from: previous.as_str(),
                    to: status.as_str(),
                    elapsed_secs,
                    ts: timestamp_ms(),
                })?;
            }
            _ => {}
        }
        self.last_status = Some(status);

        Ok(Overlay {
            luminance,
            sufficient_secs: self.accumulator.sufficient().as_secs_f64(),
            status,
        })
    }

    /// Finalizes the run. Runs on every termination path: quit command,
    /// end-of-stream, or a bounded run completing.
    pub fn finish(mut self) -> Result<Report, anyhow::Error> {
        let report = report::generate(
            self.accumulator.total(),
            self.accumulator.sufficient(),
            &self.window,
        );

        self.telemetry.write(&TelemetryPacket::SessionEnd {
            total_secs: report.total_secs,
            sufficient_secs: report.sufficient_secs,
            efficiency_pct: report.efficiency_pct,
            ts: timestamp_ms(),
        })?;

        Ok(report)
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn accumulator(&self) -> &DurationAccumulator {
        &self.accumulator
    }

    /// Chronological (time, luminance) stream for live charting.
    pub fn window(&self) -> &TelemetryWindow {
        &self.window
    }
}
