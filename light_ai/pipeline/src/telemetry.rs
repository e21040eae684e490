use crate::frame::Region;
use serde::Serialize;
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

/// Structured telemetry message logged while the monitor runs. One JSON line
/// per packet in the run's log file.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TelemetryPacket<'a> {
    // Emitted once, after the region has been resolved on the first frame.
    SessionStart {
        session_id: &'a str,
        frame_width: u32,
        frame_height: u32,
        region: Region,
        threshold: f32,
        ts: u128,
    },
    // One measurement of the region, every loop iteration.
    Sample {
        elapsed_secs: f64,
        luminance: f32,
        status: &'a str,
        dt_ms: u128,
        ts: u128,
    },
    // The classification flipped between this frame and the previous one.
    StatusChange {
        from: &'a str,
        to: &'a str,
        elapsed_secs: f64,
        ts: u128,
    },
    // Final accumulator values at shutdown.
    SessionEnd {
        total_secs: f64,
        sufficient_secs: f64,
        efficiency_pct: f64,
        ts: u128,
    },
}

/// Current wall-clock time in milliseconds since the epoch, for packet stamps.
pub fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// A telemetry logging session for one monitor run. Writes structured lines
/// to a per-run log file, or nothing at all when not activated (the default;
/// the run log is opt-in and is never read back by the monitor).
pub struct TelemetryRun {
    pub session_id: String,
    log: Option<File>,
}

impl TelemetryRun {
    pub fn new(activated: bool) -> Result<Self, anyhow::Error> {
        let session_id = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();

        if activated {
            let base = Path::new("output").join("runs").join(&session_id);
            std::fs::create_dir_all(&base)?;

            let log = OpenOptions::new()
                .append(true)
                .create(true)
                .open(base.join("telemetry.log"))?;

            Ok(Self {
                session_id,
                log: Some(log),
            })
        } else {
            Ok(Self {
                session_id,
                log: None,
            })
        }
    }

    /// Serializes and appends one packet as a line to the run log.
    pub fn write(&mut self, pkt: &TelemetryPacket) -> Result<(), anyhow::Error> {
        if let Some(log) = &mut self.log {
            let line = serde_json::to_string(pkt)?;
            writeln!(log, "{line}")?;
        }
        Ok(())
    }

    pub fn is_activated(&self) -> bool {
        self.log.is_some()
    }
}
