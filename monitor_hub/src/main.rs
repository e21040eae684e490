//! Growsense monitor hub.
//!
//! Watches a live camera feed, measures the mean luminance of a chosen
//! region, and tracks how long the plant in it receives sufficient light.
//!
//! SPDX-License-Identifier: GPL-3.0-or-later

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

use anyhow::{bail, Context};
use docopt::Docopt;
use growsense_light_ai::frame::Region;
use growsense_light_ai::report::Report;
use growsense_light_ai::session::MonitorSession;
use growsense_light_ai::source::FrameSource;
use growsense_light_ai::telemetry::TelemetryRun;
use std::io::{self, BufRead};
use std::process::exit;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

mod camera;
use crate::camera::DeviceCamera;
mod display;
use crate::display::{print_report, ConsolePresenter, Presenter};

const USAGE: &str = "
Growsense monitor hub: watches a camera feed and reports how long a plant receives sufficient light.

Usage:
  growsense-monitor-hub [--camera=<index>] [--threshold=<level>] [--region=<rect>] [--max-frames=<n>] [--log-telemetry]
  growsense-monitor-hub (--version | -v)
  growsense-monitor-hub (--help | -h)

Options:
    --camera=<index>     Capture device index [default: 0]
    --threshold=<level>  Minimum mean intensity counted as sufficient light [default: 90]
    --region=<rect>      Region of interest as X,Y,W,H. Omitted or zero-area means the full frame
    --max-frames=<n>     Stop after n analyzed frames instead of running until quit
    --log-telemetry      Write per-run telemetry lines under output/runs/
    --version, -v        Show version
    --help, -h           Show help
";

#[derive(Debug, Deserialize)]
struct Args {
    flag_camera: u32,
    flag_threshold: f32,
    flag_region: Option<String>,
    flag_max_frames: Option<u64>,
    flag_log_telemetry: bool,
}

fn main() {
    let version = env!("CARGO_PKG_NAME").to_string() + ", version: " + env!("CARGO_PKG_VERSION");
    env_logger::init();

    let args: Args = Docopt::new(USAGE)
        .map(|d| d.help(true))
        .map(|d| d.version(Some(version)))
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let selection = match args.flag_region.as_deref().map(parse_region).transpose() {
        Ok(region) => region,
        Err(e) => {
            error!("{e}");
            exit(1);
        }
    };

    // Fatal startup failure: no capture device, no run.
    let mut camera = match DeviceCamera::new(args.flag_camera) {
        Ok(camera) => camera,
        Err(e) => {
            error!("Cannot open capture device {}: {e:#}", args.flag_camera);
            exit(1);
        }
    };

    let quit = spawn_quit_listener();
    println!("[{}] Monitoring. Type 'q' then Enter to stop.", camera.name());

    match run(
        &mut camera,
        selection,
        args.flag_threshold,
        args.flag_max_frames,
        args.flag_log_telemetry,
        &quit,
    ) {
        Ok(Some(report)) => {
            print_report(&report);
            match serde_json::to_string(&report) {
                Ok(line) => info!("report: {line}"),
                Err(e) => warn!("Failed to serialize the report: {e}"),
            }
        }
        Ok(None) => {
            println!("No frames captured; nothing to report.");
        }
        Err(e) => {
            error!("Monitoring run failed: {e:#}");
            exit(1);
        }
    }
}

/// The acquisition-analysis loop. Returns `Ok(None)` when the stream ended
/// before the first frame. Finalization runs on every exit path below; the
/// capture device itself is released by `DeviceCamera`'s `Drop` in `main`.
fn run(
    camera: &mut DeviceCamera,
    selection: Option<Region>,
    threshold: f32,
    max_frames: Option<u64>,
    log_telemetry: bool,
    quit: &AtomicBool,
) -> Result<Option<Report>, anyhow::Error> {
    // The region is resolved once, against the first captured frame.
    let first = match camera.next_frame()? {
        Some(frame) => frame,
        None => return Ok(None),
    };
    let region = Region::resolve(selection, first.width, first.height);
    info!(
        "Analyzing {}x{} region at ({}, {}) of {}x{} frames, threshold {}",
        region.width, region.height, region.x, region.y, first.width, first.height, threshold
    );

    let telemetry = TelemetryRun::new(log_telemetry)?;
    let mut session = MonitorSession::new(
        first.width,
        first.height,
        region,
        threshold,
        telemetry,
        Instant::now(),
    )?;
    let mut presenter = ConsolePresenter::new();
    let mut analyzed: u64 = 0;

    loop {
        // Cooperative cancellation, checked once per iteration.
        if quit.load(Ordering::SeqCst) {
            info!("Quit requested; finalizing.");
            break;
        }

        let frame = match camera.next_frame()? {
            Some(frame) => frame,
            None => {
                info!("Stream ended; finalizing.");
                break;
            }
        };

        let overlay = session.process(&frame, Instant::now())?;
        presenter.render(&overlay);

        analyzed += 1;
        if let Some(max) = max_frames {
            if analyzed >= max {
                info!("Analyzed {analyzed} frames; finalizing.");
                break;
            }
        }
    }

    Ok(Some(session.finish()?))
}

/// Watches stdin for a 'q' line and raises the shared quit flag. The loop
/// only ever reads the flag, so a plain atomic is all the synchronization
/// this needs.
fn spawn_quit_listener() -> Arc<AtomicBool> {
    let quit = Arc::new(AtomicBool::new(false));
    let quit_flag = Arc::clone(&quit);

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                    quit_flag.store(true, Ordering::SeqCst);
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });

    quit
}

fn parse_region(raw: &str) -> Result<Region, anyhow::Error> {
    let parts: Vec<u32> = raw
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("Invalid --region value {raw:?}"))?;
    if parts.len() != 4 {
        bail!("--region expects four integers X,Y,W,H, got {raw:?}");
    }
    Ok(Region::new(parts[0], parts[1], parts[2], parts[3]))
}
