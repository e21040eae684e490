//! Console presentation for the monitor hub. Stands in for the graphical
//! HUD and chart windows, which live outside the analysis core.

use growsense_light_ai::report::Report;
use growsense_light_ai::session::Overlay;
use std::ops::Add;
use std::time::{Duration, SystemTime};

pub trait Presenter {
    fn render(&mut self, overlay: &Overlay);
}

/// Logs every sample at debug level and a readable status line once per
/// second, so the default output stays calm at camera frame rates.
pub struct ConsolePresenter {
    next_status_line: Option<SystemTime>,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        ConsolePresenter {
            next_status_line: None,
        }
    }
}

impl Presenter for ConsolePresenter {
    fn render(&mut self, overlay: &Overlay) {
        debug!(
            "luminance {:.1}, {} for {:.1}s",
            overlay.luminance,
            overlay.status.as_str(),
            overlay.sufficient_secs
        );

        if self.next_status_line.is_none()
            || self.next_status_line.unwrap().le(&SystemTime::now())
        {
            info!(
                "Light: {:.1} | {} | sufficient for {:.1}s",
                overlay.luminance,
                overlay.status.label(),
                overlay.sufficient_secs
            );
            self.next_status_line = Some(SystemTime::now().add(Duration::from_secs(1)));
        }
    }
}

/// Terminal rendering of the end-of-run report.
pub fn print_report(report: &Report) {
    println!();
    println!("--- ANALYSIS REPORT ---");
    println!("Total time:        {:.1} s", report.total_secs);
    println!("Sufficient light:  {:.1} s", report.sufficient_secs);
    println!("Efficiency:        {:.1} %", report.efficiency_pct);
    println!(
        "Light level:       avg {:.1} (min {:.1}, max {:.1}) over the last {} samples",
        report.mean_luminance, report.min_luminance, report.max_luminance, report.samples
    );
}
