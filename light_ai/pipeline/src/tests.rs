//! SPDX-License-Identifier: GPL-3.0-or-later

#[cfg(test)]
mod tests {
    use crate::classify::{classify, LightStatus, DEFAULT_LIGHT_THRESHOLD};
    use crate::frame::{Frame, Region};
    use crate::luminance;
    use crate::report;
    use crate::session::{DurationAccumulator, MonitorSession};
    use crate::source::{FrameSource, ReplaySource};
    use crate::telemetry::TelemetryRun;
    use crate::window::{LuminanceSample, TelemetryWindow, WINDOW_CAPACITY};
    use std::time::{Duration, Instant};

    #[test]
    fn zero_area_selection_falls_back_to_full_frame() {
        let degenerate = Some(Region::new(120, 80, 0, 0));
        assert_eq!(
            Region::resolve(degenerate, 640, 480),
            Region::new(0, 0, 640, 480)
        );
        assert_eq!(
            Region::resolve(None, 640, 480),
            Region::new(0, 0, 640, 480)
        );
        assert_eq!(
            Region::resolve(Some(Region::new(10, 10, 100, 0)), 640, 480),
            Region::new(0, 0, 640, 480)
        );
    }

    #[test]
    fn oversized_selection_is_clamped() {
        let resolved = Region::resolve(Some(Region::new(600, 400, 100, 100)), 640, 480);
        assert_eq!(resolved, Region::new(600, 400, 40, 80));
        assert!(resolved.fits(640, 480));

        // Clamping that empties the rectangle falls back to the full frame.
        let off_frame = Region::resolve(Some(Region::new(640, 480, 10, 10)), 640, 480);
        assert_eq!(off_frame, Region::new(0, 0, 640, 480));
    }

    #[test]
    fn analyzer_is_deterministic_and_bounded() {
        let frame = gradient_frame(64, 48);
        let region = Region::new(8, 8, 32, 24);

        let first = luminance::analyze(&frame, &region).unwrap();
        let second = luminance::analyze(&frame, &region).unwrap();
        assert_eq!(first, second);
        assert!((0.0..=255.0).contains(&first));
    }

    #[test]
    fn analyzer_measures_only_the_region() {
        // Dark frame with a bright 10x10 patch; the region covers the patch.
        let mut data = vec![10u8; 100 * 100 * 3];
        for y in 5..15 {
            for x in 5..15 {
                let base = (y * 100 + x) * 3;
                data[base..base + 3].copy_from_slice(&[200, 200, 200]);
            }
        }
        let frame = Frame::new(100, 100, 3, data).unwrap();

        let patch = Region::new(5, 5, 10, 10);
        assert_eq!(luminance::analyze(&frame, &patch).unwrap(), 200.0);

        let outside = Region::new(50, 50, 10, 10);
        assert_eq!(luminance::analyze(&frame, &outside).unwrap(), 10.0);
    }

    #[test]
    fn analyzer_is_channel_order_invariant() {
        let rgb = solid_frame(16, 16, [10, 200, 30]);
        let bgr = solid_frame(16, 16, [30, 200, 10]);
        let full = Region::full_frame(16, 16);

        assert_eq!(
            luminance::analyze(&rgb, &full).unwrap(),
            luminance::analyze(&bgr, &full).unwrap()
        );
    }

    #[test]
    fn analyzer_rejects_region_outside_frame() {
        let frame = solid_frame(32, 32, [100, 100, 100]);
        let region = Region::new(16, 16, 32, 32);
        assert!(luminance::analyze(&frame, &region).is_err());
    }

    #[test]
    fn single_channel_frames_are_supported() {
        let frame = Frame::new(8, 8, 1, vec![120u8; 64]).unwrap();
        let value = luminance::analyze(&frame, &Region::full_frame(8, 8)).unwrap();
        assert_eq!(value, 120.0);
    }

    #[test]
    fn classification_has_no_hysteresis() {
        assert_eq!(classify(90.0, 90.0), LightStatus::Sufficient);
        assert_eq!(classify(89.999, 90.0), LightStatus::Insufficient);
        assert_eq!(classify(255.0, DEFAULT_LIGHT_THRESHOLD), LightStatus::Sufficient);
        assert_eq!(classify(0.0, DEFAULT_LIGHT_THRESHOLD), LightStatus::Insufficient);
    }

    #[test]
    fn accumulator_sums_dt_by_status() {
        let steps = [
            (Duration::from_millis(100), LightStatus::Sufficient),
            (Duration::from_millis(250), LightStatus::Insufficient),
            (Duration::from_millis(40), LightStatus::Sufficient),
            (Duration::from_millis(1000), LightStatus::Insufficient),
            (Duration::from_millis(7), LightStatus::Sufficient),
        ];

        let mut accumulator = DurationAccumulator::default();
        for (dt, status) in steps {
            accumulator.tick(dt, status);
        }

        let expected_total: Duration = steps.iter().map(|(dt, _)| *dt).sum();
        let expected_sufficient: Duration = steps
            .iter()
            .filter(|(_, s)| s.is_sufficient())
            .map(|(dt, _)| *dt)
            .sum();
        assert_eq!(accumulator.total(), expected_total);
        assert_eq!(accumulator.sufficient(), expected_sufficient);
    }

    #[test]
    fn window_keeps_the_last_n_samples_in_order() {
        let mut window = TelemetryWindow::with_capacity(WINDOW_CAPACITY);
        for i in 0..150 {
            window.push(sample(i));
        }

        assert_eq!(window.len(), 100);
        let collected: Vec<f32> = window.iter().map(|s| s.luminance).collect();
        assert_eq!(collected[0], 50.0);
        assert_eq!(collected[99], 149.0);
        for pair in collected.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert_eq!(window.latest().unwrap().luminance, 149.0);
    }

    #[test]
    fn window_below_capacity_keeps_everything() {
        let mut window = TelemetryWindow::with_capacity(5);
        for i in 0..3 {
            window.push(sample(i));
        }
        assert_eq!(window.len(), 3);
        let collected: Vec<f32> = window.iter().map(|s| s.luminance).collect();
        assert_eq!(collected, vec![0.0, 1.0, 2.0]);
        assert_eq!(window.latest().unwrap().luminance, 2.0);
    }

    #[test]
    fn efficiency_stays_within_bounds() {
        let mut window = TelemetryWindow::new();
        window.push(sample(0));

        let report = report::generate(
            Duration::from_secs(10),
            Duration::from_secs(4),
            &window,
        );
        assert!((report.efficiency_pct - 40.0).abs() < 1e-9);

        let all = report::generate(Duration::from_secs(7), Duration::from_secs(7), &window);
        assert!(all.efficiency_pct <= 100.0);
        assert!(all.efficiency_pct >= 0.0);
    }

    #[test]
    fn zero_elapsed_time_never_divides_by_zero() {
        let window = TelemetryWindow::new();
        let report = report::generate(Duration::ZERO, Duration::ZERO, &window);
        assert!(report.efficiency_pct.is_finite());
        assert_eq!(report.efficiency_pct, 0.0);
    }

    #[test]
    fn empty_window_reports_zeroed_statistics() {
        let window = TelemetryWindow::new();
        let report = report::generate(Duration::from_secs(3), Duration::from_secs(1), &window);
        assert_eq!(report.mean_luminance, 0.0);
        assert_eq!(report.min_luminance, 0.0);
        assert_eq!(report.max_luminance, 0.0);
        assert_eq!(report.samples, 0);
    }

    #[test]
    fn window_statistics_cover_only_surviving_samples() {
        let mut window = TelemetryWindow::with_capacity(3);
        for value in [10, 20, 200, 210, 220] {
            window.push(sample(value));
        }
        let report = report::generate(Duration::from_secs(1), Duration::ZERO, &window);
        assert_eq!(report.min_luminance, 200.0);
        assert_eq!(report.max_luminance, 220.0);
        assert_eq!(report.mean_luminance, 210.0);
        assert_eq!(report.samples, 3);
    }

    #[test]
    fn bright_run_counts_as_fully_sufficient() {
        let report = run_constant_session(120, 90.0);
        assert!((report.total_secs - 5.0).abs() < 1e-6);
        assert!((report.sufficient_secs - 5.0).abs() < 1e-6);
        assert!((report.efficiency_pct - 100.0).abs() < 1e-6);
        assert_eq!(report.mean_luminance, 120.0);
    }

    #[test]
    fn dark_run_accumulates_no_sufficient_time() {
        let report = run_constant_session(50, 90.0);
        assert!((report.total_secs - 5.0).abs() < 1e-6);
        assert_eq!(report.sufficient_secs, 0.0);
        assert_eq!(report.efficiency_pct, 0.0);
        assert_eq!(report.mean_luminance, 50.0);
    }

    #[test]
    fn replay_source_signals_end_of_stream() {
        let frames = vec![
            solid_frame(4, 4, [1, 1, 1]),
            solid_frame(4, 4, [2, 2, 2]),
            solid_frame(4, 4, [3, 3, 3]),
        ];
        let mut source = ReplaySource::new(frames);

        for _ in 0..3 {
            assert!(source.next_frame().unwrap().is_some());
        }
        assert!(source.next_frame().unwrap().is_none());
        assert!(source.next_frame().unwrap().is_none());
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn deactivated_telemetry_writes_nothing() {
        let mut telemetry = TelemetryRun::new(false).unwrap();
        assert!(!telemetry.is_activated());
        let pkt = crate::telemetry::TelemetryPacket::SessionEnd {
            total_secs: 1.0,
            sufficient_secs: 1.0,
            efficiency_pct: 100.0,
            ts: 0,
        };
        telemetry.write(&pkt).unwrap();
    }

    /// Drives a full session: 50 frames of constant luminance, one every
    /// simulated 100 ms, for 5 simulated seconds.
    fn run_constant_session(value: u8, threshold: f32) -> crate::report::Report {
        let start = Instant::now();
        let telemetry = TelemetryRun::new(false).unwrap();
        let mut session =
            MonitorSession::new(64, 48, Region::full_frame(64, 48), threshold, telemetry, start)
                .unwrap();

        let frame = solid_frame(64, 48, [value, value, value]);
        for i in 1..=50u32 {
            let now = start + Duration::from_millis(100 * i as u64);
            let overlay = session.process(&frame, now).unwrap();
            assert_eq!(overlay.status, classify(value as f32, threshold));
        }
        session.finish().unwrap()
    }

    fn solid_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Frame::new(width, height, 3, data).unwrap()
    }

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x * 4 % 256) as u8);
                data.push((y * 5 % 256) as u8);
                data.push(((x + y) * 3 % 256) as u8);
            }
        }
        Frame::new(width, height, 3, data).unwrap()
    }

    fn sample(i: u32) -> LuminanceSample {
        LuminanceSample {
            elapsed_secs: i as f64 * 0.1,
            luminance: i as f32,
        }
    }
}
