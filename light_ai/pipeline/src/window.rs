use serde::Serialize;

/// How many samples the sliding window keeps for live charting and the final
/// report. Tunable; the run itself is unaffected by the value.
pub const WINDOW_CAPACITY: usize = 100;

/// One luminance measurement and the session time it was taken at.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LuminanceSample {
    pub elapsed_secs: f64,
    pub luminance: f32,
}

/// Fixed-capacity ring buffer of recent samples. Appending at capacity
/// evicts the oldest sample. Single producer, read-only iteration.
pub struct TelemetryWindow {
    samples: Vec<LuminanceSample>,
    head: usize,
    capacity: usize,
}

impl TelemetryWindow {
    pub fn new() -> Self {
        TelemetryWindow::with_capacity(WINDOW_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be positive");
        TelemetryWindow {
            samples: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    pub fn push(&mut self, sample: LuminanceSample) {
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            // Full: overwrite the oldest slot and advance the head.
            self.samples[self.head] = sample;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples in chronological order, oldest first. Slots before the head
    /// have already been overwritten, so iteration starts at the head.
    pub fn iter(&self) -> impl Iterator<Item = &LuminanceSample> {
        let (newest, oldest) = self.samples.split_at(self.head);
        oldest.iter().chain(newest.iter())
    }

    pub fn latest(&self) -> Option<&LuminanceSample> {
        if self.samples.is_empty() {
            None
        } else if self.head == 0 {
            self.samples.last()
        } else {
            self.samples.get(self.head - 1)
        }
    }
}

impl Default for TelemetryWindow {
    fn default() -> Self {
        TelemetryWindow::new()
    }
}
