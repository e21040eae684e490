//! Frame ingestion seam.
//!
//! SPDX-License-Identifier: GPL-3.0-or-later

use crate::frame::Frame;
use std::collections::VecDeque;

/// Abstract interface to whatever produces frames: a live device in the hub,
/// a recorded sequence in tests and offline analysis.
pub trait FrameSource {
    /// Blocks until the next frame is available. `Ok(None)` means the stream
    /// has ended; the caller proceeds to finalization, not to a retry.
    fn next_frame(&mut self) -> Result<Option<Frame>, anyhow::Error>;
}

/// Plays back a pre-recorded frame sequence, then signals end-of-stream.
pub struct ReplaySource {
    frames: VecDeque<Frame>,
}

impl ReplaySource {
    pub fn new(frames: Vec<Frame>) -> Self {
        ReplaySource {
            frames: frames.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Option<Frame>, anyhow::Error> {
        Ok(self.frames.pop_front())
    }
}
