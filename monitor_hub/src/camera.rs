//! Capture device backend for the monitor hub.
//!
//! SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Context;
use growsense_light_ai::frame::Frame;
use growsense_light_ai::source::FrameSource;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

/// A local capture device addressed by index, producing RGB frames.
pub struct DeviceCamera {
    camera: Camera,
    name: String,
}

impl DeviceCamera {
    /// Opens the device and starts its stream. Failure here is fatal to the
    /// run; there is nothing to monitor without a camera.
    pub fn new(index: u32) -> Result<Self, anyhow::Error> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .with_context(|| format!("Failed to open capture device {index}"))?;
        camera
            .open_stream()
            .context("Failed to start the capture stream")?;

        let name = camera.info().human_name();
        debug!("Capture device {index} ({name}) streaming");
        Ok(DeviceCamera { camera, name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FrameSource for DeviceCamera {
    fn next_frame(&mut self) -> Result<Option<Frame>, anyhow::Error> {
        // A live source has no useful retry: a failed read ends the stream.
        let buffer = match self.camera.frame() {
            Ok(buffer) => buffer,
            Err(e) => {
                warn!("Frame read failed, treating as end of stream: {e}");
                return Ok(None);
            }
        };

        let decoded = buffer
            .decode_image::<RgbFormat>()
            .context("Failed to decode the captured frame")?;
        Ok(Some(Frame::from_rgb(decoded)))
    }
}

impl Drop for DeviceCamera {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            warn!("Failed to stop the capture stream: {e}");
        }
    }
}
