use anyhow::anyhow;
use image::{ImageBuffer, Rgb};
use serde::{Deserialize, Serialize};

/// A single captured frame: interleaved 8-bit samples, 1 to 3 channels.
/// Owned by the loop iteration that analyzes it and discarded afterwards.
#[derive(Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self, anyhow::Error> {
        if channels == 0 || channels > 3 {
            return Err(anyhow!("Unsupported channel count: {channels}"));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(anyhow!(
                "Frame buffer size mismatch: {} bytes for {}x{}x{}",
                data.len(),
                width,
                height,
                channels
            ));
        }
        Ok(Frame {
            width,
            height,
            channels,
            data,
        })
    }

    /// Wraps a decoded RGB camera buffer without copying.
    pub fn from_rgb(image: ImageBuffer<Rgb<u8>, Vec<u8>>) -> Self {
        let (width, height) = image.dimensions();
        Frame {
            width,
            height,
            channels: 3,
            data: image.into_raw(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Byte offset of the first channel of pixel (x, y).
    pub(crate) fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }
}

/// The rectangular region of interest analyzed on every frame.
/// Fixed for the whole run once resolved against the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Region {
            x,
            y,
            width,
            height,
        }
    }

    pub fn full_frame(frame_width: u32, frame_height: u32) -> Self {
        Region {
            x: 0,
            y: 0,
            width: frame_width,
            height: frame_height,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Resolves a user selection against the frame the selection was drawn on.
    /// A missing or zero-area selection falls back to the full frame; anything
    /// hanging over the frame edge is clamped. Never fails.
    pub fn resolve(selection: Option<Region>, frame_width: u32, frame_height: u32) -> Region {
        let requested = match selection {
            Some(r) if !r.is_degenerate() => r,
            _ => return Region::full_frame(frame_width, frame_height),
        };

        let x = requested.x.min(frame_width);
        let y = requested.y.min(frame_height);
        let width = requested.width.min(frame_width - x);
        let height = requested.height.min(frame_height - y);

        let clamped = Region {
            x,
            y,
            width,
            height,
        };
        if clamped.is_degenerate() {
            Region::full_frame(frame_width, frame_height)
        } else {
            clamped
        }
    }

    /// True if the region lies fully inside a frame of the given size.
    pub fn fits(&self, frame_width: u32, frame_height: u32) -> bool {
        self.x + self.width <= frame_width && self.y + self.height <= frame_height
    }
}
