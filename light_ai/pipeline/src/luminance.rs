use crate::frame::{Frame, Region};
use anyhow::anyhow;
use image::GrayImage;

/// Crops the frame to the region (exact pixel indices, no interpolation) and
/// reduces each pixel to a single intensity by averaging its channels. The
/// unweighted average is channel-order invariant, so the same scene scores the
/// same whether the source hands us RGB or BGR.
pub fn region_grayscale(frame: &Frame, region: &Region) -> Result<GrayImage, anyhow::Error> {
    if !region.fits(frame.width, frame.height) {
        return Err(anyhow!(
            "Region {}x{}+{}+{} exceeds {}x{} frame",
            region.width,
            region.height,
            region.x,
            region.y,
            frame.width,
            frame.height
        ));
    }
    if region.is_degenerate() {
        return Err(anyhow!("Cannot analyze a zero-area region"));
    }

    let channels = frame.channels as usize;
    let data = frame.data();
    let mut gray = vec![0u8; region.area()];

    for row in 0..region.height {
        let src = frame.pixel_offset(region.x, region.y + row);
        let dst = row as usize * region.width as usize;
        for col in 0..region.width as usize {
            let base = src + col * channels;
            let sum: u16 = data[base..base + channels].iter().map(|&c| c as u16).sum();
            gray[dst + col] = (sum / channels as u16) as u8;
        }
    }

    GrayImage::from_raw(region.width, region.height, gray)
        .ok_or_else(|| anyhow!("GrayImage::from_raw failed: pixel buffer size mismatch"))
}

/// Mean intensity of the region, in [0, 255]. Deterministic and pure; the
/// work is proportional to the region area, not the full frame.
pub fn analyze(frame: &Frame, region: &Region) -> Result<f32, anyhow::Error> {
    let gray = region_grayscale(frame, region)?;
    let sum: u64 = gray.as_raw().iter().map(|&p| p as u64).sum();
    Ok(sum as f32 / gray.as_raw().len() as f32)
}
