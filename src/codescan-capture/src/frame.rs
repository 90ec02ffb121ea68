//! Captured frame data

use anyhow::Result;
use chrono::{DateTime, Utc};
use image::{ImageBuffer, Rgb};

/// A single captured video frame in packed RGB format
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: DateTime<Utc>,
}

impl Frame {
    /// Create a frame from packed RGB pixel data.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_rgb(data: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 3 {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
            timestamp: Utc::now(),
        })
    }

    /// Convert to an RGB image buffer
    pub fn to_image(&self) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
        ImageBuffer::from_raw(self.width, self.height, self.data.clone())
            .expect("buffer size mismatch")
    }

    /// Save as PNG file
    pub fn save_png(&self, path: &str) -> Result<()> {
        let img = self.to_image();
        img.save(path)?;
        Ok(())
    }

    /// Convert to a single-channel grayscale buffer using the luminance
    /// formula, row-major, one byte per pixel. This is the input format
    /// the detection engine expects.
    pub fn to_luma(&self) -> Vec<u8> {
        let mut luma = Vec::with_capacity(self.width as usize * self.height as usize);
        for pixel in self.data.chunks_exact(3) {
            let r = pixel[0] as u32;
            let g = pixel[1] as u32;
            let b = pixel[2] as u32;
            luma.push(((r * 299 + g * 587 + b * 114) / 1000) as u8);
        }
        luma
    }
}
