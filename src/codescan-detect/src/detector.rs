//! Detector boundary
//!
//! The scan session hands each frame to a `Detector` and receives zero or
//! more detections back. The engine doing the actual image work sits behind
//! this trait, so detection handling can be tested without one.

use crate::error::{DetectError, Result};
use crate::geometry::Rect;
use crate::symbology::Symbology;

/// A grayscale view of a captured frame, row-major, one byte per pixel.
#[derive(Debug, Clone, Copy)]
pub struct GrayFrame<'a> {
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8],
}

impl<'a> GrayFrame<'a> {
    /// Validate that the buffer matches the dimensions.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(DetectError::InvalidFrame(format!(
                "invalid frame data size: expected {}, got {}",
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

/// A machine-readable code found in a frame
#[derive(Debug, Clone)]
pub struct Detection {
    /// Decoded payload text
    pub text: String,
    /// Bounding box in frame pixel coordinates
    pub bounds: Rect,
    /// Which symbology the code was
    pub symbology: Symbology,
}

/// A code detection engine, invoked once per captured frame.
///
/// An empty result vec means no code is visible in the frame.
pub trait Detector {
    fn detect(&mut self, frame: &GrayFrame<'_>) -> Result<Vec<Detection>>;
}
