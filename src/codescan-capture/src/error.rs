//! Capture error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("camera backend error: {0}")]
    Backend(#[from] nokhwa::NokhwaError),

    #[error("no cameras found")]
    NoCameras,

    #[error("camera not found: index {0}")]
    CameraNotFound(u32),

    #[error("capture stream not running")]
    NotRunning,

    #[error("frame acquisition failed: {0}")]
    FrameAcquisition(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
