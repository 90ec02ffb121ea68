//! codescan-capture - Camera capture for codescan
//!
//! Provides webcam frame acquisition through nokhwa and the `FrameSource`
//! abstraction the scan session consumes.

pub mod camera;
pub mod error;
pub mod frame;
pub mod source;

pub use camera::{list_devices, CameraCapture, CameraDeviceInfo};
pub use error::CaptureError;
pub use frame::Frame;
pub use source::FrameSource;
