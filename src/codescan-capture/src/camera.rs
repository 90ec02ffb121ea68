//! Camera device enumeration and capture via nokhwa

use anyhow::Result;
use nokhwa::{
    pixel_format::RgbFormat,
    query,
    utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType},
    Camera,
};
use tracing::{debug, info, warn};

use crate::error::CaptureError;
use crate::frame::Frame;
use crate::source::FrameSource;

/// Information about an attached camera device
#[derive(Debug, Clone)]
pub struct CameraDeviceInfo {
    pub index: u32,
    pub name: String,
    pub description: String,
    pub is_default: bool,
}

/// Enumerate all available camera devices
pub fn list_devices() -> Result<Vec<CameraDeviceInfo>> {
    let cameras = query(ApiBackend::Auto).map_err(CaptureError::Backend)?;

    let mut devices = Vec::new();
    for info in &cameras {
        let index = match info.index() {
            CameraIndex::Index(i) => *i,
            CameraIndex::String(_) => continue,
        };

        debug!("found camera: {} ({})", info.human_name(), info.description());

        devices.push(CameraDeviceInfo {
            index,
            name: info.human_name(),
            description: info.description().to_string(),
            is_default: index == 0,
        });
    }

    info!("enumerated {} camera(s)", devices.len());
    Ok(devices)
}

/// Live camera capture stream
pub struct CameraCapture {
    camera: Camera,
    width: u32,
    height: u32,
    running: bool,
}

impl CameraCapture {
    /// Open the camera at the given device index and start streaming.
    ///
    /// Acquisition failures (no device, permission denied, device busy) are
    /// returned to the caller rather than swallowed.
    pub fn open(index: u32) -> Result<Self> {
        debug!("opening camera at index {}", index);

        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| match e {
                nokhwa::NokhwaError::OpenDeviceError(..) => CaptureError::CameraNotFound(index),
                other => CaptureError::Backend(other),
            })?;

        camera.open_stream().map_err(CaptureError::Backend)?;

        let resolution = camera.resolution();
        let width = resolution.width();
        let height = resolution.height();

        info!(
            "camera stream opened: {} ({}x{} @ {} fps)",
            camera.info().human_name(),
            width,
            height,
            camera.frame_rate()
        );

        Ok(Self {
            camera,
            width,
            height,
            running: true,
        })
    }
}

impl FrameSource for CameraCapture {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if !self.running {
            return Err(CaptureError::NotRunning.into());
        }

        let buffer = self.camera.frame().map_err(CaptureError::Backend)?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(CaptureError::Backend)?;

        let (width, height) = (decoded.width(), decoded.height());
        let frame = Frame::from_rgb(decoded.into_raw(), width, height).ok_or_else(|| {
            CaptureError::FrameAcquisition("decoded buffer size mismatch".to_string())
        })?;

        Ok(Some(frame))
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn stop(&mut self) {
        if !self.running {
            return;
        }
        if let Err(e) = self.camera.stop_stream() {
            warn!("error stopping camera stream: {}", e);
        }
        self.running = false;
        debug!("camera stream stopped");
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        // Backstop for abnormal teardown; normal paths call stop() first.
        self.stop();
    }
}
