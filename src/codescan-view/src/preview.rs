//! Preview boundary
//!
//! Rendering the live feed is the host's job; the session pushes each frame
//! and the current overlay through this sink.

use codescan_capture::Frame;

use crate::overlay::Overlay;

/// Receives every processed frame together with the current overlay.
pub trait PreviewSink {
    fn present(&mut self, frame: &Frame, overlay: &Overlay);
}

/// Discards frames; used when the host has no preview surface.
pub struct NullPreview;

impl PreviewSink for NullPreview {
    fn present(&mut self, _frame: &Frame, _overlay: &Overlay) {}
}
