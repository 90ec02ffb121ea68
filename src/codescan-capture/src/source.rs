//! Frame source abstraction
//!
//! The capture loop consumes frames through this trait rather than talking
//! to a camera backend directly, so detection handling can be driven by any
//! frame producer.

use anyhow::Result;

use crate::frame::Frame;

/// A producer of video frames.
///
/// `next_frame` returning `Ok(None)` means no new frame is available yet;
/// the caller decides how to pace retries. Implementations must be safe to
/// `stop` more than once.
pub trait FrameSource {
    /// Pull the next available frame.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Frame dimensions as (width, height).
    fn dimensions(&self) -> (u32, u32);

    /// Release the underlying capture resources. Further calls to
    /// `next_frame` fail after this.
    fn stop(&mut self);
}
