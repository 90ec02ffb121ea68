//! Code detection for codescan
//!
//! This crate provides the detection boundary the scan session talks to: a
//! `Detector` trait invoked once per grayscale frame, returning decoded
//! payloads with frame-space bounding boxes, plus the default rqrr-backed
//! QR engine.

mod detector;
mod engine;
mod error;
mod geometry;
mod symbology;

pub use detector::{Detection, Detector, GrayFrame};
pub use engine::QrEngine;
pub use error::{DetectError, Result};
pub use geometry::Rect;
pub use symbology::Symbology;
