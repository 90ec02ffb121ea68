//! Detected-code overlay
//!
//! Tracks the bounding box of the currently visible code in frame
//! coordinates and projects it into view coordinates under aspect-fill
//! scaling, which is how a live preview is normally fitted to a view.

use codescan_detect::Rect;

use crate::config::BorderStyle;

/// Bounding overlay around the currently detected code.
///
/// The rect is `Rect::ZERO` while nothing is detected.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub style: BorderStyle,
    rect: Rect,
}

impl Overlay {
    pub fn new(style: BorderStyle) -> Self {
        Self {
            style,
            rect: Rect::ZERO,
        }
    }

    /// Current bounding box in frame coordinates
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn clear(&mut self) {
        self.rect = Rect::ZERO;
    }

    /// Project the frame-space rect into a view of the given size, assuming
    /// the frame is scaled to fill the view while preserving aspect ratio
    /// (overflow is cropped equally on both sides).
    pub fn project(&self, frame_w: u32, frame_h: u32, view_w: f32, view_h: f32) -> Rect {
        if self.rect.is_empty() || frame_w == 0 || frame_h == 0 {
            return Rect::ZERO;
        }

        let scale = (view_w / frame_w as f32).max(view_h / frame_h as f32);
        let offset_x = (view_w - frame_w as f32 * scale) / 2.0;
        let offset_y = (view_h - frame_h as f32 * scale) / 2.0;

        Rect::new(
            self.rect.x * scale + offset_x,
            self.rect.y * scale + offset_y,
            self.rect.width * scale,
            self.rect.height * scale,
        )
    }
}
