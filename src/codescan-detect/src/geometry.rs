//! Frame-space bounding boxes

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in frame pixel coordinates.
///
/// `Rect::ZERO` doubles as "nothing detected".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Smallest rectangle enclosing all of the given points (e.g. the four
    /// corners of a detected code). Empty input yields `Rect::ZERO`.
    pub fn enclosing(points: &[(f32, f32)]) -> Rect {
        let Some(&(first_x, first_y)) = points.first() else {
            return Rect::ZERO;
        };

        let mut min_x = first_x;
        let mut min_y = first_y;
        let mut max_x = first_x;
        let mut max_y = first_y;

        for &(x, y) in &points[1..] {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}
