//! rqrr-backed QR detection engine

use rqrr::PreparedImage;
use tracing::{debug, trace};

use crate::detector::{Detection, Detector, GrayFrame};
use crate::error::{DetectError, Result};
use crate::geometry::Rect;
use crate::symbology::Symbology;

/// Default detection engine, backed by the rqrr decoder.
///
/// Detects and decodes QR codes only; asking for any other symbology is an
/// error at construction time rather than a silent non-detection at scan
/// time. Other symbology families need their own `Detector` implementation.
pub struct QrEngine {
    symbologies: Vec<Symbology>,
}

impl QrEngine {
    /// Create an engine for the requested symbology set.
    pub fn new(symbologies: &[Symbology]) -> Result<Self> {
        if symbologies.is_empty() {
            return Err(DetectError::NoSymbologies);
        }

        for &sym in symbologies {
            if sym != Symbology::QrCode {
                return Err(DetectError::UnsupportedSymbology(sym));
            }
        }

        debug!("qr engine initialized for {:?}", symbologies);
        Ok(Self {
            symbologies: symbologies.to_vec(),
        })
    }

    /// Engine configured for plain QR codes
    pub fn qr_only() -> Self {
        Self {
            symbologies: vec![Symbology::QrCode],
        }
    }

    /// Symbologies this engine was configured with
    pub fn symbologies(&self) -> &[Symbology] {
        &self.symbologies
    }
}

impl Detector for QrEngine {
    fn detect(&mut self, frame: &GrayFrame<'_>) -> Result<Vec<Detection>> {
        let width = frame.width as usize;
        let height = frame.height as usize;
        if width == 0 || height == 0 {
            return Err(DetectError::InvalidFrame("zero-sized frame".to_string()));
        }

        let data = frame.data;
        let mut prepared =
            PreparedImage::prepare_from_greyscale(width, height, |x, y| data[y * width + x]);

        let grids = prepared.detect_grids();
        trace!("detected {} candidate grid(s)", grids.len());

        let mut detections = Vec::with_capacity(grids.len());
        for grid in grids {
            let corners: Vec<(f32, f32)> = grid
                .bounds
                .iter()
                .map(|p| (p.x as f32, p.y as f32))
                .collect();
            let bounds = Rect::enclosing(&corners);

            match grid.decode() {
                Ok((_meta, text)) => {
                    debug!("decoded qr code ({} bytes)", text.len());
                    detections.push(Detection {
                        text,
                        bounds,
                        symbology: Symbology::QrCode,
                    });
                }
                Err(e) => {
                    // A located but undecodable grid (blur, partial
                    // occlusion) is not fatal; skip it.
                    debug!("undecodable grid at {:?}: {}", bounds, e);
                }
            }
        }

        Ok(detections)
    }
}
