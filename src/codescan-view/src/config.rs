//! Scanner configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use codescan_detect::Symbology;

/// Overlay border appearance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderStyle {
    /// RGBA border color
    pub color: [u8; 4],
    /// Border width in view points
    pub width: f32,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            color: [0, 255, 0, 255],
            width: 2.0,
        }
    }
}

/// Scanner configuration, set once before a session starts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Camera device index
    pub device_index: u32,

    /// Capture rate (frames per second)
    pub fps: u32,

    /// Overlay border drawn around a detected code
    pub border: BorderStyle,

    /// Emit an alert on each new decode
    pub alert_on_scan: bool,

    /// Dismiss the scanner after the first reported decode
    pub close_after_capture: bool,

    /// Symbologies the detector should report
    pub symbologies: Vec<Symbology>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            fps: 30,
            border: BorderStyle::default(),
            alert_on_scan: true,
            close_after_capture: true,
            symbologies: vec![Symbology::QrCode],
        }
    }
}

impl ScanConfig {
    /// Load configuration from a TOML file. Missing keys fall back to
    /// their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {:?}", path))?;
        Ok(config)
    }
}
