//! Machine-readable code symbologies

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Code symbologies a detector can be asked to report.
///
/// Mirrors the common set of camera-detectable barcode families; a given
/// engine typically supports a subset and rejects the rest at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Symbology {
    QrCode,
    MicroQr,
    Aztec,
    Pdf417,
    Ean13,
    Ean8,
    Code39,
    Code128,
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Symbology::QrCode => "qr-code",
            Symbology::MicroQr => "micro-qr",
            Symbology::Aztec => "aztec",
            Symbology::Pdf417 => "pdf417",
            Symbology::Ean13 => "ean13",
            Symbology::Ean8 => "ean8",
            Symbology::Code39 => "code39",
            Symbology::Code128 => "code128",
        };
        f.write_str(name)
    }
}

impl FromStr for Symbology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qr-code" | "qr" => Ok(Symbology::QrCode),
            "micro-qr" => Ok(Symbology::MicroQr),
            "aztec" => Ok(Symbology::Aztec),
            "pdf417" => Ok(Symbology::Pdf417),
            "ean13" => Ok(Symbology::Ean13),
            "ean8" => Ok(Symbology::Ean8),
            "code39" => Ok(Symbology::Code39),
            "code128" => Ok(Symbology::Code128),
            other => Err(format!("unknown symbology: {}", other)),
        }
    }
}
