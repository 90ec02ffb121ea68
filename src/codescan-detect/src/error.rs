use thiserror::Error;

use crate::symbology::Symbology;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("symbology not supported by this engine: {0}")]
    UnsupportedSymbology(Symbology),

    #[error("no symbologies requested")]
    NoSymbologies,

    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    #[error("detection engine error: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, DetectError>;
