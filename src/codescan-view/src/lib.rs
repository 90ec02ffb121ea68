//! codescan-view - The scanner component
//!
//! Wires a camera frame source and a code detector into a scan session:
//! live overlay tracking, duplicate-decode suppression, and result delivery
//! to a caller-supplied delegate, with optional alert feedback and
//! auto-dismissal after the first decode.

pub mod alert;
pub mod config;
pub mod overlay;
pub mod preview;
pub mod scanner;
pub mod session;

pub use alert::{Alert, Silent, TerminalBell};
pub use config::{BorderStyle, ScanConfig};
pub use overlay::Overlay;
pub use preview::{NullPreview, PreviewSink};
pub use scanner::{ScanDelegate, Scanner, ScannerState};
pub use session::ScanSession;
