//! Scanner state core
//!
//! Per-detection-event handling: overlay tracking, duplicate-decode
//! suppression, and the report sequence (delegate callback, then alert,
//! then dismissal). This is the only first-party state in the component;
//! everything upstream of it is the capture/detection machinery.

use tracing::{debug, info};

use codescan_detect::Detection;

use crate::alert::{Alert, TerminalBell};
use crate::config::ScanConfig;
use crate::overlay::Overlay;

/// Receives scan results from the component.
pub trait ScanDelegate {
    /// Called with the decoded text, exactly once per distinct consecutive
    /// value (never once per frame).
    fn on_decode(&mut self, text: &str);

    /// Called at most once, when the scanner dismisses itself after a
    /// decode. Only fires when `close_after_capture` is enabled.
    fn on_dismiss(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerState {
    /// Not yet started
    Idle,
    /// Live; the steady state when auto-close is disabled
    Scanning,
    /// Terminal; reached only via `close_after_capture`
    Dismissed,
}

/// The scanner component's state core.
///
/// Not thread-safe by design: detection events must be delivered from a
/// single owner (the session loop), mirroring a serial callback queue.
pub struct Scanner {
    config: ScanConfig,
    delegate: Box<dyn ScanDelegate + Send>,
    alert: Box<dyn Alert + Send>,
    overlay: Overlay,
    last_decoded: Option<String>,
    state: ScannerState,
}

impl Scanner {
    pub fn new(config: ScanConfig, delegate: Box<dyn ScanDelegate + Send>) -> Self {
        Self::with_alert(config, delegate, Box::new(TerminalBell))
    }

    pub fn with_alert(
        config: ScanConfig,
        delegate: Box<dyn ScanDelegate + Send>,
        alert: Box<dyn Alert + Send>,
    ) -> Self {
        let overlay = Overlay::new(config.border);
        Self {
            config,
            delegate,
            alert,
            overlay,
            last_decoded: None,
            state: ScannerState::Idle,
        }
    }

    /// Mark the scanner live. Called by the session once capture is up.
    pub fn start(&mut self) {
        if self.state == ScannerState::Idle {
            self.state = ScannerState::Scanning;
        }
    }

    pub fn state(&self) -> ScannerState {
        self.state
    }

    pub fn is_dismissed(&self) -> bool {
        self.state == ScannerState::Dismissed
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Handle one detection event (the detections found in one frame).
    ///
    /// No detection clears the overlay. A detection updates the overlay
    /// and, if its text differs from the previous decode, triggers the
    /// report sequence. The stored value is deliberately not cleared on
    /// empty frames, so a code leaving and re-entering the frame does not
    /// re-fire.
    pub fn handle_detections(&mut self, detections: &[Detection]) {
        if self.state == ScannerState::Dismissed {
            return;
        }

        let Some(detection) = detections.first() else {
            self.overlay.clear();
            return;
        };

        self.overlay.set_rect(detection.bounds);

        if self.last_decoded.as_deref() != Some(detection.text.as_str()) {
            self.last_decoded = Some(detection.text.clone());
            self.report(&detection.text);
        }
    }

    fn report(&mut self, text: &str) {
        info!("decoded string: {}", text);
        self.delegate.on_decode(text);

        if self.config.alert_on_scan {
            self.alert.alert();
        }

        if self.config.close_after_capture {
            debug!("dismissing scanner after capture");
            self.state = ScannerState::Dismissed;
            self.delegate.on_dismiss();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use codescan_detect::{Rect, Symbology};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Decode(String),
        Alert,
        Dismiss,
    }

    /// Shared event log so delegate and alert ordering is observable.
    #[derive(Clone, Default)]
    struct Log(Arc<Mutex<Vec<Event>>>);

    impl Log {
        fn push(&self, event: Event) {
            self.0.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<Event> {
            self.0.lock().unwrap().clone()
        }
    }

    struct LogDelegate(Log);

    impl ScanDelegate for LogDelegate {
        fn on_decode(&mut self, text: &str) {
            self.0.push(Event::Decode(text.to_string()));
        }

        fn on_dismiss(&mut self) {
            self.0.push(Event::Dismiss);
        }
    }

    struct LogAlert(Log);

    impl Alert for LogAlert {
        fn alert(&mut self) {
            self.0.push(Event::Alert);
        }
    }

    fn scanner(config: ScanConfig, log: &Log) -> Scanner {
        let mut scanner = Scanner::with_alert(
            config,
            Box::new(LogDelegate(log.clone())),
            Box::new(LogAlert(log.clone())),
        );
        scanner.start();
        scanner
    }

    fn detection(text: &str) -> Detection {
        Detection {
            text: text.to_string(),
            bounds: Rect::new(10.0, 10.0, 40.0, 40.0),
            symbology: Symbology::QrCode,
        }
    }

    fn decodes(log: &Log) -> Vec<String> {
        log.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Decode(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_duplicate_decodes_are_suppressed() {
        let log = Log::default();
        let config = ScanConfig {
            close_after_capture: false,
            alert_on_scan: false,
            ..ScanConfig::default()
        };
        let mut scanner = scanner(config, &log);

        for text in ["A", "A", "B", "B", "B", "A"] {
            scanner.handle_detections(&[detection(text)]);
        }

        assert_eq!(decodes(&log), vec!["A", "B", "A"]);
    }

    #[test]
    fn test_empty_event_clears_overlay_without_callback() {
        let log = Log::default();
        let config = ScanConfig {
            close_after_capture: false,
            ..ScanConfig::default()
        };
        let mut scanner = scanner(config, &log);

        scanner.handle_detections(&[detection("A")]);
        assert!(!scanner.overlay().rect().is_empty());

        scanner.handle_detections(&[]);
        assert!(scanner.overlay().rect().is_empty());
        assert_eq!(decodes(&log), vec!["A"]);
    }

    #[test]
    fn test_code_reentering_frame_does_not_refire() {
        let log = Log::default();
        let config = ScanConfig {
            close_after_capture: false,
            alert_on_scan: false,
            ..ScanConfig::default()
        };
        let mut scanner = scanner(config, &log);

        scanner.handle_detections(&[detection("A")]);
        scanner.handle_detections(&[]);
        scanner.handle_detections(&[detection("A")]);

        assert_eq!(decodes(&log), vec!["A"]);
    }

    #[test]
    fn test_close_after_capture_dismisses_once_after_callback() {
        let log = Log::default();
        let config = ScanConfig {
            close_after_capture: true,
            alert_on_scan: true,
            ..ScanConfig::default()
        };
        let mut scanner = scanner(config, &log);

        scanner.handle_detections(&[detection("A")]);

        assert_eq!(
            log.events(),
            vec![Event::Decode("A".to_string()), Event::Alert, Event::Dismiss]
        );
        assert!(scanner.is_dismissed());

        // Events after dismissal are ignored entirely.
        scanner.handle_detections(&[detection("B")]);
        scanner.handle_detections(&[]);
        assert_eq!(log.events().len(), 3);
    }

    #[test]
    fn test_no_close_means_no_dismissal_ever() {
        let log = Log::default();
        let config = ScanConfig {
            close_after_capture: false,
            alert_on_scan: false,
            ..ScanConfig::default()
        };
        let mut scanner = scanner(config, &log);

        for text in ["A", "B", "C"] {
            scanner.handle_detections(&[detection(text)]);
        }

        assert_eq!(decodes(&log), vec!["A", "B", "C"]);
        assert!(!log.events().contains(&Event::Dismiss));
        assert_eq!(scanner.state(), ScannerState::Scanning);
    }

    #[test]
    fn test_alert_disabled_never_alerts() {
        let log = Log::default();
        let config = ScanConfig {
            close_after_capture: false,
            alert_on_scan: false,
            ..ScanConfig::default()
        };
        let mut scanner = scanner(config, &log);

        scanner.handle_detections(&[detection("A")]);
        scanner.handle_detections(&[detection("B")]);

        assert!(!log.events().contains(&Event::Alert));
    }

    #[test]
    fn test_first_detection_wins_in_multi_code_frame() {
        let log = Log::default();
        let config = ScanConfig {
            close_after_capture: false,
            alert_on_scan: false,
            ..ScanConfig::default()
        };
        let mut scanner = scanner(config, &log);

        scanner.handle_detections(&[detection("A"), detection("B")]);
        assert_eq!(decodes(&log), vec!["A"]);
    }
}
