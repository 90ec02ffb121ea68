//! Scan session orchestration
//!
//! Owns the frame source, the detector, and the scanner state core, and
//! drives them in a paced capture loop. The loop is the sole owner of the
//! scanner, so all detection handling is single-threaded by construction.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, error, info};

use codescan_capture::{CameraCapture, FrameSource};
use codescan_detect::{Detector, GrayFrame, QrEngine};

use crate::config::ScanConfig;
use crate::preview::{NullPreview, PreviewSink};
use crate::scanner::{ScanDelegate, Scanner};

const MAX_CONSECUTIVE_ERRORS: u32 = 10;

/// A running scanner: frame source, detector, and state core wired
/// together.
pub struct ScanSession<S: FrameSource, D: Detector> {
    source: S,
    detector: D,
    scanner: Scanner,
    preview: Box<dyn PreviewSink + Send>,
    fps: u32,
    consecutive_errors: u32,
}

impl ScanSession<CameraCapture, QrEngine> {
    /// Open the configured camera and build a session around it.
    ///
    /// Camera acquisition failure is returned to the caller; nothing is
    /// started and the delegate will never fire.
    pub fn open(config: ScanConfig, delegate: Box<dyn ScanDelegate + Send>) -> Result<Self> {
        let detector = QrEngine::new(&config.symbologies)?;
        let source = CameraCapture::open(config.device_index)?;
        Ok(Self::with_parts(config, source, detector, delegate))
    }
}

impl<S: FrameSource, D: Detector> ScanSession<S, D> {
    /// Assemble a session from explicit parts. This is also the seam the
    /// tests use to drive the component with synthetic frames.
    pub fn with_parts(
        config: ScanConfig,
        source: S,
        detector: D,
        delegate: Box<dyn ScanDelegate + Send>,
    ) -> Self {
        let fps = config.fps;
        let scanner = Scanner::new(config, delegate);
        Self {
            source,
            detector,
            scanner,
            preview: Box::new(NullPreview),
            fps,
            consecutive_errors: 0,
        }
    }

    /// Attach a preview sink; every processed frame is pushed through it.
    pub fn set_preview(&mut self, preview: Box<dyn PreviewSink + Send>) {
        self.preview = preview;
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Run the capture loop until the run flag clears, the scanner
    /// dismisses itself, or capture fails repeatedly. The source is
    /// released on every exit path.
    pub fn run(&mut self, running: Arc<AtomicBool>) -> Result<()> {
        let (width, height) = self.source.dimensions();
        info!(
            "starting scan loop at {} fps ({}x{})",
            self.fps, width, height
        );
        self.scanner.start();

        let frame_interval = Duration::from_secs_f64(1.0 / self.fps.max(1) as f64);
        let mut last_capture = Instant::now();
        let mut total_frames = 0u64;

        while running.load(Ordering::SeqCst) && !self.scanner.is_dismissed() {
            let elapsed = last_capture.elapsed();
            if elapsed < frame_interval {
                std::thread::sleep(frame_interval - elapsed);
            }
            last_capture = Instant::now();

            match self.process_next_frame() {
                Ok(true) => {
                    self.consecutive_errors = 0;
                    total_frames += 1;
                    if total_frames % 300 == 0 {
                        debug!("processed {} frames", total_frames);
                    }
                }
                Ok(false) => {
                    // No new frame yet
                }
                Err(e) => {
                    error!("frame processing error: {}", e);
                    self.consecutive_errors += 1;

                    if self.consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                        self.source.stop();
                        return Err(e.context("too many consecutive capture errors"));
                    }
                }
            }
        }

        self.source.stop();
        info!(
            "scan loop stopped after {} frames (dismissed: {})",
            total_frames,
            self.scanner.is_dismissed()
        );
        Ok(())
    }

    fn process_next_frame(&mut self) -> Result<bool> {
        let frame = match self.source.next_frame()? {
            Some(f) => f,
            None => return Ok(false),
        };

        let luma = frame.to_luma();
        let gray = GrayFrame::new(frame.width, frame.height, &luma)?;
        let detections = self.detector.detect(&gray)?;

        self.scanner.handle_detections(&detections);
        self.preview.present(&frame, self.scanner.overlay());

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    use codescan_capture::Frame;
    use codescan_detect::{Detection, Rect, Symbology};

    /// Emits one flat gray frame per call and counts stop() calls.
    struct ScriptedSource {
        frames_served: usize,
        stops: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn new(stops: Arc<AtomicUsize>) -> Self {
            Self {
                frames_served: 0,
                stops,
            }
        }
    }

    impl FrameSource for ScriptedSource {
        fn next_frame(&mut self) -> Result<Option<Frame>> {
            self.frames_served += 1;
            Ok(Frame::from_rgb(vec![128u8; 4 * 4 * 3], 4, 4))
        }

        fn dimensions(&self) -> (u32, u32) {
            (4, 4)
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Replays a scripted sequence of per-frame detection results, then
    /// keeps returning empty frames.
    struct ScriptedDetector {
        script: Vec<Vec<&'static str>>,
        cursor: usize,
    }

    impl Detector for ScriptedDetector {
        fn detect(
            &mut self,
            _frame: &GrayFrame<'_>,
        ) -> codescan_detect::Result<Vec<Detection>> {
            let texts = self.script.get(self.cursor).cloned().unwrap_or_default();
            self.cursor += 1;
            Ok(texts
                .into_iter()
                .map(|text| Detection {
                    text: text.to_string(),
                    bounds: Rect::new(1.0, 1.0, 2.0, 2.0),
                    symbology: Symbology::QrCode,
                })
                .collect())
        }
    }

    #[derive(Clone, Default)]
    struct CollectingDelegate {
        decoded: Arc<Mutex<Vec<String>>>,
        dismissals: Arc<AtomicUsize>,
    }

    impl ScanDelegate for CollectingDelegate {
        fn on_decode(&mut self, text: &str) {
            self.decoded.lock().unwrap().push(text.to_string());
        }

        fn on_dismiss(&mut self) {
            self.dismissals.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn quiet_config(close_after_capture: bool) -> ScanConfig {
        ScanConfig {
            fps: 1000,
            alert_on_scan: false,
            close_after_capture,
            ..ScanConfig::default()
        }
    }

    #[test]
    fn test_session_dismisses_and_releases_source_after_decode() {
        let stops = Arc::new(AtomicUsize::new(0));
        let delegate = CollectingDelegate::default();
        let detector = ScriptedDetector {
            script: vec![vec![], vec!["ticket-42"]],
            cursor: 0,
        };

        let mut session = ScanSession::with_parts(
            quiet_config(true),
            ScriptedSource::new(stops.clone()),
            detector,
            Box::new(delegate.clone()),
        );

        let running = Arc::new(AtomicBool::new(true));
        session.run(running).unwrap();

        assert_eq!(*delegate.decoded.lock().unwrap(), vec!["ticket-42"]);
        assert_eq!(delegate.dismissals.load(Ordering::SeqCst), 1);
        assert!(session.scanner().is_dismissed());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cleared_run_flag_stops_without_decoding() {
        let stops = Arc::new(AtomicUsize::new(0));
        let delegate = CollectingDelegate::default();
        let detector = ScriptedDetector {
            script: vec![vec!["never-seen"]],
            cursor: 0,
        };

        let mut session = ScanSession::with_parts(
            quiet_config(true),
            ScriptedSource::new(stops.clone()),
            detector,
            Box::new(delegate.clone()),
        );

        let running = Arc::new(AtomicBool::new(false));
        session.run(running).unwrap();

        assert!(delegate.decoded.lock().unwrap().is_empty());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_keep_open_session_reports_each_distinct_code() {
        let stops = Arc::new(AtomicUsize::new(0));
        let delegate = CollectingDelegate::default();
        let detector = ScriptedDetector {
            script: vec![vec!["A"], vec!["A"], vec!["B"], vec![], vec!["B"]],
            cursor: 0,
        };

        let mut session = ScanSession::with_parts(
            quiet_config(false),
            ScriptedSource::new(stops.clone()),
            detector,
            Box::new(delegate.clone()),
        );

        // Stop the loop from the delegate side after the script runs out
        // by capping the run flag externally.
        let running = Arc::new(AtomicBool::new(true));
        let r = running.clone();
        let handle = std::thread::spawn(move || {
            let mut session = session;
            session.run(r).unwrap();
            session
        });
        std::thread::sleep(Duration::from_millis(50));
        running.store(false, Ordering::SeqCst);
        let session = handle.join().unwrap();

        assert_eq!(*delegate.decoded.lock().unwrap(), vec!["A", "B"]);
        assert_eq!(delegate.dismissals.load(Ordering::SeqCst), 0);
        assert!(!session.scanner().is_dismissed());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_repeated_source_failures_abort_with_error() {
        struct FailingSource {
            stops: Arc<AtomicUsize>,
        }

        impl FrameSource for FailingSource {
            fn next_frame(&mut self) -> Result<Option<Frame>> {
                Err(anyhow::anyhow!("device unplugged"))
            }

            fn dimensions(&self) -> (u32, u32) {
                (0, 0)
            }

            fn stop(&mut self) {
                self.stops.fetch_add(1, Ordering::SeqCst);
            }
        }

        let stops = Arc::new(AtomicUsize::new(0));
        let delegate = CollectingDelegate::default();
        let detector = ScriptedDetector {
            script: vec![],
            cursor: 0,
        };

        let mut session = ScanSession::with_parts(
            quiet_config(true),
            FailingSource {
                stops: stops.clone(),
            },
            detector,
            Box::new(delegate.clone()),
        );

        let running = Arc::new(AtomicBool::new(true));
        assert!(session.run(running).is_err());
        assert!(delegate.decoded.lock().unwrap().is_empty());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsupported_symbology_fails_before_camera_open() {
        let config = ScanConfig {
            symbologies: vec![Symbology::Code128],
            ..ScanConfig::default()
        };
        let result = QrEngine::new(&config.symbologies);
        assert!(result.is_err());
    }
}
