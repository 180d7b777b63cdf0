//! Multi-detector sequential scan loop

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};
use thiserror::Error;

use super::source::{FrameSource, SourceError};
use crate::detect::Detector;
use crate::overlay::FrameSink;

/// The error type for scan runs. Per-frame detector failures are logged and
/// isolated; only these end a run abnormally.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("scanner already stopped; runs are not re-entrant")]
    AlreadyStopped,
}

/// Scan lifecycle. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Running,
    Stopped,
}

/// Aggregate counters for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub frames: u64,
    pub detections: u64,
}

/// Cooperative cancellation handle; the scan loop checks it once per frame
/// iteration, so there is no mid-frame cancellation.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives a list of detectors over a sequential frame source.
///
/// Exclusively owns the source. One scanner performs one run: after the
/// source is exhausted, a stop is observed or a source error occurs, the
/// scanner is `Stopped` and further runs fail with
/// [`ScanError::AlreadyStopped`].
pub struct Scanner<S: FrameSource> {
    source: S,
    state: ScanState,
    stop: Arc<AtomicBool>,
}

impl<S: FrameSource> Scanner<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: ScanState::Running,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for external cancellation of the current run.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.stop.clone())
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    fn begin(&self) -> Result<(), ScanError> {
        match self.state {
            ScanState::Running => Ok(()),
            ScanState::Stopped => Err(ScanError::AlreadyStopped),
        }
    }

    /// Runs every detector over every frame, in source and list order.
    ///
    /// Each hit goes to `sink.on_detection` (which may annotate the frame in
    /// place); `sink.on_frame` fires once per frame after all detectors ran.
    /// A per-detector failure on one frame is logged and skipped; a single
    /// corrupt frame never terminates the run.
    pub fn run(
        &mut self,
        detectors: &[Detector],
        sink: &mut dyn FrameSink,
    ) -> Result<ScanSummary, ScanError> {
        self.begin()?;
        info!("scan started with {} detectors", detectors.len());

        let mut summary = ScanSummary::default();
        let result = loop {
            if self.stop.load(Ordering::SeqCst) {
                info!("scan cancelled after {} frames", summary.frames);
                break Ok(summary);
            }

            let mut frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    info!(
                        "source exhausted: {} frames, {} detections",
                        summary.frames, summary.detections
                    );
                    break Ok(summary);
                }
                Err(e) => break Err(ScanError::Source(e)),
            };

            let frame_index = summary.frames;
            for detector in detectors {
                match detector.find(&frame) {
                    Ok(Some(hit)) => {
                        summary.detections += 1;
                        sink.on_detection(&mut frame, detector, &hit);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!("{} skipped on frame {}: {}", detector.name(), frame_index, e);
                    }
                }
            }
            sink.on_frame(frame_index, &frame);
            summary.frames += 1;
        };

        self.state = ScanState::Stopped;
        result
    }

    /// Runs a single detector over every `stride`-th frame (index modulo
    /// `stride` equal to zero) and returns how many sampled frames matched.
    /// A zero stride is treated as 1.
    pub fn count_matches(&mut self, detector: &Detector, stride: u32) -> Result<u64, ScanError> {
        self.begin()?;
        let stride = u64::from(stride.max(1));

        let mut frame_index: u64 = 0;
        let mut count: u64 = 0;
        let result = loop {
            if self.stop.load(Ordering::SeqCst) {
                break Ok(count);
            }

            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break Ok(count),
                Err(e) => break Err(ScanError::Source(e)),
            };

            if frame_index % stride == 0 {
                match detector.find(&frame) {
                    Ok(Some(_)) => count += 1,
                    Ok(None) => {}
                    Err(e) => {
                        warn!("{} skipped on frame {}: {}", detector.name(), frame_index, e);
                    }
                }
            }
            frame_index += 1;
        };

        if let Ok(count) = &result {
            info!(
                "{}: {} matches over {} frames (stride {})",
                detector.name(),
                count,
                frame_index,
                stride
            );
        }
        self.state = ScanState::Stopped;
        result
    }
}
