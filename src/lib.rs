//! Template-based detection of game UI icons in video frames and screenshots.
//!
//! The [`detect`] module owns the per-pattern matching engine (ROI crop,
//! masked normalized correlation, threshold decision, coordinate remap);
//! [`scan`] drives a list of detectors sequentially over a frame source and
//! forwards hits to an [`overlay::FrameSink`].

pub mod config;
pub mod detect;
pub mod overlay;
pub mod scan;

pub use detect::{DetectError, Detection, Detector, RegionOfInterest, Template};
pub use overlay::{FrameSink, NullSink, OverlaySink};
pub use scan::{
    FrameSource, ImageDirSource, MemorySource, ScanError, ScanState, ScanSummary, Scanner,
    SourceError, StopHandle,
};
