//! Sequential video/image-set scanning
//!
//! A [`Scanner`] pulls frames from a [`FrameSource`] in order and runs every
//! detector against each frame, forwarding hits to a
//! [`crate::overlay::FrameSink`]. Strictly single-threaded: one frame is
//! acquired, matched and drawn before the next is requested.

pub mod scanner;
pub mod source;

pub use scanner::{ScanError, ScanState, ScanSummary, Scanner, StopHandle};
pub use source::{FrameSource, ImageDirSource, MemorySource, SourceError, SourceResult};
