//! Pattern detection engine
//!
//! One [`Detector`] owns a reference [`Template`] (with its alpha-derived
//! match mask) and a [`RegionOfInterest`] inside the full frame, and exposes
//! a single read-only `find` operation per frame.

pub mod detector;
pub mod error;
pub mod matcher;
pub mod region;
pub mod template;

#[cfg(test)]
mod tests;

// Re-export main types
pub use detector::{Detection, Detector};
pub use error::{DetectError, DetectResult};
pub use matcher::{MaskedPlan, Peak};
pub use region::RegionOfInterest;
pub use template::Template;
