//! TOML configuration for detector construction
//!
//! ```toml
//! [[detector]]
//! name = "main_skill"
//! template = "assets/main_skill.png"
//! roi = [940, 1040, 1600, 1720]   # row_start, row_end, col_start, col_end
//! grayscale = true
//! threshold = 0.8
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::detect::{DetectError, Detector, RegionOfInterest};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Detect(#[from] DetectError),
}

/// Top-level scan configuration: a list of detector definitions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanConfig {
    #[serde(default, rename = "detector")]
    pub detectors: Vec<DetectorConfig>,
}

/// One detector definition as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    pub name: String,
    pub template: PathBuf,
    /// row_start, row_end, col_start, col_end in frame pixels.
    pub roi: [i64; 4],
    #[serde(default)]
    pub grayscale: bool,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

fn default_threshold() -> f32 {
    0.8
}

impl ScanConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds every configured detector, resolving relative template paths
    /// against `base` (usually the config file's directory). Any failure is
    /// fatal: a misconfigured detector cannot be corrected mid-run.
    pub fn build_detectors(&self, base: &Path) -> Result<Vec<Detector>, ConfigError> {
        self.detectors
            .iter()
            .map(|d| d.build(base).map_err(ConfigError::from))
            .collect()
    }
}

impl DetectorConfig {
    /// Validates the raw ROI numbers. TOML integers arrive signed, so
    /// negative bounds are caught here before the u32 conversion.
    pub fn roi(&self) -> Result<RegionOfInterest, DetectError> {
        let [row_start, row_end, col_start, col_end] = self.roi;
        let invalid = || DetectError::InvalidRegion {
            row_start,
            row_end,
            col_start,
            col_end,
        };
        if row_start < 0 || col_start < 0 {
            return Err(invalid());
        }
        let to_u32 = |v: i64| u32::try_from(v).map_err(|_| invalid());
        RegionOfInterest::new(
            to_u32(row_start)?,
            to_u32(row_end)?,
            to_u32(col_start)?,
            to_u32(col_end)?,
        )
    }

    pub fn build(&self, base: &Path) -> Result<Detector, DetectError> {
        let roi = self.roi()?;
        let template = if self.template.is_absolute() {
            self.template.clone()
        } else {
            base.join(&self.template)
        };
        Detector::new(self.name.as_str(), template, roi, self.grayscale, self.threshold)
    }
}
