//! Per-pattern detection: ROI crop, masked correlation, threshold decision

use std::path::Path;

use image::{DynamicImage, RgbImage, imageops::crop_imm};
use log::{debug, trace};

use super::error::{DetectError, DetectResult};
use super::matcher::MaskedPlan;
use super::region::RegionOfInterest;
use super::template::Template;

/// A confirmed pattern hit, in full-frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Center of the matched pattern, for tap/touch targeting.
    pub center: (u32, u32),
    /// Top-left corner of the bounding box.
    pub top_left: (u32, u32),
    /// Bottom-right corner of the bounding box (exclusive).
    pub bottom_right: (u32, u32),
    /// Raw similarity score at the correlation maximum.
    pub score: f32,
}

/// Locates one reference template inside one region of a frame.
///
/// Constructed once at startup, immutable thereafter, stateless across
/// frames. The similarity threshold is inclusive: a score exactly equal to
/// it counts as a match. The threshold range is not validated here; callers
/// pass values in `[0.0, 1.0]`.
#[derive(Debug)]
pub struct Detector {
    name: String,
    template: Template,
    plan: MaskedPlan,
    roi: RegionOfInterest,
    threshold: f32,
    to_gray: bool,
}

impl Detector {
    /// Loads the template from `template_path` and builds the detector.
    pub fn new(
        name: impl Into<String>,
        template_path: impl AsRef<Path>,
        roi: RegionOfInterest,
        to_gray: bool,
        threshold: f32,
    ) -> DetectResult<Self> {
        let template = Template::load(template_path, to_gray)?;
        Self::from_template(name, template, roi, threshold)
    }

    /// Builds the detector from an already-loaded template. The template's
    /// channel mode decides whether frames are converted to luma.
    pub fn from_template(
        name: impl Into<String>,
        template: Template,
        roi: RegionOfInterest,
        threshold: f32,
    ) -> DetectResult<Self> {
        let name = name.into();
        let plan = MaskedPlan::new(&template)
            .ok_or_else(|| DetectError::TemplateUnusable { name: name.clone() })?;
        Ok(Self {
            to_gray: template.is_luma(),
            name,
            template,
            plan,
            roi,
            threshold,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roi(&self) -> &RegionOfInterest {
        &self.roi
    }

    /// Searches one frame for the template.
    ///
    /// Crops the frame to the ROI, converts the crop to luma when the
    /// template is in luma mode, correlates, and applies the threshold.
    /// Read-only on the frame; only pixels inside the ROI are examined.
    /// Fails with `OutOfBounds` when the ROI does not fit this frame, which
    /// callers treat as recoverable (skip this detector for this frame).
    pub fn find(&self, frame: &RgbImage) -> DetectResult<Option<Detection>> {
        if !self.roi.fits_within(frame.width(), frame.height()) {
            return Err(DetectError::OutOfBounds {
                row_start: self.roi.row_start(),
                row_end: self.roi.row_end(),
                col_start: self.roi.col_start(),
                col_end: self.roi.col_end(),
                frame_width: frame.width(),
                frame_height: frame.height(),
            });
        }

        let crop = crop_imm(
            frame,
            self.roi.col_start(),
            self.roi.row_start(),
            self.roi.width(),
            self.roi.height(),
        )
        .to_image();

        let peak = if self.to_gray {
            let gray = DynamicImage::ImageRgb8(crop).to_luma8();
            self.plan.best_match(gray.as_raw(), gray.width(), gray.height())
        } else {
            self.plan.best_match(crop.as_raw(), crop.width(), crop.height())
        };

        let Some(peak) = peak else {
            trace!("{}: template does not fit region", self.name);
            return Ok(None);
        };
        if peak.score < self.threshold {
            trace!(
                "{}: best score {:.4} below threshold {:.4}",
                self.name, peak.score, self.threshold
            );
            return Ok(None);
        }

        // Remap from ROI-local to frame-global coordinates.
        let left = self.roi.col_start() + peak.x;
        let top = self.roi.row_start() + peak.y;
        let detection = Detection {
            center: (
                left + self.template.width() / 2,
                top + self.template.height() / 2,
            ),
            top_left: (left, top),
            bottom_right: (left + self.template.width(), top + self.template.height()),
            score: peak.score,
        };
        debug!(
            "{}: match at ({}, {}) score {:.4}",
            self.name, left, top, peak.score
        );
        Ok(Some(detection))
    }
}
