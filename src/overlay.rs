//! Debug overlay drawing and the injectable visualization sink
//!
//! Nothing here participates in the detection decision. Helpers mutate the
//! frame in place; the [`FrameSink`] seam keeps the scan loop headless so
//! display or recording backends stay external.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use log::info;

use crate::detect::{Detection, Detector, RegionOfInterest};

const DETECTION_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const REGION_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const TOUCH_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const TOUCH_RADIUS: i32 = 6;

/// Outline the bounding box of a confirmed hit.
pub fn draw_detection(frame: &mut RgbImage, hit: &Detection) {
    let (x0, y0) = hit.top_left;
    let (x1, y1) = hit.bottom_right;
    let rect = Rect::at(x0 as i32, y0 as i32).of_size(
        x1.saturating_sub(x0).max(1),
        y1.saturating_sub(y0).max(1),
    );
    draw_hollow_rect_mut(frame, rect, DETECTION_COLOR);
}

/// Outline a detector's search window.
pub fn draw_region(frame: &mut RgbImage, roi: &RegionOfInterest) {
    draw_hollow_rect_mut(frame, roi.to_rect(), REGION_COLOR);
}

/// Mark the tap/touch point at a detection's center.
pub fn draw_touch_point(frame: &mut RgbImage, point: (u32, u32)) {
    draw_filled_circle_mut(
        frame,
        (point.0 as i32, point.1 as i32),
        TOUCH_RADIUS,
        TOUCH_COLOR,
    );
}

/// Per-frame consumer of scan output.
///
/// `on_detection` may annotate the frame in place; `on_frame` fires once per
/// frame after all detectors ran, which is where a display or recorder would
/// hook in.
pub trait FrameSink {
    fn on_detection(&mut self, frame: &mut RgbImage, detector: &Detector, hit: &Detection);
    fn on_frame(&mut self, frame_index: u64, frame: &RgbImage);
}

/// Draws the standard debug overlay for every hit. The detector's name is
/// reported through the log in place of a rasterized text label.
#[derive(Debug, Default)]
pub struct OverlaySink {
    /// Also outline each firing detector's search window.
    pub draw_regions: bool,
}

impl FrameSink for OverlaySink {
    fn on_detection(&mut self, frame: &mut RgbImage, detector: &Detector, hit: &Detection) {
        if self.draw_regions {
            draw_region(frame, detector.roi());
        }
        draw_detection(frame, hit);
        draw_touch_point(frame, hit.center);
        info!(
            "{} at ({}, {}) score {:.3}",
            detector.name(),
            hit.center.0,
            hit.center.1,
            hit.score
        );
    }

    fn on_frame(&mut self, _frame_index: u64, _frame: &RgbImage) {}
}

/// Discards everything; for headless counting runs and tests.
#[derive(Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn on_detection(&mut self, _frame: &mut RgbImage, _detector: &Detector, _hit: &Detection) {}
    fn on_frame(&mut self, _frame_index: u64, _frame: &RgbImage) {}
}
