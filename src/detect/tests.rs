//! Synthetic-frame tests for the detection engine

use image::{Rgb, RgbImage, Rgba, RgbaImage};

use crate::detect::{DetectError, Detector, RegionOfInterest, Template};

/// Deterministic pseudo-noise frame so matching against the background
/// never accidentally clears a high threshold.
fn noise_frame(width: u32, height: u32, seed: u32) -> RgbImage {
    let mut state = seed.wrapping_mul(747796405).wrapping_add(2891336453);
    let mut next = move || {
        state = state.wrapping_mul(1664525).wrapping_add(1013904223);
        (state >> 24) as u8
    };
    let mut frame = RgbImage::new(width, height);
    for pixel in frame.pixels_mut() {
        *pixel = Rgb([next(), next(), next()]);
    }
    frame
}

/// Icon-like RGBA template: structured color with a transparent border.
fn icon_rgba(width: u32, height: u32) -> RgbaImage {
    let mut rgba = RgbaImage::new(width, height);
    for (x, y, pixel) in rgba.enumerate_pixels_mut() {
        let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
        let v = ((x * 53 + y * 17) % 211) as u8;
        *pixel = if border {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([v, 255 - v, v.wrapping_mul(7), 255])
        };
    }
    rgba
}

/// Copies the opaque pixels of an RGBA template into a frame at (left, top).
fn insert_icon(frame: &mut RgbImage, icon: &RgbaImage, left: u32, top: u32) {
    for (x, y, pixel) in icon.enumerate_pixels() {
        if pixel[3] != 0 {
            frame.put_pixel(left + x, top + y, Rgb([pixel[0], pixel[1], pixel[2]]));
        }
    }
}

fn next_up(value: f32) -> f32 {
    f32::from_bits(value.to_bits() + 1)
}

#[test]
fn test_find_recovers_inserted_icon() {
    let icon = icon_rgba(20, 16);
    let mut frame = noise_frame(200, 150, 7);
    insert_icon(&mut frame, &icon, 70, 40);

    let roi = RegionOfInterest::new(30, 120, 50, 140).unwrap();
    let detector =
        Detector::from_template("icon", Template::from_rgba(icon, false), roi, 0.9).unwrap();

    let hit = detector.find(&frame).unwrap().expect("icon not found");
    assert!(hit.top_left.0.abs_diff(70) <= 1, "x = {}", hit.top_left.0);
    assert!(hit.top_left.1.abs_diff(40) <= 1, "y = {}", hit.top_left.1);
    assert_eq!(hit.bottom_right, (hit.top_left.0 + 20, hit.top_left.1 + 16));
    assert_eq!(hit.center, (hit.top_left.0 + 10, hit.top_left.1 + 8));
    assert!(hit.score >= 0.9);
}

#[test]
fn test_find_in_grayscale_mode() {
    let icon = icon_rgba(14, 14);
    let mut frame = noise_frame(120, 120, 21);
    insert_icon(&mut frame, &icon, 33, 61);

    let roi = RegionOfInterest::new(40, 100, 20, 80).unwrap();
    let detector =
        Detector::from_template("gray", Template::from_rgba(icon, true), roi, 0.85).unwrap();

    let hit = detector.find(&frame).unwrap().expect("icon not found");
    assert!(hit.top_left.0.abs_diff(33) <= 1);
    assert!(hit.top_left.1.abs_diff(61) <= 1);
}

#[test]
fn test_threshold_boundary_is_inclusive() {
    let icon = icon_rgba(12, 10);
    let mut frame = noise_frame(80, 60, 3);
    insert_icon(&mut frame, &icon, 25, 20);
    let roi = RegionOfInterest::new(10, 50, 10, 70).unwrap();
    let template = Template::from_rgba(icon, false);

    // First pass with a zero threshold to learn the exact score.
    let probe = Detector::from_template("probe", template.clone(), roi, 0.0).unwrap();
    let score = probe.find(&frame).unwrap().expect("probe missed").score;

    // Score exactly equal to the threshold is a match.
    let at = Detector::from_template("at", template.clone(), roi, score).unwrap();
    assert!(at.find(&frame).unwrap().is_some());

    // One representable unit above is not.
    let above = Detector::from_template("above", template, roi, next_up(score)).unwrap();
    assert!(above.find(&frame).unwrap().is_none());
}

#[test]
fn test_masked_pixels_do_not_affect_score() {
    let icon = icon_rgba(16, 12);

    // Same icon with garbage color values under the transparent border.
    let mut defaced = icon.clone();
    for pixel in defaced.pixels_mut() {
        if pixel[3] == 0 {
            *pixel = Rgba([217, 3, 94, 0]);
        }
    }

    let mut frame = noise_frame(100, 90, 11);
    insert_icon(&mut frame, &icon, 40, 30);
    let roi = RegionOfInterest::new(20, 80, 20, 90).unwrap();

    let clean =
        Detector::from_template("clean", Template::from_rgba(icon, false), roi, 0.0).unwrap();
    let dirty =
        Detector::from_template("dirty", Template::from_rgba(defaced, false), roi, 0.0).unwrap();

    let a = clean.find(&frame).unwrap().expect("clean missed");
    let b = dirty.find(&frame).unwrap().expect("dirty missed");
    assert_eq!(a.score, b.score);
    assert_eq!(a.top_left, b.top_left);
}

#[test]
fn test_pixels_outside_roi_are_ignored() {
    let icon = icon_rgba(12, 12);
    let mut frame = noise_frame(160, 120, 5);
    // Perfect copy of the icon, but outside the ROI.
    insert_icon(&mut frame, &icon, 120, 90);

    let roi = RegionOfInterest::new(10, 60, 10, 100).unwrap();
    let detector =
        Detector::from_template("outside", Template::from_rgba(icon, false), roi, 0.9).unwrap();

    assert!(detector.find(&frame).unwrap().is_none());
}

#[test]
fn test_roi_exceeding_frame_is_out_of_bounds() {
    let icon = icon_rgba(8, 8);
    let frame = noise_frame(50, 50, 1);

    let roi = RegionOfInterest::new(10, 60, 0, 40).unwrap();
    let detector =
        Detector::from_template("oob", Template::from_rgba(icon, false), roi, 0.8).unwrap();

    let err = detector.find(&frame).unwrap_err();
    assert!(matches!(err, DetectError::OutOfBounds { .. }));
}

#[test]
fn test_fully_transparent_template_rejected_at_construction() {
    let rgba = RgbaImage::from_pixel(6, 6, Rgba([50, 60, 70, 0]));
    let roi = RegionOfInterest::new(0, 20, 0, 20).unwrap();

    let err = Detector::from_template("ghost", Template::from_rgba(rgba, false), roi, 0.8)
        .unwrap_err();
    assert!(matches!(err, DetectError::TemplateUnusable { .. }));
}

#[test]
fn test_find_does_not_mutate_frame() {
    let icon = icon_rgba(10, 10);
    let mut frame = noise_frame(60, 60, 9);
    insert_icon(&mut frame, &icon, 20, 20);
    let before = frame.clone();

    let roi = RegionOfInterest::new(0, 60, 0, 60).unwrap();
    let detector =
        Detector::from_template("pure", Template::from_rgba(icon, false), roi, 0.5).unwrap();
    detector.find(&frame).unwrap();

    assert_eq!(frame.as_raw(), before.as_raw());
}
