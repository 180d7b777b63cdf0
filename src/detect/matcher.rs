//! Masked normalized cross-correlation over raw sample buffers
//!
//! Zero-mean, mask-weighted correlation: samples under a zero-weight mask
//! pixel contribute nothing to the template mean, the template variance or
//! the per-placement image statistics, so two templates that differ only
//! under masked pixels score identically against the same image.

use super::template::Template;

/// Placement windows with less variance than this score 0.0: a flat window
/// has no defined correlation and can never be a real match.
const MIN_VARIANCE: f32 = 1e-6;

/// Best-scoring placement of a template inside a search image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Column of the template's top-left corner, local to the search image.
    pub x: u32,
    /// Row of the template's top-left corner, local to the search image.
    pub y: u32,
    /// Correlation score, in `[-1, 1]` for normalized data.
    pub score: f32,
}

/// Precomputed masked template statistics, reused across frames.
#[derive(Debug, Clone)]
pub struct MaskedPlan {
    width: u32,
    height: u32,
    channels: u32,
    /// Per-sample weight, 0.0 or 1.0 (pixel mask replicated across channels).
    weights: Vec<f32>,
    /// `w * (t - masked mean)` per sample.
    t_prime: Vec<f32>,
    var_t: f32,
    sum_w: f32,
}

impl MaskedPlan {
    /// Returns `None` when the template is fully masked out or has no
    /// contrast under its mask; neither can produce a meaningful score.
    pub fn new(template: &Template) -> Option<Self> {
        let channels = template.channels() as usize;
        let samples = template.samples();
        let mask = template.mask();

        let mut weights = Vec::with_capacity(samples.len());
        for i in 0..samples.len() {
            weights.push(if mask[i / channels] == 0 { 0.0 } else { 1.0 });
        }

        let sum_w: f32 = weights.iter().sum();
        if sum_w <= 0.0 {
            return None;
        }

        let mean = samples
            .iter()
            .zip(&weights)
            .map(|(&s, &w)| w * s as f32)
            .sum::<f32>()
            / sum_w;
        let t_prime: Vec<f32> = samples
            .iter()
            .zip(&weights)
            .map(|(&s, &w)| w * (s as f32 - mean))
            .collect();
        // Weights are 0/1, so t_prime squared already carries the weight.
        let var_t: f32 = t_prime.iter().map(|v| v * v).sum();
        if var_t <= MIN_VARIANCE {
            return None;
        }

        Some(Self {
            width: template.width(),
            height: template.height(),
            channels: template.channels(),
            weights,
            t_prime,
            var_t,
            sum_w,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Scans every placement of the template inside `image` and returns the
    /// single global maximum.
    ///
    /// `image` is interleaved with the same channel count as the template.
    /// Exact score ties resolve to the earliest placement in row-major
    /// order. Returns `None` when the image is smaller than the template.
    pub fn best_match(&self, image: &[u8], img_width: u32, img_height: u32) -> Option<Peak> {
        if img_width < self.width || img_height < self.height {
            return None;
        }
        let ch = self.channels as usize;
        debug_assert_eq!(
            image.len(),
            img_width as usize * img_height as usize * ch
        );

        let tpl_w = self.width as usize;
        let tpl_h = self.height as usize;
        let row_len = tpl_w * ch;
        let img_stride = img_width as usize * ch;

        let mut best: Option<Peak> = None;
        for y in 0..=(img_height - self.height) {
            for x in 0..=(img_width - self.width) {
                let mut dot = 0.0f32;
                let mut sum_i = 0.0f32;
                let mut sum_i2 = 0.0f32;

                for ty in 0..tpl_h {
                    let img_base = (y as usize + ty) * img_stride + x as usize * ch;
                    let tpl_base = ty * row_len;
                    for k in 0..row_len {
                        let w = self.weights[tpl_base + k];
                        let value = image[img_base + k] as f32;
                        dot += self.t_prime[tpl_base + k] * value;
                        sum_i += w * value;
                        sum_i2 += w * value * value;
                    }
                }

                let var_i = sum_i2 - (sum_i * sum_i) / self.sum_w;
                let score = if var_i <= MIN_VARIANCE {
                    0.0
                } else {
                    dot / (self.var_t * var_i).sqrt()
                };

                if score.is_finite() && best.as_ref().is_none_or(|b| score > b.score) {
                    best = Some(Peak { x, y, score });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// Small deterministic template with some internal contrast.
    fn patterned_template(width: u32, height: u32) -> Template {
        let mut rgba = RgbaImage::new(width, height);
        for (x, y, pixel) in rgba.enumerate_pixels_mut() {
            let v = ((x * 37 + y * 91) % 251) as u8;
            *pixel = Rgba([v, v.wrapping_add(40), v.wrapping_mul(3), 255]);
        }
        Template::from_rgba(rgba, true)
    }

    #[test]
    fn test_perfect_match_scores_near_one() {
        let template = patterned_template(8, 6);
        let plan = MaskedPlan::new(&template).unwrap();

        let peak = plan
            .best_match(template.samples(), template.width(), template.height())
            .unwrap();
        assert_eq!((peak.x, peak.y), (0, 0));
        assert!(peak.score > 0.999, "got {}", peak.score);
    }

    #[test]
    fn test_finds_offset_placement() {
        let template = patterned_template(6, 5);
        let plan = MaskedPlan::new(&template).unwrap();

        // 20x12 luma image, template samples copied in at (9, 4).
        let (img_w, img_h) = (20u32, 12u32);
        let mut image = vec![0u8; (img_w * img_h) as usize];
        for ty in 0..5usize {
            for tx in 0..6usize {
                image[(4 + ty) * img_w as usize + 9 + tx] = template.samples()[ty * 6 + tx];
            }
        }

        let peak = plan.best_match(&image, img_w, img_h).unwrap();
        assert_eq!((peak.x, peak.y), (9, 4));
        assert!(peak.score > 0.99);
    }

    #[test]
    fn test_template_larger_than_image() {
        let template = patterned_template(10, 10);
        let plan = MaskedPlan::new(&template).unwrap();
        assert!(plan.best_match(&[0u8; 25], 5, 5).is_none());
    }

    #[test]
    fn test_flat_template_is_rejected() {
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([128, 128, 128, 255]));
        let template = Template::from_rgba(rgba, true);
        assert!(MaskedPlan::new(&template).is_none());
    }

    #[test]
    fn test_fully_masked_template_is_rejected() {
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([128, 7, 9, 0]));
        let template = Template::from_rgba(rgba, false);
        assert!(MaskedPlan::new(&template).is_none());
    }

    #[test]
    fn test_tie_resolves_to_first_in_row_major_order() {
        let template = patterned_template(4, 3);
        let plan = MaskedPlan::new(&template).unwrap();

        // Two identical perfect placements on the same row.
        let (img_w, img_h) = (16u32, 3u32);
        let mut image = vec![0u8; (img_w * img_h) as usize];
        for &x0 in &[2usize, 10usize] {
            for ty in 0..3usize {
                for tx in 0..4usize {
                    image[ty * img_w as usize + x0 + tx] = template.samples()[ty * 4 + tx];
                }
            }
        }

        let peak = plan.best_match(&image, img_w, img_h).unwrap();
        assert_eq!((peak.x, peak.y), (2, 0));
    }
}
