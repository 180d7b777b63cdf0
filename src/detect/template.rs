//! Reference template loading and mask extraction

use std::path::Path;

use image::{DynamicImage, RgbaImage};

use super::error::{DetectError, DetectResult};

/// A reference pattern with its transparency-derived match mask.
///
/// Immutable once loaded. The alpha plane of the source image doubles as a
/// per-pixel weight mask: transparent pixels contribute nothing to the match
/// score, so non-rectangular icons match cleanly against a rectangular file.
#[derive(Debug, Clone)]
pub struct Template {
    width: u32,
    height: u32,
    channels: u32,
    /// Interleaved samples, `channels` per pixel.
    samples: Vec<u8>,
    /// One weight per pixel: 0 (ignore) or 255 (full weight).
    mask: Vec<u8>,
}

impl Template {
    /// Loads a template image, keeping its alpha channel as the match mask.
    ///
    /// Fails when the file is missing or unreadable, or when the image has
    /// no alpha channel to derive a mask from. With `to_gray` the color
    /// plane is converted to luma once, for the template's lifetime.
    pub fn load(path: impl AsRef<Path>, to_gray: bool) -> DetectResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| DetectError::TemplateLoad {
            path: path.to_path_buf(),
            source,
        })?;
        if !img.color().has_alpha() {
            return Err(DetectError::TemplateMissingAlpha {
                path: path.to_path_buf(),
            });
        }
        Ok(Self::from_rgba(img.to_rgba8(), to_gray))
    }

    /// Builds a template from an in-memory RGBA image.
    pub fn from_rgba(rgba: RgbaImage, to_gray: bool) -> Self {
        let (width, height) = rgba.dimensions();

        let mut mask = Vec::with_capacity((width * height) as usize);
        for pixel in rgba.pixels() {
            mask.push(if pixel[3] == 0 { 0 } else { 255 });
        }

        let color = DynamicImage::ImageRgba8(rgba).to_rgb8();
        let (channels, samples) = if to_gray {
            let luma = DynamicImage::ImageRgb8(color).to_luma8();
            (1, luma.into_raw())
        } else {
            (3, color.into_raw())
        };

        Self {
            width,
            height,
            channels,
            samples,
            mask,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 1 for luma templates, 3 for RGB.
    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn is_luma(&self) -> bool {
        self.channels == 1
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Per-pixel weights, same length as `width * height`.
    pub fn mask(&self) -> &[u8] {
        &self.mask
    }
}
