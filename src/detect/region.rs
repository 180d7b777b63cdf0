//! Region-of-interest management for targeted image matching

use imageproc::rect::Rect;

use super::error::{DetectError, DetectResult};

/// Axis-aligned search window in full-frame pixel coordinates.
///
/// Bounds are half-open: `row_start..row_end`, `col_start..col_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionOfInterest {
    row_start: u32,
    row_end: u32,
    col_start: u32,
    col_end: u32,
}

impl RegionOfInterest {
    /// Rejects non-increasing bounds; a degenerate region is a configuration
    /// error, never silently clipped.
    pub fn new(row_start: u32, row_end: u32, col_start: u32, col_end: u32) -> DetectResult<Self> {
        if row_start >= row_end || col_start >= col_end {
            return Err(DetectError::InvalidRegion {
                row_start: row_start as i64,
                row_end: row_end as i64,
                col_start: col_start as i64,
                col_end: col_end as i64,
            });
        }
        Ok(Self {
            row_start,
            row_end,
            col_start,
            col_end,
        })
    }

    pub fn row_start(&self) -> u32 {
        self.row_start
    }

    pub fn row_end(&self) -> u32 {
        self.row_end
    }

    pub fn col_start(&self) -> u32 {
        self.col_start
    }

    pub fn col_end(&self) -> u32 {
        self.col_end
    }

    pub fn width(&self) -> u32 {
        self.col_end - self.col_start
    }

    pub fn height(&self) -> u32 {
        self.row_end - self.row_start
    }

    /// Check that the region lies fully inside a frame of the given size
    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.col_end <= frame_width && self.row_end <= frame_height
    }

    /// Check if this region contains a point
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.col_start && x < self.col_end && y >= self.row_start && y < self.row_end
    }

    /// Drawing rectangle for debug overlays
    pub fn to_rect(&self) -> Rect {
        Rect::at(self.col_start as i32, self.row_start as i32).of_size(self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_region() {
        let roi = RegionOfInterest::new(10, 20, 30, 50).unwrap();
        assert_eq!(roi.height(), 10);
        assert_eq!(roi.width(), 20);
        assert!(roi.fits_within(50, 20));
        assert!(!roi.fits_within(49, 20));
        assert!(!roi.fits_within(50, 19));
    }

    #[test]
    fn test_rejects_non_increasing_bounds() {
        assert!(RegionOfInterest::new(20, 10, 0, 5).is_err());
        assert!(RegionOfInterest::new(10, 10, 0, 5).is_err());
        assert!(RegionOfInterest::new(0, 5, 30, 30).is_err());
        assert!(RegionOfInterest::new(0, 5, 30, 20).is_err());
    }

    #[test]
    fn test_contains_point() {
        let roi = RegionOfInterest::new(10, 20, 30, 50).unwrap();
        assert!(roi.contains(30, 10));
        assert!(roi.contains(49, 19));
        assert!(!roi.contains(50, 10));
        assert!(!roi.contains(30, 20));
        assert!(!roi.contains(29, 15));
    }
}
