//! Sequential frame sources

use std::path::{Path, PathBuf};

use image::RgbImage;
use log::debug;
use thiserror::Error;

/// A specialized `Result` type for frame acquisition.
pub type SourceResult<T> = Result<T, SourceError>;

/// Source-level failures. These are fatal to a scan, unlike per-frame
/// detector failures.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read frame directory {path:?}: {source}")]
    Dir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode frame {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Ordered supplier of full-resolution frames.
///
/// `Ok(None)` signals normal exhaustion. Consumed strictly in order by a
/// single owner; there is no rewind.
pub trait FrameSource {
    fn next_frame(&mut self) -> SourceResult<Option<RgbImage>>;
}

/// Frames from image files in a directory, in lexicographic filename order.
///
/// The supported offline form of a video: a directory of extracted frames.
#[derive(Debug)]
pub struct ImageDirSource {
    files: Vec<PathBuf>,
    next: usize,
}

impl ImageDirSource {
    pub fn open(dir: impl AsRef<Path>) -> SourceResult<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| SourceError::Dir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SourceError::Dir {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file()
                && matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("png" | "jpg" | "jpeg" | "bmp")
                )
            {
                files.push(path);
            }
        }
        files.sort();

        debug!("{} frames queued from {:?}", files.len(), dir);
        Ok(Self { files, next: 0 })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> SourceResult<Option<RgbImage>> {
        let Some(path) = self.files.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        let img = image::open(path).map_err(|source| SourceError::Decode {
            path: path.clone(),
            source,
        })?;
        Ok(Some(img.to_rgb8()))
    }
}

/// In-memory frame sequence, for tests and synthetic runs.
pub struct MemorySource {
    frames: std::vec::IntoIter<RgbImage>,
}

impl MemorySource {
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> SourceResult<Option<RgbImage>> {
        Ok(self.frames.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_drains_in_order() {
        let frames = vec![
            RgbImage::new(2, 2),
            RgbImage::new(3, 3),
            RgbImage::new(4, 4),
        ];
        let mut source = MemorySource::new(frames);

        assert_eq!(source.next_frame().unwrap().unwrap().width(), 2);
        assert_eq!(source.next_frame().unwrap().unwrap().width(), 3);
        assert_eq!(source.next_frame().unwrap().unwrap().width(), 4);
        assert!(source.next_frame().unwrap().is_none());
        // Stays exhausted
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_image_dir_source_missing_directory() {
        let err = ImageDirSource::open("does/not/exist").unwrap_err();
        assert!(matches!(err, SourceError::Dir { .. }));
    }
}
