use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for detection operations.
pub type DetectResult<T> = Result<T, DetectError>;

/// The error type for detector construction and per-frame matching.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("failed to load template {path:?}: {source}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("template {path:?} has no alpha channel to use as a match mask")]
    TemplateMissingAlpha { path: PathBuf },

    #[error(
        "template for detector '{name}' is unusable: fully transparent or without contrast under its mask"
    )]
    TemplateUnusable { name: String },

    #[error(
        "invalid region of interest: rows {row_start}..{row_end}, cols {col_start}..{col_end} must be non-negative and increasing"
    )]
    InvalidRegion {
        row_start: i64,
        row_end: i64,
        col_start: i64,
        col_end: i64,
    },

    #[error(
        "region rows {row_start}..{row_end}, cols {col_start}..{col_end} exceeds frame bounds {frame_width}x{frame_height}"
    )]
    OutOfBounds {
        row_start: u32,
        row_end: u32,
        col_start: u32,
        col_end: u32,
        frame_width: u32,
        frame_height: u32,
    },
}
