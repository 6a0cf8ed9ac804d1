use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid dimensions {width}x{height}, must be a 9x9 block")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("invalid header")]
    InvalidHeader,
    #[error("reached end of data: expected {expected} bytes, found {actual}. Maybe the record count is incorrect?")]
    TruncatedData { expected: usize, actual: usize },
    #[error("invalid size class {0}, must be 1, 2 or 4")]
    InvalidSizeClass(u8),
    #[error("collection lengths are different: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("could not find hash in second collection: V: {vertical}, H: {horizontal}")]
    MissingHash { vertical: u64, horizontal: u64 },
    #[error("invalid extension for {0:?}")]
    InvalidExtension(PathBuf),
    #[error("frame extraction failed with {status} (stderr: {stderr})")]
    FrameExtraction { status: String, stderr: String },
    #[error("buffer length must be a multiple of the frame size ({frame_len}), but was {len}")]
    MisalignedFrames { len: usize, frame_len: usize },
    #[error("expected exactly one frame, got {0}")]
    UnexpectedFrameCount(usize),
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to load config {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
