use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Magic literal at the start of every fingerprint file. Its lowercase form
/// doubles as the file extension.
pub const FILE_MAGIC: &[u8; 3] = b"TUR";

pub const FILE_EXTENSION: &str = "tur";

pub const FORMAT_VERSION: u8 = 1;

/// magic + version + size class + 4 reserved + u32 count
pub const HEADER_LEN: usize = 13;

/// Pixel block geometry consumed by the hasher.
pub const BLOCK_WIDTH: u32 = 9;
pub const BLOCK_HEIGHT: u32 = 9;
pub const BLOCK_BYTES: usize = (BLOCK_WIDTH * BLOCK_HEIGHT * 4) as usize;

/// Frames sampled per second of video.
pub const DEFAULT_FPS: u32 = 12;

pub const DEFAULT_NEIGHBORS: usize = 5;

pub static VIDEO_EXTENSIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["mp4", "mkv", "avi", "mpg"]));

pub static IMAGE_EXTENSIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["jpg", "jpeg", "png", "webp"]));
