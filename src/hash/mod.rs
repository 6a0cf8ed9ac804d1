pub mod dhash;
pub mod frame;
pub mod hamming;

pub use dhash::{compute_fingerprint_halves, hash_image, hash_image_file, rgb_to_luma};
pub use frame::{hash_frames, FrameExtractor};
pub use hamming::Fingerprint;
