//! Perceptual fingerprints for video frames and images, a compact file
//! format for collections of them, and a vantage-point tree for exact
//! nearest-neighbor and radius search under Hamming distance.

pub mod collection;
pub mod config;
pub mod consts;
pub mod error;
pub mod hash;
pub mod index;
pub mod source;

pub use collection::{compare, deduplicate, FingerprintCollection, SizeClass};
pub use error::{Error, Result};
pub use hash::{compute_fingerprint_halves, Fingerprint, FrameExtractor};
pub use index::{Neighbor, VpTree};
