use std::path::Path;
use std::process::Command;
use std::time::Instant;

use image::RgbaImage;
use rayon::prelude::*;
use tracing::instrument;

use super::hamming::Fingerprint;
use crate::consts::{BLOCK_BYTES, BLOCK_HEIGHT, BLOCK_WIDTH, DEFAULT_FPS};
use crate::error::{Error, Result};

/// Decodes media through an external `ffmpeg` process, which scales every
/// sampled frame down to a raw 9x9 RGBA block on stdout.
pub struct FrameExtractor {
    fps: u32,
}

impl Default for FrameExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

impl FrameExtractor {
    pub fn new(fps: u32) -> Self {
        Self { fps: fps.max(1) }
    }

    fn filter(&self, video: bool) -> String {
        let scale = format!(
            "scale={}x{}:flags=bilinear,format=rgba",
            BLOCK_WIDTH, BLOCK_HEIGHT
        );
        if video {
            format!("fps={},{}", self.fps, scale)
        } else {
            scale
        }
    }

    /// Runs ffmpeg and returns the concatenated raw blocks.
    #[instrument(skip(self))]
    pub fn extract_blocks(&self, path: &Path, video: bool) -> Result<Vec<u8>> {
        let start = Instant::now();
        let filter = self.filter(video);
        log::debug!("Running ffmpeg on {:?} with filter {}", path, filter);

        let output = Command::new("ffmpeg")
            .arg("-hide_banner")
            .arg("-i")
            .arg(path)
            .args(["-vf", &filter, "-f", "rawvideo", "pipe:1"])
            .output()?;

        if !output.status.success() {
            return Err(Error::FrameExtraction {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        log::debug!(
            "Extracting {} bytes of frames took {:?}",
            output.stdout.len(),
            start.elapsed()
        );
        Ok(output.stdout)
    }

    pub fn fingerprints(&self, path: &Path, video: bool) -> Result<Vec<Fingerprint>> {
        let raw = self.extract_blocks(path, video)?;
        hash_frames(&raw)
    }
}

/// Hashes a buffer of back-to-back 9x9 RGBA blocks. Ordinals are the
/// 1-based block positions.
pub fn hash_frames(raw: &[u8]) -> Result<Vec<Fingerprint>> {
    if raw.len() % BLOCK_BYTES != 0 {
        return Err(Error::MisalignedFrames {
            len: raw.len(),
            frame_len: BLOCK_BYTES,
        });
    }

    let start = Instant::now();
    let fingerprints = raw
        .par_chunks_exact(BLOCK_BYTES)
        .enumerate()
        .map(|(i, chunk)| {
            let block = RgbaImage::from_raw(BLOCK_WIDTH, BLOCK_HEIGHT, chunk.to_vec()).ok_or(
                Error::MisalignedFrames {
                    len: chunk.len(),
                    frame_len: BLOCK_BYTES,
                },
            )?;
            Fingerprint::from_block(&block, (i + 1) as u32)
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "Hashing {} frames took {:?}",
        fingerprints.len(),
        start.elapsed()
    );
    Ok(fingerprints)
}
