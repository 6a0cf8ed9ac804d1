use std::path::Path;

use image::{imageops::FilterType, DynamicImage, RgbaImage};

use super::hamming::Fingerprint;
use crate::consts::{BLOCK_HEIGHT, BLOCK_WIDTH};
use crate::error::{Error, Result};

const GRID_SIZE: u32 = 8;

/// Fixed-point luma, matching the JFIF float transform
/// `0.299 R + 0.587 G + 0.114 B` to within one step. Halves round up here
/// where the float version floors.
#[inline]
pub fn rgb_to_luma(r: u8, g: u8, b: u8) -> u8 {
    ((19595 * r as u32 + 38470 * g as u32 + 7471 * b as u32 + (1 << 15)) >> 16) as u8
}

/// Difference hash of a 9x9 block, returned as `(vertical, horizontal)`.
///
/// Bit `row * 8 + col` of the vertical hash is set when the pixel is darker
/// than the one below it; the horizontal hash compares against the pixel to
/// the right. See http://www.hackerfactor.com/blog/?/archives/529-Kind-of-Like-That.html
pub fn compute_fingerprint_halves(block: &RgbaImage) -> Result<(u64, u64)> {
    let (width, height) = block.dimensions();
    if width != BLOCK_WIDTH || height != BLOCK_HEIGHT {
        return Err(Error::InvalidDimensions { width, height });
    }

    let mut luma = [[0u8; BLOCK_WIDTH as usize]; BLOCK_HEIGHT as usize];
    for (x, y, pixel) in block.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        luma[y as usize][x as usize] = rgb_to_luma(r, g, b);
    }

    let mut vertical = 0u64;
    let mut horizontal = 0u64;
    let mut bit_pos = 0;

    for y in 0..GRID_SIZE as usize {
        for x in 0..GRID_SIZE as usize {
            if luma[y][x] < luma[y + 1][x] {
                vertical |= 1 << bit_pos;
            }
            if luma[y][x] < luma[y][x + 1] {
                horizontal |= 1 << bit_pos;
            }
            bit_pos += 1;
        }
    }

    Ok((vertical, horizontal))
}

impl Fingerprint {
    pub fn from_block(block: &RgbaImage, ordinal: u32) -> Result<Self> {
        let (vertical, horizontal) = compute_fingerprint_halves(block)?;
        Ok(Self::new(vertical, horizontal, ordinal))
    }
}

/// Hashes an already decoded image of any size by scaling it down to a
/// single block first.
pub fn hash_image(img: &DynamicImage, ordinal: u32) -> Result<Fingerprint> {
    let block = img
        .resize_exact(BLOCK_WIDTH, BLOCK_HEIGHT, FilterType::Triangle)
        .to_rgba8();
    Fingerprint::from_block(&block, ordinal)
}

/// Decodes an image file in-process and hashes it.
pub fn hash_image_file(path: &Path, ordinal: u32) -> Result<Fingerprint> {
    let img = image::open(path)?;
    hash_image(&img, ordinal)
}
