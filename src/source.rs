use std::path::Path;
use std::time::Instant;

use crate::collection::{file::visit, FingerprintCollection};
use crate::consts::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::error::{Error, Result};
use crate::hash::{Fingerprint, FrameExtractor};

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn is_video(path: &Path) -> bool {
    extension(path).is_some_and(|e| VIDEO_EXTENSIONS.contains(e.as_str()))
}

pub fn is_image(path: &Path) -> bool {
    extension(path).is_some_and(|e| IMAGE_EXTENSIONS.contains(e.as_str()))
}

/// Hashes every sampled frame of a video, dropping repeated frames.
pub fn fingerprint_video(extractor: &FrameExtractor, path: &Path) -> Result<FingerprintCollection> {
    if !is_video(path) {
        return Err(Error::InvalidExtension(path.to_path_buf()));
    }

    let start = Instant::now();
    let mut collection = FingerprintCollection::from_fingerprints(extractor.fingerprints(path, true)?);
    let sampled = collection.len();
    collection.deduplicate();

    log::info!(
        "Hashed {:?}: {} frames, {} unique, took {:?}",
        path,
        sampled,
        collection.len(),
        start.elapsed()
    );
    Ok(collection)
}

pub fn fingerprint_image(extractor: &FrameExtractor, path: &Path) -> Result<Fingerprint> {
    if !is_image(path) {
        return Err(Error::InvalidExtension(path.to_path_buf()));
    }

    let fingerprints = extractor.fingerprints(path, false)?;
    match fingerprints.as_slice() {
        [single] => Ok(*single),
        other => Err(Error::UnexpectedFrameCount(other.len())),
    }
}

/// Hashes every image and video below `dir` into one deduplicated
/// collection. Files of other types are ignored.
pub fn fingerprint_directory(extractor: &FrameExtractor, dir: &Path) -> Result<FingerprintCollection> {
    let mut collection = FingerprintCollection::new();
    visit(dir, &mut |path: &Path| {
        let video = is_video(path);
        if video || is_image(path) {
            collection.extend(extractor.fingerprints(path, video)?);
        }
        Ok(())
    })?;

    collection.deduplicate();
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::process::Command;
    use uuid::Uuid;

    #[test]
    fn test_classification() {
        for name in ["a.mp4", "b.mkv", "c.avi", "d.mpg", "E.MP4"] {
            assert!(is_video(Path::new(name)), "{}", name);
            assert!(!is_image(Path::new(name)), "{}", name);
        }
        for name in ["a.jpg", "b.jpeg", "c.png", "d.webp"] {
            assert!(is_image(Path::new(name)), "{}", name);
            assert!(!is_video(Path::new(name)), "{}", name);
        }
        for name in ["a.gif", "b", "c.tur", ".mp4"] {
            assert!(!is_image(Path::new(name)), "{}", name);
            assert!(!is_video(Path::new(name)), "{}", name);
        }
    }

    #[test]
    fn test_rejects_wrong_extension() {
        let extractor = FrameExtractor::default();
        assert!(matches!(
            fingerprint_video(&extractor, Path::new("clip.png")),
            Err(Error::InvalidExtension(_))
        ));
        assert!(matches!(
            fingerprint_image(&extractor, Path::new("photo.mp4")),
            Err(Error::InvalidExtension(_))
        ));
    }

    fn create_test_video(path: &Path, duration: u32, color: &str) -> Result<()> {
        let status = Command::new("ffmpeg")
            .args([
                "-f",
                "lavfi",
                "-i",
                &format!("color=c={}:s=320x240:d={}", color, duration),
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-y",
            ])
            .arg(path)
            .status()?;
        assert!(status.success(), "failed to create test video");
        Ok(())
    }

    #[test]
    #[ignore = "requires ffmpeg"]
    fn test_solid_video_collapses_to_one_fingerprint() -> Result<()> {
        let dir: PathBuf =
            std::env::temp_dir().join(format!("framehash_{:x}", Uuid::new_v4().as_simple()));
        fs::create_dir_all(&dir)?;
        let video = dir.join("red.mp4");
        create_test_video(&video, 2, "red")?;

        let collection = fingerprint_video(&FrameExtractor::default(), &video)?;
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.fingerprints()[0].hashes(), (0, 0));

        let from_dir = fingerprint_directory(&FrameExtractor::default(), &dir)?;
        assert_eq!(from_dir.len(), 1);

        fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
