use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::FingerprintCollection;
use crate::consts::FILE_EXTENSION;
use crate::error::{Error, Result};
use crate::hash::Fingerprint;

/// `clip.mp4` is stored as `clip.mp4.tur`.
pub fn output_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(FILE_EXTENSION);
    PathBuf::from(name)
}

impl FingerprintCollection {
    /// Writes the encoded collection next to `path` and returns where it went.
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        let out = output_path(path);
        fs::write(&out, self.encode())?;
        log::info!("Wrote {} fingerprints to {:?}", self.len(), out);
        Ok(out)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::decode(&bytes)
    }
}

/// Collects the fingerprints of every fingerprint file below `dir`.
/// Files that are not fingerprint files are skipped; any other failure
/// aborts the scan.
pub fn load_directory(dir: &Path) -> Result<Vec<Fingerprint>> {
    let mut fingerprints = Vec::new();
    let mut files = 0usize;
    visit(dir, &mut |path: &Path| {
        match FingerprintCollection::load(path) {
            Ok(collection) => {
                files += 1;
                fingerprints.extend(collection.into_fingerprints());
            }
            Err(Error::InvalidHeader) => {
                log::debug!("Skipping {:?}: not a fingerprint file", path);
            }
            Err(e) => return Err(e),
        }
        Ok(())
    })?;

    log::info!(
        "Loaded {} fingerprints from {} files in {:?}",
        fingerprints.len(),
        files,
        dir
    );
    Ok(fingerprints)
}

/// Depth-first walk over regular files, in name order.
pub(crate) fn visit(dir: &Path, f: &mut dyn FnMut(&Path) -> Result<()>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            visit(&path, f)?;
        } else {
            f(&path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> Result<PathBuf> {
        let dir = std::env::temp_dir().join(format!("framehash_{:x}", Uuid::new_v4().as_simple()));
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("videos/clip.mp4")),
            PathBuf::from("videos/clip.mp4.tur")
        );
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = temp_dir()?;
        let collection = FingerprintCollection::from_fingerprints(vec![
            Fingerprint::new(1, 2, 1),
            Fingerprint::new(3, 4, 300),
        ]);

        let written = collection.save(&dir.join("clip.mp4"))?;
        assert_eq!(written, dir.join("clip.mp4.tur"));
        assert_eq!(FingerprintCollection::load(&written)?, collection);

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let result = FingerprintCollection::load(Path::new("/definitely/not/here.tur"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_directory_skips_foreign_files() -> Result<()> {
        let dir = temp_dir()?;
        let nested = dir.join("nested");
        fs::create_dir_all(&nested)?;

        FingerprintCollection::from_fingerprints(vec![Fingerprint::new(1, 1, 1)])
            .save(&dir.join("a"))?;
        FingerprintCollection::from_fingerprints(vec![
            Fingerprint::new(2, 2, 1),
            Fingerprint::new(3, 3, 2),
        ])
        .save(&nested.join("b"))?;
        fs::write(dir.join("notes.txt"), b"hello there")?;

        let fingerprints = load_directory(&dir)?;
        assert_eq!(
            fingerprints,
            vec![
                Fingerprint::new(1, 1, 1),
                Fingerprint::new(2, 2, 1),
                Fingerprint::new(3, 3, 2),
            ]
        );

        fs::remove_dir_all(&dir)?;
        Ok(())
    }

    #[test]
    fn test_load_directory_fails_on_truncated_file() -> Result<()> {
        let dir = temp_dir()?;
        let bytes = FingerprintCollection::from_fingerprints(vec![Fingerprint::new(1, 1, 1)]).encode();
        fs::write(dir.join("broken.tur"), &bytes[..bytes.len() - 1])?;

        let result = load_directory(&dir);
        assert!(matches!(result, Err(Error::TruncatedData { .. })));

        fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
