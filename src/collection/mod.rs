use std::collections::HashSet;

use crate::consts::FORMAT_VERSION;
use crate::error::{Error, Result};
use crate::hash::Fingerprint;

pub mod codec;
pub mod file;


pub use codec::SizeClass;

/// An ordered run of fingerprints, usually the sampled frames of one source,
/// in the shape it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintCollection {
    version: u8,
    fingerprints: Vec<Fingerprint>,
}

impl Default for FingerprintCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl FingerprintCollection {
    pub fn new() -> Self {
        Self::with_version(FORMAT_VERSION)
    }

    /// Only version 1 exists; anything else falls back to it.
    pub fn with_version(version: u8) -> Self {
        let version = if version == FORMAT_VERSION {
            version
        } else {
            log::warn!(
                "Unknown format version {}, using {}",
                version,
                FORMAT_VERSION
            );
            FORMAT_VERSION
        };
        Self {
            version,
            fingerprints: Vec::new(),
        }
    }

    pub fn from_fingerprints(fingerprints: Vec<Fingerprint>) -> Self {
        Self {
            version: FORMAT_VERSION,
            fingerprints,
        }
    }

    pub(crate) fn from_parts(version: u8, fingerprints: Vec<Fingerprint>) -> Self {
        Self {
            version,
            fingerprints,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Smallest ordinal width that holds every ordinal in the collection.
    pub fn size_class(&self) -> SizeClass {
        let max_ordinal = self
            .fingerprints
            .iter()
            .map(|f| f.ordinal)
            .max()
            .unwrap_or(0);
        SizeClass::for_max_ordinal(max_ordinal)
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    pub fn fingerprints(&self) -> &[Fingerprint] {
        &self.fingerprints
    }

    pub fn into_fingerprints(self) -> Vec<Fingerprint> {
        self.fingerprints
    }

    pub fn push(&mut self, fingerprint: Fingerprint) {
        self.fingerprints.push(fingerprint);
    }

    pub fn extend(&mut self, fingerprints: impl IntoIterator<Item = Fingerprint>) {
        self.fingerprints.extend(fingerprints);
    }

    pub fn deduplicate(&mut self) {
        let before = self.fingerprints.len();
        self.fingerprints = deduplicate(std::mem::take(&mut self.fingerprints));
        log::debug!(
            "Deduplicated {} fingerprints down to {}",
            before,
            self.fingerprints.len()
        );
    }
}

/// Drops every fingerprint whose `(vertical, horizontal)` pair was already
/// retained earlier, keeping first-seen order. Ordinals are ignored.
pub fn deduplicate(fingerprints: Vec<Fingerprint>) -> Vec<Fingerprint> {
    let mut seen = HashSet::with_capacity(fingerprints.len());
    fingerprints
        .into_iter()
        .filter(|f| seen.insert(f.hashes()))
        .collect()
}

/// Order-independent equality of the hash pairs in two collections.
/// Ordinals are ignored.
pub fn compare(left: &FingerprintCollection, right: &FingerprintCollection) -> Result<()> {
    if left.len() != right.len() {
        return Err(Error::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let available: HashSet<(u64, u64)> = right.fingerprints.iter().map(|f| f.hashes()).collect();
    match left
        .fingerprints
        .iter()
        .find(|f| !available.contains(&f.hashes()))
    {
        Some(missing) => Err(Error::MissingHash {
            vertical: missing.vertical,
            horizontal: missing.horizontal,
        }),
        None => Ok(()),
    }
}
