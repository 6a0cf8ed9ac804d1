use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::consts::{DEFAULT_FPS, DEFAULT_NEIGHBORS};

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Hash a video and save its fingerprint file.
    Write,
    /// Load a fingerprint file, write it back out and compare both.
    Read,
    /// Hash a video and compare it against its saved fingerprint file.
    Check,
    /// Index a directory of fingerprint files and query it.
    Vptree,
    /// Compare two fingerprint files.
    Compare,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub mode: Mode,
    pub input: PathBuf,
    pub compare_with: Option<PathBuf>,
    pub neighbors: usize,
    pub fps: u32,
    pub seed: Option<u64>,
    pub log_filter: String,
}

impl AppConfig {
    /// Defaults, then `framehash.toml` if present, then `FRAMEHASH_*`
    /// environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name("framehash").required(false))
            .add_source(Environment::with_prefix("FRAMEHASH"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("mode", "write")?
            .set_default("neighbors", DEFAULT_NEIGHBORS as i64)?
            .set_default("fps", DEFAULT_FPS as i64)?
            .set_default("log_filter", "info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::builder()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults() -> Result<(), ConfigError> {
        let conf = from_toml(r#"input = "clip.mp4""#)?;
        assert_eq!(conf.mode, Mode::Write);
        assert_eq!(conf.input, PathBuf::from("clip.mp4"));
        assert_eq!(conf.neighbors, DEFAULT_NEIGHBORS);
        assert_eq!(conf.fps, DEFAULT_FPS);
        assert_eq!(conf.seed, None);
        assert_eq!(conf.compare_with, None);
        assert_eq!(conf.log_filter, "info");
        Ok(())
    }

    #[test]
    fn test_overrides() -> Result<(), ConfigError> {
        let conf = from_toml(
            r#"
            mode = "vptree"
            input = "hashes/"
            neighbors = 10
            seed = 42
            log_filter = "framehash=debug"
            "#,
        )?;
        assert_eq!(conf.mode, Mode::Vptree);
        assert_eq!(conf.neighbors, 10);
        assert_eq!(conf.seed, Some(42));
        assert_eq!(conf.log_filter, "framehash=debug");
        Ok(())
    }

    #[test]
    fn test_missing_input_fails() {
        assert!(from_toml("").is_err());
    }

    #[test]
    fn test_unknown_mode_fails() {
        assert!(from_toml("mode = \"shuffle\"\ninput = \"x\"").is_err());
    }
}
