use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::Config;

/// Re-readable view of the configuration file
///
/// Every `load` goes back to disk, so each job run picks up edits made since
/// the previous one. Nothing is cached.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    path: PathBuf,
}

impl ConfigHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> anyhow::Result<Config> {
        Config::load_from_file(&self.path)
            .with_context(|| format!("Failed to load config from {}", self.path.display()))
    }
}
