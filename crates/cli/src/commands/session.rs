use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::debug;

use hsboot_core::{SessionConfig, discover_project_root};

/// Options shared by every command that touches the project.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub root: Option<PathBuf>,
    /// Overrides the configured package list when non-empty.
    pub packages: Vec<String>,
}

impl SessionOptions {
    pub fn project_root(&self) -> Result<PathBuf> {
        let cwd = env::current_dir().context("Failed to get current directory")?;
        Ok(discover_project_root(self.root.as_deref(), &cwd)?)
    }

    /// Project root plus its configuration, with `--package` applied.
    pub fn load(&self) -> Result<(PathBuf, SessionConfig)> {
        let root = self.project_root()?;
        let mut config = SessionConfig::load_for_root(&root)?;
        if !self.packages.is_empty() {
            debug!("Packages from the command line: {:?}", self.packages);
            config.packages = self.packages.clone();
        }
        Ok((root, config))
    }
}
