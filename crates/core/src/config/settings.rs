use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".hsboot.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SessionConfig {
    /// Package directories, relative to the project root.
    pub packages: Vec<String>,
    pub interpreter: String,
    pub reloader: String,
    // Only passed to the interpreter that runs under the reloader
    pub reload_options: Vec<String>,
    pub reload_output_file: String,
    /// Nix attribute holding the static assets served by `run`.
    pub asset_attribute: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            packages: vec![
                "backend".to_string(),
                "common".to_string(),
                "frontend".to_string(),
            ],
            interpreter: "ghci".to_string(),
            reloader: "ghcid".to_string(),
            reload_options: vec![
                "-Wall".to_string(),
                "-ignore-dot-ghci".to_string(),
                "-fwarn-redundant-constraints".to_string(),
            ],
            reload_output_file: "ghcid-output.txt".to_string(),
            asset_attribute: "passthru.staticFilesImpure".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            Error::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `.hsboot.json` at `root`, or the defaults when there is none.
    pub fn load_for_root(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!("Loading config from {}", path.display());
            Self::load_from_file(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.packages.is_empty() {
            return Err(Error::ConfigError("`packages` must not be empty".to_string()));
        }
        if let Some(blank) = self.packages.iter().find(|p| p.trim().is_empty()) {
            return Err(Error::ConfigError(format!(
                "invalid package directory {blank:?}"
            )));
        }
        for (field, value) in [
            ("interpreter", &self.interpreter),
            ("reloader", &self.reloader),
            ("reload_output_file", &self.reload_output_file),
            ("asset_attribute", &self.asset_attribute),
        ] {
            if value.trim().is_empty() {
                return Err(Error::ConfigError(format!("`{field}` must not be empty")));
            }
        }
        Ok(())
    }

    /// Walk up from `start_path` looking for `.hsboot.json`, stopping at
    /// `$HOME`.
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self::find_config_file_within(start_path, home.as_deref())
    }

    /// Like [`find_config_file`](Self::find_config_file) with an explicit
    /// boundary; `stop_at` itself is still searched.
    pub fn find_config_file_within(start_path: &Path, stop_at: Option<&Path>) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }

            if stop_at == Some(current) {
                return None;
            }

            current = current.parent()?;
        }
    }
}

/// Pick the project root: `explicit` if given, else the directory of the
/// nearest `.hsboot.json` above `cwd`, else `cwd`. The result is
/// canonicalized and must be a directory.
pub fn discover_project_root(explicit: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    let candidate = match explicit {
        Some(root) => cwd.join(root),
        None => SessionConfig::find_config_file(cwd)
            .and_then(|config| config.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| cwd.to_path_buf()),
    };
    check_project_root(&candidate)
}

fn check_project_root(candidate: &Path) -> Result<PathBuf> {
    let root = candidate
        .canonicalize()
        .map_err(|e| Error::InvalidProjectRoot {
            path: candidate.to_path_buf(),
            reason: e.to_string(),
        })?;
    if !root.is_dir() {
        return Err(Error::InvalidProjectRoot {
            path: root,
            reason: "not a directory".to_string(),
        });
    }
    tracing::debug!("Project root: {}", root.display());
    Ok(root)
}
