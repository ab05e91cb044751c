use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use hsboot_core::config::CONFIG_FILE_NAME;
use hsboot_core::hpack::PACKAGE_YAML;
use hsboot_core::package::cabal_file_path;
use hsboot_core::SessionConfig;

use super::SessionOptions;

pub fn init_command(options: &SessionOptions, force: bool) -> Result<()> {
    let project_root = options.project_root()?;
    println!("🚀 Initializing hsboot in: {}", project_root.display());

    let config_path = project_root.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    let mut config = SessionConfig::default();
    if !options.packages.is_empty() {
        config.packages = options.packages.clone();
    } else {
        let detected = find_package_dirs(&project_root);
        if detected.is_empty() {
            println!(
                "📦 No packages found, using defaults: {}",
                config.packages.join(", ")
            );
        } else {
            println!("📦 Found {} packages: {}", detected.len(), detected.join(", "));
            config.packages = detected;
        }
    }

    config
        .save_to_file(&config_path)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    info!("Created config: {}", config_path.display());

    println!("✅ Created config: {}", config_path.display());
    println!("\n📌 Start a session with:");
    println!("   hsboot repl");
    Ok(())
}

/// Directories up to two levels below `root` holding `<dir>/<dir>.cabal` or
/// `<dir>/package.yaml`, relative to `root` and sorted.
pub fn find_package_dirs(root: &Path) -> Vec<String> {
    let mut found: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden and build output directories
            e.depth() == 0
                || e.file_name()
                    .to_str()
                    .map(|name| !name.starts_with('.') && name != "dist-newstyle")
                    .unwrap_or(false)
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir() && is_package_dir(e.path()))
        .filter_map(|e| relative(root, e.path()))
        .collect();
    found.sort();
    debug!("Detected package directories: {:?}", found);
    found
}

fn is_package_dir(dir: &Path) -> bool {
    cabal_file_path(dir).is_file() || dir.join(PACKAGE_YAML).is_file()
}

fn relative(root: &Path, path: &Path) -> Option<String> {
    let rel: PathBuf = path.strip_prefix(root).ok()?.to_path_buf();
    Some(
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_package_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for (dir, file) in [
            ("backend", "backend.cabal"),
            ("common", "package.yaml"),
            ("libs/util", "util.cabal"),
            ("docs", "README.md"),
            ("frontend", "other.cabal"),
            (".hidden", "hidden.cabal"),
        ] {
            fs::create_dir_all(root.join(dir)).unwrap();
            let name = file.replace("hidden.cabal", ".hidden.cabal");
            fs::write(root.join(dir).join(name), "").unwrap();
        }

        assert_eq!(find_package_dirs(root), vec!["backend", "common", "libs/util"]);
    }

    #[test]
    fn test_find_package_dirs_empty_project() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_package_dirs(temp_dir.path()).is_empty());
    }
}
