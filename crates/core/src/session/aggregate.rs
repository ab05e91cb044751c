use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::cabal::LanguageExtension;
use crate::diagnostics::{BufferedDiagnostics, Diagnostics, Severity};
use crate::error::{Error, Result};
use crate::package::{PackageInfo, resolve_package};

/// Outcome of resolving every requested package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Successfully resolved packages, in request order.
    pub resolved_packages: Vec<PackageInfo>,
    /// Directories that produced no library metadata, in request order.
    pub unresolved_packages: Vec<PathBuf>,
}

impl SessionSettings {
    /// Every `package_root/source_dir` pair, package by package.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.resolved_packages
            .iter()
            .flat_map(PackageInfo::rooted_source_dirs)
            .collect()
    }

    /// Union of all default extensions; duplicates collapse.
    pub fn extensions(&self) -> BTreeSet<LanguageExtension> {
        self.resolved_packages
            .iter()
            .flat_map(|package| package.default_extensions.iter().cloned())
            .collect()
    }
}

/// Resolve `dirs` in parallel and partition the results.
///
/// Each package logs into its own buffer; buffers are flushed in request
/// order so one package's messages stay together. Fails with
/// [`Error::NoPackagesResolved`] when nothing resolves.
pub fn aggregate_packages<P>(dirs: &[P], diagnostics: &dyn Diagnostics) -> Result<SessionSettings>
where
    P: AsRef<Path> + Sync,
{
    let outcomes: Vec<(PathBuf, Option<PackageInfo>, BufferedDiagnostics<'_>)> = dirs
        .par_iter()
        .map(|dir| {
            let dir = dir.as_ref();
            let buffer = BufferedDiagnostics::new(diagnostics);
            let info = resolve_package(dir, &buffer);
            (dir.to_path_buf(), info, buffer)
        })
        .collect();

    let mut settings = SessionSettings {
        resolved_packages: Vec::new(),
        unresolved_packages: Vec::new(),
    };
    for (dir, info, buffer) in outcomes {
        buffer.flush();
        match info {
            Some(info) => settings.resolved_packages.push(info),
            None => settings.unresolved_packages.push(dir),
        }
    }

    if settings.resolved_packages.is_empty() {
        return Err(Error::NoPackagesResolved(display_all(dirs)));
    }

    if !settings.unresolved_packages.is_empty() {
        diagnostics.log(
            Severity::Warning,
            &format!(
                "Failed to find pkgs in {}",
                display_all(&settings.unresolved_packages).join(", ")
            ),
        );
    }

    tracing::debug!(
        "Resolved {} of {} packages",
        settings.resolved_packages.len(),
        dirs.len()
    );
    Ok(settings)
}

fn display_all<P: AsRef<Path>>(dirs: &[P]) -> Vec<String> {
    dirs.iter()
        .map(|dir| dir.as_ref().display().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDiagnostics;
    use std::fs;
    use tempfile::TempDir;

    fn cabal_package(root: &Path, name: &str, library: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(format!("{name}.cabal")),
            format!("name: {name}\nversion: 0.1\nlibrary\n{library}"),
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_partition_keeps_request_order() {
        let temp_dir = TempDir::new().unwrap();
        let a = cabal_package(temp_dir.path(), "a", "  hs-source-dirs: src\n");
        let b = temp_dir.path().join("b");
        let c = cabal_package(temp_dir.path(), "c", "  hs-source-dirs: lib\n");

        let diagnostics = RecordingDiagnostics::new();
        let settings = aggregate_packages(&[&a, &b, &c], &diagnostics).unwrap();

        let roots: Vec<_> = settings
            .resolved_packages
            .iter()
            .map(|p| p.package_root.clone())
            .collect();
        assert_eq!(roots, vec![a, c]);
        assert_eq!(settings.unresolved_packages, vec![b.clone()]);

        let warnings = diagnostics.messages_at(Severity::Warning);
        assert_eq!(
            warnings,
            vec![format!("Failed to find pkgs in {}", b.display())]
        );
    }

    #[test]
    fn test_all_unresolved_is_fatal_and_names_every_dir() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");

        let diagnostics = RecordingDiagnostics::new();
        let err = aggregate_packages(&[&a, &b], &diagnostics).unwrap_err();

        match &err {
            Error::NoPackagesResolved(dirs) => {
                assert_eq!(dirs, &vec![a.display().to_string(), b.display().to_string()])
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("No valid pkgs found in "));
    }

    #[test]
    fn test_no_warning_when_everything_resolves() {
        let temp_dir = TempDir::new().unwrap();
        let a = cabal_package(temp_dir.path(), "a", "  hs-source-dirs: src\n");

        let diagnostics = RecordingDiagnostics::new();
        let settings = aggregate_packages(&[a], &diagnostics).unwrap();
        assert!(settings.unresolved_packages.is_empty());
        assert!(diagnostics.entries().is_empty());
    }

    #[test]
    fn test_package_messages_flush_in_request_order() {
        let temp_dir = TempDir::new().unwrap();
        let dirs: Vec<PathBuf> = (0..8)
            .map(|i| {
                cabal_package(
                    temp_dir.path(),
                    &format!("p{i}"),
                    "  hs-source-dir: src\n  extensions: GADTs\n",
                )
            })
            .collect();

        let diagnostics = RecordingDiagnostics::new();
        aggregate_packages(&dirs, &diagnostics).unwrap();

        let warnings = diagnostics.messages_at(Severity::Warning);
        assert_eq!(warnings.len(), 16);
        for (i, pair) in warnings.chunks(2).enumerate() {
            let file = dirs[i].join(format!("p{i}.cabal")).display().to_string();
            assert!(pair[0].starts_with(&file), "{}", pair[0]);
            assert!(pair[1].starts_with(&file), "{}", pair[1]);
        }
    }

    #[test]
    fn test_source_paths_and_extension_union() {
        let temp_dir = TempDir::new().unwrap();
        let p1 = cabal_package(
            temp_dir.path(),
            "p1",
            "  hs-source-dirs: s1a s1b\n  default-extensions: GADTs LambdaCase\n",
        );
        let p2 = cabal_package(
            temp_dir.path(),
            "p2",
            "  hs-source-dirs: s2a\n  default-extensions: LambdaCase\n",
        );

        let settings = aggregate_packages(&[&p1, &p2], &RecordingDiagnostics::new()).unwrap();
        assert_eq!(
            settings.source_paths(),
            vec![p1.join("s1a"), p1.join("s1b"), p2.join("s2a")]
        );
        assert_eq!(
            settings.extensions().into_iter().collect::<Vec<_>>(),
            vec![
                LanguageExtension::Enable("GADTs".to_string()),
                LanguageExtension::Enable("LambdaCase".to_string()),
            ]
        );
    }
}
