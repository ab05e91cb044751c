//! Per-package metadata resolution.
//!
//! [`resolve_package`] turns one package directory into a [`PackageInfo`]:
//! locate the description, parse it as cabal, flatten the library's
//! conditionals and read off source directories and extensions.

pub mod source;

use std::path::{Path, PathBuf};

pub use source::{DescriptionSource, cabal_file_path, locate_description};

use crate::cabal::{LanguageExtension, parse_generic_package_description};
use crate::diagnostics::{Diagnostics, Severity};

/// Source directories of a library, never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDirs(Vec<String>);

impl SourceDirs {
    /// Use the declared list, or `["."]` when nothing was declared.
    pub fn from_declared(dirs: Vec<String>) -> Self {
        if dirs.is_empty() {
            Self(vec![".".to_string()])
        } else {
            Self(dirs)
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Library metadata of one local package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    /// Directory holding the description file.
    pub package_root: PathBuf,
    /// Relative to `package_root`, in declared order.
    pub source_dirs: SourceDirs,
    /// Library-level `default-extensions`, in declared order.
    pub default_extensions: Vec<LanguageExtension>,
}

impl PackageInfo {
    /// `package_root/dir` for every source directory.
    pub fn rooted_source_dirs(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.source_dirs.iter().map(|dir| self.package_root.join(dir))
    }
}

/// Resolve the library metadata of the package in `dir`.
///
/// Returns `None` when there is no description, when it cannot be decoded
/// or parsed, and when it has no library stanza. Only the last case is
/// silent; the others are reported through `diagnostics` first.
pub fn resolve_package(dir: &Path, diagnostics: &dyn Diagnostics) -> Option<PackageInfo> {
    let (path, text) = locate_description(dir, diagnostics).into_cabal_text()?;
    tracing::debug!("Parsing package description {}", path.display());

    let parsed = parse_generic_package_description(&text);
    for warning in &parsed.warnings {
        diagnostics.log(
            Severity::Warning,
            &format!("{}: {warning}", path.display()),
        );
    }

    let description = match parsed.result {
        Ok(description) => description,
        Err(errors) => {
            let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
            diagnostics.log(
                Severity::Error,
                &format!("Failed to parse {}:\n{}", path.display(), details.join("\n")),
            );
            return None;
        }
    };

    let library = description.cond_library.as_ref()?.simplify_assuming_true();

    Some(PackageInfo {
        package_root: path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dir.to_path_buf()),
        source_dirs: SourceDirs::from_declared(library.hs_source_dirs),
        default_extensions: library.default_extensions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDiagnostics;
    use std::fs;
    use tempfile::TempDir;

    fn write_package(temp_dir: &TempDir, name: &str, file: &str, contents: &str) -> PathBuf {
        let dir = temp_dir.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), contents).unwrap();
        dir
    }

    #[test]
    fn test_resolve_cabal_library() {
        let temp_dir = TempDir::new().unwrap();
        let dir = write_package(
            &temp_dir,
            "backend",
            "backend.cabal",
            "\
name: backend
version: 0.1
library
  hs-source-dirs: src, gen, src-bin
  default-extensions: OverloadedStrings, TemplateHaskell
",
        );

        let diagnostics = RecordingDiagnostics::new();
        let info = resolve_package(&dir, &diagnostics).unwrap();

        assert_eq!(info.package_root, dir);
        assert_eq!(info.source_dirs.as_slice(), ["src", "gen", "src-bin"]);
        assert_eq!(
            info.default_extensions,
            vec![
                LanguageExtension::Enable("OverloadedStrings".to_string()),
                LanguageExtension::Enable("TemplateHaskell".to_string()),
            ]
        );
        assert!(diagnostics.entries().is_empty());
    }

    #[test]
    fn test_missing_source_dirs_default_to_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = write_package(
            &temp_dir,
            "common",
            "common.cabal",
            "name: common\nversion: 0.1\nlibrary\n  exposed-modules: Common\n",
        );

        let info = resolve_package(&dir, &RecordingDiagnostics::new()).unwrap();
        assert_eq!(info.source_dirs.as_slice(), ["."]);
        assert!(info.default_extensions.is_empty());
        assert_eq!(info.rooted_source_dirs().collect::<Vec<_>>(), vec![dir.join(".")]);
    }

    #[test]
    fn test_resolve_package_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let dir = write_package(
            &temp_dir,
            "common",
            "package.yaml",
            "library:\n  source-dirs: src\n  default-extensions: [GADTs]\n",
        );

        let info = resolve_package(&dir, &RecordingDiagnostics::new()).unwrap();
        assert_eq!(info.package_root, dir);
        assert_eq!(info.source_dirs.as_slice(), ["src"]);
        assert_eq!(
            info.default_extensions,
            vec![LanguageExtension::Enable("GADTs".to_string())]
        );
    }

    #[test]
    fn test_no_description_is_silent() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("empty");
        fs::create_dir_all(&dir).unwrap();

        let diagnostics = RecordingDiagnostics::new();
        assert!(resolve_package(&dir, &diagnostics).is_none());
        assert!(diagnostics.entries().is_empty());
    }

    #[test]
    fn test_no_library_stanza_is_silent() {
        let temp_dir = TempDir::new().unwrap();
        let dir = write_package(
            &temp_dir,
            "tool",
            "tool.cabal",
            "name: tool\nversion: 1\nexecutable tool\n  main-is: Main.hs\n",
        );

        let diagnostics = RecordingDiagnostics::new();
        assert!(resolve_package(&dir, &diagnostics).is_none());
        assert!(diagnostics.entries().is_empty());
    }

    #[test]
    fn test_parse_failure_reports_every_error() {
        let temp_dir = TempDir::new().unwrap();
        let dir = write_package(
            &temp_dir,
            "broken",
            "broken.cabal",
            "library\n  hs-source-dirs: src\n",
        );

        let diagnostics = RecordingDiagnostics::new();
        assert!(resolve_package(&dir, &diagnostics).is_none());

        let errors = diagnostics.messages_at(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with(&format!("Failed to parse {}", dir.join("broken.cabal").display())));
        assert!(errors[0].contains("No 'name' field."));
        assert!(errors[0].contains("No 'version' field."));
    }

    #[test]
    fn test_parse_warnings_are_reported_and_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let dir = write_package(
            &temp_dir,
            "backend",
            "backend.cabal",
            "name: backend\nversion: 1\nlibrary\n  hs-source-dir: src\n",
        );

        let diagnostics = RecordingDiagnostics::new();
        let info = resolve_package(&dir, &diagnostics).unwrap();
        assert_eq!(info.source_dirs.as_slice(), ["src"]);

        let warnings = diagnostics.messages_at(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("hs-source-dir"));
    }

    #[test]
    fn test_fallback_decode_failure_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        let dir = write_package(&temp_dir, "common", "package.yaml", "library: 7\n");

        let diagnostics = RecordingDiagnostics::new();
        assert!(resolve_package(&dir, &diagnostics).is_none());
        assert_eq!(diagnostics.messages_at(Severity::Error).len(), 1);
    }

    #[test]
    fn test_multiline_package_yaml_header_stays_in_its_field() {
        let temp_dir = TempDir::new().unwrap();
        let dir = write_package(
            &temp_dir,
            "common",
            "package.yaml",
            "\
synopsis: |
  Shared types

  library: yes
license: |
  BSD3
  (see LICENSE)
library:
  source-dirs: src
",
        );

        let diagnostics = RecordingDiagnostics::new();
        let info = resolve_package(&dir, &diagnostics).unwrap();
        assert_eq!(info.source_dirs.as_slice(), ["src"]);
        assert!(diagnostics.entries().is_empty(), "{:?}", diagnostics.entries());
    }

    #[test]
    fn test_package_yaml_source_dir_with_leading_dashes_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let dir = write_package(
            &temp_dir,
            "common",
            "package.yaml",
            "library:\n  source-dirs: [src, --gen]\n",
        );

        let diagnostics = RecordingDiagnostics::new();
        let info = resolve_package(&dir, &diagnostics).unwrap();
        assert_eq!(info.source_dirs.as_slice(), ["src", "--gen"]);
    }
}
