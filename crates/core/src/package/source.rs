use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::{Diagnostics, Severity};
use crate::hpack::{self, HpackPackage, PACKAGE_YAML};

/// Where a package's description came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptionSource {
    /// Text of `<dir>/<dir name>.cabal`.
    Native { path: PathBuf, text: String },
    /// A decoded `<dir>/package.yaml`.
    Fallback { path: PathBuf, package: HpackPackage },
    Absent,
}

impl DescriptionSource {
    /// The description as cabal text, labelled with the file it came from.
    pub fn into_cabal_text(self) -> Option<(PathBuf, String)> {
        match self {
            DescriptionSource::Native { path, text } => Some((path, text)),
            DescriptionSource::Fallback { path, package } => {
                Some((path, hpack::render_cabal(&package)))
            }
            DescriptionSource::Absent => None,
        }
    }
}

/// Probe `dir` for a description file.
///
/// A cabal file wins over `package.yaml` when both exist. Read and decode
/// failures are reported through `diagnostics` and yield `Absent`.
pub fn locate_description(dir: &Path, diagnostics: &dyn Diagnostics) -> DescriptionSource {
    let cabal_path = cabal_file_path(dir);
    let hpack_path = dir.join(PACKAGE_YAML);

    if cabal_path.is_file() {
        return match fs::read_to_string(&cabal_path) {
            Ok(text) => DescriptionSource::Native {
                path: cabal_path,
                text,
            },
            Err(e) => {
                diagnostics.log(
                    Severity::Error,
                    &format!("Failed to read {}: {e}", cabal_path.display()),
                );
                DescriptionSource::Absent
            }
        };
    }

    if hpack_path.is_file() {
        return match hpack::decode_package(&hpack_path, &base_name(dir)) {
            Ok(package) => DescriptionSource::Fallback {
                path: hpack_path,
                package,
            },
            Err(e) => {
                diagnostics.log(Severity::Error, &e.to_string());
                DescriptionSource::Absent
            }
        };
    }

    DescriptionSource::Absent
}

/// `<dir>/<dir name>.cabal`
pub fn cabal_file_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}.cabal", base_name(dir)))
}

fn base_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            // `.` and `..` have no file name of their own
            dir.canonicalize()
                .ok()
                .and_then(|abs| abs.file_name().map(|name| name.to_string_lossy().into_owned()))
        })
        .unwrap_or_default()
}
