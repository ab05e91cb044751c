//! hpack `package.yaml` support.
//!
//! A `package.yaml` is decoded into an [`HpackPackage`] and then rendered as
//! cabal text, so that a single cabal parser handles both formats.

pub mod config;
pub mod render;

use std::fs;
use std::path::Path;

pub use config::{CommonFields, Conditional, PackageConfig, SectionConfig};
pub use render::render_cabal;

use crate::error::{Error, Result};

pub const PACKAGE_YAML: &str = "package.yaml";
const DEFAULT_VERSION: &str = "0.0.0";

/// A decoded package with top-level common fields folded into each component.
#[derive(Debug, Clone, PartialEq)]
pub struct HpackPackage {
    pub name: String,
    pub version: String,
    pub synopsis: Option<String>,
    pub license: Option<String>,
    pub library: Option<HpackComponent>,
    pub executables: Vec<(String, HpackComponent)>,
    pub tests: Vec<(String, HpackComponent)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HpackComponent {
    pub main: Option<String>,
    pub exposed_modules: Vec<String>,
    pub other_modules: Vec<String>,
    pub fields: CommonFields,
}

impl HpackComponent {
    fn from_section(top: &CommonFields, section: &SectionConfig) -> Self {
        Self {
            main: section.main.clone(),
            exposed_modules: section.exposed_modules.clone(),
            other_modules: section.other_modules.clone(),
            fields: top.merged_with(&section.common),
        }
    }
}

/// Read and decode a `package.yaml`. `default_name` is used when the file
/// has no `name` key.
pub fn decode_package(path: &Path, default_name: &str) -> Result<HpackPackage> {
    let text = fs::read_to_string(path).map_err(|e| Error::DecodeError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    decode_str(&text, path, default_name)
}

/// Decode `package.yaml` text; `path` only labels errors.
pub fn decode_str(text: &str, path: &Path, default_name: &str) -> Result<HpackPackage> {
    let config: PackageConfig = serde_yaml::from_str(text).map_err(|e| Error::DecodeError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let name = config
        .name
        .clone()
        .unwrap_or_else(|| default_name.to_string());
    if name.trim().is_empty() {
        return Err(Error::DecodeError {
            path: path.to_path_buf(),
            message: "package name is empty".to_string(),
        });
    }

    let top = &config.common;
    let library = config
        .library
        .as_ref()
        .map(|section| HpackComponent::from_section(top, &section.clone().unwrap_or_default()));

    let mut executables = Vec::new();
    if let Some(section) = &config.executable {
        executables.push((name.clone(), HpackComponent::from_section(top, section)));
    }
    executables.extend(
        config
            .executables
            .iter()
            .map(|(exe, section)| (exe.clone(), HpackComponent::from_section(top, section))),
    );

    let tests = config
        .tests
        .iter()
        .map(|(test, section)| (test.clone(), HpackComponent::from_section(top, section)))
        .collect();

    Ok(HpackPackage {
        name,
        version: config
            .version
            .clone()
            .unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        synopsis: config.synopsis.clone(),
        license: config.license.clone(),
        library,
        executables,
        tests,
    })
}
