//! The part of hpack's `package.yaml` schema that maps onto cabal fields.
//!
//! Keys outside this subset are ignored rather than rejected.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::utils::{one_or_many, present, scalar_string};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(default, deserialize_with = "present")]
    pub library: Option<Option<SectionConfig>>,
    #[serde(default)]
    pub executable: Option<SectionConfig>,
    #[serde(default)]
    pub executables: BTreeMap<String, SectionConfig>,
    #[serde(default)]
    pub tests: BTreeMap<String, SectionConfig>,
}

/// Fields allowed both at the top level and inside every component.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommonFields {
    #[serde(default, deserialize_with = "one_or_many")]
    pub source_dirs: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub default_extensions: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub other_extensions: Vec<String>,
    #[serde(default, deserialize_with = "dependency_list")]
    pub dependencies: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub ghc_options: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub when: Vec<Conditional>,
}

impl CommonFields {
    /// `self` followed by `other`, list by list.
    pub fn merged_with(&self, other: &CommonFields) -> CommonFields {
        let join = |a: &[String], b: &[String]| a.iter().chain(b).cloned().collect::<Vec<_>>();
        CommonFields {
            source_dirs: join(&self.source_dirs, &other.source_dirs),
            default_extensions: join(&self.default_extensions, &other.default_extensions),
            other_extensions: join(&self.other_extensions, &other.other_extensions),
            dependencies: join(&self.dependencies, &other.dependencies),
            ghc_options: join(&self.ghc_options, &other.ghc_options),
            when: self.when.iter().chain(&other.when).cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SectionConfig {
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub exposed_modules: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub other_modules: Vec<String>,
}

/// A `when:` entry, either inline (`condition` plus fields) or with
/// `then`/`else` blocks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Conditional {
    pub condition: String,
    #[serde(flatten)]
    pub body: CommonFields,
    #[serde(default)]
    pub then: Option<CommonFields>,
    #[serde(default, rename = "else")]
    pub otherwise: Option<CommonFields>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDependencies {
    One(String),
    Many(Vec<String>),
    Map(BTreeMap<String, serde_yaml::Value>),
}

/// Dependencies as `name constraint` strings, from a list or a map.
fn dependency_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawDependencies>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawDependencies::One(dep)) => vec![dep],
        Some(RawDependencies::Many(deps)) => deps,
        Some(RawDependencies::Map(deps)) => deps
            .into_iter()
            .map(|(name, constraint)| match constraint_of(&constraint) {
                Some(range) => format!("{name} {range}"),
                None => name,
            })
            .collect(),
    })
}

fn constraint_of(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(range) => Some(range.clone()),
        serde_yaml::Value::Number(version) => Some(format!("=={version}")),
        serde_yaml::Value::Mapping(detail) => detail
            .get("version")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        _ => None,
    }
}
