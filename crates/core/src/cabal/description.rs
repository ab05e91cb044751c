//! In-memory model of a parsed cabal file.

use super::extension::LanguageExtension;

/// The build-relevant fields of one component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildInfo {
    pub hs_source_dirs: Vec<String>,
    pub default_extensions: Vec<LanguageExtension>,
    pub other_extensions: Vec<LanguageExtension>,
    pub build_depends: Vec<String>,
    pub ghc_options: Vec<String>,
    pub main_is: Option<String>,
}

impl BuildInfo {
    /// Monoidal append: lists concatenate, the later `main-is` wins.
    pub fn append(&mut self, other: BuildInfo) {
        self.hs_source_dirs.extend(other.hs_source_dirs);
        self.default_extensions.extend(other.default_extensions);
        self.other_extensions.extend(other.other_extensions);
        self.build_depends.extend(other.build_depends);
        self.ghc_options.extend(other.ghc_options);
        if other.main_is.is_some() {
            self.main_is = other.main_is;
        }
    }
}

/// Raw text of an `if` condition, e.g. `flag(dev) && os(linux)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition(String);

impl Condition {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondBranch {
    pub condition: Condition,
    pub then_tree: CondTree,
    pub else_tree: Option<CondTree>,
}

/// A component body: unconditional fields plus `if`/`else` branches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CondTree {
    pub data: BuildInfo,
    pub branches: Vec<CondBranch>,
}

impl CondTree {
    /// Splice another tree in after this one's own content.
    pub fn merge(&mut self, other: CondTree) {
        self.data.append(other.data);
        self.branches.extend(other.branches);
    }

    /// Flatten the tree, picking each branch according to `eval`.
    pub fn simplify(&self, eval: &dyn Fn(&Condition) -> bool) -> BuildInfo {
        let mut info = self.data.clone();
        for branch in &self.branches {
            if eval(&branch.condition) {
                info.append(branch.then_tree.simplify(eval));
            } else if let Some(else_tree) = &branch.else_tree {
                info.append(else_tree.simplify(eval));
            }
        }
        info
    }

    /// Flatten the tree treating every condition as true.
    ///
    /// Flags, OS and compiler tests are not evaluated: every `if` body is
    /// taken and every `else` body is dropped.
    pub fn simplify_assuming_true(&self) -> BuildInfo {
        self.simplify(&|_| true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    pub default: bool,
    pub manual: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericPackageDescription {
    pub name: String,
    pub version: String,
    pub cabal_version: Option<String>,
    pub flags: Vec<Flag>,
    pub cond_library: Option<CondTree>,
    pub cond_sub_libraries: Vec<(String, CondTree)>,
    pub cond_executables: Vec<(String, CondTree)>,
    pub cond_test_suites: Vec<(String, CondTree)>,
    pub cond_benchmarks: Vec<(String, CondTree)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirs(names: &[&str]) -> BuildInfo {
        BuildInfo {
            hs_source_dirs: names.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn tree() -> CondTree {
        CondTree {
            data: dirs(&["src"]),
            branches: vec![
                CondBranch {
                    condition: Condition::new("flag(dev)"),
                    then_tree: CondTree {
                        data: dirs(&["dev"]),
                        branches: vec![],
                    },
                    else_tree: Some(CondTree {
                        data: dirs(&["release"]),
                        branches: vec![],
                    }),
                },
                CondBranch {
                    condition: Condition::new("os(windows)"),
                    then_tree: CondTree {
                        data: dirs(&["win"]),
                        branches: vec![],
                    },
                    else_tree: None,
                },
            ],
        }
    }

    #[test]
    fn test_simplify_assuming_true_takes_every_then_branch() {
        assert_eq!(
            tree().simplify_assuming_true().hs_source_dirs,
            vec!["src", "dev", "win"]
        );
    }

    #[test]
    fn test_simplify_with_evaluator() {
        let info = tree().simplify(&|cond| cond.as_str() == "os(windows)");
        assert_eq!(info.hs_source_dirs, vec!["src", "release", "win"]);
    }

    #[test]
    fn test_append_keeps_later_main_is() {
        let mut base = BuildInfo {
            main_is: Some("A.hs".to_string()),
            ..Default::default()
        };
        base.append(BuildInfo {
            main_is: Some("B.hs".to_string()),
            ..dirs(&["x"])
        });
        assert_eq!(base.main_is.as_deref(), Some("B.hs"));
        assert_eq!(base.hs_source_dirs, vec!["x"]);
    }
}
