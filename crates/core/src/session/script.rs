use std::path::Path;

use super::aggregate::SessionSettings;

/// Keep the user's package database out of the session.
pub const DISABLE_USER_PACKAGE_DB: &str = "-no-user-package-db";

/// Loaded by the interpreter on start-up.
pub const INIT_SCRIPT: &str = "\
:load Backend Frontend
import qualified Obelisk.Run
import qualified Frontend
import qualified Backend
";

#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: char = ':';

/// Interpreter flags plus init script for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionScript {
    pub interpreter_args: Vec<String>,
    pub init_script_text: String,
}

impl SessionScript {
    pub fn build(settings: &SessionSettings) -> Self {
        let mut interpreter_args = vec![DISABLE_USER_PACKAGE_DB.to_string()];

        let search_path = settings
            .source_paths()
            .iter()
            .map(|path| path_text(path))
            .collect::<Vec<_>>()
            .join(&PATH_LIST_SEPARATOR.to_string());
        interpreter_args.push(format!("-i{search_path}"));

        interpreter_args.extend(settings.extensions().iter().map(|ext| format!("-X{ext}")));

        Self {
            interpreter_args,
            init_script_text: INIT_SCRIPT.to_string(),
        }
    }

    /// Flags joined by single spaces, as printed by `ide-args`.
    pub fn args_line(&self) -> String {
        self.interpreter_args.join(" ")
    }
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cabal::LanguageExtension;
    use crate::package::{PackageInfo, SourceDirs};
    use std::path::PathBuf;

    fn package(root: &str, dirs: &[&str], extensions: &[&str]) -> PackageInfo {
        PackageInfo {
            package_root: PathBuf::from(root),
            source_dirs: SourceDirs::from_declared(dirs.iter().map(|d| d.to_string()).collect()),
            default_extensions: extensions
                .iter()
                .map(|e| LanguageExtension::classify(e))
                .collect(),
        }
    }

    fn settings(packages: Vec<PackageInfo>) -> SessionSettings {
        SessionSettings {
            resolved_packages: packages,
            unresolved_packages: Vec::new(),
        }
    }

    #[cfg(not(windows))]
    #[test]
    fn test_search_path_joins_every_root_and_dir() {
        let script = SessionScript::build(&settings(vec![
            package("p1", &["s1a", "s1b"], &[]),
            package("p2", &["s2a"], &[]),
        ]));
        assert_eq!(
            script.interpreter_args,
            vec!["-no-user-package-db", "-ip1/s1a:p1/s1b:p2/s2a"]
        );
    }

    #[test]
    fn test_no_extension_flags_when_union_is_empty() {
        let script = SessionScript::build(&settings(vec![package("p", &[], &[])]));
        assert_eq!(script.interpreter_args.len(), 2);
        assert!(!script.interpreter_args.iter().any(|a| a.starts_with("-X")));
    }

    #[test]
    fn test_one_flag_per_unique_extension() {
        let script = SessionScript::build(&settings(vec![
            package("a", &["src"], &["TemplateHaskell", "GADTs", "NoImplicitPrelude"]),
            package("b", &["src"], &["GADTs", "TemplateHaskell"]),
        ]));
        assert_eq!(
            &script.interpreter_args[2..],
            ["-XGADTs", "-XTemplateHaskell", "-XNoImplicitPrelude"]
        );
    }

    #[test]
    fn test_init_script_text() {
        let script = SessionScript::build(&settings(vec![package("p", &[], &[])]));
        insta::assert_snapshot!(script.init_script_text, @r"
        :load Backend Frontend
        import qualified Obelisk.Run
        import qualified Frontend
        import qualified Backend
        ");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_args_line() {
        let script = SessionScript::build(&settings(vec![package("p", &[], &["GADTs"])]));
        assert_eq!(script.args_line(), "-no-user-package-db -ip/. -XGADTs");
    }
}
