//! Turns the layout tree into a [`GenericPackageDescription`].

use std::collections::HashMap;

use super::description::{CondBranch, CondTree, Condition, Flag, GenericPackageDescription};
use super::extension::LanguageExtension;
use super::fields::{parse_bool, split_commas, split_tokens, split_words};
use super::layout::{Field, Item, Section, layout};
use super::{ParseMessage, ParseResult};

const PACKAGE_FIELDS: &[&str] = &[
    "author",
    "bug-reports",
    "build-type",
    "category",
    "copyright",
    "data-dir",
    "data-files",
    "description",
    "extra-doc-files",
    "extra-source-files",
    "extra-tmp-files",
    "homepage",
    "license",
    "license-file",
    "license-files",
    "maintainer",
    "package-url",
    "stability",
    "synopsis",
    "tested-with",
];

/// Component fields that are accepted but not modelled.
const COMPONENT_FIELDS: &[&str] = &[
    "asm-options",
    "asm-sources",
    "autogen-includes",
    "autogen-modules",
    "build-tool-depends",
    "build-tools",
    "buildable",
    "c-sources",
    "cc-options",
    "cmm-options",
    "cmm-sources",
    "cpp-options",
    "cxx-options",
    "cxx-sources",
    "default-language",
    "exposed",
    "exposed-modules",
    "extra-bundled-libraries",
    "extra-framework-dirs",
    "extra-ghci-libraries",
    "extra-lib-dirs",
    "extra-libraries",
    "frameworks",
    "ghc-prof-options",
    "ghc-shared-options",
    "ghcjs-options",
    "ghcjs-prof-options",
    "include-dirs",
    "includes",
    "install-includes",
    "js-sources",
    "ld-options",
    "mixins",
    "other-languages",
    "other-modules",
    "pkgconfig-depends",
    "reexported-modules",
    "scope",
    "signatures",
    "test-module",
    "type",
    "virtual-modules",
    "visibility",
];

/// Parse cabal text. Warnings are collected regardless of the outcome.
pub fn parse_generic_package_description(source: &str) -> ParseResult {
    let mut warnings = Vec::new();
    let items = match layout(source, &mut warnings) {
        Ok(items) => items,
        Err(errors) => {
            return ParseResult {
                warnings,
                result: Err(errors),
            };
        }
    };

    let mut builder = DescriptionBuilder {
        commons: HashMap::new(),
        warnings,
        errors: Vec::new(),
    };
    let description = builder.build(&items);

    ParseResult {
        warnings: builder.warnings,
        result: if builder.errors.is_empty() {
            Ok(description)
        } else {
            Err(builder.errors)
        },
    }
}

struct DescriptionBuilder<'a> {
    commons: HashMap<String, &'a [Item]>,
    warnings: Vec<ParseMessage>,
    errors: Vec<ParseMessage>,
}

impl<'a> DescriptionBuilder<'a> {
    fn warn(&mut self, line: usize, message: impl Into<String>) {
        self.warnings.push(ParseMessage::new(line, message));
    }

    fn error(&mut self, line: usize, message: impl Into<String>) {
        self.errors.push(ParseMessage::new(line, message));
    }

    fn build(&mut self, items: &'a [Item]) -> GenericPackageDescription {
        self.collect_common_stanzas(items);

        let mut description = GenericPackageDescription::default();
        let mut name = None;
        let mut version = None;

        for item in items {
            match item {
                Item::Field(field) => match field.name.as_str() {
                    "name" => name = Some(field.value.trim().to_string()),
                    "version" => version = Some(field.value.trim().to_string()),
                    "cabal-version" => {
                        description.cabal_version = Some(field.value.trim().to_string())
                    }
                    other if PACKAGE_FIELDS.contains(&other) || other.starts_with("x-") => {}
                    other if is_build_info_field(other) => self.warn(
                        field.line,
                        format!("Field \"{other}\" outside of a component is ignored"),
                    ),
                    other => self.warn(field.line, format!("Unknown field: \"{other}\"")),
                },
                Item::Section(section) => self.top_level_section(section, &mut description),
            }
        }

        match name {
            Some(name) if !name.is_empty() => description.name = name,
            _ => self.error(0, "No 'name' field."),
        }
        match version {
            Some(version) if !version.is_empty() => description.version = version,
            _ => self.error(0, "No 'version' field."),
        }

        description
    }

    fn collect_common_stanzas(&mut self, items: &'a [Item]) {
        for item in items {
            let Item::Section(section) = item else {
                continue;
            };
            if section.name != "common" {
                continue;
            }
            if section.args.is_empty() {
                self.error(section.line, "'common' stanza requires a name");
            } else if self
                .commons
                .insert(section.args.clone(), &section.items)
                .is_some()
            {
                self.error(
                    section.line,
                    format!("Duplicate common stanza: {}", section.args),
                );
            }
        }
    }

    fn top_level_section(&mut self, section: &'a Section, description: &mut GenericPackageDescription) {
        match section.name.as_str() {
            "library" => {
                let tree = self.component(&section.items, &mut Vec::new());
                if !section.args.is_empty() {
                    description
                        .cond_sub_libraries
                        .push((section.args.clone(), tree));
                } else if description.cond_library.is_some() {
                    self.error(
                        section.line,
                        "Multiple main libraries; have you forgotten to specify a name for an internal library?",
                    );
                } else {
                    description.cond_library = Some(tree);
                }
            }
            "executable" | "test-suite" | "benchmark" | "foreign-library" => {
                if section.args.is_empty() {
                    self.error(
                        section.line,
                        format!("'{}' stanza requires a name", section.name),
                    );
                    return;
                }
                let tree = self.component(&section.items, &mut Vec::new());
                let entry = (section.args.clone(), tree);
                match section.name.as_str() {
                    "executable" => description.cond_executables.push(entry),
                    "test-suite" => description.cond_test_suites.push(entry),
                    "benchmark" => description.cond_benchmarks.push(entry),
                    _ => {}
                }
            }
            "flag" => {
                if let Some(flag) = self.flag(section) {
                    description.flags.push(flag);
                }
            }
            "common" | "source-repository" | "custom-setup" => {}
            "if" | "else" => self.error(
                section.line,
                format!("Conditional '{}' outside of a component", section.name),
            ),
            other => self.warn(
                section.line,
                format!("Ignoring unknown section type: {other}"),
            ),
        }
    }

    fn component(&mut self, items: &'a [Item], imports: &mut Vec<String>) -> CondTree {
        let mut tree = CondTree::default();
        let mut index = 0;

        while index < items.len() {
            match &items[index] {
                Item::Field(field) => self.component_field(&mut tree, field, imports),
                Item::Section(section) if section.name == "if" => {
                    if section.args.is_empty() {
                        self.error(section.line, "'if' requires a condition");
                    }
                    let then_tree = self.component(&section.items, imports);
                    let else_tree = match items.get(index + 1) {
                        Some(Item::Section(next)) if next.name == "else" => {
                            index += 1;
                            Some(self.component(&next.items, imports))
                        }
                        _ => None,
                    };
                    tree.branches.push(CondBranch {
                        condition: Condition::new(section.args.clone()),
                        then_tree,
                        else_tree,
                    });
                }
                Item::Section(section) if section.name == "else" => {
                    self.error(section.line, "'else' without a preceding 'if'")
                }
                Item::Section(section) => self.warn(
                    section.line,
                    format!(
                        "Ignoring unknown section type inside a component: {}",
                        section.name
                    ),
                ),
            }
            index += 1;
        }

        tree
    }

    fn component_field(&mut self, tree: &mut CondTree, field: &Field, imports: &mut Vec<String>) {
        let value = field.value.as_str();
        match field.name.as_str() {
            "import" => {
                for name in split_tokens(value) {
                    self.import(tree, &name, field.line, imports);
                }
            }
            "hs-source-dirs" => tree.data.hs_source_dirs.extend(split_tokens(value)),
            "hs-source-dir" => {
                self.warn(
                    field.line,
                    "The field \"hs-source-dir\" is deprecated, please use \"hs-source-dirs\"",
                );
                tree.data.hs_source_dirs.extend(split_tokens(value));
            }
            "default-extensions" => tree.data.default_extensions.extend(extensions(value)),
            "extensions" => {
                self.warn(
                    field.line,
                    "The field \"extensions\" is deprecated, please use \"default-extensions\"",
                );
                tree.data.default_extensions.extend(extensions(value));
            }
            "other-extensions" => tree.data.other_extensions.extend(extensions(value)),
            "build-depends" => tree.data.build_depends.extend(split_commas(value)),
            "ghc-options" => tree.data.ghc_options.extend(split_words(value)),
            "main-is" => tree.data.main_is = Some(value.trim().to_string()),
            other if COMPONENT_FIELDS.contains(&other) || other.starts_with("x-") => {}
            other => self.warn(field.line, format!("Unknown field: \"{other}\"")),
        }
    }

    fn import(&mut self, tree: &mut CondTree, name: &str, line: usize, imports: &mut Vec<String>) {
        if imports.iter().any(|seen| seen == name) {
            self.error(line, format!("Cyclic import of common stanza: {name}"));
            return;
        }
        let Some(items) = self.commons.get(name).copied() else {
            self.error(line, format!("Undefined common stanza imported: {name}"));
            return;
        };

        imports.push(name.to_string());
        let imported = self.component(items, imports);
        imports.pop();
        tree.merge(imported);
    }

    fn flag(&mut self, section: &Section) -> Option<Flag> {
        if section.args.is_empty() {
            self.error(section.line, "'flag' stanza requires a name");
            return None;
        }

        let mut flag = Flag {
            name: section.args.to_ascii_lowercase(),
            default: true,
            manual: false,
            description: None,
        };

        for item in &section.items {
            match item {
                Item::Field(field) => match field.name.as_str() {
                    "default" | "manual" => match parse_bool(&field.value) {
                        Some(value) if field.name == "default" => flag.default = value,
                        Some(value) => flag.manual = value,
                        None => self.error(
                            field.line,
                            format!("Invalid boolean for '{}': {}", field.name, field.value),
                        ),
                    },
                    "description" => flag.description = Some(field.value.clone()),
                    "lib" => {}
                    other if other.starts_with("x-") => {}
                    other => self.warn(field.line, format!("Unknown field: \"{other}\"")),
                },
                Item::Section(nested) => self.warn(
                    nested.line,
                    format!("Ignoring unknown section type inside a flag: {}", nested.name),
                ),
            }
        }

        Some(flag)
    }
}

fn extensions(value: &str) -> impl Iterator<Item = LanguageExtension> {
    split_tokens(value)
        .into_iter()
        .map(|token| LanguageExtension::classify(&token))
}

fn is_build_info_field(name: &str) -> bool {
    COMPONENT_FIELDS.contains(&name)
        || matches!(
            name,
            "hs-source-dirs"
                | "hs-source-dir"
                | "default-extensions"
                | "extensions"
                | "other-extensions"
                | "build-depends"
                | "ghc-options"
                | "main-is"
                | "import"
        )
}
