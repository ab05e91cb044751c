//! Render an [`HpackPackage`] as cabal text.

use std::fmt::Write;

use super::{CommonFields, HpackComponent, HpackPackage};

const FIELD_INDENT: &str = "    ";

pub fn render_cabal(package: &HpackPackage) -> String {
    let mut out = String::new();

    out.push_str("cabal-version: 1.12\n\n");
    out.push_str("-- This file has been generated from package.yaml by hsboot.\n\n");
    header(&mut out, "name", &package.name);
    header(&mut out, "version", &package.version);
    if let Some(synopsis) = &package.synopsis {
        header(&mut out, "synopsis", synopsis);
    }
    if let Some(license) = &package.license {
        header(&mut out, "license", license);
    }
    header(&mut out, "build-type", "Simple");

    if let Some(library) = &package.library {
        out.push_str("\nlibrary\n");
        component(&mut out, library);
    }
    for (name, executable) in &package.executables {
        let _ = write!(out, "\nexecutable {name}\n");
        component(&mut out, executable);
    }
    for (name, test) in &package.tests {
        let _ = write!(out, "\ntest-suite {name}\n");
        out.push_str("  type: exitcode-stdio-1.0\n");
        component(&mut out, test);
    }

    out
}

/// Later lines of a multi-line value become indented continuation lines,
/// with `.` standing in for blank ones.
fn header(out: &mut String, name: &str, value: &str) {
    let label = format!("{name}:");
    let mut lines = value.trim_end().lines();
    let _ = writeln!(out, "{label:<16}{}", lines.next().unwrap_or(""));
    for line in lines {
        let line = line.trim_end();
        if line.trim_start().is_empty() {
            let _ = writeln!(out, "  .");
        } else {
            let _ = writeln!(out, "  {line}");
        }
    }
}

fn component(out: &mut String, component: &HpackComponent) {
    let indent = "  ";
    if let Some(main) = &component.main {
        let _ = writeln!(out, "{indent}main-is: {main}");
    }
    list(out, indent, "exposed-modules", &component.exposed_modules);
    list(out, indent, "other-modules", &component.other_modules);
    fields(out, indent, &component.fields);
    let _ = writeln!(out, "{indent}default-language: Haskell2010");
}

fn fields(out: &mut String, indent: &str, fields: &CommonFields) {
    let dirs: Vec<String> = fields.source_dirs.iter().map(|d| quote(d)).collect();
    list(out, indent, "hs-source-dirs", &dirs);
    list(out, indent, "default-extensions", &fields.default_extensions);
    list(out, indent, "other-extensions", &fields.other_extensions);
    if !fields.ghc_options.is_empty() {
        let _ = writeln!(out, "{indent}ghc-options: {}", fields.ghc_options.join(" "));
    }
    if !fields.dependencies.is_empty() {
        let _ = writeln!(out, "{indent}build-depends:");
        for (i, dep) in fields.dependencies.iter().enumerate() {
            let separator = if i == 0 { "  " } else { ", " };
            let _ = writeln!(out, "{indent}  {separator}{dep}");
        }
    }

    let nested = format!("{indent}  ");
    for conditional in &fields.when {
        let _ = writeln!(out, "{indent}if {}", conditional.condition);
        let then_fields = match &conditional.then {
            Some(then) => conditional.body.merged_with(then),
            None => conditional.body.clone(),
        };
        self::fields(out, &nested, &then_fields);
        if let Some(otherwise) = &conditional.otherwise {
            let _ = writeln!(out, "{indent}else");
            self::fields(out, &nested, otherwise);
        }
    }
}

fn list(out: &mut String, indent: &str, name: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    let _ = writeln!(out, "{indent}{name}:");
    for value in values {
        let _ = writeln!(out, "{indent}{FIELD_INDENT}{value}");
    }
}

fn quote(value: &str) -> String {
    if value.is_empty()
        || value.starts_with("--")
        || value.contains(|c: char| c.is_whitespace() || c == ',' || c == '"')
    {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}
