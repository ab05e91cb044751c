//! Layout pass: turns cabal text into a tree of fields and sections.
//!
//! Nesting is decided purely by indentation. A line indented deeper than a
//! field continues that field's value; a line indented deeper than a section
//! header belongs to that section. Brace layout is not supported.

use std::sync::LazyLock;

use regex::Regex;

use super::ParseMessage;

static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_.\-]*)\s*:(.*)$").expect("FIELD_RE should compile")
});
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9_\-]*)(?:\s+(.*))?$").expect("SECTION_RE should compile")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Field(Field),
    Section(Section),
}

/// `name: value`, with continuation lines joined by newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Lowercased field name.
    pub name: String,
    pub value: String,
    pub line: usize,
}

/// A header line such as `library`, `executable foo` or `if flag(dev)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Lowercased section keyword.
    pub name: String,
    pub args: String,
    pub items: Vec<Item>,
    pub line: usize,
}

struct Line<'a> {
    number: usize,
    indent: usize,
    content: &'a str,
}

/// Run the layout pass. Warnings are appended to `warnings` even on failure.
pub fn layout(source: &str, warnings: &mut Vec<ParseMessage>) -> Result<Vec<Item>, Vec<ParseMessage>> {
    let lines = significant_lines(source, warnings);
    let mut errors = Vec::new();
    let mut pos = 0;
    let items = parse_block(&lines, &mut pos, None, &mut errors);

    if errors.is_empty() {
        Ok(items)
    } else {
        Err(errors)
    }
}

fn significant_lines<'a>(source: &'a str, warnings: &mut Vec<ParseMessage>) -> Vec<Line<'a>> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let trimmed = raw.trim_end();
        let content = trimmed.trim_start();
        if content.is_empty() || content.starts_with("--") {
            continue;
        }

        let leading = &trimmed[..trimmed.len() - content.len()];
        if leading.contains('\t') {
            warnings.push(ParseMessage::new(index + 1, "Tabs used as indentation"));
        }

        lines.push(Line {
            number: index + 1,
            indent: leading.chars().count(),
            content,
        });
    }

    lines
}

fn parse_block(
    lines: &[Line<'_>],
    pos: &mut usize,
    parent_indent: Option<usize>,
    errors: &mut Vec<ParseMessage>,
) -> Vec<Item> {
    let mut items = Vec::new();
    let Some(first) = lines.get(*pos) else {
        return items;
    };
    let block_indent = first.indent;

    while let Some(line) = lines.get(*pos) {
        if parent_indent.is_some_and(|parent| line.indent <= parent) {
            break;
        }
        *pos += 1;

        if line.indent != block_indent {
            errors.push(ParseMessage::new(
                line.number,
                format!("Unexpected indentation: {}", line.content),
            ));
            skip_nested(lines, pos, line.indent);
            continue;
        }

        if let Some(caps) = FIELD_RE.captures(line.content) {
            let mut value = caps[2].trim().to_string();
            while let Some(next) = lines.get(*pos) {
                if next.indent <= line.indent {
                    break;
                }
                if !value.is_empty() {
                    value.push('\n');
                }
                value.push_str(next.content);
                *pos += 1;
            }

            items.push(Item::Field(Field {
                name: caps[1].to_ascii_lowercase(),
                value,
                line: line.number,
            }));
        } else if let Some(caps) = SECTION_RE.captures(line.content) {
            let items_of_section = parse_block(lines, pos, Some(line.indent), errors);
            items.push(Item::Section(Section {
                name: caps[1].to_ascii_lowercase(),
                args: caps.get(2).map(|m| m.as_str().trim()).unwrap_or("").to_string(),
                items: items_of_section,
                line: line.number,
            }));
        } else {
            errors.push(ParseMessage::new(
                line.number,
                format!("Unexpected line: {}", line.content),
            ));
            skip_nested(lines, pos, line.indent);
        }
    }

    items
}

fn skip_nested(lines: &[Line<'_>], pos: &mut usize, indent: usize) {
    while lines.get(*pos).is_some_and(|next| next.indent > indent) {
        *pos += 1;
    }
}
