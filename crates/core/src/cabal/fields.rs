//! Splitting of field values into list entries.

/// Entries separated by whitespace or commas; double quotes group an entry.
/// Used for `hs-source-dirs`, extension lists and `import`.
pub fn split_tokens(value: &str) -> Vec<String> {
    tokenize(value, true)
}

/// Entries separated by whitespace only; used for `ghc-options`.
pub fn split_words(value: &str) -> Vec<String> {
    tokenize(value, false)
}

/// Entries separated by commas, each trimmed; used for `build-depends`.
pub fn split_commas(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|entry| !entry.is_empty())
        .collect()
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "True" | "true" => Some(true),
        "False" | "false" => Some(false),
        _ => None,
    }
}

fn tokenize(value: &str, comma_separates: bool) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            c if !in_quotes && (c.is_whitespace() || (comma_separates && c == ',')) => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() || quoted {
        tokens.push(current);
    }

    tokens
}
