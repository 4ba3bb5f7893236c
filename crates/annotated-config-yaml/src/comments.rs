//! Recovers the comments written above mapping keys.
//!
//! `serde_yaml` drops comments, so the source is scanned line by line next to
//! it. Indentation decides which mapping a `key:` line belongs to. Comment
//! lines accumulate until the next key and are attributed to its path.
//! Sequence items, block scalars and multi-line flow or quoted values are
//! skipped.

/// Lexical state of a flow or quoted value that may continue on later lines.
#[derive(Default)]
struct ValueState {
    depth: usize,
    quote: Option<char>,
}

impl ValueState {
    fn is_open(&self) -> bool {
        self.depth > 0 || self.quote.is_some()
    }

    fn feed(&mut self, text: &str) {
        let mut escaped = false;
        let mut token_start = self.depth > 0 || self.quote.is_none();
        let mut prev_space = true;
        for c in text.chars() {
            if let Some(q) = self.quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' && q == '"' {
                    escaped = true;
                } else if c == q {
                    self.quote = None;
                    token_start = false;
                }
                prev_space = false;
                continue;
            }
            match c {
                '#' if prev_space => return,
                '"' | '\'' if token_start => self.quote = Some(c),
                '[' | '{' if token_start => self.depth += 1,
                ']' | '}' if self.depth > 0 => self.depth -= 1,
                _ => {}
            }
            if c.is_whitespace() {
                prev_space = true;
                continue;
            }
            prev_space = false;
            token_start = self.depth > 0 && matches!(c, '[' | '{' | ',' | ':');
            if self.depth == 0 {
                // Past the first token of a block value nothing can open.
                token_start = false;
            }
        }
    }
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Text of a comment line without the `#` and one following space.
fn comment_text(after_hash: &str) -> String {
    after_hash
        .strip_prefix(' ')
        .unwrap_or(after_hash)
        .trim_end()
        .to_string()
}

fn unescape_double(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Split a `key: value` line (without indentation) into its key and the
/// remaining value text.
pub(crate) fn split_key(line: &str) -> Option<(String, &str)> {
    let value_after = |rest: &str| -> Option<usize> {
        let trimmed = rest.trim_start();
        let skipped = rest.len() - trimmed.len();
        let after = trimmed.strip_prefix(':')?;
        match after.chars().next() {
            None => Some(skipped + 1),
            Some(c) if c.is_whitespace() => Some(skipped + 1),
            _ => None,
        }
    };

    if let Some(inner) = line.strip_prefix('"') {
        let mut escaped = false;
        let end = inner.char_indices().find_map(|(i, c)| {
            if escaped {
                escaped = false;
                None
            } else if c == '\\' {
                escaped = true;
                None
            } else {
                (c == '"').then_some(i)
            }
        })?;
        let rest = &inner[end + 1..];
        let value = value_after(rest)?;
        return Some((unescape_double(&inner[..end]), &rest[value..]));
    }
    if let Some(inner) = line.strip_prefix('\'') {
        let mut chars = inner.char_indices().peekable();
        let mut key = String::new();
        let end = loop {
            let (i, c) = chars.next()?;
            if c != '\'' {
                key.push(c);
            } else if chars.peek().is_some_and(|&(_, next)| next == '\'') {
                chars.next();
                key.push('\'');
            } else {
                break i;
            }
        };
        let rest = &inner[end + 1..];
        let value = value_after(rest)?;
        return Some((key, &rest[value..]));
    }

    let mut prev_space = true;
    let mut chars = line.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '#' if prev_space => return None,
            ':' if chars.peek().is_none_or(|&(_, next)| next.is_whitespace()) => {
                let key = line[..i].trim_end();
                if key.is_empty() {
                    return None;
                }
                return Some((key.to_string(), &line[i + 1..]));
            }
            _ => {}
        }
        prev_space = c.is_whitespace();
    }
    None
}

/// Drop anchors and tags in front of a value.
fn strip_properties(mut value: &str) -> &str {
    loop {
        value = value.trim_start();
        if !(value.starts_with('&') || value.starts_with('!')) {
            return value;
        }
        value = value.find(char::is_whitespace).map_or("", |end| &value[end..]);
    }
}

fn is_blank_value(value: &str) -> bool {
    value.is_empty() || value.starts_with('#')
}

/// Every commented path in `source`, as key segments plus comment lines.
pub(crate) fn scan(source: &str) -> Vec<(Vec<String>, Vec<String>)> {
    let mut found = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    // Open mappings as (indentation, key).
    let mut parents: Vec<(usize, String)> = Vec::new();
    let mut value = ValueState::default();
    // Indentation of the owner of a block scalar being skipped.
    let mut block: Option<usize> = None;
    // Indentation of the open sequence's dashes and of the key owning it.
    let mut sequence: Option<(usize, usize)> = None;

    for line in source.lines() {
        if value.is_open() {
            value.feed(line);
            continue;
        }
        let trimmed = line.trim();
        let indent = indent_of(line);
        if let Some(owner) = block {
            if trimmed.is_empty() || indent > owner {
                continue;
            }
            block = None;
        }
        if trimmed.is_empty() {
            continue;
        }
        if let Some(comment) = trimmed.strip_prefix('#') {
            // Comments between items belong to the sequence, not the next key.
            let in_sequence = sequence
                .is_some_and(|(dash, owner)| indent > dash || (indent == dash && dash > owner));
            if !in_sequence {
                pending.push(comment_text(comment));
            }
            continue;
        }
        if let Some((dash, _)) = sequence {
            if indent > dash || (indent == dash && trimmed.starts_with('-')) {
                continue;
            }
            sequence = None;
        }
        if trimmed == "-" || trimmed.starts_with("- ") {
            let owner = parents.last().map_or(0, |(i, _)| *i);
            sequence = Some((indent, owner));
            pending.clear();
            continue;
        }
        if trimmed.starts_with("---") || trimmed.starts_with("...") || trimmed.starts_with('%') {
            pending.clear();
            continue;
        }
        let Some((key, rest)) = split_key(trimmed) else {
            pending.clear();
            continue;
        };

        while parents.last().is_some_and(|(i, _)| *i >= indent) {
            parents.pop();
        }
        let mut path: Vec<String> = parents.iter().map(|(_, k)| k.clone()).collect();
        path.push(key.clone());
        found.push((path, std::mem::take(&mut pending)));

        let rest = strip_properties(rest);
        if is_blank_value(rest) {
            parents.push((indent, key));
        } else if rest.starts_with('|') || rest.starts_with('>') {
            block = Some(indent);
        } else {
            value.feed(rest);
        }
    }
    found
}
