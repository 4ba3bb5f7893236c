//! Recovers the comments written above keys and table headers.
//!
//! The `toml` parser drops comments, so the source is scanned line by line
//! alongside it. Comment lines accumulate until the next key or `[header]`
//! and are attributed to that path. Bodies of `[[array]]` tables and the
//! continuation lines of multi-line strings and arrays are skipped.

/// Lexical state carried across the lines of one value.
#[derive(Default)]
struct ValueState {
    depth: usize,
    multiline: Option<&'static str>,
}

impl ValueState {
    fn is_open(&self) -> bool {
        self.depth > 0 || self.multiline.is_some()
    }

    fn feed(&mut self, text: &str) {
        let mut rest = text;
        while !rest.is_empty() {
            if let Some(delimiter) = self.multiline {
                match rest.find(delimiter) {
                    Some(i) => {
                        rest = &rest[i + delimiter.len()..];
                        self.multiline = None;
                    }
                    None => return,
                }
                continue;
            }
            if rest.starts_with("\"\"\"") {
                self.multiline = Some("\"\"\"");
                rest = &rest[3..];
                continue;
            }
            if rest.starts_with("'''") {
                self.multiline = Some("'''");
                rest = &rest[3..];
                continue;
            }
            let Some(c) = rest.chars().next() else { break };
            match c {
                '"' => match closing_quote(&rest[1..], '"') {
                    Some(end) => {
                        rest = &rest[1 + end..];
                        continue;
                    }
                    None => return,
                },
                '\'' => match closing_quote(&rest[1..], '\'') {
                    Some(end) => {
                        rest = &rest[1 + end..];
                        continue;
                    }
                    None => return,
                },
                '#' => return,
                '[' | '{' => self.depth += 1,
                ']' | '}' => self.depth = self.depth.saturating_sub(1),
                _ => {}
            }
            rest = &rest[c.len_utf8()..];
        }
    }
}

/// Byte offset just past the closing `quote` in `s` (which starts after the
/// opening quote). Backslash escapes only apply to basic strings.
fn closing_quote(s: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' && quote == '"' {
            escaped = true;
        } else if c == quote {
            return Some(i + c.len_utf8());
        }
    }
    None
}

/// Split a (possibly dotted, possibly quoted) key into its segments.
pub(crate) fn split_key(raw: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut rest = raw.trim();
    while !rest.is_empty() {
        let segment;
        if let Some(inner) = rest.strip_prefix('"') {
            let end = closing_quote(inner, '"').unwrap_or(inner.len());
            segment = unescape(&inner[..end.saturating_sub(1)]);
            rest = &inner[end..];
        } else if let Some(inner) = rest.strip_prefix('\'') {
            let end = closing_quote(inner, '\'').unwrap_or(inner.len());
            segment = inner[..end.saturating_sub(1)].to_string();
            rest = &inner[end..];
        } else {
            let end = rest.find('.').unwrap_or(rest.len());
            segment = rest[..end].trim().to_string();
            rest = &rest[end..];
        }
        segments.push(segment);
        rest = rest.trim_start();
        rest = rest.strip_prefix('.').unwrap_or(rest).trim_start();
    }
    segments
}

fn unescape(s: &str) -> String {
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
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Position of the `=` separating key from value, ignoring quoted keys.
fn key_end(line: &str) -> Option<usize> {
    unquoted(line, '=')
}

/// Position of the first `target` outside quotes and before any comment.
fn unquoted(line: &str, target: char) -> Option<usize> {
    let mut quote = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' && q == '"' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                c if c == target => return Some(i),
                '#' => return None,
                _ => {}
            },
        }
    }
    None
}

/// Text of a comment line without the `#` and one following space.
pub(crate) fn comment_text(after_hash: &str) -> String {
    after_hash
        .strip_prefix(' ')
        .unwrap_or(after_hash)
        .trim_end()
        .to_string()
}

/// Every commented path in `source`, as key segments plus comment lines.
pub(crate) fn scan(source: &str) -> Vec<(Vec<String>, Vec<String>)> {
    let mut found = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    // `None` while inside an array of tables, whose keys are not addressable.
    let mut table: Option<Vec<String>> = Some(Vec::new());
    let mut value = ValueState::default();

    for line in source.lines() {
        if value.is_open() {
            value.feed(line);
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(comment) = trimmed.strip_prefix('#') {
            pending.push(comment_text(comment));
            continue;
        }
        if trimmed.starts_with("[[") {
            table = None;
            pending.clear();
            continue;
        }
        if let Some(header) = trimmed.strip_prefix('[') {
            let inner = unquoted(header, ']').map_or(header, |end| &header[..end]);
            let segments = split_key(inner);
            found.push((segments.clone(), std::mem::take(&mut pending)));
            table = Some(segments);
            continue;
        }
        let Some(eq) = key_end(trimmed) else {
            pending.clear();
            continue;
        };
        match &table {
            Some(prefix) => {
                let mut path = prefix.clone();
                path.extend(split_key(&trimmed[..eq]));
                found.push((path, std::mem::take(&mut pending)));
            }
            None => pending.clear(),
        }
        value.feed(&trimmed[eq + 1..]);
    }
    found
}
