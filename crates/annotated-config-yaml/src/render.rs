//! [`Document`] to block-style YAML text.

use std::fmt::Write as _;

use annotated_config_core::{Document, IndexMap, Node, Table, Value};

const INDENT: usize = 2;

/// Whether `s` can be written without quotes and still read back as the
/// same string.
fn is_plain(s: &str) -> bool {
    if s.is_empty()
        || s.trim() != s
        || s.chars().any(|c| c.is_control() || is_line_break(c))
        || s.contains(": ")
        || s.contains(" #")
    {
        return false;
    }
    matches!(
        serde_yaml::from_str::<serde_yaml::Value>(s),
        Ok(serde_yaml::Value::String(ref parsed)) if parsed == s
    )
}

/// Characters YAML reads as line breaks besides `\n` and `\r`.
fn is_line_break(c: char) -> bool {
    matches!(c, '\u{85}' | '\u{2028}' | '\u{2029}')
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\u{85}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn string(s: &str) -> String {
    if is_plain(s) { s.to_string() } else { quote(s) }
}

fn key(k: &str) -> String {
    if is_plain(k) && !k.contains(':') {
        k.to_string()
    } else {
        quote(k)
    }
}

fn float(f: f64) -> String {
    if f.is_nan() {
        ".nan".to_string()
    } else if f == f64::INFINITY {
        ".inf".to_string()
    } else if f == f64::NEG_INFINITY {
        "-.inf".to_string()
    } else {
        // Debug keeps a fractional part (or exponent) so the value reads back as a float.
        format!("{f:?}")
    }
}

/// Inline form of `value`, if it has one.
fn inline(value: &Value) -> Option<String> {
    Some(match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Float(f) => float(*f),
        Value::String(s) => string(s),
        Value::List(items) if items.is_empty() => "[]".to_string(),
        Value::Map(map) if map.is_empty() => "{}".to_string(),
        Value::List(_) | Value::Map(_) => return None,
    })
}

fn write_comments(out: &mut String, indent: usize, comments: &[String]) {
    for comment in comments {
        if comment.is_empty() {
            let _ = writeln!(out, "{:indent$}#", "");
        }
        for line in comment.lines() {
            if line.is_empty() {
                let _ = writeln!(out, "{:indent$}#", "");
            } else {
                let _ = writeln!(out, "{:indent$}# {line}", "");
            }
        }
    }
}

fn write_nested(out: &mut String, indent: usize, value: &Value) {
    match value {
        Value::List(items) => write_sequence(out, indent + INDENT, items),
        Value::Map(map) => write_map(out, indent + INDENT, map),
        _ => {}
    }
}

fn write_keyed(out: &mut String, indent: usize, k: &str, value: &Value) {
    match inline(value) {
        Some(text) => {
            let _ = writeln!(out, "{:indent$}{}: {text}", "", key(k));
        }
        None => {
            let _ = writeln!(out, "{:indent$}{}:", "", key(k));
            write_nested(out, indent, value);
        }
    }
}

fn write_map(out: &mut String, indent: usize, map: &IndexMap<String, Value>) {
    for (k, value) in map {
        write_keyed(out, indent, k, value);
    }
}

fn write_sequence(out: &mut String, indent: usize, items: &[Value]) {
    for item in items {
        match inline(item) {
            Some(text) => {
                let _ = writeln!(out, "{:indent$}- {text}", "");
            }
            None => {
                // Render one level deeper, then hang the first line off the dash.
                let mut nested = String::new();
                match item {
                    Value::List(inner) => write_sequence(&mut nested, indent + INDENT, inner),
                    Value::Map(map) => write_map(&mut nested, indent + INDENT, map),
                    _ => {}
                }
                let _ = write!(out, "{:indent$}- {}", "", &nested[indent + INDENT..]);
            }
        }
    }
}

fn write_table(out: &mut String, indent: usize, table: &Table) {
    for (k, entry) in table.iter() {
        write_comments(out, indent, &entry.comments);
        match &entry.node {
            Node::Value(value) => write_keyed(out, indent, k, value),
            Node::Table(child) if child.is_empty() => {
                let _ = writeln!(out, "{:indent$}{}: {{}}", "", key(k));
            }
            Node::Table(child) => {
                let _ = writeln!(out, "{:indent$}{}:", "", key(k));
                write_table(out, indent + INDENT, child);
            }
        }
    }
}

pub(crate) fn render(document: &Document) -> String {
    if document.is_empty() {
        return "{}\n".to_string();
    }
    let mut out = String::new();
    write_table(&mut out, 0, document.root());
    out
}
