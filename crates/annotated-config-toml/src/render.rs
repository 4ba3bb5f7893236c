//! [`Document`] to TOML text.
//!
//! Within each table, plain keys come first and sub-tables follow as
//! `[dotted.header]` blocks. TOML has no null, so null values are left out
//! together with their comments.

use std::fmt::Write as _;

use annotated_config_core::{Document, Node, Table, Value};

fn to_toml(value: &Value) -> Result<Option<toml::Value>, String> {
    Ok(Some(match value {
        Value::Null => return Ok(None),
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Integer(n) => toml::Value::Integer(*n),
        Value::Float(f) => toml::Value::Float(*f),
        Value::String(s) => toml::Value::String(s.clone()),
        Value::List(items) => {
            let mut array = Vec::with_capacity(items.len());
            for item in items {
                match to_toml(item)? {
                    Some(v) => array.push(v),
                    None => return Err("null values inside lists cannot be written as TOML".into()),
                }
            }
            toml::Value::Array(array)
        }
        Value::Map(map) => {
            let mut table = toml::Table::new();
            for (k, v) in map {
                if let Some(v) = to_toml(v)? {
                    table.insert(k.clone(), v);
                }
            }
            toml::Value::Table(table)
        }
    }))
}

fn is_bare(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub(crate) fn render_key(key: &str) -> String {
    if is_bare(key) {
        key.to_string()
    } else {
        toml::Value::String(key.to_string()).to_string()
    }
}

fn write_comments(out: &mut String, comments: &[String]) {
    for comment in comments {
        if comment.is_empty() {
            out.push_str("#\n");
        }
        for line in comment.lines() {
            if line.is_empty() {
                out.push_str("#\n");
            } else {
                let _ = writeln!(out, "# {line}");
            }
        }
    }
}

fn render_table(out: &mut String, path: &mut Vec<String>, table: &Table) -> Result<(), String> {
    for (key, entry) in table.iter() {
        let Node::Value(value) = &entry.node else {
            continue;
        };
        let Some(value) = to_toml(value)? else {
            continue;
        };
        write_comments(out, &entry.comments);
        let _ = writeln!(out, "{} = {value}", render_key(key));
    }

    for (key, entry) in table.iter() {
        let Node::Table(child) = &entry.node else {
            continue;
        };
        path.push(render_key(key));
        if !out.is_empty() {
            out.push('\n');
        }
        write_comments(out, &entry.comments);
        let _ = writeln!(out, "[{}]", path.join("."));
        render_table(out, path, child)?;
        path.pop();
    }
    Ok(())
}

pub(crate) fn render(document: &Document) -> Result<String, String> {
    let mut out = String::new();
    render_table(&mut out, &mut Vec::new(), document.root())?;
    Ok(out)
}
