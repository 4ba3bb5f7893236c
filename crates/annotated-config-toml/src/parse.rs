//! TOML source to [`Document`].

use annotated_config_core::{Document, Entry, Table, Value};

use crate::comments;

fn convert_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(n) => Value::Integer(n),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        // Datetimes have no counterpart in the value model; keep their text.
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::List(items.into_iter().map(convert_value).collect()),
        toml::Value::Table(table) => Value::Map(
            table
                .into_iter()
                .map(|(k, v)| (k, convert_value(v)))
                .collect(),
        ),
    }
}

fn convert_table(table: toml::Table) -> Table {
    let mut out = Table::new();
    for (key, value) in table {
        let entry = match value {
            toml::Value::Table(inner) => Entry::table(convert_table(inner)),
            other => Entry::value(convert_value(other)),
        };
        out.insert(key, entry);
    }
    out
}

pub(crate) fn parse(source: &str) -> Result<Document, String> {
    let table: toml::Table = source.parse().map_err(|e: toml::de::Error| e.to_string())?;
    let mut root = convert_table(table);
    for (segments, lines) in comments::scan(source) {
        if let Some(entry) = root.entry_by_segments_mut(&segments) {
            entry.comments = lines;
        }
    }
    Ok(Document::from(root))
}
