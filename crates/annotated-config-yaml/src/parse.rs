//! YAML source to [`Document`].

use annotated_config_core::{Document, Entry, IndexMap, Table, Value};
use serde_yaml::Mapping;

use crate::comments;

/// Mapping keys are strings in the document model; scalar keys of other
/// types are stringified.
fn key_string(key: &serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => key_string(&tagged.value),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
            Err("only scalar mapping keys are supported".to_string())
        }
    }
}

fn convert_value(value: serde_yaml::Value) -> Result<Value, String> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::List(
            items
                .into_iter()
                .map(convert_value)
                .collect::<Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = IndexMap::with_capacity(mapping.len());
            for (k, v) in mapping {
                map.insert(key_string(&k)?, convert_value(v)?);
            }
            Value::Map(map)
        }
        serde_yaml::Value::Tagged(tagged) => convert_value(tagged.value)?,
    })
}

fn convert_mapping(mapping: Mapping) -> Result<Table, String> {
    let mut out = Table::new();
    for (key, value) in mapping {
        let key = key_string(&key)?;
        let entry = match value {
            serde_yaml::Value::Mapping(inner) => Entry::table(convert_mapping(inner)?),
            other => Entry::value(convert_value(other)?),
        };
        out.insert(key, entry);
    }
    Ok(out)
}

fn has_content(source: &str) -> bool {
    source.lines().any(|line| {
        let trimmed = line.trim();
        !trimmed.is_empty() && !trimmed.starts_with('#') && trimmed != "---" && trimmed != "..."
    })
}

pub(crate) fn parse(source: &str) -> Result<Document, String> {
    if !has_content(source) {
        return Ok(Document::new());
    }
    let value: serde_yaml::Value = serde_yaml::from_str(source).map_err(|e| e.to_string())?;
    let mut root = match value {
        serde_yaml::Value::Null => Table::new(),
        serde_yaml::Value::Mapping(mapping) => convert_mapping(mapping)?,
        other => {
            return Err(format!(
                "top-level YAML value must be a mapping, found {}",
                kind(&other)
            ));
        }
    };
    for (segments, lines) in comments::scan(source) {
        if let Some(entry) = root.entry_by_segments_mut(&segments) {
            entry.comments = lines;
        }
    }
    Ok(Document::from(root))
}

fn kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}
