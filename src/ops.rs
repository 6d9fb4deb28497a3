//! Settings operations: template generation, key lookup, listing, and result types.
//!
//! Provides the logic behind `config list`, `config gen`, `config get`, and the
//! `ConfigResult` enum that callers use to display results.

use std::fmt;
use std::path::PathBuf;

use confique::Config;
use toml::{Table, Value};

use crate::error::HelmflatError;
use crate::settings::Settings;

/// Result of a settings operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// A generated TOML template string.
    Template(String),
    /// Confirmation that a template was written to a file.
    TemplateWritten { path: PathBuf },
    /// A key's resolved value and its doc comment.
    KeyValue {
        key: String,
        value: String,
        doc: Vec<String>,
    },
    /// All resolved settings as dotted key-value pairs.
    Listing { entries: Vec<(String, String)> },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Template(t) => write!(f, "{t}"),
            ConfigResult::TemplateWritten { path } => {
                write!(f, "Settings template written to {}", path.display())
            }
            ConfigResult::KeyValue { key, value, doc } => {
                for line in doc {
                    writeln!(f, "# {line}")?;
                }
                write!(f, "{key} = {value}")
            }
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
        }
    }
}

/// Commented TOML template built from the doc comments on [`Settings`].
pub fn generate_template() -> String {
    confique::toml::template::<Settings>(confique::toml::FormatOptions::default())
}

/// Look up a resolved setting by dotted key, including its doc comment.
pub fn get_value(settings: &Settings, key: &str) -> Result<ConfigResult, HelmflatError> {
    let table = settings_table(settings)?;
    let value = table_get(&table, key).ok_or_else(|| HelmflatError::KeyNotFound(key.into()))?;

    Ok(ConfigResult::KeyValue {
        key: key.into(),
        value: format_value(value),
        doc: lookup_doc(&Settings::META, key),
    })
}

/// Every resolved setting as a dotted key-value pair, sorted by key.
pub fn list_values(settings: &Settings) -> Result<ConfigResult, HelmflatError> {
    let table = settings_table(settings)?;
    let mut entries = Vec::new();
    collect_leaves(&table, "", &mut entries);
    Ok(ConfigResult::Listing { entries })
}

/// Navigate a `toml::Table` by dotted key path (e.g. `"render.flag"`).
pub fn table_get<'a>(table: &'a Table, dotted_key: &str) -> Option<&'a Value> {
    let (path, leaf) = match dotted_key.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_key),
    };

    let tbl = match path {
        Some(path) => {
            let mut current = table;
            for segment in path.split('.') {
                current = current.get(segment)?.as_table()?;
            }
            current
        }
        None => table,
    };

    tbl.get(leaf)
}

fn settings_table(settings: &Settings) -> Result<Table, HelmflatError> {
    match Value::try_from(settings) {
        Ok(Value::Table(table)) => Ok(table),
        Ok(_) => Err(HelmflatError::InvalidValue {
            key: "<settings>".into(),
            reason: "settings did not serialize to a table".into(),
        }),
        Err(e) => Err(HelmflatError::InvalidValue {
            key: "<settings>".into(),
            reason: e.to_string(),
        }),
    }
}

fn collect_leaves(table: &Table, prefix: &str, out: &mut Vec<(String, String)>) {
    for (key, value) in table {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Table(nested) => collect_leaves(nested, &dotted, out),
            leaf => out.push((dotted, format_value(leaf))),
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Table(t) => toml::to_string(t).unwrap_or_else(|_| format!("{t:?}")),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(Value::to_string).collect();
            format!("[{}]", inner.join(", "))
        }
        other => other.to_string(),
    }
}

fn lookup_doc(meta: &confique::meta::Meta, dotted_key: &str) -> Vec<String> {
    let segments: Vec<&str> = dotted_key.split('.').collect();
    lookup_doc_recursive(meta, &segments)
}

fn lookup_doc_recursive(meta: &confique::meta::Meta, segments: &[&str]) -> Vec<String> {
    let Some((head, rest)) = segments.split_first() else {
        return vec![];
    };

    let Some(field) = meta.fields.iter().find(|field| field.name == *head) else {
        return vec![];
    };
    if rest.is_empty() {
        return field.doc.iter().map(|s| s.to_string()).collect();
    }
    match &field.kind {
        confique::meta::FieldKind::Nested { meta: nested, .. } => lookup_doc_recursive(nested, rest),
        _ => vec![],
    }
}
