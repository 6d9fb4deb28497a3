//! Settings resolution: merge every layer and produce a typed [`Settings`].
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, so the whole
//! pipeline is testable with synthetic inputs. Steps:
//!
//! 1. Validate each file (if strict mode)
//! 2. Parse and deep-merge settings files (later overrides earlier)
//! 3. Deep-merge env vars on top
//! 4. Deep-merge CLI overrides on top (highest priority)
//! 5. Deserialize the merged table into the settings layer
//! 6. Let confique fill defaults

use std::path::PathBuf;

use confique::Config;
use toml::{Table, Value};

use crate::env;
use crate::error::HelmflatError;
use crate::settings::Settings;
use crate::validate;

type SettingsLayer = <Settings as Config>::Layer;

/// All pre-loaded data needed to resolve settings. No I/O happens here.
pub struct ResolveInput {
    /// File contents in precedence order: first = lowest priority, last = highest.
    pub files: Vec<(PathBuf, String)>,
    /// Raw environment variable pairs.
    pub env_vars: Vec<(String, String)>,
    /// Env var prefix (e.g. `"HELMFLAT"`). `None` means env disabled.
    pub env_prefix: Option<String>,
    /// CLI overrides as `(dotted_key, value)` pairs.
    pub cli_overrides: Vec<(String, Value)>,
    /// Whether to reject unknown keys in settings files.
    pub strict: bool,
}

pub fn resolve(input: ResolveInput) -> Result<Settings, HelmflatError> {
    let mut merged = Table::new();
    for (path, content) in &input.files {
        if input.strict {
            validate::validate_unknown_keys(content, path)?;
        }
        let table: Table = toml::from_str(content).map_err(|e| HelmflatError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        merged = deep_merge(merged, table);
    }

    if let Some(prefix) = &input.env_prefix {
        let env_table = env::env_to_table(prefix, input.env_vars, &Settings::META);
        merged = deep_merge(merged, env_table);
    }

    if !input.cli_overrides.is_empty() {
        merged = deep_merge(merged, overrides_to_table(&input.cli_overrides)?);
    }

    let layer: SettingsLayer =
        Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| HelmflatError::InvalidValue {
                key: "<merged>".into(),
                reason: e.to_string(),
            })?;

    Settings::builder()
        .preloaded(layer)
        .load()
        .map_err(HelmflatError::from)
}

/// Deep-merge `overlay` on top of `base`. Tables present on both sides merge
/// recursively; for any other value the overlay wins.
pub fn deep_merge(mut base: Table, overlay: Table) -> Table {
    for (key, value) in overlay {
        let merged = match (base.remove(&key), value) {
            (Some(Value::Table(below)), Value::Table(above)) => {
                Value::Table(deep_merge(below, above))
            }
            (_, above) => above,
        };
        base.insert(key, merged);
    }
    base
}

/// Expand dotted-key overrides into a nested table.
///
/// `("render.format", "json")` becomes `{render = {format = "json"}}`. When
/// two overrides target the same key the later one wins.
pub fn overrides_to_table(entries: &[(String, Value)]) -> Result<Table, HelmflatError> {
    let mut table = Table::new();
    for (dotted, value) in entries {
        let (sections, leaf) = match dotted.rsplit_once('.') {
            Some((sections, leaf)) => (Some(sections), leaf),
            None => (None, dotted.as_str()),
        };

        let mut current = &mut table;
        for section in sections.into_iter().flat_map(|s| s.split('.')) {
            current = current
                .entry(section)
                .or_insert_with(|| Value::Table(Table::new()))
                .as_table_mut()
                .ok_or_else(|| HelmflatError::InvalidValue {
                    key: dotted.clone(),
                    reason: format!("'{section}' is already set to a value"),
                })?;
        }
        current.insert(leaf.to_string(), value.clone());
    }
    Ok(table)
}
