//! Strict-mode validation: detect unknown keys in settings files.
//!
//! The file is deserialized into the settings layer (every field optional)
//! through `serde_ignored`, which reports each key the layer did not consume.

use std::path::Path;

use confique::Config;

use crate::error::HelmflatError;
use crate::settings::Settings;

/// Fail with [`HelmflatError::UnknownKeys`] if `content` holds keys that are
/// not settings. Each unknown key carries its best-effort 1-based line number.
pub fn validate_unknown_keys(content: &str, path: &Path) -> Result<(), HelmflatError> {
    let mut unknown: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let _layer: <Settings as Config>::Layer =
        serde_ignored::deserialize(deserializer, |ignored| unknown.push(ignored.to_string()))
            .map_err(|e| HelmflatError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

    if unknown.is_empty() {
        return Ok(());
    }

    let errors = unknown
        .into_iter()
        .map(|key| HelmflatError::UnknownKey {
            line: find_key_line(content, &key),
            key,
            path: path.to_path_buf(),
        })
        .collect();
    Err(HelmflatError::UnknownKeys(errors))
}

/// 1-based line of `dotted_key` in TOML `content`, or 0 if not found.
///
/// Tracks `[section]` headers and matches `leaf =` assignments inside the
/// section the key belongs to. Quoted keys and inline tables are not handled.
fn find_key_line(content: &str, dotted_key: &str) -> usize {
    let (section, leaf) = dotted_key.rsplit_once('.').unwrap_or(("", dotted_key));
    let mut current = String::new();

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if let Some(header) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            current = header
                .split('.')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(".");
            if current == dotted_key {
                return i + 1;
            }
            continue;
        }

        let assigns_leaf = trimmed
            .strip_prefix(leaf)
            .is_some_and(|after| after.trim_start().starts_with('='));
        if current == section && assigns_leaf {
            return i + 1;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("/test/helmflat.toml")
    }

    fn unknown_keys(content: &str) -> Vec<(String, usize)> {
        match validate_unknown_keys(content, &path()) {
            Err(HelmflatError::UnknownKeys(errors)) => errors
                .into_iter()
                .map(|e| match e {
                    HelmflatError::UnknownKey { key, line, .. } => (key, line),
                    other => panic!("Expected UnknownKey, got {other:?}"),
                })
                .collect(),
            other => panic!("Expected UnknownKeys, got {other:?}"),
        }
    }

    #[test]
    fn valid_file_passes() {
        let content = r#"
[input]
extensions = ["yml"]
skip_comments = false

[render]
format = "json"
"#;
        assert!(validate_unknown_keys(content, &path()).is_ok());
    }

    #[test]
    fn empty_file_passes() {
        assert!(validate_unknown_keys("", &path()).is_ok());
    }

    #[test]
    fn unknown_top_level_key() {
        assert_eq!(unknown_keys("verbose = true\n"), vec![("verbose".into(), 1)]);
    }

    #[test]
    fn unknown_nested_key_with_line() {
        let content = "[render]\nflag = \"--set\"\ncolour = \"red\"\n";
        assert_eq!(unknown_keys(content), vec![("render.colour".into(), 3)]);
    }

    #[test]
    fn same_leaf_in_wrong_section_is_not_matched() {
        let content = "[input]\nformat = \"x\"\n";
        assert_eq!(unknown_keys(content), vec![("input.format".into(), 2)]);
        assert_eq!(find_key_line("[render]\nformat = \"x\"\n", "input.format"), 0);
    }

    #[test]
    fn unknown_section_points_at_header() {
        let content = "[output]\nwidth = 3\n";
        let keys = unknown_keys(content);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].0, "output");
        assert_eq!(keys[0].1, 1);
    }

    #[test]
    fn syntax_error_is_parse_error() {
        let result = validate_unknown_keys("[render\n", &path());
        assert!(matches!(result, Err(HelmflatError::ParseError { .. })));
    }
}
