use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. Anything here stops the run and is surfaced to the caller.
#[derive(Debug, Error)]
pub enum HelmflatError {
    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))]
    UnknownKeys(Vec<HelmflatError>),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] confique::Error),

    #[error("Setting not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Input file {path} must have one of these extensions: {}", .allowed.join(", "))]
    UnsupportedExtension { path: PathBuf, allowed: Vec<String> },

    #[error("Failed to render entries: {0}")]
    RenderError(#[from] serde_json::Error),
}

/// A recoverable problem tied to one line of the input document.
///
/// Collected alongside the flattened entries; the walk always continues past
/// the offending line. `line` is the 0-based index, messages show it 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("line {}: no key before ':' in {text:?}", .line + 1)]
    MalformedKeyLine { line: usize, text: String },

    #[error("line {}: no value after 'key:' in {text:?}", .line + 1)]
    MalformedValueLine { line: usize, text: String },

    #[error("line {}: '{keys}' has nothing nested beneath it before the end of the document", .line + 1)]
    DanglingKeyChain { line: usize, keys: String },
}

impl LineError {
    /// 0-based index of the line the problem was found on.
    pub fn line(&self) -> usize {
        match self {
            LineError::MalformedKeyLine { line, .. }
            | LineError::MalformedValueLine { line, .. }
            | LineError::DanglingKeyChain { line, .. } => *line,
        }
    }
}
