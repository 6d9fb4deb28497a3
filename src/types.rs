//! Shared data types: the line, stack, and entry types the flattener works
//! with, plus the framework-agnostic config actions and search paths.

use std::path::PathBuf;

use serde::Serialize;

/// One input line and its 0-based position in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub index: usize,
    pub text: String,
}

impl RawLine {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// An ancestor key in scope, remembered with the indentation it was declared at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFrame {
    pub indent: usize,
    pub key: String,
}

impl KeyFrame {
    pub fn new(indent: usize, key: impl Into<String>) -> Self {
        Self {
            indent,
            key: key.into(),
        }
    }
}

/// Ancestor keys ordered shallowest first.
///
/// Stacks are values: every operation returns a new stack instead of
/// mutating a shared one, so each step of the walk sees its own snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyStack {
    frames: Vec<KeyFrame>,
}

impl KeyStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames strictly shallower than `indent`. This is the dedent rule: a
    /// line at `indent` closes every frame declared at the same depth or deeper.
    pub fn within(&self, indent: usize) -> KeyStack {
        KeyStack {
            frames: self
                .frames
                .iter()
                .filter(|frame| frame.indent < indent)
                .cloned()
                .collect(),
        }
    }

    pub fn pushed(mut self, frame: KeyFrame) -> KeyStack {
        self.frames.push(frame);
        self
    }

    /// Dot-join all frame keys, then `leaf`.
    pub fn path_to(&self, leaf: &str) -> String {
        let mut path = self.path();
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(leaf);
        path
    }

    /// Dot-join all frame keys.
    pub fn path(&self) -> String {
        self.frames
            .iter()
            .map(|frame| frame.key.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn frames(&self) -> &[KeyFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FromIterator<KeyFrame> for KeyStack {
    fn from_iter<I: IntoIterator<Item = KeyFrame>>(iter: I) -> Self {
        KeyStack {
            frames: iter.into_iter().collect(),
        }
    }
}

/// One leaf of the document: a dotted key path and its scalar value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlattenedEntry {
    pub key: String,
    pub value: String,
    /// 0-based index of the line the value came from.
    pub source_line: usize,
}

impl FlattenedEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>, source_line: usize) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            source_line,
        }
    }
}

/// Where to search for settings files.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
}

/// A settings operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    List,
    Gen { output: Option<PathBuf> },
    Get { key: String },
}
