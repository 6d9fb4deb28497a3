//! Flatten indentation-nested values documents into dotted `key=value` pairs.
//!
//! helmflat reads a YAML-like document (a Helm chart's `values.yaml`, for
//! instance) line by line and turns every leaf value into a fully qualified
//! dotted key, ready to be passed to `helm` as `--set key=value` flags:
//!
//! ```text
//! image:                  --set image.repository=nginx /
//!   repository: nginx     --set image.tag=1.25.3 /
//!   tag: "1.25.3"         --set replicaCount=2 /
//! replicaCount: 2
//! ```
//!
//! It is not a YAML parser. Structure is recovered from indentation alone,
//! which is enough for the plain mappings and list-of-mapping shapes values
//! files are made of, and it never fails on a whole document because of one
//! bad line.
//!
//! # Quick start
//!
//! ```
//! use helmflat::{FlattenOptions, flatten_str};
//!
//! let flat = flatten_str("image:\n  tag: 1.2.3\n", FlattenOptions::default());
//! assert_eq!(flat.entries[0].key, "image.tag");
//! assert_eq!(flat.entries[0].value, "1.2.3");
//! assert!(flat.is_clean());
//! ```
//!
//! # The walk
//!
//! The flattener keeps a stack of ancestor keys, each remembered with the
//! indentation it was declared at. Before any line is interpreted, every
//! ancestor at the same indentation or deeper is dropped: that single rule
//! handles both nesting and dedent. A key-only line (`image:`) pushes a new
//! ancestor; a value line (`tag: 1.2.3`) emits an entry whose key is the
//! ancestors' keys plus its own, dot-joined.
//!
//! List items are read as mappings. A leading `- ` is dropped from the key,
//! and a value line stays on the stack as an ancestor, so the sub-keys of a
//! list item nest under its first key:
//!
//! ```text
//! hosts:
//!   - host: a.local       hosts.host = a.local
//!     port: 80            hosts.host.port = 80
//! ```
//!
//! Values are taken verbatim after the first `key:` colon, with one pair of
//! surrounding quotes removed. Blank lines and `#` comments are skipped.
//!
//! # Problems
//!
//! Lines that cannot be read never abort the walk. Each one is recorded as a
//! [`LineError`] in [`Flattening::problems`] and the next line is processed
//! as usual. A header with nothing nested beneath it, whether closed by a
//! dedent or left open at the end of the document, is dropped, or reported
//! as [`LineError::DanglingKeyChain`] when [`DanglingPolicy::Report`] is
//! selected.
//!
//! Everything else (unreadable input, a disallowed file extension, broken
//! settings) is a [`HelmflatError`] and stops the run.
//!
//! # Settings
//!
//! The tool's own settings live in [`Settings`] and are resolved in layers:
//!
//! ```text
//! Compiled defaults     #[config(default = ...)]
//!        ↑ overridden by
//! Settings files        helmflat.toml in the platform config dir, then cwd, then --config
//!        ↑ overridden by
//! Environment vars      HELMFLAT__SECTION__KEY
//!        ↑ overridden by
//! CLI overrides         --format, --flag, --suffix, ...
//! ```
//!
//! Each layer is sparse: a file only needs the keys it wants to change.
//! Unknown keys in a settings file are errors, reported with the file and
//! line:
//!
//! ```text
//! Unknown key 'render.colour' in /home/user/.config/helmflat/helmflat.toml (line 3)
//! ```
//!
//! [`Helmflat::builder()`] loads the layers; `helmflat config gen` prints a
//! commented template generated from the field docs of [`Settings`].

pub mod error;
pub mod types;

mod builder;
mod classify;
#[cfg(feature = "cli")]
pub mod cli;
mod env;
mod extract;
mod file;
mod flatten;
mod ops;
mod render;
mod resolve;
mod scan;
mod settings;
mod source;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::{FlattenRun, Helmflat, HelmflatBuilder, flatten_path};
pub use classify::{LineKind, classify};
pub use error::{HelmflatError, LineError};
pub use extract::{extract_key, extract_value};
pub use flatten::{FlattenOptions, Flattening, flatten, flatten_str};
pub use ops::ConfigResult;
pub use render::{helm_line, render};
pub use scan::indent_of;
pub use settings::{
    DanglingPolicy, FlattenSettings, InputSettings, OutputFormat, RenderSettings, Settings,
};
pub use source::{check_extension, read_lines, split_lines};
pub use types::{ConfigAction, FlattenedEntry, KeyFrame, KeyStack, RawLine, SearchPath};
