//! The tool's own settings, resolved through the layered config pipeline.
//!
//! Every field carries a compiled default, so helmflat runs without any config
//! file. The doc comments double as the comments in `helmflat config gen`.
//!
//! | Env var                              | Setting                    |
//! |--------------------------------------|----------------------------|
//! | `HELMFLAT__INPUT__EXTENSIONS`        | `input.extensions`         |
//! | `HELMFLAT__INPUT__CHECK_EXTENSION`   | `input.check_extension`    |
//! | `HELMFLAT__INPUT__SKIP_COMMENTS`     | `input.skip_comments`      |
//! | `HELMFLAT__FLATTEN__DANGLING`        | `flatten.dangling`         |
//! | `HELMFLAT__FLATTEN__FAIL_ON_PROBLEMS`| `flatten.fail_on_problems` |
//! | `HELMFLAT__RENDER__FORMAT`           | `render.format`            |
//! | `HELMFLAT__RENDER__FLAG`             | `render.flag`              |
//! | `HELMFLAT__RENDER__LINE_SUFFIX`      | `render.line_suffix`       |
//!
//! Switches take `true`/`false` in any case and `extensions` takes a
//! comma-separated list (`yml,yaml,tpl`). Other fields take the text as is.

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::flatten::FlattenOptions;

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Reading the input document.
    #[config(nested)]
    pub input: InputSettings,

    /// Turning the document into entries.
    #[config(nested)]
    pub flatten: FlattenSettings,

    /// Printing the entries.
    #[config(nested)]
    pub render: RenderSettings,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InputSettings {
    /// File extensions accepted for input documents (case-insensitive).
    #[config(default = ["yml", "yaml"])]
    pub extensions: Vec<String>,

    /// Reject input files whose extension is not listed in `extensions`.
    #[config(default = true)]
    pub check_extension: bool,

    /// Treat lines starting with `#` as comments and skip them.
    #[config(default = true)]
    pub skip_comments: bool,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlattenSettings {
    /// What to do with mapping headers that have nothing nested beneath them:
    /// "drop" discards them quietly, "report" lists them as problems.
    #[config(default = "drop")]
    pub dangling: DanglingPolicy,

    /// Exit with status 2 when any line could not be flattened.
    #[config(default = false)]
    pub fail_on_problems: bool,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Output format: "helm" for one flag per line, "json" for an array of entries.
    #[config(default = "helm")]
    pub format: OutputFormat,

    /// Flag written before each `key=value` pair in helm format.
    #[config(default = "--set")]
    pub flag: String,

    /// Text appended to each line in helm format.
    #[config(default = " /")]
    pub line_suffix: String,
}

/// Policy for mapping headers that end up with nothing nested beneath them.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DanglingPolicy {
    #[default]
    Drop,
    Report,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Helm,
    Json,
}

impl Settings {
    /// Options for the flattener derived from these settings.
    pub fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions {
            skip_comments: self.input.skip_comments,
            dangling: self.flatten.dangling,
        }
    }
}
