//! Clap adapter for the `helmflat` binary.
//!
//! Compiled only with the `cli` Cargo feature (on by default). Parsed flags
//! never touch [`Settings`](crate::Settings) directly: they become CLI
//! overrides on a [`HelmflatBuilder`], the highest-priority settings layer,
//! and the `config` subcommands become a [`ConfigAction`].

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::builder::{Helmflat, HelmflatBuilder};
use crate::types::ConfigAction;

/// Flatten an indentation-based values document into `--set key=value` lines.
#[derive(Debug, Parser)]
#[command(name = "helmflat", version)]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file loaded after the discovered ones. Must exist.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Accept unknown keys in settings files instead of failing.
    #[arg(long, global = true)]
    pub no_strict: bool,

    /// Ignore `HELMFLAT__*` environment variables.
    #[arg(long, global = true)]
    pub no_env: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print one flag per leaf value of a document.
    Flatten(FlattenArgs),
    /// Inspect or generate settings.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct FlattenArgs {
    /// Input document, or `-` for stdin.
    pub file: PathBuf,

    /// Output format.
    #[arg(long, value_parser = ["helm", "json"])]
    pub format: Option<String>,

    /// Flag written before each pair, e.g. `--set-string`.
    #[arg(long, allow_hyphen_values = true)]
    pub flag: Option<String>,

    /// Text appended to each helm line.
    #[arg(long, allow_hyphen_values = true)]
    pub suffix: Option<String>,

    /// Mapping headers with nothing nested beneath them.
    #[arg(long, value_parser = ["drop", "report"])]
    pub dangling: Option<String>,

    /// Accept any file extension.
    #[arg(long)]
    pub no_extension_check: bool,

    /// Treat `#` lines as content instead of comments.
    #[arg(long)]
    pub keep_comments: bool,

    /// Exit with status 2 if any line could not be flattened.
    #[arg(long)]
    pub fail_on_problems: bool,
}

impl FlattenArgs {
    /// Push every flag that was given onto `builder` as an override.
    /// Switches only override when present, so settings files can still set them.
    pub fn apply(&self, builder: HelmflatBuilder) -> HelmflatBuilder {
        builder
            .cli_override("render.format", self.format.clone())
            .cli_override("render.flag", self.flag.clone())
            .cli_override("render.line_suffix", self.suffix.clone())
            .cli_override("flatten.dangling", self.dangling.clone())
            .cli_override("input.check_extension", self.no_extension_check.then_some(false))
            .cli_override("input.skip_comments", self.keep_comments.then_some(false))
            .cli_override("flatten.fail_on_problems", self.fail_on_problems.then_some(true))
    }
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show all resolved settings.
    List,
    /// Generate a commented sample settings file.
    Gen {
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the resolved value and documentation for a setting.
    Get {
        /// Dotted key path (e.g. "render.flag").
        key: String,
    },
}

impl ConfigArgs {
    /// Bare `config` and `config list` both map to [`ConfigAction::List`].
    pub fn into_action(self) -> ConfigAction {
        match self.action {
            None | Some(ConfigSubcommand::List) => ConfigAction::List,
            Some(ConfigSubcommand::Gen { output }) => ConfigAction::Gen { output },
            Some(ConfigSubcommand::Get { key }) => ConfigAction::Get { key },
        }
    }
}

impl Cli {
    /// A settings builder carrying the global flags.
    pub fn builder(&self) -> HelmflatBuilder {
        let builder = Helmflat::builder()
            .config_file(self.config.clone())
            .strict(!self.no_strict);
        if self.no_env {
            builder.no_env()
        } else {
            builder
        }
    }
}
