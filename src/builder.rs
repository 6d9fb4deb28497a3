use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::HelmflatError;
use crate::file;
use crate::flatten::{self, Flattening};
use crate::ops::{self, ConfigResult};
use crate::render;
use crate::resolve::{self, ResolveInput};
use crate::settings::Settings;
use crate::source;
use crate::types::{ConfigAction, SearchPath};

/// Names the platform config directory, the settings file and the env prefix.
const APP_NAME: &str = "helmflat";

/// Entry point for loading settings and running the flattener.
pub struct Helmflat;

impl Helmflat {
    pub fn builder() -> HelmflatBuilder {
        HelmflatBuilder::new()
    }
}

/// Builder for layered settings.
///
/// `helmflat.toml` files are discovered along the search paths (lowest
/// priority first), then merged with `HELMFLAT__SECTION__KEY` environment
/// variables and finally with CLI overrides. The resolved [`Settings`] drive
/// [`run`](Self::run).
pub struct HelmflatBuilder {
    search_paths: Vec<SearchPath>,
    env_enabled: bool,
    strict: bool,
    config_file: Option<PathBuf>,
    cli_overrides: Vec<(String, toml::Value)>,
}

/// Everything one flatten run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenRun {
    pub settings: Settings,
    pub flattening: Flattening,
    /// The entries rendered in the configured format.
    pub rendered: String,
}

impl FlattenRun {
    /// Whether the run should end with a failing status.
    pub fn failed(&self) -> bool {
        self.settings.flatten.fail_on_problems && !self.flattening.is_clean()
    }
}

impl HelmflatBuilder {
    fn new() -> Self {
        Self {
            search_paths: vec![SearchPath::Platform, SearchPath::Cwd],
            env_enabled: true,
            strict: true,
            config_file: None,
            cli_overrides: Vec::new(),
        }
    }

    /// Replace the default search paths. The last entry has the highest priority.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Disable environment variable loading entirely.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Reject unknown keys in settings files (default: `true`).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// An extra settings file loaded after every discovered one. Unlike
    /// discovered files it must exist. `None` is ignored.
    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.config_file = path;
        }
        self
    }

    /// Add a CLI override. `None` values are ignored (useful for optional clap args).
    pub fn cli_override<V: Into<toml::Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.cli_overrides.push((key.to_string(), v.into()));
        }
        self
    }

    fn build_input(&self) -> Result<ResolveInput, HelmflatError> {
        let files = file::load_config_files(
            &self.search_paths,
            &format!("{APP_NAME}.toml"),
            APP_NAME,
            self.config_file.as_deref(),
        )?;
        let (env_prefix, env_vars) = if self.env_enabled {
            (Some(APP_NAME.to_uppercase()), std::env::vars().collect())
        } else {
            (None, Vec::new())
        };

        Ok(ResolveInput {
            files,
            env_vars,
            env_prefix,
            cli_overrides: self.cli_overrides.clone(),
            strict: self.strict,
        })
    }

    /// Load and resolve the settings through all layers.
    pub fn load(self) -> Result<Settings, HelmflatError> {
        let input = self.build_input()?;
        resolve::resolve(input)
    }

    /// Resolve settings, then flatten and render the document at `path`.
    pub fn run(self, path: &Path) -> Result<FlattenRun, HelmflatError> {
        let settings = self.load()?;
        let (flattening, rendered) = flatten_path(path, &settings)?;
        Ok(FlattenRun {
            settings,
            flattening,
            rendered,
        })
    }

    /// Handle a `ConfigAction` and print the result to stdout.
    pub fn handle_and_print(self, action: &ConfigAction) -> Result<(), HelmflatError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }

    /// Handle a `ConfigAction` (list / gen / get).
    pub fn handle(self, action: &ConfigAction) -> Result<ConfigResult, HelmflatError> {
        match action {
            ConfigAction::List => ops::list_values(&self.load()?),
            ConfigAction::Gen { output } => {
                let template = ops::generate_template();
                match output {
                    Some(path) => {
                        write_template(path, &template)?;
                        Ok(ConfigResult::TemplateWritten { path: path.clone() })
                    }
                    None => Ok(ConfigResult::Template(template)),
                }
            }
            ConfigAction::Get { key } => ops::get_value(&self.load()?, key),
        }
    }
}

/// Read, flatten and render one document with already resolved settings.
pub fn flatten_path(
    path: &Path,
    settings: &Settings,
) -> Result<(Flattening, String), HelmflatError> {
    if settings.input.check_extension {
        source::check_extension(path, &settings.input.extensions)?;
    } else {
        debug!(path = %path.display(), "extension check disabled");
    }

    let lines = source::read_lines(path)?;
    let flattening = flatten::flatten(&lines, settings.flatten_options());
    let rendered = render::render(&flattening.entries, &settings.render)?;
    Ok((flattening, rendered))
}

fn write_template(path: &Path, template: &str) -> Result<(), HelmflatError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| HelmflatError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, template).map_err(|e| HelmflatError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}
