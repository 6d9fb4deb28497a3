//! Discovery and loading of `helmflat.toml` settings files.
//!
//! Each [`SearchPath`] resolves to one directory, checked for
//! `{dir}/{file_name}`. Directories are listed in priority-ascending order:
//! every file found is returned, and the caller merges them so later files win.
//! Missing files are skipped; other I/O errors are propagated.
//!
//! A file named with `--config` is loaded after everything discovered, and
//! unlike discovered files it must exist.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::HelmflatError;
use crate::types::SearchPath;

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// Returns `None` if the directory cannot be determined (no platform config
/// dir, or an unreadable cwd).
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Load every settings file found along `search_paths`, then `explicit` if given.
///
/// Returns `(path, contents)` pairs, lowest priority first.
pub fn load_config_files(
    search_paths: &[SearchPath],
    file_name: &str,
    app_name: &str,
    explicit: Option<&Path>,
) -> Result<Vec<(PathBuf, String)>, HelmflatError> {
    let mut results = Vec::new();

    for dir in search_paths
        .iter()
        .filter_map(|sp| resolve_search_path(sp, app_name))
    {
        let file_path = dir.join(file_name);
        match std::fs::read_to_string(&file_path) {
            Ok(content) => {
                info!(path = %file_path.display(), "loaded settings file");
                results.push((file_path, content));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(HelmflatError::IoError {
                    path: file_path,
                    source: e,
                });
            }
        }
    }

    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path).map_err(|e| HelmflatError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!(path = %path.display(), "loaded settings file");
        results.push((path.to_path_buf(), content));
    }

    Ok(results)
}
