//! Reading input documents into [`RawLine`]s.
//!
//! A path of `-` reads standard input. Input must be valid UTF-8; anything
//! else is reported as an I/O error on the path, which stops the run.

use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::error::HelmflatError;
use crate::types::RawLine;

/// Split text into numbered lines. Accepts `\n` and `\r\n` endings; a final
/// line terminator does not produce an extra empty line.
pub fn split_lines(text: &str) -> Vec<RawLine> {
    text.lines()
        .enumerate()
        .map(|(index, line)| RawLine::new(index, line))
        .collect()
}

pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read a whole document from `path` (or stdin for `-`).
pub fn read_lines(path: &Path) -> Result<Vec<RawLine>, HelmflatError> {
    let text = if is_stdin(path) {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| HelmflatError::IoError {
                path: path.to_path_buf(),
                source: e,
            })?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| HelmflatError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?
    };

    let lines = split_lines(&text);
    info!(path = %path.display(), lines = lines.len(), "read input");
    Ok(lines)
}

/// Check that `path` ends in one of `allowed` extensions, ignoring case.
/// Stdin has no extension and always passes.
pub fn check_extension(path: &Path, allowed: &[String]) -> Result<(), HelmflatError> {
    if is_stdin(path) {
        return Ok(());
    }
    let matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)));
    if matches {
        Ok(())
    } else {
        Err(HelmflatError::UnsupportedExtension {
            path: path.to_path_buf(),
            allowed: allowed.to_vec(),
        })
    }
}
