//! Rendering flattened entries for output.
//!
//! Keys and values are written verbatim. Nothing is shell-escaped; a value
//! containing spaces or quotes is the caller's concern.

use crate::error::HelmflatError;
use crate::settings::{OutputFormat, RenderSettings};
use crate::types::FlattenedEntry;

/// Render `entries` in the configured format. Helm output has one line per
/// entry, each terminated by a newline; JSON output is a pretty-printed array.
pub fn render(
    entries: &[FlattenedEntry],
    settings: &RenderSettings,
) -> Result<String, HelmflatError> {
    match settings.format {
        OutputFormat::Helm => Ok(entries
            .iter()
            .map(|entry| helm_line(entry, &settings.flag, &settings.line_suffix) + "\n")
            .collect()),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(entries)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// `--set image.tag=1.2.3 /` with the default flag and suffix.
pub fn helm_line(entry: &FlattenedEntry, flag: &str, suffix: &str) -> String {
    format!("{flag} {}={}{suffix}", entry.key, entry.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(format: OutputFormat) -> RenderSettings {
        RenderSettings {
            format,
            flag: "--set".into(),
            line_suffix: " /".into(),
        }
    }

    fn entries() -> Vec<FlattenedEntry> {
        vec![
            FlattenedEntry::new("image.tag", "1.25.3", 3),
            FlattenedEntry::new("service.port", "80", 7),
        ]
    }

    #[test]
    fn helm_line_reference_format() {
        let line = helm_line(&FlattenedEntry::new("a.b", "v", 0), "--set", " /");
        assert_eq!(line, "--set a.b=v /");
    }

    #[test]
    fn helm_output_keeps_order() {
        let out = render(&entries(), &settings(OutputFormat::Helm)).unwrap();
        assert_eq!(out, "--set image.tag=1.25.3 /\n--set service.port=80 /\n");
    }

    #[test]
    fn helm_output_with_custom_flag_and_no_suffix() {
        let custom = RenderSettings {
            flag: "--set-string".into(),
            line_suffix: String::new(),
            ..settings(OutputFormat::Helm)
        };
        let out = render(&entries()[..1], &custom).unwrap();
        assert_eq!(out, "--set-string image.tag=1.25.3\n");
    }

    #[test]
    fn values_are_not_escaped() {
        let entry = FlattenedEntry::new("cmd", "echo $HOME && ls", 0);
        assert_eq!(helm_line(&entry, "--set", ""), "--set cmd=echo $HOME && ls");
    }

    #[test]
    fn empty_entries_render_empty() {
        assert_eq!(render(&[], &settings(OutputFormat::Helm)).unwrap(), "");
    }

    #[test]
    fn json_output_is_an_array_of_entries() {
        let out = render(&entries(), &settings(OutputFormat::Json)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["key"], "image.tag");
        assert_eq!(array[0]["value"], "1.25.3");
        assert_eq!(array[1]["source_line"], 7);
    }
}
