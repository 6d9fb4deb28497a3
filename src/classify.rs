//! Line classification: decide what role a line plays in the walk.

/// What a single line contributes to the document structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only.
    Blank,
    /// Starts with `#` after trimming. Only reported when comments are skipped.
    Comment,
    /// A mapping header such as `image:` with its children on the lines below.
    KeyOnly,
    /// A `key: value` line (or something that should have been one).
    Value,
}

impl LineKind {
    /// Lines the flattener steps over without touching the key stack.
    pub fn is_skipped(self) -> bool {
        matches!(self, LineKind::Blank | LineKind::Comment)
    }
}

/// Classify a raw (untrimmed) line.
pub fn classify(line: &str, skip_comments: bool) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineKind::Blank
    } else if skip_comments && trimmed.starts_with('#') {
        LineKind::Comment
    } else if is_key_only(trimmed) {
        LineKind::KeyOnly
    } else {
        LineKind::Value
    }
}

/// A trimmed line is key-only when it is a non-empty key followed by a single
/// trailing colon. `image:` qualifies; `time: 12:30` and a bare `:` do not.
pub fn is_key_only(trimmed: &str) -> bool {
    match trimmed.find(':') {
        Some(pos) => pos > 0 && pos == trimmed.len() - 1,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_header_is_key_only() {
        assert!(is_key_only("image:"));
        assert!(is_key_only("- containers:"));
    }

    #[test]
    fn inline_value_is_not_key_only() {
        assert!(!is_key_only("tag: 1.2.3"));
        assert!(!is_key_only("url: http://example.com"));
    }

    #[test]
    fn colon_inside_key_header_is_not_key_only() {
        assert!(!is_key_only("time: 12:"));
    }

    #[test]
    fn lone_colon_is_not_key_only() {
        assert!(!is_key_only(":"));
    }

    #[test]
    fn no_colon_is_not_key_only() {
        assert!(!is_key_only("orphan"));
    }

    #[test]
    fn classify_trims_before_testing() {
        assert_eq!(classify("    resources:   ", true), LineKind::KeyOnly);
        assert_eq!(classify("  cpu: 100m", true), LineKind::Value);
    }

    #[test]
    fn whitespace_only_is_blank() {
        assert_eq!(classify("", true), LineKind::Blank);
        assert_eq!(classify("   \t ", false), LineKind::Blank);
        assert!(LineKind::Blank.is_skipped());
    }

    #[test]
    fn comments_depend_on_setting() {
        assert_eq!(classify("  # replicas: 3", true), LineKind::Comment);
        assert_eq!(classify("  # replicas: 3", false), LineKind::Value);
        assert_eq!(classify("# section:", false), LineKind::KeyOnly);
    }
}
