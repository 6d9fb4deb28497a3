//! The indentation-keyed flattener.
//!
//! Walks the document top to bottom carrying a [`KeyStack`] of ancestor keys.
//! Each non-blank line either opens a mapping (`image:`) or closes a path with
//! a value (`tag: 1.2.3`). Nesting is recovered from indentation alone: before
//! a line is interpreted, every frame declared at the same depth or deeper is
//! dropped from the stack, so only true ancestors contribute to the dotted key.
//!
//! ```text
//! image:              push image
//!   pull:             push pull          (image < 2)
//!     policy: Always  emit image.pull.policy = Always
//!   tag: 1.2.3        pop pull, policy   emit image.tag = 1.2.3
//! replicas: 2         pop everything     emit replicas = 2
//! ```
//!
//! A run of headers is followed down to the value line that ends it; the outer
//! walk resumes after that line. Lines that cannot be read produce a
//! [`LineError`] and the walk carries on with the next line.

use tracing::{debug, info};

use crate::classify::{LineKind, classify};
use crate::error::LineError;
use crate::extract::{extract_key, extract_value};
use crate::scan::indent_of;
use crate::settings::DanglingPolicy;
use crate::source::split_lines;
use crate::types::{FlattenedEntry, KeyFrame, KeyStack, RawLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Skip `#` comment lines like blank lines.
    pub skip_comments: bool,
    /// What to do with headers still open at the end of the document.
    pub dangling: DanglingPolicy,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            skip_comments: true,
            dangling: DanglingPolicy::Drop,
        }
    }
}

/// Result of flattening one document. Both lists are in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flattening {
    pub entries: Vec<FlattenedEntry>,
    pub problems: Vec<LineError>,
}

impl Flattening {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Flatten an already split document.
pub fn flatten(lines: &[RawLine], options: FlattenOptions) -> Flattening {
    let mut walk = Walk {
        lines,
        options,
        out: Flattening::default(),
    };
    walk.run();
    info!(
        lines = lines.len(),
        entries = walk.out.entries.len(),
        problems = walk.out.problems.len(),
        "flattened document"
    );
    walk.out
}

/// Split `text` into lines and flatten it.
pub fn flatten_str(text: &str, options: FlattenOptions) -> Flattening {
    flatten(&split_lines(text), options)
}

/// Where a descent from a header line ended up.
enum Descent {
    /// Reached the value line at position `at`. `entry` is `None` when that
    /// line was malformed.
    Landed {
        entry: Option<FlattenedEntry>,
        keys: KeyStack,
        at: usize,
    },
    /// Ran past the last line while still inside a chain of headers.
    Dangling { keys: KeyStack, from: usize },
}

struct Walk<'a> {
    lines: &'a [RawLine],
    options: FlattenOptions,
    out: Flattening,
}

impl Walk<'_> {
    fn run(&mut self) {
        let mut keys = KeyStack::new();
        let mut i = 0;

        while i < self.lines.len() {
            if self.kind(i).is_skipped() {
                i += 1;
                continue;
            }

            match self.descend(i, keys) {
                Descent::Landed { entry, keys: next, at } => {
                    if let Some(entry) = entry {
                        debug!(key = %entry.key, line = entry.source_line + 1, "entry");
                        self.out.entries.push(entry);
                    }
                    keys = next;
                    i = at.max(i) + 1;
                }
                Descent::Dangling { keys: open, from } => {
                    self.dangling(open.path(), from);
                    break;
                }
            }
        }
    }

    fn kind(&self, at: usize) -> LineKind {
        classify(&self.lines[at].text, self.options.skip_comments)
    }

    /// Follow headers from `start` down to the value line that ends the chain.
    fn descend(&mut self, start: usize, carried: KeyStack) -> Descent {
        let lines = self.lines;
        let mut keys = carried;
        let mut at = start;
        // Headers opened by this descent and still in scope, as (indent, position).
        let mut opened: Vec<(usize, usize)> = Vec::new();
        // The newest header until a deeper line turns up beneath it.
        let mut childless: Option<(usize, usize)> = None;

        loop {
            let Some(line) = lines.get(at) else {
                let from = opened.first().map_or(start, |&(_, pos)| pos);
                return Descent::Dangling { keys, from };
            };
            let kind = self.kind(at);
            if kind.is_skipped() {
                at += 1;
                continue;
            }

            let indent = indent_of(&line.text);
            if let Some((header_indent, pos)) = childless.take()
                && indent <= header_indent
            {
                self.dangling(keys.path(), pos);
            }
            opened.retain(|&(header_indent, _)| header_indent < indent);
            let scope = keys.within(indent);

            if kind != LineKind::KeyOnly {
                return self.land(line, at, indent, scope);
            }

            keys = match extract_key(line) {
                Ok(key) => {
                    opened.push((indent, at));
                    childless = Some((indent, at));
                    scope.pushed(KeyFrame::new(indent, key))
                }
                Err(problem) => {
                    self.problem(problem);
                    scope
                }
            };
            at += 1;
        }
    }

    /// Emit the entry for a value line. The line's own key stays on the stack
    /// so deeper lines under a list item nest beneath it.
    fn land(&mut self, line: &RawLine, at: usize, indent: usize, scope: KeyStack) -> Descent {
        let key = match extract_key(line) {
            Ok(key) => key,
            Err(problem) => {
                self.problem(problem);
                return Descent::Landed {
                    entry: None,
                    keys: scope,
                    at,
                };
            }
        };

        let path = scope.path_to(&key);
        let keys = scope.pushed(KeyFrame::new(indent, key));
        let entry = match extract_value(line) {
            Ok(value) => Some(FlattenedEntry::new(path, value, line.index)),
            Err(problem) => {
                self.problem(problem);
                None
            }
        };

        Descent::Landed { entry, keys, at }
    }

    /// A header chain that ended with nothing beneath it. `from` is the
    /// position of its first line.
    fn dangling(&mut self, keys: String, from: usize) {
        let line = self.lines[from].index;
        match self.options.dangling {
            DanglingPolicy::Drop => {
                debug!(%keys, line = line + 1, "dropped unterminated headers");
            }
            DanglingPolicy::Report => self.problem(LineError::DanglingKeyChain { line, keys }),
        }
    }

    fn problem(&mut self, problem: LineError) {
        debug!(%problem, "skipped line");
        self.out.problems.push(problem);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{VALUES, VALUES_ENTRIES, lines};
    use proptest::prelude::*;

    fn pairs(text: &str) -> Vec<(String, String)> {
        flatten_str(text, FlattenOptions::default())
            .entries
            .into_iter()
            .map(|e| (e.key, e.value))
            .collect()
    }

    fn owned(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn two_levels() {
        let result = flatten_str("a:\n  b: v", FlattenOptions::default());
        assert_eq!(result.entries, vec![FlattenedEntry::new("a.b", "v", 1)]);
        assert!(result.is_clean());
    }

    #[test]
    fn blank_document_is_empty() {
        let result = flatten_str("\n   \n\n", FlattenOptions::default());
        assert!(result.entries.is_empty());
        assert!(result.is_clean());
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(flatten(&[], FlattenOptions::default()), Flattening::default());
    }

    #[test]
    fn dedent_pops_the_parent() {
        assert_eq!(
            pairs("a:\n  b: 1\nc: 2"),
            owned(&[("a.b", "1"), ("c", "2")])
        );
    }

    #[test]
    fn siblings_do_not_nest() {
        assert_eq!(
            pairs("a: 1\nb: 2\nc: 3"),
            owned(&[("a", "1"), ("b", "2"), ("c", "3")])
        );
    }

    #[test]
    fn multi_level_descent_consumes_headers() {
        let result = flatten_str("a:\n  b:\n    c: x", FlattenOptions::default());
        assert_eq!(result.entries, vec![FlattenedEntry::new("a.b.c", "x", 2)]);
    }

    #[test]
    fn partial_dedent_keeps_shallower_ancestors() {
        assert_eq!(
            pairs("a:\n  b:\n    c: 1\n  d: 2\ne: 3"),
            owned(&[("a.b.c", "1"), ("a.d", "2"), ("e", "3")])
        );
    }

    #[test]
    fn list_marker_is_stripped_from_keys() {
        assert_eq!(pairs("- name: foo"), owned(&[("name", "foo")]));
    }

    #[test]
    fn quoted_list_value_is_unquoted() {
        assert_eq!(pairs("- name: \"foo\""), owned(&[("name", "foo")]));
    }

    #[test]
    fn list_item_key_is_ancestor_of_deeper_lines() {
        assert_eq!(
            pairs("env:\n  - name: LOG\n    value: debug"),
            owned(&[("env.name", "LOG"), ("env.name.value", "debug")])
        );
    }

    #[test]
    fn chart_values_in_document_order() {
        assert_eq!(pairs(VALUES), owned(VALUES_ENTRIES));
    }

    #[test]
    fn source_lines_point_at_value_lines() {
        let result = flatten(&lines(VALUES), FlattenOptions::default());
        let tag = result.entries.iter().find(|e| e.key == "image.tag").unwrap();
        assert_eq!(tag.source_line, 6);
        let cpu = result
            .entries
            .iter()
            .find(|e| e.key == "resources.limits.cpu")
            .unwrap();
        assert_eq!(cpu.source_line, 22);
    }

    #[test]
    fn blank_lines_inside_a_chain_are_skipped() {
        assert_eq!(pairs("a:\n\n  b:\n\n    c: x"), owned(&[("a.b.c", "x")]));
    }

    #[test]
    fn comments_inside_a_chain_are_skipped() {
        assert_eq!(pairs("a:\n  # note: x\n  b: 1"), owned(&[("a.b", "1")]));
    }

    #[test]
    fn comments_are_lines_when_not_skipped() {
        let options = FlattenOptions {
            skip_comments: false,
            ..FlattenOptions::default()
        };
        let result = flatten_str("# plain comment\na: 1", options);
        assert_eq!(result.entries, vec![FlattenedEntry::new("a", "1", 1)]);
        assert_eq!(result.problems.len(), 1);
        assert_eq!(result.problems[0].line(), 0);
    }

    #[test]
    fn dangling_headers_are_dropped_by_default() {
        let result = flatten_str("a: 1\nb:\n  c:", FlattenOptions::default());
        assert_eq!(result.entries, vec![FlattenedEntry::new("a", "1", 0)]);
        assert!(result.is_clean());
    }

    #[test]
    fn dangling_headers_can_be_reported() {
        let options = FlattenOptions {
            dangling: DanglingPolicy::Report,
            ..FlattenOptions::default()
        };
        let result = flatten_str("a: 1\nb:\n  c:\n\n", options);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(
            result.problems,
            vec![LineError::DanglingKeyChain {
                line: 1,
                keys: "b.c".into()
            }]
        );
    }

    #[test]
    fn dangling_chain_keeps_carried_ancestors_in_report() {
        let options = FlattenOptions {
            dangling: DanglingPolicy::Report,
            ..FlattenOptions::default()
        };
        let result = flatten_str("a:\n  b: 1\n  c:", options);
        assert_eq!(
            result.problems,
            vec![LineError::DanglingKeyChain {
                line: 2,
                keys: "a.c".into()
            }]
        );
    }

    #[test]
    fn header_closed_by_dedent_is_reported() {
        let options = FlattenOptions {
            dangling: DanglingPolicy::Report,
            ..FlattenOptions::default()
        };
        let result = flatten_str("a:\n  b:\nc: 1", options);
        assert_eq!(result.entries, vec![FlattenedEntry::new("c", "1", 2)]);
        assert_eq!(
            result.problems,
            vec![LineError::DanglingKeyChain {
                line: 1,
                keys: "a.b".into()
            }]
        );
    }

    #[test]
    fn empty_sibling_header_is_reported_and_walk_goes_on() {
        let options = FlattenOptions {
            dangling: DanglingPolicy::Report,
            ..FlattenOptions::default()
        };
        let result = flatten_str("a:\n  b:\n  c: 1\nd:", options);
        assert_eq!(result.entries, vec![FlattenedEntry::new("a.c", "1", 2)]);
        assert_eq!(
            result.problems,
            vec![
                LineError::DanglingKeyChain {
                    line: 1,
                    keys: "a.b".into()
                },
                LineError::DanglingKeyChain {
                    line: 3,
                    keys: "d".into()
                },
            ]
        );
    }

    #[test]
    fn header_with_children_is_not_reported() {
        let options = FlattenOptions {
            dangling: DanglingPolicy::Report,
            ..FlattenOptions::default()
        };
        let result = flatten_str("a:\n  b:\n    c: 1\n  d: 2", options);
        assert_eq!(result.entries.len(), 2);
        assert!(result.is_clean());
    }

    #[test]
    fn header_closed_by_dedent_is_dropped_by_default() {
        let result = flatten_str("a:\n  b:\nc: 1", FlattenOptions::default());
        assert_eq!(result.entries, vec![FlattenedEntry::new("c", "1", 2)]);
        assert!(result.is_clean());
    }

    #[test]
    fn malformed_line_does_not_stop_the_walk() {
        let result = flatten_str("a: 1\norphan\nb: 2", FlattenOptions::default());
        assert_eq!(
            result.entries,
            vec![FlattenedEntry::new("a", "1", 0), FlattenedEntry::new("b", "2", 2)]
        );
        assert_eq!(
            result.problems,
            vec![LineError::MalformedKeyLine {
                line: 1,
                text: "orphan".into()
            }]
        );
    }

    #[test]
    fn malformed_value_still_opens_a_scope() {
        let result = flatten_str("\"q\": x\n  inner: 1", FlattenOptions::default());
        assert_eq!(result.entries, vec![FlattenedEntry::new("\"q\".inner", "1", 1)]);
        assert!(matches!(
            result.problems[..],
            [LineError::MalformedValueLine { line: 0, .. }]
        ));
    }

    #[test]
    fn malformed_header_is_skipped_in_the_chain() {
        let result = flatten_str("a:\n  - :\n    b: 1", FlattenOptions::default());
        assert_eq!(result.entries, vec![FlattenedEntry::new("a.b", "1", 2)]);
        assert!(matches!(
            result.problems[..],
            [LineError::MalformedKeyLine { line: 1, .. }]
        ));
    }

    #[test]
    fn tab_indented_line_counts_as_top_level() {
        assert_eq!(pairs("a:\n\tb: 1"), owned(&[("b", "1")]));
    }

    fn frame() -> impl Strategy<Value = KeyFrame> {
        (0usize..16, "[a-z]{1,4}").prop_map(|(indent, key)| KeyFrame::new(indent, key))
    }

    fn document_line() -> impl Strategy<Value = String> {
        (0usize..4, "[a-z]{1,3}", proptest::option::of("[a-z0-9]{1,3}")).prop_map(
            |(depth, key, value)| match value {
                Some(v) => format!("{}{key}: {v}", "  ".repeat(depth)),
                None => format!("{}{key}:", "  ".repeat(depth)),
            },
        )
    }

    proptest! {
        #[test]
        fn within_is_idempotent(
            frames in proptest::collection::vec(frame(), 0..8),
            threshold in 0usize..20,
        ) {
            let keys: KeyStack = frames.into_iter().collect();
            let once = keys.within(threshold);
            prop_assert_eq!(once.within(threshold), once);
        }

        #[test]
        fn entries_follow_document_order(
            doc in proptest::collection::vec(document_line(), 0..30),
        ) {
            let result = flatten_str(&doc.join("\n"), FlattenOptions::default());
            prop_assert!(result.is_clean());
            for pair in result.entries.windows(2) {
                prop_assert!(pair[0].source_line < pair[1].source_line);
            }
            let value_lines = doc.iter().filter(|l| !l.trim_end().ends_with(':')).count();
            prop_assert_eq!(result.entries.len(), value_lines);
        }

        #[test]
        fn keys_end_with_the_value_line_key(
            doc in proptest::collection::vec(document_line(), 0..30),
        ) {
            let lines = split_lines(&doc.join("\n"));
            let result = flatten(&lines, FlattenOptions::default());
            for entry in &result.entries {
                let own = extract_key(&lines[entry.source_line]).unwrap();
                let suffix = format!(".{own}");
                prop_assert!(entry.key == own || entry.key.ends_with(&suffix));
            }
        }
    }
}
