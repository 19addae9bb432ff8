// src/graph/calltree.rs
//! Parser for indentation-structured call-tree reports (GNU cflow layout).
//!
//! ```text
//! main() <int main (void) at src/main.c:12>:
//!     parse_args() <int parse_args (int, char **) at src/args.c:40>
//!     printf()
//! ```
//!
//! Unindented lines introduce the current caller, indented lines name its callees.
//! Only the file part of each `at <path>:<line>` location is kept.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::types::{CallEdge, Edge};

/// Leading prefix that marks a callee line.
pub const CALLEE_INDENT: &str = "    ";

const LOCATION_MARKER: &str = " at ";

/// Builds the deduplicated file-level edge set of a call-tree report.
///
/// Lines without a location (external functions) are skipped. An unindented line
/// without a location clears the current caller, so its callees are dropped too.
#[must_use]
pub fn parse<I, S>(lines: I) -> BTreeSet<CallEdge>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut edges = BTreeSet::new();
    let mut caller: Option<PathBuf> = None;

    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with(CALLEE_INDENT) {
            if let (Some(from), Some(to)) = (&caller, location_path(line)) {
                edges.insert(Edge::new(from.clone(), to));
            }
        } else {
            caller = location_path(line);
        }
    }

    edges
}

/// File path of the `at <path>:<line>` suffix of a call-tree line.
#[must_use]
pub fn location_path(line: &str) -> Option<PathBuf> {
    let (_, location) = line.rsplit_once(LOCATION_MARKER)?;
    let path = location
        .split(':')
        .next()?
        .trim()
        .trim_end_matches('>');
    if path.is_empty() {
        return None;
    }
    Some(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: &str, to: &str) -> CallEdge {
        Edge::new(PathBuf::from(from), PathBuf::from(to))
    }

    #[test]
    fn empty_report_has_no_edges() {
        assert!(parse(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn callees_attach_to_current_caller() {
        let report = "\
main() <int main (void) at src/main.c:12>:
    parse_args() <int parse_args (int, char **) at src/args.c:40>
    run() <void run (void) at src/run.c:3>
run() <void run (void) at src/run.c:3>:
    log_line() <void log_line (const char *) at src/log.c:9>
";
        let edges = parse(report.lines());
        let expected: BTreeSet<_> = [
            edge("src/main.c", "src/args.c"),
            edge("src/main.c", "src/run.c"),
            edge("src/run.c", "src/log.c"),
        ]
        .into_iter()
        .collect();
        assert_eq!(edges, expected);
    }

    #[test]
    fn external_callees_are_skipped() {
        let report = ["main() <int main (void) at a.c:1>:", "    printf()", "    malloc()"];
        assert!(parse(report).is_empty());
    }

    #[test]
    fn callees_of_unlocated_caller_are_dropped() {
        let report = [
            "main() <int main (void) at a.c:1>:",
            "    f() <void f (void) at b.c:2>",
            "garbage line",
            "    g() <void g (void) at c.c:3>",
        ];
        let edges = parse(report);
        assert_eq!(edges.len(), 1);
        assert!(edges.contains(&edge("a.c", "b.c")));
    }

    #[test]
    fn indented_line_before_any_caller_is_ignored() {
        assert!(parse(["    f() <void f (void) at b.c:2>"]).is_empty());
    }

    #[test]
    fn repeated_calls_collapse_to_one_edge() {
        let report = [
            "main() <int main (void) at a.c:1>:",
            "    f() <void f (void) at b.c:2>",
            "    g() <void g (void) at b.c:9>",
        ];
        assert_eq!(parse(report).len(), 1);
    }

    #[test]
    fn location_is_reduced_to_its_path() {
        assert_eq!(
            location_path("x() <int x (void) at lib/x.c:77>:"),
            Some(PathBuf::from("lib/x.c"))
        );
        assert_eq!(location_path("x()"), None);
        assert_eq!(location_path("x() <int x at :3>"), None);
    }
}
