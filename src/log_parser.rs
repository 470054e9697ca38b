//! Parses the linter's text log into an ordered list of `Diagnostic`s.

use std::path::PathBuf;

use log::trace;
use regex::Regex;

use crate::diagnostic::Diagnostic;
use crate::errors::Result;

fn header_re() -> Regex {
    Regex::new(r"^(?:(\S[^:]*):(\d+):(\d+):)?\s*(\w+):\s*(.*)\[([^\]]+)\]\s*$")
        .expect("header regex is a compile-time constant")
}

/// Parses a clang-tidy-style diagnostics log.
pub struct LogParser {
    re: Regex,
}

impl Default for LogParser {
    fn default() -> Self {
        Self { re: header_re() }
    }
}

impl LogParser {
    /// A fresh parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` into diagnostics, in log order, each with an empty
    /// `edits` list (the `FixesParser` attaches those afterwards).
    pub fn parse(&self, text: &str) -> Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        let mut current: Option<Diagnostic> = None;
        let mut context_lines: Vec<&str> = Vec::new();

        for line in text.lines() {
            match self.re.captures(line) {
                Some(caps) if caps.get(4).map(|m| m.as_str()) == Some("note") => {
                    trace!("note line absorbed into previous diagnostic's context: {line}");
                    context_lines.push(line);
                }
                Some(caps) => {
                    if let Some(mut prev) = current.take() {
                        prev.context = context_lines.join("\n");
                        out.push(prev);
                    }
                    context_lines.clear();

                    let file = caps
                        .get(1)
                        .map(|m| PathBuf::from(m.as_str()))
                        .unwrap_or_default();
                    let line_no = caps
                        .get(2)
                        .and_then(|m| m.as_str().parse().ok())
                        .unwrap_or(0);
                    let column = caps
                        .get(3)
                        .and_then(|m| m.as_str().parse().ok())
                        .unwrap_or(0);
                    let message = caps.get(5).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
                    let check = caps.get(6).map(|m| m.as_str().to_string()).unwrap_or_default();

                    current = Some(Diagnostic {
                        number: out.len(),
                        check,
                        file,
                        line: line_no,
                        column,
                        message,
                        context: String::new(),
                        edits: Vec::new(),
                    });
                }
                None => {
                    trace!("non-matching line appended to current context: {line}");
                    context_lines.push(line);
                }
            }
        }

        if let Some(mut prev) = current.take() {
            prev.context = context_lines.join("\n");
            out.push(prev);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_lines_are_absorbed_into_previous_diagnostics_context() {
        let log = "\
a.cpp:1:1: warning: W1 [c1]
a.cpp:1:1: note: see here [c1]
a.cpp:2:2: warning: W2 [c2]
";
        let diags = LogParser::new().parse(log).unwrap();
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].number, 0);
        assert_eq!(diags[0].check, "c1");
        assert!(diags[0].context.contains("note: see here"));
        assert_eq!(diags[1].number, 1);
        assert_eq!(diags[1].check, "c2");
    }

    #[test]
    fn summary_line_without_location() {
        let log = "warning: 3 warnings generated [clang-diagnostic-warning]\n";
        let diags = LogParser::new().parse(log).unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].file, PathBuf::new());
    }

    #[test]
    fn non_matching_lines_become_context() {
        let log = "\
a.cpp:1:1: warning: W1 [c1]
    int x = 0;
    ^
a.cpp:2:2: warning: W2 [c2]
";
        let diags = LogParser::new().parse(log).unwrap();
        assert_eq!(diags.len(), 2);
        assert!(diags[0].context.contains("int x = 0;"));
    }

    #[test]
    fn eof_closes_open_diagnostic() {
        let log = "a.cpp:1:1: warning: W1 [c1]\ntrailing context\n";
        let diags = LogParser::new().parse(log).unwrap();
        assert_eq!(diags.len(), 1);
        assert!(diags[0].context.contains("trailing context"));
    }
}
