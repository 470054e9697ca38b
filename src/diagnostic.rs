//! One reviewable issue and its colorized presentation.

use std::fmt;
use std::path::PathBuf;

use console::Style;

use crate::edit::Edit;

/// A single rule violation report from the linter, with the edits (if
/// any) the fixes file attached to it.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Monotonic sequence id, starting at `0` in log order.
    pub number: usize,
    /// Identifier of the rule, e.g. `modernize-use-auto`.
    pub check: String,
    /// Primary location file; empty when the header line omitted it.
    pub file: PathBuf,
    /// 1-based line of the primary location.
    pub line: usize,
    /// 1-based column of the primary location.
    pub column: usize,
    /// Short diagnostic text.
    pub message: String,
    /// Verbatim excerpt lines that followed the header in the log.
    pub context: String,
    /// Edits the fixes file attached to this diagnostic, in file order.
    pub edits: Vec<Edit>,
}

impl Diagnostic {
    /// Render the header and context the way the Controller shows it,
    /// with `current_dir` stripped from the path if it's a prefix.
    pub fn display_with_base(&self, current_dir: &str) -> DiagnosticDisplay<'_> {
        DiagnosticDisplay {
            diagnostic: self,
            current_dir,
        }
    }
}

/// Display adapter carrying the `currentDir` needed to print a basename.
pub struct DiagnosticDisplay<'a> {
    diagnostic: &'a Diagnostic,
    current_dir: &'a str,
}

impl fmt::Display for DiagnosticDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.diagnostic;
        let path = d.file.to_string_lossy();
        let basename = path.strip_prefix(self.current_dir).unwrap_or(&path);

        let number = Style::new().bold().apply_to(format!("#{}", d.number));
        let check = Style::new().yellow().apply_to(&d.check);
        let location = Style::new().cyan().apply_to(format!("{}:{}", basename, d.line));

        writeln!(f, "{} {} {}: {}", number, location, check, d.message)?;
        if !d.context.is_empty() {
            writeln!(f, "{}", d.context)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_strips_current_dir() {
        let d = Diagnostic {
            number: 1,
            check: "modernize-use-auto".into(),
            file: PathBuf::from("/home/dev/proj/src/a.cpp"),
            line: 3,
            column: 2,
            message: "use auto".into(),
            context: String::new(),
            edits: Vec::new(),
        };
        let rendered = format!("{}", d.display_with_base("/home/dev/proj/"));
        assert!(rendered.contains("src/a.cpp:3"));
        assert!(!rendered.contains("/home/dev/proj/"));
    }
}
