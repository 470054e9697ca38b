//! Per-run state threaded explicitly through the Controller: current
//! directory, skipped files, staged temp files, and the diff command
//! template.

use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};

/// Per-run state threaded into the Controller.
#[derive(Debug, Clone)]
pub struct Session {
    /// Working directory, kept with a trailing separator so it can be
    /// stripped as a basename prefix directly.
    pub current_dir: String,
    /// Files the operator chose to skip entirely (`S` key).
    pub skipped_files: IndexSet<PathBuf>,
    /// Per-diagnostic mapping from an original path to its `.temp`
    /// staging copy; cleared at the start of every diagnostic.
    pub staged_temps: IndexMap<PathBuf, PathBuf>,
    /// Format template for the external diff command, with positional
    /// placeholders for the original and temp paths (e.g. `diff -u {0}
    /// {1}`).
    pub diff_command: String,
}

impl Session {
    /// Build a session rooted at `current_dir`, normalized to always end
    /// in a path separator.
    pub fn new(current_dir: impl Into<String>, diff_command: impl Into<String>) -> Self {
        let mut current_dir = current_dir.into();
        if !current_dir.ends_with(std::path::MAIN_SEPARATOR) {
            current_dir.push(std::path::MAIN_SEPARATOR);
        }
        Self {
            current_dir,
            skipped_files: IndexSet::new(),
            staged_temps: IndexMap::new(),
            diff_command: diff_command.into(),
        }
    }

    /// Whether `path` was skipped via the `S` key in an earlier diagnostic.
    pub fn is_skipped(&self, path: &std::path::Path) -> bool {
        self.skipped_files.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_dir_gets_trailing_separator() {
        let session = Session::new("/home/dev/proj", "diff -u {0} {1}");
        assert!(session.current_dir.ends_with(std::path::MAIN_SEPARATOR));
    }

}
