//! Multi-file patch coordinator: backs up on first touch, flushes after
//! every edit, and owns the `.orig`/`.temp` files on disk.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;

use crate::edit::Edit;
use crate::errors::Result;
use crate::offsets;
use crate::patched_file::PatchedFile;

const BACKUP_SUFFIX: &str = ".orig";

/// Owns the mapping from original path to `PatchedFile` for one run, plus
/// the on-disk `.orig` backups that mirror it.
///
/// Two simultaneous runs of the tool in the same working directory are
/// not supported; the `.orig` naming convention is the coordination
/// protocol and nothing locks it against a concurrent second run.
#[derive(Debug, Default)]
pub struct Replacer {
    tracked: IndexMap<PathBuf, PatchedFile>,
}

impl Replacer {
    /// An empty Replacer, ready for a fresh run.
    pub fn new() -> Self {
        Self::default()
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut s = path.as_os_str().to_owned();
        s.push(BACKUP_SUFFIX);
        PathBuf::from(s)
    }

    /// Whether `path` has already been touched by this run.
    pub fn is_tracked(&self, path: &Path) -> bool {
        self.tracked.contains_key(path)
    }

    fn ensure_tracked(&mut self, path: &Path) -> Result<()> {
        if !self.tracked.contains_key(path) {
            let backup = Self::backup_path(path);
            debug!("backing up {} to {}", path.display(), backup.display());
            fs_err::copy(path, &backup)?;
            self.tracked
                .insert(path.to_path_buf(), PatchedFile::new(path));
        }
        Ok(())
    }

    /// Apply `edit` to its path, creating a backup and a tracked entry on
    /// first touch, and flush the result to disk.
    pub fn apply_edit(&mut self, edit: &Edit) -> Result<()> {
        self.ensure_tracked(&edit.path)?;
        let pf = self.tracked.get_mut(&edit.path).expect("just tracked");
        pf.patch(edit.offset, edit.length, &edit.text)?;
        pf.flush()
    }

    /// Append `text` just past the end of `line` in `path`, reading the
    /// backup if `path` is tracked (so the offset is computed against the
    /// *original* line, not a previously patched one) or the live file
    /// otherwise.
    pub fn append_to_line(&mut self, path: &Path, line: usize, text: &str) -> Result<()> {
        let source = if self.is_tracked(path) {
            Self::backup_path(path)
        } else {
            path.to_path_buf()
        };
        let buf = fs_err::read(&source)?;
        let offset = offsets::line_col_to_offset(&buf, line + 1, 1)? - 1;
        self.apply_edit(&Edit {
            path: path.to_path_buf(),
            offset,
            length: 0,
            text: text.to_string(),
        })
    }

    /// Copy the working file at `source` to `target`. If `source` is
    /// tracked, also clone its `PatchedFile` into a new tracked entry
    /// keyed by `target` and copy `source`'s backup to `target`'s, so the
    /// backup invariant holds for the new path too.
    pub fn copy_file(&mut self, target: &Path, source: &Path) -> Result<()> {
        fs_err::copy(source, target)?;
        if let Some(pf) = self.tracked.get(source) {
            let mut cloned = pf.clone();
            cloned.rename(target);
            self.tracked.insert(target.to_path_buf(), cloned);
            fs_err::copy(Self::backup_path(source), Self::backup_path(target))?;
        }
        Ok(())
    }

    /// Delete the working file and, if tracked, its backup; drop the
    /// tracked entry.
    pub fn remove_file(&mut self, path: &Path) -> Result<()> {
        if self.tracked.shift_remove(path).is_some() {
            let backup = Self::backup_path(path);
            if backup.exists() {
                fs_err::remove_file(&backup)?;
            }
        }
        if path.exists() {
            fs_err::remove_file(path)?;
        }
        Ok(())
    }
}

impl Drop for Replacer {
    /// Delete every `.orig` backup still on disk; working files are left
    /// in place.
    fn drop(&mut self) {
        for path in self.tracked.keys() {
            let backup = Self::backup_path(path);
            if backup.exists() {
                if let Err(e) = fs_err::remove_file(&backup) {
                    log::warn!("failed to remove backup {}: {}", backup.display(), e);
                }
            }
        }
    }
}
