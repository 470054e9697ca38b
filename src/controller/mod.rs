//! The state machine driving one diagnostic at a time: filter, stage
//! edits into temp files, prompt, dispatch, clean up.

pub mod interactive;

use std::path::{Path, PathBuf};

use log::info;

use crate::collaborators::{DiffRunner, KeyReader, PagerRunner, StyledWriter};
use crate::config_store::ConfigStore;
use crate::diagnostic::Diagnostic;
use crate::edit::Edit;
use crate::errors::Result;
use crate::replacer::Replacer;
use crate::session::Session;

use self::interactive::{prompt_and_dispatch, Outcome};

fn temp_path_for(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".temp");
    PathBuf::from(s)
}

/// Drives the interactive walk over an ordered list of diagnostics.
pub struct Controller<'a> {
    replacer: Replacer,
    config_store: ConfigStore,
    config_path: PathBuf,
    session: Session,
    keys: &'a mut dyn KeyReader,
    diff: &'a mut dyn DiffRunner,
    pager: &'a mut dyn PagerRunner,
    writer: &'a mut dyn StyledWriter,
    pager_command: String,
}

impl<'a> Controller<'a> {
    /// Build a Controller over the given collaborators, config and session.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        replacer: Replacer,
        config_store: ConfigStore,
        config_path: PathBuf,
        session: Session,
        keys: &'a mut dyn KeyReader,
        diff: &'a mut dyn DiffRunner,
        pager: &'a mut dyn PagerRunner,
        writer: &'a mut dyn StyledWriter,
        pager_command: impl Into<String>,
    ) -> Self {
        Self {
            replacer,
            config_store,
            config_path,
            session,
            keys,
            diff,
            pager,
            writer,
            pager_command: pager_command.into(),
        }
    }

    /// Documentation text for `check`, piped to the pager when the
    /// operator presses `?`. No bundled per-check documentation store
    /// exists yet, so every check gets the same placeholder pointing at
    /// the upstream docs.
    fn doc_text(check: &str) -> String {
        format!("No bundled documentation for `{check}`; consult the clang-tidy docs.")
    }

    fn should_filter(&self, diagnostic: &Diagnostic) -> bool {
        self.config_store.ignore_set().contains(&diagnostic.check)
            || diagnostic.file.as_os_str().is_empty()
            || self.session.is_skipped(&diagnostic.file)
    }

    fn print_header(&mut self, diagnostic: &Diagnostic) {
        let rendered = format!(
            "{}",
            diagnostic.display_with_base(&self.session.current_dir)
        );
        self.writer.line(&rendered);
    }

    fn stage(&mut self, diagnostic: &Diagnostic) -> Result<bool> {
        self.session.staged_temps.clear();
        for edit in &diagnostic.edits {
            if !self.session.staged_temps.contains_key(&edit.path) {
                let temp = temp_path_for(&edit.path);
                self.replacer.copy_file(&temp, &edit.path)?;
                self.session.staged_temps.insert(edit.path.clone(), temp);
            }
            let temp = self.session.staged_temps[&edit.path].clone();
            self.replacer.apply_edit(&Edit {
                path: temp,
                offset: edit.offset,
                length: edit.length,
                text: edit.text.clone(),
            })?;
        }
        Ok(!self.session.staged_temps.is_empty())
    }

    fn cleanup_remaining_temps(&mut self) {
        let remaining: Vec<PathBuf> = self.session.staged_temps.drain(..).map(|(_, t)| t).collect();
        for temp in remaining {
            if let Err(e) = self.replacer.remove_file(&temp) {
                self.writer.error_line(&format!("failed to remove {}: {}", temp.display(), e));
            }
        }
    }

    fn apply_outcome(&mut self, diagnostic: &Diagnostic, outcome: Outcome) -> Result<()> {
        match outcome {
            Outcome::Apply => {
                let pairs: Vec<(PathBuf, PathBuf)> = self.session.staged_temps.drain(..).collect();
                for (original, temp) in pairs {
                    self.replacer.copy_file(&original, &temp)?;
                    self.replacer.remove_file(&temp)?;
                }
            }
            Outcome::Nolint => {
                self.replacer
                    .append_to_line(&diagnostic.file, diagnostic.line, " //NOLINT")?;
            }
            Outcome::NolintCheck => {
                let comment = format!(" //NOLINT({})", diagnostic.check);
                self.replacer
                    .append_to_line(&diagnostic.file, diagnostic.line, &comment)?;
            }
            Outcome::Todo => {
                let comment = format!(" //TODO({})", diagnostic.check);
                self.replacer
                    .append_to_line(&diagnostic.file, diagnostic.line, &comment)?;
            }
            Outcome::Ignore => {
                self.config_store.ignore(diagnostic.check.clone());
                fs_err::write(&self.config_path, self.config_store.render())?;
            }
            Outcome::Skip => {}
            Outcome::SkipFile => {
                self.session.skipped_files.insert(diagnostic.file.clone());
            }
            Outcome::Quit => {}
        }
        Ok(())
    }

    fn handle_one(&mut self, diagnostic: &Diagnostic) -> Result<bool> {
        let has_patch = self.stage(diagnostic)?;

        let outcome = prompt_and_dispatch(
            self.keys,
            self.diff,
            self.pager,
            self.writer,
            &self.session,
            &diagnostic.check,
            has_patch,
            &self.pager_command,
            Self::doc_text,
        )?;

        self.apply_outcome(diagnostic, outcome)?;
        self.cleanup_remaining_temps();
        self.writer.line(&"-".repeat(60));

        Ok(outcome == Outcome::Quit)
    }

    /// Walk `diagnostics` in order, driving the prompt loop for each one
    /// that survives the filter step, until `q` is observed or the list
    /// is exhausted.
    pub fn run(&mut self, diagnostics: Vec<Diagnostic>) -> Result<()> {
        for diagnostic in diagnostics {
            if self.should_filter(&diagnostic) {
                continue;
            }
            info!("dispatching diagnostic #{} ({})", diagnostic.number, diagnostic.check);
            self.print_header(&diagnostic);

            match self.handle_one(&diagnostic) {
                Ok(should_quit) => {
                    if should_quit {
                        break;
                    }
                }
                Err(e) => {
                    self.writer.error_line(&format!("{e}"));
                    self.cleanup_remaining_temps();
                }
            }
        }
        Ok(())
    }
}
