//! The raw-mode key prompt loop and its help text.

use crate::collaborators::{DiffRunner, KeyReader, PagerRunner, StyledWriter};
use crate::errors::Result;
use crate::session::Session;

/// One-line summary for every key, shown on `?`/`h`.
pub const HELP: &str = "\
[?] = This help text
[a] = Apply the shown patch, if this issue has a Fix
[i] = Ignore this check, add it to list of ignored checks in .clang-tidy
[s] = Skip this issue
[S] = Skip all issues in this file
[n] = Add a NOLINT comment to the line where the issue appears
[N] = As above, but only for the current check
[d] = Show documentation on the current check
[t] = Add a TODO comment to the line where the issue appears
[q] = Quit autotidy";

/// The operator's decision for the diagnostic currently under review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Apply,
    Nolint,
    NolintCheck,
    Todo,
    Ignore,
    Skip,
    SkipFile,
    Quit,
}

/// Run the diff-prompt-dispatch loop for one staged diagnostic, reading
/// keys until one of them exits the loop.
pub fn prompt_and_dispatch(
    keys: &mut dyn KeyReader,
    diff: &mut dyn DiffRunner,
    pager: &mut dyn PagerRunner,
    writer: &mut dyn StyledWriter,
    session: &Session,
    check: &str,
    has_patch: bool,
    doc_command: &str,
    doc_text: impl Fn(&str) -> String,
) -> Result<Outcome> {
    loop {
        for (original, temp) in &session.staged_temps {
            diff.run_diff(
                &session.diff_command,
                &original.display().to_string(),
                &temp.display().to_string(),
            )?;
        }

        let key = keys.read_key()?;
        writer.key(key);

        match key {
            'a' if has_patch => return Ok(Outcome::Apply),
            'n' => return Ok(Outcome::Nolint),
            'N' => return Ok(Outcome::NolintCheck),
            't' => return Ok(Outcome::Todo),
            'i' => return Ok(Outcome::Ignore),
            's' => return Ok(Outcome::Skip),
            'S' => return Ok(Outcome::SkipFile),
            'q' => return Ok(Outcome::Quit),
            'd' => pager.pipe_text_to_command(doc_command, &doc_text(check))?,
            '?' | 'h' => writer.line(HELP),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::fakes::{FakeKeyReader, NullPager, RecordingDiffRunner, RecordingWriter};

    fn session() -> Session {
        Session::new("/work/", "diff -u {0} {1}")
    }

    #[test]
    fn apply_is_only_honored_when_patch_staged() {
        let mut keys = FakeKeyReader::new(['a', 's']);
        let mut diff = RecordingDiffRunner::default();
        let mut pager = NullPager::default();
        let mut writer = RecordingWriter::default();

        let outcome = prompt_and_dispatch(
            &mut keys,
            &mut diff,
            &mut pager,
            &mut writer,
            &session(),
            "some-check",
            false,
            "less",
            |c| format!("docs for {c}"),
        )
        .unwrap();

        // 'a' is a no-op without a patch, so the second key ('s') wins.
        assert_matches::assert_matches!(outcome, Outcome::Skip);
    }

    #[test]
    fn help_key_loops_without_exiting() {
        let mut keys = FakeKeyReader::new(['?', 'q']);
        let mut diff = RecordingDiffRunner::default();
        let mut pager = NullPager::default();
        let mut writer = RecordingWriter::default();

        let outcome = prompt_and_dispatch(
            &mut keys,
            &mut diff,
            &mut pager,
            &mut writer,
            &session(),
            "some-check",
            true,
            "less",
            |c| format!("docs for {c}"),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Quit);
        assert!(writer.lines.iter().any(|l| l.contains("This help text")));
    }

    #[test]
    fn doc_key_invokes_pager_and_keeps_looping() {
        let mut keys = FakeKeyReader::new(['d', 's']);
        let mut diff = RecordingDiffRunner::default();
        let mut pager = NullPager::default();
        let mut writer = RecordingWriter::default();

        let outcome = prompt_and_dispatch(
            &mut keys,
            &mut diff,
            &mut pager,
            &mut writer,
            &session(),
            "modernize-use-auto",
            true,
            "less",
            |c| format!("docs for {c}"),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Skip);
        assert_eq!(pager.calls, vec!["docs for modernize-use-auto".to_string()]);
    }
}
