//! Terminal- and process-backed collaborators the Controller depends on
//! through traits, so tests can inject in-memory fakes instead of
//! touching a real terminal or spawning real subprocesses.

use std::io::Write as _;
use std::process::{Command, Stdio};

use console::Style;
use crossterm::terminal;

use crate::errors::{Error, Result};

/// Reads a single key, blocking.
pub trait KeyReader {
    /// Block until a key is available and return it.
    fn read_key(&mut self) -> Result<char>;
}

/// Invokes the external diff command template on a pair of paths.
pub trait DiffRunner {
    /// Run `template` with `{0}` substituted for `a` and `{1}` for `b`,
    /// printing its output to stdout.
    fn run_diff(&mut self, template: &str, a: &str, b: &str) -> Result<()>;
}

/// Invokes the operator's pager to display documentation text.
pub trait PagerRunner {
    /// Pipe `text` to the pager command's stdin.
    fn pipe_text_to_command(&mut self, cmd: &str, text: &str) -> Result<()>;
}

/// Invokes the linter, writing its log output to a file.
pub trait LinterRunner {
    /// Run `cmd`, writing its stdout to `out_path`.
    fn pipe_command_to_file(&mut self, cmd: &str, out_path: &std::path::Path) -> Result<()>;
}

/// Colorized writes to stdout.
pub trait StyledWriter {
    /// Write a plain line.
    fn line(&mut self, text: &str);
    /// Write a line styled as an error.
    fn error_line(&mut self, text: &str);
    /// Write a single highlighted key, with no trailing newline.
    fn key(&mut self, key: char);
}

/// Raw-mode guard: enables raw mode on construction, restores the
/// previous mode on `Drop` (and can be restored eagerly from a signal
/// handler, since raw mode is a process-global setting).
pub struct ScopedRaw;

impl ScopedRaw {
    /// Enable terminal raw mode for the lifetime of the returned guard.
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }

    /// Restore cooked mode outside of any guard's lifetime; used by the
    /// signal handler to recover the terminal before exiting.
    pub fn restore_terminal() -> Result<()> {
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for ScopedRaw {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("failed to restore terminal mode: {}", e);
        }
    }
}

/// Real, terminal-backed [`KeyReader`].
#[derive(Default)]
pub struct TerminalKeyReader;

impl KeyReader for TerminalKeyReader {
    fn read_key(&mut self) -> Result<char> {
        use crossterm::event::{self, Event, KeyCode};
        loop {
            if let Event::Key(key_event) = event::read()? {
                if let KeyCode::Char(c) = key_event.code {
                    return Ok(c);
                }
            }
        }
    }
}

fn render_template(template: &str, a: &str, b: &str) -> String {
    template.replace("{0}", a).replace("{1}", b)
}

fn run_inherited(command_line: &str) -> Result<()> {
    let mut parts = command_line.split_whitespace();
    let program = parts.next().ok_or_else(|| Error::Cli("empty command".into()))?;
    let status = Command::new(program)
        .args(parts)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;
    if !status.success() {
        log::debug!("command `{command_line}` exited with {status}");
    }
    Ok(())
}

/// Real [`DiffRunner`] that shells out to the configured diff command.
#[derive(Default)]
pub struct ProcessDiffRunner;

impl DiffRunner for ProcessDiffRunner {
    fn run_diff(&mut self, template: &str, a: &str, b: &str) -> Result<()> {
        run_inherited(&render_template(template, a, b))
    }
}

/// Real [`PagerRunner`] that shells out to the configured pager command.
#[derive(Default)]
pub struct ProcessPagerRunner;

impl PagerRunner for ProcessPagerRunner {
    fn pipe_text_to_command(&mut self, cmd: &str, text: &str) -> Result<()> {
        let mut parts = cmd.split_whitespace();
        let program = parts.next().ok_or_else(|| Error::Cli("empty command".into()))?;
        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        child.wait()?;
        Ok(())
    }
}

/// Real [`LinterRunner`] that shells out to the configured linter and
/// redirects its stdout to a log file.
#[derive(Default)]
pub struct ProcessLinterRunner;

impl LinterRunner for ProcessLinterRunner {
    fn pipe_command_to_file(&mut self, cmd: &str, out_path: &std::path::Path) -> Result<()> {
        let mut parts = cmd.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::Cli("empty command".into()))?;
        which(program)?;
        let out = std::fs::File::create(out_path)?;
        Command::new(program)
            .args(parts)
            .stdout(Stdio::from(out))
            .stderr(Stdio::inherit())
            .status()?;
        Ok(())
    }
}

fn which(program: &str) -> Result<()> {
    let found = std::env::var_os("PATH").is_some_and(|paths| {
        std::env::split_paths(&paths).any(|dir| dir.join(program).is_file())
    });
    if found {
        Ok(())
    } else {
        Err(Error::LinterMissing(program.to_string()))
    }
}

/// Real, `console`-backed [`StyledWriter`].
#[derive(Default)]
pub struct ConsoleStyledWriter;

impl StyledWriter for ConsoleStyledWriter {
    fn line(&mut self, text: &str) {
        println!("{text}");
    }

    fn error_line(&mut self, text: &str) {
        eprintln!("{}", Style::new().red().apply_to(text));
    }

    fn key(&mut self, key: char) {
        print!("{}", Style::new().reverse().apply_to(format!("[{key}]")));
        let _ = std::io::stdout().flush();
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_template_substitutes_placeholders() {
        assert_eq!(
            render_template("diff -u {0} {1}", "a.cpp", "a.cpp.temp"),
            "diff -u a.cpp a.cpp.temp"
        );
    }

    #[test]
    fn which_reports_missing_linter() {
        assert!(matches!(
            which("definitely-not-a-real-linter-binary"),
            Err(Error::LinterMissing(_))
        ));
    }
}
