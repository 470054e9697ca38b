//! `autotidy` — an interactive triage tool for clang-tidy diagnostics.
//!
//! The patch-and-preview core (offset translation, the backup/commit/
//! rollback replacer, and the (line, column) <-> byte-offset map) is the
//! part of this crate with real invariants to get right; everything else
//! here is the ambient CLI/log/config plumbing that drives it.

pub mod args;
pub mod collaborators;
pub mod config_store;
pub mod controller;
pub mod diagnostic;
pub mod edit;
pub mod errors;
pub mod fixes_parser;
pub mod log_parser;
pub mod offsets;
pub mod patched_file;
pub mod replacer;
pub mod session;

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Context};
use log::{debug, info, warn};

#[cfg(not(target_os = "windows"))]
use signal_hook::{
    consts::signal::{SIGINT, SIGQUIT, SIGTERM},
    iterator,
};

use args::{Args, Command};
use collaborators::{
    ConsoleStyledWriter, ProcessDiffRunner, ProcessLinterRunner, ProcessPagerRunner, ScopedRaw,
    TerminalKeyReader,
};
use config_store::ConfigStore;
use controller::Controller;
use fixes_parser::FixesParser;
use log_parser::LogParser;
use replacer::Replacer;

/// A simple exit code representation.
///
/// `Custom` can be specified by a future `--code` flag; others map to
/// their UNIX equivalents where available.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ExitCode {
    /// Regular termination, including the operator pressing `q` to quit
    /// the walk early.
    Success,
    /// Terminated by a `*nix` signal.
    Signal,
    /// A custom exit code.
    Custom(u8),
}

impl ExitCode {
    /// Convert to the primitive passed to `std::process::exit`.
    pub fn as_u8(&self) -> u8 {
        match *self {
            Self::Success => 0,
            Self::Signal => 130,
            Self::Custom(code) => code,
        }
    }
}

/// Set while a `PatchedFile::flush` is writing to disk, so the signal
/// handler can wait for it before restoring the terminal and exiting.
pub static WRITE_IN_PROGRESS: AtomicBool = AtomicBool::new(false);

/// Handle `SIGINT`/`SIGTERM`/`SIGQUIT` by restoring the terminal before
/// exiting, so a `Ctrl-C` mid-raw-mode doesn't leave the shell in a
/// broken state.
#[cfg(not(target_os = "windows"))]
pub fn signal_handler() {
    let mut signals =
        iterator::Signals::new([SIGTERM, SIGINT, SIGQUIT]).expect("failed to register signal handlers");
    for s in signals.forever() {
        match s {
            SIGTERM | SIGINT | SIGQUIT => {
                while WRITE_IN_PROGRESS.load(Ordering::Acquire) {
                    std::hint::spin_loop();
                }
                if let Err(e) = ScopedRaw::restore_terminal() {
                    warn!("failed to restore terminal: {e}");
                }
                std::process::exit(130);
            }
            sig => warn!("received unhandled signal {sig}, ignoring"),
        }
    }
}

fn run_linter(
    args: &Args,
    source: &std::path::Path,
) -> anyhow::Result<()> {
    let mut command = format!(
        "clang-tidy -config-file={} {}",
        args.clang_tidy_config.display(),
        source.display()
    );
    if let Some(filter) = &args.header_filter {
        command.push_str(&format!(" -header-filter={filter}"));
    }
    if let Some(strip) = args.header_strip {
        command.push_str(&format!(" -header-strip={strip}"));
    }
    let mut linter = ProcessLinterRunner;
    collaborators::LinterRunner::pipe_command_to_file(&mut linter, &command, &args.log)?;
    Ok(())
}

/// The inner main: parse arguments, prepare the diagnostic list, and
/// drive the Controller's walk.
pub fn run() -> anyhow::Result<ExitCode> {
    let args = Args::parse_args();

    env_logger::Builder::from_env(env_logger::Env::new().filter_or("AUTOTIDY_LOG", "warn"))
        .filter_level(args.verbosity.log_level_filter())
        .init();

    if let Some(Command::Completions { shell }) = args.command {
        Args::print_completions(shell);
        return Ok(ExitCode::Success);
    }

    #[cfg(not(target_os = "windows"))]
    let _signal_thread = std::thread::spawn(signal_handler);

    if let Some(source) = &args.source {
        info!("re-linting {}", source.display());
        run_linter(&args, source)?;
    }

    if !args.log.exists() {
        bail!("diagnostics log `{}` not found", args.log.display());
    }
    let log_text = fs_err::read_to_string(&args.log).context("reading diagnostics log")?;
    let mut diagnostics = LogParser::new().parse(&log_text)?;
    debug!("parsed {} diagnostics", diagnostics.len());

    if args.fixes_file.exists() {
        let raw = fs_err::read(&args.fixes_file).context("reading fixes file")?;
        FixesParser::new().attach(&raw, &mut diagnostics)?;
    }

    let config_text = if args.clang_tidy_config.exists() {
        fs_err::read_to_string(&args.clang_tidy_config).context("reading clang-tidy config")?
    } else {
        String::new()
    };
    let config_store = ConfigStore::load(&config_text);

    let session = args.into_session().context("resolving current directory")?;
    let replacer = Replacer::new();

    let _raw_guard = ScopedRaw::enable().context("enabling terminal raw mode")?;
    let mut keys = TerminalKeyReader;
    let mut diff = ProcessDiffRunner;
    let mut pager = ProcessPagerRunner;
    let mut writer = ConsoleStyledWriter;

    let mut controller = Controller::new(
        replacer,
        config_store,
        args.clang_tidy_config.clone(),
        session,
        &mut keys,
        &mut diff,
        &mut pager,
        &mut writer,
        "less",
    );
    controller.run(diagnostics)?;

    Ok(ExitCode::Success)
}
