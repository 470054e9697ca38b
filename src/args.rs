//! The CLI surface, unified into a [`Session`] plus the remaining run
//! parameters so nothing downstream of `main` touches
//! [`std::env::args`] again.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

use crate::session::Session;

/// Interactive triage tool for clang-tidy diagnostics.
#[derive(Debug, Parser)]
#[command(name = "autotidy", version, about)]
pub struct Args {
    /// Diagnostics log to read.
    #[arg(short = 'l', long = "log", default_value = "tidy.log")]
    pub log: PathBuf,

    /// Source file to re-lint before the walk; if omitted, the existing
    /// log is read as-is.
    #[arg(short = 's', long = "source")]
    pub source: Option<PathBuf>,

    /// clang-tidy config file.
    #[arg(short = 'c', long = "clang-tidy-config", default_value = ".clang-tidy")]
    pub clang_tidy_config: PathBuf,

    /// Diff command template, with `{0}`/`{1}` placeholders for the
    /// original and temp paths.
    #[arg(short = 'd', long = "diff-command", default_value = "diff -u {0} {1}")]
    pub diff_command: String,

    /// YAML fixes file.
    #[arg(short = 'f', long = "fixes-file", default_value = "fixes.yaml")]
    pub fixes_file: PathBuf,

    /// Header filter regex, passed through to the linter invocation.
    #[arg(short = 'F', long = "header-filter")]
    pub header_filter: Option<String>,

    /// Header strip level, passed through to the linter invocation.
    #[arg(short = 'H', long = "header-strip")]
    pub header_strip: Option<u32>,

    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands outside the main triage walk.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a shell completion script to stdout.
    Completions {
        /// Shell to generate completions for.
        shell: clap_complete::Shell,
    },
}

impl Args {
    /// Parse `std::env::args`, exiting the process on `--help`/`--version`
    /// or a usage error (clap's own behavior).
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Print the requested shell's completion script to stdout.
    pub fn print_completions(shell: clap_complete::Shell) {
        let mut cmd = Self::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    }

    /// Build the [`Session`] this run operates under, rooted at the
    /// process's current directory.
    pub fn into_session(&self) -> std::io::Result<Session> {
        let current_dir = std::env::current_dir()?.to_string_lossy().to_string();
        Ok(Session::new(current_dir, self.diff_command.clone()))
    }
}
