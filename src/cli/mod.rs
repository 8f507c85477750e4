pub mod check;
pub mod push;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::core::error::{ErrorKind, PushError};
use crate::core::style;
use crate::core::terminal::{Console, Terminal};

#[derive(Parser)]
#[command(name = "autopush")]
#[command(about = "Push a local project folder to its GitHub repository")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read environment variables from this file instead of ./.env
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Wait for Enter before exiting (for launching from a file manager)
    #[arg(long, global = true)]
    pub pause: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Commit the project folder and push it to main (default)
    Push {
        /// GitHub repository name (asked for when omitted)
        #[arg(short, long)]
        repo: Option<String>,

        /// Project folder name, searched under BASE_PROJECTS_PATH
        #[arg(short, long)]
        folder: Option<String>,

        /// Commit message used if there is anything to commit
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Check credentials and that the repository exists, without touching git
    Check {
        /// GitHub repository name (asked for when omitted)
        #[arg(short, long)]
        repo: Option<String>,
    },
}

impl Cli {
    /// Load `--env-file` or `./.env` into the process environment.
    ///
    /// Runs before logging is set up so `RUST_LOG` may come from the file.
    /// Returns the file that was read, if any.
    pub fn load_env(&self) -> Result<Option<PathBuf>> {
        load_env_file(self.env_file.as_deref())
    }

    pub async fn run(self) -> Result<ExitCode> {
        let result = match self.command {
            Some(Commands::Push { repo, folder, message }) => {
                push::run(repo, folder, message).await
            }
            Some(Commands::Check { repo }) => check::run(repo).await,
            None => push::run(None, None, None).await,
        };

        if self.pause {
            let mut console = Console::stdio();
            console.say("");
            // EOF just means there is nobody to wait for
            let _ = console.ask("Press Enter to exit");
        }
        result
    }
}

/// Load `path`, or `./.env` when no path is given.
///
/// A missing `./.env` is fine: the variables may already be exported.
fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file: {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(e).context("Failed to load .env"),
        },
    }
}

/// Print a run-ending error as an ERROR/HELP pair and pick the exit code.
///
/// Configuration and not-found outcomes end the run normally; anything that
/// broke off part way exits non-zero.
pub(crate) fn report_error<T: Terminal>(term: &mut T, err: PushError) -> ExitCode {
    term.say(&style::error(&err.to_string()));
    term.say(&style::help(&err.help()));
    tracing::debug!(error = ?err, "run ended");

    match err.kind() {
        ErrorKind::Configuration | ErrorKind::NotFound => ExitCode::SUCCESS,
        ErrorKind::Fatal => ExitCode::FAILURE,
    }
}
