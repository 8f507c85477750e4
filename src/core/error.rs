//! Error taxonomy for a push run.
//!
//! Every variant is terminal for the run. `kind()` tells the CLI how to exit and
//! `help()` supplies the remediation line printed under the error.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PushError>;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("GitHub credentials not found (missing {})", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("Unable to fetch the base projects path")]
    MissingBasePath,

    #[error("Repository {owner}/{name} does not exist on GitHub")]
    RepositoryNotFound { owner: String, name: String },

    #[error("{folder} cannot be found under {base}")]
    ProjectFolderNotFound { folder: String, base: String },

    #[error("`{command}` failed ({})\n{stderr}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Could not reach the GitHub API")]
    RemoteUnavailable(#[source] reqwest::Error),

    #[error("Input closed before an answer was given")]
    InputClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// How the CLI should treat an error once it has been printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or incomplete configuration. Nothing was touched.
    Configuration,
    /// Repository or project folder absent. Nothing was touched.
    NotFound,
    /// Anything that interrupted the run part way.
    Fatal,
}

impl PushError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PushError::MissingCredentials { .. } | PushError::MissingBasePath => {
                ErrorKind::Configuration
            }
            PushError::RepositoryNotFound { .. } | PushError::ProjectFolderNotFound { .. } => {
                ErrorKind::NotFound
            }
            PushError::CommandFailed { .. }
            | PushError::RemoteUnavailable(_)
            | PushError::InputClosed
            | PushError::Io(_) => ErrorKind::Fatal,
        }
    }

    /// Remediation text shown on the HELP line.
    pub fn help(&self) -> String {
        match self {
            PushError::MissingCredentials { .. } => {
                "Ensure you have a .env file with GITHUB_USERNAME and GITHUB_TOKEN set.".to_string()
            }
            PushError::MissingBasePath => {
                "Ensure you have a .env file with BASE_PROJECTS_PATH set to your projects directory."
                    .to_string()
            }
            PushError::RepositoryNotFound { .. } => {
                "Consider creating the repository on GitHub first, or check that the repository \
                 name is correct. An expired token or an exhausted rate limit also looks like a \
                 missing repository."
                    .to_string()
            }
            PushError::ProjectFolderNotFound { .. } => {
                "Ensure the project folder exists in one of the directories under BASE_PROJECTS_PATH."
                    .to_string()
            }
            PushError::CommandFailed { command, .. } => format!(
                "Resolve the problem reported by git, then run again. The failed step was `{}`.",
                command
            ),
            PushError::RemoteUnavailable(_) => {
                "Check your network connection (and GITHUB_API_URL if set).".to_string()
            }
            PushError::InputClosed => "Run autopush from an interactive terminal.".to_string(),
            PushError::Io(_) => "Check file permissions in the project folder.".to_string(),
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "terminated by signal".to_string(),
    }
}
