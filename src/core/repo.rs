use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use git2::Repository;
use tracing::{debug, warn};

use crate::core::config::redact_token;
use crate::core::error::{PushError, Result};

/// Markers git leaves under `.git` while a rebase is paused.
const REBASE_MARKERS: &[&str] = &["rebase-apply", "rebase-merge"];

/// HEAD commit, as shown after a push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub short_hash: String,
    pub subject: String,
}

/// Capabilities the push flow needs from the local working tree.
///
/// Probes answer questions and never fail; everything else is a mutation that
/// either succeeds or aborts the run with [`PushError::CommandFailed`].
pub trait LocalRepository {
    /// Point every later call at `dir`.
    fn enter(&mut self, dir: &Path);

    /// Keep `secret` out of logs, forwarded output and error messages.
    fn redact(&mut self, secret: &str);

    // ---------- Probes ----------

    fn is_git_repository(&self) -> bool;
    fn is_rebase_in_progress(&self) -> bool;
    fn has_staged_changes(&self) -> bool;
    fn list_local_branches(&self) -> BTreeSet<String>;
    /// Current branch name, or `None` when HEAD is detached.
    fn current_branch(&self) -> Option<String>;
    fn head_summary(&self) -> Option<CommitSummary>;

    // ---------- Mutations ----------

    fn init(&mut self) -> Result<()>;
    fn add_all(&mut self) -> Result<()>;
    fn rebase_continue(&mut self) -> Result<()>;
    fn rebase_abort(&mut self) -> Result<()>;
    fn pull_rebase(&mut self, branch: &str) -> Result<()>;
    fn commit(&mut self, message: &str) -> Result<()>;
    /// Removing a remote that does not exist is not an error.
    fn remove_remote(&mut self, name: &str);
    fn add_remote(&mut self, name: &str, url: &str) -> Result<()>;
    fn checkout(&mut self, branch: &str) -> Result<()>;
    fn create_branch(&mut self, name: &str) -> Result<()>;
    fn rename_branch_to_main(&mut self) -> Result<()>;
    fn push(&mut self, remote: &str, branch: &str) -> Result<()>;
}

/// [`LocalRepository`] backed by the system `git` binary.
///
/// We shell out to git for every mutation because the system git already
/// handles credentials, hooks, proxies and the rebase machinery. git2 is
/// only used to read HEAD for the final report.
///
/// Whatever git prints while a mutation succeeds (commit summary, pull and
/// push progress, `remote:` lines) is forwarded to stderr, or to the writer
/// given to [`GitCli::with_output`].
pub struct GitCli {
    workdir: PathBuf,
    secret: Option<String>,
    echo: Box<dyn Write + Send>,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            secret: None,
            echo: Box::new(io::stderr()),
        }
    }

    /// Forward git's output to `writer` instead of stderr.
    pub fn with_output(mut self, writer: impl Write + Send + 'static) -> Self {
        self.echo = Box::new(writer);
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn describe(&self, args: &[&str]) -> String {
        self.hide(format!("git {}", args.join(" ")))
    }

    fn hide(&self, text: String) -> String {
        match &self.secret {
            Some(secret) => redact_token(&text, secret),
            None => text,
        }
    }

    fn forward(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let text = self.hide(String::from_utf8_lossy(bytes).into_owned());
        if let Err(e) = self.echo.write_all(text.as_bytes()).and_then(|_| self.echo.flush()) {
            debug!("cannot forward git output: {}", e);
        }
    }

    fn output(&self, args: &[&str], envs: &[(&str, &str)]) -> std::io::Result<Output> {
        debug!(cwd = %self.workdir.display(), "{}", self.describe(args));
        Command::new("git")
            .args(args)
            .envs(envs.iter().copied())
            .current_dir(&self.workdir)
            .output()
    }

    /// Run a probe: exit status only, spawn failures read as `false`.
    fn probe(&self, args: &[&str]) -> bool {
        match self.output(args, &[]) {
            Ok(output) => output.status.success(),
            Err(e) => {
                warn!("Failed to run `{}`: {}", self.describe(args), e);
                false
            }
        }
    }

    /// Run a probe and return trimmed stdout on success.
    fn probe_stdout(&self, args: &[&str]) -> Option<String> {
        let output = self.output(args, &[]).ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn run(&mut self, args: &[&str]) -> Result<()> {
        self.run_with_env(args, &[])
    }

    /// Run a mutation. Its stdout is always forwarded; stderr is forwarded on
    /// success and carried by the error otherwise.
    fn run_with_env(&mut self, args: &[&str], envs: &[(&str, &str)]) -> Result<()> {
        let command = self.describe(args);
        let output = self.output(args, envs).map_err(|e| PushError::CommandFailed {
            command: command.clone(),
            code: None,
            stderr: format!("Failed to run git. Is git installed? ({})", e),
        })?;

        self.forward(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(PushError::CommandFailed {
                code: output.status.code(),
                stderr: self.hide(stderr),
                command,
            });
        }
        self.forward(&output.stderr);
        Ok(())
    }
}

impl LocalRepository for GitCli {
    fn enter(&mut self, dir: &Path) {
        debug!("entering {}", dir.display());
        self.workdir = dir.to_path_buf();
    }

    fn redact(&mut self, secret: &str) {
        self.secret = Some(secret.to_string());
    }

    fn is_git_repository(&self) -> bool {
        self.probe(&["rev-parse", "--is-inside-work-tree"])
    }

    fn is_rebase_in_progress(&self) -> bool {
        let git_dir = self.workdir.join(".git");
        REBASE_MARKERS.iter().any(|marker| git_dir.join(marker).exists())
    }

    fn has_staged_changes(&self) -> bool {
        // `--quiet` exits 1 when the index differs from HEAD
        match self.output(&["diff", "--cached", "--quiet"], &[]) {
            Ok(output) => !output.status.success(),
            Err(e) => {
                warn!("Failed to run `git diff --cached --quiet`: {}", e);
                false
            }
        }
    }

    fn list_local_branches(&self) -> BTreeSet<String> {
        self.probe_stdout(&["branch"])
            .map(|stdout| parse_branch_list(&stdout))
            .unwrap_or_default()
    }

    fn current_branch(&self) -> Option<String> {
        self.probe_stdout(&["symbolic-ref", "--short", "HEAD"])
            .filter(|name| !name.is_empty())
    }

    fn head_summary(&self) -> Option<CommitSummary> {
        let repo = Repository::discover(&self.workdir).ok()?;
        let head = repo.head().ok()?;
        let commit = head.peel_to_commit().ok()?;
        let hash = commit.id().to_string();
        Some(CommitSummary {
            short_hash: hash[..7.min(hash.len())].to_string(),
            subject: commit.summary().unwrap_or("").trim().to_string(),
        })
    }

    fn init(&mut self) -> Result<()> {
        self.run(&["init"])
    }

    fn add_all(&mut self) -> Result<()> {
        self.run(&["add", "."])
    }

    fn rebase_continue(&mut self) -> Result<()> {
        // Keep the replayed commit messages instead of opening an editor
        self.run_with_env(&["rebase", "--continue"], &[("GIT_EDITOR", "true")])
    }

    fn rebase_abort(&mut self) -> Result<()> {
        self.run(&["rebase", "--abort"])
    }

    fn pull_rebase(&mut self, branch: &str) -> Result<()> {
        self.run(&["pull", "origin", branch, "--rebase"])
    }

    fn commit(&mut self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message])
    }

    fn remove_remote(&mut self, name: &str) {
        if let Err(e) = self.run(&["remote", "remove", name]) {
            debug!("ignoring failed remote removal: {}", e);
        }
    }

    fn add_remote(&mut self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "add", name, url])
    }

    fn checkout(&mut self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch])
    }

    fn create_branch(&mut self, name: &str) -> Result<()> {
        self.run(&["checkout", "-b", name])
    }

    fn rename_branch_to_main(&mut self) -> Result<()> {
        self.run(&["branch", "-M", "main"])
    }

    fn push(&mut self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", "-u", remote, branch])
    }
}

/// Parse `git branch` output into branch names.
///
/// Strips the `*` current-branch marker and drops the `(HEAD detached at ...)`
/// placeholder git prints when no branch is checked out.
pub fn parse_branch_list(stdout: &str) -> BTreeSet<String> {
    stdout
        .lines()
        .map(|line| line.trim_start_matches(['*', '+', ' ']).trim())
        .filter(|name| !name.is_empty() && !name.starts_with('('))
        .map(str::to_string)
        .collect()
}
