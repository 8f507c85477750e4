//! The push flow: from a repository name to `origin/main` on GitHub.
//!
//! Steps run strictly in order. Probes steer the flow, and the first failing
//! mutation ends the run with nothing rolled back.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::info;

use crate::core::config::Config;
use crate::core::error::{PushError, Result};
use crate::core::locate::find_project_folder;
use crate::core::repo::{CommitSummary, LocalRepository};
use crate::core::style;
use crate::core::terminal::{Terminal, ask_required};
use crate::providers::RemoteHost;

pub const REMOTE: &str = "origin";
pub const MAIN: &str = "main";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Initial commit";

const REBASE_QUESTION: &str =
    "Do you want to (c)ontinue, (a)bort, or (s)kip rebase handling for now? [c/a/s]";

/// Answers supplied up front; anything missing is asked interactively.
#[derive(Debug, Clone, Default)]
pub struct PushRequest {
    pub repo: Option<String>,
    pub folder: Option<String>,
    pub message: Option<String>,
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct PushReport {
    pub repository: String,
    pub web_url: String,
    pub project_dir: PathBuf,
    pub rebase: Option<RebaseChoice>,
    pub committed: bool,
    pub head: Option<CommitSummary>,
}

/// How to deal with a rebase left paused by an earlier run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebaseChoice {
    /// Stage everything and let git carry on replaying commits.
    Continue,
    /// Drop the rebase, then pull again.
    Abort,
    /// Leave it paused and push what is there.
    Skip,
}

impl RebaseChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "c" | "continue" => Some(RebaseChoice::Continue),
            "a" | "abort" => Some(RebaseChoice::Abort),
            "s" | "skip" => Some(RebaseChoice::Skip),
            _ => None,
        }
    }
}

/// What it takes to be on `main` before pushing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchAction {
    Stay,
    CheckoutMain,
    CreateMain,
    RenameToMain,
}

impl BranchAction {
    pub fn decide(current: Option<&str>, local_branches: &BTreeSet<String>) -> Self {
        let main_exists = local_branches.contains(MAIN);
        match current {
            Some(MAIN) => BranchAction::Stay,
            None if main_exists => BranchAction::CheckoutMain,
            None => BranchAction::CreateMain,
            Some(_) if main_exists => BranchAction::CheckoutMain,
            Some(_) => BranchAction::RenameToMain,
        }
    }
}

/// Load configuration, greet the user, then run the whole flow.
///
/// `connect` is only called once credentials are known to be present, so a
/// configuration error never reaches the network or git.
pub async fn automate<L, C, H, G, T>(
    lookup: L,
    connect: C,
    git: &mut G,
    term: &mut T,
    request: &PushRequest,
) -> Result<PushReport>
where
    L: Fn(&str) -> Option<String>,
    C: FnOnce(&Config) -> H,
    H: RemoteHost,
    G: LocalRepository,
    T: Terminal,
{
    let config = Config::load_from(lookup)?;
    info!(username = %config.credentials.username, "credentials loaded");
    git.redact(&config.credentials.token);

    term.say("Welcome! Let's push a project into your GitHub profile!");
    term.say(&format!(
        "Just to make sure, {} is the username of your profile.",
        style::name(&config.credentials.username)
    ));
    term.say("");

    let host = connect(&config);
    PushOrchestrator::new(&config, &host, git, term)
        .run(request)
        .await
}

pub struct PushOrchestrator<'a, H: ?Sized, G, T> {
    config: &'a Config,
    host: &'a H,
    git: &'a mut G,
    term: &'a mut T,
}

impl<'a, H, G, T> PushOrchestrator<'a, H, G, T>
where
    H: RemoteHost + ?Sized,
    G: LocalRepository,
    T: Terminal,
{
    pub fn new(config: &'a Config, host: &'a H, git: &'a mut G, term: &'a mut T) -> Self {
        Self {
            config,
            host,
            git,
            term,
        }
    }

    pub async fn run(&mut self, request: &PushRequest) -> Result<PushReport> {
        let repository = self.resolve_repository(request).await?;
        let project_dir = self.locate_project_folder(request)?;
        self.ensure_initialized()?;

        let rebase = if self.git.is_rebase_in_progress() {
            Some(self.handle_rebase()?)
        } else {
            self.sync()?;
            None
        };

        if rebase != Some(RebaseChoice::Continue) {
            self.term.say("Staging all local changes...");
            self.git.add_all()?;
        }

        let committed = self.commit(request)?;
        self.configure_remote(&repository)?;
        self.ensure_main_branch()?;

        info!("pushing {}/{}", REMOTE, MAIN);
        self.term.say(&format!("Pushing to {}/{}...", REMOTE, MAIN));
        self.git.push(REMOTE, MAIN)?;

        let report = PushReport {
            web_url: self.config.web_url(&repository),
            repository,
            project_dir,
            rebase,
            committed,
            head: self.git.head_summary(),
        };
        self.print_report(&report);
        Ok(report)
    }

    // ---------- Steps ----------

    async fn resolve_repository(&mut self, request: &PushRequest) -> Result<String> {
        let name = match answered(&request.repo) {
            Some(name) => name,
            None => ask_required(&mut *self.term, "Enter GitHub repository name")?,
        };
        let owner = &self.config.credentials.username;

        info!(%owner, repository = %name, "checking remote repository");
        self.term.say("Finding repository on GitHub...");
        if !self.host.repository_exists(owner, &name).await? {
            return Err(PushError::RepositoryNotFound {
                owner: owner.clone(),
                name,
            });
        }

        self.term.say(&style::success("Repository has been found on GitHub!"));
        self.term.say("");
        Ok(name)
    }

    fn locate_project_folder(&mut self, request: &PushRequest) -> Result<PathBuf> {
        let folder = match answered(&request.folder) {
            Some(folder) => folder,
            None => ask_required(&mut *self.term, "Enter the name of your desired project folder")?,
        };
        let base = self.config.base_path()?;

        let dir = find_project_folder(base, &folder)?;
        info!(dir = %dir.display(), "project folder located");
        self.git.enter(&dir);
        Ok(dir)
    }

    fn ensure_initialized(&mut self) -> Result<()> {
        if self.git.is_git_repository() {
            self.term.say("Init status: Already a git repository.");
        } else {
            self.git.init()?;
            self.term.say("Init status: New git repository initialised.");
        }
        Ok(())
    }

    fn handle_rebase(&mut self) -> Result<RebaseChoice> {
        self.term.say(&style::warning("A rebase is currently in progress."));

        let choice = loop {
            self.term.say("");
            let answer = self.term.ask(REBASE_QUESTION)?;
            match RebaseChoice::parse(&answer) {
                Some(choice) => break choice,
                None => self.term.say(&style::hint("Please answer c, a or s.")),
            }
        };
        info!(?choice, "rebase in progress");

        match choice {
            RebaseChoice::Continue => {
                self.term.say("Staging resolved changes...");
                self.git.add_all()?;
                self.git.rebase_continue()?;
                self.term.say("Rebase continued successfully.");
            }
            RebaseChoice::Abort => {
                self.git.rebase_abort()?;
                self.term.say("Rebase aborted.");
                self.sync()?;
            }
            RebaseChoice::Skip => {
                self.term.say("Skipping rebase handling. Rebase still active.");
            }
        }
        Ok(choice)
    }

    fn sync(&mut self) -> Result<()> {
        self.term.say("Pulling latest changes from remote...");
        self.git.pull_rebase(MAIN)?;
        self.term.say("Pulled latest changes successfully.");
        Ok(())
    }

    fn commit(&mut self, request: &PushRequest) -> Result<bool> {
        self.term.say("Committing changes...");
        if !self.git.has_staged_changes() {
            self.term.say("No changes to commit. Working tree is clean.");
            return Ok(false);
        }

        let message = match answered(&request.message) {
            Some(message) => message,
            None => self
                .term
                .ask(&format!("Enter commit message (default: {})", DEFAULT_COMMIT_MESSAGE))?,
        };
        let message = match message.trim() {
            "" => DEFAULT_COMMIT_MESSAGE,
            trimmed => trimmed,
        };

        self.git.commit(message)?;
        Ok(true)
    }

    fn configure_remote(&mut self, repository: &str) -> Result<()> {
        self.git.remove_remote(REMOTE);
        self.git
            .add_remote(REMOTE, &self.config.remote_url(repository))?;
        info!("remote {} configured", REMOTE);
        Ok(())
    }

    fn ensure_main_branch(&mut self) -> Result<()> {
        let current = self.git.current_branch();
        let branches = self.git.list_local_branches();

        match BranchAction::decide(current.as_deref(), &branches) {
            BranchAction::Stay => {}
            BranchAction::CheckoutMain => self.git.checkout(MAIN)?,
            BranchAction::CreateMain => self.git.create_branch(MAIN)?,
            BranchAction::RenameToMain => self.git.rename_branch_to_main()?,
        }
        Ok(())
    }

    fn print_report(&mut self, report: &PushReport) {
        self.term.say("");
        self.term.say(&style::success("Pushed your project into GitHub!"));
        if let Some(head) = &report.head {
            self.term.say(&style::summary_line(
                "Commit",
                &format!("{} {}", style::commit_hash(&head.short_hash), head.subject),
            ));
        }
        self.term.say(&format!(
            "Open this link to view your commit:\t\t{}",
            style::link(&report.web_url)
        ));
    }
}

fn answered(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
