use std::process::ExitCode;

use anyhow::Result;

use crate::core::config::Config;
use crate::core::error::PushError;
use crate::core::orchestrator::MAIN;
use crate::core::style;
use crate::core::terminal::{Console, Terminal, ask_required};
use crate::providers::RemoteHost;
use crate::providers::github::GitHubHost;

/// Resolve credentials and look the repository up, touching nothing locally.
pub async fn run(repo: Option<String>) -> Result<ExitCode> {
    let mut term = Console::stdio();
    let outcome = match Config::load() {
        Ok(config) => {
            let host = GitHubHost::from_config(&config);
            check(&config, &host, &mut term, repo).await
        }
        Err(e) => Err(e),
    };
    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => Ok(super::report_error(&mut term, e)),
    }
}

async fn check<H, T>(
    config: &Config,
    host: &H,
    term: &mut T,
    repo: Option<String>,
) -> Result<(), PushError>
where
    H: RemoteHost + ?Sized,
    T: Terminal,
{
    let owner = &config.credentials.username;
    let name = match repo.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) {
        Some(name) => name,
        None => ask_required(term, "Enter GitHub repository name")?,
    };

    term.say(&format!("Finding repository on {}...", host.name()));
    let found = host
        .lookup(owner, &name)
        .await?
        .ok_or_else(|| PushError::RepositoryNotFound {
            owner: owner.clone(),
            name: name.clone(),
        })?;

    term.say(&style::success("Repository has been found on GitHub!"));
    term.say(&style::summary_line("Repository", &found.full_name));
    term.say(&style::summary_line(
        "Visibility",
        if found.private { "private" } else { "public" },
    ));
    if !found.default_branch.is_empty() {
        term.say(&style::summary_line("Default branch", &found.default_branch));
        if found.default_branch != MAIN {
            term.say(&style::warning(&format!(
                "autopush pushes to main, but the default branch is {}.",
                found.default_branch
            )));
        }
    }
    term.say(&style::summary_line("Push URL", &config.redact(&config.remote_url(&name))));
    term.say(&style::summary_line("Web URL", &style::link(&config.web_url(&name))));
    Ok(())
}
