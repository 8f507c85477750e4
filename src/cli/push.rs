use std::process::ExitCode;

use anyhow::Result;

use crate::core::orchestrator::{self, PushRequest};
use crate::core::repo::GitCli;
use crate::core::style;
use crate::core::terminal::{Console, Terminal};
use crate::providers::github::GitHubHost;

pub async fn run(repo: Option<String>, folder: Option<String>, message: Option<String>) -> Result<ExitCode> {
    let mut term = Console::stdio();
    term.say(&style::banner(env!("CARGO_PKG_VERSION")));
    term.say("");

    let mut git = GitCli::new(std::env::current_dir()?);

    let request = PushRequest { repo, folder, message };
    let outcome = orchestrator::automate(
        |key| std::env::var(key).ok(),
        GitHubHost::from_config,
        &mut git,
        &mut term,
        &request,
    )
    .await;

    match outcome {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => Ok(super::report_error(&mut term, e)),
    }
}
