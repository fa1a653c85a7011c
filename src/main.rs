mod auth;
mod config;
mod error;
mod pr;
mod publish;
mod repo;
mod report;

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use error::AppError;
use publish::{PublishOutcome, SystemClipboard};
use repo::{LinePrompter, RepoStore, Resolution};

/// pr-list: collects your open GitHub Pull Requests across repositories and
/// copies them to the clipboard as Slack-ready HTML.
#[derive(Parser, Debug)]
#[command(name = "pr-list", version, about)]
struct Cli {
    /// Repositories to check (e.g., facebook/react). Omit to pick from saved ones.
    repos: Vec<String>,

    /// Print the Slack-formatted list instead of copying it to the clipboard
    #[arg(long)]
    print: bool,

    /// Don't remember the repositories given on the command line
    #[arg(long)]
    no_save: bool,

    /// Config file (default: <config dir>/pr-list/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    info!("loading configuration");
    let config = config::Config::load(cli.config.as_deref())?;
    let store = RepoStore::new(config.store_path().ok_or(AppError::NoStorePath)?);
    debug!(store = %store.path().display(), api_url = %config.github.api_url, "configuration loaded");

    let resolution = {
        let mut prompter = LinePrompter::stdio();
        repo::resolve(&cli.repos, &store, &mut prompter, !cli.no_save)?
    };
    let repos = match resolution {
        Resolution::Repos(repos) => repos,
        Resolution::Cancelled => {
            println!("No repositories given, nothing to do.");
            return Ok(());
        }
    };
    info!(count = repos.len(), "resolved repositories");

    let providers = auth::default_providers(&config.github.cli);
    let (token, page) = tokio::join!(
        auth::resolve_token(&providers),
        publish::Page::open(),
    );
    let client = pr::GitHubClient::new(&config.github.api_url, token?)?;

    let results = match auth::authenticated_login(&client).await? {
        Some(login) => {
            info!(login = %login, "authenticated");
            pr::fetch_all(&client, &repos, &login)
                .instrument(info_span!("fetch_all", repos = repos.len()))
                .await
        }
        None => pr::empty_results(&repos),
    };
    let summary = report::summarize(&results);
    info!(total_prs = summary.total_prs, total_repos = summary.total_repos, "fetched pull requests");

    report::print_terminal_summary(&results);

    let html = report::render_html(&results);
    let slack = report::render_slack(&results);

    if cli.print {
        println!();
        print!("{}", slack);
        if let PublishOutcome::Manual(path) = page.write_only(&html) {
            println!("\nHTML written to {}", path.display());
        }
        return Ok(());
    }

    match page.publish(&html, &report::render_text(&results), &mut SystemClipboard) {
        PublishOutcome::Copied(_) => {
            println!("{}", "Copied to clipboard, paste it into Slack.".green());
        }
        PublishOutcome::Manual(path) => {
            println!(
                "{} open {} in a browser, select all and copy it.",
                "Could not copy to clipboard:".yellow(),
                path.display()
            );
        }
        PublishOutcome::Failed => {
            println!("{}", "Could not copy to clipboard; Slack text follows.".yellow());
            println!();
            print!("{}", slack);
        }
    }

    Ok(())
}
