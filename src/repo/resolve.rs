use tracing::{debug, info, warn};

use super::prompt::Prompter;
use super::store::{merge_unique, RepoStore};
use super::types::RepoId;
use super::RepoError;

/// Outcome of turning CLI input or prompts into the repositories for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Repos(Vec<RepoId>),
    /// The user supplied nothing to work with.
    Cancelled,
}

const MODE_SELECT: usize = 0;
const MODE_ADD: usize = 1;

/// Resolve the repositories to query.
///
/// With `args` every entry must be a valid identifier; the first bad one fails the run.
/// Without `args` the saved list drives an interactive selection.
/// New repositories are merged into `store` unless `save` is false.
pub fn resolve(
    args: &[String],
    store: &RepoStore,
    prompter: &mut dyn Prompter,
    save: bool,
) -> Result<Resolution, RepoError> {
    if !args.is_empty() {
        return resolve_args(args, store, save);
    }

    let saved = store.load();
    if saved.is_empty() {
        prompter.notice("No saved repositories yet.")?;
        let new = prompt_new_repos(prompter)?;
        if new.is_empty() {
            return Ok(Resolution::Cancelled);
        }
        remember(store, &new, save);
        return Ok(Resolution::Repos(to_ids(&new)?));
    }

    let mode = prompter.select(
        "Which repositories should be checked?",
        &[
            "Select from saved repositories",
            "Add new repositories",
            "Use all saved repositories",
        ],
        MODE_SELECT,
    )?;
    debug!(mode, saved = saved.len(), "interactive mode chosen");

    let chosen = match mode {
        MODE_SELECT => {
            let picked = prompter.multi_select("Saved repositories:", &saved)?;
            let mut chosen: Vec<String> = picked.into_iter().map(|i| saved[i].clone()).collect();
            if prompter.confirm("Add more repositories?", false)? {
                let new = prompt_new_repos(prompter)?;
                remember(store, &new, save);
                chosen = merge_unique(&chosen, &new);
            }
            chosen
        }
        MODE_ADD => {
            let new = prompt_new_repos(prompter)?;
            remember(store, &new, save);
            new
        }
        // "Use all saved repositories"
        _ => saved,
    };

    if chosen.is_empty() {
        return Ok(Resolution::Cancelled);
    }
    Ok(Resolution::Repos(to_ids(&chosen)?))
}

fn resolve_args(args: &[String], store: &RepoStore, save: bool) -> Result<Resolution, RepoError> {
    let mut ids: Vec<RepoId> = Vec::with_capacity(args.len());
    for arg in args {
        let id = RepoId::parse(arg)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    let names: Vec<String> = ids.iter().map(RepoId::to_string).collect();
    remember(store, &names, save);
    Ok(Resolution::Repos(ids))
}

/// Read identifiers until a blank line. Invalid entries are reported and skipped.
fn prompt_new_repos(prompter: &mut dyn Prompter) -> Result<Vec<String>, RepoError> {
    let mut repos: Vec<String> = Vec::new();
    loop {
        let message = if repos.is_empty() {
            "Repository (owner/repo, blank to finish):"
        } else {
            "Another repository (blank to finish):"
        };
        let Some(line) = prompter.input(message)? else {
            break;
        };
        if line.is_empty() {
            break;
        }
        for entry in line.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty()) {
            match RepoId::parse(entry) {
                Ok(_) if repos.iter().any(|r| r == entry) => {}
                Ok(_) => repos.push(entry.to_string()),
                Err(e) => prompter.notice(&e.to_string())?,
            }
        }
    }
    Ok(repos)
}

fn remember(store: &RepoStore, repos: &[String], save: bool) {
    if !save || repos.is_empty() {
        return;
    }
    match store.merge_and_save(repos) {
        Ok(merged) => info!(total = merged.len(), "remembered repositories"),
        Err(e) => warn!(error = %e, "could not save repository list"),
    }
}

fn to_ids(repos: &[String]) -> Result<Vec<RepoId>, RepoError> {
    repos.iter().map(|r| RepoId::parse(r)).collect()
}
