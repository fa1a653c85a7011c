pub mod types;

pub use types::Summary;

use crate::pr::RepoResult;
use colored::Colorize;

const NO_OPEN_PRS: &str = "No open PRs";

/// Repository name shown in headers: the part after the last `/`.
pub fn display_name(repository: &str) -> &str {
    repository.rsplit('/').next().unwrap_or(repository)
}

pub fn summarize(results: &[RepoResult]) -> Summary {
    Summary {
        total_prs: results.iter().map(|r| r.pull_requests.len()).sum(),
        total_repos: results.len(),
    }
}

/// Render a standalone HTML document for pasting into Slack.
///
/// Repositories and PRs appear in input order. Titles are inserted as-is,
/// without HTML escaping.
pub fn render_html(results: &[RepoResult]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Open pull requests</title>\n</head>\n<body>\n");

    for result in results {
        html.push_str(&format!(
            "<p><strong>{}</strong></p>\n",
            display_name(&result.repository)
        ));
        if result.pull_requests.is_empty() {
            html.push_str(&format!("<p><em>{}</em></p>\n", NO_OPEN_PRS));
            continue;
        }
        html.push_str("<ul>\n");
        for pr in &result.pull_requests {
            html.push_str(&format!(
                "<li><a href=\"{}\">#{} {}</a> +{}/-{}</li>\n",
                pr.url, pr.number, pr.title, pr.additions, pr.deletions
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Render the same content as Slack mrkdwn text.
pub fn render_slack(results: &[RepoResult]) -> String {
    let mut text = String::new();
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(&format!("*{}*\n", display_name(&result.repository)));
        if result.pull_requests.is_empty() {
            text.push_str(&format!("_{}_\n", NO_OPEN_PRS));
            continue;
        }
        for pr in &result.pull_requests {
            text.push_str(&format!(
                "• <{}|#{} {}> +{}/-{}\n",
                pr.url, pr.number, pr.title, pr.additions, pr.deletions
            ));
        }
    }
    text
}

/// Render the text a reader sees on the HTML page, without any markup.
/// Used as the plain-text alternative on the clipboard.
pub fn render_text(results: &[RepoResult]) -> String {
    let mut text = String::new();
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(display_name(&result.repository));
        text.push('\n');
        if result.pull_requests.is_empty() {
            text.push_str(NO_OPEN_PRS);
            text.push('\n');
            continue;
        }
        for pr in &result.pull_requests {
            text.push_str(&format!(
                "#{} {} +{}/-{}\n",
                pr.number, pr.title, pr.additions, pr.deletions
            ));
        }
    }
    text
}

/// Colored per-repository overview for the terminal.
pub fn render_terminal_summary(results: &[RepoResult]) -> String {
    let mut out = String::from("\n");
    for result in results {
        out.push_str(&format!("{}\n", display_name(&result.repository).cyan().bold()));
        if result.pull_requests.is_empty() {
            out.push_str(&format!("  {}\n", NO_OPEN_PRS.dimmed()));
        }
        for pr in &result.pull_requests {
            out.push_str(&format!(
                "  #{} {} {}{}\n",
                pr.number,
                pr.title,
                format!("+{}", pr.additions).green(),
                format!("/-{}", pr.deletions).red()
            ));
        }
    }
    out.push('\n');
    out.push_str(&format!("{}\n", summarize(results).to_string().bold()));
    out
}

pub fn print_terminal_summary(results: &[RepoResult]) {
    print!("{}", render_terminal_summary(results));
}
