use std::fmt;

/// Totals across every repository of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    /// Pull requests across all repositories
    pub total_prs: usize,
    /// Repositories checked, including those without PRs
    pub total_repos: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prs = if self.total_prs == 1 { "PR" } else { "PRs" };
        let repos = if self.total_repos == 1 { "repository" } else { "repositories" };
        write!(f, "{} open {} across {} {}", self.total_prs, prs, self.total_repos, repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let summary = Summary { total_prs: 2, total_repos: 2 };
        assert_eq!(summary.to_string(), "2 open PRs across 2 repositories");
        let single = Summary { total_prs: 1, total_repos: 1 };
        assert_eq!(single.to_string(), "1 open PR across 1 repository");
    }
}
