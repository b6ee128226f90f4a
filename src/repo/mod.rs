//! Repository health scoring - the GitHub-specific variant of the scoring
//! pattern. Same shape as the token oracle (fetch -> component scores ->
//! grade -> report), opposite direction: this composite is a trust score
//! where higher is better, and it is never mixed with token risk values.

pub mod health;

pub use health::{
    render_repo_report, score_repo, RepoAnalyzer, RepoHost, RepoMetrics, RepoReport,
};
