//! Repository health scorer.
//!
//! Consumes already-parsed repository metadata from a source-hosting
//! collaborator and produces a 0-100 trust score with component breakdown,
//! letter grade and recommendation. Pure scoring; the only async part is
//! the metadata fetch.

use crate::types::{Grade, RiskFinding, Severity};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Component weight caps; they sum to 100.
const ACTIVITY_MAX: f64 = 30.0;
const COMMUNITY_MAX: f64 = 25.0;
const DOCUMENTATION_MAX: f64 = 20.0;
const STRUCTURE_MAX: f64 = 15.0;
const HYGIENE_MAX: f64 = 10.0;

/// Already-parsed repository metadata from the hosting API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoMetrics {
    pub full_name: String,
    pub stars: u32,
    pub forks: u32,
    pub contributors: u32,
    pub commits_last_90_days: u32,
    pub days_since_last_commit: u32,
    pub archived: bool,
    pub has_license: bool,
    pub has_readme: bool,
    pub readme_lines: u32,
    pub has_tests: bool,
    pub has_ci: bool,
    pub file_count: u32,
}

/// Scored repository report. Trust score: 100 = trustworthy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoReport {
    pub url: String,
    pub found: bool,
    pub error: Option<String>,
    /// Composite trust score, 0-100 (higher is better).
    pub score: u8,
    pub grade: Grade,
    /// Points earned per component, keyed by component name.
    pub components: BTreeMap<String, f64>,
    pub strengths: Vec<String>,
    pub risks: Vec<RiskFinding>,
    pub recommendation: String,
    pub analyzed_at: DateTime<Utc>,
}

impl RepoReport {
    fn unscored(url: &str, error: &str, now: DateTime<Utc>) -> Self {
        Self {
            url: url.to_string(),
            found: false,
            error: Some(error.to_string()),
            score: 0,
            grade: Grade::F,
            components: BTreeMap::new(),
            strengths: Vec::new(),
            risks: Vec::new(),
            recommendation: format!("No analysis performed: {error}."),
            analyzed_at: now,
        }
    }
}

/// Source-hosting collaborator (GitHub API wrapper).
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// `Ok(None)` when the repository does not exist or is private.
    async fn repo_metrics(&self, owner: &str, name: &str) -> Result<Option<RepoMetrics>>;
}

/// Repository analyzer with an injected hosting collaborator.
pub struct RepoAnalyzer {
    host: Arc<dyn RepoHost>,
}

impl RepoAnalyzer {
    pub fn new(host: Arc<dyn RepoHost>) -> Self {
        Self { host }
    }

    /// Analyze a repository by URL or `owner/name` shorthand.
    #[instrument(skip(self, now), fields(repo = %url))]
    pub async fn analyze(&self, url: &str, now: DateTime<Utc>) -> RepoReport {
        let Some((owner, name)) = parse_repo_url(url) else {
            warn!("rejected malformed repository url");
            return RepoReport::unscored(url, "invalid repository URL", now);
        };

        match self.host.repo_metrics(&owner, &name).await {
            Ok(Some(metrics)) => {
                let report = score_repo(url, &metrics, now);
                info!(score = report.score, grade = %report.grade, "repository scored");
                report
            }
            Ok(None) => {
                info!("repository not found");
                RepoReport::unscored(url, "repository not found", now)
            }
            Err(error) => {
                warn!(%error, "repository metadata fetch failed");
                let mut report = RepoReport::unscored(url, &format!("{error:#}"), now);
                report.found = true;
                report
            }
        }
    }
}

/// Extract `(owner, name)` from a GitHub URL or `owner/name` shorthand.
pub fn parse_repo_url(url: &str) -> Option<(String, String)> {
    let trimmed = url
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("github.com/")
        .trim_end_matches(".git")
        .trim_matches('/');

    let mut parts = trimmed.split('/');
    let owner = parts.next()?.trim();
    let name = parts.next()?.trim();
    if owner.is_empty() || name.is_empty() || parts.next().is_some() {
        return None;
    }
    Some((owner.to_string(), name.to_string()))
}

/// Pure scoring over fetched metrics.
pub fn score_repo(url: &str, metrics: &RepoMetrics, now: DateTime<Utc>) -> RepoReport {
    let mut components = BTreeMap::new();
    let mut strengths = Vec::new();
    let mut risks = Vec::new();

    // Activity: commit volume and recency. An archived repository has no
    // future activity by definition.
    let activity = if metrics.archived {
        0.0
    } else {
        let volume = (metrics.commits_last_90_days as f64 / 30.0).min(1.0) * 20.0;
        let recency = match metrics.days_since_last_commit {
            0..=14 => 10.0,
            15..=60 => 6.0,
            61..=180 => 3.0,
            _ => 0.0,
        };
        (volume + recency).min(ACTIVITY_MAX)
    };
    components.insert("activity".to_string(), activity);
    if metrics.archived {
        risks.push(RiskFinding::new(
            "archived",
            Severity::High,
            95,
            "Repository is archived; no further maintenance will happen",
        ));
    } else if activity >= 20.0 {
        strengths.push(format!(
            "Actively maintained: {} commits in the last 90 days",
            metrics.commits_last_90_days
        ));
    } else if metrics.days_since_last_commit > 180 {
        risks.push(
            RiskFinding::new(
                "stale",
                Severity::Medium,
                70,
                format!(
                    "No commits for {} days",
                    metrics.days_since_last_commit
                ),
            )
            .with_evidence("days_since_last_commit", metrics.days_since_last_commit.to_string()),
        );
    }

    // Community: log-scaled so a thousand stars is not a thousand times a one.
    let community = if metrics.contributors == 0 {
        0.0
    } else {
        let stars = ((metrics.stars as f64 + 1.0).log10() / 4.0).min(1.0) * 10.0;
        let forks = ((metrics.forks as f64 + 1.0).log10() / 3.0).min(1.0) * 7.0;
        let contributors = (metrics.contributors as f64 / 10.0).min(1.0) * 8.0;
        (stars + forks + contributors).min(COMMUNITY_MAX)
    };
    components.insert("community".to_string(), community);
    if metrics.contributors == 0 {
        risks.push(RiskFinding::new(
            "no_contributors",
            Severity::High,
            90,
            "No visible contributors",
        ));
    } else if metrics.contributors >= 5 {
        strengths.push(format!("{} contributors", metrics.contributors));
    }

    // Documentation: README presence and substance.
    let documentation = if !metrics.has_readme {
        0.0
    } else {
        match metrics.readme_lines {
            0..=10 => 5.0,
            11..=50 => 12.0,
            _ => DOCUMENTATION_MAX,
        }
    };
    components.insert("documentation".to_string(), documentation);
    if !metrics.has_readme {
        risks.push(RiskFinding::new(
            "no_readme",
            Severity::Medium,
            80,
            "Repository has no README",
        ));
    } else if documentation >= DOCUMENTATION_MAX {
        strengths.push("Substantial README".to_string());
    }

    // Structure: tests, CI, and a non-trivial tree.
    let mut structure: f64 = 0.0;
    if metrics.has_tests {
        structure += 7.0;
        strengths.push("Has a test suite".to_string());
    } else {
        risks.push(RiskFinding::new(
            "no_tests",
            Severity::Medium,
            75,
            "No test suite found",
        ));
    }
    if metrics.has_ci {
        structure += 5.0;
    }
    if metrics.file_count >= 10 {
        structure += 3.0;
    }
    components.insert("structure".to_string(), structure.min(STRUCTURE_MAX));

    // Hygiene: license and not-archived.
    let mut hygiene: f64 = 0.0;
    if metrics.has_license {
        hygiene += 6.0;
    } else {
        risks.push(RiskFinding::new(
            "no_license",
            Severity::Low,
            85,
            "No license file",
        ));
    }
    if !metrics.archived {
        hygiene += 4.0;
    }
    components.insert("hygiene".to_string(), hygiene.min(HYGIENE_MAX));

    let total: f64 = components.values().sum();
    let score = total.clamp(0.0, 100.0).round() as u8;
    let grade = Grade::from_score(score);

    risks.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then(b.confidence.cmp(&a.confidence))
    });

    let recommendation = match grade {
        Grade::APlus | Grade::A => {
            format!("Healthy repository (trust score {score}/100).")
        }
        Grade::B | Grade::C => format!(
            "Usable but verify maintenance status before depending on it (trust score {score}/100)."
        ),
        Grade::D | Grade::F => format!(
            "Weak repository health (trust score {score}/100); treat associated projects with suspicion."
        ),
    };

    debug!(score, %grade, "repository scoring complete");

    RepoReport {
        url: url.to_string(),
        found: true,
        error: None,
        score,
        grade,
        components,
        strengths,
        risks,
        recommendation,
        analyzed_at: now,
    }
}

/// Render a repository report for display.
pub fn render_repo_report(report: &RepoReport) -> String {
    let mut out = String::new();

    if !report.found {
        let reason = report.error.as_deref().unwrap_or("unknown reason");
        let _ = writeln!(out, "❓ Repository Analysis — {}", report.url);
        let _ = writeln!(out, "Could not analyze: {reason}");
        return out;
    }

    let _ = writeln!(out, "Repository Analysis — {}", report.url);
    if let Some(error) = &report.error {
        let _ = writeln!(out, "🔴 ANALYSIS FAILED: {error}");
    }
    let _ = writeln!(out, "Trust score: {}/100 (grade {})", report.score, report.grade);

    let _ = writeln!(out, "\nComponent breakdown:");
    for (name, points) in &report.components {
        let _ = writeln!(out, "  {name}: {points:.0}");
    }

    if !report.strengths.is_empty() {
        let _ = writeln!(out, "\nStrengths:");
        for strength in &report.strengths {
            let _ = writeln!(out, "  ✅ {strength}");
        }
    }
    if !report.risks.is_empty() {
        let _ = writeln!(out, "\nConcerns:");
        for finding in &report.risks {
            let _ = writeln!(out, "  ⚠️ {}", finding.description);
        }
    }

    let _ = writeln!(out, "\n{}", report.recommendation);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_metrics() -> RepoMetrics {
        RepoMetrics {
            full_name: "example/solid-project".to_string(),
            stars: 2_500,
            forks: 300,
            contributors: 25,
            commits_last_90_days: 120,
            days_since_last_commit: 3,
            archived: false,
            has_license: true,
            has_readme: true,
            readme_lines: 200,
            has_tests: true,
            has_ci: true,
            file_count: 150,
        }
    }

    #[test]
    fn test_healthy_repo_grades_high() {
        let report = score_repo("example/solid-project", &healthy_metrics(), Utc::now());
        assert!(report.score >= 90, "score was {}", report.score);
        assert_eq!(report.grade, Grade::APlus);
        assert!(report.risks.is_empty());
    }

    #[test]
    fn test_abandoned_repo_grades_f() {
        // 0 contributors, archived, no license: components floor out, grade F.
        let metrics = RepoMetrics {
            full_name: "ghost/abandoned".to_string(),
            stars: 2,
            forks: 0,
            contributors: 0,
            commits_last_90_days: 0,
            days_since_last_commit: 800,
            archived: true,
            has_license: false,
            has_readme: false,
            readme_lines: 0,
            has_tests: false,
            has_ci: false,
            file_count: 3,
        };
        let report = score_repo("ghost/abandoned", &metrics, Utc::now());

        assert_eq!(report.components["activity"], 0.0);
        assert_eq!(report.components["community"], 0.0);
        assert_eq!(report.components["documentation"], 0.0);
        assert_eq!(report.grade, Grade::F);
        assert!(report.risks.iter().any(|f| f.kind == "archived"));
        assert!(report.risks.iter().any(|f| f.kind == "no_license"));
    }

    #[test]
    fn test_score_bounded() {
        let mut metrics = healthy_metrics();
        metrics.stars = u32::MAX;
        metrics.forks = u32::MAX;
        metrics.contributors = u32::MAX;
        metrics.commits_last_90_days = u32::MAX;
        let report = score_repo("big/repo", &metrics, Utc::now());
        assert!(report.score <= 100);
    }

    #[test]
    fn test_parse_repo_url_variants() {
        assert_eq!(
            parse_repo_url("https://github.com/owner/name"),
            Some(("owner".to_string(), "name".to_string()))
        );
        assert_eq!(
            parse_repo_url("github.com/owner/name.git"),
            Some(("owner".to_string(), "name".to_string()))
        );
        assert_eq!(
            parse_repo_url("owner/name"),
            Some(("owner".to_string(), "name".to_string()))
        );
        assert_eq!(parse_repo_url("owner"), None);
        assert_eq!(parse_repo_url("owner/name/extra"), None);
        assert_eq!(parse_repo_url(""), None);
    }

    #[tokio::test]
    async fn test_analyzer_rejects_bad_url() {
        struct NoHost;
        #[async_trait]
        impl RepoHost for NoHost {
            async fn repo_metrics(&self, _: &str, _: &str) -> Result<Option<RepoMetrics>> {
                panic!("must not be called for invalid URLs");
            }
        }

        let analyzer = RepoAnalyzer::new(Arc::new(NoHost));
        let report = analyzer.analyze("not a url", Utc::now()).await;
        assert!(!report.found);
        assert_eq!(report.grade, Grade::F);
    }

    #[tokio::test]
    async fn test_analyzer_not_found_vs_error() {
        struct Empty;
        #[async_trait]
        impl RepoHost for Empty {
            async fn repo_metrics(&self, _: &str, _: &str) -> Result<Option<RepoMetrics>> {
                Ok(None)
            }
        }
        struct Broken;
        #[async_trait]
        impl RepoHost for Broken {
            async fn repo_metrics(&self, _: &str, _: &str) -> Result<Option<RepoMetrics>> {
                anyhow::bail!("api rate limited")
            }
        }

        let not_found = RepoAnalyzer::new(Arc::new(Empty))
            .analyze("owner/name", Utc::now())
            .await;
        assert!(!not_found.found);

        let failed = RepoAnalyzer::new(Arc::new(Broken))
            .analyze("owner/name", Utc::now())
            .await;
        assert!(failed.found);
        assert_eq!(failed.score, 0);
        assert!(failed.error.as_deref().unwrap().contains("rate limited"));
    }
}
