//! Human-readable report rendering.
//!
//! Pure string formatting over a finished [`TokenReport`]; no I/O. The
//! presentation layer (bots, web) decides where the text goes.

use crate::oracle::types::TokenReport;
use crate::types::{Severity, Verdict};
use std::fmt::Write;

fn severity_glyph(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🔴",
        Severity::High => "🟠",
        Severity::Medium => "🟡",
        Severity::Low => "⚪",
    }
}

fn verdict_glyph(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Safe => "✅",
        Verdict::Warning => "⚠️",
        Verdict::Avoid => "🚫",
    }
}

/// Render a token report for display.
///
/// A failed or not-found analysis renders its own distinct block so "we
/// could not determine" is never mistaken for "this is safe".
pub fn render_report(report: &TokenReport) -> String {
    let mut out = String::new();

    if !report.found {
        let reason = report.error.as_deref().unwrap_or("unknown reason");
        let _ = writeln!(out, "❓ Token Analysis — {}", report.address);
        let _ = writeln!(out, "Could not analyze: {reason}");
        let _ = writeln!(out, "{}", report.recommendation);
        return out;
    }

    let _ = writeln!(out, "Token Analysis — {}", report.address);
    if let Some(error) = &report.error {
        let _ = writeln!(out, "🔴 ANALYSIS FAILED: {error}");
    }
    let _ = writeln!(
        out,
        "{} Safety score: {}/100 (grade {}) — verdict: {}",
        verdict_glyph(report.verdict),
        report.score,
        report.grade,
        report.verdict
    );

    if !report.components.is_empty() {
        let _ = writeln!(out, "\nComponent risk breakdown:");
        for (name, risk) in &report.components {
            let _ = writeln!(out, "  {name}: {risk:.0}/100");
        }
    }

    if !report.strengths.is_empty() {
        let _ = writeln!(out, "\nStrengths:");
        for strength in &report.strengths {
            let _ = writeln!(out, "  ✅ {strength}");
        }
    }

    if !report.risks.is_empty() {
        let _ = writeln!(out, "\nRisks:");
        for finding in &report.risks {
            let _ = writeln!(
                out,
                "  {} [{}] {} (confidence {}%)",
                severity_glyph(finding.severity),
                finding.severity,
                finding.description,
                finding.confidence
            );
        }
    }

    if !report.degraded.is_empty() {
        let _ = writeln!(out, "\nUnverified signals:");
        for name in &report.degraded {
            let _ = writeln!(out, "  ❓ {name} unavailable — treated as unknown, not clean");
        }
    }

    let _ = writeln!(out, "\n{}", report.recommendation);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Grade, RiskFinding};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn sample_report() -> TokenReport {
        TokenReport {
            address: "Mint11111111111111111111111111111111111111".to_string(),
            found: true,
            error: None,
            score: 34,
            grade: Grade::F,
            verdict: Verdict::Avoid,
            components: BTreeMap::from([
                ("concentration".to_string(), 100.0),
                ("market".to_string(), 40.0),
            ]),
            risks: vec![RiskFinding::new(
                "top_holder_concentration",
                Severity::Critical,
                90,
                "Largest wallet holds 25.0% of supply",
            )],
            strengths: vec!["Mint authority revoked".to_string()],
            recommendation: "Avoid this token.".to_string(),
            degraded: vec!["wallet ages".to_string()],
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_contains_all_sections() {
        let text = render_report(&sample_report());
        assert!(text.contains("34/100"));
        assert!(text.contains("grade F"));
        assert!(text.contains("AVOID"));
        assert!(text.contains("concentration: 100/100"));
        assert!(text.contains("Largest wallet holds"));
        assert!(text.contains("Mint authority revoked"));
        assert!(text.contains("wallet ages unavailable"));
        assert!(text.contains("Avoid this token."));
    }

    #[test]
    fn test_not_found_renders_distinct_block() {
        let report = TokenReport::not_found("BadMint", Utc::now());
        let text = render_report(&report);
        assert!(text.starts_with("❓"));
        assert!(text.contains("Could not analyze"));
        assert!(!text.contains("Safety score"));
    }

    #[test]
    fn test_failed_analysis_is_visibly_failed() {
        let report = TokenReport::failed("Mint", "rpc timeout", Utc::now());
        let text = render_report(&report);
        assert!(text.contains("ANALYSIS FAILED"));
        assert!(text.contains("0/100"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let report = sample_report();
        assert_eq!(render_report(&report), render_report(&report));
    }
}
