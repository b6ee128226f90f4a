//! Social-presence red flags and dev-wallet outflow checks.
//!
//! Social metadata arrives from several upstreams with different coverage.
//! Sources are merged in priority order: the first nonempty value for a
//! field wins and is never overwritten by an empty value from a later,
//! lower-priority source.

use crate::oracle::types::{KnownAddressBook, SocialProfile, TxRecord};
use crate::types::{RiskFinding, Severity, Verdict};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of the social-presence detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialReport {
    /// Best-known profile after priority merge.
    pub profile: SocialProfile,
    /// Which of {website, twitter, telegram} are absent.
    pub missing: Vec<String>,
    pub casino_outflows: usize,
    /// Risk points, 0-100.
    pub risk: f64,
    /// Social-check verdict per its own mapping; the aggregate verdict may
    /// be stricter but never laxer than this.
    pub verdict: Verdict,
    pub findings: Vec<RiskFinding>,
}

/// Merge profiles in priority order; first nonempty value per field wins.
pub fn merge_profiles(sources: &[SocialProfile]) -> SocialProfile {
    let mut merged = SocialProfile::default();
    for source in sources {
        merge_field(&mut merged.website, &source.website);
        merge_field(&mut merged.twitter, &source.twitter);
        merge_field(&mut merged.telegram, &source.telegram);
        merge_field(&mut merged.discord, &source.discord);
    }
    merged
}

fn merge_field(target: &mut Option<String>, candidate: &Option<String>) {
    if target.is_none() {
        if let Some(value) = candidate {
            if !value.trim().is_empty() {
                *target = Some(value.clone());
            }
        }
    }
}

/// Analyze social presence and dev-wallet outflows.
///
/// `sources` must already be in priority order; `dev_outflows` are transfers
/// out of the dev wallet as observed on-chain.
pub fn analyze_social(
    sources: &[SocialProfile],
    dev_outflows: &[TxRecord],
    known: &KnownAddressBook,
) -> SocialReport {
    let profile = merge_profiles(sources);

    let mut missing = Vec::new();
    if profile.website.is_none() {
        missing.push("website".to_string());
    }
    if profile.twitter.is_none() {
        missing.push("twitter".to_string());
    }
    if profile.telegram.is_none() {
        missing.push("telegram".to_string());
    }

    let mut risk: f64 = 0.0;
    let mut findings = Vec::new();

    match missing.len() {
        3 => {
            risk += 40.0;
            findings.push(
                RiskFinding::new(
                    "no_social_presence",
                    Severity::High,
                    85,
                    "No website, Twitter or Telegram found - instant avoid profile",
                )
                .with_evidence("missing", missing.join(",")),
            );
        }
        2 => {
            risk += 25.0;
            findings.push(
                RiskFinding::new(
                    "thin_social_presence",
                    Severity::Medium,
                    65,
                    format!("Missing {} of 3 core social channels", missing.len()),
                )
                .with_evidence("missing", missing.join(",")),
            );
        }
        _ => {}
    }

    let casino_outflows = dev_outflows
        .iter()
        .filter(|tx| tx.amount != 0.0 && known.is_casino(&tx.dest))
        .count();
    if casino_outflows > 0 {
        risk += 50.0;
        findings.push(
            RiskFinding::new(
                "casino_outflow",
                Severity::Critical,
                95,
                format!(
                    "Dev wallet sent {casino_outflows} transfer(s) to known gambling addresses"
                ),
            )
            .with_evidence("outflow_count", casino_outflows.to_string()),
        );
    }

    let risk = risk.min(100.0);
    let verdict = if risk >= 60.0 || casino_outflows > 0 {
        Verdict::Avoid
    } else if risk >= 30.0 {
        Verdict::Warning
    } else {
        Verdict::Safe
    };

    debug!(risk, ?verdict, casino_outflows, "social analysis complete");

    SocialReport {
        profile,
        missing,
        casino_outflows,
        risk,
        verdict,
        findings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(
        website: Option<&str>,
        twitter: Option<&str>,
        telegram: Option<&str>,
    ) -> SocialProfile {
        SocialProfile {
            website: website.map(|s| s.to_string()),
            twitter: twitter.map(|s| s.to_string()),
            telegram: telegram.map(|s| s.to_string()),
            discord: None,
        }
    }

    #[test]
    fn test_two_missing_channels_is_medium() {
        // website=null, twitter=null, telegram present: medium (+25), not high.
        let report = analyze_social(
            &[profile(None, None, Some("https://t.me/example"))],
            &[],
            &KnownAddressBook::default(),
        );

        assert_eq!(report.missing.len(), 2);
        assert_eq!(report.risk, 25.0);
        assert_eq!(report.findings[0].severity, Severity::Medium);
        assert_eq!(report.verdict, Verdict::Safe);
    }

    #[test]
    fn test_all_missing_is_high_and_warning() {
        let report = analyze_social(&[profile(None, None, None)], &[], &KnownAddressBook::default());

        assert_eq!(report.missing.len(), 3);
        assert_eq!(report.risk, 40.0);
        assert_eq!(report.findings[0].severity, Severity::High);
        assert_eq!(report.verdict, Verdict::Warning);
    }

    #[test]
    fn test_priority_merge_never_overwrites_with_empty() {
        let high_priority = profile(Some("https://token.example"), None, None);
        let low_priority = profile(Some(""), Some("https://x.com/token"), None);

        let merged = merge_profiles(&[high_priority, low_priority]);
        // Website kept from the first source; twitter filled from the second.
        assert_eq!(merged.website.as_deref(), Some("https://token.example"));
        assert_eq!(merged.twitter.as_deref(), Some("https://x.com/token"));
        assert!(merged.telegram.is_none());
    }

    #[test]
    fn test_blank_strings_do_not_count_as_present() {
        let merged = merge_profiles(&[profile(Some("   "), None, None)]);
        assert!(merged.website.is_none());
    }

    #[test]
    fn test_casino_outflow_forces_avoid() {
        let mut known = KnownAddressBook::default();
        known.casinos.insert("casino".to_string());

        let outflow = TxRecord::transfer(1_000, "dev".to_string(), "casino".to_string(), -500.0);
        let report = analyze_social(
            &[profile(Some("a"), Some("b"), Some("c"))],
            &[outflow],
            &known,
        );

        assert_eq!(report.casino_outflows, 1);
        assert_eq!(report.risk, 50.0);
        assert_eq!(report.verdict, Verdict::Avoid);
        assert!(report
            .findings
            .iter()
            .any(|f| f.kind == "casino_outflow" && f.severity == Severity::Critical));
    }

    #[test]
    fn test_missing_socials_plus_casino_is_avoid() {
        let mut known = KnownAddressBook::default();
        known.casinos.insert("casino".to_string());
        let outflow = TxRecord::transfer(1_000, "dev".to_string(), "casino".to_string(), -500.0);

        let report = analyze_social(&[profile(None, None, None)], &[outflow], &known);
        assert_eq!(report.risk, 90.0);
        assert_eq!(report.verdict, Verdict::Avoid);
    }

    #[test]
    fn test_complete_profile_is_safe() {
        let report = analyze_social(
            &[profile(Some("a"), Some("b"), Some("c"))],
            &[],
            &KnownAddressBook::default(),
        );
        assert_eq!(report.risk, 0.0);
        assert_eq!(report.verdict, Verdict::Safe);
        assert!(report.findings.is_empty());
    }
}
