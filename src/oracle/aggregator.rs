//! Aggregation and classification.
//!
//! Pure function from detector outcomes to the final report: weighted
//! component risks fold into one bounded safety score (100 = safe), the
//! score maps onto fixed grade breakpoints, and every metric is evaluated
//! against its own threshold to build the risk/strength statement lists.
//! Given identical inputs the output is identical - no clock, no randomness.

use crate::oracle::bundle::BundleReport;
use crate::oracle::concentration::ConcentrationReport;
use crate::oracle::funding::FundingReport;
use crate::oracle::pump_dump::MarketReport;
use crate::oracle::social::SocialReport;
use crate::oracle::types::{ComponentWeights, TokenMint, TokenReport};
use crate::oracle::wallet_age::FakeVolumeReport;
use crate::types::{Grade, RiskFinding, Severity, Verdict};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Direct score penalties for mint-level integrity problems. These sit
/// outside the weighted components: an active mint authority is dangerous
/// no matter what the holder distribution looks like.
const MINT_AUTHORITY_PENALTY: f64 = 15.0;
const FREEZE_AUTHORITY_PENALTY: f64 = 10.0;
const MUTABLE_METADATA_PENALTY: f64 = 5.0;

/// Everything the detectors produced for one analysis run. `None` means the
/// detector's input signal was unavailable; the component then contributes
/// zero risk and appears in the report's degraded list instead.
#[derive(Debug, Default)]
pub struct DetectorOutcomes {
    pub concentration: Option<ConcentrationReport>,
    pub market: Option<MarketReport>,
    pub bundle: Option<BundleReport>,
    pub fake_volume: Option<FakeVolumeReport>,
    pub funding: Option<FundingReport>,
    pub social: Option<SocialReport>,
}

/// Combine detector outcomes into the final token report.
pub fn aggregate(
    mint: &TokenMint,
    outcomes: &DetectorOutcomes,
    weights: &ComponentWeights,
    degraded: Vec<String>,
    now: DateTime<Utc>,
) -> TokenReport {
    let mut components = BTreeMap::new();
    let mut penalty = 0.0;
    let mut risks: Vec<RiskFinding> = Vec::new();
    let mut strengths: Vec<String> = Vec::new();

    let mut apply = |name: &str, risk: f64, weight: f64, findings: &[RiskFinding]| {
        let risk = risk.clamp(0.0, 100.0);
        components.insert(name.to_string(), risk);
        penalty += risk / 100.0 * weight;
        risks.extend_from_slice(findings);
    };

    if let Some(report) = &outcomes.concentration {
        apply("concentration", report.risk, weights.concentration, &report.findings);
        if report.risk == 0.0 && report.top_holder_percent < 10.0 && report.top10_concentration < 30.0 {
            strengths.push(format!(
                "Healthy distribution: top wallet {:.1}%, top 10 {:.1}%",
                report.top_holder_percent, report.top10_concentration
            ));
        }
    }
    if let Some(report) = &outcomes.market {
        apply("market", report.risk, weights.market, &report.findings);
        if report.rug_confidence == 0 {
            strengths.push("No pump & dump patterns in recent price action".to_string());
        }
    }
    if let Some(report) = &outcomes.bundle {
        if report.data_available {
            apply("bundle", report.score, weights.bundle, &report.findings);
            if report.score < 35.0 {
                strengths.push("No coordinated launch-window buying detected".to_string());
            }
        }
    }
    if let Some(report) = &outcomes.fake_volume {
        apply("fake_volume", report.risk, weights.fake_volume, &report.findings);
        if report.aged_wallets >= 3 && report.patterns.is_empty() {
            strengths.push("Aged holder wallets show organic trading behavior".to_string());
        }
    }
    if let Some(report) = &outcomes.funding {
        apply("funding", report.risk, weights.funding, &report.findings);
        if report.swap_funded_percent < 5.0 {
            strengths.push("Holder funding sources look organic".to_string());
        }
    }
    if let Some(report) = &outcomes.social {
        apply("social", report.risk, weights.social, &report.findings);
        if report.missing.is_empty() {
            strengths.push("Website, Twitter and Telegram all present".to_string());
        }
    }

    // Mint-level integrity checks.
    if mint.has_mint_authority {
        penalty += MINT_AUTHORITY_PENALTY;
        risks.push(RiskFinding::new(
            "mint_authority",
            Severity::High,
            90,
            "Mint authority is still active; supply can be inflated at will",
        ));
    } else {
        strengths.push("Mint authority revoked".to_string());
    }
    if mint.has_freeze_authority {
        penalty += FREEZE_AUTHORITY_PENALTY;
        risks.push(RiskFinding::new(
            "freeze_authority",
            Severity::High,
            85,
            "Freeze authority is still active; holder accounts can be frozen",
        ));
    } else {
        strengths.push("Freeze authority revoked".to_string());
    }
    if mint.metadata_mutable {
        penalty += MUTABLE_METADATA_PENALTY;
        risks.push(RiskFinding::new(
            "mutable_metadata",
            Severity::Low,
            60,
            "Token metadata is mutable",
        ));
    }

    let score = (100.0 - penalty).clamp(0.0, 100.0).round() as u8;
    let grade = Grade::from_score(score);

    // Worst findings first; stable within equal severity/confidence.
    risks.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then(b.confidence.cmp(&a.confidence))
    });

    let verdict = classify(score, &risks, outcomes);
    let recommendation = recommend(verdict, score, &degraded);

    debug!(score, %grade, %verdict, penalty, "aggregation complete");

    TokenReport {
        address: mint.address.clone(),
        found: true,
        error: None,
        score,
        grade,
        verdict,
        components,
        risks,
        strengths,
        recommendation,
        degraded,
        analyzed_at: now,
    }
}

/// Map score and findings onto the discrete verdict. The overall verdict is
/// never laxer than the social check's own verdict.
fn classify(score: u8, risks: &[RiskFinding], outcomes: &DetectorOutcomes) -> Verdict {
    let has_critical = risks.iter().any(|f| f.severity == Severity::Critical);
    let has_high = risks.iter().any(|f| f.severity == Severity::High);
    let rug_pull = outcomes
        .market
        .as_ref()
        .map(|m| m.is_rug_pull)
        .unwrap_or(false);

    let mut verdict = if rug_pull || has_critical || score < 50 {
        Verdict::Avoid
    } else if has_high || score < 70 {
        Verdict::Warning
    } else {
        Verdict::Safe
    };

    if let Some(social) = &outcomes.social {
        verdict = strictest(verdict, social.verdict);
    }
    verdict
}

fn strictest(a: Verdict, b: Verdict) -> Verdict {
    use Verdict::*;
    match (a, b) {
        (Avoid, _) | (_, Avoid) => Avoid,
        (Warning, _) | (_, Warning) => Warning,
        _ => Safe,
    }
}

fn recommend(verdict: Verdict, score: u8, degraded: &[String]) -> String {
    let base = match verdict {
        Verdict::Avoid => format!(
            "Avoid this token: safety score {score}/100 with critical risk signals present."
        ),
        Verdict::Warning => format!(
            "Trade with caution: safety score {score}/100 with unresolved risk signals."
        ),
        Verdict::Safe => format!(
            "No major red flags found (safety score {score}/100); standard memecoin risk still applies."
        ),
    };
    if degraded.is_empty() {
        base
    } else {
        format!(
            "{base} Note: {} signal(s) could not be verified ({}).",
            degraded.len(),
            degraded.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::concentration::analyze_concentration;
    use crate::oracle::pump_dump::analyze_market;
    use crate::oracle::types::{HolderRecord, HolderSet, PriceSeries, ScoreThresholds, WindowStats};

    fn clean_mint() -> TokenMint {
        TokenMint {
            address: "Mint11111111111111111111111111111111111111".to_string(),
            decimals: 9,
            supply: 1_000_000_000,
            metadata_mutable: false,
            has_mint_authority: false,
            has_freeze_authority: false,
        }
    }

    fn holder(address: &str, percent: f64) -> HolderRecord {
        HolderRecord {
            address: address.to_string(),
            balance: (percent * 10_000.0) as u64,
            percent,
            is_lp: false,
            is_exchange: false,
            is_bundled: false,
            is_sniper: false,
        }
    }

    fn distributed_holders() -> HolderSet {
        HolderSet::new((0..20).map(|i| holder(&format!("w{i}"), 2.0)).collect())
    }

    #[test]
    fn test_clean_token_scores_high() {
        let mint = clean_mint();
        let outcomes = DetectorOutcomes {
            concentration: Some(analyze_concentration(
                &mint,
                &distributed_holders(),
                &ScoreThresholds::default(),
            )),
            market: Some(analyze_market(&PriceSeries::default())),
            ..Default::default()
        };

        let report = aggregate(
            &mint,
            &outcomes,
            &ComponentWeights::standard(),
            vec![],
            Utc::now(),
        );

        assert_eq!(report.score, 100);
        assert_eq!(report.grade, Grade::APlus);
        assert_eq!(report.verdict, Verdict::Safe);
        assert!(report.risks.is_empty());
        assert!(!report.strengths.is_empty());
    }

    #[test]
    fn test_score_never_leaves_bounds() {
        // Every component at maximum risk plus all integrity penalties:
        // raw penalty reaches 130 but the score must clamp to 0.
        use crate::oracle::bundle::BundleReport;
        use crate::oracle::funding::FundingReport;
        use crate::oracle::wallet_age::FakeVolumeReport;

        let mut mint = clean_mint();
        mint.has_mint_authority = true;
        mint.has_freeze_authority = true;
        mint.metadata_mutable = true;

        let crash = PriceSeries {
            m5: WindowStats {
                price_change_pct: -95.0,
                buys: 1,
                sells: 99,
                volume: 90_000.0,
            },
            h1: WindowStats {
                price_change_pct: 600.0,
                buys: 1,
                sells: 99,
                volume: 95_000.0,
            },
            h6: WindowStats::default(),
            h24: WindowStats {
                volume: 100_000.0,
                ..Default::default()
            },
        };
        let market = analyze_market(&crash);
        assert_eq!(market.risk, 100.0);

        let mut zero_supply = clean_mint();
        zero_supply.supply = 0;
        let outcomes = DetectorOutcomes {
            concentration: Some(analyze_concentration(
                &zero_supply,
                &HolderSet::default(),
                &ScoreThresholds::default(),
            )),
            market: Some(market),
            bundle: Some(BundleReport {
                data_available: true,
                bundled_supply_percent: 90.0,
                clusters: 4,
                flagged_wallets: 12,
                score: 100.0,
                findings: vec![],
            }),
            fake_volume: Some(FakeVolumeReport {
                risk: 100.0,
                patterns: vec!["shared_funding_source".to_string()],
                aged_wallets: 12,
                findings: vec![],
            }),
            funding: Some(FundingReport {
                swap_funded_percent: 95.0,
                dominant_source_percent: 95.0,
                fresh_high_risk_wallets: 12,
                risk: 100.0,
                findings: vec![],
            }),
            social: None,
        };

        let report = aggregate(
            &mint,
            &outcomes,
            &ComponentWeights::standard(),
            vec![],
            Utc::now(),
        );
        assert_eq!(report.score, 0);
        assert_eq!(report.grade, Grade::F);
        assert_eq!(report.verdict, Verdict::Avoid);
    }

    #[test]
    fn test_risks_ordered_worst_first() {
        let mut mint = clean_mint();
        mint.has_mint_authority = true;
        mint.metadata_mutable = true;

        let crash = PriceSeries {
            m5: WindowStats {
                price_change_pct: -95.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let outcomes = DetectorOutcomes {
            market: Some(analyze_market(&crash)),
            ..Default::default()
        };

        let report = aggregate(
            &mint,
            &outcomes,
            &ComponentWeights::standard(),
            vec![],
            Utc::now(),
        );

        let severities: Vec<Severity> = report.risks.iter().map(|f| f.severity).collect();
        let mut sorted = severities.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(severities, sorted);
        assert_eq!(report.risks[0].kind, "instant_dump");
    }

    #[test]
    fn test_degraded_signals_noted_in_recommendation() {
        let mint = clean_mint();
        let report = aggregate(
            &mint,
            &DetectorOutcomes::default(),
            &ComponentWeights::standard(),
            vec!["market data".to_string(), "wallet ages".to_string()],
            Utc::now(),
        );

        assert_eq!(report.degraded.len(), 2);
        assert!(report.recommendation.contains("could not be verified"));
    }

    #[test]
    fn test_aggregation_is_pure() {
        let mint = clean_mint();
        let outcomes = DetectorOutcomes {
            market: Some(analyze_market(&PriceSeries::default())),
            ..Default::default()
        };
        let now = Utc::now();

        let a = aggregate(&mint, &outcomes, &ComponentWeights::standard(), vec![], now);
        let b = aggregate(&mint, &outcomes, &ComponentWeights::standard(), vec![], now);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_legacy_weights_include_social_component() {
        use crate::oracle::social::analyze_social;
        use crate::oracle::types::KnownAddressBook;

        let mint = clean_mint();
        let social = analyze_social(&[], &[], &KnownAddressBook::default());
        assert_eq!(social.risk, 40.0);

        let outcomes = DetectorOutcomes {
            social: Some(social),
            ..Default::default()
        };

        let legacy = aggregate(&mint, &outcomes, &ComponentWeights::legacy(), vec![], Utc::now());
        let standard = aggregate(&mint, &outcomes, &ComponentWeights::standard(), vec![], Utc::now());

        // Legacy scheme weighs social at 10: 40% risk costs 4 points.
        assert_eq!(legacy.score, 96);
        // Standard scheme scores social through its verdict only.
        assert_eq!(standard.score, 100);
        assert_eq!(standard.verdict, Verdict::Warning);
    }
}
