//! Funding-source risk analysis.
//!
//! Where a holder's capital came from is a strong prior: scam deployments
//! overwhelmingly fund their buyer wallets through no-KYC instant-swap
//! services, minutes before launch. Exchange withdrawals and ordinary peer
//! transfers carry no such signal.

use crate::oracle::types::{FundingCategory, FundingTrace, HolderSet, ScoreThresholds, WalletAgeRecord};
use crate::types::{RiskFinding, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Result of the funding-source detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingReport {
    /// Share of qualifying supply funded through instant-swap services, 0-100.
    pub swap_funded_percent: f64,
    /// Largest share attributable to one single swap service.
    pub dominant_source_percent: f64,
    /// Wallets younger than the freshness cutoff that are swap-funded.
    pub fresh_high_risk_wallets: usize,
    /// Component risk, 0-100.
    pub risk: f64,
    pub findings: Vec<RiskFinding>,
}

/// Analyze the funding provenance of the token's holders.
pub fn analyze_funding(
    holders: &HolderSet,
    traces: &[FundingTrace],
    ages: &[WalletAgeRecord],
    now: DateTime<Utc>,
    thresholds: &ScoreThresholds,
) -> FundingReport {
    let trace_by_wallet: HashMap<&str, &FundingTrace> =
        traces.iter().map(|t| (t.wallet.as_str(), t)).collect();
    let age_by_wallet: HashMap<&str, &WalletAgeRecord> =
        ages.iter().map(|a| (a.address.as_str(), a)).collect();

    let mut swap_funded_percent = 0.0;
    let mut per_source: HashMap<&str, f64> = HashMap::new();
    let mut fresh_high_risk = 0usize;

    for record in holders.qualifying() {
        let Some(trace) = trace_by_wallet.get(record.address.as_str()) else {
            continue;
        };
        if trace.category != FundingCategory::InstantSwap {
            continue;
        }
        swap_funded_percent += record.percent;
        *per_source.entry(trace.source.as_str()).or_insert(0.0) += record.percent;

        if let Some(age) = age_by_wallet.get(record.address.as_str()) {
            if (now - age.created_at).num_days() < thresholds.fresh_wallet_max_age_days {
                fresh_high_risk += 1;
            }
        }
    }

    let swap_funded_percent = swap_funded_percent.clamp(0.0, 100.0);
    let (dominant_source, dominant_source_percent) = per_source
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(source, pct)| (source.to_string(), pct.clamp(0.0, 100.0)))
        .unwrap_or_default();

    let mut risk: f64 = 0.0;
    let mut findings = Vec::new();

    if dominant_source_percent >= thresholds.swap_funded_critical_pct {
        risk = risk.max(70.0 + (dominant_source_percent - thresholds.swap_funded_critical_pct).min(30.0));
        findings.push(
            RiskFinding::new(
                "swap_funded_supply",
                Severity::Critical,
                90,
                format!(
                    "{dominant_source_percent:.1}% of supply was funded through a single instant-swap service"
                ),
            )
            .with_evidence("source", dominant_source.clone())
            .with_evidence("supply_percent", format!("{dominant_source_percent:.2}")),
        );
    } else if swap_funded_percent >= thresholds.swap_funded_critical_pct / 2.0 {
        risk = risk.max(50.0);
        findings.push(
            RiskFinding::new(
                "swap_funded_supply",
                Severity::High,
                60,
                format!(
                    "{swap_funded_percent:.1}% of supply is held by instant-swap-funded wallets"
                ),
            )
            .with_evidence("supply_percent", format!("{swap_funded_percent:.2}")),
        );
    }

    if fresh_high_risk >= thresholds.fresh_wallet_cluster_size {
        risk = risk.max(85.0);
        findings.push(
            RiskFinding::new(
                "fresh_wallet_cluster",
                Severity::Critical,
                85,
                format!(
                    "{fresh_high_risk} wallets younger than {} days funded through instant-swap services",
                    thresholds.fresh_wallet_max_age_days
                ),
            )
            .with_evidence("wallet_count", fresh_high_risk.to_string()),
        );
    }

    debug!(
        swap_funded_percent,
        dominant_source_percent, fresh_high_risk, risk, "funding analysis complete"
    );

    FundingReport {
        swap_funded_percent,
        dominant_source_percent,
        fresh_high_risk_wallets: fresh_high_risk,
        risk: risk.min(100.0),
        findings,
    }
}
