//! Aged-wallet fake-volume detection.
//!
//! Farms of pre-aged wallets are bought in bulk and used to simulate organic
//! demand. Individually each wallet looks established; together they betray
//! coordination: one funding source, synchronized buys, identical sizes, and
//! no sell activity despite their age. Each pattern present adds 25 points
//! to a bounded risk score.
//!
//! With no wallet-age data at all the detector degrades to zero risk and no
//! findings; the analyzer records the signal as degraded.

use crate::oracle::types::{HolderSet, ScoreThresholds, TxRecord, WalletAgeRecord};
use crate::types::{Address, RiskFinding, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

const PATTERN_POINTS: f64 = 25.0;

/// Coordination patterns the detector looks for.
const PATTERN_SHARED_FUNDING: &str = "shared_funding_source";
const PATTERN_SIMULTANEOUS_BUYS: &str = "simultaneous_buys";
const PATTERN_NO_SELLS: &str = "aged_wallets_never_sell";
const PATTERN_UNIFORM_SIZES: &str = "uniform_buy_sizes";

/// Result of the aged-wallet detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FakeVolumeReport {
    /// Component risk, 0-100.
    pub risk: f64,
    /// Names of the coordination patterns that matched.
    pub patterns: Vec<String>,
    pub aged_wallets: usize,
    pub findings: Vec<RiskFinding>,
}

impl FakeVolumeReport {
    fn clean() -> Self {
        Self {
            risk: 0.0,
            patterns: Vec::new(),
            aged_wallets: 0,
            findings: Vec::new(),
        }
    }
}

/// Analyze holder wallets for coordinated fake-volume patterns.
///
/// `now` is threaded in explicitly so age math stays deterministic in tests.
pub fn analyze_wallet_ages(
    holders: &HolderSet,
    ages: &[WalletAgeRecord],
    history: &[TxRecord],
    now: DateTime<Utc>,
    thresholds: &ScoreThresholds,
) -> FakeVolumeReport {
    if ages.is_empty() {
        debug!("no wallet-age data; fake-volume analysis skipped");
        return FakeVolumeReport::clean();
    }

    let age_by_wallet: HashMap<&str, &WalletAgeRecord> =
        ages.iter().map(|a| (a.address.as_str(), a)).collect();

    // Aged wallets actually holding the token.
    let aged: Vec<&WalletAgeRecord> = holders
        .qualifying()
        .filter_map(|h| age_by_wallet.get(h.address.as_str()).copied())
        .filter(|a| (now - a.created_at).num_days() >= thresholds.dormant_age_days)
        .collect();

    if aged.len() < 3 {
        debug!(aged = aged.len(), "too few aged wallets to cluster");
        return FakeVolumeReport::clean();
    }

    // Sequence-sensitive checks need the history in timestamp order.
    let mut sorted_history: Vec<&TxRecord> = history.iter().collect();
    sorted_history.sort_by_key(|tx| tx.timestamp_ms);

    let mut first_buys: HashMap<&str, &TxRecord> = HashMap::new();
    let mut sell_counts: HashMap<&str, u32> = HashMap::new();
    for tx in sorted_history {
        if tx.amount > 0.0 {
            first_buys.entry(tx.source.as_str()).or_insert(tx);
        } else if tx.amount < 0.0 {
            *sell_counts.entry(tx.source.as_str()).or_insert(0) += 1;
        }
    }

    let mut patterns = Vec::new();
    let mut findings = Vec::new();

    if let Some((funder, count)) = dominant_funding_source(&aged) {
        patterns.push(PATTERN_SHARED_FUNDING.to_string());
        findings.push(
            RiskFinding::new(
                PATTERN_SHARED_FUNDING,
                Severity::High,
                80,
                format!("{count} aged holder wallets were funded by the same source"),
            )
            .with_evidence("funding_source", funder)
            .with_evidence("wallet_count", count.to_string()),
        );
    }

    if let Some(count) =
        simultaneous_buy_count(&aged, &first_buys, thresholds.simultaneous_buy_window_ms)
    {
        patterns.push(PATTERN_SIMULTANEOUS_BUYS.to_string());
        findings.push(
            RiskFinding::new(
                PATTERN_SIMULTANEOUS_BUYS,
                Severity::High,
                75,
                format!(
                    "{count} aged wallets bought within {}s of each other",
                    thresholds.simultaneous_buy_window_ms / 1000
                ),
            )
            .with_evidence("wallet_count", count.to_string()),
        );
    }

    let bought: Vec<&&WalletAgeRecord> = aged
        .iter()
        .filter(|a| first_buys.contains_key(a.address.as_str()))
        .collect();
    if bought.len() >= 3
        && bought
            .iter()
            .all(|a| sell_counts.get(a.address.as_str()).copied().unwrap_or(0) == 0)
    {
        patterns.push(PATTERN_NO_SELLS.to_string());
        findings.push(
            RiskFinding::new(
                PATTERN_NO_SELLS,
                Severity::Medium,
                65,
                format!(
                    "{} wallets older than {} days hold without a single sell",
                    bought.len(),
                    thresholds.dormant_age_days
                ),
            )
            .with_evidence("wallet_count", bought.len().to_string()),
        );
    }

    if let Some(cv) = buy_size_variation(&aged, &first_buys) {
        if cv < 0.05 {
            patterns.push(PATTERN_UNIFORM_SIZES.to_string());
            findings.push(
                RiskFinding::new(
                    PATTERN_UNIFORM_SIZES,
                    Severity::High,
                    70,
                    "Aged wallets bought near-identical amounts",
                )
                .with_evidence("coefficient_of_variation", format!("{cv:.4}")),
            );
        }
    }

    let risk = (patterns.len() as f64 * PATTERN_POINTS).min(100.0);

    if risk >= thresholds.fake_volume_critical {
        findings.push(
            RiskFinding::new(
                "fake_volume",
                Severity::Critical,
                90,
                format!(
                    "Fake volume: {} coordination patterns across {} aged wallets",
                    patterns.len(),
                    aged.len()
                ),
            )
            .with_evidence("patterns", patterns.join(",")),
        );
    } else if risk >= thresholds.fake_volume_high {
        findings.push(
            RiskFinding::new(
                "fake_volume",
                Severity::High,
                75,
                format!(
                    "Suspected fake volume: {} coordination patterns across {} aged wallets",
                    patterns.len(),
                    aged.len()
                ),
            )
            .with_evidence("patterns", patterns.join(",")),
        );
    }

    debug!(
        risk,
        aged = aged.len(),
        patterns = patterns.len(),
        "aged-wallet analysis complete"
    );

    FakeVolumeReport {
        risk,
        patterns,
        aged_wallets: aged.len(),
        findings,
    }
}

/// Funding source shared by three or more of the aged wallets, if any.
fn dominant_funding_source(aged: &[&WalletAgeRecord]) -> Option<(Address, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in aged {
        if let Some(funder) = &record.funded_by {
            *counts.entry(funder.as_str()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count >= 3)
        .max_by_key(|(_, count)| *count)
        .map(|(funder, count)| (funder.to_string(), count))
}

/// Count of aged wallets whose first buys fall inside one tight window.
fn simultaneous_buy_count(
    aged: &[&WalletAgeRecord],
    first_buys: &HashMap<&str, &TxRecord>,
    window_ms: i64,
) -> Option<usize> {
    let mut times: Vec<i64> = aged
        .iter()
        .filter_map(|a| first_buys.get(a.address.as_str()).map(|tx| tx.timestamp_ms))
        .collect();
    if times.len() < 3 {
        return None;
    }
    times.sort_unstable();

    let mut best = 1usize;
    let mut start = 0usize;
    for end in 0..times.len() {
        while times[end] - times[start] > window_ms {
            start += 1;
        }
        best = best.max(end - start + 1);
    }
    (best >= 3).then_some(best)
}

/// Coefficient of variation of the aged wallets' first-buy amounts.
fn buy_size_variation(
    aged: &[&WalletAgeRecord],
    first_buys: &HashMap<&str, &TxRecord>,
) -> Option<f64> {
    let sizes: Vec<f64> = aged
        .iter()
        .filter_map(|a| first_buys.get(a.address.as_str()).map(|tx| tx.amount))
        .collect();
    if sizes.len() < 3 {
        return None;
    }
    let mean = sizes.iter().sum::<f64>() / sizes.len() as f64;
    if mean <= 0.0 {
        return None;
    }
    let variance = sizes.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / sizes.len() as f64;
    Some(variance.sqrt() / mean)
}
