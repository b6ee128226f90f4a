//! Bundle and sniper cluster detection.
//!
//! Holders whose acquisitions land in the same slot inside the launch window
//! (or carry MEV-bundle tips) are treated as one coordinated cluster. Absence
//! of timing data is reported as "unknown", never as "clean" - a missing
//! signal must not silently downgrade to a pass.

use crate::oracle::types::{HolderSet, LaunchActivity, ScoreThresholds};
use crate::types::{RiskFinding, Severity};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Result of the bundle detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleReport {
    /// False when no timing data was available; metrics are then meaningless
    /// and the component contributes zero risk while being flagged degraded.
    pub data_available: bool,
    /// Share of supply held by clustered wallets, 0-100.
    pub bundled_supply_percent: f64,
    pub clusters: usize,
    pub flagged_wallets: usize,
    /// Bundle score, 0-100.
    pub score: f64,
    pub findings: Vec<RiskFinding>,
}

impl BundleReport {
    fn unknown() -> Self {
        Self {
            data_available: false,
            bundled_supply_percent: 0.0,
            clusters: 0,
            flagged_wallets: 0,
            score: 0.0,
            findings: Vec::new(),
        }
    }
}

/// Detect launch-window bundle clusters among the current holders.
pub fn analyze_bundles(
    holders: &HolderSet,
    timing: Option<&LaunchActivity>,
    thresholds: &ScoreThresholds,
) -> BundleReport {
    let Some(timing) = timing else {
        debug!("no launch timing data; bundle analysis is unknown");
        return BundleReport::unknown();
    };

    // Group qualifying holders by acquisition slot within the launch window.
    // Upstream bundling/sniper hints and MEV tips flag a wallet on their own;
    // the flagged set dedups wallets caught by more than one signal.
    let window_end = timing.launch_slot + thresholds.launch_window_slots;
    let mut slot_groups: HashMap<u64, Vec<&str>> = HashMap::new();
    let mut flagged_set: HashSet<&str> = HashSet::new();

    for record in holders.qualifying() {
        if record.is_bundled || record.is_sniper || timing.tipped.contains(&record.address) {
            flagged_set.insert(record.address.as_str());
        }
        if let Some(&slot) = timing.acquisition_slots.get(&record.address) {
            if slot <= window_end {
                slot_groups.entry(slot).or_default().push(record.address.as_str());
            }
        }
    }

    // A cluster needs at least two wallets landing in the same slot.
    let mut clusters = 0usize;
    for group in slot_groups.values() {
        if group.len() >= 2 {
            clusters += 1;
            flagged_set.extend(group.iter().copied());
        }
    }

    let bundled_supply: f64 = holders
        .qualifying()
        .filter(|record| flagged_set.contains(record.address.as_str()))
        .map(|record| record.percent)
        .sum();
    let bundled_supply_percent = bundled_supply.clamp(0.0, 100.0);
    let flagged = flagged_set.len();

    // Supply share dominates the score; extra distinct clusters add a little.
    let score = (bundled_supply_percent * 1.5 + clusters.saturating_sub(1) as f64 * 5.0).min(100.0);

    debug!(
        bundled_supply_percent,
        clusters, flagged, score, "bundle clustering complete"
    );

    let mut findings = Vec::new();
    if score >= thresholds.bundle_critical_score {
        findings.push(
            RiskFinding::new(
                "bundled_supply",
                Severity::Critical,
                90,
                format!(
                    "{flagged} wallets acquired {bundled_supply_percent:.1}% of supply in coordinated launch-window buys"
                ),
            )
            .with_evidence("bundled_supply_percent", format!("{bundled_supply_percent:.2}"))
            .with_evidence("clusters", clusters.to_string()),
        );
    } else if score >= thresholds.bundle_high_score {
        findings.push(
            RiskFinding::new(
                "bundled_supply",
                Severity::High,
                75,
                format!(
                    "{flagged} wallets show launch-window clustering ({bundled_supply_percent:.1}% of supply)"
                ),
            )
            .with_evidence("bundled_supply_percent", format!("{bundled_supply_percent:.2}"))
            .with_evidence("clusters", clusters.to_string()),
        );
    }

    BundleReport {
        data_available: true,
        bundled_supply_percent,
        clusters,
        flagged_wallets: flagged,
        score,
        findings,
    }
}
