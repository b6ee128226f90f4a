//! Holder concentration analysis.
//!
//! Concentration is always computed over the qualifying subset of holders:
//! LP pools, bonding-curve accounts and recognized exchange wallets are
//! excluded before any top-N math runs. Mixing the raw set into these
//! metrics is a correctness bug, not a tuning choice.

use crate::oracle::types::{HolderSet, ScoreThresholds, TokenMint};
use crate::types::{RiskFinding, Severity};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of the concentration detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcentrationReport {
    /// Largest qualifying holder's supply share, 0-100.
    pub top_holder_percent: f64,
    /// Sum of the top 10 qualifying holders' shares, 0-100.
    pub top10_concentration: f64,
    pub qualifying_holders: usize,
    /// Component risk, 0-100 (100 = worst).
    pub risk: f64,
    pub findings: Vec<RiskFinding>,
}

/// Analyze holder concentration for one token.
///
/// With fewer than 10 qualifying holders the top-10 sum covers whatever is
/// available. Ties at the rank-10 boundary resolve by first-seen order.
pub fn analyze_concentration(
    mint: &TokenMint,
    holders: &HolderSet,
    thresholds: &ScoreThresholds,
) -> ConcentrationReport {
    let mut findings = Vec::new();

    // A zero-supply mint cannot produce trustworthy percentages. Report the
    // sentinel values and score the component at maximum risk.
    if mint.supply == 0 {
        findings.push(
            RiskFinding::new(
                "degenerate_supply",
                Severity::Critical,
                90,
                "Token supply is zero; holder distribution cannot be trusted",
            )
            .with_evidence("supply", "0"),
        );
        return ConcentrationReport {
            top_holder_percent: 0.0,
            top10_concentration: 0.0,
            qualifying_holders: 0,
            risk: 100.0,
            findings,
        };
    }

    let shares: Vec<f64> = holders
        .qualifying()
        .take(10)
        .map(|r| if r.percent.is_finite() { r.percent } else { 0.0 })
        .collect();
    let qualifying_holders = holders.qualifying().count();

    let top_holder_percent = shares.first().copied().unwrap_or(0.0).clamp(0.0, 100.0);
    let top10_concentration = shares.iter().sum::<f64>().clamp(0.0, 100.0);

    debug!(
        top = top_holder_percent,
        top10 = top10_concentration,
        qualifying = qualifying_holders,
        "computed holder concentration"
    );

    let mut risk: f64 = 0.0;

    if top_holder_percent >= thresholds.top_holder_critical_pct {
        risk += 50.0;
        findings.push(
            RiskFinding::new(
                "top_holder_concentration",
                Severity::Critical,
                90,
                format!(
                    "Largest wallet holds {top_holder_percent:.1}% of supply (threshold {:.0}%)",
                    thresholds.top_holder_critical_pct
                ),
            )
            .with_evidence("top_holder_percent", format!("{top_holder_percent:.2}")),
        );
    } else if top_holder_percent >= thresholds.top_holder_critical_pct / 2.0 {
        risk += 25.0;
        findings.push(
            RiskFinding::new(
                "top_holder_concentration",
                Severity::Medium,
                60,
                format!("Largest wallet holds {top_holder_percent:.1}% of supply"),
            )
            .with_evidence("top_holder_percent", format!("{top_holder_percent:.2}")),
        );
    }

    if top10_concentration >= thresholds.top10_high_pct {
        risk += 50.0;
        findings.push(
            RiskFinding::new(
                "top10_concentration",
                Severity::High,
                85,
                format!(
                    "Top 10 wallets hold {top10_concentration:.1}% of supply (threshold {:.0}%)",
                    thresholds.top10_high_pct
                ),
            )
            .with_evidence("top10_concentration", format!("{top10_concentration:.2}")),
        );
    } else if top10_concentration >= thresholds.top10_high_pct * 0.6 {
        risk += 20.0;
        findings.push(
            RiskFinding::new(
                "top10_concentration",
                Severity::Medium,
                55,
                format!("Top 10 wallets hold {top10_concentration:.1}% of supply"),
            )
            .with_evidence("top10_concentration", format!("{top10_concentration:.2}")),
        );
    }

    ConcentrationReport {
        top_holder_percent,
        top10_concentration,
        qualifying_holders,
        risk: risk.min(100.0),
        findings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::types::HolderRecord;

    fn mint_with_supply(supply: u64) -> TokenMint {
        TokenMint {
            address: "Mint11111111111111111111111111111111111111".to_string(),
            decimals: 9,
            supply,
            metadata_mutable: false,
            has_mint_authority: false,
            has_freeze_authority: false,
        }
    }

    fn holder(address: &str, percent: f64) -> HolderRecord {
        HolderRecord {
            address: address.to_string(),
            // Balance mirrors percent so ordering matches.
            balance: (percent * 1_000.0) as u64,
            percent,
            is_lp: false,
            is_exchange: false,
            is_bundled: false,
            is_sniper: false,
        }
    }

    #[test]
    fn test_dominant_dev_wallet_with_insider_ring() {
        // One wallet at 25%, nine at 3% each: top = 25 (critical),
        // top10 = 52 (high).
        let mut records = vec![holder("dev", 25.0)];
        for i in 0..9 {
            records.push(holder(&format!("w{i}"), 3.0));
        }
        let set = HolderSet::new(records);
        let report =
            analyze_concentration(&mint_with_supply(1_000_000), &set, &ScoreThresholds::default());

        assert!((report.top_holder_percent - 25.0).abs() < 1e-9);
        assert!((report.top10_concentration - 52.0).abs() < 1e-9);
        assert!(report
            .findings
            .iter()
            .any(|f| f.kind == "top_holder_concentration" && f.severity == Severity::Critical));
        assert!(report
            .findings
            .iter()
            .any(|f| f.kind == "top10_concentration" && f.severity == Severity::High));
        assert_eq!(report.risk, 100.0);
    }

    #[test]
    fn test_lp_and_exchange_wallets_excluded() {
        let mut pool = holder("pool", 60.0);
        pool.is_lp = true;
        let mut cex = holder("cex", 20.0);
        cex.is_exchange = true;
        let set = HolderSet::new(vec![pool, cex, holder("retail", 4.0)]);

        let report =
            analyze_concentration(&mint_with_supply(1_000_000), &set, &ScoreThresholds::default());
        assert!((report.top_holder_percent - 4.0).abs() < 1e-9);
        assert_eq!(report.qualifying_holders, 1);
    }

    #[test]
    fn test_zero_supply_is_max_risk_with_sentinel_metrics() {
        let set = HolderSet::new(vec![holder("whale", 0.0)]);
        let report = analyze_concentration(&mint_with_supply(0), &set, &ScoreThresholds::default());

        assert_eq!(report.top_holder_percent, 0.0);
        assert_eq!(report.top10_concentration, 0.0);
        assert_eq!(report.risk, 100.0);
        assert!(report.findings.iter().any(|f| f.kind == "degenerate_supply"));
    }

    #[test]
    fn test_fewer_than_ten_holders_sums_available() {
        let set = HolderSet::new(vec![holder("a", 5.0), holder("b", 4.0)]);
        let report =
            analyze_concentration(&mint_with_supply(1_000_000), &set, &ScoreThresholds::default());
        assert!((report.top10_concentration - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_hold_for_oversized_percentages() {
        // Rounding upstream can overshoot; results must stay within [0,100].
        let set = HolderSet::new(vec![holder("a", 80.0), holder("b", 70.0)]);
        let report =
            analyze_concentration(&mint_with_supply(1_000_000), &set, &ScoreThresholds::default());
        assert!(report.top10_concentration <= 100.0);
        assert!(report.top_holder_percent <= 100.0);
    }

    #[test]
    fn test_clean_distribution_no_findings() {
        let records: Vec<_> = (0..20).map(|i| holder(&format!("w{i}"), 2.0)).collect();
        let set = HolderSet::new(records);
        let report =
            analyze_concentration(&mint_with_supply(1_000_000), &set, &ScoreThresholds::default());
        assert!(report.findings.is_empty());
        assert_eq!(report.risk, 0.0);
    }
}
