//! Pump & dump price-action pattern detection.
//!
//! Four independent pattern checks run over the fixed lookback windows, each
//! yielding at most one finding. Pattern hits add fixed contributions to a
//! capped rug confidence, so several weak signals combine into strong
//! suspicion without per-pattern recalibration.

use crate::oracle::types::PriceSeries;
use crate::types::{RiskFinding, Severity};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed contribution of each pattern type to the rug confidence.
const PUMP_POINTS: u8 = 30;
const DUMP_POINTS: u8 = 40;
const IMBALANCE_POINTS: u8 = 20;
const VOLUME_POINTS: u8 = 15;

/// Rug confidence at which the token is flagged as a rug pull.
const RUG_CONFIDENCE_THRESHOLD: u8 = 60;

/// Result of the price-action detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketReport {
    pub findings: Vec<RiskFinding>,
    /// Capped sum of per-pattern contributions, 0-100.
    pub rug_confidence: u8,
    pub is_rug_pull: bool,
    /// Component risk, 0-100. Mirrors rug confidence.
    pub risk: f64,
}

/// Run all four pattern checks over a price series.
pub fn analyze_market(series: &PriceSeries) -> MarketReport {
    let mut findings = Vec::new();
    let mut confidence: u32 = 0;

    if let Some(finding) = check_rapid_pump(series) {
        findings.push(finding);
        confidence += PUMP_POINTS as u32;
    }
    if let Some(finding) = check_instant_dump(series) {
        findings.push(finding);
        confidence += DUMP_POINTS as u32;
    }
    if let Some(finding) = check_sell_imbalance(series) {
        findings.push(finding);
        confidence += IMBALANCE_POINTS as u32;
    }
    if let Some(finding) = check_volume_anomaly(series) {
        findings.push(finding);
        confidence += VOLUME_POINTS as u32;
    }

    let rug_confidence = confidence.min(100) as u8;
    let is_rug_pull = rug_confidence >= RUG_CONFIDENCE_THRESHOLD;

    debug!(
        rug_confidence,
        is_rug_pull,
        patterns = findings.len(),
        "price-action analysis complete"
    );

    MarketReport {
        findings,
        rug_confidence,
        is_rug_pull,
        risk: rug_confidence as f64,
    }
}

/// Rapid pump: unsustainable 1-hour gains.
fn check_rapid_pump(series: &PriceSeries) -> Option<RiskFinding> {
    let h1 = series.h1.price_change_pct;

    let (severity, confidence, label) = if h1 > 500.0 {
        (Severity::Critical, 95, "extreme pump")
    } else if h1 > 300.0 {
        (Severity::High, 85, "major pump")
    } else if h1 > 150.0 {
        (Severity::Medium, 60, "rapid pump")
    } else {
        return None;
    };

    Some(
        RiskFinding::new(
            "rapid_pump",
            severity,
            confidence,
            format!("Price up {h1:.0}% in 1 hour ({label})"),
        )
        .with_evidence("h1_change_pct", format!("{h1:.2}")),
    )
}

/// Instant dump: checked in priority order, only the first matching rule
/// fires per series.
fn check_instant_dump(series: &PriceSeries) -> Option<RiskFinding> {
    let m5 = series.m5.price_change_pct;
    let h1 = series.h1.price_change_pct;
    let h6 = series.h6.price_change_pct;

    if m5 < -90.0 {
        return Some(
            RiskFinding::new(
                "instant_dump",
                Severity::Critical,
                100,
                format!("RUG PULLED: price down {:.0}% in 5 minutes", m5.abs()),
            )
            .with_evidence("m5_change_pct", format!("{m5:.2}")),
        );
    }
    // A 1-hour collapse past -90% is the same event seen through a wider
    // window; it must not score weaker than the 5-minute variant.
    if m5 < -80.0 || h1 < -90.0 {
        return Some(
            RiskFinding::new(
                "instant_dump",
                Severity::Critical,
                95,
                format!(
                    "Severe dump: {:.0}% in 5 minutes / {:.0}% in 1 hour",
                    m5.abs(),
                    h1.abs()
                ),
            )
            .with_evidence("m5_change_pct", format!("{m5:.2}"))
            .with_evidence("h1_change_pct", format!("{h1:.2}")),
        );
    }
    if h1 < -60.0 {
        return Some(
            RiskFinding::new(
                "instant_dump",
                Severity::High,
                80,
                format!("Heavy selloff: price down {:.0}% in 1 hour", h1.abs()),
            )
            .with_evidence("h1_change_pct", format!("{h1:.2}")),
        );
    }
    if h6 > 200.0 && h1 < -40.0 {
        return Some(
            RiskFinding::new(
                "instant_dump",
                Severity::Critical,
                90,
                format!(
                    "Classic pump & dump: +{h6:.0}% over 6 hours, {:.0}% in the last hour",
                    h1.abs()
                ),
            )
            .with_evidence("h6_change_pct", format!("{h6:.2}"))
            .with_evidence("h1_change_pct", format!("{h1:.2}")),
        );
    }

    None
}

/// Buy/sell imbalance over the 1-hour window. Needs at least 10 transactions
/// to be statistically meaningful.
fn check_sell_imbalance(series: &PriceSeries) -> Option<RiskFinding> {
    let window = series.h1;
    let total = window.tx_count();
    if total < 10 {
        return None;
    }

    let sell_ratio = window.sells as f64 / total as f64;
    let h1 = window.price_change_pct;

    let (severity, confidence, description) = if sell_ratio > 0.9 {
        (
            Severity::Critical,
            95,
            format!("{:.0}% of recent transactions are sells", sell_ratio * 100.0),
        )
    } else if sell_ratio > 0.8 {
        (
            Severity::High,
            80,
            format!("{:.0}% of recent transactions are sells", sell_ratio * 100.0),
        )
    } else if sell_ratio > 0.7 && h1 < -20.0 {
        (
            Severity::High,
            75,
            format!(
                "{:.0}% sells while price fell {:.0}% in 1 hour",
                sell_ratio * 100.0,
                h1.abs()
            ),
        )
    } else {
        return None;
    };

    Some(
        RiskFinding::new("sell_imbalance", severity, confidence, description)
            .with_evidence("sell_ratio", format!("{sell_ratio:.3}"))
            .with_evidence("h1_tx_count", total.to_string()),
    )
}

/// Volume concentration anomalies. Needs at least 1000 in 24-hour volume so
/// illiquid tokens don't produce division noise.
fn check_volume_anomaly(series: &PriceSeries) -> Option<RiskFinding> {
    let h24_volume = series.h24.volume;
    if h24_volume < 1000.0 {
        return None;
    }

    let m5_share = series.m5.volume / h24_volume;
    let h1_share = series.h1.volume / h24_volume;
    let m5 = series.m5.price_change_pct;
    let h1 = series.h1.price_change_pct;

    let (severity, confidence, description) = if m5_share > 0.6 && m5 < -30.0 {
        (
            Severity::Critical,
            90,
            format!(
                "{:.0}% of daily volume hit in 5 minutes during a {:.0}% drop",
                m5_share * 100.0,
                m5.abs()
            ),
        )
    } else if h1_share > 0.4 && h1 < -20.0 {
        (
            Severity::High,
            75,
            format!(
                "{:.0}% of daily volume hit in 1 hour during a {:.0}% drop",
                h1_share * 100.0,
                h1.abs()
            ),
        )
    } else if h1_share > 0.5 {
        (
            Severity::Medium,
            60,
            format!("{:.0}% of daily volume concentrated in 1 hour", h1_share * 100.0),
        )
    } else {
        return None;
    };

    Some(
        RiskFinding::new("volume_anomaly", severity, confidence, description)
            .with_evidence("m5_volume_share", format!("{m5_share:.3}"))
            .with_evidence("h1_volume_share", format!("{h1_share:.3}")),
    )
}
