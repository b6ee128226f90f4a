//! Bridge from synthetic timelines to the live detectors.
//!
//! Summarizes a timeline into the same [`PriceSeries`] shape the market
//! collaborator returns, so generated corpora exercise the real pattern
//! detectors during calibration. Price is modeled as an exponential impact
//! curve over cumulative net flow; crude, but it reproduces the window
//! dynamics the detectors key on.

use crate::oracle::types::{PriceSeries, WindowStats};
use crate::synth::timeline::SyntheticTimeline;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;

/// Summarize a timeline into per-window market stats as seen at `now_ms`.
pub fn market_view(timeline: &SyntheticTimeline, now_ms: i64) -> PriceSeries {
    // Impact scale: an eighth of total traded volume moves price by a factor
    // of e. Guards against division blowups on near-empty timelines.
    let total_abs: f64 = timeline.txs.iter().map(|tx| tx.amount.abs()).sum();
    let impact_scale = (total_abs / 8.0).max(1.0);

    PriceSeries {
        m5: window_stats(timeline, now_ms, 5 * MINUTE_MS, impact_scale),
        h1: window_stats(timeline, now_ms, HOUR_MS, impact_scale),
        h6: window_stats(timeline, now_ms, 6 * HOUR_MS, impact_scale),
        h24: window_stats(timeline, now_ms, 24 * HOUR_MS, impact_scale),
    }
}

fn window_stats(
    timeline: &SyntheticTimeline,
    now_ms: i64,
    window_ms: i64,
    impact_scale: f64,
) -> WindowStats {
    let window_start = now_ms - window_ms;

    let mut buys = 0u32;
    let mut sells = 0u32;
    let mut volume = 0.0;
    let mut net_at_start = 0.0;
    let mut net_at_end = 0.0;

    for tx in &timeline.txs {
        if tx.timestamp_ms > now_ms {
            break;
        }
        net_at_end += tx.amount;
        if tx.timestamp_ms <= window_start {
            net_at_start += tx.amount;
        } else {
            volume += tx.amount.abs();
            if tx.amount > 0.0 {
                buys += 1;
            } else {
                sells += 1;
            }
        }
    }

    let price_start = price_at(net_at_start, impact_scale);
    let price_end = price_at(net_at_end, impact_scale);
    let price_change_pct = if price_start > 0.0 {
        (price_end / price_start - 1.0) * 100.0
    } else {
        0.0
    };

    WindowStats {
        price_change_pct,
        buys,
        sells,
        volume,
    }
}

fn price_at(net_flow: f64, impact_scale: f64) -> f64 {
    (net_flow / impact_scale).exp()
}
