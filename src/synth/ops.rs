//! Mutation operators for synthetic timelines.
//!
//! Each operator transforms a timeline in place and restores the
//! timestamp-ascending sort before returning; downstream consumers may rely
//! on the invariant without re-checking it.

use crate::oracle::types::TxRecord;
use crate::synth::timeline::SyntheticTimeline;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

/// Stretch (factor > 1) or compress (factor < 1) the timeline around its
/// launch timestamp. Relative ordering is preserved; absolute gaps scale.
pub fn time_stretch(timeline: &mut SyntheticTimeline, factor: f64) {
    assert!(factor > 0.0, "stretch factor must be positive");
    let origin = timeline.launch_ts_ms;
    for tx in &mut timeline.txs {
        let offset = (tx.timestamp_ms - origin) as f64;
        tx.timestamp_ms = origin + (offset * factor).round() as i64;
    }
    timeline.restore_order();
    debug!(factor, "time-stretched timeline");
}

/// Insert sniper buys inside the launch window.
///
/// Snipers land within `window_ms` of launch with outsized buys, modeling
/// coordinated first-block entries.
pub fn inject_snipers(
    timeline: &mut SyntheticTimeline,
    rng: &mut StdRng,
    count: usize,
    window_ms: i64,
) {
    let pool = timeline.pool.clone();
    for i in 0..count {
        let ts = timeline.launch_ts_ms + rng.gen_range(0..window_ms.max(1));
        let mut tx = TxRecord::transfer(
            ts,
            format!("sniper{i:02}{:06x}", rng.gen::<u32>() & 0xff_ffff),
            pool.clone(),
            rng.gen_range(300.0..900.0),
        );
        tx.is_sniper_buy = true;
        timeline.txs.push(tx);
    }
    timeline.restore_order();
    debug!(count, window_ms, "injected sniper buys");
}

/// Append a wash-trading loop between two wallets: `cycles` equal-and-
/// opposite round trips spaced `gap_ms` apart, starting at `start_ts_ms`.
pub fn wash_loop(
    timeline: &mut SyntheticTimeline,
    wallet_a: &str,
    wallet_b: &str,
    cycles: usize,
    amount: f64,
    start_ts_ms: i64,
    gap_ms: i64,
) {
    let pool = timeline.pool.clone();
    for cycle in 0..cycles as i64 {
        let ts = start_ts_ms + cycle * gap_ms;
        let mut leg_in = TxRecord::transfer(ts, wallet_a.to_string(), pool.clone(), amount);
        leg_in.is_wash_trade = true;
        timeline.txs.push(leg_in);
        let mut leg_out =
            TxRecord::transfer(ts + gap_ms / 2, wallet_b.to_string(), pool.clone(), -amount);
        leg_out.is_wash_trade = true;
        timeline.txs.push(leg_out);
    }
    timeline.restore_order();
    debug!(cycles, amount, "appended wash loop");
}
