//! Signal normalization - raw collaborator payloads into core value objects.
//!
//! All percentage math happens here so NaN/Infinity from degenerate inputs
//! (zero supply, missing windows) is coerced at the boundary and detectors
//! only ever see finite values.

use crate::oracle::types::{HolderRecord, HolderSet, KnownAddressBook, PriceSeries, WindowStats};
use crate::types::Address;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A holder entry as returned by the chain collaborator: address plus raw
/// balance, with optional upstream bundling/sniper hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHolder {
    pub address: Address,
    pub balance: u64,
    pub is_lp_hint: bool,
    pub is_bundled_hint: bool,
    pub is_sniper_hint: bool,
}

impl RawHolder {
    pub fn plain(address: impl Into<Address>, balance: u64) -> Self {
        Self {
            address: address.into(),
            balance,
            is_lp_hint: false,
            is_bundled_hint: false,
            is_sniper_hint: false,
        }
    }
}

/// Coerce a possibly NaN/infinite percentage into the safe [0,100] range.
pub fn safe_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Build a [`HolderSet`] from raw entries, computing each holder's supply
/// share and tagging known infrastructure addresses.
///
/// Supply of zero yields 0% for every holder; the concentration detector
/// treats that case as maximum risk rather than trusting the zeros.
pub fn normalize_holders(
    raw: Vec<RawHolder>,
    supply: u64,
    known: &KnownAddressBook,
) -> HolderSet {
    if supply == 0 {
        warn!("token supply is zero; holder percentages coerced to 0");
    }

    let records = raw
        .into_iter()
        .map(|h| {
            let percent = if supply == 0 {
                0.0
            } else {
                safe_percent(h.balance as f64 / supply as f64 * 100.0)
            };
            let is_exchange = known.is_exchange(&h.address);
            let is_lp = h.is_lp_hint || known.is_protocol(&h.address);
            HolderRecord {
                address: h.address,
                balance: h.balance,
                percent,
                is_lp,
                is_exchange,
                is_bundled: h.is_bundled_hint,
                is_sniper: h.is_sniper_hint,
            }
        })
        .collect();

    let set = HolderSet::new(records);
    debug!("normalized {} holder records", set.len());
    set
}

/// Scrub a price series so every window carries finite numbers.
pub fn normalize_series(series: PriceSeries) -> PriceSeries {
    PriceSeries {
        m5: scrub_window(series.m5),
        h1: scrub_window(series.h1),
        h6: scrub_window(series.h6),
        h24: scrub_window(series.h24),
    }
}

fn scrub_window(w: WindowStats) -> WindowStats {
    WindowStats {
        price_change_pct: if w.price_change_pct.is_finite() {
            w.price_change_pct
        } else {
            0.0
        },
        buys: w.buys,
        sells: w.sells,
        volume: if w.volume.is_finite() && w.volume >= 0.0 {
            w.volume
        } else {
            0.0
        },
    }
}
