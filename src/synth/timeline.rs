//! Synthetic transaction timelines.
//!
//! A timeline is a labelled, timestamp-ordered list of pool transfers. The
//! ordering invariant is load-bearing: every generator and every mutation
//! operator must leave `txs` sorted by timestamp ascending.

use crate::oracle::types::TxRecord;
use crate::types::Address;
use serde::{Deserialize, Serialize};

/// Ground-truth label attached to a generated timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimelineClass {
    /// Ordinary trading with no scripted exit.
    Organic,
    /// Hype phase followed by one catastrophic dev dump.
    ClassicRug,
    /// Dev bleeds out the position in small sells over hours.
    SlowRug,
    /// Multi-phase pattern: accumulation, fake hype, controlled
    /// distribution, final rug edge.
    PerfectCrime,
    /// Organic-looking base volume inflated by wash-trading loops.
    WashTraded,
}

impl TimelineClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineClass::Organic => "organic",
            TimelineClass::ClassicRug => "classic_rug",
            TimelineClass::SlowRug => "slow_rug",
            TimelineClass::PerfectCrime => "perfect_crime",
            TimelineClass::WashTraded => "wash_traded",
        }
    }

    /// Whether detectors are expected to flag this class as a rug.
    pub fn is_rug(&self) -> bool {
        !matches!(self, TimelineClass::Organic)
    }

    pub fn all() -> Vec<TimelineClass> {
        vec![
            TimelineClass::Organic,
            TimelineClass::ClassicRug,
            TimelineClass::SlowRug,
            TimelineClass::PerfectCrime,
            TimelineClass::WashTraded,
        ]
    }
}

/// One generated rug-pull (or control) scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticTimeline {
    pub class: TimelineClass,
    pub pool: Address,
    pub dev: Address,
    pub launch_ts_ms: i64,
    /// Sorted by timestamp ascending.
    pub txs: Vec<TxRecord>,
}

impl SyntheticTimeline {
    /// Restore the timestamp ordering invariant. Stable, so transfers within
    /// the same millisecond keep their insertion order.
    pub fn restore_order(&mut self) {
        self.txs.sort_by_key(|tx| tx.timestamp_ms);
    }

    pub fn is_ordered(&self) -> bool {
        self.txs
            .windows(2)
            .all(|pair| pair[0].timestamp_ms <= pair[1].timestamp_ms)
    }

    /// Timestamp of the last transfer, or the launch time for an empty
    /// timeline.
    pub fn end_ts_ms(&self) -> i64 {
        self.txs
            .last()
            .map(|tx| tx.timestamp_ms)
            .unwrap_or(self.launch_ts_ms)
    }

    pub fn duration_ms(&self) -> i64 {
        self.end_ts_ms() - self.launch_ts_ms
    }
}
