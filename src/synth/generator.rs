//! Seeded generation of synthetic rug-pull timelines.
//!
//! Every generator draws from one `StdRng` seeded at construction, so a
//! given seed always produces the same corpus. Detectors themselves stay
//! randomness-free; this module is offline tooling for calibrating them.

use crate::oracle::types::TxRecord;
use crate::synth::timeline::{SyntheticTimeline, TimelineClass};
use crate::types::Address;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;

/// Deterministic timeline generator.
pub struct TimelineGenerator {
    rng: StdRng,
}

impl TimelineGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn wallet(&mut self, prefix: &str) -> Address {
        format!("{prefix}{:08x}", self.rng.gen::<u32>())
    }

    /// Ordinary trading over 24 hours with no scripted exit.
    pub fn organic(&mut self, launch_ts_ms: i64) -> SyntheticTimeline {
        let pool = self.wallet("pool");
        let dev = self.wallet("dev");
        let mut txs = Vec::new();

        for i in 0..200 {
            let ts = launch_ts_ms + i * (24 * HOUR_MS / 200) + self.rng.gen_range(0..30_000);
            let wallet = self.wallet("trader");
            let amount = self.rng.gen_range(10.0..200.0);
            // Organic flow skews toward buys but both sides trade.
            if self.rng.gen_bool(0.6) {
                txs.push(buy(ts, wallet, &pool, amount));
            } else {
                txs.push(sell(ts, wallet, &pool, amount * 0.8));
            }
        }

        self.finish(TimelineClass::Organic, pool, dev, launch_ts_ms, txs)
    }

    /// Hype ramp followed by one catastrophic dev dump and the retail panic
    /// that always trails it.
    pub fn classic_rug(&mut self, launch_ts_ms: i64) -> SyntheticTimeline {
        let pool = self.wallet("pool");
        let dev = self.wallet("dev");
        let mut txs = Vec::new();
        let mut inflow = 0.0;

        // Four hours of steady buying.
        for i in 0..60 {
            let ts = launch_ts_ms + i * (4 * HOUR_MS / 60) + self.rng.gen_range(0..30_000);
            let wallet = self.wallet("buyer");
            let amount = self.rng.gen_range(50.0..500.0);
            inflow += amount;
            txs.push(buy(ts, wallet, &pool, amount));
        }

        // The dump: 80% of everything that came in, gone in under a minute.
        let dump_start = launch_ts_ms + 4 * HOUR_MS + MINUTE_MS;
        let mut first = sell(dump_start, dev.clone(), &pool, inflow * 0.5);
        first.is_dev_sell = true;
        txs.push(first);
        let mut last = sell(dump_start + 20_000, dev.clone(), &pool, inflow * 0.3);
        last.is_dev_sell = true;
        last.is_rug_edge = true;
        txs.push(last);

        // Retail stampedes for the exit over the next half hour.
        for i in 0..40 {
            let ts = dump_start + MINUTE_MS + i * 40_000 + self.rng.gen_range(0..10_000);
            let wallet = self.wallet("panic");
            txs.push(sell(ts, wallet, &pool, inflow * 0.003));
        }

        self.finish(TimelineClass::ClassicRug, pool, dev, launch_ts_ms, txs)
    }

    /// Dev bleeds the position out in small sells across six hours.
    pub fn slow_rug(&mut self, launch_ts_ms: i64) -> SyntheticTimeline {
        let pool = self.wallet("pool");
        let dev = self.wallet("dev");
        let mut txs = Vec::new();
        let mut inflow = 0.0;

        // Retail interest concentrated in the first three hours.
        for i in 0..100 {
            let ts = launch_ts_ms + i * (3 * HOUR_MS / 100) + self.rng.gen_range(0..20_000);
            let wallet = self.wallet("buyer");
            let amount = self.rng.gen_range(20.0..250.0);
            inflow += amount;
            txs.push(buy(ts, wallet, &pool, amount));
        }

        // One small dev sell every ten minutes, never big enough to alarm.
        for i in 0..36 {
            let ts = launch_ts_ms + i * 10 * MINUTE_MS + self.rng.gen_range(0..60_000);
            let mut bleed = sell(ts, dev.clone(), &pool, inflow * 0.02);
            bleed.is_dev_sell = true;
            if i == 35 {
                bleed.is_rug_edge = true;
            }
            txs.push(bleed);
        }

        self.finish(TimelineClass::SlowRug, pool, dev, launch_ts_ms, txs)
    }

    /// Multi-phase pattern: quiet accumulation, fake hype, controlled
    /// distribution, then the rug edge.
    pub fn perfect_crime(&mut self, launch_ts_ms: i64) -> SyntheticTimeline {
        let pool = self.wallet("pool");
        let dev = self.wallet("dev");
        let mut txs = Vec::new();
        let mut inflow = 0.0;

        // Phase 1: insiders accumulate quietly for two hours.
        let insiders: Vec<Address> = (0..8).map(|_| self.wallet("insider")).collect();
        for i in 0..24 {
            let ts = launch_ts_ms + i * (2 * HOUR_MS / 24) + self.rng.gen_range(0..15_000);
            let wallet = insiders[i as usize % insiders.len()].clone();
            let amount = self.rng.gen_range(80.0..140.0);
            inflow += amount;
            txs.push(buy(ts, wallet, &pool, amount));
        }

        // Phase 2: an hour of manufactured hype from fresh wallets.
        let hype_start = launch_ts_ms + 2 * HOUR_MS;
        for i in 0..40 {
            let ts = hype_start + i * (HOUR_MS / 40) + self.rng.gen_range(0..5_000);
            let wallet = self.wallet("hype");
            let amount = self.rng.gen_range(50.0..300.0);
            inflow += amount;
            let mut hype = buy(ts, wallet, &pool, amount);
            hype.is_fake_hype = true;
            txs.push(hype);
        }

        // Phase 3: two hours of controlled distribution while retail still buys.
        let dist_start = launch_ts_ms + 3 * HOUR_MS;
        for i in 0..12 {
            let ts = dist_start + i * (2 * HOUR_MS / 12) + self.rng.gen_range(0..30_000);
            let retail = self.wallet("retail");
            let retail_amount = self.rng.gen_range(30.0..150.0);
            inflow += retail_amount;
            txs.push(buy(ts, retail, &pool, retail_amount));

            let mut trim = sell(ts + 45_000, dev.clone(), &pool, inflow * 0.025);
            trim.is_dev_sell = true;
            txs.push(trim);
        }

        // Phase 4: the rug edge. Everything left drains in two transfers,
        // and whoever is still holding races to sell into the crater.
        let edge_start = launch_ts_ms + 5 * HOUR_MS + 2 * MINUTE_MS;
        let mut drain = sell(edge_start, dev.clone(), &pool, inflow * 0.35);
        drain.is_dev_sell = true;
        txs.push(drain);
        let mut edge = sell(edge_start + 30_000, dev.clone(), &pool, inflow * 0.3);
        edge.is_dev_sell = true;
        edge.is_rug_edge = true;
        txs.push(edge);

        for i in 0..20 {
            let ts = edge_start + MINUTE_MS + i * 80_000 + self.rng.gen_range(0..15_000);
            let wallet = self.wallet("panic");
            txs.push(sell(ts, wallet, &pool, inflow * 0.003));
        }

        self.finish(TimelineClass::PerfectCrime, pool, dev, launch_ts_ms, txs)
    }

    /// Organic-looking base volume inflated by wash-trading loops.
    pub fn wash_traded(&mut self, launch_ts_ms: i64) -> SyntheticTimeline {
        let pool = self.wallet("pool");
        let dev = self.wallet("dev");
        let mut txs = Vec::new();

        for i in 0..30 {
            let ts = launch_ts_ms + i * (6 * HOUR_MS / 30) + self.rng.gen_range(0..20_000);
            let wallet = self.wallet("trader");
            let amount = self.rng.gen_range(20.0..150.0);
            txs.push(buy(ts, wallet, &pool, amount));
        }

        // Three wallet pairs churning fixed-size round trips.
        for _ in 0..3 {
            let a = self.wallet("wash");
            let b = self.wallet("wash");
            let amount = self.rng.gen_range(150.0..250.0);
            let start = launch_ts_ms + self.rng.gen_range(0..(4 * HOUR_MS));
            for cycle in 0..20 {
                let ts = start + cycle * 2 * MINUTE_MS;
                let mut leg_in = buy(ts, a.clone(), &pool, amount);
                leg_in.is_wash_trade = true;
                txs.push(leg_in);
                let mut leg_out = sell(ts + MINUTE_MS, b.clone(), &pool, amount);
                leg_out.is_wash_trade = true;
                txs.push(leg_out);
            }
        }

        self.finish(TimelineClass::WashTraded, pool, dev, launch_ts_ms, txs)
    }

    /// Generate one timeline of the given class.
    pub fn generate(&mut self, class: TimelineClass, launch_ts_ms: i64) -> SyntheticTimeline {
        match class {
            TimelineClass::Organic => self.organic(launch_ts_ms),
            TimelineClass::ClassicRug => self.classic_rug(launch_ts_ms),
            TimelineClass::SlowRug => self.slow_rug(launch_ts_ms),
            TimelineClass::PerfectCrime => self.perfect_crime(launch_ts_ms),
            TimelineClass::WashTraded => self.wash_traded(launch_ts_ms),
        }
    }

    fn finish(
        &mut self,
        class: TimelineClass,
        pool: Address,
        dev: Address,
        launch_ts_ms: i64,
        txs: Vec<TxRecord>,
    ) -> SyntheticTimeline {
        let mut timeline = SyntheticTimeline {
            class,
            pool,
            dev,
            launch_ts_ms,
            txs,
        };
        timeline.restore_order();
        debug!(
            class = class.as_str(),
            txs = timeline.txs.len(),
            "generated synthetic timeline"
        );
        timeline
    }
}

fn buy(ts: i64, wallet: Address, pool: &str, amount: f64) -> TxRecord {
    TxRecord::transfer(ts, wallet, pool.to_string(), amount)
}

fn sell(ts: i64, wallet: Address, pool: &str, amount: f64) -> TxRecord {
    TxRecord::transfer(ts, wallet, pool.to_string(), -amount.abs())
}

/// Generate a labelled corpus: `per_class` timelines of every class.
///
/// Samples are independent, so distributing generation across workers is
/// trivial - hand each worker its own seed.
pub fn generate_corpus(seed: u64, per_class: usize, launch_ts_ms: i64) -> Vec<SyntheticTimeline> {
    let mut generator = TimelineGenerator::with_seed(seed);
    let mut corpus = Vec::with_capacity(per_class * TimelineClass::all().len());
    for class in TimelineClass::all() {
        for i in 0..per_class {
            // Space launches out so samples never share absolute timestamps.
            let launch = launch_ts_ms + i as i64 * 48 * HOUR_MS;
            corpus.push(generator.generate(class, launch));
        }
    }
    corpus
}
