//! Domain types and configuration for the token scoring oracle.

use crate::types::{Address, Grade, RiskFinding, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

/// On-chain mint account facts, re-fetched once per analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenMint {
    pub address: Address,
    pub decimals: u8,
    pub supply: u64,
    pub metadata_mutable: bool,
    pub has_mint_authority: bool,
    pub has_freeze_authority: bool,
}

/// A single holder of the analyzed token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolderRecord {
    pub address: Address,
    pub balance: u64,
    /// Share of total supply, 0-100.
    pub percent: f64,
    pub is_lp: bool,
    pub is_exchange: bool,
    pub is_bundled: bool,
    pub is_sniper: bool,
}

impl HolderRecord {
    /// Whether this holder counts toward concentration metrics.
    /// LP pools, exchange wallets and protocol accounts never do.
    pub fn qualifies(&self) -> bool {
        !self.is_lp && !self.is_exchange
    }
}

/// Holder collection ordered by descending balance with unique addresses.
///
/// Construction enforces both invariants; detectors can rely on them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolderSet {
    records: Vec<HolderRecord>,
}

impl HolderSet {
    /// Build a holder set, sorting by balance descending and dropping
    /// duplicate addresses (first occurrence wins).
    pub fn new(mut records: Vec<HolderRecord>) -> Self {
        records.sort_by(|a, b| b.balance.cmp(&a.balance));
        let mut seen: HashSet<Address> = HashSet::new();
        records.retain(|r| seen.insert(r.address.clone()));
        Self { records }
    }

    pub fn iter(&self) -> impl Iterator<Item = &HolderRecord> {
        self.records.iter()
    }

    /// Holders that count toward concentration metrics, in balance order.
    pub fn qualifying(&self) -> impl Iterator<Item = &HolderRecord> {
        self.records.iter().filter(|r| r.qualifies())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Aggregated trade statistics for one lookback window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    /// Signed percent price change over the window (negative = decline).
    pub price_change_pct: f64,
    pub buys: u32,
    pub sells: u32,
    pub volume: f64,
}

impl WindowStats {
    pub fn tx_count(&self) -> u32 {
        self.buys + self.sells
    }
}

/// Market data keyed by the fixed lookback windows every detector uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub m5: WindowStats,
    pub h1: WindowStats,
    pub h6: WindowStats,
    pub h24: WindowStats,
}

/// Social links for a token from one upstream source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialProfile {
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
}

impl SocialProfile {
    pub fn is_empty(&self) -> bool {
        self.website.is_none()
            && self.twitter.is_none()
            && self.telegram.is_none()
            && self.discord.is_none()
    }
}

/// Wallet creation-age metadata for one holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletAgeRecord {
    pub address: Address,
    pub created_at: DateTime<Utc>,
    /// Wallet that sent the first funding transaction, when traceable.
    pub funded_by: Option<Address>,
}

/// How a holder's initial capital entered its wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundingCategory {
    /// Withdrawn from a centralized exchange.
    Exchange,
    /// Routed through a no-KYC instant-swap service.
    InstantSwap,
    /// Transferred from another ordinary wallet.
    Peer,
    Unknown,
}

/// Funding provenance for one holder wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingTrace {
    pub wallet: Address,
    /// The originating service or wallet address.
    pub source: Address,
    pub category: FundingCategory,
}

/// One observed or synthetic transfer touching the token's pool.
///
/// Positive amount = inflow to the pool (a buy), negative = outflow (a sell).
/// Sequence-sensitive consumers sort by `timestamp_ms` ascending first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxRecord {
    pub timestamp_ms: i64,
    pub source: Address,
    pub dest: Address,
    pub amount: f64,
    pub is_dev_sell: bool,
    pub is_rug_edge: bool,
    pub is_sniper_buy: bool,
    pub is_wash_trade: bool,
    pub is_fake_hype: bool,
}

impl TxRecord {
    pub fn transfer(timestamp_ms: i64, source: Address, dest: Address, amount: f64) -> Self {
        Self {
            timestamp_ms,
            source,
            dest,
            amount,
            is_dev_sell: false,
            is_rug_edge: false,
            is_sniper_buy: false,
            is_wash_trade: false,
            is_fake_hype: false,
        }
    }
}

/// Block-level acquisition timing gathered around a token launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchActivity {
    pub launch_slot: u64,
    /// Slot in which each holder first acquired the token.
    pub acquisition_slots: HashMap<Address, u64>,
    /// Holders whose acquisition carried an MEV-bundle tip.
    pub tipped: HashSet<Address>,
}

/// Known infrastructure and flagged addresses injected into the analyzer.
///
/// Exchange and protocol wallets are excluded from concentration math;
/// casino addresses feed the dev-outflow red-flag check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownAddressBook {
    pub exchanges: HashSet<Address>,
    /// Bonding-curve and AMM program accounts (Pump.fun curve, Raydium authority).
    pub protocol: HashSet<Address>,
    pub casinos: HashSet<Address>,
    /// Instant-swap services with a history of scam-deployment funding.
    pub flagged_swaps: HashSet<Address>,
}

impl KnownAddressBook {
    pub fn is_exchange(&self, address: &str) -> bool {
        self.exchanges.contains(address)
    }

    pub fn is_protocol(&self, address: &str) -> bool {
        self.protocol.contains(address)
    }

    pub fn is_casino(&self, address: &str) -> bool {
        self.casinos.contains(address)
    }

    pub fn is_flagged_swap(&self, address: &str) -> bool {
        self.flagged_swaps.contains(address)
    }
}

impl Default for KnownAddressBook {
    fn default() -> Self {
        let exchanges = [
            // Binance and Coinbase hot wallets
            "5tzFkiKscXHK5ZXCGbXZxdw7gTjjD1mBwuoFbhUvuAi9",
            "H8sMJSCQxfKiFTCfDR3DUMLPwcRbM61LGFJ8N4dK3WjS",
        ];
        let protocol = [
            // Raydium authority v4
            "5Q544fKrFoe6tsEbD7S8EmxGTJYAKtTVhAW5Q5pge4j1",
            // Pump.fun bonding curve program
            "6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P",
        ];
        Self {
            exchanges: exchanges.iter().map(|s| s.to_string()).collect(),
            protocol: protocol.iter().map(|s| s.to_string()).collect(),
            casinos: HashSet::new(),
            flagged_swaps: HashSet::new(),
        }
    }
}

/// Maximum penalty each detector family may subtract from the composite.
///
/// Two live weighting schemes exist in the field; both are instances of this
/// one table rather than forked scoring code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub concentration: f64,
    pub market: f64,
    pub bundle: f64,
    pub fake_volume: f64,
    pub funding: f64,
    pub social: f64,
}

impl ComponentWeights {
    /// Current scheme: 30/25/20/15/10, social handled by its own verdict.
    pub fn standard() -> Self {
        Self {
            concentration: 30.0,
            market: 25.0,
            bundle: 20.0,
            fake_volume: 15.0,
            funding: 10.0,
            social: 0.0,
        }
    }

    /// Earlier scheme that folded social presence into the composite.
    pub fn legacy() -> Self {
        Self {
            concentration: 30.0,
            market: 20.0,
            bundle: 20.0,
            fake_volume: 10.0,
            funding: 10.0,
            social: 10.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.concentration + self.market + self.bundle + self.fake_volume + self.funding + self.social
    }
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self::standard()
    }
}

/// Detector thresholds, tunable without touching detector code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreThresholds {
    /// Top qualifying holder share that triggers the critical finding.
    pub top_holder_critical_pct: f64,
    /// Top-10 qualifying concentration that triggers the high finding.
    pub top10_high_pct: f64,
    pub bundle_critical_score: f64,
    pub bundle_high_score: f64,
    /// Slots after launch still considered the launch window.
    pub launch_window_slots: u64,
    pub fake_volume_critical: f64,
    pub fake_volume_high: f64,
    /// Wallet age below which a holder counts as "aged enough to sell".
    pub dormant_age_days: i64,
    /// Max spread between coordinated buys.
    pub simultaneous_buy_window_ms: i64,
    pub swap_funded_critical_pct: f64,
    pub fresh_wallet_max_age_days: i64,
    pub fresh_wallet_cluster_size: usize,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            top_holder_critical_pct: 20.0,
            top10_high_pct: 50.0,
            bundle_critical_score: 60.0,
            bundle_high_score: 35.0,
            launch_window_slots: 3,
            fake_volume_critical: 70.0,
            fake_volume_high: 40.0,
            dormant_age_days: 30,
            simultaneous_buy_window_ms: 60_000,
            swap_funded_critical_pct: 30.0,
            fresh_wallet_max_age_days: 7,
            fresh_wallet_cluster_size: 5,
        }
    }
}

/// Full analyzer configuration, injected at construction.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub weights: ComponentWeights,
    pub thresholds: ScoreThresholds,
    pub known: KnownAddressBook,
    /// Per-signal fetch timeout; a slow upstream degrades, never blocks.
    pub fetch_timeout: Duration,
    pub retry_attempts: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            weights: ComponentWeights::default(),
            thresholds: ScoreThresholds::default(),
            known: KnownAddressBook::default(),
            fetch_timeout: Duration::from_secs(10),
            retry_attempts: 3,
        }
    }
}

/// Final analysis result for one token.
///
/// The composite is a *safety* score: 100 = safe, 0 = dangerous. Immutable
/// once built; the analyzer never returns an error to the caller, it returns
/// one of the structured variants below instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenReport {
    pub address: Address,
    /// False when the address was malformed or the mint does not exist.
    pub found: bool,
    pub error: Option<String>,
    /// Composite safety score, 0-100 (100 = safe).
    pub score: u8,
    pub grade: Grade,
    pub verdict: Verdict,
    /// Per-component risk (0-100, 100 = worst), keyed by component name.
    pub components: BTreeMap<String, f64>,
    /// Ordered worst-first.
    pub risks: Vec<RiskFinding>,
    pub strengths: Vec<String>,
    pub recommendation: String,
    /// Signals that fell back to "unknown" during this run. A non-empty list
    /// means "we could not determine", which is not the same as "clean".
    pub degraded: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl TokenReport {
    /// Fast-path result for a malformed address; produced before any fetch.
    pub fn invalid(address: &str, now: DateTime<Utc>) -> Self {
        Self::unscored(address, "invalid token address format", now)
    }

    /// Fast-path result when the mint account does not exist.
    pub fn not_found(address: &str, now: DateTime<Utc>) -> Self {
        Self::unscored(address, "token not found", now)
    }

    /// Worst-case result for an analysis-level fatal failure. Scores as
    /// maximum risk so a broken analysis is never mistaken for a safe token.
    pub fn failed(address: &str, error: &str, now: DateTime<Utc>) -> Self {
        Self {
            address: address.to_string(),
            found: true,
            error: Some(error.to_string()),
            score: 0,
            grade: Grade::F,
            verdict: Verdict::Avoid,
            components: BTreeMap::new(),
            risks: vec![RiskFinding::new(
                "analysis_failure",
                crate::types::Severity::Critical,
                100,
                format!("Analysis failed: {error}"),
            )],
            strengths: Vec::new(),
            recommendation: "Analysis failed; treat this token as maximum risk until it can be re-checked.".to_string(),
            degraded: Vec::new(),
            analyzed_at: now,
        }
    }

    fn unscored(address: &str, error: &str, now: DateTime<Utc>) -> Self {
        Self {
            address: address.to_string(),
            found: false,
            error: Some(error.to_string()),
            score: 0,
            grade: Grade::F,
            verdict: Verdict::Avoid,
            components: BTreeMap::new(),
            risks: Vec::new(),
            strengths: Vec::new(),
            recommendation: format!("No analysis performed: {error}."),
            degraded: Vec::new(),
            analyzed_at: now,
        }
    }
}
