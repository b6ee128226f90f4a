//! Collaborator traits and degradable signal fetching.
//!
//! The core never talks to RPC nodes or HTTP APIs itself. External
//! collaborators implement these traits and return already-parsed domain
//! objects; the analyzer composes them. Every secondary fetch is wrapped in
//! [`degrade`], which converts timeouts and upstream errors into a tagged
//! [`Signal::Missing`] so one slow upstream never aborts an analysis.

use crate::oracle::normalizer::RawHolder;
use crate::oracle::types::{
    FundingTrace, LaunchActivity, PriceSeries, SocialProfile, TokenMint, TxRecord,
    WalletAgeRecord,
};
use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// On-chain data collaborator (RPC / indexer wrapper).
#[async_trait]
pub trait ChainSignals: Send + Sync {
    /// Resolve the mint account. `Ok(None)` means the token does not exist;
    /// this is the primary identity-resolving fetch and the only one whose
    /// failure fails the analysis.
    async fn token_mint(&self, address: &str) -> Result<Option<TokenMint>>;

    /// Top holders by balance.
    async fn holder_records(&self, address: &str) -> Result<Vec<RawHolder>>;

    /// Slot-level acquisition timing around launch, when indexed.
    async fn launch_activity(&self, address: &str) -> Result<Option<LaunchActivity>>;

    /// Wallet creation ages and first-funder addresses for the top holders.
    async fn wallet_ages(&self, address: &str) -> Result<Vec<WalletAgeRecord>>;

    /// Funding provenance per holder wallet.
    async fn funding_traces(&self, address: &str) -> Result<Vec<FundingTrace>>;

    /// Transfers out of the deployer wallet.
    async fn dev_outflows(&self, address: &str) -> Result<Vec<TxRecord>>;

    /// Recent pool transfers for the token.
    async fn trade_history(&self, address: &str) -> Result<Vec<TxRecord>>;
}

/// Market-data collaborator (DEX screener style).
#[async_trait]
pub trait MarketSignals: Send + Sync {
    /// Per-window price/volume stats. `Ok(None)` when the token is not yet
    /// listed anywhere.
    async fn price_series(&self, address: &str) -> Result<Option<PriceSeries>>;
}

/// Social metadata collaborator. Profiles come back in priority order;
/// the merge keeps the first nonempty value per field.
#[async_trait]
pub trait SocialSignals: Send + Sync {
    async fn social_profiles(&self, address: &str) -> Result<Vec<SocialProfile>>;
}

/// A fetched signal, or the documented fact that it was unavailable.
///
/// Degrading to `Missing` instead of a bare default keeps "we could not
/// determine" distinguishable from "we looked and it was clean".
#[derive(Debug, Clone)]
pub enum Signal<T> {
    Present(T),
    Missing(&'static str),
}

impl<T> Signal<T> {
    /// The carried value, discarding the missing tag.
    pub fn present(self) -> Option<T> {
        match self {
            Signal::Present(value) => Some(value),
            Signal::Missing(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Signal::Missing(_))
    }
}

/// Run a fetch under a timeout, absorbing failure into `Signal::Missing`.
pub async fn degrade<T>(
    name: &'static str,
    timeout: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Signal<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Signal::Present(value),
        Ok(Err(error)) => {
            warn!(signal = name, %error, "signal fetch failed; degrading to unknown");
            Signal::Missing(name)
        }
        Err(_) => {
            warn!(signal = name, ?timeout, "signal fetch timed out; degrading to unknown");
            Signal::Missing(name)
        }
    }
}

/// In-memory implementation of all three collaborator traits.
///
/// Used by tests and the demo binary; analysis-path behavior (not-found,
/// fatal primary errors) is driven by the `mint` and `fail_mint` fields.
#[derive(Debug, Clone, Default)]
pub struct StaticSignals {
    pub mint: Option<TokenMint>,
    /// When set, the primary fetch fails with this message.
    pub fail_mint: Option<String>,
    pub holders: Vec<RawHolder>,
    pub launch: Option<LaunchActivity>,
    pub ages: Vec<WalletAgeRecord>,
    pub traces: Vec<FundingTrace>,
    pub outflows: Vec<TxRecord>,
    pub history: Vec<TxRecord>,
    pub series: Option<PriceSeries>,
    pub profiles: Vec<SocialProfile>,
}

#[async_trait]
impl ChainSignals for StaticSignals {
    async fn token_mint(&self, _address: &str) -> Result<Option<TokenMint>> {
        if let Some(message) = &self.fail_mint {
            anyhow::bail!("{message}");
        }
        Ok(self.mint.clone())
    }

    async fn holder_records(&self, _address: &str) -> Result<Vec<RawHolder>> {
        Ok(self.holders.clone())
    }

    async fn launch_activity(&self, _address: &str) -> Result<Option<LaunchActivity>> {
        Ok(self.launch.clone())
    }

    async fn wallet_ages(&self, _address: &str) -> Result<Vec<WalletAgeRecord>> {
        Ok(self.ages.clone())
    }

    async fn funding_traces(&self, _address: &str) -> Result<Vec<FundingTrace>> {
        Ok(self.traces.clone())
    }

    async fn dev_outflows(&self, _address: &str) -> Result<Vec<TxRecord>> {
        Ok(self.outflows.clone())
    }

    async fn trade_history(&self, _address: &str) -> Result<Vec<TxRecord>> {
        Ok(self.history.clone())
    }
}

#[async_trait]
impl MarketSignals for StaticSignals {
    async fn price_series(&self, _address: &str) -> Result<Option<PriceSeries>> {
        Ok(self.series)
    }
}

#[async_trait]
impl SocialSignals for StaticSignals {
    async fn social_profiles(&self, _address: &str) -> Result<Vec<SocialProfile>> {
        Ok(self.profiles.clone())
    }
}
