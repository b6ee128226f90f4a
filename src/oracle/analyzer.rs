//! Analysis orchestration.
//!
//! One `analyze` call per token: validate the address, resolve the mint
//! (the only fetch allowed to fail the run), fan out every secondary signal
//! fetch concurrently with independent timeouts, run the detectors over
//! whatever arrived, and aggregate. The caller always gets a structured
//! report back - never an error.

use crate::oracle::aggregator::{aggregate, DetectorOutcomes};
use crate::oracle::bundle::analyze_bundles;
use crate::oracle::concentration::analyze_concentration;
use crate::oracle::data_sources::{degrade, ChainSignals, MarketSignals, Signal, SocialSignals};
use crate::oracle::funding::analyze_funding;
use crate::oracle::normalizer::{normalize_holders, normalize_series};
use crate::oracle::pump_dump::analyze_market;
use crate::oracle::social::analyze_social;
use crate::oracle::types::{AnalyzerConfig, TokenReport};
use crate::oracle::wallet_age::analyze_wallet_ages;
use chrono::{DateTime, Utc};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, info, instrument, warn};

/// Token risk analyzer with explicitly injected collaborators.
///
/// Constructed once at process start and passed by reference to callers;
/// holds no per-request state.
pub struct TokenAnalyzer {
    chain: Arc<dyn ChainSignals>,
    market: Arc<dyn MarketSignals>,
    social: Arc<dyn SocialSignals>,
    config: AnalyzerConfig,
}

impl TokenAnalyzer {
    pub fn new(
        chain: Arc<dyn ChainSignals>,
        market: Arc<dyn MarketSignals>,
        social: Arc<dyn SocialSignals>,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            chain,
            market,
            social,
            config,
        }
    }

    /// Analyze one token end to end.
    ///
    /// `now` is threaded through every age-relative check so repeated runs
    /// over frozen inputs are deterministic.
    #[instrument(skip(self, now), fields(mint = %address))]
    pub async fn analyze(&self, address: &str, now: DateTime<Utc>) -> TokenReport {
        info!("starting token analysis");

        if Pubkey::from_str(address).is_err() {
            warn!("rejected malformed token address");
            return TokenReport::invalid(address, now);
        }

        // Primary identity-resolving fetch, retried; its failure is the only
        // way an analysis ends without running the detectors.
        let retry = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(2))
            .take(self.config.retry_attempts);
        let mint = match Retry::spawn(retry, || self.chain.token_mint(address)).await {
            Ok(Some(mint)) => mint,
            Ok(None) => {
                info!("mint account not found");
                return TokenReport::not_found(address, now);
            }
            Err(error) => {
                warn!(%error, "primary mint fetch failed; returning worst-case report");
                return TokenReport::failed(address, &format!("{error:#}"), now);
            }
        };

        // Secondary enrichment fetches: concurrent, each degrading on its own.
        let t = self.config.fetch_timeout;
        let (holders, series, launch, ages, traces, outflows, history, profiles) = tokio::join!(
            degrade("holder list", t, self.chain.holder_records(address)),
            degrade("market data", t, self.market.price_series(address)),
            degrade("launch timing", t, self.chain.launch_activity(address)),
            degrade("wallet ages", t, self.chain.wallet_ages(address)),
            degrade("funding traces", t, self.chain.funding_traces(address)),
            degrade("dev outflows", t, self.chain.dev_outflows(address)),
            degrade("trade history", t, self.chain.trade_history(address)),
            degrade("social profiles", t, self.social.social_profiles(address)),
        );

        let mut degraded: Vec<String> = Vec::new();
        let mut note_missing = |signal_name: &'static str| {
            degraded.push(signal_name.to_string());
        };

        let holders = match holders {
            Signal::Present(raw) => Some(normalize_holders(raw, mint.supply, &self.config.known)),
            Signal::Missing(name) => {
                note_missing(name);
                None
            }
        };
        let series = match series {
            Signal::Present(Some(series)) => Some(normalize_series(series)),
            Signal::Present(None) => {
                note_missing("market data");
                None
            }
            Signal::Missing(name) => {
                note_missing(name);
                None
            }
        };
        // Timing can be absent even when the fetch succeeded; either way the
        // bundle check must report "unknown", never "clean".
        let launch = match launch {
            Signal::Present(Some(activity)) => Some(activity),
            Signal::Present(None) => {
                note_missing("launch timing");
                None
            }
            Signal::Missing(name) => {
                note_missing(name);
                None
            }
        };
        let ages = match ages {
            Signal::Present(ages) => Some(ages),
            Signal::Missing(name) => {
                note_missing(name);
                None
            }
        };
        let traces = match traces {
            Signal::Present(traces) => Some(traces),
            Signal::Missing(name) => {
                note_missing(name);
                None
            }
        };
        let outflows = match outflows {
            Signal::Present(outflows) => outflows,
            Signal::Missing(name) => {
                note_missing(name);
                Vec::new()
            }
        };
        let history = match history {
            Signal::Present(history) => history,
            Signal::Missing(name) => {
                note_missing(name);
                Vec::new()
            }
        };
        let profiles = match profiles {
            Signal::Present(profiles) => Some(profiles),
            Signal::Missing(name) => {
                note_missing(name);
                None
            }
        };

        debug!(
            degraded = degraded.len(),
            "signals assembled; running detectors"
        );

        let thresholds = &self.config.thresholds;
        let outcomes = DetectorOutcomes {
            concentration: holders
                .as_ref()
                .map(|h| analyze_concentration(&mint, h, thresholds)),
            market: series.as_ref().map(analyze_market),
            bundle: holders
                .as_ref()
                .map(|h| analyze_bundles(h, launch.as_ref(), thresholds)),
            fake_volume: match (&holders, &ages) {
                (Some(h), Some(a)) => Some(analyze_wallet_ages(h, a, &history, now, thresholds)),
                _ => None,
            },
            funding: match (&holders, &traces) {
                (Some(h), Some(tr)) => Some(analyze_funding(
                    h,
                    tr,
                    ages.as_deref().unwrap_or(&[]),
                    now,
                    thresholds,
                )),
                _ => None,
            },
            social: profiles
                .as_ref()
                .map(|p| analyze_social(p, &outflows, &self.config.known)),
        };

        let report = aggregate(&mint, &outcomes, &self.config.weights, degraded, now);
        info!(
            score = report.score,
            verdict = %report.verdict,
            risks = report.risks.len(),
            "token analysis complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::data_sources::StaticSignals;
    use crate::oracle::normalizer::RawHolder;
    use crate::oracle::types::{PriceSeries, TokenMint, WindowStats};
    use crate::types::{Grade, Verdict};

    fn test_address() -> String {
        Pubkey::new_unique().to_string()
    }

    fn mint_for(address: &str) -> TokenMint {
        TokenMint {
            address: address.to_string(),
            decimals: 9,
            supply: 1_000_000_000,
            metadata_mutable: false,
            has_mint_authority: false,
            has_freeze_authority: false,
        }
    }

    fn analyzer_with(source: StaticSignals) -> TokenAnalyzer {
        let source = Arc::new(source);
        TokenAnalyzer::new(
            source.clone(),
            source.clone(),
            source,
            AnalyzerConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_malformed_address_rejected_before_fetch() {
        let analyzer = analyzer_with(StaticSignals::default());
        let report = analyzer.analyze("not-a-base58-address!!", Utc::now()).await;

        assert!(!report.found);
        assert!(report.error.as_deref().unwrap().contains("invalid"));
    }

    #[tokio::test]
    async fn test_unknown_mint_is_not_found() {
        let analyzer = analyzer_with(StaticSignals::default());
        let report = analyzer.analyze(&test_address(), Utc::now()).await;

        assert!(!report.found);
        assert!(report.error.as_deref().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_primary_failure_returns_worst_case() {
        let address = test_address();
        let analyzer = analyzer_with(StaticSignals {
            fail_mint: Some("rpc unavailable".to_string()),
            ..Default::default()
        });
        let report = analyzer.analyze(&address, Utc::now()).await;

        assert!(report.found);
        assert_eq!(report.score, 0);
        assert_eq!(report.grade, Grade::F);
        assert_eq!(report.verdict, Verdict::Avoid);
        assert!(report.error.as_deref().unwrap().contains("rpc unavailable"));
    }

    #[tokio::test]
    async fn test_dumping_token_flagged_as_rug() {
        let address = test_address();
        let series = PriceSeries {
            m5: WindowStats {
                price_change_pct: -95.0,
                buys: 1,
                sells: 60,
                volume: 60_000.0,
            },
            h1: WindowStats {
                price_change_pct: -95.0,
                buys: 2,
                sells: 70,
                volume: 70_000.0,
            },
            h6: WindowStats {
                price_change_pct: 600.0,
                ..Default::default()
            },
            h24: WindowStats {
                volume: 80_000.0,
                ..Default::default()
            },
        };
        let analyzer = analyzer_with(StaticSignals {
            mint: Some(mint_for(&address)),
            holders: vec![RawHolder::plain("w1", 10), RawHolder::plain("w2", 10)],
            series: Some(series),
            ..Default::default()
        });

        let report = analyzer.analyze(&address, Utc::now()).await;
        assert!(report.found);
        assert_eq!(report.verdict, Verdict::Avoid);
        assert!(report.risks.iter().any(|f| f.kind == "instant_dump"));
        // Launch timing was absent: bundle check must surface as unknown.
        assert!(report.degraded.iter().any(|d| d == "launch timing"));
    }

    #[tokio::test]
    async fn test_analysis_always_completes_with_missing_signals() {
        let address = test_address();
        let analyzer = analyzer_with(StaticSignals {
            mint: Some(mint_for(&address)),
            ..Default::default()
        });

        let report = analyzer.analyze(&address, Utc::now()).await;
        assert!(report.found);
        assert!(report.error.is_none());
        // Market data and launch timing were unavailable.
        assert!(report.degraded.iter().any(|d| d == "market data"));
        assert!(report.degraded.iter().any(|d| d == "launch timing"));
    }
}
