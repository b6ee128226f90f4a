//! Demo entry point: analyze a fixture token end to end, render the report,
//! then measure detector sensitivity over a synthetic corpus.

use anyhow::Result;
use chrono::{Duration as ChronoDuration, Utc};
use rugscope::oracle::{
    render_report, AnalyzerConfig, FundingCategory, FundingTrace, LaunchActivity, PriceSeries,
    RawHolder, SocialProfile, StaticSignals, TokenAnalyzer, TokenMint, WalletAgeRecord,
    WindowStats,
};
use rugscope::synth::{generate_corpus, market_view, TimelineClass};
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("rugscope demo starting");

    let now = Utc::now();
    let address = Pubkey::new_unique().to_string();
    let source = Arc::new(suspicious_token_fixture(&address));

    let analyzer = TokenAnalyzer::new(
        source.clone(),
        source.clone(),
        source,
        AnalyzerConfig::default(),
    );
    let report = analyzer.analyze(&address, now).await;
    println!("{}", render_report(&report));

    calibration_sweep();

    info!("demo complete");
    Ok(())
}

/// A token that looks like a launch-bundled rug in progress.
fn suspicious_token_fixture(address: &str) -> StaticSignals {
    let now = Utc::now();
    let dev = "DevWa11et11111111111111111111111111111111".to_string();

    let mut holders = vec![RawHolder::plain(dev.clone(), 250_000_000)];
    for i in 0..9 {
        holders.push(RawHolder::plain(format!("insider{i}"), 30_000_000));
    }
    for i in 0..30 {
        holders.push(RawHolder::plain(format!("retail{i}"), 1_000_000));
    }

    let mut acquisition_slots = HashMap::new();
    for i in 0..9 {
        acquisition_slots.insert(format!("insider{i}"), 1_000);
    }
    acquisition_slots.insert(dev.clone(), 1_000);

    StaticSignals {
        mint: Some(TokenMint {
            address: address.to_string(),
            decimals: 9,
            supply: 1_000_000_000,
            metadata_mutable: true,
            has_mint_authority: true,
            has_freeze_authority: false,
        }),
        holders,
        launch: Some(LaunchActivity {
            launch_slot: 1_000,
            acquisition_slots,
            tipped: Default::default(),
        }),
        ages: (0..9)
            .map(|i| WalletAgeRecord {
                address: format!("insider{i}"),
                created_at: now - ChronoDuration::days(2),
                funded_by: Some("FarmSource".to_string()),
            })
            .collect(),
        traces: (0..9)
            .map(|i| FundingTrace {
                wallet: format!("insider{i}"),
                source: "FixedF1oat".to_string(),
                category: FundingCategory::InstantSwap,
            })
            .collect(),
        series: Some(PriceSeries {
            m5: WindowStats {
                price_change_pct: -12.0,
                buys: 4,
                sells: 21,
                volume: 9_000.0,
            },
            h1: WindowStats {
                price_change_pct: -48.0,
                buys: 11,
                sells: 64,
                volume: 26_000.0,
            },
            h6: WindowStats {
                price_change_pct: 320.0,
                buys: 410,
                sells: 150,
                volume: 50_000.0,
            },
            h24: WindowStats {
                price_change_pct: 290.0,
                buys: 500,
                sells: 220,
                volume: 60_000.0,
            },
        }),
        profiles: vec![SocialProfile {
            website: None,
            twitter: Some("https://x.com/example".to_string()),
            telegram: None,
            discord: None,
        }],
        ..Default::default()
    }
}

/// Run the market detector over a labelled synthetic corpus and report
/// per-class hit rates.
fn calibration_sweep() {
    use rugscope::oracle::analyze_market;

    const LAUNCH_TS_MS: i64 = 1_700_000_000_000;
    let corpus = generate_corpus(4242, 20, LAUNCH_TS_MS);

    println!("Synthetic calibration sweep ({} timelines):", corpus.len());
    for class in TimelineClass::all() {
        let samples: Vec<_> = corpus.iter().filter(|t| t.class == class).collect();
        let flagged = samples
            .iter()
            .filter(|t| analyze_market(&market_view(t, t.end_ts_ms())).is_rug_pull)
            .count();
        let expectation = if class.is_rug() { "rug" } else { "clean" };
        println!(
            "  {:>14} (labelled {expectation}): {}/{} flagged by price-action detector",
            class.as_str(),
            flagged,
            samples.len()
        );
    }
}
