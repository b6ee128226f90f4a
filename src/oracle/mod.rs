//! Token risk-scoring oracle.
//!
//! Signal normalization, the independent component detectors, the weighted
//! aggregation/classification engine and the report formatter. Data flow:
//! collaborator fetches (concurrent, individually degradable) -> detectors
//! (pure, stateless) -> aggregator -> rendered report.

pub mod aggregator;
pub mod analyzer;
pub mod bundle;
pub mod concentration;
pub mod data_sources;
pub mod funding;
pub mod normalizer;
pub mod pump_dump;
pub mod report;
pub mod social;
pub mod types;
pub mod wallet_age;

pub use aggregator::{aggregate, DetectorOutcomes};
pub use analyzer::TokenAnalyzer;
pub use bundle::{analyze_bundles, BundleReport};
pub use concentration::{analyze_concentration, ConcentrationReport};
pub use data_sources::{ChainSignals, MarketSignals, Signal, SocialSignals, StaticSignals};
pub use funding::{analyze_funding, FundingReport};
pub use normalizer::{normalize_holders, normalize_series, RawHolder};
pub use pump_dump::{analyze_market, MarketReport};
pub use report::render_report;
pub use social::{analyze_social, merge_profiles, SocialReport};
pub use types::{
    AnalyzerConfig, ComponentWeights, FundingCategory, FundingTrace, HolderRecord, HolderSet,
    KnownAddressBook, LaunchActivity, PriceSeries, ScoreThresholds, SocialProfile, TokenMint,
    TokenReport, TxRecord, WalletAgeRecord, WindowStats,
};
pub use wallet_age::{analyze_wallet_ages, FakeVolumeReport};
