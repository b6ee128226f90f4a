//! rugscope - multi-signal risk scoring for Solana tokens.
//!
//! Ingests on-chain and off-chain signals about a token, runs a set of
//! independent pattern detectors over them, and folds the results into one
//! bounded safety score with a grade, verdict and human-readable report.
//! A repository-health variant applies the same scoring pattern to GitHub
//! projects, and a synthetic augmentation pipeline generates labelled
//! rug-pull timelines for detector calibration.

pub mod oracle;
pub mod repo;
pub mod synth;
pub mod types;

// Re-export the main entry points for convenience.
pub use oracle::{render_report, TokenAnalyzer, TokenReport};
pub use repo::{render_repo_report, RepoAnalyzer, RepoReport};
pub use types::{Grade, RiskFinding, Severity, Verdict};
