//! Synthetic data augmentation pipeline.
//!
//! Offline, out-of-band tooling: generates labelled rug-pull transaction
//! timelines (seeded, reproducible), mutates them (time-stretch, sniper
//! injection, wash loops), and bridges them into the detectors' market-data
//! shape for calibration. Nothing here runs on the live analysis path.

pub mod generator;
pub mod market_view;
pub mod ops;
pub mod timeline;

pub use generator::{generate_corpus, TimelineGenerator};
pub use market_view::market_view;
pub use ops::{inject_snipers, time_stretch, wash_loop};
pub use timeline::{SyntheticTimeline, TimelineClass};
