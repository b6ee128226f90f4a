//! Pipeline tests for the synthetic augmentation tooling.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rugscope::oracle::analyze_market;
use rugscope::synth::{
    generate_corpus, inject_snipers, market_view, time_stretch, wash_loop, TimelineClass,
    TimelineGenerator,
};

const LAUNCH: i64 = 1_700_000_000_000;

#[test]
fn corpus_is_reproducible_and_ordered() {
    let a = generate_corpus(1234, 5, LAUNCH);
    let b = generate_corpus(1234, 5, LAUNCH);

    assert_eq!(a.len(), 25);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
    for timeline in &a {
        assert!(timeline.is_ordered());
    }
}

#[test]
fn rug_classes_are_flagged_organic_is_not() {
    let corpus = generate_corpus(777, 10, LAUNCH);

    for class in [TimelineClass::ClassicRug, TimelineClass::PerfectCrime] {
        for timeline in corpus.iter().filter(|t| t.class == class) {
            let report = analyze_market(&market_view(timeline, timeline.end_ts_ms()));
            assert!(
                report.is_rug_pull,
                "{} not flagged (confidence {})",
                class.as_str(),
                report.rug_confidence
            );
        }
    }

    for timeline in corpus.iter().filter(|t| t.class == TimelineClass::Organic) {
        let report = analyze_market(&market_view(timeline, timeline.end_ts_ms()));
        assert!(
            !report.is_rug_pull,
            "organic flagged (confidence {})",
            report.rug_confidence
        );
    }
}

#[test]
fn detection_survives_time_stretching() {
    // Slowing the same rug down must not hide it from the detectors.
    let mut generator = TimelineGenerator::with_seed(31);
    let mut timeline = generator.classic_rug(LAUNCH);

    time_stretch(&mut timeline, 2.0);
    assert!(timeline.is_ordered());

    let report = analyze_market(&market_view(&timeline, timeline.end_ts_ms()));
    assert!(report.is_rug_pull, "confidence {}", report.rug_confidence);
}

#[test]
fn detection_survives_moderate_compression() {
    let mut generator = TimelineGenerator::with_seed(35);
    let mut timeline = generator.classic_rug(LAUNCH);

    time_stretch(&mut timeline, 0.75);
    assert!(timeline.is_ordered());

    let report = analyze_market(&market_view(&timeline, timeline.end_ts_ms()));
    assert!(report.is_rug_pull, "confidence {}", report.rug_confidence);
}

#[test]
fn mutations_preserve_ordering_under_composition() {
    let mut generator = TimelineGenerator::with_seed(32);
    let mut timeline = generator.perfect_crime(LAUNCH);
    let mut rng = StdRng::seed_from_u64(99);

    inject_snipers(&mut timeline, &mut rng, 12, 45_000);
    time_stretch(&mut timeline, 2.5);
    wash_loop(
        &mut timeline,
        "washA",
        "washB",
        15,
        200.0,
        LAUNCH + 600_000,
        90_000,
    );
    time_stretch(&mut timeline, 0.8);

    assert!(timeline.is_ordered());
    assert_eq!(timeline.txs.iter().filter(|tx| tx.is_sniper_buy).count(), 12);
    assert_eq!(timeline.txs.iter().filter(|tx| tx.is_wash_trade).count(), 30);
    // Ground-truth labels ride along untouched.
    assert_eq!(timeline.class, TimelineClass::PerfectCrime);
    assert!(timeline.txs.iter().any(|tx| tx.is_rug_edge));
}

#[test]
fn sniper_injection_lands_inside_launch_window() {
    let mut generator = TimelineGenerator::with_seed(33);
    let mut timeline = generator.organic(LAUNCH);
    let mut rng = StdRng::seed_from_u64(7);

    inject_snipers(&mut timeline, &mut rng, 25, 60_000);

    for tx in timeline.txs.iter().filter(|tx| tx.is_sniper_buy) {
        assert!(tx.timestamp_ms >= LAUNCH);
        assert!(tx.timestamp_ms < LAUNCH + 60_000);
        assert!(tx.amount > 0.0);
    }
}

#[test]
fn wash_loops_add_volume_without_moving_net_flow() {
    let mut generator = TimelineGenerator::with_seed(34);
    let mut timeline = generator.organic(LAUNCH);

    let volume_before: f64 = timeline.txs.iter().map(|tx| tx.amount.abs()).sum();
    let net_before: f64 = timeline.txs.iter().map(|tx| tx.amount).sum();

    wash_loop(&mut timeline, "a", "b", 25, 300.0, LAUNCH + 1_000, 60_000);

    let volume_after: f64 = timeline.txs.iter().map(|tx| tx.amount.abs()).sum();
    let net_after: f64 = timeline.txs.iter().map(|tx| tx.amount).sum();

    assert!((net_after - net_before).abs() < 1e-6);
    assert!((volume_after - volume_before - 25.0 * 300.0 * 2.0).abs() < 1e-6);
}
