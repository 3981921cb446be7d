//! Basic example scoring a small multi-feature batch
//!
//! Run with: RUST_LOG=anomaly_core=debug cargo run --example basic -p anomaly-facade

use anomaly_facade::prelude::*;
use anomaly_facade::FeatureAggregation;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anomaly_core=info".into()),
        )
        .init();

    println!("=== Ensemble Anomaly Scoring ===\n");

    // Daily order metrics with two injected anomalies and a gap.
    let mut records: Vec<Record> = (0..60)
        .map(|day| {
            let t = f64::from(day);
            Record::new()
                .with("day", t)
                .with("orders", 120.0 + 8.0 * (t * 0.45).sin())
                .with("refund_rate", 0.02 + 0.004 * (t * 0.8).cos())
        })
        .collect();
    records[17] = Record::new()
        .with("day", 17.0)
        .with("orders", 410.0)
        .with("refund_rate", 0.021);
    records[42] = Record::new()
        .with("day", 42.0)
        .with("orders", 118.0)
        .with("refund_rate", 0.19);
    records[50] = Record::new().with("day", 50.0).with_missing("orders").with("refund_rate", 0.02);
    let dataset = Dataset::new(records);

    // 1. Default ensemble: z-score, IQR and isolation forest
    println!("1. Default ensemble (weights 0.3 / 0.3 / 0.4)");
    let config = EngineConfig::default().with_targets(["orders", "refund_rate"]);
    print_report(&AnomalyEngine::new(config)?.analyze(&dataset)?);

    // 2. All four detectors, max across features, rolling ordered by day
    println!("2. All detectors, max aggregation, rolling window 7");
    let mut config = EngineConfig::default()
        .with_detectors(DetectorKind::ALL.to_vec())
        .with_targets(["orders", "refund_rate"])
        .with_aggregation(FeatureAggregation::Max)
        .with_threshold(0.6);
    config.rolling = anomaly_facade::RollingConfig::new(7).ordered_by("day");
    print_report(&analyze(&dataset, &config)?);

    // 3. Single method
    println!("3. IQR only");
    let config = EngineConfig::default()
        .with_detector_names(&["iqr"])?
        .with_targets(["orders", "refund_rate"]);
    print_report(&analyze(&dataset, &config)?);

    Ok(())
}

fn print_report(report: &ScoreReport) {
    println!(
        "   {} of {} records flagged ({:.1}%, {:?})",
        report.anomaly_count,
        report.total_records,
        report.anomaly_rate * 100.0,
        report.rate_level
    );
    println!(
        "   scores: mean {:.3}, std {:.3}, median {:.3}, max {:.3}",
        report.stats.mean, report.stats.std, report.stats.median, report.stats.max
    );
    for ranked in &report.anomalies {
        print!("   #{:<3} score {:.3}", ranked.index, ranked.score);
        if let Some(detail) = &ranked.detector_scores {
            for d in detail {
                match d.score {
                    Some(s) => print!("  {}={:.2}", d.kind, s),
                    None => print!("  {}=-", d.kind),
                }
            }
        }
        println!();
    }
    for warning in &report.warnings {
        println!("   warning: {warning}");
    }
    if !report.insufficient_data.is_empty() {
        println!("   insufficient data: {:?}", report.insufficient_data);
    }
    println!();
}
