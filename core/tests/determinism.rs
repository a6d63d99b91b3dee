//! Same records + same context must produce identical metrics.
//! Any divergence means something bypassed the seeded jitter streams.

use chrono::{TimeZone, Utc};
use opsdesk_core::{
    context::ComputeContext,
    engine::MetricsEngine,
    sample::SampleBook,
};

fn ctx(seed: u64) -> ComputeContext {
    ComputeContext::new(seed, Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap())
}

#[test]
fn same_seed_produces_identical_metrics() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;

    let book = SampleBook::generate(SEED, 750);
    let engine = MetricsEngine::default();

    let a = book.compute_with(&engine, &ctx(SEED));
    let b = book.compute_with(&engine, &ctx(SEED));

    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap(),
        "serialized metrics diverged"
    );
}

#[test]
fn different_seeds_change_only_jittered_figures() {
    let book = SampleBook::generate(7, 300);
    let engine = MetricsEngine::default();

    let a = book.compute_with(&engine, &ctx(42));
    let b = book.compute_with(&engine, &ctx(99));

    // Ledger figures do not depend on the seed.
    assert_eq!(a.total_balance, b.total_balance);
    assert_eq!(a.total_revenue, b.total_revenue);
    assert_eq!(a.revenue_health, b.revenue_health);
    assert_eq!(a.aum_trend.last(), b.aum_trend.last());

    // Synthetic history does.
    let any_different = a.aum_trend.iter().zip(&b.aum_trend).any(|(x, y)| x.value != y.value);
    assert!(any_different, "different seeds produced identical trends - seed is not being used");
}

#[test]
fn sample_book_triggers_realistic_alerts() {
    let _ = env_logger::builder().is_test(true).try_init();

    let book = SampleBook::generate(2026, 1_000);
    let m = book.compute_with(&MetricsEngine::default(), &ctx(2026));

    assert_eq!(m.total_customers, 1_000);
    assert!(m.at_risk_customers > 5, "a 12% at-risk mix should exceed the threshold");
    assert!(!m.critical_alerts.is_empty());
    assert!(m.revenue_health <= 100 && m.customer_health <= 100 && m.overall_health <= 100);
}
