//! metrics-runner: headless executive dashboard for the ops desk.
//!
//! Usage:
//!   metrics-runner --seed 12345 --customers 500 --role admin --verified
//!   metrics-runner --records book.json --data-dir ./data --role marketing --json

mod format;

use anyhow::{Context, Result};
use opsdesk_core::{
    alert::{AlertMetric, AlertType, CriticalAlert, MetricKind},
    config::{DashboardConfig, METRICS_CONFIG_FILE},
    context::ComputeContext,
    engine::MetricsEngine,
    metrics::ExecutiveMetrics,
    permission::{Capability, Role},
    records::RecordSet,
    sample::SampleBook,
    session::{AuthorizationSession, DEFAULT_ROLE},
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let customers = parse_arg(&args, "--customers", 500usize);
    let verified = args.iter().any(|a| a == "--verified");
    let json = args.iter().any(|a| a == "--json");
    let records_path = flag_value(&args, "--records");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let role = match flag_value(&args, "--role") {
        Some(text) => text.parse::<Role>()?,
        None => DEFAULT_ROLE,
    };

    let config = if Path::new(data_dir).join(METRICS_CONFIG_FILE).exists() {
        DashboardConfig::load(data_dir)?
    } else {
        log::warn!("no config under {data_dir}; using reference defaults");
        DashboardConfig::default()
    };
    let table = config.permission_table()?;

    let mut session = AuthorizationSession::new(&table);
    session.set_role(role);
    if verified {
        // Stands in for the external MFA flow.
        session.set_step_up_verified(true);
    }

    let records = match records_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read {path}"))?;
            RecordSet::from_json(&content)?
        }
        None => SampleBook::generate(seed, customers),
    };

    let engine = MetricsEngine::new(config);
    let ctx = ComputeContext::now(seed);
    let metrics = records.compute_with(&engine, &ctx);

    if json {
        if session.can_exercise(Capability::ExportData) {
            println!("{}", serde_json::to_string_pretty(&metrics)?);
            return Ok(());
        }
        log::warn!(
            "role {} may not export data{}; printing summary instead",
            session.current_role().name(),
            if session.has_capability(Capability::ExportData) { " without step-up" } else { "" }
        );
    }

    print_summary(&metrics, &session, seed);
    Ok(())
}

fn print_summary(m: &ExecutiveMetrics, session: &AuthorizationSession<'_>, seed: u64) {
    let sensitive = session.can_exercise(Capability::ViewSensitiveData);

    println!("Ops Desk - executive summary");
    println!("  as of:     {}", m.computed_at.format("%Y-%m-%d %H:%M UTC"));
    println!("  seed:      {seed}");
    println!(
        "  role:      {}{}",
        session.current_role(),
        match (session.requires_step_up(), session.is_step_up_verified()) {
            (true, true) => " (step-up verified)",
            (true, false) => " (step-up pending)",
            _ => "",
        }
    );
    println!();

    println!("=== BOOK ===");
    println!("  customers:       {}", m.total_customers);
    println!("  AUM:             {} ({})", format::currency(m.total_balance), format::signed_percent(m.aum_change_pct));
    println!("  avg balance:     {}", format::currency(m.avg_balance));
    println!("  revenue:         {} ({})", format::currency(m.total_revenue), format::signed_percent(m.revenue_change_pct));
    println!("  target:          {}", format::currency(m.revenue_target));
    println!("  forecast:        {}", format::currency(m.forecast_revenue));
    println!("  churn rate:      {}", format::percent(m.churn_rate));
    println!();

    println!("=== HEALTH ===");
    println!("  revenue:         {}", m.revenue_health);
    println!("  customer:        {}", m.customer_health);
    println!("  operations:      {}", m.operations_health);
    println!("  overall:         {}", m.overall_health);
    println!();

    println!("=== SEGMENTS ===");
    for (bucket, revenue) in m.rfm_distribution.iter().zip(&m.revenue_by_segment) {
        println!(
            "  {:<20} {:>6} customers  {:>10}  revenue {:>9}  {}",
            bucket.segment,
            bucket.count,
            format::currency(bucket.value),
            format::currency(revenue.revenue),
            format::signed_percent(bucket.trend)
        );
    }
    println!();

    println!("=== PIPELINE & CAMPAIGNS ===");
    println!("  applications:    {} ({} booked, {} rejected)", m.pipeline.applications, m.pipeline.revenue_bearing, m.pipeline.rejected);
    println!("  in flight:       {}", format::currency(m.pipeline.pipeline_value));
    for stage in &m.pipeline.by_stage {
        println!("    {:<15} {:>5}  {:>9}", stage.stage.name(), stage.count, format::currency(stage.amount));
    }
    println!("  campaigns:       {} ({} active)", m.campaigns.total, m.campaigns.active);
    println!("  conversion:      {}", format::percent(m.campaigns.conversion_rate));
    println!("  budget used:     {}", format::percent(m.campaigns.budget_utilization));
    println!();

    println!("=== OPPORTUNITIES ===");
    println!("  cross-sell:      {} customers, {}", m.cross_sell_opportunities, format::currency(m.cross_sell_potential));
    if sensitive {
        println!("  churn exposure:  {} customers, {}", m.churn_risk_customers, format::currency(m.churn_risk_value));
    } else {
        println!("  churn exposure:  {} customers", m.churn_risk_customers);
    }
    println!();

    println!("=== ALERTS ===");
    if m.critical_alerts.is_empty() {
        println!("  (none)");
    }
    for a in &m.critical_alerts {
        println!("  [{:?}] {}: {}", a.severity, a.title, a.description);
        for metric in &a.metrics {
            if !sensitive && is_customer_exposure(a, metric) {
                continue;
            }
            println!("      {}", format::metric(metric));
        }
        if let Some(action) = &a.action {
            println!("      -> {action}");
        }
    }
}

/// Customer balances behind an alert. Book-level figures such as revenue
/// and target are printed openly in the summary anyway.
fn is_customer_exposure(alert: &CriticalAlert, metric: &AlertMetric) -> bool {
    alert.alert_type == AlertType::ChurnRisk && metric.kind == MetricKind::Currency
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk_core::{
        alert::{self, AlertInputs},
        config::AlertThresholds,
        rng::{JitterBank, JitterSlot},
    };

    #[test]
    fn only_churn_balances_count_as_customer_exposure() {
        let inputs = AlertInputs {
            empty_book:        false,
            churn_segment:     "At Risk",
            at_risk_customers: 9,
            at_risk_balance:   2_500_000.0,
            total_revenue:     10_000_000.0,
            revenue_target:    100_000_000.0,
            revenue_health:    10,
        };
        let mut rng = JitterBank::new(3).for_slot(JitterSlot::AlertIds);
        let alerts = alert::evaluate(
            &inputs,
            &AlertThresholds::default(),
            ComputeContext::now(3).as_of,
            &mut rng,
        );
        assert_eq!(alerts.len(), 2);

        let hidden: Vec<&str> = alerts
            .iter()
            .flat_map(|a| a.metrics.iter().filter(move |m| is_customer_exposure(a, m)))
            .map(|m| m.label.as_str())
            .collect();
        assert_eq!(hidden, vec!["Balance at risk"]);
    }
}
