//! The metrics engine - executive figures from raw records.
//!
//! COMPUTATION ORDER (a later step may read an earlier one):
//!   1. Totals         customers (floored to 1), balances, average
//!   2. Revenue        booked-loan revenue + deposit margin, revenue health
//!   3. Customers      active / at-risk counts, churn rate, customer health
//!   4. Segments       buckets, revenue by segment, RFM distribution
//!   5. Campaigns      campaign summary
//!   6. Pipeline       stage counts, operations health
//!   7. Trends         AUM and revenue series, month-on-month change
//!   8. Alerts         threshold rules, in emission order
//!   9. Predictive     forecast, churn-risk value, cross-sell
//!
//! RULES:
//!   - compute() is pure: same records + same context = same output.
//!   - All randomness flows through the context's JitterBank.
//!   - compute() never fails. Missing fields were defaulted at load time.

use crate::{
    alert::{self, AlertInputs},
    config::DashboardConfig,
    context::ComputeContext,
    metrics::{health_score, CampaignSummary, ExecutiveMetrics, PipelineSummary, StageCount},
    records::{CampaignRecord, CampaignStatus, CustomerRecord, LoanApplicationRecord, LoanStage},
    rng::JitterSlot,
    segment,
    trend::{self, TrendGenerator},
};

pub struct MetricsEngine {
    config: DashboardConfig,
}

impl MetricsEngine {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn compute(
        &self,
        customers: &[CustomerRecord],
        campaigns: &[CampaignRecord],
        applications: &[LoanApplicationRecord],
        ctx: &ComputeContext,
    ) -> ExecutiveMetrics {
        let cfg = &self.config;
        let bank = ctx.jitter_bank();

        // ── 1. Totals ──────────────────────────────────────────
        let total_customers = customers.len().max(1);
        let total_balance: f64 = customers.iter().map(CustomerRecord::safe_balance).sum();
        let avg_balance = total_balance / total_customers as f64;

        // ── 2. Revenue ─────────────────────────────────────────
        let loan_revenue: f64 = applications
            .iter()
            .filter(|a| a.stage.is_revenue_bearing())
            .map(|a| a.safe_amount() * cfg.revenue.loan_revenue_rate)
            .sum();
        let total_revenue = loan_revenue + total_balance * cfg.revenue.deposit_margin_rate;
        let revenue_target = cfg.revenue.revenue_target;
        let revenue_health = health_score(total_revenue / revenue_target * 100.0);

        // ── 3. Customers ───────────────────────────────────────
        let churn_segment = cfg.segments.churn_segment.as_str();
        let active_customers = customers
            .iter()
            .filter(|c| {
                c.segment
                    .as_deref()
                    .is_some_and(|s| cfg.segments.active_segments.iter().any(|a| a == s))
            })
            .count();
        let at_risk: Vec<&CustomerRecord> =
            customers.iter().filter(|c| c.in_segment(churn_segment)).collect();
        let at_risk_customers = at_risk.len();
        let at_risk_balance: f64 = at_risk.iter().map(|c| c.safe_balance()).sum();

        let active_ratio = active_customers as f64 / total_customers as f64;
        let churn_ratio = at_risk_customers as f64 / total_customers as f64;
        let churn_rate = churn_ratio * 100.0;
        let customer_health =
            health_score((active_ratio * 100.0 + (100.0 - churn_ratio * 100.0)) / 2.0);

        // ── 4. Segments ────────────────────────────────────────
        let buckets = segment::bucket_by_segment(customers);
        let revenue_by_segment =
            segment::revenue_by_segment(&buckets, cfg.revenue.deposit_margin_rate);
        let mut segment_rng = bank.for_slot(JitterSlot::SegmentTrend);
        let rfm_distribution =
            segment::rfm_distribution(&buckets, cfg.segments.segment_trend_span, &mut segment_rng);

        // ── 5. Campaigns ───────────────────────────────────────
        let campaign_summary = summarize_campaigns(campaigns);

        // ── 6. Pipeline ────────────────────────────────────────
        let pipeline = summarize_pipeline(applications);
        let decided = pipeline.revenue_bearing + pipeline.rejected;
        let operations_health = if decided == 0 {
            100
        } else {
            health_score(pipeline.revenue_bearing as f64 / decided as f64 * 100.0)
        };
        let overall_health = health_score(
            (revenue_health as f64 + customer_health as f64 + operations_health as f64) / 3.0,
        );

        // ── 7. Trends ──────────────────────────────────────────
        let generator = TrendGenerator::new(&cfg.trend);
        let aum_trend = generator.monthly_series(
            total_balance,
            ctx.as_of,
            None,
            &mut bank.for_slot(JitterSlot::AumTrend),
        );
        let revenue_trend = generator.monthly_series(
            total_revenue,
            ctx.as_of,
            Some(revenue_target),
            &mut bank.for_slot(JitterSlot::RevenueTrend),
        );
        let aum_change_pct = trend::last_change_pct(&aum_trend);
        let revenue_change_pct = trend::last_change_pct(&revenue_trend);

        // ── 8. Alerts ──────────────────────────────────────────
        let alert_inputs = AlertInputs {
            empty_book: customers.is_empty() && applications.is_empty(),
            churn_segment,
            at_risk_customers,
            at_risk_balance,
            total_revenue,
            revenue_target,
            revenue_health,
        };
        let critical_alerts = alert::evaluate(
            &alert_inputs,
            &cfg.alerts,
            ctx.as_of,
            &mut bank.for_slot(JitterSlot::AlertIds),
        );
        for a in &critical_alerts {
            log::warn!("alert {:?}/{:?}: {}", a.alert_type, a.severity, a.description);
        }

        // ── 9. Predictive ──────────────────────────────────────
        let predictive = &cfg.predictive;
        let forecast_revenue = trend::trailing_mean(&revenue_trend, predictive.forecast_window)
            * predictive.forecast_uplift;

        let (churn_risk_customers, churn_risk_value) = at_risk
            .iter()
            .filter(|c| c.safe_balance() > avg_balance)
            .fold((0usize, 0.0f64), |(n, v), c| (n + 1, v + c.safe_balance()));

        let cross_sell_floor = avg_balance * predictive.cross_sell_balance_multiple;
        let cross_sell_opportunities = customers
            .iter()
            .filter(|c| {
                c.products.len() < predictive.cross_sell_max_products
                    && c.safe_balance() > cross_sell_floor
            })
            .count();
        let cross_sell_potential =
            cross_sell_opportunities as f64 * avg_balance * predictive.cross_sell_uptake;

        log::debug!(
            "metrics: customers={} balance={:.0} revenue={:.0} health r/c/o={}/{}/{} alerts={}",
            customers.len(),
            total_balance,
            total_revenue,
            revenue_health,
            customer_health,
            operations_health,
            critical_alerts.len()
        );

        ExecutiveMetrics {
            computed_at: ctx.as_of,
            total_customers,
            total_balance,
            avg_balance,
            loan_revenue,
            total_revenue,
            revenue_target,
            aum_change_pct,
            revenue_change_pct,
            active_customers,
            at_risk_customers,
            churn_rate,
            revenue_health,
            customer_health,
            operations_health,
            overall_health,
            aum_trend,
            revenue_trend,
            revenue_by_segment,
            rfm_distribution,
            campaigns: campaign_summary,
            pipeline,
            forecast_revenue,
            churn_risk_customers,
            churn_risk_value,
            cross_sell_opportunities,
            cross_sell_potential,
            critical_alerts,
        }
    }
}

impl Default for MetricsEngine {
    fn default() -> Self { Self::new(DashboardConfig::default()) }
}

/// Aggregate with the reference configuration.
pub fn compute_metrics(
    customers: &[CustomerRecord],
    campaigns: &[CampaignRecord],
    applications: &[LoanApplicationRecord],
    ctx: &ComputeContext,
) -> ExecutiveMetrics {
    MetricsEngine::default().compute(customers, campaigns, applications, ctx)
}

fn summarize_campaigns(campaigns: &[CampaignRecord]) -> CampaignSummary {
    let mut summary = CampaignSummary {
        total: campaigns.len(),
        ..CampaignSummary::default()
    };
    for c in campaigns {
        if c.status == CampaignStatus::Active {
            summary.active += 1;
        }
        summary.budget += crate::records::finite_or_zero(c.budget);
        summary.spent += crate::records::finite_or_zero(c.spent);
        summary.reached += c.reached;
        summary.conversions += c.conversions;
    }
    if summary.reached > 0 {
        summary.conversion_rate = summary.conversions as f64 / summary.reached as f64 * 100.0;
    }
    if summary.budget > 0.0 {
        summary.budget_utilization = summary.spent / summary.budget * 100.0;
    }
    summary
}

fn summarize_pipeline(applications: &[LoanApplicationRecord]) -> PipelineSummary {
    let by_stage: Vec<StageCount> = LoanStage::ALL
        .into_iter()
        .filter_map(|stage| {
            let (count, amount) = applications
                .iter()
                .filter(|a| a.stage == stage)
                .fold((0usize, 0.0f64), |(n, v), a| (n + 1, v + a.safe_amount()));
            (count > 0).then_some(StageCount { stage, count, amount })
        })
        .collect();

    PipelineSummary {
        applications:    applications.len(),
        revenue_bearing: applications.iter().filter(|a| a.stage.is_revenue_bearing()).count(),
        rejected:        applications.iter().filter(|a| a.stage == LoanStage::Rejected).count(),
        pipeline_value:  applications
            .iter()
            .filter(|a| a.stage.is_in_flight())
            .map(LoanApplicationRecord::safe_amount)
            .sum(),
        by_stage,
    }
}
