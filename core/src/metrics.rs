//! ExecutiveMetrics - the engine's sole output.
//!
//! A value, recomputed on demand from current records. Nothing here is
//! persisted or updated incrementally. Every figure is raw: currency is
//! a plain f64, percentages are plain numbers, and formatting belongs to
//! whoever renders them.

use crate::{alert::CriticalAlert, records::LoanStage, types::Timestamp};
use serde::{Deserialize, Serialize};

/// 0–100 integral indicator.
pub type HealthScore = u8;

/// Round and clamp a raw score into [0, 100]. NaN reads as 0.
pub fn health_score(raw: f64) -> HealthScore {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as HealthScore
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Calendar month, `YYYY-MM`.
    pub period: String,
    pub value:  f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRevenue {
    pub segment: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RfmBucket {
    pub segment: String,
    pub count:   usize,
    pub value:   f64,
    /// Signed percentage, unclamped.
    pub trend:   f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub total:              usize,
    pub active:             usize,
    pub budget:             f64,
    pub spent:              f64,
    pub reached:            u64,
    pub conversions:        u64,
    /// conversions / reached, as a percentage. 0 when nobody was reached.
    pub conversion_rate:    f64,
    /// spent / budget, as a percentage. 0 when there is no budget.
    pub budget_utilization: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageCount {
    pub stage:  LoanStage,
    pub count:  usize,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub applications:    usize,
    pub revenue_bearing: usize,
    pub rejected:        usize,
    /// Amount still in flight (not yet booked, not rejected).
    pub pipeline_value:  f64,
    /// Non-empty stages only, in pipeline order.
    pub by_stage:        Vec<StageCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveMetrics {
    pub computed_at: Timestamp,

    // ── Totals ─────────────────────────────────────
    /// Customer count, floored to 1 so it is always a safe denominator.
    pub total_customers: usize,
    pub total_balance:   f64,
    pub avg_balance:     f64,
    pub loan_revenue:    f64,
    pub total_revenue:   f64,
    pub revenue_target:  f64,

    // ── Changes (signed, unclamped) ────────────────
    pub aum_change_pct:     f64,
    pub revenue_change_pct: f64,

    // ── Customers ──────────────────────────────────
    pub active_customers:  usize,
    pub at_risk_customers: usize,
    /// At-risk share of customers, as a percentage.
    pub churn_rate:        f64,

    // ── Health ─────────────────────────────────────
    pub revenue_health:    HealthScore,
    pub customer_health:   HealthScore,
    pub operations_health: HealthScore,
    pub overall_health:    HealthScore,

    // ── Series ─────────────────────────────────────
    pub aum_trend:     Vec<TrendPoint>,
    pub revenue_trend: Vec<TrendPoint>,

    // ── Distributions ──────────────────────────────
    pub revenue_by_segment: Vec<SegmentRevenue>,
    pub rfm_distribution:   Vec<RfmBucket>,
    pub campaigns:          CampaignSummary,
    pub pipeline:           PipelineSummary,

    // ── Predictive ─────────────────────────────────
    pub forecast_revenue:         f64,
    pub churn_risk_customers:     usize,
    pub churn_risk_value:         f64,
    pub cross_sell_opportunities: usize,
    pub cross_sell_potential:     f64,

    pub critical_alerts: Vec<CriticalAlert>,
}

impl ExecutiveMetrics {
    /// Append an alert sourced outside this computation
    /// (SLA breaches, compliance findings, team performance).
    pub fn push_alert(&mut self, alert: CriticalAlert) {
        self.critical_alerts.push(alert);
    }

    pub fn alerts_of(&self, alert_type: crate::alert::AlertType) -> impl Iterator<Item = &CriticalAlert> {
        self.critical_alerts.iter().filter(move |a| a.alert_type == alert_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_score_clamps_and_rounds() {
        assert_eq!(health_score(-12.0), 0);
        assert_eq!(health_score(49.5), 50);
        assert_eq!(health_score(1e12), 100);
        assert_eq!(health_score(f64::INFINITY), 100);
        assert_eq!(health_score(f64::NAN), 0);
    }
}
