//! Critical alerts - threshold rules over one aggregation's figures.
//!
//! Rules are evaluated independently, in a fixed order; that order is
//! the emission order. Alerts are generated fresh on every call and
//! never deduplicated across calls.

use crate::{
    config::AlertThresholds,
    rng::JitterRng,
    types::Timestamp,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    ChurnRisk,
    TargetMiss,
    // Reserved for collaborator-sourced alerts; the engine never raises these.
    SlaBreach,
    Compliance,
    TeamPerformance,
}

/// How a display layer should render a metric value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Count,
    Currency,
    Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertMetric {
    pub label: String,
    pub value: f64,
    pub kind:  MetricKind,
}

impl AlertMetric {
    pub fn new(label: impl Into<String>, value: f64, kind: MetricKind) -> Self {
        Self { label: label.into(), value, kind }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CriticalAlert {
    pub id:          Uuid,
    pub severity:    Severity,
    #[serde(rename = "type")]
    pub alert_type:  AlertType,
    pub title:       String,
    pub description: String,
    #[serde(default)]
    pub metrics:     Vec<AlertMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action:      Option<String>,
    pub created_at:  Timestamp,
}

impl CriticalAlert {
    pub fn new(
        id: Uuid,
        severity: Severity,
        alert_type: AlertType,
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            severity,
            alert_type,
            title: title.into(),
            description: description.into(),
            metrics: Vec::new(),
            action: None,
            created_at,
        }
    }

    pub fn with_metric(mut self, metric: AlertMetric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// Figures the alert rules read.
#[derive(Debug, Clone)]
pub struct AlertInputs<'a> {
    /// No customers and no loan applications at all.
    pub empty_book:        bool,
    pub churn_segment:     &'a str,
    pub at_risk_customers: usize,
    pub at_risk_balance:   f64,
    pub total_revenue:     f64,
    pub revenue_target:    f64,
    pub revenue_health:    u8,
}

/// Evaluate every rule in emission order.
///
/// TARGET_MISS is not raised for an empty book: with no customers and
/// no applications there is no revenue position to judge.
pub fn evaluate(
    inputs: &AlertInputs<'_>,
    thresholds: &AlertThresholds,
    created_at: Timestamp,
    rng: &mut JitterRng,
) -> Vec<CriticalAlert> {
    let mut alerts = Vec::new();

    if inputs.at_risk_customers > thresholds.churn_risk_count {
        alerts.push(
            CriticalAlert::new(
                rng.uuid(),
                Severity::High,
                AlertType::ChurnRisk,
                "Churn risk above threshold",
                format!(
                    "{} customers are in the '{}' segment (threshold {})",
                    inputs.at_risk_customers, inputs.churn_segment, thresholds.churn_risk_count
                ),
                created_at,
            )
            .with_metric(AlertMetric::new(
                "At-risk customers",
                inputs.at_risk_customers as f64,
                MetricKind::Count,
            ))
            .with_metric(AlertMetric::new(
                "Balance at risk",
                inputs.at_risk_balance,
                MetricKind::Currency,
            ))
            .with_action("Launch retention campaign"),
        );
    }

    if !inputs.empty_book && inputs.revenue_health < thresholds.revenue_health_floor {
        alerts.push(
            CriticalAlert::new(
                rng.uuid(),
                Severity::Medium,
                AlertType::TargetMiss,
                "Revenue tracking below target",
                format!(
                    "Revenue health is {} against a floor of {}",
                    inputs.revenue_health, thresholds.revenue_health_floor
                ),
                created_at,
            )
            .with_metric(AlertMetric::new("Revenue", inputs.total_revenue, MetricKind::Currency))
            .with_metric(AlertMetric::new("Target", inputs.revenue_target, MetricKind::Currency))
            .with_metric(AlertMetric::new(
                "Revenue health",
                inputs.revenue_health as f64,
                MetricKind::Percent,
            ))
            .with_action("Review revenue plan"),
        );
    }

    alerts
}
