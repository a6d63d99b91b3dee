//! Raw input records consumed by the metrics engine.
//!
//! RULE: every field is defaulted. A partial record from the data
//! layer must load and aggregate, never fail.

use crate::types::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: EntityId,
    pub name: Option<String>,
    pub balance: f64,
    /// RFM segment label, e.g. "Champions", "At Risk". Opaque to the core.
    pub segment: Option<String>,
    pub products: Vec<String>,
}

impl CustomerRecord {
    pub fn new(id: impl Into<EntityId>, balance: f64) -> Self {
        Self {
            id: id.into(),
            balance,
            ..Self::default()
        }
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn with_products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = products.into_iter().map(Into::into).collect();
        self
    }

    /// Balance with NaN treated as zero.
    pub fn safe_balance(&self) -> f64 {
        finite_or_zero(self.balance)
    }

    pub fn in_segment(&self, segment: &str) -> bool {
        self.segment.as_deref() == Some(segment)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CampaignRecord {
    pub id: EntityId,
    pub name: String,
    pub status: CampaignStatus,
    pub budget: f64,
    pub spent: f64,
    pub reached: u64,
    pub conversions: u64,
}

/// Loan pipeline stage. Only `Disbursement` and `Active` bear revenue.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LoanStage {
    Application,
    Documentation,
    Underwriting,
    Approval,
    Disbursement,
    Active,
    Rejected,
    #[default]
    #[serde(other)]
    Unknown,
}

impl LoanStage {
    pub const ALL: [LoanStage; 8] = [
        LoanStage::Application,
        LoanStage::Documentation,
        LoanStage::Underwriting,
        LoanStage::Approval,
        LoanStage::Disbursement,
        LoanStage::Active,
        LoanStage::Rejected,
        LoanStage::Unknown,
    ];

    pub fn is_revenue_bearing(&self) -> bool {
        matches!(self, Self::Disbursement | Self::Active)
    }

    /// Still moving through the pipeline: neither booked nor rejected.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::Application | Self::Documentation | Self::Underwriting | Self::Approval
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Documentation => "documentation",
            Self::Underwriting => "underwriting",
            Self::Approval => "approval",
            Self::Disbursement => "disbursement",
            Self::Active => "active",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LoanApplicationRecord {
    pub id: EntityId,
    pub customer_id: Option<EntityId>,
    pub stage: LoanStage,
    pub amount: f64,
}

impl LoanApplicationRecord {
    pub fn new(id: impl Into<EntityId>, stage: LoanStage, amount: f64) -> Self {
        Self {
            id: id.into(),
            customer_id: None,
            stage,
            amount,
        }
    }

    pub fn safe_amount(&self) -> f64 {
        finite_or_zero(self.amount)
    }
}

/// The three collections the engine consumes, as a loader would hand
/// them over. Absent collections deserialize as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordSet {
    pub customers: Vec<CustomerRecord>,
    pub campaigns: Vec<CampaignRecord>,
    pub applications: Vec<LoanApplicationRecord>,
}

impl RecordSet {
    pub fn from_json(json: &str) -> crate::error::DeskResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn compute_with(
        &self,
        engine: &crate::engine::MetricsEngine,
        ctx: &crate::context::ComputeContext,
    ) -> crate::metrics::ExecutiveMetrics {
        engine.compute(&self.customers, &self.campaigns, &self.applications, ctx)
    }
}

pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_records_load_with_defaults() {
        let json = r#"{
            "customers": [ { "id": "c-1" }, { "balance": 250.0, "segment": "Champions" } ],
            "applications": [ { "stage": "disbursement", "amount": 10.0 }, { "stage": "mystery" } ]
        }"#;
        let set = RecordSet::from_json(json).unwrap();

        assert_eq!(set.customers.len(), 2);
        assert_eq!(set.customers[0].balance, 0.0);
        assert!(set.customers[0].segment.is_none());
        assert!(set.customers[0].products.is_empty());
        assert!(set.campaigns.is_empty());
        assert_eq!(set.applications[1].stage, LoanStage::Unknown);
        assert!(set.applications[0].stage.is_revenue_bearing());
    }

    #[test]
    fn nan_balances_count_as_zero() {
        let c = CustomerRecord::new("c-1", f64::NAN);
        assert_eq!(c.safe_balance(), 0.0);
    }
}
