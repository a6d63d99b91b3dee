//! Desk configuration - engine constants and the role matrix.
//!
//! Loaded from JSON files under a data directory. Every section has
//! reference defaults, so a partial file only overrides what it names.
//! In tests, use DashboardConfig::default().

use crate::{
    error::{DeskError, DeskResult},
    permission::{Capability, PermissionTable, Role},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const METRICS_CONFIG_FILE: &str = "dashboard/metrics_config.json";
pub const ROLE_MATRIX_FILE: &str = "permissions/role_matrix.json";

// ── Revenue ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RevenueConfig {
    /// Revenue at which revenue health reads 100.
    pub revenue_target: f64,
    /// Share of a booked loan's amount counted as revenue.
    pub loan_revenue_rate: f64,
    /// Share of deposit balances counted as revenue (also used per segment).
    pub deposit_margin_rate: f64,
}

impl Default for RevenueConfig {
    fn default() -> Self {
        Self {
            revenue_target:      100_000_000.0,
            loan_revenue_rate:   0.05,
            deposit_margin_rate: 0.02,
        }
    }
}

// ── Customer segments ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmentRules {
    /// Segments counted as active customers.
    pub active_segments: Vec<String>,
    /// Segment counted as churn risk.
    pub churn_segment: String,
    /// Width of the seeded per-segment trend figure, in percentage points.
    pub segment_trend_span: f64,
}

impl Default for SegmentRules {
    fn default() -> Self {
        Self {
            active_segments:    vec!["Champions".into(), "Loyal Customers".into()],
            churn_segment:      "At Risk".into(),
            segment_trend_span: 20.0,
        }
    }
}

// ── Trend series ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrendConfig {
    pub months: usize,
    /// Multiplier drop per month further in the past.
    pub decay_per_month: f64,
    /// Total jitter width applied to each past point (0.04 = ±2%).
    pub jitter: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            months:          12,
            decay_per_month: 0.02,
            jitter:          0.04,
        }
    }
}

// ── Alerts ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertThresholds {
    /// CHURN_RISK fires when at-risk customers exceed this count.
    pub churn_risk_count: usize,
    /// TARGET_MISS fires when revenue health is below this score.
    pub revenue_health_floor: u8,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            churn_risk_count:     5,
            revenue_health_floor: 70,
        }
    }
}

// ── Predictive fields ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredictiveConfig {
    pub forecast_window:            usize,
    pub forecast_uplift:            f64,
    /// Customers holding fewer products than this are cross-sell candidates.
    pub cross_sell_max_products:    usize,
    pub cross_sell_balance_multiple: f64,
    pub cross_sell_uptake:          f64,
}

impl Default for PredictiveConfig {
    fn default() -> Self {
        Self {
            forecast_window:             3,
            forecast_uplift:             1.08,
            cross_sell_max_products:     2,
            cross_sell_balance_multiple: 1.5,
            cross_sell_uptake:           0.10,
        }
    }
}

// ── Role matrix ────────────────────────────────────────────────────

/// One row of a role matrix file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleGrant {
    pub role: Role,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    #[serde(default)]
    pub requires_step_up_auth: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct RoleMatrixFile {
    roles: Vec<RoleGrant>,
}

// ── Top level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub revenue:    RevenueConfig,
    pub segments:   SegmentRules,
    pub trend:      TrendConfig,
    pub alerts:     AlertThresholds,
    pub predictive: PredictiveConfig,
    /// Overrides the reference role matrix when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_matrix: Option<Vec<RoleGrant>>,
}

impl DashboardConfig {
    /// Load from a data directory.
    ///
    /// `dashboard/metrics_config.json` is required; the role matrix file
    /// is optional and falls back to the reference matrix.
    pub fn load(data_dir: impl AsRef<Path>) -> DeskResult<Self> {
        let data_dir = data_dir.as_ref();

        let path = data_dir.join(METRICS_CONFIG_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| DeskError::Config {
            path:   path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut config: DashboardConfig =
            serde_json::from_str(&content).map_err(|e| DeskError::Config {
                path:   path.display().to_string(),
                reason: e.to_string(),
            })?;

        let matrix_path = data_dir.join(ROLE_MATRIX_FILE);
        if matrix_path.exists() {
            let matrix_content = std::fs::read_to_string(&matrix_path)?;
            let file: RoleMatrixFile =
                serde_json::from_str(&matrix_content).map_err(|e| DeskError::Config {
                    path:   matrix_path.display().to_string(),
                    reason: e.to_string(),
                })?;
            config.role_matrix = Some(file.roles);
        } else if config.role_matrix.is_none() {
            log::warn!(
                "{} not found; using the reference role matrix",
                matrix_path.display()
            );
        }

        config.validate()?;
        log::debug!("config loaded from {}", data_dir.display());
        Ok(config)
    }

    pub fn validate(&self) -> DeskResult<()> {
        let positive = [
            ("revenue.revenue_target", self.revenue.revenue_target),
            ("predictive.forecast_uplift", self.predictive.forecast_uplift),
            ("predictive.cross_sell_balance_multiple", self.predictive.cross_sell_balance_multiple),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(DeskError::InvalidConfig(format!("{name} must be > 0, got {value}")));
            }
        }

        let rates = [
            ("revenue.loan_revenue_rate", self.revenue.loan_revenue_rate),
            ("revenue.deposit_margin_rate", self.revenue.deposit_margin_rate),
            ("trend.decay_per_month", self.trend.decay_per_month),
            ("trend.jitter", self.trend.jitter),
            ("predictive.cross_sell_uptake", self.predictive.cross_sell_uptake),
        ];
        for (name, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(DeskError::InvalidConfig(format!("{name} must be in [0, 1], got {value}")));
            }
        }

        if self.trend.months < 2 {
            return Err(DeskError::InvalidConfig("trend.months must be >= 2".into()));
        }
        if self.predictive.forecast_window == 0 {
            return Err(DeskError::InvalidConfig("predictive.forecast_window must be >= 1".into()));
        }
        if self.alerts.revenue_health_floor > 100 {
            return Err(DeskError::InvalidConfig("alerts.revenue_health_floor must be <= 100".into()));
        }

        if let Some(grants) = &self.role_matrix {
            PermissionTable::from_grants(grants)?;
        }
        Ok(())
    }

    /// The permission table this configuration describes.
    pub fn permission_table(&self) -> DeskResult<PermissionTable> {
        match &self.role_matrix {
            Some(grants) => PermissionTable::from_grants(grants),
            None => Ok(PermissionTable::standard()),
        }
    }
}
