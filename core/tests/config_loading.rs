//! Configuration loading from a data directory.

use opsdesk_core::{
    config::{DashboardConfig, METRICS_CONFIG_FILE, ROLE_MATRIX_FILE},
    error::DeskError,
    permission::{Capability, PermissionTable, Role},
};
use std::path::{Path, PathBuf};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("opsdesk-config-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("dashboard")).unwrap();
    std::fs::create_dir_all(dir.join("permissions")).unwrap();
    dir
}

fn write(dir: &Path, file: &str, content: &str) {
    std::fs::write(dir.join(file), content).unwrap();
}

fn repo_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../data")
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// The shipped data files load and describe the reference setup.
#[test]
fn shipped_config_matches_defaults() {
    let config = DashboardConfig::load(repo_data_dir()).unwrap();

    assert_eq!(config.revenue, DashboardConfig::default().revenue);
    assert_eq!(config.alerts, DashboardConfig::default().alerts);
    assert_eq!(config.permission_table().unwrap(), PermissionTable::standard());
}

#[test]
fn partial_file_keeps_defaults_for_the_rest() {
    let dir = scratch_dir("partial");
    write(&dir, METRICS_CONFIG_FILE, r#"{ "alerts": { "churn_risk_count": 10 } }"#);

    let config = DashboardConfig::load(&dir).unwrap();
    assert_eq!(config.alerts.churn_risk_count, 10);
    assert_eq!(config.alerts.revenue_health_floor, 70);
    assert_eq!(config.revenue.revenue_target, 100_000_000.0);
    assert!(config.role_matrix.is_none());
}

#[test]
fn missing_metrics_file_is_a_config_error() {
    let dir = scratch_dir("missing");
    assert!(matches!(DashboardConfig::load(&dir), Err(DeskError::Config { .. })));
}

#[test]
fn non_positive_revenue_target_is_rejected() {
    let dir = scratch_dir("target");
    write(&dir, METRICS_CONFIG_FILE, r#"{ "revenue": { "revenue_target": 0.0 } }"#);

    assert!(matches!(DashboardConfig::load(&dir), Err(DeskError::InvalidConfig(_))));
}

#[test]
fn role_matrix_file_overrides_reference_table() {
    let dir = scratch_dir("matrix");
    write(&dir, METRICS_CONFIG_FILE, "{}");
    write(
        &dir,
        ROLE_MATRIX_FILE,
        r#"{ "roles": [
            { "role": "admin", "capabilities": ["manage_roles"], "requires_step_up_auth": true },
            { "role": "relationship_manager" },
            { "role": "customer_service" },
            { "role": "marketing", "capabilities": ["canManageCampaigns"] },
            { "role": "viewer", "capabilities": ["view_all_customers", "export_data"] }
        ] }"#,
    );

    let table = DashboardConfig::load(&dir).unwrap().permission_table().unwrap();
    assert!(table.allows(Role::Viewer, Capability::ExportData));
    assert!(!table.allows(Role::Admin, Capability::ViewAllCustomers));
    assert!(table.allows(Role::Marketing, Capability::ManageCampaigns));
}

#[test]
fn incomplete_role_matrix_file_is_rejected() {
    let dir = scratch_dir("incomplete");
    write(&dir, METRICS_CONFIG_FILE, "{}");
    write(&dir, ROLE_MATRIX_FILE, r#"{ "roles": [ { "role": "admin" } ] }"#);

    match DashboardConfig::load(&dir) {
        Err(DeskError::IncompleteRoleMatrix { missing }) => assert_eq!(missing.len(), 4),
        other => panic!("expected IncompleteRoleMatrix, got {other:?}"),
    }
}
