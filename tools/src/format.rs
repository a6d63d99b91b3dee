//! Display formatting for raw engine figures.

use opsdesk_core::alert::{AlertMetric, MetricKind};

/// `$1.25B`, `$340.0M`, `$12.5K`, `$980`.
pub fn currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let v = value.abs();
    if v >= 1e9 {
        format!("{sign}${:.2}B", v / 1e9)
    } else if v >= 1e6 {
        format!("{sign}${:.1}M", v / 1e6)
    } else if v >= 1e3 {
        format!("{sign}${:.1}K", v / 1e3)
    } else {
        format!("{sign}${v:.0}")
    }
}

pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn signed_percent(value: f64) -> String {
    format!("{value:+.1}%")
}

pub fn metric(m: &AlertMetric) -> String {
    let value = match m.kind {
        MetricKind::Count => format!("{:.0}", m.value),
        MetricKind::Currency => currency(m.value),
        MetricKind::Percent => format!("{:.0}%", m.value),
    };
    format!("{}: {}", m.label, value)
}
