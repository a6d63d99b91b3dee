//! Monthly trend series.
//!
//! These are synthetic projections for display, not ledger history:
//! each past month is the current figure scaled down by a linear decay
//! and a seeded jitter. A generator backed by real month-end snapshots
//! must keep the output shape: ascending by month, ending at the
//! as-of month, `{period, value, target?}`.

use crate::{config::TrendConfig, metrics::TrendPoint, rng::JitterRng, types::Timestamp};
use chrono::Datelike;

pub struct TrendGenerator<'c> {
    config: &'c TrendConfig,
}

impl<'c> TrendGenerator<'c> {
    pub fn new(config: &'c TrendConfig) -> Self {
        Self { config }
    }

    /// `config.months` points, oldest first. The last point is `current`
    /// exactly; every earlier point draws one jitter value, oldest first.
    pub fn monthly_series(
        &self,
        current: f64,
        as_of: Timestamp,
        target: Option<f64>,
        rng: &mut JitterRng,
    ) -> Vec<TrendPoint> {
        let months = self.config.months;
        log::trace!("{}: {} months ending {:.0}", rng.name, months, current);
        (0..months)
            .rev()
            .map(|months_ago| {
                let value = if months_ago == 0 {
                    current
                } else {
                    let decay = (1.0 - months_ago as f64 * self.config.decay_per_month).max(0.0);
                    current * decay * (1.0 + rng.jitter(self.config.jitter))
                };
                TrendPoint {
                    period: month_label(as_of, months_ago),
                    value,
                    target,
                }
            })
            .collect()
    }
}

/// `YYYY-MM` of the month `months_ago` before `as_of`.
pub fn month_label(as_of: Timestamp, months_ago: usize) -> String {
    let index = as_of.year() as i64 * 12 + as_of.month0() as i64 - months_ago as i64;
    format!("{:04}-{:02}", index.div_euclid(12), index.rem_euclid(12) + 1)
}

/// Signed percentage change between the last two points.
/// Zero when there are fewer than two points or the earlier one is zero.
pub fn last_change_pct(series: &[TrendPoint]) -> f64 {
    match series {
        [.., prev, last] if prev.value != 0.0 => (last.value - prev.value) / prev.value * 100.0,
        _ => 0.0,
    }
}

/// Mean of the last `window` values (fewer if the series is shorter).
pub fn trailing_mean(series: &[TrendPoint], window: usize) -> f64 {
    let take = window.min(series.len());
    if take == 0 {
        return 0.0;
    }
    series[series.len() - take..].iter().map(|p| p.value).sum::<f64>() / take as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{JitterBank, JitterSlot};
    use chrono::{TimeZone, Utc};

    fn as_of() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn month_labels_cross_year_boundaries() {
        assert_eq!(month_label(as_of(), 0), "2026-03");
        assert_eq!(month_label(as_of(), 2), "2026-01");
        assert_eq!(month_label(as_of(), 3), "2025-12");
        assert_eq!(month_label(as_of(), 14), "2025-01");
    }

    #[test]
    fn series_ascends_and_ends_on_current_value() {
        let config = TrendConfig::default();
        let mut rng = JitterBank::new(5).for_slot(JitterSlot::AumTrend);
        let series = TrendGenerator::new(&config).monthly_series(1_000.0, as_of(), Some(900.0), &mut rng);

        assert_eq!(series.len(), 12);
        assert_eq!(series[0].period, "2025-04");
        assert_eq!(series[11].period, "2026-03");
        assert_eq!(series[11].value, 1_000.0);
        assert!(series.iter().all(|p| p.target == Some(900.0)));
        // 11 months back: 0.78 decay, ±2% jitter
        assert!(series[0].value > 760.0 && series[0].value < 800.0, "{}", series[0].value);
    }

    #[test]
    fn change_and_mean_helpers() {
        let points: Vec<TrendPoint> = [80.0, 100.0, 110.0]
            .into_iter()
            .enumerate()
            .map(|(i, value)| TrendPoint { period: format!("p{i}"), value, target: None })
            .collect();

        assert!((last_change_pct(&points) - 10.0).abs() < 1e-9);
        assert!((trailing_mean(&points, 2) - 105.0).abs() < 1e-9);
        assert!((trailing_mean(&points, 10) - 290.0 / 3.0).abs() < 1e-9);
        assert_eq!(last_change_pct(&points[..1]), 0.0);
    }
}
