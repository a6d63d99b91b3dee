//! Segment aggregation over the customer book.
//!
//! Segments are opaque labels supplied by the data layer; the core
//! groups by them, it never computes them.

use crate::{
    metrics::{RfmBucket, SegmentRevenue},
    records::CustomerRecord,
    rng::JitterRng,
    types::UNCLASSIFIED_SEGMENT,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentBucket {
    pub segment: String,
    pub count:   usize,
    pub balance: f64,
}

/// Group customers by segment. Absent segments land in "Unclassified".
/// Ordered by descending balance, then by name.
pub fn bucket_by_segment(customers: &[CustomerRecord]) -> Vec<SegmentBucket> {
    let mut grouped: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for c in customers {
        let key = c.segment.as_deref().unwrap_or(UNCLASSIFIED_SEGMENT);
        let entry = grouped.entry(key).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += c.safe_balance();
    }

    let mut buckets: Vec<SegmentBucket> = grouped
        .into_iter()
        .map(|(segment, (count, balance))| SegmentBucket {
            segment: segment.to_string(),
            count,
            balance,
        })
        .collect();
    buckets.sort_by(|a, b| {
        b.balance
            .total_cmp(&a.balance)
            .then_with(|| a.segment.cmp(&b.segment))
    });
    buckets
}

pub fn revenue_by_segment(buckets: &[SegmentBucket], margin_rate: f64) -> Vec<SegmentRevenue> {
    buckets
        .iter()
        .map(|b| SegmentRevenue {
            segment: b.segment.clone(),
            revenue: b.balance * margin_rate,
        })
        .collect()
}

/// RFM distribution with a seeded trend figure in ±`trend_span`/2.
/// One draw per bucket, in bucket order.
pub fn rfm_distribution(
    buckets: &[SegmentBucket],
    trend_span: f64,
    rng: &mut JitterRng,
) -> Vec<RfmBucket> {
    buckets
        .iter()
        .map(|b| RfmBucket {
            segment: b.segment.clone(),
            count:   b.count,
            value:   b.balance,
            trend:   round_to_tenth(rng.jitter(trend_span)),
        })
        .collect()
}

fn round_to_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{JitterBank, JitterSlot};

    fn book() -> Vec<CustomerRecord> {
        vec![
            CustomerRecord::new("c-1", 100.0).with_segment("Champions"),
            CustomerRecord::new("c-2", 300.0).with_segment("Champions"),
            CustomerRecord::new("c-3", 50.0).with_segment("At Risk"),
            CustomerRecord::new("c-4", 1_000.0),
        ]
    }

    #[test]
    fn buckets_sum_counts_and_balances() {
        let buckets = bucket_by_segment(&book());

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].segment, UNCLASSIFIED_SEGMENT);
        assert_eq!(buckets[0].balance, 1_000.0);
        assert_eq!(buckets[1].segment, "Champions");
        assert_eq!(buckets[1].count, 2);
        assert_eq!(buckets[1].balance, 400.0);
        assert_eq!(buckets[2].segment, "At Risk");
    }

    #[test]
    fn segment_revenue_is_margin_on_balance() {
        let buckets = bucket_by_segment(&book());
        let revenue = revenue_by_segment(&buckets, 0.02);
        let champions = revenue.iter().find(|r| r.segment == "Champions").unwrap();
        assert!((champions.revenue - 8.0).abs() < 1e-9);
    }

    #[test]
    fn rfm_trend_stays_within_span() {
        let buckets = bucket_by_segment(&book());
        let mut rng = JitterBank::new(3).for_slot(JitterSlot::SegmentTrend);
        for bucket in rfm_distribution(&buckets, 20.0, &mut rng) {
            assert!(bucket.trend >= -10.0 && bucket.trend <= 10.0, "trend {}", bucket.trend);
        }
    }
}
