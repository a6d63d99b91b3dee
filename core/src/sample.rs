//! Deterministic sample book - synthetic customers, campaigns and loan
//! applications for demos and tests.
//!
//! Same seed and size = same book, byte for byte.

use crate::{
    records::{
        CampaignRecord, CampaignStatus, CustomerRecord, LoanApplicationRecord, LoanStage,
        RecordSet,
    },
    rng::{JitterBank, JitterRng, JitterSlot},
};

/// (segment, population share, balance pareto x_min)
const SEGMENT_MIX: &[(Option<&str>, f64, f64)] = &[
    (Some("Champions"),           0.15, 400_000.0),
    (Some("Loyal Customers"),     0.25, 150_000.0),
    (Some("Potential Loyalists"), 0.15,  60_000.0),
    (Some("At Risk"),             0.12, 120_000.0),
    (Some("Hibernating"),         0.10,  20_000.0),
    (Some("New Customers"),       0.13,  30_000.0),
    (None,                        0.10,  10_000.0),
];

const PRODUCTS: &[&str] = &[
    "savings", "current", "fixed_deposit", "credit_card", "home_loan", "mutual_fund", "insurance",
];

/// (stage, weight)
const STAGE_MIX: &[(LoanStage, f64)] = &[
    (LoanStage::Application,   0.20),
    (LoanStage::Documentation, 0.15),
    (LoanStage::Underwriting,  0.15),
    (LoanStage::Approval,      0.10),
    (LoanStage::Disbursement,  0.10),
    (LoanStage::Active,        0.20),
    (LoanStage::Rejected,      0.10),
];

const CAMPAIGNS: &[&str] = &[
    "Festive Deposit Drive",
    "Card Upgrade Offer",
    "Home Loan Balance Transfer",
    "Dormant Account Reactivation",
    "Salary Account Onboarding",
    "Wealth Advisory Launch",
];

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Priya", "Rohan", "Ananya", "Vikram", "Meera", "Kabir", "Isha", "Arjun", "Divya",
    "Sanjay", "Kavya", "Nikhil", "Pooja", "Rahul", "Sneha",
];

const LAST_NAMES: &[&str] = &[
    "Sharma", "Iyer", "Patel", "Reddy", "Nair", "Gupta", "Khan", "Mehta", "Das", "Joshi",
    "Kapoor", "Rao",
];

pub struct SampleBook;

impl SampleBook {
    /// Generate `customers` customers plus a proportional pipeline of
    /// loan applications (one per four customers) and the campaign set.
    pub fn generate(seed: u64, customers: usize) -> RecordSet {
        let mut rng = JitterBank::new(seed).for_slot(JitterSlot::SampleBook);

        let customer_records: Vec<CustomerRecord> =
            (0..customers).map(|i| Self::customer(i, &mut rng)).collect();

        let applications = (0..customers / 4)
            .map(|i| {
                let stage = pick_weighted(STAGE_MIX, &mut rng);
                let amount = rng.pareto(50_000.0, 1.5).min(50_000_000.0).round();
                let owner = rng.next_u64_below(customers.max(1) as u64);
                LoanApplicationRecord {
                    id: format!("la-{i:05}"),
                    customer_id: (customers > 0).then(|| format!("c-{owner:06}")),
                    stage,
                    amount,
                }
            })
            .collect();

        let campaigns = CAMPAIGNS
            .iter()
            .enumerate()
            .map(|(i, name)| Self::campaign(i, name, &mut rng))
            .collect();

        RecordSet {
            customers: customer_records,
            campaigns,
            applications,
        }
    }

    fn customer(i: usize, rng: &mut JitterRng) -> CustomerRecord {
        let (segment, x_min) = {
            let weights: Vec<(usize, f64)> =
                SEGMENT_MIX.iter().enumerate().map(|(idx, s)| (idx, s.1)).collect();
            let idx = pick_weighted(&weights, rng);
            (SEGMENT_MIX[idx].0, SEGMENT_MIX[idx].2)
        };
        let balance = rng.pareto(x_min, 1.6).min(x_min * 40.0).round();

        let product_count = rng.next_u64_below(4) as usize;
        let mut products: Vec<String> = Vec::with_capacity(product_count);
        while products.len() < product_count {
            let p = PRODUCTS[rng.next_u64_below(PRODUCTS.len() as u64) as usize];
            if !products.iter().any(|existing| existing == p) {
                products.push(p.to_string());
            }
        }

        let first = FIRST_NAMES[rng.next_u64_below(FIRST_NAMES.len() as u64) as usize];
        let last = LAST_NAMES[rng.next_u64_below(LAST_NAMES.len() as u64) as usize];

        CustomerRecord {
            id: format!("c-{i:06}"),
            name: Some(format!("{first} {last}")),
            balance,
            segment: segment.map(str::to_string),
            products,
        }
    }

    fn campaign(i: usize, name: &str, rng: &mut JitterRng) -> CampaignRecord {
        let status = match rng.next_u64_below(4) {
            0 => CampaignStatus::Draft,
            1 | 2 => CampaignStatus::Active,
            _ => CampaignStatus::Completed,
        };
        let budget = (500_000.0 + rng.next_f64() * 4_500_000.0).round();
        let spent = match status {
            CampaignStatus::Draft => 0.0,
            CampaignStatus::Completed => budget,
            _ => (budget * rng.next_f64()).round(),
        };
        let reached = if spent > 0.0 { 1_000 + rng.next_u64_below(50_000) } else { 0 };
        let conversions = if reached > 0 { rng.next_u64_below(reached / 10 + 1) } else { 0 };

        CampaignRecord {
            id: format!("cmp-{i:03}"),
            name: name.to_string(),
            status,
            budget,
            spent,
            reached,
            conversions,
        }
    }
}

fn pick_weighted<T: Copy>(table: &[(T, f64)], rng: &mut JitterRng) -> T {
    let total: f64 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.next_f64() * total;
    for (item, weight) in table {
        if roll < *weight {
            return *item;
        }
        roll -= weight;
    }
    table[table.len() - 1].0
}
