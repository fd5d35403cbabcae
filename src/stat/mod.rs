//! monthly growth statistics
//! groups sale records into calendar month buckets, sums them and computes
//! month over month growth; computed fresh on every report, never persisted

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::db::helpers::month_end;
use crate::db::{SaleRecord, SalesStore};
use crate::error::{AggregationError, Result};

/// one calendar month of sales, keyed by the month's last day
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    pub month_end: NaiveDate,
    pub total_amount: f64,
    /// percent change versus the preceding bucket; None for the first
    /// bucket and whenever the preceding total is zero
    pub growth_rate_pct: Option<f64>,
}

/// buckets in ascending month order plus the records left out of them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub buckets: Vec<MonthlyBucket>,
    pub skipped: Vec<AggregationError>,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// percent change from `prev` to `curr`; None where it isn't defined
pub fn growth_rate(prev: f64, curr: f64) -> Option<f64> {
    if prev == 0.0 {
        return None;
    }

    let pct = (curr / prev - 1.0) * 100.0;
    pct.is_finite().then_some(pct)
}

/// group records into month buckets and compute growth between neighbours;
/// months without records produce no bucket (no gap filling)
pub fn aggregate(records: &[SaleRecord]) -> Aggregation {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut skipped = Vec::new();

    for record in records {
        match record.parse_date() {
            Ok(date) => *totals.entry(month_end(date)).or_insert(0.0) += record.amount,
            Err(e) => skipped.push(e),
        }
    }

    // BTreeMap iterates keys ascending, months are unique by construction
    let mut buckets: Vec<MonthlyBucket> = Vec::with_capacity(totals.len());
    let mut prev: Option<f64> = None;

    for (month_end, total_amount) in totals {
        // an overflowed month is reported, never exported; growth of the
        // next month is then taken against the last finite one
        if !total_amount.is_finite() {
            skipped.push(AggregationError::NonFiniteTotal { month_end });
            continue;
        }

        buckets.push(MonthlyBucket {
            month_end,
            total_amount,
            growth_rate_pct: prev.and_then(|p| growth_rate(p, total_amount)),
        });
        prev = Some(total_amount);
    }

    Aggregation { buckets, skipped }
}

/// read every record from the store and aggregate it
pub fn monthly_growth<S: SalesStore + ?Sized>(store: &S) -> Result<Aggregation> {
    let records = store.query_all()?;
    let aggregation = aggregate(&records);

    for e in &aggregation.skipped {
        warn!("excluded from report: {}", e);
    }

    debug!(
        records = records.len(),
        buckets = aggregation.buckets.len(),
        skipped = aggregation.skipped.len(),
        "aggregated sales"
    );

    Ok(aggregation)
}
