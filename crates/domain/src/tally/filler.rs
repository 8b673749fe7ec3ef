use chrono::{DateTime, Months, TimeDelta, Utc};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::{debug, warn};

use super::{Granularity, SnapshotEntry, TallyReport};
use crate::clock::Calendar;
use crate::error::{DomainError, Result};

/// Calendar stepping for one granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStrategy {
    Hourly,
    Daily,
    Weekly(Calendar),
    Monthly,
    Quarterly,
    Yearly,
}

impl FillStrategy {
    pub fn for_granularity(granularity: Granularity, calendar: Calendar) -> Self {
        match granularity {
            Granularity::Hourly => Self::Hourly,
            Granularity::Daily => Self::Daily,
            Granularity::Weekly => Self::Weekly(calendar),
            Granularity::Monthly => Self::Monthly,
            Granularity::Quarterly => Self::Quarterly,
            Granularity::Yearly => Self::Yearly,
        }
    }

    /// Start of the bucket containing `ts`
    pub fn floor(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let utc = Calendar::default();
        match self {
            Self::Hourly => utc.start_of_hour(ts),
            Self::Daily => utc.start_of_day(ts),
            Self::Weekly(calendar) => calendar.start_of_week(ts),
            Self::Monthly => utc.start_of_month(ts),
            Self::Quarterly => utc.start_of_quarter(ts),
            Self::Yearly => utc.start_of_year(ts),
        }
    }

    /// Start of the bucket after the one starting at `bucket`; `None` past the representable range
    pub fn advance(&self, bucket: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Hourly => bucket.checked_add_signed(TimeDelta::hours(1)),
            Self::Daily => bucket.checked_add_signed(TimeDelta::days(1)),
            Self::Weekly(_) => bucket.checked_add_signed(TimeDelta::weeks(1)),
            Self::Monthly => bucket.checked_add_months(Months::new(1)),
            Self::Quarterly => bucket.checked_add_months(Months::new(3)),
            Self::Yearly => bucket.checked_add_months(Months::new(12)),
        }
    }
}

/// Closes the gaps of a report so it has one entry per bucket
#[derive(Debug, Clone, Copy)]
pub struct ReportFiller {
    strategy: FillStrategy,
}

impl ReportFiller {
    pub fn new(granularity: Granularity, calendar: Calendar) -> Self {
        Self {
            strategy: FillStrategy::for_granularity(granularity, calendar),
        }
    }

    pub fn strategy(&self) -> FillStrategy {
        self.strategy
    }

    /// Replace `report.data` with one entry per bucket from `beginning` to `ending`.
    ///
    /// Existing entries keep their bucket; the first one wins when two share a
    /// bucket. `meta.count` is left to the caller.
    pub fn fill_gaps(
        &self,
        report: &mut TallyReport,
        beginning: DateTime<Utc>,
        ending: DateTime<Utc>,
    ) -> Result<()> {
        if ending < beginning {
            report.data.clear();
            return Err(DomainError::InvalidDateRange { beginning, ending });
        }

        let first = self.strategy.floor(beginning);
        let last = self.strategy.floor(ending);

        let mut by_bucket: BTreeMap<DateTime<Utc>, SnapshotEntry> = BTreeMap::new();
        for entry in report.data.drain(..) {
            let bucket = self.strategy.floor(entry.date);
            if bucket < first || bucket > last {
                debug!(date = %entry.date, "Dropping snapshot outside of the requested range");
                continue;
            }
            match by_bucket.entry(bucket) {
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
                Entry::Occupied(kept) => {
                    warn!(
                        product = %report.meta.product,
                        bucket = %bucket,
                        kept = %kept.get().date,
                        dropped = %entry.date,
                        "Multiple snapshots in one bucket; keeping the first"
                    );
                }
            }
        }

        let mut filled = Vec::with_capacity(by_bucket.len());
        let mut cursor = Some(first);
        while let Some(bucket) = cursor.filter(|bucket| *bucket <= last) {
            filled.push(
                by_bucket
                    .remove(&bucket)
                    .unwrap_or_else(|| SnapshotEntry::empty(bucket)),
            );
            cursor = self.strategy.advance(bucket);
        }

        debug!(
            product = %report.meta.product,
            granularity = %report.meta.granularity,
            entries = filled.len(),
            "Report gaps filled"
        );
        report.data = filled;
        Ok(())
    }
}
