use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc, Weekday};
use std::fmt::Debug;

/// Source of the current instant
///
/// Injected wherever "now" matters so tests can pin time.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;

    fn start_of_today(&self) -> DateTime<Utc> {
        Calendar::default().start_of_day(self.now())
    }
}

/// Wall clock in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// UTC calendar boundaries used to bucket tally snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    week_start: Weekday,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
        }
    }
}

impl Calendar {
    pub fn new(week_start: Weekday) -> Self {
        Self { week_start }
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn start_of_hour(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        midnight(ts.date_naive()) + TimeDelta::hours(i64::from(ts.hour()))
    }

    pub fn start_of_day(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        midnight(ts.date_naive())
    }

    pub fn start_of_week(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let date = ts.date_naive();
        let days_back = (7 + date.weekday().num_days_from_monday()
            - self.week_start.num_days_from_monday())
            % 7;
        midnight(date - TimeDelta::days(i64::from(days_back)))
    }

    pub fn start_of_month(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        midnight(first_of_month(ts.date_naive()))
    }

    pub fn start_of_quarter(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let month_start = first_of_month(ts.date_naive());
        let quarter_start = month_start
            .checked_sub_months(Months::new(month_start.month0() % 3))
            .unwrap_or(month_start);
        midnight(quarter_start)
    }

    pub fn start_of_year(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let date = ts.date_naive();
        midnight(date - TimeDelta::days(i64::from(date.ordinal0())))
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.day0()))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
