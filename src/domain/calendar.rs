//! Rebalance calendar generation.
//!
//! A [`RebalanceCalendar`] turns a date range and a periodicity policy into an
//! ordered list of [`RebalanceEvent`] timestamps. All timestamps are UTC and
//! carry a fixed market time-of-day. Business-day arithmetic is an explicit
//! weekend-aware stepping routine; there is no holiday calendar.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

use crate::domain::error::RotatorError;

/// Rebalance timestamps use market open (pre-market) or market close
/// (post-market), expressed in UTC.
const PRE_MARKET_HMS: (u32, u32, u32) = (14, 30, 0);
const POST_MARKET_HMS: (u32, u32, u32) = (21, 0, 0);

/// Rebalance periodicity policy. Each variant is a closed, independent policy
/// with no shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// First business day of each month, shifted forward by a number of
    /// business days. A large offset may roll into the following month; this
    /// is accepted, not corrected.
    Monthly { offset_business_days: u32 },
    /// Every occurrence of the given weekday.
    Weekly { weekday: Weekday },
    /// Every business day.
    Daily,
    /// Last business day of each month.
    EndOfMonth,
    /// A single event at the start of the range, ignoring the end.
    BuyAndHold,
}

impl Schedule {
    /// Parse a config selector. Weekly takes its weekday and Monthly its
    /// offset from the accompanying parameters; the other selectors ignore
    /// them.
    pub fn from_selector(
        selector: &str,
        weekday: Weekday,
        offset_business_days: u32,
    ) -> Result<Self, RotatorError> {
        match selector {
            "monthly" => Ok(Schedule::Monthly {
                offset_business_days,
            }),
            "weekly" => Ok(Schedule::Weekly { weekday }),
            "daily" => Ok(Schedule::Daily),
            "end_of_month" => Ok(Schedule::EndOfMonth),
            "buy_and_hold" => Ok(Schedule::BuyAndHold),
            other => Err(RotatorError::UnknownPeriodicity(other.to_string())),
        }
    }
}

/// A single rebalance timestamp, tagged with its market-timing phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebalanceEvent {
    pub at: DateTime<Utc>,
    pub pre_market: bool,
}

/// Generates rebalance events for a date range under a periodicity policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebalanceCalendar {
    pub schedule: Schedule,
    pub pre_market: bool,
}

impl RebalanceCalendar {
    pub fn new(schedule: Schedule, pre_market: bool) -> Self {
        Self {
            schedule,
            pre_market,
        }
    }

    /// Generate the ordered event sequence for `[start, end]`.
    ///
    /// The result is strictly increasing. An inverted range produces an empty
    /// sequence rather than an error, except for `BuyAndHold`, which ignores
    /// `end` entirely and always emits its single event at `start`.
    pub fn generate(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<RebalanceEvent> {
        if let Schedule::BuyAndHold = self.schedule {
            return vec![RebalanceEvent {
                at: start,
                pre_market: self.pre_market,
            }];
        }

        if end < start {
            return Vec::new();
        }

        let first = start.date_naive();
        let last = end.date_naive();

        let dates = match self.schedule {
            Schedule::Monthly {
                offset_business_days,
            } => monthly_dates(first, last, offset_business_days),
            Schedule::Weekly { weekday } => weekly_dates(first, last, weekday),
            Schedule::Daily => business_days_between(first, last),
            Schedule::EndOfMonth => end_of_month_dates(first, last),
            Schedule::BuyAndHold => unreachable!(),
        };

        dates
            .into_iter()
            .map(|date| RebalanceEvent {
                at: at_market_time(date, self.pre_market),
                pre_market: self.pre_market,
            })
            .collect()
    }
}

/// Attach the fixed market time-of-day to a date, in UTC.
pub fn at_market_time(date: NaiveDate, pre_market: bool) -> DateTime<Utc> {
    let (h, m, s) = if pre_market {
        PRE_MARKET_HMS
    } else {
        POST_MARKET_HMS
    };
    let time = NaiveTime::from_hms_opt(h, m, s).unwrap();
    Utc.from_utc_datetime(&date.and_time(time))
}

/// Saturday and Sunday are non-business days; everything else counts.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Step `date` forward by `n` business days. Zero is the identity.
pub fn add_business_days(date: NaiveDate, n: u32) -> NaiveDate {
    let mut current = date;
    let mut remaining = n;
    while remaining > 0 {
        current += Duration::days(1);
        if is_business_day(current) {
            remaining -= 1;
        }
    }
    current
}

/// All business days in `[first, last]`, in order.
pub fn business_days_between(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = first;
    while current <= last {
        if is_business_day(current) {
            days.push(current);
        }
        current += Duration::days(1);
    }
    days
}

/// First business day of the month containing `date`.
pub fn first_business_day_of_month(date: NaiveDate) -> NaiveDate {
    let mut current = date.with_day(1).unwrap();
    while !is_business_day(current) {
        current += Duration::days(1);
    }
    current
}

/// Last business day of the month containing `date`.
pub fn last_business_day_of_month(date: NaiveDate) -> NaiveDate {
    let mut current = last_day_of_month(date);
    while !is_business_day(current) {
        current -= Duration::days(1);
    }
    current
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    first_day_of_next_month(date) - Duration::days(1)
}

fn first_day_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

fn monthly_dates(first: NaiveDate, last: NaiveDate, offset: u32) -> Vec<NaiveDate> {
    month_starts(first, last)
        .into_iter()
        .filter_map(|month_start| {
            let anchor = first_business_day_of_month(month_start);
            if anchor < first || anchor > last {
                return None;
            }
            Some(add_business_days(anchor, offset))
        })
        .collect()
}

fn end_of_month_dates(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    month_starts(first, last)
        .into_iter()
        .filter_map(|month_start| {
            let date = last_business_day_of_month(month_start);
            (date >= first && date <= last).then_some(date)
        })
        .collect()
}

fn month_starts(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = first.with_day(1).unwrap();
    while current <= last {
        months.push(current);
        current = first_day_of_next_month(current);
    }
    months
}

fn weekly_dates(first: NaiveDate, last: NaiveDate, weekday: Weekday) -> Vec<NaiveDate> {
    let gap = (weekday.num_days_from_monday() + 7 - first.weekday().num_days_from_monday()) % 7;
    let mut dates = Vec::new();
    let mut current = first + Duration::days(gap as i64);
    while current <= last {
        dates.push(current);
        current += Duration::days(7);
    }
    dates
}
