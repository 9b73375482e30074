//! Configuration validation and parsing helpers.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};

use crate::domain::alpha::RankBlendParams;
use crate::domain::calendar::Schedule;
use crate::domain::error::RotatorError;
use crate::domain::universe::parse_assets;
use crate::ports::config_port::ConfigPort;

fn invalid(section: &str, key: &str, reason: &str) -> RotatorError {
    RotatorError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: reason.into(),
    }
}

fn missing(section: &str, key: &str) -> RotatorError {
    RotatorError::ConfigMissing {
        section: section.into(),
        key: key.into(),
    }
}

/// Parse a `YYYY-MM-DD` config value.
pub fn parse_date(value: &str, section: &str, key: &str) -> Result<NaiveDate, RotatorError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| invalid(section, key, "invalid date format (expected YYYY-MM-DD)"))
}

/// Parse a weekday name (`mon`, `monday`, ... case-insensitive).
pub fn parse_weekday(value: &str, section: &str, key: &str) -> Result<Weekday, RotatorError> {
    value
        .parse::<Weekday>()
        .map_err(|_| invalid(section, key, "invalid weekday name"))
}

/// Parse a burn-in spec: either a span relative to `start` (`1y`, `6m`,
/// `30d`) or an absolute `YYYY-MM-DD` date.
pub fn parse_burn_in(
    value: &str,
    start: DateTime<Utc>,
) -> Result<DateTime<Utc>, RotatorError> {
    let trimmed = value.trim();
    if let Some(count) = span_count(trimmed, 'y') {
        return Ok(shift_date(start, count as i32 * 12));
    }
    if let Some(count) = span_count(trimmed, 'm') {
        return Ok(shift_date(start, count as i32));
    }
    if let Some(count) = span_count(trimmed, 'd') {
        return Ok(start + chrono::Duration::days(count as i64));
    }

    let date = parse_date(trimmed, "session", "burn_in")?;
    Ok(Utc.from_utc_datetime(&date.and_time(start.time())))
}

fn span_count(value: &str, suffix: char) -> Option<u32> {
    value.strip_suffix(suffix)?.parse().ok()
}

/// Shift forward by whole months, clamping the day into the target month.
fn shift_date(start: DateTime<Utc>, months: i32) -> DateTime<Utc> {
    let total = start.year() * 12 + start.month() as i32 - 1 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let mut day = start.day();
    let date = loop {
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => break date,
            None => day -= 1,
        }
    };
    Utc.from_utc_datetime(&date.and_time(start.time()))
}

/// Validate the `[calendar]` section: periodicity selector, weekday, offset.
pub fn validate_calendar_config(config: &dyn ConfigPort) -> Result<(), RotatorError> {
    let selector = config
        .get_string("calendar", "periodicity")
        .ok_or_else(|| missing("calendar", "periodicity"))?;

    let weekday_str = config
        .get_string("calendar", "weekday")
        .unwrap_or_else(|| "mon".to_string());
    let weekday = parse_weekday(&weekday_str, "calendar", "weekday")?;

    let offset = config.get_int("calendar", "offset_business_days", 0);
    if offset < 0 {
        return Err(invalid(
            "calendar",
            "offset_business_days",
            "must not be negative",
        ));
    }

    Schedule::from_selector(&selector, weekday, offset as u32)?;
    Ok(())
}

/// Validate the `[strategy]` section against the engine's own rules.
pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), RotatorError> {
    for key in ["heat_lookback", "chill_lookback"] {
        if config.get_int("strategy", key, 1) < 1 {
            return Err(invalid("strategy", key, "must be at least 1"));
        }
    }

    let defaults = RankBlendParams::default();
    let params = RankBlendParams {
        heat_lookback: config.get_int("strategy", "heat_lookback", defaults.heat_lookback as i64)
            as usize,
        chill_lookback: config.get_int(
            "strategy",
            "chill_lookback",
            defaults.chill_lookback as i64,
        ) as usize,
        heat_weight: config.get_double("strategy", "heat_weight", defaults.heat_weight),
        top_n: config.get_int("strategy", "top_n", defaults.top_n as i64).max(0) as usize,
        ..defaults
    };
    params.validate()
}

/// Validate the `[session]` section. An inverted date range is allowed: it
/// produces an empty calendar, not an error.
pub fn validate_session_config(config: &dyn ConfigPort) -> Result<(), RotatorError> {
    let start_str = config
        .get_string("session", "start_date")
        .ok_or_else(|| missing("session", "start_date"))?;
    let start_date = parse_date(&start_str, "session", "start_date")?;

    let end_str = config
        .get_string("session", "end_date")
        .ok_or_else(|| missing("session", "end_date"))?;
    parse_date(&end_str, "session", "end_date")?;

    if let Some(burn_in) = config.get_string("session", "burn_in") {
        let start = Utc.from_utc_datetime(&start_date.and_time(chrono::NaiveTime::MIN));
        parse_burn_in(&burn_in, start)?;
    }

    Ok(())
}

/// Validate the `[universe]` section.
pub fn validate_universe_config(config: &dyn ConfigPort) -> Result<(), RotatorError> {
    let assets = config
        .get_string("universe", "assets")
        .ok_or_else(|| missing("universe", "assets"))?;
    parse_assets(&assets)?;
    Ok(())
}
