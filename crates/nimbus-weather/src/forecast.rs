//! Reduces the provider's 3-hour forecast series to the hourly strip and the
//! multi-day outlook.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};

use crate::types::{DailyAggregate, ForecastPoint, HourlyPoint};

/// Number of forecast samples shown in the hourly strip (24 hours of 3-hour steps)
pub const HOURLY_POINTS: usize = 8;

/// Number of days in the outlook
pub const DAILY_DAYS: usize = 5;

/// First `HOURLY_POINTS` samples, in input order.
pub fn summarize_hourly(points: &[ForecastPoint]) -> Vec<HourlyPoint> {
    points.iter().take(HOURLY_POINTS).map(HourlyPoint::from).collect()
}

/// Group samples by UTC calendar date, skip the reference date ("today"),
/// and aggregate the first `DAILY_DAYS` remaining dates in ascending order.
///
/// Icon and description are each the most frequent value of the day. On a tie
/// the value that occurs last in the day wins.
pub fn summarize_daily(points: &[ForecastPoint], reference: DateTime<Utc>) -> Vec<DailyAggregate> {
    let today = reference.date_naive();

    let mut by_date: BTreeMap<NaiveDate, Vec<&ForecastPoint>> = BTreeMap::new();
    for point in points {
        by_date
            .entry(point.timestamp.date_naive())
            .or_default()
            .push(point);
    }

    by_date
        .into_iter()
        .filter(|(date, _)| *date != today)
        .take(DAILY_DAYS)
        .filter_map(|(date, group)| aggregate_day(date, &group))
        .collect()
}

fn aggregate_day(date: NaiveDate, group: &[&ForecastPoint]) -> Option<DailyAggregate> {
    let max_temp = group
        .iter()
        .map(|p| p.temperature)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_temp = group
        .iter()
        .map(|p| p.temperature)
        .fold(f64::INFINITY, f64::min);
    let icon = mode(group.iter().map(|p| p.icon.as_str()))?;
    let description = mode(group.iter().map(|p| p.description.as_str()))?;

    Some(DailyAggregate {
        date,
        max_temp,
        min_temp,
        icon: icon.to_string(),
        description: description.to_string(),
    })
}

/// Most frequent value; ties go to the value whose last occurrence is latest.
fn mode<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen: HashMap<&'a str, (usize, usize)> = HashMap::new();
    for (position, value) in values.enumerate() {
        let entry = seen.entry(value).or_insert((0, position));
        entry.0 += 1;
        entry.1 = position;
    }

    seen.into_iter()
        .max_by_key(|(_, (count, last))| (*count, *last))
        .map(|(value, _)| value)
}
