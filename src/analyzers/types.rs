//! Result types produced by the aggregators.

use chrono::{DateTime, Month, Utc, Weekday};
use serde::Serialize;

use crate::filters::City;

/// A most-frequent value together with how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popular<T> {
    pub value: T,
    pub count: usize,
}

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count {
    pub value: String,
    pub count: usize,
}

/// Most frequent times of travel.
///
/// `month` and `day` are only computed when no month filter is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    pub month: Option<Popular<u32>>,
    pub day: Option<Popular<Weekday>>,
    pub hour: Popular<u32>,
}

impl TimeStats {
    pub fn month_name(&self) -> Option<&'static str> {
        let number = u8::try_from(self.month.as_ref()?.value).ok()?;
        Month::try_from(number).ok().map(|m| m.name())
    }
}

/// A start/end station pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Route {
    pub start: String,
    pub end: String,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub start_station: Popular<String>,
    pub end_station: Popular<String>,
    pub route: Popular<Route>,
}

/// Total and average trip duration, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_secs: f64,
    pub mean_secs: f64,
    /// Trips that carried a duration.
    pub trips: usize,
}

/// Birth-year extremes and mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: Popular<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemographicStats {
    pub genders: Vec<Count>,
    /// `None` when every birth-year cell in the view is empty.
    pub birth_years: Option<BirthYearStats>,
}

/// Whether the source file carried demographic columns at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Demographics {
    Available(DemographicStats),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_types: Vec<Count>,
    pub demographics: Demographics,
}

/// One query flattened into a single CSV-friendly row.
#[derive(Debug, Default, Serialize)]
pub struct QuerySummary {
    pub generated_at: DateTime<Utc>,
    pub city: Option<City>,
    pub month: String,
    pub day: String,
    pub trips: usize,

    pub popular_month: Option<String>,
    pub popular_day: Option<String>,
    pub popular_hour: Option<u32>,

    pub popular_start_station: Option<String>,
    pub popular_end_station: Option<String>,
    pub popular_route: Option<String>,

    pub total_duration_secs: Option<f64>,
    pub mean_duration_secs: Option<f64>,

    pub user_types: Option<String>,
    pub genders: Option<String>,
    pub earliest_birth_year: Option<i32>,
    pub most_recent_birth_year: Option<i32>,
    pub most_common_birth_year: Option<i32>,

    // error tracking
    pub error_message: Option<String>,
}
