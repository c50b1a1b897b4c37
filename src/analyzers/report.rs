use std::time::{Duration, Instant};

use chrono::Utc;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::analyzers::types::{
    Count, Demographics, DurationStats, QuerySummary, StationStats, TimeStats, UserStats,
};
use crate::error::EmptyResultError;
use crate::filters::{City, DayFilter, MonthFilter, Query, weekday_name};
use crate::table::TableView;

/// Outcome of one aggregator plus how long it took.
#[derive(Debug, Clone)]
pub struct Section<T> {
    pub result: Result<T, EmptyResultError>,
    pub elapsed: Duration,
}

impl<T> Section<T> {
    fn run(f: impl FnOnce() -> Result<T, EmptyResultError>) -> Self {
        let started = Instant::now();
        let result = f();
        Section {
            result,
            elapsed: started.elapsed(),
        }
    }

    pub fn stats(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }
}

impl<T: Serialize> Serialize for Section<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Section", 3)?;
        s.serialize_field("elapsed_secs", &self.elapsed.as_secs_f64())?;
        match &self.result {
            Ok(stats) => {
                s.serialize_field("stats", stats)?;
                s.serialize_field("error", &None::<String>)?;
            }
            Err(e) => {
                s.serialize_field("stats", &None::<T>)?;
                s.serialize_field("error", &Some(e.to_string()))?;
            }
        }
        s.end()
    }
}

/// All four statistic blocks for one filtered view.
///
/// Each aggregator runs independently; an empty view produces an error in
/// every section but never prevents the others from being computed.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
    pub trips: usize,
    pub time: Section<TimeStats>,
    pub stations: Section<StationStats>,
    pub durations: Section<DurationStats>,
    pub users: Section<UserStats>,
}

impl Report {
    #[tracing::instrument(skip(view), fields(city = %query.city, rows = view.len()))]
    pub fn compute(view: &TableView<'_>, query: &Query) -> Self {
        let report = Report {
            city: query.city,
            month: query.month,
            day: query.day,
            trips: view.len(),
            time: Section::run(|| TimeStats::from_view(view, query.month)),
            stations: Section::run(|| StationStats::from_view(view)),
            durations: Section::run(|| DurationStats::from_view(view)),
            users: Section::run(|| UserStats::from_view(view)),
        };

        for error in report.errors() {
            tracing::warn!(error = %error, "Aggregator produced no result");
        }
        report
    }

    /// Errors from the sections that failed, in report order.
    pub fn errors(&self) -> Vec<EmptyResultError> {
        [
            self.time.result.as_ref().err(),
            self.stations.result.as_ref().err(),
            self.durations.result.as_ref().err(),
            self.users.result.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .copied()
        .collect()
    }

    /// Flattens the report into one row for CSV export.
    pub fn summary(&self) -> QuerySummary {
        let mut s = QuerySummary {
            generated_at: Utc::now(),
            city: Some(self.city),
            month: self.month.to_string(),
            day: self.day.to_string(),
            trips: self.trips,
            ..Default::default()
        };

        if let Some(time) = self.time.stats() {
            s.popular_month = time.month_name().map(str::to_string);
            s.popular_day = time.day.as_ref().map(|d| weekday_name(d.value).to_string());
            s.popular_hour = Some(time.hour.value);
        }

        if let Some(stations) = self.stations.stats() {
            s.popular_start_station = Some(stations.start_station.value.clone());
            s.popular_end_station = Some(stations.end_station.value.clone());
            s.popular_route = Some(format!(
                "{} -> {}",
                stations.route.value.start, stations.route.value.end
            ));
        }

        if let Some(durations) = self.durations.stats() {
            s.total_duration_secs = Some(durations.total_secs);
            s.mean_duration_secs = Some(durations.mean_secs);
        }

        if let Some(users) = self.users.stats() {
            s.user_types = Some(join_counts(&users.user_types));
            if let Demographics::Available(demo) = &users.demographics {
                s.genders = Some(join_counts(&demo.genders));
                if let Some(years) = &demo.birth_years {
                    s.earliest_birth_year = Some(years.earliest);
                    s.most_recent_birth_year = Some(years.most_recent);
                    s.most_common_birth_year = Some(years.most_common.value);
                }
            }
        }

        let errors = self.errors();
        if !errors.is_empty() {
            s.error_message = Some(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            );
        }

        s
    }
}

fn join_counts(counts: &[Count]) -> String {
    counts
        .iter()
        .map(|c| format!("{}={}", c.value, c.count))
        .collect::<Vec<_>>()
        .join(";")
}
