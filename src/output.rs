//! Output formatting and persistence for query reports.
//!
//! Supports console rendering, JSON serialization, and CSV append.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use csv::WriterBuilder;
use tracing::debug;

use crate::analyzers::report::{Report, Section};
use crate::analyzers::types::{Count, Demographics, DurationStats, QuerySummary, StationStats};
use crate::filters::{DayFilter, weekday_name};
use crate::paginator::Page;
use crate::table::{Record, Schema};

const RULE: &str = "----------------------------------------";

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &Report) {
    debug!("{:#?}", report);
}

/// Serializes a report as pretty-printed JSON.
pub fn to_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Appends a [`QuerySummary`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, summary: &QuerySummary) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

/// Writes the four statistic blocks the way the interactive session shows them.
pub fn render_report<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    render_time(out, report)?;
    render_stations(out, &report.stations)?;
    render_durations(out, &report.durations)?;
    render_users(out, report)?;
    Ok(())
}

fn render_time<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    writeln!(out, "\nCalculating The Most Frequent Times of Travel...\n")?;
    match &report.time.result {
        Ok(time) => {
            if let Some(month) = time.month_name() {
                writeln!(out, "Most popular month is: {month}")?;
            }
            if let Some(day) = &time.day {
                writeln!(out, "Most common day is: {}", weekday_name(day.value))?;
            }
            if report.month.is_all() {
                writeln!(out, "Most common start hour is: {}", time.hour.value)?;
            } else {
                let day = match report.day {
                    DayFilter::All => "All",
                    DayFilter::Only(d) => weekday_name(d),
                };
                writeln!(
                    out,
                    "Most common start hour for {day} in the month {} is: {}",
                    report.month, time.hour.value
                )?;
            }
        }
        Err(e) => writeln!(out, "{e}")?,
    }
    footer(out, report.time.elapsed)
}

fn render_stations<W: Write>(
    out: &mut W,
    section: &Section<StationStats>,
) -> io::Result<()> {
    writeln!(out, "\nCalculating The Most Popular Stations and Trip...\n")?;
    match &section.result {
        Ok(stations) => {
            writeln!(
                out,
                "Most commonly used start station is: \n  {}",
                stations.start_station.value
            )?;
            writeln!(
                out,
                "Most commonly used end station is: \n  {}",
                stations.end_station.value
            )?;
            writeln!(
                out,
                "Most frequent combination of start and end station is: \n  Start Station: {}\n  End Station: {}",
                stations.route.value.start, stations.route.value.end
            )?;
        }
        Err(e) => writeln!(out, "{e}")?,
    }
    footer(out, section.elapsed)
}

fn render_durations<W: Write>(
    out: &mut W,
    section: &Section<DurationStats>,
) -> io::Result<()> {
    writeln!(out, "\nCalculating Trip Duration...\n")?;
    match &section.result {
        Ok(d) => {
            writeln!(out, "Total Duration: {}", d.total_secs)?;
            writeln!(out, "Average Duration: {}", d.mean_secs)?;
        }
        Err(e) => writeln!(out, "{e}")?,
    }
    footer(out, section.elapsed)
}

fn render_users<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    writeln!(out, "\nCalculating User Stats...\n")?;
    match &report.users.result {
        Ok(users) => {
            writeln!(out, "Count of user types:")?;
            render_counts(out, &users.user_types)?;

            match &users.demographics {
                Demographics::Available(demo) => {
                    writeln!(out, "Gender count:")?;
                    render_counts(out, &demo.genders)?;
                    match &demo.birth_years {
                        Some(years) => {
                            writeln!(out, "Earliest year of birth: {}", years.earliest)?;
                            writeln!(out, "Most recent year of birth: {}", years.most_recent)?;
                            writeln!(
                                out,
                                "Most popular year of birth: {}",
                                years.most_common.value
                            )?;
                        }
                        None => writeln!(out, "No birth years recorded for these trips")?,
                    }
                }
                Demographics::Unavailable => writeln!(
                    out,
                    "No Birth Year and Gender information for {}",
                    report.city
                )?,
            }
        }
        Err(e) => writeln!(out, "{e}")?,
    }
    footer(out, report.users.elapsed)
}

fn render_counts<W: Write>(out: &mut W, counts: &[Count]) -> io::Result<()> {
    let width = counts.iter().map(|c| c.value.len()).max().unwrap_or(0);
    for c in counts {
        writeln!(out, "  {:<width$}  {}", c.value, c.count)?;
    }
    Ok(())
}

fn footer<W: Write>(out: &mut W, elapsed: Duration) -> io::Result<()> {
    writeln!(out, "\nThis took {} seconds.", elapsed.as_secs_f64())?;
    writeln!(out, "{RULE}")
}

/// Writes one page of raw trips as `Column: value` lines.
///
/// Optional columns are only shown when the source file has them.
pub fn render_page<W: Write>(out: &mut W, page: &Page<'_, '_>, schema: &Schema) -> io::Result<()> {
    for (number, record) in page.numbered() {
        writeln!(out, "Individual trip data, traveler {number}\n")?;
        render_record(out, record, schema)?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn render_record<W: Write>(out: &mut W, r: &Record, schema: &Schema) -> io::Result<()> {
    writeln!(out, "Start Time: {}", r.start_time)?;
    if schema.has_end_time {
        writeln!(out, "End Time: {}", display_opt(r.end_time.as_ref()))?;
    }
    writeln!(
        out,
        "Trip Duration: {}",
        display_opt(r.trip_duration.as_ref())
    )?;
    writeln!(out, "Start Station: {}", r.start_station)?;
    writeln!(out, "End Station: {}", r.end_station)?;
    writeln!(out, "User Type: {}", display_opt(r.user_type.as_ref()))?;
    if schema.has_gender {
        writeln!(out, "Gender: {}", display_opt(r.gender.as_ref()))?;
    }
    if schema.has_birth_year {
        writeln!(out, "Birth Year: {}", display_opt(r.birth_year.as_ref()))?;
    }
    writeln!(out, "month: {}", r.month)?;
    writeln!(out, "day_of_week: {}", weekday_name(r.day_of_week))?;
    Ok(())
}

fn display_opt<T: std::fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "NaN".to_string(), ToString::to_string)
}
