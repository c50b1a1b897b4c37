//! CSV loader for a city's trip log.

use std::fs::File;
use std::io::Read;

use chrono::NaiveDateTime;
use csv::StringRecord;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::CityConfig;
use crate::error::LoadError;
use crate::filters::City;
use crate::table::{Record, Schema, Table};

const START_TIME: &str = "Start Time";
const END_TIME: &str = "End Time";
const TRIP_DURATION: &str = "Trip Duration";
const START_STATION: &str = "Start Station";
const END_STATION: &str = "End Station";
const USER_TYPE: &str = "User Type";
const GENDER: &str = "Gender";
const BIRTH_YEAR: &str = "Birth Year";

const REQUIRED_COLUMNS: [&str; 5] = [
    START_TIME,
    TRIP_DURATION,
    START_STATION,
    END_STATION,
    USER_TYPE,
];

const TIMESTAMP_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// A CSV row as written in the source file, before timestamp parsing.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration")]
    trip_duration: Option<f64>,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type")]
    user_type: Option<String>,
    #[serde(rename = "Gender")]
    gender: Option<String>,
    // Written as a float (`1992.0`) in the source data.
    #[serde(rename = "Birth Year")]
    birth_year: Option<f64>,
}

/// Reads and parses the trip file configured for `city`.
///
/// # Errors
///
/// Fails if the file cannot be opened, a required column is missing, or any
/// row's start time is unparsable. There is no partial result. Unparsable end
/// times only become `None`.
#[tracing::instrument(skip(config), fields(city = %city, rows = tracing::field::Empty))]
pub fn load_city(config: &CityConfig, city: City) -> Result<Table, LoadError> {
    let path = config.path_for(city);
    debug!(path = %path.display(), "Opening trip file");

    let file = File::open(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    let table = load_from_reader(file)?;

    tracing::Span::current().record("rows", table.len());
    info!(
        rows = table.len(),
        has_gender = table.schema().has_gender,
        has_birth_year = table.schema().has_birth_year,
        "Trip table loaded"
    );
    Ok(table)
}

/// Parses CSV trip data from any reader. The first line must be the header.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Table, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let schema = read_schema(&headers)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        records.push(parse_row(&row, &headers)?);
    }

    Ok(Table::new(schema, records))
}

fn read_schema(headers: &StringRecord) -> Result<Schema, LoadError> {
    let has = |name: &str| headers.iter().any(|h| h == name);

    if let Some(column) = REQUIRED_COLUMNS.into_iter().find(|c| !has(*c)) {
        return Err(LoadError::MissingColumn { column });
    }

    Ok(Schema {
        has_end_time: has(END_TIME),
        has_gender: has(GENDER),
        has_birth_year: has(BIRTH_YEAR),
    })
}

fn parse_row(row: &StringRecord, headers: &StringRecord) -> Result<Record, LoadError> {
    let line = row.position().map(|p| p.line()).unwrap_or_default();
    let raw: RawTrip = row.deserialize(Some(headers))?;

    let start_time = parse_timestamp(&raw.start_time).ok_or_else(|| LoadError::Parse {
        column: START_TIME,
        line,
        value: raw.start_time.clone(),
    })?;

    // Only the start time is required to parse.
    let end_time = match raw.end_time.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(text) => {
            let parsed = parse_timestamp(text);
            if parsed.is_none() {
                warn!(line, value = text, "Unparsable end time ignored");
            }
            parsed
        }
    };

    let birth_year = raw
        .birth_year
        .filter(|y| y.is_finite())
        .map(|y| y.round() as i32);

    Ok(Record::new(
        start_time,
        end_time,
        raw.trip_duration.filter(|d| d.is_finite()),
        raw.start_station,
        raw.end_station,
        non_empty(raw.user_type),
        birth_year,
        non_empty(raw.gender),
    ))
}

/// Parses a start/end timestamp in any of the layouts the trip logs use.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    const CHICAGO_LIKE: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,Female,1992.0
9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,Customer,,
";

    const WASHINGTON_LIKE: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
";

    #[test]
    fn test_load_derives_time_fields() {
        let table = load_from_reader(CHICAGO_LIKE.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);

        let first = &table.records()[0];
        assert_eq!(first.month, 6);
        assert_eq!(first.day_of_week, Weekday::Fri);
        assert_eq!(first.hour, 15);
        assert_eq!(first.trip_duration, Some(321.0));
        assert_eq!(first.birth_year, Some(1992));
        assert_eq!(first.gender.as_deref(), Some("Male"));
        assert!(first.end_time.is_some());
    }

    #[test]
    fn test_load_keeps_empty_cells_as_none() {
        let table = load_from_reader(CHICAGO_LIKE.as_bytes()).unwrap();
        let last = &table.records()[2];
        assert_eq!(last.gender, None);
        assert_eq!(last.birth_year, None);
        assert_eq!(last.user_type.as_deref(), Some("Customer"));
    }

    #[test]
    fn test_schema_reflects_columns() {
        let chicago = load_from_reader(CHICAGO_LIKE.as_bytes()).unwrap();
        assert!(chicago.schema().has_demographics());

        let washington = load_from_reader(WASHINGTON_LIKE.as_bytes()).unwrap();
        assert!(!washington.schema().has_gender);
        assert!(!washington.schema().has_birth_year);
        assert!(washington.schema().has_end_time);
        assert_eq!(washington.records()[0].trip_duration, Some(489.066));
    }

    #[test]
    fn test_unparsable_start_time_fails_whole_load() {
        let data = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-01-01 00:07:57,100,A,B,Subscriber
not a date,100,A,B,Subscriber
";
        match load_from_reader(data.as_bytes()) {
            Err(LoadError::Parse {
                column,
                line,
                value,
            }) => {
                assert_eq!(column, START_TIME);
                assert_eq!(line, 3);
                assert_eq!(value, "not a date");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_unparsable_end_time_is_dropped() {
        let data = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-01-02 08:10:00,2017-01-02 late,300,A,B,Subscriber
2017-01-02 09:00:00,2017-01-02 09:05:00,300,A,B,Subscriber
";
        let table = load_from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].end_time, None);
        assert_eq!(table.records()[0].hour, 8);
        assert!(table.records()[1].end_time.is_some());
    }

    #[test]
    fn test_start_time_without_seconds_loads() {
        let data = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-01-02 08:10,2017-01-02 08:15,300,A,B,Subscriber
";
        let table = load_from_reader(data.as_bytes()).unwrap();
        let record = &table.records()[0];
        assert_eq!(record.hour, 8);
        assert_eq!(record.day_of_week, Weekday::Mon);
        assert!(record.end_time.is_some());
    }

    #[test]
    fn test_missing_required_column() {
        let data = "Start Time,Start Station,End Station,User Type\n";
        let err = load_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn {
                column: TRIP_DURATION
            }
        ));
    }

    #[test]
    fn test_header_only_file_gives_empty_table() {
        let data = "Start Time,Trip Duration,Start Station,End Station,User Type\n";
        let table = load_from_reader(data.as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2017-03-05 10:00:00").is_some());
        assert!(parse_timestamp("2017-03-05 10:00:00.250").is_some());
        assert!(parse_timestamp("2017-03-05 10:00").is_some());
        assert!(parse_timestamp("2017-03-05T10:00:00").is_some());
        assert!(parse_timestamp("2017-03-05T10:00").is_some());
        assert!(parse_timestamp("03/05/2017 10:00:30").is_some());
        assert!(parse_timestamp("03/05/2017 10:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
