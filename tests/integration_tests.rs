use std::fs::File;
use std::path::PathBuf;

use bikeshare_explorer::analyzers::report::Report;
use bikeshare_explorer::analyzers::types::{Demographics, Popular};
use bikeshare_explorer::config::CityConfig;
use bikeshare_explorer::error::LoadError;
use bikeshare_explorer::filters::{City, Query};
use bikeshare_explorer::loader::{load_city, load_from_reader};
use bikeshare_explorer::paginator::Paginator;
use chrono::Weekday;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config() -> CityConfig {
    CityConfig::new(fixtures())
}

#[test]
fn test_full_pipeline_all_months() {
    let query = Query::parse("chicago", "all", "all").expect("valid query");
    let table = load_city(&config(), query.city).expect("Failed to load fixture");
    let view = table.view().filter(&query.filters());
    let report = Report::compute(&view, &query);

    assert_eq!(report.trips, 7);
    assert!(report.errors().is_empty());

    let time = report.time.stats().unwrap();
    assert_eq!(time.month_name(), Some("January"));
    assert_eq!(
        time.day,
        Some(Popular {
            value: Weekday::Mon,
            count: 4
        })
    );
    assert_eq!(time.hour.value, 8);

    let stations = report.stations.stats().unwrap();
    assert_eq!(stations.start_station.value, "Canal St & Adams St");
    assert_eq!(stations.end_station.value, "Clinton St & Madison St");
    assert_eq!(stations.route.value.start, "Canal St & Adams St");
    assert_eq!(stations.route.value.end, "Clinton St & Madison St");
    assert_eq!(stations.route.count, 3);

    let durations = report.durations.stats().unwrap();
    assert_eq!(durations.total_secs, 4600.0);
    assert_eq!(durations.mean_secs, 4600.0 / 7.0);

    let users = report.users.stats().unwrap();
    assert_eq!(users.user_types[0].value, "Subscriber");
    assert_eq!(users.user_types[0].count, 5);
    assert_eq!(users.user_types[1].value, "Customer");

    let Demographics::Available(demo) = &users.demographics else {
        panic!("chicago has demographic columns");
    };
    assert_eq!(demo.genders[0].value, "Male");
    assert_eq!(demo.genders[0].count, 3);
    let years = demo.birth_years.as_ref().unwrap();
    assert_eq!(years.earliest, 1970);
    assert_eq!(years.most_recent, 1999);
    assert_eq!(years.most_common.value, 1985);
}

#[test]
fn test_month_and_day_filter() {
    let query = Query::parse("chicago", "january", "monday").unwrap();
    let table = load_city(&config(), query.city).unwrap();
    let view = table.view().filter(&query.filters());

    assert_eq!(view.len(), 2);
    let report = Report::compute(&view, &query);
    let time = report.time.stats().unwrap();

    // Hours 8 and 17 tie; 8 comes first.
    assert_eq!(time.hour.value, 8);
    assert_eq!(time.month, None);
    assert_eq!(time.day, None);
}

#[test]
fn test_month_without_trips_fails_each_aggregator() {
    let query = Query::parse("chicago", "february", "all").unwrap();
    let table = load_city(&config(), query.city).unwrap();
    let view = table.view().filter(&query.filters());
    let report = Report::compute(&view, &query);

    assert_eq!(report.trips, 0);
    assert_eq!(report.errors().len(), 4);
    assert_eq!(
        report.stations.result.unwrap_err().aggregator,
        "station"
    );
}

#[test]
fn test_city_without_demographics() {
    let query = Query::parse("washington", "all", "all").unwrap();
    let table = load_city(&config(), City::Washington).unwrap();
    let view = table.view().filter(&query.filters());
    let report = Report::compute(&view, &query);

    let users = report.users.stats().unwrap();
    assert_eq!(users.demographics, Demographics::Unavailable);
    assert_eq!(report.time.stats().unwrap().month_name(), Some("June"));
}

#[test]
fn test_missing_city_file() {
    let err = load_city(&config(), City::NewYorkCity).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn test_unparsable_timestamp_aborts_load() {
    let file = File::open(fixtures().join("broken.csv")).unwrap();
    let err = load_from_reader(file).unwrap_err();
    assert!(matches!(err, LoadError::Parse { line: 3, .. }));
}

#[test]
fn test_paging_through_filtered_view() {
    let table = load_city(&config(), City::Chicago).unwrap();
    let view = table.view();
    let mut pager = Paginator::new(&view);

    let first = pager.next_page().unwrap();
    assert_eq!(first.records.len(), 5);
    let second = pager.next_page().unwrap();
    assert_eq!(second.records.len(), 2);
    assert_eq!(second.offset, 5);
    assert!(pager.next_page().is_none());
}
