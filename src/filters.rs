//! Query inputs: the city key and the month/day filters.
//!
//! Every value here comes from a closed set. Parsing is case-insensitive and
//! ignores surrounding whitespace; anything outside the set is rejected with
//! [`InvalidFilterValue`] before a file is opened.

use std::fmt;
use std::str::FromStr;

use chrono::{Month, Weekday};
use serde::{Serialize, Serializer};

use crate::error::{FilterAxis, InvalidFilterValue};
use crate::table::Record;

const CITY_CHOICES: &str = "chicago, new york city, washington";
const MONTH_CHOICES: &str = "all, january, february, march, april, may, june";
const DAY_CHOICES: &str = "all, monday, tuesday, wednesday, thursday, friday, saturday, sunday";

/// Cities with trip data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum City {
    #[serde(rename = "chicago")]
    Chicago,
    #[serde(rename = "new york city")]
    NewYorkCity,
    #[serde(rename = "washington")]
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lowercase key used on the command line and in config files.
    pub fn key(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// File name of the city's trip log inside the data directory.
    pub fn default_file(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for City {
    type Err = InvalidFilterValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" | "new york" | "nyc" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            _ => Err(InvalidFilterValue {
                axis: FilterAxis::City,
                value: s.to_string(),
                expected: CITY_CHOICES,
            }),
        }
    }
}

/// Months the trip logs cover. The source data stops at June.
pub const SUPPORTED_MONTHS: [Month; 6] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

impl MonthFilter {
    pub fn is_all(self) -> bool {
        matches!(self, MonthFilter::All)
    }

    pub fn matches(self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(m) => m.number_from_month() == month,
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Only(m) => f.write_str(m.name()),
        }
    }
}

impl Serialize for MonthFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for MonthFilter {
    type Err = InvalidFilterValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }

        trimmed
            .parse::<Month>()
            .ok()
            .filter(|m| SUPPORTED_MONTHS.contains(m))
            .map(MonthFilter::Only)
            .ok_or_else(|| InvalidFilterValue {
                axis: FilterAxis::Month,
                value: s.to_string(),
                expected: MONTH_CHOICES,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Only(Weekday),
}

impl DayFilter {
    pub fn is_all(self) -> bool {
        matches!(self, DayFilter::All)
    }

    pub fn matches(self, day: Weekday) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(d) => d == day,
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Only(d) => f.write_str(weekday_name(*d)),
        }
    }
}

impl Serialize for DayFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for DayFilter {
    type Err = InvalidFilterValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(DayFilter::All);
        }

        trimmed
            .parse::<Weekday>()
            .map(DayFilter::Only)
            .map_err(|_| InvalidFilterValue {
                axis: FilterAxis::Day,
                value: s.to_string(),
                expected: DAY_CHOICES,
            })
    }
}

/// Full English name of a weekday; chrono's `Display` only gives `Mon`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Conjunction of the month and day predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Filters {
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl Filters {
    pub fn new(month: MonthFilter, day: DayFilter) -> Self {
        Self { month, day }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.month.matches(record.month) && self.day.matches(record.day_of_week)
    }
}

/// A validated request: which city to load and how to filter it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl Query {
    /// Validates all three inputs; the first invalid one is reported.
    pub fn parse(city: &str, month: &str, day: &str) -> Result<Self, InvalidFilterValue> {
        Ok(Self {
            city: city.parse()?,
            month: month.parse()?,
            day: day.parse()?,
        })
    }

    pub fn filters(&self) -> Filters {
        Filters::new(self.month, self.day)
    }
}
