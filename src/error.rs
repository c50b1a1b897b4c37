//! Error types shared by the loader, the filters and the aggregators.
//!
//! Loading and filter parsing abort a whole query; aggregator failures are
//! reported per aggregator so that sibling statistics still get computed.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Which closed input set a rejected value was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterAxis {
    City,
    Month,
    Day,
}

impl fmt::Display for FilterAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterAxis::City => "city",
            FilterAxis::Month => "month",
            FilterAxis::Day => "day",
        })
    }
}

/// A city, month or day value outside its accepted set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {axis} `{value}`, expected one of: {expected}")]
pub struct InvalidFilterValue {
    pub axis: FilterAxis,
    pub value: String,
    pub expected: &'static str,
}

/// Failures while reading a city's trip file into a [`Table`](crate::table::Table).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column `{column}` is missing")]
    MissingColumn { column: &'static str },

    /// A timestamp cell could not be parsed. Fatal for the whole load.
    #[error("unparsable {column} `{value}` on line {line}")]
    Parse {
        column: &'static str,
        line: u64,
        value: String,
    },
}

/// An aggregator was handed a view with nothing to aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("no trips to compute {aggregator} statistics from")]
pub struct EmptyResultError {
    pub aggregator: &'static str,
}

/// Errors that abort a query before any statistic is produced.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    InvalidFilter(#[from] InvalidFilterValue),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Failures reading the optional city → path override file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read city config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid city config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid city config {path}: {source}")]
    UnknownCity {
        path: PathBuf,
        #[source]
        source: InvalidFilterValue,
    },
}
