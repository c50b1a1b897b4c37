//! In-memory trip table and the filtered views derived from it.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::filters::Filters;

/// Which optional columns the source file carried.
///
/// Presence is a property of the file, not of individual rows: a city
/// without a `Gender` column is different from one with empty gender cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_end_time: bool,
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl Schema {
    pub fn has_demographics(&self) -> bool {
        self.has_gender && self.has_birth_year
    }
}

/// One trip plus the calendar fields derived from its start time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Seconds. `None` only for malformed rows, which duration stats skip.
    pub trip_duration: Option<f64>,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<String>,

    pub month: u32,
    pub day_of_week: Weekday,
    pub hour: u32,
}

impl Record {
    /// Builds a record, deriving `month`, `day_of_week` and `hour` from
    /// `start_time` so they can never disagree with it.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start_time: NaiveDateTime,
        end_time: Option<NaiveDateTime>,
        trip_duration: Option<f64>,
        start_station: String,
        end_station: String,
        user_type: Option<String>,
        birth_year: Option<i32>,
        gender: Option<String>,
    ) -> Self {
        Self {
            month: start_time.month(),
            day_of_week: start_time.weekday(),
            hour: start_time.hour(),
            start_time,
            end_time,
            trip_duration,
            start_station,
            end_station,
            user_type,
            birth_year,
            gender,
        }
    }
}

/// Every trip loaded from one city's file, in file order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    schema: Schema,
    records: Vec<Record>,
}

impl Table {
    pub fn new(schema: Schema, records: Vec<Record>) -> Self {
        Self { schema, records }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Unfiltered view over the whole table.
    pub fn view(&self) -> TableView<'_> {
        TableView {
            schema: &self.schema,
            rows: self.records.iter().collect(),
        }
    }
}

/// Order-preserving subsequence of a [`Table`].
///
/// Views borrow the table's rows, so neither filtering nor the aggregators
/// reading a view can change the underlying data.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    schema: &'a Schema,
    rows: Vec<&'a Record>,
}

impl<'a> TableView<'a> {
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keeps the rows matching both the month and the day predicate.
    #[tracing::instrument(skip(self), fields(input_rows = self.rows.len(), output_rows = tracing::field::Empty))]
    pub fn filter(&self, filters: &Filters) -> TableView<'a> {
        let rows: Vec<&'a Record> = self
            .rows
            .iter()
            .copied()
            .filter(|r| filters.matches(r))
            .collect();

        tracing::Span::current().record("output_rows", rows.len());

        TableView {
            schema: self.schema,
            rows,
        }
    }
}

impl PartialEq for TableView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.rows == other.rows
    }
}
