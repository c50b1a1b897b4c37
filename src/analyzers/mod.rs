//! Trip statistics over a filtered view.
//!
//! Each aggregator is an independent, read-only pass over a [`TableView`]
//! and fails on its own with [`EmptyResultError`] when there is nothing to
//! aggregate. [`report::Report`] runs all of them and times each one.
//!
//! [`TableView`]: crate::table::TableView
//! [`EmptyResultError`]: crate::error::EmptyResultError

pub mod duration;
pub mod report;
pub mod station;
pub mod time;
pub mod types;
pub mod user;
pub mod utility;
