use crate::analyzers::types::DurationStats;
use crate::analyzers::utility::mean;
use crate::error::EmptyResultError;
use crate::table::TableView;

impl DurationStats {
    /// Total and mean trip duration. Rows without a duration are skipped.
    #[tracing::instrument(skip(view), fields(rows = view.len()))]
    pub fn from_view(view: &TableView<'_>) -> Result<Self, EmptyResultError> {
        let durations: Vec<f64> = view.iter().filter_map(|r| r.trip_duration).collect();
        let skipped = view.len() - durations.len();
        if skipped > 0 {
            tracing::warn!(skipped, "Trips without a duration excluded");
        }

        let mean_secs = mean(&durations).ok_or(EmptyResultError {
            aggregator: "duration",
        })?;

        Ok(DurationStats {
            total_secs: durations.iter().sum(),
            mean_secs,
            trips: durations.len(),
        })
    }
}
