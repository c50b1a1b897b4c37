use crate::analyzers::types::TimeStats;
use crate::analyzers::utility::mode;
use crate::error::EmptyResultError;
use crate::filters::MonthFilter;
use crate::table::TableView;

impl TimeStats {
    /// Most common month, weekday and start hour of the view.
    ///
    /// With a specific month selected only the hour is computed, since the
    /// month is already fixed by the filter.
    #[tracing::instrument(skip(view), fields(rows = view.len()))]
    pub fn from_view(view: &TableView<'_>, month: MonthFilter) -> Result<Self, EmptyResultError> {
        let empty = EmptyResultError { aggregator: "time" };

        let hour = mode(view.iter().map(|r| r.hour)).ok_or(empty)?;

        let (month, day) = if month.is_all() {
            (
                mode(view.iter().map(|r| r.month)),
                mode(view.iter().map(|r| r.day_of_week)),
            )
        } else {
            (None, None)
        };

        Ok(TimeStats { month, day, hour })
    }
}
