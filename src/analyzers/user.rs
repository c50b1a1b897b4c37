use crate::analyzers::types::{
    BirthYearStats, Count, DemographicStats, Demographics, UserStats,
};
use crate::analyzers::utility::{mode, value_counts};
use crate::error::EmptyResultError;
use crate::table::TableView;

impl UserStats {
    /// User-type counts, plus gender and birth-year figures when the source
    /// file has both demographic columns.
    ///
    /// The demographic check looks at the schema, not at row values: a file
    /// with a `Gender` column full of empty cells still yields
    /// [`Demographics::Available`].
    #[tracing::instrument(skip(view), fields(rows = view.len()))]
    pub fn from_view(view: &TableView<'_>) -> Result<Self, EmptyResultError> {
        if view.is_empty() {
            return Err(EmptyResultError { aggregator: "user" });
        }

        let user_types = counts(view.iter().filter_map(|r| r.user_type.as_deref()));

        let demographics = if view.schema().has_demographics() {
            Demographics::Available(demographic_stats(view))
        } else {
            Demographics::Unavailable
        };

        Ok(UserStats {
            user_types,
            demographics,
        })
    }
}

fn demographic_stats(view: &TableView<'_>) -> DemographicStats {
    let genders = counts(view.iter().filter_map(|r| r.gender.as_deref()));

    let years: Vec<i32> = view.iter().filter_map(|r| r.birth_year).collect();
    let birth_years = match (years.iter().min(), years.iter().max(), mode(years.iter().copied())) {
        (Some(&earliest), Some(&most_recent), Some(most_common)) => Some(BirthYearStats {
            earliest,
            most_recent,
            most_common,
        }),
        _ => None,
    };

    DemographicStats {
        genders,
        birth_years,
    }
}

fn counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<Count> {
    value_counts(values)
        .into_iter()
        .map(|(value, count)| Count {
            value: value.to_string(),
            count,
        })
        .collect()
}
