use crate::analyzers::types::{Popular, Route, StationStats};
use crate::analyzers::utility::mode;
use crate::error::EmptyResultError;
use crate::table::TableView;

impl StationStats {
    /// Most used start station, end station and start/end combination.
    #[tracing::instrument(skip(view), fields(rows = view.len()))]
    pub fn from_view(view: &TableView<'_>) -> Result<Self, EmptyResultError> {
        let empty = EmptyResultError {
            aggregator: "station",
        };

        let start = mode(view.iter().map(|r| r.start_station.as_str())).ok_or(empty)?;
        let end = mode(view.iter().map(|r| r.end_station.as_str())).ok_or(empty)?;
        let route = mode(
            view.iter()
                .map(|r| (r.start_station.as_str(), r.end_station.as_str())),
        )
        .ok_or(empty)?;

        Ok(StationStats {
            start_station: owned(start),
            end_station: owned(end),
            route: Popular {
                value: Route {
                    start: route.value.0.to_string(),
                    end: route.value.1.to_string(),
                },
                count: route.count,
            },
        })
    }
}

fn owned(p: Popular<&str>) -> Popular<String> {
    Popular {
        value: p.value.to_string(),
        count: p.count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_util::{table, trip, ts};

    #[test]
    fn test_popular_stations_and_route() {
        let t = table(vec![
            trip(ts(2017, 1, 2, 8), "Clark St", "Lake St", 1.0),
            trip(ts(2017, 1, 2, 9), "State St", "Clark St", 1.0),
            trip(ts(2017, 1, 2, 10), "State St", "Lake St", 1.0),
            trip(ts(2017, 1, 2, 11), "Clark St", "Lake St", 1.0),
            trip(ts(2017, 1, 2, 12), "Wells St", "Lake St", 1.0),
        ]);
        let stats = StationStats::from_view(&t.view()).unwrap();

        // Clark St and State St tie on starts; Clark St appears first.
        assert_eq!(stats.start_station.value, "Clark St");
        assert_eq!(stats.start_station.count, 2);
        assert_eq!(stats.end_station.value, "Lake St");
        assert_eq!(stats.end_station.count, 4);
        assert_eq!(
            stats.route.value,
            Route {
                start: "Clark St".to_string(),
                end: "Lake St".to_string(),
            }
        );
        assert_eq!(stats.route.count, 2);
    }

    #[test]
    fn test_route_is_a_single_key() {
        // A->B and B->A are different routes even though stations repeat.
        let t = table(vec![
            trip(ts(2017, 1, 2, 8), "B", "A", 1.0),
            trip(ts(2017, 1, 2, 9), "A", "B", 1.0),
            trip(ts(2017, 1, 2, 10), "A", "B", 1.0),
        ]);
        let stats = StationStats::from_view(&t.view()).unwrap();
        assert_eq!(stats.route.value.start, "A");
        assert_eq!(stats.route.value.end, "B");
    }

    #[test]
    fn test_empty_view_is_an_error() {
        let t = table(vec![]);
        let err = StationStats::from_view(&t.view()).unwrap_err();
        assert_eq!(
            err,
            EmptyResultError {
                aggregator: "station"
            }
        );
    }
}
