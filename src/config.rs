use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::filters::City;

/// Maps each city to the CSV file holding its trips.
///
/// Defaults to `<data_dir>/chicago.csv`, `<data_dir>/new_york_city.csv` and
/// `<data_dir>/washington.csv`. Individual entries can be overridden by a
/// plain JSON object on disk:
/// ```json
/// {
///   "chicago": "/data/divvy/2017-h1.csv",
///   "washington": "capital_bikeshare.csv"
/// }
/// ```
/// Relative override paths are resolved against the data directory.
#[derive(Debug, Clone)]
pub struct CityConfig {
    data_dir: PathBuf,
    overrides: HashMap<City, PathBuf>,
}

impl CityConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overrides: HashMap::new(),
        }
    }

    /// Loads per-city overrides from a JSON file at `path`.
    pub fn with_overrides_from(mut self, path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: HashMap<String, PathBuf> =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        for (key, file) in entries {
            let city = key.parse().map_err(|source| ConfigError::UnknownCity {
                path: path.to_path_buf(),
                source,
            })?;
            self.overrides.insert(city, file);
        }

        Ok(self)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the trip file for `city`.
    pub fn path_for(&self, city: City) -> PathBuf {
        match self.overrides.get(&city) {
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) => self.data_dir.join(file),
            None => self.data_dir.join(city.default_file()),
        }
    }

    /// Iterates over all `(city, path)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (City, PathBuf)> + '_ {
        City::ALL.into_iter().map(|city| (city, self.path_for(city)))
    }
}

impl Default for CityConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
