use serde::Deserialize;
use std::fmt;

/// Placeholder substituted for optional fields the upstream omitted.
pub const NOT_AVAILABLE: &str = "N/A";

/// Ordered, display-ready output of a fetcher.
///
/// Keys keep insertion order; inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBag {
    entries: Vec<(String, String)>,
}

impl FieldBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// One `key : value` line per entry.
impl fmt::Display for FieldBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "{key} : {value}")?;
        }
        Ok(())
    }
}

/// Latitude/longitude pair as returned by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoCoordinate {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Free-text location typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationQuery {
    pub city: String,
    pub state_code: String,
    pub country_code: String,
}

impl LocationQuery {
    pub fn new(
        city: impl Into<String>,
        state_code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            state_code: state_code.into(),
            country_code: country_code.into(),
        }
    }
}

/// Result of a full geocode-then-weather run.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub coordinate: GeoCoordinate,
    pub fields: FieldBag,
}
