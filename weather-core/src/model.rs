use serde::{Deserialize, Serialize};

/// A resolved place. Immutable once attached to a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const UNKNOWN_NAME: &'static str = "Unknown location";

    /// Placeholder used when reverse geocoding finds nothing at the coordinates.
    pub fn unknown(lat: f64, lon: f64) -> Self {
        Self {
            name: Self::UNKNOWN_NAME.to_string(),
            country: String::new(),
            lat,
            lon,
        }
    }
}

/// Conditions at a single instant, in provider units (Celsius, km/h, hPa).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub temp: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub weather_code: i32,
    pub pressure: f64,
    pub feels_like: f64,
    pub uv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    /// ISO date, e.g. `2025-03-01`.
    pub date: String,
    pub temp_max: f64,
    pub temp_min: f64,
    pub weather_code: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPoint {
    /// ISO local datetime without offset, e.g. `2025-03-01T14:00`.
    pub time: String,
    pub temp: f64,
    pub weather_code: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub daily: Vec<DailyPoint>,
    pub hourly: Vec<HourlyPoint>,
}

impl Forecast {
    /// The first `hours` hourly points. Points are already zipped, so
    /// truncating here cannot separate a label from its values.
    pub fn hourly_window(&self, hours: usize) -> &[HourlyPoint] {
        &self.hourly[..hours.min(self.hourly.len())]
    }
}

/// Canonical weather view for one location. Lives only in the request cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: Forecast,
}
