use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{error::WeatherError, model::Location};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Forward and reverse geocoding.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Best single match for `query`, or `None` if the provider knows no such place.
    async fn forward(&self, query: &str) -> Result<Option<Location>, WeatherError>;

    /// Place at the given coordinates, or `None` if the provider has nothing there.
    async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<Location>, WeatherError>;
}

/// Raw current/hourly/daily forecast retrieval.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<RawPayload, WeatherError>;
}

/// Forecast response in the provider's own field names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPayload {
    pub current: RawCurrent,
    pub hourly: RawHourly,
    pub daily: RawDaily,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCurrent {
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    pub weather_code: i32,
    pub surface_pressure: f64,
    pub wind_speed_10m: f64,
    pub uv_index: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawHourly {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub weathercode: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDaily {
    pub time: Vec<String>,
    pub weathercode: Vec<i32>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
}
