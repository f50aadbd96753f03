//! Test doubles shared by the unit tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::{
    error::{ProviderStage, WeatherError},
    model::Location,
    provider::{ForecastProvider, Geocoder, RawCurrent, RawDaily, RawHourly, RawPayload},
};

pub fn paris() -> Location {
    Location {
        name: "Paris".into(),
        country: "France".into(),
        lat: 48.85,
        lon: 2.35,
    }
}

pub fn sample_payload(hours: usize, days: usize) -> RawPayload {
    RawPayload {
        current: RawCurrent {
            temperature_2m: 12.5,
            relative_humidity_2m: 71.0,
            apparent_temperature: 11.0,
            weather_code: 61,
            surface_pressure: 1003.2,
            wind_speed_10m: 14.4,
            uv_index: 3.1,
        },
        hourly: RawHourly {
            time: (0..hours).map(|h| format!("2025-03-{:02}T{:02}:00", 1 + h / 24, h % 24)).collect(),
            temperature_2m: (0..hours).map(|h| h as f64 / 2.0).collect(),
            weathercode: (0..hours).map(|h| if h % 2 == 0 { 0 } else { 61 }).collect(),
        },
        daily: RawDaily {
            time: (0..days).map(|d| format!("2025-03-{:02}", d + 1)).collect(),
            weathercode: vec![3; days],
            temperature_2m_max: (0..days).map(|d| 14.0 + d as f64).collect(),
            temperature_2m_min: (0..days).map(|d| 5.0 + d as f64).collect(),
        },
    }
}

/// Geocoder that knows a fixed set of places by name.
#[derive(Debug, Default)]
pub struct FakeGeocoder {
    pub places: Vec<Location>,
    pub forward_calls: AtomicUsize,
    pub reverse_calls: AtomicUsize,
    /// Forward lookups fail with a provider error this many times first.
    pub forward_failures: usize,
}

impl FakeGeocoder {
    pub fn with(places: Vec<Location>) -> Self {
        Self {
            places,
            ..Default::default()
        }
    }

    pub fn forward_calls(&self) -> usize {
        self.forward_calls.load(Ordering::SeqCst)
    }

    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn forward(&self, query: &str) -> Result<Option<Location>, WeatherError> {
        let n = self.forward_calls.fetch_add(1, Ordering::SeqCst);
        if n < self.forward_failures {
            return Err(WeatherError::provider(ProviderStage::ForwardGeocode, "connection reset"));
        }
        Ok(self.places.iter().find(|p| p.name == query).cloned())
    }

    async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<Location>, WeatherError> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .places
            .iter()
            .find(|p| (p.lat - lat).abs() < 0.01 && (p.lon - lon).abs() < 0.01)
            .cloned())
    }
}

/// Forecast source that counts calls and can be told to fail or stall.
#[derive(Debug)]
pub struct FakeForecast {
    pub payload: RawPayload,
    pub calls: AtomicUsize,
    pub failures: usize,
    pub delay: Duration,
}

impl FakeForecast {
    pub fn new(payload: RawPayload) -> Self {
        Self {
            payload,
            calls: AtomicUsize::new(0),
            failures: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn failing(mut self, failures: usize) -> Self {
        self.failures = failures;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForecastProvider for FakeForecast {
    async fn fetch(&self, _lat: f64, _lon: f64) -> Result<RawPayload, WeatherError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if n < self.failures {
            return Err(WeatherError::provider_status(ProviderStage::Forecast, 503, "unavailable"));
        }
        Ok(self.payload.clone())
    }
}
