use std::sync::Arc;

use crate::{
    error::WeatherError,
    model::WeatherSnapshot,
    normalize::normalize,
    provider::{ForecastProvider, Geocoder},
    resolver::LocationResolver,
    retry::{RetryPolicy, with_retry},
};

/// Resolve, fetch and normalize for a single query.
///
/// Each network stage is retried on its own, so a failed forecast call is
/// repeated without geocoding the query again.
#[derive(Debug, Clone)]
pub struct Pipeline {
    resolver: LocationResolver,
    forecast: Arc<dyn ForecastProvider>,
    retry: RetryPolicy,
}

impl Pipeline {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        forecast: Arc<dyn ForecastProvider>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            resolver: LocationResolver::new(geocoder),
            forecast,
            retry,
        }
    }

    pub async fn run(&self, query: &str) -> Result<WeatherSnapshot, WeatherError> {
        let location = with_retry(self.retry, "geocoding", || self.resolver.resolve(query)).await?;

        let (lat, lon) = (location.lat, location.lon);
        let raw = with_retry(self.retry, "forecast", || self.forecast.fetch(lat, lon)).await?;

        normalize(location, raw)
    }
}
