use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    config::Config,
    error::{ProviderStage, WeatherError},
    model::Location,
};

use super::{ForecastProvider, Geocoder, RawPayload};

const HOURLY_FIELDS: &str = "temperature_2m,weathercode";
const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min";
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,surface_pressure,wind_speed_10m,uv_index";

/// Client for the open-meteo geocoding and forecast APIs. No API key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    geocoding_url: String,
    reverse_geocoding_url: String,
    forecast_url: String,
    language: String,
}

#[derive(Debug, Serialize)]
struct ForwardQuery<'a> {
    name: &'a str,
    count: u8,
    language: &'a str,
    format: &'a str,
}

#[derive(Debug, Serialize)]
struct ReverseQuery<'a> {
    latitude: f64,
    longitude: f64,
    language: &'a str,
}

#[derive(Debug, Serialize)]
struct ForecastQuery<'a> {
    latitude: f64,
    longitude: f64,
    hourly: &'a str,
    daily: &'a str,
    current: &'a str,
    timezone: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    name: String,
    #[serde(default)]
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl From<GeocodeResult> for Location {
    fn from(r: GeocodeResult) -> Self {
        Location {
            name: r.name,
            country: r.country.unwrap_or_default(),
            lat: r.latitude,
            lon: r.longitude,
        }
    }
}

impl OpenMeteoClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(concat!("weather-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            geocoding_url: config.geocoding_url.clone(),
            reverse_geocoding_url: config.reverse_geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
            language: config.language.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        stage: ProviderStage,
        request: RequestBuilder,
    ) -> Result<T, WeatherError> {
        let res = request
            .send()
            .await
            .map_err(|e| WeatherError::provider(stage, format!("failed to send request: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::provider(stage, format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(WeatherError::provider_status(
                stage,
                status.as_u16(),
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::provider(stage, format!("failed to parse response JSON: {e}")))
    }
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    async fn forward(&self, query: &str) -> Result<Option<Location>, WeatherError> {
        tracing::debug!(query, "forward geocoding");
        let params = ForwardQuery {
            name: query,
            count: 1,
            language: &self.language,
            format: "json",
        };
        let parsed: GeocodeResponse = self
            .get_json(
                ProviderStage::ForwardGeocode,
                self.http.get(&self.geocoding_url).query(&params),
            )
            .await?;

        Ok(parsed.results.into_iter().next().map(Location::from))
    }

    async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<Location>, WeatherError> {
        tracing::debug!(lat, lon, "reverse geocoding");
        let params = ReverseQuery {
            latitude: lat,
            longitude: lon,
            language: &self.language,
        };
        let parsed: GeocodeResponse = self
            .get_json(
                ProviderStage::ReverseGeocode,
                self.http.get(&self.reverse_geocoding_url).query(&params),
            )
            .await?;

        Ok(parsed.results.into_iter().next().map(Location::from))
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<RawPayload, WeatherError> {
        tracing::debug!(lat, lon, "fetching forecast");
        let params = ForecastQuery {
            latitude: lat,
            longitude: lon,
            hourly: HOURLY_FIELDS,
            daily: DAILY_FIELDS,
            current: CURRENT_FIELDS,
            timezone: "auto",
        };
        self.get_json(
            ProviderStage::Forecast,
            self.http.get(&self.forecast_url).query(&params),
        )
        .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
