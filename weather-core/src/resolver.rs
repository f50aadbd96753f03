//! Turns user input into a [`Location`].
//!
//! Input of the form `"lat,lon"` goes through reverse geocoding, which
//! degrades to an "Unknown location" placeholder when nothing is found.
//! Everything else is a place name and must resolve to a result.

use std::sync::Arc;

use crate::{error::WeatherError, model::Location, provider::Geocoder};

/// Shape of a search query.
#[derive(Debug, Clone, PartialEq)]
pub enum Query<'a> {
    Name(&'a str),
    Coordinates { lat: f64, lon: f64 },
}

impl<'a> Query<'a> {
    /// Comma-separated input whose halves are both valid coordinates is a
    /// coordinate query; anything else is treated as a place name.
    pub fn parse(input: &'a str) -> Self {
        let input = input.trim();
        if let Some((lat, lon)) = input.split_once(',')
            && let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>())
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon)
        {
            return Query::Coordinates { lat, lon };
        }
        Query::Name(input)
    }
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    pub async fn resolve(&self, query: &str) -> Result<Location, WeatherError> {
        match Query::parse(query) {
            Query::Name(name) => self.resolve_by_name(name).await,
            Query::Coordinates { lat, lon } => self.resolve_by_coordinates(lat, lon).await,
        }
    }

    pub async fn resolve_by_name(&self, query: &str) -> Result<Location, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::NotFound(String::new()));
        }

        self.geocoder
            .forward(query)
            .await?
            .ok_or_else(|| WeatherError::NotFound(query.to_string()))
    }

    pub async fn resolve_by_coordinates(&self, lat: f64, lon: f64) -> Result<Location, WeatherError> {
        match self.geocoder.reverse(lat, lon).await? {
            Some(location) => Ok(location),
            None => {
                tracing::debug!(lat, lon, "reverse geocoding found nothing");
                Ok(Location::unknown(lat, lon))
            }
        }
    }
}
