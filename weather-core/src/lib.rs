//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Location resolution (forward and reverse geocoding)
//! - Forecast retrieval and normalization into [`WeatherSnapshot`]
//! - A request cache with per-key deduplication and retries
//! - Durable user preferences and search history
//!
//! It is used by `weather-cli`, but can also be reused by other frontends.

pub mod cache;
pub mod clock;
pub mod codes;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod preferences;
pub mod provider;
pub mod resolver;
pub mod retry;
pub mod service;
pub mod store;

#[cfg(test)]
mod testing;

pub use cache::RequestCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use codes::{IconId, describe, icon_id};
pub use config::Config;
pub use error::{ErrorKind, ProviderStage, WeatherError};
pub use history::SearchHistory;
pub use model::{CurrentConditions, DailyPoint, Forecast, HourlyPoint, Location, WeatherSnapshot};
pub use pipeline::Pipeline;
pub use preferences::{TempUnit, Theme, UserPreferences};
pub use provider::{ForecastProvider, Geocoder, OpenMeteoClient, RawPayload};
pub use resolver::{LocationResolver, Query};
pub use retry::RetryPolicy;
pub use service::{SearchOutcome, WeatherService};
pub use store::{FilePersistence, MemoryPersistence, Persistence, Store};
