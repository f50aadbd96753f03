use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    cache::RequestCache,
    clock::SystemClock,
    config::Config,
    error::WeatherError,
    history::SearchHistory,
    model::WeatherSnapshot,
    pipeline::Pipeline,
    preferences::UserPreferences,
    provider::OpenMeteoClient,
    store::{FilePersistence, Persistence, Store},
};

/// Result of [`WeatherService::search`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The snapshot for the most recent search.
    Current(Arc<WeatherSnapshot>),
    /// A newer search was issued while this one was loading; its result was discarded.
    Superseded,
}

/// What a frontend talks to: cached weather lookups plus the durable store.
#[derive(Debug)]
pub struct WeatherService<P: Persistence> {
    cache: RequestCache,
    store: Mutex<Store<P>>,
    latest_search: AtomicU64,
}

impl WeatherService<FilePersistence> {
    /// Open-meteo client, system clock and on-disk state, all as configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Arc::new(OpenMeteoClient::new(config)?);
        let pipeline = Pipeline::new(client.clone(), client, config.retry_policy());
        let cache = RequestCache::new(pipeline, Arc::new(SystemClock), config.cache_ttl());
        let persistence = FilePersistence::new(config.storage_dir()?);
        tracing::debug!(path = %persistence.path().display(), "opening state store");

        Ok(Self::new(cache, Store::open(persistence)))
    }
}

impl<P: Persistence> WeatherService<P> {
    pub fn new(cache: RequestCache, store: Store<P>) -> Self {
        Self {
            cache,
            store: Mutex::new(store),
            latest_search: AtomicU64::new(0),
        }
    }

    pub async fn resolve_and_fetch(&self, query: &str) -> Result<Arc<WeatherSnapshot>, WeatherError> {
        self.cache.load(query).await
    }

    /// Like [`resolve_and_fetch`](Self::resolve_and_fetch), but only the latest
    /// search reports a result. A successful current search is recorded in history.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, WeatherError> {
        let ticket = self.latest_search.fetch_add(1, Ordering::SeqCst) + 1;

        let result = self.cache.load(query).await;

        if self.latest_search.load(Ordering::SeqCst) != ticket {
            tracing::debug!(query, ticket, "discarding superseded search");
            return Ok(SearchOutcome::Superseded);
        }

        let snapshot = result?;
        self.add_to_history(query);
        Ok(SearchOutcome::Current(snapshot))
    }

    pub fn preferences(&self) -> UserPreferences {
        self.store.lock().preferences().clone()
    }

    /// Run `f` against the store; each store mutator persists before returning.
    pub fn mutate_preferences<R>(&self, f: impl FnOnce(&mut Store<P>) -> R) -> R {
        f(&mut self.store.lock())
    }

    pub fn history(&self) -> SearchHistory {
        self.store.lock().history().clone()
    }

    pub fn add_to_history(&self, name: &str) {
        self.store.lock().add_to_history(name);
    }
}
