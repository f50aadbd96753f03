//! Request cache with per-key deduplication.
//!
//! Entries are keyed by the query string exactly as submitted. Concurrent
//! loads of one key share a single pipeline run; loads of different keys
//! never affect each other.

use chrono::{DateTime, TimeDelta, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use crate::{clock::Clock, error::WeatherError, model::WeatherSnapshot, pipeline::Pipeline};

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

type LoadResult = Result<Arc<WeatherSnapshot>, WeatherError>;
type PendingLoad = Shared<BoxFuture<'static, LoadResult>>;

struct CacheEntry {
    snapshot: Arc<WeatherSnapshot>,
    fetched_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    entries: HashMap<String, CacheEntry>,
    in_flight: HashMap<String, PendingLoad>,
}

struct Inner {
    pipeline: Pipeline,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    state: Mutex<State>,
}

impl Inner {
    fn fresh(&self, state: &State, key: &str) -> Option<Arc<WeatherSnapshot>> {
        let entry = state.entries.get(key)?;
        (self.clock.now() - entry.fetched_at < self.ttl).then(|| entry.snapshot.clone())
    }
}

#[derive(Clone)]
pub struct RequestCache {
    inner: Arc<Inner>,
}

impl fmt::Debug for RequestCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("RequestCache")
            .field("ttl", &self.inner.ttl)
            .field("entries", &state.entries.len())
            .field("in_flight", &state.in_flight.len())
            .finish()
    }
}

impl RequestCache {
    pub fn new(pipeline: Pipeline, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                pipeline,
                clock,
                ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Cached snapshot for `key` if it is still fresh. Never touches the network.
    pub fn get(&self, key: &str) -> Option<Arc<WeatherSnapshot>> {
        let state = self.inner.state.lock();
        self.inner.fresh(&state, key)
    }

    /// Fresh cached snapshot, or the result of the (possibly shared) pipeline run.
    pub async fn load(&self, key: &str) -> LoadResult {
        let pending = {
            let mut state = self.inner.state.lock();

            if let Some(snapshot) = self.inner.fresh(&state, key) {
                tracing::debug!(key, "cache hit");
                return Ok(snapshot);
            }

            match state.in_flight.get(key) {
                Some(pending) => {
                    tracing::debug!(key, "joining in-flight load");
                    pending.clone()
                }
                None => {
                    tracing::info!(key, "cache miss, loading");
                    let pending = start_load(self.inner.clone(), key.to_string());
                    state.in_flight.insert(key.to_string(), pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    pub fn invalidate(&self, key: &str) {
        self.inner.state.lock().entries.remove(key);
    }

    /// Drops every cached snapshot. In-flight loads still complete and populate their keys.
    pub fn clear(&self) {
        self.inner.state.lock().entries.clear();
    }

    /// Number of cached entries. Expired ones linger until the next successful load.
    pub fn len(&self) -> usize {
        self.inner.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn start_load(inner: Arc<Inner>, key: String) -> PendingLoad {
    async move {
        let result = inner.pipeline.run(&key).await.map(Arc::new);

        let mut state = inner.state.lock();
        state.in_flight.remove(&key);
        match &result {
            Ok(snapshot) => {
                let now = inner.clock.now();
                let ttl = inner.ttl;
                state.entries.retain(|_, entry| now - entry.fetched_at < ttl);
                let entry = CacheEntry {
                    snapshot: snapshot.clone(),
                    fetched_at: now,
                };
                state.entries.insert(key, entry);
            }
            Err(err) => tracing::warn!(key = %key, "load failed: {err}"),
        }
        drop(state);

        result
    }
    .boxed()
    .shared()
}
