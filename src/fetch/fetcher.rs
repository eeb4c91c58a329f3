// Cache-first fetcher.
// Serves records from the cache store and falls back to a backed-off remote call.

use std::cell::RefCell;
use std::collections::HashSet;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::api::Remote;
use crate::cache::{CacheKey, CacheStore};
use crate::error::Result;

use super::retry::{RetryPolicy, Sleep, with_backoff};

/// Pause after every uncached remote call.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(100);

/// A record together with where it came from.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub record: T,
    pub cache_hit: bool,
}

/// Remote access wrapped in retry, caching, and request pacing.
pub struct Fetcher<R, S> {
    pub(super) remote: R,
    pub(super) sleeper: S,
    pub(super) store: CacheStore,
    retry: RetryPolicy,
    request_delay: Duration,
    /// Keys already force-refreshed during this run.
    refreshed: RefCell<HashSet<CacheKey>>,
}

impl<R: Remote, S: Sleep> Fetcher<R, S> {
    pub fn new(remote: R, sleeper: S, store: CacheStore) -> Self {
        Self {
            remote,
            sleeper,
            store,
            retry: RetryPolicy::default(),
            request_delay: DEFAULT_REQUEST_DELAY,
            refreshed: RefCell::new(HashSet::new()),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_request_delay(mut self, request_delay: Duration) -> Self {
        self.request_delay = request_delay;
        self
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Fetch the record stored under `key`, calling `url` on a cache miss.
    ///
    /// With `force_refresh` the cached entry is dropped first, once per key
    /// per run. Errors mean every attempt failed; the caller skips the item.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        key: &CacheKey,
        url: &str,
        force_refresh: bool,
    ) -> Result<Fetched<T>> {
        let refresh = force_refresh && self.refreshed.borrow_mut().insert(key.clone());

        if refresh {
            match self.store.invalidate(key) {
                Ok(()) => debug!(resource = %key.label(), "Removed cache entry to force refresh"),
                Err(err) => warn!(resource = %key.label(), error = %err, "Failed to remove cache entry"),
            }
        } else if let Some(record) = self.cached(key) {
            return Ok(Fetched {
                record,
                cache_hit: true,
            });
        }

        info!(resource = %key.label(), "Fetching from API");
        let label = key.label();
        let remote = &self.remote;
        let result = with_backoff(&self.retry, &self.sleeper, &label, move || {
            remote.get_json(url)
        })
        .await;
        self.pause().await;

        let value = result?;
        let record: T = serde_json::from_value(value.clone())?;

        if let Err(err) = self.store.save(key, &value) {
            warn!(resource = %label, error = %err, "Failed to save cache entry");
        }

        Ok(Fetched {
            record,
            cache_hit: false,
        })
    }

    /// Cached record for `key`. Unreadable entries count as misses.
    fn cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.store.load(key) {
            Ok(Some(record)) => {
                debug!(resource = %key.label(), "Cache hit");
                Some(record)
            }
            Ok(None) => None,
            Err(err) => {
                warn!(resource = %key.label(), error = %err, "Error reading cache entry");
                None
            }
        }
    }

    /// Politeness delay after a real network call.
    pub async fn pause(&self) {
        if !self.request_delay.is_zero() {
            self.sleeper.sleep(self.request_delay).await;
        }
    }
}
