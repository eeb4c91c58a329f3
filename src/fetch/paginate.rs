// Paginated list collection.
// Follows `next` cursors and keeps whole-collection snapshots in the cache.

use tracing::{info, warn};

use crate::api::{Page, Remote, ResourceRef};
use crate::cache::{CacheKey, Snapshot};
use crate::error::{Error, Result};

use super::fetcher::Fetcher;
use super::retry::Sleep;

/// Refs gathered from a list endpoint.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub items: Vec<ResourceRef>,
    /// True when the last page was reached and nothing was truncated.
    pub complete: bool,
}

impl<R: Remote, S: Sleep> Fetcher<R, S> {
    /// Walk a paginated list from `list_url`.
    ///
    /// Stops once `limit` items are held, without requesting further pages.
    /// A failed page ends pagination and keeps what was collected so far.
    pub async fn collect_all(&self, list_url: &str, limit: Option<usize>) -> Collected {
        let mut items: Vec<ResourceRef> = Vec::new();
        let mut next = Some(list_url.to_string());
        let mut reached_end = false;

        while let Some(url) = next.take() {
            if limit.is_some_and(|limit| items.len() >= limit) {
                break;
            }

            info!(%url, "Fetching page");
            let page = self.fetch_page(&url).await;
            self.pause().await;

            match page {
                Ok(page) => {
                    items.extend(page.results);
                    match page.next {
                        Some(next_url) => next = Some(next_url),
                        None => reached_end = true,
                    }
                }
                Err(err) => {
                    warn!(%url, error = %err, "Failed to fetch page, keeping {} items", items.len());
                    break;
                }
            }
        }

        let mut complete = reached_end;
        if let Some(limit) = limit {
            if items.len() > limit {
                items.truncate(limit);
                complete = false;
            }
        }

        Collected { items, complete }
    }

    async fn fetch_page(&self, url: &str) -> Result<Page> {
        let value = self.remote.get_json(url).await?;
        serde_json::from_value(value).map_err(Error::from)
    }

    /// Resource list from the snapshot under `key`, collecting it on a miss.
    ///
    /// A snapshot is reused when it is complete or already holds `limit`
    /// items. Fresh, non-empty collections are saved as a new snapshot.
    pub async fn load_or_collect(
        &self,
        key: &CacheKey,
        list_url: &str,
        limit: Option<usize>,
        force_refresh: bool,
    ) -> Vec<ResourceRef> {
        if force_refresh {
            if let Err(err) = self.store.invalidate(key) {
                warn!(resource = %key.label(), error = %err, "Failed to remove cached list");
            }
        } else {
            match self.store.load::<Snapshot<Vec<ResourceRef>>>(key) {
                Ok(Some(snapshot))
                    if snapshot.complete
                        || limit.is_some_and(|limit| snapshot.items.len() >= limit) =>
                {
                    info!(
                        created = %snapshot.timestamp,
                        "Loaded {} from cache ({} entries)",
                        key.label(),
                        snapshot.items.len()
                    );
                    return truncate(snapshot.items, limit);
                }
                Ok(Some(snapshot)) => info!(
                    "Cached {} is partial ({} entries), fetching from API",
                    key.label(),
                    snapshot.items.len()
                ),
                Ok(None) => info!("No cached {}, fetching from API", key.label()),
                Err(err) => {
                    warn!(resource = %key.label(), error = %err, "Error loading cached list")
                }
            }
        }

        let collected = self.collect_all(list_url, limit).await;
        if collected.items.is_empty() {
            return collected.items;
        }

        let snapshot = Snapshot::new(collected.items, collected.complete);
        match self.store.save(key, &snapshot) {
            Ok(()) => info!(
                path = %self.store.layout().path_for(key).display(),
                "Cached {}",
                key.label()
            ),
            Err(err) => warn!(resource = %key.label(), error = %err, "Error saving cached list"),
        }
        snapshot.items
    }
}

fn truncate(mut items: Vec<ResourceRef>, limit: Option<usize>) -> Vec<ResourceRef> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheLayout, CacheStore};
    use crate::testing::{FakeRemote, RecordingSleep};
    use serde_json::{Value, json};
    use tempfile::TempDir;

    const PAGE_1: &str = "http://api/pokemon";
    const PAGE_2: &str = "http://api/pokemon?offset=2&limit=2";
    const PAGE_3: &str = "http://api/pokemon?offset=4&limit=2";

    fn page(names: &[&str], next: Option<&str>) -> Value {
        let results: Vec<Value> = names
            .iter()
            .map(|name| json!({"name": name, "url": format!("http://api/pokemon/{}/", name)}))
            .collect();
        json!({"count": 5, "next": next, "previous": null, "results": results})
    }

    fn three_pages() -> FakeRemote {
        FakeRemote::new()
            .json(PAGE_1, page(&["a", "b"], Some(PAGE_2)))
            .json(PAGE_2, page(&["c", "d"], Some(PAGE_3)))
            .json(PAGE_3, page(&["e"], None))
    }

    fn fetcher(temp_dir: &TempDir, remote: FakeRemote) -> Fetcher<FakeRemote, RecordingSleep> {
        let store = CacheStore::new(CacheLayout::new(temp_dir.path()));
        Fetcher::new(remote, RecordingSleep::default(), store)
    }

    fn names(items: &[ResourceRef]) -> Vec<&str> {
        items.iter().map(|r| r.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_collects_all_pages_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = fetcher(&temp_dir, three_pages());

        let collected = fetcher.collect_all(PAGE_1, None).await;

        assert_eq!(names(&collected.items), vec!["a", "b", "c", "d", "e"]);
        assert!(collected.complete);
        assert_eq!(fetcher.remote().calls().len(), 3);
    }

    #[tokio::test]
    async fn test_limit_stops_before_next_page() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = fetcher(&temp_dir, three_pages());

        let collected = fetcher.collect_all(PAGE_1, Some(3)).await;

        assert_eq!(names(&collected.items), vec!["a", "b", "c"]);
        assert!(!collected.complete);
        assert_eq!(fetcher.remote().call_count(PAGE_3), 0);
    }

    #[tokio::test]
    async fn test_page_failure_keeps_partial_list() {
        let temp_dir = TempDir::new().unwrap();
        let remote = FakeRemote::new()
            .json(PAGE_1, page(&["a", "b"], Some(PAGE_2)))
            .flaky_json(PAGE_2, 1, page(&["c", "d"], None));
        let fetcher = fetcher(&temp_dir, remote);

        let collected = fetcher.collect_all(PAGE_1, None).await;

        assert_eq!(names(&collected.items), vec!["a", "b"]);
        assert!(!collected.complete);
    }

    #[tokio::test]
    async fn test_snapshot_is_reused() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = fetcher(&temp_dir, three_pages());
        let key = CacheKey::PokemonList;

        let first = fetcher.load_or_collect(&key, PAGE_1, None, false).await;
        assert_eq!(first.len(), 5);
        assert!(fetcher.store().exists(&key));

        let second = fetcher.load_or_collect(&key, PAGE_1, Some(2), false).await;
        assert_eq!(names(&second), vec!["a", "b"]);
        assert_eq!(fetcher.remote().calls().len(), 3);
    }

    #[tokio::test]
    async fn test_short_partial_snapshot_is_refetched() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = fetcher(&temp_dir, three_pages());
        let key = CacheKey::PokemonList;

        let limited = fetcher.load_or_collect(&key, PAGE_1, Some(2), false).await;
        assert_eq!(limited.len(), 2);
        assert_eq!(fetcher.remote().calls().len(), 1);

        let full = fetcher.load_or_collect(&key, PAGE_1, None, false).await;
        assert_eq!(full.len(), 5);
        assert_eq!(fetcher.remote().call_count(PAGE_1), 2);
    }

    #[tokio::test]
    async fn test_empty_collection_is_not_cached() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = fetcher(&temp_dir, FakeRemote::new());
        let key = CacheKey::EvolutionChainList;

        let items = fetcher.load_or_collect(&key, PAGE_1, None, false).await;

        assert!(items.is_empty());
        assert!(!fetcher.store().exists(&key));
    }

    #[tokio::test]
    async fn test_force_refresh_recollects_list() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = fetcher(&temp_dir, three_pages());
        let key = CacheKey::PokemonList;
        let stale = Snapshot::new(vec![ResourceRef::new("stale", "http://api/pokemon/0/")], true);
        fetcher.store().save(&key, &stale).unwrap();

        let cached = fetcher.load_or_collect(&key, PAGE_1, None, false).await;
        assert_eq!(names(&cached), vec!["stale"]);
        assert!(fetcher.remote().calls().is_empty());

        let refreshed = fetcher.load_or_collect(&key, PAGE_1, None, true).await;
        assert_eq!(names(&refreshed), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(fetcher.remote().call_count(PAGE_1), 1);
        assert_eq!(fetcher.remote().calls().len(), 3);

        let saved: Snapshot<Vec<ResourceRef>> = fetcher.store().load(&key).unwrap().unwrap();
        assert!(saved.complete);
        assert_eq!(names(&saved.items), vec!["a", "b", "c", "d", "e"]);
    }
}
