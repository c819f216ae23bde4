//! Cached, single-flight listing fetches.
//!
//! Each [`ListView`] caches one listing screen per operator. At most one
//! request is in flight per view: a fetch for a different key supersedes and
//! cancels the current one, concurrent fetches for the same key share the
//! in-flight result, and results are only committed when they are still the
//! newest request. Mutations call [`ListView::invalidate`] so the next render
//! fetches fresh data.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::time::Instant;

use crate::api::ApiError;
use crate::fetch::debounce::{Debounced, Debouncer};
use crate::fetch::{FetchError, FetchResult};

/// Cache key for one page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListKey {
    pub page: usize,
    pub search: String,
}

impl ListKey {
    pub fn new(page: usize, search: impl Into<String>) -> Self {
        Self {
            page,
            search: search.into(),
        }
    }
}

struct CacheEntry<T> {
    value: T,
    inserted_at: Instant,
}

struct Inflight<T> {
    key: ListKey,
    generation: u64,
    cancel_tx: watch::Sender<bool>,
    done_rx: watch::Receiver<Option<FetchResult<T>>>,
}

struct ViewState<T> {
    generation: u64,
    entries: HashMap<ListKey, CacheEntry<T>>,
    inflight: Option<Inflight<T>>,
}

/// One listing screen of one operator.
pub struct ListView<T> {
    debouncer: Debouncer,
    stale_after: Duration,
    state: Mutex<ViewState<T>>,
}

impl<T: Clone> ListView<T> {
    pub fn new(debounce: Duration, stale_after: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(debounce),
            stale_after,
            state: Mutex::new(ViewState {
                generation: 0,
                entries: HashMap::new(),
                inflight: None,
            }),
        }
    }

    /// Wait out the quiet period for a changed search term.
    pub async fn debounce_search(&self, search: String) -> Debounced<String> {
        self.debouncer.submit(search).await
    }

    /// Resolve the listing for `key`, from cache if fresh enough.
    ///
    /// The loader is only polled when the view decides this fetch drives the
    /// request; dropping it on the cancellation path aborts the underlying
    /// HTTP call.
    pub async fn fetch<Fut>(&self, key: ListKey, loader: Fut) -> FetchResult<T>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let (mut cancel_rx, done_tx, generation) = {
            let mut state = self.state.lock().await;
            if let Some(entry) = state.entries.get(&key) {
                if entry.inserted_at.elapsed() < self.stale_after {
                    return Ok(entry.value.clone());
                }
            }
            if let Some(inflight) = &state.inflight {
                if inflight.key == key {
                    let done_rx = inflight.done_rx.clone();
                    drop(state);
                    return Self::join(done_rx).await;
                }
                // A different listing is being loaded; supersede it.
                let _ = inflight.cancel_tx.send(true);
            }
            let (cancel_tx, cancel_rx) = watch::channel(false);
            let (done_tx, done_rx) = watch::channel(None);
            state.generation += 1;
            let generation = state.generation;
            state.inflight = Some(Inflight {
                key: key.clone(),
                generation,
                cancel_tx,
                done_rx,
            });
            (cancel_rx, done_tx, generation)
        };

        let result = tokio::select! {
            result = loader => result.map_err(FetchError::Api),
            _ = cancel_rx.changed() => Err(FetchError::Cancelled),
        };

        let mut state = self.state.lock().await;
        let still_current = state
            .inflight
            .as_ref()
            .is_some_and(|inflight| inflight.generation == generation);
        if still_current {
            state.inflight = None;
            if let Ok(value) = &result {
                state.entries.insert(
                    key,
                    CacheEntry {
                        value: value.clone(),
                        inserted_at: Instant::now(),
                    },
                );
            }
            let _ = done_tx.send(Some(result.clone()));
            result
        } else {
            // A newer fetch replaced this one while the loader ran. Its
            // result must not overwrite newer state.
            let _ = done_tx.send(Some(Err(FetchError::Cancelled)));
            Err(FetchError::Cancelled)
        }
    }

    /// Drop every cached entry and cancel the in-flight fetch, if any.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.entries.clear();
        state.generation += 1;
        if let Some(inflight) = state.inflight.take() {
            let _ = inflight.cancel_tx.send(true);
        }
    }

    async fn join(mut done_rx: watch::Receiver<Option<FetchResult<T>>>) -> FetchResult<T> {
        loop {
            if let Some(result) = done_rx.borrow_and_update().clone() {
                return result;
            }
            if done_rx.changed().await.is_err() {
                // Driver went away without reporting.
                return Err(FetchError::Cancelled);
            }
        }
    }
}

/// Per-operator registry of list views for one listing screen.
///
/// Views are created lazily on first use and dropped on logout, so the
/// registry stays bounded by the number of active operators.
pub struct ListViews<T> {
    debounce: Duration,
    stale_after: Duration,
    views: Mutex<HashMap<i32, Arc<ListView<T>>>>,
}

impl<T: Clone> ListViews<T> {
    pub fn new(debounce: Duration, stale_after: Duration) -> Self {
        Self {
            debounce,
            stale_after,
            views: Mutex::new(HashMap::new()),
        }
    }

    /// The view scoped to one operator, created on first use.
    pub async fn scoped(&self, user_id: i32) -> Arc<ListView<T>> {
        let mut views = self.views.lock().await;
        Arc::clone(
            views
                .entry(user_id)
                .or_insert_with(|| Arc::new(ListView::new(self.debounce, self.stale_after))),
        )
    }

    pub async fn purge(&self, user_id: i32) {
        self.views.lock().await.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DEBOUNCE: Duration = Duration::from_millis(500);
    const STALE_AFTER: Duration = Duration::from_secs(300);

    fn view() -> Arc<ListView<String>> {
        Arc::new(ListView::new(DEBOUNCE, STALE_AFTER))
    }

    fn key(page: usize, search: &str) -> ListKey {
        ListKey::new(page, search)
    }

    fn loader(
        counter: Arc<AtomicUsize>,
        value: String,
        delay: Duration,
    ) -> impl Future<Output = Result<String, ApiError>> {
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            Ok(value)
        }
    }

    fn failing_loader(
        counter: Arc<AtomicUsize>,
        error: ApiError,
    ) -> impl Future<Output = Result<String, ApiError>> {
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(error)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_cache_hit_skips_loader() {
        let view = view();
        let counter = Arc::new(AtomicUsize::new(0));

        let first = view
            .fetch(key(1, ""), loader(Arc::clone(&counter), "page-1".to_string(), Duration::ZERO))
            .await;
        assert_eq!(first.unwrap(), "page-1");

        let second = view
            .fetch(key(1, ""), loader(Arc::clone(&counter), "page-1-again".to_string(), Duration::ZERO))
            .await;
        assert_eq!(second.unwrap(), "page-1");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entry_is_refetched() {
        let view = view();
        let counter = Arc::new(AtomicUsize::new(0));

        view.fetch(key(1, ""), loader(Arc::clone(&counter), "old".to_string(), Duration::ZERO))
            .await
            .unwrap();
        tokio::time::advance(STALE_AFTER + Duration::from_secs(1)).await;

        let refreshed = view
            .fetch(key(1, ""), loader(Arc::clone(&counter), "new".to_string(), Duration::ZERO))
            .await;
        assert_eq!(refreshed.unwrap(), "new");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_same_key_fetches_share_one_request() {
        let view = view();
        let counter = Arc::new(AtomicUsize::new(0));

        let driver = tokio::spawn({
            let view = Arc::clone(&view);
            let loader = loader(Arc::clone(&counter), "shared".to_string(), Duration::from_millis(50));
            async move { view.fetch(key(1, ""), loader).await }
        });
        tokio::task::yield_now().await;

        let joined = view
            .fetch(key(1, ""), loader(Arc::clone(&counter), "ignored".to_string(), Duration::ZERO))
            .await;
        assert_eq!(joined.unwrap(), "shared");
        assert_eq!(driver.await.unwrap().unwrap(), "shared");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_fetch_cancels_the_inflight_one() {
        let view = view();
        let counter = Arc::new(AtomicUsize::new(0));

        let slow = tokio::spawn({
            let view = Arc::clone(&view);
            let loader = loader(Arc::clone(&counter), "page-2".to_string(), Duration::from_secs(1));
            async move { view.fetch(key(2, ""), loader).await }
        });
        tokio::task::yield_now().await;

        let fast = view
            .fetch(key(3, ""), loader(Arc::clone(&counter), "page-3".to_string(), Duration::from_millis(10)))
            .await;
        assert_eq!(fast.unwrap(), "page-3");
        assert_eq!(slow.await.unwrap(), Err(FetchError::Cancelled));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn joiners_learn_about_cancellation() {
        let view = view();
        let counter = Arc::new(AtomicUsize::new(0));

        let driver = tokio::spawn({
            let view = Arc::clone(&view);
            let loader = loader(Arc::clone(&counter), "page-1".to_string(), Duration::from_secs(1));
            async move { view.fetch(key(1, ""), loader).await }
        });
        tokio::task::yield_now().await;

        let joiner = tokio::spawn({
            let view = Arc::clone(&view);
            let loader = loader(Arc::clone(&counter), "unused".to_string(), Duration::ZERO);
            async move { view.fetch(key(1, ""), loader).await }
        });
        tokio::task::yield_now().await;

        let winner = view
            .fetch(key(2, ""), loader(Arc::clone(&counter), "page-2".to_string(), Duration::from_millis(10)))
            .await;
        assert_eq!(winner.unwrap(), "page-2");
        assert_eq!(driver.await.unwrap(), Err(FetchError::Cancelled));
        assert_eq!(joiner.await.unwrap(), Err(FetchError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_cancels_the_inflight_fetch() {
        let view = view();
        let counter = Arc::new(AtomicUsize::new(0));

        let pending = tokio::spawn({
            let view = Arc::clone(&view);
            let loader = loader(Arc::clone(&counter), "page-1".to_string(), Duration::from_secs(1));
            async move { view.fetch(key(1, ""), loader).await }
        });
        tokio::task::yield_now().await;

        view.invalidate().await;
        assert_eq!(pending.await.unwrap(), Err(FetchError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_clears_cached_entries() {
        let view = view();
        let counter = Arc::new(AtomicUsize::new(0));

        view.fetch(key(1, ""), loader(Arc::clone(&counter), "before".to_string(), Duration::ZERO))
            .await
            .unwrap();
        view.invalidate().await;

        let after = view
            .fetch(key(1, ""), loader(Arc::clone(&counter), "after".to_string(), Duration::ZERO))
            .await;
        assert_eq!(after.unwrap(), "after");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_are_not_cached() {
        let view = view();
        let counter = Arc::new(AtomicUsize::new(0));

        let failed = view
            .fetch(key(1, ""), failing_loader(Arc::clone(&counter), ApiError::Server(500)))
            .await;
        assert_eq!(failed, Err(FetchError::Api(ApiError::Server(500))));

        let retried = view
            .fetch(key(1, ""), loader(Arc::clone(&counter), "recovered".to_string(), Duration::ZERO))
            .await;
        assert_eq!(retried.unwrap(), "recovered");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn results_are_cached_per_page_and_search() {
        let view = view();
        let counter = Arc::new(AtomicUsize::new(0));

        view.fetch(key(1, "a"), loader(Arc::clone(&counter), "a-results".to_string(), Duration::ZERO))
            .await
            .unwrap();
        view.fetch(key(1, "b"), loader(Arc::clone(&counter), "b-results".to_string(), Duration::ZERO))
            .await
            .unwrap();

        let cached = view
            .fetch(key(1, "a"), loader(Arc::clone(&counter), "unused".to_string(), Duration::ZERO))
            .await;
        assert_eq!(cached.unwrap(), "a-results");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn registry_scopes_views_per_operator() {
        let views: ListViews<String> = ListViews::new(DEBOUNCE, STALE_AFTER);
        let first = views.scoped(1).await;
        let again = views.scoped(1).await;
        let other = views.scoped(2).await;
        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));

        views.purge(1).await;
        let recreated = views.scoped(1).await;
        assert!(!Arc::ptr_eq(&first, &recreated));
    }
}
