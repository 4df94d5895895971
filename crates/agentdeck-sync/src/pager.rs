//! Paginated window over a remote task collection.

use std::sync::{Arc, Mutex, MutexGuard};

use agentdeck_client::{ClientError, TaskQuery, TaskStore};
use agentdeck_core::{AgentId, TaskRecord};
use tracing::debug;

use crate::lock;
use crate::poll::FetchSeq;

/// The currently visible page of a larger remote collection.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskWindow {
    /// Records on this page, in store order.
    pub items: Vec<TaskRecord>,

    /// Size of the full remote collection, not just this page.
    pub total_count: u64,

    /// 1-based page index.
    pub page_index: u32,

    /// Maximum records per page.
    pub page_size: u32,
}

impl TaskWindow {
    /// An empty first page.
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page_index: 1,
            page_size: page_size.max(1),
        }
    }

    /// Number of pages in the full collection, at least 1.
    pub fn total_pages(&self) -> u32 {
        Self::last_page(self.total_count, self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.page_index < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }

    pub(crate) fn last_page(total: u64, page_size: u32) -> u32 {
        let page_size = page_size.max(1) as u64;
        (total.div_ceil(page_size) as u32).max(1)
    }
}

/// Manages one remote collection's visible window and page navigation.
///
/// All window swaps go through the shared [`FetchSeq`], so a slow page
/// fetch that settles after a newer one (from navigation or from the poll
/// schedule) is discarded instead of clobbering it.
pub struct TaskPager {
    store: Arc<dyn TaskStore>,
    seq: Arc<FetchSeq>,
    page_size: u32,
    scope: Mutex<Option<AgentId>>,
    window: Mutex<TaskWindow>,
}

impl TaskPager {
    pub fn new(store: Arc<dyn TaskStore>, seq: Arc<FetchSeq>, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        Self {
            store,
            seq,
            page_size,
            scope: Mutex::new(None),
            window: Mutex::new(TaskWindow::empty(page_size)),
        }
    }

    /// A snapshot of the current window.
    pub fn window(&self) -> TaskWindow {
        lock(&self.window).clone()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn current_page(&self) -> u32 {
        lock(&self.window).page_index
    }

    /// Change the owning scope and reload at page 1 so newly visible items
    /// appear. A no-op when the scope is unchanged.
    pub async fn set_scope(&self, scope: Option<AgentId>) -> Result<(), ClientError> {
        if self.replace_scope(scope) {
            self.load(1).await?;
        }
        Ok(())
    }

    /// Fetch and install a specific page.
    pub async fn load(&self, page_index: u32) -> Result<(), ClientError> {
        let seq_no = self.seq.begin();
        let window = self.fetch_window(page_index).await?;
        if self.seq.try_commit(seq_no) {
            self.install(window);
        } else {
            debug!(seq = seq_no, "discarding stale task window");
        }
        Ok(())
    }

    /// Reload the current page, preserving the page index.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let page = self.current_page();
        self.load(page).await
    }

    /// Advance one page. A no-op on the last page.
    pub async fn next(&self) -> Result<(), ClientError> {
        let (page, pages) = {
            let window = lock(&self.window);
            (window.page_index, window.total_pages())
        };
        if page >= pages {
            return Ok(());
        }
        self.load(page + 1).await
    }

    /// Go back one page. A no-op on page 1.
    pub async fn previous(&self) -> Result<(), ClientError> {
        let page = self.current_page();
        if page <= 1 {
            return Ok(());
        }
        self.load(page - 1).await
    }

    /// Swap the scope without reloading. Returns whether it changed.
    /// Callers that bypass [`set_scope`](Self::set_scope) fetch the new
    /// window themselves as part of a larger cycle.
    pub(crate) fn replace_scope(&self, scope: Option<AgentId>) -> bool {
        let mut current = lock(&self.scope);
        if *current == scope {
            false
        } else {
            *current = scope;
            true
        }
    }

    /// Fetch one window without installing it. Clamps the requested page
    /// into the collection's valid range: when the collection shrank below
    /// the requested page's lower bound, the last page is fetched instead
    /// of presenting an empty page with valid-looking navigation.
    pub(crate) async fn fetch_window(&self, page_index: u32) -> Result<TaskWindow, ClientError> {
        let requested = page_index.max(1);
        let scope = lock(&self.scope).clone();

        let mut page = self.fetch_page(scope.as_ref(), requested).await?;
        let mut landed = requested;
        let last = TaskWindow::last_page(page.total, self.page_size);
        if landed > last {
            landed = last;
            if page.total > 0 {
                page = self.fetch_page(scope.as_ref(), landed).await?;
            } else {
                page.tasks.clear();
            }
        }

        page.tasks.truncate(self.page_size as usize);
        Ok(TaskWindow {
            items: page.tasks,
            total_count: page.total,
            page_index: landed,
            page_size: self.page_size,
        })
    }

    /// Replace the window. The caller has already won the seq commit.
    pub(crate) fn install(&self, window: TaskWindow) {
        *lock(&self.window) = window;
    }

    pub(crate) fn window_guard(&self) -> MutexGuard<'_, TaskWindow> {
        lock(&self.window)
    }

    async fn fetch_page(
        &self,
        scope: Option<&AgentId>,
        page_index: u32,
    ) -> Result<agentdeck_client::TaskPage, ClientError> {
        let query = TaskQuery {
            agent_id: scope.cloned(),
            limit: self.page_size,
            offset: (page_index as u64 - 1) * self.page_size as u64,
        };
        self.store.list_tasks(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeStore;
    use std::time::Duration;

    fn pager_with_tasks(count: usize, page_size: u32) -> (Arc<FakeStore>, TaskPager) {
        let store = Arc::new(FakeStore::new());
        store.set_tasks(FakeStore::task_batch(count));
        let pager = TaskPager::new(store.clone(), Arc::new(FetchSeq::new()), page_size);
        (store, pager)
    }

    #[test]
    fn test_window_page_math() {
        let mut window = TaskWindow::empty(10);
        assert_eq!(window.total_pages(), 1);
        assert!(!window.has_next());
        assert!(!window.has_previous());

        window.total_count = 25;
        assert_eq!(window.total_pages(), 3);
        assert!(window.has_next());

        window.page_index = 3;
        assert!(!window.has_next());
        assert!(window.has_previous());
    }

    #[tokio::test]
    async fn test_load_replaces_window_atomically() {
        let (_store, pager) = pager_with_tasks(25, 10);
        pager.load(1).await.unwrap();

        let window = pager.window();
        assert_eq!(window.items.len(), 10);
        assert_eq!(window.total_count, 25);
        assert_eq!(window.page_index, 1);
    }

    #[tokio::test]
    async fn test_next_previous_clamped_to_bounds() {
        let (_store, pager) = pager_with_tasks(25, 10);
        pager.load(1).await.unwrap();

        pager.next().await.unwrap();
        pager.next().await.unwrap();
        assert_eq!(pager.current_page(), 3);

        // already on the last page: no-op, not an error
        pager.next().await.unwrap();
        assert_eq!(pager.current_page(), 3);
        assert_eq!(pager.window().items.len(), 5);

        pager.previous().await.unwrap();
        pager.previous().await.unwrap();
        assert_eq!(pager.current_page(), 1);

        pager.previous().await.unwrap();
        assert_eq!(pager.current_page(), 1);
    }

    #[tokio::test]
    async fn test_shrunken_collection_clamps_page_and_reloads() {
        let (store, pager) = pager_with_tasks(25, 10);
        pager.load(3).await.unwrap();
        assert_eq!(pager.current_page(), 3);
        assert_eq!(pager.window().items.len(), 5);

        store.set_tasks(FakeStore::task_batch(12));
        pager.refresh().await.unwrap();

        let window = pager.window();
        assert_eq!(window.page_index, 2);
        assert_eq!(window.total_count, 12);
        assert_eq!(window.items.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_collection_stays_on_page_one() {
        let (_store, pager) = pager_with_tasks(0, 10);
        pager.load(3).await.unwrap();

        let window = pager.window();
        assert_eq!(window.page_index, 1);
        assert!(window.items.is_empty());
        assert!(!window.has_next());
        assert!(!window.has_previous());
    }

    #[tokio::test]
    async fn test_set_scope_resets_to_first_page() {
        let (store, pager) = pager_with_tasks(25, 10);
        pager.load(2).await.unwrap();

        let scoped = FakeStore::task_batch(3);
        let agent_id = scoped[0].agent_id.clone();
        store.set_tasks(scoped);
        pager.set_scope(Some(agent_id.clone())).await.unwrap();

        let window = pager.window();
        assert_eq!(window.page_index, 1);
        assert_eq!(window.items.len(), 3);

        // unchanged scope: no reload, current page preserved
        store.set_tasks(FakeStore::task_batch(25));
        pager.load(2).await.unwrap();
        pager.set_scope(Some(agent_id)).await.unwrap();
        assert_eq!(pager.current_page(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_fetch_never_overwrites_newer_window() {
        let (store, pager) = pager_with_tasks(25, 10);

        // first load is slow, second is fast: they settle out of order
        store.queue_delay(Duration::from_millis(200));
        store.queue_delay(Duration::from_millis(10));

        let (slow, fast) = tokio::join!(pager.load(2), pager.load(1));
        slow.unwrap();
        fast.unwrap();

        // the later-issued fetch won; the slow page-2 response was discarded
        assert_eq!(pager.current_page(), 1);
    }
}
