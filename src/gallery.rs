//! Works gallery page controller.
//!
//! Owns the filter state for one page view and drives everything that
//! depends on it: the URL, the facet option lists, and the list of works.
//!
//! Every filter change issues exactly one list request. Requests may settle
//! in any order, so each one carries a generation ticket and only the latest
//! ticket is allowed to touch the view. The superseded task is also aborted,
//! but the ticket check is what guarantees correctness.

use crate::client::ContentSource;
use crate::filters::{Facet, FilterState};
use crate::model::{ListResponse, Pagination, WorkModel};
use crate::options::{load_remote_options, FacetOptionSet};
use crate::query::Query;
use crate::url_sync::{parse_filters, split_location, Navigator, UrlSynchronizer};
use crate::Result;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

const DEFAULT_PAGE_SIZE: u32 = 25;

/// What the list area of the page shows
#[derive(Debug, Clone, Default)]
pub struct GalleryView {
    pub works: Vec<WorkModel>,
    pub pagination: Option<Pagination>,
    /// A list request is in flight
    pub loading: bool,
    /// Page-level message from the last failed list request
    pub error: Option<String>,
}

/// List view plus the ticket of the newest request
#[derive(Debug, Clone, Default)]
pub struct ListState {
    generation: u64,
    view: GalleryView,
}

impl ListState {
    pub fn view(&self) -> &GalleryView {
        &self.view
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new request; returns its ticket
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.view.loading = true;
        self.generation
    }

    /// Apply a response if `ticket` is still the newest. Returns whether the
    /// view changed.
    ///
    /// On failure the previous works stay visible and only the error message
    /// is set.
    pub fn settle(&mut self, ticket: u64, outcome: Result<ListResponse<WorkModel>>) -> bool {
        if ticket != self.generation {
            log::debug!(
                "dropping stale works response (ticket {}, current {})",
                ticket,
                self.generation
            );
            return false;
        }
        self.view.loading = false;
        match outcome {
            Ok(resp) => {
                self.view.works = resp.data;
                self.view.pagination = resp.meta.pagination;
                self.view.error = None;
            }
            Err(e) => {
                self.view.error = Some(format!("Failed to load works: {}", e));
            }
        }
        true
    }
}

/// Controller for the `/works` page
pub struct WorksGallery<S: ContentSource + 'static, N: Navigator> {
    source: Arc<S>,
    sync: UrlSynchronizer<N>,
    filters: FilterState,
    page_size: u32,
    list: Arc<watch::Sender<ListState>>,
    options: Arc<Mutex<FacetOptionSet>>,
    options_task: Option<JoinHandle<()>>,
    in_flight: Option<JoinHandle<()>>,
}

impl<S: ContentSource + 'static, N: Navigator> WorksGallery<S, N> {
    /// Open the page at `location` (path plus optional query).
    ///
    /// Filters are decoded from the query before anything else happens. The
    /// three remote option lists start loading and exactly one list request
    /// is issued. Must be called from within a tokio runtime.
    pub fn open(source: S, navigator: N, location: &str) -> Self {
        Self::open_with(source, navigator, location, DEFAULT_PAGE_SIZE)
    }

    pub fn open_with(source: S, navigator: N, location: &str, page_size: u32) -> Self {
        let (path, query) = split_location(location);
        let filters = parse_filters(query);
        log::debug!("opening gallery at {} with {:?}", path, filters);

        let (list, _) = watch::channel(ListState::default());
        let mut gallery = Self {
            source: Arc::new(source),
            sync: UrlSynchronizer::new(path, navigator),
            filters,
            page_size,
            list: Arc::new(list),
            options: Arc::new(Mutex::new(FacetOptionSet::default())),
            options_task: None,
            in_flight: None,
        };

        let source = Arc::clone(&gallery.source);
        let options = Arc::clone(&gallery.options);
        gallery.options_task = Some(tokio::spawn(async move {
            load_remote_options(source.as_ref(), &options).await;
        }));

        gallery.refresh();
        gallery
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn navigator(&self) -> &N {
        self.sync.navigator()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Replace the whole filter state. Updates the URL in place and issues
    /// one list request.
    pub fn set_filters(&mut self, next: FilterState) {
        self.filters = next;
        self.sync.apply(&self.filters);
        self.refresh();
    }

    pub fn update_facet(&mut self, facet: Facet, values: Vec<String>) {
        let next = self.filters.with_values(facet, values);
        self.set_filters(next);
    }

    pub fn toggle(&mut self, facet: Facet, value: &str) {
        let next = self.filters.toggle(facet, value);
        self.set_filters(next);
    }

    pub fn select_film_type(&mut self, value: &str) {
        let next = self.filters.with_film_type(value);
        self.set_filters(next);
    }

    /// Back to the unfiltered page
    pub fn clear(&mut self) {
        self.filters = self.sync.clear();
        self.refresh();
    }

    /// Where a reload after a failed request should go
    pub fn recovery_url(&self) -> &str {
        self.sync.path()
    }

    /// Recover from a failed list request: navigate to the unfiltered page
    /// as a new history entry and fetch again.
    pub fn reload(&mut self) {
        self.filters = self.sync.reload();
        self.refresh();
    }

    /// Current list request for the filter state
    pub fn list_query(&self) -> Query {
        Query::new()
            .predicate(self.filters.predicate())
            .populate("*")
            .pagination(1, self.page_size)
    }

    pub fn view(&self) -> GalleryView {
        self.list.borrow().view.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.list.subscribe()
    }

    /// Wait until the newest list request has settled
    pub async fn settled(&self) {
        let mut rx = self.list.subscribe();
        let _ = rx.wait_for(|s| !s.view.loading).await;
    }

    pub fn options(&self) -> FacetOptionSet {
        self.options
            .lock()
            .map(|o| o.clone())
            .unwrap_or_default()
    }

    /// Wait for the one-time option load to finish
    pub async fn options_loaded(&mut self) {
        if let Some(task) = self.options_task.take() {
            if let Err(e) = task.await {
                log::warn!("option loading task ended abnormally: {}", e);
            }
        }
    }

    fn refresh(&mut self) {
        let mut ticket = 0;
        self.list.send_modify(|s| ticket = s.begin());

        if let Some(prev) = self.in_flight.take() {
            prev.abort();
        }

        let query = self.list_query();
        let source = Arc::clone(&self.source);
        let list = Arc::clone(&self.list);
        log::debug!("works request #{}: {}", ticket, query.to_query_string());

        self.in_flight = Some(tokio::spawn(async move {
            let outcome = source.list_works(&query).await;
            if let Err(e) = &outcome {
                log::error!("works request #{} failed: {}", ticket, e);
            }
            list.send_if_modified(|s| s.settle(ticket, outcome));
        }));
    }
}

impl<S: ContentSource + 'static, N: Navigator> Drop for WorksGallery<S, N> {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
        if let Some(task) = self.options_task.take() {
            task.abort();
        }
    }
}
