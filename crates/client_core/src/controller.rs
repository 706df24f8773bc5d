//! Fetch/search/paginate controller behind the data explorer view.
//!
//! Four events drive it: source select, search text change, page select and
//! refresh. Every fetch is tagged with a sequence number and only the
//! resolution of the latest one is written to the view.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::{
    domain::{Item, PageResult, Query, Source},
    error::FetchError,
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{catalog::RemoteCatalog, debounce::Debouncer, strategy::fetch_page};

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub page_size: u32,
    pub search_debounce: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

/// Everything the presentation layer may render.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub source: Source,
    pub page: u32,
    pub page_size: u32,
    /// Text as typed, possibly not yet settled.
    pub search_input: String,
    /// Last settled search text; the only text queries use.
    pub search_text: String,
    pub items: Vec<Item>,
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
}

impl ViewSnapshot {
    fn initial(page_size: u32) -> Self {
        Self {
            source: Source::default(),
            page: 1,
            page_size,
            search_input: String::new(),
            search_text: String::new(),
            items: Vec::new(),
            total: 0,
            loading: false,
            error: None,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page_size.max(1)))
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }

    fn query(&self) -> Query {
        Query::new(
            self.source,
            self.page,
            self.page_size,
            self.search_text.clone(),
        )
    }
}

struct ControllerInner {
    catalog: Arc<dyn RemoteCatalog>,
    view: watch::Sender<ViewSnapshot>,
    latest_seq: AtomicU64,
    debouncer: Debouncer,
}

#[derive(Clone)]
pub struct ExplorerController {
    inner: Arc<ControllerInner>,
}

impl ExplorerController {
    pub fn new(catalog: Arc<dyn RemoteCatalog>, options: ControllerOptions) -> Self {
        let page_size = options.page_size.max(1);
        let (view, _) = watch::channel(ViewSnapshot::initial(page_size));
        Self {
            inner: Arc::new(ControllerInner {
                catalog,
                view,
                latest_seq: AtomicU64::new(0),
                debouncer: Debouncer::new(options.search_debounce),
            }),
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.inner.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.inner.view.subscribe()
    }

    /// Number of fetches issued so far.
    #[cfg(test)]
    pub(crate) fn issued_fetches(&self) -> u64 {
        self.inner.latest_seq.load(Ordering::SeqCst)
    }

    pub(crate) fn has_pending_search(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// Switches source, clears the search and loads page 1.
    ///
    /// Event methods return the spawned fetch, or `None` when nothing was
    /// issued.
    pub fn select_source(&self, source: Source) -> Option<JoinHandle<()>> {
        self.inner.debouncer.cancel();
        self.dispatch("select_source", |view| {
            view.source = source;
            view.page = 1;
            view.search_input.clear();
            view.search_text.clear();
            true
        })
    }

    /// Records typed text; the fetch happens once the text has been stable
    /// for the debounce window.
    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.view.send_if_modified(|view| {
            if view.search_input == text {
                return false;
            }
            view.search_input = text.clone();
            true
        });

        let controller = self.clone();
        self.inner.debouncer.schedule(async move {
            controller.settle_search(text);
        });
    }

    /// Loads `page` with the current source and settled search text.
    pub fn select_page(&self, page: u32) -> Option<JoinHandle<()>> {
        self.dispatch("select_page", |view| {
            view.page = page.max(1);
            true
        })
    }

    pub fn next_page(&self) -> Option<JoinHandle<()>> {
        let snapshot = self.snapshot();
        if !snapshot.has_next_page() {
            return None;
        }
        self.select_page(snapshot.page + 1)
    }

    pub fn prev_page(&self) -> Option<JoinHandle<()>> {
        let snapshot = self.snapshot();
        if !snapshot.has_prev_page() {
            return None;
        }
        self.select_page(snapshot.page - 1)
    }

    /// Clears the search and reloads page 1. Doubles as the manual retry.
    pub fn refresh(&self) -> Option<JoinHandle<()>> {
        self.inner.debouncer.cancel();
        self.dispatch("refresh", |view| {
            view.page = 1;
            view.search_input.clear();
            view.search_text.clear();
            true
        })
    }

    /// Waits until no debounced search is pending and no fetch is in flight.
    pub async fn wait_until_idle(&self) -> ViewSnapshot {
        let mut rx = self.subscribe();
        loop {
            if self.has_pending_search() {
                tokio::time::sleep(self.inner.debouncer.window() / 4).await;
                continue;
            }
            match rx.wait_for(|view| !view.loading).await {
                Ok(view) => {
                    if !self.has_pending_search() {
                        return view.clone();
                    }
                }
                Err(_) => return self.snapshot(),
            }
        }
    }

    /// Settles `text` unless the input moved on (a later keystroke, a source
    /// switch or a refresh) or the settled text already equals it.
    fn settle_search(&self, text: String) {
        let issued = self.dispatch("search", |view| {
            if view.search_input != text || view.search_text == text {
                return false;
            }
            view.search_text = text.clone();
            view.page = 1;
            true
        });
        if issued.is_none() {
            debug!(search = %text, "search text not settled; no fetch");
        }
    }

    /// Applies `update` and, unless it declines by returning `false`, issues
    /// one fetch for the resulting state. Both happen under the view lock so
    /// sequence order matches state order.
    fn dispatch(
        &self,
        trigger: &'static str,
        update: impl FnOnce(&mut ViewSnapshot) -> bool,
    ) -> Option<JoinHandle<()>> {
        let mut issued = None;
        self.inner.view.send_if_modified(|view| {
            if !update(view) {
                return false;
            }
            let seq = self.inner.latest_seq.fetch_add(1, Ordering::SeqCst) + 1;
            view.loading = true;
            view.error = None;
            issued = Some((seq, view.query()));
            true
        });
        let (seq, query) = issued?;
        debug!(
            trigger,
            seq,
            source = %query.source,
            page = query.page,
            search = %query.search_text,
            "issuing fetch"
        );

        let inner = Arc::clone(&self.inner);
        Some(tokio::spawn(async move {
            let outcome = fetch_page(inner.catalog.as_ref(), &query).await;
            inner.apply(seq, &query, outcome);
        }))
    }
}

impl ControllerInner {
    fn apply(&self, seq: u64, query: &Query, outcome: Result<PageResult, FetchError>) {
        let applied = self.view.send_if_modified(|view| {
            if self.latest_seq.load(Ordering::SeqCst) != seq {
                return false;
            }
            view.loading = false;
            match &outcome {
                Ok(result) => {
                    view.items = result.items.clone();
                    view.total = result.total;
                    view.error = None;
                }
                Err(err) => {
                    view.items.clear();
                    view.total = 0;
                    view.error = Some(err.user_message());
                }
            }
            true
        });

        if !applied {
            debug!(seq, source = %query.source, page = query.page, "discarding stale fetch result");
            return;
        }
        match &outcome {
            Ok(result) => info!(
                seq,
                source = %query.source,
                page = query.page,
                items = result.items.len(),
                total = result.total,
                "fetch applied"
            ),
            Err(err) => warn!(
                seq,
                source = %query.source,
                page = query.page,
                "fetch failed: {err}"
            ),
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
