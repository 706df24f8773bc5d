//! Client-side core of the data explorer: remote catalog access, per-source
//! fetch strategies, and the controller that sequences fetches for a view.

pub mod catalog;
pub mod controller;
pub mod debounce;
pub mod strategy;

pub use catalog::{
    CatalogConfig, CatalogSetupError, HttpCatalog, RemoteCatalog, DEFAULT_REQUEST_TIMEOUT,
    DUMMYJSON_URL, JSONPLACEHOLDER_URL,
};
pub use controller::{
    ControllerOptions, ExplorerController, ViewSnapshot, DEFAULT_PAGE_SIZE,
    DEFAULT_SEARCH_DEBOUNCE,
};
pub use debounce::Debouncer;
pub use strategy::{fetch_page, strategy_for, SourceStrategy};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
