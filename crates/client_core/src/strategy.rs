//! Per-source fetch, filter and paginate behavior.

use shared::{
    domain::{Item, PageResult, Query, Source},
    error::FetchError,
};

use crate::catalog::RemoteCatalog;

/// Collections that are fetched whole and filtered locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Posts,
    Users,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStrategy {
    /// Whole collection per request, case-insensitive filter and slicing in memory.
    ClientFiltered(Collection),
    /// Remote pagination with a dedicated remote search endpoint.
    ServerSearch,
    /// Remote pagination, search applied to the fetched page only. `total`
    /// then reflects the filtered page, not the whole collection.
    Hybrid,
}

pub fn strategy_for(source: Source) -> SourceStrategy {
    match source {
        Source::Posts => SourceStrategy::ClientFiltered(Collection::Posts),
        Source::Users => SourceStrategy::ClientFiltered(Collection::Users),
        Source::Products => SourceStrategy::ServerSearch,
        Source::Quotes => SourceStrategy::Hybrid,
    }
}

impl SourceStrategy {
    /// Resolves one page. Issues exactly one catalog call.
    pub async fn fetch(
        self,
        catalog: &dyn RemoteCatalog,
        query: &Query,
    ) -> Result<PageResult, FetchError> {
        let page_size = query.page_size as usize;
        match self {
            SourceStrategy::ClientFiltered(collection) => {
                let all: Vec<Item> = match collection {
                    Collection::Posts => into_items(catalog.list_posts().await?),
                    Collection::Users => into_items(catalog.list_users().await?),
                };
                let filtered = filter_items(all, query.search_term());
                let total = filtered.len() as u64;
                Ok(PageResult {
                    items: paginate(filtered, query.page, query.page_size),
                    total,
                })
            }
            SourceStrategy::ServerSearch => {
                let page = match query.search_term() {
                    Some(term) => {
                        catalog
                            .search_products(term, query.page_size, query.skip())
                            .await?
                    }
                    None => catalog.list_products(query.page_size, query.skip()).await?,
                };
                let mut items = into_items(page.products);
                items.truncate(page_size);
                Ok(PageResult {
                    items,
                    total: page.total,
                })
            }
            SourceStrategy::Hybrid => {
                let page = catalog.list_quotes(query.page_size, query.skip()).await?;
                let mut items = into_items(page.quotes);
                items.truncate(page_size);
                match query.search_term() {
                    Some(term) => {
                        let items = filter_items(items, Some(term));
                        let total = items.len() as u64;
                        Ok(PageResult { items, total })
                    }
                    None => Ok(PageResult {
                        items,
                        total: page.total,
                    }),
                }
            }
        }
    }
}

/// Dispatches a query to its source's strategy.
pub async fn fetch_page(
    catalog: &dyn RemoteCatalog,
    query: &Query,
) -> Result<PageResult, FetchError> {
    strategy_for(query.source).fetch(catalog, query).await
}

pub fn filter_items(items: Vec<Item>, search_term: Option<&str>) -> Vec<Item> {
    match search_term {
        Some(term) => items.into_iter().filter(|item| item.matches(term)).collect(),
        None => items,
    }
}

/// Returns `items[(page-1)*page_size .. +page_size]`, empty past the end.
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> Vec<T> {
    let start = (page.max(1) as usize - 1).saturating_mul(page_size as usize);
    items
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect()
}

fn into_items<T: Into<Item>>(records: Vec<T>) -> Vec<Item> {
    records.into_iter().map(Into::into).collect()
}

#[cfg(test)]
#[path = "tests/strategy_tests.rs"]
mod tests;
