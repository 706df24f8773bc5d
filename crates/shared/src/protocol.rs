//! Response envelopes of the two public catalog services.

use serde::{Deserialize, Serialize};

use crate::domain::{Product, Quote};

/// DummyJSON `/products` and `/products/search` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

/// DummyJSON `/quotes` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotesPage {
    #[serde(default)]
    pub quotes: Vec<Quote>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

/// Entry of DummyJSON `/products/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageParams {
    pub limit: u32,
    pub skip: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchParams<'a> {
    pub q: &'a str,
    pub limit: u32,
    pub skip: u32,
}
