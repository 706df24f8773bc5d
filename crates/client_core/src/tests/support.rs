//! In-memory catalog used by strategy and controller tests.

use std::{
    collections::VecDeque,
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{Address, Company, Post, PostId, Product, ProductId, Quote, QuoteId, User, UserId},
    error::FetchError,
    protocol::{ProductsPage, QuotesPage},
};

use crate::{catalog::RemoteCatalog, strategy::paginate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CatalogCall {
    ListPosts,
    ListUsers,
    ListProducts { limit: u32, skip: u32 },
    SearchProducts { text: String, limit: u32, skip: u32 },
    ListQuotes { limit: u32, skip: u32 },
}

pub(crate) struct FakeCatalog {
    pub posts: Vec<Post>,
    pub users: Vec<User>,
    pub products: Vec<Product>,
    pub quotes: Vec<Quote>,
    fail_with: Mutex<Option<FetchError>>,
    delays: Mutex<VecDeque<Duration>>,
    calls: Mutex<Vec<CatalogCall>>,
}

impl FakeCatalog {
    pub fn seeded() -> Self {
        Self {
            posts: (1..=30).map(post).collect(),
            users: (1..=10).map(user).collect(),
            products: (1..=40).map(product).collect(),
            quotes: (1..=25).map(quote).collect(),
            fail_with: Mutex::new(None),
            delays: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: FetchError) -> Self {
        let catalog = Self::seeded();
        catalog.fail_all(err);
        catalog
    }

    /// Every later call fails with `err` until `recover` is called.
    pub fn fail_all(&self, err: FetchError) {
        *self.fail_with.lock().expect("fail lock") = Some(err);
    }

    pub fn recover(&self) {
        *self.fail_with.lock().expect("fail lock") = None;
    }

    /// Queues per-call latencies, consumed in call order.
    pub fn push_delays(&self, delays: impl IntoIterator<Item = Duration>) {
        self.delays.lock().expect("delay lock").extend(delays);
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    async fn record(&self, call: CatalogCall) -> Result<(), FetchError> {
        self.calls.lock().expect("calls lock").push(call);
        let delay = self.delays.lock().expect("delay lock").pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.fail_with.lock().expect("fail lock").clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteCatalog for FakeCatalog {
    async fn list_posts(&self) -> Result<Vec<Post>, FetchError> {
        self.record(CatalogCall::ListPosts).await?;
        Ok(self.posts.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>, FetchError> {
        self.record(CatalogCall::ListUsers).await?;
        Ok(self.users.clone())
    }

    async fn list_products(&self, limit: u32, skip: u32) -> Result<ProductsPage, FetchError> {
        self.record(CatalogCall::ListProducts { limit, skip }).await?;
        Ok(products_page(self.products.clone(), limit, skip))
    }

    async fn search_products(
        &self,
        text: &str,
        limit: u32,
        skip: u32,
    ) -> Result<ProductsPage, FetchError> {
        self.record(CatalogCall::SearchProducts {
            text: text.to_string(),
            limit,
            skip,
        })
        .await?;
        let needle = text.to_lowercase();
        let matching = self
            .products
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        Ok(products_page(matching, limit, skip))
    }

    async fn list_quotes(&self, limit: u32, skip: u32) -> Result<QuotesPage, FetchError> {
        self.record(CatalogCall::ListQuotes { limit, skip }).await?;
        let total = self.quotes.len() as u64;
        let quotes = self
            .quotes
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(QuotesPage {
            quotes,
            total,
            skip: u64::from(skip),
            limit: u64::from(limit),
        })
    }
}

fn products_page(products: Vec<Product>, limit: u32, skip: u32) -> ProductsPage {
    let total = products.len() as u64;
    let page = limit.max(1);
    let products = paginate(products, skip / page + 1, page);
    ProductsPage {
        products,
        total,
        skip: u64::from(skip),
        limit: u64::from(limit),
    }
}

pub(crate) fn post(id: i64) -> Post {
    let title = if id % 5 == 0 {
        format!("Learning RUST, part {id}")
    } else {
        format!("post title {id}")
    };
    Post {
        id: PostId(id),
        user_id: UserId(id % 10 + 1),
        title,
        body: format!("body of post {id}"),
    }
}

pub(crate) fn user(id: i64) -> User {
    User {
        id: UserId(id),
        name: format!("User Number {id}"),
        username: format!("user{id}"),
        email: format!("user{id}@example.org"),
        phone: String::new(),
        website: String::new(),
        address: Address {
            street: String::new(),
            city: format!("City {id}"),
        },
        company: Company {
            name: if id % 2 == 0 { "Acme Corp" } else { "Globex" }.to_string(),
            catch_phrase: String::new(),
        },
    }
}

pub(crate) fn product(id: i64) -> Product {
    let (title, description) = if id % 4 == 0 {
        (format!("Smartphone {id}"), "A compact device".to_string())
    } else if id % 4 == 1 {
        (format!("Headset {id}"), "Pairs with any PHONE".to_string())
    } else {
        (format!("Laptop {id}"), "A portable computer".to_string())
    };
    Product {
        id: ProductId(id),
        title,
        description,
        price: 100.0 + id as f64,
        discount_percentage: 0.0,
        rating: 4.0,
        stock: 10,
        brand: None,
        category: "electronics".into(),
    }
}

pub(crate) fn quote(id: i64) -> Quote {
    let text = if id % 3 == 0 {
        format!("Life is what happens, #{id}")
    } else {
        format!("Keep going, #{id}")
    };
    Quote {
        id: QuoteId(id),
        quote: text,
        author: format!("Author {}", id % 4),
    }
}
