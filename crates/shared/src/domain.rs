use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(PostId);
id_newtype!(UserId);
id_newtype!(ProductId);
id_newtype!(QuoteId);
id_newtype!(CommentId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    #[default]
    Posts,
    Users,
    Products,
    Quotes,
}

impl Source {
    pub const ALL: [Source; 4] = [
        Source::Posts,
        Source::Users,
        Source::Products,
        Source::Quotes,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Source::Posts => "posts",
            Source::Users => "users",
            Source::Products => "products",
            Source::Quotes => "quotes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Source::Posts => "Posts",
            Source::Users => "Users",
            Source::Products => "Products",
            Source::Quotes => "Quotes",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown source '{0}' (expected one of: posts, users, products, quotes)")]
pub struct UnknownSource(pub String);

impl FromStr for Source {
    type Err = UnknownSource;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Source::ALL
            .into_iter()
            .find(|source| source.id().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownSource(trimmed.to_string()))
    }
}

/// A single page request against one source. Built per triggering event and
/// consumed immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub source: Source,
    pub page: u32,
    pub page_size: u32,
    pub search_text: String,
}

impl Query {
    pub fn new(source: Source, page: u32, page_size: u32, search_text: impl Into<String>) -> Self {
        Self {
            source,
            page: page.max(1),
            page_size: page_size.max(1),
            search_text: search_text.into(),
        }
    }

    pub fn skip(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Trimmed search term, or `None` when the query is unfiltered.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search_text.trim();
        (!term.is_empty()).then_some(term)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageResult {
    pub items: Vec<Item>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(default, rename = "catchPhrase")]
    pub catch_phrase: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub address: Address,
    pub company: Company,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub quote: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub name: String,
    pub email: String,
    pub body: String,
}

/// Source-specific record handed to the presentation layer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum Item {
    Post(Post),
    User(User),
    Product(Product),
    Quote(Quote),
}

impl Item {
    pub fn source(&self) -> Source {
        match self {
            Item::Post(_) => Source::Posts,
            Item::User(_) => Source::Users,
            Item::Product(_) => Source::Products,
            Item::Quote(_) => Source::Quotes,
        }
    }

    pub fn searchable_fields(&self) -> Vec<&str> {
        match self {
            Item::Post(post) => vec![post.title.as_str(), post.body.as_str()],
            Item::User(user) => vec![
                user.name.as_str(),
                user.email.as_str(),
                user.company.name.as_str(),
            ],
            Item::Product(product) => vec![product.title.as_str(), product.description.as_str()],
            Item::Quote(quote) => vec![quote.quote.as_str(), quote.author.as_str()],
        }
    }

    /// Case-insensitive substring match against any searchable field.
    pub fn matches(&self, search_text: &str) -> bool {
        let needle = search_text.to_lowercase();
        self.searchable_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl From<Post> for Item {
    fn from(value: Post) -> Self {
        Item::Post(value)
    }
}

impl From<User> for Item {
    fn from(value: User) -> Self {
        Item::User(value)
    }
}

impl From<Product> for Item {
    fn from(value: Product) -> Self {
        Item::Product(value)
    }
}

impl From<Quote> for Item {
    fn from(value: Quote) -> Self {
        Item::Quote(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_parses_case_insensitively() {
        assert_eq!(" Products ".parse::<Source>(), Ok(Source::Products));
        assert_eq!("QUOTES".parse::<Source>(), Ok(Source::Quotes));
        assert_eq!(
            "albums".parse::<Source>(),
            Err(UnknownSource("albums".to_string()))
        );
        assert_eq!(Source::Users.to_string(), "users");
        assert_eq!(Source::Users.label(), "Users");
    }

    #[test]
    fn query_clamps_and_computes_skip() {
        let query = Query::new(Source::Posts, 0, 0, "");
        assert_eq!((query.page, query.page_size), (1, 1));
        assert_eq!(query.skip(), 0);
        assert_eq!(Query::new(Source::Posts, 3, 12, "").skip(), 24);
    }

    #[test]
    fn search_term_is_trimmed_and_blank_is_none() {
        assert_eq!(Query::new(Source::Posts, 1, 12, "  ").search_term(), None);
        assert_eq!(
            Query::new(Source::Posts, 1, 12, " rust ").search_term(),
            Some("rust")
        );
    }

    #[test]
    fn item_matches_any_searchable_field() {
        let user = Item::User(User {
            id: UserId(1),
            name: "Leanne Graham".into(),
            username: "Bret".into(),
            email: "Sincere@april.biz".into(),
            phone: String::new(),
            website: String::new(),
            address: Address::default(),
            company: Company {
                name: "Romaguera-Crona".into(),
                catch_phrase: String::new(),
            },
        });
        assert!(user.matches("romaguera"));
        assert!(user.matches("APRIL"));
        assert!(!user.matches("bret"));
        assert_eq!(user.source(), Source::Users);
    }
}
