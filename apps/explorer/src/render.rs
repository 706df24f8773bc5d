//! Plain-text rendering of controller snapshots.

use std::fmt::Write as _;

use client_core::ViewSnapshot;
use shared::domain::{Comment, Item, Post, Product, Quote, User};

const PAGE_BUTTONS: u64 = 5;

pub fn render_view(view: &ViewSnapshot) -> String {
    let mut out = String::new();
    let label = view.source.label();

    if view.loading {
        let _ = writeln!(out, "{label}: Loading...");
        return out;
    }

    let _ = writeln!(out, "== {label} ({} results) ==", view.total);

    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error Loading Data: {error}");
        let _ = writeln!(out, "Type 'refresh' to try again.");
        return out;
    }

    if view.items.is_empty() {
        let kind = label.to_lowercase();
        if view.search_text.is_empty() {
            let _ = writeln!(out, "No {kind} available");
        } else {
            let _ = writeln!(out, "No {kind} found matching \"{}\"", view.search_text);
            let _ = writeln!(out, "Type 'search' with no text to clear the search.");
        }
        return out;
    }

    for item in &view.items {
        out.push_str(&render_item(item));
        out.push('\n');
    }

    if view.total_pages() > 1 {
        let (first, last) = showing_range(view);
        let _ = writeln!(
            out,
            "Showing {first} to {last} of {} results",
            view.total
        );
        let buttons: Vec<String> = page_window(u64::from(view.page), view.total_pages())
            .into_iter()
            .map(|page| {
                if page == u64::from(view.page) {
                    format!("[{page}]")
                } else {
                    page.to_string()
                }
            })
            .collect();
        let _ = writeln!(
            out,
            "{} {} {}",
            if view.has_prev_page() { "< prev" } else { "      " },
            buttons.join(" "),
            if view.has_next_page() { "next >" } else { "" }
        );
    }
    out
}

pub fn render_item(item: &Item) -> String {
    match item {
        Item::Post(post) => render_post(post),
        Item::User(user) => render_user(user),
        Item::Product(product) => render_product(product),
        Item::Quote(quote) => render_quote(quote),
    }
}

fn render_post(post: &Post) -> String {
    format!(
        "{}\n    {}\n    Post #{} | User {}\n",
        truncate_text(&post.title, 60),
        truncate_text(&post.body, 120),
        post.id,
        post.user_id
    )
}

fn render_user(user: &User) -> String {
    format!(
        "{} <{}>\n    Phone: {}\n    Company: {}\n    Website: {}\n    City: {}\n",
        user.name, user.email, user.phone, user.company.name, user.website, user.address.city
    )
}

fn render_product(product: &Product) -> String {
    let mut out = format!(
        "{}\n    {}\n    ${} | {:.1} stars | {}",
        truncate_text(&product.title, 50),
        truncate_text(&product.description, 80),
        product.price,
        product.rating,
        product.category
    );
    if let Some(brand) = product.brand.as_deref().filter(|b| !b.is_empty()) {
        let _ = write!(out, " | {brand}");
    }
    out.push('\n');
    out
}

fn render_quote(quote: &Quote) -> String {
    format!("\"{}\"\n    - {}\n", quote.quote, quote.author)
}

pub fn render_comment(comment: &Comment) -> String {
    format!(
        "{} <{}>\n    {}\n",
        comment.name,
        comment.email,
        truncate_text(&comment.body, 120)
    )
}

/// Cuts `text` to `max` characters, appending `...` when shortened.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}...")
}

/// One-based indices of the first and last item shown on the current page.
pub fn showing_range(view: &ViewSnapshot) -> (u64, u64) {
    let page_size = u64::from(view.page_size);
    let first = u64::from(view.page.saturating_sub(1)) * page_size + 1;
    let last = (u64::from(view.page) * page_size).min(view.total);
    (first, last)
}

/// Up to five page numbers centered on `current` where possible.
pub fn page_window(current: u64, total_pages: u64) -> Vec<u64> {
    let width = PAGE_BUTTONS.min(total_pages);
    let start = if total_pages <= PAGE_BUTTONS || current <= 3 {
        1
    } else if current >= total_pages - 2 {
        total_pages - PAGE_BUTTONS + 1
    } else {
        current - 2
    };
    (start..start + width).collect()
}

/// Whether the change between two snapshots is visible in the rendered view.
/// Typing alone only touches `search_input`.
pub fn needs_render(previous: Option<&ViewSnapshot>, next: &ViewSnapshot) -> bool {
    match previous {
        None => true,
        Some(prev) => {
            prev.loading != next.loading
                || prev.source != next.source
                || prev.page != next.page
                || prev.search_text != next.search_text
                || prev.total != next.total
                || prev.error != next.error
                || prev.items != next.items
        }
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
