use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{fetch_page, ExplorerController, HttpCatalog};
use shared::{
    domain::{PostId, ProductId, Query, QuoteId, Source, UserId},
    error::ApiError,
};
use tracing_subscriber::EnvFilter;

mod browse;
mod config;
mod render;

#[derive(Parser, Debug)]
#[command(name = "explorer", about = "Browse posts, users, products and quotes from public REST catalogs")]
struct Cli {
    #[arg(long, default_value = "explorer.toml")]
    config: PathBuf,
    /// Overrides the configured page size.
    #[arg(long)]
    page_size: Option<u32>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a single page and print it.
    Fetch {
        #[arg(long, default_value = "posts")]
        source: Source,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "")]
        search: String,
        /// Print items as JSON instead of cards.
        #[arg(long)]
        json: bool,
    },
    /// Interactive session driven by stdin commands.
    Browse {
        #[arg(long, default_value = "posts")]
        source: Source,
    },
    /// Look up a single record by id.
    Show { kind: RecordKind, id: i64 },
    /// List product categories.
    Categories,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RecordKind {
    Post,
    User,
    Product,
    Quote,
    /// Comments on a post.
    Comments,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = config::load_settings(&cli.config)?;
    if let Some(page_size) = cli.page_size.filter(|size| *size > 0) {
        settings.page_size = page_size;
    }
    let catalog = Arc::new(
        HttpCatalog::new(&settings.catalog_config()).context("failed to set up catalog client")?,
    );

    match cli.command {
        Command::Fetch {
            source,
            page,
            search,
            json,
        } => {
            let query = Query::new(source, page, settings.page_size, search);
            match fetch_page(catalog.as_ref(), &query).await {
                Ok(result) if json => {
                    println!("{}", serde_json::to_string_pretty(&result.items)?);
                    eprintln!("total={}", result.total);
                }
                Ok(result) => {
                    let view = client_core::ViewSnapshot {
                        source,
                        page: query.page,
                        page_size: query.page_size,
                        search_input: query.search_text.clone(),
                        search_text: query.search_text.clone(),
                        items: result.items,
                        total: result.total,
                        loading: false,
                        error: None,
                    };
                    print!("{}", render::render_view(&view));
                }
                Err(err) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&ApiError::from(&err))?);
                    }
                    anyhow::bail!("{err}");
                }
            }
        }
        Command::Browse { source } => {
            let controller = ExplorerController::new(catalog, settings.controller_options());
            browse::run(controller, source).await?;
        }
        Command::Show { kind, id } => show(&catalog, kind, id).await?,
        Command::Categories => {
            for category in catalog.product_categories().await? {
                println!("{:<24} {}", category.slug, category.name);
            }
        }
    }

    Ok(())
}

async fn show(catalog: &HttpCatalog, kind: RecordKind, id: i64) -> Result<()> {
    let rendered = match kind {
        RecordKind::Post => render::render_item(&catalog.get_post(PostId(id)).await?.into()),
        RecordKind::User => render::render_item(&catalog.get_user(UserId(id)).await?.into()),
        RecordKind::Product => {
            render::render_item(&catalog.get_product(ProductId(id)).await?.into())
        }
        RecordKind::Quote => render::render_item(&catalog.get_quote(QuoteId(id)).await?.into()),
        RecordKind::Comments => catalog
            .post_comments(PostId(id))
            .await?
            .iter()
            .map(render::render_comment)
            .collect::<Vec<_>>()
            .join("\n"),
    };
    print!("{rendered}");
    Ok(())
}
