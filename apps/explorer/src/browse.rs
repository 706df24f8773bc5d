//! Interactive loop feeding stdin commands to the controller.

use anyhow::{anyhow, bail, Context, Result};
use client_core::{ExplorerController, ViewSnapshot};
use shared::domain::Source;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::{needs_render, render_view};

pub const HELP: &str = "\
commands:
  source <posts|users|products|quotes>   switch data source
  search [text]                          search (debounced); no text clears
  page <n> | next | prev                 change page
  refresh                                clear search and reload
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Source(Source),
    Search(String),
    Page(u32),
    Next,
    Prev,
    Refresh,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<BrowseCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "source" | "tab" => {
            if rest.is_empty() {
                bail!("usage: source <posts|users|products|quotes>");
            }
            BrowseCommand::Source(rest.parse()?)
        }
        "search" | "/" => BrowseCommand::Search(rest.to_string()),
        "page" => {
            let page = rest
                .parse::<u32>()
                .ok()
                .filter(|page| *page > 0)
                .ok_or_else(|| anyhow!("page must be a positive number, got '{rest}'"))?;
            BrowseCommand::Page(page)
        }
        "next" | "n" => BrowseCommand::Next,
        "prev" | "p" => BrowseCommand::Prev,
        "refresh" | "r" => BrowseCommand::Refresh,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        other => bail!("unknown command '{other}' (type 'help')"),
    };
    Ok(Some(command))
}

/// Applies one command. Returns `false` once the loop should stop.
pub fn apply_command(controller: &ExplorerController, command: BrowseCommand) -> bool {
    match command {
        BrowseCommand::Source(source) => {
            controller.select_source(source);
        }
        BrowseCommand::Search(text) => controller.set_search_text(text),
        BrowseCommand::Page(page) => {
            controller.select_page(page);
        }
        BrowseCommand::Next => {
            if controller.next_page().is_none() {
                eprintln!("already on the last page");
            }
        }
        BrowseCommand::Prev => {
            if controller.prev_page().is_none() {
                eprintln!("already on the first page");
            }
        }
        BrowseCommand::Refresh => {
            controller.refresh();
        }
        BrowseCommand::Help => println!("{HELP}"),
        BrowseCommand::Quit => return false,
    }
    true
}

pub async fn run(controller: ExplorerController, initial: Source) -> Result<()> {
    let mut updates = controller.subscribe();
    let printer = tokio::spawn(async move {
        let mut last: Option<ViewSnapshot> = None;
        while updates.changed().await.is_ok() {
            let view = updates.borrow_and_update().clone();
            if needs_render(last.as_ref(), &view) {
                print!("{}", render_view(&view));
            }
            last = Some(view);
        }
    });

    println!("{HELP}");
    controller.select_source(initial);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_command(&line) {
            Ok(Some(command)) => {
                if !apply_command(&controller, command) {
                    break;
                }
            }
            Ok(None) => {}
            Err(err) => eprintln!("{err}"),
        }
    }

    printer.abort();
    tracing::debug!("browse session ended");
    Ok(())
}
