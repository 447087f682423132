//! # Show Subcommand
//!
//! Opens a view for a role over seed data and prints it as text. Tables
//! print the current page as aligned columns followed by a page footer;
//! decks print one block per card. Form views are not listed.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use siatc_core::Role;
use siatc_host::{DataService, HostConfig, OpenView, ViewHost};
use siatc_views::{CardImage, DeckView, TableView};

const SEPARATOR: &str = " | ";

/// Arguments for the show subcommand.
#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// View identifier.
    pub view: String,

    /// Role to open the view as. Defaults to `SIATC_DEFAULT_ROLE`.
    #[arg(long)]
    pub role: Option<String>,

    /// Catalog directory. Defaults to `SIATC_CATALOG_DIR`, then `catalog`.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Seed data directory of `<entity>.json` files. Defaults to
    /// `SIATC_DATA_DIR`.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Search query applied before sorting and paging.
    #[arg(long)]
    pub query: Option<String>,

    /// Column to sort by (tables only).
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending.
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page to print, starting at 1 (tables only).
    #[arg(long)]
    pub page: Option<usize>,
}

/// Execute the show subcommand.
pub async fn run_show(args: &ShowArgs, config: &HostConfig) -> Result<u8> {
    let role = crate::resolve_role(args.role.as_deref(), config)?;
    let config = HostConfig {
        catalog_dir: crate::catalog_dir(args.catalog.as_ref(), config),
        data_dir: args.data.clone().or_else(|| config.data_dir.clone()),
        default_role: Some(role.clone()),
    };
    if config.data_dir.is_none() {
        tracing::warn!("no data directory given; the view will be empty");
    }

    let host = ViewHost::from_config(&config)
        .await
        .with_context(|| format!("failed to start host over {}", config.catalog_dir.display()))?;
    let text = render_view(&host, &role, args).await?;
    print!("{text}");
    Ok(0)
}

/// Open `args.view` for `role`, apply the query, sort and page options,
/// and render the result.
pub async fn render_view<D: DataService>(
    host: &ViewHost<D>,
    role: &Role,
    args: &ShowArgs,
) -> Result<String> {
    let opened = host
        .open(role, &args.view)
        .await
        .with_context(|| format!("cannot open view '{}'", args.view))?;

    match opened {
        OpenView::Table(mut table) => {
            if let Some(query) = &args.query {
                table.set_query(query.as_str());
            }
            if let Some(column) = &args.sort {
                table.toggle_sort(column);
                if args.desc {
                    table.toggle_sort(column);
                }
            }
            if let Some(page) = args.page {
                if !table.go_to_page(page) {
                    bail!(
                        "page {page} is out of range: view '{}' has {} page(s)",
                        args.view,
                        table.total_pages()
                    );
                }
            }
            Ok(render_table(&table))
        }
        OpenView::Deck(mut deck) => {
            if args.sort.is_some() || args.page.is_some() {
                tracing::warn!(view = %args.view, "--sort and --page are ignored for deck views");
            }
            if let Some(query) = &args.query {
                deck.set_query(query.as_str());
            }
            Ok(render_deck(&deck))
        }
        OpenView::Form(_) => bail!(
            "view '{}' is a form; show renders table and deck views",
            args.view
        ),
    }
}

/// Render the current page of a table.
pub fn render_table(table: &TableView) -> String {
    let columns = table.columns();
    let rows = table.rows();

    let mut widths: Vec<usize> = columns.iter().map(|c| width(&c.label)).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(&row.cells) {
            *w = (*w).max(width(cell));
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", table.view().name, table.view().id);
    let header: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
    let _ = writeln!(out, "{}", line(&header, &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        let cells: Vec<&str> = row.cells.iter().map(String::as_str).collect();
        let _ = writeln!(out, "{}", line(&cells, &widths));
    }
    if rows.is_empty() {
        let _ = writeln!(out, "(no records)");
    }

    let _ = write!(
        out,
        "page {}/{} ({} records",
        table.page(),
        table.total_pages(),
        table.filtered_len()
    );
    if let Some(sort) = table.sort_state() {
        let _ = write!(out, ", sorted by {} {}", sort.column, sort.direction.as_str());
    }
    let _ = writeln!(out, ")");

    let toolbar = action_ids(table.toolbar_actions().iter().map(|a| a.id.as_str()));
    if !toolbar.is_empty() {
        let _ = writeln!(out, "actions: {toolbar}");
    }
    let per_row = action_ids(table.row_actions().iter().map(|a| a.id.as_str()));
    if !per_row.is_empty() {
        let _ = writeln!(out, "row actions: {per_row}");
    }
    out
}

/// Render every card matching the deck's query.
pub fn render_deck(deck: &DeckView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", deck.view().name, deck.view().id);
    for card in deck.cards() {
        let _ = writeln!(out, "* {}", card.title);
        if !card.subtitle.is_empty() {
            let _ = writeln!(out, "  {}", card.subtitle);
        }
        if let Some(status) = card.status.filter(|s| !s.is_empty()) {
            let _ = writeln!(out, "  [{status}]");
        }
        match card.image {
            Some(CardImage::Url(url)) => {
                let _ = writeln!(out, "  image: {url}");
            }
            Some(CardImage::Placeholder) => {
                let _ = writeln!(out, "  image: (none)");
            }
            None => {}
        }
    }
    if deck.is_empty() {
        let _ = writeln!(out, "(no records)");
    }
    let _ = writeln!(out, "{} card(s)", deck.len());
    if let Some(fab) = deck.fab() {
        let _ = writeln!(out, "actions: {}", fab.id);
    }
    out
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn line(cells: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    padded.join(SEPARATOR).trim_end().to_string()
}

fn action_ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join(", ")
}
