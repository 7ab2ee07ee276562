//! Command-line front end over the search and subscription services.

use std::io::Write;

use clap::{Parser, Subcommand};

use crate::api::{SearchApi, TrackerApi};
use crate::domain::asset::IpAssetSummary;
use crate::domain::types::{PageSize, SearchMode, SearchType, SortDirection};
use crate::forms::search::{DEFAULT_SORT_BY, SearchFilters};
use crate::pagination::PageWindow;
use crate::services::search::{DetailView, SearchState};
use crate::services::{SearchController, ServiceError, ServiceResult, SubscriptionTracker};
use crate::storage::PersistenceAdapter;

/// Search patents and trademarks on the IP intelligence platform.
///
/// The last search is kept in the session file, so `page`, `next`, `detail`
/// and friends work on the results of the previous invocation.
#[derive(Parser, Debug)]
#[command(name = "ipsearch", version, about, long_about = None)]
pub struct Cli {
    /// Config profile loaded from `config/<profile>.yaml` on top of the defaults
    #[arg(long, global = true, env = "APP_ENV", default_value = "local")]
    pub profile: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run a new search, starting at the first page
    Search {
        /// Keyword, inventor or assignee name depending on --by
        #[arg(allow_hyphen_values = true, default_value = "")]
        text: String,

        /// Field to match: keyword, inventor or assignee
        #[arg(short, long, default_value = "keyword")]
        by: SearchType,

        /// PATENT or TRADEMARK
        #[arg(short, long, default_value = "PATENT")]
        mode: SearchMode,

        /// Earliest date (YYYY-MM-DD, DD/MM/YYYY or MM/DD/YYYY)
        #[arg(long)]
        from: Option<String>,

        /// Latest date (YYYY-MM-DD, DD/MM/YYYY or MM/DD/YYYY)
        #[arg(long)]
        to: Option<String>,

        /// Jurisdiction code, e.g. US or EP
        #[arg(short, long)]
        jurisdiction: Option<String>,

        #[arg(long, default_value = DEFAULT_SORT_BY)]
        sort_by: String,

        /// ASC or DESC
        #[arg(long, default_value = "DESC")]
        sort_direction: SortDirection,

        /// Results per page: 10, 25 or 50
        #[arg(short, long)]
        size: Option<PageSize>,
    },

    /// Jump to a page of the last search (1-based)
    Page {
        #[arg(allow_negative_numbers = true)]
        number: i64,
    },

    /// Go to the next page of the last search
    Next,

    /// Go to the previous page of the last search
    Prev,

    /// Change results per page and search again from the first page
    Size { size: PageSize },

    /// Reset filters and forget the last search
    Clear,

    /// Print the last search without contacting the backend
    Show,

    /// Fetch the full record of a result on the current page (1-based)
    Detail { number: usize },

    /// Start monitoring a result on the current page (1-based)
    Subscribe { number: usize },

    /// Stop monitoring a result on the current page (1-based)
    Unsubscribe { number: usize },

    /// List the assets you are monitoring
    Subscriptions,
}

/// Executes one command against already-wired services.
pub fn dispatch<A, S, W>(
    api: &A,
    search: &mut SearchController<S>,
    tracker: &mut SubscriptionTracker,
    command: Command,
    out: &mut W,
) -> ServiceResult<()>
where
    A: SearchApi + TrackerApi + ?Sized,
    S: PersistenceAdapter,
    W: Write,
{
    match command {
        Command::Search {
            text,
            by,
            mode,
            from,
            to,
            jurisdiction,
            sort_by,
            sort_direction,
            size,
        } => {
            search.set_filters(SearchFilters {
                search_value: text,
                from_date: from.unwrap_or_default(),
                to_date: to.unwrap_or_default(),
                jurisdiction: jurisdiction.unwrap_or_default(),
                sort_by,
                sort_direction,
                search_type: by,
                mode,
            });
            if let Some(size) = size {
                search.set_page_size(size);
            }
            search.submit_search(api, 0);
            show_results(api, search, tracker, out)
        }
        Command::Page { number } => {
            if !search.change_page(api, number.saturating_sub(1)) {
                out_of_range(search.state(), out)?;
            }
            show_results(api, search, tracker, out)
        }
        Command::Next => {
            if !search.next_page(api) {
                writeln!(out, "Already on the last page")?;
            }
            show_results(api, search, tracker, out)
        }
        Command::Prev => {
            if !search.previous_page(api) {
                writeln!(out, "Already on the first page")?;
            }
            show_results(api, search, tracker, out)
        }
        Command::Size { size } => {
            search.change_page_size(api, size);
            show_results(api, search, tracker, out)
        }
        Command::Clear => {
            search.clear_filters();
            writeln!(out, "Filters cleared")?;
            Ok(())
        }
        Command::Show => {
            write_results(search.state(), tracker, out)?;
            Ok(())
        }
        Command::Detail { number } => {
            let asset = nth_result(search, number)?;
            let view = search.view_details(api, &asset);
            write_detail(&view, out)?;
            Ok(())
        }
        Command::Subscribe { number } => {
            let asset = nth_result(search, number)?;
            let result = tracker.subscribe(api, &asset);
            if let Some(notice) = tracker.take_notice() {
                writeln!(out, "{notice}")?;
            }
            result
        }
        Command::Unsubscribe { number } => {
            let asset = nth_result(search, number)?;
            let result = tracker.unsubscribe(api, &asset);
            if let Some(notice) = tracker.take_notice() {
                writeln!(out, "{notice}")?;
            }
            result
        }
        Command::Subscriptions => {
            let count = tracker.sync_from_backend(api)?;
            writeln!(out, "Monitoring {count} asset(s)")?;
            for key in tracker.subscribed_keys() {
                writeln!(out, "  {key}")?;
            }
            Ok(())
        }
    }
}

fn nth_result<S>(search: &SearchController<S>, number: usize) -> ServiceResult<IpAssetSummary>
where
    S: PersistenceAdapter,
{
    number
        .checked_sub(1)
        .and_then(|index| search.result(index))
        .cloned()
        .ok_or_else(|| ServiceError::NotFound(format!("result #{number} on the current page")))
}

fn out_of_range<W: Write>(state: &SearchState, out: &mut W) -> std::io::Result<()> {
    match state.page.total_pages {
        0 => writeln!(out, "No results to page through"),
        total => writeln!(out, "Page must be between 1 and {total}"),
    }
}

fn show_results<A, S, W>(
    api: &A,
    search: &mut SearchController<S>,
    tracker: &mut SubscriptionTracker,
    out: &mut W,
) -> ServiceResult<()>
where
    A: TrackerApi + ?Sized,
    S: PersistenceAdapter,
    W: Write,
{
    if let Some(notice) = search.take_notice() {
        writeln!(out, "{notice}")?;
    }
    if !search.state().page.is_empty() {
        if let Err(err) = tracker.sync_from_backend(api) {
            log::warn!("Showing results without subscription marks: {err}");
        }
    }
    write_results(search.state(), tracker, out)?;
    Ok(())
}

fn write_results<W: Write>(
    state: &SearchState,
    tracker: &SubscriptionTracker,
    out: &mut W,
) -> std::io::Result<()> {
    let page = &state.page;
    if page.is_empty() {
        return writeln!(out, "No results");
    }

    writeln!(
        out,
        "{} result(s), page {} of {} ({} per page)",
        page.total_elements,
        page.current_page.saturating_add(1),
        page.total_pages,
        state.page_size
    )?;

    for (i, asset) in page.assets.iter().enumerate() {
        let mark = if tracker.is_subscribed(asset) { '*' } else { ' ' };
        writeln!(
            out,
            "{mark}{:>3}. {:<18} {}",
            i + 1,
            asset.display_number().unwrap_or("-"),
            asset.title.as_deref().unwrap_or("Untitled IP Asset")
        )?;
        writeln!(
            out,
            "       {} | {} | {} | {}",
            asset.assignee.as_deref().unwrap_or("-"),
            asset.jurisdiction.as_deref().unwrap_or("-"),
            asset.publication_date.as_deref().unwrap_or("-"),
            asset.status.as_deref().unwrap_or("-")
        )?;
    }

    writeln!(out, "{}", PageWindow::new(page.current_page, page.total_pages))
}

fn write_detail<W: Write>(view: &DetailView, out: &mut W) -> std::io::Result<()> {
    let detail = &view.detail;
    let summary = &detail.summary;
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    writeln!(
        out,
        "{}",
        summary.title.as_deref().unwrap_or("Untitled IP Asset")
    )?;
    writeln!(out, "Type:             {}", field(&summary.asset_type))?;
    writeln!(
        out,
        "Number:           {}",
        summary.display_number().unwrap_or("-")
    )?;
    writeln!(out, "Assignee:         {}", field(&summary.assignee))?;
    writeln!(out, "Inventor:         {}", field(&summary.inventor))?;
    writeln!(
        out,
        "Jurisdiction:     {}",
        summary
            .jurisdiction
            .as_deref()
            .or(summary.patent_office.as_deref())
            .unwrap_or("-")
    )?;
    writeln!(out, "Publication date: {}", field(&summary.publication_date))?;
    writeln!(out, "Legal status:     {}", field(&detail.legal_status))?;

    for (label, text) in [
        ("Description", &detail.description),
        ("Abstract", &detail.abstract_text),
        ("Claims", &detail.claims),
    ] {
        if let Some(text) = text {
            writeln!(out, "\n{label}:\n{text}")?;
        }
    }

    writeln!(
        out,
        "\nFull record URL:  {}",
        detail.record_url().unwrap_or("N/A")
    )?;
    match &view.api_source {
        Some(source) => writeln!(out, "Fetched from:     {source}"),
        None => writeln!(out, "Fetched from:     cached search result"),
    }
}
