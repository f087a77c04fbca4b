// src/api/pagination.rs
//! Drives single-page fetches into complete collections.
//!
//! Runs are strictly sequential: a platform cursor encodes server-side
//! iteration state, so each page is awaited before the next is requested.
//! No retries; the first failed page ends the run.

use super::types::{Collected, ListPage, PageResult};
use std::future::Future;

/// What to do with the items of a page that arrives without a cursor field.
///
/// A missing cursor always ends the run. The platform normally sends
/// `has_more: false` alongside the final cursor, but some listings omit the
/// cursor entirely on their last page instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorlessPage {
    /// Keep the page's items, then stop.
    #[default]
    Merge,
    /// Drop the page's items and stop, as the platform's own web client does.
    Discard,
}

/// Follows cursors from `start_cursor` until the listing is exhausted or a page fails.
///
/// Stops after a page without a cursor (see [`CursorlessPage`]), an empty
/// page, or a page with `has_more == false`.
pub async fn collect_cursor_pages<T, F, Fut>(
    start_cursor: String,
    cursorless: CursorlessPage,
    mut fetch_page: F,
) -> Collected<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = PageResult<ListPage<T>>>,
{
    let mut items = Vec::new();
    let mut cursor = start_cursor;
    let mut message = String::new();
    let mut pages_fetched = 0u32;

    loop {
        let page = match fetch_page(cursor.clone()).await.into_outcome() {
            Ok((page_message, page)) => {
                message = page_message;
                page
            }
            Err(reason) => {
                log::warn!(
                    "Pagination aborted after {} page(s), {} item(s) kept: {}",
                    pages_fetched,
                    items.len(),
                    reason
                );
                return Collected::failed(reason, items);
            }
        };
        pages_fetched += 1;

        let ListPage {
            items: batch,
            cursor: next_cursor,
            has_more,
        } = page;
        let batch_len = batch.len();

        // No cursor field is the authoritative end of the listing, whatever has_more says
        let Some(next_cursor) = next_cursor else {
            match cursorless {
                CursorlessPage::Merge => items.extend(batch),
                CursorlessPage::Discard => {
                    log::debug!("Dropping {} item(s) of a cursorless final page", batch_len)
                }
            }
            break;
        };

        cursor = next_cursor;
        items.extend(batch);

        if batch_len == 0 || !has_more {
            break;
        }
    }

    log::debug!(
        "Collected {} item(s) over {} page(s)",
        items.len(),
        pages_fetched
    );
    Collected::complete(message, items)
}

/// Walks numbered pages from 1 until `required` items are gathered or results run out.
///
/// Pages come in fixed-size batches, so the last one may overshoot; the
/// collection is truncated to `required`, on failure as well.
pub async fn collect_numbered_pages<T, F, Fut>(required: usize, mut fetch_page: F) -> Collected<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = PageResult<ListPage<T>>>,
{
    if required == 0 {
        return Collected::complete("no results requested", Vec::new());
    }

    let mut items = Vec::new();
    let mut page_number = 1u32;
    let mut message = String::new();

    loop {
        let page = match fetch_page(page_number).await.into_outcome() {
            Ok((page_message, page)) => {
                message = page_message;
                page
            }
            Err(reason) => {
                log::warn!("Paged search aborted at page {}: {}", page_number, reason);
                items.truncate(required);
                return Collected::failed(reason, items);
            }
        };

        let batch_len = page.items.len();
        items.extend(page.items);
        page_number += 1;

        if batch_len == 0 || !page.has_more || items.len() >= required {
            break;
        }
    }

    items.truncate(required);
    log::debug!(
        "Collected {} of {} requested item(s) over {} page(s)",
        items.len(),
        required,
        page_number - 1
    );
    Collected::complete(message, items)
}
