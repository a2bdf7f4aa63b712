//! Pagination loops shared by the listing commands
//!
//! Two server paging styles exist in the Xray API and both are covered here:
//! offset-based (`offset`/`num_of_rows`, next offset echoed in the response,
//! `-1` meaning exhausted) and page-number-based (`page_num`, optionally with
//! a `total_count`). Callers supply the page-fetch as an async closure, so the
//! loops stay independent of any particular endpoint.

use std::collections::HashSet;
use std::future::Future;

use log::debug;
use serde_json::Value;

use super::lookup::lookup;
use crate::error::{Error, Result};

/// Offset value the server reports once all rows have been returned.
pub const END_OF_PAGES: i64 = -1;

/// Candidate keys for the row array, tried in order. Deployments differ.
const ROW_KEYS: &[&str] = &["data", "repos"];

/// Candidate keys for the next-offset field.
const OFFSET_KEYS: &[&str] = &["offset"];

/// Candidate keys for the reported total row count.
const TOTAL_KEYS: &[&str] = &["total_count"];

/// Rows of one page. A response without a recognizable rows key is an empty
/// page, not an error.
pub fn page_rows(response: &Value) -> Vec<Value> {
    lookup(response, ROW_KEYS)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Next offset signaled by the server; absence means end of pagination.
pub fn next_offset(response: &Value) -> i64 {
    lookup(response, OFFSET_KEYS)
        .and_then(Value::as_i64)
        .unwrap_or(END_OF_PAGES)
}

/// Fetch every page of an offset-paginated listing and concatenate the rows.
///
/// The walk must never revisit an offset; a server echoing any previously
/// seen offset (same page again, or a longer cycle) would never terminate,
/// so that case is reported as a response error.
pub async fn fetch_all_offset<F, Fut>(page_size: u32, mut fetch: F) -> Result<Vec<Value>>
where
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    if page_size < 1 {
        return Err(Error::Validation("--page-size must be >= 1".to_string()));
    }

    let mut rows = Vec::new();
    let mut offset = 0;
    let mut seen = HashSet::from([offset]);

    loop {
        let response = fetch(offset).await?;
        let page = page_rows(&response);
        debug!("fetched {} rows at offset {}", page.len(), offset);
        rows.extend(page);

        let next = next_offset(&response);
        if next == END_OF_PAGES {
            break;
        }
        if !seen.insert(next) {
            return Err(Error::Response(format!(
                "server repeated pagination offset {next}"
            )));
        }
        offset = next;
    }

    Ok(rows)
}

/// Fetch every page of a page-number listing, starting at `start_page`.
///
/// Stops when the reported `total_count` has been collected or a page comes
/// back empty, whichever happens first. Without a `total_count` the empty
/// page is the only stop condition. Returns the rows and the last reported
/// total, if any.
pub async fn fetch_all_pages<F, Fut>(
    start_page: u32,
    mut fetch: F,
) -> Result<(Vec<Value>, Option<u64>)>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let mut rows = Vec::new();
    let mut page = start_page;
    let mut total: Option<u64> = None;

    loop {
        let response = fetch(page).await?;
        let data = page_rows(&response);
        let fetched = data.len();
        debug!("fetched {} rows at page {}", fetched, page);
        rows.extend(data);

        if let Some(reported) = lookup(&response, TOTAL_KEYS).and_then(Value::as_u64) {
            total = Some(reported);
        }

        if let Some(t) = total {
            if rows.len() as u64 >= t {
                break;
            }
        }
        if fetched == 0 {
            break;
        }

        page += 1;
    }

    Ok((rows, total))
}
