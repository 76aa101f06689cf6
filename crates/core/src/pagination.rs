//! Link-header pagination
//!
//! List endpoints return one page per request. The walker fetches pages
//! strictly in sequence, following the `next` relation of the `link`
//! header, until a short or empty page ends the listing.

use std::future::Future;

use tracing::{debug, warn};
use url::Url;
use zeropush_domain::constants::{DEFAULT_PAGE, HEADER_LINK, MAX_PER_PAGE};
use zeropush_domain::Result;

use crate::executor::ApiResponse;

/// Caller supplied page selection; unset fields take defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Resolve into a cursor. Zero values become 1 and `per_page` is capped
    /// at 100.
    pub fn cursor(&self, default_per_page: u32) -> PageCursor {
        let page = self.page.unwrap_or(DEFAULT_PAGE).max(1);
        let per_page = self.per_page.unwrap_or(default_per_page).clamp(1, MAX_PER_PAGE);
        PageCursor { page, per_page }
    }
}

/// Position of the walker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page: u32,
    pub per_page: u32,
}

/// Fetch every page starting at `cursor` and concatenate the items.
///
/// Stops after an empty page, after a page shorter than `per_page`, or
/// when a full page carries no `next` link that moves forward.
pub async fn walk<T, F, Fut>(cursor: PageCursor, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(PageCursor) -> Fut,
    Fut: Future<Output = Result<ApiResponse<Vec<T>>>>,
{
    let mut cursor = cursor;
    let mut items = Vec::new();

    loop {
        let response = fetch(cursor).await?;
        let count = response.body.len();
        debug!(page = cursor.page, per_page = cursor.per_page, count, "Fetched page");

        if count == 0 {
            break;
        }

        items.extend(response.body);

        if count < cursor.per_page as usize {
            break;
        }

        match response.headers.get(HEADER_LINK).and_then(parse_next_page) {
            Some(next) if next > cursor.page => cursor.page = next,
            Some(next) => {
                warn!(page = cursor.page, next, "Next page does not advance; stopping");
                break;
            }
            None => {
                debug!(page = cursor.page, "Full page without a next link; stopping");
                break;
            }
        }
    }

    Ok(items)
}

/// Page number of the `rel="next"` entry of a `link` header.
///
/// Accepts absolute or relative targets and multiple relation types per
/// entry (`rel="next last"`).
pub fn parse_next_page(link: &str) -> Option<u32> {
    split_link_values(link).into_iter().find_map(|entry| {
        let (target, params) = parse_link_value(entry)?;
        let is_next = params.iter().any(|(name, value)| {
            name.eq_ignore_ascii_case("rel")
                && value.split_ascii_whitespace().any(|rel| rel.eq_ignore_ascii_case("next"))
        });
        if !is_next {
            return None;
        }
        page_param(target)
    })
}

/// Split on commas that are not inside `<...>` or quotes
fn split_link_values(header: &str) -> Vec<&str> {
    let mut values = Vec::new();
    let mut start = 0;
    let mut in_target = false;
    let mut in_quotes = false;

    for (index, ch) in header.char_indices() {
        match ch {
            '<' if !in_quotes => in_target = true,
            '>' if !in_quotes => in_target = false,
            '"' if !in_target => in_quotes = !in_quotes,
            ',' if !in_target && !in_quotes => {
                values.push(&header[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    values.push(&header[start..]);
    values
}

fn parse_link_value(entry: &str) -> Option<(&str, Vec<(&str, &str)>)> {
    let entry = entry.trim();
    let rest = entry.strip_prefix('<')?;
    let end = rest.find('>')?;
    let target = &rest[..end];

    let params = rest[end + 1..]
        .split(';')
        .filter_map(|param| {
            let (name, value) = param.split_once('=')?;
            Some((name.trim(), value.trim().trim_matches('"')))
        })
        .collect();

    Some((target, params))
}

fn page_param(target: &str) -> Option<u32> {
    let url = Url::parse(target).or_else(|_| {
        Url::parse("http://localhost/").and_then(|base| base.join(target))
    });
    let url = url.ok()?;
    let page = url.query_pairs().find(|(name, _)| name == "page").map(|(_, value)| value)?;
    page.trim().parse().ok()
}
