//! Page aggregation for Lodestone listings.
//!
//! Listings carry `{"Page": n, "PageNext": m | null, "PageTotal": t}`.
//! [`collect_pages`] starts at page 1 and follows `PageNext` while it stays
//! within `1..=PageTotal` and moves strictly forward, so no page is ever
//! requested twice.

use std::future::Future;

use serde::Deserialize;

use crate::error::LodestoneError;

/// Pagination metadata as sent by the proxy. Every field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(rename = "Page", default)]
    pub page: Option<i64>,
    #[serde(rename = "PageNext", default)]
    pub page_next: Option<i64>,
    #[serde(rename = "PageTotal", default)]
    pub page_total: Option<i64>,
}

impl Pagination {
    /// The page to request after `current`, if any.
    pub fn next_after(&self, current: u32) -> Option<u32> {
        let total = self.page_total?;
        let next = self.page_next?;
        if next < 1 || next > total || next <= i64::from(current) {
            return None;
        }
        u32::try_from(next).ok()
    }
}

/// One decoded page of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    /// A page that ends aggregation regardless of its items.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            pagination: None,
        }
    }
}

/// Fetch pages starting at 1 and concatenate their items in order.
///
/// Stops on missing pagination metadata or an absent, out-of-range or
/// non-advancing `PageNext`. The first error aborts the whole aggregation.
/// Duplicate items across pages are kept as-is.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, LodestoneError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, LodestoneError>>,
{
    let mut items = Vec::new();
    let mut current = 1u32;

    loop {
        let page = fetch_page(current).await?;
        items.extend(page.items);

        match page.pagination.and_then(|p| p.next_after(current)) {
            Some(next) => current = next,
            None => break,
        }
    }

    Ok(items)
}
