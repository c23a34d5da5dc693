//! Fetch-all mode
//!
//! Walks successive pages at a fixed page size and concatenates them. The
//! loop ends on the first of:
//!
//! 1. the server-reported total has been reached,
//! 2. a short or empty page,
//! 3. the page cap, which is an error.
//!
//! A reported total is preferred because the short-page heuristic costs one
//! extra (empty) request when the last page happens to be full.

use std::collections::BTreeMap;

use crate::error::{DashboardError, Result, ResultExt};
use crate::source::DataSource;
use crate::types::{Record, ResourcePage};

use super::query::QueryState;

/// Page size and cap for fetch-all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchAllPolicy {
    pub page_size: u32,
    pub max_pages: u32,
}

impl Default for FetchAllPolicy {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_pages: 1000,
        }
    }
}

/// Concatenated result of a fetch-all run
#[derive(Debug, Clone, PartialEq)]
pub struct FetchAllResult {
    pub items: Vec<Record>,
    /// Number of page requests issued
    pub requests: u32,
    /// Last total reported by the server, if any
    pub total_count: Option<u64>,
}

impl FetchAllResult {
    /// Wrap the concatenated items as one page covering everything
    pub fn into_page(self) -> ResourcePage {
        let total = self.total_count.unwrap_or(self.items.len() as u64);
        ResourcePage::unpaginated(self.items).with_total(Some(total))
    }
}

/// Fetch every page of `filters` from `source`
pub async fn fetch_all_pages(
    source: &dyn DataSource,
    filters: &BTreeMap<String, String>,
    policy: FetchAllPolicy,
) -> Result<FetchAllResult> {
    let page_size = policy.page_size.max(1);
    let mut items = Vec::new();
    let mut total_count = None;

    for page in 1..=policy.max_pages {
        let mut query = QueryState::new(page, page_size);
        query.filters = filters.clone();

        let fetched = source
            .fetch_page(&query)
            .await
            .with_context(|| format!("Fetch-all page {page}"))?;

        let received = fetched.items.len();
        if fetched.total_count.is_some() {
            total_count = fetched.total_count;
        }
        items.extend(fetched.items);
        tracing::debug!(
            "Fetch-all page {} returned {} items ({} so far)",
            page,
            received,
            items.len()
        );

        let reached_total = total_count.is_some_and(|total| items.len() as u64 >= total);
        if reached_total || received < page_size as usize {
            tracing::info!("Fetch-all finished: {} items in {} requests", items.len(), page);
            return Ok(FetchAllResult {
                items,
                requests: page,
                total_count,
            });
        }
    }

    tracing::warn!(
        "Fetch-all hit the cap of {} pages without reaching the end",
        policy.max_pages
    );
    Err(DashboardError::FetchAllCapExceeded {
        pages: policy.max_pages,
    })
}
