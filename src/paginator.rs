//! Infinite listing of the whole catalog, one page at a time.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::api::{ApiError, PokemonProvider};
use crate::batch::{resolve_all, Lookup};
use crate::query::PAGE_STALE;
use crate::state::Item;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Item>,
    pub total: u32,
    pub has_more: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    pub limit: usize,
}

impl PageRequest {
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.limit
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paginator {
    page_size: usize,
    pages: Vec<Page>,
    next_page: u32,
    has_more: bool,
    in_flight: Option<u32>,
    error: Option<String>,
    #[serde(skip)]
    fetched_at: Option<Instant>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            pages: Vec::new(),
            next_page: 1,
            has_more: true,
            in_flight: None,
            error: None,
            fetched_at: None,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Claims the next page. `None` while a fetch is running or after the last page.
    pub fn load_next(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() || !self.has_more {
            return None;
        }
        self.in_flight = Some(self.next_page);
        Some(PageRequest {
            page: self.next_page,
            limit: self.page_size,
        })
    }

    /// Starts over from page 1, unless what is already accumulated is still fresh.
    pub fn refresh(&mut self, now: Instant) -> Option<PageRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        if !self.pages.is_empty() && self.is_fresh(now) {
            return None;
        }
        if !self.pages.is_empty() {
            tracing::debug!(pages = self.pages.len(), "listing is stale, reloading");
        }
        self.pages.clear();
        self.next_page = 1;
        self.has_more = true;
        self.error = None;
        self.fetched_at = None;
        self.load_next()
    }

    /// Applies the outcome of the fetch for `page`. Returns `false` for a page
    /// that is not the one in flight.
    pub fn complete(&mut self, page: u32, result: Result<Page, String>, now: Instant) -> bool {
        if self.in_flight != Some(page) {
            tracing::trace!(page, "ignoring result for a page not in flight");
            return false;
        }
        self.in_flight = None;
        match result {
            Ok(loaded) => {
                self.has_more = loaded.has_more;
                if loaded.has_more {
                    self.next_page += 1;
                }
                self.pages.push(loaded);
                self.error = None;
                self.fetched_at = Some(now);
            }
            Err(error) => {
                self.error = Some(error);
            }
        }
        true
    }

    pub fn items(&self) -> Vec<Item> {
        self.pages
            .iter()
            .flat_map(|page| page.items.iter().cloned())
            .collect()
    }

    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|page| page.items.len()).sum()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn total(&self) -> u32 {
        self.pages.first().map(|page| page.total).unwrap_or(0)
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn has_next_page(&self) -> bool {
        self.has_more
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_initial_loading(&self) -> bool {
        self.in_flight.is_some() && self.pages.is_empty()
    }

    pub fn is_fetching_next(&self) -> bool {
        self.in_flight.is_some() && !self.pages.is_empty()
    }

    /// A page arrived or the last attempt failed.
    pub fn has_settled(&self) -> bool {
        self.in_flight.is_none() && (!self.pages.is_empty() || self.error.is_some())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_fresh(&self, now: Instant) -> bool {
        self.fetched_at
            .map(|at| now.saturating_duration_since(at) < PAGE_STALE)
            .unwrap_or(false)
    }
}

/// Lists one page and resolves its entries concurrently; entries whose detail
/// fetch fails are left out.
pub async fn fetch_page(
    provider: Arc<dyn PokemonProvider>,
    request: PageRequest,
) -> Result<Page, ApiError> {
    let listing = provider.page(request.limit, request.offset()).await?;
    let lookups = listing
        .results
        .into_iter()
        .map(|entry| Lookup::Url(entry.url))
        .collect();
    let items = resolve_all(provider, lookups).await;
    Ok(Page {
        items,
        total: listing.count,
        has_more: listing.next.is_some(),
    })
}
