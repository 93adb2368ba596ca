//! View state and request construction
//!
//! `ViewState` is a value: every transition returns a new one, and the
//! request for a render is derived from it by a pure function.

use crate::types::{ListingRequest, ListingResponse};
use std::num::NonZeroU32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    page: NonZeroU32,
    query: String,
    in_stock: bool,
    /// Last page count reported by the server.
    total_pages: NonZeroU32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            page: NonZeroU32::MIN,
            query: String::new(),
            in_stock: false,
            total_pages: NonZeroU32::MIN,
        }
    }
}

impl ViewState {
    pub fn page(&self) -> NonZeroU32 {
        self.page
    }

    pub fn total_pages(&self) -> NonZeroU32 {
        self.total_pages
    }

    /// New search text starts again from the first page.
    #[must_use]
    pub fn with_query(&self, query: impl Into<String>) -> Self {
        Self {
            page: NonZeroU32::MIN,
            query: query.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_stock_filter(&self, in_stock: bool) -> Self {
        Self {
            page: NonZeroU32::MIN,
            in_stock,
            ..self.clone()
        }
    }

    /// Requested page; the server may clamp it.
    #[must_use]
    pub fn go_to(&self, page: NonZeroU32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn next_page(&self) -> Self {
        if self.page >= self.total_pages {
            return self.clone();
        }
        self.go_to(self.page.saturating_add(1))
    }

    #[must_use]
    pub fn prev_page(&self) -> Self {
        match NonZeroU32::new(self.page.get() - 1) {
            Some(page) => self.go_to(page),
            None => self.clone(),
        }
    }

    /// Adopt the server's pagination over what was requested.
    #[must_use]
    pub fn reconcile(&self, resp: &ListingResponse) -> Self {
        let total_pages = NonZeroU32::new(resp.total_pages).unwrap_or(NonZeroU32::MIN);
        let page = NonZeroU32::new(resp.current_page).unwrap_or(NonZeroU32::MIN);
        Self {
            page,
            total_pages,
            ..self.clone()
        }
    }
}

/// Build the request for a view. A deployment without the stock filter never
/// sends `in_stock`.
pub fn listing_request(view: &ViewState, stock_filter_enabled: bool) -> ListingRequest {
    ListingRequest {
        page: view.page,
        query: view.query.clone(),
        in_stock: stock_filter_enabled && view.in_stock,
    }
}

/// Query parameters for `GET /api/list`. Values are left unencoded.
pub fn query_pairs(req: &ListingRequest) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("page", req.page.to_string()), ("query", req.query.clone())];
    if req.in_stock {
        pairs.push(("in_stock", "true".to_string()));
    }
    pairs
}
