//! Last-request-wins sequencing for listing loads.
//!
//! Each load takes a token from a monotonically increasing counter. When a
//! load finishes, its result is only delivered if no newer load has started.

use crate::api::CatalogClient;
use crate::error::CatalogError;
use crate::query::{listing_request, ViewState};
use crate::types::ListingResponse;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListingOutcome {
    Results(ListingResponse),
    NoResults { current_page: u32, total_pages: u32 },
}

impl From<ListingResponse> for ListingOutcome {
    fn from(resp: ListingResponse) -> Self {
        if resp.is_empty() {
            ListingOutcome::NoResults {
                current_page: resp.current_page,
                total_pages: resp.total_pages,
            }
        } else {
            ListingOutcome::Results(resp)
        }
    }
}

#[derive(Debug)]
pub struct Session {
    client: CatalogClient,
    sequencer: RequestSequencer,
    stock_filter_enabled: bool,
}

impl Session {
    pub fn new(client: CatalogClient, stock_filter_enabled: bool) -> Self {
        Self {
            client,
            sequencer: RequestSequencer::default(),
            stock_filter_enabled,
        }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    /// Load the listing for `view`. Returns `Ok(None)` when a newer load was
    /// started before this one finished; its result or error is dropped.
    pub async fn load(&self, view: &ViewState) -> Result<Option<ListingOutcome>, CatalogError> {
        let token = self.sequencer.issue();
        let req = listing_request(view, self.stock_filter_enabled);
        let result = self.client.fetch_listing(&req).await;

        if !self.sequencer.is_current(token) {
            debug!(?token, "discarding stale listing response");
            return Ok(None);
        }
        result.map(|resp| Some(resp.into()))
    }
}
