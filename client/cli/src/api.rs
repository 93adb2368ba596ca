use crate::config::Config;
use crate::error::{self, CatalogError};
use crate::query::query_pairs;
use crate::types::{FileEntry, ListingRequest, ListingResponse};
use bytes::Bytes;
use tracing::{debug, warn};

/// Appended to a preview path to have the server send the file as an attachment.
pub const DOWNLOAD_SUFFIX: &str = "?download=true";

#[derive(Debug)]
pub struct CatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("shelf/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: config.endpoint_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check response status; on error, read body for detail message.
    async fn ensure_ok(resp: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => {
                debug!(%status, error = %e, "failed to read error body");
                Bytes::new()
            }
        };
        let err = error::from_error_body(status, &body);
        warn!(%status, error = %err, "catalog API error");
        Err(err)
    }

    pub async fn fetch_listing(&self, req: &ListingRequest) -> Result<ListingResponse, CatalogError> {
        debug!(page = req.page.get(), query = %req.query, in_stock = req.in_stock, "fetching listing");

        let resp = self
            .client
            .get(format!("{}/api/list", self.base_url))
            .query(&query_pairs(req))
            .send()
            .await?;
        let resp = Self::ensure_ok(resp).await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        let listing: ListingResponse = serde_json::from_slice(&body)
            .map_err(|source| CatalogError::MalformedResponse { status, source })?;
        debug!(
            files = listing.files.len(),
            current_page = listing.current_page,
            total_pages = listing.total_pages,
            "listing received"
        );
        Ok(listing)
    }

    /// Absolute URL of an entry's preview image.
    pub fn preview_url(&self, entry: &FileEntry) -> String {
        if entry.preview_url.starts_with("http://") || entry.preview_url.starts_with("https://") {
            return entry.preview_url.clone();
        }
        if entry.preview_url.starts_with('/') {
            format!("{}{}", self.base_url, entry.preview_url)
        } else {
            format!("{}/{}", self.base_url, entry.preview_url)
        }
    }

    pub fn download_url(&self, entry: &FileEntry) -> String {
        format!("{}{}", self.preview_url(entry), DOWNLOAD_SUFFIX)
    }

    pub async fn fetch_preview(&self, entry: &FileEntry) -> Result<Bytes, CatalogError> {
        self.get_bytes(self.preview_url(entry)).await
    }

    pub async fn download(&self, entry: &FileEntry) -> Result<Bytes, CatalogError> {
        self.get_bytes(self.download_url(entry)).await
    }

    async fn get_bytes(&self, url: String) -> Result<Bytes, CatalogError> {
        debug!(%url, "fetching file");
        let resp = self.client.get(url).send().await?;
        Ok(Self::ensure_ok(resp).await?.bytes().await?)
    }
}
