use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use shipby_core::SyncWindow;

use crate::gateway::SaleGateway;
use crate::types::{Sale, SaleListEntry, SaleListPage, SaleUpdate};
use crate::{DearError, Result};

const ACCOUNT_HEADER: &str = "api-auth-accountid";
const APPLICATION_KEY_HEADER: &str = "api-auth-applicationkey";
const DEFAULT_PAGE_LIMIT: u32 = 1000;

/// API credentials sent on every request.
#[derive(Clone)]
pub struct Credentials {
    pub account_id: String,
    pub application_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("application_key", &"<redacted>")
            .finish()
    }
}

/// HTTP client for the DEAR sale endpoints.
///
/// Construct once at startup and share; the underlying connection pool is
/// reused across runs.
#[derive(Debug, Clone)]
pub struct DearClient {
    http: reqwest::Client,
    base_url: String,
    page_limit: u32,
}

impl DearClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(ACCOUNT_HEADER),
            header_value(&credentials.account_id, ACCOUNT_HEADER)?,
        );
        headers.insert(
            HeaderName::from_static(APPLICATION_KEY_HEADER),
            header_value(&credentials.application_key, APPLICATION_KEY_HEADER)?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
        })
    }

    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// First page of `saleList` for the window. DEAR has no server-side
    /// channel filter, so every status and channel comes back.
    pub async fn sale_list(&self, window: &SyncWindow, location_id: &str) -> Result<SaleListPage> {
        let limit = self.page_limit.to_string();
        let created_since = window.created_since_param();
        let updated_since = window.updated_since_param();
        tracing::debug!(%created_since, %updated_since, location_id, "listing sales");

        let resp = self
            .http
            .get(self.url("saleList"))
            .query(&[
                ("Page", "1"),
                ("Limit", limit.as_str()),
                ("CreatedSince", created_since.as_str()),
                ("UpdatedSince", updated_since.as_str()),
                ("OrderLocationID", location_id),
            ])
            .send()
            .await?;
        read_json(resp, "saleList").await
    }

    pub async fn sale(&self, id: &str) -> Result<Sale> {
        let resp = self
            .http
            .get(self.url("sale"))
            .query(&[("ID", id), ("CombineAdditionalCharges", "true")])
            .send()
            .await?;
        read_json(resp, &format!("sale {id}")).await
    }

    pub async fn put_sale(&self, update: &SaleUpdate) -> Result<()> {
        let resp = self.http.put(self.url("sale")).json(update).send().await?;
        let context = format!("update of sale {}", update.id);
        check_status(resp, &context).await?;
        Ok(())
    }
}

#[async_trait]
impl SaleGateway for DearClient {
    async fn list_sales(&self, window: &SyncWindow, location_id: &str) -> Result<Vec<SaleListEntry>> {
        let page = self.sale_list(window, location_id).await?;
        if page.is_full(self.page_limit) {
            tracing::warn!(
                returned = page.sale_list.len(),
                total = page.total,
                "saleList page is full; sales beyond the first page are not processed"
            );
        }
        Ok(page.sale_list)
    }

    async fn get_sale(&self, id: &str) -> Result<Sale> {
        self.sale(id).await
    }

    async fn update_sale(&self, update: &SaleUpdate) -> Result<()> {
        self.put_sale(update).await
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn header_value(value: &str, name: &str) -> Result<HeaderValue> {
    let mut v = HeaderValue::from_str(value).map_err(|_| DearError::InvalidHeader(name.to_string()))?;
    v.set_sensitive(true);
    Ok(v)
}

async fn check_status(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(DearError::Status {
        context: context.to_string(),
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response, context: &str) -> Result<T> {
    let resp = check_status(resp, context).await?;
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|source| DearError::Parse {
        context: context.to_string(),
        source,
    })
}
