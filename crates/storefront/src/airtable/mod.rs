//! Record service (Airtable) REST client.
//!
//! Thin typed wrapper over `reqwest`: list with filter formulas and sorts
//! (following pagination offsets until exhausted), find by record id, create,
//! and patch. No retries and no client-side caching - the base is the single
//! source of truth and the cart is the only local state this system keeps.

pub mod formula;
mod types;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::config::{AirtableConfig, bearer_token};

pub use types::Record;
use types::{ApiErrorBody, ListResponse, WriteRequest};

/// Tables in the store's base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Products,
    Categories,
    Orders,
    PaymentMethods,
    ShippingMethods,
}

impl Table {
    /// The table's name in the base.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Products => "Products",
            Self::Categories => "Categories",
            Self::Orders => "Orders",
            Self::PaymentMethods => "Payment Methods",
            Self::ShippingMethods => "Shipping Methods",
        }
    }
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Options for a list request.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    filter_by_formula: Option<String>,
    sort: Vec<(String, SortDirection)>,
    max_records: Option<u32>,
}

impl ListQuery {
    /// Start an empty query (no filter, service-default order).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter formula.
    #[must_use]
    pub fn filter(mut self, formula: impl Into<String>) -> Self {
        self.filter_by_formula = Some(formula.into());
        self
    }

    /// Append a sort key.
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push((field.into(), direction));
        self
    }

    /// Cap the total number of records returned.
    #[must_use]
    pub const fn max_records(mut self, max: u32) -> Self {
        self.max_records = Some(max);
        self
    }

    fn params(&self, offset: Option<&str>) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(formula) = &self.filter_by_formula {
            params.push(("filterByFormula".to_string(), formula.clone()));
        }
        for (i, (field, direction)) in self.sort.iter().enumerate() {
            params.push((format!("sort[{i}][field]"), field.clone()));
            params.push((
                format!("sort[{i}][direction]"),
                direction.as_str().to_string(),
            ));
        }
        if let Some(max) = self.max_records {
            params.push(("maxRecords".to_string(), max.to_string()));
        }
        if let Some(offset) = offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        params
    }
}

/// Errors from the record service client.
#[derive(Debug, thiserror::Error)]
pub enum AirtableError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The record or table does not exist.
    #[error("record not found")]
    NotFound,

    /// Rate limited; retry after the given number of seconds.
    #[error("rate limited, retry after {0}s")]
    RateLimited(u64),

    /// The service rejected the request.
    #[error("API error ({status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the record service's REST API.
///
/// Cheaply cloneable; all requests target one base.
#[derive(Clone)]
pub struct AirtableClient {
    inner: Arc<AirtableClientInner>,
}

struct AirtableClientInner {
    client: reqwest::Client,
    base_url: Url,
    auth_header: String,
}

impl AirtableClient {
    /// Create a new client for the configured base.
    #[must_use]
    pub fn new(config: &AirtableConfig) -> Self {
        let mut base_url = config.api_url.clone();
        // Url::path_segments_mut only fails for cannot-be-a-base URLs, which
        // config validation already excludes.
        if let Ok(mut segments) = base_url.path_segments_mut() {
            segments.pop_if_empty().push("v0").push(&config.base_id);
        }

        Self {
            inner: Arc::new(AirtableClientInner {
                client: reqwest::Client::new(),
                base_url,
                auth_header: bearer_token(config),
            }),
        }
    }

    fn record_url(&self, table: Table, id: Option<&str>) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(table.name());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    /// List records matching a query, following pagination to the end.
    ///
    /// # Errors
    ///
    /// Returns an [`AirtableError`] when any page request fails.
    #[instrument(skip(self, query), fields(table = table.name()))]
    pub async fn list(&self, table: Table, query: &ListQuery) -> Result<Vec<Record>, AirtableError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let url = self.record_url(table, None);
            let request = self
                .inner
                .client
                .get(url)
                .query(&query.params(offset.as_deref()));
            let page: ListResponse = self.execute(request).await?;

            records.extend(page.records);
            offset = page.offset;
            if offset.is_none() {
                break;
            }
        }

        debug!(count = records.len(), "listed records");
        Ok(records)
    }

    /// Fetch a single record by id.
    ///
    /// # Errors
    ///
    /// Returns [`AirtableError::NotFound`] for unknown ids.
    #[instrument(skip(self), fields(table = table.name()))]
    pub async fn find(&self, table: Table, id: &str) -> Result<Record, AirtableError> {
        let request = self.inner.client.get(self.record_url(table, Some(id)));
        self.execute(request).await
    }

    /// Create a record from a fields object.
    ///
    /// # Errors
    ///
    /// Returns an [`AirtableError`] when the service rejects the write.
    #[instrument(skip(self, fields), fields(table = table.name()))]
    pub async fn create(&self, table: Table, fields: Value) -> Result<Record, AirtableError> {
        let request = self
            .inner
            .client
            .post(self.record_url(table, None))
            .json(&WriteRequest {
                fields,
                typecast: true,
            });
        self.execute(request).await
    }

    /// Patch a record's fields; untouched fields are preserved.
    ///
    /// # Errors
    ///
    /// Returns an [`AirtableError`] when the service rejects the write.
    #[instrument(skip(self, fields), fields(table = table.name()))]
    pub async fn update(
        &self,
        table: Table,
        id: &str,
        fields: Value,
    ) -> Result<Record, AirtableError> {
        let request = self
            .inner
            .client
            .patch(self.record_url(table, Some(id)))
            .json(&WriteRequest {
                fields,
                typecast: true,
            });
        self.execute(request).await
    }

    /// Send a request and decode the response, mapping service errors.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, AirtableError> {
        let response = request
            .header("Authorization", &self.inner.auth_header)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(30);
            return Err(AirtableError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AirtableError::NotFound);
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .map_or_else(
                    || body.chars().take(200).collect::<String>(),
                    |detail| detail.message(),
                );
            tracing::error!(status = %status, %message, "record service rejected request");
            return Err(AirtableError::Api { status, message });
        }

        match serde_json::from_str(&body) {
            Ok(decoded) => Ok(decoded),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "failed to parse record service response"
                );
                Err(AirtableError::Parse(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> AirtableConfig {
        AirtableConfig {
            api_url: Url::parse("https://api.airtable.com").expect("url"),
            base_id: "appTESTTESTTESTTE".to_string(),
            token: SecretString::from("pat-unit-test"),
        }
    }

    #[test]
    fn test_record_url_encodes_table_names() {
        let client = AirtableClient::new(&config());
        let url = client.record_url(Table::PaymentMethods, None);
        assert_eq!(
            url.as_str(),
            "https://api.airtable.com/v0/appTESTTESTTESTTE/Payment%20Methods"
        );

        let url = client.record_url(Table::Orders, Some("recOrder1"));
        assert_eq!(
            url.as_str(),
            "https://api.airtable.com/v0/appTESTTESTTESTTE/Orders/recOrder1"
        );
    }

    #[test]
    fn test_list_query_params() {
        let query = ListQuery::new()
            .filter("{Active}=TRUE()")
            .sort("Name", SortDirection::Asc)
            .max_records(50);
        let params = query.params(Some("itrNext"));

        assert!(params.contains(&("filterByFormula".to_string(), "{Active}=TRUE()".to_string())));
        assert!(params.contains(&("sort[0][field]".to_string(), "Name".to_string())));
        assert!(params.contains(&("sort[0][direction]".to_string(), "asc".to_string())));
        assert!(params.contains(&("maxRecords".to_string(), "50".to_string())));
        assert!(params.contains(&("offset".to_string(), "itrNext".to_string())));
    }
}
