use crate::error::ApiError;
use async_trait::async_trait;
use core_types::{FailureKind, PageRequest, PagedResult, QueryFailure, QueryOutcome};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::time::Duration;

/// Delivers one page request to a paginated resource and brings back its outcome.
///
/// Implementations never fail out of band: network and decoding faults are outcomes too.
#[async_trait]
pub trait PageTransport<T>: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> QueryOutcome<PagedResult<T>>;
}

/// Talks the paginated-resource protocol over HTTP: a POST with string-encoded `page` and
/// `limit` form fields, answered by an outcome-shaped JSON body.
pub struct HttpPageTransport<T> {
    client: reqwest::Client,
    url: String,
    _row: PhantomData<fn() -> T>,
}

impl<T> HttpPageTransport<T> {
    pub fn new(base_url: &str, path: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{base_url}{path}"),
            _row: PhantomData,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl<T: DeserializeOwned + Send> PageTransport<T> for HttpPageTransport<T> {
    async fn fetch_page(&self, request: PageRequest) -> QueryOutcome<PagedResult<T>> {
        let form = [
            ("page", request.page().to_string()),
            ("limit", request.limit().to_string()),
        ];

        let response = match self.client.post(&self.url).form(&form).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Page request did not reach the server.");
                return QueryOutcome::Failure(QueryFailure::transport(format!(
                    "Could not reach the server: {e}"
                )));
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Failed to read page response.");
                return QueryOutcome::Failure(QueryFailure::transport(format!(
                    "Failed to read the response: {e}"
                )));
            }
        };

        match serde_json::from_str::<QueryOutcome<PagedResult<T>>>(&text) {
            Ok(outcome) => outcome,
            Err(e) if status.is_success() => {
                tracing::warn!(url = %self.url, error = %e, "Malformed page response.");
                QueryOutcome::Failure(QueryFailure::transport(format!(
                    "Malformed response: {e}"
                )))
            }
            Err(_) => QueryOutcome::Failure(QueryFailure::new(
                FailureKind::from_status(status.as_u16()),
                format!("Request failed with status {status}"),
            )),
        }
    }
}
