use crate::store::{JsonRow, Store};
use core_types::{FailureKind, Query, QueryOutcome};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Executes queries against an injected store and classifies the result.
///
/// Cloning is cheap; clones share the store.
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn Store>,
    timeout: Option<Duration>,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store, timeout: None }
    }

    /// Bounds every `execute` call. Expiry is reported as a `Timeout` failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Runs `query` and decodes each returned row into `T`, preserving order.
    ///
    /// This never fails: store faults, timeouts and rows that do not fit `T` all come back as
    /// `QueryOutcome::Failure` carrying a message that is safe to show.
    pub async fn execute<T: DeserializeOwned>(&self, query: &Query) -> QueryOutcome<Vec<T>> {
        let started = Instant::now();
        let fetch = self.store.fetch(query.text(), query.params());

        let fetched = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, fetch).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        statement = %statement_summary(query.text()),
                        timeout_ms = limit.as_millis() as u64,
                        "Query timed out."
                    );
                    return QueryOutcome::failure(
                        FailureKind::Timeout,
                        format!("The query timed out after {} ms", limit.as_millis()),
                    );
                }
            },
            None => fetch.await,
        };

        let rows = match fetched {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(
                    error = ?e,
                    statement = %statement_summary(query.text()),
                    params = query.params().len(),
                    "Query failed."
                );
                return QueryOutcome::failure(FailureKind::Store, e.public_message());
            }
        };

        let row_count = rows.len();
        match decode_rows::<T>(rows) {
            Ok(decoded) => {
                tracing::debug!(
                    statement = %statement_summary(query.text()),
                    rows = row_count,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Query succeeded."
                );
                QueryOutcome::Success(decoded)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    statement = %statement_summary(query.text()),
                    "Query returned rows that do not match the expected shape."
                );
                QueryOutcome::failure(
                    FailureKind::Store,
                    "The query returned data in an unexpected shape",
                )
            }
        }
    }
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<JsonRow>) -> Result<Vec<T>, serde_json::Error> {
    rows.into_iter()
        .map(|row| serde_json::from_value(JsonValue::Object(row)))
        .collect()
}

/// First line of the statement, whitespace-collapsed, for log fields.
fn statement_summary(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(80) {
        Some((cut, _)) => format!("{}...", &collapsed[..cut]),
        None => collapsed,
    }
}
