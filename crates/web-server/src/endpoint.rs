use analytics::PagedResource;
use analytics::rows::CountRow;
use axum::http::Method;
use core_types::{PageRequest, PagedResult, QueryFailure, QueryOutcome};
use database::QueryExecutor;
use serde::Deserialize;
use std::marker::PhantomData;

/// The form fields of a page submission, exactly as they arrived.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageForm {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Serves one `PagedResource`: validates a page submission, then runs the count query
/// followed by the windowed row query.
pub struct PagedResourceEndpoint<R: PagedResource> {
    executor: QueryExecutor,
    default_limit: u32,
    max_limit: u32,
    _resource: PhantomData<fn() -> R>,
}

impl<R: PagedResource> Clone for PagedResourceEndpoint<R> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            default_limit: self.default_limit,
            max_limit: self.max_limit,
            _resource: PhantomData,
        }
    }
}

impl<R: PagedResource> PagedResourceEndpoint<R> {
    pub fn new(executor: QueryExecutor, default_limit: u32, max_limit: u32) -> Self {
        Self {
            executor,
            default_limit,
            max_limit,
            _resource: PhantomData,
        }
    }

    /// Entry point for the wire protocol.
    ///
    /// Only POST is accepted. Missing or non-numeric fields fall back to the defaults
    /// without complaint; negative ones are a validation failure.
    pub async fn handle_submission(
        &self,
        method: &Method,
        form: &PageForm,
    ) -> QueryOutcome<PagedResult<R::Row>> {
        if method != Method::POST {
            tracing::warn!(resource = R::NAME, %method, "Rejected page request with wrong method.");
            return QueryOutcome::Failure(QueryFailure::method_not_allowed());
        }

        match PageRequest::parse_lenient(form.page.as_deref(), form.limit.as_deref(), self.default_limit) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                tracing::warn!(resource = R::NAME, error = %e, "Rejected page request.");
                QueryOutcome::Failure(QueryFailure::validation(e.to_string()))
            }
        }
    }

    /// Fetches one page. The count query runs first; if it fails, the row query is never
    /// issued.
    pub async fn handle(&self, request: PageRequest) -> QueryOutcome<PagedResult<R::Row>> {
        if request.limit() > self.max_limit {
            return QueryOutcome::Failure(QueryFailure::validation(format!(
                "Invalid input for limit: {} exceeds the maximum of {}",
                request.limit(),
                self.max_limit
            )));
        }
        let limit = i64::from(request.limit());
        let Ok(offset) = i64::try_from(request.offset()) else {
            return QueryOutcome::Failure(QueryFailure::validation(
                "Invalid input for page: the requested page is out of range",
            ));
        };

        let count_rows = match self.executor.execute::<CountRow>(&R::count_query()).await {
            QueryOutcome::Success(rows) => rows,
            QueryOutcome::Failure(failure) => return QueryOutcome::Failure(failure),
        };
        let Some(total_count) = count_rows.first().map(|row| row.total) else {
            tracing::error!(resource = R::NAME, "Count query returned no rows.");
            return QueryOutcome::Failure(QueryFailure::store(
                "The count query returned no result",
            ));
        };

        let rows = match self
            .executor
            .execute::<R::Row>(&R::page_query(limit, offset))
            .await
        {
            QueryOutcome::Success(rows) => rows,
            QueryOutcome::Failure(failure) => return QueryOutcome::Failure(failure),
        };

        tracing::debug!(
            resource = R::NAME,
            page = request.page(),
            limit,
            offset,
            rows = rows.len(),
            total_count,
            "Served page."
        );
        QueryOutcome::Success(PagedResult::new(rows, total_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{OrganizationsResource, UsersResource, queries, rows::OrganizationRow};
    use core_types::{DEFAULT_LIMIT, FailureKind, QueryParam};
    use database::testing::{ScriptedStore, row};
    use serde_json::json;
    use std::sync::Arc;

    fn organizations(n: usize) -> Vec<database::JsonRow> {
        (1..=n)
            .map(|i| {
                row(json!({
                    "organization_name": format!("Org {i:02}"),
                    "total_active_users": i,
                    "total_products": i * 2
                }))
            })
            .collect()
    }

    fn orgs_endpoint(store: Arc<ScriptedStore>) -> PagedResourceEndpoint<OrganizationsResource> {
        PagedResourceEndpoint::new(QueryExecutor::new(store), DEFAULT_LIMIT, 100)
    }

    fn table_store(n: usize) -> Arc<ScriptedStore> {
        Arc::new(ScriptedStore::new().table(
            queries::ORGANIZATIONS_COUNT,
            queries::ORGANIZATIONS_PAGE,
            organizations(n),
        ))
    }

    fn post(page: &str, limit: &str) -> PageForm {
        PageForm {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
        }
    }

    #[tokio::test]
    async fn same_request_twice_yields_equal_pages() {
        let endpoint = orgs_endpoint(table_store(12));
        let request = PageRequest::new(1, 10).unwrap();

        let first = endpoint.handle(request).await;
        let second = endpoint.handle(request).await;

        assert!(first.is_success());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn empty_table_is_an_empty_success() {
        let endpoint = orgs_endpoint(table_store(0));

        let outcome = endpoint.handle(PageRequest::new(1, 10).unwrap()).await;

        assert_eq!(outcome, QueryOutcome::Success(PagedResult::new(Vec::new(), 0)));
    }

    #[tokio::test]
    async fn last_and_past_the_end_pages() {
        let endpoint = orgs_endpoint(table_store(25));

        let third = endpoint.handle(PageRequest::new(3, 10).unwrap()).await.into_result().unwrap();
        assert_eq!(third.total_pages(10), 3);
        assert_eq!(third.rows.len(), 5);
        assert_eq!(third.rows[0].organization_name, "Org 21");

        let fourth = endpoint.handle(PageRequest::new(4, 10).unwrap()).await.into_result().unwrap();
        assert!(fourth.rows.is_empty());
        assert_eq!(fourth.total_count, 25);
    }

    #[tokio::test]
    async fn non_numeric_page_defaults_to_the_first_page() {
        let store = table_store(3);
        let endpoint = orgs_endpoint(store.clone());

        let outcome = endpoint.handle_submission(&Method::POST, &post("abc", "")).await;

        assert!(outcome.is_success());
        let page_calls: Vec<_> = store
            .calls()
            .into_iter()
            .filter(|c| c.statement == queries::ORGANIZATIONS_PAGE)
            .collect();
        assert_eq!(page_calls[0].params, vec![QueryParam::Int(10), QueryParam::Int(0)]);
    }

    #[tokio::test]
    async fn wrong_method_is_rejected_before_touching_the_store() {
        let store = table_store(3);
        let endpoint = orgs_endpoint(store.clone());

        let outcome = endpoint.handle_submission(&Method::GET, &PageForm::default()).await;

        let failure = outcome.as_failure().cloned().unwrap();
        assert_eq!(failure.kind, FailureKind::MethodNotAllowed);
        assert_eq!(failure.message, "Method not allowed");
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn count_failure_short_circuits_the_row_query() {
        let store = Arc::new(
            ScriptedStore::new()
                .fail(queries::ORGANIZATIONS_COUNT, "connection reset by peer")
                .respond(queries::ORGANIZATIONS_PAGE, organizations(3)),
        );
        let endpoint = orgs_endpoint(store.clone());

        let outcome = endpoint.handle(PageRequest::new(1, 10).unwrap()).await;

        assert_eq!(outcome.as_failure().map(|f| f.kind), Some(FailureKind::Store));
        assert_eq!(store.call_count(queries::ORGANIZATIONS_COUNT), 1);
        assert_eq!(store.call_count(queries::ORGANIZATIONS_PAGE), 0);
    }

    #[tokio::test]
    async fn row_failure_is_returned() {
        let store = Arc::new(
            ScriptedStore::new()
                .respond(queries::ORGANIZATIONS_COUNT, vec![row(json!({ "total": 3 }))])
                .fail(queries::ORGANIZATIONS_PAGE, "syntax error at or near \"LIMT\""),
        );
        let endpoint = orgs_endpoint(store);

        let outcome = endpoint.handle(PageRequest::new(1, 10).unwrap()).await;

        let failure = outcome.as_failure().cloned().unwrap();
        assert_eq!(failure.kind, FailureKind::Store);
        assert!(!failure.message.contains("LIMT"));
    }

    #[tokio::test]
    async fn count_without_total_is_a_failure_not_a_crash() {
        let store = Arc::new(
            ScriptedStore::new()
                .respond(queries::ORGANIZATIONS_COUNT, vec![row(json!({ "count": 3 }))])
                .respond(queries::ORGANIZATIONS_PAGE, organizations(3)),
        );
        let endpoint = orgs_endpoint(store);

        let outcome = endpoint.handle(PageRequest::new(1, 10).unwrap()).await;

        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn count_with_no_rows_is_a_failure() {
        let store = Arc::new(
            ScriptedStore::new()
                .respond(queries::ORGANIZATIONS_COUNT, Vec::new())
                .respond(queries::ORGANIZATIONS_PAGE, organizations(3)),
        );
        let endpoint = orgs_endpoint(store.clone());

        let outcome = endpoint.handle(PageRequest::new(1, 10).unwrap()).await;

        assert_eq!(outcome.as_failure().map(|f| f.kind), Some(FailureKind::Store));
        assert_eq!(store.call_count(queries::ORGANIZATIONS_PAGE), 0);
    }

    #[tokio::test]
    async fn negative_page_is_a_validation_failure() {
        let endpoint = orgs_endpoint(table_store(3));

        let outcome = endpoint.handle_submission(&Method::POST, &post("-2", "10")).await;

        assert_eq!(outcome.as_failure().map(|f| f.kind), Some(FailureKind::Validation));
    }

    #[tokio::test]
    async fn limit_above_maximum_is_a_validation_failure() {
        let store = table_store(3);
        let endpoint = orgs_endpoint(store.clone());

        let outcome = endpoint.handle_submission(&Method::POST, &post("1", "5000")).await;

        assert_eq!(outcome.as_failure().map(|f| f.kind), Some(FailureKind::Validation));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn rows_decode_into_the_resource_row_type() {
        let endpoint = orgs_endpoint(table_store(2));

        let page = endpoint.handle(PageRequest::default()).await.into_result().unwrap();

        assert_eq!(
            page.rows[1],
            OrganizationRow {
                organization_name: "Org 02".to_string(),
                total_active_users: 2,
                total_products: 4,
            }
        );
    }

    #[tokio::test]
    async fn users_resource_uses_its_own_statements() {
        let store = Arc::new(
            ScriptedStore::new()
                .respond(queries::USERS_COUNT, vec![row(json!({ "total": 0 }))])
                .respond(queries::USERS_PAGE, Vec::new()),
        );
        let endpoint: PagedResourceEndpoint<UsersResource> =
            PagedResourceEndpoint::new(QueryExecutor::new(store.clone()), DEFAULT_LIMIT, 100);

        let outcome = endpoint.handle(PageRequest::default()).await;

        assert!(outcome.is_success());
        assert_eq!(store.call_count(queries::USERS_PAGE), 1);
    }
}
