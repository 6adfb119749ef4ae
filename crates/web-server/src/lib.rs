use analytics::{OrganizationsResource, UsersResource};
use axum::{
    Router,
    routing::{any, get},
};
use configuration::Settings;
use database::{PgStore, QueryExecutor};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod endpoint;
pub mod error;
pub mod handlers;
pub mod response;

pub use endpoint::{PageForm, PagedResourceEndpoint};
pub use response::OutcomeResponse;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub executor: QueryExecutor,
    pub users: PagedResourceEndpoint<UsersResource>,
    pub orgs: PagedResourceEndpoint<OrganizationsResource>,
}

impl AppState {
    pub fn new(executor: QueryExecutor, default_limit: u32, max_limit: u32) -> Self {
        Self {
            users: PagedResourceEndpoint::new(executor.clone(), default_limit, max_limit),
            orgs: PagedResourceEndpoint::new(executor.clone(), default_limit, max_limit),
            executor,
        }
    }
}

/// Builds the application routes. Kept separate from `run_server` so tests can drive the
/// router without a socket or a database.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/dashboards/:name", get(handlers::get_dashboard))
        .route("/resources/users", any(handlers::users_page))
        .route("/resources/orgs", any(handlers::orgs_page))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Connects to the database and serves the API until the process is stopped.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let addr = settings.server.addr()?;
    let pool = database::connect(&settings.database).await?;
    let executor = QueryExecutor::new(Arc::new(PgStore::new(pool)))
        .with_timeout(settings.query.timeout());

    let state = AppState::new(
        executor,
        settings.pagination.default_limit,
        settings.pagination.max_limit,
    );
    let app = router(Arc::new(state));

    tracing::info!(%addr, "Web server started and listening.");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
