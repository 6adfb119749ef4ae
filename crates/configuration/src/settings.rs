use crate::error::ConfigError;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an empty file (or no file) is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub query: QuerySettings,
    pub pagination: PaginationSettings,
    pub client: ClientSettings,
    pub logging: LoggingSettings,
}

/// Where the HTTP API listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Connection pool settings for the PostgreSQL store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Usually supplied through `DATABASE_URL` rather than the file.
    pub url: Option<String>,
    pub max_connections: u32,
    /// How long a query may wait for a pooled connection.
    pub acquire_timeout_secs: u64,
}

/// Per-query behavior of the executor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Deadline for a single store round-trip. Expiry is reported as a timeout failure.
    pub timeout_ms: u64,
}

/// Window sizes accepted by the paginated-resource endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    /// The page size clients request and the endpoint falls back to.
    pub default_limit: u32,
    /// Larger requested limits are rejected as validation failures.
    pub max_limit: u32,
}

/// How a paged-resource client treats responses that settle out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Whichever response arrives last is shown, even if it answers an older request.
    #[default]
    LastArrival,
    /// Only the response to the most recently issued request is shown.
    LatestIssued,
}

/// Settings for clients of the paginated-resource protocol (the `browse` command).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub ordering: OrderingPolicy,
}

/// Log filtering and the optional rolling log file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub filter: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            request_timeout_ms: 15_000,
            ordering: OrderingPolicy::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.default_limit == 0 {
            return Err(ConfigError::ValidationError(
                "pagination.default_limit must be at least 1".to_string(),
            ));
        }
        if self.pagination.default_limit > self.pagination.max_limit {
            return Err(ConfigError::ValidationError(format!(
                "pagination.default_limit ({}) exceeds pagination.max_limit ({})",
                self.pagination.default_limit, self.pagination.max_limit
            )));
        }
        if self.query.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "query.timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        self.server.addr()?;
        Ok(())
    }
}

impl ServerSettings {
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("invalid server address: {e}")))
    }
}

impl QuerySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
