use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    ClientSettings, DatabaseSettings, LoggingSettings, OrderingPolicy, PaginationSettings,
    QuerySettings, ServerSettings, Settings,
};

/// The file looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard";

/// Prefix of environment overrides, e.g. `DASHBOARD__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "DASHBOARD";

/// Loads the application settings.
///
/// Sources, later ones winning: built-in defaults, the TOML file (`path`, or an optional
/// `dashboard.toml` in the working directory), `DASHBOARD__*` environment variables, and
/// finally `DATABASE_URL` (also read from `.env`).
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();

    let file = match path {
        Some(path) => config::File::from(path),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let mut settings = builder.try_deserialize::<Settings>()?;

    if let Ok(url) = std::env::var("DATABASE_URL") {
        settings.database.url = Some(url);
    }

    settings.validate()?;
    Ok(settings)
}
