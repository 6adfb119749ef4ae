use analytics::{DashboardKind, ResourceKind, load_dashboard, Dashboard};
use analytics::rows::{OrganizationRow, UserRow};
use anyhow::Context;
use api_client::{HttpPageTransport, PagedResourceClient};
use clap::{Parser, Subcommand};
use configuration::Settings;
use database::{PgStore, QueryExecutor};
use render::TableRow;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

mod render;

/// The entry point for the admin analytics dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = configuration::load_settings(cli.config.as_deref())
        .context("Failed to load configuration")?;
    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    match cli.command {
        Commands::Serve => web_server::run_server(&settings).await,
        Commands::Dashboard { name } => handle_dashboard(&settings, name).await,
        Commands::Browse { resource } => match resource {
            ResourceKind::Users => handle_browse::<UserRow>(&settings, resource).await,
            ResourceKind::Organizations => {
                handle_browse::<OrganizationRow>(&settings, resource).await
            }
        },
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Admin analytics dashboard: serves the query API and renders dashboards in the terminal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults to `dashboard.toml` if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API on the configured address.
    Serve,
    /// Load a dashboard straight from the database and print every widget.
    Dashboard {
        /// `orgs` or `users`.
        name: DashboardKind,
    },
    /// Page through a resource served by a running instance.
    Browse {
        /// `users` or `orgs`.
        resource: ResourceKind,
    },
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_dashboard(settings: &Settings, kind: DashboardKind) -> anyhow::Result<()> {
    let pool = database::connect(&settings.database)
        .await
        .context("Failed to connect to the database")?;
    let executor =
        QueryExecutor::new(Arc::new(PgStore::new(pool))).with_timeout(settings.query.timeout());

    let view = match load_dashboard(kind, &executor).await {
        Dashboard::Orgs(dashboard) => render::render_orgs_dashboard(dashboard),
        Dashboard::Users(dashboard) => render::render_users_dashboard(dashboard),
    };
    println!("{view}");
    Ok(())
}

/// Reads `n` (next), `p` (previous), a page number, or `q` from stdin and prints each page
/// once its request settles.
async fn handle_browse<T>(settings: &Settings, resource: ResourceKind) -> anyhow::Result<()>
where
    T: TableRow + DeserializeOwned + Clone + Send + Sync + 'static,
{
    let transport: HttpPageTransport<T> = HttpPageTransport::new(
        &settings.client.base_url,
        resource.path(),
        settings.client.request_timeout(),
    )?;
    tracing::info!(url = transport.url(), "Browsing {resource}.");

    let limit = settings.pagination.default_limit;
    let client = PagedResourceClient::new(Arc::new(transport), limit, settings.client.ordering);

    client.initialize()?.await?;
    println!("{}", render::render_page(client.snapshot(), limit));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let current = client.current_page();
        let target = match line.trim() {
            "q" => break,
            "n" => current.saturating_add(1),
            "p" => current.saturating_sub(1).max(1),
            other => match other.parse::<u32>() {
                Ok(page) if page >= 1 => page,
                _ => {
                    println!("Enter n, p, a page number, or q.");
                    continue;
                }
            },
        };
        client.change_page(target)?.await?;
        println!("{}", render::render_page(client.snapshot(), limit));
    }
    Ok(())
}
