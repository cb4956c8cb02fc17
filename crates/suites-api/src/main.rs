//! Contoso Suites API server
//!
//! Serves hotel lookups, text vectorization, maintenance request vector
//! search and the maintenance copilot over HTTP.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use suites_api::config::AppConfig;
use suites_api::{import, serve, AppState};
use suites_core::{AzureOpenAiClient, MaintenanceCopilot, Storage, VectorizationService};

/// Contoso Suites Web API
#[derive(Parser)]
#[command(name = "suites-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hotel lookups and maintenance request vector search")]
struct Cli {
    /// JSON configuration file (appsettings-style)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Listen host, overrides config
        #[arg(long)]
        host: Option<String>,
        /// Listen port, overrides config
        #[arg(long)]
        port: Option<u16>,
    },

    /// Import maintenance requests from a JSON array file
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Injected handles shared by every command
struct Services {
    storage: Arc<Storage>,
    vectorization: Arc<VectorizationService>,
    copilot: Arc<MaintenanceCopilot>,
}

fn build_services(config: &AppConfig) -> anyhow::Result<Services> {
    let storage = Arc::new(
        Storage::new(
            config.database.path.clone(),
            config.search.embedding_dimensions,
        )
        .context("Failed to initialize storage")?,
    );
    info!(
        dimensions = config.search.embedding_dimensions,
        "Storage initialized successfully"
    );

    let client = Arc::new(
        AzureOpenAiClient::new(config.azure_openai.clone())
            .context("Failed to create Azure OpenAI client")?,
    );
    if !client.is_configured() {
        warn!("AZURE_OPENAI_ENDPOINT is not set; vectorization and copilot calls will fail");
    }

    let timeout = config.search.provider_timeout();
    let vectorization = Arc::new(
        VectorizationService::new(client.clone(), storage.clone()).with_timeout(timeout),
    );
    let copilot = Arc::new(MaintenanceCopilot::new(client, timeout));

    Ok(Services {
        storage,
        vectorization,
        copilot,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    info!("Contoso Suites API v{} starting...", env!("CARGO_PKG_VERSION"));

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let services = build_services(&config)?;
            let state = AppState::new(
                services.vectorization,
                services.storage,
                services.copilot,
            );
            serve(&config.server, state).await?;
        }
        Commands::Import { file } => {
            let services = build_services(&config)?;
            let records = import::read_import_file(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let summary =
                import::import_records(records, &services.vectorization, &services.storage)
                    .await?;
            println!(
                "Imported {} maintenance requests ({} embedded)",
                summary.imported, summary.embedded
            );
        }
    }

    Ok(())
}
