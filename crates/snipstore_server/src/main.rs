//! Headless API server entrypoint.

use snipstore_server::{config::Config, serve_router, AppState, DEFAULT_PORT};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    check_config: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--check-config" => flags.check_config = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "snipstore=info,snipstore_server=info,snipstore_core=info,tower_http=warn"
                        .into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            tracing::warn!("Failed to load .env file: {}", err);
        }
    }

    let config = Config::from_env()?;
    tracing::info!(backend = config.backend.name(), "Configuration loaded");

    let state = AppState::open(config.clone())?;
    if cli_flags.check_config {
        println!(
            "Configuration OK (backend: {}, port: {})",
            state.service.backend_name(),
            config.port
        );
        return Ok(());
    }

    let bind_addr = snipstore_server::resolve_bind_address(&config);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("SnipStore running at http://{}", actual_addr);

    serve_router(listener, state, shutdown_signal()).await?;
    tracing::info!("SnipStore stopped");

    Ok(())
}

fn print_help() {
    println!("SnipStore Server\n");
    println!("Usage: snipstore [OPTIONS]\n");
    println!("Options:");
    println!("  --check-config    Validate configuration and open the store, then exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables (also read from .env):");
    println!("  PORT                      Server port (default: {})", DEFAULT_PORT);
    println!(
        "  BIND                      Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
    println!("  ALLOW_PUBLIC_ACCESS       Permit binding to non-loopback addresses");
    println!("  MAX_SNIPPET_SIZE          Maximum snippet size in bytes (default: 10MB)");
    println!("  STORAGE_BACKEND           'embedded' (default) or 'rest'");
    println!(
        "  DB_PATH                   Embedded database directory (default: ~/.cache/snipstore/db)"
    );
    println!("  REST_URL                  REST backend base URL (alias: SUPABASE_URL)");
    println!("  REST_API_KEY              REST backend key (alias: SUPABASE_KEY)");
    println!("  REST_TABLE                REST table name (default: snippets)");
    println!("  REST_SERVER_ASSIGNED_IDS  Let the REST backend assign ids");
    println!("  BACKEND_TIMEOUT_SECS      REST request timeout (default: 10)");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
