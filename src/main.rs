use anyhow::{Context, Result};
use clap::Parser;
use gradeboard::core::{init_tracing, settings_path, ClientConfig};
use gradeboard::game::{spawn_session, MoveController};
use gradeboard::networking::{spawn_health_probe, EngineService, HttpEngineClient, ReadinessFlag};
use gradeboard::ui::run_console;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Terminal chessboard that grades every move through an engine service
#[derive(Parser, Debug)]
#[command(name = "gradeboard", version, about)]
struct Args {
    /// Engine service base URL, e.g. http://localhost:6400/api
    #[arg(long)]
    url: Option<String>,

    /// Seconds between readiness probes
    #[arg(long)]
    poll_secs: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Settings file to load instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!(
        "[CONFIG] Engine service at {} (probe every {}s, timeout {}s)",
        config.service_url, config.poll_interval_secs, config.request_timeout_secs
    );

    let client = HttpEngineClient::new(&config).context("Failed to build HTTP client")?;
    let service: Arc<dyn EngineService> = Arc::new(client);

    let readiness = ReadinessFlag::default();
    let probe = spawn_health_probe(
        Arc::clone(&service),
        readiness.clone(),
        config.poll_interval(),
    );

    let controller = MoveController::new(readiness);
    let (handle, events, session) = spawn_session(controller, service);

    let result = run_console(handle, events).await;

    probe.abort();
    if let Err(e) = session.await {
        error!("[SESSION] Session task ended abnormally: {}", e);
    }
    result
}

/// Settings file, then environment, then command-line flags
fn load_config(args: &Args) -> Result<ClientConfig> {
    let path = args.config.clone().unwrap_or_else(settings_path);
    let mut config = ClientConfig::load_or_default(&path);
    config.apply_env()?;

    if let Some(url) = &args.url {
        config.service_url = url.trim().to_string();
    }
    if let Some(secs) = args.poll_secs {
        config.poll_interval_secs = secs;
    }
    if let Some(secs) = args.timeout_secs {
        config.request_timeout_secs = secs;
    }

    config.validate()?;
    Ok(config)
}
