use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use statusboard::config::StatusboardConfig;
use statusboard::logging::init_logging;
use statusboard::monitor::{OverallStatus, RefreshOrchestrator, StatusChecker};
use statusboard::render::{OutputFormat, Renderer, renderer_for, write_output};
use statusboard::version::VERSION;

const ENV_LOG_DIR: &str = "STATUSBOARD_LOG_DIR";

#[derive(Parser, Debug)]
#[command(author, about = "Uptime dashboard for a fixed list of websites", long_about = None)]
struct Args {
    /// Path to the site list / configuration file
    #[arg(short, long, default_value = "config/sites.toml")]
    config: String,

    /// How to render the dashboard
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the rendered dashboard to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep refreshing on the configured interval; press Enter to refresh now
    #[arg(long)]
    watch: bool,

    /// Also write JSON logs, rotated daily, into this directory
    #[arg(long)]
    log_dir: Option<String>,
}

fn spawn_stdin_trigger(trigger_tx: mpsc::Sender<()>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(_)) = lines.next_line().await {
            if trigger_tx.try_send(()).is_err() {
                warn!("Refresh request dropped, one is already queued.");
            }
        }
    });
}

async fn run_watch(
    orchestrator: Arc<RefreshOrchestrator>,
    config: &StatusboardConfig,
    renderer: Box<dyn Renderer>,
    output: Option<PathBuf>,
) {
    let (trigger_tx, trigger_rx) = mpsc::channel::<()>(1);
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    spawn_stdin_trigger(trigger_tx);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C.");
            return;
        }
        info!("Ctrl-C received, shutting down.");
        let _ = shutdown_tx.send(());
    });

    info!(
        interval_secs = config.refresh_interval_secs,
        "Watching sites. Press Enter to refresh now, Ctrl-C to stop."
    );
    orchestrator
        .watch(config.refresh_interval(), trigger_rx, shutdown_rx, |snapshot| {
            match renderer.render(snapshot) {
                Ok(rendered) => {
                    if let Err(e) = write_output(&rendered, output.as_deref()) {
                        error!(error = %e, "Failed to write dashboard.");
                    }
                }
                Err(e) => error!(error = %e, "Failed to render dashboard."),
            }
        })
        .await;
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    if std::env::args().any(|arg| arg == "--version") {
        println!("statusboard version: {VERSION}");
        return Ok(ExitCode::SUCCESS);
    }

    let args = Args::parse();

    dotenv::dotenv().ok();
    let log_dir = args.log_dir.clone().or_else(|| std::env::var(ENV_LOG_DIR).ok());
    init_logging(log_dir.as_deref());
    info!("Starting statusboard, version: {}", VERSION);

    let config = match StatusboardConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let checker = StatusChecker::new(config.proxy_url.clone(), config.timeout())?;
    let orchestrator = Arc::new(RefreshOrchestrator::new(config.sites.clone(), Arc::new(checker)));

    let auto_refresh = args.watch.then_some(config.refresh_interval_secs);
    let renderer = renderer_for(args.format, &config.title, auto_refresh);

    if args.watch {
        run_watch(orchestrator, &config, renderer, args.output).await;
        return Ok(ExitCode::SUCCESS);
    }

    let snapshot = orchestrator.refresh().await?;
    let rendered = renderer.render(&snapshot)?;
    write_output(&rendered, args.output.as_deref())?;

    Ok(match snapshot.overall {
        OverallStatus::MajorOutage => ExitCode::from(2),
        OverallStatus::Operational | OverallStatus::Degraded => ExitCode::SUCCESS,
    })
}
