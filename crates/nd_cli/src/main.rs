use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use nd_core::{ArticleSource, Config, Result};
use nd_monitor::{handle_command, init_logging, HumanDuration, JsonFileSource, Monitor, MonitorCommands, StaticSource};
use nd_storage::{spawn_store, StoreHandle};
use nd_web::{create_app, AppState};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tracks how news stories evolve and flags manipulative coverage", long_about = None)]
pub struct Cli {
    /// JSON settings file; ND_* environment variables and flags override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Article store: a JSON file path or `memory`
    #[arg(long, global = true)]
    data_file: Option<String>,
    /// Scores above this are flagged as high manipulation
    #[arg(long, global = true)]
    threshold: Option<f64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Monitor(MonitorCommands),
    /// Serve the stored stories over HTTP
    Serve {
        /// Raw article file fetched on every periodic and triggered cycle
        #[arg(long)]
        input: Option<PathBuf>,
        /// Periodic cycle interval when --input is given (default: update_interval_secs)
        #[arg(long)]
        interval: Option<HumanDuration>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let mut config = config.apply_env()?;
    if let Some(data_file) = &cli.data_file {
        config.data_file = PathBuf::from(data_file);
    }
    if let Some(threshold) = cli.threshold {
        config.manipulation_threshold = threshold;
    }
    config.validate()?;
    Ok(config)
}

async fn serve(
    config: Config,
    store: StoreHandle,
    input: Option<PathBuf>,
    interval: Option<HumanDuration>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let source: Arc<dyn ArticleSource> = match &input {
        Some(path) => Arc::new(JsonFileSource::new(path)),
        None => Arc::new(StaticSource::default()),
    };
    let host = host.unwrap_or_else(|| config.web_host.clone());
    let port = port.unwrap_or(config.web_port);
    let grouping = config.grouping_mode;
    let scoring = config.scoring_mode;
    let period = interval
        .map(|i| i.0)
        .unwrap_or_else(|| Duration::from_secs(config.update_interval_secs.max(1)));

    let monitor = Arc::new(Monitor::new(config, source, store));
    if input.is_some() {
        let periodic = monitor.clone();
        tokio::spawn(async move {
            if let Err(e) = periodic.run_periodic(period, grouping, scoring).await {
                error!("Periodic monitoring stopped: {}", e);
            }
        });
    }

    let app = create_app(AppState { monitor }).await;
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("🌐 Serving on http://{}:{}", host, port);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let location = config.data_file.to_string_lossy().into_owned();
    let store = spawn_store(&location, config.clone())?;
    info!("🏦 Using article store {}", location);

    match cli.command {
        Commands::Monitor(command) => handle_command(command, &config, &store).await?,
        Commands::Serve { input, interval, host, port } => {
            serve(config, store, input, interval, host, port).await?
        }
    }

    Ok(())
}
