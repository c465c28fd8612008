pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod models;
pub mod services;

use tokio::signal;

use clients::bluray::BluRayClient;
use clients::kodi::KodiClient;
use cli::{Cli, Commands};
pub use config::Config;
use config::LogFormat;
use services::{Adjuster, Listener, SettingsSource};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run(args: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config);
    config.validate()?;

    match args.command.unwrap_or(Commands::Daemon) {
        Commands::Daemon => run_daemon(config, args.config).await,

        Commands::Check => cli::cmd_check(&config).await,

        Commands::Lookup { title, year } => cli::cmd_lookup(&config, &title.join(" "), &year).await,

        Commands::Compute {
            width,
            height,
            content_ar,
            screen_ar,
        } => cli::cmd_compute(&config, width, height, content_ar, screen_ar),

        Commands::Init => cli::cmd_init(args.config.as_deref()),
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.general.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn run_daemon(config: Config, config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    info!(
        "autofit v{} starting in daemon mode...",
        env!("CARGO_PKG_VERSION")
    );

    let kodi = KodiClient::new(&config.kodi)?;
    let scraper = BluRayClient::new(&config.scraper)?;
    let settings = SettingsSource::file(config_path, config.autofit.clone());
    let mut listener = Listener::new(Adjuster::new(kodi, scraper), settings);

    info!("Service started and waiting for playback. Press Ctrl+C to stop.");

    tokio::select! {
        () = listener.run(&config.kodi.event_addr, config.kodi.reconnect_delay()) => {}
        result = signal::ctrl_c() => match result {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!("Error listening for shutdown: {}", e),
        },
    }

    info!("Daemon stopped");

    Ok(())
}
