pub mod cli;
pub mod config;
pub mod dataset;
pub mod db;
pub mod entities;
pub mod loader;

use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
pub use dataset::Dataset;
pub use db::Store;
pub use loader::{LoadError, LoadReport, Loader};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Menu);

    // `init` writes the file `--config` names, so it must not try to read it.
    let config = if matches!(command, Commands::Init) {
        Config::default()
    } else {
        let config = Config::load(cli.config.as_deref())?;
        config.validate()?;
        config
    };

    init_tracing(&config.general);

    match command {
        Commands::Init => cli::cmd_init(cli.config.as_deref()),
        Commands::InitDb => cli::cmd_init_db(&config).await,
        Commands::Load { csv, force } => cli::cmd_load(&config, csv.as_deref(), force).await,
        Commands::Stats => cli::cmd_stats(&config).await,
        Commands::Menu => cli::cmd_menu(&config).await,
    }
}

fn init_tracing(general: &config::GeneralConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&general.log_level));

    // stdout belongs to the menu
    let (plain, json) = if general.log_json {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(plain)
        .with(json)
        .init();
}
