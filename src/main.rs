use capacity_alerts::{Args, Command, commands, config, signal_handler};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup tracing on stderr so tables on stdout stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse config
    let args = Args::parse();
    let config = config::Config::from_file(&args.config)?;

    // Handle signals
    let cancel = CancellationToken::new();
    signal_handler(cancel.clone())?;

    match &args.command {
        Command::Demands(list) => commands::demands(&config, list, cancel).await,
        Command::CapacityGroups(list) => commands::capacity_groups(&config, list, cancel).await,
        Command::Alerts(list) => commands::alerts(&config, list, cancel).await,
        Command::Triggered(list) => commands::triggered(&config, list, cancel).await,
        Command::Create => commands::create(&config, cancel).await,
        Command::Monitor { interval } => commands::monitor(&config, *interval, cancel).await,
    }
}
