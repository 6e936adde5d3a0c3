use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use tokio::{
    select,
    signal::unix::{SignalKind, signal},
};
use tokio_util::sync::CancellationToken;

pub mod commands;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod gateway;
pub mod http;
pub mod listing;
pub mod metrics;
pub mod monitor;
pub mod notification;
pub mod retry;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Config file
    #[arg(short, long, env = "CAPACITY_ALERTS_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List material demands
    Demands(ListArgs),

    /// List capacity groups
    CapacityGroups(ListArgs),

    /// List configured alerts
    Alerts(ListArgs),

    /// List triggered alerts, most recent first unless sorted otherwise
    Triggered(ListArgs),

    /// Configure a new alert interactively
    Create,

    /// Poll triggered alerts and serve them with metrics over HTTP
    Monitor {
        /// Interval in seconds between polls
        #[arg(short, long, default_value = "60")]
        interval: u64,
    },
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only show records containing this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Column to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Page to show, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Records per page, defaults to the configured page size
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// Cancel `token` on SIGTERM or SIGINT
pub fn signal_handler(token: CancellationToken) -> anyhow::Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        select! {
            _ = sigterm.recv() => tracing::info!("SIGTERM received, shutting down"),
            _ = sigint.recv() => tracing::info!("SIGINT received, shutting down"),
        }

        token.cancel();
    });

    Ok(())
}
