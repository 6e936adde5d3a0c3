use crate::{
    ListArgs,
    config::Config,
    console::{Console, Pickers, render_table},
    dashboard::Dashboard,
    gateway::HttpGateway,
    http::{self, AppState},
    listing::{Direction, ListView, Listable, SortState},
    metrics,
    monitor::{Monitor, Snapshot},
    notification::Notification,
    retry::Retry,
};
use std::{
    io::{self, Write},
    sync::Arc,
    time::Duration,
};
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

fn dashboard(config: &Config, cancel: CancellationToken) -> anyhow::Result<Dashboard<HttpGateway>> {
    let gateway = HttpGateway::new(config.api.clone())?;

    Ok(Dashboard::new(gateway, Retry::from(&config.retry), cancel))
}

/// Build a view with the sorting, search and paging requested on the command line
fn view<T: Listable>(config: &Config, args: &ListArgs) -> anyhow::Result<ListView<T>> {
    let mut view = ListView::new(args.page_size.unwrap_or(config.listing.page_size));

    match &args.sort {
        Some(column) if !T::COLUMNS.iter().any(|known| *known == column.as_str()) => {
            anyhow::bail!(
                "Unknown column '{}', expected one of: {}",
                column,
                T::COLUMNS.join(", ")
            );
        }
        Some(column) => {
            let direction = if args.desc {
                Direction::Descending
            } else {
                Direction::Ascending
            };
            view.set_sort(SortState::new(column.as_str(), direction));
        }
        None if args.desc => {
            view.set_sort(SortState::new(T::default_sort().column, Direction::Descending))
        }
        None => {}
    }

    if let Some(search) = &args.search {
        view.set_search(search.as_str());
    }
    view.set_page(args.page);

    Ok(view)
}

fn print<T: Listable>(view: &ListView<T>, notification: Option<Notification>) -> io::Result<()> {
    if let Some(notification) = notification {
        eprintln!("{notification}");
    }

    write_table(&mut io::stdout().lock(), view)
}

/// Write the current page, stopping quietly when the reader has gone away
fn write_table<T: Listable>(out: &mut impl Write, view: &ListView<T>) -> io::Result<()> {
    match out
        .write_all(render_table(&view.page()).as_bytes())
        .and_then(|_| out.flush())
    {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

pub async fn demands(config: &Config, args: &ListArgs, cancel: CancellationToken) -> anyhow::Result<()> {
    let dashboard = dashboard(config, cancel)?;
    let mut view = view(config, args)?;

    let notification = dashboard.refresh_demands(&mut view).await;
    print(&view, notification)?;

    Ok(())
}

pub async fn capacity_groups(
    config: &Config,
    args: &ListArgs,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let dashboard = dashboard(config, cancel)?;
    let mut view = view(config, args)?;

    let notification = dashboard.refresh_capacity_groups(&mut view).await;
    print(&view, notification)?;

    Ok(())
}

pub async fn alerts(config: &Config, args: &ListArgs, cancel: CancellationToken) -> anyhow::Result<()> {
    let dashboard = dashboard(config, cancel)?;
    let mut view = view(config, args)?;

    let notification = dashboard.refresh_configured_alerts(&mut view).await;
    print(&view, notification)?;

    Ok(())
}

pub async fn triggered(
    config: &Config,
    args: &ListArgs,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let dashboard = dashboard(config, cancel)?;
    let mut view = view(config, args)?;

    let notification = dashboard.refresh_triggered_alerts(&mut view).await;
    print(&view, notification)?;

    Ok(())
}

/// Run the alert wizard on stdin/stdout.
///
/// Pickers are loaded up front so that navigating the wizard never hits the network.
pub async fn create(config: &Config, cancel: CancellationToken) -> anyhow::Result<()> {
    let dashboard = dashboard(config, cancel)?;

    let (demands, capacity_groups) = tokio::join!(dashboard.demands(), dashboard.capacity_groups());
    let pickers = Pickers {
        demands: demands.unwrap_or_else(|notification| {
            eprintln!("{notification}");
            Vec::new()
        }),
        capacity_groups: capacity_groups.unwrap_or_else(|notification| {
            eprintln!("{notification}");
            Vec::new()
        }),
    };

    let mut alerts = ListView::new(config.listing.page_size);
    let mut console = Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());

    if console
        .run_wizard(&dashboard, &pickers, &mut alerts)
        .await?
        .is_some()
    {
        print(&alerts, None)?;
    }

    Ok(())
}

/// Poll triggered alerts and serve them until cancelled
pub async fn monitor(config: &Config, interval: u64, cancel: CancellationToken) -> anyhow::Result<()> {
    metrics::register_metrics()?;

    let dashboard = Arc::new(dashboard(config, cancel.clone())?);
    let snapshot = Snapshot::default();

    let monitor = Monitor::new(
        dashboard,
        snapshot.clone(),
        Duration::from_secs(interval),
        cancel.clone(),
    );
    let monitor = tokio::spawn(async move { monitor.start().await });

    let served = http::create_server(
        &config.http,
        AppState {
            triggered: snapshot,
        },
        cancel.clone(),
    )
    .await;

    cancel.cancel();
    monitor.await?;

    served
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::demand::Demand;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Full;

    impl Write for Full {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn view() -> ListView<Demand> {
        let mut view = ListView::new(10);
        view.set_records(vec![Demand {
            id: "d-1".into(),
            material_number_customer: "MAT-001".into(),
            material_description_customer: "Steel coil".into(),
            customer_name: None,
            supplier_name: None,
            status: None,
        }]);
        view
    }

    #[test]
    fn writes_the_table() {
        let mut out = Vec::new();
        write_table(&mut out, &view()).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("MAT-001"));
    }

    #[test]
    fn closed_pipe_is_not_an_error() {
        assert!(write_table(&mut ClosedPipe, &view()).is_ok());
        assert!(write_table(&mut Full, &view()).is_err());
    }
}
