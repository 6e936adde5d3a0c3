use crate::{
    dashboard::Dashboard,
    gateway::{AlertGateway, alert::TriggeredAlert},
    metrics::{
        Status,
        dashboard::{record_monitor_cycle, record_triggered_alerts},
    },
    notification::Notification,
};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Latest triggered alerts, shared with the HTTP server
pub type Snapshot = Arc<RwLock<Vec<TriggeredAlert>>>;

pub struct Monitor<G> {
    dashboard: Arc<Dashboard<G>>,
    snapshot: Snapshot,
    interval: Duration,
    cancel: CancellationToken,
    seen: Mutex<Option<HashSet<String>>>,
}

impl<G: AlertGateway> Monitor<G> {
    pub fn new(
        dashboard: Arc<Dashboard<G>>,
        snapshot: Snapshot,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            dashboard,
            snapshot,
            interval,
            cancel,
            seen: Mutex::new(None),
        }
    }

    /// Poll until cancelled
    pub async fn start(&self) {
        tracing::info!("Starting monitor, polling every {:?}", self.interval);

        loop {
            if let Err(notification) = self.cycle().await {
                tracing::error!("Monitor cycle failed: {}", notification);
            }

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("Monitor stopped");
    }

    /// Refresh the snapshot once and return the alerts that were not in the previous one.
    ///
    /// The first successful cycle only primes the snapshot and reports nothing as new.
    /// A failed cycle leaves the previous snapshot in place.
    #[tracing::instrument(skip(self))]
    pub async fn cycle(&self) -> Result<Vec<TriggeredAlert>, Notification> {
        let alerts = match self.dashboard.triggered_alerts().await {
            Ok(alerts) => alerts,
            Err(notification) => {
                record_monitor_cycle(Status::Failure);
                return Err(notification);
            }
        };

        let fresh = {
            let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());

            let fresh: Vec<TriggeredAlert> = match seen.as_ref() {
                Some(previous) => alerts
                    .iter()
                    .filter(|alert| !previous.contains(&alert.id))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            };

            *seen = Some(alerts.iter().map(|alert| alert.id.clone()).collect());
            fresh
        };

        for alert in &fresh {
            tracing::warn!(
                id = %alert.id,
                object = alert.object_id.as_deref().unwrap_or("-"),
                "Alert '{}' triggered at {}",
                alert.alert_name,
                alert.time
            );
        }

        tracing::info!(
            "Fetched {} triggered alerts, {} new",
            alerts.len(),
            fresh.len()
        );
        record_triggered_alerts(alerts.len());
        record_monitor_cycle(Status::Success);

        *self.snapshot.write().await = alerts;

        Ok(fresh)
    }
}
