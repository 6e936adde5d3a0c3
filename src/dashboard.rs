use crate::{
    gateway::{
        AlertGateway, GatewayError,
        alert::{ConfiguredAlert, TriggeredAlert},
        capacity_group::CapacityGroup,
        demand::Demand,
    },
    listing::{ListView, Listable},
    metrics::external::{Target, record_fetch_retry},
    notification::{self, Notification, ObjectType},
    retry::Retry,
    wizard::{AlertWizard, WizardError},
};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Fetches lists through the retry policy and turns final failures into notifications
pub struct Dashboard<G> {
    gateway: G,
    retry: Retry,
    cancel: CancellationToken,
}

impl<G: AlertGateway> Dashboard<G> {
    pub fn new(gateway: G, retry: Retry, cancel: CancellationToken) -> Self {
        Self {
            gateway,
            retry,
            cancel,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Abort every pending fetch, including retries waiting on their delay
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    async fn fetch<T, F, Fut>(
        &self,
        object: ObjectType,
        target: Target,
        mut op: F,
    ) -> Result<Vec<T>, Notification>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Vec<T>, GatewayError>>,
    {
        let result = self
            .retry
            .run(&self.cancel, |attempt| {
                if attempt > 1 {
                    record_fetch_retry(target);
                }
                op()
            })
            .await;

        result.map_err(|e| {
            let notification = notification::for_retry_error(object, &e);
            tracing::warn!(%target, "{}: {}", notification, e);
            notification
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn demands(&self) -> Result<Vec<Demand>, Notification> {
        self.fetch(ObjectType::Demand, Target::Demands, || {
            self.gateway.list_demands()
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn capacity_groups(&self) -> Result<Vec<CapacityGroup>, Notification> {
        self.fetch(ObjectType::CapacityGroup, Target::CapacityGroups, || {
            self.gateway.list_capacity_groups()
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn configured_alerts(&self) -> Result<Vec<ConfiguredAlert>, Notification> {
        self.fetch(ObjectType::Alert, Target::Alerts, || {
            self.gateway.list_configured_alerts()
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn triggered_alerts(&self) -> Result<Vec<TriggeredAlert>, Notification> {
        self.fetch(ObjectType::TriggeredAlert, Target::TriggeredAlerts, || {
            self.gateway.list_triggered_alerts()
        })
        .await
    }

    pub async fn refresh_demands(&self, view: &mut ListView<Demand>) -> Option<Notification> {
        update(view, self.demands().await)
    }

    pub async fn refresh_capacity_groups(
        &self,
        view: &mut ListView<CapacityGroup>,
    ) -> Option<Notification> {
        update(view, self.capacity_groups().await)
    }

    pub async fn refresh_configured_alerts(
        &self,
        view: &mut ListView<ConfiguredAlert>,
    ) -> Option<Notification> {
        update(view, self.configured_alerts().await)
    }

    pub async fn refresh_triggered_alerts(
        &self,
        view: &mut ListView<TriggeredAlert>,
    ) -> Option<Notification> {
        update(view, self.triggered_alerts().await)
    }

    /// Submit the wizard's draft, then reload the configured alerts so the new one shows up
    pub async fn create_alert(
        &self,
        wizard: &mut AlertWizard,
        alerts: &mut ListView<ConfiguredAlert>,
    ) -> Result<ConfiguredAlert, WizardError> {
        let alert = wizard.submit(&self.gateway).await?;

        if let Some(notification) = self.refresh_configured_alerts(alerts).await {
            tracing::warn!("Alert created but the list could not be reloaded: {}", notification);
        }

        Ok(alert)
    }
}

/// Replace the view's records on success; keep the stale ones on failure
fn update<T: Listable>(
    view: &mut ListView<T>,
    result: Result<Vec<T>, Notification>,
) -> Option<Notification> {
    match result {
        Ok(records) => {
            view.set_records(records);
            None
        }
        Err(notification) => Some(notification),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gateway::alert::{MonitoredObjects, ThresholdType},
        notification::Level,
        testing::FakeGateway,
    };
    use std::time::Duration;

    fn demand(id: &str) -> Demand {
        Demand {
            id: id.into(),
            material_number_customer: format!("MAT-{id}"),
            material_description_customer: "Steel coil".into(),
            customer_name: None,
            supplier_name: None,
            status: None,
        }
    }

    fn dashboard(gateway: FakeGateway) -> Dashboard<FakeGateway> {
        Dashboard::new(
            gateway,
            Retry::new(3, Duration::from_secs(2)),
            CancellationToken::new(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_retries_until_success() {
        let gateway = FakeGateway::with_records(vec![demand("1"), demand("2")], Vec::new());
        gateway.fail_lists(2);
        let dashboard = dashboard(gateway);
        let mut view = ListView::default();

        assert_eq!(dashboard.refresh_demands(&mut view).await, None);
        assert_eq!(view.records().len(), 2);
        assert_eq!(dashboard.gateway().list_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_keeps_stale_records() {
        let dashboard = dashboard(FakeGateway::default());
        let mut view = ListView::default();
        view.set_records(vec![demand("stale")]);

        dashboard.gateway().fail_lists(10);
        let notification = dashboard.refresh_demands(&mut view).await.unwrap();

        assert_eq!(notification.level, Level::Error);
        assert_eq!(notification.message, "The demands service is currently unavailable");
        assert_eq!(view.records(), &[demand("stale")]);
        assert_eq!(dashboard.gateway().list_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_retries() {
        let dashboard = dashboard(FakeGateway::default());
        dashboard.gateway().fail_lists(10);
        dashboard.shutdown();

        let notification = dashboard.demands().await.unwrap_err();

        assert_eq!(notification.level, Level::Info);
        assert_eq!(dashboard.gateway().list_calls(), 0);
    }

    #[tokio::test]
    async fn created_alert_appears_in_refreshed_list() {
        let dashboard = dashboard(FakeGateway::default());
        let mut alerts = ListView::default();

        let mut wizard = AlertWizard::new();
        wizard.set_name("Overload").unwrap();
        wizard
            .set_monitored_objects(MonitoredObjects::AllCapacityGroups)
            .unwrap();
        wizard.next().unwrap();
        wizard.set_threshold_type(ThresholdType::Relative).unwrap();
        wizard.set_threshold_value("80").unwrap();
        wizard.next().unwrap();

        let alert = dashboard.create_alert(&mut wizard, &mut alerts).await.unwrap();

        assert_eq!(alerts.records(), &[alert]);
        assert_eq!(dashboard.gateway().created().len(), 1);
    }
}
