use crate::gateway::{
    AlertGateway, GatewayError,
    alert::{AlertRequest, ConfiguredAlert, TriggeredAlert},
    capacity_group::CapacityGroup,
    demand::Demand,
};
use async_trait::async_trait;
use std::sync::{
    Mutex,
    atomic::{AtomicU32, Ordering},
};

/// In-memory gateway that records create calls and can fail on demand
#[derive(Default)]
pub struct FakeGateway {
    pub demands: Vec<Demand>,
    pub capacity_groups: Vec<CapacityGroup>,
    pub triggered: Mutex<Vec<TriggeredAlert>>,
    configured: Mutex<Vec<ConfiguredAlert>>,
    created: Mutex<Vec<AlertRequest>>,
    create_error: Mutex<Option<GatewayError>>,
    list_failures: AtomicU32,
    list_calls: AtomicU32,
}

impl FakeGateway {
    pub fn with_records(demands: Vec<Demand>, capacity_groups: Vec<CapacityGroup>) -> Self {
        Self {
            demands,
            capacity_groups,
            ..Default::default()
        }
    }

    pub fn failing_create(error: GatewayError) -> Self {
        Self {
            create_error: Mutex::new(Some(error)),
            ..Default::default()
        }
    }

    /// Make the next `count` list calls fail with a 503
    pub fn fail_lists(&self, count: u32) {
        self.list_failures.store(count, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<AlertRequest> {
        self.created.lock().unwrap().clone()
    }

    fn list<T: Clone>(&self, records: &[T]) -> Result<Vec<T>, GatewayError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let failing = self
            .list_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if failing {
            return Err(GatewayError::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }

        Ok(records.to_vec())
    }
}

#[async_trait]
impl AlertGateway for FakeGateway {
    async fn list_demands(&self) -> Result<Vec<Demand>, GatewayError> {
        self.list(&self.demands)
    }

    async fn list_capacity_groups(&self) -> Result<Vec<CapacityGroup>, GatewayError> {
        self.list(&self.capacity_groups)
    }

    async fn create_alert(&self, request: &AlertRequest) -> Result<ConfiguredAlert, GatewayError> {
        self.created.lock().unwrap().push(request.clone());

        if let Some(error) = self.create_error.lock().unwrap().take() {
            return Err(error);
        }

        let mut configured = self.configured.lock().unwrap();
        let alert = ConfiguredAlert {
            id: format!("alert-{}", configured.len() + 1),
            alert_name: request.alert_name.clone(),
            monitored_objects: request.monitored_objects,
            threshold_type: request.threshold_type,
            threshold: request.threshold.clone(),
            dedicated_alerts: request.dedicated_alerts.clone(),
        };
        configured.push(alert.clone());

        Ok(alert)
    }

    async fn list_configured_alerts(&self) -> Result<Vec<ConfiguredAlert>, GatewayError> {
        let configured = self.configured.lock().unwrap().clone();
        self.list(&configured)
    }

    async fn list_triggered_alerts(&self) -> Result<Vec<TriggeredAlert>, GatewayError> {
        let triggered = self.triggered.lock().unwrap().clone();
        self.list(&triggered)
    }
}
