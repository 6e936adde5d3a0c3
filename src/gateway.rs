use crate::{
    config::Api,
    gateway::{
        alert::{AlertRequest, ConfiguredAlert, TriggeredAlert},
        capacity_group::CapacityGroup,
        demand::Demand,
    },
    metrics::external::{Target, external_request_timer, record_external_request_failure},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

pub mod alert;
pub mod capacity_group;
pub mod demand;
pub mod error;

pub use error::GatewayError;

/// Source of demands, capacity groups and alerts
#[async_trait]
pub trait AlertGateway: Send + Sync {
    async fn list_demands(&self) -> Result<Vec<Demand>, GatewayError>;

    async fn list_capacity_groups(&self) -> Result<Vec<CapacityGroup>, GatewayError>;

    /// Not idempotent: every call creates a new alert
    async fn create_alert(&self, request: &AlertRequest) -> Result<ConfiguredAlert, GatewayError>;

    async fn list_configured_alerts(&self) -> Result<Vec<ConfiguredAlert>, GatewayError>;

    async fn list_triggered_alerts(&self) -> Result<Vec<TriggeredAlert>, GatewayError>;
}

/// Gateway backed by the JSON API
pub struct HttpGateway {
    config: Api,
    client: Client,
}

impl HttpGateway {
    /// Create a new HttpGateway instance
    pub fn new(config: Api) -> anyhow::Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, target: Target) -> Result<T, GatewayError> {
        let _timer = external_request_timer(target);

        let result = async {
            let resp = self
                .client
                .get(self.url(path))
                .bearer_auth(&self.config.token)
                .send()
                .await?;

            Self::decode(resp).await
        }
        .await;

        if result.is_err() {
            record_external_request_failure(target);
        }

        result
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, GatewayError> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();

            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AlertGateway for HttpGateway {
    #[tracing::instrument(skip(self))]
    async fn list_demands(&self) -> Result<Vec<Demand>, GatewayError> {
        tracing::debug!("Fetching demands");
        self.get("demand", Target::Demands).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_capacity_groups(&self) -> Result<Vec<CapacityGroup>, GatewayError> {
        tracing::debug!("Fetching capacity groups");
        self.get("capacityGroup", Target::CapacityGroups).await
    }

    #[tracing::instrument(skip(self, request), fields(alert_name = %request.alert_name))]
    async fn create_alert(&self, request: &AlertRequest) -> Result<ConfiguredAlert, GatewayError> {
        tracing::info!("Creating alert");
        let _timer = external_request_timer(Target::Alerts);

        let result = async {
            let resp = self
                .client
                .post(self.url("alerts"))
                .bearer_auth(&self.config.token)
                .json(request)
                .send()
                .await?;

            Self::decode(resp).await
        }
        .await;

        if result.is_err() {
            record_external_request_failure(Target::Alerts);
        }

        result
    }

    #[tracing::instrument(skip(self))]
    async fn list_configured_alerts(&self) -> Result<Vec<ConfiguredAlert>, GatewayError> {
        tracing::debug!("Fetching configured alerts");
        self.get("alerts", Target::Alerts).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_triggered_alerts(&self) -> Result<Vec<TriggeredAlert>, GatewayError> {
        tracing::debug!("Fetching triggered alerts");
        self.get("triggeredAlerts", Target::TriggeredAlerts).await
    }
}
