use crate::listing::{Direction, Listable, SortState};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Which objects an alert watches.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonitoredObjects {
    General,
    AllDemands,
    AllCapacityGroups,
    Dedicated,
}

impl MonitoredObjects {
    pub const ALL: [MonitoredObjects; 4] = [
        MonitoredObjects::General,
        MonitoredObjects::AllDemands,
        MonitoredObjects::AllCapacityGroups,
        MonitoredObjects::Dedicated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MonitoredObjects::General => "GENERAL",
            MonitoredObjects::AllDemands => "ALL_DEMANDS",
            MonitoredObjects::AllCapacityGroups => "ALL_CAPACITY_GROUPS",
            MonitoredObjects::Dedicated => "DEDICATED",
        }
    }
}

impl std::fmt::Display for MonitoredObjects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MonitoredObjects {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();

        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("unknown monitored objects '{}'", s.trim()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdType {
    Absolute,
    Relative,
}

impl ThresholdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdType::Absolute => "ABSOLUTE",
            ThresholdType::Relative => "RELATIVE",
        }
    }
}

impl std::fmt::Display for ThresholdType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ThresholdType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ABSOLUTE" => Ok(ThresholdType::Absolute),
            "RELATIVE" => Ok(ThresholdType::Relative),
            _ => Err(format!("unknown threshold type '{}'", s.trim())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetKind {
    Demand,
    CapacityGroup,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Demand => write!(f, "DEMAND"),
            TargetKind::CapacityGroup => write!(f, "CAPACITY_GROUP"),
        }
    }
}

/// A single demand or capacity group attached to an alert.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DedicatedTarget {
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub object_id: String,
}

impl DedicatedTarget {
    pub fn demand(object_id: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::Demand,
            object_id: object_id.into(),
        }
    }

    pub fn capacity_group(object_id: impl Into<String>) -> Self {
        Self {
            kind: TargetKind::CapacityGroup,
            object_id: object_id.into(),
        }
    }
}

/// Body of `POST /alerts`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    pub alert_name: String,
    pub monitored_objects: MonitoredObjects,
    #[serde(rename = "type")]
    pub threshold_type: ThresholdType,
    pub threshold: String,
    pub dedicated_alerts: Vec<DedicatedTarget>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredAlert {
    pub id: String,
    pub alert_name: String,
    pub monitored_objects: MonitoredObjects,
    #[serde(rename = "type")]
    pub threshold_type: ThresholdType,
    pub threshold: String,
    #[serde(default)]
    pub dedicated_alerts: Vec<DedicatedTarget>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredAlert {
    pub id: String,
    pub alert_name: String,
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub threshold_type: ThresholdType,
    pub threshold: String,
    #[serde(default)]
    pub value: Option<String>,
    pub monitored_objects: MonitoredObjects,
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Listable for ConfiguredAlert {
    const COLUMNS: &'static [&'static str] = &[
        "alertName",
        "monitoredObjects",
        "type",
        "threshold",
        "dedicatedAlerts",
    ];
    const SEARCHABLE: &'static [&'static str] = &["alertName", "monitoredObjects", "type"];

    fn value(&self, column: &str) -> String {
        match column {
            "id" => self.id.clone(),
            "alertName" => self.alert_name.clone(),
            "monitoredObjects" => self.monitored_objects.to_string(),
            "type" => self.threshold_type.to_string(),
            "threshold" => self.threshold.clone(),
            "dedicatedAlerts" => self
                .dedicated_alerts
                .iter()
                .map(|target| format!("{}:{}", target.kind, target.object_id))
                .collect::<Vec<_>>()
                .join(", "),
            _ => String::new(),
        }
    }
}

impl Listable for TriggeredAlert {
    const COLUMNS: &'static [&'static str] = &[
        "time",
        "alertName",
        "monitoredObjects",
        "objectId",
        "type",
        "threshold",
        "value",
        "message",
    ];
    const SEARCHABLE: &'static [&'static str] =
        &["alertName", "monitoredObjects", "objectId", "message"];

    fn default_sort() -> SortState {
        SortState::new("time", Direction::Descending)
    }

    fn value(&self, column: &str) -> String {
        match column {
            "id" => self.id.clone(),
            // Fixed width so that string order is chronological order
            "time" => self.time.to_rfc3339_opts(SecondsFormat::Millis, true),
            "alertName" => self.alert_name.clone(),
            "monitoredObjects" => self.monitored_objects.to_string(),
            "objectId" => self.object_id.clone().unwrap_or_default(),
            "type" => self.threshold_type.to_string(),
            "threshold" => self.threshold.clone(),
            "value" => self.value.clone().unwrap_or_default(),
            "message" => self.message.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }
}
