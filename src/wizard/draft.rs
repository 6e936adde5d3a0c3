use crate::{
    gateway::alert::{AlertRequest, DedicatedTarget, MonitoredObjects, ThresholdType},
    wizard::validation::{Field, ValidationErrors, check_name, check_threshold},
};

/// In-progress alert configuration. Only the wizard mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertDraft {
    pub(super) name: String,
    pub(super) monitored_objects: Option<MonitoredObjects>,
    pub(super) dedicated_targets: Vec<DedicatedTarget>,
    pub(super) threshold_type: Option<ThresholdType>,
    pub(super) threshold_value: String,
}

impl AlertDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn monitored_objects(&self) -> Option<MonitoredObjects> {
        self.monitored_objects
    }

    pub fn dedicated_targets(&self) -> &[DedicatedTarget] {
        &self.dedicated_targets
    }

    pub fn threshold_type(&self) -> Option<ThresholdType> {
        self.threshold_type
    }

    pub fn threshold_value(&self) -> &str {
        &self.threshold_value
    }

    pub fn is_dedicated(&self) -> bool {
        self.monitored_objects == Some(MonitoredObjects::Dedicated)
    }

    /// Validate every field and build the request body.
    ///
    /// Targets are only sent for dedicated alerts; ones collected before switching to
    /// another kind are dropped.
    pub fn to_request(&self) -> Result<AlertRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        check_name(&self.name, &mut errors);
        check_threshold(self.threshold_type, &self.threshold_value, &mut errors);

        if self.monitored_objects.is_none() {
            errors.insert(Field::MonitoredObjects, "Please select which objects to monitor");
        }

        if self.is_dedicated() && self.dedicated_targets.is_empty() {
            errors.insert(
                Field::DedicatedTargets,
                "Please add at least one demand or capacity group",
            );
        }

        let (monitored_objects, threshold_type) =
            match (self.monitored_objects, self.threshold_type) {
                (Some(monitored_objects), Some(threshold_type)) if errors.is_empty() => {
                    (monitored_objects, threshold_type)
                }
                _ => return Err(errors),
            };

        let dedicated_alerts = if self.is_dedicated() {
            self.dedicated_targets.clone()
        } else {
            Vec::new()
        };

        Ok(AlertRequest {
            alert_name: self.name.trim().to_string(),
            monitored_objects,
            threshold_type,
            threshold: self.threshold_value.trim().to_string(),
            dedicated_alerts,
        })
    }
}
