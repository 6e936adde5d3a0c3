//! Alert configuration wizard.
//!
//! The wizard walks a draft through four steps:
//!
//! 1. name and monitored objects
//! 2. dedicated demands and capacity groups, only when monitoring `DEDICATED` objects
//! 3. threshold type and value
//! 4. review and submit
//!
//! Each field is owned by one step and is only editable while that step is current.
//! Every `next` validates the current step and either advances or records per-field
//! errors and stays put. Submission is split into [`AlertWizard::begin_submit`] and
//! [`AlertWizard::finish_submit`] so that only one create request can be in flight.

use crate::{
    gateway::{
        AlertGateway, GatewayError,
        alert::{AlertRequest, ConfiguredAlert, DedicatedTarget, MonitoredObjects, ThresholdType},
    },
    metrics::{Status, dashboard::record_alert_created},
};

pub mod draft;
pub mod validation;

pub use draft::AlertDraft;
pub use validation::{Field, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Details = 1,
    Targets = 2,
    Threshold = 3,
    Review = 4,
}

impl Step {
    pub fn number(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/4", self.number())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Editing,
    Submitting,
    Submitted(ConfiguredAlert),
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{0}")]
    Invalid(ValidationErrors),

    #[error("there is no dedicated target at position {0}")]
    NoSuchTarget(usize),

    #[error("this field is edited on step {expected}, the wizard is on step {actual}")]
    WrongStep { expected: Step, actual: Step },

    #[error("the alert can only be submitted from the review step")]
    NotAtReview,

    #[error("the alert is already being submitted")]
    AlreadySubmitting,

    #[error("the wizard is closed")]
    Closed,

    #[error("failed to create alert: {0}")]
    Remote(#[from] GatewayError),
}

#[derive(Debug, Clone)]
pub struct AlertWizard {
    step: Step,
    draft: AlertDraft,
    errors: ValidationErrors,
    phase: Phase,
    submit_error: Option<String>,
}

impl Default for AlertWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertWizard {
    /// Open the wizard on an empty draft
    pub fn new() -> Self {
        Self {
            step: Step::Details,
            draft: AlertDraft::default(),
            errors: ValidationErrors::default(),
            phase: Phase::Editing,
            submit_error: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &AlertDraft {
        &self.draft
    }

    /// Errors from the last failed `next`, minus fields edited since
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Message of the last failed submission
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    fn ensure_editing(&self) -> Result<(), WizardError> {
        match self.phase {
            Phase::Editing => Ok(()),
            Phase::Submitting => Err(WizardError::AlreadySubmitting),
            Phase::Submitted(_) | Phase::Cancelled => Err(WizardError::Closed),
        }
    }

    /// Fields belong to one step and can only be edited while it is current
    fn ensure_step(&self, expected: Step) -> Result<(), WizardError> {
        self.ensure_editing()?;

        if self.step != expected {
            return Err(WizardError::WrongStep {
                expected,
                actual: self.step,
            });
        }

        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_step(Step::Details)?;
        self.draft.name = name.into();
        self.errors.remove(Field::Name);
        Ok(())
    }

    pub fn set_monitored_objects(&mut self, kind: MonitoredObjects) -> Result<(), WizardError> {
        self.ensure_step(Step::Details)?;
        self.draft.monitored_objects = Some(kind);
        self.errors.remove(Field::MonitoredObjects);
        Ok(())
    }

    /// Append a target. Selecting the same object twice adds it twice.
    pub fn add_target(&mut self, target: DedicatedTarget) -> Result<(), WizardError> {
        self.ensure_step(Step::Targets)?;

        self.draft.dedicated_targets.push(target);
        self.errors.remove(Field::DedicatedTargets);
        Ok(())
    }

    /// Remove the target at `index`, shifting later targets down by one
    pub fn remove_target(&mut self, index: usize) -> Result<DedicatedTarget, WizardError> {
        self.ensure_step(Step::Targets)?;

        if index >= self.draft.dedicated_targets.len() {
            return Err(WizardError::NoSuchTarget(index));
        }

        Ok(self.draft.dedicated_targets.remove(index))
    }

    pub fn set_threshold_type(&mut self, threshold_type: ThresholdType) -> Result<(), WizardError> {
        self.ensure_step(Step::Threshold)?;
        self.draft.threshold_type = Some(threshold_type);
        self.errors.remove(Field::ThresholdType);
        Ok(())
    }

    pub fn set_threshold_value(&mut self, value: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_step(Step::Threshold)?;
        self.draft.threshold_value = value.into();
        self.errors.remove(Field::ThresholdValue);
        Ok(())
    }

    /// Validate the current step and move forward.
    ///
    /// Non-dedicated alerts skip straight from details to threshold. On the review step
    /// this does nothing.
    pub fn next(&mut self) -> Result<Step, WizardError> {
        self.ensure_editing()?;

        let mut errors = ValidationErrors::default();

        let next = match self.step {
            Step::Details => match self.draft.monitored_objects {
                None => {
                    errors.insert(Field::MonitoredObjects, "Please select which objects to monitor");
                    self.step
                }
                Some(MonitoredObjects::Dedicated) => Step::Targets,
                Some(_) => Step::Threshold,
            },
            Step::Targets => {
                if self.draft.dedicated_targets.is_empty() {
                    errors.insert(
                        Field::DedicatedTargets,
                        "Please add at least one demand or capacity group",
                    );
                }
                Step::Threshold
            }
            Step::Threshold => {
                validation::check_threshold(
                    self.draft.threshold_type,
                    &self.draft.threshold_value,
                    &mut errors,
                );
                Step::Review
            }
            Step::Review => Step::Review,
        };

        if let Err(errors) = errors.into_result() {
            tracing::debug!(step = self.step.number(), "Step validation failed: {}", errors);
            self.errors = errors.clone();
            return Err(WizardError::Invalid(errors));
        }

        self.errors.clear();
        self.step = next;
        Ok(next)
    }

    /// Move one step back without validating
    pub fn back(&mut self) -> Result<Step, WizardError> {
        self.ensure_editing()?;

        self.step = match self.step {
            Step::Details | Step::Targets => Step::Details,
            Step::Threshold if self.draft.is_dedicated() => Step::Targets,
            Step::Threshold => Step::Details,
            Step::Review => Step::Threshold,
        };
        self.errors.clear();

        Ok(self.step)
    }

    /// Lines shown on the review step
    pub fn review(&self) -> Vec<(&'static str, String)> {
        let draft = &self.draft;
        let mut lines = vec![
            ("Name", draft.name().to_string()),
            (
                "Monitored objects",
                draft
                    .monitored_objects()
                    .map(|kind| kind.to_string())
                    .unwrap_or_default(),
            ),
        ];

        if draft.is_dedicated() {
            let targets = draft
                .dedicated_targets()
                .iter()
                .map(|target| format!("{} {}", target.kind, target.object_id))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(("Dedicated targets", targets));
        }

        lines.push((
            "Threshold type",
            draft
                .threshold_type()
                .map(|ty| ty.to_string())
                .unwrap_or_default(),
        ));
        lines.push(("Threshold", draft.threshold_value().trim().to_string()));

        lines
    }

    /// Validate the whole draft and enter the submitting phase.
    ///
    /// The caller must send the returned request and report the outcome through
    /// [`AlertWizard::finish_submit`]. Until then every other operation is refused.
    pub fn begin_submit(&mut self) -> Result<AlertRequest, WizardError> {
        self.ensure_editing()?;

        if self.step != Step::Review {
            return Err(WizardError::NotAtReview);
        }

        let request = self.draft.to_request().map_err(|errors| {
            self.errors = errors.clone();
            WizardError::Invalid(errors)
        })?;

        self.phase = Phase::Submitting;
        self.submit_error = None;

        Ok(request)
    }

    /// Record the outcome of the request returned by `begin_submit`.
    ///
    /// Success closes the wizard and discards the draft. Failure returns to the review
    /// step with the error kept for display.
    pub fn finish_submit(
        &mut self,
        result: Result<ConfiguredAlert, GatewayError>,
    ) -> Result<ConfiguredAlert, WizardError> {
        if self.phase != Phase::Submitting {
            return Err(WizardError::Closed);
        }

        match result {
            Ok(alert) => {
                tracing::info!(id = %alert.id, "Alert '{}' created", alert.alert_name);
                record_alert_created(Status::Success);

                self.draft = AlertDraft::default();
                self.phase = Phase::Submitted(alert.clone());
                Ok(alert)
            }
            Err(e) => {
                tracing::error!("Failed to create alert: {}", e);
                record_alert_created(Status::Failure);

                self.submit_error = Some(e.to_string());
                self.phase = Phase::Editing;
                Err(WizardError::Remote(e))
            }
        }
    }

    /// Submit through `gateway`, issuing exactly one create call
    pub async fn submit(
        &mut self,
        gateway: &dyn AlertGateway,
    ) -> Result<ConfiguredAlert, WizardError> {
        let request = self.begin_submit()?;
        let result = gateway.create_alert(&request).await;

        self.finish_submit(result)
    }

    /// Discard the draft. Refused while a submission is in flight.
    pub fn cancel(&mut self) -> Result<(), WizardError> {
        if self.phase == Phase::Submitting {
            return Err(WizardError::AlreadySubmitting);
        }

        self.draft = AlertDraft::default();
        self.errors.clear();
        self.phase = Phase::Cancelled;

        Ok(())
    }
}
