use crate::gateway::alert::ThresholdType;
use std::collections::BTreeMap;

/// Inputs of the wizard that can carry an inline error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    MonitoredObjects,
    DedicatedTargets,
    ThresholdType,
    ThresholdValue,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::MonitoredObjects => write!(f, "monitored objects"),
            Field::DedicatedTargets => write!(f, "dedicated targets"),
            Field::ThresholdType => write!(f, "threshold type"),
            Field::ThresholdValue => write!(f, "threshold value"),
        }
    }
}

/// One message per failing field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub(crate) fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub(crate) fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    /// `Ok(())` when no field failed
    pub(crate) fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<_> = self.0.values().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Relative thresholds are percentages: non-zero and within ±100.
/// Absolute thresholds only need to be non-zero.
pub fn threshold_in_range(threshold_type: ThresholdType, value: f64) -> bool {
    match threshold_type {
        ThresholdType::Relative => (-100.0..0.0).contains(&value) || (value > 0.0 && value <= 100.0),
        ThresholdType::Absolute => value != 0.0,
    }
}

pub(crate) fn check_name(name: &str, errors: &mut ValidationErrors) {
    if name.trim().is_empty() {
        errors.insert(Field::Name, "Please enter a name for the alert");
    }
}

pub(crate) fn check_threshold(
    threshold_type: Option<ThresholdType>,
    value: &str,
    errors: &mut ValidationErrors,
) {
    if threshold_type.is_none() {
        errors.insert(Field::ThresholdType, "Please select a threshold type");
    }

    let value = value.trim();

    if value.is_empty() {
        errors.insert(Field::ThresholdValue, "Please enter a threshold value");
        return;
    }

    let parsed = match value.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            errors.insert(Field::ThresholdValue, "The threshold must be a number");
            return;
        }
    };

    match threshold_type {
        Some(ty @ ThresholdType::Relative) if !threshold_in_range(ty, parsed) => errors.insert(
            Field::ThresholdValue,
            "Relative thresholds must be between -100 and 100 and not 0",
        ),
        Some(ty @ ThresholdType::Absolute) if !threshold_in_range(ty, parsed) => {
            errors.insert(Field::ThresholdValue, "Absolute thresholds must not be 0")
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold_errors(threshold_type: Option<ThresholdType>, value: &str) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        check_threshold(threshold_type, value, &mut errors);
        errors
    }

    #[test]
    fn relative_accepts_non_zero_percentages() {
        for value in ["-100", "-99.5", "-0.01", "0.01", "42", "100"] {
            assert!(
                threshold_errors(Some(ThresholdType::Relative), value).is_empty(),
                "{value} should be accepted"
            );
        }
    }

    #[test]
    fn relative_rejects_zero_and_out_of_range() {
        for value in ["0", "-0", "101", "-101", "100.01", "abc", "", "NaN", "inf"] {
            let errors = threshold_errors(Some(ThresholdType::Relative), value);
            assert!(
                errors.get(Field::ThresholdValue).is_some(),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn absolute_accepts_any_non_zero_number() {
        for value in ["5", "-5", "100000", "-250000.5", "0.001"] {
            assert!(
                threshold_errors(Some(ThresholdType::Absolute), value).is_empty(),
                "{value} should be accepted"
            );
        }
    }

    #[test]
    fn absolute_rejects_zero_and_non_numeric() {
        for value in ["0", "0.0", "five", " "] {
            let errors = threshold_errors(Some(ThresholdType::Absolute), value);
            assert!(
                errors.get(Field::ThresholdValue).is_some(),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn missing_type_is_reported() {
        let errors = threshold_errors(None, "5");

        assert!(errors.get(Field::ThresholdType).is_some());
        assert!(errors.get(Field::ThresholdValue).is_none());
    }

    #[test]
    fn range_boundaries() {
        assert!(threshold_in_range(ThresholdType::Relative, -100.0));
        assert!(threshold_in_range(ThresholdType::Relative, 100.0));
        assert!(!threshold_in_range(ThresholdType::Relative, 0.0));
        assert!(!threshold_in_range(ThresholdType::Absolute, 0.0));
        assert!(threshold_in_range(ThresholdType::Absolute, -1e9));
    }
}
