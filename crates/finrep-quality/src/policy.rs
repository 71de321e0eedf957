//! Confidence policy: the weights applied by the quality review

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("POLICY/PARSE: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("POLICY/INVALID: {0}")]
    Invalid(String),
}

/// Starting confidence, per-finding penalties and the floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidencePolicy {
    pub start: f64,

    /// Subtracted once per stage that ended in error
    pub error_penalty: f64,

    /// Subtracted when a stage ran but left a required field empty
    pub missing_field_penalty: f64,

    pub floor: f64,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            start: 0.95,
            error_penalty: 0.10,
            missing_field_penalty: 0.05,
            floor: 0.5,
        }
    }
}

impl ConfidencePolicy {
    /// Load a policy from YAML. Omitted keys keep their default value.
    pub fn from_yaml(yaml: &str) -> Result<Self, PolicyError> {
        let policy: Self = serde_yaml::from_str(yaml)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if !(0.0..=1.0).contains(&self.floor) || !(0.0..=1.0).contains(&self.start) {
            return Err(PolicyError::Invalid(
                "start and floor must lie in [0, 1]".to_string(),
            ));
        }
        if self.floor > self.start {
            return Err(PolicyError::Invalid(format!(
                "floor {} exceeds start {}",
                self.floor, self.start
            )));
        }
        if self.error_penalty < 0.0 || self.missing_field_penalty < 0.0 {
            return Err(PolicyError::Invalid("penalties must be non-negative".to_string()));
        }
        Ok(())
    }
}
