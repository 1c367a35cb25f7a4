//! Aggregate policy configuration
//!
//! Both policy sections are optional and fall back to the built-in defaults,
//! so an empty document is a valid configuration:
//!
//! ```toml
//! [rate_limit]
//! fail_threshold = 5
//! fail_window_minutes = 5
//! lock_duration_minutes = 15
//!
//! [working_hours]
//! start = "08:00"
//! end = "20:00"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::rate_limit::RateLimitConfig;
use crate::working_hours::WorkingHoursConfig;

/// Configuration for a full policy engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub rate_limit: RateLimitConfig,
    pub working_hours: WorkingHoursConfig,
}

impl PolicyConfig {
    /// Parse configuration from a TOML document.
    ///
    /// Parsing only checks document shape; the `HH:MM` boundary strings are
    /// validated when the working-hours policy is constructed.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| ValidationError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::working_hours::WorkingHoursPolicy;

    #[test]
    fn empty_document_yields_defaults() {
        let config = PolicyConfig::from_toml_str("").unwrap();
        assert_eq!(config, PolicyConfig::default());
        assert_eq!(config.rate_limit.fail_threshold, 5);
        assert_eq!(config.working_hours.start, "08:00");
    }

    #[test]
    fn partial_document_overrides_one_section() {
        let config = PolicyConfig::from_toml_str(
            r#"
            [rate_limit]
            fail_threshold = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.rate_limit.fail_threshold, 3);
        // Unset fields in the same section keep their defaults.
        assert_eq!(config.rate_limit.fail_window_minutes, 5);
        assert_eq!(config.working_hours, WorkingHoursConfig::default());
    }

    #[test]
    fn full_document_parses() {
        let config = PolicyConfig::from_toml_str(
            r#"
            [rate_limit]
            fail_threshold = 10
            fail_window_minutes = 2
            lock_duration_minutes = 30

            [working_hours]
            start = "22:00"
            end = "06:00"
            "#,
        )
        .unwrap();
        assert_eq!(config.rate_limit.fail_threshold, 10);
        assert_eq!(config.working_hours.start, "22:00");
        assert!(WorkingHoursPolicy::with_config(&config.working_hours)
            .unwrap()
            .spans_midnight());
    }

    #[test]
    fn malformed_toml_fails() {
        assert!(matches!(
            PolicyConfig::from_toml_str("rate_limit = 5"),
            Err(ValidationError::Config(_))
        ));
    }

    #[test]
    fn bad_boundary_fails_at_policy_construction() {
        let config = PolicyConfig::from_toml_str(
            r#"
            [working_hours]
            start = "25:99"
            "#,
        )
        .unwrap();
        assert!(matches!(
            WorkingHoursPolicy::with_config(&config.working_hours),
            Err(ValidationError::TimeOfDay(_))
        ));
    }
}
