//! # Rule Configuration

use std::time::Duration;

/// Resource type reported for per-cluster evaluations
pub const DEFAULT_RESOURCE_TYPE: &str = "AWS::Redshift::Cluster";

/// Resource type reported for account-scoped evaluations
pub const ACCOUNT_RESOURCE_TYPE: &str = "AWS::::Account";

/// Configuration for one rule invocation
///
/// Controls pagination, rate-limit throttling and role assumption.
#[derive(Debug, Clone)]
pub struct RuleConfig {
    /// Resource type for per-cluster evaluations
    pub default_resource_type: String,

    /// Resource type for account-scoped evaluations
    pub account_resource_type: String,

    /// Page size for the cluster listing
    pub list_page_size: u32,

    /// Fixed delay inserted after rate-limited provider calls
    pub throttle: Duration,

    /// Assume the configured execution role before calling provider APIs
    pub assume_role_mode: bool,

    /// Session name used for role assumption
    pub role_session_name: String,

    /// Role session duration in seconds
    pub role_session_duration_secs: u32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            default_resource_type: DEFAULT_RESOURCE_TYPE.to_string(),
            account_resource_type: ACCOUNT_RESOURCE_TYPE.to_string(),
            list_page_size: 50,
            throttle: Duration::from_millis(500),
            assume_role_mode: false,
            role_session_name: "complianceRuleExecution".to_string(),
            role_session_duration_secs: 900,
        }
    }
}

impl RuleConfig {
    /// Set the cluster-listing page size
    pub fn with_list_page_size(mut self, page_size: u32) -> Self {
        self.list_page_size = page_size;
        self
    }

    /// Set the throttle delay (zero disables throttling)
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Enable cross-account role assumption
    pub fn with_assume_role(mut self) -> Self {
        self.assume_role_mode = true;
        self
    }

    /// Override the reported resource type
    pub fn with_default_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.default_resource_type = resource_type.into();
        self
    }

    /// Sleep for the configured throttle period
    pub fn pause(&self) {
        if !self.throttle.is_zero() {
            std::thread::sleep(self.throttle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuleConfig::default();
        assert_eq!(config.default_resource_type, "AWS::Redshift::Cluster");
        assert_eq!(config.account_resource_type, "AWS::::Account");
        assert_eq!(config.list_page_size, 50);
        assert_eq!(config.throttle, Duration::from_millis(500));
        assert!(!config.assume_role_mode);
        assert_eq!(config.role_session_duration_secs, 900);
    }

    #[test]
    fn test_config_builder() {
        let config = RuleConfig::default()
            .with_list_page_size(10)
            .with_throttle(Duration::ZERO)
            .with_assume_role()
            .with_default_resource_type("Custom::Cluster");

        assert_eq!(config.list_page_size, 10);
        assert!(config.throttle.is_zero());
        assert!(config.assume_role_mode);
        assert_eq!(config.default_resource_type, "Custom::Cluster");
    }
}
