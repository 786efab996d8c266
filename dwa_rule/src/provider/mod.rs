//! # Provider Seam
//!
//! Trait boundary between the pipeline and the cloud provider. Live SDK
//! clients implement these traits outside this crate; tests and the CLI
//! use the fixture provider in [`fixture`].

pub mod fixture;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ConfigurationItem, Evaluation};

/// Error surfaced by any provider API call.
///
/// Carries the provider's error code and message. Transport and library
/// failures that never reached the service are reported with the
/// `InternalError` code by the implementing client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Classify the error: internal (service-side) vs customer.
    ///
    /// Internal when the code is 5xx-class or explicitly marked as an
    /// internal or service error; everything else is a customer error.
    pub fn is_internal(&self) -> bool {
        self.code.starts_with('5')
            || self.code.contains("InternalError")
            || self.code.contains("ServiceError")
    }

    /// Whether this is an access-denied failure
    pub fn is_access_denied(&self) -> bool {
        self.code.contains("AccessDenied")
    }
}

/// One page of cluster descriptors
#[derive(Debug, Clone, Default)]
pub struct ClusterPage {
    pub clusters: Vec<ClusterDescriptor>,

    /// Continuation marker; `None` when the listing is exhausted
    pub marker: Option<String>,
}

/// Raw cluster descriptor as returned by the listing API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterDescriptor {
    pub cluster_identifier: String,

    /// Storage-encryption flag on the cluster
    #[serde(default)]
    pub encrypted: bool,

    /// Parameter groups attached to the cluster
    #[serde(default)]
    pub cluster_parameter_groups: Vec<ParameterGroupStatus>,
}

/// Parameter group reference with per-parameter apply statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterGroupStatus {
    pub parameter_group_name: String,

    #[serde(default)]
    pub parameter_apply_status: String,

    #[serde(default)]
    pub cluster_parameter_status_list: Vec<ParameterStatus>,
}

/// Apply status of one parameter on one cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterStatus {
    pub parameter_name: String,

    /// `in-sync` once the stored value has been applied to the cluster
    #[serde(default)]
    pub parameter_apply_status: String,
}

/// Stored parameter value within a parameter group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterParameter {
    pub parameter_name: String,

    #[serde(default)]
    pub parameter_value: String,
}

/// One page of prior evaluation results for a rule
#[derive(Debug, Clone, Default)]
pub struct PriorEvaluationPage {
    /// Resource ids of previously recorded COMPLIANT/NON_COMPLIANT results
    pub resource_ids: Vec<String>,

    /// Continuation token; `None` when exhausted
    pub next_token: Option<String>,
}

/// Temporary credentials from a role assumption
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

/// Warehouse management API surface used by the inventory layer
pub trait WarehouseApi: Send + Sync {
    /// List one page of clusters
    fn describe_clusters(
        &self,
        page_size: u32,
        marker: Option<&str>,
    ) -> Result<ClusterPage, ProviderError>;

    /// Stored parameters for a named parameter group
    fn describe_cluster_parameters(
        &self,
        parameter_group_name: &str,
    ) -> Result<Vec<ClusterParameter>, ProviderError>;

    /// Whether audit logging is enabled for a cluster
    fn describe_logging_status(&self, cluster_identifier: &str) -> Result<bool, ProviderError>;
}

/// Compliance-tracking service surface
pub trait ComplianceApi: Send + Sync {
    /// Submit one batch of evaluations (at most the service batch limit)
    fn put_evaluations(
        &self,
        evaluations: &[Evaluation],
        result_token: &str,
        test_mode: bool,
    ) -> Result<(), ProviderError>;

    /// One page of prior COMPLIANT/NON_COMPLIANT results for a rule
    fn get_prior_evaluations(
        &self,
        rule_name: &str,
        next_token: Option<&str>,
    ) -> Result<PriorEvaluationPage, ProviderError>;

    /// Latest configuration item for a resource, used to resolve oversized
    /// change notifications
    fn get_resource_config_history(
        &self,
        resource_type: &str,
        resource_id: &str,
        later_time: &DateTime<Utc>,
    ) -> Result<ConfigurationItem, ProviderError>;
}

/// Credential source for cross-account role assumption
pub trait CredentialsApi: Send + Sync {
    fn assume_role(
        &self,
        role_arn: &str,
        session_name: &str,
        duration_secs: u32,
    ) -> Result<Credentials, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_5xx_code_is_internal() {
        assert!(ProviderError::new("500", "boom").is_internal());
        assert!(ProviderError::new("503", "unavailable").is_internal());
    }

    #[test]
    fn test_marked_internal_codes() {
        assert!(ProviderError::new("InternalError", "x").is_internal());
        assert!(ProviderError::new("ServiceError", "x").is_internal());
    }

    #[test]
    fn test_customer_codes_not_internal() {
        let err = ProviderError::new("AccessDenied", "not allowed");
        assert!(!err.is_internal());
        assert!(err.is_access_denied());
        assert!(!ProviderError::new("ValidationException", "bad input").is_internal());
    }
}
