//! # Evaluation Types
//!
//! Canonical evaluation records submitted to the compliance service.
//! These types serialize to the compliance service's wire shape, so the
//! field renames here are load-bearing.

use serde::{Deserialize, Serialize};

use crate::types::event::ConfigurationItem;

/// Maximum annotation length accepted by the compliance service.
pub const ANNOTATION_LIMIT: usize = 256;

/// Over-limit annotations are cut here and suffixed with a marker.
const ANNOTATION_CUT: usize = 244;

/// Compliance verdict for one resource at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceType {
    /// Resource satisfies the rule
    Compliant,

    /// Resource violates the rule
    NonCompliant,

    /// Rule does not apply to the resource (or the resource is gone)
    NotApplicable,
}

impl ComplianceType {
    /// Wire name of the verdict
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceType::Compliant => "COMPLIANT",
            ComplianceType::NonCompliant => "NON_COMPLIANT",
            ComplianceType::NotApplicable => "NOT_APPLICABLE",
        }
    }
}

impl std::fmt::Display for ComplianceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One compliance evaluation record.
///
/// Four fields are required by the compliance service: resource type,
/// resource id, compliance type and ordering timestamp. Records failing
/// [`Evaluation::is_complete`] are dropped by the normalizer and never
/// submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Evaluation {
    /// Optional explanatory annotation, truncated to the service limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,

    /// Resource type being reported on (e.g. a cluster, or the account)
    pub compliance_resource_type: String,

    /// Unique id of the resource being reported on
    pub compliance_resource_id: String,

    /// The verdict
    pub compliance_type: ComplianceType,

    /// Ordering timestamp, derived from the trigger or configuration item
    pub ordering_timestamp: String,
}

impl Evaluation {
    /// Create an evaluation with all required fields
    pub fn new(
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        compliance_type: ComplianceType,
        ordering_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            annotation: None,
            compliance_resource_type: resource_type.into(),
            compliance_resource_id: resource_id.into(),
            compliance_type,
            ordering_timestamp: ordering_timestamp.into(),
        }
    }

    /// Attach an annotation, truncated to the service limit
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(truncate_annotation(annotation.into()));
        self
    }

    /// Build an evaluation from an observed configuration item
    /// (configuration-change triggers); type, id and timestamp come from
    /// the item itself.
    pub fn from_configuration_item(
        item: &ConfigurationItem,
        compliance_type: ComplianceType,
    ) -> Self {
        Self::new(
            item.resource_type.clone(),
            item.resource_id.clone(),
            compliance_type,
            item.configuration_item_capture_time.to_rfc3339(),
        )
    }

    /// Check that every required field carries a value
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Names of required fields that are blank, in wire spelling
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.compliance_resource_type.is_empty() {
            missing.push("ComplianceResourceType");
        }
        if self.compliance_resource_id.is_empty() {
            missing.push("ComplianceResourceId");
        }
        if self.ordering_timestamp.is_empty() {
            missing.push("OrderingTimestamp");
        }
        missing
    }
}

/// Truncate an annotation to the service constraint.
pub fn truncate_annotation(annotation: String) -> String {
    if annotation.chars().count() > ANNOTATION_LIMIT {
        let head: String = annotation.chars().take(ANNOTATION_CUT).collect();
        format!("{} [truncated]", head)
    } else {
        annotation
    }
}
