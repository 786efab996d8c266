//! # Compliance Evaluation
//!
//! Applies the decision rule to the normalized inventory and shapes the
//! outcome as an explicit tagged union, dispatched by the handler.

use log::warn;
use thiserror::Error;

use crate::api::config::RuleConfig;
use crate::types::{ComplianceType, Evaluation, InvocationContext, ResourceRecord, ATTR_LOG_ENABLED};

/// Annotation for the account-scoped result when no clusters exist
pub const NO_CLUSTERS_ANNOTATION: &str = "No clusters found";

/// Annotation attached to non-compliant clusters
pub const AUDIT_DISABLED_ANNOTATION: &str = "Audit logging is not enforced for the cluster. \
     Make sure to enable audit logging for the cluster. ";

/// Outcome of the evaluation stage
#[derive(Debug, Clone, PartialEq)]
pub enum ComplianceResult {
    /// No target resources exist; the handler reports at account
    /// granularity and reconciles stale prior results
    NoResources,

    /// A bare verdict with no per-resource detail (e.g. a resource that
    /// left scope); shaped into a record by the handler
    Verdict(ComplianceType),

    /// One evaluation per inspected resource
    Evaluations(Vec<Evaluation>),

    /// A single prebuilt evaluation record
    Record(Evaluation),
}

/// Internal invariant violations raised by the evaluator
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The audit-logging attribute was neither true nor false. Unreachable
    /// for records built by the inventory layer.
    #[error("no valid audit-logging value processed for resource {resource}")]
    InvalidVerdict { resource: String },
}

/// Apply the decision rule to the inventory.
///
/// Pure function of the resource set: no provider calls happen here.
pub fn evaluate(
    records: &[ResourceRecord],
    ctx: &InvocationContext,
    config: &RuleConfig,
) -> Result<ComplianceResult, EvaluationError> {
    if records.is_empty() {
        return Ok(ComplianceResult::NoResources);
    }

    let mut evaluations = Vec::with_capacity(records.len());
    for record in records {
        match record.bool_attribute(ATTR_LOG_ENABLED) {
            Some(false) => evaluations.push(
                ctx.evaluation(
                    record.identifier(),
                    &config.default_resource_type,
                    ComplianceType::NonCompliant,
                )
                .with_annotation(AUDIT_DISABLED_ANNOTATION),
            ),
            Some(true) => evaluations.push(ctx.evaluation(
                record.identifier(),
                &config.default_resource_type,
                ComplianceType::Compliant,
            )),
            None => {
                return Err(EvaluationError::InvalidVerdict {
                    resource: record.identifier().to_string(),
                })
            }
        }
    }

    Ok(ComplianceResult::Evaluations(evaluations))
}

/// Validate required fields on every record; incomplete records are
/// dropped with a warning and never submitted.
pub fn normalize(evaluations: Vec<Evaluation>) -> Vec<Evaluation> {
    evaluations
        .into_iter()
        .filter(|eval| {
            let missing = eval.missing_fields();
            if missing.is_empty() {
                true
            } else {
                warn!(
                    "dropping evaluation for {}: missing {}",
                    eval.compliance_resource_id,
                    missing.join(", ")
                );
                false
            }
        })
        .collect()
}
