//! # Result Submission
//!
//! Batches evaluations to the compliance service. A submission failure is
//! fatal for the invocation; there is no partial-batch retry.

use log::{debug, info};

use crate::provider::{ComplianceApi, ProviderError};
use crate::types::{Evaluation, InvocationContext};

/// Largest batch accepted by the compliance service
pub const MAX_BATCH_SIZE: usize = 100;

/// Submit every evaluation in batches of at most [`MAX_BATCH_SIZE`].
///
/// When the result token is the TESTMODE sentinel the submission calls
/// are skipped entirely; the caller still returns the computed list.
pub fn submit(
    evaluations: &[Evaluation],
    ctx: &InvocationContext,
    compliance: &dyn ComplianceApi,
) -> Result<(), ProviderError> {
    if ctx.is_test_mode() {
        info!(
            "test mode: skipping submission of {} evaluation(s)",
            evaluations.len()
        );
        return Ok(());
    }

    for batch in evaluations.chunks(MAX_BATCH_SIZE) {
        debug!("submitting batch of {} evaluation(s)", batch.len());
        compliance.put_evaluations(batch, &ctx.result_token, false)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::fixture::{FixtureProvider, WarehouseSnapshot};
    use crate::types::{ComplianceType, InvokingEvent, MessageType, RuleEvent};

    fn context_with_token(token: &str) -> InvocationContext {
        let event = RuleEvent {
            account_id: "123456789012".to_string(),
            invoking_event: String::new(),
            result_token: token.to_string(),
            execution_role_arn: None,
            event_left_scope: false,
            config_rule_name: "warehouse-audit-enabled".to_string(),
        };
        let invoking: InvokingEvent =
            serde_json::from_str(r#"{"messageType":"ScheduledNotification"}"#).unwrap();
        InvocationContext::from_event(&event, &invoking, MessageType::ScheduledNotification)
    }

    fn evaluations(count: usize) -> Vec<Evaluation> {
        (0..count)
            .map(|i| {
                Evaluation::new(
                    "AWS::Redshift::Cluster",
                    format!("cluster-{i}"),
                    ComplianceType::Compliant,
                    "2024-01-01T00:00:00Z",
                )
            })
            .collect()
    }

    #[test]
    fn test_batches_never_exceed_limit() {
        let provider = FixtureProvider::new(WarehouseSnapshot::default());
        let evals = evaluations(250);
        submit(&evals, &context_with_token("tok"), &provider).unwrap();

        let batches = provider.submissions();
        // ceil(250 / 100) = 3 calls
        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|b| b.evaluations.len() <= MAX_BATCH_SIZE));
        assert_eq!(batches[2].evaluations.len(), 50);
        assert!(batches.iter().all(|b| b.result_token == "tok"));
    }

    #[test]
    fn test_exact_batch_boundary() {
        let provider = FixtureProvider::new(WarehouseSnapshot::default());
        let evals = evaluations(200);
        submit(&evals, &context_with_token("tok"), &provider).unwrap();
        assert_eq!(provider.submissions().len(), 2);
    }

    #[test]
    fn test_test_mode_skips_submission() {
        let provider = FixtureProvider::new(WarehouseSnapshot::default());
        let evals = evaluations(5);
        submit(&evals, &context_with_token("TESTMODE"), &provider).unwrap();
        assert!(provider.submissions().is_empty());
    }

    #[test]
    fn test_empty_list_makes_no_calls() {
        let provider = FixtureProvider::new(WarehouseSnapshot::default());
        submit(&[], &context_with_token("tok"), &provider).unwrap();
        assert!(provider.submissions().is_empty());
    }
}
