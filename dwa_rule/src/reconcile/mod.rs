//! # Stale-Result Reconciliation
//!
//! When the rule reports at account granularity there are no per-resource
//! results to overwrite prior state, so resources that disappeared would
//! keep their last verdict forever. This stage marks them NOT_APPLICABLE.

use log::debug;

use crate::api::config::RuleConfig;
use crate::provider::{ComplianceApi, ProviderError};
use crate::types::{ComplianceType, Evaluation, InvocationContext};

/// Fold prior results into the newly computed set.
///
/// Pages through previously recorded COMPLIANT/NON_COMPLIANT results for
/// the rule, following continuation tokens to exhaustion; every prior
/// resource id absent from `latest` yields a synthesized NOT_APPLICABLE
/// evaluation. Returns synthesized-stale entries followed by `latest`.
pub fn reconcile_stale(
    latest: Vec<Evaluation>,
    ctx: &InvocationContext,
    config: &RuleConfig,
    compliance: &dyn ComplianceApi,
) -> Result<Vec<Evaluation>, ProviderError> {
    let mut prior_ids = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = compliance.get_prior_evaluations(&ctx.rule_name, token.as_deref())?;
        prior_ids.extend(page.resource_ids);
        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    debug!("found {} prior result(s) for rule {}", prior_ids.len(), ctx.rule_name);

    let mut reconciled = Vec::new();
    for old_id in prior_ids {
        let newer_found = latest
            .iter()
            .any(|eval| eval.compliance_resource_id == old_id);
        if !newer_found {
            reconciled.push(ctx.evaluation(
                &old_id,
                &config.default_resource_type,
                ComplianceType::NotApplicable,
            ));
        }
    }

    reconciled.extend(latest);
    Ok(reconciled)
}
