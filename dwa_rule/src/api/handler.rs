//! # Rule Handler
//!
//! Orchestrates one invocation end to end: trigger parsing, resource
//! discovery, evaluation, normalization, stale-result reconciliation and
//! submission. Stage errors are converted into a structured
//! [`ErrorResponse`] in exactly one place.

use log::{debug, error};

use crate::api::config::RuleConfig;
use crate::api::errors::{ErrorResponse, RuleError, TriggerError};
use crate::evaluation::{self, normalize, ComplianceResult, NO_CLUSTERS_ANNOTATION};
use crate::inventory::InventoryCollector;
use crate::provider::{ComplianceApi, CredentialsApi, ProviderError, WarehouseApi};
use crate::reconcile::reconcile_stale;
use crate::submit::submit;
use crate::types::{
    ComplianceType, ConfigurationItem, Evaluation, InvocationContext, InvokingEvent, MessageType,
    RuleEvent,
};

/// Fixed customer-facing message for role-assumption denials. The
/// provider's own message may contain account internals and is never
/// surfaced.
pub const ACCESS_DENIED_MESSAGE: &str =
    "The compliance service does not have permission to assume the execution role.";

/// Complete compliance rule for one invocation.
///
/// Holds the provider collaborators by reference; nothing survives the
/// invocation.
pub struct RuleHandler<'a> {
    warehouse: &'a dyn WarehouseApi,
    compliance: &'a dyn ComplianceApi,
    credentials: Option<&'a dyn CredentialsApi>,
    config: RuleConfig,
}

impl<'a> RuleHandler<'a> {
    pub fn new(
        warehouse: &'a dyn WarehouseApi,
        compliance: &'a dyn ComplianceApi,
        config: RuleConfig,
    ) -> Self {
        Self {
            warehouse,
            compliance,
            credentials: None,
            config,
        }
    }

    /// Attach a credential source for assume-role mode
    pub fn with_credentials(mut self, credentials: &'a dyn CredentialsApi) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Run the invocation. Returns the evaluations actually processed, or
    /// the structured error response.
    pub fn handle(&self, event: &RuleEvent) -> Result<Vec<Evaluation>, ErrorResponse> {
        self.run(event).map_err(|err| {
            let response = ErrorResponse::from(err);
            error!("invocation failed: {}", response.internal_error_message);
            response
        })
    }

    fn run(&self, event: &RuleEvent) -> Result<Vec<Evaluation>, RuleError> {
        validate_event(event)?;

        let invoking: InvokingEvent =
            serde_json::from_str(&event.invoking_event).map_err(TriggerError::MalformedPayload)?;
        let kind = invoking
            .kind()
            .ok_or_else(|| TriggerError::UnsupportedMessageType {
                payload: event.invoking_event.clone(),
            })?;
        let ctx = InvocationContext::from_event(event, &invoking, kind);
        debug!("trigger {} for account {}", kind.as_str(), ctx.account_id);

        self.assume_role(&ctx)?;
        let configuration_item = self.configuration_item(&invoking, kind)?;

        let result = match &configuration_item {
            Some(item) if !item.is_applicable(event.event_left_scope) => {
                ComplianceResult::Verdict(ComplianceType::NotApplicable)
            }
            _ => {
                let records = InventoryCollector::new(self.warehouse, &self.config).collect()?;
                evaluation::evaluate(&records, &ctx, &self.config)?
            }
        };

        let evaluations = match result {
            ComplianceResult::NoResources => {
                let latest = normalize(vec![ctx
                    .evaluation(
                        &ctx.account_id,
                        &self.config.account_resource_type,
                        ComplianceType::NotApplicable,
                    )
                    .with_annotation(NO_CLUSTERS_ANNOTATION)]);
                reconcile_stale(latest, &ctx, &self.config, self.compliance)?
            }
            ComplianceResult::Verdict(compliance_type) => {
                let evaluation = match &configuration_item {
                    Some(item) => Evaluation::from_configuration_item(item, compliance_type),
                    None => ctx.evaluation(
                        &ctx.account_id,
                        &self.config.default_resource_type,
                        compliance_type,
                    ),
                };
                normalize(vec![evaluation])
            }
            ComplianceResult::Evaluations(list) => normalize(list),
            ComplianceResult::Record(record) => normalize(vec![record]),
        };

        submit(&evaluations, &ctx, self.compliance)?;
        Ok(evaluations)
    }

    /// Validate that the execution role can be assumed before any other
    /// provider call. The returned credentials are wired into live SDK
    /// clients by the host, outside this crate.
    fn assume_role(&self, ctx: &InvocationContext) -> Result<(), RuleError> {
        if !self.config.assume_role_mode {
            return Ok(());
        }
        let role_arn =
            ctx.execution_role
                .as_deref()
                .ok_or(TriggerError::MissingField {
                    name: "executionRoleArn",
                })?;
        let credentials = self.credentials.ok_or_else(|| RuleError::Configuration {
            reason: "assume-role mode is enabled but no credentials API was provided".to_string(),
        })?;

        match credentials.assume_role(
            role_arn,
            &self.config.role_session_name,
            self.config.role_session_duration_secs,
        ) {
            Ok(_credentials) => {
                debug!("assumed execution role {role_arn}");
                Ok(())
            }
            Err(err) if err.is_access_denied() => {
                Err(ProviderError::new("AccessDenied", ACCESS_DENIED_MESSAGE).into())
            }
            Err(_) => Err(ProviderError::new("InternalError", "InternalError").into()),
        }
    }

    /// Resolve the configuration item for the trigger kind. Oversized
    /// change notifications are resolved through the configuration
    /// history API.
    fn configuration_item(
        &self,
        invoking: &InvokingEvent,
        kind: MessageType,
    ) -> Result<Option<ConfigurationItem>, RuleError> {
        match kind {
            MessageType::ScheduledNotification => Ok(None),
            MessageType::ConfigurationItemChangeNotification => {
                let item = invoking
                    .configuration_item
                    .clone()
                    .ok_or(TriggerError::MissingField {
                        name: "configurationItem",
                    })?;
                Ok(Some(item))
            }
            MessageType::OversizedConfigurationItemChangeNotification => {
                let summary = invoking.configuration_item_summary.clone().ok_or(
                    TriggerError::MissingField {
                        name: "configurationItemSummary",
                    },
                )?;
                let item = self.compliance.get_resource_config_history(
                    &summary.resource_type,
                    &summary.resource_id,
                    &summary.configuration_item_capture_time,
                )?;
                Ok(Some(item))
            }
        }
    }
}

/// Reject events with absent or empty required fields before any API call
fn validate_event(event: &RuleEvent) -> Result<(), TriggerError> {
    let required: [(&'static str, &str); 4] = [
        ("accountId", &event.account_id),
        ("invokingEvent", &event.invoking_event),
        ("resultToken", &event.result_token),
        ("configRuleName", &event.config_rule_name),
    ];
    for (name, value) in required {
        if value.is_empty() {
            return Err(TriggerError::MissingField { name });
        }
    }
    Ok(())
}
