//! # Trigger Event Model
//!
//! The compliance service invokes the rule with a JSON trigger event. The
//! `invokingEvent` field is itself a JSON-encoded document whose
//! `messageType` selects the trigger kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::evaluation::{ComplianceType, Evaluation};

/// Result-token sentinel that turns an invocation into a dry run.
pub const TEST_MODE_TOKEN: &str = "TESTMODE";

/// Raw trigger event as delivered by the compliance service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvent {
    /// Account the rule runs in
    #[serde(default)]
    pub account_id: String,

    /// JSON-encoded invoking event (see [`InvokingEvent`])
    #[serde(default)]
    pub invoking_event: String,

    /// Token attached to submitted evaluations
    #[serde(default)]
    pub result_token: String,

    /// Role to assume for cross-account evaluation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_role_arn: Option<String>,

    /// Set when the resource left the rule's scope
    #[serde(default)]
    pub event_left_scope: bool,

    /// Name of the rule, used to look up prior evaluations
    #[serde(default)]
    pub config_rule_name: String,
}

/// Decoded `invokingEvent` payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokingEvent {
    /// Trigger kind; unrecognized values are rejected by the handler
    #[serde(default)]
    pub message_type: String,

    /// Creation time of the notification, used as the ordering timestamp
    /// for account- and schedule-derived evaluations
    #[serde(default)]
    pub notification_creation_time: Option<String>,

    /// Present on configuration-change notifications
    #[serde(default)]
    pub configuration_item: Option<ConfigurationItem>,

    /// Present on oversized change notifications instead of the full item
    #[serde(default)]
    pub configuration_item_summary: Option<ConfigurationItemSummary>,
}

impl InvokingEvent {
    /// Recognized trigger kind, or `None` for anything else
    pub fn kind(&self) -> Option<MessageType> {
        MessageType::parse(&self.message_type)
    }
}

/// The three recognized trigger kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// Periodic trigger
    ScheduledNotification,

    /// A resource's configuration changed
    ConfigurationItemChangeNotification,

    /// Configuration change too large to inline; the item must be fetched
    /// from the configuration history
    OversizedConfigurationItemChangeNotification,
}

impl MessageType {
    /// Parse the wire spelling of a trigger kind
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ScheduledNotification" => Some(MessageType::ScheduledNotification),
            "ConfigurationItemChangeNotification" => {
                Some(MessageType::ConfigurationItemChangeNotification)
            }
            "OversizedConfigurationItemChangeNotification" => {
                Some(MessageType::OversizedConfigurationItemChangeNotification)
            }
            _ => None,
        }
    }

    /// Wire spelling of the trigger kind
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::ScheduledNotification => "ScheduledNotification",
            MessageType::ConfigurationItemChangeNotification => {
                "ConfigurationItemChangeNotification"
            }
            MessageType::OversizedConfigurationItemChangeNotification => {
                "OversizedConfigurationItemChangeNotification"
            }
        }
    }
}

/// Configuration item observed for a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItem {
    pub resource_type: String,
    pub resource_id: String,

    /// Capture time doubles as the ordering timestamp for change-derived
    /// evaluations
    pub configuration_item_capture_time: DateTime<Utc>,

    /// Lifecycle status; `ResourceDeleted` makes the evaluation moot
    #[serde(default)]
    pub configuration_item_status: Option<String>,

    /// Raw configuration body, untouched by this rule
    #[serde(default)]
    pub configuration: serde_json::Value,
}

impl ConfigurationItem {
    /// Whether the item should still be evaluated. Deleted resources and
    /// unknown statuses are not applicable.
    pub fn is_applicable(&self, event_left_scope: bool) -> bool {
        let status = self.configuration_item_status.as_deref().unwrap_or("");
        if status == "ResourceDeleted" {
            log::info!(
                "resource {} deleted, reporting NOT_APPLICABLE",
                self.resource_id
            );
        }
        matches!(status, "OK" | "ResourceDiscovered") && !event_left_scope
    }
}

/// Summary shipped on oversized change notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItemSummary {
    pub resource_type: String,
    pub resource_id: String,
    pub configuration_item_capture_time: DateTime<Utc>,
}

/// Read-only per-invocation context derived from the validated trigger
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub account_id: String,
    pub trigger: MessageType,
    pub result_token: String,
    pub rule_name: String,
    pub execution_role: Option<String>,

    /// Ordering timestamp for evaluations built from this context. Blank
    /// when the trigger carried no notification time; such evaluations are
    /// dropped by the normalizer.
    pub notification_creation_time: String,
}

impl InvocationContext {
    /// Build the context from a validated event and its decoded payload
    pub fn from_event(event: &RuleEvent, invoking: &InvokingEvent, trigger: MessageType) -> Self {
        Self {
            account_id: event.account_id.clone(),
            trigger,
            result_token: event.result_token.clone(),
            rule_name: event.config_rule_name.clone(),
            execution_role: event.execution_role_arn.clone(),
            notification_creation_time: invoking
                .notification_creation_time
                .clone()
                .unwrap_or_default(),
        }
    }

    /// Whether this invocation is a dry run
    pub fn is_test_mode(&self) -> bool {
        self.result_token == TEST_MODE_TOKEN
    }

    /// Build an evaluation ordered by this invocation's trigger time
    pub fn evaluation(
        &self,
        resource_id: &str,
        resource_type: &str,
        compliance_type: ComplianceType,
    ) -> Evaluation {
        Evaluation::new(
            resource_type,
            resource_id,
            compliance_type,
            self.notification_creation_time.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled_event() -> RuleEvent {
        RuleEvent {
            account_id: "123456789012".to_string(),
            invoking_event:
                r#"{"messageType":"ScheduledNotification","notificationCreationTime":"2024-01-01T00:00:00Z"}"#
                    .to_string(),
            result_token: "token-1".to_string(),
            execution_role_arn: None,
            event_left_scope: false,
            config_rule_name: "warehouse-audit-enabled".to_string(),
        }
    }

    #[test]
    fn test_event_deserializes_from_wire_json() {
        let json = r#"{
            "accountId": "123456789012",
            "invokingEvent": "{\"messageType\":\"ScheduledNotification\"}",
            "resultToken": "tok",
            "eventLeftScope": false,
            "configRuleName": "warehouse-audit-enabled"
        }"#;
        let event: RuleEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.account_id, "123456789012");
        assert!(event.execution_role_arn.is_none());
        let invoking: InvokingEvent = serde_json::from_str(&event.invoking_event).unwrap();
        assert_eq!(invoking.kind(), Some(MessageType::ScheduledNotification));
    }

    #[test]
    fn test_unrecognized_message_type() {
        assert_eq!(MessageType::parse("SomethingElse"), None);
        assert_eq!(
            MessageType::parse("OversizedConfigurationItemChangeNotification"),
            Some(MessageType::OversizedConfigurationItemChangeNotification)
        );
    }

    #[test]
    fn test_context_builds_trigger_ordered_evaluations() {
        let event = scheduled_event();
        let invoking: InvokingEvent = serde_json::from_str(&event.invoking_event).unwrap();
        let ctx =
            InvocationContext::from_event(&event, &invoking, MessageType::ScheduledNotification);
        let eval = ctx.evaluation("cluster-1", "AWS::Redshift::Cluster", ComplianceType::Compliant);
        assert_eq!(eval.ordering_timestamp, "2024-01-01T00:00:00Z");
        assert!(!ctx.is_test_mode());
    }

    #[test]
    fn test_deleted_resource_not_applicable() {
        let item = ConfigurationItem {
            resource_type: "AWS::Redshift::Cluster".to_string(),
            resource_id: "cluster-1".to_string(),
            configuration_item_capture_time: Utc::now(),
            configuration_item_status: Some("ResourceDeleted".to_string()),
            configuration: serde_json::Value::Null,
        };
        assert!(!item.is_applicable(false));
    }

    #[test]
    fn test_in_scope_discovered_resource_applicable() {
        let item = ConfigurationItem {
            resource_type: "AWS::Redshift::Cluster".to_string(),
            resource_id: "cluster-1".to_string(),
            configuration_item_capture_time: Utc::now(),
            configuration_item_status: Some("ResourceDiscovered".to_string()),
            configuration: serde_json::Value::Null,
        };
        assert!(item.is_applicable(false));
        assert!(!item.is_applicable(true));
    }
}
