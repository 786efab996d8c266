//! # Rule Errors
//!
//! Stage errors and the structured error response returned instead of
//! evaluations when an invocation fails.

use serde::{Deserialize, Serialize};

use crate::evaluation::EvaluationError;
use crate::provider::ProviderError;

/// Trigger parsing and validation failures
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// A required field is absent or empty
    #[error("required field {name} is not defined")]
    MissingField { name: &'static str },

    /// Trigger kind outside the three recognized notifications; the raw
    /// payload is echoed for diagnosis
    #[error("unexpected message type")]
    UnsupportedMessageType { payload: String },

    /// The invoking event was not valid JSON
    #[error("malformed invoking event: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// Comprehensive error type for one rule invocation
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Error while parsing or validating the trigger
    #[error("trigger error: {0}")]
    Trigger(#[from] TriggerError),

    /// Error from a provider API call
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Internal invariant violation in the evaluator
    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    /// The handler was wired up inconsistently
    #[error("configuration error: {reason}")]
    Configuration { reason: String },
}

/// Structured error response returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub internal_error_message: String,
    pub internal_error_details: Option<String>,
    pub customer_error_message: Option<String>,
    pub customer_error_code: Option<String>,
}

impl ErrorResponse {
    /// Generic internal error; customer-facing fields carry the fixed
    /// `InternalError` marker and never leak details
    pub fn internal(message: impl Into<String>, details: Option<String>) -> Self {
        Self::customer(
            message,
            details,
            "InternalError".to_string(),
            "InternalError".to_string(),
        )
    }

    /// Customer-visible error with the provider's code and message
    pub fn customer(
        internal_message: impl Into<String>,
        details: Option<String>,
        code: String,
        message: String,
    ) -> Self {
        Self {
            internal_error_message: internal_message.into(),
            internal_error_details: details,
            customer_error_message: Some(message),
            customer_error_code: Some(code),
        }
    }
}

impl From<RuleError> for ErrorResponse {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::Trigger(TriggerError::UnsupportedMessageType { payload }) => {
                ErrorResponse::internal("Unexpected message type", Some(payload))
            }
            RuleError::Trigger(trigger) => {
                ErrorResponse::internal(trigger.to_string(), None)
            }
            RuleError::Provider(provider) if provider.is_internal() => ErrorResponse::internal(
                "Unexpected error while completing API request",
                Some(provider.to_string()),
            ),
            RuleError::Provider(provider) => ErrorResponse::customer(
                "Customer error while making API request",
                Some(provider.to_string()),
                provider.code,
                provider.message,
            ),
            RuleError::Evaluation(evaluation) => {
                let text = evaluation.to_string();
                ErrorResponse::internal(text.clone(), Some(text))
            }
            RuleError::Configuration { reason } => ErrorResponse::internal(reason, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_provider_error_is_scrubbed() {
        let err = RuleError::Provider(ProviderError::new("500", "stack trace with internals"));
        let response = ErrorResponse::from(err);
        assert_eq!(
            response.internal_error_message,
            "Unexpected error while completing API request"
        );
        assert_eq!(response.customer_error_code.as_deref(), Some("InternalError"));
        assert_eq!(
            response.customer_error_message.as_deref(),
            Some("InternalError")
        );
    }

    #[test]
    fn test_customer_provider_error_passes_code_through() {
        let err = RuleError::Provider(ProviderError::new("ValidationException", "bad page size"));
        let response = ErrorResponse::from(err);
        assert_eq!(
            response.customer_error_code.as_deref(),
            Some("ValidationException")
        );
        assert_eq!(response.customer_error_message.as_deref(), Some("bad page size"));
    }

    #[test]
    fn test_unsupported_message_type_echoes_payload() {
        let err = RuleError::Trigger(TriggerError::UnsupportedMessageType {
            payload: r#"{"messageType":"Mystery"}"#.to_string(),
        });
        let response = ErrorResponse::from(err);
        assert_eq!(response.internal_error_message, "Unexpected message type");
        assert_eq!(
            response.internal_error_details.as_deref(),
            Some(r#"{"messageType":"Mystery"}"#)
        );
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let response = ErrorResponse::internal("boom", None);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("internalErrorMessage").is_some());
        assert!(json.get("internalErrorDetails").is_some());
        assert!(json.get("customerErrorMessage").is_some());
        assert!(json.get("customerErrorCode").is_some());
    }
}
