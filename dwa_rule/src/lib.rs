//! # DWA Rule - Data-Warehouse Audit-Logging Compliance

pub mod api;
pub mod evaluation;
pub mod inventory;
pub mod provider;
pub mod reconcile;
pub mod submit;
pub mod types;

// Convenience re-exports
pub use api::*;

pub mod prelude {
    pub use crate::api::{
        ErrorResponse, RuleConfig, RuleError, RuleHandler, TriggerError, ACCESS_DENIED_MESSAGE,
        ACCOUNT_RESOURCE_TYPE, DEFAULT_RESOURCE_TYPE,
    };

    pub use crate::provider::{
        fixture::{FixtureProvider, SubmittedBatch, WarehouseSnapshot},
        ClusterDescriptor, ClusterPage, ClusterParameter, ComplianceApi, Credentials,
        CredentialsApi, ParameterGroupStatus, ParameterStatus, PriorEvaluationPage, ProviderError,
        WarehouseApi,
    };

    pub use crate::evaluation::{
        evaluate, normalize, ComplianceResult, EvaluationError, AUDIT_DISABLED_ANNOTATION,
        NO_CLUSTERS_ANNOTATION,
    };
    pub use crate::inventory::{InventoryCollector, SCANNED_PARAMETERS};
    pub use crate::reconcile::reconcile_stale;
    pub use crate::submit::{submit, MAX_BATCH_SIZE};

    pub use crate::types::{
        ComplianceType, ConfigurationItem, ConfigurationItemSummary, Evaluation,
        InvocationContext, InvokingEvent, MessageType, ResourceRecord, RuleEvent,
        ATTR_DB_ENCRYPTED, ATTR_LOG_ENABLED, TEST_MODE_TOKEN,
    };
}
