//! # Core Types
//!
//! Data model shared across the pipeline: trigger events, resource
//! records and evaluation records.

pub mod evaluation;
pub mod event;
pub mod resource;

pub use evaluation::{truncate_annotation, ComplianceType, Evaluation, ANNOTATION_LIMIT};
pub use event::{
    ConfigurationItem, ConfigurationItemSummary, InvocationContext, InvokingEvent, MessageType,
    RuleEvent, TEST_MODE_TOKEN,
};
pub use resource::{AttributeValue, ResourceRecord, ATTR_DB_ENCRYPTED, ATTR_LOG_ENABLED};
