//! # Rule API
//!
//! Public surface for running the rule: configuration, the handler and
//! the error taxonomy.

pub mod config;
pub mod errors;
pub mod handler;

pub use config::{RuleConfig, ACCOUNT_RESOURCE_TYPE, DEFAULT_RESOURCE_TYPE};
pub use errors::{ErrorResponse, RuleError, TriggerError};
pub use handler::{RuleHandler, ACCESS_DENIED_MESSAGE};
