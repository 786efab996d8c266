//! # Resource Records
//!
//! Flat per-resource attribute records produced by the inventory layer and
//! consumed by the evaluator. Records are built once per invocation and
//! never mutated afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute name for the audit-logging flag
pub const ATTR_LOG_ENABLED: &str = "log_enabled";

/// Attribute name for the storage-encryption flag
pub const ATTR_DB_ENCRYPTED: &str = "db_encrypted";

/// A single normalized attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Text(String),
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

/// Normalized configuration record for one warehouse cluster
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    identifier: String,
    attributes: BTreeMap<String, AttributeValue>,
}

impl ResourceRecord {
    /// Create an empty record for a resource id
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute (builder style)
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Resource identifier
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// All attributes
    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    /// Boolean attribute lookup; `None` when absent or not a boolean
    pub fn bool_attribute(&self, name: &str) -> Option<bool> {
        match self.attributes.get(name) {
            Some(AttributeValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_attribute_lookup() {
        let record = ResourceRecord::new("cluster-1")
            .with_attribute(ATTR_LOG_ENABLED, true)
            .with_attribute(ATTR_DB_ENCRYPTED, false);
        assert_eq!(record.bool_attribute(ATTR_LOG_ENABLED), Some(true));
        assert_eq!(record.bool_attribute(ATTR_DB_ENCRYPTED), Some(false));
    }

    #[test]
    fn test_missing_or_non_bool_attribute_is_none() {
        let record = ResourceRecord::new("cluster-1").with_attribute("note", "free text");
        assert_eq!(record.bool_attribute("note"), None);
        assert_eq!(record.bool_attribute(ATTR_LOG_ENABLED), None);
    }
}
