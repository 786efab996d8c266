//! # Fixture Provider
//!
//! JSON-snapshot implementation of the provider traits, used by the CLI
//! for dry runs and by tests. Submissions are recorded instead of sent
//! anywhere.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::provider::{
    ClusterDescriptor, ClusterPage, ClusterParameter, ComplianceApi, PriorEvaluationPage,
    ProviderError, WarehouseApi,
};
use crate::types::{ConfigurationItem, Evaluation};

/// Page limit applied to the prior-evaluation listing
const PRIOR_EVALUATION_PAGE: usize = 100;

/// Serializable snapshot of warehouse and compliance state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseSnapshot {
    /// Cluster descriptors returned by the listing API
    #[serde(default)]
    pub clusters: Vec<ClusterDescriptor>,

    /// Stored parameters per parameter group name
    #[serde(default)]
    pub parameter_groups: BTreeMap<String, Vec<ClusterParameter>>,

    /// Audit-logging flag per cluster id; absent clusters report disabled
    #[serde(default)]
    pub logging: BTreeMap<String, bool>,

    /// Resource ids with previously recorded results for the rule
    #[serde(default)]
    pub prior_evaluations: Vec<String>,

    /// Configuration items resolvable through the history API
    #[serde(default)]
    pub config_history: Vec<ConfigurationItem>,
}

/// One recorded submission batch
#[derive(Debug, Clone)]
pub struct SubmittedBatch {
    pub evaluations: Vec<Evaluation>,
    pub result_token: String,
    pub test_mode: bool,
}

/// Snapshot-backed provider implementing all three API surfaces
pub struct FixtureProvider {
    snapshot: WarehouseSnapshot,
    submissions: Mutex<Vec<SubmittedBatch>>,
}

impl FixtureProvider {
    pub fn new(snapshot: WarehouseSnapshot) -> Self {
        Self {
            snapshot,
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Load a snapshot from its JSON form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Copy of every batch submitted so far
    pub fn submissions(&self) -> Vec<SubmittedBatch> {
        self.submissions
            .lock()
            .expect("submission log poisoned")
            .clone()
    }

    fn parse_marker(marker: Option<&str>) -> Result<usize, ProviderError> {
        match marker {
            None => Ok(0),
            Some(raw) => raw.parse().map_err(|_| {
                ProviderError::new("ValidationError", format!("invalid marker: {raw}"))
            }),
        }
    }
}

impl WarehouseApi for FixtureProvider {
    fn describe_clusters(
        &self,
        page_size: u32,
        marker: Option<&str>,
    ) -> Result<ClusterPage, ProviderError> {
        let start = Self::parse_marker(marker)?;
        let end = (start + page_size as usize).min(self.snapshot.clusters.len());
        let clusters = self
            .snapshot
            .clusters
            .get(start..end)
            .unwrap_or_default()
            .to_vec();
        let marker = if end < self.snapshot.clusters.len() {
            Some(end.to_string())
        } else {
            None
        };
        Ok(ClusterPage { clusters, marker })
    }

    fn describe_cluster_parameters(
        &self,
        parameter_group_name: &str,
    ) -> Result<Vec<ClusterParameter>, ProviderError> {
        self.snapshot
            .parameter_groups
            .get(parameter_group_name)
            .cloned()
            .ok_or_else(|| {
                ProviderError::new(
                    "ClusterParameterGroupNotFound",
                    format!("parameter group {parameter_group_name} does not exist"),
                )
            })
    }

    fn describe_logging_status(&self, cluster_identifier: &str) -> Result<bool, ProviderError> {
        Ok(self
            .snapshot
            .logging
            .get(cluster_identifier)
            .copied()
            .unwrap_or(false))
    }
}

impl ComplianceApi for FixtureProvider {
    fn put_evaluations(
        &self,
        evaluations: &[Evaluation],
        result_token: &str,
        test_mode: bool,
    ) -> Result<(), ProviderError> {
        self.submissions
            .lock()
            .expect("submission log poisoned")
            .push(SubmittedBatch {
                evaluations: evaluations.to_vec(),
                result_token: result_token.to_string(),
                test_mode,
            });
        Ok(())
    }

    fn get_prior_evaluations(
        &self,
        _rule_name: &str,
        next_token: Option<&str>,
    ) -> Result<PriorEvaluationPage, ProviderError> {
        let start = Self::parse_marker(next_token)?;
        let end = (start + PRIOR_EVALUATION_PAGE).min(self.snapshot.prior_evaluations.len());
        let resource_ids = self
            .snapshot
            .prior_evaluations
            .get(start..end)
            .unwrap_or_default()
            .to_vec();
        let next_token = if end < self.snapshot.prior_evaluations.len() {
            Some(end.to_string())
        } else {
            None
        };
        Ok(PriorEvaluationPage {
            resource_ids,
            next_token,
        })
    }

    fn get_resource_config_history(
        &self,
        resource_type: &str,
        resource_id: &str,
        _later_time: &DateTime<Utc>,
    ) -> Result<ConfigurationItem, ProviderError> {
        self.snapshot
            .config_history
            .iter()
            .find(|item| item.resource_type == resource_type && item.resource_id == resource_id)
            .cloned()
            .ok_or_else(|| {
                ProviderError::new(
                    "ResourceNotDiscoveredException",
                    format!("no configuration history for {resource_type}/{resource_id}"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ComplianceType;

    fn snapshot_with_clusters(count: usize) -> WarehouseSnapshot {
        WarehouseSnapshot {
            clusters: (0..count)
                .map(|i| ClusterDescriptor {
                    cluster_identifier: format!("cluster-{i}"),
                    encrypted: false,
                    cluster_parameter_groups: Vec::new(),
                })
                .collect(),
            ..WarehouseSnapshot::default()
        }
    }

    #[test]
    fn test_cluster_listing_paginates_to_exhaustion() {
        let provider = FixtureProvider::new(snapshot_with_clusters(5));
        let mut seen = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let page = provider.describe_clusters(2, marker.as_deref()).unwrap();
            seen.extend(page.clusters.into_iter().map(|c| c.cluster_identifier));
            match page.marker {
                Some(m) => marker = Some(m),
                None => break,
            }
        }
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[4], "cluster-4");
    }

    #[test]
    fn test_empty_listing_is_not_an_error() {
        let provider = FixtureProvider::new(WarehouseSnapshot::default());
        let page = provider.describe_clusters(50, None).unwrap();
        assert!(page.clusters.is_empty());
        assert!(page.marker.is_none());
    }

    #[test]
    fn test_unknown_parameter_group_is_customer_error() {
        let provider = FixtureProvider::new(WarehouseSnapshot::default());
        let err = provider.describe_cluster_parameters("missing").unwrap_err();
        assert_eq!(err.code, "ClusterParameterGroupNotFound");
        assert!(!err.is_internal());
    }

    #[test]
    fn test_submissions_are_recorded() {
        let provider = FixtureProvider::new(WarehouseSnapshot::default());
        let eval = Evaluation::new(
            "AWS::Redshift::Cluster",
            "cluster-1",
            ComplianceType::Compliant,
            "2024-01-01T00:00:00Z",
        );
        provider
            .put_evaluations(std::slice::from_ref(&eval), "tok", false)
            .unwrap();
        let batches = provider.submissions();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].result_token, "tok");
        assert_eq!(batches[0].evaluations, vec![eval]);
    }

    #[test]
    fn test_prior_evaluations_follow_continuation_tokens() {
        let snapshot = WarehouseSnapshot {
            prior_evaluations: (0..250).map(|i| format!("cluster-{i}")).collect(),
            ..WarehouseSnapshot::default()
        };
        let provider = FixtureProvider::new(snapshot);
        let first = provider.get_prior_evaluations("rule", None).unwrap();
        assert_eq!(first.resource_ids.len(), 100);
        let second = provider
            .get_prior_evaluations("rule", first.next_token.as_deref())
            .unwrap();
        let third = provider
            .get_prior_evaluations("rule", second.next_token.as_deref())
            .unwrap();
        assert_eq!(third.resource_ids.len(), 50);
        assert!(third.next_token.is_none());
    }
}
