//! # Resource Inventory
//!
//! Enumerates warehouse clusters page by page and normalizes each one
//! into a flat [`ResourceRecord`] carrying the attributes the decision
//! rule needs: the scanned parameter flags, the encryption flag and the
//! audit-logging status.

use std::collections::BTreeMap;

use log::debug;

use crate::api::config::RuleConfig;
use crate::provider::{ClusterDescriptor, ParameterGroupStatus, ProviderError, WarehouseApi};
use crate::types::{ResourceRecord, ATTR_DB_ENCRYPTED, ATTR_LOG_ENABLED};

/// Parameter flags inspected on every cluster's parameter group
pub const SCANNED_PARAMETERS: [&str; 3] =
    ["require_ssl", "use_fips_ssl", "enable_user_activity_logging"];

/// Apply status meaning the stored value is live on the cluster
const IN_SYNC: &str = "in-sync";

/// Collects and normalizes the cluster inventory for one invocation
pub struct InventoryCollector<'a> {
    warehouse: &'a dyn WarehouseApi,
    config: &'a RuleConfig,
}

impl<'a> InventoryCollector<'a> {
    pub fn new(warehouse: &'a dyn WarehouseApi, config: &'a RuleConfig) -> Self {
        Self { warehouse, config }
    }

    /// Enumerate every cluster and build one record per cluster.
    ///
    /// An empty listing yields an empty vector, not an error. Provider
    /// failures propagate to the caller.
    pub fn collect(&self) -> Result<Vec<ResourceRecord>, ProviderError> {
        let mut records = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self
                .warehouse
                .describe_clusters(self.config.list_page_size, marker.as_deref())?;
            debug!("listed {} cluster(s)", page.clusters.len());

            for cluster in &page.clusters {
                records.push(self.record_for_cluster(cluster)?);
            }
            self.config.pause();

            match page.marker {
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        Ok(records)
    }

    /// Merge auxiliary queries for one cluster into a flat record
    fn record_for_cluster(
        &self,
        cluster: &ClusterDescriptor,
    ) -> Result<ResourceRecord, ProviderError> {
        let mut record = ResourceRecord::new(cluster.cluster_identifier.clone());

        for (name, enabled) in self.scanned_parameter_flags(&cluster.cluster_parameter_groups)? {
            record = record.with_attribute(name, enabled);
        }

        let log_enabled = self
            .warehouse
            .describe_logging_status(&cluster.cluster_identifier)?;
        self.config.pause();

        Ok(record
            .with_attribute(ATTR_DB_ENCRYPTED, cluster.encrypted)
            .with_attribute(ATTR_LOG_ENABLED, log_enabled))
    }

    /// Resolve the scanned parameter flags for a cluster.
    ///
    /// A flag counts as enabled only when its stored value is `"true"`
    /// AND it does not appear in the non-synced list; a stored `true`
    /// that has not been applied is still disabled.
    fn scanned_parameter_flags(
        &self,
        groups: &[ParameterGroupStatus],
    ) -> Result<BTreeMap<String, bool>, ProviderError> {
        let Some(first_group) = groups.first() else {
            debug!("cluster has no parameter groups, skipping parameter scan");
            return Ok(BTreeMap::new());
        };

        let parameters = self
            .warehouse
            .describe_cluster_parameters(&first_group.parameter_group_name)?;
        let non_synced = non_synced_parameters(groups);

        let mut flags = BTreeMap::new();
        for param in parameters {
            if SCANNED_PARAMETERS.contains(&param.parameter_name.as_str()) {
                let enabled =
                    param.parameter_value == "true" && !non_synced.contains(&param.parameter_name);
                flags.insert(param.parameter_name, enabled);
            }
        }
        self.config.pause();

        Ok(flags)
    }
}

/// Names of parameters whose stored value has not been applied.
///
/// The per-group apply status is not consulted: non-synced names are
/// collected from every attached group. See
/// `test_non_synced_params_ignore_group_apply_status`.
pub fn non_synced_parameters(groups: &[ParameterGroupStatus]) -> Vec<String> {
    let mut names = Vec::new();
    for group in groups {
        for status in &group.cluster_parameter_status_list {
            if status.parameter_apply_status != IN_SYNC {
                names.push(status.parameter_name.clone());
            }
        }
    }
    names
}
