//! RDS domain objects returned inside operation responses.
//!
//! Field sets follow the RDS API reference (API version 2014-10-31), trimmed
//! to what the command layer projects. Each type knows how to read itself
//! from a Query protocol XML element.

use crate::query::xml::{
    xml_block, xml_bool, xml_i32, xml_i64, xml_list, xml_text, xml_text_all, xml_text_list,
};
use serde::{Deserialize, Serialize};

// ── Tags ────────────────────────────────────────────────────────────────

/// Common AWS tag structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(alias = "Key")]
    pub key: String,
    #[serde(alias = "Value", default)]
    pub value: String,
}

impl Tag {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn from_xml(block: &str) -> Option<Self> {
        Some(Self {
            key: xml_text(block, "Key")?,
            value: xml_text(block, "Value").unwrap_or_default(),
        })
    }
}

// ── Clusters ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DBCluster {
    pub db_cluster_identifier: String,
    pub db_cluster_arn: Option<String>,
    pub status: Option<String>,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    pub endpoint: Option<String>,
    pub reader_endpoint: Option<String>,
    pub port: Option<i32>,
    pub master_username: Option<String>,
    pub database_name: Option<String>,
    pub db_cluster_parameter_group: Option<String>,
    pub backtrack_window: Option<i64>,
    pub backup_retention_period: Option<i32>,
    pub multi_az: bool,
    pub storage_encrypted: bool,
    pub deletion_protection: bool,
    pub cluster_create_time: Option<String>,
    pub db_cluster_members: Vec<DBClusterMember>,
    pub vpc_security_groups: Vec<VpcSecurityGroupMembership>,
    pub availability_zones: Vec<String>,
    pub tag_list: Vec<Tag>,
}

impl DBCluster {
    pub(crate) fn from_xml(b: &str) -> Option<Self> {
        Some(Self {
            db_cluster_identifier: xml_text(b, "DBClusterIdentifier")?,
            db_cluster_arn: xml_text(b, "DBClusterArn"),
            status: xml_text(b, "Status"),
            engine: xml_text(b, "Engine"),
            engine_version: xml_text(b, "EngineVersion"),
            endpoint: xml_text(b, "Endpoint"),
            reader_endpoint: xml_text(b, "ReaderEndpoint"),
            port: xml_i32(b, "Port"),
            master_username: xml_text(b, "MasterUsername"),
            database_name: xml_text(b, "DatabaseName"),
            db_cluster_parameter_group: xml_text(b, "DBClusterParameterGroup"),
            backtrack_window: xml_i64(b, "BacktrackWindow"),
            backup_retention_period: xml_i32(b, "BackupRetentionPeriod"),
            multi_az: xml_bool(b, "MultiAZ").unwrap_or(false),
            storage_encrypted: xml_bool(b, "StorageEncrypted").unwrap_or(false),
            deletion_protection: xml_bool(b, "DeletionProtection").unwrap_or(false),
            cluster_create_time: xml_text(b, "ClusterCreateTime"),
            db_cluster_members: xml_list(b, "DBClusterMembers", "DBClusterMember")
                .iter()
                .filter_map(|m| DBClusterMember::from_xml(m))
                .collect(),
            vpc_security_groups: xml_list(b, "VpcSecurityGroups", "VpcSecurityGroupMembership")
                .iter()
                .filter_map(|sg| VpcSecurityGroupMembership::from_xml(sg))
                .collect(),
            availability_zones: xml_text_list(b, "AvailabilityZones", "AvailabilityZone"),
            tag_list: xml_list(b, "TagList", "Tag")
                .iter()
                .filter_map(|t| Tag::from_xml(t))
                .collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DBClusterMember {
    pub db_instance_identifier: String,
    pub is_cluster_writer: bool,
    pub db_cluster_parameter_group_status: Option<String>,
    pub promotion_tier: Option<i32>,
}

impl DBClusterMember {
    fn from_xml(m: &str) -> Option<Self> {
        Some(Self {
            db_instance_identifier: xml_text(m, "DBInstanceIdentifier")?,
            is_cluster_writer: xml_bool(m, "IsClusterWriter").unwrap_or(false),
            db_cluster_parameter_group_status: xml_text(m, "DBClusterParameterGroupStatus"),
            promotion_tier: xml_i32(m, "PromotionTier"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpcSecurityGroupMembership {
    pub vpc_security_group_id: String,
    pub status: String,
}

impl VpcSecurityGroupMembership {
    fn from_xml(sg: &str) -> Option<Self> {
        Some(Self {
            vpc_security_group_id: xml_text(sg, "VpcSecurityGroupId")?,
            status: xml_text(sg, "Status").unwrap_or_default(),
        })
    }
}

/// One entry of a cluster's backtrack history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DBClusterBacktrack {
    pub db_cluster_identifier: String,
    pub backtrack_identifier: String,
    pub backtrack_to: Option<String>,
    pub backtracked_from: Option<String>,
    pub backtrack_request_creation_time: Option<String>,
    pub status: Option<String>,
}

impl DBClusterBacktrack {
    pub(crate) fn from_xml(b: &str) -> Option<Self> {
        Some(Self {
            db_cluster_identifier: xml_text(b, "DBClusterIdentifier").unwrap_or_default(),
            backtrack_identifier: xml_text(b, "BacktrackIdentifier")?,
            backtrack_to: xml_text(b, "BacktrackTo"),
            backtracked_from: xml_text(b, "BacktrackedFrom"),
            backtrack_request_creation_time: xml_text(b, "BacktrackRequestCreationTime"),
            status: xml_text(b, "Status"),
        })
    }
}

// ── Parameter groups ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DBClusterParameterGroup {
    pub db_cluster_parameter_group_name: String,
    pub db_parameter_group_family: String,
    pub description: String,
    pub db_cluster_parameter_group_arn: Option<String>,
}

impl DBClusterParameterGroup {
    pub(crate) fn from_xml(b: &str) -> Option<Self> {
        Some(Self {
            db_cluster_parameter_group_name: xml_text(b, "DBClusterParameterGroupName")?,
            db_parameter_group_family: xml_text(b, "DBParameterGroupFamily").unwrap_or_default(),
            description: xml_text(b, "Description").unwrap_or_default(),
            db_cluster_parameter_group_arn: xml_text(b, "DBClusterParameterGroupArn"),
        })
    }
}

/// A single engine parameter inside a parameter group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub parameter_name: String,
    pub parameter_value: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub apply_type: Option<String>,
    pub data_type: Option<String>,
    pub allowed_values: Option<String>,
    pub is_modifiable: bool,
    pub apply_method: Option<String>,
}

impl Parameter {
    pub(crate) fn from_xml(b: &str) -> Option<Self> {
        Some(Self {
            parameter_name: xml_text(b, "ParameterName")?,
            parameter_value: xml_text(b, "ParameterValue"),
            description: xml_text(b, "Description"),
            source: xml_text(b, "Source"),
            apply_type: xml_text(b, "ApplyType"),
            data_type: xml_text(b, "DataType"),
            allowed_values: xml_text(b, "AllowedValues"),
            is_modifiable: xml_bool(b, "IsModifiable").unwrap_or(false),
            apply_method: xml_text(b, "ApplyMethod"),
        })
    }
}

// ── Snapshots ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DBClusterSnapshot {
    pub db_cluster_snapshot_identifier: String,
    pub db_cluster_identifier: String,
    pub db_cluster_snapshot_arn: Option<String>,
    pub snapshot_create_time: Option<String>,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    pub allocated_storage: Option<i32>,
    pub status: Option<String>,
    pub snapshot_type: Option<String>,
    pub percent_progress: Option<i32>,
    pub storage_encrypted: bool,
    pub kms_key_id: Option<String>,
    pub source_db_cluster_snapshot_arn: Option<String>,
}

impl DBClusterSnapshot {
    pub(crate) fn from_xml(b: &str) -> Option<Self> {
        Some(Self {
            db_cluster_snapshot_identifier: xml_text(b, "DBClusterSnapshotIdentifier")?,
            db_cluster_identifier: xml_text(b, "DBClusterIdentifier").unwrap_or_default(),
            db_cluster_snapshot_arn: xml_text(b, "DBClusterSnapshotArn"),
            snapshot_create_time: xml_text(b, "SnapshotCreateTime"),
            engine: xml_text(b, "Engine"),
            engine_version: xml_text(b, "EngineVersion"),
            allocated_storage: xml_i32(b, "AllocatedStorage"),
            status: xml_text(b, "Status"),
            snapshot_type: xml_text(b, "SnapshotType"),
            percent_progress: xml_i32(b, "PercentProgress"),
            storage_encrypted: xml_bool(b, "StorageEncrypted").unwrap_or(false),
            kms_key_id: xml_text(b, "KmsKeyId"),
            source_db_cluster_snapshot_arn: xml_text(b, "SourceDBClusterSnapshotArn"),
        })
    }
}

// ── Global clusters ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalCluster {
    pub global_cluster_identifier: String,
    pub global_cluster_resource_id: Option<String>,
    pub global_cluster_arn: Option<String>,
    pub status: Option<String>,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    pub database_name: Option<String>,
    pub storage_encrypted: bool,
    pub deletion_protection: bool,
    pub global_cluster_members: Vec<GlobalClusterMember>,
}

impl GlobalCluster {
    pub(crate) fn from_xml(b: &str) -> Option<Self> {
        Some(Self {
            global_cluster_identifier: xml_text(b, "GlobalClusterIdentifier")?,
            global_cluster_resource_id: xml_text(b, "GlobalClusterResourceId"),
            global_cluster_arn: xml_text(b, "GlobalClusterArn"),
            status: xml_text(b, "Status"),
            engine: xml_text(b, "Engine"),
            engine_version: xml_text(b, "EngineVersion"),
            database_name: xml_text(b, "DatabaseName"),
            storage_encrypted: xml_bool(b, "StorageEncrypted").unwrap_or(false),
            deletion_protection: xml_bool(b, "DeletionProtection").unwrap_or(false),
            global_cluster_members: xml_list(b, "GlobalClusterMembers", "GlobalClusterMember")
                .iter()
                .filter_map(|m| GlobalClusterMember::from_xml(m))
                .collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalClusterMember {
    pub db_cluster_arn: String,
    pub readers: Vec<String>,
    pub is_writer: bool,
    pub global_write_forwarding_status: Option<String>,
}

impl GlobalClusterMember {
    fn from_xml(m: &str) -> Option<Self> {
        Some(Self {
            db_cluster_arn: xml_text(m, "DBClusterArn")?,
            readers: xml_text_list(m, "Readers", "member"),
            is_writer: xml_bool(m, "IsWriter").unwrap_or(false),
            global_write_forwarding_status: xml_text(m, "GlobalWriteForwardingStatus"),
        })
    }
}

// ── Proxies ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DBProxy {
    pub db_proxy_name: String,
    pub db_proxy_arn: Option<String>,
    pub status: Option<String>,
    pub engine_family: Option<String>,
    pub vpc_id: Option<String>,
    pub vpc_security_group_ids: Vec<String>,
    pub vpc_subnet_ids: Vec<String>,
    pub role_arn: Option<String>,
    pub endpoint: Option<String>,
    pub require_tls: bool,
    pub idle_client_timeout: Option<i32>,
    pub debug_logging: bool,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
}

impl DBProxy {
    pub(crate) fn from_xml(b: &str) -> Option<Self> {
        Some(Self {
            db_proxy_name: xml_text(b, "DBProxyName")?,
            db_proxy_arn: xml_text(b, "DBProxyArn"),
            status: xml_text(b, "Status"),
            engine_family: xml_text(b, "EngineFamily"),
            vpc_id: xml_text(b, "VpcId"),
            vpc_security_group_ids: xml_text_list(b, "VpcSecurityGroupIds", "member"),
            vpc_subnet_ids: xml_text_list(b, "VpcSubnetIds", "member"),
            role_arn: xml_text(b, "RoleArn"),
            endpoint: xml_text(b, "Endpoint"),
            require_tls: xml_bool(b, "RequireTLS").unwrap_or(false),
            idle_client_timeout: xml_i32(b, "IdleClientTimeout"),
            debug_logging: xml_bool(b, "DebugLogging").unwrap_or(false),
            created_date: xml_text(b, "CreatedDate"),
            updated_date: xml_text(b, "UpdatedDate"),
        })
    }
}

// ── Events ──────────────────────────────────────────────────────────────

/// RDS event notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub source_identifier: String,
    pub source_type: Option<String>,
    pub message: Option<String>,
    pub date: Option<String>,
    pub source_arn: Option<String>,
    pub event_categories: Vec<String>,
}

impl Event {
    pub(crate) fn from_xml(b: &str) -> Option<Self> {
        Some(Self {
            source_identifier: xml_text(b, "SourceIdentifier")?,
            source_type: xml_text(b, "SourceType"),
            message: xml_text(b, "Message"),
            date: xml_text(b, "Date"),
            source_arn: xml_text(b, "SourceArn"),
            event_categories: xml_text_all(b, "EventCategory"),
        })
    }
}

/// Parse the first `tag` element of `xml` with `parse`.
pub(crate) fn parse_one<T>(xml: &str, tag: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
    xml_block(xml, tag).and_then(|b| parse(&b))
}

/// Parse every `item` inside the `wrapper` element of `xml` with `parse`.
pub(crate) fn parse_list<T>(
    xml: &str,
    wrapper: &str,
    item: &str,
    parse: fn(&str) -> Option<T>,
) -> Vec<T> {
    xml_list(xml, wrapper, item)
        .iter()
        .filter_map(|b| parse(b))
        .collect()
}
