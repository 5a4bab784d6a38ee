//! Aurora DB clusters: lifecycle, failover and backtracking.

use crate::error::RdsResult;
use crate::operation::{paginated, Operation, Projection};
use crate::params::{BoundParams, FieldKind, FieldSpec, MARKER, MAX_RECORDS};
use crate::query::xml::xml_text;
use crate::query::{FromQueryXml, QueryWriter, ToQuery};
use crate::transport::RdsTransport;
use crate::types::{parse_list, parse_one, DBCluster, DBClusterBacktrack};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Response shape of every action returning the affected cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DBClusterOutput {
    pub db_cluster: Option<DBCluster>,
}

impl FromQueryXml for DBClusterOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            db_cluster: parse_one(r, "DBCluster", DBCluster::from_xml),
        }
    }
}

// ── ModifyDBCluster ─────────────────────────────────────────────────────

pub struct ModifyDBCluster;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifyDBClusterInput {
    pub db_cluster_identifier: String,
    pub new_db_cluster_identifier: Option<String>,
    pub apply_immediately: Option<bool>,
    pub backup_retention_period: Option<i32>,
    pub db_cluster_parameter_group_name: Option<String>,
    pub vpc_security_group_ids: Option<Vec<String>>,
    pub port: Option<i32>,
    pub master_user_password: Option<String>,
    pub preferred_backup_window: Option<String>,
    pub preferred_maintenance_window: Option<String>,
    /// Seconds; 0 disables backtracking.
    pub backtrack_window: Option<i64>,
    pub engine_version: Option<String>,
    pub allow_major_version_upgrade: Option<bool>,
    pub deletion_protection: Option<bool>,
    pub copy_tags_to_snapshot: Option<bool>,
}

impl Operation for ModifyDBCluster {
    type Request = ModifyDBClusterInput;
    type Response = DBClusterOutput;

    const ACTION: &'static str = "ModifyDBCluster";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("DBClusterIdentifier", FieldKind::Text),
        FieldSpec::optional("NewDBClusterIdentifier", FieldKind::Text),
        FieldSpec::optional("ApplyImmediately", FieldKind::Boolean),
        FieldSpec::optional("BackupRetentionPeriod", FieldKind::Integer),
        FieldSpec::optional("DBClusterParameterGroupName", FieldKind::Text),
        FieldSpec::optional("VpcSecurityGroupIds", FieldKind::TextList),
        FieldSpec::optional("Port", FieldKind::Integer),
        FieldSpec::optional("MasterUserPassword", FieldKind::Text),
        FieldSpec::optional("PreferredBackupWindow", FieldKind::Text),
        FieldSpec::optional("PreferredMaintenanceWindow", FieldKind::Text),
        FieldSpec::optional("BacktrackWindow", FieldKind::Integer),
        FieldSpec::optional("EngineVersion", FieldKind::Text),
        FieldSpec::optional("AllowMajorVersionUpgrade", FieldKind::Boolean),
        FieldSpec::optional("DeletionProtection", FieldKind::Boolean),
        FieldSpec::optional("CopyTagsToSnapshot", FieldKind::Boolean),
    ];
    const PROJECTION: Projection = Projection::Field("db_cluster");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(ModifyDBClusterInput {
            db_cluster_identifier: p.required_text("DBClusterIdentifier")?,
            new_db_cluster_identifier: p.text("NewDBClusterIdentifier"),
            apply_immediately: p.flag("ApplyImmediately"),
            backup_retention_period: p.int("BackupRetentionPeriod"),
            db_cluster_parameter_group_name: p.text("DBClusterParameterGroupName"),
            vpc_security_group_ids: p.list("VpcSecurityGroupIds"),
            port: p.int("Port"),
            master_user_password: p.text("MasterUserPassword"),
            preferred_backup_window: p.text("PreferredBackupWindow"),
            preferred_maintenance_window: p.text("PreferredMaintenanceWindow"),
            backtrack_window: p.int("BacktrackWindow").map(i64::from),
            engine_version: p.text("EngineVersion"),
            allow_major_version_upgrade: p.flag("AllowMajorVersionUpgrade"),
            deletion_protection: p.flag("DeletionProtection"),
            copy_tags_to_snapshot: p.flag("CopyTagsToSnapshot"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.modify_db_cluster(request, cancel)
    }
}

impl ToQuery for ModifyDBClusterInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("DBClusterIdentifier", &self.db_cluster_identifier)
            .opt_text("NewDBClusterIdentifier", &self.new_db_cluster_identifier)
            .opt_bool("ApplyImmediately", self.apply_immediately)
            .opt_int("BackupRetentionPeriod", self.backup_retention_period)
            .opt_text("DBClusterParameterGroupName", &self.db_cluster_parameter_group_name)
            .list("VpcSecurityGroupIds", "VpcSecurityGroupId", &self.vpc_security_group_ids)
            .opt_int("Port", self.port)
            .opt_text("MasterUserPassword", &self.master_user_password)
            .opt_text("PreferredBackupWindow", &self.preferred_backup_window)
            .opt_text("PreferredMaintenanceWindow", &self.preferred_maintenance_window)
            .opt_long("BacktrackWindow", self.backtrack_window)
            .opt_text("EngineVersion", &self.engine_version)
            .opt_bool("AllowMajorVersionUpgrade", self.allow_major_version_upgrade)
            .opt_bool("DeletionProtection", self.deletion_protection)
            .opt_bool("CopyTagsToSnapshot", self.copy_tags_to_snapshot);
    }
}

// ── StartDBCluster / StopDBCluster ──────────────────────────────────────

pub struct StartDBCluster;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartDBClusterInput {
    pub db_cluster_identifier: String,
}

pub type StartDBClusterOutput = DBClusterOutput;

impl Operation for StartDBCluster {
    type Request = StartDBClusterInput;
    type Response = StartDBClusterOutput;

    const ACTION: &'static str = "StartDBCluster";
    const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::required("DBClusterIdentifier", FieldKind::Text)];
    const PROJECTION: Projection = Projection::Field("db_cluster");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(StartDBClusterInput {
            db_cluster_identifier: p.required_text("DBClusterIdentifier")?,
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.start_db_cluster(request, cancel)
    }
}

impl ToQuery for StartDBClusterInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("DBClusterIdentifier", &self.db_cluster_identifier);
    }
}

pub struct StopDBCluster;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopDBClusterInput {
    pub db_cluster_identifier: String,
}

impl Operation for StopDBCluster {
    type Request = StopDBClusterInput;
    type Response = DBClusterOutput;

    const ACTION: &'static str = "StopDBCluster";
    const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::required("DBClusterIdentifier", FieldKind::Text)];
    const PROJECTION: Projection = Projection::Field("db_cluster");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(StopDBClusterInput {
            db_cluster_identifier: p.required_text("DBClusterIdentifier")?,
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.stop_db_cluster(request, cancel)
    }
}

impl ToQuery for StopDBClusterInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("DBClusterIdentifier", &self.db_cluster_identifier);
    }
}

// ── FailoverDBCluster ───────────────────────────────────────────────────

pub struct FailoverDBCluster;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailoverDBClusterInput {
    pub db_cluster_identifier: String,
    /// Reader to promote; the service picks one when absent.
    pub target_db_instance_identifier: Option<String>,
}

impl Operation for FailoverDBCluster {
    type Request = FailoverDBClusterInput;
    type Response = DBClusterOutput;

    const ACTION: &'static str = "FailoverDBCluster";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("DBClusterIdentifier", FieldKind::Text),
        FieldSpec::optional("TargetDBInstanceIdentifier", FieldKind::Text),
    ];
    const PROJECTION: Projection = Projection::Field("db_cluster");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(FailoverDBClusterInput {
            db_cluster_identifier: p.required_text("DBClusterIdentifier")?,
            target_db_instance_identifier: p.text("TargetDBInstanceIdentifier"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.failover_db_cluster(request, cancel)
    }
}

impl ToQuery for FailoverDBClusterInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("DBClusterIdentifier", &self.db_cluster_identifier)
            .opt_text("TargetDBInstanceIdentifier", &self.target_db_instance_identifier);
    }
}

// ── DeleteDBCluster ─────────────────────────────────────────────────────

pub struct DeleteDBCluster;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteDBClusterInput {
    pub db_cluster_identifier: String,
    pub skip_final_snapshot: Option<bool>,
    pub final_db_snapshot_identifier: Option<String>,
    pub delete_automated_backups: Option<bool>,
}

impl Operation for DeleteDBCluster {
    type Request = DeleteDBClusterInput;
    type Response = DBClusterOutput;

    const ACTION: &'static str = "DeleteDBCluster";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("DBClusterIdentifier", FieldKind::Text),
        FieldSpec::optional("SkipFinalSnapshot", FieldKind::Boolean),
        FieldSpec::optional("FinalDBSnapshotIdentifier", FieldKind::Text),
        FieldSpec::optional("DeleteAutomatedBackups", FieldKind::Boolean),
    ];
    const PROJECTION: Projection = Projection::Field("db_cluster");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(DeleteDBClusterInput {
            db_cluster_identifier: p.required_text("DBClusterIdentifier")?,
            skip_final_snapshot: p.flag("SkipFinalSnapshot"),
            final_db_snapshot_identifier: p.text("FinalDBSnapshotIdentifier"),
            delete_automated_backups: p.flag("DeleteAutomatedBackups"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.delete_db_cluster(request, cancel)
    }
}

impl ToQuery for DeleteDBClusterInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("DBClusterIdentifier", &self.db_cluster_identifier)
            .opt_bool("SkipFinalSnapshot", self.skip_final_snapshot)
            .opt_text("FinalDBSnapshotIdentifier", &self.final_db_snapshot_identifier)
            .opt_bool("DeleteAutomatedBackups", self.delete_automated_backups);
    }
}

// ── BacktrackDBCluster ──────────────────────────────────────────────────

pub struct BacktrackDBCluster;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktrackDBClusterInput {
    pub db_cluster_identifier: String,
    /// RFC 3339 timestamp to rewind to.
    pub backtrack_to: String,
    pub force: Option<bool>,
    pub use_earliest_time_on_point_in_time_unavailable: Option<bool>,
}

/// The result element is itself the backtrack record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktrackDBClusterOutput {
    pub db_cluster_backtrack: Option<DBClusterBacktrack>,
}

impl Operation for BacktrackDBCluster {
    type Request = BacktrackDBClusterInput;
    type Response = BacktrackDBClusterOutput;

    const ACTION: &'static str = "BacktrackDBCluster";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("DBClusterIdentifier", FieldKind::Text),
        FieldSpec::required("BacktrackTo", FieldKind::Timestamp),
        FieldSpec::optional("Force", FieldKind::Boolean),
        FieldSpec::optional("UseEarliestTimeOnPointInTimeUnavailable", FieldKind::Boolean),
    ];
    const PROJECTION: Projection = Projection::Field("db_cluster_backtrack");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(BacktrackDBClusterInput {
            db_cluster_identifier: p.required_text("DBClusterIdentifier")?,
            backtrack_to: p.required_text("BacktrackTo")?,
            force: p.flag("Force"),
            use_earliest_time_on_point_in_time_unavailable: p
                .flag("UseEarliestTimeOnPointInTimeUnavailable"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.backtrack_db_cluster(request, cancel)
    }
}

impl ToQuery for BacktrackDBClusterInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("DBClusterIdentifier", &self.db_cluster_identifier)
            .text("BacktrackTo", &self.backtrack_to)
            .opt_bool("Force", self.force)
            .opt_bool(
                "UseEarliestTimeOnPointInTimeUnavailable",
                self.use_earliest_time_on_point_in_time_unavailable,
            );
    }
}

impl FromQueryXml for BacktrackDBClusterOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            db_cluster_backtrack: DBClusterBacktrack::from_xml(r),
        }
    }
}

// ── DescribeDBClusters ──────────────────────────────────────────────────

pub struct DescribeDBClusters;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeDBClustersInput {
    pub db_cluster_identifier: Option<String>,
    pub include_shared: Option<bool>,
    pub max_records: Option<i32>,
    pub marker: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeDBClustersOutput {
    pub db_clusters: Vec<DBCluster>,
    pub marker: Option<String>,
}

impl Operation for DescribeDBClusters {
    type Request = DescribeDBClustersInput;
    type Response = DescribeDBClustersOutput;

    const ACTION: &'static str = "DescribeDBClusters";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("DBClusterIdentifier", FieldKind::Text),
        FieldSpec::optional("IncludeShared", FieldKind::Boolean),
        MAX_RECORDS,
        MARKER,
    ];
    const PROJECTION: Projection = Projection::Field("db_clusters");

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(DescribeDBClustersInput {
            db_cluster_identifier: p.text("DBClusterIdentifier"),
            include_shared: p.flag("IncludeShared"),
            max_records: p.int("MaxRecords"),
            marker: p.text("Marker"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.describe_db_clusters(request, cancel)
    }
}

paginated!(DescribeDBClusters, DBCluster, db_clusters);

impl ToQuery for DescribeDBClustersInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.opt_text("DBClusterIdentifier", &self.db_cluster_identifier)
            .opt_bool("IncludeShared", self.include_shared)
            .opt_int("MaxRecords", self.max_records)
            .opt_text("Marker", &self.marker);
    }
}

impl FromQueryXml for DescribeDBClustersOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            db_clusters: parse_list(r, "DBClusters", "DBCluster", DBCluster::from_xml),
            marker: xml_text(r, "Marker"),
        }
    }
}

// ── DescribeDBClusterBacktracks ─────────────────────────────────────────

pub struct DescribeDBClusterBacktracks;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeDBClusterBacktracksInput {
    pub db_cluster_identifier: String,
    pub backtrack_identifier: Option<String>,
    pub max_records: Option<i32>,
    pub marker: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeDBClusterBacktracksOutput {
    pub db_cluster_backtracks: Vec<DBClusterBacktrack>,
    pub marker: Option<String>,
}

impl Operation for DescribeDBClusterBacktracks {
    type Request = DescribeDBClusterBacktracksInput;
    type Response = DescribeDBClusterBacktracksOutput;

    const ACTION: &'static str = "DescribeDBClusterBacktracks";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("DBClusterIdentifier", FieldKind::Text),
        FieldSpec::optional("BacktrackIdentifier", FieldKind::Text),
        MAX_RECORDS,
        MARKER,
    ];
    const PROJECTION: Projection = Projection::Field("db_cluster_backtracks");

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(DescribeDBClusterBacktracksInput {
            db_cluster_identifier: p.required_text("DBClusterIdentifier")?,
            backtrack_identifier: p.text("BacktrackIdentifier"),
            max_records: p.int("MaxRecords"),
            marker: p.text("Marker"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.describe_db_cluster_backtracks(request, cancel)
    }
}

paginated!(
    DescribeDBClusterBacktracks,
    DBClusterBacktrack,
    db_cluster_backtracks
);

impl ToQuery for DescribeDBClusterBacktracksInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("DBClusterIdentifier", &self.db_cluster_identifier)
            .opt_text("BacktrackIdentifier", &self.backtrack_identifier)
            .opt_int("MaxRecords", self.max_records)
            .opt_text("Marker", &self.marker);
    }
}

impl FromQueryXml for DescribeDBClusterBacktracksOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            db_cluster_backtracks: parse_list(
                r,
                "DBClusterBacktracks",
                "DBClusterBacktrack",
                DBClusterBacktrack::from_xml,
            ),
            marker: xml_text(r, "Marker"),
        }
    }
}
