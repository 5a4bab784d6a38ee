//! Aurora global databases.

use crate::error::RdsResult;
use crate::operation::{paginated, Operation, Projection};
use crate::params::{BoundParams, FieldKind, FieldSpec, MARKER, MAX_RECORDS};
use crate::query::xml::xml_text;
use crate::query::{FromQueryXml, QueryWriter, ToQuery};
use crate::transport::RdsTransport;
use crate::types::{parse_list, parse_one, GlobalCluster};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Response shape shared by every mutating global cluster action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalClusterOutput {
    pub global_cluster: Option<GlobalCluster>,
}

impl FromQueryXml for GlobalClusterOutput {
    fn from_query_xml(r: &str) -> Self {
        Self {
            global_cluster: parse_one(r, "GlobalCluster", GlobalCluster::from_xml),
        }
    }
}

// ── CreateGlobalCluster ─────────────────────────────────────────────────

pub struct CreateGlobalCluster;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateGlobalClusterInput {
    pub global_cluster_identifier: String,
    /// ARN of an existing cluster to promote into the global database.
    pub source_db_cluster_identifier: Option<String>,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    pub deletion_protection: Option<bool>,
    pub database_name: Option<String>,
    pub storage_encrypted: Option<bool>,
}

impl Operation for CreateGlobalCluster {
    type Request = CreateGlobalClusterInput;
    type Response = GlobalClusterOutput;

    const ACTION: &'static str = "CreateGlobalCluster";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("GlobalClusterIdentifier", FieldKind::Text),
        FieldSpec::optional("SourceDBClusterIdentifier", FieldKind::Text),
        FieldSpec::optional("Engine", FieldKind::Text),
        FieldSpec::optional("EngineVersion", FieldKind::Text),
        FieldSpec::optional("DeletionProtection", FieldKind::Boolean),
        FieldSpec::optional("DatabaseName", FieldKind::Text),
        FieldSpec::optional("StorageEncrypted", FieldKind::Boolean),
    ];
    const PROJECTION: Projection = Projection::Field("global_cluster");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(CreateGlobalClusterInput {
            global_cluster_identifier: p.required_text("GlobalClusterIdentifier")?,
            source_db_cluster_identifier: p.text("SourceDBClusterIdentifier"),
            engine: p.text("Engine"),
            engine_version: p.text("EngineVersion"),
            deletion_protection: p.flag("DeletionProtection"),
            database_name: p.text("DatabaseName"),
            storage_encrypted: p.flag("StorageEncrypted"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.create_global_cluster(request, cancel)
    }
}

impl ToQuery for CreateGlobalClusterInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("GlobalClusterIdentifier", &self.global_cluster_identifier)
            .opt_text("SourceDBClusterIdentifier", &self.source_db_cluster_identifier)
            .opt_text("Engine", &self.engine)
            .opt_text("EngineVersion", &self.engine_version)
            .opt_bool("DeletionProtection", self.deletion_protection)
            .opt_text("DatabaseName", &self.database_name)
            .opt_bool("StorageEncrypted", self.storage_encrypted);
    }
}

// ── ModifyGlobalCluster ─────────────────────────────────────────────────

pub struct ModifyGlobalCluster;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifyGlobalClusterInput {
    pub global_cluster_identifier: String,
    pub new_global_cluster_identifier: Option<String>,
    pub deletion_protection: Option<bool>,
    pub engine_version: Option<String>,
    pub allow_major_version_upgrade: Option<bool>,
}

impl Operation for ModifyGlobalCluster {
    type Request = ModifyGlobalClusterInput;
    type Response = GlobalClusterOutput;

    const ACTION: &'static str = "ModifyGlobalCluster";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("GlobalClusterIdentifier", FieldKind::Text),
        FieldSpec::optional("NewGlobalClusterIdentifier", FieldKind::Text),
        FieldSpec::optional("DeletionProtection", FieldKind::Boolean),
        FieldSpec::optional("EngineVersion", FieldKind::Text),
        FieldSpec::optional("AllowMajorVersionUpgrade", FieldKind::Boolean),
    ];
    const PROJECTION: Projection = Projection::Field("global_cluster");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(ModifyGlobalClusterInput {
            global_cluster_identifier: p.required_text("GlobalClusterIdentifier")?,
            new_global_cluster_identifier: p.text("NewGlobalClusterIdentifier"),
            deletion_protection: p.flag("DeletionProtection"),
            engine_version: p.text("EngineVersion"),
            allow_major_version_upgrade: p.flag("AllowMajorVersionUpgrade"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.modify_global_cluster(request, cancel)
    }
}

impl ToQuery for ModifyGlobalClusterInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("GlobalClusterIdentifier", &self.global_cluster_identifier)
            .opt_text("NewGlobalClusterIdentifier", &self.new_global_cluster_identifier)
            .opt_bool("DeletionProtection", self.deletion_protection)
            .opt_text("EngineVersion", &self.engine_version)
            .opt_bool("AllowMajorVersionUpgrade", self.allow_major_version_upgrade);
    }
}

// ── DeleteGlobalCluster ─────────────────────────────────────────────────

pub struct DeleteGlobalCluster;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteGlobalClusterInput {
    pub global_cluster_identifier: String,
}

impl Operation for DeleteGlobalCluster {
    type Request = DeleteGlobalClusterInput;
    type Response = GlobalClusterOutput;

    const ACTION: &'static str = "DeleteGlobalCluster";
    const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::required("GlobalClusterIdentifier", FieldKind::Text)];
    const PROJECTION: Projection = Projection::Field("global_cluster");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(DeleteGlobalClusterInput {
            global_cluster_identifier: p.required_text("GlobalClusterIdentifier")?,
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.delete_global_cluster(request, cancel)
    }
}

impl ToQuery for DeleteGlobalClusterInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("GlobalClusterIdentifier", &self.global_cluster_identifier);
    }
}

// ── RemoveFromGlobalCluster ─────────────────────────────────────────────

pub struct RemoveFromGlobalCluster;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoveFromGlobalClusterInput {
    pub global_cluster_identifier: String,
    /// ARN of the member cluster to detach.
    pub db_cluster_identifier: String,
}

impl Operation for RemoveFromGlobalCluster {
    type Request = RemoveFromGlobalClusterInput;
    type Response = GlobalClusterOutput;

    const ACTION: &'static str = "RemoveFromGlobalCluster";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("GlobalClusterIdentifier", FieldKind::Text),
        FieldSpec::required("DbClusterIdentifier", FieldKind::Text),
    ];
    const PROJECTION: Projection = Projection::Field("global_cluster");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(RemoveFromGlobalClusterInput {
            global_cluster_identifier: p.required_text("GlobalClusterIdentifier")?,
            db_cluster_identifier: p.required_text("DbClusterIdentifier")?,
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.remove_from_global_cluster(request, cancel)
    }
}

impl ToQuery for RemoveFromGlobalClusterInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("GlobalClusterIdentifier", &self.global_cluster_identifier)
            .text("DbClusterIdentifier", &self.db_cluster_identifier);
    }
}

// ── FailoverGlobalCluster ───────────────────────────────────────────────

pub struct FailoverGlobalCluster;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailoverGlobalClusterInput {
    pub global_cluster_identifier: String,
    pub target_db_cluster_identifier: String,
    pub allow_data_loss: Option<bool>,
    pub switchover: Option<bool>,
}

impl Operation for FailoverGlobalCluster {
    type Request = FailoverGlobalClusterInput;
    type Response = GlobalClusterOutput;

    const ACTION: &'static str = "FailoverGlobalCluster";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("GlobalClusterIdentifier", FieldKind::Text),
        FieldSpec::required("TargetDbClusterIdentifier", FieldKind::Text),
        FieldSpec::optional("AllowDataLoss", FieldKind::Boolean),
        FieldSpec::optional("Switchover", FieldKind::Boolean),
    ];
    const PROJECTION: Projection = Projection::Field("global_cluster");
    const MUTATING: bool = true;

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(FailoverGlobalClusterInput {
            global_cluster_identifier: p.required_text("GlobalClusterIdentifier")?,
            target_db_cluster_identifier: p.required_text("TargetDbClusterIdentifier")?,
            allow_data_loss: p.flag("AllowDataLoss"),
            switchover: p.flag("Switchover"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.failover_global_cluster(request, cancel)
    }
}

impl ToQuery for FailoverGlobalClusterInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.text("GlobalClusterIdentifier", &self.global_cluster_identifier)
            .text("TargetDbClusterIdentifier", &self.target_db_cluster_identifier)
            .opt_bool("AllowDataLoss", self.allow_data_loss)
            .opt_bool("Switchover", self.switchover);
    }
}

// ── DescribeGlobalClusters ──────────────────────────────────────────────

pub struct DescribeGlobalClusters;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescribeGlobalClustersInput {
    pub global_cluster_identifier: Option<String>,
    pub max_records: Option<i32>,
    pub marker: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeGlobalClustersOutput {
    pub global_clusters: Vec<GlobalCluster>,
    pub marker: Option<String>,
}

impl Operation for DescribeGlobalClusters {
    type Request = DescribeGlobalClustersInput;
    type Response = DescribeGlobalClustersOutput;

    const ACTION: &'static str = "DescribeGlobalClusters";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("GlobalClusterIdentifier", FieldKind::Text),
        MAX_RECORDS,
        MARKER,
    ];
    const PROJECTION: Projection = Projection::Field("global_clusters");

    fn build(p: &BoundParams) -> RdsResult<Self::Request> {
        Ok(DescribeGlobalClustersInput {
            global_cluster_identifier: p.text("GlobalClusterIdentifier"),
            max_records: p.int("MaxRecords"),
            marker: p.text("Marker"),
        })
    }

    fn invoke<'a>(
        t: &'a dyn RdsTransport,
        request: Self::Request,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, RdsResult<Self::Response>> {
        t.describe_global_clusters(request, cancel)
    }
}

paginated!(DescribeGlobalClusters, GlobalCluster, global_clusters);

impl ToQuery for DescribeGlobalClustersInput {
    fn write_query(&self, w: &mut QueryWriter) {
        w.opt_text("GlobalClusterIdentifier", &self.global_cluster_identifier)
            .opt_int("MaxRecords", self.max_records)
            .opt_text("Marker", &self.marker);
    }
}

impl FromQueryXml for DescribeGlobalClustersOutput {
    fn from_query_xml(r: &str) -> Self {
        // The list items are named `GlobalClusterMember` on the wire.
        let mut global_clusters = parse_list(
            r,
            "GlobalClusters",
            "GlobalClusterMember",
            GlobalCluster::from_xml,
        );
        if global_clusters.is_empty() {
            global_clusters = parse_list(r, "GlobalClusters", "GlobalCluster", GlobalCluster::from_xml);
        }
        Self {
            global_clusters,
            marker: xml_text(r, "Marker"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_from_wire_item_name() {
        let xml = r#"<DescribeGlobalClustersResult>
            <GlobalClusters>
              <GlobalClusterMember>
                <GlobalClusterIdentifier>g1</GlobalClusterIdentifier>
                <Engine>aurora-postgresql</Engine>
                <GlobalClusterMembers>
                  <GlobalClusterMember>
                    <DBClusterArn>arn:aws:rds:us-east-1:123:cluster:primary</DBClusterArn>
                    <IsWriter>true</IsWriter>
                  </GlobalClusterMember>
                </GlobalClusterMembers>
              </GlobalClusterMember>
              <GlobalClusterMember>
                <GlobalClusterIdentifier>g2</GlobalClusterIdentifier>
              </GlobalClusterMember>
            </GlobalClusters>
          </DescribeGlobalClustersResult>"#;
        let out = DescribeGlobalClustersOutput::from_query_xml(xml);
        assert_eq!(out.global_clusters.len(), 2);
        assert_eq!(out.global_clusters[0].global_cluster_identifier, "g1");
        assert_eq!(out.global_clusters[0].global_cluster_members.len(), 1);
        assert_eq!(out.global_clusters[1].global_cluster_identifier, "g2");
        assert_eq!(out.marker, None);
    }

    #[test]
    fn failover_query() {
        let req = FailoverGlobalClusterInput {
            global_cluster_identifier: "g1".into(),
            target_db_cluster_identifier: "arn:aws:rds:eu-west-1:123:cluster:secondary".into(),
            switchover: Some(true),
            ..Default::default()
        };
        let mut w = QueryWriter::new(FailoverGlobalCluster::ACTION);
        req.write_query(&mut w);
        assert_eq!(w.get("Switchover"), Some("true"));
        assert_eq!(w.get("AllowDataLoss"), None);
        assert_eq!(
            w.get("TargetDbClusterIdentifier"),
            Some("arn:aws:rds:eu-west-1:123:cluster:secondary")
        );
    }

    #[test]
    fn mutating_output_from_xml() {
        let out = GlobalClusterOutput::from_query_xml(
            "<DeleteGlobalClusterResult><GlobalCluster><GlobalClusterIdentifier>g1</GlobalClusterIdentifier><Status>deleting</Status></GlobalCluster></DeleteGlobalClusterResult>",
        );
        assert_eq!(out.global_cluster.and_then(|g| g.status).as_deref(), Some("deleting"));
    }
}
